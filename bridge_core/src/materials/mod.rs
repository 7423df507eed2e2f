//! # Materials
//!
//! Concrete and reinforcement grades per IS 456 / IRC 112, and the
//! [`MaterialProperties`] record consumed by the design pipeline.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::materials::{ConcreteGrade, MaterialProperties, SteelGrade};
//!
//! let mat = MaterialProperties::from_grades(ConcreteGrade::M30, SteelGrade::Fe500);
//! assert_eq!(mat.fck, 30.0);
//! assert_eq!(mat.fy, 500.0);
//! assert_eq!(mat.concrete_density, 24.0);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, CalcResult};

/// Unit weight of reinforced concrete used by IRC 6 (kN/m³)
pub const RCC_DENSITY_KN_M3: f64 = 24.0;

/// Density of reinforcing steel (t/m³)
pub const STEEL_DENSITY_T_M3: f64 = 7.85;

/// Concrete grade designation (characteristic cube strength in N/mm²).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcreteGrade {
    M20,
    M25,
    M30,
    M35,
    M40,
    M45,
    M50,
}

impl ConcreteGrade {
    /// All grades in ascending strength
    pub const ALL: [ConcreteGrade; 7] = [
        ConcreteGrade::M20,
        ConcreteGrade::M25,
        ConcreteGrade::M30,
        ConcreteGrade::M35,
        ConcreteGrade::M40,
        ConcreteGrade::M45,
        ConcreteGrade::M50,
    ];

    /// Characteristic compressive strength fck (N/mm²)
    pub fn fck(&self) -> f64 {
        match self {
            ConcreteGrade::M20 => 20.0,
            ConcreteGrade::M25 => 25.0,
            ConcreteGrade::M30 => 30.0,
            ConcreteGrade::M35 => 35.0,
            ConcreteGrade::M40 => 40.0,
            ConcreteGrade::M45 => 45.0,
            ConcreteGrade::M50 => 50.0,
        }
    }

    /// Look up the grade whose fck matches exactly
    pub fn from_fck(fck: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.fck() == fck)
    }
}

impl fmt::Display for ConcreteGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.fck() as u32)
    }
}

/// Reinforcement grade designation (yield strength in N/mm²).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SteelGrade {
    Fe415,
    Fe500,
    Fe550,
    Fe600,
}

impl SteelGrade {
    pub const ALL: [SteelGrade; 4] = [
        SteelGrade::Fe415,
        SteelGrade::Fe500,
        SteelGrade::Fe550,
        SteelGrade::Fe600,
    ];

    /// Characteristic yield strength fy (N/mm²)
    pub fn fy(&self) -> f64 {
        match self {
            SteelGrade::Fe415 => 415.0,
            SteelGrade::Fe500 => 500.0,
            SteelGrade::Fe550 => 550.0,
            SteelGrade::Fe600 => 600.0,
        }
    }

    /// Look up the grade whose fy matches exactly
    pub fn from_fy(fy: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.fy() == fy)
    }
}

impl fmt::Display for SteelGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fe{}", self.fy() as u32)
    }
}

/// Material strengths and self-weight for the abutment concrete.
///
/// ## JSON Example
///
/// ```json
/// { "fck": 25.0, "fy": 415.0, "concrete_density": 24.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Concrete characteristic strength fck (N/mm²)
    pub fck: f64,

    /// Steel yield strength fy (N/mm²)
    pub fy: f64,

    /// Concrete unit weight (kN/m³)
    pub concrete_density: f64,
}

impl MaterialProperties {
    /// Build from named grades with the standard RCC unit weight
    pub fn from_grades(concrete: ConcreteGrade, steel: SteelGrade) -> Self {
        MaterialProperties {
            fck: concrete.fck(),
            fy: steel.fy(),
            concrete_density: RCC_DENSITY_KN_M3,
        }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("material.fck", self.fck, "Concrete grade must be positive")?;
        require_positive("material.fy", self.fy, "Steel grade must be positive")?;
        require_positive(
            "material.concrete_density",
            self.concrete_density,
            "Concrete density must be positive",
        )?;
        Ok(())
    }

    /// Human-readable grade summary, e.g. "M25 / Fe415"
    pub fn display_name(&self) -> String {
        let concrete = ConcreteGrade::from_fck(self.fck)
            .map(|g| g.to_string())
            .unwrap_or_else(|| format!("fck {:.0}", self.fck));
        let steel = SteelGrade::from_fy(self.fy)
            .map(|g| g.to_string())
            .unwrap_or_else(|| format!("fy {:.0}", self.fy));
        format!("{} / {}", concrete, steel)
    }
}

impl Default for MaterialProperties {
    fn default() -> Self {
        MaterialProperties::from_grades(ConcreteGrade::M25, SteelGrade::Fe415)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_material() {
        let mat = MaterialProperties::default();
        assert_eq!(mat.fck, 25.0);
        assert_eq!(mat.fy, 415.0);
        assert_eq!(mat.concrete_density, 24.0);
        assert_eq!(mat.display_name(), "M25 / Fe415");
    }

    #[test]
    fn test_grade_lookup() {
        assert_eq!(ConcreteGrade::from_fck(35.0), Some(ConcreteGrade::M35));
        assert_eq!(ConcreteGrade::from_fck(27.5), None);
        assert_eq!(SteelGrade::from_fy(500.0), Some(SteelGrade::Fe500));
        assert_eq!(SteelGrade::Fe550.to_string(), "Fe550");
    }

    #[test]
    fn test_non_standard_display() {
        let mat = MaterialProperties {
            fck: 27.0,
            fy: 415.0,
            concrete_density: 24.0,
        };
        assert_eq!(mat.display_name(), "fck 27 / Fe415");
    }

    #[test]
    fn test_validation_rejects_negative() {
        let mut mat = MaterialProperties::default();
        mat.concrete_density = -24.0;
        assert!(mat.validate().is_err());
        mat.concrete_density = 24.0;
        mat.fy = 0.0;
        assert!(mat.validate().is_err());
    }

    #[test]
    fn test_grade_serialization() {
        let json = serde_json::to_string(&ConcreteGrade::M30).unwrap();
        assert_eq!(json, "\"M30\"");
        let back: SteelGrade = serde_json::from_str("\"Fe500\"").unwrap();
        assert_eq!(back, SteelGrade::Fe500);
    }
}
