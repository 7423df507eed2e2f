//! # Abutment Geometry
//!
//! Preliminary proportioning of the stem, base slab and wing walls from the
//! abutment height. All proportioning constants come from the battered or
//! cantilever policy in [`DesignCriteria`].
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::calculations::{geometry, AbutmentType};
//! use bridge_core::criteria::DesignCriteria;
//!
//! let geom = geometry::calculate(6.4, 12.5, AbutmentType::Battered, &DesignCriteria::default()).unwrap();
//! assert!((geom.base_width - 3.08).abs() < 1e-9);
//! assert!((geom.stem_volume - 133.632).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use super::AbutmentType;
use crate::criteria::{BatteredPolicy, CantileverPolicy, DesignCriteria};
use crate::errors::{require_positive, CalcResult};

/// Cross-section of the stem, which depends on the abutment type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum StemProfile {
    Battered {
        /// Width at bearing level (m)
        top_width: f64,
        /// Width at the top of the base (m)
        bottom_width: f64,
        /// Horizontal batter per unit height on each face
        batter_ratio: f64,
    },
    Cantilever {
        /// Uniform stem thickness (m)
        stem_thickness: f64,
        /// Base projection behind the stem (m)
        heel_length: f64,
        /// Base projection in front of the stem (m)
        toe_length: f64,
    },
}

impl StemProfile {
    /// Width of the stem where it meets the base (m)
    pub fn width_at_base(&self) -> f64 {
        match *self {
            StemProfile::Battered { bottom_width, .. } => bottom_width,
            StemProfile::Cantilever { stem_thickness, .. } => stem_thickness,
        }
    }
}

/// Derived dimensions and concrete volumes of one abutment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub abutment_type: AbutmentType,
    /// Deck level less foundation level (m)
    pub height: f64,
    pub stem: StemProfile,
    /// Base dimension across the carriageway (m)
    pub base_length: f64,
    /// Base dimension along the bridge axis (m)
    pub base_width: f64,
    /// Base slab thickness (m)
    pub base_thickness: f64,
    /// Length of each wing wall (m)
    pub wing_length: f64,
    /// Average wing wall height (m)
    pub wing_height: f64,
    /// Wing wall thickness (m)
    pub wing_thickness: f64,
    /// m³
    pub stem_volume: f64,
    /// m³
    pub base_volume: f64,
    /// Both wing walls together (m³)
    pub wing_volume: f64,
}

impl Geometry {
    /// Total concrete volume (m³)
    pub fn total_volume(&self) -> f64 {
        self.stem_volume + self.base_volume + self.wing_volume
    }
}

/// Proportion an abutment of the given type.
///
/// # Errors
///
/// `InvalidInput` if `height` or `bridge_width` is not positive.
pub fn calculate(
    height: f64,
    bridge_width: f64,
    abutment_type: AbutmentType,
    criteria: &DesignCriteria,
) -> CalcResult<Geometry> {
    require_positive("height", height, "Abutment height must be positive")?;
    require_positive("bridge_width", bridge_width, "Bridge width must be positive")?;

    let base_length = bridge_width + criteria.base_length_allowance;

    let geometry = match abutment_type {
        AbutmentType::Battered => battered(height, base_length, &criteria.battered),
        AbutmentType::Cantilever => cantilever(height, base_length, &criteria.cantilever),
    };

    tracing::debug!(
        abutment_type = %abutment_type,
        height,
        base_width = geometry.base_width,
        volume = geometry.total_volume(),
        "geometry proportioned"
    );

    Ok(geometry)
}

/// Battered stem: trapezoidal section widening by the batter on both faces.
fn battered(height: f64, base_length: f64, policy: &BatteredPolicy) -> Geometry {
    let top_width = policy.top_width;
    let bottom_width = top_width + 2.0 * height * policy.batter_ratio;
    let base_width = bottom_width + policy.base_projection;
    let base_thickness = policy.base_thickness;
    let wing_height = policy.wing_height_ratio * height;

    Geometry {
        abutment_type: AbutmentType::Battered,
        height,
        stem: StemProfile::Battered {
            top_width,
            bottom_width,
            batter_ratio: policy.batter_ratio,
        },
        base_length,
        base_width,
        base_thickness,
        wing_length: policy.wing_length,
        wing_height,
        wing_thickness: policy.wing_thickness,
        stem_volume: 0.5 * (top_width + bottom_width) * height * base_length,
        base_volume: base_length * base_width * base_thickness,
        wing_volume: 2.0 * policy.wing_length * wing_height * policy.wing_thickness,
    }
}

/// Cantilever stem: uniform thickness on a heel and toe slab.
fn cantilever(height: f64, base_length: f64, policy: &CantileverPolicy) -> Geometry {
    let stem_thickness = policy.min_stem_thickness.max(height / policy.stem_height_divisor);
    let heel_length = policy.heel_ratio * height;
    let toe_length = policy.toe_ratio * height;
    let base_thickness = policy.min_base_thickness.max(height / policy.base_height_divisor);
    let base_width = stem_thickness + heel_length + toe_length;
    let wing_height = policy.wing_height_ratio * height;

    Geometry {
        abutment_type: AbutmentType::Cantilever,
        height,
        stem: StemProfile::Cantilever {
            stem_thickness,
            heel_length,
            toe_length,
        },
        base_length,
        base_width,
        base_thickness,
        wing_length: policy.wing_length,
        wing_height,
        wing_thickness: policy.wing_thickness,
        stem_volume: stem_thickness * height * base_length,
        base_volume: base_length * base_width * base_thickness,
        wing_volume: 2.0 * policy.wing_length * wing_height * policy.wing_thickness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn criteria() -> DesignCriteria {
        DesignCriteria::default()
    }

    #[test]
    fn test_battered_default_project() {
        let g = calculate(6.4, 12.5, AbutmentType::Battered, &criteria()).unwrap();

        assert_relative_eq!(g.stem.width_at_base(), 2.08, epsilon = 1e-12);
        assert_relative_eq!(g.base_length, 14.5);
        assert_relative_eq!(g.base_width, 3.08, epsilon = 1e-12);
        assert_relative_eq!(g.base_thickness, 1.5);
        assert_relative_eq!(g.stem_volume, 133.632, epsilon = 1e-9);
        assert_relative_eq!(g.base_volume, 66.99, epsilon = 1e-9);
        assert_relative_eq!(g.wing_volume, 24.576, epsilon = 1e-9);
        assert_relative_eq!(g.total_volume(), 225.198, epsilon = 1e-9);
    }

    #[test]
    fn test_cantilever_default_project() {
        let g = calculate(6.4, 12.5, AbutmentType::Cantilever, &criteria()).unwrap();

        match g.stem {
            StemProfile::Cantilever { stem_thickness, heel_length, toe_length } => {
                assert_relative_eq!(stem_thickness, 6.4 / 12.0, epsilon = 1e-12);
                assert_relative_eq!(heel_length, 3.84, epsilon = 1e-12);
                assert_relative_eq!(toe_length, 1.92, epsilon = 1e-12);
            }
            other => panic!("unexpected profile {:?}", other),
        }
        assert_relative_eq!(g.base_thickness, 0.64, epsilon = 1e-12);
        assert_relative_eq!(g.base_width, 6.4 / 12.0 + 5.76, epsilon = 1e-12);
        assert_relative_eq!(g.wing_volume, 15.68, epsilon = 1e-9);
    }

    #[test]
    fn test_cantilever_minimums_govern_for_low_abutment() {
        let g = calculate(3.0, 7.5, AbutmentType::Cantilever, &criteria()).unwrap();
        assert_relative_eq!(g.stem.width_at_base(), 0.3);
        assert_relative_eq!(g.base_thickness, 0.6);
        assert_relative_eq!(g.base_length, 9.5);
    }

    #[test]
    fn test_battered_widths_grow_with_height() {
        let low = calculate(4.0, 12.5, AbutmentType::Battered, &criteria()).unwrap();
        let high = calculate(8.0, 12.5, AbutmentType::Battered, &criteria()).unwrap();
        assert!(high.base_width > low.base_width);
        assert!(high.stem_volume > low.stem_volume);
        assert_eq!(low.base_thickness, high.base_thickness);
    }

    #[test]
    fn test_non_positive_height_rejected() {
        for h in [0.0, -1.0, f64::NAN] {
            let err = calculate(h, 12.5, AbutmentType::Battered, &criteria()).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_INPUT");
        }
    }

    #[test]
    fn test_custom_policy() {
        let mut c = criteria();
        c.battered.top_width = 1.0;
        c.battered.batter_ratio = 0.0;
        let g = calculate(5.0, 10.0, AbutmentType::Battered, &c).unwrap();
        assert_relative_eq!(g.stem.width_at_base(), 1.0);
        assert_relative_eq!(g.stem_volume, 1.0 * 5.0 * 12.0);
    }
}
