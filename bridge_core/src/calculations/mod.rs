//! # Bridge Substructure Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` / `*Parameters` - Input parameters (JSON-serializable)
//! - `*Result` / derived records - Calculation results (JSON-serializable)
//! - `calculate(...) -> CalcResult<...>` - Pure calculation function
//!
//! ## Abutment Pipeline
//!
//! [`abutment::design_abutment`] runs the stages in order:
//!
//! 1. [`geometry`] - proportion stem, base and wing walls
//! 2. [`loads`] - self weight plus superstructure reactions
//! 3. [`earth_pressure`] - Rankine active and passive thrusts
//! 4. [`stability`] - overturning, sliding and bearing
//! 5. [`reinforcement`] - flexural steel for the base section
//! 6. [`quantities`] - concrete, steel, formwork and excavation
//!
//! ## Other Calculations
//!
//! - [`footing`] - trial enlargement of the base until bearing is satisfied
//! - [`hydraulics`] - waterway, velocity, afflux and scour
//! - [`estimate`] - cost of the quantities from a rate schedule
//!
//! Project files store [`CalculationItem`]s; [`CalculationItem::calculate`]
//! dispatches to the matching pipeline.

pub mod abutment;
pub mod earth_pressure;
pub mod estimate;
pub mod footing;
pub mod geometry;
pub mod hydraulics;
pub mod loads;
pub mod quantities;
pub mod reinforcement;
pub mod stability;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::criteria::DesignCriteria;
use crate::errors::{CalcError, CalcResult};

// Re-export commonly used types
pub use abutment::{
    compare_abutment_types, design_abutment, AbutmentDesign, AbutmentInput, ProjectParameters, SoilParameters,
    TypeComparison,
};
pub use earth_pressure::EarthPressures;
pub use estimate::{CostEstimate, RateSchedule};
pub use footing::{FootingDesign, FootingInput, FootingStatus};
pub use geometry::{Geometry, StemProfile};
pub use hydraulics::{BedSlope, HydraulicInput, HydraulicResult, SurveyPoint};
pub use loads::Loads;
pub use quantities::Quantities;
pub use reinforcement::ReinforcementResult;
pub use stability::StabilityResult;

/// Structural form of the abutment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbutmentType {
    /// Mass concrete stem with both faces battered
    Battered,
    /// Thin RCC stem cantilevering from a heel and toe slab
    Cantilever,
}

impl AbutmentType {
    pub const ALL: [AbutmentType; 2] = [AbutmentType::Battered, AbutmentType::Cantilever];

    pub fn display_name(&self) -> &'static str {
        match self {
            AbutmentType::Battered => "Battered",
            AbutmentType::Cantilever => "Cantilever",
        }
    }
}

impl fmt::Display for AbutmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for AbutmentType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "battered" => Ok(AbutmentType::Battered),
            "cantilever" => Ok(AbutmentType::Cantilever),
            other => Err(CalcError::invalid_input(
                "abutment_type",
                other,
                "Expected 'battered' or 'cantilever'",
            )),
        }
    }
}

/// Overall outcome of an abutment design.
///
/// An unsafe design is a normal result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DesignStatus {
    /// All stability checks pass
    DesignComplete,
    /// At least one stability check fails
    RequiresOptimization,
}

impl DesignStatus {
    pub fn from_safe(safe: bool) -> Self {
        if safe {
            DesignStatus::DesignComplete
        } else {
            DesignStatus::RequiresOptimization
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DesignStatus::DesignComplete => "DESIGN_COMPLETE",
            DesignStatus::RequiresOptimization => "REQUIRES_OPTIMIZATION",
        }
    }
}

impl fmt::Display for DesignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enum wrapper for all calculation types stored in a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    /// Abutment stability and reinforcement design
    Abutment(AbutmentInput),
    /// Waterway, afflux and scour analysis
    Hydraulic(HydraulicInput),
}

impl CalculationItem {
    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::Abutment(a) => &a.label,
            CalculationItem::Hydraulic(h) => &h.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Abutment(_) => "Abutment",
            CalculationItem::Hydraulic(_) => "Hydraulic",
        }
    }

    /// Run the calculation for this item.
    pub fn calculate(&self, criteria: &DesignCriteria) -> CalcResult<CalculationResult> {
        match self {
            CalculationItem::Abutment(input) => abutment::calculate(input, criteria).map(CalculationResult::Abutment),
            CalculationItem::Hydraulic(input) => {
                hydraulics::calculate(input, criteria).map(CalculationResult::Hydraulic)
            }
        }
    }
}

/// Output of a [`CalculationItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationResult {
    Abutment(AbutmentDesign),
    Hydraulic(HydraulicResult),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abutment_type_from_str() {
        assert_eq!("Battered".parse::<AbutmentType>().unwrap(), AbutmentType::Battered);
        assert_eq!(" cantilever ".parse::<AbutmentType>().unwrap(), AbutmentType::Cantilever);
        let err = "gravity".parse::<AbutmentType>().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_design_status_serialization() {
        let json = serde_json::to_string(&DesignStatus::RequiresOptimization).unwrap();
        assert_eq!(json, "\"REQUIRES_OPTIMIZATION\"");
        let status: DesignStatus = serde_json::from_str("\"DESIGN_COMPLETE\"").unwrap();
        assert_eq!(status, DesignStatus::DesignComplete);
        assert_eq!(DesignStatus::from_safe(false).to_string(), "REQUIRES_OPTIMIZATION");
    }

    #[test]
    fn test_calculation_item_tagging() {
        let item = CalculationItem::Abutment(AbutmentInput::default());
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"type\":\"Abutment\""));

        let back: CalculationItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back.calc_type(), "Abutment");
        assert_eq!(back.label(), item.label());
    }

    #[test]
    fn test_calculation_item_dispatch() {
        let criteria = DesignCriteria::default();
        let item = CalculationItem::Hydraulic(HydraulicInput::default());
        assert!(matches!(item.calculate(&criteria), Ok(CalculationResult::Hydraulic(_))));

        let item = CalculationItem::Abutment(AbutmentInput::default());
        match item.calculate(&criteria).unwrap() {
            CalculationResult::Abutment(d) => assert_eq!(d.abutment_type, AbutmentType::Battered),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
