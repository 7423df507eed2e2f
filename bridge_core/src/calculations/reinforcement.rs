//! # Flexural Reinforcement
//!
//! Main tension steel per metre strip of the base section, designed for the
//! factored earth pressure moment with the IS 456 simplified lever arm.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::calculations::{design_abutment, AbutmentType, ProjectParameters, SoilParameters};
//! use bridge_core::criteria::DesignCriteria;
//! use bridge_core::materials::MaterialProperties;
//!
//! let design = design_abutment(
//!     &ProjectParameters::default(),
//!     &SoilParameters::default(),
//!     &MaterialProperties::default(),
//!     AbutmentType::Battered,
//!     &DesignCriteria::default(),
//! ).unwrap();
//!
//! // Minimum steel governs the 1.5 m base
//! assert_eq!(design.reinforcement.bar_count, 6);
//! ```

use serde::{Deserialize, Serialize};

use super::earth_pressure::EarthPressures;
use super::geometry::Geometry;
use crate::criteria::DesignCriteria;
use crate::equations::flexure::{bar_count, bar_spacing, effective_depth, minimum_steel_area, required_steel_area};
use crate::errors::{CalcError, CalcResult};
use crate::materials::MaterialProperties;
use crate::units::{KnM, Meters, Millimeters, NMm};

/// Spacing reported when no bars are required (IS 456 maximum for slabs).
pub const MAX_BAR_SPACING_MM: f64 = 300.0;

/// Main steel per metre strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementResult {
    /// Factored moment (kN·m)
    pub design_moment: f64,
    /// Effective depth (mm)
    pub effective_depth: f64,
    /// Steel for strength (mm²)
    pub ast_required: f64,
    /// Minimum steel (mm²)
    pub ast_min: f64,
    /// Greater of required and minimum (mm²)
    pub ast_provided: f64,
    /// Bar diameter (mm)
    pub bar_diameter: f64,
    pub bar_count: u32,
    /// Centre-to-centre spacing (mm)
    pub spacing: f64,
    /// Area actually supplied by the chosen bars (mm²)
    pub ast_from_bars: f64,
}

impl ReinforcementResult {
    /// Short bar schedule text, e.g. "6 nos. 20 mm dia @ 167 mm c/c".
    pub fn schedule(&self) -> String {
        format!(
            "{} nos. {:.0} mm dia @ {:.0} mm c/c",
            self.bar_count, self.bar_diameter, self.spacing
        )
    }

    /// True when strength rather than the minimum governs.
    pub fn strength_governs(&self) -> bool {
        self.ast_required > self.ast_min
    }
}

/// Design flexural steel for the base section.
///
/// # Errors
///
/// `InvalidInput` if the cover leaves no effective depth.
pub fn calculate(
    geometry: &Geometry,
    pressures: &EarthPressures,
    material: &MaterialProperties,
    criteria: &DesignCriteria,
) -> CalcResult<ReinforcementResult> {
    let design_moment = KnM(pressures.active_moment * criteria.flexure_load_factor);

    let overall_depth = Millimeters::from(Meters(geometry.base_thickness));
    let d = Millimeters(effective_depth(overall_depth.value(), criteria.clear_cover_mm));
    if d.value() <= 0.0 {
        return Err(CalcError::invalid_input(
            "clear_cover_mm",
            criteria.clear_cover_mm.to_string(),
            format!("Cover exceeds section depth of {:.0} mm", overall_depth.value()),
        ));
    }

    let moment = NMm::from(design_moment);
    let ast_required = required_steel_area(
        moment.value(),
        material.fy,
        d.value(),
        criteria.steel_stress_factor,
        criteria.lever_arm_factor,
    );
    let ast_min = minimum_steel_area(criteria.min_steel_percent, criteria.strip_width_mm, overall_depth.value());
    let ast_provided = ast_required.max(ast_min);

    let bars = bar_count(ast_provided, criteria.bar_area_mm2);
    let spacing = if bars == 0 {
        MAX_BAR_SPACING_MM
    } else {
        bar_spacing(criteria.strip_width_mm, bars)
    };

    let result = ReinforcementResult {
        design_moment: design_moment.value(),
        effective_depth: d.value(),
        ast_required,
        ast_min,
        ast_provided,
        bar_diameter: criteria.bar_diameter_mm,
        bar_count: bars,
        spacing,
        ast_from_bars: bars as f64 * criteria.bar_area_mm2,
    };

    tracing::debug!(
        ast_required = result.ast_required,
        ast_provided = result.ast_provided,
        bars = result.bar_count,
        "reinforcement designed"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{abutment::SoilParameters, earth_pressure, geometry, AbutmentType};
    use approx::assert_relative_eq;

    fn battered_inputs(criteria: &DesignCriteria) -> (Geometry, EarthPressures) {
        let geom = geometry::calculate(6.4, 12.5, AbutmentType::Battered, criteria).unwrap();
        let pressures = earth_pressure::calculate(&SoilParameters::default(), geom.height, geom.base_thickness).unwrap();
        (geom, pressures)
    }

    #[test]
    fn test_battered_default_minimum_governs() {
        let criteria = DesignCriteria::default();
        let (geom, pressures) = battered_inputs(&criteria);
        let r = calculate(&geom, &pressures, &MaterialProperties::default(), &criteria).unwrap();

        assert_relative_eq!(r.design_moment, 393.216, epsilon = 1e-9);
        assert_relative_eq!(r.effective_depth, 1425.0);
        assert_relative_eq!(r.ast_required, 393.216e6 / (0.87 * 415.0 * 0.9 * 1425.0), epsilon = 1e-6);
        assert!((r.ast_required - 849.2).abs() < 0.1);
        assert_relative_eq!(r.ast_min, 1800.0, epsilon = 1e-9);
        assert_relative_eq!(r.ast_provided, r.ast_min);
        assert!(!r.strength_governs());
        assert_eq!(r.bar_count, 6);
        assert_relative_eq!(r.spacing, 1000.0 / 6.0, epsilon = 1e-9);
        assert_relative_eq!(r.ast_from_bars, 1884.0);
        assert_eq!(r.schedule(), "6 nos. 20 mm dia @ 167 mm c/c");
    }

    #[test]
    fn test_provided_is_max_of_required_and_min() {
        let mut criteria = DesignCriteria::default();
        criteria.min_steel_percent = 0.0;
        let (geom, pressures) = battered_inputs(&criteria);
        let r = calculate(&geom, &pressures, &MaterialProperties::default(), &criteria).unwrap();

        assert!(r.strength_governs());
        assert_relative_eq!(r.ast_provided, r.ast_required);
        // ceil(849.2 / 314) = 3
        assert_eq!(r.bar_count, 3);
        assert!(r.ast_from_bars >= r.ast_provided);
    }

    #[test]
    fn test_higher_grade_steel_needs_less_area() {
        let mut criteria = DesignCriteria::default();
        criteria.min_steel_percent = 0.0;
        let (geom, pressures) = battered_inputs(&criteria);
        let fe415 = calculate(&geom, &pressures, &MaterialProperties::default(), &criteria).unwrap();
        let fe500 = calculate(
            &geom,
            &pressures,
            &MaterialProperties { fy: 500.0, ..MaterialProperties::default() },
            &criteria,
        )
        .unwrap();
        assert_relative_eq!(fe500.ast_required * 500.0, fe415.ast_required * 415.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cover_exceeding_section_rejected() {
        let mut criteria = DesignCriteria::default();
        criteria.clear_cover_mm = 1500.0;
        let (geom, pressures) = battered_inputs(&criteria);
        let err = calculate(&geom, &pressures, &MaterialProperties::default(), &criteria).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
