//! # Stability Checks
//!
//! Overturning, sliding and bearing checks for an abutment on an open
//! foundation.
//!
//! ## Method
//!
//! - Restoring moment takes the total vertical load at mid-width of the base.
//! - Overturning moment is the active earth pressure moment.
//! - Bearing uses a uniform pressure over the effective width `B − 2|e|`.
//!
//! Thresholds (2.0 overturning, 1.5 sliding) come from [`DesignCriteria`].

use serde::{Deserialize, Serialize};

use super::abutment::SoilParameters;
use super::earth_pressure::EarthPressures;
use super::geometry::Geometry;
use super::loads::Loads;
use crate::criteria::DesignCriteria;
use crate::equations::stability::{
    bearing_pressure, eccentricity, effective_width, overturning_factor, sliding_factor,
};
use crate::errors::{CalcError, CalcResult};

/// Results of the three stability checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityResult {
    /// ΣV × B/2 (kN·m)
    pub restoring_moment: f64,
    /// Active earth pressure moment (kN·m)
    pub overturning_moment: f64,
    pub overturning_factor: f64,
    pub overturning_safe: bool,
    pub sliding_factor: f64,
    pub sliding_safe: bool,
    /// (Mo − Mr)/ΣV (m)
    pub eccentricity: f64,
    /// B − 2|e| (m)
    pub effective_width: f64,
    /// Uniform pressure on the effective area (kN/m²)
    pub bearing_pressure: f64,
    /// Safe bearing capacity it is checked against (kN/m²)
    pub bearing_capacity: f64,
    pub bearing_safe: bool,
    /// All three checks pass
    pub overall_safe: bool,
}

impl StabilityResult {
    /// Names of the checks that failed, in check order.
    pub fn failed_checks(&self) -> Vec<&'static str> {
        let mut failed = Vec::new();
        if !self.overturning_safe {
            failed.push("overturning");
        }
        if !self.sliding_safe {
            failed.push("sliding");
        }
        if !self.bearing_safe {
            failed.push("bearing");
        }
        failed
    }
}

/// Run the overturning, sliding and bearing checks.
///
/// # Errors
///
/// - `DomainError` if the net horizontal force is zero or negative, since the
///   sliding factor is then meaningless.
/// - `DomainError` if the resultant falls outside the base (effective width
///   not positive).
pub fn calculate(
    geometry: &Geometry,
    loads: &Loads,
    pressures: &EarthPressures,
    soil: &SoilParameters,
    criteria: &DesignCriteria,
) -> CalcResult<StabilityResult> {
    let vertical = loads.total_vertical_load;
    if vertical <= 0.0 {
        return Err(CalcError::domain_error(
            "total_vertical_load",
            vertical.to_string(),
            "Total vertical load must be positive",
        ));
    }

    let restoring_moment = vertical * geometry.base_width / 2.0;
    let overturning_moment = pressures.active_moment;
    let overturning = overturning_factor(restoring_moment, overturning_moment);

    let net_horizontal = pressures.net_horizontal_force;
    if net_horizontal <= 0.0 {
        return Err(CalcError::domain_error(
            "net_horizontal_force",
            net_horizontal.to_string(),
            "Passive resistance equals or exceeds active thrust; sliding factor is undefined",
        ));
    }
    let sliding = sliding_factor(vertical * soil.friction_coefficient, pressures.passive_force, net_horizontal);

    let e = eccentricity(overturning_moment, restoring_moment, vertical);
    let b_eff = effective_width(geometry.base_width, e);
    if b_eff <= 0.0 {
        return Err(CalcError::domain_error(
            "effective_width",
            b_eff.to_string(),
            "Resultant lies outside the base",
        ));
    }
    let pressure = bearing_pressure(vertical, geometry.base_length, b_eff);

    let overturning_safe = overturning >= criteria.overturning_fos_min;
    let sliding_safe = sliding >= criteria.sliding_fos_min;
    let bearing_safe = pressure <= soil.bearing_capacity;

    let result = StabilityResult {
        restoring_moment,
        overturning_moment,
        overturning_factor: overturning,
        overturning_safe,
        sliding_factor: sliding,
        sliding_safe,
        eccentricity: e,
        effective_width: b_eff,
        bearing_pressure: pressure,
        bearing_capacity: soil.bearing_capacity,
        bearing_safe,
        overall_safe: overturning_safe && sliding_safe && bearing_safe,
    };

    tracing::debug!(
        overturning = result.overturning_factor,
        sliding = result.sliding_factor,
        bearing = result.bearing_pressure,
        safe = result.overall_safe,
        "stability checked"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{earth_pressure, geometry, loads, AbutmentType};
    use crate::materials::MaterialProperties;
    use approx::assert_relative_eq;

    fn run(abutment_type: AbutmentType, soil: &SoilParameters) -> CalcResult<StabilityResult> {
        let criteria = DesignCriteria::default();
        let geom = geometry::calculate(6.4, 12.5, abutment_type, &criteria)?;
        let loads = loads::calculate(&geom, &MaterialProperties::default(), &criteria);
        let pressures = earth_pressure::calculate(soil, geom.height, geom.base_thickness)?;
        calculate(&geom, &loads, &pressures, soil, &criteria)
    }

    #[test]
    fn test_battered_default_values() {
        let s = run(AbutmentType::Battered, &SoilParameters::default()).unwrap();
        let v = 8704.752;

        assert_relative_eq!(s.restoring_moment, v * 3.08 / 2.0, epsilon = 1e-6);
        assert_relative_eq!(s.overturning_moment, 262.144, epsilon = 1e-9);
        assert_relative_eq!(s.overturning_factor, v * 1.54 / 262.144, epsilon = 1e-9);
        assert!(s.overturning_safe);
        assert_relative_eq!(s.sliding_factor, (v * 0.6 + 60.75) / 62.13, epsilon = 1e-9);
        assert!(s.sliding_safe);
        assert_relative_eq!(s.eccentricity, (262.144 - v * 1.54) / v, epsilon = 1e-9);
        // B − 2|e| reduces to 2·Mo/V
        assert_relative_eq!(s.effective_width, 2.0 * 262.144 / v, epsilon = 1e-9);
        assert!(s.bearing_pressure > 450.0);
        assert!(!s.bearing_safe);
        assert!(!s.overall_safe);
        assert_eq!(s.failed_checks(), vec!["bearing"]);
    }

    #[test]
    fn test_cantilever_default_bearing_fails() {
        let s = run(AbutmentType::Cantilever, &SoilParameters::default()).unwrap();
        assert!(s.overturning_safe);
        assert!(s.sliding_safe);
        assert!(!s.bearing_safe);
        assert!(s.bearing_pressure > 5000.0 && s.bearing_pressure < 5300.0);
    }

    #[test]
    fn test_overall_is_and_of_checks() {
        let soil = SoilParameters {
            bearing_capacity: 20_000.0,
            ..SoilParameters::default()
        };
        let s = run(AbutmentType::Battered, &soil).unwrap();
        assert!(s.bearing_safe);
        assert!(s.overall_safe);
        assert!(s.failed_checks().is_empty());
    }

    #[test]
    fn test_low_friction_fails_sliding() {
        let soil = SoilParameters {
            friction_coefficient: 0.001,
            ..SoilParameters::default()
        };
        let s = run(AbutmentType::Battered, &soil).unwrap();
        // (8704.752 × 0.001 + 60.75) / 62.13 ≈ 1.118
        assert!(!s.sliding_safe);
        assert!(!s.overall_safe);
    }

    #[test]
    fn test_non_positive_net_horizontal_is_domain_error() {
        let criteria = DesignCriteria::default();
        let soil = SoilParameters::default();
        let geom = geometry::calculate(2.0, 12.5, AbutmentType::Battered, &criteria).unwrap();
        let loads = loads::calculate(&geom, &MaterialProperties::default(), &criteria);
        // H = 2.0, t = 1.5: active 12.0 < passive 60.75
        let pressures = earth_pressure::calculate(&soil, geom.height, geom.base_thickness).unwrap();
        assert!(pressures.net_horizontal_force < 0.0);

        let err = calculate(&geom, &loads, &pressures, &soil, &criteria).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
    }
}
