//! # Earth Pressure on the Abutment
//!
//! Rankine active thrust from the backfill over the full abutment height and
//! passive resistance in front of the base slab.
//!
//! ## Assumptions
//!
//! - Cohesionless backfill, horizontal surface, no surcharge
//! - Passive resistance acts over the base thickness only
//! - Net horizontal force is active less passive and is not clamped

use serde::{Deserialize, Serialize};

use super::abutment::SoilParameters;
use crate::equations::earth_pressure::{
    pressure_at_depth, rankine_active_coefficient, rankine_passive_coefficient, triangular_moment_about_base,
    triangular_resultant,
};
use crate::errors::{CalcError, CalcResult};

/// Earth pressure coefficients, thrusts and moments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthPressures {
    /// Rankine active coefficient
    pub ka: f64,
    /// Rankine passive coefficient
    pub kp: f64,
    /// Active pressure intensity at the base (kN/m²)
    pub active_pressure_at_base: f64,
    /// Active thrust (kN)
    pub active_force: f64,
    /// Moment of active thrust about the base (kN·m)
    pub active_moment: f64,
    /// Passive resistance over the base thickness (kN)
    pub passive_force: f64,
    /// Active less passive (kN); may be zero or negative
    pub net_horizontal_force: f64,
}

/// Rankine coefficients `(Ka, Kp)` for a friction angle in degrees.
///
/// # Errors
///
/// `DomainError` unless `0 < φ < 90`.
///
/// # Example
///
/// ```rust
/// use bridge_core::calculations::earth_pressure::rankine_coefficients;
///
/// let (ka, kp) = rankine_coefficients(30.0).unwrap();
/// assert!((ka - 1.0 / 3.0).abs() < 1e-12);
/// assert!((kp - 3.0).abs() < 1e-12);
/// assert!(rankine_coefficients(90.0).is_err());
/// ```
pub fn rankine_coefficients(friction_angle_deg: f64) -> CalcResult<(f64, f64)> {
    if !(friction_angle_deg > 0.0 && friction_angle_deg < 90.0) {
        return Err(CalcError::domain_error(
            "friction_angle",
            friction_angle_deg.to_string(),
            "Friction angle must lie strictly between 0° and 90°",
        ));
    }
    let phi = friction_angle_deg.to_radians();
    Ok((rankine_active_coefficient(phi), rankine_passive_coefficient(phi)))
}

/// Calculate active and passive pressures for an abutment.
///
/// # Arguments
///
/// * `soil` - Backfill and foundation soil
/// * `height` - Retained height (m)
/// * `base_thickness` - Embedment providing passive resistance (m)
pub fn calculate(soil: &SoilParameters, height: f64, base_thickness: f64) -> CalcResult<EarthPressures> {
    let (ka, kp) = rankine_coefficients(soil.friction_angle)?;
    let gamma = soil.unit_weight;

    let active_pressure_at_base = pressure_at_depth(ka, gamma, height);
    let active_force = triangular_resultant(ka, gamma, height);
    let active_moment = triangular_moment_about_base(active_force, height);
    let passive_force = triangular_resultant(kp, gamma, base_thickness);

    let pressures = EarthPressures {
        ka,
        kp,
        active_pressure_at_base,
        active_force,
        active_moment,
        passive_force,
        net_horizontal_force: active_force - passive_force,
    };

    tracing::debug!(
        ka,
        kp,
        active_force,
        passive_force,
        "earth pressures computed"
    );

    Ok(pressures)
}
