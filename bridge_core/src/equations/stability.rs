//! # Stability Formulas
//!
//! Rigid-body checks for a retaining structure resting on soil:
//! overturning, sliding and bearing.
//!
//! ## Sign Conventions
//!
//! - Vertical loads positive downward
//! - Horizontal forces positive toward the river (away from the fill)
//! - Moments taken about the toe
//!
//! ## References
//!
//! - IRC 78, Clause 706 (factors of safety for foundations)

/// Factor of safety against overturning
///
/// # Formula
/// FOS = ΣMr / ΣMo
#[inline]
pub fn overturning_factor(restoring_moment: f64, overturning_moment: f64) -> f64 {
    restoring_moment / overturning_moment
}

/// Factor of safety against sliding
///
/// # Formula
/// FOS = (μ × ΣV + Pp) / ΣH
#[inline]
pub fn sliding_factor(friction_resistance: f64, passive_force: f64, net_horizontal: f64) -> f64 {
    (friction_resistance + passive_force) / net_horizontal
}

/// Eccentricity of the resultant relative to the restoring moment
///
/// # Formula
/// e = (Mo − Mr) / ΣV
#[inline]
pub fn eccentricity(overturning_moment: f64, restoring_moment: f64, total_vertical: f64) -> f64 {
    (overturning_moment - restoring_moment) / total_vertical
}

/// Effective base width for a uniform (Meyerhof) bearing distribution
///
/// # Formula
/// B' = B − 2|e|
#[inline]
pub fn effective_width(base_width: f64, eccentricity: f64) -> f64 {
    base_width - 2.0 * eccentricity.abs()
}

/// Uniform bearing pressure over the effective area
///
/// # Formula
/// q = ΣV / (L × B')
#[inline]
pub fn bearing_pressure(total_vertical: f64, base_length: f64, effective_width: f64) -> f64 {
    total_vertical / (base_length * effective_width)
}

/// Peak base pressure for a resultant inside the middle third
///
/// # Formula
/// σmax = V / (L × B) × (1 + 6e / L)
#[inline]
pub fn kern_peak_pressure(vertical: f64, length: f64, width: f64, eccentricity: f64) -> f64 {
    vertical / (length * width) * (1.0 + 6.0 * eccentricity / length)
}
