//! # Earth Pressure Formulas
//!
//! Rankine lateral earth pressure for a vertical wall back, horizontal
//! backfill and a cohesionless soil.
//!
//! ## Notation
//!
//! - `φ` = angle of internal friction (radians)
//! - `γ` = soil unit weight (kN/m³)
//! - `H` = height over which pressure acts (m)
//! - `K` = lateral earth pressure coefficient (Ka or Kp)
//!
//! ## References
//!
//! - IRC 78: Foundations and Substructure, Section 710
//! - Rankine, W.J.M. (1857), On the stability of loose earth

use std::f64::consts::FRAC_PI_4;

/// Rankine active earth pressure coefficient
///
/// # Formula
/// Ka = tan²(π/4 − φ/2)
///
/// # Example
/// ```rust
/// use bridge_core::equations::earth_pressure::rankine_active_coefficient;
///
/// let ka = rankine_active_coefficient(30f64.to_radians());
/// assert!((ka - 1.0 / 3.0).abs() < 1e-12);
/// ```
#[inline]
pub fn rankine_active_coefficient(phi_rad: f64) -> f64 {
    (FRAC_PI_4 - phi_rad / 2.0).tan().powi(2)
}

/// Rankine passive earth pressure coefficient
///
/// # Formula
/// Kp = tan²(π/4 + φ/2)
///
/// Kp is the reciprocal of Ka for the same φ.
#[inline]
pub fn rankine_passive_coefficient(phi_rad: f64) -> f64 {
    (FRAC_PI_4 + phi_rad / 2.0).tan().powi(2)
}

/// Lateral pressure intensity at depth H
///
/// # Formula
/// p = K × γ × H
#[inline]
pub fn pressure_at_depth(k: f64, gamma: f64, depth: f64) -> f64 {
    k * gamma * depth
}

/// Resultant of a triangular pressure distribution
///
/// ```text
///   ┬ ╲
///   │  ╲
/// H │   ╲
///   │    ╲ ← p = KγH
///   ┴─────
/// ```
///
/// # Formula
/// P = ½ × K × γ × H²
#[inline]
pub fn triangular_resultant(k: f64, gamma: f64, height: f64) -> f64 {
    0.5 * pressure_at_depth(k, gamma, height) * height
}

/// Moment of a triangular resultant about the base
///
/// The resultant acts at the centroid, H/3 above the base.
///
/// # Formula
/// M = P × H / 3
#[inline]
pub fn triangular_moment_about_base(resultant: f64, height: f64) -> f64 {
    resultant * height / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ka_kp_at_thirty_degrees() {
        let phi = 30f64.to_radians();
        assert_relative_eq!(rankine_active_coefficient(phi), 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(rankine_passive_coefficient(phi), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reciprocal_identity() {
        for deg in [1.0, 15.0, 28.5, 30.0, 36.0, 45.0, 60.0, 75.0, 89.0] {
            let phi = f64::to_radians(deg);
            let product = rankine_active_coefficient(phi) * rankine_passive_coefficient(phi);
            assert_relative_eq!(product, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_forty_five_degrees() {
        // Ka = Kp = 1 only as φ → 0; at 45° tan(22.5°) = √2 − 1
        // so Ka = 3 − 2√2 and Kp = 3 + 2√2
        let phi = 45f64.to_radians();
        let root2 = 2f64.sqrt();
        assert_relative_eq!(rankine_active_coefficient(phi), 3.0 - 2.0 * root2, epsilon = 1e-12);
        assert_relative_eq!(rankine_passive_coefficient(phi), 3.0 + 2.0 * root2, epsilon = 1e-12);
    }

    #[test]
    fn test_triangular_resultant() {
        // Ka = 1/3, γ = 18, H = 6.4 → p = 38.4, P = 122.88, M = 262.144
        let p = triangular_resultant(1.0 / 3.0, 18.0, 6.4);
        assert_relative_eq!(p, 122.88, epsilon = 1e-9);
        assert_relative_eq!(triangular_moment_about_base(p, 6.4), 262.144, epsilon = 1e-9);
    }
}
