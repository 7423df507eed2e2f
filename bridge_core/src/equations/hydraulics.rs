//! # Hydraulic Formulas
//!
//! Open-channel flow and regime formulas used to size the waterway of a
//! river bridge.
//!
//! ## References
//!
//! - IRC 5: Standard Specifications and Code of Practice for Road Bridges,
//!   Section I (waterway, scour, freeboard)
//! - IRC SP 13: Guidelines for the Design of Small Bridges and Culverts
//! - Lacey, G. (1930), Stable channels in alluvium

/// Hydraulic radius
///
/// # Formula
/// R = A / P
#[inline]
pub fn hydraulic_radius(area: f64, wetted_perimeter: f64) -> f64 {
    area / wetted_perimeter
}

/// Mean velocity by Manning's equation (SI)
///
/// # Formula
/// V = (1/n) × R^(2/3) × S^(1/2)
///
/// # Example
/// ```rust
/// use bridge_core::equations::hydraulics::manning_velocity;
///
/// // R = 1.0 m, S = 1/900, n = 0.03 → V = (1/0.03) × 1 × (1/30) = 1.111 m/s
/// let v = manning_velocity(1.0, 1.0 / 900.0, 0.03);
/// assert!((v - 1.1111).abs() < 1e-4);
/// ```
#[inline]
pub fn manning_velocity(hydraulic_radius: f64, slope: f64, manning_n: f64) -> f64 {
    (1.0 / manning_n) * hydraulic_radius.powf(2.0 / 3.0) * slope.sqrt()
}

/// Lacey regime surface width
///
/// # Formula
/// W = C × √Q   (C = 4.8 in IRC 5)
#[inline]
pub fn regime_width(discharge: f64, coefficient: f64) -> f64 {
    coefficient * discharge.sqrt()
}

/// Lacey normal scour depth below HFL
///
/// # Formula
/// dsm = C × (Db² / Ksf)^(1/3)   (C = 1.34)
#[inline]
pub fn lacey_scour_depth(discharge_intensity: f64, silt_factor: f64, coefficient: f64) -> f64 {
    coefficient * (discharge_intensity.powi(2) / silt_factor).cbrt()
}

/// Afflux caused by a constricted waterway
///
/// # Formula
/// h = (Q/W_eff)² / (2g) × (1/r² − 1),  r = W_eff / W
///
/// Returns zero when the opening is not constricted (r ≥ 1).
#[inline]
pub fn afflux(discharge: f64, natural_width: f64, effective_waterway: f64, gravity: f64) -> f64 {
    let constriction = effective_waterway / natural_width;
    if constriction >= 1.0 {
        return 0.0;
    }
    let velocity_head = (discharge / effective_waterway).powi(2) / (2.0 * gravity);
    (velocity_head * (1.0 / constriction.powi(2) - 1.0)).max(0.0)
}

/// Velocity normal to a skewed pier
///
/// # Formula
/// V' = V / cos θ
#[inline]
pub fn obstructed_velocity(velocity: f64, skew_rad: f64) -> f64 {
    velocity / skew_rad.cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_regime_width() {
        // 4.8 × √900 = 144
        assert_relative_eq!(regime_width(900.0, 4.8), 144.0, epsilon = 1e-9);
    }

    #[test]
    fn test_scour_depth() {
        // Db = 8, Ksf = 1 → 1.34 × 64^(1/3) = 5.36
        assert_relative_eq!(lacey_scour_depth(8.0, 1.0, 1.34), 5.36, epsilon = 1e-9);
    }

    #[test]
    fn test_afflux_unconstricted_is_zero() {
        assert_eq!(afflux(500.0, 100.0, 100.0, 9.81), 0.0);
        assert_eq!(afflux(500.0, 100.0, 120.0, 9.81), 0.0);
    }

    #[test]
    fn test_afflux_constricted() {
        // q = 500/80 = 6.25, vh = 39.0625/19.62, r = 0.8 → × 0.5625
        let h = afflux(500.0, 100.0, 80.0, 9.81);
        assert_relative_eq!(h, 39.0625 / 19.62 * 0.5625, epsilon = 1e-12);
    }

    #[test]
    fn test_obstructed_velocity_square_crossing() {
        assert_relative_eq!(obstructed_velocity(3.5, 0.0), 3.5);
        assert_relative_eq!(obstructed_velocity(3.5, 60f64.to_radians()), 7.0, epsilon = 1e-9);
    }
}
