//! # Flexural Reinforcement Formulas
//!
//! Simplified limit-state design of a singly reinforced rectangular section
//! per IS 456. The lever arm is taken as a fixed fraction of the effective
//! depth rather than solved from the stress block.
//!
//! ## Notation
//!
//! - `Mu` = factored design moment (N·mm)
//! - `fy` = characteristic yield strength of steel (N/mm²)
//! - `d` = effective depth (mm)
//! - `z` = lever arm (mm), taken as `j × d`
//! - `Ast` = area of tension steel (mm²)
//!
//! ## References
//!
//! - IS 456:2000 Annex G (limit state of collapse, flexure)
//! - IS 456:2000 Clause 26.5.2.1 (minimum reinforcement in slabs)

/// Effective depth of a section from its overall depth and cover
///
/// # Formula
/// d = D − cover
#[inline]
pub fn effective_depth(overall_depth_mm: f64, cover_mm: f64) -> f64 {
    overall_depth_mm - cover_mm
}

/// Tension steel required for a moment with an assumed lever arm
///
/// # Formula
/// Ast = Mu / (k × fy × j × d)
///
/// with k = 0.87 and j = 0.9 in the usual simplification.
///
/// # Example
/// ```rust
/// use bridge_core::equations::flexure::required_steel_area;
///
/// // 393.216 kN·m on a 1425 mm effective depth with Fe415
/// let ast = required_steel_area(393.216e6, 415.0, 1425.0, 0.87, 0.9);
/// assert!((ast - 849.2).abs() < 0.1);
/// ```
#[inline]
pub fn required_steel_area(moment_nmm: f64, fy: f64, d_mm: f64, stress_factor: f64, lever_arm_factor: f64) -> f64 {
    moment_nmm / (stress_factor * fy * lever_arm_factor * d_mm)
}

/// Minimum steel as a percentage of the gross section
///
/// # Formula
/// Ast,min = (p / 100) × b × D
#[inline]
pub fn minimum_steel_area(percent: f64, width_mm: f64, overall_depth_mm: f64) -> f64 {
    percent / 100.0 * width_mm * overall_depth_mm
}

/// Number of bars needed to supply an area
///
/// # Formula
/// n = ⌈Ast / a_bar⌉
#[inline]
pub fn bar_count(area_mm2: f64, bar_area_mm2: f64) -> u32 {
    (area_mm2 / bar_area_mm2).ceil().max(0.0) as u32
}

/// Centre-to-centre bar spacing across a design strip
///
/// # Formula
/// s = b / n
#[inline]
pub fn bar_spacing(strip_width_mm: f64, bars: u32) -> f64 {
    strip_width_mm / bars as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_effective_depth() {
        assert_eq!(effective_depth(1500.0, 75.0), 1425.0);
    }

    #[test]
    fn test_minimum_steel_for_1500_slab() {
        // 0.12% × 1000 × 1500 = 1800 mm²
        assert_relative_eq!(minimum_steel_area(0.12, 1000.0, 1500.0), 1800.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bar_count_rounds_up() {
        assert_eq!(bar_count(1800.0, 314.0), 6);
        assert_eq!(bar_count(1884.0, 314.0), 6);
        assert_eq!(bar_count(1884.1, 314.0), 7);
    }

    #[test]
    fn test_spacing() {
        assert_relative_eq!(bar_spacing(1000.0, 6), 166.666_666, epsilon = 1e-5);
    }
}
