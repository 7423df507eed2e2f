//! # Quantity Takeoff
//!
//! Bill of quantities for one abutment: concrete, reinforcement, formwork and
//! foundation excavation.

use serde::{Deserialize, Serialize};

use super::geometry::Geometry;
use crate::criteria::DesignCriteria;
use crate::materials::STEEL_DENSITY_T_M3;
use crate::units::{Kilograms, Tonnes};

/// Quantities for a single abutment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantities {
    /// m³
    pub concrete_volume: f64,
    /// kg
    pub steel_weight: f64,
    /// m²
    pub formwork_area: f64,
    /// m³
    pub excavation_volume: f64,
}

impl Quantities {
    /// Steel in tonnes, the unit rates are quoted in.
    pub fn steel_tonnes(&self) -> f64 {
        Tonnes::from(Kilograms(self.steel_weight)).value()
    }

    /// Scale every quantity by a count of identical abutments.
    pub fn times(&self, count: u32) -> Quantities {
        let n = count as f64;
        Quantities {
            concrete_volume: self.concrete_volume * n,
            steel_weight: self.steel_weight * n,
            formwork_area: self.formwork_area * n,
            excavation_volume: self.excavation_volume * n,
        }
    }
}

/// Take off quantities from the geometry.
pub fn calculate(geometry: &Geometry, criteria: &DesignCriteria) -> Quantities {
    let h = geometry.height;
    let l = geometry.base_length;
    let b = geometry.base_width;
    let t = geometry.base_thickness;
    let w = criteria.excavation_working_space;

    let concrete_volume = geometry.total_volume();
    let steel = Kilograms::from(Tonnes(concrete_volume * criteria.steel_percent_by_volume / 100.0 * STEEL_DENSITY_T_M3));

    Quantities {
        concrete_volume,
        steel_weight: steel.value(),
        formwork_area: 2.0 * h * l + 2.0 * (l + b) * t,
        excavation_volume: (l + 2.0 * w) * (b + 2.0 * w) * (t + criteria.excavation_extra_depth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{geometry, AbutmentType};
    use approx::assert_relative_eq;

    #[test]
    fn test_battered_default_quantities() {
        let criteria = DesignCriteria::default();
        let geom = geometry::calculate(6.4, 12.5, AbutmentType::Battered, &criteria).unwrap();
        let q = calculate(&geom, &criteria);

        assert_relative_eq!(q.concrete_volume, 225.198, epsilon = 1e-9);
        assert_relative_eq!(q.steel_weight, 225.198 * 0.015 * 7850.0, epsilon = 1e-6);
        assert_relative_eq!(q.steel_tonnes(), 225.198 * 0.015 * 7.85, epsilon = 1e-9);
        assert_relative_eq!(q.formwork_area, 185.6 + 52.74, epsilon = 1e-9);
        assert_relative_eq!(q.excavation_volume, 15.5 * 4.08 * 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_times_scales_everything() {
        let criteria = DesignCriteria::default();
        let geom = geometry::calculate(5.0, 10.0, AbutmentType::Cantilever, &criteria).unwrap();
        let one = calculate(&geom, &criteria);
        let two = one.times(2);

        assert_relative_eq!(two.concrete_volume, 2.0 * one.concrete_volume);
        assert_relative_eq!(two.steel_weight, 2.0 * one.steel_weight);
        assert_relative_eq!(two.formwork_area, 2.0 * one.formwork_area);
        assert_relative_eq!(two.excavation_volume, 2.0 * one.excavation_volume);
    }
}
