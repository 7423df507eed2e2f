//! # Vertical Loads
//!
//! Self weight of the abutment concrete plus the superstructure reactions
//! delivered through the bearings.

use serde::{Deserialize, Serialize};

use super::geometry::Geometry;
use crate::criteria::DesignCriteria;
use crate::materials::MaterialProperties;

/// Vertical load summary (kN).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loads {
    pub stem_weight: f64,
    pub base_weight: f64,
    pub wing_weight: f64,
    /// Sum of the three self weights
    pub total_dead_load: f64,
    /// Superstructure dead load reaction
    pub deck_reaction: f64,
    /// Live load reaction
    pub live_load_reaction: f64,
    /// Dead load plus both reactions
    pub total_vertical_load: f64,
}

/// Aggregate vertical loads from the proportioned geometry.
pub fn calculate(geometry: &Geometry, material: &MaterialProperties, criteria: &DesignCriteria) -> Loads {
    let density = material.concrete_density;

    let stem_weight = geometry.stem_volume * density;
    let base_weight = geometry.base_volume * density;
    let wing_weight = geometry.wing_volume * density;
    let total_dead_load = stem_weight + base_weight + wing_weight;

    let deck_reaction = criteria.deck_reaction_kn;
    let live_load_reaction = criteria.live_load_reaction_kn;

    let loads = Loads {
        stem_weight,
        base_weight,
        wing_weight,
        total_dead_load,
        deck_reaction,
        live_load_reaction,
        total_vertical_load: total_dead_load + deck_reaction + live_load_reaction,
    };

    tracing::debug!(
        dead_load = loads.total_dead_load,
        vertical = loads.total_vertical_load,
        "vertical loads aggregated"
    );

    loads
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{geometry, AbutmentType};
    use approx::assert_relative_eq;

    #[test]
    fn test_battered_default_loads() {
        let criteria = DesignCriteria::default();
        let geom = geometry::calculate(6.4, 12.5, AbutmentType::Battered, &criteria).unwrap();
        let loads = calculate(&geom, &MaterialProperties::default(), &criteria);

        assert_relative_eq!(loads.stem_weight, 133.632 * 24.0, epsilon = 1e-9);
        assert_relative_eq!(loads.total_dead_load, 5404.752, epsilon = 1e-9);
        assert_relative_eq!(loads.total_vertical_load, 8704.752, epsilon = 1e-9);
    }

    #[test]
    fn test_reactions_come_from_criteria() {
        let mut criteria = DesignCriteria::default();
        criteria.deck_reaction_kn = 1000.0;
        criteria.live_load_reaction_kn = 0.0;
        let geom = geometry::calculate(5.0, 10.0, AbutmentType::Cantilever, &criteria).unwrap();
        let loads = calculate(&geom, &MaterialProperties::default(), &criteria);

        assert_relative_eq!(loads.total_vertical_load, loads.total_dead_load + 1000.0);
        assert_eq!(loads.live_load_reaction, 0.0);
    }

    #[test]
    fn test_dead_load_scales_with_density() {
        let criteria = DesignCriteria::default();
        let geom = geometry::calculate(6.4, 12.5, AbutmentType::Battered, &criteria).unwrap();
        let mut light = MaterialProperties::default();
        light.concrete_density = 12.0;

        let heavy = calculate(&geom, &MaterialProperties::default(), &criteria);
        let light = calculate(&geom, &light, &criteria);
        assert_relative_eq!(heavy.total_dead_load, 2.0 * light.total_dead_load, epsilon = 1e-9);
    }
}
