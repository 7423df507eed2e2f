//! # Design Criteria
//!
//! Every fixed constant of the design pipeline (safety thresholds, load
//! factor, cover, bar size, steel ratios, superstructure reactions, geometry
//! proportions, hydraulic coefficients) lives here as a named field instead of
//! a literal at the call site.
//!
//! Criteria load from TOML. Missing keys fall back to the defaults, so a file
//! only needs the values it overrides:
//!
//! ```rust
//! use bridge_core::criteria::DesignCriteria;
//!
//! let criteria = DesignCriteria::from_toml_str(r#"
//!     clear_cover_mm = 80.0
//!
//!     [battered]
//!     top_width = 1.0
//! "#).unwrap();
//!
//! assert_eq!(criteria.clear_cover_mm, 80.0);
//! assert_eq!(criteria.battered.top_width, 1.0);
//! assert_eq!(criteria.overturning_fos_min, 2.0);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};

/// Upper bound on footing trials per scan (max extension / step).
pub const MAX_FOOTING_TRIALS: u32 = 1000;

/// Proportions for the Type-1 battered (gravity) abutment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteredPolicy {
    /// Stem width at the top (m)
    pub top_width: f64,
    /// Horizontal batter per unit height on each face
    pub batter_ratio: f64,
    /// Base slab projection beyond the stem bottom width (m, total)
    pub base_projection: f64,
    /// Base slab thickness (m)
    pub base_thickness: f64,
    /// Length of each wing wall (m)
    pub wing_length: f64,
    /// Wing height as a fraction of abutment height
    pub wing_height_ratio: f64,
    /// Wing wall thickness (m)
    pub wing_thickness: f64,
}

impl Default for BatteredPolicy {
    fn default() -> Self {
        BatteredPolicy {
            top_width: 0.8,
            batter_ratio: 0.1,
            base_projection: 1.0,
            base_thickness: 1.5,
            wing_length: 6.0,
            wing_height_ratio: 0.8,
            wing_thickness: 0.4,
        }
    }
}

/// Proportions for the Type-2 cantilever (L-shaped) abutment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CantileverPolicy {
    /// Lower bound on stem thickness (m)
    pub min_stem_thickness: f64,
    /// Stem thickness = height / this divisor (when above the minimum)
    pub stem_height_divisor: f64,
    /// Heel length as a fraction of height
    pub heel_ratio: f64,
    /// Toe length as a fraction of height
    pub toe_ratio: f64,
    /// Lower bound on base thickness (m)
    pub min_base_thickness: f64,
    /// Base thickness = height / this divisor (when above the minimum)
    pub base_height_divisor: f64,
    /// Length of each wing wall (m)
    pub wing_length: f64,
    /// Wing height as a fraction of abutment height
    pub wing_height_ratio: f64,
    /// Wing wall thickness (m)
    pub wing_thickness: f64,
}

impl Default for CantileverPolicy {
    fn default() -> Self {
        CantileverPolicy {
            min_stem_thickness: 0.3,
            stem_height_divisor: 12.0,
            heel_ratio: 0.6,
            toe_ratio: 0.3,
            min_base_thickness: 0.6,
            base_height_divisor: 10.0,
            wing_length: 5.0,
            wing_height_ratio: 0.7,
            wing_thickness: 0.35,
        }
    }
}

/// Coefficients for the hydraulic analysis (IRC 5 / Lacey regime theory).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydraulicCriteria {
    /// Regime width W = coefficient × √Q
    pub regime_width_coefficient: f64,
    /// Normal scour dsm = coefficient × (Db²/Ksf)^(1/3)
    pub scour_coefficient: f64,
    /// Design scour = factor × normal scour
    pub design_scour_factor: f64,
    /// Minimum clearance between HFL and deck level (m)
    pub min_freeboard: f64,
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
}

impl Default for HydraulicCriteria {
    fn default() -> Self {
        HydraulicCriteria {
            regime_width_coefficient: 4.8,
            scour_coefficient: 1.34,
            design_scour_factor: 1.5,
            min_freeboard: 1.2,
            gravity: 9.81,
        }
    }
}

/// Named design constants for the abutment pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignCriteria {
    /// Minimum factor of safety against overturning
    pub overturning_fos_min: f64,
    /// Minimum factor of safety against sliding
    pub sliding_fos_min: f64,

    /// Dead load reaction from the superstructure (kN)
    pub deck_reaction_kn: f64,
    /// Live load reaction from the superstructure (kN)
    pub live_load_reaction_kn: f64,
    /// Base length = bridge width + this allowance (m)
    pub base_length_allowance: f64,

    /// Partial load factor applied to the active moment for flexure design
    pub flexure_load_factor: f64,
    /// Clear cover to reinforcement (mm)
    pub clear_cover_mm: f64,
    /// Design stress factor on fy (0.87 in IS 456)
    pub steel_stress_factor: f64,
    /// Lever arm as a fraction of effective depth
    pub lever_arm_factor: f64,
    /// Minimum steel as a percentage of the gross section
    pub min_steel_percent: f64,
    /// Main bar diameter (mm)
    pub bar_diameter_mm: f64,
    /// Area of one main bar (mm²)
    pub bar_area_mm2: f64,
    /// Design strip width (mm)
    pub strip_width_mm: f64,

    /// Steel by volume of concrete for quantity takeoff (%)
    pub steel_percent_by_volume: f64,
    /// Working space added on each side of the base for excavation (m)
    pub excavation_working_space: f64,
    /// Excavation depth beyond the base thickness (m)
    pub excavation_extra_depth: f64,

    /// Largest footing extension tried per side (m)
    pub footing_max_extension: f64,
    /// Increment between footing trials (m)
    pub footing_extension_step: f64,

    pub battered: BatteredPolicy,
    pub cantilever: CantileverPolicy,
    pub hydraulics: HydraulicCriteria,
}

impl Default for DesignCriteria {
    fn default() -> Self {
        DesignCriteria {
            overturning_fos_min: 2.0,
            sliding_fos_min: 1.5,
            deck_reaction_kn: 2500.0,
            live_load_reaction_kn: 800.0,
            base_length_allowance: 2.0,
            flexure_load_factor: 1.5,
            clear_cover_mm: 75.0,
            steel_stress_factor: 0.87,
            lever_arm_factor: 0.9,
            min_steel_percent: 0.12,
            bar_diameter_mm: 20.0,
            bar_area_mm2: 314.0,
            strip_width_mm: 1000.0,
            steel_percent_by_volume: 1.5,
            excavation_working_space: 0.5,
            excavation_extra_depth: 0.5,
            footing_max_extension: 3.0,
            footing_extension_step: 0.25,
            battered: BatteredPolicy::default(),
            cantilever: CantileverPolicy::default(),
            hydraulics: HydraulicCriteria::default(),
        }
    }
}

impl DesignCriteria {
    /// Parse criteria from TOML text and validate them.
    pub fn from_toml_str(text: &str) -> CalcResult<Self> {
        let criteria: DesignCriteria = toml::from_str(text).map_err(CalcError::serialization)?;
        criteria.validate()?;
        Ok(criteria)
    }

    /// Serialize to TOML (useful as a starting template).
    pub fn to_toml_string(&self) -> CalcResult<String> {
        toml::to_string_pretty(self).map_err(CalcError::serialization)
    }

    /// Load criteria from a TOML file.
    pub fn load(path: &Path) -> CalcResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read criteria", path.display().to_string(), e.to_string()))?;
        let criteria = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded design criteria");
        Ok(criteria)
    }

    /// Validate that every constant is usable.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("overturning_fos_min", self.overturning_fos_min, "Threshold must be positive")?;
        require_positive("sliding_fos_min", self.sliding_fos_min, "Threshold must be positive")?;
        require_non_negative("deck_reaction_kn", self.deck_reaction_kn, "Reaction cannot be negative")?;
        require_non_negative("live_load_reaction_kn", self.live_load_reaction_kn, "Reaction cannot be negative")?;
        require_non_negative("base_length_allowance", self.base_length_allowance, "Allowance cannot be negative")?;
        require_positive("flexure_load_factor", self.flexure_load_factor, "Load factor must be positive")?;
        require_non_negative("clear_cover_mm", self.clear_cover_mm, "Cover cannot be negative")?;
        require_positive("steel_stress_factor", self.steel_stress_factor, "Factor must be positive")?;
        require_positive("lever_arm_factor", self.lever_arm_factor, "Factor must be positive")?;
        require_non_negative("min_steel_percent", self.min_steel_percent, "Percentage cannot be negative")?;
        require_positive("bar_diameter_mm", self.bar_diameter_mm, "Bar diameter must be positive")?;
        require_positive("bar_area_mm2", self.bar_area_mm2, "Bar area must be positive")?;
        require_positive("strip_width_mm", self.strip_width_mm, "Strip width must be positive")?;
        require_non_negative(
            "steel_percent_by_volume",
            self.steel_percent_by_volume,
            "Percentage cannot be negative",
        )?;
        require_non_negative(
            "excavation_working_space",
            self.excavation_working_space,
            "Working space cannot be negative",
        )?;
        require_non_negative("excavation_extra_depth", self.excavation_extra_depth, "Depth cannot be negative")?;
        require_non_negative("footing_max_extension", self.footing_max_extension, "Extension cannot be negative")?;
        require_positive("footing_extension_step", self.footing_extension_step, "Step must be positive")?;
        if self.footing_max_extension / self.footing_extension_step > MAX_FOOTING_TRIALS as f64 {
            return Err(CalcError::invalid_input(
                "footing_extension_step",
                self.footing_extension_step.to_string(),
                format!("Step gives more than {} footing trials", MAX_FOOTING_TRIALS),
            ));
        }

        let b = &self.battered;
        require_positive("battered.top_width", b.top_width, "Top width must be positive")?;
        require_non_negative("battered.batter_ratio", b.batter_ratio, "Batter cannot be negative")?;
        require_non_negative("battered.base_projection", b.base_projection, "Projection cannot be negative")?;
        require_positive("battered.base_thickness", b.base_thickness, "Base thickness must be positive")?;
        require_non_negative("battered.wing_length", b.wing_length, "Wing length cannot be negative")?;
        require_non_negative("battered.wing_height_ratio", b.wing_height_ratio, "Ratio cannot be negative")?;
        require_non_negative("battered.wing_thickness", b.wing_thickness, "Wing thickness cannot be negative")?;

        let c = &self.cantilever;
        require_positive("cantilever.min_stem_thickness", c.min_stem_thickness, "Stem thickness must be positive")?;
        require_positive("cantilever.stem_height_divisor", c.stem_height_divisor, "Divisor must be positive")?;
        require_non_negative("cantilever.heel_ratio", c.heel_ratio, "Ratio cannot be negative")?;
        require_non_negative("cantilever.toe_ratio", c.toe_ratio, "Ratio cannot be negative")?;
        require_positive("cantilever.min_base_thickness", c.min_base_thickness, "Base thickness must be positive")?;
        require_positive("cantilever.base_height_divisor", c.base_height_divisor, "Divisor must be positive")?;
        require_non_negative("cantilever.wing_length", c.wing_length, "Wing length cannot be negative")?;
        require_non_negative("cantilever.wing_height_ratio", c.wing_height_ratio, "Ratio cannot be negative")?;
        require_non_negative("cantilever.wing_thickness", c.wing_thickness, "Wing thickness cannot be negative")?;

        let h = &self.hydraulics;
        require_positive("hydraulics.regime_width_coefficient", h.regime_width_coefficient, "Must be positive")?;
        require_positive("hydraulics.scour_coefficient", h.scour_coefficient, "Must be positive")?;
        require_positive("hydraulics.design_scour_factor", h.design_scour_factor, "Must be positive")?;
        require_non_negative("hydraulics.min_freeboard", h.min_freeboard, "Freeboard cannot be negative")?;
        require_positive("hydraulics.gravity", h.gravity, "Gravity must be positive")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_design_office_values() {
        let c = DesignCriteria::default();
        assert_eq!(c.overturning_fos_min, 2.0);
        assert_eq!(c.sliding_fos_min, 1.5);
        assert_eq!(c.bar_area_mm2, 314.0);
        assert_eq!(c.clear_cover_mm, 75.0);
        assert_eq!(c.deck_reaction_kn, 2500.0);
        assert_eq!(c.live_load_reaction_kn, 800.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let c = DesignCriteria::from_toml_str("").unwrap();
        assert_eq!(c, DesignCriteria::default());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let c = DesignCriteria::from_toml_str(
            "sliding_fos_min = 1.75\n[hydraulics]\nmin_freeboard = 1.5\n",
        )
        .unwrap();
        assert_eq!(c.sliding_fos_min, 1.75);
        assert_eq!(c.hydraulics.min_freeboard, 1.5);
        assert_eq!(c.hydraulics.scour_coefficient, 1.34);
        assert_eq!(c.cantilever, CantileverPolicy::default());
    }

    #[test]
    fn test_invalid_toml_values_rejected() {
        let err = DesignCriteria::from_toml_str("bar_area_mm2 = 0.0").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = DesignCriteria::from_toml_str("bar_area_mm2 = \"big\"").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_negative_wing_dimensions_rejected() {
        let err = DesignCriteria::from_toml_str("[battered]\nwing_thickness = -0.4\n").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.to_string().contains("battered.wing_thickness"));

        for toml in [
            "[battered]\nwing_height_ratio = -0.8\n",
            "[cantilever]\nwing_length = -5.0\n",
            "[cantilever]\nwing_height_ratio = -0.7\n",
            "[cantilever]\nwing_thickness = -0.35\n",
        ] {
            let err = DesignCriteria::from_toml_str(toml).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_INPUT", "{}", toml);
        }
    }

    #[test]
    fn test_footing_step_bounded_by_trial_limit() {
        let err = DesignCriteria::from_toml_str("footing_extension_step = 1e-6").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let fine = DesignCriteria::from_toml_str("footing_extension_step = 0.01").unwrap();
        assert_eq!(fine.footing_extension_step, 0.01);
    }

    #[test]
    fn test_toml_roundtrip() {
        let c = DesignCriteria::default();
        let text = c.to_toml_string().unwrap();
        assert!(text.contains("overturning_fos_min"));
        let back = DesignCriteria::from_toml_str(&text).unwrap();
        assert_eq!(c, back);
    }
}
