//! # Engineering Equations
//!
//! Pure formula functions used by the abutment and hydraulic calculations.
//! Each formula has a registry entry that the report appendix cites.
//!
//! ## Modules
//!
//! - [`earth_pressure`] - Rankine coefficients and triangular thrusts
//! - [`stability`] - Overturning, sliding and bearing checks
//! - [`flexure`] - IS 456 simplified flexural steel
//! - [`hydraulics`] - Manning, Lacey regime and afflux formulas
//! - [`registry`] - Equation metadata and tracking for PDF appendix generation
//!
//! ## Sign Conventions
//!
//! - **Vertical loads**: Positive downward
//! - **Horizontal forces**: Positive away from the backfill
//! - **Moments**: Taken about the toe of the base
//! - **Elevations**: Metres above datum
//!
//! ## References
//!
//! - IRC 5: Road Bridges, General Features of Design
//! - IRC 6: Loads and Load Combinations
//! - IRC 78: Foundations and Substructure
//! - IS 456:2000 Plain and Reinforced Concrete

pub mod earth_pressure;
pub mod flexure;
pub mod hydraulics;
pub mod registry;
pub mod stability;

pub use earth_pressure::{
    pressure_at_depth,
    rankine_active_coefficient,
    rankine_passive_coefficient,
    triangular_moment_about_base,
    triangular_resultant,
};

pub use flexure::{
    bar_count,
    bar_spacing,
    effective_depth,
    minimum_steel_area,
    required_steel_area,
};

pub use stability::{
    bearing_pressure,
    eccentricity,
    effective_width,
    kern_peak_pressure,
    overturning_factor,
    sliding_factor,
};

pub use hydraulics::{
    afflux,
    hydraulic_radius,
    lacey_scour_depth,
    manning_velocity,
    obstructed_velocity,
    regime_width,
};

pub use registry::{
    CodeReference,
    Equation,
    EquationCategory,
    EquationMetadata,
    EquationTracker,
    EquationUsage,
    Variable,
    ALL_EQUATIONS,
    abutment_design_equations,
    generate_equations_markdown,
    hydraulic_analysis_equations,
};
