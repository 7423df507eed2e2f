//! # bridge_core - Bridge Substructure Calculation Engine
//!
//! `bridge_core` is the computational heart of BridgeWorks. It designs open
//! foundation abutments to IRC/IS practice, checks the river waterway, sizes
//! footings and prices the quantities. All inputs and outputs are
//! JSON-serializable records.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Named Constants**: Every threshold and proportion lives in [`criteria::DesignCriteria`]
//!
//! ## Quick Start
//!
//! ```rust
//! use bridge_core::calculations::{design_abutment, AbutmentType, ProjectParameters, SoilParameters};
//! use bridge_core::criteria::DesignCriteria;
//! use bridge_core::materials::MaterialProperties;
//!
//! let design = design_abutment(
//!     &ProjectParameters::default(),
//!     &SoilParameters::default(),
//!     &MaterialProperties::default(),
//!     AbutmentType::Cantilever,
//!     &DesignCriteria::default(),
//! ).unwrap();
//!
//! let json = serde_json::to_string_pretty(&design).unwrap();
//! assert!(json.contains("design_status"));
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Abutment pipeline, footing, hydraulics, estimate
//! - [`equations`] - Pure formulas and the equation registry
//! - [`criteria`] - Design criteria loaded from TOML
//! - [`materials`] - Concrete and steel grades
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`project`] - Project container, metadata, and settings
//! - [`file_io`] - File operations with atomic saves and locking
//! - [`pdf`] - Typst calculation reports

pub mod calculations;
pub mod criteria;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod materials;
pub mod pdf;
pub mod project;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{design_abutment, AbutmentDesign, AbutmentType, DesignStatus};
pub use criteria::DesignCriteria;
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, save_project, FileLock};
pub use project::{Project, ProjectMetadata, ProjectSettings};
