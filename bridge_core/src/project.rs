//! # Project Data Structures
//!
//! The `Project` struct is the root container for one bridge's calculations.
//! Projects serialize to `.bwp` (BridgeWorks project) files as human-readable
//! JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (schema version, engineer, job info, timestamps)
//! ├── settings: ProjectSettings (design criteria, rate schedule)
//! └── items: HashMap<Uuid, CalculationItem> (abutments, hydraulic sections)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::calculations::{AbutmentInput, CalculationItem};
//! use bridge_core::project::Project;
//!
//! let mut project = Project::new("R. Sharma", "BR-0425", "PWD Udaipur");
//! project.add_item(CalculationItem::Abutment(AbutmentInput::default()));
//!
//! let results = project.run_all();
//! assert_eq!(results.len(), 1);
//! assert!(results[0].result.is_ok());
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::estimate::DEFAULT_ABUTMENT_COUNT;
use crate::calculations::{CalculationItem, CalculationResult, RateSchedule};
use crate::criteria::DesignCriteria;
use crate::errors::CalcResult;

/// Current schema version for .bwp files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// File extension for project files
pub const PROJECT_EXTENSION: &str = "bwp";

/// Root project container.
///
/// Items are stored in a flat UUID-keyed map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub meta: ProjectMetadata,

    pub settings: ProjectSettings,

    /// All calculation items, keyed by UUID
    pub items: HashMap<Uuid, CalculationItem>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Arguments
    ///
    /// * `engineer` - Name of the responsible engineer
    /// * `job_id` - Job number (e.g., "BR-0425")
    /// * `client` - Client or owning authority
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                bridge_name: String::new(),
                created: now,
                modified: now,
            },
            settings: ProjectSettings::default(),
            items: HashMap::new(),
        }
    }

    /// Add a calculation item and return its new UUID.
    pub fn add_item(&mut self, item: CalculationItem) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(id, item);
        self.touch();
        id
    }

    /// Remove a calculation item by UUID.
    pub fn remove_item(&mut self, id: &Uuid) -> Option<CalculationItem> {
        let item = self.items.remove(id);
        if item.is_some() {
            self.touch();
        }
        item
    }

    pub fn get_item(&self, id: &Uuid) -> Option<&CalculationItem> {
        self.items.get(id)
    }

    /// Mutable access to an item. Marks the project as modified when found.
    pub fn get_item_mut(&mut self, id: &Uuid) -> Option<&mut CalculationItem> {
        if self.items.contains_key(id) {
            self.meta.modified = Utc::now();
            self.items.get_mut(id)
        } else {
            None
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Items ordered by label, then id, for stable listings.
    pub fn sorted_items(&self) -> Vec<(&Uuid, &CalculationItem)> {
        let mut items: Vec<_> = self.items.iter().collect();
        items.sort_by(|a, b| a.1.label().cmp(b.1.label()).then(a.0.cmp(b.0)));
        items
    }

    /// Run every item with the project's design criteria.
    ///
    /// A failing item does not stop the others.
    pub fn run_all(&self) -> Vec<ItemOutcome> {
        self.sorted_items()
            .into_iter()
            .map(|(id, item)| {
                let result = item.calculate(&self.settings.criteria);
                if let Err(e) = &result {
                    tracing::warn!(id = %id, label = item.label(), error = %e, "item failed");
                }
                ItemOutcome {
                    id: *id,
                    label: item.label().to_string(),
                    calc_type: item.calc_type(),
                    result,
                }
            })
            .collect()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Result of running one project item.
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    pub id: Uuid,
    pub label: String,
    pub calc_type: &'static str,
    pub result: CalcResult<CalculationResult>,
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job number
    pub job_id: String,

    /// Client or owning authority
    pub client: String,

    /// Bridge name or location, shown on reports
    #[serde(default)]
    pub bridge_name: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Settings shared by every item in the project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Governing design code, shown on reports
    pub code: String,

    /// Thresholds, factors and proportions
    #[serde(default)]
    pub criteria: DesignCriteria,

    /// Unit rates for the cost estimate
    #[serde(default)]
    pub rates: RateSchedule,

    /// Number of identical abutments priced in the estimate
    #[serde(default = "default_abutment_count")]
    pub abutment_count: u32,
}

fn default_abutment_count() -> u32 {
    DEFAULT_ABUTMENT_COUNT
}

impl Default for ProjectSettings {
    fn default() -> Self {
        ProjectSettings {
            code: "IRC 78:2014 / IS 456:2000".to_string(),
            criteria: DesignCriteria::default(),
            rates: RateSchedule::default(),
            abutment_count: DEFAULT_ABUTMENT_COUNT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{AbutmentInput, AbutmentType, HydraulicInput};

    #[test]
    fn test_project_creation() {
        let project = Project::new("R. Sharma", "BR-0425", "PWD Udaipur");
        assert_eq!(project.meta.engineer, "R. Sharma");
        assert_eq!(project.meta.job_id, "BR-0425");
        assert_eq!(project.meta.client, "PWD Udaipur");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
        assert_eq!(project.settings.abutment_count, 2);
    }

    #[test]
    fn test_project_serialization() {
        let mut project = Project::new("A. Rao", "BR-0042", "NHAI");
        project.add_item(CalculationItem::Hydraulic(HydraulicInput::default()));
        let json = serde_json::to_string_pretty(&project).unwrap();

        assert!(json.contains("A. Rao"));
        assert!(json.contains("BR-0042"));
        assert!(json.contains("\"type\": \"Hydraulic\""));
        assert!(json.contains("1 in 975"));

        let roundtrip: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.meta.engineer, "A. Rao");
        assert_eq!(roundtrip.item_count(), 1);
    }

    #[test]
    fn test_settings_missing_sections_use_defaults() {
        let settings: ProjectSettings = serde_json::from_str(r#"{"code": "IRC 78"}"#).unwrap();
        assert_eq!(settings.abutment_count, 2);
        assert_eq!(settings.criteria, DesignCriteria::default());
        assert_eq!(settings.rates, RateSchedule::default());
    }

    #[test]
    fn test_add_remove_item() {
        let mut project = Project::new("Engineer", "BR-0001", "Client");

        let id = project.add_item(CalculationItem::Abutment(AbutmentInput::default()));
        assert_eq!(project.item_count(), 1);
        assert!(project.get_item(&id).is_some());

        let removed = project.remove_item(&id);
        assert!(removed.is_some());
        assert_eq!(project.item_count(), 0);
        assert!(project.remove_item(&id).is_none());
    }

    #[test]
    fn test_run_all_sorted_and_isolated() {
        let mut project = Project::new("Engineer", "BR-0001", "Client");
        project.add_item(CalculationItem::Abutment(AbutmentInput {
            label: "A2".to_string(),
            abutment_type: AbutmentType::Cantilever,
            ..AbutmentInput::default()
        }));
        let mut bad = AbutmentInput::default();
        bad.soil.friction_angle = 0.0;
        project.add_item(CalculationItem::Abutment(bad));
        project.add_item(CalculationItem::Hydraulic(HydraulicInput::default()));

        let outcomes = project.run_all();
        let labels: Vec<_> = outcomes.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["A1", "A2", "Main channel"]);

        assert_eq!(outcomes[0].result.as_ref().unwrap_err().error_code(), "DOMAIN_ERROR");
        assert!(outcomes[1].result.is_ok());
        assert!(matches!(outcomes[2].result, Ok(CalculationResult::Hydraulic(_))));
    }
}
