//! # Footing Sizing
//!
//! Trial-and-error enlargement of an abutment base until the peak soil
//! pressure falls below the safe bearing capacity.
//!
//! Each trial extends the footing by the same amount on every side. A trial
//! with the resultant outside the middle third (`e > L/6`) would lift off the
//! soil and is rejected outright. The first trial with `σmax < SBC` wins.

use serde::{Deserialize, Serialize};

use super::abutment::{AbutmentDesign, SoilParameters};
use crate::criteria::DesignCriteria;
use crate::equations::stability::kern_peak_pressure;
use crate::errors::{require_non_negative, require_positive, CalcResult};

/// Outcome of the footing scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FootingStatus {
    /// A trial within the extension limit satisfies bearing
    Accepted,
    /// No trial up to the maximum extension is acceptable
    ExceededLimits,
}

/// Loads and starting dimensions for the footing scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FootingInput {
    /// Starting dimension in the plane of the moment (m)
    pub length: f64,
    /// Starting dimension across the moment (m)
    pub width: f64,
    /// Total vertical load (kN)
    pub vertical_load: f64,
    /// Overturning moment about the footing centre (kN·m)
    pub moment: f64,
    /// Safe bearing capacity (kN/m²)
    pub bearing_capacity: f64,
}

impl FootingInput {
    /// Footing scan for a finished abutment design.
    ///
    /// The earth pressure moment acts across the base width, so that is the
    /// length checked against the kern.
    pub fn from_design(design: &AbutmentDesign, soil: &SoilParameters) -> Self {
        FootingInput {
            length: design.geometry.base_width,
            width: design.geometry.base_length,
            vertical_load: design.loads.total_vertical_load,
            moment: design.earth_pressures.active_moment,
            bearing_capacity: soil.bearing_capacity,
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_positive("length", self.length, "Footing length must be positive")?;
        require_positive("width", self.width, "Footing width must be positive")?;
        require_positive("vertical_load", self.vertical_load, "Vertical load must be positive")?;
        require_non_negative("moment", self.moment, "Moment cannot be negative")?;
        require_positive("bearing_capacity", self.bearing_capacity, "Bearing capacity must be positive")?;
        Ok(())
    }
}

/// One trial footing size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FootingTrial {
    /// Extension per side (m)
    pub extension: f64,
    pub length: f64,
    pub width: f64,
    /// M / V (m)
    pub eccentricity: f64,
    /// Peak pressure, `None` when the base would be in tension
    pub max_pressure: Option<f64>,
    pub acceptable: bool,
}

/// Result of the footing scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootingDesign {
    pub status: FootingStatus,
    /// First acceptable trial
    pub accepted: Option<FootingTrial>,
    /// Trials evaluated, in scan order
    pub trials: Vec<FootingTrial>,
    pub bearing_capacity: f64,
}

impl FootingDesign {
    /// Peak pressure over SBC for the accepted trial.
    pub fn utilization_ratio(&self) -> Option<f64> {
        self.accepted
            .and_then(|t| t.max_pressure)
            .map(|p| p / self.bearing_capacity)
    }
}

/// Scan footing extensions from zero to the configured maximum.
///
/// # Example
///
/// ```rust
/// use bridge_core::calculations::footing::{calculate, FootingInput, FootingStatus};
/// use bridge_core::criteria::DesignCriteria;
///
/// let input = FootingInput {
///     length: 3.0,
///     width: 12.0,
///     vertical_load: 6000.0,
///     moment: 300.0,
///     bearing_capacity: 160.0,
/// };
/// let design = calculate(&input, &DesignCriteria::default()).unwrap();
/// assert_eq!(design.status, FootingStatus::Accepted);
/// // 0.25 m per side brings the peak to ≈ 149 kN/m²
/// assert_eq!(design.accepted.unwrap().extension, 0.25);
/// ```
pub fn calculate(input: &FootingInput, criteria: &DesignCriteria) -> CalcResult<FootingDesign> {
    input.validate()?;
    criteria.validate()?;

    let step = criteria.footing_extension_step;
    let steps = (criteria.footing_max_extension / step + 1e-9).floor() as u32;
    let e = input.moment / input.vertical_load;

    let mut trials = Vec::new();
    let mut accepted = None;

    for i in 0..=steps {
        let extension = i as f64 * step;
        let length = input.length + 2.0 * extension;
        let width = input.width + 2.0 * extension;

        let max_pressure = if e <= length / 6.0 {
            Some(kern_peak_pressure(input.vertical_load, length, width, e))
        } else {
            None
        };
        let acceptable = max_pressure.is_some_and(|p| p < input.bearing_capacity);

        let trial = FootingTrial {
            extension,
            length,
            width,
            eccentricity: e,
            max_pressure,
            acceptable,
        };
        trials.push(trial);

        if acceptable {
            accepted = Some(trial);
            break;
        }
    }

    let status = if accepted.is_some() {
        FootingStatus::Accepted
    } else {
        FootingStatus::ExceededLimits
    };

    match &accepted {
        Some(t) => tracing::debug!(extension = t.extension, trials = trials.len(), "footing accepted"),
        None => tracing::warn!(
            max_extension = criteria.footing_max_extension,
            "no acceptable footing within extension limit"
        ),
    }

    Ok(FootingDesign {
        status,
        accepted,
        trials,
        bearing_capacity: input.bearing_capacity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{design_abutment, AbutmentType, ProjectParameters};
    use crate::materials::MaterialProperties;
    use approx::assert_relative_eq;

    fn battered_input(bearing_capacity: f64) -> FootingInput {
        let soil = SoilParameters {
            bearing_capacity,
            ..SoilParameters::default()
        };
        let design = design_abutment(
            &ProjectParameters::default(),
            &soil,
            &MaterialProperties::default(),
            AbutmentType::Battered,
            &DesignCriteria::default(),
        )
        .unwrap();
        FootingInput::from_design(&design, &soil)
    }

    #[test]
    fn test_default_battered_accepted_without_extension() {
        let input = battered_input(450.0);
        assert_relative_eq!(input.length, 3.08, epsilon = 1e-9);
        assert_relative_eq!(input.width, 14.5, epsilon = 1e-9);

        let d = calculate(&input, &DesignCriteria::default()).unwrap();
        assert_eq!(d.status, FootingStatus::Accepted);
        assert_eq!(d.trials.len(), 1);

        let t = d.accepted.unwrap();
        assert_relative_eq!(t.extension, 0.0);
        let e = 262.144 / 8704.752;
        let expected = 8704.752 / (3.08 * 14.5) * (1.0 + 6.0 * e / 3.08);
        assert_relative_eq!(t.max_pressure.unwrap(), expected, epsilon = 1e-9);
        assert!((t.max_pressure.unwrap() - 206.3).abs() < 0.1);
    }

    #[test]
    fn test_scan_returns_first_acceptable_extension() {
        // 0.25 m gives ≈ 170 kN/m², 0.5 m gives ≈ 144 kN/m²
        let d = calculate(&battered_input(150.0), &DesignCriteria::default()).unwrap();
        assert_eq!(d.status, FootingStatus::Accepted);
        assert_eq!(d.trials.len(), 3);
        assert!(!d.trials[1].acceptable);

        let t = d.accepted.unwrap();
        assert_relative_eq!(t.extension, 0.5);
        assert_relative_eq!(t.length, 4.08, epsilon = 1e-9);
        assert_relative_eq!(t.width, 15.5, epsilon = 1e-9);
        assert!(d.utilization_ratio().unwrap() < 1.0);
    }

    #[test]
    fn test_exceeded_limits() {
        let d = calculate(&battered_input(10.0), &DesignCriteria::default()).unwrap();
        assert_eq!(d.status, FootingStatus::ExceededLimits);
        assert!(d.accepted.is_none());
        assert!(d.utilization_ratio().is_none());
        // 0, 0.25, ... 3.0
        assert_eq!(d.trials.len(), 13);
        assert_relative_eq!(d.trials[12].extension, 3.0);
    }

    #[test]
    fn test_tension_trials_rejected() {
        let input = FootingInput {
            length: 1.0,
            width: 1.0,
            vertical_load: 100.0,
            moment: 50.0,
            bearing_capacity: 1.0e6,
        };
        // e = 0.5 needs L ≥ 3.0, reached at 1.0 m extension
        let d = calculate(&input, &DesignCriteria::default()).unwrap();
        assert!(d.trials[..4].iter().all(|t| t.max_pressure.is_none()));
        assert_relative_eq!(d.accepted.unwrap().extension, 1.0);
    }

    #[test]
    fn test_tiny_step_rejected_before_scan() {
        let criteria = DesignCriteria {
            footing_extension_step: 1e-6,
            ..DesignCriteria::default()
        };
        let err = calculate(&battered_input(1.0), &criteria).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_invalid_vertical_load() {
        let input = FootingInput {
            length: 3.0,
            width: 10.0,
            vertical_load: 0.0,
            moment: 10.0,
            bearing_capacity: 200.0,
        };
        let err = calculate(&input, &DesignCriteria::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
