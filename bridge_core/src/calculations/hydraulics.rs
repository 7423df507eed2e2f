//! # Hydraulic Analysis
//!
//! Waterway adequacy for a river crossing: flow area from a surveyed cross
//! section, Manning velocity, Lacey regime width, afflux from pier
//! obstruction, skew velocity and scour.
//!
//! ## Method
//!
//! - Flow depth at each survey point is `max(0, HFL − bed level)`.
//! - Area is integrated with the trapezoidal rule between adjacent points.
//! - Wetted perimeter counts only segments submerged at both ends.
//! - Discharge intensity for scour uses the effective waterway.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::calculations::hydraulics::{calculate, HydraulicInput};
//! use bridge_core::criteria::DesignCriteria;
//!
//! let result = calculate(&HydraulicInput::default(), &DesignCriteria::default()).unwrap();
//! assert!(result.velocity > 0.0);
//! assert!(result.freeboard_ok);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::criteria::DesignCriteria;
use crate::equations::hydraulics::{
    afflux, hydraulic_radius, lacey_scour_depth, manning_velocity, obstructed_velocity, regime_width,
};
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};

/// Rounding allowance on the freeboard check (m)
const FREEBOARD_TOLERANCE: f64 = 1e-6;

/// Bed slope written the way survey sheets give it, "1 in N".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BedSlope {
    /// Horizontal run per unit fall
    pub one_in: f64,
}

impl BedSlope {
    pub fn new(one_in: f64) -> CalcResult<Self> {
        require_positive("bed_slope", one_in, "Slope ratio must be positive")?;
        Ok(BedSlope { one_in })
    }

    /// Slope as a fraction, 1/N
    pub fn fraction(&self) -> f64 {
        1.0 / self.one_in
    }
}

impl fmt::Display for BedSlope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1 in {}", self.one_in)
    }
}

impl FromStr for BedSlope {
    type Err = CalcError;

    /// Accepts "1 in 975", "1:975" or a bare "975".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let ratio = if let Some((one, n)) = lower.split_once(" in ").or_else(|| lower.split_once(':')) {
            if one.trim() != "1" {
                return Err(CalcError::invalid_input("bed_slope", s, "Expected the form '1 in N'"));
            }
            n.trim()
        } else {
            lower.as_str()
        };
        let one_in: f64 = ratio
            .parse()
            .map_err(|_| CalcError::invalid_input("bed_slope", s, "Expected the form '1 in N'"))?;
        BedSlope::new(one_in)
    }
}

impl TryFrom<String> for BedSlope {
    type Error = CalcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BedSlope> for String {
    fn from(slope: BedSlope) -> String {
        slope.to_string()
    }
}

/// One point of the river cross-section survey.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurveyPoint {
    /// Distance from the left bank (m)
    pub offset: f64,
    /// Bed level (m)
    pub bed_level: f64,
}

impl SurveyPoint {
    pub fn new(offset: f64, bed_level: f64) -> Self {
        SurveyPoint { offset, bed_level }
    }
}

/// Hydraulic analysis input.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Main channel",
///   "discharge": 902.15,
///   "manning_n": 0.033,
///   "bed_slope": "1 in 975",
///   "silt_factor": 1.5,
///   "hfl": 101.2,
///   "deck_level": 102.4,
///   "survey": [
///     {"offset": 0.0, "bed_level": 101.5},
///     {"offset": 10.0, "bed_level": 99.0},
///     {"offset": 20.0, "bed_level": 98.6},
///     {"offset": 30.0, "bed_level": 101.6}
///   ],
///   "pier_width": 1.2,
///   "pier_count": 2,
///   "skew_angle": 0.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydraulicInput {
    pub label: String,
    /// Design discharge Q (m³/s)
    pub discharge: f64,
    /// Manning's roughness coefficient
    pub manning_n: f64,
    pub bed_slope: BedSlope,
    /// Lacey silt factor Ksf
    pub silt_factor: f64,
    /// Highest flood level (m)
    pub hfl: f64,
    /// Deck level (m)
    pub deck_level: f64,
    /// Cross-section survey, ordered by offset
    pub survey: Vec<SurveyPoint>,
    /// Width of one pier (m)
    pub pier_width: f64,
    pub pier_count: u32,
    /// Angle between flow and the normal to the bridge (degrees)
    pub skew_angle: f64,
}

impl Default for HydraulicInput {
    fn default() -> Self {
        let beds = [101.5, 100.2, 99.0, 98.2, 97.6, 97.4, 97.6, 98.2, 99.0, 100.2, 101.5];
        HydraulicInput {
            label: "Main channel".to_string(),
            discharge: 902.15,
            manning_n: 0.033,
            bed_slope: BedSlope { one_in: 975.0 },
            silt_factor: 1.5,
            hfl: 101.2,
            deck_level: 102.4,
            survey: beds
                .iter()
                .enumerate()
                .map(|(i, &bed)| SurveyPoint::new(i as f64 * 10.0, bed))
                .collect(),
            pier_width: 1.2,
            pier_count: 2,
            skew_angle: 0.0,
        }
    }
}

impl HydraulicInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("discharge", self.discharge, "Discharge must be positive")?;
        require_positive("manning_n", self.manning_n, "Manning's n must be positive")?;
        require_positive("bed_slope", self.bed_slope.one_in, "Slope ratio must be positive")?;
        require_positive("silt_factor", self.silt_factor, "Silt factor must be positive")?;
        require_non_negative("pier_width", self.pier_width, "Pier width cannot be negative")?;
        if !self.hfl.is_finite() || !self.deck_level.is_finite() || !self.skew_angle.is_finite() {
            return Err(CalcError::invalid_input(
                "hfl",
                self.hfl.to_string(),
                "Levels and skew angle must be finite numbers",
            ));
        }
        if self.survey.len() < 2 {
            return Err(CalcError::invalid_input(
                "survey",
                self.survey.len().to_string(),
                "At least two survey points are required",
            ));
        }
        if let Some(p) = self.survey.iter().find(|p| !p.offset.is_finite() || !p.bed_level.is_finite()) {
            return Err(CalcError::invalid_input(
                "survey",
                format!("({}, {})", p.offset, p.bed_level),
                "Survey values must be finite numbers",
            ));
        }
        Ok(())
    }
}

/// Wetted area and perimeter of a surveyed section below a water level.
pub fn wetted_section(survey: &[SurveyPoint], water_level: f64) -> (f64, f64) {
    let mut area = 0.0;
    let mut perimeter = 0.0;

    for pair in survey.windows(2) {
        let d1 = (water_level - pair[0].bed_level).max(0.0);
        let d2 = (water_level - pair[1].bed_level).max(0.0);
        let width = (pair[1].offset - pair[0].offset).abs();

        area += 0.5 * (d1 + d2) * width;
        if d1 > 0.0 && d2 > 0.0 {
            perimeter += width.hypot(d2 - d1);
        }
    }

    (area, perimeter)
}

/// Hydraulic analysis results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydraulicResult {
    /// m²
    pub wetted_area: f64,
    /// m
    pub wetted_perimeter: f64,
    /// m
    pub hydraulic_radius: f64,
    /// Manning velocity (m/s)
    pub velocity: f64,
    /// Lacey regime width (m)
    pub regime_width: f64,
    /// Width blocked by piers (m)
    pub obstruction_width: f64,
    /// Regime width less piers (m)
    pub effective_waterway: f64,
    /// Rise in water level upstream (m)
    pub afflux: f64,
    /// Velocity normal to skewed piers (m/s)
    pub obstructed_velocity: f64,
    /// Q / W_eff (m³/s/m)
    pub discharge_intensity: f64,
    /// Lacey normal scour below HFL (m)
    pub normal_scour_depth: f64,
    /// Factored scour depth (m)
    pub design_scour_depth: f64,
    /// HFL less design scour (m)
    pub scour_level: f64,
    /// Deck level less HFL (m)
    pub freeboard: f64,
    pub freeboard_ok: bool,
}

/// Run the hydraulic analysis.
///
/// # Errors
///
/// - `InvalidInput` for non-positive discharge, roughness, slope or silt
///   factor, or fewer than two survey points
/// - `DomainError` if the section is dry at HFL (zero wetted perimeter), the
///   piers block the whole regime width, or the skew approaches 90°
pub fn calculate(input: &HydraulicInput, criteria: &DesignCriteria) -> CalcResult<HydraulicResult> {
    input.validate()?;
    let hc = &criteria.hydraulics;

    let (wetted_area, wetted_perimeter) = wetted_section(&input.survey, input.hfl);
    if wetted_perimeter <= 0.0 {
        return Err(CalcError::domain_error(
            "wetted_perimeter",
            wetted_perimeter.to_string(),
            "Section is dry at HFL",
        ));
    }
    let radius = hydraulic_radius(wetted_area, wetted_perimeter);
    let velocity = manning_velocity(radius, input.bed_slope.fraction(), input.manning_n);

    let regime = regime_width(input.discharge, hc.regime_width_coefficient);
    let obstruction_width = input.pier_count as f64 * input.pier_width;
    let effective_waterway = regime - obstruction_width;
    if effective_waterway <= 0.0 {
        return Err(CalcError::domain_error(
            "effective_waterway",
            effective_waterway.to_string(),
            format!("Piers block the whole regime width of {:.2} m", regime),
        ));
    }
    let afflux = afflux(input.discharge, regime, effective_waterway, hc.gravity);

    let skew = input.skew_angle.to_radians();
    if skew.cos().abs() <= 1e-6 {
        return Err(CalcError::domain_error(
            "skew_angle",
            input.skew_angle.to_string(),
            "Skew angle too close to 90°",
        ));
    }
    let obstructed_velocity = obstructed_velocity(velocity, skew);

    let discharge_intensity = input.discharge / effective_waterway;
    let normal_scour_depth = lacey_scour_depth(discharge_intensity, input.silt_factor, hc.scour_coefficient);
    let design_scour_depth = hc.design_scour_factor * normal_scour_depth;
    let freeboard = input.deck_level - input.hfl;

    let result = HydraulicResult {
        wetted_area,
        wetted_perimeter,
        hydraulic_radius: radius,
        velocity,
        regime_width: regime,
        obstruction_width,
        effective_waterway,
        afflux,
        obstructed_velocity,
        discharge_intensity,
        normal_scour_depth,
        design_scour_depth,
        scour_level: input.hfl - design_scour_depth,
        freeboard,
        freeboard_ok: freeboard >= hc.min_freeboard - FREEBOARD_TOLERANCE,
    };

    if result.freeboard_ok {
        tracing::info!(label = %input.label, velocity, afflux, "hydraulic analysis complete");
    } else {
        tracing::warn!(
            label = %input.label,
            freeboard,
            required = hc.min_freeboard,
            "freeboard below minimum"
        );
    }

    Ok(result)
}
