//! # Cost Estimate
//!
//! Prices abutment quantities from a rate schedule and adds miscellaneous
//! items and contractor's profit.
//!
//! ## Abstract
//!
//! ```text
//! Direct      = Σ quantity × rate
//! Misc        = misc% × Direct
//! Subtotal    = Direct + Misc
//! Profit      = profit% × Subtotal
//! Total       = Subtotal + Profit
//! ```
//!
//! Rates are in rupees: concrete per m³, steel per tonne, formwork per m²,
//! excavation per m³.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::quantities::Quantities;
use crate::errors::{require_non_negative, CalcError, CalcResult};
use crate::materials::{ConcreteGrade, MaterialProperties, SteelGrade};

/// Unit rates keyed by grade name ("M25", "Fe415").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateSchedule {
    /// ₹ per m³ of concrete, by grade
    pub concrete: BTreeMap<String, f64>,
    /// ₹ per tonne of reinforcement, by grade
    pub steel: BTreeMap<String, f64>,
    /// ₹ per m²
    pub formwork: f64,
    /// ₹ per m³
    pub excavation: f64,
    /// Miscellaneous items as a percentage of direct cost
    pub miscellaneous_percent: f64,
    /// Contractor's profit as a percentage of direct plus miscellaneous
    pub profit_percent: f64,
}

impl Default for RateSchedule {
    fn default() -> Self {
        RateSchedule {
            concrete: [("M25", 8500.0), ("M30", 9200.0), ("M35", 9800.0)]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            steel: [("Fe415", 75000.0), ("Fe500", 78000.0)]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            formwork: 450.0,
            excavation: 180.0,
            miscellaneous_percent: 10.0,
            profit_percent: 12.0,
        }
    }
}

impl RateSchedule {
    /// Load a rate schedule from a TOML file. Missing keys use the defaults.
    pub fn load(path: &Path) -> CalcResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read rates", path.display().to_string(), e.to_string()))?;
        let rates: RateSchedule = toml::from_str(&text).map_err(CalcError::serialization)?;
        rates.validate()?;
        tracing::debug!(path = %path.display(), "loaded rate schedule");
        Ok(rates)
    }

    pub fn validate(&self) -> CalcResult<()> {
        for (grade, rate) in self.concrete.iter().chain(self.steel.iter()) {
            require_non_negative(&format!("rates.{}", grade), *rate, "Rate cannot be negative")?;
        }
        require_non_negative("rates.formwork", self.formwork, "Rate cannot be negative")?;
        require_non_negative("rates.excavation", self.excavation, "Rate cannot be negative")?;
        require_non_negative("rates.miscellaneous_percent", self.miscellaneous_percent, "Percentage cannot be negative")?;
        require_non_negative("rates.profit_percent", self.profit_percent, "Percentage cannot be negative")?;
        Ok(())
    }

    /// Concrete rate for a characteristic strength.
    ///
    /// # Errors
    ///
    /// `MaterialNotFound` if the strength is not a standard grade or the
    /// grade has no rate.
    pub fn concrete_rate(&self, fck: f64) -> CalcResult<(String, f64)> {
        let name = ConcreteGrade::from_fck(fck)
            .map(|g| g.to_string())
            .ok_or_else(|| CalcError::material_not_found(format!("concrete fck {}", fck)))?;
        let rate = self
            .concrete
            .get(&name)
            .copied()
            .ok_or_else(|| CalcError::material_not_found(name.clone()))?;
        Ok((name, rate))
    }

    /// Steel rate for a yield strength.
    ///
    /// # Errors
    ///
    /// `MaterialNotFound` if the strength is not a standard grade or the
    /// grade has no rate.
    pub fn steel_rate(&self, fy: f64) -> CalcResult<(String, f64)> {
        let name = SteelGrade::from_fy(fy)
            .map(|g| g.to_string())
            .ok_or_else(|| CalcError::material_not_found(format!("steel fy {}", fy)))?;
        let rate = self
            .steel
            .get(&name)
            .copied()
            .ok_or_else(|| CalcError::material_not_found(name.clone()))?;
        Ok((name, rate))
    }
}

/// One priced line of the abstract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    pub item: String,
    pub quantity: f64,
    pub unit: String,
    pub rate: f64,
    pub amount: f64,
}

impl CostLine {
    fn new(item: impl Into<String>, quantity: f64, unit: &str, rate: f64) -> Self {
        CostLine {
            item: item.into(),
            quantity,
            unit: unit.to_string(),
            rate,
            amount: quantity * rate,
        }
    }
}

/// Abstract of cost for a set of identical abutments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub abutment_count: u32,
    /// Quantities for all abutments
    pub quantities: Quantities,
    pub lines: Vec<CostLine>,
    pub direct_cost: f64,
    pub miscellaneous: f64,
    pub subtotal: f64,
    pub contractor_profit: f64,
    pub total: f64,
}

/// Default number of abutments priced (one at each end).
pub const DEFAULT_ABUTMENT_COUNT: u32 = 2;

/// Price one abutment's quantities for `abutment_count` abutments.
///
/// # Example
///
/// ```rust
/// use bridge_core::calculations::estimate::{calculate, RateSchedule};
/// use bridge_core::calculations::Quantities;
/// use bridge_core::materials::MaterialProperties;
///
/// let q = Quantities {
///     concrete_volume: 100.0,
///     steel_weight: 1000.0,
///     formwork_area: 0.0,
///     excavation_volume: 0.0,
/// };
/// let est = calculate(&q, &MaterialProperties::default(), &RateSchedule::default(), 1).unwrap();
/// // 100 m³ × 8500 + 1 t × 75000
/// assert!((est.direct_cost - 925_000.0).abs() < 1e-6);
/// ```
pub fn calculate(
    quantities: &Quantities,
    material: &MaterialProperties,
    rates: &RateSchedule,
    abutment_count: u32,
) -> CalcResult<CostEstimate> {
    if abutment_count == 0 {
        return Err(CalcError::invalid_input(
            "abutment_count",
            "0",
            "At least one abutment must be priced",
        ));
    }
    rates.validate()?;
    let (concrete_grade, concrete_rate) = rates.concrete_rate(material.fck)?;
    let (steel_grade, steel_rate) = rates.steel_rate(material.fy)?;

    let total = quantities.times(abutment_count);
    let lines = vec![
        CostLine::new(format!("RCC {}", concrete_grade), total.concrete_volume, "m³", concrete_rate),
        CostLine::new(format!("Reinforcement {}", steel_grade), total.steel_tonnes(), "t", steel_rate),
        CostLine::new("Formwork", total.formwork_area, "m²", rates.formwork),
        CostLine::new("Excavation", total.excavation_volume, "m³", rates.excavation),
    ];

    let direct_cost: f64 = lines.iter().map(|l| l.amount).sum();
    let miscellaneous = direct_cost * rates.miscellaneous_percent / 100.0;
    let subtotal = direct_cost + miscellaneous;
    let contractor_profit = subtotal * rates.profit_percent / 100.0;
    let grand_total = subtotal + contractor_profit;

    tracing::debug!(abutment_count, direct_cost, total = grand_total, "cost estimated");

    Ok(CostEstimate {
        abutment_count,
        quantities: total,
        lines,
        direct_cost,
        miscellaneous,
        subtotal,
        contractor_profit,
        total: grand_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{geometry, quantities, AbutmentType};
    use crate::criteria::DesignCriteria;
    use approx::assert_relative_eq;

    fn battered_quantities() -> Quantities {
        let criteria = DesignCriteria::default();
        let geom = geometry::calculate(6.4, 12.5, AbutmentType::Battered, &criteria).unwrap();
        quantities::calculate(&geom, &criteria)
    }

    #[test]
    fn test_battered_direct_cost() {
        let q = battered_quantities();
        let est = calculate(&q, &MaterialProperties::default(), &RateSchedule::default(), 1).unwrap();

        let expected = 225.198 * 8500.0 + 225.198 * 0.015 * 7.85 * 75000.0 + 238.34 * 450.0 + 126.48 * 180.0;
        assert_relative_eq!(est.direct_cost, expected, epsilon = 1e-6);
        assert_eq!(est.lines.len(), 4);
        assert_eq!(est.lines[0].item, "RCC M25");
        assert_eq!(est.lines[1].unit, "t");
    }

    #[test]
    fn test_misc_and_profit_percentages() {
        let q = battered_quantities();
        let est = calculate(&q, &MaterialProperties::default(), &RateSchedule::default(), 1).unwrap();

        assert_relative_eq!(est.miscellaneous, 0.10 * est.direct_cost, epsilon = 1e-6);
        assert_relative_eq!(est.subtotal, est.direct_cost + est.miscellaneous, epsilon = 1e-6);
        assert_relative_eq!(est.contractor_profit, 0.12 * est.subtotal, epsilon = 1e-6);
        assert_relative_eq!(est.total, est.subtotal * 1.12, epsilon = 1e-6);
    }

    #[test]
    fn test_scales_with_abutment_count() {
        let q = battered_quantities();
        let one = calculate(&q, &MaterialProperties::default(), &RateSchedule::default(), 1).unwrap();
        let two = calculate(
            &q,
            &MaterialProperties::default(),
            &RateSchedule::default(),
            DEFAULT_ABUTMENT_COUNT,
        )
        .unwrap();
        assert_relative_eq!(two.total, 2.0 * one.total, epsilon = 1e-6);
        assert_relative_eq!(two.quantities.concrete_volume, 2.0 * 225.198, epsilon = 1e-9);
    }

    #[test]
    fn test_higher_grade_rates() {
        let q = battered_quantities();
        let mat = MaterialProperties::from_grades(ConcreteGrade::M30, SteelGrade::Fe500);
        let est = calculate(&q, &mat, &RateSchedule::default(), 1).unwrap();
        assert_relative_eq!(est.lines[0].rate, 9200.0);
        assert_relative_eq!(est.lines[1].rate, 78000.0);
    }

    #[test]
    fn test_unknown_grade_not_found() {
        let q = battered_quantities();
        let mat = MaterialProperties::from_grades(ConcreteGrade::M50, SteelGrade::Fe415);
        let err = calculate(&q, &mat, &RateSchedule::default(), 1).unwrap_err();
        assert_eq!(err.error_code(), "MATERIAL_NOT_FOUND");

        let mat = MaterialProperties::from_grades(ConcreteGrade::M25, SteelGrade::Fe600);
        let err = calculate(&q, &mat, &RateSchedule::default(), 1).unwrap_err();
        assert_eq!(err.error_code(), "MATERIAL_NOT_FOUND");

        let mat = MaterialProperties {
            fck: 27.5,
            ..MaterialProperties::default()
        };
        let err = calculate(&q, &mat, &RateSchedule::default(), 1).unwrap_err();
        assert_eq!(err.error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_zero_abutments_rejected() {
        let q = battered_quantities();
        let err = calculate(&q, &MaterialProperties::default(), &RateSchedule::default(), 0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_rate_schedule_partial_toml() {
        let rates: RateSchedule = toml::from_str("formwork = 500.0\n[concrete]\nM40 = 10500.0\n").unwrap();
        assert_relative_eq!(rates.formwork, 500.0);
        assert_relative_eq!(rates.excavation, 180.0);
        assert_eq!(rates.concrete.len(), 1);
        assert_relative_eq!(rates.profit_percent, 12.0);
    }
}
