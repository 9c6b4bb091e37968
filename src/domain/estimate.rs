use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    Amount, ClientId, ValidationError, line_total, out_of_range, require_non_negative, require_text,
};

pub type EstimateId = i64;
pub type EstimateMaterialId = i64;

pub const ESTIMATE_PENDING: &str = "pending";
pub const ESTIMATE_ACCEPTED: &str = "accepted";
pub const ESTIMATE_REJECTED: &str = "rejected";

fn default_estimate_status() -> String {
    ESTIMATE_PENDING.to_string()
}

fn default_quantity() -> Amount {
    Decimal::ONE
}

/// A priced quote for a client, with its line items embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub estimate_id: EstimateId,
    pub client_id: ClientId,
    pub status: String,
    pub estimated_hours: Amount,
    pub estimated_hourly_rate: Amount,
    pub total_materials_cost: Amount,
    pub total_hourly_cost: Amount,
    pub total_estimate_cost: Amount,
    pub scheduled_date: Option<NaiveDate>,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
    #[serde(default)]
    pub materials: Vec<EstimateMaterial>,
}

impl Estimate {
    pub fn is_accepted(&self) -> bool {
        self.status == ESTIMATE_ACCEPTED
    }

    pub fn totals(&self) -> EstimateTotals {
        EstimateTotals {
            total_materials_cost: self.total_materials_cost,
            total_hourly_cost: self.total_hourly_cost,
            total_estimate_cost: self.total_estimate_cost,
        }
    }

    /// Totals as they should be given the current line items, hours and rate.
    pub fn expected_totals(&self) -> Result<EstimateTotals, ValidationError> {
        EstimateTotals::compute(
            self.estimated_hours,
            self.estimated_hourly_rate,
            &self.materials,
        )
    }
}

/// Caller-editable estimate fields. Totals and timestamps are never taken
/// from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateInput {
    pub client_id: ClientId,
    #[serde(default = "default_estimate_status")]
    pub status: String,
    #[serde(default)]
    pub estimated_hours: Amount,
    #[serde(default)]
    pub estimated_hourly_rate: Amount,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
}

impl EstimateInput {
    pub fn new(client_id: ClientId) -> Self {
        Self {
            client_id,
            status: default_estimate_status(),
            estimated_hours: Decimal::ZERO,
            estimated_hourly_rate: Decimal::ZERO,
            scheduled_date: None,
        }
    }

    pub fn with_labour(mut self, hours: Amount, hourly_rate: Amount) -> Self {
        self.estimated_hours = hours;
        self.estimated_hourly_rate = hourly_rate;
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("status", &self.status)?;
        require_non_negative("estimated_hours", self.estimated_hours)?;
        require_non_negative("estimated_hourly_rate", self.estimated_hourly_rate)?;
        line_total(self.estimated_hours, self.estimated_hourly_rate)
            .ok_or_else(|| out_of_range("total_hourly_cost"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateMaterial {
    pub material_id: EstimateMaterialId,
    pub estimate_id: EstimateId,
    pub description: String,
    pub quantity: Amount,
    pub unit_cost: Amount,
    pub total_cost: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateMaterialInput {
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: Amount,
    #[serde(default)]
    pub unit_cost: Amount,
}

impl EstimateMaterialInput {
    pub fn new(description: impl Into<String>, quantity: Amount, unit_cost: Amount) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_cost,
        }
    }

    pub fn total_cost(&self) -> Result<Amount, ValidationError> {
        line_total(self.quantity, self.unit_cost).ok_or_else(|| out_of_range("total_cost"))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("description", &self.description)?;
        require_non_negative("quantity", self.quantity)?;
        require_non_negative("unit_cost", self.unit_cost)?;
        self.total_cost()?;
        Ok(())
    }
}

/// The three derived cost fields of an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateTotals {
    pub total_materials_cost: Amount,
    pub total_hourly_cost: Amount,
    pub total_estimate_cost: Amount,
}

impl EstimateTotals {
    /// materials = Σ quantity × unit_cost over the line items (0 when none),
    /// hourly = hours × rate, estimate = materials + hourly.
    ///
    /// Fails with an out-of-range error when any product or sum overflows.
    pub fn compute(
        hours: Amount,
        hourly_rate: Amount,
        lines: &[EstimateMaterial],
    ) -> Result<Self, ValidationError> {
        let total_materials_cost = lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, line| {
                line_total(line.quantity, line.unit_cost).and_then(|t| acc.checked_add(t))
            })
            .ok_or_else(|| out_of_range("total_materials_cost"))?;
        let total_hourly_cost =
            line_total(hours, hourly_rate).ok_or_else(|| out_of_range("total_hourly_cost"))?;
        let total_estimate_cost = total_materials_cost
            .checked_add(total_hourly_cost)
            .ok_or_else(|| out_of_range("total_estimate_cost"))?;

        Ok(Self {
            total_materials_cost,
            total_hourly_cost,
            total_estimate_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: EstimateMaterialId, quantity: i64, unit_cost: i64) -> EstimateMaterial {
        let quantity = Decimal::from(quantity);
        let unit_cost = Decimal::from(unit_cost);
        EstimateMaterial {
            material_id: id,
            estimate_id: 1,
            description: format!("line {id}"),
            quantity,
            unit_cost,
            total_cost: quantity * unit_cost,
        }
    }

    #[test]
    fn test_totals_without_lines() {
        let totals = EstimateTotals::compute(Decimal::from(10), Decimal::from(50), &[]).unwrap();
        assert_eq!(totals.total_materials_cost, Decimal::ZERO);
        assert_eq!(totals.total_hourly_cost, Decimal::from(500));
        assert_eq!(totals.total_estimate_cost, Decimal::from(500));
    }

    #[test]
    fn test_totals_with_lines() {
        let lines = vec![line(1, 2, 25), line(2, 3, 10)];
        let totals = EstimateTotals::compute(Decimal::from(10), Decimal::from(50), &lines).unwrap();
        assert_eq!(totals.total_materials_cost, Decimal::from(80));
        assert_eq!(totals.total_estimate_cost, Decimal::from(580));
    }

    #[test]
    fn test_totals_are_exact_for_fractions() {
        let mut lines = vec![line(1, 1, 1)];
        lines[0].quantity = Decimal::new(3, 1); // 0.3
        lines[0].unit_cost = Decimal::new(1, 1); // 0.1
        let totals = EstimateTotals::compute(Decimal::new(15, 1), Decimal::new(2, 1), &lines).unwrap();
        assert_eq!(totals.total_materials_cost, Decimal::new(3, 2));
        assert_eq!(totals.total_hourly_cost, Decimal::new(3, 1));
        assert_eq!(totals.total_estimate_cost, Decimal::new(33, 2));
    }

    #[test]
    fn test_input_defaults() {
        let input: EstimateInput = serde_json::from_str(r#"{"client_id":7}"#).unwrap();
        assert_eq!(input.status, ESTIMATE_PENDING);
        assert_eq!(input.estimated_hours, Decimal::ZERO);
        assert_eq!(input.scheduled_date, None);

        let material: EstimateMaterialInput =
            serde_json::from_str(r#"{"description":"Angle iron"}"#).unwrap();
        assert_eq!(material.quantity, Decimal::ONE);
        assert_eq!(material.total_cost(), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_negative_labour_rejected() {
        let input = EstimateInput::new(1).with_labour(Decimal::from(-1), Decimal::from(50));
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_totals_overflow_is_rejected() {
        let mut lines = vec![line(1, 1, 1), line(2, 1, 1)];
        for l in &mut lines {
            l.unit_cost = Decimal::MAX;
        }
        let err = EstimateTotals::compute(Decimal::ZERO, Decimal::ZERO, &lines).unwrap_err();
        assert_eq!(err, ValidationError::new("total_materials_cost", "is out of range"));

        let huge = Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0);
        let err = EstimateTotals::compute(huge, huge, &[]).unwrap_err();
        assert_eq!(err.field, "total_hourly_cost");
    }

    #[test]
    fn test_inputs_whose_product_overflows_are_rejected() {
        let huge = Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0);
        assert!(EstimateInput::new(1).with_labour(huge, huge).validate().is_err());
        assert!(EstimateMaterialInput::new("Plate", huge, huge).validate().is_err());
        assert!(EstimateMaterialInput::new("Plate", Decimal::ONE, Decimal::MAX).validate().is_ok());
    }
}
