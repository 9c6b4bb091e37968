use serde::{Deserialize, Serialize};

use super::{Amount, JobId, ValidationError, require_non_negative, require_text};

pub type ItemId = i64;

/// Stock on the shop floor, optionally set aside for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item_id: ItemId,
    #[serde(rename = "type")]
    pub item_type: String,
    pub quantity: i64,
    pub cost: Amount,
    pub cost_markup: Amount,
    pub assigned_job_id: Option<JobId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemInput {
    #[serde(rename = "type")]
    pub item_type: String,
    pub quantity: i64,
    pub cost: Amount,
    pub cost_markup: Amount,
    #[serde(default)]
    pub assigned_job_id: Option<JobId>,
}

impl InventoryItemInput {
    pub fn new(item_type: impl Into<String>, quantity: i64, cost: Amount, cost_markup: Amount) -> Self {
        Self {
            item_type: item_type.into(),
            quantity,
            cost,
            cost_markup,
            assigned_job_id: None,
        }
    }

    pub fn assigned_to(mut self, job_id: impl Into<JobId>) -> Self {
        self.assigned_job_id = Some(job_id.into());
        self
    }

    /// Empty job ids from form posts mean "unassigned".
    pub fn normalized_job_id(&self) -> Option<&str> {
        self.assigned_job_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("type", &self.item_type)?;
        if self.quantity < 0 {
            return Err(ValidationError::new("quantity", "must not be negative"));
        }
        require_non_negative("cost", self.cost)?;
        require_non_negative("cost_markup", self.cost_markup)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_type_field_name_on_wire() {
        let input: InventoryItemInput = serde_json::from_str(
            r#"{"type":"Steel plate","quantity":4,"cost":80,"cost_markup":0.2}"#,
        )
        .unwrap();
        assert_eq!(input.item_type, "Steel plate");
        assert_eq!(input.assigned_job_id, None);
    }

    #[test]
    fn test_blank_assignment_is_unassigned() {
        let input = InventoryItemInput::new("Bolts", 100, Decimal::ONE, Decimal::ZERO).assigned_to("");
        assert_eq!(input.normalized_job_id(), None);

        let input = input.assigned_to("J1");
        assert_eq!(input.normalized_job_id(), Some("J1"));
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let input = InventoryItemInput::new("Bolts", -1, Decimal::ONE, Decimal::ZERO);
        assert!(input.validate().is_err());
    }
}
