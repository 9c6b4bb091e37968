use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    Amount, ClientId, CrewId, ValidationError, line_total, out_of_range, require_non_negative,
    require_non_negative_opt, require_text,
};

/// Jobs carry caller-assigned identifiers, e.g. "J-2024-017".
pub type JobId = String;

pub const DEFAULT_JOB_STATUS: &str = "scheduled";

fn default_job_status() -> String {
    DEFAULT_JOB_STATUS.to_string()
}

/// A scheduled piece of work for a client.
///
/// The same shape is used on the wire for create and full replace. On
/// replace the identifier comes from the request path, so `job_id` may be
/// omitted from the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub job_id: JobId,
    pub client_account_id: ClientId,
    #[serde(default)]
    pub crew_id: Option<CrewId>,
    pub address: String,
    pub scheduled_date: NaiveDate,
    pub cost_estimate: Amount,
    #[serde(default)]
    pub actual_hours: Option<Amount>,
    #[serde(default)]
    pub actual_hourly_rate: Option<Amount>,
    #[serde(default)]
    pub actual_materials_cost: Option<Amount>,
    #[serde(default)]
    pub actual_total_cost: Option<Amount>,
    #[serde(default = "default_job_status")]
    pub status: String,
}

impl Job {
    pub fn new(
        job_id: impl Into<JobId>,
        client_account_id: ClientId,
        address: impl Into<String>,
        scheduled_date: NaiveDate,
        cost_estimate: Amount,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            client_account_id,
            crew_id: None,
            address: address.into(),
            scheduled_date,
            cost_estimate,
            actual_hours: None,
            actual_hourly_rate: None,
            actual_materials_cost: None,
            actual_total_cost: None,
            status: default_job_status(),
        }
    }

    pub fn with_crew(mut self, crew_id: CrewId) -> Self {
        self.crew_id = Some(crew_id);
        self
    }

    /// Derive `actual_total_cost` once the hours and rate are known.
    ///
    /// Labour (hours × rate) plus materials, where missing materials count
    /// as zero. Without both hours and rate the supplied total is kept.
    pub fn settle_actual_total(&mut self) -> Result<(), ValidationError> {
        if let (Some(hours), Some(rate)) = (self.actual_hours, self.actual_hourly_rate) {
            let materials = self.actual_materials_cost.unwrap_or_default();
            let total = line_total(hours, rate)
                .and_then(|labour| labour.checked_add(materials))
                .ok_or_else(|| out_of_range("actual_total_cost"))?;
            self.actual_total_cost = Some(total);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("job_id", &self.job_id)?;
        require_non_negative("cost_estimate", self.cost_estimate)?;
        require_non_negative_opt("actual_hours", self.actual_hours)?;
        require_non_negative_opt("actual_hourly_rate", self.actual_hourly_rate)?;
        require_non_negative_opt("actual_materials_cost", self.actual_materials_cost)?;
        Ok(())
    }
}

/// Job fields supplied when an accepted estimate becomes a job. Client and
/// cost come from the estimate itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertToJob {
    pub job_id: JobId,
    #[serde(default)]
    pub crew_id: Option<CrewId>,
    pub address: String,
    pub scheduled_date: NaiveDate,
}

impl ConvertToJob {
    pub fn new(job_id: impl Into<JobId>, address: impl Into<String>, scheduled_date: NaiveDate) -> Self {
        Self {
            job_id: job_id.into(),
            crew_id: None,
            address: address.into(),
            scheduled_date,
        }
    }

    /// Build the job, snapshotting the estimate's total as its cost estimate.
    pub fn into_job(self, client_account_id: ClientId, cost_estimate: Amount) -> Job {
        Job {
            crew_id: self.crew_id,
            ..Job::new(
                self.job_id,
                client_account_id,
                self.address,
                self.scheduled_date,
                cost_estimate,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn sample_job() -> Job {
        Job::new(
            "J1",
            1,
            "12 Forge Rd",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            Decimal::from(1200),
        )
    }

    #[test]
    fn test_settle_with_hours_and_rate() {
        let mut job = sample_job();
        job.actual_hours = Some(Decimal::from(8));
        job.actual_hourly_rate = Some(Decimal::from(60));
        job.actual_materials_cost = Some(Decimal::from(220));
        job.actual_total_cost = Some(Decimal::from(1));

        job.settle_actual_total().unwrap();
        assert_eq!(job.actual_total_cost, Some(Decimal::from(700)));
    }

    #[test]
    fn test_settle_missing_materials_counts_as_zero() {
        let mut job = sample_job();
        job.actual_hours = Some(Decimal::from(2));
        job.actual_hourly_rate = Some(Decimal::from(45));

        job.settle_actual_total().unwrap();
        assert_eq!(job.actual_total_cost, Some(Decimal::from(90)));
    }

    #[test]
    fn test_settle_keeps_supplied_total_without_rate() {
        let mut job = sample_job();
        job.actual_hours = Some(Decimal::from(2));
        job.actual_total_cost = Some(Decimal::from(333));

        job.settle_actual_total().unwrap();
        assert_eq!(job.actual_total_cost, Some(Decimal::from(333)));
    }

    #[test]
    fn test_wire_defaults() {
        let job: Job = serde_json::from_str(
            r#"{"job_id":"J9","client_account_id":3,"address":"x","scheduled_date":"2024-05-02","cost_estimate":150.5}"#,
        )
        .unwrap();
        assert_eq!(job.status, DEFAULT_JOB_STATUS);
        assert_eq!(job.crew_id, None);
        assert_eq!(job.cost_estimate, Decimal::new(1505, 1));
    }

    #[test]
    fn test_blank_job_id_rejected() {
        let mut job = sample_job();
        job.job_id = "  ".into();
        assert!(job.validate().is_err());
    }

    #[test]
    fn test_convert_snapshots_cost() {
        let job = ConvertToJob::new("J7", "Shop", NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
            .into_job(4, Decimal::from(550));
        assert_eq!(job.client_account_id, 4);
        assert_eq!(job.cost_estimate, Decimal::from(550));
        assert_eq!(job.status, DEFAULT_JOB_STATUS);
    }

    #[test]
    fn test_settle_overflow_is_rejected() {
        let mut job = sample_job();
        job.actual_hours = Some(Decimal::MAX);
        job.actual_hourly_rate = Some(Decimal::ONE);
        job.actual_materials_cost = Some(Decimal::ONE);
        job.actual_total_cost = Some(Decimal::from(5));

        assert_eq!(
            job.settle_actual_total(),
            Err(ValidationError::new("actual_total_cost", "is out of range"))
        );
        assert_eq!(job.actual_total_cost, Some(Decimal::from(5)));
    }
}
