use chrono::Utc;
use sqlx::sqlite::SqliteConnection;
use tracing::{debug, info};

use crate::domain::{
    ConvertToJob, Estimate, EstimateTotals, EstimateId, EstimateInput, EstimateMaterial, EstimateMaterialId,
    EstimateMaterialInput, Job,
};
use crate::storage::{clients, estimates, jobs};

use super::jobs::check_job_references;
use super::{AppError, ShopService};

const ENTITY: &str = "Estimate";

impl ShopService {
    /// Create an estimate. Its totals are derived from hours and rate, as it
    /// has no line items yet.
    pub async fn create_estimate(&self, input: EstimateInput) -> Result<Estimate, AppError> {
        input.validate()?;

        let mut write = self.begin_write().await?;
        if !clients::exists(&mut write.tx, input.client_id).await? {
            return Err(AppError::invalid_reference("Client", input.client_id));
        }
        let id = estimates::insert(&mut write.tx, &input, Utc::now()).await?;
        let estimate = recompute_and_load(&mut write.tx, id).await?;
        write.commit().await?;

        info!(
            estimate_id = id,
            client = estimate.client_id,
            total = %estimate.total_estimate_cost,
            "created estimate"
        );
        Ok(estimate)
    }

    pub async fn list_estimates(&self) -> Result<Vec<Estimate>, AppError> {
        let mut conn = self.repo.acquire().await?;
        Ok(estimates::list(&mut conn).await?)
    }

    pub async fn get_estimate(&self, id: EstimateId) -> Result<Estimate, AppError> {
        let mut conn = self.repo.acquire().await?;
        estimates::get(&mut conn, id)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY, id))
    }

    /// Replace the editable fields of an estimate and re-derive its totals.
    pub async fn update_estimate(&self, id: EstimateId, input: EstimateInput) -> Result<Estimate, AppError> {
        input.validate()?;

        let mut write = self.begin_write().await?;
        if !estimates::exists(&mut write.tx, id).await? {
            return Err(AppError::not_found(ENTITY, id));
        }
        if !clients::exists(&mut write.tx, input.client_id).await? {
            return Err(AppError::invalid_reference("Client", input.client_id));
        }
        estimates::update(&mut write.tx, id, &input).await?;
        let estimate = recompute_and_load(&mut write.tx, id).await?;
        write.commit().await?;

        info!(estimate_id = id, status = %estimate.status, total = %estimate.total_estimate_cost, "updated estimate");
        Ok(estimate)
    }

    /// Delete an estimate and all of its line items.
    pub async fn delete_estimate(&self, id: EstimateId) -> Result<(), AppError> {
        let mut write = self.begin_write().await?;
        if !estimates::delete(&mut write.tx, id).await? {
            return Err(AppError::not_found(ENTITY, id));
        }
        write.commit().await?;

        info!(estimate_id = id, "deleted estimate");
        Ok(())
    }

    /// Add a line item and re-derive the estimate's totals.
    pub async fn add_estimate_material(
        &self,
        estimate_id: EstimateId,
        input: EstimateMaterialInput,
    ) -> Result<EstimateMaterial, AppError> {
        input.validate()?;
        let total_cost = input.total_cost()?;

        let mut write = self.begin_write().await?;
        if !estimates::exists(&mut write.tx, estimate_id).await? {
            return Err(AppError::not_found(ENTITY, estimate_id));
        }
        let line = estimates::insert_material(&mut write.tx, estimate_id, &input, total_cost).await?;
        recompute(&mut write.tx, estimate_id).await?;
        write.commit().await?;

        info!(estimate_id, material_id = line.material_id, total_cost = %line.total_cost, "added estimate material");
        Ok(line)
    }

    /// Remove a line item from the estimate it belongs to and re-derive the
    /// estimate's totals.
    pub async fn remove_estimate_material(
        &self,
        estimate_id: EstimateId,
        material_id: EstimateMaterialId,
    ) -> Result<(), AppError> {
        let mut write = self.begin_write().await?;
        if !estimates::delete_material(&mut write.tx, estimate_id, material_id).await? {
            return Err(AppError::not_found(
                "EstimateMaterial",
                format!("{material_id} on estimate {estimate_id}"),
            ));
        }
        recompute(&mut write.tx, estimate_id).await?;
        write.commit().await?;

        info!(estimate_id, material_id, "removed estimate material");
        Ok(())
    }

    /// Turn an accepted estimate into a job for the same client. The job's
    /// cost estimate is the estimate's current total; the estimate itself is
    /// left as it is.
    pub async fn convert_estimate_to_job(
        &self,
        estimate_id: EstimateId,
        fields: ConvertToJob,
    ) -> Result<Job, AppError> {
        let mut write = self.begin_write().await?;
        let estimate = estimates::get(&mut write.tx, estimate_id)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY, estimate_id))?;

        if !estimate.is_accepted() {
            return Err(AppError::InvalidState(format!(
                "Estimate {estimate_id} must be accepted before conversion (status: {})",
                estimate.status
            )));
        }

        let mut job = fields.into_job(estimate.client_id, estimate.total_estimate_cost);
        job.job_id = job.job_id.trim().to_string();
        job.validate()?;

        if jobs::exists(&mut write.tx, &job.job_id).await? {
            return Err(AppError::conflict("Job", &job.job_id));
        }
        check_job_references(&mut write.tx, &job).await?;
        jobs::insert(&mut write.tx, &job).await?;
        write.commit().await?;

        info!(
            estimate_id,
            job_id = %job.job_id,
            cost_estimate = %job.cost_estimate,
            "converted estimate to job"
        );
        Ok(job)
    }
}

/// Re-derive an estimate's totals from its current hours, rate and line
/// items. Totals that overflow reject the whole write.
async fn recompute(conn: &mut SqliteConnection, id: EstimateId) -> Result<(), AppError> {
    let (hours, rate) = estimates::labour(conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))?;
    let lines = estimates::list_materials(conn, id).await?;
    let totals = EstimateTotals::compute(hours, rate, &lines)?;
    estimates::store_totals(conn, id, &totals, Utc::now()).await?;
    debug!(
        estimate_id = id,
        materials = %totals.total_materials_cost,
        hourly = %totals.total_hourly_cost,
        total = %totals.total_estimate_cost,
        "recomputed estimate totals"
    );
    Ok(())
}

async fn recompute_and_load(conn: &mut SqliteConnection, id: EstimateId) -> Result<Estimate, AppError> {
    recompute(conn, id).await?;
    estimates::get(conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(ENTITY, id))
}
