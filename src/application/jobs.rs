use sqlx::sqlite::SqliteConnection;
use tracing::info;

use crate::domain::{ClientId, Job};
use crate::storage::{clients, crews, inventory, jobs};

use super::{AppError, ShopService};

const ENTITY: &str = "Job";

impl ShopService {
    /// Create a job under a caller-chosen id.
    pub async fn create_job(&self, mut job: Job) -> Result<Job, AppError> {
        job.job_id = job.job_id.trim().to_string();
        job.validate()?;
        job.settle_actual_total()?;

        let mut write = self.begin_write().await?;
        if jobs::exists(&mut write.tx, &job.job_id).await? {
            return Err(AppError::conflict(ENTITY, &job.job_id));
        }
        check_job_references(&mut write.tx, &job).await?;
        jobs::insert(&mut write.tx, &job).await?;
        write.commit().await?;

        info!(job_id = %job.job_id, client = job.client_account_id, "created job");
        Ok(job)
    }

    pub async fn list_jobs(&self) -> Result<Vec<Job>, AppError> {
        let mut conn = self.repo.acquire().await?;
        Ok(jobs::list(&mut conn).await?)
    }

    pub async fn list_jobs_for_client(&self, client_id: ClientId) -> Result<Vec<Job>, AppError> {
        let mut conn = self.repo.acquire().await?;
        Ok(jobs::list_for_client(&mut conn, client_id).await?)
    }

    pub async fn get_job(&self, job_id: &str) -> Result<Job, AppError> {
        let mut conn = self.repo.acquire().await?;
        jobs::get(&mut conn, job_id)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY, job_id))
    }

    /// Replace every field of a job. The id is taken from `job_id`, never
    /// from the body. Actual total cost is re-derived when hours and rate
    /// are both present.
    pub async fn update_job(&self, job_id: &str, mut job: Job) -> Result<Job, AppError> {
        job.job_id = job_id.to_string();
        job.validate()?;
        job.settle_actual_total()?;

        let mut write = self.begin_write().await?;
        if !jobs::exists(&mut write.tx, job_id).await? {
            return Err(AppError::not_found(ENTITY, job_id));
        }
        check_job_references(&mut write.tx, &job).await?;
        jobs::update(&mut write.tx, job_id, &job).await?;
        write.commit().await?;

        info!(job_id, status = %job.status, "updated job");
        Ok(job)
    }

    /// Delete a job. Inventory held for it is released, not deleted.
    pub async fn delete_job(&self, job_id: &str) -> Result<(), AppError> {
        let mut write = self.begin_write().await?;
        if !jobs::exists(&mut write.tx, job_id).await? {
            return Err(AppError::not_found(ENTITY, job_id));
        }
        let released = inventory::unassign_job(&mut write.tx, job_id).await?;
        jobs::delete(&mut write.tx, job_id).await?;
        write.commit().await?;

        info!(job_id, released, "deleted job");
        Ok(())
    }
}

/// The job's client, and crew if one is set, must exist.
pub(super) async fn check_job_references(conn: &mut SqliteConnection, job: &Job) -> Result<(), AppError> {
    if !clients::exists(conn, job.client_account_id).await? {
        return Err(AppError::invalid_reference("Client", job.client_account_id));
    }
    if let Some(crew_id) = job.crew_id {
        if !crews::crew_exists(conn, crew_id).await? {
            return Err(AppError::invalid_reference("WorkCrew", crew_id));
        }
    }
    Ok(())
}
