use anyhow::{Context, Result};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnection, SqliteRow};

use crate::domain::{ClientId, CrewId, Job};

use super::repository::{amount_column, amount_param, date_column, optional_amount_column, optional_amount_param};

/// Save a new job. The caller has already checked `job_id` is free.
pub async fn insert(conn: &mut SqliteConnection, job: &Job) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO jobs (job_id, client_account_id, crew_id, address, scheduled_date, cost_estimate,
                          actual_hours, actual_hourly_rate, actual_materials_cost, actual_total_cost, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&job.job_id)
    .bind(job.client_account_id)
    .bind(job.crew_id)
    .bind(&job.address)
    .bind(job.scheduled_date.to_string())
    .bind(amount_param(job.cost_estimate))
    .bind(optional_amount_param(job.actual_hours))
    .bind(optional_amount_param(job.actual_hourly_rate))
    .bind(optional_amount_param(job.actual_materials_cost))
    .bind(optional_amount_param(job.actual_total_cost))
    .bind(&job.status)
    .execute(&mut *conn)
    .await
    .context("Failed to save job")?;
    Ok(())
}

pub async fn get(conn: &mut SqliteConnection, job_id: &str) -> Result<Option<Job>> {
    let row = sqlx::query(
        r#"
        SELECT job_id, client_account_id, crew_id, address, scheduled_date, cost_estimate,
               actual_hours, actual_hourly_rate, actual_materials_cost, actual_total_cost, status
        FROM jobs
        WHERE job_id = ?
        "#,
    )
    .bind(job_id)
    .fetch_optional(&mut *conn)
    .await
    .context("Failed to fetch job")?;

    row.as_ref().map(row_to_job).transpose()
}

pub async fn exists(conn: &mut SqliteConnection, job_id: &str) -> Result<bool> {
    Ok(sqlx::query("SELECT 1 FROM jobs WHERE job_id = ?")
        .bind(job_id)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to look up job")?
        .is_some())
}

/// List all jobs, latest scheduled first.
pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Job>> {
    let rows = sqlx::query(
        r#"
        SELECT job_id, client_account_id, crew_id, address, scheduled_date, cost_estimate,
               actual_hours, actual_hourly_rate, actual_materials_cost, actual_total_cost, status
        FROM jobs
        ORDER BY scheduled_date DESC, job_id
        "#,
    )
    .fetch_all(&mut *conn)
    .await
    .context("Failed to list jobs")?;

    rows.iter().map(row_to_job).collect()
}

pub async fn list_for_client(conn: &mut SqliteConnection, client_id: ClientId) -> Result<Vec<Job>> {
    let rows = sqlx::query(
        r#"
        SELECT job_id, client_account_id, crew_id, address, scheduled_date, cost_estimate,
               actual_hours, actual_hourly_rate, actual_materials_cost, actual_total_cost, status
        FROM jobs
        WHERE client_account_id = ?
        ORDER BY scheduled_date DESC, job_id
        "#,
    )
    .bind(client_id)
    .fetch_all(&mut *conn)
    .await
    .context("Failed to list jobs for client")?;

    rows.iter().map(row_to_job).collect()
}

/// Overwrite every field of the job named by `job_id`.
pub async fn update(conn: &mut SqliteConnection, job_id: &str, job: &Job) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE jobs
        SET client_account_id = ?, crew_id = ?, address = ?, scheduled_date = ?, cost_estimate = ?,
            actual_hours = ?, actual_hourly_rate = ?, actual_materials_cost = ?, actual_total_cost = ?,
            status = ?
        WHERE job_id = ?
        "#,
    )
    .bind(job.client_account_id)
    .bind(job.crew_id)
    .bind(&job.address)
    .bind(job.scheduled_date.to_string())
    .bind(amount_param(job.cost_estimate))
    .bind(optional_amount_param(job.actual_hours))
    .bind(optional_amount_param(job.actual_hourly_rate))
    .bind(optional_amount_param(job.actual_materials_cost))
    .bind(optional_amount_param(job.actual_total_cost))
    .bind(&job.status)
    .bind(job_id)
    .execute(&mut *conn)
    .await
    .context("Failed to update job")?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(conn: &mut SqliteConnection, job_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM jobs WHERE job_id = ?")
        .bind(job_id)
        .execute(&mut *conn)
        .await
        .context("Failed to delete job")?;

    Ok(result.rows_affected() > 0)
}

/// Detach every job from a crew that is going away.
pub async fn clear_crew(conn: &mut SqliteConnection, crew_id: CrewId) -> Result<u64> {
    let result = sqlx::query("UPDATE jobs SET crew_id = NULL WHERE crew_id = ?")
        .bind(crew_id)
        .execute(&mut *conn)
        .await
        .context("Failed to clear crew from jobs")?;

    Ok(result.rows_affected())
}

fn row_to_job(row: &SqliteRow) -> Result<Job> {
    Ok(Job {
        job_id: row.get("job_id"),
        client_account_id: row.get("client_account_id"),
        crew_id: row.get("crew_id"),
        address: row.get("address"),
        scheduled_date: date_column(row, "scheduled_date")?,
        cost_estimate: amount_column(row, "cost_estimate")?,
        actual_hours: optional_amount_column(row, "actual_hours")?,
        actual_hourly_rate: optional_amount_column(row, "actual_hourly_rate")?,
        actual_materials_cost: optional_amount_column(row, "actual_materials_cost")?,
        actual_total_cost: optional_amount_column(row, "actual_total_cost")?,
        status: row.get("status"),
    })
}
