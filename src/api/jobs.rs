use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::application::AppError;
use crate::domain::{ClientId, Job};

use super::{AppState, Json, Path, deleted};

pub async fn create_job(
    State(service): State<AppState>,
    Json(payload): Json<Job>,
) -> Result<impl IntoResponse, AppError> {
    let job = service.create_job(payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn list_jobs(State(service): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.list_jobs().await?))
}

pub async fn list_jobs_for_client(
    State(service): State<AppState>,
    Path(client_account_id): Path<ClientId>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.list_jobs_for_client(client_account_id).await?))
}

pub async fn get_job(
    State(service): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.get_job(&job_id).await?))
}

pub async fn update_job(
    State(service): State<AppState>,
    Path(job_id): Path<String>,
    Json(payload): Json<Job>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.update_job(&job_id, payload).await?))
}

pub async fn delete_job(
    State(service): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    service.delete_job(&job_id).await?;
    Ok(deleted("Job"))
}
