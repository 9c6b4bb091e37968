use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tracing::info;

use crate::application::AppError;
use crate::domain::{ConvertToJob, EstimateId, EstimateInput, EstimateMaterialId, EstimateMaterialInput};

use super::{AppState, Json, Path, deleted};

pub async fn create_estimate(
    State(service): State<AppState>,
    Json(payload): Json<EstimateInput>,
) -> Result<impl IntoResponse, AppError> {
    let estimate = service.create_estimate(payload).await?;
    Ok((StatusCode::CREATED, Json(estimate)))
}

pub async fn list_estimates(State(service): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.list_estimates().await?))
}

pub async fn get_estimate(
    State(service): State<AppState>,
    Path(estimate_id): Path<EstimateId>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.get_estimate(estimate_id).await?))
}

pub async fn update_estimate(
    State(service): State<AppState>,
    Path(estimate_id): Path<EstimateId>,
    Json(payload): Json<EstimateInput>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.update_estimate(estimate_id, payload).await?))
}

pub async fn delete_estimate(
    State(service): State<AppState>,
    Path(estimate_id): Path<EstimateId>,
) -> Result<impl IntoResponse, AppError> {
    service.delete_estimate(estimate_id).await?;
    Ok(deleted("Estimate"))
}

pub async fn add_material(
    State(service): State<AppState>,
    Path(estimate_id): Path<EstimateId>,
    Json(payload): Json<EstimateMaterialInput>,
) -> Result<impl IntoResponse, AppError> {
    let line = service.add_estimate_material(estimate_id, payload).await?;
    Ok((StatusCode::CREATED, Json(line)))
}

pub async fn remove_material(
    State(service): State<AppState>,
    Path((estimate_id, material_id)): Path<(EstimateId, EstimateMaterialId)>,
) -> Result<impl IntoResponse, AppError> {
    service.remove_estimate_material(estimate_id, material_id).await?;
    Ok(deleted("Material"))
}

pub async fn convert_to_job(
    State(service): State<AppState>,
    Path(estimate_id): Path<EstimateId>,
    Json(payload): Json<ConvertToJob>,
) -> Result<impl IntoResponse, AppError> {
    info!(estimate_id, job_id = %payload.job_id, "converting estimate");
    let job = service.convert_estimate_to_job(estimate_id, payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}
