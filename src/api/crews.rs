use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::application::AppError;
use crate::domain::{CrewId, EmployeeId, EmployeeInput, WorkCrewInput};

use super::{AppState, Json, Path, deleted};

pub async fn create_employee(
    State(service): State<AppState>,
    Json(payload): Json<EmployeeInput>,
) -> Result<impl IntoResponse, AppError> {
    let employee = service.create_employee(payload).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn list_employees(State(service): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.list_employees().await?))
}

pub async fn get_employee(
    State(service): State<AppState>,
    Path(employee_id): Path<EmployeeId>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.get_employee(employee_id).await?))
}

pub async fn update_employee(
    State(service): State<AppState>,
    Path(employee_id): Path<EmployeeId>,
    Json(payload): Json<EmployeeInput>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.update_employee(employee_id, payload).await?))
}

pub async fn delete_employee(
    State(service): State<AppState>,
    Path(employee_id): Path<EmployeeId>,
) -> Result<impl IntoResponse, AppError> {
    service.delete_employee(employee_id).await?;
    Ok(deleted("Employee"))
}

pub async fn create_crew(
    State(service): State<AppState>,
    Json(payload): Json<WorkCrewInput>,
) -> Result<impl IntoResponse, AppError> {
    let crew = service.create_work_crew(payload).await?;
    Ok((StatusCode::CREATED, Json(crew)))
}

pub async fn list_crews(State(service): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.list_work_crews().await?))
}

pub async fn get_crew(
    State(service): State<AppState>,
    Path(crew_id): Path<CrewId>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.get_work_crew(crew_id).await?))
}

pub async fn update_crew(
    State(service): State<AppState>,
    Path(crew_id): Path<CrewId>,
    Json(payload): Json<WorkCrewInput>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.update_work_crew(crew_id, payload).await?))
}

pub async fn delete_crew(
    State(service): State<AppState>,
    Path(crew_id): Path<CrewId>,
) -> Result<impl IntoResponse, AppError> {
    service.delete_work_crew(crew_id).await?;
    Ok(deleted("Work crew"))
}
