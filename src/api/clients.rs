use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::application::AppError;
use crate::domain::{ClientId, ClientInput};

use super::{AppState, Json, Path, deleted};

pub async fn create_client(
    State(service): State<AppState>,
    Json(payload): Json<ClientInput>,
) -> Result<impl IntoResponse, AppError> {
    let client = service.create_client(payload).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn list_clients(State(service): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.list_clients().await?))
}

pub async fn get_client(
    State(service): State<AppState>,
    Path(account_id): Path<ClientId>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.get_client(account_id).await?))
}

pub async fn update_client(
    State(service): State<AppState>,
    Path(account_id): Path<ClientId>,
    Json(payload): Json<ClientInput>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.update_client(account_id, payload).await?))
}

pub async fn delete_client(
    State(service): State<AppState>,
    Path(account_id): Path<ClientId>,
) -> Result<impl IntoResponse, AppError> {
    service.delete_client(account_id).await?;
    Ok(deleted("Client"))
}
