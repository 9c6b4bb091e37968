use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::application::AppError;
use crate::domain::{InventoryItemInput, ItemId};

use super::{AppState, Json, Path, deleted};

pub async fn create_item(
    State(service): State<AppState>,
    Json(payload): Json<InventoryItemInput>,
) -> Result<impl IntoResponse, AppError> {
    let item = service.create_inventory_item(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn list_items(State(service): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.list_inventory().await?))
}

pub async fn list_items_for_job(
    State(service): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.list_inventory_for_job(&job_id).await?))
}

pub async fn get_item(
    State(service): State<AppState>,
    Path(item_id): Path<ItemId>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.get_inventory_item(item_id).await?))
}

pub async fn update_item(
    State(service): State<AppState>,
    Path(item_id): Path<ItemId>,
    Json(payload): Json<InventoryItemInput>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.update_inventory_item(item_id, payload).await?))
}

pub async fn delete_item(
    State(service): State<AppState>,
    Path(item_id): Path<ItemId>,
) -> Result<impl IntoResponse, AppError> {
    service.delete_inventory_item(item_id).await?;
    Ok(deleted("Item"))
}
