use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::application::AppError;
use crate::domain::{MaterialId, MaterialInput, MaterialTypeId, MaterialTypeInput, VendorId, VendorInput};

use super::{AppState, Json, Path, deleted};

// Material types

pub async fn create_material_type(
    State(service): State<AppState>,
    Json(payload): Json<MaterialTypeInput>,
) -> Result<impl IntoResponse, AppError> {
    let material_type = service.create_material_type(payload).await?;
    Ok((StatusCode::CREATED, Json(material_type)))
}

pub async fn list_material_types(State(service): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.list_material_types().await?))
}

pub async fn get_material_type(
    State(service): State<AppState>,
    Path(type_id): Path<MaterialTypeId>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.get_material_type(type_id).await?))
}

pub async fn rename_material_type(
    State(service): State<AppState>,
    Path(type_id): Path<MaterialTypeId>,
    Json(payload): Json<MaterialTypeInput>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.rename_material_type(type_id, payload).await?))
}

pub async fn delete_material_type(
    State(service): State<AppState>,
    Path(type_id): Path<MaterialTypeId>,
) -> Result<impl IntoResponse, AppError> {
    service.delete_material_type(type_id).await?;
    Ok(deleted("Material type"))
}

// Vendors

pub async fn create_vendor(
    State(service): State<AppState>,
    Json(payload): Json<VendorInput>,
) -> Result<impl IntoResponse, AppError> {
    let vendor = service.create_vendor(payload).await?;
    Ok((StatusCode::CREATED, Json(vendor)))
}

pub async fn list_vendors(State(service): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.list_vendors().await?))
}

pub async fn get_vendor(
    State(service): State<AppState>,
    Path(vendor_id): Path<VendorId>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.get_vendor(vendor_id).await?))
}

pub async fn update_vendor(
    State(service): State<AppState>,
    Path(vendor_id): Path<VendorId>,
    Json(payload): Json<VendorInput>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.update_vendor(vendor_id, payload).await?))
}

pub async fn delete_vendor(
    State(service): State<AppState>,
    Path(vendor_id): Path<VendorId>,
) -> Result<impl IntoResponse, AppError> {
    service.delete_vendor(vendor_id).await?;
    Ok(deleted("Vendor"))
}

// Materials

pub async fn create_material(
    State(service): State<AppState>,
    Json(payload): Json<MaterialInput>,
) -> Result<impl IntoResponse, AppError> {
    let material = service.create_material(payload).await?;
    Ok((StatusCode::CREATED, Json(material)))
}

pub async fn list_materials(State(service): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.list_materials().await?))
}

pub async fn get_material(
    State(service): State<AppState>,
    Path(material_id): Path<MaterialId>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.get_material(material_id).await?))
}

pub async fn update_material(
    State(service): State<AppState>,
    Path(material_id): Path<MaterialId>,
    Json(payload): Json<MaterialInput>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(service.update_material(material_id, payload).await?))
}

pub async fn delete_material(
    State(service): State<AppState>,
    Path(material_id): Path<MaterialId>,
) -> Result<impl IntoResponse, AppError> {
    service.delete_material(material_id).await?;
    Ok(deleted("Material"))
}
