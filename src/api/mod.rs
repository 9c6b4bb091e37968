//! JSON-over-HTTP surface. Handlers are thin: decode, call [`ShopService`],
//! encode. Errors turn into responses through `AppError: IntoResponse`.

mod catalog;
mod clients;
mod crews;
mod error;
mod estimates;
mod extract;
mod inventory;
mod jobs;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, info_span, warn};

use crate::application::ShopService;
use crate::config::ServerConfig;

pub use error::ErrorResponse;
pub use extract::{Json, Path};

pub type AppState = Arc<ShopService>;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Body returned by successful deletes.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub(crate) fn deleted(entity: &str) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!("{entity} deleted"),
    })
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Build the application router with request tracing and request ids.
/// CORS is added by [`serve`].
pub fn router(service: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/clients", post(clients::create_client).get(clients::list_clients))
        .route(
            "/clients/:account_id",
            get(clients::get_client)
                .put(clients::update_client)
                .delete(clients::delete_client),
        )
        .route("/jobs", post(jobs::create_job).get(jobs::list_jobs))
        .route("/jobs/client/:client_account_id", get(jobs::list_jobs_for_client))
        .route(
            "/jobs/:job_id",
            get(jobs::get_job).put(jobs::update_job).delete(jobs::delete_job),
        )
        .route("/inventory", post(inventory::create_item).get(inventory::list_items))
        .route("/inventory/job/:job_id", get(inventory::list_items_for_job))
        .route(
            "/inventory/:item_id",
            get(inventory::get_item)
                .put(inventory::update_item)
                .delete(inventory::delete_item),
        )
        .route(
            "/estimates",
            post(estimates::create_estimate).get(estimates::list_estimates),
        )
        .route(
            "/estimates/:estimate_id",
            get(estimates::get_estimate)
                .put(estimates::update_estimate)
                .delete(estimates::delete_estimate),
        )
        .route("/estimates/:estimate_id/materials", post(estimates::add_material))
        .route(
            "/estimates/:estimate_id/materials/:material_id",
            delete(estimates::remove_material),
        )
        .route(
            "/estimates/:estimate_id/convert-to-job",
            post(estimates::convert_to_job),
        )
        .route(
            "/material-types",
            post(catalog::create_material_type).get(catalog::list_material_types),
        )
        .route(
            "/material-types/:type_id",
            get(catalog::get_material_type)
                .put(catalog::rename_material_type)
                .delete(catalog::delete_material_type),
        )
        .route("/vendors", post(catalog::create_vendor).get(catalog::list_vendors))
        .route(
            "/vendors/:vendor_id",
            get(catalog::get_vendor)
                .put(catalog::update_vendor)
                .delete(catalog::delete_vendor),
        )
        .route(
            "/materials",
            post(catalog::create_material).get(catalog::list_materials),
        )
        .route(
            "/materials/:material_id",
            get(catalog::get_material)
                .put(catalog::update_material)
                .delete(catalog::delete_material),
        )
        .route("/employees", post(crews::create_employee).get(crews::list_employees))
        .route(
            "/employees/:employee_id",
            get(crews::get_employee)
                .put(crews::update_employee)
                .delete(crews::delete_employee),
        )
        .route("/work-crews", post(crews::create_crew).get(crews::list_crews))
        .route(
            "/work-crews/:crew_id",
            get(crews::get_crew)
                .put(crews::update_crew)
                .delete(crews::delete_crew),
        )
        // Layers run bottom-up: the id is set first so the trace span sees it.
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(service)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            let trimmed = origin.trim();
            if trimmed.is_empty() {
                return None;
            }
            match HeaderValue::from_str(trimmed) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = trimmed, "ignoring invalid CORS origin");
                    None
                }
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Serve the API until Ctrl-C, then drain in-flight requests.
pub async fn serve(service: AppState, config: &ServerConfig) -> Result<()> {
    let app = router(service).layer(cors_layer(&config.cors_origins));

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!(address = %config.bind, origins = ?config.cors_origins, "shopledger listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(err) => {
            warn!(error = %err, "failed to listen for Ctrl-C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
