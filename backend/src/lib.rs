//! # Gift tracker backend
//!
//! Non-UI logic for the birthday gift tracker, layered the same way at
//! every seam:
//!
//! - **storage**: SQLite persistence for kids and gifts
//! - **domain**: validation, merge-update semantics, date arithmetic, and
//!   the derived reminder/checklist views
//! - **io**: the REST surface consumed by the frontend
//!
//! `AppState` carries one handle per service; the router in
//! [`create_router`] wires them to `/api` routes.

pub mod domain;
pub mod io;
pub mod storage;

use std::env;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::domain::{ChecklistService, GiftService, KidService, ReminderService};
use crate::storage::DbConnection;

/// Photo uploads arrive as multipart bodies; allow up to 10 MiB.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Main application state that holds all services.
#[derive(Clone)]
pub struct AppState {
    pub kid_service: KidService,
    pub gift_service: GiftService,
    pub reminder_service: ReminderService,
    pub checklist_service: ChecklistService,
}

/// Runtime configuration, read from the environment with defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_origin: String,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url =
            env::var("GIFT_TRACKER_DB").unwrap_or_else(|_| "sqlite:gifts.db".to_string());
        let port = env::var("GIFT_TRACKER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        let cors_origin = env::var("GIFT_TRACKER_CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());

        Self {
            database_url,
            port,
            cors_origin,
        }
    }
}

/// Initialize the backend with all required services.
pub async fn initialize_backend(database_url: &str) -> anyhow::Result<AppState> {
    info!("Setting up database: {}", database_url);
    let db = DbConnection::new(database_url).await?;

    info!("Setting up domain services");
    Ok(AppState {
        kid_service: KidService::new(db.clone()),
        gift_service: GiftService::new(db.clone()),
        reminder_service: ReminderService::new(db.clone()),
        checklist_service: ChecklistService::new(db),
    })
}

/// Create the axum router with all routes configured.
pub fn create_router(app_state: AppState, cors_origin: &str) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/kids", get(io::list_kids).post(io::create_kid))
        .route(
            "/kids/:kid_id",
            get(io::get_kid).put(io::update_kid).delete(io::delete_kid),
        )
        .route("/gifts", get(io::list_gifts).post(io::create_gift))
        .route(
            "/gifts/:gift_id",
            get(io::get_gift).put(io::update_gift).delete(io::delete_gift),
        )
        .route("/gifts/kid/:kid_id", get(io::list_gifts_for_kid))
        .route("/reminders", get(io::get_reminders))
        .route("/checklist/:year", get(io::get_checklist))
        .route("/checklist/:kid_id/:year/toggle", post(io::toggle_christmas_gift))
        .route("/upload", post(io::upload_image));

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(app_state))
}

/// Application state backed by a fresh in-memory database.
#[cfg(test)]
pub async fn initialize_test_state() -> AppState {
    let db = DbConnection::init_test().await.expect("Failed to create test database");
    AppState {
        kid_service: KidService::new(db.clone()),
        gift_service: GiftService::new(db.clone()),
        reminder_service: ReminderService::new(db.clone()),
        checklist_service: ChecklistService::new(db),
    }
}
