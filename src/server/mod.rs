//! HTTP facade over the label store.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /` | labeling page |
//! | `GET /first_image` | first image and its boxes |
//! | `GET /next_image?image_index=N` | following image, wrapping to the first |
//! | `GET /prev_image?image_index=N` | preceding image, wrapping to the last |
//! | `POST /save_box` | append a box |
//! | `POST /delete_box` | remove the first matching box |
//! | `GET /assets/*path` | static assets |
//! | `GET /images/:filename` | image bytes |

pub mod api;
mod handlers;
mod static_files;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::store::LabelStore;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<LabelStore>>,
    pub assets_dir: PathBuf,
    pub templates_dir: PathBuf,
}

impl AppState {
    pub fn new(
        store: LabelStore,
        assets_dir: impl Into<PathBuf>,
        templates_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            assets_dir: assets_dir.into(),
            templates_dir: templates_dir.into(),
        }
    }
}

/// Build the router with all endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(static_files::index_page))
        .route("/first_image", get(handlers::first_image))
        .route("/next_image", get(handlers::next_image))
        .route("/prev_image", get(handlers::prev_image))
        .route("/save_box", post(handlers::save_box))
        .route("/delete_box", post(handlers::delete_box))
        .route("/assets/*path", get(static_files::asset_file))
        .route("/images/:filename", get(static_files::image_file))
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("Listening on http://{}", addr);
    }
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Shutting down"),
        Err(e) => {
            log::warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
