//! HTTP front end.
//!
//! Routes map one-to-one onto [`DetectionController`] operations. The
//! optional static directory is served as the fallback so the browser
//! page and the API share one origin.

pub(crate) mod handlers;
mod responses;

pub(crate) use responses::{
    ApiError, StartRequest, StartResponse, StopResponse, TotalTimeResponse,
};

use crate::{AppError, AppResult, controller::DetectionController};

use std::{panic::Location, path::Path, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use error_location::ErrorLocation;
use tokio::{net::TcpListener, sync::watch};
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;

/// MJPEG part separator.
pub(crate) const FRAME_BOUNDARY: &str = "frame";

/// Build the application router.
pub(crate) fn router(controller: Arc<DetectionController>, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/start_detection", post(handlers::start_detection))
        .route("/stop_detection", post(handlers::stop_detection))
        .route("/video_feed", get(handlers::video_feed))
        .route("/total_time", get(handlers::total_time))
        .with_state(controller);

    let router = match static_dir {
        Some(dir) => {
            info!(static_dir = ?dir, "Serving browser front end");
            router.fallback_service(ServeDir::new(dir))
        }
        None => router,
    };

    router.layer(CorsLayer::permissive())
}

/// Serve until `shutdown` is signalled.
pub(crate) async fn serve(
    listener: TcpListener,
    router: Router,
    mut shutdown: watch::Receiver<bool>,
) -> AppResult<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown.changed().await;
        })
        .await
        .map_err(|e| AppError::ServerError {
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
}
