use crate::{AppError, controller::StopReport};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use digitrack_core::{ActivityStatus, TrackerSnapshot};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Body of `POST /start_detection`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct StartRequest {
    #[serde(default)]
    pub(crate) production_order: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StartResponse {
    pub(crate) message: &'static str,
    pub(crate) production_order: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct StopResponse {
    pub(crate) message: &'static str,
    pub(crate) csv_file: String,
    pub(crate) total_time: String,
    pub(crate) start_time: String,
    pub(crate) stop_time: String,
    /// Always null: no order is active after a stop.
    pub(crate) production_order: Option<String>,
}

impl From<StopReport> for StopResponse {
    fn from(report: StopReport) -> Self {
        let message = if report.saved() {
            "Detection stopped and data saved"
        } else {
            "Detection already stopped"
        };

        Self {
            message,
            total_time: report.total_time(),
            start_time: report.start_time(),
            stop_time: report.stop_time(),
            csv_file: report.csv_file,
            production_order: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TotalTimeResponse {
    /// Whole seconds, rounded.
    pub(crate) total_time: u64,
    pub(crate) production_order: Option<String>,
    pub(crate) status: ActivityStatus,
}

impl From<TrackerSnapshot> for TotalTimeResponse {
    fn from(snapshot: TrackerSnapshot) -> Self {
        Self {
            total_time: snapshot.active_seconds.max(0.0).round() as u64,
            production_order: snapshot.production_order,
            status: snapshot.status,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`AppError`] onto a JSON error response.
#[derive(Debug)]
pub(crate) struct ApiError(pub(crate) AppError);

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = if self.0.is_client_error() {
            (StatusCode::BAD_REQUEST, "Production order is required".to_string())
        } else {
            error!(error = %self.0, "Request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string())
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
