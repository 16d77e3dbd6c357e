use crate::{
    controller::DetectionController,
    http::{
        ApiError, FRAME_BOUNDARY, StartRequest, StartResponse, StopResponse, TotalTimeResponse,
    },
};

use std::{convert::Infallible, sync::Arc};

use axum::{
    Json,
    body::{Body, Bytes},
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use digitrack_core::JpegFrame;
use tokio_stream::{StreamExt, wrappers::WatchStream};
use tracing::{debug, instrument};

#[instrument(skip_all)]
pub(crate) async fn start_detection(
    State(controller): State<Arc<DetectionController>>,
    body: Bytes,
) -> Result<Json<StartResponse>, ApiError> {
    let request = match serde_json::from_slice::<StartRequest>(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "Unreadable start request body");
            StartRequest::default()
        }
    };

    let production_order = request.production_order.unwrap_or_default();
    let started = controller.start(&production_order).await?;

    Ok(Json(StartResponse {
        message: "Detection started",
        production_order: started.production_order,
    }))
}

#[instrument(skip_all)]
pub(crate) async fn stop_detection(
    State(controller): State<Arc<DetectionController>>,
) -> Result<Json<StopResponse>, ApiError> {
    let report = controller.stop().await?;
    Ok(Json(report.into()))
}

pub(crate) async fn total_time(
    State(controller): State<Arc<DetectionController>>,
) -> Json<TotalTimeResponse> {
    Json(controller.snapshot().into())
}

/// MJPEG stream while a worker runs; empty body otherwise.
///
/// Starts from the frame current at request time and ends when the
/// worker clears the feed.
#[instrument(skip_all)]
pub(crate) async fn video_feed(State(controller): State<Arc<DetectionController>>) -> Response {
    if !controller.is_running().await {
        return Body::empty().into_response();
    }

    let frames = controller.frames();
    let current = frames.borrow().clone();

    let parts = tokio_stream::once(current)
        .chain(WatchStream::from_changes(frames))
        .skip_while(Option::is_none)
        .take_while(Option::is_some)
        .filter_map(|frame| frame.map(|jpeg| Ok::<_, Infallible>(multipart_part(&jpeg))));

    (
        [(
            header::CONTENT_TYPE,
            format!("multipart/x-mixed-replace; boundary={FRAME_BOUNDARY}"),
        )],
        Body::from_stream(parts),
    )
        .into_response()
}

pub(crate) fn multipart_part(jpeg: &JpegFrame) -> Vec<u8> {
    let header = format!("--{FRAME_BOUNDARY}\r\nContent-Type: image/jpeg\r\n\r\n");
    let mut part = Vec::with_capacity(header.len() + jpeg.len() + 2);
    part.extend_from_slice(header.as_bytes());
    part.extend_from_slice(jpeg);
    part.extend_from_slice(b"\r\n");
    part
}
