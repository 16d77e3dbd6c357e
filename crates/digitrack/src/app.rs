use crate::{
    AppError, AppResult, Console,
    config::Config,
    controller::{DetectionController, DetectorFactory},
    http,
};

use std::{panic::Location, sync::Arc};

use digitrack_core::{CsvRecorder, HandDetector, ScriptedDetector, SyntheticCameraOpener};
use error_location::ErrorLocation;
use tokio::{net::TcpListener, sync::watch};
use tracing::{error, info, instrument};

/// Main application state.
///
/// Owns the controller shared by the HTTP and console front ends and
/// coordinates shutdown between them.
pub struct App {
    pub(crate) config: Config,
    pub(crate) controller: Arc<DetectionController>,
}

impl App {
    /// Wire the built-in camera, detector, and CSV recorder from `config`.
    #[track_caller]
    pub(crate) fn new(config: Config) -> AppResult<Self> {
        let thresholds = config.thresholds()?;

        let opener = SyntheticCameraOpener::new(config.camera.width, config.camera.height);

        let script = config.detector.script.clone();
        let detector_factory: DetectorFactory = Arc::new(move || {
            Box::new(ScriptedDetector::new(script.clone())) as Box<dyn HandDetector>
        });

        let recorder = CsvRecorder::new(&config.storage.csv_path);
        info!(csv_path = ?recorder.path(), "Session records will be appended here");

        let controller = DetectionController::new(
            thresholds,
            config.worker_settings(),
            Arc::new(opener),
            detector_factory,
            Arc::new(recorder),
        );

        Ok(Self {
            config,
            controller: Arc::new(controller),
        })
    }

    /// Serve until Ctrl-C or a fatal server error.
    #[instrument(skip(self))]
    pub(crate) async fn run(self) -> AppResult<()> {
        info!("DigiTrack starting");

        let listener = TcpListener::bind(self.config.server.bind_addr())
            .await
            .map_err(|e| AppError::ServerError {
                reason: format!("Failed to bind {}: {}", self.config.server.bind_addr(), e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(url = %self.config.server_url(), "HTTP front end listening");

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let router = http::router(
            Arc::clone(&self.controller),
            self.config.server.static_dir.as_deref(),
        );
        let mut server = tokio::spawn(http::serve(listener, router, shutdown_rx.clone()));

        let console = self.config.console.enabled.then(|| {
            let console = Console::new(Arc::clone(&self.controller));
            tokio::spawn(console.run(shutdown_rx.clone()))
        });

        let server_result = tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                match signal {
                    Ok(()) => info!("Shutdown requested"),
                    Err(e) => error!(error = %e, "Failed to listen for Ctrl-C, shutting down"),
                }
                None
            }
            result = &mut server => Some(result),
        };

        // Stop the worker first so open MJPEG streams end and the server
        // can drain.
        self.controller.shutdown().await;
        let _ = shutdown_tx.send(true);

        let server_result = match server_result {
            Some(result) => result,
            None => server.await,
        };

        if let Some(console) = console {
            match console.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(error = %e, "Console front end failed"),
                Err(e) => error!(error = %e, "Console task panicked"),
            }
        }

        match server_result {
            Ok(result) => result?,
            Err(e) => {
                return Err(AppError::ServerError {
                    reason: format!("Server task failed: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        info!("DigiTrack shut down successfully");

        Ok(())
    }
}
