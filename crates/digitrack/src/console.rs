use crate::{AppResult, ConsoleCommand, controller::DetectionController};

use std::{sync::Arc, time::Duration};

use digitrack_core::{TrackerSnapshot, format_hms};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::watch,
    time::MissedTickBehavior,
};
use tracing::{error, info, instrument, warn};

const STATUS_INTERVAL: Duration = Duration::from_secs(1);

/// Terminal front end: stdin lines in, one status line per second out.
pub struct Console {
    controller: Arc<DetectionController>,
}

impl Console {
    /// Console driving `controller`.
    pub fn new(controller: Arc<DetectionController>) -> Self {
        Self { controller }
    }

    /// Read commands until stdin closes or shutdown is signalled.
    #[instrument(skip_all)]
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> AppResult<()> {
        info!("Console ready: type a production order to start, 'stop' to stop");

        let snapshots = self.controller.snapshots();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut ticker = tokio::time::interval(STATUS_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,

                _ = ticker.tick() => {
                    let snapshot = snapshots.borrow().clone();
                    if snapshot.production_order.is_some() {
                        info!("{}", status_line(&snapshot));
                    }
                }

                line = lines.next_line() => match line? {
                    Some(line) => self.handle_line(&line).await,
                    None => {
                        info!("Console input closed");
                        break;
                    }
                },
            }
        }

        Ok(())
    }

    async fn handle_line(&self, line: &str) {
        let Some(command) = ConsoleCommand::parse(line) else {
            return;
        };

        match command {
            ConsoleCommand::Start { production_order } => {
                match self.controller.start(&production_order).await {
                    Ok(report) => info!(
                        session_id = %report.session_id,
                        production_order = %report.production_order,
                        "Detection started"
                    ),
                    Err(e) => error!(error = %e, "Failed to start detection"),
                }
            }
            ConsoleCommand::Stop => match self.controller.stop().await {
                Ok(report) if report.saved() => info!(
                    total_time = %report.total_time(),
                    from = %report.start_time(),
                    to = %report.stop_time(),
                    csv_file = %report.csv_file,
                    "Detection stopped and data saved"
                ),
                Ok(_) => warn!("Detection already stopped"),
                Err(e) => error!(error = %e, "Failed to stop detection"),
            },
        }
    }
}

/// One-line human summary of a snapshot.
pub fn status_line(snapshot: &TrackerSnapshot) -> String {
    let started = snapshot
        .started_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let inactivity = snapshot
        .last_inactivity
        .map(|w| format!("{} - {}", w.from.format("%H:%M:%S"), w.to.format("%H:%M:%S")))
        .unwrap_or_else(|| "-".to_string());

    let mut line = format!(
        "[{}] {} | hands: {} | people: {} | active: {} | started: {} | last inactivity: {}",
        snapshot.production_order.as_deref().unwrap_or("-"),
        snapshot.status.as_str(),
        snapshot.hand_count,
        snapshot.people_estimate,
        format_hms(snapshot.active_seconds),
        started,
        inactivity,
    );

    if let Some(diagnostic) = &snapshot.diagnostic {
        line.push_str(" | ");
        line.push_str(diagnostic);
    }

    line
}
