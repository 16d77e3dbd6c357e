mod cadence;
mod pipeline;

pub use {
    cadence::FrameCadence,
    pipeline::{DetectionWorker, WorkerChannels, WorkerExit, WorkerOutcome, WorkerSettings},
};
