mod format;
mod thresholds;
