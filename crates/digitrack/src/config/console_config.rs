use serde::{Deserialize, Serialize};

/// Terminal front end configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Read order ids from stdin and log a status line every second.
    #[serde(default)]
    pub enabled: bool,
}
