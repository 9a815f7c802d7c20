use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Deadlines applied to each exchange with the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Whole-exchange deadline in seconds (1-3600).
    pub timeout_secs: u64,
    /// TCP/TLS connect deadline in seconds (1-300).
    pub connect_timeout_secs: u64,
}

impl ExchangeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            connect_timeout_secs: 10,
        }
    }
}
