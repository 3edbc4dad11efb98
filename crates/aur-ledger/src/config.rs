//! Ledger configuration

use crate::genesis::GenesisConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ledger configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Capacity of the write queue
    pub queue_depth: usize,
    /// Max wait for a queue slot in milliseconds, 0 = forever
    pub admission_timeout_ms: u64,
    /// Genesis parameters
    pub genesis: GenesisConfig,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            queue_depth: 1024,
            admission_timeout_ms: 5000,
            genesis: GenesisConfig::default(),
        }
    }
}

impl LedgerConfig {
    /// Admission timeout, `None` when unbounded
    pub fn admission_timeout(&self) -> Option<Duration> {
        match self.admission_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.queue_depth, 1024);
        assert_eq!(config.admission_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_zero_timeout_is_unbounded() {
        let config: LedgerConfig = serde_json::from_str(r#"{"admission_timeout_ms": 0}"#).unwrap();
        assert_eq!(config.admission_timeout(), None);
        assert_eq!(config.queue_depth, 1024);
    }
}
