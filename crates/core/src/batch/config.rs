//! Configuration for the batch scheduler.

use serde::{Deserialize, Serialize};

/// Configuration for batch conversion runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum number of conversions running at the same time.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_max_concurrency() -> usize {
    4
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl SchedulerConfig {
    /// Sets the maximum number of concurrent conversions.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        assert_eq!(SchedulerConfig::default().max_concurrency, 4);
    }

    #[test]
    fn test_config_builder() {
        let config = SchedulerConfig::default().with_max_concurrency(8);
        assert_eq!(config.max_concurrency, 8);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: SchedulerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_concurrency, 4);
    }
}
