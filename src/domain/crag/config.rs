//! CRAG workflow configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tuning knobs for a workflow run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CragConfig {
    /// Documents graded at the same time
    #[serde(default = "default_grading_concurrency")]
    pub grading_concurrency: usize,
    /// Upper bound for any single external call
    #[serde(default = "default_step_timeout_ms")]
    pub step_timeout_ms: u64,
    /// Rewrite-and-search cycles allowed per request
    #[serde(default = "default_max_corrective_passes")]
    pub max_corrective_passes: u32,
}

fn default_grading_concurrency() -> usize {
    4
}

fn default_step_timeout_ms() -> u64 {
    120_000
}

fn default_max_corrective_passes() -> u32 {
    1
}

impl Default for CragConfig {
    fn default() -> Self {
        Self {
            grading_concurrency: default_grading_concurrency(),
            step_timeout_ms: default_step_timeout_ms(),
            max_corrective_passes: default_max_corrective_passes(),
        }
    }
}

impl CragConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set grading concurrency (at least 1)
    pub fn with_grading_concurrency(mut self, concurrency: usize) -> Self {
        self.grading_concurrency = concurrency.max(1);
        self
    }

    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the corrective pass bound (at least 1)
    pub fn with_max_corrective_passes(mut self, passes: u32) -> Self {
        self.max_corrective_passes = passes.max(1);
        self
    }

    pub fn step_timeout(&self) -> Duration {
        Duration::from_millis(self.step_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CragConfig::default();

        assert_eq!(config.grading_concurrency, 4);
        assert_eq!(config.step_timeout(), Duration::from_secs(120));
        assert_eq!(config.max_corrective_passes, 1);
    }

    #[test]
    fn test_builder_clamps_to_one() {
        let config = CragConfig::new()
            .with_grading_concurrency(0)
            .with_max_corrective_passes(0)
            .with_step_timeout(Duration::from_millis(250));

        assert_eq!(config.grading_concurrency, 1);
        assert_eq!(config.max_corrective_passes, 1);
        assert_eq!(config.step_timeout_ms, 250);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: CragConfig = serde_json::from_str(r#"{"max_corrective_passes": 2}"#).unwrap();

        assert_eq!(config.max_corrective_passes, 2);
        assert_eq!(config.grading_concurrency, 4);
    }
}
