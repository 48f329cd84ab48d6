//! Benchmark tunables.
//!
//! Every threshold the state machine consults lives here so tests can shrink
//! warm-up and trial lengths instead of relying on process-wide constants.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading, saving or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read or write the settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Immutable tunables for one benchmark run.
///
/// The defaults reproduce the classic harness constants: warm up for at least
/// 250 ms and 16 iterations, target 500 ms per trial, clamp the computed trial
/// size to [10, 1,000,000] iterations and repeat 5 trials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    #[serde(rename = "WarmupMinIterations", deserialize_with = "validate_positive_u64")]
    pub warmup_min_iterations: u64,
    #[serde(rename = "WarmupDurationMs", deserialize_with = "validate_positive_u64")]
    pub warmup_duration_ms: u64,
    #[serde(rename = "TargetTrialDurationMs", deserialize_with = "validate_positive_u64")]
    pub target_trial_duration_ms: u64,
    #[serde(rename = "MinTrialIterations", deserialize_with = "validate_positive_u64")]
    pub min_trial_iterations: u64,
    #[serde(rename = "MaxTrialIterations", deserialize_with = "validate_positive_u64")]
    pub max_trial_iterations: u64,
    #[serde(rename = "RepeatCount", deserialize_with = "validate_positive_u32")]
    pub repeat_count: u32,
}

fn validate_positive_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = u64::deserialize(deserializer)?;
    if value > 0 {
        Ok(value)
    } else {
        Err(serde::de::Error::custom("Value must be positive"))
    }
}

fn validate_positive_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = u32::deserialize(deserializer)?;
    if value > 0 {
        Ok(value)
    } else {
        Err(serde::de::Error::custom("Value must be positive"))
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            warmup_min_iterations: 16,
            warmup_duration_ms: 250,
            target_trial_duration_ms: 500,
            min_trial_iterations: 10,
            max_trial_iterations: 1_000_000,
            repeat_count: 5,
        }
    }
}

impl BenchmarkConfig {
    /// Checks the cross-field invariants the serde validators cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repeat_count < 2 {
            return Err(ConfigError::Invalid {
                field: "RepeatCount",
                reason: "must be at least 2; statistics need two samples",
            });
        }
        if self.warmup_min_iterations == 0 {
            return Err(ConfigError::Invalid {
                field: "WarmupMinIterations",
                reason: "must be positive",
            });
        }
        if self.min_trial_iterations == 0 || self.max_trial_iterations == 0 {
            return Err(ConfigError::Invalid {
                field: "MinTrialIterations",
                reason: "iteration bounds must be positive",
            });
        }
        if self.min_trial_iterations > self.max_trial_iterations {
            return Err(ConfigError::Invalid {
                field: "MinTrialIterations",
                reason: "must not exceed MaxTrialIterations",
            });
        }
        if self.warmup_duration_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "WarmupDurationMs",
                reason: "durations must be non-zero",
            });
        }
        if self.target_trial_duration_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "TargetTrialDurationMs",
                reason: "durations must be non-zero",
            });
        }
        Ok(())
    }

    /// Loads and validates a configuration from a JSON settings file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn warmup_duration(&self) -> Duration {
        Duration::from_millis(self.warmup_duration_ms)
    }

    pub fn target_trial_duration(&self) -> Duration {
        Duration::from_millis(self.target_trial_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_constants() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.warmup_min_iterations, 16);
        assert_eq!(config.warmup_duration_ms, 250);
        assert_eq!(config.target_trial_duration_ms, 500);
        assert_eq!(config.min_trial_iterations, 10);
        assert_eq!(config.max_trial_iterations, 1_000_000);
        assert_eq!(config.repeat_count, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_single_trial() {
        let config = BenchmarkConfig {
            repeat_count: 1,
            ..BenchmarkConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "RepeatCount", .. })
        ));
    }

    #[test]
    fn rejects_zero_iteration_bounds() {
        let config = BenchmarkConfig {
            min_trial_iterations: 0,
            max_trial_iterations: 0,
            ..BenchmarkConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "MinTrialIterations", .. })
        ));
        // The state machine divides trial durations by the iteration bound,
        // so construction must reject it too.
        assert!(crate::core::BenchmarkState::with_config(config).is_err());
    }

    #[test]
    fn rejects_zero_warmup_min_iterations() {
        let config = BenchmarkConfig {
            warmup_min_iterations: 0,
            ..BenchmarkConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "WarmupMinIterations", .. })
        ));
    }

    #[test]
    fn rejects_zero_durations() {
        let config = BenchmarkConfig {
            warmup_duration_ms: 0,
            ..BenchmarkConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "WarmupDurationMs", .. })
        ));

        let config = BenchmarkConfig {
            target_trial_duration_ms: 0,
            ..BenchmarkConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "TargetTrialDurationMs", .. })
        ));
    }

    #[test]
    fn rejects_inverted_iteration_bounds() {
        let config = BenchmarkConfig {
            min_trial_iterations: 100,
            max_trial_iterations: 10,
            ..BenchmarkConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_round_trip() {
        let config = BenchmarkConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: BenchmarkConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn deserializer_rejects_zero_fields() {
        let json = r#"{
            "WarmupMinIterations": 0,
            "WarmupDurationMs": 250,
            "TargetTrialDurationMs": 500,
            "MinTrialIterations": 10,
            "MaxTrialIterations": 1000000,
            "RepeatCount": 5
        }"#;
        assert!(serde_json::from_str::<BenchmarkConfig>(json).is_err());
    }
}
