//! Deterministic exponential backoff.

use std::time::Duration;

use logbook_core::config::IngestionConfig;
use logbook_core::errors::ConfigError;

/// `interval(n) = min(base * multiplier^n, max)`. No jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    base: Duration,
    multiplier: f64,
    max: Duration,
}

impl BackoffPolicy {
    pub fn new(base: Duration, multiplier: f64, max: Duration) -> Self {
        Self {
            base,
            multiplier,
            max,
        }
    }

    /// Validates `config` first; a negative or NaN interval is a `ConfigError`.
    pub fn from_config(config: &IngestionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            config.base_interval(),
            config.backoff_multiplier,
            config.max_interval(),
        ))
    }

    /// Sleep after `consecutive_failures` failed polls in a row. Exactly
    /// `base` when there are none.
    pub fn interval(&self, consecutive_failures: u32) -> Duration {
        if consecutive_failures == 0 {
            return self.base;
        }
        let exponent = i32::try_from(consecutive_failures).unwrap_or(i32::MAX);
        let secs = self.base.as_secs_f64() * self.multiplier.powi(exponent);
        if !secs.is_finite() || secs >= self.max.as_secs_f64() {
            return self.max;
        }
        Duration::from_secs_f64(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn huge_failure_counts_saturate_at_max() {
        let policy = BackoffPolicy::new(Duration::from_secs(1), 2.0, Duration::from_secs(30));
        assert_eq!(policy.interval(u32::MAX), Duration::from_secs(30));
        assert_eq!(policy.interval(2_000), Duration::from_secs(30));
    }
}
