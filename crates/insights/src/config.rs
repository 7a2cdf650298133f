use std::time::Duration;

use serde::{Deserialize, Serialize};

use coldwatch_core::config::{env_opt, profiled_env_opt, profiled_env_u32, profiled_env_u64};

use crate::retry::{RetryPolicy, DEFAULT_DELAY_MS, DEFAULT_MAX_ATTEMPTS};

/// Region used when neither INSIGHTS_REGION nor AWS_REGION is set.
const DEFAULT_REGION: &str = "us-east-1";

/// Configuration for the cold-start analyzer.
///
/// Reads from environment variables with optional profile prefix.
/// When `COLDWATCH_PROFILE=PROD`, checks `PROD_INSIGHTS_REGION` before
/// `INSIGHTS_REGION`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsConfig {
    /// AWS region the queried log groups live in.
    pub region: String,
    /// Delay between result polls, in milliseconds.
    pub poll_delay_ms: u64,
    /// Maximum number of result polls per query.
    pub max_poll_attempts: u32,
}

impl InsightsConfig {
    /// Build config from environment variables.
    ///
    /// Reads `COLDWATCH_PROFILE` to determine the profile prefix.
    /// `INSIGHTS_REGION` falls back to `AWS_REGION` before using the default.
    pub fn from_env() -> Self {
        let profile = env_opt("COLDWATCH_PROFILE")
            .map(|s| s.to_uppercase())
            .unwrap_or_default();
        Self::from_env_profiled(&profile)
    }

    /// Build config for a specific named profile.
    pub fn from_env_profiled(profile: &str) -> Self {
        let region = profiled_env_opt(profile, "INSIGHTS_REGION")
            .or_else(|| profiled_env_opt(profile, "AWS_REGION"))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Self {
            region,
            poll_delay_ms: profiled_env_u64(profile, "INSIGHTS_POLL_DELAY_MS", DEFAULT_DELAY_MS),
            max_poll_attempts: profiled_env_u32(
                profile,
                "INSIGHTS_MAX_POLL_ATTEMPTS",
                DEFAULT_MAX_ATTEMPTS,
            ),
        }
    }

    /// Retry policy for result polling derived from this config.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_poll_attempts,
            Duration::from_millis(self.poll_delay_ms),
        )
    }
}
