//! Controller configuration.
//!
//! Everything the original deployment tooling kept as hardcoded globals
//! (execution role, region, polling knobs) is an explicit value here,
//! passed into each controller at construction time.

use crate::types::RuntimeConfig;
use std::time::Duration;

/// Name of the system-provisioned endpoint every unit carries.
/// It is managed by the control plane and never a deletion target.
pub const DEFAULT_ENDPOINT: &str = "DEFAULT";

/// Literal a caller must supply to confirm teardown.
pub const CONFIRM_TOKEN: &str = "DELETE";

/// Shared configuration for all three controllers.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Execution role the unit assumes at runtime.
    pub role_ref: String,
    /// Create-time unit configuration.
    pub runtime: RuntimeConfig,
    /// Delay between status probes.
    pub poll_interval: Duration,
    /// Ceiling on any single provisioning or deletion wait.
    pub poll_ceiling: Duration,
    /// Protected endpoint name, skipped during cleanup.
    pub protected_endpoint: String,
}

impl ControllerConfig {
    pub fn new(role_ref: impl Into<String>) -> Self {
        Self {
            role_ref: role_ref.into(),
            runtime: RuntimeConfig::default(),
            poll_interval: Duration::from_secs(10),
            poll_ceiling: Duration::from_secs(300),
            protected_endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Set the create-time runtime configuration.
    pub fn with_runtime(mut self, runtime: RuntimeConfig) -> Self {
        self.runtime = runtime;
        self
    }

    /// Override the polling cadence.
    pub fn with_polling(mut self, interval: Duration, ceiling: Duration) -> Self {
        self.poll_interval = interval;
        self.poll_ceiling = ceiling;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ControllerConfig::new("role/deployer");
        assert_eq!(config.role_ref, "role/deployer");
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.poll_ceiling, Duration::from_secs(300));
        assert_eq!(config.protected_endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_config_builder() {
        let config = ControllerConfig::new("role/deployer")
            .with_polling(Duration::from_secs(1), Duration::from_secs(30));
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.poll_ceiling, Duration::from_secs(30));
    }
}
