#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use std::time::Duration;

pub use toml_config::OrchestratorConfig;

pub const DEFAULT_CALL_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_FAN_OUT_LIMIT: usize = 4;
pub const DEFAULT_AUTHORIZATION_INFO: &str = "authorizationInfo";
pub const DEFAULT_EXTERNAL_MARKER: &str = "externalServiceRequest";

/// Runtime settings of one orchestrator instance.
#[derive(Debug, Clone)]
pub struct OrchestrationSettings {
    pub call_timeout: Duration,
    pub fan_out_limit: usize,
    pub authentication_info: String,
    pub authorization_info_placeholder: String,
    pub external_authorization_marker: String,
    pub dedupe_discovered_clouds: bool,
    pub fallback_to_inter_cloud: bool,
}

impl Default for OrchestrationSettings {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECONDS),
            fan_out_limit: DEFAULT_FAN_OUT_LIMIT,
            authentication_info: String::new(),
            authorization_info_placeholder: DEFAULT_AUTHORIZATION_INFO.to_string(),
            external_authorization_marker: DEFAULT_EXTERNAL_MARKER.to_string(),
            dedupe_discovered_clouds: true,
            fallback_to_inter_cloud: false,
        }
    }
}

impl ConfigProvider for OrchestrationSettings {
    fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    fn fan_out_limit(&self) -> usize {
        self.fan_out_limit
    }

    fn authentication_info(&self) -> &str {
        &self.authentication_info
    }

    fn authorization_info_placeholder(&self) -> &str {
        &self.authorization_info_placeholder
    }

    fn external_authorization_marker(&self) -> &str {
        &self.external_authorization_marker
    }

    fn dedupe_discovered_clouds(&self) -> bool {
        self.dedupe_discovered_clouds
    }

    fn fallback_to_inter_cloud(&self) -> bool {
        self.fallback_to_inter_cloud
    }
}
