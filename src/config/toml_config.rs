use crate::config::{
    OrchestrationSettings, DEFAULT_AUTHORIZATION_INFO, DEFAULT_CALL_TIMEOUT_SECONDS,
    DEFAULT_EXTERNAL_MARKER, DEFAULT_FAN_OUT_LIMIT,
};
use crate::core::selection::SelectionPolicy;
use crate::utils::error::{OrchestrationError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_required_field,
    validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_REQUESTED_QOS: &str = "RequestedQoS";
const MAX_CALL_TIMEOUT_SECONDS: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    pub collaborators: CollaboratorsConfig,
    #[serde(default)]
    pub orchestration: OrchestrationConfig,
    pub logging: Option<LoggingConfig>,
}

/// Base URIs of the core services this orchestrator calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorsConfig {
    pub service_registry_uri: String,
    pub authorization_uri: String,
    pub qos_manager_uri: String,
    pub gatekeeper_uri: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestrationConfig {
    pub call_timeout_seconds: Option<u64>,
    pub fan_out_limit: Option<usize>,
    pub selection: Option<SelectionPolicy>,
    pub requested_qos: Option<String>,
    /// Shared key that signs registry queries.
    pub registry_tsig_key: Option<String>,
    /// Credential presented to the authorization service and peer clouds.
    pub authentication_info: Option<String>,
    pub authorization_info_placeholder: Option<String>,
    pub external_authorization_marker: Option<String>,
    pub dedupe_discovered_clouds: Option<bool>,
    pub fallback_to_inter_cloud: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl OrchestratorConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(OrchestrationError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| OrchestrationError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left
    /// in place so validation can name them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            OrchestrationError::ConfigValidationError {
                field: "environment".to_string(),
                message: e.to_string(),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(
            self.orchestration
                .call_timeout_seconds
                .unwrap_or(DEFAULT_CALL_TIMEOUT_SECONDS),
        )
    }

    pub fn selection(&self) -> SelectionPolicy {
        self.orchestration.selection.unwrap_or_default()
    }

    pub fn requested_qos(&self) -> &str {
        self.orchestration
            .requested_qos
            .as_deref()
            .unwrap_or(DEFAULT_REQUESTED_QOS)
    }

    pub fn registry_tsig_key(&self) -> &str {
        self.orchestration.registry_tsig_key.as_deref().unwrap_or_default()
    }

    pub fn authentication_info(&self) -> &str {
        self.orchestration
            .authentication_info
            .as_deref()
            .unwrap_or_default()
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn settings(&self) -> OrchestrationSettings {
        let section = &self.orchestration;
        OrchestrationSettings {
            call_timeout: self.call_timeout(),
            fan_out_limit: section.fan_out_limit.unwrap_or(DEFAULT_FAN_OUT_LIMIT),
            authentication_info: self.authentication_info().to_string(),
            authorization_info_placeholder: section
                .authorization_info_placeholder
                .clone()
                .unwrap_or_else(|| DEFAULT_AUTHORIZATION_INFO.to_string()),
            external_authorization_marker: section
                .external_authorization_marker
                .clone()
                .unwrap_or_else(|| DEFAULT_EXTERNAL_MARKER.to_string()),
            dedupe_discovered_clouds: section.dedupe_discovered_clouds.unwrap_or(true),
            fallback_to_inter_cloud: section.fallback_to_inter_cloud.unwrap_or(false),
        }
    }
}

fn reject_unresolved(field: &str, value: &str) -> Result<()> {
    if value.contains("${") {
        return Err(OrchestrationError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "references an environment variable that is not set".to_string(),
        });
    }
    Ok(())
}

impl Validate for OrchestratorConfig {
    fn validate(&self) -> Result<()> {
        let uris = &self.collaborators;
        validate_url("collaborators.service_registry_uri", &uris.service_registry_uri)?;
        validate_url("collaborators.authorization_uri", &uris.authorization_uri)?;
        validate_url("collaborators.qos_manager_uri", &uris.qos_manager_uri)?;
        validate_url("collaborators.gatekeeper_uri", &uris.gatekeeper_uri)?;

        let section = &self.orchestration;
        if let Some(timeout) = section.call_timeout_seconds {
            validate_range(
                "orchestration.call_timeout_seconds",
                timeout,
                1,
                MAX_CALL_TIMEOUT_SECONDS,
            )?;
        }
        if let Some(limit) = section.fan_out_limit {
            validate_positive_number("orchestration.fan_out_limit", limit, 1)?;
        }
        if let Some(qos) = &section.requested_qos {
            validate_non_empty_string("orchestration.requested_qos", qos)?;
        }

        let tsig_key =
            validate_required_field("orchestration.registry_tsig_key", &section.registry_tsig_key)?;
        validate_non_empty_string("orchestration.registry_tsig_key", tsig_key)?;
        reject_unresolved("orchestration.registry_tsig_key", tsig_key)?;
        if let Some(auth) = &section.authentication_info {
            reject_unresolved("orchestration.authentication_info", auth)?;
        }

        if let Some(level) = self.logging.as_ref().and_then(|l| l.level.as_deref()) {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level) {
                return Err(OrchestrationError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        Ok(())
    }
}
