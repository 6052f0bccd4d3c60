use std::fmt;
use thiserror::Error;

/// A step of an orchestration run, used to say where a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Validation,
    RegistryQuery,
    Authorization,
    QosVerify,
    QosReserve,
    GlobalServiceDiscovery,
    InterCloudNegotiation,
}

impl Stage {
    /// The collaborator that serves this stage.
    pub fn collaborator(&self) -> &'static str {
        match self {
            Stage::Validation => "orchestrator",
            Stage::RegistryQuery => "service registry",
            Stage::Authorization => "authorization",
            Stage::QosVerify | Stage::QosReserve => "qos manager",
            Stage::GlobalServiceDiscovery | Stage::InterCloudNegotiation => "gatekeeper",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validation => "request validation",
            Stage::RegistryQuery => "registry query",
            Stage::Authorization => "authorization check",
            Stage::QosVerify => "qos verification",
            Stage::QosReserve => "qos reservation",
            Stage::GlobalServiceDiscovery => "global service discovery",
            Stage::InterCloudNegotiation => "inter-cloud negotiation",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum OrchestrationError {
    #[error("Malformed request: {field} {reason}")]
    MalformedRequest { field: String, reason: String },

    #[error("Upstream unavailable during {stage} ({collaborator}): {message}")]
    UpstreamUnavailable {
        stage: Stage,
        collaborator: String,
        message: String,
    },

    #[error("QoS reservation failed for provider {provider}")]
    ReservationFailed { provider: String },

    #[error("Orchestration cancelled before {stage}")]
    Cancelled { stage: Stage },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Request,
    Upstream,
    Reservation,
    Cancellation,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl OrchestrationError {
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRequest {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn upstream(stage: Stage, message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            stage,
            collaborator: stage.collaborator().to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedRequest { .. } => ErrorCategory::Request,
            Self::UpstreamUnavailable { .. } => ErrorCategory::Upstream,
            Self::ReservationFailed { .. } => ErrorCategory::Reservation,
            Self::Cancelled { .. } => ErrorCategory::Cancellation,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Reservation | ErrorCategory::Cancellation => ErrorSeverity::Low,
            ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Request | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit status for the CLI. Cancellation follows the shell
    /// convention for SIGINT.
    pub fn exit_code(&self) -> i32 {
        if let Self::Cancelled { .. } = self {
            return 130;
        }
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    /// The stage a run-level error is attributed to, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::MalformedRequest { .. } => Some(Stage::Validation),
            Self::UpstreamUnavailable { stage, .. } | Self::Cancelled { stage } => Some(*stage),
            Self::ReservationFailed { .. } => Some(Stage::QosReserve),
            _ => None,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::MalformedRequest { field, .. } => {
                format!("Fix the '{}' field of the service request and resend it", field)
            }
            Self::UpstreamUnavailable {
                stage, collaborator, ..
            } => format!(
                "Check that the {} is reachable; the run stopped at the {}",
                collaborator, stage
            ),
            Self::ReservationFailed { .. } => {
                "The provider could not reserve QoS resources; try again later".to_string()
            }
            Self::Cancelled { .. } => "The run was cancelled; resend the request".to_string(),
            Self::ConfigValidationError { field, .. }
            | Self::InvalidConfigValueError { field, .. }
            | Self::MissingConfigError { field } => {
                format!("Review the '{}' setting in the configuration file", field)
            }
            Self::IoError(_) => "Check file paths and permissions".to_string(),
            Self::SerializationError(_) => "Check that the JSON input is well formed".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Request => format!("The service request was rejected: {}", self),
            ErrorCategory::Upstream => format!("A core service did not answer: {}", self),
            ErrorCategory::Reservation => format!("No resources could be reserved: {}", self),
            ErrorCategory::Cancellation => "Orchestration was cancelled".to_string(),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("Internal error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, OrchestrationError>;
