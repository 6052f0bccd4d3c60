pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::http::http_collaborators;
pub use crate::config::{OrchestrationSettings, OrchestratorConfig};
pub use crate::core::{engine::OrchestrationEngine, orchestrator::Orchestrator};
pub use crate::domain::model::{
    OrchestrationBinding, OrchestrationFlags, OrchestrationResult, ServiceDescriptor,
    ServiceRequest, SystemIdentity,
};
pub use crate::domain::ports::Collaborators;
pub use crate::utils::error::{OrchestrationError, Result};
