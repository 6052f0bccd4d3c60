pub mod candidates;
pub mod engine;
pub mod orchestrator;
pub mod selection;

pub use crate::domain::model::{OrchestrationResult, ServiceRequest};
pub use crate::domain::ports::{Collaborators, ConfigProvider, SelectionStrategy};
pub use crate::utils::error::Result;
