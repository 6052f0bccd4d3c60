use crate::domain::model::ProvidedService;
use crate::domain::ports::SelectionStrategy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Picks the first candidate left after filtering, i.e. registry order wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstAdmissible;

impl SelectionStrategy for FirstAdmissible {
    fn name(&self) -> &'static str {
        "first_admissible"
    }

    fn select<'a>(&self, candidates: &'a [ProvidedService]) -> Option<&'a ProvidedService> {
        candidates.first()
    }
}

/// Selection policies that can be named in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    #[default]
    FirstAdmissible,
}

impl SelectionPolicy {
    pub fn build(self) -> Arc<dyn SelectionStrategy> {
        match self {
            SelectionPolicy::FirstAdmissible => Arc::new(FirstAdmissible),
        }
    }
}
