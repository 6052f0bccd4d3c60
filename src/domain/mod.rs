// Domain layer: orchestration models and the collaborator ports the pipeline depends on.

pub mod model;
pub mod ports;
