// Adapters layer: concrete implementations of the collaborator ports.

pub mod http;
