pub mod authorization;
pub mod gatekeeper;
pub mod messages;
pub mod qos;
pub mod registry;

pub use authorization::HttpAuthorizationService;
pub use gatekeeper::HttpGatekeeper;
pub use qos::HttpQosManager;
pub use registry::HttpServiceRegistry;

use crate::config::OrchestratorConfig;
use crate::domain::ports::Collaborators;
use crate::utils::error::{OrchestrationError, Result, Stage};
use crate::utils::validation::validate_url;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Shared JSON-over-HTTP plumbing. Clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            OrchestrationError::ConfigValidationError {
                field: "http_client".to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self { client })
    }

    pub async fn put_json<Req, Resp>(&self, stage: Stage, url: Url, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        tracing::debug!("PUT {} for {}", url, stage);

        let response = self
            .client
            .put(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| OrchestrationError::upstream(stage, format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OrchestrationError::upstream(
                stage,
                format!("{} answered with status {}", url, status),
            ));
        }

        response.json::<Resp>().await.map_err(|e| {
            OrchestrationError::upstream(stage, format!("unreadable response from {}: {}", url, e))
        })
    }
}

/// Appends percent-encoded path segments to `base`.
pub fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Builds network clients for all four collaborators from configuration.
pub fn http_collaborators(config: &OrchestratorConfig) -> Result<Collaborators> {
    let uris = &config.collaborators;
    let transport = HttpTransport::new(config.call_timeout())?;

    let registry = HttpServiceRegistry::new(
        transport.clone(),
        validate_url("collaborators.service_registry_uri", &uris.service_registry_uri)?,
        config.registry_tsig_key(),
    );
    let authorization = HttpAuthorizationService::new(
        transport.clone(),
        validate_url("collaborators.authorization_uri", &uris.authorization_uri)?,
        config.authentication_info(),
    );
    let qos = HttpQosManager::new(
        transport.clone(),
        validate_url("collaborators.qos_manager_uri", &uris.qos_manager_uri)?,
        config.requested_qos(),
    );
    let gatekeeper = HttpGatekeeper::new(
        transport,
        validate_url("collaborators.gatekeeper_uri", &uris.gatekeeper_uri)?,
    );

    Ok(Collaborators::new(
        Arc::new(registry),
        Arc::new(authorization),
        Arc::new(qos),
        Arc::new(gatekeeper),
    ))
}
