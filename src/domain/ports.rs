use crate::domain::model::{
    CloudIdentity, GsdCandidate, OrchestrationResult, ProvidedService, ServiceDescriptor,
    SystemIdentity,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Per-provider yes/no answer from a collaborator.
pub type ProviderVerdicts = HashMap<SystemIdentity, bool>;

/// Answer of the authorization service for one batch of providers.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationVerdict {
    pub decisions: ProviderVerdicts,
    /// Token issued for the granted providers, if the service hands one out.
    pub authorization_info: Option<String>,
}

#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    async fn query_providers(&self, service: &ServiceDescriptor) -> Result<Vec<ProvidedService>>;
}

#[async_trait]
pub trait AuthorizationService: Send + Sync {
    async fn check_authorization(
        &self,
        requester: &SystemIdentity,
        service: &ServiceDescriptor,
        providers: &[SystemIdentity],
    ) -> Result<AuthorizationVerdict>;
}

#[async_trait]
pub trait QosManager: Send + Sync {
    async fn verify(
        &self,
        requester: &SystemIdentity,
        service: &ServiceDescriptor,
        providers: &[SystemIdentity],
    ) -> Result<ProviderVerdicts>;

    /// Leases resources on `provider`. The call has an external effect.
    async fn reserve(
        &self,
        provider: &SystemIdentity,
        requester: &SystemIdentity,
        service: &ServiceDescriptor,
    ) -> Result<bool>;
}

#[async_trait]
pub trait Gatekeeper: Send + Sync {
    async fn discover_clouds(&self, service: &ServiceDescriptor) -> Result<Vec<GsdCandidate>>;

    async fn negotiate(
        &self,
        service: &ServiceDescriptor,
        requester_auth_info: &str,
        cloud: &CloudIdentity,
    ) -> Result<OrchestrationResult>;
}

/// Picks the provider that receives the QoS reservation.
pub trait SelectionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn select<'a>(&self, candidates: &'a [ProvidedService]) -> Option<&'a ProvidedService>;
}

pub trait ConfigProvider: Send + Sync {
    /// Upper bound for a single collaborator call.
    fn call_timeout(&self) -> Duration;
    /// Maximum number of concurrent inter-cloud negotiations.
    fn fan_out_limit(&self) -> usize;
    /// Credential presented to peer clouds on behalf of the requester.
    fn authentication_info(&self) -> &str;
    /// Authorization info used when the authorization service issues no token.
    fn authorization_info_placeholder(&self) -> &str;
    /// Authorization info stamped on bindings of external requests.
    fn external_authorization_marker(&self) -> &str;
    fn dedupe_discovered_clouds(&self) -> bool;
    fn fallback_to_inter_cloud(&self) -> bool;
}

/// The four collaborators one orchestrator talks to. Cheap to clone and
/// shared by every concurrent run.
#[derive(Clone)]
pub struct Collaborators {
    pub registry: Arc<dyn ServiceRegistry>,
    pub authorization: Arc<dyn AuthorizationService>,
    pub qos: Arc<dyn QosManager>,
    pub gatekeeper: Arc<dyn Gatekeeper>,
}

impl Collaborators {
    pub fn new(
        registry: Arc<dyn ServiceRegistry>,
        authorization: Arc<dyn AuthorizationService>,
        qos: Arc<dyn QosManager>,
        gatekeeper: Arc<dyn Gatekeeper>,
    ) -> Self {
        Self {
            registry,
            authorization,
            qos,
            gatekeeper,
        }
    }
}
