#![allow(dead_code)]

use async_trait::async_trait;
use service_orchestrator::config::OrchestrationSettings;
use service_orchestrator::domain::model::{
    CloudIdentity, GsdCandidate, OrchestrationBinding, OrchestrationResult, ProvidedService,
    ServiceDescriptor, ServiceRequest, SystemIdentity,
};
use service_orchestrator::domain::ports::{
    AuthorizationService, AuthorizationVerdict, Collaborators, Gatekeeper, ProviderVerdicts,
    QosManager, ServiceRegistry,
};
use service_orchestrator::utils::error::{OrchestrationError, Result, Stage};
use service_orchestrator::{OrchestrationEngine, Orchestrator};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub fn system(name: &str) -> SystemIdentity {
    SystemIdentity::new("sensors", name, format!("10.0.0.{}", name.len()), 8080)
}

pub fn requester() -> SystemIdentity {
    SystemIdentity::new("clients", "dashboard", "10.0.1.1", 9000)
}

pub fn temp_sensor() -> ServiceDescriptor {
    ServiceDescriptor::new("weather", "tempSensor").with_interface("JSON")
}

pub fn request() -> ServiceRequest {
    ServiceRequest::new(requester(), temp_sensor())
}

pub fn offer(name: &str) -> ProvidedService {
    ProvidedService::new(system(name), format!("/{}/temperature", name))
}

pub fn cloud(name: &str) -> CloudIdentity {
    CloudIdentity::new("operator", name)
}

pub fn binding(name: &str, authorization_info: &str) -> OrchestrationBinding {
    OrchestrationBinding {
        requested_service: temp_sensor(),
        provider: system(name),
        service_uri: format!("/{}/temperature", name),
        authorization_info: authorization_info.to_string(),
    }
}

pub fn provider_names(result: &OrchestrationResult) -> Vec<String> {
    result
        .providers()
        .map(|provider| provider.system_name.clone())
        .collect()
}

fn verdicts(providers: &[SystemIdentity], allowed: &HashSet<String>) -> ProviderVerdicts {
    providers
        .iter()
        .map(|p| (p.clone(), allowed.contains(&p.system_name)))
        .collect()
}

#[derive(Default)]
pub struct StubRegistry {
    pub offers: Vec<ProvidedService>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl StubRegistry {
    pub fn with(names: &[&str]) -> Self {
        Self {
            offers: names.iter().map(|n| offer(n)).collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ServiceRegistry for StubRegistry {
    async fn query_providers(&self, _service: &ServiceDescriptor) -> Result<Vec<ProvidedService>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(OrchestrationError::upstream(Stage::RegistryQuery, "connection refused"));
        }
        Ok(self.offers.clone())
    }
}

/// Grants the providers named in `allowed`; records every provider list it was asked about.
#[derive(Default)]
pub struct StubAuthorization {
    pub allowed: HashSet<String>,
    pub token: Option<String>,
    pub fail: bool,
    pub asked: Mutex<Vec<Vec<SystemIdentity>>>,
}

impl StubAuthorization {
    pub fn allowing(names: &[&str]) -> Self {
        Self {
            allowed: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    pub async fn calls(&self) -> usize {
        self.asked.lock().await.len()
    }
}

#[async_trait]
impl AuthorizationService for StubAuthorization {
    async fn check_authorization(
        &self,
        _requester: &SystemIdentity,
        _service: &ServiceDescriptor,
        providers: &[SystemIdentity],
    ) -> Result<AuthorizationVerdict> {
        self.asked.lock().await.push(providers.to_vec());
        if self.fail {
            return Err(OrchestrationError::upstream(Stage::Authorization, "503"));
        }
        Ok(AuthorizationVerdict {
            decisions: verdicts(providers, &self.allowed),
            authorization_info: self.token.clone(),
        })
    }
}

#[derive(Default)]
pub struct StubQos {
    pub admissible: HashSet<String>,
    pub reservation_succeeds: bool,
    pub reservation_errors: bool,
    pub verify_fails: bool,
    pub reserve_delay: Duration,
    pub verified: Mutex<Vec<Vec<SystemIdentity>>>,
    pub reserved: Mutex<Vec<SystemIdentity>>,
}

impl StubQos {
    pub fn admitting(names: &[&str], reservation_succeeds: bool) -> Self {
        Self {
            admissible: names.iter().map(|n| n.to_string()).collect(),
            reservation_succeeds,
            ..Default::default()
        }
    }

    pub async fn verify_calls(&self) -> usize {
        self.verified.lock().await.len()
    }

    pub async fn reservations(&self) -> Vec<SystemIdentity> {
        self.reserved.lock().await.clone()
    }
}

#[async_trait]
impl QosManager for StubQos {
    async fn verify(
        &self,
        _requester: &SystemIdentity,
        _service: &ServiceDescriptor,
        providers: &[SystemIdentity],
    ) -> Result<ProviderVerdicts> {
        self.verified.lock().await.push(providers.to_vec());
        if self.verify_fails {
            return Err(OrchestrationError::upstream(Stage::QosVerify, "timeout"));
        }
        Ok(verdicts(providers, &self.admissible))
    }

    async fn reserve(
        &self,
        provider: &SystemIdentity,
        _requester: &SystemIdentity,
        _service: &ServiceDescriptor,
    ) -> Result<bool> {
        self.reserved.lock().await.push(provider.clone());
        tokio::time::sleep(self.reserve_delay).await;
        if self.reservation_errors {
            return Err(OrchestrationError::upstream(Stage::QosReserve, "reset by peer"));
        }
        Ok(self.reservation_succeeds)
    }
}

/// How one peer cloud answers a negotiation.
#[derive(Clone)]
pub struct PeerCloud {
    pub bindings: Vec<OrchestrationBinding>,
    pub delay: Duration,
    pub fails: bool,
}

impl PeerCloud {
    pub fn answering(names: &[&str], delay_ms: u64) -> Self {
        Self {
            bindings: names.iter().map(|n| binding(n, "peer-token")).collect(),
            delay: Duration::from_millis(delay_ms),
            fails: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            bindings: Vec::new(),
            delay: Duration::ZERO,
            fails: true,
        }
    }
}

#[derive(Default)]
pub struct StubGatekeeper {
    pub discovered: Vec<CloudIdentity>,
    pub peers: HashMap<String, PeerCloud>,
    pub discovery_fails: bool,
    pub discovery_calls: AtomicUsize,
    pub negotiated: Mutex<Vec<(String, String)>>,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl StubGatekeeper {
    pub fn with(peers: Vec<(&str, PeerCloud)>) -> Self {
        Self {
            discovered: peers.iter().map(|(name, _)| cloud(name)).collect(),
            peers: peers
                .into_iter()
                .map(|(name, peer)| (name.to_string(), peer))
                .collect(),
            ..Default::default()
        }
    }

    pub async fn negotiated_clouds(&self) -> Vec<String> {
        self.negotiated
            .lock()
            .await
            .iter()
            .map(|(cloud, _)| cloud.clone())
            .collect()
    }
}

#[async_trait]
impl Gatekeeper for StubGatekeeper {
    async fn discover_clouds(&self, _service: &ServiceDescriptor) -> Result<Vec<GsdCandidate>> {
        self.discovery_calls.fetch_add(1, Ordering::SeqCst);
        if self.discovery_fails {
            return Err(OrchestrationError::upstream(
                Stage::GlobalServiceDiscovery,
                "gatekeeper down",
            ));
        }
        Ok(self.discovered.iter().cloned().map(GsdCandidate::new).collect())
    }

    async fn negotiate(
        &self,
        _service: &ServiceDescriptor,
        requester_auth_info: &str,
        cloud: &CloudIdentity,
    ) -> Result<OrchestrationResult> {
        self.negotiated
            .lock()
            .await
            .push((cloud.cloud_name.clone(), requester_auth_info.to_string()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let peer = self.peers.get(&cloud.cloud_name).cloned();
        if let Some(peer) = &peer {
            tokio::time::sleep(peer.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match peer {
            Some(peer) if !peer.fails => Ok(OrchestrationResult::new(peer.bindings)),
            _ => Err(OrchestrationError::upstream(
                Stage::InterCloudNegotiation,
                format!("cloud {} unreachable", cloud.cloud_name),
            )),
        }
    }
}

pub struct Harness {
    pub registry: Arc<StubRegistry>,
    pub authorization: Arc<StubAuthorization>,
    pub qos: Arc<StubQos>,
    pub gatekeeper: Arc<StubGatekeeper>,
}

impl Harness {
    pub fn new(
        registry: StubRegistry,
        authorization: StubAuthorization,
        qos: StubQos,
        gatekeeper: StubGatekeeper,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            authorization: Arc::new(authorization),
            qos: Arc::new(qos),
            gatekeeper: Arc::new(gatekeeper),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new(
            self.registry.clone(),
            self.authorization.clone(),
            self.qos.clone(),
            self.gatekeeper.clone(),
        )
    }

    pub fn orchestrator(&self) -> Orchestrator<OrchestrationSettings> {
        self.orchestrator_with(settings())
    }

    pub fn orchestrator_with(&self, settings: OrchestrationSettings) -> Orchestrator<OrchestrationSettings> {
        Orchestrator::new(self.collaborators(), settings)
    }

    pub fn engine_with(&self, settings: OrchestrationSettings) -> OrchestrationEngine<OrchestrationSettings> {
        OrchestrationEngine::new(self.orchestrator_with(settings))
    }
}

pub fn settings() -> OrchestrationSettings {
    OrchestrationSettings {
        authentication_info: "cloud-credential".to_string(),
        ..Default::default()
    }
}
