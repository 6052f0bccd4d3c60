use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};

/// What a requester wants. Two descriptors are equal when group and
/// definition match; interfaces and metadata only narrow the registry query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub service_group: String,
    pub service_definition: String,
    #[serde(default)]
    pub interfaces: BTreeSet<String>,
    #[serde(default, rename = "serviceMetadata")]
    pub metadata: BTreeMap<String, String>,
}

impl ServiceDescriptor {
    pub fn new(service_group: impl Into<String>, service_definition: impl Into<String>) -> Self {
        Self {
            service_group: service_group.into(),
            service_definition: service_definition.into(),
            interfaces: BTreeSet::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.insert(interface.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl PartialEq for ServiceDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.service_group == other.service_group
            && self.service_definition == other.service_definition
    }
}

impl Eq for ServiceDescriptor {}

impl Hash for ServiceDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.service_group.hash(state);
        self.service_definition.hash(state);
    }
}

impl fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.service_group, self.service_definition)
    }
}

/// Who is requesting or providing. `public_key_info` is carried but never
/// takes part in identity comparison.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemIdentity {
    pub system_group: String,
    pub system_name: String,
    pub address: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_info: Option<String>,
}

impl SystemIdentity {
    pub fn new(
        system_group: impl Into<String>,
        system_name: impl Into<String>,
        address: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            system_group: system_group.into(),
            system_name: system_name.into(),
            address: address.into(),
            port,
            public_key_info: None,
        }
    }
}

impl PartialEq for SystemIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.system_group == other.system_group
            && self.system_name == other.system_name
            && self.address == other.address
            && self.port == other.port
    }
}

impl Eq for SystemIdentity {}

impl Hash for SystemIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.system_group.hash(state);
        self.system_name.hash(state);
        self.address.hash(state);
        self.port.hash(state);
    }
}

impl fmt::Display for SystemIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}@{}:{}",
            self.system_group, self.system_name, self.address, self.port
        )
    }
}

/// A peer administrative domain, identified by operator and cloud name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudIdentity {
    pub operator: String,
    pub cloud_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default, rename = "gatekeeperServiceURI")]
    pub gatekeeper_service_uri: String,
}

impl CloudIdentity {
    pub fn new(operator: impl Into<String>, cloud_name: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            cloud_name: cloud_name.into(),
            ..Default::default()
        }
    }
}

impl PartialEq for CloudIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.operator == other.operator && self.cloud_name == other.cloud_name
    }
}

impl Eq for CloudIdentity {}

impl Hash for CloudIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.operator.hash(state);
        self.cloud_name.hash(state);
    }
}

impl fmt::Display for CloudIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.operator, self.cloud_name)
    }
}

/// Named booleans steering the pipeline. A flag that is not present reads as false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrchestrationFlags(HashMap<String, bool>);

impl OrchestrationFlags {
    pub const TRIGGER_INTER_CLOUD: &'static str = "TriggerInterCloud";
    pub const EXTERNAL_SERVICE_REQUEST: &'static str = "ExternalServiceRequest";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: bool) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn trigger_inter_cloud(&self) -> bool {
        self.get(Self::TRIGGER_INTER_CLOUD)
    }

    pub fn external_service_request(&self) -> bool {
        self.get(Self::EXTERNAL_SERVICE_REQUEST)
    }
}

/// One inbound orchestration call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    #[serde(rename = "requesterSystem")]
    pub requester: SystemIdentity,
    #[serde(default)]
    pub requested_service: Option<ServiceDescriptor>,
    #[serde(default, rename = "orchestrationFlags")]
    pub flags: OrchestrationFlags,
}

impl ServiceRequest {
    pub fn new(requester: SystemIdentity, requested_service: ServiceDescriptor) -> Self {
        Self {
            requester,
            requested_service: Some(requested_service),
            flags: OrchestrationFlags::default(),
        }
    }

    pub fn with_flag(mut self, name: &str, value: bool) -> Self {
        self.flags = self.flags.with(name, value);
        self
    }

    /// Decodes a request body. Field checks happen later, per run.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// A single registry hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvidedService {
    pub provider: SystemIdentity,
    #[serde(rename = "serviceURI")]
    pub service_uri: String,
}

impl ProvidedService {
    pub fn new(provider: SystemIdentity, service_uri: impl Into<String>) -> Self {
        Self {
            provider,
            service_uri: service_uri.into(),
        }
    }
}

/// Registry hits in registry order. Stages only ever remove entries.
pub type CandidateSet = Vec<ProvidedService>;

/// A resolved, usable provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationBinding {
    #[serde(rename = "service")]
    pub requested_service: ServiceDescriptor,
    pub provider: SystemIdentity,
    #[serde(rename = "serviceURI")]
    pub service_uri: String,
    pub authorization_info: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationResult {
    #[serde(rename = "response", default)]
    pub bindings: Vec<OrchestrationBinding>,
}

impl OrchestrationResult {
    pub fn new(bindings: Vec<OrchestrationBinding>) -> Self {
        Self { bindings }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn providers(&self) -> impl Iterator<Item = &SystemIdentity> {
        self.bindings.iter().map(|binding| &binding.provider)
    }
}

/// A peer cloud that claims to host the requested service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GsdCandidate {
    pub cloud: CloudIdentity,
}

impl GsdCandidate {
    pub fn new(cloud: CloudIdentity) -> Self {
        Self { cloud }
    }
}
