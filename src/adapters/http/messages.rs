//! JSON bodies exchanged with the core services.

use crate::domain::model::{
    CloudIdentity, GsdCandidate, OrchestrationResult, ProvidedService, ServiceDescriptor,
    SystemIdentity,
};
use crate::domain::ports::ProviderVerdicts;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceQueryForm<'a> {
    pub service_group: &'a str,
    pub service_definition: &'a str,
    pub service_interfaces: Vec<&'a str>,
    pub service_metadata: &'a BTreeMap<String, String>,
    #[serde(rename = "tsig_key")]
    pub tsig_key: &'a str,
}

impl<'a> ServiceQueryForm<'a> {
    pub fn new(service: &'a ServiceDescriptor, tsig_key: &'a str) -> Self {
        Self {
            service_group: &service.service_group,
            service_definition: &service.service_definition,
            service_interfaces: service.interfaces.iter().map(String::as_str).collect(),
            service_metadata: &service.metadata,
            tsig_key,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceQueryResult {
    #[serde(default)]
    pub service_query_data: Vec<ProvidedService>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntraCloudAuthRequest<'a> {
    pub authentication_info: &'a str,
    pub requested_service: &'a ServiceDescriptor,
    pub generate_token: bool,
    pub provider_list: &'a [SystemIdentity],
}

#[derive(Debug, Deserialize)]
pub struct AuthorizationEntry {
    pub system: SystemIdentity,
    pub authorized: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntraCloudAuthResponse {
    #[serde(default)]
    pub authorization_map: Vec<AuthorizationEntry>,
    #[serde(default)]
    pub authorization_info: Option<String>,
}

impl IntraCloudAuthResponse {
    pub fn decisions(self) -> (ProviderVerdicts, Option<String>) {
        let decisions = self
            .authorization_map
            .into_iter()
            .map(|entry| (entry.system, entry.authorized))
            .collect();
        (decisions, self.authorization_info)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QosVerify<'a> {
    pub requester_system: &'a SystemIdentity,
    pub requested_service: &'a ServiceDescriptor,
    pub provider_list: &'a [SystemIdentity],
    #[serde(rename = "requestedQoS")]
    pub requested_qos: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct AdmissibilityEntry {
    pub system: SystemIdentity,
    pub admissible: bool,
}

#[derive(Debug, Deserialize)]
pub struct QosVerificationResponse {
    #[serde(default)]
    pub response: Vec<AdmissibilityEntry>,
}

impl QosVerificationResponse {
    pub fn verdicts(self) -> ProviderVerdicts {
        self.response
            .into_iter()
            .map(|entry| (entry.system, entry.admissible))
            .collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QosReserve<'a> {
    pub provider: &'a SystemIdentity,
    pub requester: &'a SystemIdentity,
    #[serde(rename = "requestedQoS")]
    pub requested_qos: &'a str,
    pub service: &'a ServiceDescriptor,
}

#[derive(Debug, Deserialize)]
pub struct QosReservationResponse {
    pub successful: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GsdRequestForm<'a> {
    pub requested_service: &'a ServiceDescriptor,
}

#[derive(Debug, Deserialize)]
pub struct GsdResult {
    #[serde(default)]
    pub response: Vec<GsdCandidate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IcnRequestForm<'a> {
    pub requested_service: &'a ServiceDescriptor,
    pub authentication_info: &'a str,
    pub target_cloud: &'a CloudIdentity,
}

#[derive(Debug, Deserialize)]
pub struct IcnResultForm {
    #[serde(default)]
    pub instructions: OrchestrationResult,
}
