use crate::core::candidates::{providers_of, retain_permitted, without_provider};
use crate::core::selection::FirstAdmissible;
use crate::domain::model::{
    CandidateSet, CloudIdentity, GsdCandidate, OrchestrationBinding, OrchestrationResult,
    ServiceDescriptor, ServiceRequest, SystemIdentity,
};
use crate::domain::ports::{Collaborators, ConfigProvider, SelectionStrategy};
use crate::utils::error::{OrchestrationError, Result, Stage};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

/// Checks the fields every run needs and hands back the requested service.
pub fn validate_request(request: &ServiceRequest) -> Result<&ServiceDescriptor> {
    let service = request
        .requested_service
        .as_ref()
        .ok_or_else(|| OrchestrationError::malformed("requestedService", "is missing"))?;

    if service.service_group.trim().is_empty() {
        return Err(OrchestrationError::malformed(
            "requestedService.serviceGroup",
            "cannot be empty",
        ));
    }
    if service.service_definition.trim().is_empty() {
        return Err(OrchestrationError::malformed(
            "requestedService.serviceDefinition",
            "cannot be empty",
        ));
    }
    if request.requester.system_name.trim().is_empty() {
        return Err(OrchestrationError::malformed(
            "requesterSystem.systemName",
            "cannot be empty",
        ));
    }

    Ok(service)
}

fn ensure_active(cancel: &CancellationToken, stage: Stage) -> Result<()> {
    if cancel.is_cancelled() {
        tracing::debug!("Run cancelled before {}", stage);
        return Err(OrchestrationError::Cancelled { stage });
    }
    Ok(())
}

/// Runs one collaborator call under the timeout, giving up early on
/// cancellation. Any failure is reported as `UpstreamUnavailable` for `stage`.
async fn bounded_call<T, F>(
    stage: Stage,
    timeout: Duration,
    cancel: &CancellationToken,
    call: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(OrchestrationError::Cancelled { stage }),
        outcome = tokio::time::timeout(timeout, call) => match outcome {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err @ OrchestrationError::UpstreamUnavailable { .. })) => Err(err),
            Ok(Err(err)) => Err(OrchestrationError::upstream(stage, err.to_string())),
            Err(_) => Err(OrchestrationError::upstream(
                stage,
                format!("no answer within {:?}", timeout),
            )),
        },
    }
}

fn build_bindings(
    service: &ServiceDescriptor,
    candidates: CandidateSet,
    authorization_info: &str,
) -> OrchestrationResult {
    OrchestrationResult::new(
        candidates
            .into_iter()
            .map(|candidate| OrchestrationBinding {
                requested_service: service.clone(),
                provider: candidate.provider,
                service_uri: candidate.service_uri,
                authorization_info: authorization_info.to_string(),
            })
            .collect(),
    )
}

/// The orchestration pipeline. Holds no per-run state, so one instance can
/// serve any number of concurrent runs.
pub struct Orchestrator<C: ConfigProvider> {
    collaborators: Collaborators,
    config: C,
    selection: Arc<dyn SelectionStrategy>,
}

impl<C: ConfigProvider> Orchestrator<C> {
    pub fn new(collaborators: Collaborators, config: C) -> Self {
        Self {
            collaborators,
            config,
            selection: Arc::new(FirstAdmissible),
        }
    }

    pub fn with_selection(mut self, selection: Arc<dyn SelectionStrategy>) -> Self {
        self.selection = selection;
        self
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub async fn run_local(&self, request: &ServiceRequest) -> Result<OrchestrationResult> {
        self.run_local_cancellable(request, &CancellationToken::new())
            .await
    }

    /// Local-cloud orchestration: registry, then authorization and QoS
    /// filtering, then one reservation for the selected provider.
    pub async fn run_local_cancellable(
        &self,
        request: &ServiceRequest,
        cancel: &CancellationToken,
    ) -> Result<OrchestrationResult> {
        let service = validate_request(request)?;
        let requester = &request.requester;
        let timeout = self.config.call_timeout();

        ensure_active(cancel, Stage::RegistryQuery)?;
        let candidates = bounded_call(
            Stage::RegistryQuery,
            timeout,
            cancel,
            self.collaborators.registry.query_providers(service),
        )
        .await?;
        tracing::info!(
            "Registry returned {} provider(s) for {}",
            candidates.len(),
            service
        );

        if candidates.is_empty() {
            return Ok(OrchestrationResult::empty());
        }

        if request.flags.external_service_request() {
            tracing::debug!("External request for {}, skipping authorization and QoS", service);
            return Ok(build_bindings(
                service,
                candidates,
                self.config.external_authorization_marker(),
            ));
        }

        ensure_active(cancel, Stage::Authorization)?;
        let verdict = bounded_call(
            Stage::Authorization,
            timeout,
            cancel,
            self.collaborators.authorization.check_authorization(
                requester,
                service,
                &providers_of(&candidates),
            ),
        )
        .await?;
        let candidates = retain_permitted(candidates, &verdict.decisions);
        let authorization_info = verdict
            .authorization_info
            .unwrap_or_else(|| self.config.authorization_info_placeholder().to_string());
        tracing::debug!("{} candidate(s) left after authorization", candidates.len());

        if candidates.is_empty() {
            return Ok(OrchestrationResult::empty());
        }

        ensure_active(cancel, Stage::QosVerify)?;
        let admissible = bounded_call(
            Stage::QosVerify,
            timeout,
            cancel,
            self.collaborators
                .qos
                .verify(requester, service, &providers_of(&candidates)),
        )
        .await?;
        let candidates = retain_permitted(candidates, &admissible);
        tracing::debug!("{} candidate(s) left after QoS verification", candidates.len());

        let selected = self
            .selection
            .select(&candidates)
            .map(|candidate| candidate.provider.clone());
        let candidates = match selected {
            Some(provider) => {
                ensure_active(cancel, Stage::QosReserve)?;
                match self.reserve(&provider, requester, service).await {
                    Ok(()) => candidates,
                    Err(err) => {
                        tracing::warn!("{}; dropping it from the result", err);
                        without_provider(candidates, &provider)
                    }
                }
            }
            None => candidates,
        };

        tracing::info!("Local orchestration produced {} binding(s)", candidates.len());
        Ok(build_bindings(service, candidates, &authorization_info))
    }

    /// Reserves QoS on the selected provider. Deliberately not raced against
    /// cancellation: once the request is out, its outcome is awaited.
    async fn reserve(
        &self,
        provider: &SystemIdentity,
        requester: &SystemIdentity,
        service: &ServiceDescriptor,
    ) -> Result<()> {
        tracing::debug!(
            "Reserving QoS on {} using {} selection",
            provider,
            self.selection.name()
        );
        let timeout = self.config.call_timeout();
        let outcome = tokio::time::timeout(
            timeout,
            self.collaborators.qos.reserve(provider, requester, service),
        )
        .await;

        match outcome {
            Ok(Ok(true)) => Ok(()),
            Ok(Ok(false)) => Err(OrchestrationError::ReservationFailed {
                provider: provider.to_string(),
            }),
            Ok(Err(err)) => {
                tracing::warn!("QoS reservation call for {} failed: {}", provider, err);
                Err(OrchestrationError::ReservationFailed {
                    provider: provider.to_string(),
                })
            }
            Err(_) => {
                tracing::warn!("QoS reservation for {} timed out after {:?}", provider, timeout);
                Err(OrchestrationError::ReservationFailed {
                    provider: provider.to_string(),
                })
            }
        }
    }

    pub async fn run_inter_cloud(&self, request: &ServiceRequest) -> Result<OrchestrationResult> {
        self.run_inter_cloud_cancellable(request, &CancellationToken::new())
            .await
    }

    /// Inter-cloud orchestration: global service discovery, then one
    /// negotiation per peer cloud, merged in discovery order.
    pub async fn run_inter_cloud_cancellable(
        &self,
        request: &ServiceRequest,
        cancel: &CancellationToken,
    ) -> Result<OrchestrationResult> {
        let service = validate_request(request)?;
        let timeout = self.config.call_timeout();

        ensure_active(cancel, Stage::GlobalServiceDiscovery)?;
        let discovered = bounded_call(
            Stage::GlobalServiceDiscovery,
            timeout,
            cancel,
            self.collaborators.gatekeeper.discover_clouds(service),
        )
        .await?;
        let clouds = self.negotiation_targets(discovered);
        tracing::info!("Global service discovery found {} cloud(s) for {}", clouds.len(), service);

        if clouds.is_empty() {
            return Ok(OrchestrationResult::empty());
        }

        let semaphore = Semaphore::new(self.config.fan_out_limit().max(1));
        let auth_info = self.config.authentication_info();
        let negotiations = clouds.iter().map(|cloud| {
            let semaphore = &semaphore;
            async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|_| OrchestrationError::Cancelled {
                        stage: Stage::InterCloudNegotiation,
                    })?;
                ensure_active(cancel, Stage::InterCloudNegotiation)?;
                tracing::debug!("Negotiating {} with cloud {}", service, cloud);
                bounded_call(
                    Stage::InterCloudNegotiation,
                    timeout,
                    cancel,
                    self.collaborators.gatekeeper.negotiate(service, auth_info, cloud),
                )
                .await
            }
        });

        // join_all yields outcomes in input order whatever the completion order.
        let outcomes = futures::future::join_all(negotiations).await;

        let mut bindings = Vec::new();
        for (cloud, outcome) in clouds.iter().zip(outcomes) {
            match outcome {
                Ok(result) => {
                    tracing::debug!("Cloud {} offered {} binding(s)", cloud, result.len());
                    bindings.extend(result.bindings);
                }
                Err(err @ OrchestrationError::Cancelled { .. }) => return Err(err),
                Err(err) => {
                    tracing::warn!("Skipping cloud {}: {}", cloud, err);
                }
            }
        }

        tracing::info!("Inter-cloud orchestration produced {} binding(s)", bindings.len());
        Ok(OrchestrationResult::new(bindings))
    }

    fn negotiation_targets(&self, discovered: Vec<GsdCandidate>) -> Vec<CloudIdentity> {
        if !self.config.dedupe_discovered_clouds() {
            return discovered.into_iter().map(|entry| entry.cloud).collect();
        }

        let mut seen = HashSet::new();
        discovered
            .into_iter()
            .map(|entry| entry.cloud)
            .filter(|cloud| {
                let first = seen.insert(cloud.clone());
                if !first {
                    tracing::debug!("Cloud {} discovered more than once", cloud);
                }
                first
            })
            .collect()
    }
}
