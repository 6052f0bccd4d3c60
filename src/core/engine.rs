use crate::core::orchestrator::{validate_request, Orchestrator};
use crate::domain::model::{OrchestrationResult, ServiceRequest};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use tokio_util::sync::CancellationToken;

/// Entry point for inbound requests: picks the local or inter-cloud flow.
pub struct OrchestrationEngine<C: ConfigProvider> {
    orchestrator: Orchestrator<C>,
}

impl<C: ConfigProvider> OrchestrationEngine<C> {
    pub fn new(orchestrator: Orchestrator<C>) -> Self {
        Self { orchestrator }
    }

    pub fn orchestrator(&self) -> &Orchestrator<C> {
        &self.orchestrator
    }

    pub async fn orchestrate(&self, request: &ServiceRequest) -> Result<OrchestrationResult> {
        self.orchestrate_cancellable(request, &CancellationToken::new())
            .await
    }

    pub async fn orchestrate_cancellable(
        &self,
        request: &ServiceRequest,
        cancel: &CancellationToken,
    ) -> Result<OrchestrationResult> {
        let service = validate_request(request)?;
        tracing::info!(
            "Orchestrating {} for {}",
            service,
            request.requester
        );

        if request.flags.trigger_inter_cloud() {
            tracing::info!("Inter-cloud orchestration requested");
            return self
                .orchestrator
                .run_inter_cloud_cancellable(request, cancel)
                .await;
        }

        let local = self
            .orchestrator
            .run_local_cancellable(request, cancel)
            .await?;

        let fallback = local.is_empty()
            && !request.flags.external_service_request()
            && self.orchestrator.config().fallback_to_inter_cloud();
        if fallback {
            tracing::info!("No local provider for {}, falling back to peer clouds", service);
            return self
                .orchestrator
                .run_inter_cloud_cancellable(request, cancel)
                .await;
        }

        Ok(local)
    }
}
