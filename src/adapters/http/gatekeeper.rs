use crate::adapters::http::messages::{GsdRequestForm, GsdResult, IcnRequestForm, IcnResultForm};
use crate::adapters::http::{endpoint, HttpTransport};
use crate::domain::model::{CloudIdentity, GsdCandidate, OrchestrationResult, ServiceDescriptor};
use crate::domain::ports::Gatekeeper;
use crate::utils::error::{Result, Stage};
use async_trait::async_trait;
use url::Url;

/// Gatekeeper client: `PUT {base}/init_gsd` and `PUT {base}/init_icn`.
pub struct HttpGatekeeper {
    transport: HttpTransport,
    base: Url,
}

impl HttpGatekeeper {
    pub fn new(transport: HttpTransport, base: Url) -> Self {
        Self { transport, base }
    }
}

#[async_trait]
impl Gatekeeper for HttpGatekeeper {
    async fn discover_clouds(&self, service: &ServiceDescriptor) -> Result<Vec<GsdCandidate>> {
        let body = GsdRequestForm {
            requested_service: service,
        };

        let result: GsdResult = self
            .transport
            .put_json(
                Stage::GlobalServiceDiscovery,
                endpoint(&self.base, &["init_gsd"]),
                &body,
            )
            .await?;
        Ok(result.response)
    }

    async fn negotiate(
        &self,
        service: &ServiceDescriptor,
        requester_auth_info: &str,
        cloud: &CloudIdentity,
    ) -> Result<OrchestrationResult> {
        let body = IcnRequestForm {
            requested_service: service,
            authentication_info: requester_auth_info,
            target_cloud: cloud,
        };

        let result: IcnResultForm = self
            .transport
            .put_json(
                Stage::InterCloudNegotiation,
                endpoint(&self.base, &["init_icn"]),
                &body,
            )
            .await?;
        Ok(result.instructions)
    }
}
