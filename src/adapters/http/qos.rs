use crate::adapters::http::messages::{
    QosReservationResponse, QosReserve, QosVerificationResponse, QosVerify,
};
use crate::adapters::http::{endpoint, HttpTransport};
use crate::domain::model::{ServiceDescriptor, SystemIdentity};
use crate::domain::ports::{ProviderVerdicts, QosManager};
use crate::utils::error::{Result, Stage};
use async_trait::async_trait;
use url::Url;

/// QoS manager client: `PUT {base}/QoSVerify` and `PUT {base}/QoSReserve`.
pub struct HttpQosManager {
    transport: HttpTransport,
    base: Url,
    requested_qos: String,
}

impl HttpQosManager {
    pub fn new(transport: HttpTransport, base: Url, requested_qos: impl Into<String>) -> Self {
        Self {
            transport,
            base,
            requested_qos: requested_qos.into(),
        }
    }
}

#[async_trait]
impl QosManager for HttpQosManager {
    async fn verify(
        &self,
        requester: &SystemIdentity,
        service: &ServiceDescriptor,
        providers: &[SystemIdentity],
    ) -> Result<ProviderVerdicts> {
        let body = QosVerify {
            requester_system: requester,
            requested_service: service,
            provider_list: providers,
            requested_qos: &self.requested_qos,
        };

        let response: QosVerificationResponse = self
            .transport
            .put_json(Stage::QosVerify, endpoint(&self.base, &["QoSVerify"]), &body)
            .await?;
        Ok(response.verdicts())
    }

    async fn reserve(
        &self,
        provider: &SystemIdentity,
        requester: &SystemIdentity,
        service: &ServiceDescriptor,
    ) -> Result<bool> {
        let body = QosReserve {
            provider,
            requester,
            requested_qos: &self.requested_qos,
            service,
        };

        let response: QosReservationResponse = self
            .transport
            .put_json(Stage::QosReserve, endpoint(&self.base, &["QoSReserve"]), &body)
            .await?;
        Ok(response.successful)
    }
}
