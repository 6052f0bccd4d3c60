use crate::adapters::http::messages::{IntraCloudAuthRequest, IntraCloudAuthResponse};
use crate::adapters::http::{endpoint, HttpTransport};
use crate::domain::model::{ServiceDescriptor, SystemIdentity};
use crate::domain::ports::{AuthorizationService, AuthorizationVerdict};
use crate::utils::error::{Result, Stage};
use async_trait::async_trait;
use url::Url;

/// Intra-cloud authorization client:
/// `PUT {base}/SystemGroup/{group}/System/{name}` for the requester.
pub struct HttpAuthorizationService {
    transport: HttpTransport,
    base: Url,
    authentication_info: String,
}

impl HttpAuthorizationService {
    pub fn new(
        transport: HttpTransport,
        base: Url,
        authentication_info: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            base,
            authentication_info: authentication_info.into(),
        }
    }
}

#[async_trait]
impl AuthorizationService for HttpAuthorizationService {
    async fn check_authorization(
        &self,
        requester: &SystemIdentity,
        service: &ServiceDescriptor,
        providers: &[SystemIdentity],
    ) -> Result<AuthorizationVerdict> {
        let url = endpoint(
            &self.base,
            &[
                "SystemGroup",
                requester.system_group.as_str(),
                "System",
                requester.system_name.as_str(),
            ],
        );
        let body = IntraCloudAuthRequest {
            authentication_info: &self.authentication_info,
            requested_service: service,
            generate_token: false,
            provider_list: providers,
        };

        let response: IntraCloudAuthResponse = self
            .transport
            .put_json(Stage::Authorization, url, &body)
            .await?;
        let (decisions, authorization_info) = response.decisions();

        tracing::debug!(
            "Authorization granted {} of {} provider(s) to {}",
            decisions.values().filter(|granted| **granted).count(),
            providers.len(),
            requester
        );
        Ok(AuthorizationVerdict {
            decisions,
            authorization_info,
        })
    }
}
