use crate::adapters::http::messages::{ServiceQueryForm, ServiceQueryResult};
use crate::adapters::http::{endpoint, HttpTransport};
use crate::domain::model::{ProvidedService, ServiceDescriptor};
use crate::domain::ports::ServiceRegistry;
use crate::utils::error::{Result, Stage};
use async_trait::async_trait;
use url::Url;

/// Service registry client: `PUT {base}/{serviceGroup}/{serviceDefinition}`.
pub struct HttpServiceRegistry {
    transport: HttpTransport,
    base: Url,
    tsig_key: String,
}

impl HttpServiceRegistry {
    pub fn new(transport: HttpTransport, base: Url, tsig_key: impl Into<String>) -> Self {
        Self {
            transport,
            base,
            tsig_key: tsig_key.into(),
        }
    }
}

#[async_trait]
impl ServiceRegistry for HttpServiceRegistry {
    async fn query_providers(&self, service: &ServiceDescriptor) -> Result<Vec<ProvidedService>> {
        let url = endpoint(
            &self.base,
            &[
                service.service_group.as_str(),
                service.service_definition.as_str(),
            ],
        );
        let form = ServiceQueryForm::new(service, &self.tsig_key);

        let result: ServiceQueryResult = self
            .transport
            .put_json(Stage::RegistryQuery, url, &form)
            .await?;

        for provided in &result.service_query_data {
            tracing::debug!("Registry offers {} at {}", provided.provider, provided.service_uri);
        }
        Ok(result.service_query_data)
    }
}
