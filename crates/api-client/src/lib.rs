use crate::error::ApiError;
use async_trait::async_trait;
use configuration::ClientSettings;
use core_types::{
    Client, ClientFields, CreatedClient, CustomerTotal, ErrorEnvelope, MessageResponse,
    PendingInvoice, PlatformTransaction,
};
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;

pub mod error;

/// The client-side contract of the billing REST API, one method per route.
/// The admin tool is written against this trait so a mock can stand in for
/// the network in tests.
#[async_trait]
pub trait BillingApi: Send + Sync {
    async fn list_clients(&self) -> Result<Vec<Client>, ApiError>;

    /// `Ok(None)` when the API answers 404.
    async fn get_client(&self, id_client: i32) -> Result<Option<Client>, ApiError>;

    async fn create_client(&self, fields: &ClientFields) -> Result<CreatedClient, ApiError>;

    async fn update_client(
        &self,
        id_client: i32,
        fields: &ClientFields,
    ) -> Result<MessageResponse, ApiError>;

    async fn delete_client(&self, id_client: i32) -> Result<MessageResponse, ApiError>;

    async fn pending_invoices(&self) -> Result<Vec<PendingInvoice>, ApiError>;

    async fn total_paid_by_customer(&self) -> Result<Vec<CustomerTotal>, ApiError>;

    async fn transactions_by_platform(
        &self,
        platform: &str,
    ) -> Result<Vec<PlatformTransaction>, ApiError>;
}

/// A concrete implementation of `BillingApi` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBillingClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBillingClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        Self::with_base_url(&settings.api_url)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    /// Appends percent-encoded path segments to the base URL, keeping any
    /// path prefix it already has.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        decode(response).await
    }
}

/// Decodes a success body as `T`, or an error body as `ApiError::Server`.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    if status.is_success() {
        serde_json::from_str::<T>(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
    } else {
        let message = serde_json::from_str::<ErrorEnvelope>(&text)
            .map(|envelope| envelope.message)
            .unwrap_or(text);
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl BillingApi for HttpBillingClient {
    async fn list_clients(&self) -> Result<Vec<Client>, ApiError> {
        self.get(&["clients"]).await
    }

    async fn get_client(&self, id_client: i32) -> Result<Option<Client>, ApiError> {
        let url = self.endpoint(&["clients", &id_client.to_string()])?;
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(response).await.map(Some)
    }

    async fn create_client(&self, fields: &ClientFields) -> Result<CreatedClient, ApiError> {
        let url = self.endpoint(&["clients"])?;
        let response = self.client.post(url).json(fields).send().await?;
        decode(response).await
    }

    async fn update_client(
        &self,
        id_client: i32,
        fields: &ClientFields,
    ) -> Result<MessageResponse, ApiError> {
        let url = self.endpoint(&["clients", &id_client.to_string()])?;
        let response = self.client.put(url).json(fields).send().await?;
        decode(response).await
    }

    async fn delete_client(&self, id_client: i32) -> Result<MessageResponse, ApiError> {
        let url = self.endpoint(&["clients", &id_client.to_string()])?;
        let response = self.client.delete(url).send().await?;
        decode(response).await
    }

    async fn pending_invoices(&self) -> Result<Vec<PendingInvoice>, ApiError> {
        self.get(&["pending_invoices"]).await
    }

    async fn total_paid_by_customer(&self) -> Result<Vec<CustomerTotal>, ApiError> {
        self.get(&["total_paid_by_customer"]).await
    }

    async fn transactions_by_platform(
        &self,
        platform: &str,
    ) -> Result<Vec<PlatformTransaction>, ApiError> {
        self.get(&["transactions_by_platform", platform]).await
    }
}
