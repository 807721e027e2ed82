use api_client::{BillingApi, error::ApiError};
use async_trait::async_trait;
use core_types::{
    Client, ClientFields, CreatedClient, CustomerTotal, MessageResponse, PendingInvoice,
    PlatformTransaction,
};
use tokio::sync::Mutex;

/// An in-memory `BillingApi` answering the way the REST API does.
#[derive(Default)]
pub struct MockApi {
    pub clients: Mutex<Vec<Client>>,
    pub invoices: Vec<PendingInvoice>,
    pub totals: Vec<CustomerTotal>,
    pub transactions: Vec<PlatformTransaction>,
    /// Makes `list_clients` fail with a 500.
    pub clients_down: bool,
    /// Makes `pending_invoices` fail with a 500.
    pub invoices_down: bool,
}

fn server_down() -> ApiError {
    ApiError::Server {
        status: 500,
        message: "An internal database error occurred".to_string(),
    }
}

fn not_found() -> ApiError {
    ApiError::Server {
        status: 404,
        message: "Customer not found".to_string(),
    }
}

impl MockApi {
    pub fn with_clients(clients: Vec<Client>) -> Self {
        Self {
            clients: Mutex::new(clients),
            ..Self::default()
        }
    }

    pub async fn clients(&self) -> Vec<Client> {
        self.clients.lock().await.clone()
    }
}

#[async_trait]
impl BillingApi for MockApi {
    async fn list_clients(&self) -> Result<Vec<Client>, ApiError> {
        if self.clients_down {
            return Err(server_down());
        }
        let mut clients = self.clients().await;
        clients.sort_by(|a, b| a.customer_name.cmp(&b.customer_name));
        Ok(clients)
    }

    async fn get_client(&self, id_client: i32) -> Result<Option<Client>, ApiError> {
        let clients = self.clients.lock().await;
        Ok(clients.iter().find(|c| c.id_client == id_client).cloned())
    }

    async fn create_client(&self, fields: &ClientFields) -> Result<CreatedClient, ApiError> {
        let mut clients = self.clients.lock().await;
        let id_client = clients.iter().map(|c| c.id_client).max().unwrap_or(0) + 1;
        clients.push(Client::from_fields(id_client, fields.clone()));
        Ok(CreatedClient {
            message: "Customer created successfully".to_string(),
            id_client,
        })
    }

    async fn update_client(
        &self,
        id_client: i32,
        fields: &ClientFields,
    ) -> Result<MessageResponse, ApiError> {
        let mut clients = self.clients.lock().await;
        let client = clients
            .iter_mut()
            .find(|c| c.id_client == id_client)
            .ok_or_else(not_found)?;
        *client = Client::from_fields(id_client, fields.clone());
        Ok(MessageResponse::new("Customer updated"))
    }

    async fn delete_client(&self, id_client: i32) -> Result<MessageResponse, ApiError> {
        let mut clients = self.clients.lock().await;
        let before = clients.len();
        clients.retain(|c| c.id_client != id_client);
        if clients.len() == before {
            return Err(not_found());
        }
        Ok(MessageResponse::new("Customer deleted"))
    }

    async fn pending_invoices(&self) -> Result<Vec<PendingInvoice>, ApiError> {
        if self.invoices_down {
            return Err(server_down());
        }
        Ok(self.invoices.clone())
    }

    async fn total_paid_by_customer(&self) -> Result<Vec<CustomerTotal>, ApiError> {
        Ok(self.totals.clone())
    }

    async fn transactions_by_platform(
        &self,
        platform: &str,
    ) -> Result<Vec<PlatformTransaction>, ApiError> {
        // The mock has no billing rows to filter on; "none" stands for an unused platform.
        if platform == "none" {
            return Ok(Vec::new());
        }
        Ok(self.transactions.clone())
    }
}
