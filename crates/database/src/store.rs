use crate::error::DbError;
use async_trait::async_trait;
use core_types::{Client, ClientFields, CustomerTotal, PendingInvoice, PlatformTransaction};

/// The data access contract behind every API route.
///
/// Each method maps to exactly one SQL statement in the PostgreSQL
/// implementation.
#[async_trait]
pub trait BillingStore: Send + Sync {
    /// All clients, ordered by `customer_name`.
    async fn list_clients(&self) -> Result<Vec<Client>, DbError>;

    async fn get_client(&self, id_client: i32) -> Result<Option<Client>, DbError>;

    /// Inserts a client and returns its generated id.
    async fn create_client(&self, fields: &ClientFields) -> Result<i32, DbError>;

    /// Replaces the five editable fields. Returns `false` when no row matched.
    async fn update_client(&self, id_client: i32, fields: &ClientFields) -> Result<bool, DbError>;

    /// Returns `false` when no row matched.
    async fn delete_client(&self, id_client: i32) -> Result<bool, DbError>;

    /// Billing rows with `amount_paid < invoice_amount`, largest pending amount first.
    async fn pending_invoices(&self) -> Result<Vec<PendingInvoice>, DbError>;

    /// Sum of `amount_paid` per client, largest first.
    async fn total_paid_by_customer(&self) -> Result<Vec<CustomerTotal>, DbError>;

    /// Transactions whose billing row used `platform`, most recent first.
    async fn transactions_by_platform(
        &self,
        platform: &str,
    ) -> Result<Vec<PlatformTransaction>, DbError>;
}
