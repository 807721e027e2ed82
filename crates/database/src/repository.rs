use crate::error::DbError;
use crate::store::BillingStore;
use async_trait::async_trait;
use core_types::{Client, ClientFields, CustomerTotal, PendingInvoice, PlatformTransaction};
use sqlx::postgres::PgPool;

/// The `DbRepository` provides the PostgreSQL implementation of `BillingStore`.
/// It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BillingStore for DbRepository {
    async fn list_clients(&self) -> Result<Vec<Client>, DbError> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id_client, customer_name, identification, address, phone_number, email
            FROM clients
            ORDER BY customer_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(clients)
    }

    async fn get_client(&self, id_client: i32) -> Result<Option<Client>, DbError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id_client, customer_name, identification, address, phone_number, email
            FROM clients
            WHERE id_client = $1
            "#,
        )
        .bind(id_client)
        .fetch_optional(&self.pool)
        .await?;
        Ok(client)
    }

    async fn create_client(&self, fields: &ClientFields) -> Result<i32, DbError> {
        let id_client = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO clients (customer_name, identification, address, phone_number, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id_client
            "#,
        )
        .bind(&fields.customer_name)
        .bind(&fields.identification)
        .bind(&fields.address)
        .bind(&fields.phone_number)
        .bind(&fields.email)
        .fetch_one(&self.pool)
        .await?;
        Ok(id_client)
    }

    async fn update_client(&self, id_client: i32, fields: &ClientFields) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE clients SET
                customer_name = $1,
                identification = $2,
                address = $3,
                phone_number = $4,
                email = $5
            WHERE id_client = $6
            "#,
        )
        .bind(&fields.customer_name)
        .bind(&fields.identification)
        .bind(&fields.address)
        .bind(&fields.phone_number)
        .bind(&fields.email)
        .bind(id_client)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_client(&self, id_client: i32) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM clients WHERE id_client = $1")
            .bind(id_client)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn pending_invoices(&self) -> Result<Vec<PendingInvoice>, DbError> {
        // Casts pin the decoded types regardless of the exact column definitions.
        let invoices = sqlx::query_as::<_, PendingInvoice>(
            r#"
            SELECT
                b.id_billing,
                c.customer_name,
                c.identification,
                c.phone_number,
                c.email,
                t.id_transaction,
                t.date_time::timestamp AS date_time,
                t.transaction_amount::numeric AS transaction_amount,
                b.invoice_amount::numeric AS invoice_amount,
                b.amount_paid::numeric AS amount_paid,
                COALESCE(b.invoice_amount - b.amount_paid, 0)::numeric AS pending_amount
            FROM
                billing b
            JOIN
                clients c ON b.id_client = c.id_client
            JOIN
                transactions t ON b.id_transaction = t.id_transaction
            WHERE
                b.amount_paid < b.invoice_amount
            ORDER BY
                pending_amount DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(invoices)
    }

    async fn total_paid_by_customer(&self) -> Result<Vec<CustomerTotal>, DbError> {
        let totals = sqlx::query_as::<_, CustomerTotal>(
            r#"
            SELECT
                c.customer_name,
                c.identification,
                COALESCE(SUM(b.amount_paid), 0)::numeric AS total_paid
            FROM
                billing b
            JOIN
                clients c ON b.id_client = c.id_client
            GROUP BY
                c.id_client, c.customer_name, c.identification
            ORDER BY
                total_paid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(totals)
    }

    async fn transactions_by_platform(
        &self,
        platform: &str,
    ) -> Result<Vec<PlatformTransaction>, DbError> {
        let transactions = sqlx::query_as::<_, PlatformTransaction>(
            r#"
            SELECT
                t.id_transaction,
                t.date_time::timestamp AS date_time,
                t.transaction_amount::numeric AS transaction_amount,
                t.state,
                c.customer_name,
                c.identification,
                b.id_billing,
                b.billing_period
            FROM
                transactions t
            JOIN
                billing b ON t.id_transaction = b.id_transaction
            JOIN
                clients c ON b.id_client = c.id_client
            WHERE
                b.used_platform = $1
            ORDER BY
                t.date_time DESC
            "#,
        )
        .bind(platform)
        .fetch_all(&self.pool)
        .await?;
        Ok(transactions)
    }
}
