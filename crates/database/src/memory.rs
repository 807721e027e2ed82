use crate::error::DbError;
use crate::store::BillingStore;
use async_trait::async_trait;
use core_types::{
    BillingRecord, Client, ClientFields, CustomerTotal, PendingInvoice, PlatformTransaction,
    Transaction, pending_amount,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// An in-process `BillingStore` with the same ordering, join and constraint
/// behaviour as the PostgreSQL schema.
///
/// `identification` is unique and a client referenced by billing rows cannot
/// be deleted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    clients: BTreeMap<i32, Client>,
    transactions: BTreeMap<i32, Transaction>,
    billing: Vec<BillingRecord>,
    last_client_id: i32,
}

impl Tables {
    fn identification_taken(&self, identification: &str, except: Option<i32>) -> bool {
        self.clients
            .values()
            .any(|c| c.identification == identification && Some(c.id_client) != except)
    }

    /// Billing rows joined with their client and transaction; rows with a
    /// dangling reference are skipped like an inner join would.
    fn joined(&self) -> impl Iterator<Item = (&BillingRecord, &Client, &Transaction)> {
        self.billing.iter().filter_map(|b| {
            let client = self.clients.get(&b.id_client)?;
            let transaction = self.transactions.get(&b.id_transaction)?;
            Some((b, client, transaction))
        })
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_transaction(&self, transaction: Transaction) {
        let mut tables = self.tables.write().await;
        tables
            .transactions
            .insert(transaction.id_transaction, transaction);
    }

    /// Fails when the referenced client or transaction does not exist.
    pub async fn insert_billing(&self, record: BillingRecord) -> Result<(), DbError> {
        let mut tables = self.tables.write().await;
        if !tables.clients.contains_key(&record.id_client) {
            return Err(DbError::ForeignKeyViolation(format!(
                "client {} does not exist",
                record.id_client
            )));
        }
        if !tables.transactions.contains_key(&record.id_transaction) {
            return Err(DbError::ForeignKeyViolation(format!(
                "transaction {} does not exist",
                record.id_transaction
            )));
        }
        tables.billing.push(record);
        Ok(())
    }
}

#[async_trait]
impl BillingStore for MemoryStore {
    async fn list_clients(&self) -> Result<Vec<Client>, DbError> {
        let tables = self.tables.read().await;
        let mut clients: Vec<Client> = tables.clients.values().cloned().collect();
        clients.sort_by(|a, b| a.customer_name.cmp(&b.customer_name));
        Ok(clients)
    }

    async fn get_client(&self, id_client: i32) -> Result<Option<Client>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables.clients.get(&id_client).cloned())
    }

    async fn create_client(&self, fields: &ClientFields) -> Result<i32, DbError> {
        let mut tables = self.tables.write().await;
        if tables.identification_taken(&fields.identification, None) {
            return Err(DbError::UniqueViolation(format!(
                "identification {} already exists",
                fields.identification
            )));
        }
        tables.last_client_id += 1;
        let id_client = tables.last_client_id;
        tables
            .clients
            .insert(id_client, Client::from_fields(id_client, fields.clone()));
        Ok(id_client)
    }

    async fn update_client(&self, id_client: i32, fields: &ClientFields) -> Result<bool, DbError> {
        let mut tables = self.tables.write().await;
        if !tables.clients.contains_key(&id_client) {
            return Ok(false);
        }
        if tables.identification_taken(&fields.identification, Some(id_client)) {
            return Err(DbError::UniqueViolation(format!(
                "identification {} already exists",
                fields.identification
            )));
        }
        tables
            .clients
            .insert(id_client, Client::from_fields(id_client, fields.clone()));
        Ok(true)
    }

    async fn delete_client(&self, id_client: i32) -> Result<bool, DbError> {
        let mut tables = self.tables.write().await;
        if !tables.clients.contains_key(&id_client) {
            return Ok(false);
        }
        if tables.billing.iter().any(|b| b.id_client == id_client) {
            return Err(DbError::ForeignKeyViolation(format!(
                "client {id_client} is still referenced from table \"billing\""
            )));
        }
        tables.clients.remove(&id_client);
        Ok(true)
    }

    async fn pending_invoices(&self) -> Result<Vec<PendingInvoice>, DbError> {
        let tables = self.tables.read().await;
        let mut invoices: Vec<PendingInvoice> = tables
            .joined()
            .filter(|(b, _, _)| b.amount_paid < b.invoice_amount)
            .map(|(b, c, t)| PendingInvoice {
                id_billing: b.id_billing,
                customer_name: c.customer_name.clone(),
                identification: c.identification.clone(),
                phone_number: c.phone_number.clone(),
                email: c.email.clone(),
                id_transaction: t.id_transaction,
                date_time: t.date_time,
                transaction_amount: t.transaction_amount,
                invoice_amount: b.invoice_amount,
                amount_paid: b.amount_paid,
                pending_amount: pending_amount(b.invoice_amount, b.amount_paid),
            })
            .collect();
        invoices.sort_by(|a, b| b.pending_amount.cmp(&a.pending_amount));
        Ok(invoices)
    }

    async fn total_paid_by_customer(&self) -> Result<Vec<CustomerTotal>, DbError> {
        let tables = self.tables.read().await;
        let mut per_client: BTreeMap<i32, Decimal> = BTreeMap::new();
        for b in &tables.billing {
            if tables.clients.contains_key(&b.id_client) {
                *per_client.entry(b.id_client).or_default() += b.amount_paid;
            }
        }

        let mut totals: Vec<CustomerTotal> = per_client
            .into_iter()
            .filter_map(|(id_client, total_paid)| {
                let client = tables.clients.get(&id_client)?;
                Some(CustomerTotal {
                    customer_name: client.customer_name.clone(),
                    identification: client.identification.clone(),
                    total_paid,
                })
            })
            .collect();
        totals.sort_by(|a, b| b.total_paid.cmp(&a.total_paid));
        Ok(totals)
    }

    async fn transactions_by_platform(
        &self,
        platform: &str,
    ) -> Result<Vec<PlatformTransaction>, DbError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<PlatformTransaction> = tables
            .joined()
            .filter(|(b, _, _)| b.used_platform == platform)
            .map(|(b, c, t)| PlatformTransaction {
                id_transaction: t.id_transaction,
                date_time: t.date_time,
                transaction_amount: t.transaction_amount,
                state: t.state.clone(),
                customer_name: c.customer_name.clone(),
                identification: c.identification.clone(),
                id_billing: b.id_billing,
                billing_period: b.billing_period.clone(),
            })
            .collect();
        rows.sort_by(|a, b| b.date_time.cmp(&a.date_time));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn fields(name: &str, identification: &str) -> ClientFields {
        ClientFields {
            customer_name: name.to_string(),
            identification: identification.to_string(),
            ..ClientFields::default()
        }
    }

    fn transaction(id: i32, day: u32) -> Transaction {
        Transaction {
            id_transaction: id,
            date_time: NaiveDate::from_ymd_opt(2024, 6, day)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            transaction_amount: dec!(100.00),
            state: "Completed".to_string(),
        }
    }

    fn billing(id: i32, client: i32, tx: i32, invoice: Decimal, paid: Decimal) -> BillingRecord {
        BillingRecord {
            id_billing: id,
            id_client: client,
            id_transaction: tx,
            invoice_amount: invoice,
            amount_paid: paid,
            billing_period: "2024-06".to_string(),
            used_platform: "Nequi".to_string(),
        }
    }

    #[tokio::test]
    async fn ids_are_sequential_and_clients_sorted_by_name() {
        let store = MemoryStore::new();
        assert_eq!(store.create_client(&fields("Zoe", "1")).await.unwrap(), 1);
        assert_eq!(store.create_client(&fields("Ana", "2")).await.unwrap(), 2);

        let names: Vec<String> = store
            .list_clients()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.customer_name)
            .collect();
        assert_eq!(names, ["Ana", "Zoe"]);
    }

    #[tokio::test]
    async fn duplicate_identification_is_rejected() {
        let store = MemoryStore::new();
        store.create_client(&fields("Ana", "123")).await.unwrap();
        let err = store.create_client(&fields("Other", "123")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn referenced_client_cannot_be_deleted() {
        let store = MemoryStore::new();
        let id = store.create_client(&fields("Ana", "123")).await.unwrap();
        store.insert_transaction(transaction(1, 1)).await;
        store
            .insert_billing(billing(1, id, 1, dec!(10), dec!(5)))
            .await
            .unwrap();

        let err = store.delete_client(id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation(_)));
        assert!(store.get_client(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unknown_client_update_and_delete_report_no_match() {
        let store = MemoryStore::new();
        assert!(!store.update_client(9, &fields("X", "9")).await.unwrap());
        assert!(!store.delete_client(9).await.unwrap());
    }

    #[tokio::test]
    async fn platform_filter_orders_by_most_recent() {
        let store = MemoryStore::new();
        let id = store.create_client(&fields("Ana", "123")).await.unwrap();
        for (tx, day) in [(1, 3), (2, 20), (3, 11)] {
            store.insert_transaction(transaction(tx, day)).await;
            store
                .insert_billing(billing(tx, id, tx, dec!(10), dec!(10)))
                .await
                .unwrap();
        }
        let mut other = billing(4, id, 1, dec!(10), dec!(0));
        other.used_platform = "Daviplata".to_string();
        store.insert_billing(other).await.unwrap();

        let ids: Vec<i32> = store
            .transactions_by_platform("Nequi")
            .await
            .unwrap()
            .iter()
            .map(|t| t.id_transaction)
            .collect();
        assert_eq!(ids, [2, 3, 1]);
    }

    #[tokio::test]
    async fn billing_requires_existing_rows() {
        let store = MemoryStore::new();
        let err = store
            .insert_billing(billing(1, 1, 1, dec!(1), dec!(0)))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation(_)));
    }
}
