use crate::error::CoreError;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A billed customer, as projected from a row of the `clients` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Client {
    pub id_client: i32,
    pub customer_name: String,
    /// External identifier of the customer (national id, tax number...).
    pub identification: String,
    pub address: String,
    pub phone_number: String,
    pub email: String,
}

impl Client {
    pub fn from_fields(id_client: i32, fields: ClientFields) -> Self {
        Self {
            id_client,
            customer_name: fields.customer_name,
            identification: fields.identification,
            address: fields.address,
            phone_number: fields.phone_number,
            email: fields.email,
        }
    }

    /// The editable part of the record.
    pub fn fields(&self) -> ClientFields {
        ClientFields {
            customer_name: self.customer_name.clone(),
            identification: self.identification.clone(),
            address: self.address.clone(),
            phone_number: self.phone_number.clone(),
            email: self.email.clone(),
        }
    }
}

/// The five editable client fields, written as a whole on create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientFields {
    pub customer_name: String,
    pub identification: String,
    pub address: String,
    pub phone_number: String,
    pub email: String,
}

/// The request body of `POST /clients` and `PUT /clients/:id`.
///
/// Every field is optional at the wire level so that a missing one can be
/// reported by name instead of as a generic JSON error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientPayload {
    pub customer_name: Option<String>,
    pub identification: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl ClientPayload {
    /// Presence check only: empty strings are accepted.
    pub fn into_fields(self) -> Result<ClientFields, CoreError> {
        Ok(ClientFields {
            customer_name: self
                .customer_name
                .ok_or(CoreError::MissingField("customer_name"))?,
            identification: self
                .identification
                .ok_or(CoreError::MissingField("identification"))?,
            address: self.address.ok_or(CoreError::MissingField("address"))?,
            phone_number: self
                .phone_number
                .ok_or(CoreError::MissingField("phone_number"))?,
            email: self.email.ok_or(CoreError::MissingField("email"))?,
        })
    }
}

/// Represents a row from the `billing` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct BillingRecord {
    pub id_billing: i32,
    pub id_client: i32,
    pub id_transaction: i32,
    pub invoice_amount: Decimal,
    pub amount_paid: Decimal,
    pub billing_period: String,
    /// Payment platform the invoice was settled through (e.g. "Nequi").
    pub used_platform: String,
}

/// Represents a row from the `transactions` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Transaction {
    pub id_transaction: i32,
    pub date_time: NaiveDateTime,
    pub transaction_amount: Decimal,
    pub state: String,
}

/// A billing row joined with its client and transaction, for invoices that
/// still have an outstanding balance.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PendingInvoice {
    pub id_billing: i32,
    pub customer_name: String,
    pub identification: String,
    pub phone_number: String,
    pub email: String,
    pub id_transaction: i32,
    pub date_time: NaiveDateTime,
    pub transaction_amount: Decimal,
    pub invoice_amount: Decimal,
    pub amount_paid: Decimal,
    pub pending_amount: Decimal,
}

/// Sum of everything a customer has paid across their billing rows.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CustomerTotal {
    pub customer_name: String,
    pub identification: String,
    pub total_paid: Decimal,
}

/// A transaction joined with its billing row and client, filtered by platform.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PlatformTransaction {
    pub id_transaction: i32,
    pub date_time: NaiveDateTime,
    pub transaction_amount: Decimal,
    pub state: String,
    pub customer_name: String,
    pub identification: String,
    pub id_billing: i32,
    pub billing_period: String,
}

/// Response body of `POST /clients`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedClient {
    pub message: String,
    pub id_client: i32,
}

/// Response body of the update and delete routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of every error response: the failing endpoint and method plus a
/// human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Always `"error"`.
    pub status: String,
    pub endpoint: String,
    pub method: String,
    pub message: String,
}
