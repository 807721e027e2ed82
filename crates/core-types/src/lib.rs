pub mod billing;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use billing::pending_amount;
pub use error::CoreError;
pub use structs::{
    BillingRecord, Client, ClientFields, ClientPayload, CreatedClient, CustomerTotal,
    ErrorEnvelope, MessageResponse, PendingInvoice, PlatformTransaction, Transaction,
};
