//! # Billdesk Database Crate
//!
//! This crate is the application-specific interface to the PostgreSQL
//! database holding the `clients`, `billing` and `transactions` tables.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** all SQL lives here. The rest of the application talks to the
//!   `BillingStore` trait and never sees a query string.
//! - **One statement per operation:** every store method issues exactly one
//!   parameterized statement. There are no multi-statement transactions.
//! - **Asynchronous & Pooled:** a single `PgPool` with a bounded capacity is
//!   shared across all concurrent requests.
//!
//! ## Public API
//!
//! - `connect_lazy` / `check_connection`: build the pool and probe it once at startup.
//! - `BillingStore`: the data access contract used by the web server.
//! - `DbRepository`: the PostgreSQL implementation of `BillingStore`.
//! - `MemoryStore` (feature `memory`): an in-process implementation for tests.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
#[cfg(feature = "memory")]
pub mod memory;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{check_connection, connect_lazy, connect_options};
pub use error::DbError;
#[cfg(feature = "memory")]
pub use memory::MemoryStore;
pub use repository::DbRepository;
pub use store::BillingStore;
