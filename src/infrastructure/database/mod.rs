//! Record store adapters: `SQLite` via sqlx, plus an in-memory store.

pub mod connection;
pub mod memory_store;
pub mod record_store;

pub use connection::DatabaseConnection;
pub use memory_store::InMemoryRecordStore;
pub use record_store::SqliteRecordStore;
