//! stacks-server: HTTP record service for books and users
//!
//! Exposes CRUD endpoints with JSON payloads over a single SQLite
//! database file. Logical misses (not-found, wrong content type) keep
//! the legacy wire contract: HTTP 200 with a message-string body.

pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod routes;
pub mod server;

pub use db::Database;
pub use error::{ServerError, ServerResult};
pub use server::{run_server, ServerArgs};
