//! repokit - lazy named-connection and table resolution for repository-style
//! database access
//!
//! A repository resolves "which connection" and "which table" on first use,
//! caches the connection handle, and hands out builders pre-bound to both.
//! Live connections come from a [`ConnectionProvider`]; this crate ships a
//! tokio-postgres provider and an in-memory one for tests.
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use repokit::{DatabaseConfig, Repository, TableRepository, TokioPostgresProvider};
//!
//! let config = DatabaseConfig::new()
//!     .with_default("main")
//!     .with_connection("main", "postgres://localhost/app");
//! let provider = Arc::new(TokioPostgresProvider::new(&config));
//! let mut users = TableRepository::new(provider, &config).with_table("users");
//!
//! // Resolves the "main" connection once; later calls reuse the cached handle.
//! let builder = users.builder(None, None).await?;
//! let (sql, params) = builder
//!     .select(&["id", "name"])
//!     .filter("active", true)
//!     .to_sql();
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod providers;
pub mod repository;
pub mod resolver;
pub mod traits;
pub mod types;

// Re-export main types for convenient access
pub use builder::TableBuilder;
pub use config::DatabaseConfig;
pub use error::{RepoKitError, Result};
pub use providers::{InMemoryProvider, PgConnection, StaticConnection, TokioPostgresProvider};
pub use repository::{Repository, TableRepository};
pub use resolver::ConnectionResolver;
pub use traits::{Connection, ConnectionProvider};
pub use types::SqlValue;
