use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error};

use crate::config::DatabaseConfig;
use crate::error::{RepoKitError, Result};
use crate::traits::{Connection, ConnectionProvider};

/// An established PostgreSQL connection.
pub struct PgConnection {
    name: String,
    client: Client,
}

impl PgConnection {
    /// Access the underlying tokio-postgres client, e.g. to hand it a
    /// builder's rendered SQL.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl Connection for PgConnection {
    fn name(&self) -> &str {
        &self.name
    }
}

/// PostgreSQL connection provider backed by tokio-postgres.
///
/// Carries the named connection-string registry from `DatabaseConfig` and
/// reuses established clients per name. Reuse lives here rather than in the
/// resolver; the resolution layer treats handles as opaque.
pub struct TokioPostgresProvider {
    connections: HashMap<String, String>,
    default: Option<String>,
    established: Mutex<HashMap<String, Arc<PgConnection>>>,
}

impl TokioPostgresProvider {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            connections: config.connections.clone(),
            default: config.default.clone(),
            established: Mutex::new(HashMap::new()),
        }
    }

    async fn connect(&self, name: &str, connection_string: &str) -> Result<Arc<PgConnection>> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls)
            .await
            .map_err(|e| RepoKitError::ConnectionFailed(e.to_string()))?;

        // Drive the connection until the client is dropped
        let task_name = name.to_string();
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(connection = %task_name, "PostgreSQL connection error: {}", e);
            }
        });

        debug!(connection = %name, "PostgreSQL connection established");
        Ok(Arc::new(PgConnection {
            name: name.to_string(),
            client,
        }))
    }
}

#[async_trait]
impl ConnectionProvider for TokioPostgresProvider {
    async fn resolve(&self, name: &str) -> Result<Arc<dyn Connection>> {
        if let Some(existing) = self.established.lock().unwrap().get(name) {
            return Ok(Arc::clone(existing) as Arc<dyn Connection>);
        }

        let connection_string = self
            .connections
            .get(name)
            .ok_or_else(|| RepoKitError::UnknownConnection(name.to_string()))?;
        let connection = self.connect(name, connection_string).await?;
        self.established
            .lock()
            .unwrap()
            .insert(name.to_string(), Arc::clone(&connection));

        Ok(connection as Arc<dyn Connection>)
    }

    async fn resolve_default(&self) -> Result<Arc<dyn Connection>> {
        let name = self
            .default
            .clone()
            .ok_or(RepoKitError::MissingDefaultConnection)?;
        self.resolve(&name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_name_is_rejected_without_connecting() {
        let config = DatabaseConfig::new().with_connection("main", "postgres://localhost/app");
        let provider = TokioPostgresProvider::new(&config);

        let err = provider.resolve("analytics").await.unwrap_err();
        assert!(matches!(err, RepoKitError::UnknownConnection(name) if name == "analytics"));
    }

    #[tokio::test]
    async fn test_missing_default_is_a_configuration_error() {
        let provider = TokioPostgresProvider::new(&DatabaseConfig::new());

        let err = provider.resolve_default().await.unwrap_err();
        assert!(matches!(err, RepoKitError::MissingDefaultConnection));
    }
}
