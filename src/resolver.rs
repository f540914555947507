use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::DatabaseConfig;
use crate::error::{RepoKitError, Result};
use crate::traits::{Connection, ConnectionProvider};

/// Connection binding state of a resolver.
///
/// A name can be stored without a live handle (before the first resolve, or
/// after a failed one), but a handle never outlives the name it was resolved
/// under.
enum ConnectionState {
    Unbound {
        name: Option<String>,
    },
    Bound {
        name: Option<String>,
        handle: Arc<dyn Connection>,
    },
}

impl ConnectionState {
    fn name(&self) -> Option<&str> {
        match self {
            ConnectionState::Unbound { name } | ConnectionState::Bound { name, .. } => {
                name.as_deref()
            }
        }
    }

    fn handle(&self) -> Option<&Arc<dyn Connection>> {
        match self {
            ConnectionState::Bound { handle, .. } => Some(handle),
            ConnectionState::Unbound { .. } => None,
        }
    }
}

/// Resolves connection names into live handles and caches the result.
///
/// Holds at most one cached handle at a time; storing a new name invalidates
/// and replaces it. The table name is plain state with no side effects.
/// Instances are single-writer: all mutation goes through `&mut self`, and
/// any sharing/pooling of the underlying connections is the provider's
/// concern.
pub struct ConnectionResolver {
    provider: Arc<dyn ConnectionProvider>,
    default_connection: Option<String>,
    state: ConnectionState,
    table: Option<String>,
}

impl ConnectionResolver {
    /// Create a resolver with no default connection name configured.
    pub fn new(provider: Arc<dyn ConnectionProvider>) -> Self {
        Self {
            provider,
            default_connection: None,
            state: ConnectionState::Unbound { name: None },
            table: None,
        }
    }

    /// Create a resolver taking its default connection name from config.
    pub fn from_config(provider: Arc<dyn ConnectionProvider>, config: &DatabaseConfig) -> Self {
        let mut resolver = Self::new(provider);
        resolver.default_connection = config.default.clone();
        resolver
    }

    /// Set the default connection name used when none is stored.
    pub fn with_default_connection(mut self, name: impl Into<String>) -> Self {
        self.default_connection = Some(name.into());
        self
    }

    /// The cached connection handle, if one has been established.
    pub fn connection(&self) -> Option<&Arc<dyn Connection>> {
        self.state.handle()
    }

    /// The stored connection name, if any.
    pub fn connection_name(&self) -> Option<&str> {
        self.state.name()
    }

    /// The stored connection name, or `fallback` if none is set.
    pub fn connection_name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.state.name().unwrap_or(fallback)
    }

    /// The stored table name, if any. Never an empty string.
    pub fn table_name(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// The stored table name, or `fallback` if none is set.
    pub fn table_name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.table.as_deref().unwrap_or(fallback)
    }

    /// The configured default connection name.
    pub fn default_connection_name(&self) -> Result<&str> {
        self.default_connection
            .as_deref()
            .ok_or(RepoKitError::MissingDefaultConnection)
    }

    /// Store a connection name and eagerly re-resolve the handle.
    ///
    /// A failed resolve invalidates any previously cached handle before the
    /// error propagates; the name stays stored either way.
    pub async fn set_connection(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        debug!(connection = %name, "switching connection");
        self.state = ConnectionState::Unbound { name: Some(name) };
        self.refresh_connection().await
    }

    /// Re-resolve the handle from the stored name and replace the cache.
    ///
    /// With no name stored, the provider is asked for its default
    /// connection; which connection that is stays provider-defined.
    pub async fn refresh_connection(&mut self) -> Result<()> {
        let name = self.state.name().map(str::to_string);
        let resolved = match name.as_deref() {
            Some(n) => self.provider.resolve(n).await,
            None => self.provider.resolve_default().await,
        };
        match resolved {
            Ok(handle) => {
                trace!(connection = handle.name(), "connection handle refreshed");
                self.state = ConnectionState::Bound { name, handle };
                Ok(())
            }
            Err(err) => {
                self.state = ConnectionState::Unbound { name };
                Err(err)
            }
        }
    }

    /// Store a table name. An empty string is treated as absence.
    pub fn set_table(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.table = if name.is_empty() { None } else { Some(name) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::InMemoryProvider;

    #[tokio::test]
    async fn test_set_connection_stores_name_and_resolves() {
        let provider = Arc::new(InMemoryProvider::new().with_connection("pgsql"));
        let mut resolver = ConnectionResolver::new(Arc::clone(&provider) as Arc<dyn ConnectionProvider>);

        resolver.set_connection("pgsql").await.unwrap();

        assert_eq!(resolver.connection_name(), Some("pgsql"));
        assert_eq!(resolver.connection().unwrap().name(), "pgsql");
        provider.assert_resolve_count(1);
    }

    #[tokio::test]
    async fn test_failed_resolve_keeps_name_and_drops_handle() {
        let provider = Arc::new(
            InMemoryProvider::new()
                .with_connection("pgsql")
                .with_connection("mysql"),
        );
        let mut resolver = ConnectionResolver::new(Arc::clone(&provider) as Arc<dyn ConnectionProvider>);
        resolver.set_connection("pgsql").await.unwrap();

        let err = resolver.set_connection("missing").await.unwrap_err();

        assert!(matches!(err, RepoKitError::UnknownConnection(name) if name == "missing"));
        assert_eq!(resolver.connection_name(), Some("missing"));
        assert!(resolver.connection().is_none());
    }

    #[tokio::test]
    async fn test_refresh_without_name_uses_provider_default() {
        let provider = Arc::new(InMemoryProvider::new().with_default("mysql"));
        let mut resolver = ConnectionResolver::new(Arc::clone(&provider) as Arc<dyn ConnectionProvider>);

        resolver.refresh_connection().await.unwrap();

        assert_eq!(resolver.connection_name(), None);
        assert_eq!(resolver.connection().unwrap().name(), "mysql");
        assert_eq!(provider.resolutions(), vec!["mysql".to_string()]);
    }

    #[tokio::test]
    async fn test_refresh_without_name_or_provider_default_fails() {
        let provider = Arc::new(InMemoryProvider::new());
        let mut resolver = ConnectionResolver::new(provider as Arc<dyn ConnectionProvider>);

        let err = resolver.refresh_connection().await.unwrap_err();

        assert!(matches!(err, RepoKitError::MissingDefaultConnection));
    }

    #[test]
    fn test_connection_name_fallback() {
        let provider = Arc::new(InMemoryProvider::new());
        let resolver = ConnectionResolver::new(provider as Arc<dyn ConnectionProvider>);

        assert_eq!(resolver.connection_name(), None);
        assert_eq!(resolver.connection_name_or("sqlite"), "sqlite");
    }

    #[test]
    fn test_empty_table_name_is_absence() {
        let provider = Arc::new(InMemoryProvider::new());
        let mut resolver = ConnectionResolver::new(provider as Arc<dyn ConnectionProvider>);

        resolver.set_table("users");
        assert_eq!(resolver.table_name(), Some("users"));

        resolver.set_table("");
        assert_eq!(resolver.table_name(), None);
        assert_eq!(resolver.table_name_or("accounts"), "accounts");
    }

    #[test]
    fn test_default_connection_name_requires_config() {
        let provider = Arc::new(InMemoryProvider::new());
        let unconfigured = ConnectionResolver::new(Arc::clone(&provider) as Arc<dyn ConnectionProvider>);
        assert!(matches!(
            unconfigured.default_connection_name(),
            Err(RepoKitError::MissingDefaultConnection)
        ));

        let configured = ConnectionResolver::new(provider as Arc<dyn ConnectionProvider>).with_default_connection("mysql");
        assert_eq!(configured.default_connection_name().unwrap(), "mysql");
    }
}
