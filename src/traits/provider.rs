use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::Connection;

/// Trait for connection provider implementations.
/// Providers are responsible for:
/// - Knowing which connection names are configured
/// - Establishing (and optionally reusing) live connections
/// - Defining what "the default connection" means when asked for one
///   without a name
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// Resolve a named connection to a live handle.
    /// Fails if the name is not configured or the connection cannot be
    /// established.
    async fn resolve(&self, name: &str) -> Result<Arc<dyn Connection>>;

    /// Resolve the provider's default connection. Which connection that is
    /// is provider-defined.
    async fn resolve_default(&self) -> Result<Arc<dyn Connection>>;
}
