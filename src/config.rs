use std::collections::HashMap;

use serde::Deserialize;

/// Database configuration injected into resolvers and providers.
///
/// Replaces ambient configuration lookup: the default connection name and
/// the named-connection registry are passed in explicitly, typically
/// deserialized from the host application's config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    /// Connection name used when a resolver has none set.
    #[serde(default)]
    pub default: Option<String>,

    /// Connection name to connection string, consumed by providers that
    /// open real connections.
    #[serde(default)]
    pub connections: HashMap<String, String>,
}

impl DatabaseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default connection name.
    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        self.default = Some(name.into());
        self
    }

    /// Register a named connection string.
    pub fn with_connection(
        mut self,
        name: impl Into<String>,
        connection_string: impl Into<String>,
    ) -> Self {
        self.connections.insert(name.into(), connection_string.into());
        self
    }
}
