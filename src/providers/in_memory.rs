use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{RepoKitError, Result};
use crate::traits::{Connection, ConnectionProvider};

/// A connection handle carrying nothing but its name.
pub struct StaticConnection {
    name: String,
}

impl StaticConnection {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Connection for StaticConnection {
    fn name(&self) -> &str {
        &self.name
    }
}

/// An in-memory connection provider for testing.
///
/// Knows a fixed set of connection names, records every resolution, and
/// hands out a fresh handle each time, so tests can count exactly how often
/// the resolution layer reached for it.
///
/// # Example
/// ```
/// use repokit::providers::InMemoryProvider;
///
/// let provider = InMemoryProvider::new()
///     .with_connection("reporting")
///     .with_default("mysql");
/// ```
pub struct InMemoryProvider {
    known: Mutex<HashSet<String>>,
    default: Option<String>,
    resolutions: Mutex<Vec<String>>,
}

impl InMemoryProvider {
    /// Create a provider with no known connections and no default.
    pub fn new() -> Self {
        Self {
            known: Mutex::new(HashSet::new()),
            default: None,
            resolutions: Mutex::new(Vec::new()),
        }
    }

    /// Register a connection name the provider will accept.
    pub fn with_connection(self, name: impl Into<String>) -> Self {
        self.known.lock().unwrap().insert(name.into());
        self
    }

    /// Register multiple connection names.
    pub fn with_connections<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut known = self.known.lock().unwrap();
        for name in names {
            known.insert(name.into());
        }
        drop(known);
        self
    }

    /// Set the name `resolve_default` resolves to. The name is registered
    /// as known as well.
    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.known.lock().unwrap().insert(name.clone());
        self.default = Some(name);
        self
    }

    /// Register a connection name after construction, e.g. to let a
    /// previously failing resolution start succeeding mid-test.
    pub fn register(&self, name: impl Into<String>) {
        self.known.lock().unwrap().insert(name.into());
    }

    /// Names resolved so far, in order. Default resolutions are recorded
    /// under the name they resolved to.
    pub fn resolutions(&self) -> Vec<String> {
        self.resolutions.lock().unwrap().clone()
    }

    /// Number of resolutions performed so far.
    pub fn resolve_count(&self) -> usize {
        self.resolutions.lock().unwrap().len()
    }

    /// The most recently resolved name, if any.
    pub fn last_resolution(&self) -> Option<String> {
        self.resolutions.lock().unwrap().last().cloned()
    }

    /// Assert that exactly n resolutions have happened.
    pub fn assert_resolve_count(&self, expected: usize) {
        let actual = self.resolve_count();
        assert_eq!(
            actual, expected,
            "Resolution count mismatch. Expected: {}, Actual: {}",
            expected, actual
        );
    }
}

impl Default for InMemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionProvider for InMemoryProvider {
    async fn resolve(&self, name: &str) -> Result<Arc<dyn Connection>> {
        self.resolutions.lock().unwrap().push(name.to_string());

        if self.known.lock().unwrap().contains(name) {
            Ok(Arc::new(StaticConnection::new(name)))
        } else {
            Err(RepoKitError::UnknownConnection(name.to_string()))
        }
    }

    async fn resolve_default(&self) -> Result<Arc<dyn Connection>> {
        let name = self
            .default
            .clone()
            .ok_or(RepoKitError::MissingDefaultConnection)?;
        self.resolve(&name).await
    }
}
