use std::sync::Arc;

use async_trait::async_trait;

use crate::builder::TableBuilder;
use crate::config::DatabaseConfig;
use crate::error::{RepoKitError, Result};
use crate::resolver::ConnectionResolver;
use crate::traits::ConnectionProvider;

/// Contract for repository-style types that resolve their connection and
/// table lazily and hand out pre-bound query builders.
///
/// Implementors expose their `ConnectionResolver`; a repository with a fixed
/// table additionally overrides `default_table`. The composite `builder`
/// operation is provided.
#[async_trait]
pub trait Repository: Send {
    fn resolver(&self) -> &ConnectionResolver;

    fn resolver_mut(&mut self) -> &mut ConnectionResolver;

    /// Table used when none has been set explicitly. The base contract has
    /// no answer; concrete repositories that know their table override this.
    /// Returning `None` makes builder construction fail with
    /// [`RepoKitError::MissingTable`] until a table is set.
    fn default_table(&self) -> Option<String> {
        None
    }

    /// Resolve connection and table as needed, then return a fresh builder
    /// bound to both. The builder is a snapshot; it is never cached and
    /// later resolver mutation does not touch it.
    ///
    /// Connection handling is asymmetric and order matters:
    /// - no explicit name while unbound: fall back to the configured default
    ///   name if none is stored (storing it already resolves once), then
    ///   refresh once more;
    /// - an explicit name always forces a fresh resolve, even when already
    ///   bound under that same name;
    /// - no explicit name while bound: the cached handle is reused untouched.
    async fn builder(
        &mut self,
        table: Option<&str>,
        connection: Option<&str>,
    ) -> Result<TableBuilder> {
        match connection {
            None if self.resolver().connection().is_none() => {
                if self.resolver().connection_name().is_none() {
                    let default = self.resolver().default_connection_name()?.to_string();
                    self.resolver_mut().set_connection(default).await?;
                }
                self.resolver_mut().refresh_connection().await?;
            }
            Some(name) => {
                self.resolver_mut().set_connection(name).await?;
                self.resolver_mut().refresh_connection().await?;
            }
            None => {}
        }

        if let Some(table) = table {
            self.resolver_mut().set_table(table);
        }
        if self.resolver().table_name().is_none() {
            let default = self.default_table().ok_or(RepoKitError::MissingTable)?;
            self.resolver_mut().set_table(default);
            // An empty default collapses to absence as well
            if self.resolver().table_name().is_none() {
                return Err(RepoKitError::MissingTable);
            }
        }

        let handle = self
            .resolver()
            .connection()
            .cloned()
            .ok_or(RepoKitError::NotConnected)?;
        let table = self
            .resolver()
            .table_name()
            .ok_or(RepoKitError::MissingTable)?
            .to_string();
        Ok(TableBuilder::new(handle, table))
    }
}

/// Ready-made repository over any connection provider.
///
/// This is the concrete type callers hold or inject where they want
/// repository access without defining their own type; there is no ambient
/// accessor, sharing one means passing it around.
pub struct TableRepository {
    resolver: ConnectionResolver,
    table: Option<String>,
}

impl TableRepository {
    pub fn new(provider: Arc<dyn ConnectionProvider>, config: &DatabaseConfig) -> Self {
        Self {
            resolver: ConnectionResolver::from_config(provider, config),
            table: None,
        }
    }

    /// Fix the table this repository falls back to when none has been set.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }
}

#[async_trait]
impl Repository for TableRepository {
    fn resolver(&self) -> &ConnectionResolver {
        &self.resolver
    }

    fn resolver_mut(&mut self) -> &mut ConnectionResolver {
        &mut self.resolver
    }

    fn default_table(&self) -> Option<String> {
        self.table.clone()
    }
}
