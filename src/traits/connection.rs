use std::fmt;

/// Trait representing an established database connection.
///
/// The handle is opaque to the resolution layer: the resolver only caches
/// it and binds builders to it. Concrete providers expose richer access on
/// their own connection types (e.g. `PgConnection::client`).
pub trait Connection: Send + Sync {
    /// Returns the connection name this handle was resolved under.
    fn name(&self) -> &str;
}

// Handles wrap non-Debug resources (e.g. a live client), so only the name
// is shown
impl fmt::Debug for dyn Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("name", &self.name())
            .finish()
    }
}
