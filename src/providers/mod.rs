mod in_memory;
mod tokio_postgres;

pub use self::in_memory::{InMemoryProvider, StaticConnection};
pub use self::tokio_postgres::{PgConnection, TokioPostgresProvider};
