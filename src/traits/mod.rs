mod connection;
mod provider;

pub use connection::Connection;
pub use provider::ConnectionProvider;
