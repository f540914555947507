use std::fmt;
use std::sync::Arc;

use crate::traits::Connection;
use crate::types::SqlValue;

/// A query builder pre-bound to one connection and one table.
///
/// The binding is fixed at creation time; changing the resolver that handed
/// it out does not affect an existing builder. Nothing is executed here:
/// `to_sql` renders the statement for whichever execution layer the host
/// wires the connection into.
pub struct TableBuilder {
    connection: Arc<dyn Connection>,
    table: String,
    columns: Vec<String>,
    filters: Vec<(String, SqlValue)>,
    limit: Option<u64>,
}

impl TableBuilder {
    pub fn new(connection: Arc<dyn Connection>, table: impl Into<String>) -> Self {
        Self {
            connection,
            table: table.into(),
            columns: Vec::new(),
            filters: Vec::new(),
            limit: None,
        }
    }

    /// The connection this builder is bound to.
    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    /// Name of the connection this builder is bound to.
    pub fn connection_name(&self) -> &str {
        self.connection.name()
    }

    /// The table this builder is scoped to.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Restrict the selected columns. Defaults to `*`.
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Add a `column = value` condition. Conditions combine with AND.
    pub fn filter(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.filters.push((column.to_string(), value.into()));
        self
    }

    /// Cap the number of rows.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Render the SELECT statement and its parameters.
    /// Parameters use PostgreSQL-style placeholders ($1, $2, etc.)
    pub fn to_sql(&self) -> (String, Vec<SqlValue>) {
        let mut sql = String::with_capacity(128);
        let mut params = Vec::new();

        sql.push_str("SELECT ");
        if self.columns.is_empty() {
            sql.push('*');
        } else {
            for (i, col) in self.columns.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(col);
            }
        }

        sql.push_str(" FROM ");
        sql.push_str(&self.table);

        for (i, (column, value)) in self.filters.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            params.push(value.clone());
            sql.push_str(column);
            sql.push_str(" = $");
            sql.push_str(&params.len().to_string());
        }

        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ");
            sql.push_str(&limit.to_string());
        }

        (sql, params)
    }
}

impl fmt::Debug for TableBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableBuilder")
            .field("connection", &self.connection.name())
            .field("table", &self.table)
            .field("columns", &self.columns)
            .field("filters", &self.filters)
            .field("limit", &self.limit)
            .finish()
    }
}
