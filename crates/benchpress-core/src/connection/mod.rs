//! The session capability the engine runs against.
//!
//! The engine never touches a driver directly; it sees exactly the
//! operations below. Cancellation is server-enforced through the
//! statement timeout, so a timed-out statement surfaces here as an
//! ordinary [`DbError`] carrying the server's SQLSTATE.

use thiserror::Error;

#[cfg(feature = "postgres")]
pub mod postgres;
pub mod script;

#[cfg(feature = "postgres")]
pub use self::postgres::PgConnection;
pub use self::script::ScriptedConnection;

/// A failed session operation. `Sql` carries the server-reported SQLSTATE
/// that the classifier keys on; `Session` covers everything without one
/// (connection loss, protocol errors), which is always fatal.
#[derive(Debug, Clone, Error)]
pub enum DbError {
    #[error("SQLSTATE {sqlstate}: {message}")]
    Sql { sqlstate: String, message: String },
    #[error("session failure: {0}")]
    Session(String),
}

impl DbError {
    pub fn sql(sqlstate: impl Into<String>, message: impl Into<String>) -> Self {
        DbError::Sql {
            sqlstate: sqlstate.into(),
            message: message.into(),
        }
    }

    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            DbError::Sql { sqlstate, .. } => Some(sqlstate),
            DbError::Session(_) => None,
        }
    }
}

/// Result rows with every value in string form, which is all the capture
/// contract needs.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    pub rows: Vec<Vec<Option<String>>>,
}

impl RowSet {
    /// First column of the first row, if any.
    pub fn first_value(&self) -> Option<&str> {
        self.rows.first().and_then(|r| r.first()).and_then(|v| v.as_deref())
    }
}

pub trait Connection {
    /// Execute one statement and return its rows.
    fn execute(&mut self, sql: &str) -> Result<RowSet, DbError>;

    /// Set the server-side statement timeout; `0` disables it.
    fn set_statement_timeout(&mut self, secs: u64) -> Result<(), DbError>;

    /// Pull relation data into the buffer cache.
    fn prewarm(&mut self) -> Result<(), DbError>;

    /// Refresh planner statistics.
    fn refresh_statistics(&mut self) -> Result<(), DbError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_of_empty_rowset_is_none() {
        assert_eq!(RowSet::default().first_value(), None);
    }

    #[test]
    fn first_value_picks_first_column_of_first_row() {
        let rows = RowSet {
            rows: vec![
                vec![Some("a".into()), Some("b".into())],
                vec![Some("c".into())],
            ],
        };
        assert_eq!(rows.first_value(), Some("a"));
    }

    #[test]
    fn sqlstate_only_on_sql_errors() {
        assert_eq!(DbError::sql("57014", "canceled").sqlstate(), Some("57014"));
        assert_eq!(DbError::Session("gone".into()).sqlstate(), None);
    }
}
