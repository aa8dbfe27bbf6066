use super::{Connection, DbError, RowSet};
use postgres::{Client, NoTls, SimpleQueryMessage};

/// Live Postgres session. Uses the simple query protocol on an autocommit
/// connection, so row values arrive as text and multi-statement setup
/// scripts execute as-is.
pub struct PgConnection {
    client: Client,
}

impl PgConnection {
    pub fn connect(dsn: &str) -> Result<Self, DbError> {
        let client = Client::connect(dsn, NoTls).map_err(map_err)?;
        Ok(Self { client })
    }
}

fn map_err(err: postgres::Error) -> DbError {
    match err.as_db_error() {
        Some(db) => DbError::sql(db.code().code(), db.message()),
        None => DbError::Session(err.to_string()),
    }
}

impl Connection for PgConnection {
    fn execute(&mut self, sql: &str) -> Result<RowSet, DbError> {
        tracing::debug!(sql, "execute");
        let messages = self.client.simple_query(sql).map_err(map_err)?;
        let mut rows = Vec::new();
        for message in messages {
            if let SimpleQueryMessage::Row(row) = message {
                let mut values = Vec::with_capacity(row.len());
                for i in 0..row.len() {
                    values.push(row.get(i).map(str::to_owned));
                }
                rows.push(values);
            }
        }
        Ok(RowSet { rows })
    }

    fn set_statement_timeout(&mut self, secs: u64) -> Result<(), DbError> {
        let sql = format!("SET statement_timeout = '{secs}s'");
        tracing::debug!(sql, "set timeout");
        self.client.batch_execute(&sql).map_err(map_err)
    }

    fn prewarm(&mut self) -> Result<(), DbError> {
        self.client
            .batch_execute("CREATE EXTENSION IF NOT EXISTS pg_prewarm")
            .map_err(map_err)?;
        let rels = self
            .client
            .query(
                "SELECT c.oid::regclass::text
                 FROM pg_class c
                 JOIN pg_namespace n ON n.oid = c.relnamespace
                 WHERE n.nspname = 'public' AND c.relkind IN ('r', 'i')",
                &[],
            )
            .map_err(map_err)?;
        for row in rels {
            let rel: String = row.get(0);
            tracing::debug!(rel = %rel, "prewarm");
            let sql = format!("SELECT pg_prewarm('{}')", rel.replace('\'', "''"));
            self.client.batch_execute(&sql).map_err(map_err)?;
        }
        Ok(())
    }

    fn refresh_statistics(&mut self) -> Result<(), DbError> {
        tracing::debug!("vacuum analyze");
        self.client.batch_execute("VACUUM ANALYZE").map_err(map_err)
    }
}
