use super::{Connection, DbError, RowSet};

/// Deterministic stand-in for a live session, used by `--dry-run`
/// invocations and the test suite. Statements are matched by substring
/// against scripted rules in registration order; anything unmatched
/// succeeds with an empty row set. Every operation the engine issues is
/// recorded in submission order.
#[derive(Default)]
pub struct ScriptedConnection {
    rules: Vec<Rule>,
    log: Vec<String>,
}

struct Rule {
    needle: String,
    action: Action,
}

enum Action {
    Rows(Vec<Vec<Option<String>>>),
    Fail { sqlstate: String, message: String },
}

impl ScriptedConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statements containing `needle` return a single scalar value.
    pub fn respond_scalar(&mut self, needle: impl Into<String>, value: impl Into<String>) {
        self.rules.push(Rule {
            needle: needle.into(),
            action: Action::Rows(vec![vec![Some(value.into())]]),
        });
    }

    /// Statements containing `needle` fail with the given SQLSTATE.
    pub fn fail_with(
        &mut self,
        needle: impl Into<String>,
        sqlstate: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.rules.push(Rule {
            needle: needle.into(),
            action: Action::Fail {
                sqlstate: sqlstate.into(),
                message: message.into(),
            },
        });
    }

    /// Everything the engine issued, in order. Control operations are
    /// recorded in the same SQL form a live session would receive.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.log.iter().filter(|s| s.contains(needle)).count()
    }
}

impl Connection for ScriptedConnection {
    fn execute(&mut self, sql: &str) -> Result<RowSet, DbError> {
        self.log.push(sql.to_owned());
        for rule in &self.rules {
            if sql.contains(&rule.needle) {
                return match &rule.action {
                    Action::Rows(rows) => Ok(RowSet { rows: rows.clone() }),
                    Action::Fail { sqlstate, message } => {
                        Err(DbError::sql(sqlstate.clone(), message.clone()))
                    }
                };
            }
        }
        Ok(RowSet::default())
    }

    fn set_statement_timeout(&mut self, secs: u64) -> Result<(), DbError> {
        self.log.push(format!("SET statement_timeout = '{secs}s'"));
        Ok(())
    }

    fn prewarm(&mut self) -> Result<(), DbError> {
        self.log.push("pg_prewarm".into());
        Ok(())
    }

    fn refresh_statistics(&mut self) -> Result<(), DbError> {
        self.log.push("VACUUM ANALYZE".into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_statements_succeed_empty() {
        let mut conn = ScriptedConnection::new();
        let rows = conn.execute("SELECT 1").unwrap();
        assert!(rows.rows.is_empty());
        assert_eq!(conn.log(), ["SELECT 1"]);
    }

    #[test]
    fn rules_match_by_substring_in_order() {
        let mut conn = ScriptedConnection::new();
        conn.respond_scalar("EXPLAIN", "plan");
        conn.fail_with("broken", "42601", "syntax error");
        assert_eq!(
            conn.execute("EXPLAIN SELECT 1").unwrap().first_value(),
            Some("plan")
        );
        let err = conn.execute("SELECT broken").unwrap_err();
        assert_eq!(err.sqlstate(), Some("42601"));
    }
}
