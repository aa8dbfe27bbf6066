use crate::connection::{Connection, DbError};
use crate::model::BenchConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unready,
    Ready,
}

/// Once-per-run environment preparation.
///
/// The ready transition fires at most once per configuration run, on the
/// first query instance that is not already checkpoint-complete. Teardown
/// is conditioned on that transition having fired, not on corpus
/// non-emptiness: a run that skipped everything must not issue teardown
/// SQL against an environment it never prepared.
pub struct Lifecycle {
    state: State,
    attempted: bool,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: State::Unready,
            attempted: false,
        }
    }

    /// Fires the ready transition on first call; later calls are no-ops.
    ///
    /// In order: disable the statement timeout, prewarm the buffer cache,
    /// refresh planner statistics, run the configuration's before_sql,
    /// then re-enable the timeout at the configured bound.
    pub fn ensure_ready(
        &mut self,
        conn: &mut dyn Connection,
        cfg: &BenchConfig,
    ) -> Result<(), DbError> {
        if self.state == State::Ready {
            return Ok(());
        }
        tracing::info!(config = %cfg.name, "preparing environment");
        conn.set_statement_timeout(0)?;
        conn.prewarm()?;
        conn.refresh_statistics()?;
        for sql in &cfg.before_sql {
            conn.execute(sql)?;
        }
        conn.set_statement_timeout(cfg.timeout_secs)?;
        self.state = State::Ready;
        self.attempted = true;
        Ok(())
    }

    /// True once any instance has been attempted this run.
    pub fn attempted(&self) -> bool {
        self.attempted
    }

    /// Runs the configuration's after_sql, only if the ready transition
    /// fired this run.
    pub fn finish(&self, conn: &mut dyn Connection, cfg: &BenchConfig) -> Result<(), DbError> {
        if !self.attempted {
            return Ok(());
        }
        for sql in &cfg.after_sql {
            conn.execute(sql)?;
        }
        Ok(())
    }
}
