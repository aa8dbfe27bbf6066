use crate::checkpoint::CheckpointStore;
use crate::classify::{classify, ErrorClass};
use crate::connection::{Connection, DbError};
use crate::engine::lifecycle::Lifecycle;
use crate::engine::skips::SkipTable;
use crate::model::{BenchConfig, Partition, QueryInstance};
use crate::report::RunReport;
use crate::rewrite::Rewrite;
use anyhow::Context;
use std::path::PathBuf;

/// The sequential execution engine.
///
/// Consumes one configuration and an ordered corpus; every instance ends
/// the run either checkpoint-complete or untouched behind a fatal abort.
/// There is no retry: re-invoking the process is the retry mechanism, and
/// the checkpoint markers make that cheap.
pub struct Engine {
    artifact_root: PathBuf,
}

impl Engine {
    pub fn new(artifact_root: impl Into<PathBuf>) -> Self {
        Self {
            artifact_root: artifact_root.into(),
        }
    }

    /// Runs the corpus in order. Timeouts and data errors are absorbed and
    /// durably recorded; anything else aborts the remaining corpus.
    pub fn run(
        &self,
        conn: &mut dyn Connection,
        cfg: &BenchConfig,
        corpus: &[QueryInstance],
    ) -> anyhow::Result<RunReport> {
        let rewriter = cfg.rewriter.build();
        let mut lifecycle = Lifecycle::new();
        let mut skips = SkipTable::new();
        let mut report = RunReport::new(&cfg.name);
        let mut stores = StoreCache::new(&self.artifact_root, &cfg.name);

        for inst in corpus {
            let store = stores.get(&inst.partition)?;

            if store.has_timeout(&inst.file_stem, inst.sub_index) {
                let count = skips.record_skip(&inst.identity);
                tracing::debug!(
                    identity = %inst.identity,
                    skips = count,
                    "timeout marker on disk, identity joins the skip table"
                );
            }

            if store.is_complete(&inst.file_stem, inst.sub_index) {
                report.resumed += 1;
                continue;
            }

            if skips.contains(&inst.identity) {
                store.mark_timeout(&inst.file_stem, inst.sub_index)?;
                skips.record_skip(&inst.identity);
                report.propagated += 1;
                tracing::info!(
                    identity = %inst.identity,
                    stem = %inst.file_stem,
                    sub = inst.sub_index,
                    "preempted by an earlier timeout of the same identity"
                );
                continue;
            }

            lifecycle
                .ensure_ready(conn, cfg)
                .context("environment setup failed")?;

            let mut writer = store.result_writer(&inst.file_stem, inst.sub_index)?;

            match execute_instance(conn, rewriter.as_ref(), inst) {
                Ok(captured) => {
                    if let Some(value) = captured {
                        writer.write_value(&value)?;
                    }
                    store.mark_complete(&inst.file_stem, inst.sub_index)?;
                    report.executed += 1;
                }
                Err(err) => match classify(&err) {
                    ErrorClass::Timeout => {
                        store.mark_timeout(&inst.file_stem, inst.sub_index)?;
                        skips.record_skip(&inst.identity);
                        report.timeouts += 1;
                        tracing::warn!(
                            identity = %inst.identity,
                            stem = %inst.file_stem,
                            sub = inst.sub_index,
                            "statement timed out, recorded as terminal"
                        );
                    }
                    ErrorClass::DataError => {
                        store.mark_error(&inst.file_stem, inst.sub_index, &err.to_string())?;
                        report.data_errors += 1;
                        tracing::warn!(
                            identity = %inst.identity,
                            stem = %inst.file_stem,
                            sub = inst.sub_index,
                            error = %err,
                            "data error, recorded and continuing"
                        );
                    }
                    ErrorClass::Fatal => {
                        return Err(anyhow::Error::new(err).context(format!(
                            "fatal failure on {} ({}-{})",
                            inst.identity, inst.file_stem, inst.sub_index
                        )));
                    }
                },
            }
        }

        lifecycle.finish(conn, cfg).context("teardown failed")?;
        Ok(report)
    }
}

/// Runs the instance's setup statements, rewrites, executes, and returns
/// the captured scalar when the rewriter asked for one.
fn execute_instance(
    conn: &mut dyn Connection,
    rewriter: &dyn Rewrite,
    inst: &QueryInstance,
) -> Result<Option<String>, DbError> {
    for sql in &inst.setup_sql {
        conn.execute(sql)?;
    }
    let rewritten = rewriter.rewrite(&inst.identity, inst.sub_index, &inst.text);
    tracing::debug!(
        identity = %inst.identity,
        sub = inst.sub_index,
        capture = rewritten.capture,
        "executing"
    );
    let rows = conn.execute(&rewritten.text)?;
    Ok(if rewritten.capture {
        rows.first_value().map(str::to_owned)
    } else {
        None
    })
}

/// Corpora arrive grouped by partition; keep the current partition's store
/// open instead of re-resolving it per instance.
struct StoreCache<'a> {
    artifact_root: &'a std::path::Path,
    config_name: &'a str,
    open: Option<(Partition, CheckpointStore)>,
}

impl<'a> StoreCache<'a> {
    fn new(artifact_root: &'a std::path::Path, config_name: &'a str) -> Self {
        Self {
            artifact_root,
            config_name,
            open: None,
        }
    }

    fn get(&mut self, partition: &Partition) -> anyhow::Result<&CheckpointStore> {
        let stale = !matches!(&self.open, Some((open, _)) if open == partition);
        if stale {
            let store = CheckpointStore::open(self.artifact_root, self.config_name, partition)?;
            self.open = Some((partition.clone(), store));
        }
        match &self.open {
            Some((_, store)) => Ok(store),
            None => unreachable!("store opened above"),
        }
    }
}
