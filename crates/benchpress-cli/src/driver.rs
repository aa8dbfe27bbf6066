use crate::{exit_codes, CommonArgs};
use benchpress_core::config;
use benchpress_core::connection::{Connection, ScriptedConnection};
use benchpress_core::engine::Engine;
use benchpress_core::model::{BenchConfig, QueryInstance};
use benchpress_core::report::{self, RunReport};
use indicatif::ProgressBar;

/// Runs every configuration in the config file against the given corpus.
///
/// A fatal engine error aborts only the current configuration: it is
/// logged with full context and the driver moves on, leaving the completed
/// checkpoint markers in place for the next invocation.
pub fn run_all<F>(common: &CommonArgs, suite: &str, mut corpus_for: F) -> anyhow::Result<i32>
where
    F: FnMut(&BenchConfig) -> anyhow::Result<Vec<QueryInstance>>,
{
    if !common.dry_run && common.dsn.is_none() {
        anyhow::bail!("--dsn (or BENCHPRESS_DSN) is required unless --dry-run");
    }
    let configs = config::load_config(&common.config)?;
    let engine = Engine::new(common.artifact_root.clone());

    let bar = ProgressBar::new(configs.len() as u64);
    let mut any_failed = false;
    for cfg in &configs {
        tracing::info!(config = %cfg.name, suite, "starting configuration");
        let outcome =
            corpus_for(cfg).and_then(|corpus| run_one(&engine, common, suite, cfg, &corpus));
        match outcome {
            Ok(run) => report::console::print_summary(&run),
            Err(err) => {
                tracing::error!(config = %cfg.name, "configuration aborted: {err:#}");
                any_failed = true;
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    Ok(if any_failed {
        exit_codes::RUN_FAILED
    } else {
        exit_codes::OK
    })
}

fn run_one(
    engine: &Engine,
    common: &CommonArgs,
    suite: &str,
    cfg: &BenchConfig,
    corpus: &[QueryInstance],
) -> anyhow::Result<RunReport> {
    let mut conn = connect(common)?;
    let run = engine.run(conn.as_mut(), cfg, corpus)?;

    let report_dir = common.artifact_root.join("experiment").join(&cfg.name);
    std::fs::create_dir_all(&report_dir)?;
    report::json::write_json(&run, suite, &report_dir.join(format!("{suite}.json")))?;
    Ok(run)
}

/// One fresh session per configuration, as the engine expects.
fn connect(common: &CommonArgs) -> anyhow::Result<Box<dyn Connection>> {
    if common.dry_run {
        return Ok(Box::new(ScriptedConnection::new()));
    }
    let dsn = common
        .dsn
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--dsn (or BENCHPRESS_DSN) is required unless --dry-run"))?;
    Ok(Box::new(benchpress_core::connection::PgConnection::connect(dsn)?))
}
