mod driver;
mod loadjob;
mod status;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "benchpress",
    version,
    about = "Resumable SQL benchmark runner for TPC-H, DSB, and JOB"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Drive the TPC-H corpus for every configuration
    Tpch(TpchArgs),
    /// Drive the DSB corpus for every configuration
    Dsb(DsbArgs),
    /// Drive the JOB corpus for every configuration
    Job(JobArgs),
    /// Load the JOB dataset unless it is already present
    LoadJob(LoadJobArgs),
    /// Summarize checkpoint markers under the artifact root
    Status(StatusArgs),
    /// Write a sample bench.yaml
    Init(InitArgs),
    Version,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, default_value = "bench.yaml")]
    pub config: PathBuf,
    /// Postgres connection string
    #[arg(long, env = "BENCHPRESS_DSN")]
    pub dsn: Option<String>,
    #[arg(long, env = "ARTIFACT_ROOT")]
    pub artifact_root: PathBuf,
    /// Replay against a scripted connection instead of a live database
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Clone)]
struct TpchArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, env = "TPCH_QUERY_ROOT")]
    query_root: PathBuf,
    #[arg(long, env = "TPCH_QUERY_START")]
    query_start: u32,
    #[arg(long, env = "TPCH_QUERY_STOP")]
    query_stop: u32,
    #[arg(long, env = "TPCH_SF")]
    scale_factor: u32,
}

#[derive(Args, Clone)]
struct DsbArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, env = "DSB_QUERY_ROOT")]
    query_root: PathBuf,
    #[arg(long, env = "DSB_QUERY_TRAIN_SEED")]
    train_seed: u32,
    #[arg(long, env = "DSB_QUERY_TEST_SEED")]
    test_seed: u32,
    #[arg(long, env = "DSB_SF")]
    scale_factor: u32,
}

#[derive(Args, Clone)]
struct JobArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, env = "JOB_QUERY_ROOT")]
    query_root: PathBuf,
}

#[derive(Args, Clone)]
struct LoadJobArgs {
    /// Postgres connection string
    #[arg(long, env = "BENCHPRESS_DSN")]
    dsn: Option<String>,
    #[arg(long, env = "JOB_SCHEMA_ROOT")]
    schema_root: PathBuf,
    #[arg(long, env = "JOB_DATA_ROOT")]
    data_root: PathBuf,
}

#[derive(Args, Clone)]
struct StatusArgs {
    #[arg(long, env = "ARTIFACT_ROOT")]
    artifact_root: PathBuf,
}

#[derive(Args, Clone)]
struct InitArgs {
    #[arg(long, default_value = "bench.yaml")]
    config: PathBuf,
}

pub(crate) mod exit_codes {
    pub const OK: i32 = 0;
    pub const RUN_FAILED: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
}

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match dispatch(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("fatal: {err:#}");
            exit_codes::CONFIG_ERROR
        }
    };
    std::process::exit(code);
}

fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Tpch(args) => {
            let common = args.common.clone();
            driver::run_all(&common, "tpch", move |_| {
                benchpress_corpus::tpch::TpchCorpus {
                    query_root: args.query_root.clone(),
                    seed_start: args.query_start,
                    seed_stop: args.query_stop,
                    scale_factor: args.scale_factor,
                }
                .instances()
            })
        }
        Command::Dsb(args) => {
            let common = args.common.clone();
            driver::run_all(&common, "dsb", move |cfg| {
                let mut seeds = vec![args.train_seed];
                // Only the baseline configuration drives the held-out seed.
                if cfg.name == "default" {
                    seeds.push(args.test_seed);
                }
                benchpress_corpus::dsb::DsbCorpus {
                    query_root: args.query_root.clone(),
                    scale_factor: args.scale_factor,
                    seeds,
                }
                .instances()
            })
        }
        Command::Job(args) => {
            let common = args.common.clone();
            driver::run_all(&common, "job", move |_| {
                benchpress_corpus::job::JobCorpus {
                    query_root: args.query_root.clone(),
                }
                .instances()
            })
        }
        Command::LoadJob(args) => {
            let dsn = args
                .dsn
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("--dsn (or BENCHPRESS_DSN) is required"))?;
            let mut conn = benchpress_core::connection::PgConnection::connect(dsn)?;
            loadjob::run(&mut conn, &args.schema_root, &args.data_root)?;
            Ok(exit_codes::OK)
        }
        Command::Status(args) => {
            let statuses = status::collect(&args.artifact_root)?;
            status::print(&statuses);
            Ok(exit_codes::OK)
        }
        Command::Init(args) => {
            if args.config.exists() {
                eprintln!("note: {} already exists", args.config.display());
            } else {
                ensure_parent_dir(&args.config)?;
                benchpress_core::config::write_sample_config(&args.config)?;
                eprintln!("created {}", args.config.display());
            }
            Ok(exit_codes::OK)
        }
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

fn ensure_parent_dir(path: &std::path::Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
