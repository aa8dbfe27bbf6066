use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One benchmark configuration. The engine consumes exactly one per run;
/// the driver iterates over all configurations in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchConfig {
    pub name: String,
    /// Server-side statement timeout applied after environment setup.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub rewriter: RewriterKind,
    /// Statements issued once, after prewarm and statistics refresh, before
    /// the first query.
    #[serde(default)]
    pub before_sql: Vec<String>,
    /// Statements issued once after the last query, only if at least one
    /// query was attempted this run.
    #[serde(default)]
    pub after_sql: Vec<String>,
}

fn default_timeout_secs() -> u64 {
    300
}

/// Selects the query rewriter for a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriterKind {
    /// Submit query text unchanged, capture nothing.
    Passthrough,
    /// Wrap read-only queries in a plan-capture directive.
    #[default]
    ExplainAnalyze,
}

/// Where a query instance's checkpoint artifacts live, relative to the
/// artifact root: `experiment/<config>/<benchmark>/<segments...>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub benchmark: String,
    pub segments: Vec<String>,
}

impl Partition {
    pub fn new(benchmark: impl Into<String>, segments: Vec<String>) -> Self {
        Self {
            benchmark: benchmark.into(),
            segments,
        }
    }

    pub fn dir(&self, artifact_root: &Path, config_name: &str) -> PathBuf {
        let mut dir = artifact_root
            .join("experiment")
            .join(config_name)
            .join(&self.benchmark);
        for segment in &self.segments {
            dir.push(segment);
        }
        dir
    }
}

/// One executable statement from the corpus.
///
/// `identity` is shared by every sub-statement of a source query and, where
/// the benchmark's data layout makes timeouts transferable, across
/// partitions of the same query; it keys timeout skip propagation.
/// `(file_stem, sub_index)` keys the checkpoint artifacts within the
/// partition directory.
#[derive(Debug, Clone)]
pub struct QueryInstance {
    pub identity: String,
    pub file_stem: String,
    /// 1-based position of this statement within its source file.
    pub sub_index: u32,
    pub text: String,
    /// Statements issued immediately before this instance, uncheckpointed.
    pub setup_sql: Vec<String>,
    pub partition: Partition,
}
