//! Durable per-instance outcome records.
//!
//! A checkpoint is the existence of marker files in the partition
//! directory: `<stem>-<sub>.ok` (terminal), `<stem>-<sub>.timeout`,
//! `<stem>-<sub>.err` (detail text), `<stem>-<sub>.res` (captured
//! output). Markers are monotonic; once `.ok` exists the instance is
//! never re-executed, on any future run against the same directory.

use crate::model::Partition;
use anyhow::Context;
use std::fs::{self, File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

pub struct CheckpointStore {
    dir: PathBuf,
}

impl CheckpointStore {
    /// Opens the store for one partition, creating its directory.
    pub fn open(
        artifact_root: &Path,
        config_name: &str,
        partition: &Partition,
    ) -> anyhow::Result<Self> {
        let dir = partition.dir(artifact_root, config_name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create checkpoint dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn artifact(&self, stem: &str, sub_index: u32, ext: &str) -> PathBuf {
        self.dir.join(format!("{stem}-{sub_index}.{ext}"))
    }

    pub fn is_complete(&self, stem: &str, sub_index: u32) -> bool {
        self.artifact(stem, sub_index, "ok").exists()
    }

    pub fn has_timeout(&self, stem: &str, sub_index: u32) -> bool {
        self.artifact(stem, sub_index, "timeout").exists()
    }

    /// Idempotent: touching an existing marker is a no-op.
    pub fn mark_complete(&self, stem: &str, sub_index: u32) -> anyhow::Result<()> {
        touch(&self.artifact(stem, sub_index, "ok"))
    }

    /// A timeout is a terminal outcome, so the completion marker follows.
    pub fn mark_timeout(&self, stem: &str, sub_index: u32) -> anyhow::Result<()> {
        touch(&self.artifact(stem, sub_index, "timeout"))?;
        self.mark_complete(stem, sub_index)
    }

    /// Records the diagnostic detail and marks the instance complete.
    pub fn mark_error(&self, stem: &str, sub_index: u32, detail: &str) -> anyhow::Result<()> {
        let path = self.artifact(stem, sub_index, "err");
        let body = format!("{}\n{detail}\n", chrono::Utc::now().to_rfc3339());
        fs::write(&path, body)
            .with_context(|| format!("failed to write error artifact {}", path.display()))?;
        self.mark_complete(stem, sub_index)
    }

    /// Opens the result artifact, truncating any prior partial content.
    /// The handle closes on drop.
    pub fn result_writer(&self, stem: &str, sub_index: u32) -> anyhow::Result<ResultWriter> {
        let path = self.artifact(stem, sub_index, "res");
        let file = File::create(&path)
            .with_context(|| format!("failed to open result artifact {}", path.display()))?;
        Ok(ResultWriter { file })
    }
}

fn touch(path: &Path) -> anyhow::Result<()> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("failed to touch marker {}", path.display()))?;
    Ok(())
}

pub struct ResultWriter {
    file: File,
}

impl ResultWriter {
    pub fn write_value(&mut self, value: &str) -> anyhow::Result<()> {
        writeln!(self.file, "{value}").context("failed to write result artifact")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> CheckpointStore {
        let partition = Partition::new("tpch", vec!["sf_1".into(), "1".into()]);
        CheckpointStore::open(dir, "default", &partition).unwrap()
    }

    #[test]
    fn markers_are_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let s = store(tmp.path());
        assert!(!s.is_complete("7", 1));
        s.mark_complete("7", 1).unwrap();
        s.mark_complete("7", 1).unwrap();
        assert!(s.is_complete("7", 1));
    }

    #[test]
    fn timeout_implies_complete() {
        let tmp = tempfile::tempdir().unwrap();
        let s = store(tmp.path());
        s.mark_timeout("9", 2).unwrap();
        assert!(s.has_timeout("9", 2));
        assert!(s.is_complete("9", 2));
    }

    #[test]
    fn error_detail_is_recorded_and_completes() {
        let tmp = tempfile::tempdir().unwrap();
        let s = store(tmp.path());
        s.mark_error("4", 1, "SQLSTATE 22012: division by zero").unwrap();
        assert!(s.is_complete("4", 1));
        let body = fs::read_to_string(s.dir().join("4-1.err")).unwrap();
        assert!(body.contains("division by zero"));
    }

    #[test]
    fn result_writer_truncates_prior_content() {
        let tmp = tempfile::tempdir().unwrap();
        let s = store(tmp.path());
        {
            let mut w = s.result_writer("2", 1).unwrap();
            w.write_value("stale partial output").unwrap();
        }
        let _w = s.result_writer("2", 1).unwrap();
        let body = fs::read_to_string(s.dir().join("2-1.res")).unwrap();
        assert!(body.is_empty());
    }
}
