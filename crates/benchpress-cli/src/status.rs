use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct PartitionStatus {
    pub complete: u64,
    pub timeouts: u64,
    pub errors: u64,
}

/// Tallies checkpoint markers per partition directory, keyed by the
/// partition's path relative to `experiment/`.
pub fn collect(artifact_root: &Path) -> anyhow::Result<BTreeMap<String, PartitionStatus>> {
    let mut out = BTreeMap::new();
    let base = artifact_root.join("experiment");
    if !base.exists() {
        return Ok(out);
    }
    for entry in WalkDir::new(&base) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let partition = path
            .parent()
            .and_then(|p| p.strip_prefix(&base).ok())
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        let slot: &mut PartitionStatus = out.entry(partition).or_default();
        match ext {
            "ok" => slot.complete += 1,
            "timeout" => slot.timeouts += 1,
            "err" => slot.errors += 1,
            _ => {}
        }
    }
    out.retain(|_, status| *status != PartitionStatus::default());
    Ok(out)
}

pub fn print(statuses: &BTreeMap<String, PartitionStatus>) {
    if statuses.is_empty() {
        eprintln!("no checkpoints found");
        return;
    }
    for (partition, status) in statuses {
        eprintln!(
            "{partition}: complete={} timeouts={} errors={}",
            status.complete, status.timeouts, status.errors
        );
    }
}
