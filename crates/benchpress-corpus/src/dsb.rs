use crate::split;
use anyhow::Context;
use benchpress_core::model::{Partition, QueryInstance};
use std::path::PathBuf;

/// DSB corpus: `<root>/default/<seed>/*.sql`, ordered by template id (the
/// filename prefix before the first `-`), ties broken by full stem.
///
/// DSB's data distributions vary per seed, so a timeout under one seed says
/// nothing about another; identities embed the seed, which keeps timeout
/// propagation scoped to a single seed.
pub struct DsbCorpus {
    pub query_root: PathBuf,
    pub scale_factor: u32,
    pub seeds: Vec<u32>,
}

impl DsbCorpus {
    pub fn instances(&self) -> anyhow::Result<Vec<QueryInstance>> {
        let mut out = Vec::new();
        for &seed in &self.seeds {
            let dir = self.query_root.join("default").join(seed.to_string());
            let mut stems: Vec<String> = std::fs::read_dir(&dir)
                .with_context(|| format!("failed to read query dir {}", dir.display()))?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "sql"))
                .filter_map(|path| {
                    path.file_stem()
                        .map(|stem| stem.to_string_lossy().into_owned())
                })
                .collect();
            stems.sort_by(|a, b| (template_id(a), a.as_str()).cmp(&(template_id(b), b.as_str())));

            let partition = Partition::new(
                "dsb",
                vec![
                    format!("sf_{}", self.scale_factor),
                    "default".to_owned(),
                    seed.to_string(),
                ],
            );
            for stem in stems {
                let path = dir.join(format!("{stem}.sql"));
                for (idx, text) in split::file_statements(&path)?.into_iter().enumerate() {
                    out.push(QueryInstance {
                        identity: format!("{seed}/{stem}"),
                        file_stem: stem.clone(),
                        sub_index: idx as u32 + 1,
                        text,
                        setup_sql: Vec::new(),
                        partition: partition.clone(),
                    });
                }
            }
        }
        tracing::debug!(instances = out.len(), "enumerated dsb corpus");
        Ok(out)
    }
}

fn template_id(stem: &str) -> &str {
    stem.split('-').next().unwrap_or(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_tree(seed: u32, names: &[&str]) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("default").join(seed.to_string());
        std::fs::create_dir_all(&dir).unwrap();
        for name in names {
            std::fs::write(dir.join(format!("{name}.sql")), "SELECT 1;\n").unwrap();
        }
        tmp
    }

    #[test]
    fn orders_by_template_id_then_stem() {
        let tmp = fake_tree(101, &["query081-037", "query013-002", "query081-005"]);
        let corpus = DsbCorpus {
            query_root: tmp.path().to_path_buf(),
            scale_factor: 10,
            seeds: vec![101],
        };
        let instances = corpus.instances().unwrap();
        let stems: Vec<&str> = instances.iter().map(|i| i.file_stem.as_str()).collect();
        assert_eq!(stems, ["query013-002", "query081-005", "query081-037"]);
    }

    #[test]
    fn identity_is_scoped_to_the_seed() {
        let tmp = fake_tree(101, &["query001-001"]);
        let corpus = DsbCorpus {
            query_root: tmp.path().to_path_buf(),
            scale_factor: 10,
            seeds: vec![101],
        };
        let instances = corpus.instances().unwrap();
        assert_eq!(instances[0].identity, "101/query001-001");
        assert_eq!(
            instances[0].partition.segments,
            ["sf_10", "default", "101"]
        );
    }

    #[test]
    fn missing_seed_dir_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let corpus = DsbCorpus {
            query_root: tmp.path().to_path_buf(),
            scale_factor: 10,
            seeds: vec![7],
        };
        assert!(corpus.instances().is_err());
    }
}
