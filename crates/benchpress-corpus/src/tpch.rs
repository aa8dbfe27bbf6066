use crate::split;
use benchpress_core::model::{Partition, QueryInstance};
use std::path::PathBuf;

pub const QUERY_COUNT: u32 = 22;

/// TPC-H corpus: one directory of generated queries per seed, files
/// `1.sql` through `22.sql`. Query 15 creates and drops its revenue view,
/// so its first statement gets a defensive drop of a leftover view from an
/// interrupted earlier run.
///
/// The identity is the bare query number: the same template produces "the
/// same" query under every seed, so a timeout under one seed preempts the
/// others within a run.
pub struct TpchCorpus {
    pub query_root: PathBuf,
    pub seed_start: u32,
    pub seed_stop: u32,
    pub scale_factor: u32,
}

impl TpchCorpus {
    pub fn instances(&self) -> anyhow::Result<Vec<QueryInstance>> {
        let mut out = Vec::new();
        for seed in self.seed_start..=self.seed_stop {
            let partition = Partition::new(
                "tpch",
                vec![format!("sf_{}", self.scale_factor), seed.to_string()],
            );
            for query in 1..=QUERY_COUNT {
                let path = self
                    .query_root
                    .join(seed.to_string())
                    .join(format!("{query}.sql"));
                for (idx, text) in split::file_statements(&path)?.into_iter().enumerate() {
                    let sub_index = idx as u32 + 1;
                    let setup_sql = if (query, sub_index) == (15, 1) {
                        vec!["DROP VIEW IF EXISTS revenue0".to_owned()]
                    } else {
                        Vec::new()
                    };
                    out.push(QueryInstance {
                        identity: query.to_string(),
                        file_stem: query.to_string(),
                        sub_index,
                        text,
                        setup_sql,
                        partition: partition.clone(),
                    });
                }
            }
        }
        tracing::debug!(instances = out.len(), "enumerated tpch corpus");
        Ok(out)
    }
}
