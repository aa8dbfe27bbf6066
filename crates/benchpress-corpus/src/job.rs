use crate::split;
use benchpress_core::model::{Partition, QueryInstance};
use std::path::PathBuf;

/// The JOB query files in their canonical execution order.
pub const JOB_QUERIES: [&str; 113] = [
    "1a", "1b", "1c", "1d", "2a", "2b", "2c", "2d", "3a", "3b", "3c", "4a", "4b", "4c", "5a",
    "5b", "5c", "6a", "6b", "6c", "6d", "6e", "6f", "7a", "7b", "7c", "8a", "8b", "8c", "8d",
    "9a", "9b", "9c", "9d", "10a", "10b", "10c", "11a", "11b", "11c", "11d", "12a", "12b", "12c",
    "13a", "13b", "13c", "13d", "14a", "14b", "14c", "15a", "15b", "15c", "15d", "16a", "16b",
    "16c", "16d", "17a", "17b", "17c", "17d", "17e", "17f", "18a", "18b", "18c", "19a", "19b",
    "19c", "19d", "20a", "20b", "20c", "21a", "21b", "21c", "22a", "22b", "22c", "22d", "23a",
    "23b", "23c", "24a", "24b", "25a", "25b", "25c", "26a", "26b", "26c", "27a", "27b", "27c",
    "28a", "28b", "28c", "29a", "29b", "29c", "30a", "30b", "30c", "31a", "31b", "31c", "32a",
    "32b", "33a", "33b", "33c",
];

/// JOB corpus: a fixed file list under one directory, no seeds and no
/// scale factors, hence the single placeholder partition.
pub struct JobCorpus {
    pub query_root: PathBuf,
}

impl JobCorpus {
    pub fn instances(&self) -> anyhow::Result<Vec<QueryInstance>> {
        let partition = Partition::new("job", vec!["sf_none".to_owned(), "seed_none".to_owned()]);
        let mut out = Vec::new();
        for name in JOB_QUERIES {
            let path = self.query_root.join(format!("{name}.sql"));
            for (idx, text) in split::file_statements(&path)?.into_iter().enumerate() {
                out.push(QueryInstance {
                    identity: name.to_owned(),
                    file_stem: name.to_owned(),
                    sub_index: idx as u32 + 1,
                    text,
                    setup_sql: Vec::new(),
                    partition: partition.clone(),
                });
            }
        }
        tracing::debug!(instances = out.len(), "enumerated job corpus");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_list_is_complete_and_ordered() {
        assert_eq!(JOB_QUERIES.len(), 113);
        assert_eq!(JOB_QUERIES.first(), Some(&"1a"));
        assert_eq!(JOB_QUERIES.last(), Some(&"33c"));
    }

    #[test]
    fn enumerates_in_list_order_with_one_partition() {
        let tmp = tempfile::tempdir().unwrap();
        for name in JOB_QUERIES {
            std::fs::write(tmp.path().join(format!("{name}.sql")), "SELECT 1;\n").unwrap();
        }
        let corpus = JobCorpus {
            query_root: tmp.path().to_path_buf(),
        };
        let instances = corpus.instances().unwrap();
        assert_eq!(instances.len(), 113);
        assert_eq!(instances[0].identity, "1a");
        assert_eq!(instances[112].identity, "33c");
        assert!(instances
            .iter()
            .all(|i| i.partition.segments == ["sf_none", "seed_none"]));
    }

    #[test]
    fn missing_query_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let corpus = JobCorpus {
            query_root: tmp.path().to_path_buf(),
        };
        assert!(corpus.instances().is_err());
    }
}
