use anyhow::Context;
use benchpress_core::connection::Connection;
use benchpress_corpus::split;
use std::path::Path;

const TABLES: [&str; 21] = [
    "aka_name",
    "aka_title",
    "cast_info",
    "char_name",
    "comp_cast_type",
    "company_name",
    "company_type",
    "complete_cast",
    "info_type",
    "keyword",
    "kind_type",
    "link_type",
    "movie_companies",
    "movie_info",
    "movie_info_idx",
    "movie_keyword",
    "movie_link",
    "name",
    "person_info",
    "role_type",
    "title",
];

/// The last foreign-key index created by the load; its presence means the
/// dataset is already in place.
fn loaded(conn: &mut dyn Connection) -> anyhow::Result<bool> {
    let rows = conn
        .execute("SELECT * FROM pg_indexes WHERE indexname = 'role_id_cast_info'")
        .context("failed to probe for the JOB dataset")?;
    Ok(!rows.rows.is_empty())
}

fn load(conn: &mut dyn Connection, schema_root: &Path, data_root: &Path) -> anyhow::Result<()> {
    for stmt in split::file_statements(&schema_root.join("schema.sql"))? {
        conn.execute(&stmt)?;
    }
    for table in TABLES {
        conn.execute(&format!("TRUNCATE {table} CASCADE"))?;
    }
    for table in TABLES {
        let csv = data_root.join(format!("{table}.csv"));
        tracing::info!(table, "loading");
        conn.execute(&format!(
            "COPY {table} FROM '{}' CSV DELIMITER ',' QUOTE '\"' ESCAPE '\\'",
            csv.display()
        ))?;
    }
    for stmt in split::file_statements(&schema_root.join("fkindexes.sql"))? {
        conn.execute(&stmt)?;
    }
    conn.execute("VACUUM FULL ANALYZE")?;
    Ok(())
}

pub fn run(conn: &mut dyn Connection, schema_root: &Path, data_root: &Path) -> anyhow::Result<()> {
    if loaded(conn)? {
        tracing::info!("JOB dataset already loaded");
        return Ok(());
    }
    load(conn, schema_root, data_root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchpress_core::connection::ScriptedConnection;

    fn schema_tree() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("schema.sql"),
            "CREATE TABLE title (id int);\n",
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("fkindexes.sql"),
            "CREATE INDEX role_id_cast_info ON cast_info (role_id);\n",
        )
        .unwrap();
        tmp
    }

    #[test]
    fn skips_when_dataset_is_present() {
        let tmp = schema_tree();
        let mut conn = ScriptedConnection::new();
        conn.respond_scalar("pg_indexes", "role_id_cast_info");
        run(&mut conn, tmp.path(), tmp.path()).unwrap();
        assert_eq!(conn.count_containing("TRUNCATE"), 0);
    }

    #[test]
    fn loads_schema_data_and_indexes_in_order() {
        let tmp = schema_tree();
        let mut conn = ScriptedConnection::new();
        run(&mut conn, tmp.path(), tmp.path()).unwrap();
        assert_eq!(conn.count_containing("TRUNCATE"), TABLES.len());
        assert_eq!(conn.count_containing("COPY "), TABLES.len());
        assert_eq!(conn.count_containing("CREATE INDEX role_id_cast_info"), 1);
        assert_eq!(
            conn.log().last().map(String::as_str),
            Some("VACUUM FULL ANALYZE")
        );
    }
}
