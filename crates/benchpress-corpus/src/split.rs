use anyhow::Context;
use std::path::Path;

/// Splits a benchmark query file into executable statements.
///
/// Statements end at semicolons outside single-quoted literals; `--`
/// comments run to end of line; empty fragments are dropped. This is not
/// a SQL parser and does not need to be: benchmark query files are plain
/// statement sequences.
pub fn statements(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            current.push(c);
            if c == '\'' {
                in_string = false;
            }
            continue;
        }
        match c {
            '\'' => {
                in_string = true;
                current.push(c);
            }
            '-' if chars.peek() == Some(&'-') => {
                chars.next();
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        current.push('\n');
                        break;
                    }
                }
            }
            ';' => {
                let stmt = current.trim();
                if !stmt.is_empty() {
                    out.push(stmt.to_owned());
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }
    let tail = current.trim();
    if !tail.is_empty() {
        out.push(tail.to_owned());
    }
    out
}

/// Reads a query file and splits it into statements.
pub fn file_statements(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read query file {}", path.display()))?;
    Ok(statements(&text))
}
