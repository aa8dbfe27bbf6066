//! Query rewriting, the engine's only extension point.

use crate::model::RewriterKind;

pub struct Rewritten {
    pub text: String,
    /// When true the engine persists the first column of the first
    /// returned row to the result artifact.
    pub capture: bool,
}

pub trait Rewrite {
    fn rewrite(&self, identity: &str, sub_index: u32, text: &str) -> Rewritten;
}

/// Returns the text unchanged and captures nothing.
pub struct PassthroughRewriter;

impl Rewrite for PassthroughRewriter {
    fn rewrite(&self, _identity: &str, _sub_index: u32, text: &str) -> Rewritten {
        Rewritten {
            text: text.to_owned(),
            capture: false,
        }
    }
}

/// Wraps read-only queries in a plan-capture directive. Statements with
/// side effects (view creation inside TPC-H q15, for example) pass through
/// untouched.
pub struct ExplainRewriter;

impl Rewrite for ExplainRewriter {
    fn rewrite(&self, _identity: &str, _sub_index: u32, text: &str) -> Rewritten {
        if is_read_only(text) {
            Rewritten {
                text: format!("EXPLAIN (ANALYZE, FORMAT JSON, VERBOSE) {text}"),
                capture: true,
            }
        } else {
            Rewritten {
                text: text.to_owned(),
                capture: false,
            }
        }
    }
}

fn is_read_only(text: &str) -> bool {
    text.trim_start()
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("select"))
}

impl RewriterKind {
    pub fn build(self) -> Box<dyn Rewrite> {
        match self {
            RewriterKind::Passthrough => Box::new(PassthroughRewriter),
            RewriterKind::ExplainAnalyze => Box::new(ExplainRewriter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_is_wrapped_and_captured() {
        let r = ExplainRewriter.rewrite("1", 1, "SELECT * FROM lineitem");
        assert!(r.capture);
        assert_eq!(
            r.text,
            "EXPLAIN (ANALYZE, FORMAT JSON, VERBOSE) SELECT * FROM lineitem"
        );
    }

    #[test]
    fn leading_whitespace_and_case_are_ignored() {
        let r = ExplainRewriter.rewrite("1", 1, "\n  select 1");
        assert!(r.capture);
    }

    #[test]
    fn writes_pass_through() {
        let r = ExplainRewriter.rewrite("15", 1, "CREATE VIEW revenue0 AS SELECT 1");
        assert!(!r.capture);
        assert_eq!(r.text, "CREATE VIEW revenue0 AS SELECT 1");

        let r = ExplainRewriter.rewrite("3", 1, "UPDATE t SET x = 1");
        assert!(!r.capture);
    }

    #[test]
    fn short_text_passes_through() {
        let r = ExplainRewriter.rewrite("1", 1, "sel");
        assert!(!r.capture);
    }

    #[test]
    fn passthrough_never_captures() {
        let r = PassthroughRewriter.rewrite("1", 1, "SELECT 1");
        assert!(!r.capture);
        assert_eq!(r.text, "SELECT 1");
    }
}
