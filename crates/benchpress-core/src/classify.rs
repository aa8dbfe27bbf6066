//! Three-way classification of execution failures.

use crate::connection::DbError;

/// Execution canceled due to statement timeout.
pub const SQLSTATE_QUERY_CANCELED: &str = "57014";
/// SQLSTATE class 22, data exception (division by zero and friends).
pub const SQLSTATE_CLASS_DATA_EXCEPTION: &str = "22";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Terminal, non-retried; the identity joins the skip table.
    Timeout,
    /// Data-dependent and query-specific; recorded with full detail.
    DataError,
    /// Everything else; aborts the remainder of the corpus.
    Fatal,
}

/// Pure function from driver-reported error identity to outcome kind.
/// Failures without a SQLSTATE (connection loss, protocol errors) are
/// always fatal.
pub fn classify(err: &DbError) -> ErrorClass {
    match err.sqlstate() {
        Some(code) if code == SQLSTATE_QUERY_CANCELED => ErrorClass::Timeout,
        Some(code) if code.starts_with(SQLSTATE_CLASS_DATA_EXCEPTION) => ErrorClass::DataError,
        _ => ErrorClass::Fatal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_canceled_is_timeout() {
        let err = DbError::sql("57014", "canceling statement due to statement timeout");
        assert_eq!(classify(&err), ErrorClass::Timeout);
    }

    #[test]
    fn division_by_zero_is_data_error() {
        let err = DbError::sql("22012", "division by zero");
        assert_eq!(classify(&err), ErrorClass::DataError);
    }

    #[test]
    fn other_data_exceptions_are_data_errors() {
        let err = DbError::sql("22003", "numeric value out of range");
        assert_eq!(classify(&err), ErrorClass::DataError);
    }

    #[test]
    fn syntax_error_is_fatal() {
        let err = DbError::sql("42601", "syntax error at or near");
        assert_eq!(classify(&err), ErrorClass::Fatal);
    }

    #[test]
    fn session_failure_is_fatal() {
        let err = DbError::Session("connection closed".into());
        assert_eq!(classify(&err), ErrorClass::Fatal);
    }
}
