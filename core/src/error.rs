use thiserror::Error;

/// Failures while turning user-typed text into domain values.
///
/// The pacing math itself never fails; these only surface at the
/// input boundary (CLI arguments, the day editor line, persisted keys).
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    Date(String),

    #[error("invalid month '{0}', expected YYYY-MM")]
    Month(String),

    #[error("invalid amount '{0}'")]
    Amount(String),

    #[error("unknown weekday '{0}'")]
    Weekday(String),

    #[error("unknown theme '{0}', expected dark or light")]
    Theme(String),

    #[error("unknown key '{0}'")]
    UnknownKey(String),

    #[error("ambiguous key '{key}' matches {candidates:?}")]
    AmbiguousKey { key: String, candidates: Vec<String> },
}
