//! Error types for the specguard core
//!
//! Only load-time failures are errors: input that cannot be parsed into
//! the expected shape at all. Verification-time findings (missing paths,
//! mismatched references) are `Violation` values collected into the
//! `Report`, never errors: absence is an expected, reportable outcome.

use thiserror::Error;

/// Load-time failure: fatal to the run, no report can be produced
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The document input is not parseable as the expected tree shape
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// The rule catalog input is not parseable as a rule list
    #[error("malformed rule catalog: {0}")]
    MalformedCatalog(String),
}

/// Result type alias for specguard operations
pub type Result<T> = std::result::Result<T, Error>;
