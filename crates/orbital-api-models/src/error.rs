//! Errors raised while parsing or validating user-supplied descriptors.

use thiserror::Error;

/// Result alias for model parsing.
pub type ModelResult<T> = Result<T, ModelError>;

/// Formatted-input and validation failures for request descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A stock invocation had no query name.
    #[error("stock query name is required")]
    MissingStockName,
    /// A stock argument was not a single `key=value` pair.
    #[error("stock argument '{token}' must be formatted as key=value")]
    MalformedStockArgument {
        /// Offending token.
        token: String,
    },
    /// A context entry was not a single `key=value` pair.
    #[error("context entry '{entry}' must be formatted as key=value")]
    MalformedContextEntry {
        /// Offending entry.
        entry: String,
    },
    /// A postback string had an unsupported number of fields.
    #[error(
        "postback has {count} fields; expected URL [token [fingerprint [format [bucket region accesskey secretkey]]]]"
    )]
    PostbackFieldCount {
        /// Number of fields found.
        count: usize,
    },
    /// The delivery format was not recognised.
    #[error("unknown format '{value}'; expected ctim, splunk, or s3")]
    UnknownFormat {
        /// Raw format value.
        value: String,
    },
    /// A URL is required for this delivery format.
    #[error("a URL is required unless the format is ctim")]
    MissingUrl,
    /// Splunk delivery needs a token.
    #[error("the splunk format requires a token")]
    MissingSplunkToken,
    /// S3 delivery needs bucket, region, and both keys.
    #[error("the s3 format requires bucket, region, accesskey, and secretkey")]
    IncompleteS3Target,
    /// Per-statement names or labels did not line up with the statements.
    #[error("{field} has {actual} entries but {expected} SQL statements were given")]
    CountMismatch {
        /// Which list mismatched (`names` or `labels`).
        field: &'static str,
        /// Number of SQL statements.
        expected: usize,
        /// Number of entries supplied.
        actual: usize,
    },
}
