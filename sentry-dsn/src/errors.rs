use thiserror::Error;

/// Result type alias for DSN extraction
pub type Result<T, E = DsnError> = std::result::Result<T, E>;

/// Reasons a DSN could not be recovered from a request
///
/// Both kinds are terminal for the request being inspected. Callers branch on the
/// variant, never on the message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DsnError {
    /// Neither the auth header nor the query string carried a public key
    #[error("sentry: missing public key")]
    MissingCredentials,

    /// The path is not a store, envelope or legacy store endpoint
    #[error("sentry: failed to parse project ID from path")]
    MissingProjectId,
}

impl DsnError {
    /// Tag used for the `outcome` dimension of the extraction metric
    pub const fn as_str(&self) -> &'static str {
        match self {
            DsnError::MissingCredentials => "missing_credentials",
            DsnError::MissingProjectId => "missing_project_id",
        }
    }
}
