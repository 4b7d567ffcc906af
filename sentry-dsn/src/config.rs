use http::HeaderName;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_AUTH_HEADER: &str = "X-Sentry-Auth";

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid auth header name: {0}")]
    InvalidAuthHeader(String),

    #[error("Default host cannot be empty")]
    EmptyDefaultHost,
}

fn default_auth_header() -> String {
    DEFAULT_AUTH_HEADER.to_string()
}

/// Extractor configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ExtractorConfig {
    /// Header carrying the `Sentry key=value,...` credentials
    #[serde(default = "default_auth_header")]
    pub auth_header: String,
    /// Host used when neither the request URI nor the Host header has one
    #[serde(default)]
    pub default_host: Option<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            auth_header: default_auth_header(),
            default_host: None,
        }
    }
}

impl ExtractorConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.header_name()?;

        if let Some(host) = &self.default_host
            && host.trim().is_empty()
        {
            return Err(ValidationError::EmptyDefaultHost);
        }

        Ok(())
    }

    pub(crate) fn header_name(&self) -> Result<HeaderName, ValidationError> {
        HeaderName::from_bytes(self.auth_header.as_bytes())
            .map_err(|_| ValidationError::InvalidAuthHeader(self.auth_header.clone()))
    }
}
