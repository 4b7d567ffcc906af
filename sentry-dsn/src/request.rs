use http::header::HOST;
use http::{HeaderName, Request};

use crate::config::{ExtractorConfig, ValidationError};
use crate::dsn::{Dsn, extract};
use crate::errors::Result;
use crate::metrics_defs::{DSN_CREDENTIAL_SOURCE, DSN_EXTRACT};

/// Recovers client DSNs from inbound HTTP requests
///
/// Stateless apart from its configuration, so one instance can be shared by every
/// connection handler.
#[derive(Clone, Debug)]
pub struct DsnExtractor {
    auth_header: HeaderName,
    default_host: Option<String>,
}

impl Default for DsnExtractor {
    fn default() -> Self {
        Self {
            auth_header: HeaderName::from_static("x-sentry-auth"),
            default_host: None,
        }
    }
}

impl DsnExtractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            auth_header: config.header_name()?,
            default_host: config.default_host.clone(),
        })
    }

    /// Extracts the DSN of the client that sent `request`.
    ///
    /// The host comes from the request URI, then the `Host` header, then the
    /// configured default host.
    pub fn from_request<B>(&self, request: &Request<B>) -> Result<Dsn> {
        let headers = request.headers();
        let auth_header = headers.get(&self.auth_header).and_then(|v| match v.to_str() {
            Ok(s) => Some(s),
            Err(_) => {
                tracing::warn!(header = %self.auth_header, "Ignoring non-ASCII auth header");
                None
            }
        });

        let fallback_host = headers
            .get(HOST)
            .and_then(|h| h.to_str().ok())
            .filter(|h| !h.is_empty())
            .or(self.default_host.as_deref())
            .unwrap_or_default();

        match extract(request.uri(), auth_header, fallback_host) {
            Ok(extraction) => {
                metrics::counter!(DSN_EXTRACT.name, "outcome" => "ok").increment(1);
                metrics::counter!(
                    DSN_CREDENTIAL_SOURCE.name,
                    "source" => extraction.source,
                    "endpoint" => extraction.endpoint
                )
                .increment(1);

                let dsn = extraction.dsn;
                tracing::debug!(
                    host = dsn.host(),
                    project_id = dsn.project_id(),
                    source = extraction.source,
                    legacy = dsn.url().is_none(),
                    "Extracted DSN"
                );
                Ok(dsn)
            }
            Err(e) => {
                metrics::counter!(DSN_EXTRACT.name, "outcome" => e.as_str()).increment(1);
                tracing::debug!(
                    error = %e,
                    method = %request.method(),
                    path = %request.uri().path(),
                    "Failed to extract DSN"
                );
                Err(e)
            }
        }
    }
}

/// Extracts the DSN from `request` using the default `X-Sentry-Auth` header.
pub fn from_request<B>(request: &Request<B>) -> Result<Dsn> {
    DsnExtractor::default().from_request(request)
}
