use http::Uri;
use percent_encoding::percent_decode_str;
use serde::Serialize;

use crate::credentials::{Credentials, parse_auth_header};
use crate::errors::Result;
use crate::path::{Endpoint, classify_path};
use crate::query::parse_query_string;

const DSN_SCHEME: &str = "https";

/// Where the credentials of a request were found
///
/// The header is always tried first. Header and query values are never combined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialSource {
    Header(Credentials),
    QueryString(Credentials),
}

impl CredentialSource {
    pub fn credentials(&self) -> &Credentials {
        match self {
            CredentialSource::Header(c) | CredentialSource::QueryString(c) => c,
        }
    }

    pub fn into_credentials(self) -> Credentials {
        match self {
            CredentialSource::Header(c) | CredentialSource::QueryString(c) => c,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            CredentialSource::Header(_) => "header",
            CredentialSource::QueryString(_) => "query",
        }
    }
}

/// Tries the auth header, then the query string.
pub fn resolve_credentials(
    auth_header: Option<&str>,
    query: Option<&str>,
) -> Result<CredentialSource> {
    if let Ok(creds) = parse_auth_header(auth_header.unwrap_or_default()) {
        return Ok(CredentialSource::Header(creds));
    }
    parse_query_string(query).map(CredentialSource::QueryString)
}

/// Client DSN recovered from an inbound ingestion request
///
/// `url` is `None` exactly when the request hit the legacy store endpoint, which
/// carries no project id. The keys are still populated in that case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Dsn {
    url: Option<String>,
    host: String,
    project_id: Option<String>,
    public_key: String,
    secret_key: Option<String>,
}

impl Dsn {
    fn assemble(credentials: Credentials, host: String, project_id: Option<String>) -> Self {
        let Credentials {
            public_key,
            secret_key,
        } = credentials;

        let url = project_id.as_deref().map(|project_id| match &secret_key {
            Some(secret) => format!("{DSN_SCHEME}://{public_key}:{secret}@{host}/{project_id}"),
            None => format!("{DSN_SCHEME}://{public_key}@{host}/{project_id}"),
        });

        Dsn {
            url,
            host,
            project_id,
            public_key,
            secret_key,
        }
    }

    /// The assembled `https://<key>[:<secret>]@<host>/<project_id>` string
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn secret_key(&self) -> Option<&str> {
        self.secret_key.as_deref()
    }
}

/// Recovers the client DSN from the parts of an inbound request.
///
/// - `uri`: the request target, in origin form (`/api/1/store/?...`) or absolute form
/// - `auth_header`: value of the `X-Sentry-Auth` header, if any
/// - `fallback_host`: transport-level host, used when `uri` carries none
///
/// The path is percent-decoded, then classified before credentials are looked at, so
/// an unroutable path reports `MissingProjectId` even if credentials are missing too.
pub fn extract_dsn(uri: &Uri, auth_header: Option<&str>, fallback_host: &str) -> Result<Dsn> {
    extract(uri, auth_header, fallback_host).map(|extraction| extraction.dsn)
}

/// A DSN along with how its parts were found
pub(crate) struct Extraction {
    pub dsn: Dsn,
    pub source: &'static str,
    pub endpoint: &'static str,
}

pub(crate) fn extract(
    uri: &Uri,
    auth_header: Option<&str>,
    fallback_host: &str,
) -> Result<Extraction> {
    let path = percent_decode_str(uri.path()).decode_utf8_lossy();
    let endpoint = classify_path(&path)?;
    let source = resolve_credentials(auth_header, uri.query())?;

    let host = match uri.host() {
        Some(host) if !host.is_empty() => host,
        _ => fallback_host,
    };

    let endpoint_name = endpoint.name();
    let source_name = source.name();
    let project_id = match endpoint {
        Endpoint::Store(id) | Endpoint::Envelope(id) => Some(id),
        Endpoint::LegacyStore => None,
    };

    Ok(Extraction {
        dsn: Dsn::assemble(source.into_credentials(), host.to_string(), project_id),
        source: source_name,
        endpoint: endpoint_name,
    })
}
