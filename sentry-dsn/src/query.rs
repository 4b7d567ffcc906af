use url::form_urlencoded;

use crate::credentials::{Credentials, SENTRY_KEY, SENTRY_SECRET};
use crate::errors::{DsnError, Result};

/// Parses `sentry_key` and `sentry_secret` from a raw (still encoded) query string.
///
/// The first occurrence of each parameter wins. Fails with `MissingCredentials` if
/// `sentry_key` is absent or empty.
pub fn parse_query_string(query: Option<&str>) -> Result<Credentials> {
    let query = query.ok_or(DsnError::MissingCredentials)?;

    let mut public_key = None;
    let mut secret_key = None;

    for (name, value) in form_urlencoded::parse(query.as_bytes()) {
        match &*name {
            SENTRY_KEY if public_key.is_none() => public_key = Some(value.into_owned()),
            SENTRY_SECRET if secret_key.is_none() => secret_key = Some(value.into_owned()),
            _ => {}
        }
    }

    match public_key {
        Some(pk) if !pk.is_empty() => Ok(Credentials::new(pk, secret_key)),
        _ => Err(DsnError::MissingCredentials),
    }
}
