//! Parsing of the `X-Sentry-Auth` header.
//!
//! The header looks like:
//!
//! ```text
//! Sentry sentry_version=7, sentry_client=raven-python/5.27.0, sentry_key=<32 hex>, sentry_secret=<32 hex>
//! ```
//!
//! Only `sentry_key` and `sentry_secret` are of interest here. Everything else in the
//! header is ignored.

use crate::errors::{DsnError, Result};

pub(crate) const SENTRY_KEY: &str = "sentry_key";
pub(crate) const SENTRY_SECRET: &str = "sentry_secret";

const KEY_LEN: usize = 32;

/// Public/secret key pair identifying a client project
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub public_key: String,
    pub secret_key: Option<String>,
}

impl Credentials {
    /// Builds a key pair, treating an empty secret as absent
    pub fn new(public_key: impl Into<String>, secret_key: Option<String>) -> Self {
        Self {
            public_key: public_key.into(),
            secret_key: secret_key.filter(|s| !s.is_empty()),
        }
    }
}

/// Keys are issued as 32 lowercase hex characters
fn is_hex_key(value: &str) -> bool {
    value.len() == KEY_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Parses the public and secret key out of an auth header value.
///
/// Fails with `MissingCredentials` if the value is empty, carries no pair list after
/// the scheme token, or has no well-formed `sentry_key`. A missing secret is fine.
pub fn parse_auth_header(value: &str) -> Result<Credentials> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DsnError::MissingCredentials);
    }

    // Drop the leading "Sentry" token
    let (_scheme, pairs) = value
        .split_once(char::is_whitespace)
        .ok_or(DsnError::MissingCredentials)?;

    let mut public_key = None;
    let mut secret_key = None;

    for pair in pairs.split(',') {
        let Some((key, val)) = pair.split_once('=') else {
            continue;
        };
        let val = val.trim();
        if !is_hex_key(val) {
            continue;
        }
        match key.trim() {
            SENTRY_KEY => public_key = Some(val),
            SENTRY_SECRET => secret_key = Some(val),
            _ => {}
        }
    }

    let public_key = public_key.ok_or(DsnError::MissingCredentials)?;
    Ok(Credentials::new(public_key, secret_key.map(str::to_owned)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "4784fbc50de2473f9977cfce8a9adce5";
    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_key_and_secret() {
        let header = format!(
            "Sentry sentry_version=7, sentry_client=<client>, sentry_timestamp=1614144877.269, sentry_secret={SECRET}, sentry_key={KEY}"
        );
        let creds = parse_auth_header(&header).unwrap();
        assert_eq!(creds.public_key, KEY);
        assert_eq!(creds.secret_key.as_deref(), Some(SECRET));
    }

    #[test]
    fn test_key_only() {
        let header = format!("Sentry sentry_key={KEY},sentry_version=7");
        let creds = parse_auth_header(&header).unwrap();
        assert_eq!(creds.public_key, KEY);
        assert_eq!(creds.secret_key, None);
    }

    #[test]
    fn test_secret_alone_is_not_enough() {
        let header = format!("Sentry sentry_version=7, sentry_secret={SECRET}");
        assert_eq!(
            parse_auth_header(&header).unwrap_err(),
            DsnError::MissingCredentials
        );
    }

    #[test]
    fn test_no_key_in_header() {
        assert_eq!(
            parse_auth_header("Sentry sentry_version=7, sentry_client=<client>").unwrap_err(),
            DsnError::MissingCredentials
        );
    }

    #[test]
    fn test_empty_or_bare_header() {
        assert!(matches!(
            parse_auth_header(""),
            Err(DsnError::MissingCredentials)
        ));
        assert!(matches!(
            parse_auth_header("   "),
            Err(DsnError::MissingCredentials)
        ));
        assert!(matches!(
            parse_auth_header("Sentry"),
            Err(DsnError::MissingCredentials)
        ));
    }

    #[test]
    fn test_malformed_key_is_ignored() {
        // uppercase, short and overlong values are not keys
        for bad in [
            "4784FBC50DE2473F9977CFCE8A9ADCE5",
            "4784fbc50de2",
            "4784fbc50de2473f9977cfce8a9adce5ff",
            "zzzzfbc50de2473f9977cfce8a9adce5",
        ] {
            let header = format!("Sentry sentry_key={bad}");
            assert!(parse_auth_header(&header).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_malformed_secret_is_dropped() {
        let header = format!("Sentry sentry_key={KEY}, sentry_secret=nothex");
        let creds = parse_auth_header(&header).unwrap();
        assert_eq!(creds.secret_key, None);
    }

    #[test]
    fn test_key_names_match_exactly() {
        let header = format!("Sentry xsentry_key={KEY}");
        assert!(parse_auth_header(&header).is_err());
    }
}
