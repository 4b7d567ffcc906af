//! Recovers the DSN of the client that sent an ingestion request.
//!
//! Requests reaching a forwarding proxy may have passed through routers that
//! rewrote the Host header or stripped the URL. The client's DSN can still be
//! rebuilt from:
//!
//! 1. the credentials, taken from the `X-Sentry-Auth` header or, failing that, the
//!    `sentry_key`/`sentry_secret` query parameters
//! 2. the project id, taken from the store or envelope endpoint path
//! 3. the host, taken from the URL or the transport-level host
//!
//! ```
//! let uri = "https://sentry.io/api/1234/store/?sentry_key=4784fbc50de2473f9977cfce8a9adce5"
//!     .parse()
//!     .unwrap();
//! let dsn = sentry_dsn::extract_dsn(&uri, None, "").unwrap();
//! assert_eq!(
//!     dsn.url(),
//!     Some("https://4784fbc50de2473f9977cfce8a9adce5@sentry.io/1234")
//! );
//! ```

pub mod config;
pub mod credentials;
pub mod dsn;
pub mod errors;
pub mod metrics_defs;
pub mod path;
pub mod query;
pub mod request;

pub use credentials::{Credentials, parse_auth_header};
pub use dsn::{CredentialSource, Dsn, extract_dsn, resolve_credentials};
pub use errors::{DsnError, Result};
pub use path::{Endpoint, classify_path};
pub use query::parse_query_string;
pub use request::{DsnExtractor, from_request};
