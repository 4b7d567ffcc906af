//! Classification of ingestion endpoint paths.
//!
//! Recognised shapes, in priority order:
//!
//! ```text
//! /api/<project_id>/store/
//! /api/<project_id>/envelope/
//! /api/store/                  (legacy, no project id)
//! ```
//!
//! Paths are compared segment by segment after dropping empty segments, so
//! `//api//1234///store//` is the same as `/api/1234/store/`. The endpoint segment
//! itself has to be followed by a separator, so `/api/1234/store` matches nothing.

use crate::errors::{DsnError, Result};

/// Ingestion endpoint a request was addressed to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// `/api/<project_id>/store/`
    Store(String),
    /// `/api/<project_id>/envelope/`
    Envelope(String),
    /// `/api/store/`. The project has to be resolved from the key downstream.
    LegacyStore,
}

impl Endpoint {
    pub fn project_id(&self) -> Option<&str> {
        match self {
            Endpoint::Store(id) | Endpoint::Envelope(id) => Some(id),
            Endpoint::LegacyStore => None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Endpoint::Store(_) => "store",
            Endpoint::Envelope(_) => "envelope",
            Endpoint::LegacyStore => "legacy_store",
        }
    }
}

const API: &str = "api";
const STORE: &str = "store";
const ENVELOPE: &str = "envelope";

// Endpoint names that follow `api/<project_id>`, in match priority
static PROJECT_ENDPOINTS: &[&str] = &[STORE, ENVELOPE];

fn is_project_id(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Non-empty path segment and whether a `/` follows it
#[derive(Clone, Copy)]
struct Segment<'a> {
    name: &'a str,
    closed: bool,
}

/// Splits a path on `/`, dropping the empty segments repeated separators produce.
fn segments(path: &str) -> Vec<Segment<'_>> {
    let mut parts = path.split('/').peekable();
    let mut segments = Vec::new();
    while let Some(name) = parts.next() {
        if !name.is_empty() {
            segments.push(Segment {
                name,
                closed: parts.peek().is_some(),
            });
        }
    }
    segments
}

/// Finds `api/<project_id>/<endpoint>/` anywhere in the segment list and returns the
/// project id, which is always the segment right after `api`.
fn find_project_id<'a>(segments: &[Segment<'a>], endpoint: &str) -> Option<&'a str> {
    segments.windows(3).find_map(|w| match *w {
        [api, id, name]
            if api.name == API && name.name == endpoint && name.closed && is_project_id(id.name) =>
        {
            Some(id.name)
        }
        _ => None,
    })
}

/// Maps a (percent-decoded) request path onto one of the known ingestion endpoints.
///
/// Fails with `MissingProjectId` if the path matches none of them. Endpoint segments
/// must be followed by a `/`.
pub fn classify_path(path: &str) -> Result<Endpoint> {
    let segments = segments(path);

    for &endpoint in PROJECT_ENDPOINTS {
        if let Some(id) = find_project_id(&segments, endpoint) {
            let id = id.to_string();
            return Ok(match endpoint {
                STORE => Endpoint::Store(id),
                _ => Endpoint::Envelope(id),
            });
        }
    }

    if let [api, store] = segments[..]
        && api.name == API
        && store.name == STORE
        && store.closed
    {
        return Ok(Endpoint::LegacyStore);
    }

    Err(DsnError::MissingProjectId)
}
