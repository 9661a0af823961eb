//! Typed error conditions raised by the catalog core.
//!
//! Functions return `anyhow::Result`; callers that need to branch on a
//! specific condition recover it with `anyhow::Error::downcast_ref`.

use crate::tmdb::RequestType;

/// Catalog error taxonomy.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum CatalogError {
    /// Non-success status from TMDB after the API-key fallback was exhausted.
    #[error("TMDB API error (HTTP {status}): {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Provider `status_message`, or the raw body when it is not JSON.
        message: String,
    },

    /// A request type name with no URL template.
    #[error("request type {0} is not implemented yet")]
    UnimplementedRequestType(String),

    /// A genre-filtered request type was built without a genre.
    #[error("request type {0} requires a genre")]
    MissingGenre(RequestType),

    /// Neither the movie nor the TV lookup matched the pathname.
    #[error("not found: no movie or tv series {id} matches {pathname}")]
    NotFound {
        /// Requested TMDB id.
        id: u64,
        /// Pathname that was matched against.
        pathname: String,
    },

    /// Fan-in observed an outcome that is neither a success nor a failure
    /// for its request.
    #[error("unexpected response: {0}")]
    UnexpectedSettlement(String),
}

impl CatalogError {
    /// Returns the HTTP status for [`CatalogError::Http`].
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
