//! Listing sections and their fan-in.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::tmdb::{Show, TmdbPagingResponse, TmdbRequest};

/// A titled listing section to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShowRequest {
    /// Section title shown to the user.
    pub title: String,
    /// Listing to run.
    pub req: TmdbRequest,
    /// Whether the section is displayed.
    #[serde(default = "default_visible")]
    pub visible: bool,
}

const fn default_visible() -> bool {
    true
}

impl ShowRequest {
    /// Creates a visible section.
    #[must_use]
    pub fn new(title: impl Into<String>, req: TmdbRequest) -> Self {
        Self {
            title: title.into(),
            req,
            visible: true,
        }
    }

    /// Marks the section as hidden.
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// A fetched section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizedShows {
    /// Section title, copied from the request.
    pub title: String,
    /// Listing results; empty when the request failed.
    pub shows: Vec<Show>,
    /// Visibility, copied from the request.
    pub visible: bool,
}

/// Pairs each request with its outcome, in request order.
///
/// A failed outcome yields an empty section and a warning. Successful
/// outcomes of request types whose listings omit `media_type` get it
/// filled in from the request.
///
/// # Errors
///
/// Returns [`CatalogError::UnexpectedSettlement`] when the outcome count
/// differs from the request count.
pub fn categorize(
    requests: &[ShowRequest],
    outcomes: Vec<Result<TmdbPagingResponse>>,
) -> Result<Vec<CategorizedShows>> {
    if outcomes.len() != requests.len() {
        return Err(CatalogError::UnexpectedSettlement(format!(
            "{} outcomes for {} requests",
            outcomes.len(),
            requests.len()
        ))
        .into());
    }

    let sections = requests
        .iter()
        .zip(outcomes)
        .map(|(request, outcome)| {
            let shows = match outcome {
                Ok(response) if request.req.request_type.needs_media_type_backfill() => {
                    let media_type = request.req.media_type;
                    response
                        .results
                        .into_iter()
                        .map(|show| show.with_media_type(media_type))
                        .collect()
                }
                Ok(response) => response.results,
                Err(err) => {
                    tracing::warn!(
                        title = %request.title,
                        request_type = %request.req.request_type,
                        error = %err,
                        "Section request failed, leaving it empty"
                    );
                    Vec::new()
                }
            };
            CategorizedShows {
                title: request.title.clone(),
                shows,
                visible: request.visible,
            }
        })
        .collect();

    Ok(sections)
}
