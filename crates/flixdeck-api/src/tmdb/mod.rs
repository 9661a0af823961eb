//! TMDB API client module.
//!
//! Sends authenticated requests to TMDB API v3 and decodes movie, TV
//! series, season and keyword data.

mod api;
mod client;
mod pacer;
mod request;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{FetchOptions, TmdbClient, TmdbClientBuilder};
pub use request::{Genre, RequestType, TmdbRequest};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    Episode, GenreEntry, Keyword, KeywordResponse, MediaType, Season, Show, ShowDetails,
    TmdbErrorResponse, TmdbPagingResponse, Video, VideoResponse,
};
