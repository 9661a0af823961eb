//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::request::TmdbRequest;
use super::types::{KeywordResponse, MediaType, Season, Show, ShowDetails, TmdbPagingResponse};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches a movie with its keywords appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie(&self, id: u64) -> Result<Show>;

    /// Fetches a TV series with its keywords appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_series(&self, id: u64) -> Result<Show>;

    /// Fetches movie or TV details with videos and keywords appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn details(&self, id: u64, media_type: MediaType) -> Result<ShowDetails>;

    /// Fetches the keyword list of a movie or TV series.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn keywords(&self, id: u64, media_type: MediaType) -> Result<KeywordResponse>;

    /// Fetches a TV season including its episode list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn season(&self, series_id: u64, season_number: u32) -> Result<Season>;

    /// Runs a catalog listing request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built, or the HTTP request
    /// or JSON parsing fails.
    async fn listing(&self, request: &TmdbRequest) -> Result<TmdbPagingResponse>;

    /// Searches movies, TV series and people in one query.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_multi(&self, query: &str, page: u32) -> Result<TmdbPagingResponse>;
}
