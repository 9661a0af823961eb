//! Catalog core for flixdeck.
//!
//! Provides the TMDB API client and the catalog layer that aggregates
//! listings, searches titles and resolves watch pages.

/// Catalog aggregation, search and lookup.
pub mod catalog;

/// Error types surfaced to callers.
pub mod error;

/// TMDB API client.
pub mod tmdb;
