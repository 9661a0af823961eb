//! TMDB API response types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

// --- Media Type ---

/// Media classification of a show.
///
/// `Anime` is TV flagged as anime; it queries the `tv` endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Feature film.
    Movie,
    /// TV series.
    Tv,
    /// Anime series.
    Anime,
}

impl MediaType {
    /// Returns the wire name (`movie`, `tv`, `anime`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
            Self::Anime => "anime",
        }
    }

    /// Returns the TMDB path segment for this media type.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv | Self::Anime => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "tv" => Ok(Self::Tv),
            "anime" => Ok(Self::Anime),
            other => Err(format!("unknown media type: {other}")),
        }
    }
}

/// Reads `media_type`, treating values other than movie/tv/anime
/// (for example `person` in multi-search) as absent.
fn lenient_media_type<'de, D>(deserializer: D) -> Result<Option<MediaType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

// --- Show ---

/// A catalog entry as returned by TMDB listings and lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    /// TMDB id (separate id spaces for movie and tv).
    pub id: u64,
    /// Movie title.
    #[serde(default)]
    pub title: Option<String>,
    /// TV series name.
    #[serde(default)]
    pub name: Option<String>,
    /// Original movie title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Original series name.
    #[serde(default)]
    pub original_name: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Media type; absent for listings that do not report it.
    #[serde(
        default,
        deserialize_with = "lenient_media_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub media_type: Option<MediaType>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Movie release date (YYYY-MM-DD).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Series first air date (YYYY-MM-DD).
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Vote count.
    #[serde(default)]
    pub vote_count: Option<u32>,
    /// Genre ids (listings only).
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: Option<bool>,
    /// Keywords, when requested with `append_to_response=keywords`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<KeywordResponse>,
}

impl Show {
    /// Returns a copy carrying the given media type.
    #[must_use]
    pub fn with_media_type(self, media_type: MediaType) -> Self {
        Self {
            media_type: Some(media_type),
            ..self
        }
    }
}

// --- Paging ---

/// Paginated listing envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmdbPagingResponse {
    /// Current page number.
    pub page: u32,
    /// Page results.
    pub results: Vec<Show>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
}

// --- Details ---

/// Movie or TV details with videos and keywords appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowDetails {
    /// Base record.
    #[serde(flatten)]
    pub show: Show,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<GenreEntry>,
    /// Videos (trailers, teasers).
    #[serde(default)]
    pub videos: Option<VideoResponse>,
    /// Runtime in minutes (movies).
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Number of seasons (tv).
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreEntry {
    /// Genre id.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// `videos` block of a details response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResponse {
    /// Videos.
    #[serde(default)]
    pub results: Vec<Video>,
}

/// A single video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// Video id.
    pub id: String,
    /// Site-specific key (for example a `YouTube` video id).
    pub key: String,
    /// Video title.
    pub name: String,
    /// Hosting site.
    pub site: String,
    /// Video kind ("Trailer", "Teaser", ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Official upload flag.
    #[serde(default)]
    pub official: bool,
}

// --- Keywords ---

/// Keyword list.
///
/// Movies return `keywords`, TV returns `results`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordResponse {
    /// Owning show id (absent when appended to a details response).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Movie keywords.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<Keyword>,
    /// TV keywords.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<Keyword>,
}

impl KeywordResponse {
    /// Iterates over keywords regardless of media type.
    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter().chain(self.results.iter())
    }
}

/// A single keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    /// Keyword id.
    pub id: u64,
    /// Keyword text.
    pub name: String,
}

// --- Season ---

/// Response from `tv/{series_id}/season/{season_number}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    /// TMDB season id.
    pub id: u64,
    /// Season number (0 = specials).
    pub season_number: u32,
    /// Season name.
    #[serde(default)]
    pub name: Option<String>,
    /// Season overview.
    #[serde(default)]
    pub overview: Option<String>,
    /// Air date.
    #[serde(default)]
    pub air_date: Option<String>,
    /// Episodes in this season.
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// A single episode within a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// TMDB episode id.
    pub id: u64,
    /// Episode number within the season.
    pub episode_number: u32,
    /// Episode name.
    pub name: String,
    /// Episode overview.
    #[serde(default)]
    pub overview: Option<String>,
    /// Air date.
    #[serde(default)]
    pub air_date: Option<String>,
    /// Season number.
    pub season_number: u32,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Still image path.
    #[serde(default)]
    pub still_path: Option<String>,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    #[allow(dead_code)]
    pub success: bool,
}
