//! Catalog request descriptors and their TMDB path templates.

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::types::MediaType;
use crate::error::CatalogError;

/// Language requested for every listing.
const LANGUAGE: &str = "en-US";

/// Keyword filter identifying anime (TMDB keyword 210024), already encoded.
const ANIME_KEYWORDS: &str = "210024%2C";

/// Release/air date cutoff for anime listings.
const ANIME_DATE_CUTOFF: &str = "2024-11-10";

/// TMDB network id of Netflix.
const NETFLIX_NETWORK: u32 = 213;

/// Closed set of catalog query kinds.
///
/// The wire name is `SCREAMING_SNAKE_CASE` (for example `TOP_RATED`).
/// Parsing any other name yields [`CatalogError::UnimplementedRequestType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[allow(clippy::module_name_repetitions)]
pub enum RequestType {
    /// Daily trending titles.
    Trending,
    /// Top rated titles.
    TopRated,
    /// Popular titles without talk and news.
    Popular,
    /// Titles on the Netflix network.
    Netflix,
    /// Titles in one genre without talk and news.
    Genre,
    /// Korean-language titles.
    Korean,
    /// Newest anime.
    AnimeLatest,
    /// Most popular anime.
    AnimeTrending,
    /// Most voted anime.
    AnimeTopRated,
    /// Anime on the Netflix network.
    AnimeNetflix,
    /// Anime in one genre.
    AnimeGenre,
}

impl RequestType {
    /// Every request type, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::Trending,
        Self::TopRated,
        Self::Popular,
        Self::Netflix,
        Self::Genre,
        Self::Korean,
        Self::AnimeLatest,
        Self::AnimeTrending,
        Self::AnimeTopRated,
        Self::AnimeNetflix,
        Self::AnimeGenre,
    ];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trending => "TRENDING",
            Self::TopRated => "TOP_RATED",
            Self::Popular => "POPULAR",
            Self::Netflix => "NETFLIX",
            Self::Genre => "GENRE",
            Self::Korean => "KOREAN",
            Self::AnimeLatest => "ANIME_LATEST",
            Self::AnimeTrending => "ANIME_TRENDING",
            Self::AnimeTopRated => "ANIME_TOP_RATED",
            Self::AnimeNetflix => "ANIME_NETFLIX",
            Self::AnimeGenre => "ANIME_GENRE",
        }
    }

    /// Whether results of this request type come back without a usable
    /// `media_type` and must take the request's media type instead.
    #[must_use]
    pub const fn needs_media_type_backfill(self) -> bool {
        matches!(
            self,
            Self::TopRated | Self::Netflix | Self::Popular | Self::Genre | Self::Korean
        )
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CatalogError::UnimplementedRequestType(String::from(s)))
    }
}

impl TryFrom<String> for RequestType {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RequestType> for String {
    fn from(value: RequestType) -> Self {
        Self::from(value.as_str())
    }
}

/// TMDB genre ids used by catalog sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Genre {
    /// Action (movie).
    Action,
    /// Action & Adventure (tv).
    ActionAdventure,
    /// Adventure (movie).
    Adventure,
    /// Animation.
    Animation,
    /// Comedy.
    Comedy,
    /// Crime.
    Crime,
    /// Documentary.
    Documentary,
    /// Drama.
    Drama,
    /// Family.
    Family,
    /// Fantasy (movie).
    Fantasy,
    /// Horror (movie).
    Horror,
    /// Kids (tv).
    Kids,
    /// Mystery.
    Mystery,
    /// News (tv).
    News,
    /// Reality (tv).
    Reality,
    /// Romance (movie).
    Romance,
    /// Science Fiction (movie).
    ScienceFiction,
    /// Sci-Fi & Fantasy (tv).
    SciFiFantasy,
    /// Talk (tv).
    Talk,
    /// Thriller (movie).
    Thriller,
    /// War (movie).
    War,
}

impl Genre {
    /// Returns the TMDB genre id.
    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::Action => 28,
            Self::ActionAdventure => 10_759,
            Self::Adventure => 12,
            Self::Animation => 16,
            Self::Comedy => 35,
            Self::Crime => 80,
            Self::Documentary => 99,
            Self::Drama => 18,
            Self::Family => 10_751,
            Self::Fantasy => 14,
            Self::Horror => 27,
            Self::Kids => 10_762,
            Self::Mystery => 9_648,
            Self::News => 10_763,
            Self::Reality => 10_764,
            Self::Romance => 10_749,
            Self::ScienceFiction => 878,
            Self::SciFiFantasy => 10_765,
            Self::Talk => 10_767,
            Self::Thriller => 53,
            Self::War => 10_752,
        }
    }
}

/// A catalog query: which slice of TMDB to list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbRequest {
    /// Query kind.
    pub request_type: RequestType,
    /// Media type the query lists.
    pub media_type: MediaType,
    /// Result page (default 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Genre id for genre-filtered kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<u32>,
}

impl TmdbRequest {
    /// Creates a request for the first page without a genre.
    #[must_use]
    pub const fn new(request_type: RequestType, media_type: MediaType) -> Self {
        Self {
            request_type,
            media_type,
            page: None,
            genre: None,
        }
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the genre filter.
    #[must_use]
    pub const fn genre(mut self, genre: Genre) -> Self {
        self.genre = Some(genre.id());
        self
    }

    /// Builds the TMDB path (relative to the API root, query included).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingGenre`] for `GENRE` and `ANIME_GENRE`
    /// requests without a genre.
    pub fn build_path(&self) -> Result<String> {
        let m = self.media_type.endpoint();
        let p = self.page.unwrap_or(1);
        let excluded = format!("{},{}", Genre::Talk.id(), Genre::News.id());

        let path = match self.request_type {
            RequestType::AnimeLatest => format!(
                "discover/{m}?with_keywords={ANIME_KEYWORDS}&language={LANGUAGE}&sort_by=primary_release_date.desc&release_date.lte={ANIME_DATE_CUTOFF}&with_runtime.gte=1"
            ),
            RequestType::AnimeTrending => format!(
                "discover/{m}?with_keywords={ANIME_KEYWORDS}&language={LANGUAGE}&sort_by=popularity.desc&release_date.lte={ANIME_DATE_CUTOFF}&with_runtime.gte=1"
            ),
            RequestType::AnimeTopRated => format!(
                "discover/{m}?with_keywords={ANIME_KEYWORDS}&language={LANGUAGE}&sort_by=vote_count.desc&air_date.lte={ANIME_DATE_CUTOFF}"
            ),
            RequestType::AnimeNetflix => format!(
                "discover/{m}?with_keywords={ANIME_KEYWORDS}&with_networks={NETFLIX_NETWORK}&language={LANGUAGE}"
            ),
            RequestType::Trending => format!(
                "trending/{m}/day?language={LANGUAGE}&with_original_language=en&page={p}"
            ),
            RequestType::TopRated => format!(
                "{m}/top_rated?page={p}&with_original_language=en&language={LANGUAGE}"
            ),
            RequestType::Netflix => format!(
                "discover/{m}?with_networks={NETFLIX_NETWORK}&with_original_language=en&language={LANGUAGE}&page={p}"
            ),
            RequestType::Popular => format!(
                "{m}/popular?language={LANGUAGE}&with_original_language=en&page={p}&without_genres={excluded}"
            ),
            RequestType::Genre => {
                let g = self.required_genre()?;
                format!(
                    "discover/{m}?with_genres={g}&language={LANGUAGE}&with_original_language=en&page={p}&without_genres={excluded}"
                )
            }
            RequestType::AnimeGenre => {
                let g = self.required_genre()?;
                format!(
                    "discover/{m}?with_genres={g}&with_keywords={ANIME_KEYWORDS}&language={LANGUAGE}&with_original_language=en&page={p}&without_genres={excluded}"
                )
            }
            RequestType::Korean => match self.genre {
                Some(g) => format!(
                    "discover/{m}?with_genres={g}&with_original_language=ko&language={LANGUAGE}&page={p}"
                ),
                None => {
                    format!("discover/{m}?with_original_language=ko&language={LANGUAGE}&page={p}")
                }
            },
        };

        Ok(path)
    }

    fn required_genre(&self) -> Result<u32, CatalogError> {
        self.genre
            .ok_or(CatalogError::MissingGenre(self.request_type))
    }
}
