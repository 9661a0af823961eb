//! Built-in section sets for the `shows` subcommand.

use clap::ValueEnum;
use flixdeck_api::catalog::ShowRequest;
use flixdeck_api::tmdb::{Genre, MediaType, RequestType, TmdbRequest};

/// Catalog page whose sections `shows` fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Mixed front page.
    Home,
    /// Movie listings.
    Movies,
    /// TV listings.
    TvShows,
    /// Anime listings.
    Anime,
}

fn section(title: &str, request_type: RequestType, media_type: MediaType) -> ShowRequest {
    ShowRequest::new(title, TmdbRequest::new(request_type, media_type))
}

fn genre_section(
    title: &str,
    request_type: RequestType,
    media_type: MediaType,
    genre: Genre,
) -> ShowRequest {
    ShowRequest::new(
        title,
        TmdbRequest::new(request_type, media_type).genre(genre),
    )
}

impl Preset {
    /// Sections of this page, in display order.
    #[must_use]
    pub fn sections(self) -> Vec<ShowRequest> {
        use MediaType::{Anime, Movie, Tv};
        use RequestType as R;

        match self {
            Self::Home => vec![
                section("Trending Now", R::Trending, Movie),
                section("Netflix TV Shows", R::Netflix, Tv),
                section("Popular Movies", R::Popular, Movie),
                section("Top Rated TV Shows", R::TopRated, Tv),
                genre_section("Korean Dramas", R::Korean, Tv, Genre::Drama),
                section("Trending Anime", R::AnimeTrending, Anime),
            ],
            Self::Movies => vec![
                section("Trending Movies", R::Trending, Movie),
                section("Popular Movies", R::Popular, Movie),
                section("Top Rated Movies", R::TopRated, Movie),
                section("Netflix Movies", R::Netflix, Movie),
                genre_section("Action Movies", R::Genre, Movie, Genre::Action),
                genre_section("Comedy Movies", R::Genre, Movie, Genre::Comedy),
                genre_section("Horror Movies", R::Genre, Movie, Genre::Horror),
                section("Korean Movies", R::Korean, Movie),
            ],
            Self::TvShows => vec![
                section("Trending TV Shows", R::Trending, Tv),
                section("Popular TV Shows", R::Popular, Tv),
                section("Top Rated TV Shows", R::TopRated, Tv),
                section("Netflix TV Shows", R::Netflix, Tv),
                genre_section("Action & Adventure", R::Genre, Tv, Genre::ActionAdventure),
                genre_section("Crime TV Shows", R::Genre, Tv, Genre::Crime),
                genre_section("Korean Dramas", R::Korean, Tv, Genre::Drama),
            ],
            Self::Anime => vec![
                section("Latest Anime", R::AnimeLatest, Anime),
                section("Trending Anime", R::AnimeTrending, Anime),
                section("Top Rated Anime", R::AnimeTopRated, Anime),
                section("Netflix Anime", R::AnimeNetflix, Anime),
                genre_section("Action Anime", R::AnimeGenre, Anime, Genre::ActionAdventure),
                genre_section("Comedy Anime", R::AnimeGenre, Anime, Genre::Comedy),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashSet;

    use super::*;

    const ALL: [Preset; 4] = [Preset::Home, Preset::Movies, Preset::TvShows, Preset::Anime];

    #[test]
    fn test_every_preset_builds_valid_paths() {
        for preset in ALL {
            for request in preset.sections() {
                assert!(
                    request.req.build_path().is_ok(),
                    "{preset:?}: {}",
                    request.title
                );
            }
        }
    }

    #[test]
    fn test_preset_titles_are_unique() {
        for preset in ALL {
            let sections = preset.sections();
            let titles: HashSet<_> = sections.iter().map(|s| s.title.as_str()).collect();
            assert_eq!(titles.len(), sections.len(), "{preset:?}");
        }
    }

    #[test]
    fn test_anime_preset_queries_tv_endpoints() {
        // Arrange & Act
        let sections = Preset::Anime.sections();

        // Assert
        assert!(
            sections
                .iter()
                .all(|s| s.req.build_path().unwrap().starts_with("discover/tv?"))
        );
    }

    #[test]
    fn test_value_names() {
        assert_eq!(
            Preset::from_str("tv-shows", false).unwrap(),
            Preset::TvShows
        );
        assert!(Preset::from_str("podcasts", false).is_err());
    }
}
