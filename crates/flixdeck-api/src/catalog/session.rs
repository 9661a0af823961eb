//! Request-scoped catalog operations.

use anyhow::Result;
use futures::future::join_all;
use tracing::instrument;

use super::aggregate::{CategorizedShows, ShowRequest, categorize};
use super::links::show_slug;
use super::memo::Memo;
use crate::error::CatalogError;
use crate::tmdb::{
    KeywordResponse, LocalTmdbApi, MediaType, RequestType, Season, Show, ShowDetails,
    TmdbPagingResponse, TmdbRequest,
};

/// Catalog operations for one logical request.
///
/// Every lookup except [`season`](Self::season) is memoized for the
/// lifetime of the session: repeated calls with the same arguments share one
/// provider call. Create a session per request and drop it afterwards so no
/// result leaks into unrelated requests.
#[derive(Debug)]
pub struct CatalogSession<'a, A> {
    api: &'a A,
    movies: Memo<u64, Show>,
    tv_series: Memo<u64, Show>,
    details: Memo<(u64, MediaType), ShowDetails>,
    keywords: Memo<(u64, MediaType), KeywordResponse>,
    listings: Memo<TmdbRequest, TmdbPagingResponse>,
    batches: Memo<Vec<ShowRequest>, Vec<CategorizedShows>>,
    searches: Memo<(String, u32), TmdbPagingResponse>,
}

impl<'a, A: LocalTmdbApi> CatalogSession<'a, A> {
    /// Starts a session backed by `api`.
    #[must_use]
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            movies: Memo::new(),
            tv_series: Memo::new(),
            details: Memo::new(),
            keywords: Memo::new(),
            listings: Memo::new(),
            batches: Memo::new(),
            searches: Memo::new(),
        }
    }

    /// Movie by id, keywords included.
    ///
    /// # Errors
    ///
    /// Propagates the provider error.
    pub async fn find_movie(&self, id: u64) -> Result<Show> {
        self.movies
            .get_or_try_init(id, || self.api.movie(id))
            .await
    }

    /// TV series by id, keywords included.
    ///
    /// # Errors
    ///
    /// Propagates the provider error.
    pub async fn find_tv_series(&self, id: u64) -> Result<Show> {
        self.tv_series
            .get_or_try_init(id, || self.api.tv_series(id))
            .await
    }

    /// Movie or TV details with videos and keywords.
    ///
    /// # Errors
    ///
    /// Propagates the provider error.
    pub async fn find_by_id_and_type(&self, id: u64, media_type: MediaType) -> Result<ShowDetails> {
        self.details
            .get_or_try_init((id, media_type), || self.api.details(id, media_type))
            .await
    }

    /// Keywords of a movie or TV series.
    ///
    /// # Errors
    ///
    /// Propagates the provider error.
    pub async fn keywords(&self, id: u64, media_type: MediaType) -> Result<KeywordResponse> {
        self.keywords
            .get_or_try_init((id, media_type), || self.api.keywords(id, media_type))
            .await
    }

    /// One season of a TV series. Not memoized.
    ///
    /// # Errors
    ///
    /// Propagates the provider error.
    pub async fn season(&self, series_id: u64, season_number: u32) -> Result<Season> {
        self.api.season(series_id, season_number).await
    }

    /// Runs one listing request.
    ///
    /// # Errors
    ///
    /// Propagates the build or provider error.
    pub async fn execute_request(&self, request: &TmdbRequest) -> Result<TmdbPagingResponse> {
        self.listings
            .get_or_try_init(request.clone(), || self.api.listing(request))
            .await
    }

    /// Fetches all sections concurrently and assembles them in input order.
    ///
    /// A failing section comes back empty without affecting the others.
    ///
    /// # Errors
    ///
    /// Only [`CatalogError::UnexpectedSettlement`], which signals a broken
    /// fan-in.
    #[instrument(skip_all, fields(sections = requests.len()))]
    pub async fn get_shows(&self, requests: &[ShowRequest]) -> Result<Vec<CategorizedShows>> {
        self.batches
            .get_or_try_init(requests.to_vec(), || async {
                let outcomes =
                    join_all(requests.iter().map(|r| self.execute_request(&r.req))).await;
                categorize(requests, outcomes)
            })
            .await
    }

    /// Multi-search with results ordered by popularity, highest first.
    ///
    /// The query is sent as given. Equal popularity keeps provider order.
    ///
    /// # Errors
    ///
    /// Propagates the provider error.
    #[instrument(skip_all)]
    pub async fn search_movies(&self, query: &str, page: Option<u32>) -> Result<TmdbPagingResponse> {
        let page = page.unwrap_or(1);
        self.searches
            .get_or_try_init((query.to_owned(), page), || async {
                let mut response = self.api.search_multi(query, page).await?;
                response
                    .results
                    .sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
                Ok(response)
            })
            .await
    }

    /// Resolves the show a watch page refers to.
    ///
    /// Looks the id up as a movie and as a TV series at the same time and
    /// keeps the first result (movie before TV) whose slug occurs in
    /// `pathname`. The winner carries its media type.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when neither lookup matches.
    #[instrument(skip_all, fields(id = id))]
    pub async fn find_current_movie(&self, id: u64, pathname: &str) -> Result<Show> {
        let (movie, tv) = futures::join!(self.find_movie(id), self.find_tv_series(id));

        [(movie, MediaType::Movie), (tv, MediaType::Tv)]
            .into_iter()
            .filter_map(|(outcome, media_type)| match outcome {
                Ok(show) => Some(show.with_media_type(media_type)),
                Err(err) => {
                    tracing::debug!(%media_type, error = %err, "Lookup failed");
                    None
                }
            })
            .find(|show| pathname.contains(&show_slug(show)))
            .ok_or_else(|| {
                CatalogError::NotFound {
                    id,
                    pathname: pathname.to_owned(),
                }
                .into()
            })
    }

    /// Picks a random show from popular movies, popular TV and trending anime.
    ///
    /// `pick` receives the pool size and returns an index into it. Returns
    /// `None` when the pool is empty or the index is out of range.
    ///
    /// # Errors
    ///
    /// Fails when any of the three listings fails.
    #[instrument(skip_all)]
    pub async fn random_show(&self, pick: impl FnOnce(usize) -> usize) -> Result<Option<Show>> {
        let movies = TmdbRequest::new(RequestType::Popular, MediaType::Movie);
        let tv = TmdbRequest::new(RequestType::Popular, MediaType::Tv);
        let anime = TmdbRequest::new(RequestType::AnimeTrending, MediaType::Tv);

        let (movies, tv, anime) = futures::try_join!(
            self.execute_request(&movies),
            self.execute_request(&tv),
            self.execute_request(&anime),
        )?;

        let pool: Vec<Show> = [
            (movies, MediaType::Movie),
            (tv, MediaType::Tv),
            (anime, MediaType::Anime),
        ]
        .into_iter()
        .flat_map(|(response, media_type)| {
            response
                .results
                .into_iter()
                .map(move |show| show.with_media_type(media_type))
        })
        .filter(|show| show.id != 0)
        .collect();

        if pool.is_empty() {
            return Ok(None);
        }
        let index = pick(pool.len());
        Ok(pool.into_iter().nth(index))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::tmdb::Genre;

    /// In-memory API with per-operation call counters.
    #[derive(Default)]
    struct MockTmdbApi {
        movies: HashMap<u64, Show>,
        tv_series: HashMap<u64, Show>,
        listings: HashMap<RequestType, Vec<Show>>,
        failing: HashSet<RequestType>,
        search: Vec<Show>,
        movie_calls: AtomicU32,
        tv_calls: AtomicU32,
        listing_calls: AtomicU32,
        search_calls: AtomicU32,
        season_calls: AtomicU32,
        detail_calls: AtomicU32,
        keyword_calls: AtomicU32,
    }

    fn not_found() -> anyhow::Error {
        CatalogError::Http {
            status: 404,
            message: String::from("The resource you requested could not be found."),
        }
        .into()
    }

    impl LocalTmdbApi for MockTmdbApi {
        async fn movie(&self, id: u64) -> Result<Show> {
            self.movie_calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.movies.get(&id).cloned().ok_or_else(not_found)
        }

        async fn tv_series(&self, id: u64) -> Result<Show> {
            self.tv_calls.fetch_add(1, Ordering::SeqCst);
            self.tv_series.get(&id).cloned().ok_or_else(not_found)
        }

        async fn details(&self, id: u64, _media_type: MediaType) -> Result<ShowDetails> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            let show = self.movies.get(&id).cloned().ok_or_else(not_found)?;
            Ok(ShowDetails {
                show,
                genres: Vec::new(),
                videos: None,
                runtime: Some(136),
                number_of_seasons: None,
            })
        }

        async fn keywords(&self, id: u64, _media_type: MediaType) -> Result<KeywordResponse> {
            self.keyword_calls.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::from_value(serde_json::json!({ "id": id, "keywords": [] }))?)
        }

        async fn season(&self, _series_id: u64, season_number: u32) -> Result<Season> {
            self.season_calls.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::from_value(serde_json::json!({
                "id": 3624,
                "season_number": season_number,
                "episodes": []
            }))?)
        }

        async fn listing(&self, request: &TmdbRequest) -> Result<TmdbPagingResponse> {
            self.listing_calls.fetch_add(1, Ordering::SeqCst);
            request.build_path()?;
            tokio::time::sleep(Duration::from_millis(5)).await;
            if self.failing.contains(&request.request_type) {
                return Err(CatalogError::Http {
                    status: 500,
                    message: String::from("Internal error."),
                }
                .into());
            }
            Ok(page(
                self.listings
                    .get(&request.request_type)
                    .cloned()
                    .unwrap_or_default(),
            ))
        }

        async fn search_multi(&self, _query: &str, _page: u32) -> Result<TmdbPagingResponse> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            Ok(page(self.search.clone()))
        }
    }

    fn page(results: Vec<Show>) -> TmdbPagingResponse {
        TmdbPagingResponse {
            page: 1,
            total_pages: 1,
            total_results: u32::try_from(results.len()).unwrap(),
            results,
        }
    }

    fn movie(id: u64, title: &str) -> Show {
        serde_json::from_value(serde_json::json!({ "id": id, "title": title })).unwrap()
    }

    fn series(id: u64, name: &str) -> Show {
        serde_json::from_value(serde_json::json!({ "id": id, "name": name })).unwrap()
    }

    fn typed(id: u64, title: &str, media_type: &str) -> Show {
        serde_json::from_value(
            serde_json::json!({ "id": id, "title": title, "media_type": media_type }),
        )
        .unwrap()
    }

    fn fixture_results(json: &str) -> Vec<Show> {
        serde_json::from_str::<TmdbPagingResponse>(json)
            .unwrap()
            .results
    }

    fn home_requests() -> Vec<ShowRequest> {
        vec![
            ShowRequest::new(
                "Trending Now",
                TmdbRequest::new(RequestType::Trending, MediaType::Movie),
            ),
            ShowRequest::new(
                "Netflix TV Shows",
                TmdbRequest::new(RequestType::Netflix, MediaType::Tv),
            ),
            ShowRequest::new(
                "Popular",
                TmdbRequest::new(RequestType::Popular, MediaType::Movie),
            )
            .hidden(),
            ShowRequest::new(
                "Comedy",
                TmdbRequest::new(RequestType::Genre, MediaType::Movie).genre(Genre::Comedy),
            ),
        ]
    }

    #[tokio::test]
    async fn test_get_shows_preserves_length_order_and_visibility() {
        // Arrange
        let mut api = MockTmdbApi::default();
        api.listings
            .insert(RequestType::Trending, vec![typed(1_241_982, "Moana 2", "movie")]);
        api.listings.insert(
            RequestType::Netflix,
            fixture_results(include_str!(
                "../../../../fixtures/tmdb/discover_tv_netflix.json"
            )),
        );
        let session = CatalogSession::new(&api);
        let requests = home_requests();

        // Act
        let sections = session.get_shows(&requests).await.unwrap();

        // Assert
        assert_eq!(sections.len(), requests.len());
        for (section, request) in sections.iter().zip(&requests) {
            assert_eq!(section.title, request.title);
            assert_eq!(section.visible, request.visible);
        }
        assert_eq!(sections[1].shows.len(), 3);
        assert_eq!(sections[1].shows[0].name.as_deref(), Some("Stranger Things"));
    }

    #[tokio::test]
    async fn test_get_shows_isolates_one_failure() {
        // Arrange
        let mut api = MockTmdbApi::default();
        api.listings
            .insert(RequestType::Trending, vec![typed(1, "A", "movie")]);
        api.listings
            .insert(RequestType::Netflix, vec![series(2, "B")]);
        api.listings.insert(RequestType::Genre, vec![movie(4, "D")]);
        api.failing.insert(RequestType::Popular);
        let session = CatalogSession::new(&api);

        // Act
        let sections = session.get_shows(&home_requests()).await.unwrap();

        // Assert
        let empty: Vec<_> = sections.iter().filter(|s| s.shows.is_empty()).collect();
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].title, "Popular");
        assert_eq!(sections[0].shows, vec![typed(1, "A", "movie")]);
        assert_eq!(sections[3].shows[0].id, 4);
    }

    #[tokio::test]
    async fn test_get_shows_overwrites_media_type_for_backfill_types() {
        // Arrange
        let mut api = MockTmdbApi::default();
        api.listings
            .insert(RequestType::Netflix, vec![typed(2, "Mislabeled", "movie"), series(3, "C")]);
        api.listings
            .insert(RequestType::Trending, vec![typed(1, "A", "tv")]);
        let session = CatalogSession::new(&api);

        // Act
        let sections = session.get_shows(&home_requests()).await.unwrap();

        // Assert
        assert!(
            sections[1]
                .shows
                .iter()
                .all(|s| s.media_type == Some(MediaType::Tv))
        );
        // Trending reports its own media type and is left alone.
        assert_eq!(sections[0].shows[0].media_type, Some(MediaType::Tv));
    }

    #[tokio::test]
    async fn test_get_shows_memoizes_batch_and_listings() {
        // Arrange
        let api = MockTmdbApi::default();
        let session = CatalogSession::new(&api);
        let requests = home_requests();

        // Act
        let first = session.get_shows(&requests).await.unwrap();
        let second = session.get_shows(&requests).await.unwrap();
        session.execute_request(&requests[0].req).await.unwrap();

        // Assert
        assert_eq!(first, second);
        assert_eq!(api.listing_calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_get_shows_missing_genre_degrades_section() {
        // Arrange
        let api = MockTmdbApi::default();
        let session = CatalogSession::new(&api);
        let requests = vec![ShowRequest::new(
            "Genre",
            TmdbRequest::new(RequestType::Genre, MediaType::Movie),
        )];

        // Act
        let sections = session.get_shows(&requests).await.unwrap();

        // Assert
        assert!(sections[0].shows.is_empty());
    }

    #[tokio::test]
    async fn test_search_movies_sorts_by_popularity_desc() {
        // Arrange
        let api = MockTmdbApi {
            search: fixture_results(include_str!(
                "../../../../fixtures/tmdb/search_multi_batman.json"
            )),
            ..MockTmdbApi::default()
        };
        let session = CatalogSession::new(&api);

        // Act
        let response = session.search_movies("batman", None).await.unwrap();

        // Assert
        let results = &response.results;
        assert_eq!(results.len(), 4);
        assert!(
            results
                .windows(2)
                .all(|pair| pair[0].popularity >= pair[1].popularity)
        );
        assert_eq!(results[0].id, 414_906);
        // Equal popularity keeps provider order.
        assert_eq!(results[2].id, 268);
        assert_eq!(results[3].id, 3_894);
    }

    #[tokio::test]
    async fn test_search_movies_memoized_per_query_and_page() {
        // Arrange
        let api = MockTmdbApi::default();
        let session = CatalogSession::new(&api);

        // Act
        session.search_movies("batman", None).await.unwrap();
        session.search_movies("batman", Some(1)).await.unwrap();
        session.search_movies("batman", Some(2)).await.unwrap();
        session.search_movies("", None).await.unwrap();

        // Assert
        assert_eq!(api.search_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_find_current_movie_matches_movie_slug() {
        // Arrange
        let mut api = MockTmdbApi::default();
        api.movies.insert(603, movie(603, "The Matrix"));
        api.tv_series.insert(603, series(603, "Some Other Series"));
        let session = CatalogSession::new(&api);

        // Act
        let show = session
            .find_current_movie(603, "/watch/movie/603-the-matrix")
            .await
            .unwrap();

        // Assert
        assert_eq!(show.title.as_deref(), Some("The Matrix"));
        assert_eq!(show.media_type, Some(MediaType::Movie));
    }

    #[tokio::test]
    async fn test_find_current_movie_prefers_movie_on_double_match() {
        // Arrange
        let mut api = MockTmdbApi::default();
        api.movies.insert(603, movie(603, "The Matrix"));
        api.tv_series.insert(603, series(603, "The Matrix"));
        let session = CatalogSession::new(&api);

        // Act
        let show = session
            .find_current_movie(603, "/watch/movie/603-the-matrix")
            .await
            .unwrap();

        // Assert
        assert_eq!(show.media_type, Some(MediaType::Movie));
    }

    #[tokio::test]
    async fn test_find_current_movie_falls_back_to_tv() {
        // Arrange
        let mut api = MockTmdbApi::default();
        api.tv_series.insert(1_399, series(1_399, "Game of Thrones"));
        let session = CatalogSession::new(&api);

        // Act
        let show = session
            .find_current_movie(1_399, "/watch/tv/1399-game-of-thrones")
            .await
            .unwrap();

        // Assert
        assert_eq!(show.media_type, Some(MediaType::Tv));
        assert_eq!(api.movie_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_find_current_movie_not_found() {
        // Arrange
        let mut api = MockTmdbApi::default();
        api.movies.insert(603, movie(603, "The Matrix"));
        let session = CatalogSession::new(&api);

        // Act
        let err = session
            .find_current_movie(603, "/watch/movie/604-other")
            .await
            .unwrap_err();

        // Assert
        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::NotFound { id: 603, .. })
        ));
    }

    #[tokio::test]
    async fn test_find_current_movie_when_both_lookups_fail() {
        // Arrange
        let api = MockTmdbApi::default();
        let session = CatalogSession::new(&api);

        // Act
        let err = session
            .find_current_movie(42, "/watch/movie/42-missing")
            .await
            .unwrap_err();

        // Assert
        assert!(err.to_string().starts_with("not found"));
        assert_eq!(api.movie_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.tv_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_single_lookups_are_memoized() {
        // Arrange
        let mut api = MockTmdbApi::default();
        api.movies.insert(603, movie(603, "The Matrix"));
        api.tv_series.insert(1_399, series(1_399, "Game of Thrones"));
        let session = CatalogSession::new(&api);

        // Act
        let (a, b) = tokio::join!(session.find_movie(603), session.find_movie(603));
        session.find_tv_series(1_399).await.unwrap();
        session.find_tv_series(1_399).await.unwrap();
        session.find_by_id_and_type(603, MediaType::Movie).await.unwrap();
        session.find_by_id_and_type(603, MediaType::Movie).await.unwrap();
        session.keywords(603, MediaType::Movie).await.unwrap();
        session.keywords(603, MediaType::Movie).await.unwrap();
        session.keywords(603, MediaType::Tv).await.unwrap();

        // Assert
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(api.movie_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.tv_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.detail_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.keyword_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_lookup_is_retried_next_call() {
        // Arrange
        let api = MockTmdbApi::default();
        let session = CatalogSession::new(&api);

        // Act
        let first = session.find_movie(1).await;
        let second = session.find_movie(1).await;

        // Assert
        assert!(first.is_err());
        assert!(second.is_err());
        assert_eq!(api.movie_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_memo() {
        // Arrange
        let mut api = MockTmdbApi::default();
        api.movies.insert(603, movie(603, "The Matrix"));

        // Act
        CatalogSession::new(&api).find_movie(603).await.unwrap();
        CatalogSession::new(&api).find_movie(603).await.unwrap();

        // Assert
        assert_eq!(api.movie_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_season_is_not_memoized() {
        // Arrange
        let api = MockTmdbApi::default();
        let session = CatalogSession::new(&api);

        // Act
        let season = session.season(1_399, 2).await.unwrap();
        session.season(1_399, 2).await.unwrap();

        // Assert
        assert_eq!(season.season_number, 2);
        assert_eq!(api.season_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_random_show_tags_media_type_and_skips_zero_ids() {
        // Arrange
        let mut api = MockTmdbApi::default();
        api.listings
            .insert(RequestType::Popular, vec![movie(0, "Broken"), movie(5, "E")]);
        api.listings
            .insert(RequestType::AnimeTrending, vec![series(37_854, "One Piece")]);
        let session = CatalogSession::new(&api);

        // Act
        let mut seen = 0;
        let last = session
            .random_show(|len| {
                seen = len;
                len.saturating_sub(1)
            })
            .await
            .unwrap()
            .unwrap();

        // Assert: popular movie + popular tv share the mock list, anime adds one
        assert_eq!(seen, 3);
        assert_eq!(last.id, 37_854);
        assert_eq!(last.media_type, Some(MediaType::Anime));
    }

    #[tokio::test]
    async fn test_random_show_empty_pool() {
        // Arrange
        let api = MockTmdbApi::default();
        let session = CatalogSession::new(&api);

        // Act
        let show = session.random_show(|_| 0).await.unwrap();

        // Assert
        assert!(show.is_none());
    }

    #[tokio::test]
    async fn test_random_show_fails_when_a_listing_fails() {
        // Arrange
        let mut api = MockTmdbApi::default();
        api.failing.insert(RequestType::AnimeTrending);
        let session = CatalogSession::new(&api);

        // Act
        let result = session.random_show(|_| 0).await;

        // Assert
        assert!(result.is_err());
    }
}
