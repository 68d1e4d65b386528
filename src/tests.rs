//! Aggregation and sync tests over stub clients; no network involved.

mod support {
    use crate::client::trakt::api_types::{TokenResponse, UserProfile, UserSettings};
    use crate::client::{
        ArtworkClient, CatalogClient, CommentTarget, Outcome, PageRequest, RatingsClient,
        TrackingClient,
    };
    use crate::types::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn out<T: Clone>(value: &Outcome<T>) -> Outcome<T> {
        value.clone()
    }

    pub struct StubTracking {
        pub calls: AtomicUsize,
        pub probe_calls: AtomicUsize,
        pub full_calls: AtomicUsize,
        pub likes_page_calls: AtomicUsize,
        pub likes_full_calls: AtomicUsize,
        pub show: Outcome<ShowSummary>,
        pub movie: Outcome<MovieSummary>,
        pub season: Outcome<SeasonSummary>,
        pub episode: Outcome<EpisodeSummary>,
        pub episode_show: Outcome<ShowSummary>,
        pub show_rating: Outcome<f64>,
        pub episode_rating: Outcome<f64>,
        pub movie_rating: Outcome<f64>,
        pub comments: Outcome<CommentThread>,
        pub profiles: HashMap<String, UserProfile>,
        pub progress: Outcome<WatchedProgress>,
        pub watched: Outcome<Vec<WatchedMovie>>,
        pub person_ids: HashMap<u64, MediaIds>,
        pub tmdb_ids: HashMap<u64, MediaIds>,
        pub ratings_probe: Outcome<RatingSet>,
        pub ratings_full: Outcome<RatingSet>,
        pub likes_page: Outcome<Vec<LikedComment>>,
        pub likes_full: Outcome<Vec<LikedComment>>,
    }

    impl Default for StubTracking {
        fn default() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                probe_calls: AtomicUsize::new(0),
                full_calls: AtomicUsize::new(0),
                likes_page_calls: AtomicUsize::new(0),
                likes_full_calls: AtomicUsize::new(0),
                show: Outcome::Failed,
                movie: Outcome::Failed,
                season: Outcome::Failed,
                episode: Outcome::Failed,
                episode_show: Outcome::Failed,
                show_rating: Outcome::Failed,
                episode_rating: Outcome::Failed,
                movie_rating: Outcome::Failed,
                comments: Outcome::Failed,
                profiles: HashMap::new(),
                progress: Outcome::Failed,
                watched: Outcome::Failed,
                person_ids: HashMap::new(),
                tmdb_ids: HashMap::new(),
                ratings_probe: Outcome::Failed,
                ratings_full: Outcome::Failed,
                likes_page: Outcome::Failed,
                likes_full: Outcome::Failed,
            }
        }
    }

    impl StubTracking {
        pub fn total_calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn count(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl TrackingClient for StubTracking {
        async fn exchange_code(&self, _code: &str) -> Outcome<TokenResponse> {
            self.count();
            Outcome::Failed
        }

        async fn refresh_session(&self, _refresh_token: &str) -> Outcome<TokenResponse> {
            self.count();
            Outcome::Failed
        }

        async fn user_settings(&self) -> Outcome<UserSettings> {
            self.count();
            Outcome::Failed
        }

        async fn show_summary(&self, _id: &str) -> Outcome<ShowSummary> {
            self.count();
            out(&self.show)
        }

        async fn movie_summary(&self, _id: &str) -> Outcome<MovieSummary> {
            self.count();
            out(&self.movie)
        }

        async fn season_summary(&self, _slug: &str, _season: u32) -> Outcome<SeasonSummary> {
            self.count();
            out(&self.season)
        }

        async fn episode_summary(
            &self,
            _show_id: &str,
            _season: u32,
            _number: u32,
        ) -> Outcome<EpisodeSummary> {
            self.count();
            out(&self.episode)
        }

        async fn show_rating(&self, _trakt_id: u64) -> Outcome<f64> {
            self.count();
            out(&self.show_rating)
        }

        async fn episode_rating(&self, _trakt_id: u64, _season: u32, _number: u32) -> Outcome<f64> {
            self.count();
            out(&self.episode_rating)
        }

        async fn movie_rating(&self, _trakt_id: u64) -> Outcome<f64> {
            self.count();
            out(&self.movie_rating)
        }

        async fn comments(&self, _target: &CommentTarget) -> Outcome<CommentThread> {
            self.count();
            out(&self.comments)
        }

        async fn user_profile(&self, user_slug: &str) -> Outcome<UserProfile> {
            self.count();
            match self.profiles.get(user_slug) {
                Some(profile) => Outcome::Found(profile.clone()),
                None => Outcome::Failed,
            }
        }

        async fn watched_progress(&self, _trakt_id: u64) -> Outcome<WatchedProgress> {
            self.count();
            out(&self.progress)
        }

        async fn watched_movies(&self) -> Outcome<Vec<WatchedMovie>> {
            self.count();
            out(&self.watched)
        }

        async fn id_lookup_tmdb(
            &self,
            tmdb_id: u64,
            _kind: Option<MediaKind>,
        ) -> Outcome<MediaIds> {
            self.count();
            match self.tmdb_ids.get(&tmdb_id) {
                Some(ids) => Outcome::Found(ids.clone()),
                None => Outcome::Failed,
            }
        }

        async fn id_lookup_person(&self, tmdb_person_id: u64) -> Outcome<MediaIds> {
            self.count();
            match self.person_ids.get(&tmdb_person_id) {
                Some(ids) => Outcome::Found(ids.clone()),
                None => Outcome::Failed,
            }
        }

        async fn show_for_episode(&self, _episode_trakt_id: u64) -> Outcome<ShowSummary> {
            self.count();
            out(&self.episode_show)
        }

        async fn my_ratings(
            &self,
            _user: &str,
            _kind: MediaKind,
            page: Option<PageRequest>,
        ) -> Outcome<RatingSet> {
            self.count();
            if page.is_some() {
                self.probe_calls.fetch_add(1, Ordering::SeqCst);
                out(&self.ratings_probe)
            } else {
                self.full_calls.fetch_add(1, Ordering::SeqCst);
                out(&self.ratings_full)
            }
        }

        async fn my_likes(&self, _user: &str, page: Option<u32>) -> Outcome<Vec<LikedComment>> {
            self.count();
            if page.is_some() {
                self.likes_page_calls.fetch_add(1, Ordering::SeqCst);
                out(&self.likes_page)
            } else {
                self.likes_full_calls.fetch_add(1, Ordering::SeqCst);
                out(&self.likes_full)
            }
        }

        async fn trending(
            &self,
            _kind: MediaKind,
            _page: PageRequest,
        ) -> Outcome<Paginated<ListedMedia>> {
            self.count();
            Outcome::Failed
        }

        async fn anticipated(
            &self,
            _kind: MediaKind,
            _page: PageRequest,
        ) -> Outcome<Paginated<ListedMedia>> {
            self.count();
            Outcome::Failed
        }

        async fn community_recommended(
            &self,
            _kind: MediaKind,
            _page: PageRequest,
        ) -> Outcome<Paginated<ListedMedia>> {
            self.count();
            Outcome::Failed
        }

        async fn my_recommendations(
            &self,
            _user: &str,
            _kind: MediaKind,
            _page: PageRequest,
        ) -> Outcome<Paginated<ListedMedia>> {
            self.count();
            Outcome::Failed
        }

        async fn watch_history(
            &self,
            _user: &str,
            _kind: MediaKind,
            _page: PageRequest,
        ) -> Outcome<Paginated<ListedMedia>> {
            self.count();
            Outcome::Failed
        }

        async fn search(&self, _query: &str) -> Outcome<Vec<ListedMedia>> {
            self.count();
            Outcome::Failed
        }

        async fn rate(&self, _kind: MediaKind, _ids: &MediaIds, _rating: u8) -> bool {
            self.count();
            false
        }

        async fn like_comment(&self, _comment_id: u64, _unlike: bool) -> bool {
            self.count();
            false
        }
    }

    pub struct StubCatalog {
        pub calls: AtomicUsize,
        pub show_backdrop: Outcome<Backdrop>,
        pub movie_backdrop: Outcome<Backdrop>,
        pub still: Outcome<Backdrop>,
        pub show_poster: Outcome<String>,
        pub season_poster: Outcome<String>,
        pub movie_poster: Outcome<String>,
        pub show_extras: Outcome<ShowExtras>,
        pub season_extras: Outcome<SeasonExtras>,
        pub episode_extras: Outcome<EpisodeExtras>,
        pub movie_extras: Outcome<MovieExtras>,
        pub cast: Outcome<Vec<CastMember>>,
        pub collection: Outcome<MovieCollection>,
        pub search_hits: Outcome<Vec<SearchHit>>,
    }

    impl Default for StubCatalog {
        fn default() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                show_backdrop: Outcome::Failed,
                movie_backdrop: Outcome::Failed,
                still: Outcome::Failed,
                show_poster: Outcome::Failed,
                season_poster: Outcome::Failed,
                movie_poster: Outcome::Failed,
                show_extras: Outcome::Failed,
                season_extras: Outcome::Failed,
                episode_extras: Outcome::Failed,
                movie_extras: Outcome::Failed,
                cast: Outcome::Failed,
                collection: Outcome::Failed,
                search_hits: Outcome::Failed,
            }
        }
    }

    impl StubCatalog {
        pub fn total_calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn count(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl CatalogClient for StubCatalog {
        async fn show_backdrop(&self, _tmdb_id: u64) -> Outcome<Backdrop> {
            self.count();
            out(&self.show_backdrop)
        }

        async fn movie_backdrop(&self, _tmdb_id: u64) -> Outcome<Backdrop> {
            self.count();
            out(&self.movie_backdrop)
        }

        async fn episode_still(
            &self,
            _tmdb_id: u64,
            _season: u32,
            _number: u32,
        ) -> Outcome<Backdrop> {
            self.count();
            out(&self.still)
        }

        async fn show_poster(&self, _tmdb_id: u64) -> Outcome<String> {
            self.count();
            out(&self.show_poster)
        }

        async fn season_poster(&self, _tmdb_id: u64, _season: u32) -> Outcome<String> {
            self.count();
            out(&self.season_poster)
        }

        async fn movie_poster(&self, _tmdb_id: u64) -> Outcome<String> {
            self.count();
            out(&self.movie_poster)
        }

        async fn show_extras(&self, _tmdb_id: u64) -> Outcome<ShowExtras> {
            self.count();
            out(&self.show_extras)
        }

        async fn season_extras(&self, _tmdb_id: u64, _season: u32) -> Outcome<SeasonExtras> {
            self.count();
            out(&self.season_extras)
        }

        async fn episode_extras(
            &self,
            _tmdb_id: u64,
            _season: u32,
            _number: u32,
        ) -> Outcome<EpisodeExtras> {
            self.count();
            out(&self.episode_extras)
        }

        async fn movie_extras(&self, _tmdb_id: u64) -> Outcome<MovieExtras> {
            self.count();
            out(&self.movie_extras)
        }

        async fn show_cast(&self, _tmdb_id: u64) -> Outcome<Vec<CastMember>> {
            self.count();
            out(&self.cast)
        }

        async fn episode_cast(
            &self,
            _tmdb_id: u64,
            _season: u32,
            _number: u32,
        ) -> Outcome<Vec<CastMember>> {
            self.count();
            out(&self.cast)
        }

        async fn movie_cast(&self, _tmdb_id: u64) -> Outcome<Vec<CastMember>> {
            self.count();
            out(&self.cast)
        }

        async fn movie_collection(&self, _collection_id: u64) -> Outcome<MovieCollection> {
            self.count();
            out(&self.collection)
        }

        async fn multi_search(&self, _query: &str, _page: u32) -> Outcome<Vec<SearchHit>> {
            self.count();
            out(&self.search_hits)
        }
    }

    pub struct StubArtwork {
        pub calls: AtomicUsize,
        pub show_logo: Outcome<String>,
        pub movie_logo: Outcome<String>,
        pub show_thumb: Outcome<String>,
        pub movie_thumb: Outcome<String>,
    }

    impl Default for StubArtwork {
        fn default() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                show_logo: Outcome::Failed,
                movie_logo: Outcome::Failed,
                show_thumb: Outcome::Failed,
                movie_thumb: Outcome::Failed,
            }
        }
    }

    impl StubArtwork {
        pub fn total_calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn count(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ArtworkClient for StubArtwork {
        async fn show_logo(&self, _tvdb_id: u64) -> Outcome<String> {
            self.count();
            out(&self.show_logo)
        }

        async fn movie_logo(&self, _tmdb_id: u64) -> Outcome<String> {
            self.count();
            out(&self.movie_logo)
        }

        async fn show_thumb(&self, _tvdb_id: u64) -> Outcome<String> {
            self.count();
            out(&self.show_thumb)
        }

        async fn movie_thumb(&self, _tmdb_id: u64) -> Outcome<String> {
            self.count();
            out(&self.movie_thumb)
        }
    }

    pub struct StubRatings {
        pub calls: AtomicUsize,
        pub rating: Outcome<String>,
    }

    impl Default for StubRatings {
        fn default() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                rating: Outcome::Failed,
            }
        }
    }

    impl StubRatings {
        pub fn total_calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RatingsClient for StubRatings {
        async fn imdb_rating(&self, _imdb_id: &str) -> Outcome<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            out(&self.rating)
        }
    }

    // Fixtures

    pub fn full_ids(trakt: u64, slug: &str) -> MediaIds {
        MediaIds {
            trakt: Some(trakt),
            slug: Some(slug.to_string()),
            tvdb: Some(trakt + 1000),
            imdb: Some(format!("tt{trakt:07}")),
            tmdb: Some(trakt + 2000),
        }
    }

    pub fn show_summary(trakt: u64, slug: &str) -> ShowSummary {
        ShowSummary {
            title: slug.to_string(),
            year: Some(2008),
            ids: full_ids(trakt, slug),
            ..Default::default()
        }
    }

    pub fn movie_summary(trakt: u64, slug: &str) -> MovieSummary {
        MovieSummary {
            title: slug.to_string(),
            year: Some(2021),
            ids: full_ids(trakt, slug),
            ..Default::default()
        }
    }

    pub fn episode_summary(trakt: u64, season: u32, number: u32) -> EpisodeSummary {
        EpisodeSummary {
            season,
            number,
            title: Some(format!("Episode {number}")),
            ids: MediaIds {
                trakt: Some(trakt),
                imdb: Some(format!("tt{trakt:07}")),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn profile(username: &str) -> UserProfile {
        UserProfile {
            username: username.to_string(),
            ..Default::default()
        }
    }

    pub struct Stack {
        pub aggregator: crate::Aggregator,
        pub tracking: Arc<StubTracking>,
        pub catalog: Arc<StubCatalog>,
        pub artwork: Arc<StubArtwork>,
        pub ratings: Arc<StubRatings>,
        pub store: crate::UserStore,
    }

    pub fn stack(
        tracking: StubTracking,
        catalog: StubCatalog,
        artwork: StubArtwork,
        ratings: StubRatings,
    ) -> Stack {
        let tracking = Arc::new(tracking);
        let catalog = Arc::new(catalog);
        let artwork = Arc::new(artwork);
        let ratings = Arc::new(ratings);
        let store = crate::UserStore::new(Arc::new(crate::MemoryStore::new()));
        let aggregator = crate::Aggregator::new(
            tracking.clone(),
            catalog.clone(),
            artwork.clone(),
            ratings.clone(),
            crate::AggregateCache::new(),
            store.clone(),
        );
        Stack {
            aggregator,
            tracking,
            catalog,
            artwork,
            ratings,
            store,
        }
    }
}

mod aggregator_tests {
    use super::support::*;
    use crate::client::Outcome;
    use crate::types::*;

    #[tokio::test]
    async fn test_missing_identifier_makes_no_calls() {
        let s = stack(
            StubTracking::default(),
            StubCatalog::default(),
            StubArtwork::default(),
            StubRatings::default(),
        );
        let show = ShowSummary {
            title: "no slug".to_string(),
            ..Default::default()
        };

        assert!(s.aggregator.get_show_card(&show).await.is_none());
        assert_eq!(s.tracking.total_calls(), 0);
        assert_eq!(s.catalog.total_calls(), 0);
        assert_eq!(s.artwork.total_calls(), 0);
        assert_eq!(s.ratings.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_total_failure_yields_placeholder_card() {
        let s = stack(
            StubTracking::default(),
            StubCatalog::default(),
            StubArtwork::default(),
            StubRatings::default(),
        );
        let show = show_summary(1388, "breaking-bad");

        let card = s.aggregator.get_show_card(&show).await.unwrap();
        assert_eq!(card.backdrop.small, FALLBACK_IMAGE);
        assert_eq!(card.backdrop.large, FALLBACK_IMAGE);
        assert_eq!(card.imdb_rating, None);
        assert_eq!(card.trakt_rating, None);
        assert_eq!(card.tmdb_rating, None);
        assert_eq!(card.my_rating, None);
        assert_eq!(card.clear_logo, None);
        assert!(card.genres.is_empty());
    }

    #[tokio::test]
    async fn test_movie_backdrop_falls_back_to_fanart_thumb() {
        let mut catalog = StubCatalog::default();
        catalog.movie_backdrop = Outcome::Missing;
        let mut artwork = StubArtwork::default();
        artwork.movie_thumb = Outcome::Found("https://art.example/thumb.jpg".to_string());

        let s = stack(
            StubTracking::default(),
            catalog,
            artwork,
            StubRatings::default(),
        );
        let movie = movie_summary(10, "dune-2021");

        let card = s.aggregator.get_movie_card(&movie).await.unwrap();
        assert_eq!(card.backdrop.small, "https://art.example/thumb.jpg");
        assert_eq!(card.backdrop.large, "https://art.example/thumb.jpg");
    }

    #[tokio::test]
    async fn test_ratings_formatted_to_one_decimal() {
        let mut tracking = StubTracking::default();
        tracking.show = Outcome::Found(show_summary(1388, "breaking-bad"));
        tracking.show_rating = Outcome::Found(9.24561);
        let mut catalog = StubCatalog::default();
        catalog.show_extras = Outcome::Found(ShowExtras {
            tmdb_rating: Some(8.0),
            ..Default::default()
        });

        let s = stack(
            tracking,
            catalog,
            StubArtwork::default(),
            StubRatings::default(),
        );
        let card = s
            .aggregator
            .get_show_card(&show_summary(1388, "breaking-bad"))
            .await
            .unwrap();

        assert_eq!(card.trakt_rating.as_deref(), Some("9.2"));
        assert_eq!(card.tmdb_rating.as_deref(), Some("8.0"));
    }

    #[tokio::test]
    async fn test_details_cached_and_second_call_is_free() {
        let mut tracking = StubTracking::default();
        tracking.show = Outcome::Found(show_summary(1388, "breaking-bad"));

        let s = stack(
            tracking,
            StubCatalog::default(),
            StubArtwork::default(),
            StubRatings::default(),
        );

        let first = s.aggregator.get_show_details("breaking-bad").await.unwrap();
        let calls_after_first = (
            s.tracking.total_calls(),
            s.catalog.total_calls(),
            s.artwork.total_calls(),
            s.ratings.total_calls(),
        );

        let second = s.aggregator.get_show_details("breaking-bad").await.unwrap();
        let calls_after_second = (
            s.tracking.total_calls(),
            s.catalog.total_calls(),
            s.artwork.total_calls(),
            s.ratings.total_calls(),
        );

        assert_eq!(first, second);
        assert_eq!(calls_after_first, calls_after_second);
    }

    #[tokio::test]
    async fn test_my_rating_merged_from_store_without_network() {
        let mut tracking = StubTracking::default();
        tracking.show = Outcome::Found(show_summary(1388, "breaking-bad"));

        let s = stack(
            tracking,
            StubCatalog::default(),
            StubArtwork::default(),
            StubRatings::default(),
        );
        s.store.set_profile(&profile("tester"));
        s.store.set_ratings(
            MediaKind::Show,
            &RatingSet {
                last_modified: None,
                total: 1,
                entries: vec![RatedEntry {
                    rating: 8,
                    show: Some(show_summary(1388, "breaking-bad")),
                    ..Default::default()
                }],
            },
        );

        let card = s
            .aggregator
            .get_show_card(&show_summary(1388, "breaking-bad"))
            .await
            .unwrap();

        assert_eq!(card.my_rating, Some(8));
        // The rating came from the store, not from a ratings fetch.
        assert_eq!(s.tracking.probe_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert_eq!(s.tracking.full_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_comment_avatars_fall_back_per_comment() {
        let mut tracking = StubTracking::default();
        tracking.show = Outcome::Found(show_summary(1388, "breaking-bad"));
        tracking.comments = Outcome::Found(CommentThread {
            total: 2,
            comments: vec![
                Comment {
                    id: 1,
                    author: "alice".to_string(),
                    author_slug: Some("alice".to_string()),
                    comment: "great".to_string(),
                    spoiler: false,
                    review: false,
                    likes: 3,
                    replies: 0,
                    user_rating: None,
                    created_at: None,
                    avatar: None,
                },
                Comment {
                    id: 2,
                    author: "bob".to_string(),
                    author_slug: Some("bob".to_string()),
                    comment: "meh".to_string(),
                    spoiler: false,
                    review: false,
                    likes: 0,
                    replies: 0,
                    user_rating: None,
                    created_at: None,
                    avatar: None,
                },
            ],
        });
        let mut alice = profile("alice");
        alice.images = Some(crate::client::trakt::api_types::UserImages {
            avatar: crate::client::trakt::api_types::AvatarImage {
                full: "https://avatars.example/alice.png".to_string(),
            },
        });
        tracking.profiles.insert("alice".to_string(), alice);
        // No profile for bob: that lookup fails.

        let s = stack(
            tracking,
            StubCatalog::default(),
            StubArtwork::default(),
            StubRatings::default(),
        );
        let details = s.aggregator.get_show_details("breaking-bad").await.unwrap();

        assert_eq!(details.reviews.comments.len(), 2);
        assert_eq!(
            details.reviews.comments[0].avatar.as_deref(),
            Some("https://avatars.example/alice.png")
        );
        // Bob's failed lookup degraded to the default avatar, not a missing
        // comment.
        assert!(details.reviews.comments[1]
            .avatar
            .as_deref()
            .unwrap()
            .ends_with("fry.png"));
    }

    #[tokio::test]
    async fn test_cast_lookup_failure_nulls_only_that_member() {
        let mut tracking = StubTracking::default();
        tracking.show = Outcome::Found(show_summary(1388, "breaking-bad"));
        tracking.person_ids.insert(
            7,
            MediaIds {
                slug: Some("bryan-cranston".to_string()),
                ..Default::default()
            },
        );
        let mut catalog = StubCatalog::default();
        catalog.cast = Outcome::Found(vec![
            CastMember {
                tmdb_id: 7,
                name: "Bryan Cranston".to_string(),
                character: Some("Walter White".to_string()),
                profile: None,
                order: Some(0),
                ids: None,
            },
            CastMember {
                tmdb_id: 8,
                name: "Aaron Paul".to_string(),
                character: Some("Jesse Pinkman".to_string()),
                profile: None,
                order: Some(1),
                ids: None,
            },
        ]);

        let s = stack(tracking, catalog, StubArtwork::default(), StubRatings::default());
        let details = s.aggregator.get_show_details("breaking-bad").await.unwrap();

        assert_eq!(details.actors.len(), 2);
        assert!(details.actors[0].ids.is_some());
        assert!(details.actors[1].ids.is_none());
    }

    #[tokio::test]
    async fn test_episode_details_watched_marker() {
        let mut tracking = StubTracking::default();
        tracking.episode = Outcome::Found(episode_summary(99, 2, 5));
        tracking.episode_show = Outcome::Found(show_summary(1388, "breaking-bad"));
        tracking.progress = Outcome::Found(WatchedProgress {
            aired: 13,
            completed: 5,
            last_watched_at: None,
            seasons: vec![SeasonProgress {
                number: 2,
                aired: 13,
                completed: 5,
                episodes: vec![EpisodeProgress {
                    number: 5,
                    completed: true,
                    last_watched_at: Some("2024-05-01T20:00:00Z".to_string()),
                }],
            }],
        });

        let s = stack(
            tracking,
            StubCatalog::default(),
            StubArtwork::default(),
            StubRatings::default(),
        );
        let details = s
            .aggregator
            .get_episode_details("breaking-bad", 2, 5)
            .await
            .unwrap();

        assert_eq!(
            details.watched.unwrap().last_watched_at.as_deref(),
            Some("2024-05-01T20:00:00Z")
        );
        // Fresh progress was persisted for the show.
        assert_eq!(s.store.watched_show("breaking-bad").unwrap().completed, 5);
    }

    #[tokio::test]
    async fn test_collection_parts_sorted_and_resolved() {
        let mut tracking = StubTracking::default();
        tracking.tmdb_ids.insert(
            101,
            MediaIds {
                slug: Some("part-one".to_string()),
                ..Default::default()
            },
        );
        // No mapping for 102: its slug stays empty.
        let mut catalog = StubCatalog::default();
        catalog.collection = Outcome::Found(MovieCollection {
            id: 5,
            name: "Duology".to_string(),
            overview: None,
            poster: None,
            parts: vec![
                CollectionPart {
                    tmdb_id: 102,
                    title: "Part Two".to_string(),
                    release_date: "2024-03-01".to_string(),
                    poster: None,
                    slug: None,
                    watched: None,
                },
                CollectionPart {
                    tmdb_id: 101,
                    title: "Part One".to_string(),
                    release_date: "2021-10-22".to_string(),
                    poster: None,
                    slug: None,
                    watched: None,
                },
            ],
        });

        let s = stack(tracking, catalog, StubArtwork::default(), StubRatings::default());
        let collection = s.aggregator.get_movie_collection(5).await.unwrap();

        let titles: Vec<&str> = collection.parts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Part One", "Part Two"]);
        assert_eq!(collection.parts[0].slug.as_deref(), Some("part-one"));
        assert_eq!(collection.parts[1].slug, None);
    }
}

mod sync_tests {
    use super::support::*;
    use crate::client::Outcome;
    use crate::sync::{RatingSync, SyncOutcome};
    use crate::types::*;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn rating_set(marker: &str, ratings: &[(u64, u8)]) -> RatingSet {
        RatingSet {
            last_modified: Some(marker.to_string()),
            total: ratings.len() as u64,
            entries: ratings
                .iter()
                .map(|(trakt, rating)| RatedEntry {
                    rating: *rating,
                    show: Some(show_summary(*trakt, &format!("show-{trakt}"))),
                    ..Default::default()
                })
                .collect(),
        }
    }

    fn sync_over(tracking: StubTracking) -> (RatingSync, Arc<StubTracking>, crate::UserStore) {
        let tracking = Arc::new(tracking);
        let store = crate::UserStore::new(Arc::new(crate::MemoryStore::new()));
        store.set_profile(&profile("tester"));
        let sync = RatingSync::new(tracking.clone(), store.clone());
        (sync, tracking, store)
    }

    #[tokio::test]
    async fn test_marker_change_replaces_durable_copy() {
        let mut tracking = StubTracking::default();
        let mut probe = rating_set("B", &[(1, 9)]);
        probe.total = 2;
        tracking.ratings_probe = Outcome::Found(probe);
        tracking.ratings_full = Outcome::Found(rating_set("B", &[(1, 9), (2, 7)]));

        let (sync, tracking, store) = sync_over(tracking);
        store.set_ratings(MediaKind::Show, &rating_set("A", &[(1, 9), (3, 5)]));

        let outcome = sync.sync_ratings(MediaKind::Show).await;

        assert_eq!(outcome, SyncOutcome::Refreshed);
        let stored = store.ratings(MediaKind::Show).unwrap();
        assert_eq!(stored.last_modified.as_deref(), Some("B"));
        // Full replace: the entry that disappeared upstream is gone.
        assert_eq!(stored.find(MediaKind::Show, 3), None);
        assert_eq!(stored.find(MediaKind::Show, 2), Some(7));
        assert_eq!(tracking.full_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_matching_marker_skips_full_fetch() {
        let mut tracking = StubTracking::default();
        let mut probe = rating_set("A", &[(1, 9)]);
        probe.total = 2;
        tracking.ratings_probe = Outcome::Found(probe);

        let (sync, tracking, store) = sync_over(tracking);
        store.set_ratings(MediaKind::Show, &rating_set("A", &[(1, 9), (2, 7)]));

        let outcome = sync.sync_ratings(MediaKind::Show).await;

        assert_eq!(outcome, SyncOutcome::UpToDate);
        assert_eq!(tracking.full_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_grown_total_triggers_full_fetch() {
        let mut tracking = StubTracking::default();
        let mut probe = rating_set("A", &[(1, 9)]);
        probe.total = 3;
        tracking.ratings_probe = Outcome::Found(probe);
        tracking.ratings_full = Outcome::Found(rating_set("A", &[(1, 9), (2, 7), (4, 6)]));

        let (sync, _tracking, store) = sync_over(tracking);
        store.set_ratings(MediaKind::Show, &rating_set("A", &[(1, 9), (2, 7)]));

        assert_eq!(sync.sync_ratings(MediaKind::Show).await, SyncOutcome::Refreshed);
        assert_eq!(store.ratings(MediaKind::Show).unwrap().entries.len(), 3);
    }

    #[tokio::test]
    async fn test_probe_failure_keeps_stale_copy() {
        let tracking = StubTracking::default();
        let (sync, _tracking, store) = sync_over(tracking);
        let stored = rating_set("A", &[(1, 9)]);
        store.set_ratings(MediaKind::Show, &stored);

        assert_eq!(sync.sync_ratings(MediaKind::Show).await, SyncOutcome::Stale);
        assert_eq!(store.ratings(MediaKind::Show).unwrap(), stored);
    }

    #[tokio::test]
    async fn test_first_sync_stores_probe_then_full() {
        let mut tracking = StubTracking::default();
        let mut probe = rating_set("A", &[(1, 9)]);
        probe.total = 2;
        tracking.ratings_probe = Outcome::Found(probe);
        tracking.ratings_full = Outcome::Found(rating_set("A", &[(1, 9), (2, 7)]));

        let (sync, tracking, store) = sync_over(tracking);

        assert_eq!(sync.sync_ratings(MediaKind::Show).await, SyncOutcome::Refreshed);
        assert_eq!(store.ratings(MediaKind::Show).unwrap().entries.len(), 2);
        assert_eq!(tracking.probe_calls.load(Ordering::SeqCst), 1);
        assert_eq!(tracking.full_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_anonymous_sync_makes_no_calls() {
        let tracking = Arc::new(StubTracking::default());
        let store = crate::UserStore::new(Arc::new(crate::MemoryStore::new()));
        // No profile stored.
        let sync = RatingSync::new(tracking.clone(), store);

        assert_eq!(sync.sync_ratings(MediaKind::Show).await, SyncOutcome::Anonymous);
        assert_eq!(tracking.total_calls(), 0);
    }

    fn like(comment_id: u64) -> LikedComment {
        LikedComment {
            liked_at: None,
            comment: Comment {
                id: comment_id,
                author: String::new(),
                author_slug: None,
                comment: String::new(),
                spoiler: false,
                review: false,
                likes: 0,
                replies: 0,
                user_rating: None,
                created_at: None,
                avatar: None,
            },
        }
    }

    #[tokio::test]
    async fn test_likes_head_unchanged_is_up_to_date() {
        let mut tracking = StubTracking::default();
        tracking.likes_page = Outcome::Found(vec![like(1), like(2)]);

        let (sync, tracking, store) = sync_over(tracking);
        store.set_likes(&[like(1), like(2)]);

        assert_eq!(sync.sync_likes().await, SyncOutcome::UpToDate);
        assert_eq!(tracking.likes_full_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_likes_head_change_small_list_replaced_verbatim() {
        let mut tracking = StubTracking::default();
        tracking.likes_page = Outcome::Found(vec![like(3), like(1)]);

        let (sync, tracking, store) = sync_over(tracking);
        store.set_likes(&[like(1), like(2)]);

        assert_eq!(sync.sync_likes().await, SyncOutcome::Refreshed);
        let stored = store.likes().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].comment.id, 3);
        // Short list: no multi-page refetch.
        assert_eq!(tracking.likes_full_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_watched_movies_replaced() {
        let mut tracking = StubTracking::default();
        tracking.watched = Outcome::Found(vec![WatchedMovie {
            plays: 2,
            last_watched_at: None,
            movie: movie_summary(10, "dune-2021"),
        }]);

        let (sync, _tracking, store) = sync_over(tracking);
        assert_eq!(sync.refresh_watched_movies().await, SyncOutcome::Refreshed);
        assert_eq!(store.watched_movies().unwrap().len(), 1);
    }
}

mod client_tests {
    use crate::client::{PageRequest, TrackingClient, TraktClient};
    use crate::config::TrackingConfig;
    use crate::session::SessionHandle;
    use crate::types::MediaKind;

    // The real tracking client must short-circuit authenticated calls to
    // Unauthenticated without touching the network when no session exists.
    #[tokio::test]
    async fn test_authenticated_calls_short_circuit_without_session() {
        let client = TraktClient::new(&TrackingConfig::default(), SessionHandle::default());

        assert!(matches!(
            client.user_settings().await,
            crate::client::Outcome::Unauthenticated
        ));
        assert!(matches!(
            client.watched_movies().await,
            crate::client::Outcome::Unauthenticated
        ));
        assert!(matches!(
            client
                .my_ratings("tester", MediaKind::Show, Some(PageRequest::probe()))
                .await,
            crate::client::Outcome::Unauthenticated
        ));
        assert!(matches!(
            client.my_likes("tester", Some(1)).await,
            crate::client::Outcome::Unauthenticated
        ));
        assert!(!client.rate(MediaKind::Show, &Default::default(), 8).await);
        assert!(!client.like_comment(1, false).await);
    }
}
