use super::Outcome;
use crate::client::trakt::api_types::{TokenResponse, UserProfile, UserSettings};
use crate::types::{
    Backdrop, CastMember, CommentThread, EpisodeExtras, EpisodeSummary, ListedMedia, LikedComment,
    MediaIds, MediaKind, MovieCollection, MovieExtras, MovieSummary, Paginated, RatingSet,
    SearchHit, SeasonExtras, SeasonSummary, ShowExtras, ShowSummary, WatchedMovie, WatchedProgress,
};
use async_trait::async_trait;

/// Page selector for paginated upstream listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// The cheapest possible fetch: a 1-item page, used to read the
    /// collection's metadata (count, last-modified marker) only.
    pub fn probe() -> Self {
        Self { page: 1, limit: 1 }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
        }
    }
}

/// Addressing for a comment thread, one variant per URL shape.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentTarget {
    Show { trakt_id: u64 },
    Season { slug: String, season: u32 },
    Episode { slug: String, season: u32, number: u32 },
    Movie { trakt_id: u64 },
}

/// The tracking service: summaries, community ratings, comments, the user's
/// own collections, cross-reference lookups, discovery and actions.
///
/// Calls marked "authenticated" return [`Outcome::Unauthenticated`] without
/// a network round trip when no session is present.
#[async_trait]
pub trait TrackingClient: Send + Sync {
    // OAuth
    async fn exchange_code(&self, code: &str) -> Outcome<TokenResponse>;
    async fn refresh_session(&self, refresh_token: &str) -> Outcome<TokenResponse>;
    /// Authenticated; the signed-in user's settings and profile
    async fn user_settings(&self) -> Outcome<UserSettings>;

    // Summaries
    async fn show_summary(&self, id: &str) -> Outcome<ShowSummary>;
    async fn movie_summary(&self, id: &str) -> Outcome<MovieSummary>;
    async fn season_summary(&self, slug: &str, season: u32) -> Outcome<SeasonSummary>;
    async fn episode_summary(&self, show_id: &str, season: u32, number: u32)
        -> Outcome<EpisodeSummary>;

    // Community ratings
    async fn show_rating(&self, trakt_id: u64) -> Outcome<f64>;
    async fn episode_rating(&self, trakt_id: u64, season: u32, number: u32) -> Outcome<f64>;
    async fn movie_rating(&self, trakt_id: u64) -> Outcome<f64>;

    // Comments and users
    /// One page of most-liked comments; avatars are not resolved here
    async fn comments(&self, target: &CommentTarget) -> Outcome<CommentThread>;
    async fn user_profile(&self, user_slug: &str) -> Outcome<UserProfile>;

    // Watched state (authenticated)
    async fn watched_progress(&self, trakt_id: u64) -> Outcome<WatchedProgress>;
    async fn watched_movies(&self) -> Outcome<Vec<WatchedMovie>>;

    // Cross-reference lookups
    async fn id_lookup_tmdb(&self, tmdb_id: u64, kind: Option<MediaKind>) -> Outcome<MediaIds>;
    async fn id_lookup_person(&self, tmdb_person_id: u64) -> Outcome<MediaIds>;
    /// The show an episode belongs to, by the episode's tracking id
    async fn show_for_episode(&self, episode_trakt_id: u64) -> Outcome<ShowSummary>;

    // The user's own collections (authenticated)
    /// `page: None` fetches the full collection
    async fn my_ratings(
        &self,
        user: &str,
        kind: MediaKind,
        page: Option<PageRequest>,
    ) -> Outcome<RatingSet>;
    /// `page: None` fetches all pages
    async fn my_likes(&self, user: &str, page: Option<u32>) -> Outcome<Vec<LikedComment>>;

    // Discovery listings
    async fn trending(&self, kind: MediaKind, page: PageRequest) -> Outcome<Paginated<ListedMedia>>;
    async fn anticipated(
        &self,
        kind: MediaKind,
        page: PageRequest,
    ) -> Outcome<Paginated<ListedMedia>>;
    async fn community_recommended(
        &self,
        kind: MediaKind,
        page: PageRequest,
    ) -> Outcome<Paginated<ListedMedia>>;
    /// Authenticated; the user's personal recommendation ranking
    async fn my_recommendations(
        &self,
        user: &str,
        kind: MediaKind,
        page: PageRequest,
    ) -> Outcome<Paginated<ListedMedia>>;
    async fn watch_history(
        &self,
        user: &str,
        kind: MediaKind,
        page: PageRequest,
    ) -> Outcome<Paginated<ListedMedia>>;
    async fn search(&self, query: &str) -> Outcome<Vec<ListedMedia>>;

    // Actions (authenticated); `true` on upstream acceptance
    /// Rating `0` removes the rating
    async fn rate(&self, kind: MediaKind, ids: &MediaIds, rating: u8) -> bool;
    async fn like_comment(&self, comment_id: u64, unlike: bool) -> bool;
}

/// The movie/TV catalog service. All reshaping here is a pure function of
/// the catalog payload, independent of every other client.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn show_backdrop(&self, tmdb_id: u64) -> Outcome<Backdrop>;
    async fn movie_backdrop(&self, tmdb_id: u64) -> Outcome<Backdrop>;
    async fn episode_still(&self, tmdb_id: u64, season: u32, number: u32) -> Outcome<Backdrop>;
    async fn show_poster(&self, tmdb_id: u64) -> Outcome<String>;
    async fn season_poster(&self, tmdb_id: u64, season: u32) -> Outcome<String>;
    async fn movie_poster(&self, tmdb_id: u64) -> Outcome<String>;
    async fn show_extras(&self, tmdb_id: u64) -> Outcome<ShowExtras>;
    async fn season_extras(&self, tmdb_id: u64, season: u32) -> Outcome<SeasonExtras>;
    async fn episode_extras(&self, tmdb_id: u64, season: u32, number: u32)
        -> Outcome<EpisodeExtras>;
    async fn movie_extras(&self, tmdb_id: u64) -> Outcome<MovieExtras>;
    async fn show_cast(&self, tmdb_id: u64) -> Outcome<Vec<CastMember>>;
    async fn episode_cast(&self, tmdb_id: u64, season: u32, number: u32)
        -> Outcome<Vec<CastMember>>;
    async fn movie_cast(&self, tmdb_id: u64) -> Outcome<Vec<CastMember>>;
    async fn movie_collection(&self, collection_id: u64) -> Outcome<MovieCollection>;
    async fn multi_search(&self, query: &str, page: u32) -> Outcome<Vec<SearchHit>>;
}

/// The fan-art image service.
#[async_trait]
pub trait ArtworkClient: Send + Sync {
    /// English-preferred clear logo for a show, by TVDB id
    async fn show_logo(&self, tvdb_id: u64) -> Outcome<String>;
    /// English-preferred clear logo for a movie, by catalog id
    async fn movie_logo(&self, tmdb_id: u64) -> Outcome<String>;
    /// Background thumb for a show, the backdrop fallback
    async fn show_thumb(&self, tvdb_id: u64) -> Outcome<String>;
    /// Background thumb for a movie
    async fn movie_thumb(&self, tmdb_id: u64) -> Outcome<String>;
}

/// The legacy ratings-lookup service.
#[async_trait]
pub trait RatingsClient: Send + Sync {
    /// IMDb rating as a one-decimal string ("8.5")
    async fn imdb_rating(&self, imdb_id: &str) -> Outcome<String>;
}
