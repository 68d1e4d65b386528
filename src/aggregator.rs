use crate::cache::{AggregateCache, CacheKey};
use crate::client::{
    ArtworkClient, CatalogClient, CommentTarget, Outcome, RatingsClient, TrackingClient,
};
use crate::config::AggregatorSettings;
use crate::store::UserStore;
use crate::types::{
    Backdrop, CastMember, CommentThread, DetailRecord, EpisodeDetails, EpisodeSummary,
    EpisodeWatched, MediaCard, MediaKind, MovieCollection, MovieDetails, MovieSummary,
    SearchHit, SeasonDetails, ShowDetails, ShowSummary,
};
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

const DEFAULT_AVATAR: &str =
    "https://i2.wp.com/walter.trakt.tv/hotlink-ok/placeholders/medium/fry.png";
const DEFAULT_AVATAR_FEMALE: &str =
    "https://i2.wp.com/walter.trakt.tv/hotlink-ok/placeholders/medium/leela.png";

/// Skip the upstream call entirely when the id it needs is absent.
async fn maybe<T, F, Fut>(id: Option<u64>, call: F) -> Outcome<T>
where
    F: FnOnce(u64) -> Fut,
    Fut: Future<Output = Outcome<T>>,
{
    match id {
        Some(id) => call(id).await,
        None => Outcome::Missing,
    }
}

async fn maybe_ref<'a, T, F, Fut>(id: Option<&'a str>, call: F) -> Outcome<T>
where
    F: FnOnce(&'a str) -> Fut,
    Fut: Future<Output = Outcome<T>>,
{
    match id {
        Some(id) => call(id).await,
        None => Outcome::Missing,
    }
}

fn one_decimal(value: f64) -> String {
    format!("{value:.1}")
}

fn default_avatar(gender: Option<&str>) -> &'static str {
    if gender == Some("female") {
        DEFAULT_AVATAR_FEMALE
    } else {
        DEFAULT_AVATAR
    }
}

/// The combined-call layer: fans out to the service clients, merges partial
/// results with fallback rules, and writes through to the aggregate cache.
///
/// An aggregation never fails as a whole because one dependency failed; a
/// failed call leaves its output field empty and everything else intact.
pub struct Aggregator {
    tracking: Arc<dyn TrackingClient>,
    catalog: Arc<dyn CatalogClient>,
    artwork: Arc<dyn ArtworkClient>,
    ratings: Arc<dyn RatingsClient>,
    cache: AggregateCache,
    store: UserStore,
    settings: AggregatorSettings,
}

impl Aggregator {
    pub fn new(
        tracking: Arc<dyn TrackingClient>,
        catalog: Arc<dyn CatalogClient>,
        artwork: Arc<dyn ArtworkClient>,
        ratings: Arc<dyn RatingsClient>,
        cache: AggregateCache,
        store: UserStore,
    ) -> Self {
        Self::with_settings(
            tracking,
            catalog,
            artwork,
            ratings,
            cache,
            store,
            AggregatorSettings::default(),
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_settings(
        tracking: Arc<dyn TrackingClient>,
        catalog: Arc<dyn CatalogClient>,
        artwork: Arc<dyn ArtworkClient>,
        ratings: Arc<dyn RatingsClient>,
        cache: AggregateCache,
        store: UserStore,
        settings: AggregatorSettings,
    ) -> Self {
        Self {
            tracking,
            catalog,
            artwork,
            ratings,
            cache,
            store,
            settings,
        }
    }

    pub fn cache(&self) -> &AggregateCache {
        &self.cache
    }

    // Merge helpers

    fn fallback_backdrop(&self) -> Backdrop {
        Backdrop::single(self.settings.fallback_image.clone())
    }

    /// Image precedence: catalog image, then fan-art thumb, then the
    /// bundled placeholder. Both sources were fetched concurrently; only
    /// the pick happens here.
    fn merge_backdrop(&self, primary: Outcome<Backdrop>, thumb: Outcome<String>) -> Backdrop {
        primary
            .found()
            .or_else(|| thumb.found().map(Backdrop::single))
            .unwrap_or_else(|| self.fallback_backdrop())
    }

    /// The signed-in user's own rating, from the stored rating set only.
    fn my_rating(&self, kind: MediaKind, trakt_id: Option<u64>) -> Option<u8> {
        if self.store.profile().is_none() {
            return None;
        }
        trakt_id.and_then(|id| self.store.my_rating(kind, id))
    }

    /// Fetch a comment thread and resolve each author's avatar, one lookup
    /// per comment. A failed lookup falls back to the default avatar; it
    /// never drops the comment or the thread.
    async fn load_comments(&self, target: Option<CommentTarget>) -> CommentThread {
        let Some(target) = target else {
            return CommentThread::default();
        };
        let thread = match self.tracking.comments(&target).await {
            Outcome::Found(thread) => thread,
            _ => return CommentThread::default(),
        };
        let comments = join_all(thread.comments.into_iter().map(|mut comment| async {
            let profile = match comment.author_slug.as_deref() {
                Some(slug) => self.tracking.user_profile(slug).await,
                None => Outcome::Missing,
            };
            comment.avatar = Some(match profile {
                Outcome::Found(p) => p
                    .avatar()
                    .unwrap_or_else(|| default_avatar(p.gender.as_deref()).to_string()),
                _ => DEFAULT_AVATAR.to_string(),
            });
            comment
        }))
        .await;
        CommentThread {
            total: thread.total,
            comments,
        }
    }

    /// Resolve each cast member's cross-service ids individually; one
    /// failed lookup nulls only that member's ids.
    async fn resolve_cast(&self, cast: Outcome<Vec<CastMember>>) -> Vec<CastMember> {
        let cast = cast.found().unwrap_or_default();
        join_all(cast.into_iter().map(|mut member| async {
            member.ids = self.tracking.id_lookup_person(member.tmdb_id).await.found();
            member
        }))
        .await
    }

    // Cards

    /// Card for a show. `None` only when the summary has no slug; every
    /// upstream failure degrades to empty fields instead.
    pub async fn get_show_card(&self, show: &ShowSummary) -> Option<MediaCard> {
        let slug = show.ids.slug.clone()?;
        let key = CacheKey::show(&slug);
        if self.settings.use_cache {
            if let Some(card) = self.cache.card(&key).await {
                debug!("card cache hit: {slug}");
                return Some(card);
            }
        }

        let ids = &show.ids;
        let (backdrop, thumb, logo, imdb, trakt_rating, extras) = tokio::join!(
            maybe(ids.tmdb, |id| self.catalog.show_backdrop(id)),
            maybe(ids.tvdb, |id| self.artwork.show_thumb(id)),
            maybe(ids.tvdb, |id| self.artwork.show_logo(id)),
            maybe_ref(ids.imdb.as_deref(), |id| self.ratings.imdb_rating(id)),
            maybe(ids.trakt, |id| self.tracking.show_rating(id)),
            maybe(ids.tmdb, |id| self.catalog.show_extras(id)),
        );

        let extras = extras.found();
        let card = MediaCard {
            kind: MediaKind::Show,
            title: show.title.clone(),
            ids: show.ids.clone(),
            backdrop: self.merge_backdrop(backdrop, thumb),
            clear_logo: logo.found(),
            imdb_rating: imdb.found(),
            trakt_rating: trakt_rating.found().map(one_decimal),
            tmdb_rating: extras
                .as_ref()
                .and_then(|e| e.tmdb_rating)
                .map(one_decimal),
            my_rating: self.my_rating(MediaKind::Show, ids.trakt),
            genres: extras.map(|e| e.genres).unwrap_or_default(),
            show: Some(show.clone()),
            movie: None,
            episode: None,
        };

        if self.settings.use_cache {
            self.cache.set_card(key, card.clone()).await;
        }
        Some(card)
    }

    /// Card for a movie.
    pub async fn get_movie_card(&self, movie: &MovieSummary) -> Option<MediaCard> {
        let slug = movie.ids.slug.clone()?;
        let key = CacheKey::movie(&slug);
        if self.settings.use_cache {
            if let Some(card) = self.cache.card(&key).await {
                debug!("card cache hit: {slug}");
                return Some(card);
            }
        }

        let ids = &movie.ids;
        let (backdrop, thumb, logo, imdb, trakt_rating, extras) = tokio::join!(
            maybe(ids.tmdb, |id| self.catalog.movie_backdrop(id)),
            maybe(ids.tmdb, |id| self.artwork.movie_thumb(id)),
            maybe(ids.tmdb, |id| self.artwork.movie_logo(id)),
            maybe_ref(ids.imdb.as_deref(), |id| self.ratings.imdb_rating(id)),
            maybe(ids.trakt, |id| self.tracking.movie_rating(id)),
            maybe(ids.tmdb, |id| self.catalog.movie_extras(id)),
        );

        let extras = extras.found();
        let card = MediaCard {
            kind: MediaKind::Movie,
            title: movie.title.clone(),
            ids: movie.ids.clone(),
            backdrop: self.merge_backdrop(backdrop, thumb),
            clear_logo: logo.found(),
            imdb_rating: imdb.found(),
            trakt_rating: trakt_rating.found().map(one_decimal),
            tmdb_rating: extras
                .as_ref()
                .and_then(|e| e.tmdb_rating)
                .map(one_decimal),
            my_rating: self.my_rating(MediaKind::Movie, ids.trakt),
            genres: extras.map(|e| e.genres).unwrap_or_default(),
            show: None,
            movie: Some(movie.clone()),
            episode: None,
        };

        if self.settings.use_cache {
            self.cache.set_card(key, card.clone()).await;
        }
        Some(card)
    }

    /// Card for an episode of a show. The episode still falls back to the
    /// show backdrop, then the fan-art thumb, then the placeholder.
    pub async fn get_episode_card(
        &self,
        show: &ShowSummary,
        episode: &EpisodeSummary,
    ) -> Option<MediaCard> {
        let slug = show.ids.slug.clone()?;
        let key = CacheKey::episode(&slug, episode.season, episode.number);
        if self.settings.use_cache {
            if let Some(card) = self.cache.card(&key).await {
                debug!("card cache hit: {slug} s{}e{}", episode.season, episode.number);
                return Some(card);
            }
        }

        let ids = &show.ids;
        let (still, show_backdrop, thumb, logo, imdb, trakt_rating, extras) = tokio::join!(
            maybe(ids.tmdb, |id| self
                .catalog
                .episode_still(id, episode.season, episode.number)),
            maybe(ids.tmdb, |id| self.catalog.show_backdrop(id)),
            maybe(ids.tvdb, |id| self.artwork.show_thumb(id)),
            maybe(ids.tvdb, |id| self.artwork.show_logo(id)),
            maybe_ref(episode.ids.imdb.as_deref(), |id| self
                .ratings
                .imdb_rating(id)),
            maybe(ids.trakt, |id| self
                .tracking
                .episode_rating(id, episode.season, episode.number)),
            maybe(ids.tmdb, |id| self
                .catalog
                .episode_extras(id, episode.season, episode.number)),
        );

        let backdrop = still
            .found()
            .unwrap_or_else(|| self.merge_backdrop(show_backdrop, thumb));
        let extras = extras.found();
        let card = MediaCard {
            kind: MediaKind::Episode,
            title: episode.title.clone().unwrap_or_default(),
            ids: episode.ids.clone(),
            backdrop,
            clear_logo: logo.found(),
            imdb_rating: imdb.found(),
            trakt_rating: trakt_rating.found().map(one_decimal),
            tmdb_rating: extras.and_then(|e| e.tmdb_rating).map(one_decimal),
            my_rating: self.my_rating(MediaKind::Episode, episode.ids.trakt),
            genres: Vec::new(),
            show: Some(show.clone()),
            movie: None,
            episode: Some(episode.clone()),
        };

        if self.settings.use_cache {
            self.cache.set_card(key, card.clone()).await;
        }
        Some(card)
    }

    // Details

    /// Details for a show, by tracking id or slug. Slug inputs are served
    /// from the cache without any upstream call.
    pub async fn get_show_details(&self, id: &str) -> Option<ShowDetails> {
        if self.settings.use_cache {
            if let Some(record) = self.cache.detail(&CacheKey::show(id)).await {
                if let Some(details) = record.as_show() {
                    return Some(details.clone());
                }
            }
        }

        let show = self.tracking.show_summary(id).await.found()?;
        let slug = show.ids.slug.clone()?;
        let key = CacheKey::show(&slug);
        if self.settings.use_cache && slug != id {
            if let Some(record) = self.cache.detail(&key).await {
                if let Some(details) = record.as_show() {
                    return Some(details.clone());
                }
            }
        }

        let ids = show.ids.clone();
        let target = ids.trakt.map(|trakt_id| CommentTarget::Show { trakt_id });
        let (backdrop, poster, thumb, logo, imdb, trakt_rating, extras, reviews, actors, progress) = tokio::join!(
            maybe(ids.tmdb, |id| self.catalog.show_backdrop(id)),
            maybe(ids.tmdb, |id| self.catalog.show_poster(id)),
            maybe(ids.tvdb, |id| self.artwork.show_thumb(id)),
            maybe(ids.tvdb, |id| self.artwork.show_logo(id)),
            maybe_ref(ids.imdb.as_deref(), |id| self.ratings.imdb_rating(id)),
            maybe(ids.trakt, |id| self.tracking.show_rating(id)),
            maybe(ids.tmdb, |id| self.catalog.show_extras(id)),
            self.load_comments(target),
            async {
                let cast = maybe(ids.tmdb, |id| self.catalog.show_cast(id)).await;
                self.resolve_cast(cast).await
            },
            maybe(ids.trakt, |id| self.tracking.watched_progress(id)),
        );

        let poster = poster.found();
        let mut extras = extras.found();
        if let Some(extras) = &mut extras {
            // Seasons without their own art inherit the show poster.
            for season in &mut extras.seasons {
                if season.poster.is_none() {
                    season.poster = poster.clone();
                }
            }
        }

        let details = ShowDetails {
            my_rating: self.my_rating(MediaKind::Show, ids.trakt),
            backdrop: self.merge_backdrop(backdrop, thumb),
            poster,
            clear_logo: logo.found(),
            imdb_rating: imdb.found(),
            trakt_rating: trakt_rating.found().map(one_decimal),
            tmdb_rating: extras
                .as_ref()
                .and_then(|e| e.tmdb_rating)
                .map(one_decimal),
            extras,
            actors,
            reviews,
            watched_progress: progress.found(),
            show,
        };

        if self.settings.use_cache {
            self.cache
                .set_detail(key, DetailRecord::Show(details.clone()))
                .await;
        }
        Some(details)
    }

    /// Details for a movie, by tracking id or slug.
    pub async fn get_movie_details(&self, id: &str) -> Option<MovieDetails> {
        if self.settings.use_cache {
            if let Some(record) = self.cache.detail(&CacheKey::movie(id)).await {
                if let Some(details) = record.as_movie() {
                    return Some(details.clone());
                }
            }
        }

        let movie = self.tracking.movie_summary(id).await.found()?;
        let slug = movie.ids.slug.clone()?;
        let key = CacheKey::movie(&slug);
        if self.settings.use_cache && slug != id {
            if let Some(record) = self.cache.detail(&key).await {
                if let Some(details) = record.as_movie() {
                    return Some(details.clone());
                }
            }
        }

        let ids = movie.ids.clone();
        let target = ids.trakt.map(|trakt_id| CommentTarget::Movie { trakt_id });
        let (backdrop, poster, thumb, logo, imdb, trakt_rating, extras, reviews, actors) = tokio::join!(
            maybe(ids.tmdb, |id| self.catalog.movie_backdrop(id)),
            maybe(ids.tmdb, |id| self.catalog.movie_poster(id)),
            maybe(ids.tmdb, |id| self.artwork.movie_thumb(id)),
            maybe(ids.tmdb, |id| self.artwork.movie_logo(id)),
            maybe_ref(ids.imdb.as_deref(), |id| self.ratings.imdb_rating(id)),
            maybe(ids.trakt, |id| self.tracking.movie_rating(id)),
            maybe(ids.tmdb, |id| self.catalog.movie_extras(id)),
            self.load_comments(target),
            async {
                let cast = maybe(ids.tmdb, |id| self.catalog.movie_cast(id)).await;
                self.resolve_cast(cast).await
            },
        );

        // Watched state comes from the durable list the sync layer maintains.
        let watched = ids.trakt.and_then(|trakt_id| {
            self.store
                .watched_movies()?
                .into_iter()
                .find(|w| w.movie.ids.trakt == Some(trakt_id))
        });

        let extras = extras.found();
        let details = MovieDetails {
            my_rating: self.my_rating(MediaKind::Movie, ids.trakt),
            backdrop: self.merge_backdrop(backdrop, thumb),
            poster: poster.found(),
            clear_logo: logo.found(),
            imdb_rating: imdb.found(),
            trakt_rating: trakt_rating.found().map(one_decimal),
            tmdb_rating: extras
                .as_ref()
                .and_then(|e| e.tmdb_rating)
                .map(one_decimal),
            extras,
            actors,
            reviews,
            watched,
            movie,
        };

        if self.settings.use_cache {
            self.cache
                .set_detail(key, DetailRecord::Movie(details.clone()))
                .await;
        }
        Some(details)
    }

    /// Details for one season of a show, by slug.
    pub async fn get_season_details(&self, slug: &str, season: u32) -> Option<SeasonDetails> {
        let key = CacheKey::season(slug, season);
        if self.settings.use_cache {
            if let Some(record) = self.cache.detail(&key).await {
                if let Some(details) = record.as_season() {
                    return Some(details.clone());
                }
            }
        }

        let (show, season_summary) = tokio::join!(
            self.tracking.show_summary(slug),
            self.tracking.season_summary(slug, season),
        );
        let show = show.found()?;
        let season_summary = season_summary.found()?;
        let ids = show.ids.clone();

        let target = CommentTarget::Season {
            slug: slug.to_string(),
            season,
        };
        let (backdrop, thumb, logo, show_poster, extras, reviews) = tokio::join!(
            maybe(ids.tmdb, |id| self.catalog.show_backdrop(id)),
            maybe(ids.tvdb, |id| self.artwork.show_thumb(id)),
            maybe(ids.tvdb, |id| self.artwork.show_logo(id)),
            maybe(ids.tmdb, |id| self.catalog.show_poster(id)),
            maybe(ids.tmdb, |id| self.catalog.season_extras(id, season)),
            self.load_comments(Some(target)),
        );

        let extras = extras.found();
        let poster = extras
            .as_ref()
            .and_then(|e| e.poster.clone())
            .or_else(|| show_poster.found());

        let details = SeasonDetails {
            my_rating: self.my_rating(MediaKind::Season, season_summary.ids.trakt),
            backdrop: self.merge_backdrop(backdrop, thumb),
            poster,
            clear_logo: logo.found(),
            trakt_rating: season_summary.rating.map(one_decimal),
            extras,
            reviews,
            season: season_summary,
            show,
        };

        if self.settings.use_cache {
            self.cache
                .set_detail(key, DetailRecord::Season(details.clone()))
                .await;
        }
        Some(details)
    }

    /// Details for one episode. `show_id` is the show's tracking id or
    /// slug; the episode is addressed by season and number.
    pub async fn get_episode_details(
        &self,
        show_id: &str,
        season: u32,
        number: u32,
    ) -> Option<EpisodeDetails> {
        if self.settings.use_cache {
            if let Some(record) = self.cache.detail(&CacheKey::episode(show_id, season, number)).await {
                if let Some(details) = record.as_episode() {
                    return Some(details.clone());
                }
            }
        }

        let episode = self
            .tracking
            .episode_summary(show_id, season, number)
            .await
            .found()?;
        let episode_trakt = episode.ids.trakt?;
        let show = self.tracking.show_for_episode(episode_trakt).await.found()?;
        let slug = show.ids.slug.clone()?;

        let key = CacheKey::episode(&slug, episode.season, episode.number);
        if self.settings.use_cache && slug != show_id {
            if let Some(record) = self.cache.detail(&key).await {
                if let Some(details) = record.as_episode() {
                    return Some(details.clone());
                }
            }
        }

        let ids = show.ids.clone();
        let target = CommentTarget::Episode {
            slug: slug.clone(),
            season: episode.season,
            number: episode.number,
        };
        let (
            still,
            show_backdrop,
            thumb,
            season_poster,
            show_poster,
            logo,
            imdb,
            trakt_rating,
            extras,
            reviews,
            actors,
            progress,
        ) = tokio::join!(
            maybe(ids.tmdb, |id| self
                .catalog
                .episode_still(id, episode.season, episode.number)),
            maybe(ids.tmdb, |id| self.catalog.show_backdrop(id)),
            maybe(ids.tvdb, |id| self.artwork.show_thumb(id)),
            maybe(ids.tmdb, |id| self.catalog.season_poster(id, episode.season)),
            maybe(ids.tmdb, |id| self.catalog.show_poster(id)),
            maybe(ids.tvdb, |id| self.artwork.show_logo(id)),
            maybe_ref(episode.ids.imdb.as_deref(), |id| self
                .ratings
                .imdb_rating(id)),
            maybe(ids.trakt, |id| self
                .tracking
                .episode_rating(id, episode.season, episode.number)),
            maybe(ids.tmdb, |id| self
                .catalog
                .episode_extras(id, episode.season, episode.number)),
            self.load_comments(Some(target)),
            async {
                let cast = maybe(ids.tmdb, |id| self
                    .catalog
                    .episode_cast(id, episode.season, episode.number))
                .await;
                self.resolve_cast(cast).await
            },
            maybe(ids.trakt, |id| self.tracking.watched_progress(id)),
        );

        // Persist fresh progress for the show, then derive this episode's
        // watched marker from it.
        let watched = match progress.found() {
            Some(progress) => {
                if progress.completed > 0 {
                    self.store.set_watched_show(&slug, &progress);
                }
                progress
                    .episode(episode.season, episode.number)
                    .filter(|e| e.completed)
                    .map(|e| EpisodeWatched {
                        last_watched_at: e.last_watched_at.clone(),
                    })
            }
            None => self
                .store
                .watched_show(&slug)
                .as_ref()
                .and_then(|p| p.episode(episode.season, episode.number))
                .filter(|e| e.completed)
                .map(|e| EpisodeWatched {
                    last_watched_at: e.last_watched_at.clone(),
                }),
        };

        let backdrop = still
            .found()
            .unwrap_or_else(|| self.merge_backdrop(show_backdrop, thumb));
        let extras = extras.found();
        let details = EpisodeDetails {
            my_rating: self.my_rating(MediaKind::Episode, episode.ids.trakt),
            backdrop,
            season_poster: season_poster.found().or_else(|| show_poster.found()),
            clear_logo: logo.found(),
            imdb_rating: imdb.found(),
            trakt_rating: trakt_rating.found().map(one_decimal),
            tmdb_rating: extras
                .as_ref()
                .and_then(|e| e.tmdb_rating)
                .map(one_decimal),
            extras,
            actors,
            reviews,
            watched,
            episode,
            show,
        };

        if self.settings.use_cache {
            self.cache
                .set_detail(key, DetailRecord::Episode(details.clone()))
                .await;
        }
        Some(details)
    }

    /// A catalog movie collection with each part resolved to a tracking
    /// slug and merged with the user's watched state, ascending by release
    /// date. Not cached: the per-user watched merge would go stale.
    pub async fn get_movie_collection(&self, collection_id: u64) -> Option<MovieCollection> {
        let mut collection = self
            .catalog
            .movie_collection(collection_id)
            .await
            .found()?;
        let watched = self.store.watched_movies();

        let parts = join_all(collection.parts.into_iter().map(|mut part| {
            let watched = watched.as_deref();
            async move {
                part.slug = self
                    .tracking
                    .id_lookup_tmdb(part.tmdb_id, Some(MediaKind::Movie))
                    .await
                    .found()
                    .and_then(|ids| ids.slug);
                part.watched = watched.and_then(|w| {
                    w.iter()
                        .find(|m| m.movie.ids.tmdb == Some(part.tmdb_id))
                        .cloned()
                });
                part
            }
        }))
        .await;

        collection.parts = parts;
        collection
            .parts
            .sort_by(|a, b| a.release_date.cmp(&b.release_date));
        Some(collection)
    }

    /// Catalog multi-search enriched with tracking ids per hit, most
    /// popular first. One failed lookup leaves only that hit's ids empty.
    pub async fn search(&self, keyword: &str, page: u32) -> Vec<SearchHit> {
        let hits = self
            .catalog
            .multi_search(keyword, page)
            .await
            .found()
            .unwrap_or_default();

        let mut enriched = join_all(hits.into_iter().map(|mut hit| async {
            hit.ids = self
                .tracking
                .id_lookup_tmdb(hit.tmdb_id, Some(hit.kind))
                .await
                .found();
            hit
        }))
        .await;

        enriched.sort_by(|a, b| {
            b.popularity
                .partial_cmp(&a.popularity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        enriched
    }
}
