use super::api_types::{
    CommunityRating, LookupRow, RawComment, RawLikedComment, TokenResponse, UserProfile,
    UserSettings,
};
use crate::client::{
    collapse, CommentTarget, HttpClient, Outcome, PageRequest, TrackingClient,
};
use crate::config::TrackingConfig;
use crate::session::SessionHandle;
use crate::types::{
    CommentThread, EpisodeSummary, LikedComment, ListedMedia, MediaIds, MediaKind, MovieSummary,
    Paginated, RatedEntry, RatingSet, SeasonSummary, ShowSummary, WatchedMovie, WatchedProgress,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use urlencoding::encode;

const TRAKT_BASE_URL: &str = "https://api.trakt.tv";
const API_VERSION: &str = "2";
/// Page size used when fetching the likes list page by page.
pub const LIKES_PAGE_SIZE: u32 = 100;

/// Tracking service client.
///
/// Reads the bearer token from the shared session handle; it never writes
/// the session (token rotation is the session manager's job).
pub struct TraktClient {
    http: HttpClient,
    session: SessionHandle,
    oauth: TrackingConfig,
}

impl TraktClient {
    pub fn new(config: &TrackingConfig, session: SessionHandle) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "trakt-api-version",
            HeaderValue::from_static(API_VERSION),
        );
        headers.insert(
            "trakt-api-key",
            HeaderValue::try_from(config.client_id.as_str())
                .unwrap_or_else(|_| HeaderValue::from_static("")),
        );

        Self {
            http: HttpClient::new(TRAKT_BASE_URL).with_default_headers(headers),
            session,
            oauth: config.clone(),
        }
    }

    fn bearer(&self) -> Option<String> {
        self.session
            .read()
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    fn comments_path(target: &CommentTarget) -> String {
        match target {
            CommentTarget::Show { trakt_id } => format!("/shows/{trakt_id}/comments/likes"),
            CommentTarget::Season { slug, season } => {
                format!("/shows/{}/seasons/{season}/comments/likes", encode(slug))
            }
            CommentTarget::Episode {
                slug,
                season,
                number,
            } => format!(
                "/shows/{}/seasons/{season}/episodes/{number}/comments/likes",
                encode(slug)
            ),
            CommentTarget::Movie { trakt_id } => format!("/movies/{trakt_id}/comments/likes"),
        }
    }

    async fn listing(
        &self,
        path: &str,
        page: PageRequest,
        bearer: Option<&str>,
    ) -> Outcome<Paginated<ListedMedia>> {
        let limit = page.limit.to_string();
        let page_no = page.page.to_string();
        let params = [("limit", limit.as_str()), ("page", page_no.as_str())];
        let res = self
            .http
            .get_with_meta::<Vec<ListedMedia>>(path, &params, bearer)
            .await
            .map(|(items, meta)| Paginated {
                items,
                page: meta.page.unwrap_or(page.page),
                pages_total: meta.page_count.unwrap_or(1),
            });
        collapse(res, path)
    }

    async fn likes_page(&self, user: &str, page: u32, token: &str) -> crate::Result<Vec<RawLikedComment>> {
        let path = format!("/users/{}/likes/comments", encode(user));
        let limit = LIKES_PAGE_SIZE.to_string();
        let page_no = page.to_string();
        let params = [("limit", limit.as_str()), ("page", page_no.as_str())];
        let (rows, _) = self
            .http
            .get_with_meta::<Vec<RawLikedComment>>(&path, &params, Some(token))
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl TrackingClient for TraktClient {
    async fn exchange_code(&self, code: &str) -> Outcome<TokenResponse> {
        let body = serde_json::json!({
            "code": code,
            "client_id": self.oauth.client_id,
            "client_secret": self.oauth.client_secret,
            "redirect_uri": self.oauth.redirect_uri,
            "grant_type": "authorization_code",
        });
        collapse(
            self.http.post_json("/oauth/token", &body, None).await,
            "oauth code exchange",
        )
    }

    async fn refresh_session(&self, refresh_token: &str) -> Outcome<TokenResponse> {
        let body = serde_json::json!({
            "refresh_token": refresh_token,
            "client_id": self.oauth.client_id,
            "client_secret": self.oauth.client_secret,
            "redirect_uri": self.oauth.redirect_uri,
            "grant_type": "refresh_token",
        });
        collapse(
            self.http.post_json("/oauth/token", &body, None).await,
            "oauth token refresh",
        )
    }

    async fn user_settings(&self) -> Outcome<UserSettings> {
        let Some(token) = self.bearer() else {
            return Outcome::Unauthenticated;
        };
        collapse(
            self.http.get_auth("/users/settings", &[], &token).await,
            "user settings",
        )
    }

    async fn show_summary(&self, id: &str) -> Outcome<ShowSummary> {
        let path = format!("/shows/{}", encode(id));
        collapse(
            self.http.get(&path, &[("extended", "full")]).await,
            "show summary",
        )
    }

    async fn movie_summary(&self, id: &str) -> Outcome<MovieSummary> {
        let path = format!("/movies/{}", encode(id));
        collapse(
            self.http.get(&path, &[("extended", "full")]).await,
            "movie summary",
        )
    }

    async fn season_summary(&self, slug: &str, season: u32) -> Outcome<SeasonSummary> {
        // The seasons listing is the only summary endpoint; pick the one
        // matching the requested number.
        let path = format!("/shows/{}/seasons", encode(slug));
        let res = self
            .http
            .get::<Vec<SeasonSummary>>(&path, &[("extended", "full")])
            .await;
        match collapse(res, "season summary") {
            Outcome::Found(seasons) => match seasons.into_iter().find(|s| s.number == season) {
                Some(s) => Outcome::Found(s),
                None => Outcome::Missing,
            },
            Outcome::Missing => Outcome::Missing,
            Outcome::Unauthenticated => Outcome::Unauthenticated,
            Outcome::Failed => Outcome::Failed,
        }
    }

    async fn episode_summary(
        &self,
        show_id: &str,
        season: u32,
        number: u32,
    ) -> Outcome<EpisodeSummary> {
        let path = format!(
            "/shows/{}/seasons/{season}/episodes/{number}",
            encode(show_id)
        );
        collapse(
            self.http.get(&path, &[("extended", "full")]).await,
            "episode summary",
        )
    }

    async fn show_rating(&self, trakt_id: u64) -> Outcome<f64> {
        let path = format!("/shows/{trakt_id}/ratings");
        collapse(self.http.get::<CommunityRating>(&path, &[]).await, "show rating")
            .map(|r| r.rating)
    }

    async fn episode_rating(&self, trakt_id: u64, season: u32, number: u32) -> Outcome<f64> {
        let path = format!("/shows/{trakt_id}/seasons/{season}/episodes/{number}/ratings");
        collapse(
            self.http.get::<CommunityRating>(&path, &[]).await,
            "episode rating",
        )
        .map(|r| r.rating)
    }

    async fn movie_rating(&self, trakt_id: u64) -> Outcome<f64> {
        let path = format!("/movies/{trakt_id}/ratings");
        collapse(self.http.get::<CommunityRating>(&path, &[]).await, "movie rating")
            .map(|r| r.rating)
    }

    async fn comments(&self, target: &CommentTarget) -> Outcome<CommentThread> {
        let path = Self::comments_path(target);
        let res = self
            .http
            .get_with_meta::<Vec<RawComment>>(&path, &[], None)
            .await
            .map(|(rows, meta)| CommentThread {
                total: meta.item_count.unwrap_or(rows.len() as u64),
                comments: rows.into_iter().map(Into::into).collect(),
            });
        collapse(res, "comments")
    }

    async fn user_profile(&self, user_slug: &str) -> Outcome<UserProfile> {
        let path = format!("/users/{}", encode(user_slug));
        collapse(
            self.http.get(&path, &[("extended", "full")]).await,
            "user profile",
        )
    }

    async fn watched_progress(&self, trakt_id: u64) -> Outcome<WatchedProgress> {
        let Some(token) = self.bearer() else {
            return Outcome::Unauthenticated;
        };
        let path = format!("/shows/{trakt_id}/progress/watched");
        let params = [
            ("hidden", "false"),
            ("specials", "false"),
            ("count_specials", "false"),
        ];
        collapse(
            self.http.get_auth(&path, &params, &token).await,
            "watched progress",
        )
    }

    async fn watched_movies(&self) -> Outcome<Vec<WatchedMovie>> {
        let Some(token) = self.bearer() else {
            return Outcome::Unauthenticated;
        };
        collapse(
            self.http.get_auth("/sync/watched/movies", &[], &token).await,
            "watched movies",
        )
    }

    async fn id_lookup_tmdb(&self, tmdb_id: u64, kind: Option<MediaKind>) -> Outcome<MediaIds> {
        let path = format!("/search/tmdb/{tmdb_id}");
        let kind_str = kind.map(|k| k.to_string());
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(ref k) = kind_str {
            params.push(("type", k));
        }
        let res = self.http.get::<Vec<LookupRow>>(&path, &params).await;
        match collapse(res, "tmdb id lookup") {
            Outcome::Found(rows) => match rows.first().and_then(LookupRow::ids) {
                Some(ids) => Outcome::Found(ids),
                None => Outcome::Missing,
            },
            Outcome::Missing => Outcome::Missing,
            Outcome::Unauthenticated => Outcome::Unauthenticated,
            Outcome::Failed => Outcome::Failed,
        }
    }

    async fn id_lookup_person(&self, tmdb_person_id: u64) -> Outcome<MediaIds> {
        let path = format!("/search/tmdb/{tmdb_person_id}");
        let res = self
            .http
            .get::<Vec<LookupRow>>(&path, &[("type", "person")])
            .await;
        match collapse(res, "person id lookup") {
            Outcome::Found(rows) => match rows.first().and_then(LookupRow::ids) {
                Some(ids) => Outcome::Found(ids),
                None => Outcome::Missing,
            },
            Outcome::Missing => Outcome::Missing,
            Outcome::Unauthenticated => Outcome::Unauthenticated,
            Outcome::Failed => Outcome::Failed,
        }
    }

    async fn show_for_episode(&self, episode_trakt_id: u64) -> Outcome<ShowSummary> {
        let path = format!("/search/trakt/{episode_trakt_id}");
        let res = self
            .http
            .get::<Vec<LookupRow>>(&path, &[("type", "episode")])
            .await;
        match collapse(res, "episode show lookup") {
            Outcome::Found(rows) => match rows.into_iter().next().and_then(|r| r.show) {
                Some(show) => Outcome::Found(show),
                None => Outcome::Missing,
            },
            Outcome::Missing => Outcome::Missing,
            Outcome::Unauthenticated => Outcome::Unauthenticated,
            Outcome::Failed => Outcome::Failed,
        }
    }

    async fn my_ratings(
        &self,
        user: &str,
        kind: MediaKind,
        page: Option<PageRequest>,
    ) -> Outcome<RatingSet> {
        let Some(token) = self.bearer() else {
            return Outcome::Unauthenticated;
        };
        let path = format!("/users/{}/ratings/{}", encode(user), kind.plural());
        let limit;
        let page_no;
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(p) = page {
            limit = p.limit.to_string();
            page_no = p.page.to_string();
            params.push(("limit", limit.as_str()));
            params.push(("page", page_no.as_str()));
        }
        let res = self
            .http
            .get_with_meta::<Vec<RatedEntry>>(&path, &params, Some(&token))
            .await
            .map(|(rows, meta)| RatingSet {
                last_modified: meta.last_modified,
                total: meta.item_count.unwrap_or(rows.len() as u64),
                entries: rows,
            });
        collapse(res, "my ratings")
    }

    async fn my_likes(&self, user: &str, page: Option<u32>) -> Outcome<Vec<LikedComment>> {
        let Some(token) = self.bearer() else {
            return Outcome::Unauthenticated;
        };

        match page {
            Some(page) => collapse(
                self.likes_page(user, page, &token).await,
                "likes page",
            )
            .map(|rows| rows.into_iter().map(Into::into).collect()),
            None => {
                // Fetch every page; the first response carries the page count.
                let path = format!("/users/{}/likes/comments", encode(user));
                let limit = LIKES_PAGE_SIZE.to_string();
                let params = [("limit", limit.as_str()), ("page", "1")];
                let first = self
                    .http
                    .get_with_meta::<Vec<RawLikedComment>>(&path, &params, Some(&token))
                    .await;
                let (rows, meta) = match first {
                    Ok(ok) => ok,
                    Err(e) => {
                        return collapse::<Vec<LikedComment>>(Err(e), "likes full fetch");
                    }
                };
                let mut all: Vec<LikedComment> = rows.into_iter().map(Into::into).collect();
                for page in 2..=meta.page_count.unwrap_or(1) {
                    match self.likes_page(user, page, &token).await {
                        Ok(rows) => all.extend(rows.into_iter().map(Into::<LikedComment>::into)),
                        Err(e) => {
                            tracing::warn!("likes page {page} failed: {e}");
                            break;
                        }
                    }
                }
                Outcome::Found(all)
            }
        }
    }

    async fn trending(
        &self,
        kind: MediaKind,
        page: PageRequest,
    ) -> Outcome<Paginated<ListedMedia>> {
        self.listing(&format!("/{}/trending", kind.plural()), page, None)
            .await
    }

    async fn anticipated(
        &self,
        kind: MediaKind,
        page: PageRequest,
    ) -> Outcome<Paginated<ListedMedia>> {
        self.listing(&format!("/{}/anticipated", kind.plural()), page, None)
            .await
    }

    async fn community_recommended(
        &self,
        kind: MediaKind,
        page: PageRequest,
    ) -> Outcome<Paginated<ListedMedia>> {
        self.listing(&format!("/{}/recommended", kind.plural()), page, None)
            .await
    }

    async fn my_recommendations(
        &self,
        user: &str,
        kind: MediaKind,
        page: PageRequest,
    ) -> Outcome<Paginated<ListedMedia>> {
        let Some(token) = self.bearer() else {
            return Outcome::Unauthenticated;
        };
        let path = format!(
            "/users/{}/recommendations/{}/rank",
            encode(user),
            kind.plural()
        );
        let limit = page.limit.to_string();
        let page_no = page.page.to_string();
        let params = [("limit", limit.as_str()), ("page", page_no.as_str())];

        // Recommendation rows are bare summaries, not listing wrappers.
        match kind {
            MediaKind::Show => {
                let res = self
                    .http
                    .get_with_meta::<Vec<ShowSummary>>(&path, &params, Some(&token))
                    .await
                    .map(|(items, meta)| Paginated {
                        items: items
                            .into_iter()
                            .map(|s| ListedMedia {
                                show: Some(s),
                                ..Default::default()
                            })
                            .collect(),
                        page: meta.page.unwrap_or(page.page),
                        pages_total: meta.page_count.unwrap_or(1),
                    });
                collapse(res, "my recommendations")
            }
            MediaKind::Movie => {
                let res = self
                    .http
                    .get_with_meta::<Vec<MovieSummary>>(&path, &params, Some(&token))
                    .await
                    .map(|(items, meta)| Paginated {
                        items: items
                            .into_iter()
                            .map(|m| ListedMedia {
                                movie: Some(m),
                                ..Default::default()
                            })
                            .collect(),
                        page: meta.page.unwrap_or(page.page),
                        pages_total: meta.page_count.unwrap_or(1),
                    });
                collapse(res, "my recommendations")
            }
            _ => Outcome::Missing,
        }
    }

    async fn watch_history(
        &self,
        user: &str,
        kind: MediaKind,
        page: PageRequest,
    ) -> Outcome<Paginated<ListedMedia>> {
        let path = format!("/users/{}/history/{}", encode(user), kind.plural());
        let bearer = self.bearer();
        self.listing(&path, page, bearer.as_deref()).await
    }

    async fn search(&self, query: &str) -> Outcome<Vec<ListedMedia>> {
        let res = self
            .http
            .get::<Vec<LookupRow>>("/search/movie,show", &[("query", query)])
            .await
            .map(|rows| {
                rows.into_iter()
                    .map(|r| ListedMedia {
                        show: r.show,
                        movie: r.movie,
                        ..Default::default()
                    })
                    .collect()
            });
        collapse(res, "search")
    }

    async fn rate(&self, kind: MediaKind, ids: &MediaIds, rating: u8) -> bool {
        let Some(token) = self.bearer() else {
            return false;
        };
        let item = serde_json::json!({ "rating": rating, "ids": ids });
        let body = serde_json::json!({ (kind.plural()): [item] });
        // Rating 0 removes the rating instead of setting it.
        let path = if rating == 0 {
            "/sync/ratings/remove"
        } else {
            "/sync/ratings"
        };
        match self.http.post_status(path, &body, Some(&token)).await {
            Ok(status) => status.as_u16() == 200 || status.as_u16() == 201,
            Err(e) => {
                tracing::warn!("rate failed: {e}");
                false
            }
        }
    }

    async fn like_comment(&self, comment_id: u64, unlike: bool) -> bool {
        let Some(token) = self.bearer() else {
            return false;
        };
        let path = format!("/comments/{comment_id}/like");
        let result = if unlike {
            self.http.delete_status(&path, Some(&token)).await
        } else {
            self.http
                .post_status(&path, &serde_json::json!({}), Some(&token))
                .await
        };
        match result {
            Ok(status) => status.as_u16() == 204,
            Err(e) => {
                tracing::warn!("comment like failed: {e}");
                false
            }
        }
    }
}
