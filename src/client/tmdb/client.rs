use super::api_types::{
    CastRecord, Collection, Credits, EpisodeDetails, ImageRecord, ImagesResponse, MovieDetails,
    MultiSearchResponse, SeasonDetails, TvDetails, VideoList,
};
use crate::client::{collapse, CatalogClient, HttpClient, Outcome};
use crate::types::{
    Backdrop, CastMember, CollectionPart, EpisodeEntry, EpisodeExtras, MediaKind, MovieCollection,
    MovieExtras, SearchHit, SeasonEntry, SeasonExtras, ShowExtras, Video,
};
use async_trait::async_trait;

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Catalog service client.
///
/// Every reshaping here (image quality sort, season ordering, video
/// filtering, billing order) is a pure function of the catalog payload.
pub struct TmdbClient {
    http: HttpClient,
    api_key: String,
}

impl TmdbClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(TMDB_BASE_URL),
            api_key: api_key.into(),
        }
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        extra_params: &[(&str, &str)],
    ) -> crate::Result<T> {
        let mut params: Vec<(&str, &str)> = vec![("api_key", self.api_key.as_str())];
        params.extend_from_slice(extra_params);
        self.http.get(endpoint, &params).await
    }

    fn image_url(path: Option<&str>, size: &str) -> Option<String> {
        path.map(|p| format!("{TMDB_IMAGE_BASE}/{size}{p}"))
    }

    /// Best image first: community vote, then resolution.
    fn pick_best(mut images: Vec<ImageRecord>) -> Option<ImageRecord> {
        images.sort_by(|a, b| {
            b.vote_average
                .partial_cmp(&a.vote_average)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.height.cmp(&a.height))
        });
        images.into_iter().next()
    }

    fn backdrop_from(images: Vec<ImageRecord>) -> Option<Backdrop> {
        Self::pick_best(images).map(|img| Backdrop {
            small: format!("{TMDB_IMAGE_BASE}/w780{}", img.file_path),
            large: format!("{TMDB_IMAGE_BASE}/w1280{}", img.file_path),
        })
    }

    /// Ascending by number, with the specials season (identified by name)
    /// moved to the end regardless of its numeric position.
    fn order_seasons(mut seasons: Vec<SeasonEntry>) -> Vec<SeasonEntry> {
        seasons.sort_by_key(|s| s.number);
        let (specials, mut ordered): (Vec<_>, Vec<_>) = seasons.into_iter().partition(|s| {
            s.name
                .as_deref()
                .is_some_and(|n| n.eq_ignore_ascii_case("specials"))
        });
        ordered.extend(specials);
        ordered
    }

    /// Keep trailers and teasers only.
    fn trailer_videos(videos: Option<VideoList>) -> Vec<Video> {
        videos
            .map(|list| {
                list.results
                    .into_iter()
                    .filter(|v| {
                        let kind = v.kind.to_lowercase();
                        kind == "trailer" || kind == "teaser"
                    })
                    .map(|v| Video {
                        name: v.name,
                        key: v.key,
                        site: v.site,
                        kind: v.kind,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// On-screen billing order; unbilled members go last.
    fn cast_list(mut cast: Vec<CastRecord>) -> Vec<CastMember> {
        cast.sort_by_key(|c| c.order.unwrap_or(u32::MAX));
        cast.into_iter()
            .map(|c| CastMember {
                tmdb_id: c.id,
                name: c.name,
                character: c.character,
                profile: Self::image_url(c.profile_path.as_deref(), "w200"),
                order: c.order,
                ids: None,
            })
            .collect()
    }

    async fn poster_with_details_fallback(&self, images_path: &str, details_path: &str) -> Outcome<String> {
        // The images listing is occasionally empty where the details call
        // still carries a poster, so try both.
        let images = collapse(
            self.request::<ImagesResponse>(images_path, &[("language", "en")])
                .await,
            "poster images",
        );
        if let Outcome::Found(res) = &images {
            if let Some(first) = res.posters.first() {
                return Outcome::Found(format!("{TMDB_IMAGE_BASE}/w780{}", first.file_path));
            }
        }
        if matches!(images, Outcome::Failed) {
            return Outcome::Failed;
        }

        let details = collapse(
            self.request::<serde_json::Value>(details_path, &[("language", "en")])
                .await,
            "poster details",
        );
        match details {
            Outcome::Found(value) => match value.get("poster_path").and_then(|p| p.as_str()) {
                Some(path) => Outcome::Found(format!("{TMDB_IMAGE_BASE}/w780{path}")),
                None => Outcome::Missing,
            },
            Outcome::Missing => Outcome::Missing,
            Outcome::Unauthenticated => Outcome::Unauthenticated,
            Outcome::Failed => Outcome::Failed,
        }
    }
}

#[async_trait]
impl CatalogClient for TmdbClient {
    async fn show_backdrop(&self, tmdb_id: u64) -> Outcome<Backdrop> {
        let path = format!("/tv/{tmdb_id}/images");
        let res = collapse(
            self.request::<ImagesResponse>(&path, &[("include_image_language", "null")])
                .await,
            "show backdrop",
        );
        match res {
            Outcome::Found(images) => match Self::backdrop_from(images.backdrops) {
                Some(b) => Outcome::Found(b),
                None => Outcome::Missing,
            },
            Outcome::Missing => Outcome::Missing,
            Outcome::Unauthenticated => Outcome::Unauthenticated,
            Outcome::Failed => Outcome::Failed,
        }
    }

    async fn movie_backdrop(&self, tmdb_id: u64) -> Outcome<Backdrop> {
        let path = format!("/movie/{tmdb_id}/images");
        let res = collapse(
            self.request::<ImagesResponse>(&path, &[("include_image_language", "null")])
                .await,
            "movie backdrop",
        );
        match res {
            Outcome::Found(images) => match Self::backdrop_from(images.backdrops) {
                Some(b) => Outcome::Found(b),
                None => Outcome::Missing,
            },
            Outcome::Missing => Outcome::Missing,
            Outcome::Unauthenticated => Outcome::Unauthenticated,
            Outcome::Failed => Outcome::Failed,
        }
    }

    async fn episode_still(&self, tmdb_id: u64, season: u32, number: u32) -> Outcome<Backdrop> {
        let path = format!("/tv/{tmdb_id}/season/{season}/episode/{number}/images");
        let res = collapse(
            self.request::<ImagesResponse>(&path, &[("include_image_language", "null")])
                .await,
            "episode still",
        );
        match res {
            Outcome::Found(images) => match Self::backdrop_from(images.stills) {
                Some(b) => Outcome::Found(b),
                None => Outcome::Missing,
            },
            Outcome::Missing => Outcome::Missing,
            Outcome::Unauthenticated => Outcome::Unauthenticated,
            Outcome::Failed => Outcome::Failed,
        }
    }

    async fn show_poster(&self, tmdb_id: u64) -> Outcome<String> {
        self.poster_with_details_fallback(&format!("/tv/{tmdb_id}/images"), &format!("/tv/{tmdb_id}"))
            .await
    }

    async fn season_poster(&self, tmdb_id: u64, season: u32) -> Outcome<String> {
        let path = format!("/tv/{tmdb_id}/season/{season}/images");
        let res = collapse(
            self.request::<ImagesResponse>(&path, &[("language", "en")]).await,
            "season poster",
        );
        match res {
            Outcome::Found(images) => match images.posters.first() {
                Some(first) => {
                    Outcome::Found(format!("{TMDB_IMAGE_BASE}/w780{}", first.file_path))
                }
                None => Outcome::Missing,
            },
            Outcome::Missing => Outcome::Missing,
            Outcome::Unauthenticated => Outcome::Unauthenticated,
            Outcome::Failed => Outcome::Failed,
        }
    }

    async fn movie_poster(&self, tmdb_id: u64) -> Outcome<String> {
        self.poster_with_details_fallback(
            &format!("/movie/{tmdb_id}/images"),
            &format!("/movie/{tmdb_id}"),
        )
        .await
    }

    async fn show_extras(&self, tmdb_id: u64) -> Outcome<ShowExtras> {
        let path = format!("/tv/{tmdb_id}");
        let res = collapse(
            self.request::<TvDetails>(&path, &[("append_to_response", "videos")])
                .await,
            "show extras",
        );
        res.map(|tv| {
            let seasons = tv
                .seasons
                .into_iter()
                .filter(|s| s.episode_count > 0)
                .map(|s| SeasonEntry {
                    number: s.season_number,
                    name: s.name,
                    overview: s.overview,
                    air_date: s.air_date,
                    episode_count: s.episode_count,
                    poster: Self::image_url(s.poster_path.as_deref(), "w200"),
                })
                .collect();
            ShowExtras {
                tmdb_rating: tv.vote_average,
                genres: tv.genres.into_iter().map(|g| g.name).collect(),
                status: tv.status,
                videos: Self::trailer_videos(tv.videos),
                seasons: Self::order_seasons(seasons),
            }
        })
    }

    async fn season_extras(&self, tmdb_id: u64, season: u32) -> Outcome<SeasonExtras> {
        let path = format!("/tv/{tmdb_id}/season/{season}");
        let res = collapse(self.request::<SeasonDetails>(&path, &[]).await, "season extras");
        res.map(|s| {
            let mut episodes: Vec<EpisodeEntry> = s
                .episodes
                .into_iter()
                .map(|e| EpisodeEntry {
                    season: e.season_number,
                    number: e.episode_number,
                    title: e.name,
                    air_date: e.air_date,
                    overview: e.overview,
                    still: Self::image_url(e.still_path.as_deref(), "w300"),
                    rating: e.vote_average,
                })
                .collect();
            episodes.sort_by_key(|e| e.number);
            SeasonExtras {
                name: s.name,
                overview: s.overview,
                air_date: s.air_date,
                poster: Self::image_url(s.poster_path.as_deref(), "w780"),
                episodes,
            }
        })
    }

    async fn episode_extras(
        &self,
        tmdb_id: u64,
        season: u32,
        number: u32,
    ) -> Outcome<EpisodeExtras> {
        let path = format!("/tv/{tmdb_id}/season/{season}/episode/{number}");
        let res = collapse(self.request::<EpisodeDetails>(&path, &[]).await, "episode extras");
        res.map(|e| EpisodeExtras {
            tmdb_rating: e.vote_average,
            overview: e.overview,
            air_date: e.air_date,
            still: Self::image_url(e.still_path.as_deref(), "w300"),
        })
    }

    async fn movie_extras(&self, tmdb_id: u64) -> Outcome<MovieExtras> {
        let path = format!("/movie/{tmdb_id}");
        let res = collapse(
            self.request::<MovieDetails>(&path, &[("append_to_response", "videos")])
                .await,
            "movie extras",
        );
        res.map(|movie| MovieExtras {
            tmdb_rating: movie.vote_average,
            genres: movie.genres.into_iter().map(|g| g.name).collect(),
            tagline: movie.tagline,
            videos: Self::trailer_videos(movie.videos),
            collection_id: movie.belongs_to_collection.map(|c| c.id),
        })
    }

    async fn show_cast(&self, tmdb_id: u64) -> Outcome<Vec<CastMember>> {
        let path = format!("/tv/{tmdb_id}/credits");
        collapse(self.request::<Credits>(&path, &[]).await, "show credits")
            .map(|c| Self::cast_list(c.cast))
    }

    async fn episode_cast(
        &self,
        tmdb_id: u64,
        season: u32,
        number: u32,
    ) -> Outcome<Vec<CastMember>> {
        let path = format!("/tv/{tmdb_id}/season/{season}/episode/{number}/credits");
        collapse(self.request::<Credits>(&path, &[]).await, "episode credits")
            .map(|c| Self::cast_list(c.cast))
    }

    async fn movie_cast(&self, tmdb_id: u64) -> Outcome<Vec<CastMember>> {
        let path = format!("/movie/{tmdb_id}/credits");
        collapse(self.request::<Credits>(&path, &[]).await, "movie credits")
            .map(|c| Self::cast_list(c.cast))
    }

    async fn movie_collection(&self, collection_id: u64) -> Outcome<MovieCollection> {
        let path = format!("/collection/{collection_id}");
        let res = collapse(self.request::<Collection>(&path, &[]).await, "movie collection");
        res.map(|c| MovieCollection {
            id: c.id,
            name: c.name,
            overview: c.overview,
            poster: Self::image_url(c.poster_path.as_deref(), "w780"),
            parts: c
                .parts
                .into_iter()
                .filter(|p| !p.release_date.is_empty())
                .map(|p| CollectionPart {
                    tmdb_id: p.id,
                    title: p.title,
                    release_date: p.release_date,
                    poster: Self::image_url(p.poster_path.as_deref(), "w200"),
                    slug: None,
                    watched: None,
                })
                .collect(),
        })
    }

    async fn multi_search(&self, query: &str, page: u32) -> Outcome<Vec<SearchHit>> {
        let page_str = page.to_string();
        let params = [
            ("query", query),
            ("page", page_str.as_str()),
            ("include_adult", "true"),
            ("language", "en-US"),
        ];
        let res = collapse(
            self.request::<MultiSearchResponse>("/search/multi", &params).await,
            "multi search",
        );
        res.map(|response| {
            response
                .results
                .into_iter()
                .filter_map(|r| {
                    let kind = match r.media_type.as_str() {
                        "tv" => MediaKind::Show,
                        "movie" => MediaKind::Movie,
                        _ => return None,
                    };
                    Some(SearchHit {
                        tmdb_id: r.id,
                        kind,
                        title: r.title.or(r.name).unwrap_or_default(),
                        poster: Self::image_url(r.poster_path.as_deref(), "w200"),
                        popularity: r.popularity,
                        ids: None,
                    })
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tmdb::api_types::VideoRecord;

    fn season(number: u32, name: &str) -> SeasonEntry {
        SeasonEntry {
            number,
            name: Some(name.to_string()),
            overview: None,
            air_date: None,
            episode_count: 1,
            poster: None,
        }
    }

    #[test]
    fn test_specials_season_moves_to_end() {
        let seasons = vec![
            season(1, "Season 1"),
            season(0, "Specials"),
            season(2, "Season 2"),
        ];
        let ordered = TmdbClient::order_seasons(seasons);
        let numbers: Vec<u32> = ordered.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 0]);
    }

    #[test]
    fn test_season_order_without_specials() {
        let seasons = vec![season(3, "Season 3"), season(1, "Season 1"), season(2, "Season 2")];
        let ordered = TmdbClient::order_seasons(seasons);
        let numbers: Vec<u32> = ordered.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_backdrop_prefers_votes_then_height() {
        let images = vec![
            ImageRecord {
                file_path: "/low.jpg".to_string(),
                vote_average: 4.0,
                height: 2160,
                iso_639_1: None,
            },
            ImageRecord {
                file_path: "/best.jpg".to_string(),
                vote_average: 8.0,
                height: 1080,
                iso_639_1: None,
            },
            ImageRecord {
                file_path: "/tall.jpg".to_string(),
                vote_average: 8.0,
                height: 2160,
                iso_639_1: None,
            },
        ];
        let backdrop = TmdbClient::backdrop_from(images).unwrap();
        assert_eq!(backdrop.small, "https://image.tmdb.org/t/p/w780/tall.jpg");
        assert_eq!(backdrop.large, "https://image.tmdb.org/t/p/w1280/tall.jpg");
    }

    #[test]
    fn test_video_filter_keeps_trailers_and_teasers() {
        let list = VideoList {
            results: vec![
                VideoRecord {
                    name: "Main Trailer".to_string(),
                    key: "abc".to_string(),
                    site: "YouTube".to_string(),
                    kind: "Trailer".to_string(),
                },
                VideoRecord {
                    name: "BTS".to_string(),
                    key: "def".to_string(),
                    site: "YouTube".to_string(),
                    kind: "Behind the Scenes".to_string(),
                },
                VideoRecord {
                    name: "Teaser".to_string(),
                    key: "ghi".to_string(),
                    site: "YouTube".to_string(),
                    kind: "Teaser".to_string(),
                },
            ],
        };
        let videos = TmdbClient::trailer_videos(Some(list));
        assert_eq!(videos.len(), 2);
        assert!(videos.iter().all(|v| v.kind != "Behind the Scenes"));
    }

    #[test]
    fn test_cast_billing_order() {
        let cast = vec![
            CastRecord {
                id: 2,
                name: "Second".to_string(),
                character: None,
                profile_path: None,
                order: Some(1),
            },
            CastRecord {
                id: 3,
                name: "Unbilled".to_string(),
                character: None,
                profile_path: None,
                order: None,
            },
            CastRecord {
                id: 1,
                name: "Lead".to_string(),
                character: None,
                profile_path: Some("/lead.jpg".to_string()),
                order: Some(0),
            },
        ];
        let members = TmdbClient::cast_list(cast);
        let ids: Vec<u64> = members.iter().map(|m| m.tmdb_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(
            members[0].profile.as_deref(),
            Some("https://image.tmdb.org/t/p/w200/lead.jpg")
        );
    }
}
