use super::api_types::{ArtImage, MovieArt, TvArt};
use crate::client::{collapse, ArtworkClient, HttpClient, Outcome};
use async_trait::async_trait;

const FANART_BASE_URL: &str = "https://webservice.fanart.tv/v3";

/// Fan-art image service client.
pub struct FanartClient {
    http: HttpClient,
    api_key: String,
}

impl FanartClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(FANART_BASE_URL),
            api_key: api_key.into(),
        }
    }

    async fn tv_art(&self, tvdb_id: u64) -> Outcome<TvArt> {
        let path = format!("/tv/{tvdb_id}");
        collapse(
            self.http.get(&path, &[("api_key", self.api_key.as_str())]).await,
            "tv art",
        )
    }

    async fn movie_art(&self, tmdb_id: u64) -> Outcome<MovieArt> {
        let path = format!("/movies/{tmdb_id}");
        collapse(
            self.http.get(&path, &[("api_key", self.api_key.as_str())]).await,
            "movie art",
        )
    }

    /// First English-language image, the service's own ordering otherwise
    /// left intact.
    fn english(items: &[ArtImage]) -> Option<String> {
        items
            .iter()
            .find(|i| i.lang.as_deref() == Some("en"))
            .map(|i| i.url.clone())
    }

    fn first(items: &[ArtImage]) -> Option<String> {
        items.first().map(|i| i.url.clone())
    }

    fn pick<T>(art: Outcome<T>, select: impl FnOnce(&T) -> Option<String>) -> Outcome<String> {
        match art {
            Outcome::Found(art) => match select(&art) {
                Some(url) => Outcome::Found(url),
                None => Outcome::Missing,
            },
            Outcome::Missing => Outcome::Missing,
            Outcome::Unauthenticated => Outcome::Unauthenticated,
            Outcome::Failed => Outcome::Failed,
        }
    }
}

#[async_trait]
impl ArtworkClient for FanartClient {
    async fn show_logo(&self, tvdb_id: u64) -> Outcome<String> {
        let art = self.tv_art(tvdb_id).await;
        Self::pick(art, |a| {
            // HD logo preferred, classic clear logo as the fallback set.
            Self::english(&a.hdtvlogo).or_else(|| Self::english(&a.clearlogo))
        })
    }

    async fn movie_logo(&self, tmdb_id: u64) -> Outcome<String> {
        let art = self.movie_art(tmdb_id).await;
        Self::pick(art, |a| Self::english(&a.hdmovielogo))
    }

    async fn show_thumb(&self, tvdb_id: u64) -> Outcome<String> {
        let art = self.tv_art(tvdb_id).await;
        Self::pick(art, |a| Self::first(&a.tvthumb))
    }

    async fn movie_thumb(&self, tmdb_id: u64) -> Outcome<String> {
        let art = self.movie_art(tmdb_id).await;
        Self::pick(art, |a| Self::first(&a.moviethumb))
    }
}
