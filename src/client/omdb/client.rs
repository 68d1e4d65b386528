use super::api_types::{OmdbRating, OmdbRecord};
use crate::client::{collapse, HttpClient, Outcome, RatingsClient};
use async_trait::async_trait;

const OMDB_BASE_URL: &str = "https://www.omdbapi.com";

/// Legacy ratings-lookup client; one operation, keyed by IMDb id.
pub struct OmdbClient {
    http: HttpClient,
    api_key: String,
}

impl OmdbClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(OMDB_BASE_URL),
            api_key: api_key.into(),
        }
    }

    /// "8.5/10" -> "8.5"; the first listed rating is the IMDb one.
    fn first_rating(ratings: &[OmdbRating]) -> Option<String> {
        ratings
            .first()
            .and_then(|r| r.value.split('/').next())
            .map(str::to_string)
    }
}

#[async_trait]
impl RatingsClient for OmdbClient {
    async fn imdb_rating(&self, imdb_id: &str) -> Outcome<String> {
        let params = [("apikey", self.api_key.as_str()), ("i", imdb_id)];
        let res = collapse(
            self.http.get::<OmdbRecord>("/", &params).await,
            "imdb rating",
        );
        match res {
            Outcome::Found(record) => {
                // The service reports lookup misses inside a 200 response.
                if record.response.eq_ignore_ascii_case("false") {
                    return Outcome::Missing;
                }
                match Self::first_rating(&record.ratings) {
                    Some(value) => Outcome::Found(value),
                    None => Outcome::Missing,
                }
            }
            Outcome::Missing => Outcome::Missing,
            Outcome::Unauthenticated => Outcome::Unauthenticated,
            Outcome::Failed => Outcome::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_reshape() {
        let ratings = vec![OmdbRating {
            source: "Internet Movie Database".to_string(),
            value: "8.5/10".to_string(),
        }];
        assert_eq!(OmdbClient::first_rating(&ratings).as_deref(), Some("8.5"));
    }

    #[test]
    fn test_empty_ratings() {
        assert!(OmdbClient::first_rating(&[]).is_none());
    }
}
