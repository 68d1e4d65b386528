mod http;
mod traits;

pub mod fanart;
pub mod omdb;
pub mod tmdb;
pub mod trakt;

pub use fanart::FanartClient;
pub use http::{HttpClient, ResponseMeta};
pub use omdb::OmdbClient;
pub use tmdb::TmdbClient;
pub use traits::{ArtworkClient, CatalogClient, CommentTarget, PageRequest, RatingsClient, TrackingClient};
pub use trakt::TraktClient;

/// Tagged outcome of a single upstream call.
///
/// Transport errors never cross this boundary as errors: every client
/// collapses them here, so the aggregator can merge partial results without
/// error plumbing while tests can still tell "not found" from "failed".
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The call succeeded and the payload was present
    Found(T),
    /// Upstream 404 or the payload lacked the requested data
    Missing,
    /// The call requires a session and none is present; no network round
    /// trip was made
    Unauthenticated,
    /// Transport or API failure, already logged at the client
    Failed,
}

impl<T> Outcome<T> {
    /// Collapse to an `Option`, the aggregator's merge-boundary view.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Found(v) => Outcome::Found(f(v)),
            Self::Missing => Outcome::Missing,
            Self::Unauthenticated => Outcome::Unauthenticated,
            Self::Failed => Outcome::Failed,
        }
    }
}

/// Collapse a transport result into an [`Outcome`], logging failures.
pub(crate) fn collapse<T>(res: crate::Result<T>, call: &str) -> Outcome<T> {
    match res {
        Ok(v) => Outcome::Found(v),
        Err(e) if e.is_not_found() => {
            tracing::debug!("{call}: not found");
            Outcome::Missing
        }
        Err(e) => {
            tracing::warn!("{call} failed: {e}");
            Outcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_not_found() {
        let res: crate::Result<u32> = Err(crate::Error::Api {
            status: 404,
            message: String::new(),
        });
        assert_eq!(collapse(res, "probe"), Outcome::Missing);
    }

    #[test]
    fn test_collapse_failure() {
        let res: crate::Result<u32> = Err(crate::Error::Parse("bad json".to_string()));
        assert_eq!(collapse(res, "probe"), Outcome::Failed);
    }

    #[test]
    fn test_found_collapses_to_some() {
        assert_eq!(Outcome::Found(3).found(), Some(3));
        assert_eq!(Outcome::<u32>::Missing.found(), None);
        assert_eq!(Outcome::<u32>::Failed.found(), None);
    }
}
