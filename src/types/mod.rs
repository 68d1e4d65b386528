mod card;
mod details;
mod ids;
mod listing;
mod progress;
mod ratings;
mod summary;

pub use card::MediaCard;
pub use details::{
    CastMember, CollectionPart, Comment, CommentThread, DetailRecord, EpisodeDetails,
    EpisodeEntry, EpisodeExtras, MovieCollection, MovieDetails, MovieExtras, SeasonDetails,
    SeasonEntry, SeasonExtras, ShowDetails, ShowExtras, Video,
};
pub use ids::MediaIds;
pub use listing::{ListedMedia, Paginated, SearchHit};
pub use progress::{EpisodeProgress, EpisodeWatched, SeasonProgress, WatchedMovie, WatchedProgress};
pub use ratings::{LikedComment, RatedEntry, RatingSet};
pub use summary::{Airs, EpisodeSummary, MovieSummary, SeasonSummary, ShowSummary};

use serde::{Deserialize, Serialize};

/// Bundled placeholder shown when neither the catalog nor the fan-art
/// service has an image for an item.
pub const FALLBACK_IMAGE: &str = "/assets/fallback-media.jpg";

/// Media kind classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Show,
    Season,
    Episode,
    Movie,
}

impl MediaKind {
    /// Plural form used in upstream URL paths ("shows", "episodes", ...)
    pub const fn plural(&self) -> &'static str {
        match self {
            Self::Show => "shows",
            Self::Season => "seasons",
            Self::Episode => "episodes",
            Self::Movie => "movies",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Show => write!(f, "show"),
            Self::Season => write!(f, "season"),
            Self::Episode => write!(f, "episode"),
            Self::Movie => write!(f, "movie"),
        }
    }
}

/// One image in two resolutions, small for grids and large for headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backdrop {
    pub small: String,
    pub large: String,
}

impl Backdrop {
    /// Both variants from a single URL (fan-art thumbs and placeholders
    /// come in one size only).
    pub fn single(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            small: url.clone(),
            large: url,
        }
    }
}
