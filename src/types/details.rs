use super::{
    Backdrop, EpisodeSummary, EpisodeWatched, MediaIds, MovieSummary, SeasonSummary, ShowSummary,
    WatchedMovie, WatchedProgress,
};
use serde::{Deserialize, Serialize};

/// Trailer or teaser entry from the catalog service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub name: String,
    /// Site-specific video key (YouTube id for the common case)
    pub key: String,
    pub site: String,
    /// "Trailer" or "Teaser"; everything else is filtered at the client
    pub kind: String,
}

/// Cast entry in on-screen billing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub tmdb_id: u64,
    pub name: String,
    pub character: Option<String>,
    pub profile: Option<String>,
    pub order: Option<u32>,
    /// Cross-service ids, resolved per member; `None` when that member's
    /// lookup failed (the rest of the list is unaffected)
    pub ids: Option<MediaIds>,
}

/// One comment, enriched with the author's avatar during detail aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_slug: Option<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub spoiler: bool,
    #[serde(default)]
    pub review: bool,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub replies: u64,
    #[serde(default)]
    pub user_rating: Option<u8>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Filled during enrichment; a failed author lookup falls back to a
    /// default avatar rather than dropping the comment
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Comment thread with the upstream total (the thread itself may be one page).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentThread {
    pub total: u64,
    pub comments: Vec<Comment>,
}

/// Season row in a show's season listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonEntry {
    pub number: u32,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub episode_count: u32,
    pub poster: Option<String>,
}

/// Episode row in a season's episode listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeEntry {
    pub season: u32,
    pub number: u32,
    pub title: Option<String>,
    pub air_date: Option<String>,
    pub overview: Option<String>,
    pub still: Option<String>,
    pub rating: Option<f64>,
}

/// Catalog-side show data merged into cards and details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowExtras {
    pub tmdb_rating: Option<f64>,
    pub genres: Vec<String>,
    pub status: Option<String>,
    /// Trailer/teaser videos only
    pub videos: Vec<Video>,
    /// Ascending by number, specials season last
    pub seasons: Vec<SeasonEntry>,
}

/// Catalog-side season data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonExtras {
    pub name: Option<String>,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub poster: Option<String>,
    /// Ascending by episode number
    pub episodes: Vec<EpisodeEntry>,
}

/// Catalog-side episode data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeExtras {
    pub tmdb_rating: Option<f64>,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub still: Option<String>,
}

/// Catalog-side movie data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieExtras {
    pub tmdb_rating: Option<f64>,
    pub genres: Vec<String>,
    pub tagline: Option<String>,
    pub videos: Vec<Video>,
    /// Catalog collection the movie belongs to, if any
    pub collection_id: Option<u64>,
}

/// Full view model for a show's dedicated page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowDetails {
    pub show: ShowSummary,
    pub backdrop: Backdrop,
    pub poster: Option<String>,
    pub clear_logo: Option<String>,
    pub imdb_rating: Option<String>,
    pub trakt_rating: Option<String>,
    pub tmdb_rating: Option<String>,
    pub my_rating: Option<u8>,
    pub extras: Option<ShowExtras>,
    pub actors: Vec<CastMember>,
    pub reviews: CommentThread,
    pub watched_progress: Option<WatchedProgress>,
}

/// Full view model for a movie's dedicated page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub movie: MovieSummary,
    pub backdrop: Backdrop,
    pub poster: Option<String>,
    pub clear_logo: Option<String>,
    pub imdb_rating: Option<String>,
    pub trakt_rating: Option<String>,
    pub tmdb_rating: Option<String>,
    pub my_rating: Option<u8>,
    pub extras: Option<MovieExtras>,
    pub actors: Vec<CastMember>,
    pub reviews: CommentThread,
    pub watched: Option<WatchedMovie>,
}

/// Full view model for a season page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonDetails {
    pub show: ShowSummary,
    pub season: SeasonSummary,
    pub backdrop: Backdrop,
    pub poster: Option<String>,
    pub clear_logo: Option<String>,
    pub trakt_rating: Option<String>,
    pub my_rating: Option<u8>,
    pub extras: Option<SeasonExtras>,
    pub reviews: CommentThread,
}

/// Full view model for an episode page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeDetails {
    pub show: ShowSummary,
    pub episode: EpisodeSummary,
    pub backdrop: Backdrop,
    pub season_poster: Option<String>,
    pub clear_logo: Option<String>,
    pub imdb_rating: Option<String>,
    pub trakt_rating: Option<String>,
    pub tmdb_rating: Option<String>,
    pub my_rating: Option<u8>,
    pub extras: Option<EpisodeExtras>,
    pub actors: Vec<CastMember>,
    pub reviews: CommentThread,
    pub watched: Option<EpisodeWatched>,
}

/// Cached detail record, one variant per media kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DetailRecord {
    Show(ShowDetails),
    Movie(MovieDetails),
    Season(SeasonDetails),
    Episode(EpisodeDetails),
}

impl DetailRecord {
    pub fn as_show(&self) -> Option<&ShowDetails> {
        match self {
            Self::Show(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_movie(&self) -> Option<&MovieDetails> {
        match self {
            Self::Movie(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_season(&self) -> Option<&SeasonDetails> {
        match self {
            Self::Season(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_episode(&self) -> Option<&EpisodeDetails> {
        match self {
            Self::Episode(d) => Some(d),
            _ => None,
        }
    }
}

/// Movie collection with per-part tracking slugs and watched state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieCollection {
    pub id: u64,
    pub name: String,
    pub overview: Option<String>,
    pub poster: Option<String>,
    /// Ascending by release date; parts without a release date are dropped
    pub parts: Vec<CollectionPart>,
}

/// One movie inside a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionPart {
    pub tmdb_id: u64,
    pub title: String,
    pub release_date: String,
    pub poster: Option<String>,
    /// Tracking slug, resolved per part; `None` when that lookup failed
    pub slug: Option<String>,
    pub watched: Option<WatchedMovie>,
}
