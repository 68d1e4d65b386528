use crate::types::{Comment, EpisodeSummary, LikedComment, MediaIds, MovieSummary, ShowSummary};
use serde::Deserialize;

// OAuth
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime in seconds from `created_at`
    pub expires_in: i64,
    /// Unix timestamp of issuance
    pub created_at: i64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

// Users
#[derive(Debug, Clone, Deserialize)]
pub struct UserSettings {
    pub user: UserProfile,
}

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize, PartialEq)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ids: UserIds,
    #[serde(default)]
    pub images: Option<UserImages>,
    #[serde(default)]
    pub gender: Option<String>,
}

impl UserProfile {
    pub fn avatar(&self) -> Option<String> {
        self.images.as_ref().map(|i| i.avatar.full.clone())
    }
}

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize, PartialEq)]
pub struct UserIds {
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize, PartialEq)]
pub struct UserImages {
    #[serde(default)]
    pub avatar: AvatarImage,
}

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize, PartialEq)]
pub struct AvatarImage {
    #[serde(default)]
    pub full: String,
}

// Ratings
#[derive(Debug, Deserialize)]
pub struct CommunityRating {
    pub rating: f64,
    #[serde(default)]
    pub votes: u64,
}

// Comments
#[derive(Debug, Deserialize)]
pub struct RawComment {
    pub id: u64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub spoiler: bool,
    #[serde(default)]
    pub review: bool,
    #[serde(default)]
    pub replies: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub user_rating: Option<u8>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub user: Option<CommentUser>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub ids: UserIds,
}

impl From<RawComment> for Comment {
    fn from(raw: RawComment) -> Self {
        let (author, author_slug) = match raw.user {
            Some(u) => (u.username, u.ids.slug),
            None => (String::new(), None),
        };
        Comment {
            id: raw.id,
            author,
            author_slug,
            comment: raw.comment,
            spoiler: raw.spoiler,
            review: raw.review,
            likes: raw.likes,
            replies: raw.replies,
            user_rating: raw.user_rating,
            created_at: raw.created_at,
            avatar: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawLikedComment {
    #[serde(default)]
    pub liked_at: Option<String>,
    pub comment: RawComment,
}

impl From<RawLikedComment> for LikedComment {
    fn from(raw: RawLikedComment) -> Self {
        LikedComment {
            liked_at: raw.liked_at,
            comment: raw.comment.into(),
        }
    }
}

// Cross-reference search rows
#[derive(Debug, Deserialize)]
pub struct LookupRow {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub show: Option<ShowSummary>,
    #[serde(default)]
    pub movie: Option<MovieSummary>,
    #[serde(default)]
    pub episode: Option<EpisodeSummary>,
    #[serde(default)]
    pub person: Option<PersonRef>,
}

impl LookupRow {
    /// The ids of whichever payload matches the row's declared type.
    pub fn ids(&self) -> Option<MediaIds> {
        match self.kind.as_str() {
            "show" => self.show.as_ref().map(|s| s.ids.clone()),
            "movie" => self.movie.as_ref().map(|m| m.ids.clone()),
            "episode" => self.episode.as_ref().map(|e| e.ids.clone()),
            "person" => self.person.as_ref().map(|p| p.ids.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PersonRef {
    pub name: String,
    #[serde(default)]
    pub ids: MediaIds,
}
