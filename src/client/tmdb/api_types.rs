use serde::Deserialize;

// Image listings
#[derive(Debug, Default, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub backdrops: Vec<ImageRecord>,
    #[serde(default)]
    pub posters: Vec<ImageRecord>,
    #[serde(default)]
    pub stills: Vec<ImageRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageRecord {
    pub file_path: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub iso_639_1: Option<String>,
}

// Detail responses
#[derive(Debug, Deserialize)]
pub struct TvDetails {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub videos: Option<VideoList>,
}

#[derive(Debug, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub videos: Option<VideoList>,
    #[serde(default)]
    pub belongs_to_collection: Option<CollectionRef>,
}

#[derive(Debug, Deserialize)]
pub struct SeasonDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Deserialize)]
pub struct EpisodeDetails {
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub still_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

// Common types
#[derive(Debug, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Season {
    pub season_number: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub episode_count: u32,
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Episode {
    pub season_number: u32,
    pub episode_number: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub still_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<VideoRecord>,
}

#[derive(Debug, Deserialize)]
pub struct VideoRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct CollectionRef {
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastRecord>,
}

#[derive(Debug, Deserialize)]
pub struct CastRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
}

// Collections
#[derive(Debug, Deserialize)]
pub struct Collection {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub parts: Vec<CollectionPartRecord>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionPartRecord {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

// Multi-search
#[derive(Debug, Deserialize)]
pub struct MultiSearchResponse {
    #[serde(default)]
    pub results: Vec<MultiSearchRecord>,
}

#[derive(Debug, Deserialize)]
pub struct MultiSearchRecord {
    pub id: u64,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
}
