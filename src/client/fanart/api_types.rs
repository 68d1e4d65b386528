use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ArtImage {
    pub url: String,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub likes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TvArt {
    #[serde(default)]
    pub hdtvlogo: Vec<ArtImage>,
    #[serde(default)]
    pub clearlogo: Vec<ArtImage>,
    #[serde(default)]
    pub tvthumb: Vec<ArtImage>,
    #[serde(default)]
    pub tvbanner: Vec<ArtImage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MovieArt {
    #[serde(default)]
    pub hdmovielogo: Vec<ArtImage>,
    #[serde(default)]
    pub moviethumb: Vec<ArtImage>,
}
