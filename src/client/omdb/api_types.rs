use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct OmdbRecord {
    #[serde(rename = "Response", default)]
    pub response: String,
    #[serde(rename = "Ratings", default)]
    pub ratings: Vec<OmdbRating>,
}

#[derive(Debug, Deserialize)]
pub struct OmdbRating {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Value")]
    pub value: String,
}
