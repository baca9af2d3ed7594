/// Domain entities for the content catalog
///
/// A ContentRecord is the canonical, deduplicated representation of one
/// movie or series imported from the metadata provider. The dedup key is
/// the (external_id, media_type) pair.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Media classification, half of the dedup key alongside the external ID.
#[derive(
    diesel_derive_enum::DbEnum,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::MediaType"]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Movie => write!(f, "movie"),
            MediaType::Series => write!(f, "series"),
        }
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(MediaType::Movie),
            "series" | "tv" => Ok(MediaType::Series),
            _ => Err(format!("Invalid media type: {}", s)),
        }
    }
}

/// Canonical stored record for one title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: Uuid,
    pub external_id: i32,
    pub media_type: MediaType,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub rating: Option<f32>,
    pub genres: Vec<String>,
    /// Movie only.
    pub runtime_minutes: Option<i32>,
    /// Series only.
    pub season_count: Option<i32>,
    pub episode_count: Option<i32>,
    pub trailer_url: Option<String>,
    pub summary: Option<String>,
    /// Back-reference to the job that created the record, traceability only.
    pub created_by_job: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A record ready for insertion (id and created_at assigned by the store).
#[derive(Debug, Clone)]
pub struct NewContentRecord {
    pub external_id: i32,
    pub media_type: MediaType,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub rating: Option<f32>,
    pub genres: Vec<String>,
    pub runtime_minutes: Option<i32>,
    pub season_count: Option<i32>,
    pub episode_count: Option<i32>,
    pub trailer_url: Option<String>,
    pub summary: Option<String>,
    pub created_by_job: Option<Uuid>,
}
