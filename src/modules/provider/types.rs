/// Provider-facing domain types
///
/// These are the mapped, provider-agnostic shapes the import pipeline works
/// with; the raw TMDB wire formats live in `tmdb::models`.
use crate::modules::catalog::{MediaType, NewContentRecord};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of a popularity list: just enough to enumerate candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularItem {
    pub external_id: i32,
    pub title: String,
    pub media_type: MediaType,
}

/// A promotional video attached to a title's details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRef {
    pub kind: String,
    pub site: String,
    pub key: String,
}

/// Full per-title details as fetched from the provider. Optional fields
/// reflect the wire format: their absence is tolerated, never fatal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleDetails {
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
    pub videos: Vec<VideoRef>,
}

impl TitleDetails {
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|d| d.year())
    }

    /// Build the insertable record; trailer and summary are resolved by the
    /// worker as explicit steps and passed in here.
    pub fn into_record(
        self,
        trailer_url: Option<String>,
        summary: Option<String>,
        created_by_job: Option<Uuid>,
    ) -> NewContentRecord {
        NewContentRecord {
            external_id: self.external_id,
            media_type: self.media_type,
            title: self.title,
            release_date: self.release_date,
            overview: self.overview,
            poster_url: self.poster_url,
            backdrop_url: self.backdrop_url,
            rating: self.rating,
            genres: self.genres,
            runtime_minutes: self.runtime_minutes,
            season_count: self.season_count,
            episode_count: self.episode_count,
            trailer_url,
            summary,
            created_by_job,
        }
    }
}
