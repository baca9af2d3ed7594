/// Diesel models for the content_records table
use crate::modules::catalog::domain::entities::{ContentRecord, MediaType, NewContentRecord};
use crate::schema::content_records;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Insertable, Debug)]
#[diesel(table_name = content_records)]
pub struct NewContentRecordModel {
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

impl From<NewContentRecord> for NewContentRecordModel {
    fn from(record: NewContentRecord) -> Self {
        Self {
            external_id: record.external_id,
            media_type: record.media_type,
            title: record.title,
            release_date: record.release_date,
            overview: record.overview,
            poster_url: record.poster_url,
            backdrop_url: record.backdrop_url,
            rating: record.rating,
            genres: record.genres,
            runtime_minutes: record.runtime_minutes,
            season_count: record.season_count,
            episode_count: record.episode_count,
            trailer_url: record.trailer_url,
            summary: record.summary,
            created_by_job: record.created_by_job,
        }
    }
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = content_records)]
pub struct ContentRecordModel {
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
    pub runtime_minutes: Option<i32>,
    pub season_count: Option<i32>,
    pub episode_count: Option<i32>,
    pub trailer_url: Option<String>,
    pub summary: Option<String>,
    pub created_by_job: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl ContentRecordModel {
    /// Convert to domain ContentRecord
    pub fn to_record(self) -> ContentRecord {
        ContentRecord {
            id: self.id,
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
            trailer_url: self.trailer_url,
            summary: self.summary,
            created_by_job: self.created_by_job,
            created_at: self.created_at,
        }
    }
}
