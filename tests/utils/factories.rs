/// Test data factories with sensible defaults
use chrono::NaiveDate;
use cinefeed::modules::catalog::{MediaType, NewContentRecord};
use cinefeed::modules::provider::{PopularItem, TitleDetails, VideoRef};

pub struct DetailsFactory {
    external_id: i32,
    media_type: MediaType,
    title: String,
    release_date: Option<NaiveDate>,
    rating: Option<f32>,
    genres: Vec<String>,
    videos: Vec<VideoRef>,
}

impl DetailsFactory {
    pub fn movie(external_id: i32) -> Self {
        Self {
            external_id,
            media_type: MediaType::Movie,
            title: format!("Movie {}", external_id),
            release_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            rating: Some(7.2),
            genres: vec!["Drama".to_string()],
            videos: Vec::new(),
        }
    }

    pub fn series(external_id: i32) -> Self {
        Self {
            media_type: MediaType::Series,
            title: format!("Series {}", external_id),
            ..Self::movie(external_id)
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_trailer(mut self, key: &str) -> Self {
        self.videos.push(VideoRef {
            kind: "Trailer".to_string(),
            site: "YouTube".to_string(),
            key: key.to_string(),
        });
        self
    }

    pub fn build(self) -> TitleDetails {
        let is_series = self.media_type == MediaType::Series;
        TitleDetails {
            external_id: self.external_id,
            media_type: self.media_type,
            title: self.title,
            release_date: self.release_date,
            overview: Some("An overview.".to_string()),
            poster_url: None,
            backdrop_url: None,
            rating: self.rating,
            genres: self.genres,
            runtime_minutes: if is_series { None } else { Some(110) },
            season_count: if is_series { Some(2) } else { None },
            episode_count: if is_series { Some(16) } else { None },
            videos: self.videos,
        }
    }
}

pub fn popular_items(media_type: MediaType, external_ids: &[i32]) -> Vec<PopularItem> {
    external_ids
        .iter()
        .map(|id| PopularItem {
            external_id: *id,
            title: format!("Title {}", id),
            media_type,
        })
        .collect()
}

/// Minimal record for pre-seeding a catalog fake.
pub fn seed_record(external_id: i32, media_type: MediaType) -> NewContentRecord {
    NewContentRecord {
        external_id,
        media_type,
        title: format!("Seeded {}", external_id),
        release_date: None,
        overview: None,
        poster_url: None,
        backdrop_url: None,
        rating: None,
        genres: Vec::new(),
        runtime_minutes: None,
        season_count: None,
        episode_count: None,
        trailer_url: None,
        summary: None,
        created_by_job: None,
    }
}
