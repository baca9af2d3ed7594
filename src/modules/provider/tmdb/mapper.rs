/// Mapping from TMDB wire formats to the provider-agnostic domain types
use crate::modules::catalog::MediaType;
use crate::modules::provider::tmdb::models::{DetailsResponse, ListItem};
use crate::modules::provider::types::{PopularItem, TitleDetails, VideoRef};
use chrono::NaiveDate;

const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";
const BACKDROP_BASE: &str = "https://image.tmdb.org/t/p/w1280";

pub fn map_list_item(item: ListItem, media_type: MediaType) -> Option<PopularItem> {
    let title = match media_type {
        MediaType::Movie => item.title,
        MediaType::Series => item.name,
    }?;

    Some(PopularItem {
        external_id: item.id,
        title,
        media_type,
    })
}

pub fn map_details(details: DetailsResponse, media_type: MediaType) -> TitleDetails {
    let (title, date_str) = match media_type {
        MediaType::Movie => (details.title, details.release_date),
        MediaType::Series => (details.name, details.first_air_date),
    };

    // A series reports per-episode runtimes; the record keeps the first one.
    let runtime_minutes = match media_type {
        MediaType::Movie => details.runtime,
        MediaType::Series => details
            .episode_run_time
            .as_ref()
            .and_then(|r| r.first().copied()),
    };

    let videos = details
        .videos
        .map(|v| v.results)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|video| {
            Some(VideoRef {
                kind: video.r#type?,
                site: video.site?,
                key: video.key?,
            })
        })
        .collect();

    TitleDetails {
        external_id: details.id,
        media_type,
        title: title.unwrap_or_else(|| format!("Untitled #{}", details.id)),
        release_date: date_str.as_deref().and_then(parse_date),
        overview: details.overview.filter(|s| !s.is_empty()),
        poster_url: details.poster_path.map(|p| format!("{}{}", POSTER_BASE, p)),
        backdrop_url: details
            .backdrop_path
            .map(|p| format!("{}{}", BACKDROP_BASE, p)),
        rating: details.vote_average,
        genres: details
            .genres
            .unwrap_or_default()
            .into_iter()
            .map(|g| g.name)
            .collect(),
        runtime_minutes: match media_type {
            MediaType::Movie => runtime_minutes,
            MediaType::Series => None,
        },
        season_count: match media_type {
            MediaType::Series => details.number_of_seasons,
            MediaType::Movie => None,
        },
        episode_count: match media_type {
            MediaType::Series => details.number_of_episodes,
            MediaType::Movie => None,
        },
        videos,
    }
}

/// Pure trailer selection over already-fetched details: the first embedded
/// video that is a YouTube trailer. The provider-level search fallback is a
/// separate, explicit step.
pub fn find_trailer(details: &TitleDetails) -> Option<String> {
    details
        .videos
        .iter()
        .find(|v| v.kind == "Trailer" && v.site == "YouTube")
        .map(|v| youtube_url(&v.key))
}

pub fn youtube_url(key: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", key)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
