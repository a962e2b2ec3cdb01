use super::dto::AniListMedia;
use crate::domain::entities::AnimeRecord;
use crate::domain::value_objects::{AnimeStatus, AnimeType};

pub struct AniListMapper;

impl AniListMapper {
    pub fn to_record(media: AniListMedia) -> AnimeRecord {
        let title = media.title.as_ref();
        // Title preference: english, then romaji, then native
        let display_title = title
            .and_then(|t| t.english.clone())
            .or_else(|| title.and_then(|t| t.romaji.clone()))
            .or_else(|| title.and_then(|t| t.native.clone()))
            .unwrap_or_default();
        let year = media
            .season_year
            .or(media.start_date.as_ref().and_then(|d| d.year));

        AnimeRecord {
            mal_id: media.id_mal,
            anilist_id: Some(media.id),
            title: display_title,
            title_romaji: title.and_then(|t| t.romaji.clone()),
            anime_type: media
                .format
                .as_deref()
                .map(AnimeType::from_anilist_format)
                .unwrap_or_default(),
            status: media
                .status
                .as_deref()
                .map(AnimeStatus::from_anilist_status)
                .unwrap_or_default(),
            year,
            episodes: media.episodes,
            duration_min: media.duration,
            score_anilist: media.average_score.map(|s| s / 10.0),
            popularity_anilist: media.popularity,
            favourites_anilist: media.favourites,
            url_anilist: media.site_url,
            ..Default::default()
        }
    }
}
