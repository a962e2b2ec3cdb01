use chrono::Datelike;

use super::dto::JikanAnime;
use crate::domain::entities::{dedup_genres, AnimeRecord};
use crate::domain::value_objects::{AnimeStatus, AnimeType};

pub struct JikanMapper;

impl JikanMapper {
    pub fn to_record(anime: JikanAnime) -> AnimeRecord {
        let year = anime
            .year
            .or_else(|| Self::year_from_aired(anime.aired.as_ref().and_then(|a| a.from.as_deref())));

        // Genres, themes and demographics all behave as genre tokens for
        // filtering purposes.
        let genres = dedup_genres(
            anime
                .genres
                .iter()
                .chain(&anime.themes)
                .chain(&anime.demographics)
                .map(|g| g.name.clone())
                .collect(),
        );

        AnimeRecord {
            mal_id: Some(anime.mal_id),
            title: anime.title.unwrap_or_default(),
            title_english: anime.title_english,
            anime_type: anime
                .anime_type
                .as_deref()
                .map(AnimeType::from)
                .unwrap_or_default(),
            status: anime
                .status
                .as_deref()
                .map(AnimeStatus::from)
                .unwrap_or_default(),
            year,
            episodes: anime.episodes,
            duration_min: anime.duration.as_deref().and_then(parse_duration_minutes),
            genres,
            studios: anime.studios.into_iter().map(|s| s.name).collect(),
            score: anime.score,
            scored_by: anime.scored_by,
            rank: anime.rank,
            popularity_rank: anime.popularity,
            members: anime.members,
            favorites: anime.favorites,
            url: anime.url,
            ..Default::default()
        }
    }

    /// Jikan sometimes omits `year` while still carrying an RFC 3339
    /// aired-from date; fall back to that date's year.
    fn year_from_aired(aired_from: Option<&str>) -> Option<i32> {
        let raw = aired_from?;
        chrono::DateTime::parse_from_rfc3339(raw)
            .map(|date| date.year())
            .ok()
    }
}

/// Parse Jikan's free-text duration ("24 min per ep", "1 hr 30 min", "52
/// sec") into whole minutes. Unrecognized text yields `None`, never zero.
pub fn parse_duration_minutes(text: &str) -> Option<u32> {
    let mut minutes: u32 = 0;
    let mut matched = false;
    let tokens: Vec<&str> = text.split_whitespace().collect();

    for window in tokens.windows(2) {
        let Ok(value) = window[0].parse::<u32>() else {
            continue;
        };
        match window[1].trim_end_matches('.') {
            "hr" | "hour" | "hours" => {
                minutes += value * 60;
                matched = true;
            }
            "min" | "mins" | "minute" | "minutes" => {
                minutes += value;
                matched = true;
            }
            "sec" | "secs" | "second" | "seconds" => {
                // sub-minute entries round down to zero but still count as parsed
                matched = true;
            }
            _ => {}
        }
    }

    matched.then_some(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::external::jikan::dto::{JikanAired, JikanNamed};

    fn base_anime() -> JikanAnime {
        serde_json::from_value(serde_json::json!({
            "mal_id": 5114,
            "title": "Fullmetal Alchemist: Brotherhood",
            "type": "TV",
            "status": "Finished Airing",
            "episodes": 64,
            "score": 9.1,
            "scored_by": 2_000_000u64,
            "members": 3_200_000u64,
            "favorites": 220_000u64,
            "year": 2009
        }))
        .unwrap()
    }

    #[test]
    fn maps_core_fields() {
        let record = JikanMapper::to_record(base_anime());
        assert_eq!(record.mal_id, Some(5114));
        assert_eq!(record.anime_type, AnimeType::TV);
        assert_eq!(record.status, AnimeStatus::Finished);
        assert_eq!(record.year, Some(2009));
        assert_eq!(record.scored_by, Some(2_000_000));
        assert_eq!(record.anilist_id, None);
        assert_eq!(record.score_anilist, None);
    }

    #[test]
    fn year_falls_back_to_aired_from() {
        let mut anime = base_anime();
        anime.year = None;
        anime.aired = Some(JikanAired {
            from: Some("2009-04-05T00:00:00+00:00".to_string()),
            to: None,
        });
        let record = JikanMapper::to_record(anime);
        assert_eq!(record.year, Some(2009));
    }

    #[test]
    fn unparsable_aired_from_leaves_year_absent() {
        let mut anime = base_anime();
        anime.year = None;
        anime.aired = Some(JikanAired {
            from: Some("unknown".to_string()),
            to: None,
        });
        assert_eq!(JikanMapper::to_record(anime).year, None);
    }

    #[test]
    fn genre_buckets_are_merged_and_deduped() {
        let mut anime = base_anime();
        anime.genres = vec![JikanNamed {
            mal_id: 1,
            name: "Action".to_string(),
        }];
        anime.themes = vec![JikanNamed {
            mal_id: 38,
            name: "Military".to_string(),
        }];
        anime.demographics = vec![JikanNamed {
            mal_id: 27,
            name: "action".to_string(),
        }];
        let record = JikanMapper::to_record(anime);
        assert_eq!(record.genres, vec!["Action", "Military"]);
    }

    #[test]
    fn duration_parsing() {
        assert_eq!(parse_duration_minutes("24 min per ep"), Some(24));
        assert_eq!(parse_duration_minutes("1 hr 30 min"), Some(90));
        assert_eq!(parse_duration_minutes("2 hr"), Some(120));
        assert_eq!(parse_duration_minutes("52 sec"), Some(0));
        assert_eq!(parse_duration_minutes("Unknown"), None);
        assert_eq!(parse_duration_minutes(""), None);
    }
}
