mod anime_record;

pub use anime_record::{dedup_genres, normalize_title, AnimeRecord};
