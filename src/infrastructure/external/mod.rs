pub mod anilist;
pub mod jikan;
