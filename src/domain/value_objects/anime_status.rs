use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnimeStatus {
    Airing,
    Finished,
    NotYetAired,
    Cancelled,
    #[default]
    Unknown,
}

impl AnimeStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            AnimeStatus::Airing => "Currently Airing",
            AnimeStatus::Finished => "Finished Airing",
            AnimeStatus::NotYetAired => "Not Yet Aired",
            AnimeStatus::Cancelled => "Cancelled",
            AnimeStatus::Unknown => "Unknown",
        }
    }

    /// Jikan query parameter value (`status=airing|complete|upcoming`).
    pub fn jikan_param(&self) -> Option<&'static str> {
        match self {
            AnimeStatus::Airing => Some("airing"),
            AnimeStatus::Finished => Some("complete"),
            AnimeStatus::NotYetAired => Some("upcoming"),
            AnimeStatus::Cancelled | AnimeStatus::Unknown => None,
        }
    }

    /// AniList `MediaStatus` value for GraphQL variables.
    pub fn anilist_status(&self) -> Option<&'static str> {
        match self {
            AnimeStatus::Airing => Some("RELEASING"),
            AnimeStatus::Finished => Some("FINISHED"),
            AnimeStatus::NotYetAired => Some("NOT_YET_RELEASED"),
            AnimeStatus::Cancelled => Some("CANCELLED"),
            AnimeStatus::Unknown => None,
        }
    }

    /// Map an AniList `MediaStatus` back onto the shared enum.
    pub fn from_anilist_status(status: &str) -> Self {
        match status {
            "RELEASING" => AnimeStatus::Airing,
            "FINISHED" => AnimeStatus::Finished,
            "NOT_YET_RELEASED" => AnimeStatus::NotYetAired,
            "CANCELLED" => AnimeStatus::Cancelled,
            _ => AnimeStatus::Unknown,
        }
    }
}

impl fmt::Display for AnimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl From<&str> for AnimeStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "currently airing" | "airing" => AnimeStatus::Airing,
            "finished airing" | "finished" | "complete" => AnimeStatus::Finished,
            "not yet aired" | "not_yet_aired" | "upcoming" => AnimeStatus::NotYetAired,
            "cancelled" => AnimeStatus::Cancelled,
            _ => AnimeStatus::Unknown,
        }
    }
}

impl From<String> for AnimeStatus {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl FromStr for AnimeStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_jikan_and_cli_spellings() {
        assert_eq!(AnimeStatus::from("Currently Airing"), AnimeStatus::Airing);
        assert_eq!(AnimeStatus::from("complete"), AnimeStatus::Finished);
        assert_eq!(AnimeStatus::from("upcoming"), AnimeStatus::NotYetAired);
    }

    #[test]
    fn anilist_mapping() {
        assert_eq!(
            AnimeStatus::from_anilist_status("RELEASING"),
            AnimeStatus::Airing
        );
        assert_eq!(AnimeStatus::Finished.anilist_status(), Some("FINISHED"));
        assert_eq!(AnimeStatus::Unknown.jikan_param(), None);
    }
}
