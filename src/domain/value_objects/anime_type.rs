use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AnimeType {
    TV,
    Movie,
    OVA,
    Special,
    ONA,
    Music,
    #[default]
    Unknown,
}

impl AnimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimeType::TV => "TV",
            AnimeType::Movie => "Movie",
            AnimeType::OVA => "OVA",
            AnimeType::Special => "Special",
            AnimeType::ONA => "ONA",
            AnimeType::Music => "Music",
            AnimeType::Unknown => "Unknown",
        }
    }

    /// Jikan query parameter value (`type=tv` etc.); `Unknown` has no parameter.
    pub fn jikan_param(&self) -> Option<&'static str> {
        match self {
            AnimeType::TV => Some("tv"),
            AnimeType::Movie => Some("movie"),
            AnimeType::OVA => Some("ova"),
            AnimeType::Special => Some("special"),
            AnimeType::ONA => Some("ona"),
            AnimeType::Music => Some("music"),
            AnimeType::Unknown => None,
        }
    }

    /// AniList `MediaFormat` value for GraphQL variables.
    pub fn anilist_format(&self) -> Option<&'static str> {
        match self {
            AnimeType::TV => Some("TV"),
            AnimeType::Movie => Some("MOVIE"),
            AnimeType::OVA => Some("OVA"),
            AnimeType::Special => Some("SPECIAL"),
            AnimeType::ONA => Some("ONA"),
            AnimeType::Music => Some("MUSIC"),
            AnimeType::Unknown => None,
        }
    }

    /// Map an AniList `MediaFormat` back onto the shared enum.
    pub fn from_anilist_format(format: &str) -> Self {
        match format {
            "TV" | "TV_SHORT" => AnimeType::TV,
            "MOVIE" => AnimeType::Movie,
            "OVA" => AnimeType::OVA,
            "SPECIAL" => AnimeType::Special,
            "ONA" => AnimeType::ONA,
            "MUSIC" => AnimeType::Music,
            _ => AnimeType::Unknown,
        }
    }
}

impl fmt::Display for AnimeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for AnimeType {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "tv" => AnimeType::TV,
            "movie" => AnimeType::Movie,
            "ova" => AnimeType::OVA,
            "special" => AnimeType::Special,
            "ona" => AnimeType::ONA,
            "music" => AnimeType::Music,
            _ => AnimeType::Unknown,
        }
    }
}

impl From<String> for AnimeType {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl FromStr for AnimeType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}
