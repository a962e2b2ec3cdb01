use std::str::FromStr;

/// Outcome of parsing one optional field from untyped input.
///
/// "Field absent" and "field present but malformed" both exclude a row from
/// scoring, but diagnostics need to tell them apart, so neither is collapsed
/// into the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedField<T> {
    Present(T),
    Absent,
    Malformed(String),
}

impl<T> ParsedField<T> {
    /// Parse a raw string field: empty or whitespace-only input is `Absent`,
    /// unparsable input is `Malformed` carrying the offending text.
    pub fn parse(raw: &str) -> Self
    where
        T: FromStr,
    {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return ParsedField::Absent;
        }
        match trimmed.parse::<T>() {
            Ok(value) => ParsedField::Present(value),
            Err(_) => ParsedField::Malformed(trimmed.to_string()),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ParsedField::Malformed(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            ParsedField::Present(value) => Some(value),
            _ => None,
        }
    }
}
