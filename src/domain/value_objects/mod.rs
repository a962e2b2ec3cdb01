mod anime_status;
mod anime_type;
mod parsed_field;

pub use anime_status::AnimeStatus;
pub use anime_type::AnimeType;
pub use parsed_field::ParsedField;
