pub mod cache;
pub mod external;
pub mod http;
pub mod persistence;
pub mod render;
