pub mod client;
pub mod dto;
pub mod mapper;
pub mod queries;

pub use client::AniListClient;
pub use mapper::AniListMapper;
