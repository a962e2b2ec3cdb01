use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use log::info;

use crate::infrastructure::external::jikan::JikanClient;
use crate::shared::errors::AppResult;

/// Genre id/name lookup populated once per run from the Jikan genre listing.
///
/// An explicit cache object passed by reference to whatever needs it, with
/// its lifetime scoped to one run; concurrent reads are safe once loaded.
#[derive(Default)]
pub struct GenreCache {
    id_to_name: DashMap<u32, String>,
    name_to_id: DashMap<String, u32>,
    loaded: AtomicBool,
}

impl GenreCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the tables from `/v4/genres/anime`; later calls are no-ops.
    pub async fn ensure_loaded(&self, jikan: &JikanClient) -> AppResult<()> {
        if self.loaded.load(Ordering::Acquire) {
            return Ok(());
        }
        let genres = jikan.list_genres().await?;
        for genre in &genres {
            self.id_to_name.insert(genre.mal_id, genre.name.clone());
            self.name_to_id
                .insert(genre.name.trim().to_lowercase(), genre.mal_id);
        }
        self.loaded.store(true, Ordering::Release);
        info!("genre cache loaded with {} entries", genres.len());
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// All known genres as (id, name), sorted by id.
    pub fn list_all(&self) -> Vec<(u32, String)> {
        let mut all: Vec<(u32, String)> = self
            .id_to_name
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        all.sort_by_key(|(id, _)| *id);
        all
    }

    /// Resolve mixed name-or-id tokens to known genre ids; unknown tokens
    /// are dropped.
    pub fn ids_from_tokens(&self, tokens: &[String]) -> Vec<u32> {
        tokens
            .iter()
            .filter_map(|token| {
                let token = token.trim();
                if token.is_empty() {
                    return None;
                }
                if let Ok(id) = token.parse::<u32>() {
                    return self.id_to_name.contains_key(&id).then_some(id);
                }
                self.name_to_id
                    .get(&token.to_lowercase())
                    .map(|entry| *entry.value())
            })
            .collect()
    }

    /// Resolve mixed name-or-id tokens to canonical genre names.
    pub fn names_from_tokens(&self, tokens: &[String]) -> Vec<String> {
        self.ids_from_tokens(tokens)
            .into_iter()
            .filter_map(|id| self.id_to_name.get(&id).map(|entry| entry.value().clone()))
            .collect()
    }
}
