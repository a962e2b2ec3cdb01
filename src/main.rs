use std::sync::Arc;

use clap::Parser;
use log::warn;

use hyoka::application::{CatalogSource, RankingPipeline, ScoringMode};
use hyoka::cli::{interactive, CliArgs, RunParams};
use hyoka::infrastructure::cache::GenreCache;
use hyoka::infrastructure::external::anilist::AniListClient;
use hyoka::infrastructure::external::jikan::JikanClient;
use hyoka::shared::utils::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logger();

    let args = CliArgs::parse();
    let run_interactive = args.interactive;
    let mut params = RunParams::from(&args);

    let jikan = Arc::new(JikanClient::new());
    let genres = GenreCache::new();

    if run_interactive {
        match interactive::collect(params, &jikan, &genres).await? {
            Some(collected) => params = collected,
            None => {
                println!("Bye.");
                return Ok(());
            }
        }
    }

    // Genre filters arrive as free-form tokens (names or IDs); resolve them
    // to canonical names against the live genre list before filtering.
    if let Some(tokens) = params.any_genres.take() {
        params.any_genres = resolve_genre_tokens(&jikan, &genres, &tokens, "--any-genres").await?;
    }
    if let Some(tokens) = params.all_genres.take() {
        params.all_genres = resolve_genre_tokens(&jikan, &genres, &tokens, "--all-genres").await?;
    }

    let secondary: Option<Arc<dyn CatalogSource>> = if params.mode == ScoringMode::Consensus {
        Some(Arc::new(AniListClient::new()))
    } else {
        None
    };

    let pipeline = RankingPipeline::new(jikan, secondary, params.into_pipeline_config());
    pipeline.run().await?;
    Ok(())
}

async fn resolve_genre_tokens(
    jikan: &JikanClient,
    genres: &GenreCache,
    tokens: &[String],
    flag: &str,
) -> anyhow::Result<Option<Vec<String>>> {
    genres.ensure_loaded(jikan).await?;
    let names = genres.names_from_tokens(tokens);
    if names.is_empty() {
        warn!("{}: no known genres among {:?}, ignoring the filter", flag, tokens);
        return Ok(None);
    }
    Ok(Some(names))
}
