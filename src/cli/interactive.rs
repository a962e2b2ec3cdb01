use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::application::ScoringMode;
use crate::cli::args::RunParams;
use crate::domain::value_objects::{AnimeStatus, AnimeType};
use crate::infrastructure::cache::GenreCache;
use crate::infrastructure::external::jikan::JikanClient;
use crate::shared::errors::{AppError, AppResult};

/// One parsed input line of the interactive collector.
#[derive(Debug, Clone, PartialEq)]
enum Directive {
    Start,
    Quit,
    Help,
    Show,
    Reset,
    GenreAll,
    GenreAny(Vec<String>),
    Set { key: String, value: Option<String> },
    Empty,
}

/// Collect run parameters line by line until `start`. Returns `None` when
/// the user quits. Coercion and validation failures are reported per line
/// and re-prompt; they never abort the session.
pub async fn collect(
    initial: RunParams,
    jikan: &JikanClient,
    genres: &GenreCache,
) -> AppResult<Option<RunParams>> {
    let mut params = initial;
    print_help();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!(">>> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            // stdin closed; treat like quit
            return Ok(None);
        };
        let line = line?;

        match parse_line(&line) {
            Directive::Empty => continue,
            Directive::Start => return Ok(Some(params)),
            Directive::Quit => return Ok(None),
            Directive::Help => print_help(),
            Directive::Show => show(&params),
            Directive::Reset => {
                params = RunParams::default();
                println!("Reset to defaults.");
            }
            Directive::GenreAll => match list_genres(jikan, genres).await {
                Ok(pairs) => {
                    println!("\nGenres (id : name):");
                    for (id, name) in pairs {
                        println!("  {:>3} : {}", id, name);
                    }
                    println!();
                }
                Err(e) => println!("[!] Failed to fetch genres: {}", e),
            },
            Directive::GenreAny(tokens) => {
                if tokens.is_empty() {
                    println!("[!] Usage: genre_any <name or ID, comma/space separated>");
                    continue;
                }
                match resolve_genres(jikan, genres, &tokens).await {
                    Ok(names) if names.is_empty() => {
                        println!("[!] No valid genres found. Try `genre_all` first.");
                    }
                    Ok(names) => {
                        println!("ok: any_genres = {:?}", names);
                        params.any_genres = Some(names);
                    }
                    Err(e) => println!("[!] Genre lookup failed: {}", e),
                }
            }
            Directive::Set { key, value } => {
                match apply_set(&mut params, &key, value.as_deref()) {
                    Ok(confirmation) => println!("ok: {}", confirmation),
                    Err(e) => println!("[!] Set failed: {}", e),
                }
            }
        }
    }
}

async fn list_genres(
    jikan: &JikanClient,
    genres: &GenreCache,
) -> AppResult<Vec<(u32, String)>> {
    genres.ensure_loaded(jikan).await?;
    Ok(genres.list_all())
}

async fn resolve_genres(
    jikan: &JikanClient,
    genres: &GenreCache,
    tokens: &[String],
) -> AppResult<Vec<String>> {
    genres.ensure_loaded(jikan).await?;
    Ok(genres.names_from_tokens(tokens))
}

fn parse_line(line: &str) -> Directive {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Directive::Empty;
    }
    match trimmed.to_lowercase().as_str() {
        "start" => return Directive::Start,
        "quit" | "exit" => return Directive::Quit,
        "help" => return Directive::Help,
        "show" => return Directive::Show,
        "reset" => return Directive::Reset,
        "genre_all" => return Directive::GenreAll,
        _ => {}
    }
    if let Some(rest) = trimmed.strip_prefix("genre_any") {
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            let tokens: Vec<String> = rest
                .replace(',', " ")
                .split_whitespace()
                .map(str::to_string)
                .collect();
            return Directive::GenreAny(tokens);
        }
    }

    // `key=value` or `key value`; a bare key means an empty value
    let (key, value) = match trimmed.split_once('=') {
        Some((key, value)) => (key, Some(value)),
        None => match trimmed.split_once(char::is_whitespace) {
            Some((key, value)) => (key, Some(value)),
            None => (trimmed, None),
        },
    };
    Directive::Set {
        key: key.trim().to_string(),
        value: value.map(|v| v.trim().to_string()),
    }
}

/// Apply one `key value` assignment with typed coercion. Returns the
/// confirmation text to echo.
fn apply_set(params: &mut RunParams, key: &str, value: Option<&str>) -> AppResult<String> {
    match key {
        "q" => {
            params.query = value.unwrap_or_default().to_string();
            Ok(format!("q = \"{}\"", params.query))
        }
        "type" => {
            params.anime_type = coerce_choice(value, |v| match AnimeType::from(v) {
                AnimeType::Unknown => None,
                parsed => Some(parsed),
            })
            .map_err(|_| choices_error(key, "tv/movie/ova/special/ona/music"))?;
            Ok(format!("type = {:?}", params.anime_type))
        }
        "status" => {
            params.status = coerce_choice(value, |v| match AnimeStatus::from(v) {
                AnimeStatus::Unknown => None,
                parsed => Some(parsed),
            })
            .map_err(|_| choices_error(key, "airing/complete/upcoming"))?;
            Ok(format!("status = {:?}", params.status))
        }
        "mode" => {
            let mode = value
                .ok_or_else(|| choices_error(key, "bayesian/recommend/consensus"))?
                .parse::<ScoringMode>()?;
            params.mode = mode;
            Ok(format!("mode = {}", mode))
        }
        "year_from" => {
            params.year_from = coerce_number(value)?;
            Ok(format!("year_from = {:?}", params.year_from))
        }
        "year_to" => {
            params.year_to = coerce_number(value)?;
            Ok(format!("year_to = {:?}", params.year_to))
        }
        "min_score" => {
            params.min_score = coerce_number(value)?;
            Ok(format!("min_score = {:?}", params.min_score))
        }
        "min_scored_by" => {
            params.min_scored_by = coerce_number(value)?;
            Ok(format!("min_scored_by = {:?}", params.min_scored_by))
        }
        "all_genres" => {
            let tokens = tokenize(value);
            params.all_genres = (!tokens.is_empty()).then_some(tokens);
            Ok(format!("all_genres = {:?}", params.all_genres))
        }
        "page_size" => {
            params.page_size =
                coerce_number(value)?.ok_or_else(|| required_error(key, "integer"))?;
            Ok(format!("page_size = {}", params.page_size))
        }
        "max_pages" => {
            params.max_pages =
                coerce_number(value)?.ok_or_else(|| required_error(key, "integer"))?;
            Ok(format!("max_pages = {}", params.max_pages))
        }
        "sfw" => {
            params.sfw = coerce_bool(value, params.sfw)?;
            Ok(format!("sfw = {}", params.sfw))
        }
        "no_fetch" => {
            params.no_fetch = coerce_bool(value, params.no_fetch)?;
            Ok(format!("no_fetch = {}", params.no_fetch))
        }
        "csv" => {
            let path = value.ok_or_else(|| required_error(key, "path"))?;
            params.csv_path = PathBuf::from(path);
            Ok(format!("csv = {}", params.csv_path.display()))
        }
        "prior_m" => {
            params.prior_weight = coerce_number(value)?;
            Ok(format!("prior_m = {:?}", params.prior_weight))
        }
        "topk" => {
            params.top_k = coerce_number(value)?.ok_or_else(|| required_error(key, "integer"))?;
            Ok(format!("topk = {}", params.top_k))
        }
        "alpha" => {
            params.alpha = coerce_number(value)?.ok_or_else(|| required_error(key, "float"))?;
            Ok(format!("alpha = {}", params.alpha))
        }
        "pop_weight" => {
            params.pop_weight =
                coerce_number(value)?.ok_or_else(|| required_error(key, "float"))?;
            Ok(format!("pop_weight = {}", params.pop_weight))
        }
        "recency_weight" => {
            params.recency_weight =
                coerce_number(value)?.ok_or_else(|| required_error(key, "float"))?;
            Ok(format!("recency_weight = {}", params.recency_weight))
        }
        other => Err(AppError::InvalidInput(format!(
            "unknown param: {}. Type `help` to list all params.",
            other
        ))),
    }
}

/// Toggle on empty input; otherwise parse common boolean literals.
fn coerce_bool(value: Option<&str>, current: bool) -> AppResult<bool> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(!current);
    };
    match value.to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        _ => Err(AppError::InvalidInput(
            "use: true/false/1/0/yes/no/on/off or empty to toggle".to_string(),
        )),
    }
}

/// Empty input clears the value; otherwise parse the declared type.
fn coerce_number<T: std::str::FromStr>(value: Option<&str>) -> AppResult<Option<T>> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    value
        .parse::<T>()
        .map(Some)
        .map_err(|_| AppError::InvalidInput(format!("cannot parse '{}' as a number", value)))
}

fn coerce_choice<T>(
    value: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, ()> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    parse(value).map(Some).ok_or(())
}

fn tokenize(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn choices_error(key: &str, choices: &str) -> AppError {
    AppError::InvalidInput(format!("{} choices: {}", key, choices))
}

fn required_error(key: &str, kind: &str) -> AppError {
    AppError::InvalidInput(format!("{} requires a {} value", key, kind))
}

fn print_help() {
    println!("\nHow to use: type `key value` or `key=value` to set; repeat to overwrite; type `start` to run.");
    println!("  q               — keyword (title search)");
    println!("  type            ∈ tv/movie/ova/special/ona/music (empty to clear)");
    println!("  status          ∈ airing/complete/upcoming (empty to clear)");
    println!("  year_from       — start year (inclusive)");
    println!("  year_to         — end year (inclusive)");
    println!("  min_score       — minimum score (0-10)");
    println!("  min_scored_by   — minimum number of voters");
    println!("  all_genres      — must include all of these genres");
    println!("  page_size       — items per page (1-25)  [default: 25]");
    println!("  max_pages       — max pages to fetch  [default: 5]");
    println!("  sfw             — safe-for-work only (empty to toggle)");
    println!("  no_fetch        — skip fetching; load local CSV (empty to toggle)");
    println!("  csv             — CSV path  [default: data/anime_cache.csv]");
    println!("  prior_m         — Bayesian prior weight m");
    println!("  topk            — render top K  [default: 20]");
    println!("  mode            ∈ bayesian/recommend/consensus  [default: bayesian]");
    println!("  alpha           — AniList popularity-to-votes factor  [default: 0.3]");
    println!("  pop_weight      — popularity boost weight  [default: 0.2]");
    println!("  recency_weight  — recency boost weight  [default: 0.1]");
    println!();
    println!("Commands:");
    println!("  show               print current params");
    println!("  reset              reset to defaults");
    println!("  help               show this help");
    println!("  quit               exit");
    println!("  genre_all          list all anime genres (id : name)");
    println!("  genre_any <tokens> set ANY-match genres; names or IDs, comma/space separated");
    println!();
}

fn show(params: &RunParams) {
    println!("Current params:");
    println!("  q: \"{}\"", params.query);
    println!("  type: {:?}", params.anime_type);
    println!("  status: {:?}", params.status);
    println!("  year_from: {:?}", params.year_from);
    println!("  year_to: {:?}", params.year_to);
    println!("  min_score: {:?}", params.min_score);
    println!("  min_scored_by: {:?}", params.min_scored_by);
    println!("  any_genres: {:?}", params.any_genres);
    println!("  all_genres: {:?}", params.all_genres);
    println!("  page_size: {}", params.page_size);
    println!("  max_pages: {}", params.max_pages);
    println!("  sfw: {}", params.sfw);
    println!("  no_fetch: {}", params.no_fetch);
    println!("  csv: {}", params.csv_path.display());
    println!("  prior_m: {:?}", params.prior_weight);
    println!("  topk: {}", params.top_k);
    println!("  mode: {}", params.mode);
    println!("  alpha: {}", params.alpha);
    println!("  pop_weight: {}", params.pop_weight);
    println!("  recency_weight: {}", params.recency_weight);
}
