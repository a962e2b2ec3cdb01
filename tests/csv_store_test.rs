mod common;

use std::io::Write;

use common::RecordFactory;
use hyoka::domain::value_objects::{AnimeStatus, AnimeType};
use hyoka::infrastructure::persistence::CsvStore;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> CsvStore {
    CsvStore::new(dir.path().join("snapshot.csv"))
}

#[test]
fn save_and_load_preserve_fields() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let full = RecordFactory::new("Frieren: Beyond Journey's End")
        .mal_id(52991)
        .anilist_id(154587)
        .anime_type(AnimeType::TV)
        .status(AnimeStatus::Finished)
        .year(2023)
        .episodes(28)
        .genres(&["Adventure", "Drama", "Fantasy"])
        .studios(&["Madhouse"])
        .score(9.3)
        .scored_by(600_000)
        .members(1_200_000)
        .score_anilist(9.1)
        .popularity_anilist(400_000)
        .url("https://myanimelist.net/anime/52991")
        .build();
    let sparse = RecordFactory::new("obscure OVA").mal_id(7).build();

    store.save(&[full.clone(), sparse.clone()]).unwrap();
    let (loaded, report) = store.load().unwrap();

    assert_eq!(report.loaded, 2);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.malformed_fields, 0);
    assert_eq!(loaded[0], full);
    assert_eq!(loaded[1], sparse);
}

#[test]
fn consensus_fields_are_never_persisted() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let mut record = RecordFactory::new("x").mal_id(1).score(8.0).build();
    record.consensus_score = Some(8.5);
    record.consensus_votes = Some(900);

    store.save(&[record]).unwrap();
    let (loaded, _) = store.load().unwrap();
    assert_eq!(loaded[0].consensus_score, None);
    assert_eq!(loaded[0].consensus_votes, None);
}

#[test]
fn rows_without_either_id_are_skipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snapshot.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "mal_id,anilist_id,title,score").unwrap();
    writeln!(file, "1,,kept,8.0").unwrap();
    writeln!(file, ",,dropped,7.0").unwrap();
    writeln!(file, ",9,also kept,6.5").unwrap();
    drop(file);

    let (loaded, report) = CsvStore::new(path).load().unwrap();
    assert_eq!(report.loaded, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(loaded[0].title, "kept");
    assert_eq!(loaded[1].title, "also kept");
}

#[test]
fn malformed_numerics_are_counted_and_treated_as_absent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snapshot.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "mal_id,title,year,score,scored_by").unwrap();
    writeln!(file, "1,messy,not-a-year,8.x,12345").unwrap();
    drop(file);

    let (loaded, report) = CsvStore::new(path).load().unwrap();
    assert_eq!(report.loaded, 1);
    assert_eq!(report.malformed_fields, 2);
    assert_eq!(loaded[0].year, None);
    assert_eq!(loaded[0].score, None);
    assert_eq!(loaded[0].scored_by, Some(12345));
}

#[test]
fn missing_snapshot_loads_empty() {
    let dir = TempDir::new().unwrap();
    let (loaded, report) = store_in(&dir).load().unwrap();
    assert!(loaded.is_empty());
    assert_eq!(report.loaded, 0);
}

#[test]
fn genre_lists_round_trip_through_the_joined_column() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let record = RecordFactory::new("x")
        .mal_id(1)
        .genres(&["Action", "Sci-Fi"])
        .build();
    store.save(&[record]).unwrap();
    let (loaded, _) = store.load().unwrap();
    assert_eq!(loaded[0].genres, vec!["Action", "Sci-Fi"]);
}
