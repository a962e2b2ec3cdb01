mod common;

use common::{mal_record, RecordFactory};
use hyoka::domain::services::{ScoreEngine, ScoringConfig};
use hyoka::shared::errors::AppError;

#[test]
fn degenerate_pools_reduce_to_plain_bayesian() {
    // no members/popularity/year anywhere beyond identical values: both
    // boost pools are degenerate, so the recommendation ranking must equal
    // the plain Bayesian one
    let records = vec![
        mal_record("A", 1, 8.0, 100),
        mal_record("B", 2, 7.0, 50),
        mal_record("C", 3, 9.0, 200),
    ];
    let engine = ScoreEngine::with_defaults();
    let plain = engine.score_bayesian(&records);
    let boosted = engine.score_recommendation(&records);
    assert_eq!(plain.len(), boosted.len());
    for ((_, p), (_, b)) in plain.iter().zip(boosted.iter()) {
        assert!((p - b).abs() < 1e-12);
    }
}

#[test]
fn popularity_boost_lifts_the_popular_row() {
    let records = vec![
        RecordFactory::new("popular")
            .mal_id(1)
            .score(7.0)
            .scored_by(1000)
            .members(2_000_000)
            .build(),
        RecordFactory::new("obscure")
            .mal_id(2)
            .score(7.0)
            .scored_by(1000)
            .members(5_000)
            .build(),
    ];
    let engine = ScoreEngine::with_defaults();
    let scored = engine.score_recommendation(&records);
    let by_title = |t: &str| scored.iter().find(|(r, _)| r.title == t).unwrap().1;

    // same score, same votes; only the popularity boost separates them,
    // and the max-pool row gets the full pop_weight
    assert!((by_title("popular") - by_title("obscure") - 0.20).abs() < 1e-9);
}

#[test]
fn recency_boost_prefers_newer_titles() {
    let records = vec![
        RecordFactory::new("old")
            .mal_id(1)
            .score(8.0)
            .scored_by(500)
            .year(1998)
            .build(),
        RecordFactory::new("new")
            .mal_id(2)
            .score(8.0)
            .scored_by(500)
            .year(2024)
            .build(),
    ];
    let scored = ScoreEngine::with_defaults().score_recommendation(&records);
    let by_title = |t: &str| scored.iter().find(|(r, _)| r.title == t).unwrap().1;
    assert!((by_title("new") - by_title("old") - 0.10).abs() < 1e-9);
}

#[test]
fn missing_year_gets_no_recency_boost() {
    let records = vec![
        RecordFactory::new("dated")
            .mal_id(1)
            .score(8.0)
            .scored_by(500)
            .year(2020)
            .build(),
        RecordFactory::new("dated too")
            .mal_id(2)
            .score(8.0)
            .scored_by(500)
            .year(2010)
            .build(),
        RecordFactory::new("undated")
            .mal_id(3)
            .score(8.0)
            .scored_by(500)
            .build(),
    ];
    let scored = ScoreEngine::with_defaults().score_recommendation(&records);
    let by_title = |t: &str| scored.iter().find(|(r, _)| r.title == t).unwrap().1;
    // the undated row ranks with the oldest dated one
    assert!((by_title("undated") - by_title("dated too")).abs() < 1e-9);
    assert!(by_title("dated") > by_title("undated"));
}

#[test]
fn popularity_falls_back_through_sources() {
    // members absent -> AniList popularity is the signal
    let records = vec![
        RecordFactory::new("anilist popular")
            .mal_id(1)
            .score(7.0)
            .scored_by(100)
            .popularity_anilist(500_000)
            .build(),
        RecordFactory::new("anilist obscure")
            .mal_id(2)
            .score(7.0)
            .scored_by(100)
            .popularity_anilist(1_000)
            .build(),
    ];
    let scored = ScoreEngine::with_defaults().score_recommendation(&records);
    let by_title = |t: &str| scored.iter().find(|(r, _)| r.title == t).unwrap().1;
    assert!(by_title("anilist popular") > by_title("anilist obscure"));
}

#[test]
fn negative_boost_weights_are_rejected() {
    let err = ScoreEngine::new(ScoringConfig {
        recency_weight: -0.5,
        ..Default::default()
    });
    assert!(matches!(err, Err(AppError::ValidationError(_))));
}
