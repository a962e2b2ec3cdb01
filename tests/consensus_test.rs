mod common;

use common::RecordFactory;
use hyoka::domain::services::ScoreEngine;

fn blended_record() -> hyoka::domain::entities::AnimeRecord {
    RecordFactory::new("Vinland Saga")
        .mal_id(37521)
        .anilist_id(101348)
        .score(8.0)
        .scored_by(500)
        .score_anilist(9.0)
        .popularity_anilist(1000)
        .build()
}

#[test]
fn consensus_blend_matches_hand_computed_anchor() {
    // primary weight = log10(1 + 500) = 2.6998...
    // secondary pseudo-votes = 0.30 * 1000 = 300 (raw, not log-compressed)
    // blend = (8 * 2.6998 + 9 * 300) / 302.6998 = 8.9911...
    // single-row dataset: the second shrinkage pass is a fixpoint
    let scored = ScoreEngine::with_defaults().score_consensus(&[blended_record()]);
    assert_eq!(scored.len(), 1);

    let (record, score) = &scored[0];
    assert!((score - 8.991).abs() < 0.001);
    assert!((record.consensus_score.unwrap() - 8.991).abs() < 0.001);
    assert_eq!(record.consensus_votes, Some(800));
}

#[test]
fn input_records_are_not_mutated() {
    let input = vec![blended_record()];
    let _ = ScoreEngine::with_defaults().score_consensus(&input);
    assert_eq!(input[0].consensus_score, None);
    assert_eq!(input[0].consensus_votes, None);
}

#[test]
fn primary_only_row_falls_back_without_consensus_fields() {
    let records = vec![
        blended_record(),
        RecordFactory::new("mal only")
            .mal_id(2)
            .score(7.5)
            .scored_by(40_000)
            .build(),
    ];
    let scored = ScoreEngine::with_defaults().score_consensus(&records);
    assert_eq!(scored.len(), 2);

    let mal_only = scored.iter().find(|(r, _)| r.title == "mal only").unwrap();
    // a single-source row with votes still blends alone, so consensus fields
    // are written for it too
    assert!((mal_only.0.consensus_score.unwrap() - 7.5).abs() < 1e-9);
    assert_eq!(mal_only.0.consensus_votes, Some(40_000));
}

#[test]
fn bare_score_without_votes_keeps_floor_weight() {
    let records = vec![
        blended_record(),
        RecordFactory::new("bare")
            .mal_id(3)
            .score(9.9)
            .build(),
    ];
    let scored = ScoreEngine::with_defaults().score_consensus(&records);
    assert_eq!(scored.len(), 2);

    let bare = scored.iter().find(|(r, _)| r.title == "bare").unwrap();
    // fallback path: no consensus fields, weight floored at 1, so the
    // second shrinkage pass pulls the 9.9 hard toward the center
    assert_eq!(bare.0.consensus_score, None);
    assert_eq!(bare.0.consensus_votes, None);
    assert!(bare.1 < 9.3);
}

#[test]
fn anilist_only_row_participates_via_pseudo_votes() {
    let records = vec![RecordFactory::new("anilist only")
        .anilist_id(7)
        .score_anilist(8.2)
        .popularity_anilist(10_000)
        .build()];
    let scored = ScoreEngine::with_defaults().score_consensus(&records);
    assert_eq!(scored.len(), 1);

    let (record, score) = &scored[0];
    // single part: the blend equals its own score, votes are the pseudo count
    assert!((record.consensus_score.unwrap() - 8.2).abs() < 1e-9);
    assert_eq!(record.consensus_votes, Some(3000));
    assert!((score - 8.2).abs() < 1e-9);
}

#[test]
fn scoreless_rows_are_excluded() {
    let records = vec![
        blended_record(),
        RecordFactory::new("no scores at all")
            .mal_id(9)
            .scored_by(100_000)
            .popularity_anilist(50_000)
            .build(),
    ];
    let scored = ScoreEngine::with_defaults().score_consensus(&records);
    assert_eq!(scored.len(), 1);
    assert_eq!(scored[0].0.title, "Vinland Saga");
}

#[test]
fn consensus_score_lies_between_the_two_sources() {
    let scored = ScoreEngine::with_defaults().score_consensus(&[blended_record()]);
    let blend = scored[0].0.consensus_score.unwrap();
    assert!(blend > 8.0 && blend < 9.0);
    // the heavily-weighted secondary dominates
    assert!(blend > 8.5);
}
