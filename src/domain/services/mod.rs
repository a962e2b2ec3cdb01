mod catalog_merger;
mod record_filter;
mod score_engine;

pub use catalog_merger::{CatalogMerger, MergeOutcome, MergeReport};
pub use record_filter::{FilterCriteria, RecordFilter};
pub use score_engine::{bayesian_shrink, ScoreEngine, ScoringConfig};
