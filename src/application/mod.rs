mod pipeline;
mod ports;

pub use pipeline::{PipelineConfig, RankingPipeline, RunSummary, ScoringMode};
pub use ports::{CatalogSource, FetchCriteria};
