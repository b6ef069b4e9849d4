pub mod aggregator;
pub mod categories;
pub mod config;
pub mod discovery;
pub mod error;
pub mod job;
pub mod lexicon;
pub mod matcher;
pub mod normalizer;
pub mod pipeline;
pub mod ranker;
pub mod report;

pub use aggregator::{SkillCounts, aggregate, aggregate_raw};
pub use error::{Result, SkillRadarError};
pub use job::JobRecord;
pub use lexicon::{Category, Lexicon};
pub use matcher::{SkillMatcher, SkillSet};
pub use normalizer::SynonymTable;
pub use pipeline::{Analysis, SkillAnalyzer};
pub use ranker::{RankedSkill, rank};

use std::sync::Arc;

/// Builtin lexicon, plus `lexicon.extra_file` when configured
pub fn load_lexicon(config: &config::Config) -> Result<Arc<Lexicon>> {
    let mut builder = lexicon::LexiconBuilder::with_builtin()?;
    if let Some(path) = &config.lexicon.extra_file {
        builder.extend_from_file(path)?;
        tracing::info!("Loaded extra lexicon entries from {}", path.display());
    }
    Ok(Arc::new(builder.build()?))
}

/// Run the whole analysis over `jobs` with an already built lexicon.
/// Each job's `skills` field is filled in.
pub fn analyze(jobs: &mut [JobRecord], lexicon: Arc<Lexicon>, top_n: usize) -> Analysis {
    SkillAnalyzer::new(lexicon).with_top_n(top_n).analyze(jobs)
}
