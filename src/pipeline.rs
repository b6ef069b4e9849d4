//! End-to-end analysis: match every job, aggregate, rank

use crate::aggregator::{SkillCounts, aggregate};
use crate::job::JobRecord;
use crate::lexicon::Lexicon;
use crate::matcher::{SkillMatcher, SkillSet};
use crate::ranker::{DEFAULT_TOP_N, RankedSkill, rank};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of one analysis run
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub ranked: Vec<RankedSkill>,
    pub total_jobs: usize,
    /// Jobs with at least one skill; the percentage denominator
    pub jobs_with_skills: usize,
    pub distinct_skills: usize,
}

impl Analysis {
    /// An empty ranking is a valid result, not a failure
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SkillAnalyzer {
    matcher: SkillMatcher,
    top_n: usize,
    workers: usize,
}

impl SkillAnalyzer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            matcher: SkillMatcher::new(lexicon),
            top_n: DEFAULT_TOP_N,
            workers: 1,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Number of threads used for matching; values below 1 mean 1
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn matcher(&self) -> &SkillMatcher {
        &self.matcher
    }

    /// Per-job skill sets, in job order. Each worker only reads its own jobs.
    pub fn match_jobs(&self, jobs: &[JobRecord]) -> Vec<SkillSet> {
        if self.workers <= 1 || jobs.len() < 2 {
            return jobs.iter().map(|j| self.matcher.match_text(j.text())).collect();
        }
        let chunk_size = jobs.len().div_ceil(self.workers);
        debug!(
            "Matching {} jobs on {} workers (chunk size {})",
            jobs.len(),
            self.workers,
            chunk_size
        );
        std::thread::scope(|scope| {
            let handles: Vec<_> = jobs
                .chunks(chunk_size)
                .map(|chunk| {
                    let matcher = &self.matcher;
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|j| matcher.match_text(j.text()))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| match h.join() {
                    Ok(sets) => sets,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }

    /// Match, write each job's `skills`, aggregate and rank
    pub fn analyze(&self, jobs: &mut [JobRecord]) -> Analysis {
        let sets = self.match_jobs(jobs);
        for (job, skills) in jobs.iter_mut().zip(&sets) {
            job.skills = skills.iter().cloned().collect();
        }
        let counts = aggregate(&sets);
        let analysis = self.rank_counts(&counts, jobs.len());
        info!(
            "Analyzed {} jobs: {} with skills, {} distinct skills",
            analysis.total_jobs, analysis.jobs_with_skills, analysis.distinct_skills
        );
        analysis
    }

    pub fn rank_counts(&self, counts: &SkillCounts, total_jobs: usize) -> Analysis {
        Analysis {
            ranked: rank(counts, counts.jobs_considered(), self.top_n),
            total_jobs,
            jobs_with_skills: counts.jobs_considered(),
            distinct_skills: counts.distinct_skills(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> SkillAnalyzer {
        SkillAnalyzer::new(Arc::new(Lexicon::builtin().unwrap()))
    }

    fn jobs(descs: &[&str]) -> Vec<JobRecord> {
        descs.iter().map(|d| JobRecord::with_description(*d)).collect()
    }

    #[test]
    fn parallel_matching_preserves_job_order() {
        let descs: Vec<String> = (0..23)
            .map(|i| if i % 2 == 0 { format!("Python role {i}") } else { format!("Rust role {i}") })
            .collect();
        let refs: Vec<&str> = descs.iter().map(String::as_str).collect();
        let input = jobs(&refs);
        let serial = analyzer().match_jobs(&input);
        let parallel = analyzer().with_workers(4).match_jobs(&input);
        assert_eq!(serial, parallel);
    }

    #[test]
    fn analyze_writes_skills_back() {
        let mut input = jobs(&["Docker and Python", ""]);
        let analysis = analyzer().analyze(&mut input);
        assert_eq!(input[0].skills, vec!["Docker", "Python"]);
        assert!(input[1].skills.is_empty());
        assert_eq!(analysis.total_jobs, 2);
        assert_eq!(analysis.jobs_with_skills, 1);
        assert_eq!(analysis.ranked[0].percentage, 100.0);
    }

    #[test]
    fn no_jobs_is_an_empty_analysis() {
        let analysis = analyzer().analyze(&mut []);
        assert!(analysis.is_empty());
        assert_eq!(analysis.jobs_with_skills, 0);
    }
}
