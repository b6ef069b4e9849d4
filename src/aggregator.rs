//! Corpus-wide skill counts: one increment per job, never per mention

use crate::normalizer::SynonymTable;
use std::collections::{BTreeSet, HashMap};

/// Number of distinct jobs mentioning each skill
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillCounts {
    counts: HashMap<String, usize>,
    jobs_considered: usize,
}

impl SkillCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one job's skills. Empty sets are ignored and do not count
    /// towards `jobs_considered`.
    pub fn add_job<'a, I>(&mut self, skills: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        let unique: BTreeSet<&String> = skills.into_iter().collect();
        if unique.is_empty() {
            return;
        }
        for skill in unique {
            *self.counts.entry(skill.clone()).or_insert(0) += 1;
        }
        self.jobs_considered += 1;
    }

    pub fn get(&self, skill: &str) -> usize {
        self.counts.get(skill).copied().unwrap_or(0)
    }

    /// Jobs that contributed at least one skill
    pub fn jobs_considered(&self) -> usize {
        self.jobs_considered
    }

    pub fn distinct_skills(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

/// Combine per-job skill sets into counts
pub fn aggregate<'a, I, S>(per_job: I) -> SkillCounts
where
    I: IntoIterator<Item = &'a S>,
    S: 'a,
    &'a S: IntoIterator<Item = &'a String>,
{
    let mut counts = SkillCounts::new();
    for skills in per_job {
        counts.add_job(skills);
    }
    counts
}

/// Like [`aggregate`] for free-text skill lists: each list is normalized and
/// de-duplicated before counting
pub fn aggregate_raw<S: AsRef<str>>(per_job: &[Vec<S>], synonyms: &SynonymTable) -> SkillCounts {
    let mut counts = SkillCounts::new();
    for raw in per_job {
        let normalized = synonyms.normalize_all(raw);
        counts.add_job(normalized.iter());
    }
    counts
}
