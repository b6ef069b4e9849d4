//! Frequency ranking with percentage-of-jobs

use crate::aggregator::SkillCounts;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const DEFAULT_TOP_N: usize = 50;
pub const CHART_TOP_N: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSkill {
    pub skill: String,
    pub count: usize,
    /// `100 * count / jobs considered`, 0 when no job was considered
    pub percentage: f64,
}

/// Sort by descending count and keep the first `top_n`.
///
/// Equal counts are ordered by name, case-insensitively and then byte-wise, so
/// the output never depends on hash map iteration order.
pub fn rank(counts: &SkillCounts, total_jobs_considered: usize, top_n: usize) -> Vec<RankedSkill> {
    let mut entries: Vec<(&str, usize)> = counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| by_name(a.0, b.0)));
    entries
        .into_iter()
        .take(top_n)
        .map(|(skill, count)| RankedSkill {
            skill: skill.to_string(),
            count,
            percentage: percentage(count, total_jobs_considered),
        })
        .collect()
}

fn by_name(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (100.0 * count as f64 / total as f64).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(jobs: &[&[&str]]) -> SkillCounts {
        let mut c = SkillCounts::new();
        for job in jobs {
            let skills: Vec<String> = job.iter().map(|s| s.to_string()).collect();
            c.add_job(&skills);
        }
        c
    }

    #[test]
    fn orders_by_count_then_name() {
        let c = counts(&[&["b", "A", "z"], &["z", "A"], &["z"]]);
        let ranked = rank(&c, c.jobs_considered(), 10);
        let order: Vec<&str> = ranked.iter().map(|r| r.skill.as_str()).collect();
        assert_eq!(order, vec!["z", "A", "b"]);
        for pair in ranked.windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }

    #[test]
    fn percentages_are_bounded() {
        let c = counts(&[&["Python"], &["Python", "SQL"], &["Rust"]]);
        let ranked = rank(&c, c.jobs_considered(), 10);
        assert_eq!(ranked[0].skill, "Python");
        assert!((ranked[0].percentage - 66.666).abs() < 0.01);
        assert!(ranked.iter().all(|r| (0.0..=100.0).contains(&r.percentage)));
    }

    #[test]
    fn zero_denominator_gives_zero_percent() {
        let c = counts(&[&["Python"]]);
        let ranked = rank(&c, 0, 10);
        assert_eq!(ranked[0].count, 1);
        assert_eq!(ranked[0].percentage, 0.0);
    }

    #[test]
    fn truncates_to_top_n() {
        let c = counts(&[&["a", "b", "c", "d"]]);
        assert_eq!(rank(&c, 1, 2).len(), 2);
        assert_eq!(rank(&c, 1, 0).len(), 0);
        assert_eq!(rank(&c, 1, DEFAULT_TOP_N).len(), 4);
    }

    #[test]
    fn empty_table_ranks_to_empty_list() {
        assert!(rank(&SkillCounts::new(), 0, DEFAULT_TOP_N).is_empty());
    }
}
