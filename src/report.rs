//! Console table plus the JSON/CSV artifacts of a run

use crate::categories::CategoryShare;
use crate::error::Result;
use crate::job::{JobRecord, save_jobs_csv};
use crate::ranker::RankedSkill;
use chrono::{DateTime, Local};
use prettytable::{Cell, Row, Table, row};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything persisted in `results_<timestamp>.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub timestamp: String,
    pub total_jobs: usize,
    pub jobs_with_skills: usize,
    pub search_keywords: Vec<String>,
    pub discovered_skills: Vec<String>,
    pub ranked_skills: Vec<RankedSkill>,
    pub categories: Vec<CategoryShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

/// Input for the external bar chart renderer, highest count first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarChartData {
    pub title: String,
    pub x_label: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieChartData {
    pub title: String,
    pub slices: Vec<CategoryShare>,
}

#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub results: PathBuf,
    pub jobs_csv: Option<PathBuf>,
    pub ranking_chart: Option<PathBuf>,
    pub category_chart: Option<PathBuf>,
}

/// Frequency tiers used to color the console table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Dominant,
    Common,
    Notable,
    Niche,
}

impl Tier {
    pub fn of(percentage: f64) -> Self {
        if percentage >= 50.0 {
            Tier::Dominant
        } else if percentage >= 25.0 {
            Tier::Common
        } else if percentage >= 10.0 {
            Tier::Notable
        } else {
            Tier::Niche
        }
    }

    fn style(&self) -> &'static str {
        match self {
            Tier::Dominant => "bFg",
            Tier::Common => "Fg",
            Tier::Notable => "Fy",
            Tier::Niche => "",
        }
    }
}

pub fn timestamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

pub fn skills_table(ranked: &[RankedSkill]) -> Table {
    let mut table = Table::new();
    table.set_titles(row![b => "Rank", "Skill/Tool", "Mentions", "% of Jobs"]);
    for (i, entry) in ranked.iter().enumerate() {
        table.add_row(Row::new(vec![
            Cell::new(&(i + 1).to_string()).style_spec("d"),
            Cell::new(&entry.skill).style_spec(Tier::of(entry.percentage).style()),
            Cell::new(&entry.count.to_string()).style_spec("r"),
            Cell::new(&format!("{:.1}%", entry.percentage)).style_spec("r"),
        ]));
    }
    table
}

pub fn print_skills_table(ranked: &[RankedSkill], jobs_with_skills: usize) {
    println!("Top Skills from {} AI Job Postings", jobs_with_skills);
    skills_table(ranked).printstd();
}

pub fn bar_chart_data(ranked: &[RankedSkill], top_n: usize) -> BarChartData {
    BarChartData {
        title: "Most In-Demand AI/ML Skills & Tools".to_string(),
        x_label: "Number of Job Postings Mentioning Skill".to_string(),
        bars: ranked
            .iter()
            .take(top_n)
            .map(|r| Bar {
                label: r.skill.clone(),
                count: r.count,
                percentage: r.percentage,
            })
            .collect(),
    }
}

pub fn pie_chart_data(categories: &[CategoryShare]) -> PieChartData {
    PieChartData {
        title: "Skill Categories Distribution".to_string(),
        slices: categories.to_vec(),
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Write results JSON, jobs CSV and the two chart data files into `dir`.
/// The CSV is skipped without jobs and chart files without data to draw; the
/// matching paths are `None` then.
pub fn write_outputs(
    dir: &Path,
    report: &AnalysisReport,
    jobs: &[JobRecord],
    chart_top_n: usize,
) -> Result<ReportPaths> {
    fs::create_dir_all(dir)?;
    let ts = &report.timestamp;

    let results = dir.join(format!("results_{ts}.json"));
    write_json(&results, report)?;

    let jobs_csv = if jobs.is_empty() {
        None
    } else {
        let path = dir.join(format!("jobs_{ts}.csv"));
        save_jobs_csv(jobs, &path)?;
        Some(path)
    };

    let ranking_chart = if report.ranked_skills.is_empty() {
        None
    } else {
        let path = dir.join(format!("skills_ranking_{ts}.json"));
        write_json(&path, &bar_chart_data(&report.ranked_skills, chart_top_n))?;
        Some(path)
    };

    let category_chart = if report.categories.is_empty() {
        None
    } else {
        let path = dir.join(format!("skills_categories_{ts}.json"));
        write_json(&path, &pie_chart_data(&report.categories))?;
        Some(path)
    };

    info!("Wrote results to {}", dir.display());
    Ok(ReportPaths {
        results,
        jobs_csv,
        ranking_chart,
        category_chart,
    })
}
