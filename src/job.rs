//! Job records as delivered by the scraper, plus JSON/CSV persistence

use crate::error::{Result, SkillRadarError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

const SKILL_SEPARATOR: &str = "; ";

/// One scraped posting. Only `description` is read by the analysis; `skills`
/// is written by it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl JobRecord {
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    /// Description text, empty when missing
    pub fn text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn has_description(&self) -> bool {
        !self.text().trim().is_empty()
    }
}

/// Flat CSV shape; skills are joined into a single column
#[derive(Debug, Serialize, Deserialize)]
struct JobRow {
    #[serde(default)]
    title: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    salary_min: Option<f64>,
    #[serde(default)]
    salary_max: Option<f64>,
    #[serde(default)]
    job_type: String,
    #[serde(default)]
    skills: Option<String>,
}

impl From<&JobRecord> for JobRow {
    fn from(job: &JobRecord) -> Self {
        JobRow {
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            url: job.url.clone(),
            description: job.description.clone(),
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            job_type: job.job_type.clone(),
            skills: Some(job.skills.join(SKILL_SEPARATOR)),
        }
    }
}

impl From<JobRow> for JobRecord {
    fn from(row: JobRow) -> Self {
        let skills = row
            .skills
            .map(|s| {
                s.split(SKILL_SEPARATOR.trim())
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        JobRecord {
            title: row.title,
            company: row.company,
            location: row.location,
            url: row.url,
            description: row.description.filter(|d| !d.is_empty()),
            salary_min: row.salary_min,
            salary_max: row.salary_max,
            job_type: row.job_type,
            skills,
        }
    }
}

/// Load jobs from a `.json` (array of objects) or `.csv` (with headers) file
pub fn load_jobs(path: &Path) -> Result<Vec<JobRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let jobs = match ext.as_str() {
        "json" => {
            let content = std::fs::read_to_string(path)?;
            jobs_from_json(&content)?
        }
        "csv" => jobs_from_csv(File::open(path)?)?,
        other => {
            return Err(SkillRadarError::InvalidInput {
                message: format!(
                    "unsupported job file extension '{}' for {} (expected json or csv)",
                    other,
                    path.display()
                ),
            });
        }
    };
    info!("Loaded {} jobs from {}", jobs.len(), path.display());
    Ok(jobs)
}

pub fn jobs_from_json(content: &str) -> Result<Vec<JobRecord>> {
    Ok(serde_json::from_str(content)?)
}

pub fn jobs_from_csv<R: std::io::Read>(reader: R) -> Result<Vec<JobRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut jobs = Vec::new();
    for result in rdr.deserialize() {
        let row: JobRow = result?;
        jobs.push(row.into());
    }
    Ok(jobs)
}

/// Write jobs (with their skills) as CSV. An empty list writes nothing.
pub fn save_jobs_csv(jobs: &[JobRecord], path: &Path) -> Result<()> {
    if jobs.is_empty() {
        debug!("No jobs to save, skipping {}", path.display());
        return Ok(());
    }
    let mut wtr = csv::Writer::from_path(path)?;
    for job in jobs {
        wtr.serialize(JobRow::from(job))?;
    }
    wtr.flush()?;
    info!("Saved {} jobs to {}", jobs.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_fields_are_optional() {
        let jobs = jobs_from_json(
            r#"[{"title": "ML Engineer", "description": "Python and SQL"}, {"company": "Acme"}]"#,
        )
        .unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].text(), "Python and SQL");
        assert!(!jobs[1].has_description());
        assert!(jobs[1].skills.is_empty());
    }

    #[test]
    fn csv_rows_split_skill_column() {
        let data = "title,company,location,url,description,salary_min,salary_max,job_type,skills\n\
                    AI Engineer,Acme,Remote,http://x,Uses PyTorch,100000,150000,fulltime,PyTorch; AWS\n\
                    Data Scientist,Beta,,,,,,,\n";
        let jobs = jobs_from_csv(data.as_bytes()).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].skills, vec!["PyTorch", "AWS"]);
        assert_eq!(jobs[0].salary_min, Some(100000.0));
        assert_eq!(jobs[1].description, None);
        assert!(jobs[1].skills.is_empty());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_jobs(Path::new("jobs.xml")).unwrap_err();
        assert!(matches!(err, SkillRadarError::InvalidInput { .. }));
    }
}
