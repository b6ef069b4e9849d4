use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use skill_radar::categories::{OTHER_LABEL, categorize};
use skill_radar::config::Config;
use skill_radar::discovery::{
    GroqClient, KeywordSource, SkillDiscoverer, keywords_or_fallback, known_skills,
};
use skill_radar::job::load_jobs;
use skill_radar::lexicon::Lexicon;
use skill_radar::report::{self, AnalysisReport};
use skill_radar::{SkillAnalyzer, SynonymTable, load_lexicon};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skill-radar")]
#[command(about = "Rank the skills and tools AI/ML job postings ask for")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a JSON or CSV file of job postings
    Analyze {
        /// Jobs file (.json array or .csv with headers)
        #[arg(long)]
        jobs: PathBuf,
        /// Number of ranked skills to keep
        #[arg(long)]
        top: Option<usize>,
        /// Number of bars in the ranking chart data
        #[arg(long)]
        chart_top: Option<usize>,
        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,
        /// Ask the LLM for skills missing from the lexicon before matching
        #[arg(long)]
        discover: bool,
        /// Matching threads
        #[arg(long)]
        workers: Option<usize>,
        /// Search keywords the jobs were collected with (recorded in results)
        #[arg(long, value_delimiter = ',')]
        keywords: Vec<String>,
    },
    /// Print the skills found in a piece of text
    Match {
        text: String,
    },
    /// Map raw skill names to their canonical form
    Normalize {
        names: Vec<String>,
    },
    /// Generate job search keywords (fixed list without GROQ_API_KEY)
    Keywords {
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
    /// List lexicon entries
    Lexicon,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skill_radar=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load().context("loading configuration")?;

    match cli.command {
        Commands::Analyze {
            jobs,
            top,
            chart_top,
            output,
            discover,
            workers,
            keywords,
        } => {
            if let Some(top) = top {
                config.analysis.top_n = top;
            }
            if let Some(chart_top) = chart_top {
                config.analysis.chart_top_n = chart_top;
            }
            if let Some(workers) = workers {
                config.analysis.workers = workers;
            }
            if let Some(output) = output {
                config.output.dir = output;
            }
            config.discovery.enabled |= discover;
            config.validate()?;
            run_analyze(&config, jobs, keywords).await?;
        }
        Commands::Match { text } => {
            let lexicon = load_lexicon(&config)?;
            let skills = SkillAnalyzer::new(lexicon).matcher().match_text(&text);
            if skills.is_empty() {
                println!("No skills found");
            }
            for skill in skills {
                println!("{}", skill);
            }
        }
        Commands::Normalize { names } => {
            let lexicon = load_lexicon(&config)?;
            let synonyms = SynonymTable::for_lexicon(&lexicon);
            for name in &names {
                println!("{} -> {}", name, synonyms.normalize(name));
            }
        }
        Commands::Keywords { count } => {
            let client = match &config.runtime.groq_api_key {
                Some(key) => Some(GroqClient::new(key.clone(), config.discovery.clone())?),
                None => {
                    warn!("GROQ_API_KEY not set, using default keywords");
                    None
                }
            };
            let source = client.as_ref().map(|c| c as &dyn KeywordSource);
            for keyword in keywords_or_fallback(source, count).await {
                println!("{}", keyword);
            }
        }
        Commands::Lexicon => {
            let lexicon = load_lexicon(&config)?;
            print_lexicon(&lexicon);
        }
    }
    Ok(())
}

async fn run_analyze(config: &Config, jobs_path: PathBuf, search_keywords: Vec<String>) -> Result<()> {
    let mut jobs = load_jobs(&jobs_path).with_context(|| format!("loading {}", jobs_path.display()))?;
    let mut lexicon = load_lexicon(config)?;

    let mut discovered = Vec::new();
    if config.discovery.enabled {
        let synonyms = SynonymTable::for_lexicon(&lexicon);
        discovered = discover_new_skills(config, &jobs, &lexicon, &synonyms).await;
        if !discovered.is_empty() {
            let grown = lexicon.with_discovered(&discovered, &synonyms)?;
            discovered = grown
                .names()
                .filter(|name| !lexicon.contains(name))
                .map(str::to_string)
                .collect();
            info!("Added {} discovered skills to the lexicon", discovered.len());
            lexicon = Arc::new(grown);
        }
    }

    let analyzer = SkillAnalyzer::new(lexicon.clone())
        .with_top_n(config.analysis.top_n)
        .with_workers(config.analysis.workers);
    let analysis = analyzer.analyze(&mut jobs);

    if analysis.is_empty() {
        warn!("No skills found in {} jobs", analysis.total_jobs);
    } else {
        report::print_skills_table(&analysis.ranked, analysis.jobs_with_skills);
    }

    let report = AnalysisReport {
        timestamp: report::timestamp(chrono::Local::now()),
        total_jobs: analysis.total_jobs,
        jobs_with_skills: analysis.jobs_with_skills,
        search_keywords,
        discovered_skills: discovered,
        categories: categorize(&analysis.ranked, &lexicon),
        ranked_skills: analysis.ranked,
    };
    let paths = report::write_outputs(&config.output.dir, &report, &jobs, config.analysis.chart_top_n)?;
    println!("Results saved to {}", paths.results.display());
    Ok(())
}

/// Discovery failures never abort the analysis; matching proceeds with the
/// lexicon as it is.
async fn discover_new_skills(
    config: &Config,
    jobs: &[skill_radar::JobRecord],
    lexicon: &Lexicon,
    synonyms: &SynonymTable,
) -> Vec<String> {
    let Some(key) = config.runtime.groq_api_key.clone() else {
        warn!("Discovery enabled but GROQ_API_KEY not set, skipping");
        return Vec::new();
    };
    let client = match GroqClient::new(key, config.discovery.clone()) {
        Ok(client) => client,
        Err(e) => {
            warn!("Cannot create discovery client: {}", e);
            return Vec::new();
        }
    };
    let descriptions: Vec<String> = jobs
        .iter()
        .filter(|j| j.has_description())
        .map(|j| j.text().to_string())
        .collect();
    let known = known_skills(lexicon, synonyms);
    match client.discover(&descriptions, &known).await {
        Ok(found) => found,
        Err(e) => {
            warn!("Skill discovery failed: {}", e);
            Vec::new()
        }
    }
}

fn print_lexicon(lexicon: &Lexicon) {
    for entry in lexicon.entries() {
        let category = entry.category().map(|c| c.label()).unwrap_or(OTHER_LABEL);
        println!("{:<28} {}", entry.name(), category);
    }
    println!("{} entries", lexicon.len());
}
