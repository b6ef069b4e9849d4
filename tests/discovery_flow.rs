//! Discovered skills feeding back into matching, with an in-process discoverer

use async_trait::async_trait;
use skill_radar::discovery::{
    KeywordSource, NewSkillFilter, SkillDiscoverer, keywords_or_fallback, known_skills,
};
use skill_radar::*;
use std::collections::HashSet;
use std::sync::Arc;

struct FixedDiscoverer {
    reply: Vec<String>,
}

#[async_trait]
impl SkillDiscoverer for FixedDiscoverer {
    async fn discover(&self, _descriptions: &[String], known: &HashSet<String>) -> Result<Vec<String>> {
        let mut filter = NewSkillFilter::new(known);
        for candidate in &self.reply {
            filter.offer(candidate);
        }
        Ok(filter.into_accepted())
    }
}

struct FailingKeywords;

#[async_trait]
impl KeywordSource for FailingKeywords {
    async fn search_keywords(&self, _count: usize) -> Result<Vec<String>> {
        Err(SkillRadarError::Discovery {
            message: "rate limited".to_string(),
        })
    }
}

#[tokio::test]
async fn discovered_skills_are_matched_afterwards() {
    let lexicon = Arc::new(Lexicon::builtin().unwrap());
    let mut jobs = vec![
        JobRecord::with_description("Build agents with LangGraph and Python"),
        JobRecord::with_description("Streamlit dashboards, some langgraph"),
        JobRecord::with_description("Docker only"),
    ];
    let descriptions: Vec<String> = jobs.iter().map(|j| j.text().to_string()).collect();
    let known: HashSet<String> = lexicon.names().map(str::to_string).collect();

    let discoverer = FixedDiscoverer {
        reply: vec!["LangGraph".to_string(), "Streamlit".to_string(), "Python".to_string()],
    };
    let discovered = discoverer.discover(&descriptions, &known).await.unwrap();
    assert_eq!(discovered, vec!["LangGraph", "Streamlit"]);

    let synonyms = SynonymTable::for_lexicon(&lexicon);
    let grown = Arc::new(lexicon.with_discovered(&discovered, &synonyms).unwrap());
    assert_eq!(grown.len(), lexicon.len() + 2);
    assert!(!lexicon.contains("LangGraph"));

    let analysis = analyze(&mut jobs, grown.clone(), 50);
    assert_eq!(analysis.ranked[0].skill, "LangGraph");
    assert_eq!(analysis.ranked[0].count, 2);
    assert!(jobs[1].skills.contains(&"Streamlit".to_string()));

    let shares = categories::categorize(&analysis.ranked, &grown);
    let other = shares.last().unwrap();
    assert_eq!(other.category, categories::OTHER_LABEL);
    assert_eq!(other.count, 3);
}

#[tokio::test]
async fn discovered_aliases_are_not_counted_twice() {
    let lexicon = Arc::new(Lexicon::builtin().unwrap());
    let synonyms = SynonymTable::for_lexicon(&lexicon);
    let discoverer = FixedDiscoverer {
        reply: vec!["k8s".to_string(), "Golang".to_string(), "Postgres".to_string()],
    };
    let descriptions = vec!["Run k8s clusters, write Golang, tune Postgres".to_string()];

    // aliases are already known, so a filtering discoverer returns nothing
    let known = known_skills(&lexicon, &synonyms);
    assert!(discoverer.discover(&descriptions, &known).await.unwrap().is_empty());

    // a discoverer that ignores `known` still cannot add duplicate names
    let raw = discoverer.discover(&descriptions, &HashSet::new()).await.unwrap();
    let grown = Arc::new(lexicon.with_discovered(&raw, &synonyms).unwrap());
    assert_eq!(grown.len(), lexicon.len());

    let mut jobs = vec![JobRecord::with_description(descriptions[0].as_str())];
    let analysis = analyze(&mut jobs, grown, 50);
    let names: Vec<&str> = analysis.ranked.iter().map(|r| r.skill.as_str()).collect();
    assert_eq!(names, vec!["Go", "Kubernetes", "PostgreSQL"]);
}

#[tokio::test]
async fn keyword_failure_falls_back_to_defaults() {
    let source = FailingKeywords;
    let keywords = keywords_or_fallback(Some(&source as &dyn KeywordSource), 2).await;
    assert_eq!(keywords, vec!["AI Engineer", "AI Developer"]);
}

#[cfg(feature = "live_discovery")]
#[tokio::test]
async fn live_groq_keywords() {
    use skill_radar::config::Config;
    use skill_radar::discovery::GroqClient;

    let config = Config::load().unwrap();
    let Some(key) = config.runtime.groq_api_key.clone() else {
        eprintln!("GROQ_API_KEY not set, skipping");
        return;
    };
    let client = GroqClient::new(key, config.discovery.clone()).unwrap();
    let keywords = client.search_keywords(5).await.unwrap();
    assert!(!keywords.is_empty());
    assert!(keywords.len() <= 5);
}
