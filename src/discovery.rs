//! LLM-backed helpers: search keyword generation and new-skill discovery
//!
//! Both talk to an OpenAI-compatible chat completions endpoint (Groq by
//! default). Results are fully resolved before they reach the matcher or the
//! normalizer; nothing in the core engine awaits.

use crate::config::DiscoveryConfig;
use crate::error::{Result, SkillRadarError};
use crate::lexicon::Lexicon;
use crate::normalizer::SynonymTable;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Used when keyword generation fails or returns nothing usable
pub const FALLBACK_KEYWORDS: &[&str] = &[
    "AI Engineer",
    "AI Developer",
    "AI Research Scientist",
    "AI Solutions Architect",
    "AI Product Manager",
    "Senior AI Engineer",
    "AI/ML Engineer",
    "AI Specialist",
    "AI Consultant",
    "AI Team Lead",
];

const KNOWN_SKILLS_IN_PROMPT: usize = 100;
const CHUNK_SEPARATOR: &str = "\n---\n";

static JSON_ARRAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*\]").expect("valid regex"));

#[async_trait]
pub trait SkillDiscoverer: Send + Sync {
    /// Skills mentioned in `descriptions` that are not in `known`
    async fn discover(&self, descriptions: &[String], known: &HashSet<String>) -> Result<Vec<String>>;
}

#[async_trait]
pub trait KeywordSource: Send + Sync {
    async fn search_keywords(&self, count: usize) -> Result<Vec<String>>;
}

/// Names a discoverer should treat as already covered: every lexicon entry
/// plus every alias that folds onto one
pub fn known_skills(lexicon: &Lexicon, synonyms: &SynonymTable) -> HashSet<String> {
    let mut known: HashSet<String> = lexicon.names().map(str::to_string).collect();
    known.extend(
        synonyms
            .aliases()
            .filter(|alias| lexicon.contains(&synonyms.normalize(alias)))
            .map(str::to_string),
    );
    known
}

/// First JSON array of strings embedded in an LLM reply
pub fn extract_json_array(content: &str) -> Option<Vec<String>> {
    let m = JSON_ARRAY.find(content)?;
    let values: Vec<serde_json::Value> = serde_json::from_str(m.as_str()).ok()?;
    Some(
        values
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
    )
}

/// Group descriptions `chunk_size` at a time, joined and cut to `max_chars`
pub fn chunk_descriptions(descriptions: &[String], chunk_size: usize, max_chars: usize) -> Vec<String> {
    descriptions
        .chunks(chunk_size.max(1))
        .map(|chunk| {
            let combined = chunk.join(CHUNK_SEPARATOR);
            combined.chars().take(max_chars).collect()
        })
        .collect()
}

/// Keeps candidates that are new, non-trivial and not yet seen
#[derive(Debug, Default)]
pub struct NewSkillFilter {
    seen_lower: HashSet<String>,
    accepted: Vec<String>,
}

impl NewSkillFilter {
    pub fn new(known: &HashSet<String>) -> Self {
        Self {
            seen_lower: known.iter().map(|s| s.to_lowercase()).collect(),
            accepted: Vec::new(),
        }
    }

    pub fn offer(&mut self, candidate: &str) -> bool {
        let trimmed = candidate.trim();
        if trimmed.chars().count() <= 1 {
            return false;
        }
        if !self.seen_lower.insert(trimmed.to_lowercase()) {
            return false;
        }
        self.accepted.push(trimmed.to_string());
        true
    }

    pub fn into_accepted(self) -> Vec<String> {
        self.accepted
    }
}

/// Run discovery chunk by chunk; a failing chunk is logged and skipped
pub async fn discover_in_chunks<F, Fut>(
    descriptions: &[String],
    known: &HashSet<String>,
    chunk_size: usize,
    max_chars: usize,
    mut ask: F,
) -> Vec<String>
where
    F: FnMut(String) -> Fut,
    Fut: std::future::Future<Output = Result<Vec<String>>>,
{
    let mut filter = NewSkillFilter::new(known);
    let chunks = chunk_descriptions(descriptions, chunk_size, max_chars);
    let total = chunks.len();
    for (i, chunk) in chunks.into_iter().enumerate() {
        match ask(chunk).await {
            Ok(candidates) => {
                let before = filter.accepted.len();
                for c in &candidates {
                    filter.offer(c);
                }
                debug!(
                    "Discovery chunk {}/{}: {} candidates, {} new",
                    i + 1,
                    total,
                    candidates.len(),
                    filter.accepted.len() - before
                );
            }
            Err(e) => warn!("Discovery chunk {}/{} failed: {}", i + 1, total, e),
        }
    }
    filter.into_accepted()
}

fn keyword_prompt(count: usize) -> String {
    format!(
        "Generate exactly {count} job search keywords/titles related to AI and Machine Learning engineering.\n\n\
         Include a variety of:\n\
         - AI/ML engineering roles (e.g., \"Machine Learning Engineer\", \"AI Engineer\")\n\
         - Data science and research roles (e.g., \"Data Scientist\", \"Research Scientist\")\n\
         - Specialized roles (e.g., \"NLP Engineer\", \"Computer Vision Engineer\", \"LLM Developer\")\n\
         - MLOps and infrastructure roles (e.g., \"MLOps Engineer\", \"ML Platform Engineer\")\n\n\
         Return ONLY a JSON array of strings, no other text.\n\
         Example: [\"Machine Learning Engineer\", \"Data Scientist\", \"NLP Engineer\"]"
    )
}

fn discovery_prompt(known_list: &str, combined: &str) -> String {
    format!(
        "Analyze these job descriptions and extract technical skills, tools, frameworks, and technologies.\n\n\
         IMPORTANT: Only return skills that are NOT in this list of already-known skills:\n\
         {known_list}\n\n\
         Job Descriptions:\n\
         {combined}\n\n\
         Find NEW skills/tools/frameworks/technologies that are:\n\
         1. Specific and technical (not generic terms like \"programming\" or \"software\")\n\
         2. NOT already in the known skills list above\n\
         3. Mentioned in these job postings\n\n\
         Return ONLY a JSON array of new skill names. If no new skills found, return empty array [].\n\
         Example: [\"New Tool 1\", \"New Framework 2\"]"
    )
}

fn known_list(known: &HashSet<String>) -> String {
    let mut sorted: Vec<&str> = known.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.truncate(KNOWN_SKILLS_IN_PROMPT);
    sorted.join(", ")
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Groq (OpenAI-compatible) chat client
pub struct GroqClient {
    client: reqwest::Client,
    api_key: String,
    config: DiscoveryConfig,
}

impl GroqClient {
    pub fn new(api_key: String, config: DiscoveryConfig) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(SkillRadarError::Config {
                message: "GROQ_API_KEY environment variable not set".to_string(),
            });
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
            max_tokens: self.config.max_tokens,
        };
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        debug!(
            "Chat completion (model={}, prompt chars={})",
            self.config.model,
            prompt.len()
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(SkillRadarError::Discovery {
                message: format!("chat API error {}: {}", status, text),
            });
        }
        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .ok_or_else(|| SkillRadarError::Discovery {
                message: "chat API returned no content".to_string(),
            })
    }
}

#[async_trait]
impl KeywordSource for GroqClient {
    async fn search_keywords(&self, count: usize) -> Result<Vec<String>> {
        let content = self
            .complete(&keyword_prompt(count), self.config.keyword_temperature)
            .await?;
        match extract_json_array(&content) {
            Some(mut keywords) if !keywords.is_empty() => {
                keywords.truncate(count);
                Ok(keywords)
            }
            _ => Err(SkillRadarError::Discovery {
                message: "keyword reply did not contain a JSON array".to_string(),
            }),
        }
    }
}

#[async_trait]
impl SkillDiscoverer for GroqClient {
    async fn discover(&self, descriptions: &[String], known: &HashSet<String>) -> Result<Vec<String>> {
        if descriptions.is_empty() {
            return Ok(Vec::new());
        }
        let known_names = known_list(known);
        let found = discover_in_chunks(
            descriptions,
            known,
            self.config.chunk_size,
            self.config.max_chunk_chars,
            |combined| {
                let prompt = discovery_prompt(&known_names, &combined);
                async move {
                    let content = self.complete(&prompt, self.config.temperature).await?;
                    Ok(extract_json_array(&content).unwrap_or_default())
                }
            },
        )
        .await;
        info!("Discovered {} new skills", found.len());
        Ok(found)
    }
}

/// Keywords from `source`, or the first `count` fallback keywords on failure
pub async fn keywords_or_fallback(source: Option<&dyn KeywordSource>, count: usize) -> Vec<String> {
    if let Some(source) = source {
        match source.search_keywords(count).await {
            Ok(keywords) => return keywords,
            Err(e) => warn!("Keyword generation failed, using defaults: {}", e),
        }
    }
    FALLBACK_KEYWORDS
        .iter()
        .take(count)
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_array_from_chatty_reply() {
        let reply = "Sure! Here you go:\n[\"LangGraph\", \"Crew AI\", 3]\nHope that helps.";
        assert_eq!(
            extract_json_array(reply),
            Some(vec!["LangGraph".to_string(), "Crew AI".to_string()])
        );
        assert_eq!(extract_json_array("no array here"), None);
        assert_eq!(extract_json_array("[not json"), None);
    }

    #[test]
    fn chunks_are_joined_and_truncated() {
        let descs: Vec<String> = (0..5).map(|i| format!("desc{i}")).collect();
        let chunks = chunk_descriptions(&descs, 2, 1000);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], "desc0\n---\ndesc1");
        assert_eq!(chunks[2], "desc4");

        let short = chunk_descriptions(&descs, 15, 8);
        assert_eq!(short, vec!["desc0\n--".to_string()]);
    }

    #[test]
    fn filter_rejects_known_short_and_repeated() {
        let known: HashSet<String> = ["Python".to_string()].into_iter().collect();
        let mut filter = NewSkillFilter::new(&known);
        assert!(!filter.offer("python"));
        assert!(!filter.offer("R"));
        assert!(!filter.offer("   "));
        assert!(filter.offer(" Streamlit "));
        assert!(!filter.offer("STREAMLIT"));
        assert_eq!(filter.into_accepted(), vec!["Streamlit"]);
    }

    #[test]
    fn known_skills_cover_aliases_of_lexicon_entries() {
        let lexicon = Lexicon::builtin().unwrap();
        let known = known_skills(&lexicon, &SynonymTable::for_lexicon(&lexicon));
        assert!(known.contains("Kubernetes"));
        assert!(known.contains("k8s"));
        assert!(known.contains("golang"));

        let mut filter = NewSkillFilter::new(&known);
        assert!(!filter.offer("K8s"));
        assert!(!filter.offer("Postgres"));
        assert!(filter.offer("Streamlit"));
    }

    #[test]
    fn known_list_is_sorted_and_capped() {
        let known: HashSet<String> = (0..150).map(|i| format!("skill{i:03}")).collect();
        let list = known_list(&known);
        assert!(list.starts_with("skill000, skill001"));
        assert_eq!(list.split(", ").count(), KNOWN_SKILLS_IN_PROMPT);
    }

    #[tokio::test]
    async fn failing_chunks_are_skipped() {
        let descs: Vec<String> = (0..4).map(|i| format!("d{i}")).collect();
        let mut call = 0;
        let found = discover_in_chunks(&descs, &HashSet::new(), 2, 100, |_chunk| {
            call += 1;
            let n = call;
            async move {
                if n == 1 {
                    Err(SkillRadarError::Discovery {
                        message: "boom".to_string(),
                    })
                } else {
                    Ok(vec!["Gradio".to_string()])
                }
            }
        })
        .await;
        assert_eq!(found, vec!["Gradio"]);
    }

    #[tokio::test]
    async fn fallback_keywords_without_source() {
        let keywords = keywords_or_fallback(None, 3).await;
        assert_eq!(keywords, vec!["AI Engineer", "AI Developer", "AI Research Scientist"]);
    }
}
