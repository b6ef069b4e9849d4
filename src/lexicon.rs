//! Skill lexicon: canonical skill names mapped to compiled match rules
//!
//! The lexicon is built once (builtin table, optionally extended from a TOML
//! file or with discovered skills) and is immutable afterwards. Matchers hold
//! it behind an `Arc` so every job is scanned against the same compiled rules.

use crate::error::{Result, SkillRadarError};
use crate::normalizer::SynonymTable;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Coarse grouping used for the category breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Language,
    MlFramework,
    Cloud,
    Data,
    DevOps,
    Visualization,
    Concept,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Language,
        Category::MlFramework,
        Category::Cloud,
        Category::Data,
        Category::DevOps,
        Category::Visualization,
        Category::Concept,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Language => "Programming Languages",
            Category::MlFramework => "ML/AI Frameworks",
            Category::Cloud => "Cloud Platforms",
            Category::Data => "Data & Databases",
            Category::DevOps => "DevOps & Tools",
            Category::Visualization => "Visualization",
            Category::Concept => "AI/ML Concepts",
        }
    }
}

/// A single case-insensitive rule. When a guard is present, an occurrence only
/// counts if the text right after it does not match the guard.
#[derive(Debug, Clone)]
pub struct MatchRule {
    pattern: Regex,
    guard: Option<Regex>,
}

impl MatchRule {
    pub fn new(pattern: &str, unless_followed_by: Option<&str>) -> Result<Self> {
        let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        let guard = match unless_followed_by {
            Some(g) => Some(
                RegexBuilder::new(&format!("^(?:{})", g))
                    .case_insensitive(true)
                    .build()?,
            ),
            None => None,
        };
        Ok(Self { pattern, guard })
    }

    /// Rule matching `term` verbatim, delimited by non-word characters.
    /// `\b` cannot be used here because terms such as "C++" end in a non-word char.
    pub fn literal(term: &str) -> Result<Self> {
        let pattern = format!(r"(?:^|\W){}(?:\W|$)", regex::escape(term.trim()));
        Self::new(&pattern, None)
    }

    pub fn is_match(&self, text: &str) -> bool {
        match &self.guard {
            None => self.pattern.is_match(text),
            Some(guard) => self
                .pattern
                .find_iter(text)
                .any(|m| !guard.is_match(&text[m.end()..])),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LexiconEntry {
    name: String,
    category: Option<Category>,
    rules: Vec<MatchRule>,
}

impl LexiconEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }
}

/// Immutable table of canonical skill names and their rules, in insertion order
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
    index: HashMap<String, usize>,
}

impl Lexicon {
    pub fn builder() -> LexiconBuilder {
        LexiconBuilder::default()
    }

    /// The default AI/ML lexicon
    pub fn builtin() -> Result<Self> {
        LexiconBuilder::with_builtin()?.build()
    }

    /// Parse a lexicon consisting only of the entries in a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut builder = Self::builder();
        builder.extend_from_toml(content)?;
        builder.build()
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&LexiconEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn category_of(&self, name: &str) -> Option<Category> {
        self.get(name).and_then(|e| e.category)
    }

    /// New lexicon with a literal entry for every discovered skill, folded
    /// through `synonyms` first. Names that normalize onto an existing entry
    /// (compared case-insensitively) are dropped. `self` is left untouched.
    pub fn with_discovered<S: AsRef<str>>(
        &self,
        discovered: &[S],
        synonyms: &SynonymTable,
    ) -> Result<Self> {
        let mut builder = LexiconBuilder {
            entries: self.entries.clone(),
        };
        let mut known: HashSet<String> = self.names().map(str::to_lowercase).collect();
        for raw in discovered {
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                continue;
            }
            let name = synonyms.normalize(raw);
            if !known.insert(name.to_lowercase()) {
                debug!("Discovered skill '{}' is already known as '{}'", raw, name);
                continue;
            }
            let mut rules = vec![MatchRule::literal(&name)?];
            if !raw.eq_ignore_ascii_case(&name) {
                rules.push(MatchRule::literal(raw)?);
            }
            builder.entries.push(LexiconEntry {
                name,
                category: None,
                rules,
            });
        }
        debug!(
            "Lexicon grown from {} to {} entries with discovered skills",
            self.len(),
            builder.entries.len()
        );
        builder.build()
    }
}

/// One `[[skill]]` table of a lexicon TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct SkillDefinition {
    pub name: String,
    #[serde(default)]
    pub category: Option<Category>,
    /// Regular expressions; when empty the name itself is matched literally
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub unless_followed_by: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    skill: Vec<SkillDefinition>,
}

#[derive(Debug, Default)]
pub struct LexiconBuilder {
    entries: Vec<LexiconEntry>,
}

impl LexiconBuilder {
    pub fn with_builtin() -> Result<Self> {
        let mut builder = Self::default();
        for skill in BUILTIN_SKILLS {
            builder.entry(
                skill.name,
                skill.category,
                skill.patterns,
                skill.unless_followed_by,
            )?;
        }
        Ok(builder)
    }

    /// Add a new entry. Canonical names must be unique.
    pub fn entry(
        &mut self,
        name: &str,
        category: Option<Category>,
        patterns: &[&str],
        unless_followed_by: Option<&str>,
    ) -> Result<&mut Self> {
        if self.entries.iter().any(|e| e.name == name) {
            return Err(SkillRadarError::Lexicon {
                message: format!("duplicate canonical name '{}'", name),
            });
        }
        let entry = compile_entry(name, category, patterns, unless_followed_by)?;
        self.entries.push(entry);
        Ok(self)
    }

    /// Add an entry, replacing the rules and category of an existing one
    pub fn upsert(&mut self, def: &SkillDefinition) -> Result<&mut Self> {
        let patterns: Vec<&str> = def.patterns.iter().map(String::as_str).collect();
        let entry = if patterns.is_empty() {
            LexiconEntry {
                name: def.name.trim().to_string(),
                category: def.category,
                rules: vec![MatchRule::literal(&def.name)?],
            }
        } else {
            compile_entry(
                def.name.trim(),
                def.category,
                &patterns,
                def.unless_followed_by.as_deref(),
            )?
        };
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => {
                debug!("Overriding lexicon entry '{}'", entry.name);
                *existing = entry;
            }
            None => self.entries.push(entry),
        }
        Ok(self)
    }

    pub fn extend_from_toml(&mut self, content: &str) -> Result<&mut Self> {
        let file: LexiconFile = toml::from_str(content)?;
        for def in &file.skill {
            self.upsert(def)?;
        }
        Ok(self)
    }

    pub fn extend_from_file(&mut self, path: &Path) -> Result<&mut Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SkillRadarError::Lexicon {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        self.extend_from_toml(&content)
    }

    pub fn build(self) -> Result<Lexicon> {
        let mut index = HashMap::with_capacity(self.entries.len());
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.name.is_empty() {
                return Err(SkillRadarError::Lexicon {
                    message: "empty canonical name".to_string(),
                });
            }
            if index.insert(entry.name.clone(), i).is_some() {
                return Err(SkillRadarError::Lexicon {
                    message: format!("duplicate canonical name '{}'", entry.name),
                });
            }
        }
        Ok(Lexicon {
            entries: self.entries,
            index,
        })
    }
}

fn compile_entry(
    name: &str,
    category: Option<Category>,
    patterns: &[&str],
    unless_followed_by: Option<&str>,
) -> Result<LexiconEntry> {
    if patterns.is_empty() {
        return Err(SkillRadarError::Lexicon {
            message: format!("entry '{}' has no match rules", name),
        });
    }
    let rules = patterns
        .iter()
        .map(|p| MatchRule::new(p, unless_followed_by))
        .collect::<Result<Vec<_>>>()
        .map_err(|e| SkillRadarError::Lexicon {
            message: format!("entry '{}': {}", name, e),
        })?;
    Ok(LexiconEntry {
        name: name.to_string(),
        category,
        rules,
    })
}

struct BuiltinSkill {
    name: &'static str,
    category: Option<Category>,
    patterns: &'static [&'static str],
    unless_followed_by: Option<&'static str>,
}

const fn skill(
    name: &'static str,
    category: Option<Category>,
    patterns: &'static [&'static str],
) -> BuiltinSkill {
    BuiltinSkill {
        name,
        category,
        patterns,
        unless_followed_by: None,
    }
}

const fn guarded(
    name: &'static str,
    category: Option<Category>,
    patterns: &'static [&'static str],
    unless_followed_by: &'static str,
) -> BuiltinSkill {
    BuiltinSkill {
        name,
        category,
        patterns,
        unless_followed_by: Some(unless_followed_by),
    }
}

use Category::*;

#[rustfmt::skip]
const BUILTIN_SKILLS: &[BuiltinSkill] = &[
    // Languages
    skill("Python", Some(Language), &[r"\bpython\d?\b"]),
    guarded("Java", Some(Language), &[r"\bjava\b"], r"[\s-]*script\b"),
    skill("JavaScript", Some(Language), &[r"\bjava[\s-]?script\b", r"\becmascript\b"]),
    skill("TypeScript", Some(Language), &[r"\btypescript\b"]),
    skill("C++", Some(Language), &[r"(?:^|[^a-z0-9+])c\+\+", r"\bcpp\b"]),
    skill("C#", Some(Language), &[r"(?:^|[^a-z0-9])c#", r"\bcsharp\b"]),
    skill("Go", Some(Language), &[
        r"\bgolang\b",
        r"\bgo\s+(?:programming|language)\b",
        r"\bgo\s*(?:,|/)\s*(?:rust|python|java|c\+\+)",
        r"\b(?:python|java|rust|c\+\+)\s*(?:,|/)\s*go\b",
    ]),
    skill("Rust", Some(Language), &[r"\brust\b"]),
    guarded("R", Some(Language), &[
        r"\br\s+(?:programming|language)\b",
        r"\b(?:python|sql|scala|julia|matlab)\s*(?:,|/|and|or)\s*r\b",
        r"\br\s*(?:,|/|and|or)\s*(?:python|sql|scala|julia|matlab)\b",
        r"\brstudio\b",
    ], r"\s*[&/]\s*d\b"),
    skill("Scala", Some(Language), &[r"\bscala\b"]),
    skill("Julia", Some(Language), &[r"\bjulia\b"]),
    skill("MATLAB", Some(Language), &[r"\bmatlab\b"]),
    skill("Bash", Some(Language), &[r"\bbash\b", r"\bshell scripting\b"]),
    // ML frameworks and libraries
    skill("TensorFlow", Some(MlFramework), &[r"\btensorflow\b"]),
    skill("PyTorch", Some(MlFramework), &[r"\bpytorch\b"]),
    skill("Keras", Some(MlFramework), &[r"\bkeras\b"]),
    skill("JAX", Some(MlFramework), &[r"\bjax\b"]),
    skill("scikit-learn", Some(MlFramework), &[r"\bscikit[\s-]?learn\b", r"\bsklearn\b"]),
    skill("XGBoost", Some(MlFramework), &[r"\bxgboost\b"]),
    skill("Hugging Face", Some(MlFramework), &[r"\bhugging\s?face\b"]),
    skill("Transformers", Some(MlFramework), &[r"\btransformers\b", r"\btransformer\s+(?:models?|architectures?)\b"]),
    skill("OpenCV", Some(MlFramework), &[r"\bopencv\b"]),
    skill("NLTK", Some(MlFramework), &[r"\bnltk\b"]),
    skill("spaCy", Some(MlFramework), &[r"\bspacy\b"]),
    skill("LangChain", Some(MlFramework), &[r"\blangchain\b"]),
    skill("LlamaIndex", Some(MlFramework), &[r"\bllama[\s-]?index\b"]),
    skill("NumPy", None, &[r"\bnumpy\b"]),
    skill("Pandas", None, &[r"\bpandas\b"]),
    skill("SciPy", None, &[r"\bscipy\b"]),
    skill("Jupyter", None, &[r"\bjupyter(?:lab)?\b"]),
    skill("Google Colab", None, &[r"\b(?:google\s+)?colab\b"]),
    skill("FastAPI", None, &[r"\bfastapi\b"]),
    skill("Flask", None, &[r"\bflask\b"]),
    skill("Django", None, &[r"\bdjango\b"]),
    guarded("React", None, &[r"\breact(?:\.?js)?\b"], r"\s+(?:to|quickly)\b"),
    skill("Vue.js", None, &[r"\bvue(?:\.?js)?\b"]),
    skill("Angular", None, &[r"\bangular(?:js)?\b"]),
    skill("Node.js", None, &[r"\bnode(?:\.js|js)\b"]),
    // Cloud
    skill("AWS", Some(Cloud), &[r"\baws\b", r"\bamazon web services\b"]),
    skill("GCP", Some(Cloud), &[r"\bgcp\b", r"\bgoogle cloud(?:\s+platform)?\b"]),
    skill("Azure", Some(Cloud), &[r"\bazure\b"]),
    skill("AWS SageMaker", Some(Cloud), &[r"\bsagemaker\b"]),
    skill("Vertex AI", Some(Cloud), &[r"\bvertex\s+ai\b"]),
    skill("Databricks", Some(Cloud), &[r"\bdatabricks\b"]),
    // Data
    skill("SQL", Some(Data), &[r"\bsql\b"]),
    skill("MySQL", Some(Data), &[r"\bmysql\b"]),
    skill("PostgreSQL", Some(Data), &[r"\bpostgres(?:ql)?\b"]),
    skill("MongoDB", Some(Data), &[r"\bmongo(?:db)?\b"]),
    skill("Redis", Some(Data), &[r"\bredis\b"]),
    skill("Snowflake", Some(Data), &[r"\bsnowflake\b"]),
    guarded("Apache Spark", Some(Data), &[r"\bapache\s+spark\b", r"\bpyspark\b", r"\bspark\b"],
        r"\s+(?:joy|innovation|curiosity|change|ideas?)\b"),
    skill("Hadoop", Some(Data), &[r"\bhadoop\b"]),
    skill("Kafka", Some(Data), &[r"\bkafka\b"]),
    skill("Pinecone", Some(Data), &[r"\bpinecone\b"]),
    // DevOps and tooling
    skill("Docker", Some(DevOps), &[r"\bdocker\b"]),
    skill("Kubernetes", Some(DevOps), &[r"\bkubernetes\b", r"\bk8s\b"]),
    guarded("Git", Some(DevOps), &[r"\bgit\b"], r"[\s-]*(?:hub|lab)\b"),
    skill("GitHub", Some(DevOps), &[r"\bgit[\s-]?hub\b"]),
    skill("GitLab", Some(DevOps), &[r"\bgit[\s-]?lab\b"]),
    skill("Jenkins", Some(DevOps), &[r"\bjenkins\b"]),
    skill("CI/CD", Some(DevOps), &[r"\bci\s*/\s*cd\b", r"\bcicd\b", r"\bcontinuous integration\b"]),
    skill("Terraform", Some(DevOps), &[r"\bterraform\b"]),
    skill("Ansible", None, &[r"\bansible\b"]),
    skill("MLflow", Some(DevOps), &[r"\bmlflow\b"]),
    skill("Apache Airflow", Some(DevOps), &[r"\b(?:apache\s+)?airflow\b"]),
    skill("dbt", Some(DevOps), &[r"\bdbt\b"]),
    skill("DVC", None, &[r"\bdvc\b"]),
    skill("Weights & Biases", None, &[r"\bweights\s*(?:&|and)\s*biases\b", r"\bwandb\b", r"\bw&b\b"]),
    skill("Linux", None, &[r"\blinux\b"]),
    skill("Jira", None, &[r"\bjira\b"]),
    skill("Agile", None, &[r"\bagile\b"]),
    skill("Scrum", None, &[r"\bscrum\b"]),
    // Visualization
    skill("Tableau", Some(Visualization), &[r"\btableau\b"]),
    skill("Power BI", Some(Visualization), &[r"\bpower\s?bi\b"]),
    skill("Matplotlib", Some(Visualization), &[r"\bmatplotlib\b"]),
    skill("Seaborn", Some(Visualization), &[r"\bseaborn\b"]),
    skill("Plotly", Some(Visualization), &[r"\bplotly\b"]),
    guarded("Excel", None, &[r"\bexcel\b"], r"\s+(?:in|at|as|when|under)\b"),
    // Concepts and model families
    skill("LLM", Some(Concept), &[r"\bllms?\b", r"\blarge language models?\b"]),
    skill("NLP", Some(Concept), &[r"\bnlp\b", r"\bnatural language processing\b"]),
    skill("Computer Vision", Some(Concept), &[r"\bcomputer vision\b"]),
    skill("Deep Learning", Some(Concept), &[r"\bdeep learning\b"]),
    skill("Reinforcement Learning", Some(Concept), &[r"\breinforcement learning\b", r"\brlhf\b"]),
    skill("RAG", Some(Concept), &[r"\brag\b", r"\bretrieval[\s-]augmented generation\b"]),
    skill("GANs", Some(Concept), &[r"\bgans?\b", r"\bgenerative adversarial networks?\b"]),
    skill("CNN", Some(Concept), &[r"\bcnns?\b", r"\bconvolutional neural networks?\b"]),
    skill("RNN", Some(Concept), &[r"\brnns?\b", r"\brecurrent neural networks?\b"]),
    skill("LSTM", Some(Concept), &[r"\blstms?\b"]),
    skill("BERT", Some(Concept), &[r"\bbert\b"]),
    skill("GPT", Some(Concept), &[r"\bgpt(?:-?\d(?:\.\d)?o?)?\b", r"\bchatgpt\b"]),
    guarded("LLaMA", None, &[r"\bllama(?:\s*\d(?:\.\d)?)?\b"], r"[\s-]*index\b"),
    skill("OpenAI", None, &[r"\bopenai\b"]),
    skill("Attention Mechanism", None, &[r"\battention mechanisms?\b", r"\bself-attention\b"]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_are_unique_and_compile() {
        let lexicon = Lexicon::builtin().unwrap();
        assert_eq!(lexicon.len(), BUILTIN_SKILLS.len());
        assert!(lexicon.contains("PyTorch"));
        assert_eq!(lexicon.category_of("AWS"), Some(Category::Cloud));
        assert_eq!(lexicon.category_of("NumPy"), None);
    }

    #[test]
    fn duplicate_entry_is_rejected() {
        let mut builder = Lexicon::builder();
        builder.entry("Rust", None, &[r"\brust\b"], None).unwrap();
        let err = builder.entry("Rust", None, &[r"\brustlang\b"], None);
        assert!(matches!(err, Err(SkillRadarError::Lexicon { .. })));
    }

    #[test]
    fn invalid_pattern_is_a_lexicon_error() {
        let mut builder = Lexicon::builder();
        let err = builder.entry("Broken", None, &[r"(unclosed"], None);
        assert!(matches!(err, Err(SkillRadarError::Lexicon { .. })));
    }

    #[test]
    fn guard_discards_only_guarded_occurrences() {
        let rule = MatchRule::new(r"\bjava\b", Some(r"[\s-]*script\b")).unwrap();
        assert!(!rule.is_match("java script and javascript"));
        assert!(rule.is_match("java script, and plain java too"));
    }

    #[test]
    fn literal_rule_handles_symbol_suffixes() {
        let rule = MatchRule::literal("C++").unwrap();
        assert!(rule.is_match("modern c++ required"));
        assert!(rule.is_match("c++"));
        assert!(!rule.is_match("abc++"));
        assert!(!rule.is_match("c++11"));
    }

    #[test]
    fn toml_entries_upsert_over_builtin() {
        let mut builder = LexiconBuilder::with_builtin().unwrap();
        builder
            .extend_from_toml(
                r#"
                [[skill]]
                name = "LangGraph"
                category = "ml_framework"
                patterns = ['\blanggraph\b']

                [[skill]]
                name = "Rust"
                category = "language"
                patterns = ['\brust(?:lang)?\b']
                "#,
            )
            .unwrap();
        let lexicon = builder.build().unwrap();
        assert_eq!(lexicon.len(), BUILTIN_SKILLS.len() + 1);
        assert_eq!(lexicon.category_of("LangGraph"), Some(Category::MlFramework));
        let rust = lexicon.get("Rust").unwrap();
        assert!(rust.rules()[0].is_match("rustlang"));
    }

    #[test]
    fn toml_entry_without_patterns_matches_its_name() {
        let lexicon = Lexicon::from_toml("[[skill]]\nname = \"Crew AI\"\n").unwrap();
        let entry = lexicon.get("Crew AI").unwrap();
        assert!(entry.rules()[0].is_match("agents built on crew ai."));
    }

    #[test]
    fn discovered_skills_extend_a_copy() {
        let base = Lexicon::builtin().unwrap();
        let grown = base
            .with_discovered(
                &["Streamlit", "pytorch", "  ", "Gradio", "Streamlit"],
                &SynonymTable::for_lexicon(&base),
            )
            .unwrap();
        assert_eq!(grown.len(), base.len() + 2);
        assert!(grown.contains("Streamlit"));
        assert!(!base.contains("Streamlit"));
    }

    #[test]
    fn discovered_aliases_fold_onto_existing_entries() {
        let base = Lexicon::builtin().unwrap();
        let synonyms = SynonymTable::for_lexicon(&base);
        let grown = base
            .with_discovered(&["k8s", "Golang", "Postgres", "sklearn"], &synonyms)
            .unwrap();
        assert_eq!(grown.len(), base.len());
        assert!(!grown.contains("Golang"));
        assert!(!grown.contains("k8s"));
    }

    #[test]
    fn discovered_alias_of_missing_target_keeps_both_spellings() {
        let mut builder = LexiconBuilder::default();
        builder.entry("Python", None, &[r"\bpython\b"], None).unwrap();
        let base = builder.build().unwrap();
        let mut synonyms = SynonymTable::empty();
        synonyms.insert("hf", "Hugging Face");
        let grown = base.with_discovered(&["HF"], &synonyms).unwrap();
        let entry = grown.get("Hugging Face").unwrap();
        assert_eq!(entry.rules().len(), 2);
        assert!(entry.rules().iter().any(|r| r.is_match("models from hf hub")));
        assert!(!grown.contains("HF"));
    }
}
