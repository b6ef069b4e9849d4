//! Folds free-text skill names onto canonical display names

use crate::lexicon::Lexicon;
use std::collections::HashMap;

/// Lowercase alias -> canonical name
#[derive(Debug, Clone)]
pub struct SynonymTable {
    aliases: HashMap<String, String>,
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SynonymTable {
    pub fn empty() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    /// Built-in alias table; every target is also its own alias
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (alias, canonical) in BUILTIN_ALIASES {
            table.insert(alias, canonical);
        }
        let targets: Vec<String> = table.aliases.values().cloned().collect();
        for canonical in &targets {
            table.insert(canonical, canonical);
        }
        table
    }

    /// Built-in aliases plus an identity alias for every lexicon entry
    pub fn for_lexicon(lexicon: &Lexicon) -> Self {
        let mut table = Self::builtin();
        for name in lexicon.names() {
            table
                .aliases
                .entry(name.to_lowercase())
                .or_insert_with(|| name.to_string());
        }
        table
    }

    pub fn insert(&mut self, alias: &str, canonical: &str) {
        self.aliases
            .insert(alias.trim().to_lowercase(), canonical.to_string());
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Every alias key, lowercase
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }

    /// Canonical form of `raw`; unknown names come back trimmed but otherwise
    /// unchanged. Blank input must be filtered by the caller.
    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        match self.aliases.get(&trimmed.to_lowercase()) {
            Some(canonical) => canonical.clone(),
            None => trimmed.to_string(),
        }
    }

    /// Normalize a list, dropping blank entries
    pub fn normalize_all<S: AsRef<str>>(&self, raw: &[S]) -> Vec<String> {
        raw.iter()
            .map(AsRef::as_ref)
            .filter(|s| !s.trim().is_empty())
            .map(|s| self.normalize(s))
            .collect()
    }
}

const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("python", "Python"),
    ("pytorch", "PyTorch"),
    ("tensorflow", "TensorFlow"),
    ("keras", "Keras"),
    ("scikit-learn", "scikit-learn"),
    ("sklearn", "scikit-learn"),
    ("aws", "AWS"),
    ("amazon web services", "AWS"),
    ("gcp", "GCP"),
    ("google cloud", "GCP"),
    ("azure", "Azure"),
    ("docker", "Docker"),
    ("kubernetes", "Kubernetes"),
    ("k8s", "Kubernetes"),
    ("sql", "SQL"),
    ("mysql", "MySQL"),
    ("postgresql", "PostgreSQL"),
    ("postgres", "PostgreSQL"),
    ("mongodb", "MongoDB"),
    ("mongo", "MongoDB"),
    ("spark", "Apache Spark"),
    ("pyspark", "Apache Spark"),
    ("apache spark", "Apache Spark"),
    ("hadoop", "Hadoop"),
    ("kafka", "Kafka"),
    ("redis", "Redis"),
    ("git", "Git"),
    ("github", "GitHub"),
    ("gitlab", "GitLab"),
    ("linux", "Linux"),
    ("bash", "Bash"),
    ("java", "Java"),
    ("javascript", "JavaScript"),
    ("js", "JavaScript"),
    ("typescript", "TypeScript"),
    ("ts", "TypeScript"),
    ("c++", "C++"),
    ("cpp", "C++"),
    ("c#", "C#"),
    ("csharp", "C#"),
    ("go", "Go"),
    ("golang", "Go"),
    ("rust", "Rust"),
    ("r", "R"),
    ("scala", "Scala"),
    ("julia", "Julia"),
    ("matlab", "MATLAB"),
    ("numpy", "NumPy"),
    ("pandas", "Pandas"),
    ("scipy", "SciPy"),
    ("matplotlib", "Matplotlib"),
    ("seaborn", "Seaborn"),
    ("plotly", "Plotly"),
    ("opencv", "OpenCV"),
    ("nltk", "NLTK"),
    ("spacy", "spaCy"),
    ("huggingface", "Hugging Face"),
    ("hugging face", "Hugging Face"),
    ("transformers", "Transformers"),
    ("langchain", "LangChain"),
    ("llamaindex", "LlamaIndex"),
    ("llama", "LLaMA"),
    ("gpt", "GPT"),
    ("chatgpt", "GPT"),
    ("openai", "OpenAI"),
    ("bert", "BERT"),
    ("fastapi", "FastAPI"),
    ("flask", "Flask"),
    ("django", "Django"),
    ("react", "React"),
    ("vue", "Vue.js"),
    ("angular", "Angular"),
    ("node.js", "Node.js"),
    ("nodejs", "Node.js"),
    ("airflow", "Apache Airflow"),
    ("apache airflow", "Apache Airflow"),
    ("mlflow", "MLflow"),
    ("dvc", "DVC"),
    ("wandb", "Weights & Biases"),
    ("weights & biases", "Weights & Biases"),
    ("tableau", "Tableau"),
    ("power bi", "Power BI"),
    ("powerbi", "Power BI"),
    ("excel", "Excel"),
    ("jupyter", "Jupyter"),
    ("colab", "Google Colab"),
    ("google colab", "Google Colab"),
    ("sagemaker", "AWS SageMaker"),
    ("aws sagemaker", "AWS SageMaker"),
    ("vertex ai", "Vertex AI"),
    ("databricks", "Databricks"),
    ("snowflake", "Snowflake"),
    ("dbt", "dbt"),
    ("terraform", "Terraform"),
    ("ansible", "Ansible"),
    ("jenkins", "Jenkins"),
    ("ci/cd", "CI/CD"),
    ("cicd", "CI/CD"),
    ("agile", "Agile"),
    ("scrum", "Scrum"),
    ("jira", "Jira"),
    ("rag", "RAG"),
    ("llm", "LLM"),
    ("llms", "LLM"),
    ("nlp", "NLP"),
    ("cv", "Computer Vision"),
    ("computer vision", "Computer Vision"),
    ("deep learning", "Deep Learning"),
    ("reinforcement learning", "Reinforcement Learning"),
    ("rl", "Reinforcement Learning"),
    ("gan", "GANs"),
    ("gans", "GANs"),
    ("cnn", "CNN"),
    ("rnn", "RNN"),
    ("lstm", "LSTM"),
    ("attention", "Attention Mechanism"),
];
