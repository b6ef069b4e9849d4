//! Scans job description text against a lexicon

use crate::lexicon::Lexicon;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Canonical skill names found in one description
pub type SkillSet = BTreeSet<String>;

/// Matches text against an injected, pre-compiled lexicon.
///
/// Rules of an entry are tried in order and the first hit short-circuits the
/// entry; membership is boolean so this only saves work.
#[derive(Debug, Clone)]
pub struct SkillMatcher {
    lexicon: Arc<Lexicon>,
}

impl SkillMatcher {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    pub fn match_text(&self, text: &str) -> SkillSet {
        let mut found = SkillSet::new();
        if text.trim().is_empty() {
            return found;
        }
        let lower = text.to_lowercase();
        for entry in self.lexicon.entries() {
            if entry.rules().iter().any(|rule| rule.is_match(&lower)) {
                found.insert(entry.name().to_string());
            }
        }
        found
    }
}
