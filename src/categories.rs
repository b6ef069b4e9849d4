//! Category breakdown of a ranking (the data behind the category chart)

use crate::lexicon::{Category, Lexicon};
use crate::ranker::RankedSkill;
use serde::{Deserialize, Serialize};

pub const OTHER_LABEL: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub count: usize,
}

/// Sum ranked counts per lexicon category. Categories with nothing are
/// omitted; skills without a category (including discovered ones) go to
/// "Other", which is always last.
pub fn categorize(ranked: &[RankedSkill], lexicon: &Lexicon) -> Vec<CategoryShare> {
    let mut totals: Vec<(Category, usize)> = Category::ALL.iter().map(|&c| (c, 0)).collect();
    let mut other = 0usize;

    for entry in ranked {
        match lexicon.category_of(&entry.skill) {
            Some(category) => {
                if let Some(slot) = totals.iter_mut().find(|(c, _)| *c == category) {
                    slot.1 += entry.count;
                }
            }
            None => other += entry.count,
        }
    }

    // stable: ties keep Category::ALL order
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(category, count)| CategoryShare {
            category: category.label().to_string(),
            count,
        })
        .collect();
    if other > 0 {
        shares.push(CategoryShare {
            category: OTHER_LABEL.to_string(),
            count: other,
        });
    }
    shares
}
