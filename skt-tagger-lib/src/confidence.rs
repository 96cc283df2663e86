// Scoring of candidate items during the tagger's search.

use crate::config::ScoringConfig;
use crate::types::TaggedItem;

/// Scores one search step: adding `candidate` after `committed`, leaving
/// `remaining` of the current chunk unread. Higher is better. Implementations
/// must be pure; the search may call them in any order.
pub trait Scorer: Send + Sync {
    fn score(&self, committed: &[TaggedItem], candidate: &TaggedItem, remaining: &str) -> f64;
}

/// Prefers long forms and penalizes leftover text and abandoned chunks.
///
/// A recognized form scores `form_weight * len^2 - remainder_penalty *
/// remaining_len`. Giving up on a chunk of `len` characters scores
/// `-(nonform_penalty + remainder_penalty * len * (len + 1) / 2)`: more than
/// the remainder penalties any complete reading of that chunk can collect,
/// so every partial reading of it outranks giving up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthScorer {
    pub form_weight: f64,
    pub remainder_penalty: f64,
    pub nonform_penalty: f64,
}

impl Default for LengthScorer {
    fn default() -> Self {
        ScoringConfig::default().into()
    }
}

impl From<ScoringConfig> for LengthScorer {
    fn from(c: ScoringConfig) -> Self {
        Self {
            form_weight: c.form_weight,
            remainder_penalty: c.remainder_penalty,
            nonform_penalty: c.nonform_penalty,
        }
    }
}

impl Scorer for LengthScorer {
    fn score(&self, _committed: &[TaggedItem], candidate: &TaggedItem, remaining: &str) -> f64 {
        let len = candidate.surface().chars().count() as f64;
        if candidate.is_non_form() {
            return -(self.nonform_penalty + self.remainder_penalty * len * (len + 1.0) / 2.0);
        }
        let remaining_len = remaining.chars().count() as f64;
        self.form_weight * len * len - self.remainder_penalty * remaining_len
    }
}
