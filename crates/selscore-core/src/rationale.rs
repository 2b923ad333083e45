//! The short, human-readable narrative returned alongside numeric output.

use serde::{Deserialize, Serialize};

/// Narrative is trimmed to at most this many characters.
pub const NARRATIVE_MAX_CHARS: usize = 600;
/// Strengths/growth suggestions are each capped at this many items.
pub const LIST_MAX_ITEMS: usize = 3;

/// Which path produced a [`Rationale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RationaleGenerator {
    Llm,
    Template,
}

/// The growth-oriented narrative plus bounded strength/growth lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rationale {
    /// At most [`NARRATIVE_MAX_CHARS`] characters after trimming.
    pub narrative: String,
    /// At most [`LIST_MAX_ITEMS`] short phrases.
    pub strengths: Vec<String>,
    /// At most [`LIST_MAX_ITEMS`] short phrases.
    pub growth_suggestions: Vec<String>,
    pub generator: RationaleGenerator,
    pub tokens_consumed: usize,
}

impl Rationale {
    /// Trim `narrative` to [`NARRATIVE_MAX_CHARS`] characters, appending an
    /// ellipsis when truncated. Operates on character boundaries, not
    /// bytes, so it is safe for multi-byte UTF-8 narratives.
    pub fn trim_narrative(narrative: &str) -> String {
        let char_count = narrative.chars().count();
        if char_count <= NARRATIVE_MAX_CHARS {
            return narrative.to_string();
        }
        let truncated: String = narrative.chars().take(NARRATIVE_MAX_CHARS - 1).collect();
        format!("{}…", truncated)
    }

    /// Truncate a strengths/growth-suggestions list to [`LIST_MAX_ITEMS`].
    pub fn cap_list(mut items: Vec<String>) -> Vec<String> {
        items.truncate(LIST_MAX_ITEMS);
        items
    }

    /// `true` if this rationale satisfies the bounded-length invariants
    /// from `spec.md` §8 (property 5).
    pub fn satisfies_invariants(&self) -> bool {
        self.narrative.chars().count() <= NARRATIVE_MAX_CHARS
            && self.strengths.len() <= LIST_MAX_ITEMS
            && self.growth_suggestions.len() <= LIST_MAX_ITEMS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_long_narrative_with_ellipsis() {
        let long = "a".repeat(700);
        let trimmed = Rationale::trim_narrative(&long);
        assert_eq!(trimmed.chars().count(), NARRATIVE_MAX_CHARS);
        assert!(trimmed.ends_with('…'));
    }

    #[test]
    fn leaves_short_narrative_untouched() {
        let short = "Great progress on empathy this week.";
        assert_eq!(Rationale::trim_narrative(short), short);
    }

    #[test]
    fn caps_lists_at_three_items() {
        let items: Vec<String> = (0..10).map(|i| format!("item {i}")).collect();
        let capped = Rationale::cap_list(items);
        assert_eq!(capped.len(), LIST_MAX_ITEMS);
    }

    #[test]
    fn trim_is_multibyte_safe() {
        let narrative = "é".repeat(650);
        let trimmed = Rationale::trim_narrative(&narrative);
        assert_eq!(trimmed.chars().count(), NARRATIVE_MAX_CHARS);
    }
}
