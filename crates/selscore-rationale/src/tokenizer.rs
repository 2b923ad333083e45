//! Heuristic token-count estimation for prompt-budget decisions.
//!
//! There is no real tokenizer dependency wired into this workspace, so
//! prompt sizing uses the same per-character heuristic this codebase
//! already relies on elsewhere for context-window budgeting, narrowed to
//! the English-only narratives this engine assembles.

/// Estimate the token count of `text`.
///
/// English words cost roughly 0.25 tokens per letter, digits 0.3 tokens
/// each, and punctuation/whitespace 0.5 tokens each, then a 10% safety
/// buffer is added.
pub fn estimate_tokens(text: &str) -> usize {
    let mut tokens = 0f64;
    for line in text.lines() {
        let letters = line.chars().filter(|c| c.is_ascii_alphabetic()).count() as f64;
        let digits = line.chars().filter(|c| c.is_ascii_digit()).count() as f64;
        let punctuation = line.chars().filter(|c| !c.is_alphanumeric()).count() as f64;

        tokens += letters * 0.25;
        tokens += digits * 0.3;
        tokens += punctuation * 0.5;
    }
    (tokens * 1.1).ceil() as usize
}
