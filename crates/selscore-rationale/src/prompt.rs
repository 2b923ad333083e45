//! Prompt assembly from a fused assessment, bounded by a token budget.

use crate::tokenizer::estimate_tokens;
use selscore_core::evidence::Evidence;
use selscore_core::skill::Skill;

/// Build the prompt sent to the LLM, citing at most `evidence_count`
/// top-ranked evidence items (the caller passes a shrinking `evidence_count`
/// across retries when the assembled prompt would exceed its budget).
pub fn assemble_prompt(
    skill: Skill,
    fused_score: f64,
    evidence: &[Evidence],
    evidence_count: usize,
) -> String {
    let mut prompt = format!(
        "Write a short, growth-oriented narrative about a student's {} skill. \
         The fused assessment score is {:.2} on a 0-1 scale. \
         Cite the following observations:\n",
        skill.as_str(),
        fused_score
    );

    for item in evidence.iter().take(evidence_count) {
        prompt.push_str(&format!(
            "- source: {}, score: {:.2}, relevance: {:.2}, reference: {}\n",
            item.source.as_str(),
            item.normalized_score,
            item.relevance,
            item.provenance
        ));
    }

    prompt.push_str(
        "Respond with a JSON object: narrative (<=600 chars), \
         strengths (<=3 short phrases), growth_suggestions (<=3 short phrases).",
    );
    prompt
}

/// Estimated token cost of the assembled prompt.
pub fn prompt_token_cost(skill: Skill, fused_score: f64, evidence: &[Evidence], evidence_count: usize) -> usize {
    estimate_tokens(&assemble_prompt(skill, fused_score, evidence, evidence_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use selscore_core::evidence::EvidenceSource;

    fn sample_evidence(n: usize) -> Vec<Evidence> {
        (0..n)
            .map(|i| Evidence {
                source: EvidenceSource::Model,
                skill: Skill::Empathy,
                normalized_score: 0.5,
                relevance: 0.5,
                provenance: format!("ref-{i}"),
                captured_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn prompt_includes_only_requested_evidence_count() {
        let evidence = sample_evidence(10);
        let prompt = assemble_prompt(Skill::Empathy, 0.7, &evidence, 3);
        assert_eq!(prompt.matches("source:").count(), 3);
    }

    #[test]
    fn fewer_evidence_items_cost_fewer_tokens() {
        let evidence = sample_evidence(10);
        let full = prompt_token_cost(Skill::Empathy, 0.7, &evidence, 10);
        let reduced = prompt_token_cost(Skill::Empathy, 0.7, &evidence, 2);
        assert!(reduced < full);
    }
}
