//! Deterministic template fallback, used whenever the LLM path is
//! unavailable (rate limited, transport failure, or parse failure).

use selscore_core::rationale::{Rationale, RationaleGenerator};
use selscore_core::skill::Skill;

enum ScoreBand {
    Emerging,
    Developing,
    Strong,
}

fn band_for(score: f64) -> ScoreBand {
    if score < 0.4 {
        ScoreBand::Emerging
    } else if score <= 0.7 {
        ScoreBand::Developing
    } else {
        ScoreBand::Strong
    }
}

fn skill_label(skill: Skill) -> &'static str {
    match skill {
        Skill::Empathy => "empathy",
        Skill::ProblemSolving => "problem-solving",
        Skill::SelfRegulation => "self-regulation",
        Skill::Resilience => "resilience",
    }
}

/// Build a template-generated rationale for `skill` at `fused_score`.
/// Deterministic: the same `(skill, fused_score)` always yields the same
/// rationale, so it is safe to call with no external dependency.
pub fn generate_template_rationale(skill: Skill, fused_score: f64) -> Rationale {
    let label = skill_label(skill);
    let (narrative, strengths, growth_suggestions) = match band_for(fused_score) {
        ScoreBand::Emerging => (
            format!(
                "This student is at an early stage of developing {label}. \
                 Recorded observations show the beginnings of relevant skills, \
                 with room to build more consistent habits."
            ),
            vec![format!("shows early signs of {label}")],
            vec![
                format!("practice {label} in small, structured settings"),
                "receive frequent, specific feedback".to_string(),
            ],
        ),
        ScoreBand::Developing => (
            format!(
                "This student shows developing {label}, with consistent but \
                 not yet fully independent application across observed contexts."
            ),
            vec![
                format!("demonstrates {label} in familiar situations"),
                "responds well to guided practice".to_string(),
            ],
            vec![format!("extend {label} to less familiar situations")],
        ),
        ScoreBand::Strong => (
            format!(
                "This student demonstrates strong {label}, applying it \
                 consistently and independently across observed contexts."
            ),
            vec![
                format!("consistently strong {label}"),
                "applies the skill independently".to_string(),
                "serves as a positive model for peers".to_string(),
            ],
            vec![format!("take on more advanced {label} challenges")],
        ),
    };

    Rationale {
        narrative: Rationale::trim_narrative(&narrative),
        strengths: Rationale::cap_list(strengths),
        growth_suggestions: Rationale::cap_list(growth_suggestions),
        generator: RationaleGenerator::Template,
        tokens_consumed: 0,
    }
}
