//! The closed set of assessed social-emotional skills.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four assessed social-emotional competencies.
///
/// Stable string identifiers (`as_str`) are used everywhere a skill crosses
/// a persistence or wire boundary: config documents, metrics records, HTTP
/// paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Empathy,
    ProblemSolving,
    SelfRegulation,
    Resilience,
}

impl Skill {
    /// All skills, in a stable order. Used to iterate the closed set.
    pub const ALL: [Skill; 4] = [
        Skill::Empathy,
        Skill::ProblemSolving,
        Skill::SelfRegulation,
        Skill::Resilience,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Skill::Empathy => "empathy",
            Skill::ProblemSolving => "problem_solving",
            Skill::SelfRegulation => "self_regulation",
            Skill::Resilience => "resilience",
        }
    }

    pub fn parse(s: &str) -> Option<Skill> {
        match s {
            "empathy" => Some(Skill::Empathy),
            "problem_solving" => Some(Skill::ProblemSolving),
            "self_regulation" => Some(Skill::SelfRegulation),
            "resilience" => Some(Skill::Resilience),
            _ => None,
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
