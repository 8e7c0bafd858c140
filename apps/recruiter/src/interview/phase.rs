//! Interview phases, a pure function of how many times the candidate has spoken.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stage of a simulated interview.
///
/// Never stored on the session: always recomputed from the turn list via
/// [`Phase::from_candidate_turns`], so it cannot drift out of sync with history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Introduction,
    Background,
    TechnicalSkills,
    Behavioral,
    CandidateQuestions,
    Conclusion,
}

impl Phase {
    /// Maps a candidate-turn count onto its phase.
    ///
    /// | candidate turns | phase |
    /// |---|---|
    /// | 0 | introduction |
    /// | 1–2 | background |
    /// | 3–5 | technical_skills |
    /// | 6–8 | behavioral |
    /// | 9–10 | candidate_questions |
    /// | ≥11 | conclusion |
    pub fn from_candidate_turns(count: usize) -> Self {
        match count {
            0 => Phase::Introduction,
            1..=2 => Phase::Background,
            3..=5 => Phase::TechnicalSkills,
            6..=8 => Phase::Behavioral,
            9..=10 => Phase::CandidateQuestions,
            _ => Phase::Conclusion,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Introduction => "introduction",
            Phase::Background => "background",
            Phase::TechnicalSkills => "technical_skills",
            Phase::Behavioral => "behavioral",
            Phase::CandidateQuestions => "candidate_questions",
            Phase::Conclusion => "conclusion",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Conclusion)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
