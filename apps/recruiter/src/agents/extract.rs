//! Heuristic extraction of structured fields from free-form model output.
//!
//! Every extractor is total: malformed output yields a documented default,
//! never an error. The word-count fallbacks are rough guesses and should not
//! be treated as authoritative.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SCORE: f64 = 50.0;
pub const DEFAULT_CONFIDENCE: u8 = 5;

const SCORE_LABEL: &str = "Score:";
const SUBJECT_LABEL: &str = "Subject:";

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid regex"));
static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+\b").expect("valid regex"));
static CONFIDENCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"confidence[:\s]+(\d+)/10",
        r"confidence[:\s]+(\d+) out of 10",
        r"confidence level[:\s]+(\d+)",
        r"confidence score[:\s]+(\d+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

const HIRE_MARKERS: [&str; 3] = ["hire: yes", "recommendation: hire", "decision: hire"];
const NO_HIRE_MARKERS: [&str; 5] = [
    "hire: no",
    "recommendation: no",
    "decision: no",
    "do not hire",
    "no-hire",
];
const HIRE_WORDS: [&str; 5] = ["excellent", "outstanding", "strong", "impressive", "recommend"];
const NO_HIRE_WORDS: [&str; 5] = ["concerns", "insufficient", "weak", "poor", "not recommend"];

const POSITIVE_WORDS: [&str; 6] = [
    "positive",
    "enthusiastic",
    "confident",
    "excited",
    "interested",
    "engaged",
];
const NEGATIVE_WORDS: [&str; 6] = [
    "negative",
    "nervous",
    "anxious",
    "hesitant",
    "uncomfortable",
    "uncertain",
];

const HIGH_CONFIDENCE_WORDS: [&str; 5] = ["confident", "assertive", "strong", "assured", "definitive"];
const LOW_CONFIDENCE_WORDS: [&str; 5] = ["uncertain", "hesitant", "tentative", "unsure", "doubtful"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HireDecision {
    #[serde(rename = "HIRE")]
    Hire,
    #[serde(rename = "NO-HIRE")]
    NoHire,
}

impl fmt::Display for HireDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HireDecision::Hire => "HIRE",
            HireDecision::NoHire => "NO-HIRE",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

/// Match score in [0, 100].
///
/// 1. First line containing `Score:`: first number after the label, clamped,
///    or [`DEFAULT_SCORE`] when that line has no number.
/// 2. No label: the first integer anywhere in the text that lies in [0, 100].
/// 3. Otherwise [`DEFAULT_SCORE`].
pub fn extract_score(text: &str) -> f64 {
    let labelled = text
        .lines()
        .find_map(|line| line.split_once(SCORE_LABEL).map(|(_, rest)| rest));

    if let Some(rest) = labelled {
        return NUMBER
            .find(rest)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .map_or(DEFAULT_SCORE, |score| score.clamp(0.0, 100.0));
    }

    INTEGER
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<u64>().ok())
        .find(|n| *n <= 100)
        .map(|n| n as f64)
        .unwrap_or(DEFAULT_SCORE)
}

/// Splits a generated email into subject and body.
///
/// The first line starting with `Subject:` is the subject; everything after it
/// is the body. Without one, the first line is the subject.
pub fn extract_subject_body(text: &str) -> EmailDraft {
    let lines: Vec<&str> = text.trim().lines().collect();

    let labelled = lines.iter().enumerate().find_map(|(i, line)| {
        line.strip_prefix(SUBJECT_LABEL)
            .map(|subject| (subject.trim().to_string(), lines[i + 1..].join("\n")))
    });

    match labelled {
        Some((subject, body)) if !subject.is_empty() => EmailDraft {
            subject,
            body: body.trim().to_string(),
        },
        _ => EmailDraft {
            subject: lines.first().map(|l| l.trim().to_string()).unwrap_or_default(),
            body: lines.get(1..).unwrap_or_default().join("\n").trim().to_string(),
        },
    }
}

/// HIRE / NO-HIRE from a recommendation report. Unclear text leans NO-HIRE.
pub fn extract_decision(text: &str) -> HireDecision {
    let lower = text.to_lowercase();

    if lower.contains("recommendation") {
        if contains_any(&lower, &HIRE_MARKERS) {
            return HireDecision::Hire;
        }
        if contains_any(&lower, &NO_HIRE_MARKERS) {
            return HireDecision::NoHire;
        }
    }

    if count_present(&lower, &HIRE_WORDS) > count_present(&lower, &NO_HIRE_WORDS) {
        HireDecision::Hire
    } else {
        HireDecision::NoHire
    }
}

/// Overall sentiment label. Explicit `sentiment: <label>` wins over word counts.
pub fn extract_sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();

    for (marker, sentiment) in [
        ("sentiment: positive", Sentiment::Positive),
        ("sentiment: negative", Sentiment::Negative),
        ("sentiment: neutral", Sentiment::Neutral),
    ] {
        if lower.contains(marker) {
            return sentiment;
        }
    }

    let positive = count_present(&lower, &POSITIVE_WORDS);
    let negative = count_present(&lower, &NEGATIVE_WORDS);
    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

/// Confidence on a 1–10 scale.
pub fn extract_confidence(text: &str) -> u8 {
    let lower = text.to_lowercase();

    for pattern in CONFIDENCE_PATTERNS.iter() {
        if let Some(value) = pattern
            .captures(&lower)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
        {
            return value.clamp(1, 10) as u8;
        }
    }

    let high = count_present(&lower, &HIGH_CONFIDENCE_WORDS);
    let low = count_present(&lower, &LOW_CONFIDENCE_WORDS);
    if high > low {
        7 + (high - low).min(3) as u8
    } else if low > high {
        4 - (low - high).min(3) as u8
    } else {
        DEFAULT_CONFIDENCE
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Number of distinct indicator words present (substring match).
fn count_present(haystack: &str, words: &[&str]) -> usize {
    words.iter().filter(|w| haystack.contains(*w)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_from_label() {
        assert_eq!(extract_score("Score: 87\nAnalysis: solid match"), 87.0);
        assert_eq!(extract_score("Overall\nMatch Score: 72.5 (good)"), 72.5);
    }

    #[test]
    fn test_score_label_is_clamped() {
        assert_eq!(extract_score("Score: 140"), 100.0);
        assert_eq!(extract_score("Score: -5"), 0.0);
    }

    #[test]
    fn test_score_falls_back_to_first_integer_in_range() {
        assert_eq!(
            extract_score("The candidate rates 85 out of 100 overall."),
            85.0
        );
        assert_eq!(extract_score("Worked 2019 to 2023, about 40 projects"), 40.0);
    }

    #[test]
    fn test_score_label_without_number_is_default() {
        assert_eq!(extract_score("Score: N/A\nRoughly 64 percent fit"), DEFAULT_SCORE);
        assert_eq!(extract_score("12 skills listed\nScore: pending"), DEFAULT_SCORE);
    }

    #[test]
    fn test_score_default_when_nothing_qualifies() {
        assert_eq!(extract_score("No numbers here."), DEFAULT_SCORE);
        assert_eq!(extract_score("Year 2024 only"), DEFAULT_SCORE);
        assert_eq!(extract_score(""), DEFAULT_SCORE);
    }

    #[test]
    fn test_subject_body_with_label() {
        let draft = extract_subject_body("Subject: Interview Invite\n\nHello Jane,...");
        assert_eq!(draft.subject, "Interview Invite");
        assert_eq!(draft.body, "Hello Jane,...");
    }

    #[test]
    fn test_subject_label_after_preamble() {
        let draft = extract_subject_body("Here is your email:\nSubject: Offer\nDear Sam,\nWelcome.");
        assert_eq!(draft.subject, "Offer");
        assert_eq!(draft.body, "Dear Sam,\nWelcome.");
    }

    #[test]
    fn test_subject_body_without_label() {
        let draft = extract_subject_body("Thanks for applying\nWe received your application.\nBest");
        assert_eq!(draft.subject, "Thanks for applying");
        assert_eq!(draft.body, "We received your application.\nBest");
    }

    #[test]
    fn test_subject_body_degenerate_inputs() {
        let empty = extract_subject_body("   ");
        assert_eq!(empty.subject, "");
        assert_eq!(empty.body, "");

        let blank_subject = extract_subject_body("Subject:\nHello");
        assert_eq!(blank_subject.subject, "Subject:");
        assert_eq!(blank_subject.body, "Hello");
    }

    #[test]
    fn test_decision_explicit_markers() {
        assert_eq!(
            extract_decision("Overall Recommendation: HIRE. Some concerns, weak on SQL."),
            HireDecision::Hire
        );
        assert_eq!(
            extract_decision("Recommendation: Do not hire despite strong, excellent, impressive answers"),
            HireDecision::NoHire
        );
    }

    #[test]
    fn test_decision_word_counts() {
        assert_eq!(
            extract_decision("Excellent and impressive communicator."),
            HireDecision::Hire
        );
        assert_eq!(extract_decision("Strong but poor and weak."), HireDecision::NoHire);
        assert_eq!(extract_decision("Nothing notable."), HireDecision::NoHire);
    }

    #[test]
    fn test_decision_serializes_with_hyphen() {
        assert_eq!(serde_json::to_string(&HireDecision::NoHire).unwrap(), "\"NO-HIRE\"");
        assert_eq!(HireDecision::Hire.to_string(), "HIRE");
    }

    #[test]
    fn test_sentiment() {
        assert_eq!(
            extract_sentiment("Overall Sentiment: Negative, although engaged"),
            Sentiment::Negative
        );
        assert_eq!(
            extract_sentiment("The candidate was enthusiastic and engaged"),
            Sentiment::Positive
        );
        assert_eq!(
            extract_sentiment("Nervous at first, then confident"),
            Sentiment::Neutral
        );
    }

    #[test]
    fn test_confidence_patterns_and_clamping() {
        assert_eq!(extract_confidence("Confidence: 8/10"), 8);
        assert_eq!(extract_confidence("confidence level: 12"), 10);
        assert_eq!(extract_confidence("Confidence score: 0"), 1);
    }

    #[test]
    fn test_confidence_word_estimate() {
        assert_eq!(extract_confidence("assertive, assured and definitive"), 10);
        assert_eq!(extract_confidence("hesitant and unsure"), 2);
        assert_eq!(extract_confidence("no signal"), DEFAULT_CONFIDENCE);
    }
}
