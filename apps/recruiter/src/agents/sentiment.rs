use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::agents::complete;
use crate::agents::extract::{extract_confidence, extract_sentiment, Sentiment, DEFAULT_CONFIDENCE};
use crate::agents::prompts::{
    SENTIMENT_PROGRESSION_PROMPT_TEMPLATE, SENTIMENT_PROMPT_TEMPLATE,
    SENTIMENT_TOPICS_PROMPT_TEMPLATE,
};
use crate::errors::AppError;
use crate::llm_client::prompts::{truncate_chars, Prompt};
use crate::llm_client::TextGenerator;

pub const MAX_TRANSCRIPT_CHARS: usize = 4000;

const MAX_TOKENS: u32 = 1024;
const TEMPERATURE: f32 = 0.4;

#[derive(Debug, Clone, Serialize)]
pub struct SentimentReport {
    pub detailed_analysis: String,
    pub sentiment: Sentiment,
    pub confidence_score: u8,
    /// Length of the full (untruncated) transcript, in characters.
    pub transcript_length: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentimentReading {
    pub sentiment: Sentiment,
    pub confidence: u8,
}

impl Default for SentimentReading {
    fn default() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            confidence: DEFAULT_CONFIDENCE,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicSentimentReport {
    pub detailed_analysis: String,
    /// Per-topic readings. Not parsed from the analysis; every topic carries the neutral default.
    pub topic_results: BTreeMap<String, SentimentReading>,
    pub transcript_length: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProgressionPhases {
    pub beginning: SentimentReading,
    pub middle: SentimentReading,
    pub ending: SentimentReading,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressionReport {
    pub detailed_analysis: String,
    pub phases: ProgressionPhases,
    pub transcript_length: usize,
}

/// Labels tone and confidence in interview transcripts.
pub struct SentimentAnalyzer {
    llm: Arc<dyn TextGenerator>,
}

impl SentimentAnalyzer {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    pub async fn analyze(&self, transcript: &str) -> Result<SentimentReport, AppError> {
        let prompt = SENTIMENT_PROMPT_TEMPLATE.replace("{transcript}", clip(transcript));
        let analysis = self.call(prompt, "Sentiment analysis").await?;

        Ok(SentimentReport {
            sentiment: extract_sentiment(&analysis),
            confidence_score: extract_confidence(&analysis),
            detailed_analysis: analysis,
            transcript_length: transcript.chars().count(),
        })
    }

    pub async fn analyze_by_topic(
        &self,
        transcript: &str,
        topics: &[String],
    ) -> Result<TopicSentimentReport, AppError> {
        let topic_list: String = topics.iter().map(|t| format!("- {t}\n")).collect();
        let prompt = Prompt::from_template(SENTIMENT_TOPICS_PROMPT_TEMPLATE)
            .set("transcript", clip(transcript))
            .set("topics", topic_list.trim_end())
            .render();
        let analysis = self.call(prompt, "Topic sentiment analysis").await?;

        Ok(TopicSentimentReport {
            detailed_analysis: analysis,
            topic_results: topics
                .iter()
                .map(|t| (t.clone(), SentimentReading::default()))
                .collect(),
            transcript_length: transcript.chars().count(),
        })
    }

    /// How tone shifts from the beginning to the end of the interview.
    pub async fn analyze_progression(&self, transcript: &str) -> Result<ProgressionReport, AppError> {
        let prompt = SENTIMENT_PROGRESSION_PROMPT_TEMPLATE.replace("{transcript}", clip(transcript));
        let analysis = self.call(prompt, "Sentiment progression analysis").await?;

        Ok(ProgressionReport {
            detailed_analysis: analysis,
            phases: ProgressionPhases::default(),
            transcript_length: transcript.chars().count(),
        })
    }

    async fn call(&self, prompt: String, operation: &str) -> Result<String, AppError> {
        complete(self.llm.as_ref(), prompt, MAX_TOKENS, TEMPERATURE, operation).await
    }
}

fn clip(transcript: &str) -> &str {
    truncate_chars(transcript, MAX_TRANSCRIPT_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::mock::MockGenerator;

    #[tokio::test]
    async fn test_analyze_extracts_labels() {
        let mock = Arc::new(MockGenerator::always(
            "Overall Candidate Sentiment: Positive\nConfidence Level: 8/10",
        ));
        let analyzer = SentimentAnalyzer::new(mock.clone());

        let report = analyzer.analyze("Interviewer: Hi\n\nCandidate: Hello!").await.unwrap();

        assert_eq!(report.sentiment, Sentiment::Positive);
        assert_eq!(report.confidence_score, 8);
        assert_eq!(report.transcript_length, 34);
        let request = &mock.requests()[0];
        assert_eq!(request.max_tokens, 1024);
        assert!((request.temperature - 0.4).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_transcript_is_clipped_but_length_is_full() {
        let mock = Arc::new(MockGenerator::always("neutral"));
        let analyzer = SentimentAnalyzer::new(mock.clone());
        let transcript = "x".repeat(MAX_TRANSCRIPT_CHARS * 2);

        let report = analyzer.analyze_progression(&transcript).await.unwrap();

        assert_eq!(report.transcript_length, MAX_TRANSCRIPT_CHARS * 2);
        assert!(!mock
            .last_prompt()
            .unwrap()
            .contains(&"x".repeat(MAX_TRANSCRIPT_CHARS + 1)));
        assert_eq!(report.phases.ending.sentiment, Sentiment::Neutral);
        assert_eq!(report.phases.beginning.confidence, DEFAULT_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_topics_listed_and_defaulted() {
        let mock = Arc::new(MockGenerator::always("Teamwork: very positive"));
        let analyzer = SentimentAnalyzer::new(mock.clone());
        let topics = vec!["Teamwork".to_string(), "Salary".to_string()];

        let report = analyzer.analyze_by_topic("transcript", &topics).await.unwrap();

        assert!(mock.last_prompt().unwrap().contains("- Teamwork\n- Salary\n\nFor each topic"));
        assert_eq!(report.topic_results.len(), 2);
        assert_eq!(report.topic_results["Salary"].sentiment, Sentiment::Neutral);
    }
}
