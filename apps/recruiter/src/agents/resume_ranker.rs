use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::agents::complete;
use crate::agents::extract::extract_score;
use crate::agents::prompts::{
    RESUME_DETAILED_FORMAT, RESUME_DETAILED_INSTRUCTION, RESUME_MATCH_PROMPT_TEMPLATE,
};
use crate::errors::AppError;
use crate::llm_client::prompts::{truncate_chars, Prompt};
use crate::llm_client::TextGenerator;

/// Per-input character cap so both documents fit the model context.
pub const MAX_INPUT_CHARS: usize = 1500;

const MAX_TOKENS: u32 = 512;
const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, Deserialize)]
pub struct ResumeInput {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedResume {
    pub name: String,
    pub score: f64,
    pub analysis: String,
}

/// Scores resumes against a job description.
pub struct ResumeRanker {
    llm: Arc<dyn TextGenerator>,
}

impl ResumeRanker {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    /// Scores every resume (one backend call each) and returns them best first.
    /// Ties keep input order.
    pub async fn rank(
        &self,
        job_description: &str,
        resumes: &[ResumeInput],
        detailed: bool,
    ) -> Result<Vec<RankedResume>, AppError> {
        info!("Ranking {} resumes", resumes.len());

        let mut ranked = Vec::with_capacity(resumes.len());
        for resume in resumes {
            let (score, analysis) = self
                .analyze_match(job_description, &resume.text, detailed)
                .await?;
            debug!("{} scored {score}", resume.name);
            ranked.push(RankedResume {
                name: resume.name.clone(),
                score,
                analysis,
            });
        }

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(ranked)
    }

    /// Returns the extracted score and the raw model analysis.
    pub async fn analyze_match(
        &self,
        job_description: &str,
        resume_text: &str,
        detailed: bool,
    ) -> Result<(f64, String), AppError> {
        let (instruction, format) = if detailed {
            (RESUME_DETAILED_INSTRUCTION, RESUME_DETAILED_FORMAT)
        } else {
            ("", "")
        };

        let prompt = Prompt::from_template(RESUME_MATCH_PROMPT_TEMPLATE)
            .set("job_description", truncate_chars(job_description, MAX_INPUT_CHARS))
            .set("resume", truncate_chars(resume_text, MAX_INPUT_CHARS))
            .set("analysis_instruction", instruction)
            .set("analysis_format", format)
            .render();

        let analysis = complete(
            self.llm.as_ref(),
            prompt,
            MAX_TOKENS,
            TEMPERATURE,
            "Resume match analysis",
        )
        .await?;

        Ok((extract_score(&analysis), analysis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::mock::MockGenerator;

    fn resume(name: &str) -> ResumeInput {
        ResumeInput {
            name: name.to_string(),
            text: format!("{name} resume"),
        }
    }

    #[tokio::test]
    async fn test_rank_sorts_by_score_descending() {
        let mock = Arc::new(MockGenerator::scripted([
            "Score: 40",
            "Score: 91\nAnalysis: great",
            "no score given",
            "Score: 40",
        ]));
        let ranker = ResumeRanker::new(mock.clone());

        let ranked = ranker
            .rank("JD", &[resume("a"), resume("b"), resume("c"), resume("d")], false)
            .await
            .unwrap();

        let order: Vec<_> = ranked.iter().map(|r| (r.name.as_str(), r.score)).collect();
        assert_eq!(order, vec![("b", 91.0), ("c", 50.0), ("a", 40.0), ("d", 40.0)]);
        assert_eq!(mock.call_count(), 4);
    }

    #[tokio::test]
    async fn test_detailed_flag_changes_prompt() {
        let mock = Arc::new(MockGenerator::always("Score: 70"));
        let ranker = ResumeRanker::new(mock.clone());

        ranker.analyze_match("JD", "CV", false).await.unwrap();
        assert!(!mock.last_prompt().unwrap().contains("Analysis:"));

        ranker.analyze_match("JD", "CV", true).await.unwrap();
        let prompt = mock.last_prompt().unwrap();
        assert!(prompt.contains("4. Provide a detailed analysis"));
        assert!(prompt.ends_with("Analysis: [your detailed analysis]"));
    }

    #[tokio::test]
    async fn test_inputs_truncated() {
        let mock = Arc::new(MockGenerator::always("Score: 70"));
        let ranker = ResumeRanker::new(mock.clone());
        let long_resume = "r".repeat(MAX_INPUT_CHARS + 10);

        ranker.analyze_match("JD", &long_resume, false).await.unwrap();

        let prompt = mock.last_prompt().unwrap();
        assert!(prompt.contains(&"r".repeat(MAX_INPUT_CHARS)));
        assert!(!prompt.contains(&"r".repeat(MAX_INPUT_CHARS + 1)));
    }

    #[tokio::test]
    async fn test_failure_aborts_ranking() {
        let mock = Arc::new(MockGenerator::scripted(["Score: 10"]));
        let ranker = ResumeRanker::new(mock);
        let result = ranker.rank("JD", &[resume("a"), resume("b")], false).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
