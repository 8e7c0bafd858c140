use std::fmt::Write as _;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::agents::complete;
use crate::agents::extract::{extract_decision, HireDecision};
use crate::agents::prompts::{HIRE_ANALYSIS_PROMPT_TEMPLATE, HIRE_COMPARE_PROMPT_TEMPLATE};
use crate::errors::AppError;
use crate::llm_client::prompts::{preview, truncate_chars, Prompt};
use crate::llm_client::TextGenerator;

pub const MAX_INPUT_CHARS: usize = 2000;
/// Job description length echoed back in results.
pub const JD_PREVIEW_CHARS: usize = 100;

const COMPARE_JD_CHARS: usize = 1000;
const COMPARE_SUMMARY_CHARS: usize = 300;
const MAX_TOKENS: u32 = 1024;
const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, Serialize)]
pub struct HireRecommendation {
    pub detailed_analysis: String,
    pub recommendation: HireDecision,
    pub job_description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateSummary {
    pub name: String,
    pub recommendation: String,
    pub detailed_analysis: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateComparison {
    pub comparison: String,
    /// Input order; the model's ranking lives in `comparison` text.
    pub ranking: Vec<String>,
    pub job_description: String,
}

/// Turns interview evidence into a HIRE / NO-HIRE call.
pub struct HireRecommender {
    llm: Arc<dyn TextGenerator>,
}

impl HireRecommender {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    pub async fn analyze_interview(
        &self,
        job_description: &str,
        transcript: &str,
        resume: Option<&str>,
    ) -> Result<HireRecommendation, AppError> {
        let mut context = format!(
            "Job Description:\n{}\n\n",
            truncate_chars(job_description, MAX_INPUT_CHARS)
        );
        if let Some(resume) = resume.filter(|r| !r.trim().is_empty()) {
            let _ = write!(
                context,
                "Candidate Resume:\n{}\n\n",
                truncate_chars(resume, MAX_INPUT_CHARS)
            );
        }
        let _ = write!(
            context,
            "Interview Transcript:\n{}",
            truncate_chars(transcript, MAX_INPUT_CHARS)
        );

        let prompt = HIRE_ANALYSIS_PROMPT_TEMPLATE.replace("{context}", &context);
        let analysis = self.call(prompt, "Hire recommendation").await?;
        let decision = extract_decision(&analysis);
        info!("Hire recommendation: {decision}");

        Ok(HireRecommendation {
            detailed_analysis: analysis,
            recommendation: decision,
            job_description: preview(job_description, JD_PREVIEW_CHARS),
        })
    }

    pub async fn compare_candidates(
        &self,
        job_description: &str,
        candidates: &[CandidateSummary],
    ) -> Result<CandidateComparison, AppError> {
        let mut summaries = String::new();
        for (i, candidate) in candidates.iter().enumerate() {
            let _ = write!(
                summaries,
                "Candidate {}: {}\nRecommendation: {}\nAnalysis Summary: {}...\n\n",
                i + 1,
                candidate.name,
                candidate.recommendation,
                truncate_chars(&candidate.detailed_analysis, COMPARE_SUMMARY_CHARS)
            );
        }

        let prompt = Prompt::from_template(HIRE_COMPARE_PROMPT_TEMPLATE)
            .set("job_description", truncate_chars(job_description, COMPARE_JD_CHARS))
            .set("candidates", summaries.trim_end())
            .render();
        let comparison = self.call(prompt, "Candidate comparison").await?;

        Ok(CandidateComparison {
            comparison,
            ranking: candidates.iter().map(|c| c.name.clone()).collect(),
            job_description: preview(job_description, JD_PREVIEW_CHARS),
        })
    }

    async fn call(&self, prompt: String, operation: &str) -> Result<String, AppError> {
        complete(self.llm.as_ref(), prompt, MAX_TOKENS, TEMPERATURE, operation).await
    }
}
