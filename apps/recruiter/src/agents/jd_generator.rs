use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::agents::complete;
use crate::agents::prompts::{JD_GENERATE_PROMPT_TEMPLATE, JD_REFINE_PROMPT_TEMPLATE};
use crate::errors::AppError;
use crate::llm_client::prompts::{format_additional_info, Prompt};
use crate::llm_client::TextGenerator;

const MAX_TOKENS: u32 = 1024;
const TEMPERATURE: f32 = 0.7;

/// Writes and refines job descriptions.
pub struct JdGenerator {
    llm: Arc<dyn TextGenerator>,
}

impl JdGenerator {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    pub async fn generate(
        &self,
        title: &str,
        skills: &[String],
        experience_level: &str,
        additional_info: &BTreeMap<String, String>,
    ) -> Result<String, AppError> {
        let skills = skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        let prompt = Prompt::from_template(JD_GENERATE_PROMPT_TEMPLATE)
            .set("title", title)
            .set("skills", &skills)
            .set("experience_level", experience_level)
            .set("additional_info", format_additional_info(additional_info, "- "))
            .render();

        info!("Generating job description for '{title}'");
        complete(
            self.llm.as_ref(),
            prompt,
            MAX_TOKENS,
            TEMPERATURE,
            "Job description generation",
        )
        .await
    }

    /// Rewrites `job_description` to address `feedback`.
    pub async fn refine(&self, job_description: &str, feedback: &str) -> Result<String, AppError> {
        let prompt = Prompt::from_template(JD_REFINE_PROMPT_TEMPLATE)
            .set("job_description", job_description)
            .set("feedback", feedback)
            .render();

        complete(
            self.llm.as_ref(),
            prompt,
            MAX_TOKENS,
            TEMPERATURE,
            "Job description refinement",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::mock::MockGenerator;

    #[tokio::test]
    async fn test_generate_prompt_lists_skills_and_extras() {
        let mock = Arc::new(MockGenerator::always("## Role Overview"));
        let agent = JdGenerator::new(mock.clone());
        let extras = BTreeMap::from([
            ("location".to_string(), "Remote".to_string()),
            ("company".to_string(), "Acme".to_string()),
        ]);

        let jd = agent
            .generate(
                "Data Engineer",
                &["Python".to_string(), " SQL ".to_string(), "".to_string()],
                "Senior",
                &extras,
            )
            .await
            .unwrap();

        assert_eq!(jd, "## Role Overview");
        let request = &mock.requests()[0];
        assert_eq!(request.max_tokens, 1024);
        assert!(request.prompt.contains("- Title: Data Engineer"));
        assert!(request.prompt.contains("- Required Skills: Python, SQL\n"));
        assert!(request.prompt.contains("- Company: Acme\n- Location: Remote\n"));
    }

    #[tokio::test]
    async fn test_refine_embeds_feedback() {
        let mock = Arc::new(MockGenerator::always("Better JD"));
        let agent = JdGenerator::new(mock.clone());

        agent.refine("Old JD", "Mention remote work").await.unwrap();

        let prompt = mock.last_prompt().unwrap();
        assert!(prompt.contains("Original Job Description:\nOld JD"));
        assert!(prompt.contains("Feedback to Address:\nMention remote work"));
    }

    #[tokio::test]
    async fn test_backend_failure_surfaces() {
        let agent = JdGenerator::new(Arc::new(MockGenerator::failing()));
        let err = agent.refine("JD", "feedback").await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }
}
