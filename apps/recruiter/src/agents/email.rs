use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::agents::complete;
use crate::agents::extract::{extract_subject_body, EmailDraft};
use crate::agents::prompts::EMAIL_PROMPT_TEMPLATE;
use crate::errors::AppError;
use crate::llm_client::prompts::{format_additional_info, Prompt};
use crate::llm_client::TextGenerator;
use crate::services::mailer::Mailer;

pub const DEFAULT_COMPANY_NAME: &str = "Our Company";

const MAX_TOKENS: u32 = 512;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailType {
    ApplicationReceived,
    InterviewInvitation,
    Rejection,
    OfferLetter,
    FollowUp,
    HiringTeamNotification,
}

impl EmailType {
    pub const ALL: [EmailType; 6] = [
        EmailType::ApplicationReceived,
        EmailType::InterviewInvitation,
        EmailType::Rejection,
        EmailType::OfferLetter,
        EmailType::FollowUp,
        EmailType::HiringTeamNotification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmailType::ApplicationReceived => "application_received",
            EmailType::InterviewInvitation => "interview_invitation",
            EmailType::Rejection => "rejection",
            EmailType::OfferLetter => "offer_letter",
            EmailType::FollowUp => "follow_up",
            EmailType::HiringTeamNotification => "hiring_team_notification",
        }
    }
}

impl fmt::Display for EmailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmailType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|t| t.as_str()).collect();
                AppError::invalid_choice("email type", s, &valid)
            })
    }
}

/// Inputs for one recruitment email. `email_type` stays a string so that
/// unknown values are reported with the full list of valid types.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailRequest {
    pub email_type: String,
    pub recipient_name: String,
    pub job_title: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub additional_info: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentEmail {
    pub id: Uuid,
    #[serde(flatten)]
    pub draft: EmailDraft,
}

/// Drafts (and optionally sends) recruitment emails.
pub struct EmailComposer {
    llm: Arc<dyn TextGenerator>,
}

impl EmailComposer {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    /// Validates the email type, then makes one backend call.
    pub async fn generate(&self, request: &EmailRequest) -> Result<EmailDraft, AppError> {
        let email_type: EmailType = request.email_type.parse()?;
        let company = request
            .company_name
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_COMPANY_NAME);

        let prompt = Prompt::from_template(EMAIL_PROMPT_TEMPLATE)
            .set("email_type", email_type.as_str())
            .set("recipient", &request.recipient_name)
            .set("job_title", &request.job_title)
            .set("company", company)
            .set(
                "additional_info",
                format_additional_info(&request.additional_info, "- "),
            )
            .render();

        let text = complete(
            self.llm.as_ref(),
            prompt,
            MAX_TOKENS,
            TEMPERATURE,
            "Email generation",
        )
        .await?;

        Ok(extract_subject_body(&text))
    }

    /// Generates the email and hands it to `mailer`.
    pub async fn send(
        &self,
        request: &EmailRequest,
        recipient_email: &str,
        mailer: &Mailer,
    ) -> Result<SentEmail, AppError> {
        let draft = self.generate(request).await?;
        let id = mailer.send(
            recipient_email,
            Some(&request.recipient_name),
            &draft.subject,
            &draft.body,
        );
        info!("{} email queued as {id}", request.email_type);
        Ok(SentEmail { id, draft })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::mock::MockGenerator;

    fn request(email_type: &str) -> EmailRequest {
        EmailRequest {
            email_type: email_type.to_string(),
            recipient_name: "Jane Doe".to_string(),
            job_title: "Backend Engineer".to_string(),
            company_name: None,
            additional_info: BTreeMap::from([("date".to_string(), "Monday".to_string())]),
        }
    }

    #[tokio::test]
    async fn test_invalid_type_rejected_without_backend_call() {
        let mock = Arc::new(MockGenerator::always("Subject: x"));
        let composer = EmailComposer::new(mock.clone());

        let err = composer.generate(&request("spam")).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidArgument(_)));
        let message = err.to_string();
        for valid in EmailType::ALL {
            assert!(message.contains(valid.as_str()), "missing {valid}");
        }
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_parses_subject_and_defaults_company() {
        let mock = Arc::new(MockGenerator::always(
            "Subject: Interview Invite\n\nHello Jane,\nSee you Monday.",
        ));
        let composer = EmailComposer::new(mock.clone());

        let draft = composer.generate(&request("interview_invitation")).await.unwrap();

        assert_eq!(draft.subject, "Interview Invite");
        assert_eq!(draft.body, "Hello Jane,\nSee you Monday.");
        let prompt = mock.last_prompt().unwrap();
        assert!(prompt.contains("Email Type: interview_invitation"));
        assert!(prompt.contains("Company: Our Company"));
        assert!(prompt.contains("- Date: Monday"));
    }

    #[tokio::test]
    async fn test_send_records_in_mailer() {
        let mock = Arc::new(MockGenerator::always("Subject: Update\nThanks for applying."));
        let composer = EmailComposer::new(mock);
        let mailer = Mailer::new("hr@acme.test", "Acme HR");

        let sent = composer
            .send(&request("application_received"), "jane@example.com", &mailer)
            .await
            .unwrap();

        let history = mailer.history(Some("jane@example.com"));
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, sent.id);
        assert_eq!(history[0].subject, "Update");
        assert_eq!(history[0].recipient.name, "Jane Doe");
    }
}
