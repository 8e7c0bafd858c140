//! Axum route handlers for the stateless agents.

use std::collections::BTreeMap;

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agents::email::{EmailComposer, EmailRequest};
use crate::agents::jd_generator::JdGenerator;
use crate::agents::recommendation::{
    CandidateComparison, CandidateSummary, HireRecommendation, HireRecommender,
};
use crate::agents::resume_ranker::{RankedResume, ResumeInput, ResumeRanker};
use crate::agents::scheduler::{InterviewPlan, InterviewScheduler, PreparationGuide};
use crate::agents::sentiment::{
    ProgressionReport, SentimentAnalyzer, SentimentReport, TopicSentimentReport,
};
use crate::errors::AppError;
use crate::interview::session::InterviewType;
use crate::services::calendar::{CalendarEvent, TimeSlot};
use crate::services::mailer::{EmailRecord, EmailStatus};
use crate::services::documents::extract_text_from_bytes;
use crate::state::AppState;

const DEFAULT_LOCATION: &str = "Virtual";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateJdRequest {
    pub title: String,
    pub skills: Vec<String>,
    pub experience_level: String,
    #[serde(default)]
    pub additional_info: BTreeMap<String, String>,
    /// When set, the result is also saved under this name.
    pub save_as: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefineJdRequest {
    pub job_description: String,
    pub feedback: String,
}

#[derive(Debug, Serialize)]
pub struct JdResponse {
    pub job_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub results: Vec<RankedResume>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateEmailRequest {
    #[serde(flatten)]
    pub email: EmailRequest,
    /// When set, the draft is sent through the simulated mailer.
    pub recipient_email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmailResponse {
    pub subject: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct EmailHistoryQuery {
    pub recipient: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmailHistoryResponse {
    pub emails: Vec<EmailRecord>,
}

#[derive(Debug, Deserialize)]
pub struct SlotsRequest {
    #[serde(default)]
    pub interviewer_ids: Vec<String>,
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SlotsResponse {
    pub slots: Vec<TimeSlot>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub candidate_name: String,
    pub job_title: String,
    pub interviewer_names: Vec<String>,
    pub start: NaiveDateTime,
    pub duration_minutes: Option<u32>,
    pub location: Option<String>,
    #[serde(default)]
    pub additional_info: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Deserialize)]
pub struct PreparationRequest {
    pub job_title: String,
    pub resume: String,
    pub interview_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub job_description: String,
    pub transcript: String,
    pub resume: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub job_description: String,
    pub candidates: Vec<CandidateSummary>,
}

#[derive(Debug, Deserialize)]
pub struct SentimentRequest {
    pub transcript: String,
}

#[derive(Debug, Deserialize)]
pub struct TopicSentimentRequest {
    pub transcript: String,
    pub topics: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jd/generate
pub async fn handle_generate_jd(
    State(state): State<AppState>,
    Json(req): Json<GenerateJdRequest>,
) -> Result<Json<JdResponse>, AppError> {
    require("title", &req.title)?;

    let job_description = JdGenerator::new(state.llm.clone())
        .generate(&req.title, &req.skills, &req.experience_level, &req.additional_info)
        .await?;

    let saved_to = match req.save_as.as_deref() {
        Some(name) => Some(
            state
                .storage
                .save_job_description(name, &job_description)
                .await?
                .display()
                .to_string(),
        ),
        None => None,
    };

    Ok(Json(JdResponse {
        job_description,
        saved_to,
    }))
}

/// POST /api/v1/jd/refine
pub async fn handle_refine_jd(
    State(state): State<AppState>,
    Json(req): Json<RefineJdRequest>,
) -> Result<Json<JdResponse>, AppError> {
    require("job_description", &req.job_description)?;
    require("feedback", &req.feedback)?;

    let job_description = JdGenerator::new(state.llm.clone())
        .refine(&req.job_description, &req.feedback)
        .await?;

    Ok(Json(JdResponse {
        job_description,
        saved_to: None,
    }))
}

/// POST /api/v1/resumes/rank
///
/// Multipart fields: `job_description` (text), `detailed` (`true`/`false`),
/// and one or more `resume` files (PDF or plain text).
pub async fn handle_rank_resumes(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RankResponse>, AppError> {
    let mut job_description = String::new();
    let mut detailed = false;
    let mut resumes = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read field '{name}': {e}")))?;

        match name.as_str() {
            "job_description" => job_description = String::from_utf8_lossy(&data).into_owned(),
            "detailed" => detailed = String::from_utf8_lossy(&data).trim() == "true",
            "resume" => {
                let file_name = file_name.unwrap_or_else(|| format!("resume_{}", resumes.len() + 1));
                let text = extract_text_from_bytes(&file_name, data).await?;
                resumes.push(ResumeInput {
                    name: file_name,
                    text,
                });
            }
            other => tracing::debug!("Ignoring multipart field '{other}'"),
        }
    }

    require("job_description", &job_description)?;
    if resumes.is_empty() {
        return Err(AppError::Validation(
            "At least one resume file is required".to_string(),
        ));
    }

    let results = ResumeRanker::new(state.llm.clone())
        .rank(&job_description, &resumes, detailed)
        .await?;

    Ok(Json(RankResponse { results }))
}

/// POST /api/v1/emails/generate
pub async fn handle_generate_email(
    State(state): State<AppState>,
    Json(req): Json<GenerateEmailRequest>,
) -> Result<Json<EmailResponse>, AppError> {
    require("recipient_name", &req.email.recipient_name)?;

    let mut email = req.email;
    if email.company_name.is_none() {
        email.company_name = Some(state.config.company_name.clone());
    }

    let composer = EmailComposer::new(state.llm.clone());
    let response = match req.recipient_email.as_deref() {
        Some(address) => {
            require("recipient_email", address)?;
            let sent = composer.send(&email, address, &state.mailer).await?;
            EmailResponse {
                subject: sent.draft.subject,
                body: sent.draft.body,
                email_id: Some(sent.id),
            }
        }
        None => {
            let draft = composer.generate(&email).await?;
            EmailResponse {
                subject: draft.subject,
                body: draft.body,
                email_id: None,
            }
        }
    };

    Ok(Json(response))
}

/// GET /api/v1/emails?recipient=
pub async fn handle_email_history(
    State(state): State<AppState>,
    Query(query): Query<EmailHistoryQuery>,
) -> Json<EmailHistoryResponse> {
    Json(EmailHistoryResponse {
        emails: state.mailer.history(query.recipient.as_deref()),
    })
}

/// GET /api/v1/emails/:id
pub async fn handle_email_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EmailStatus>, AppError> {
    state
        .mailer
        .status(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Email {id} not found")))
}

/// POST /api/v1/schedule/slots
pub async fn handle_find_slots(
    State(state): State<AppState>,
    Json(req): Json<SlotsRequest>,
) -> Result<Json<SlotsResponse>, AppError> {
    let duration = req
        .duration_minutes
        .unwrap_or(state.config.default_meeting_duration);

    let slots = scheduler(&state).find_available_slots(
        &req.interviewer_ids,
        duration,
        Local::now().date_naive(),
    );

    Ok(Json(SlotsResponse { slots }))
}

/// POST /api/v1/schedule/interviews
pub async fn handle_schedule_interview(
    State(state): State<AppState>,
    Json(req): Json<ScheduleRequest>,
) -> Result<Json<CalendarEvent>, AppError> {
    require("candidate_name", &req.candidate_name)?;
    require("job_title", &req.job_title)?;

    let plan = InterviewPlan {
        candidate_name: req.candidate_name,
        job_title: req.job_title,
        interviewer_names: req.interviewer_names,
        start: req.start,
        duration_minutes: req
            .duration_minutes
            .unwrap_or(state.config.default_meeting_duration),
        location: req.location.unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        additional_info: req.additional_info,
    };

    Ok(Json(scheduler(&state).schedule_interview(&plan)))
}

/// GET /api/v1/schedule/interviews
pub async fn handle_list_events(State(state): State<AppState>) -> Json<EventsResponse> {
    Json(EventsResponse {
        events: state.calendar.events(),
    })
}

/// POST /api/v1/schedule/preparation
pub async fn handle_preparation(
    State(state): State<AppState>,
    Json(req): Json<PreparationRequest>,
) -> Result<Json<PreparationGuide>, AppError> {
    require("job_title", &req.job_title)?;
    let interview_type = match req.interview_type.as_deref() {
        Some(value) => value.parse::<InterviewType>()?,
        None => InterviewType::default(),
    };

    let guide = scheduler(&state)
        .generate_preparation(&req.job_title, &req.resume, interview_type)
        .await?;

    Ok(Json(guide))
}

/// POST /api/v1/recommendations
pub async fn handle_recommendation(
    State(state): State<AppState>,
    Json(req): Json<RecommendationRequest>,
) -> Result<Json<HireRecommendation>, AppError> {
    require("transcript", &req.transcript)?;

    let recommendation = HireRecommender::new(state.llm.clone())
        .analyze_interview(&req.job_description, &req.transcript, req.resume.as_deref())
        .await?;

    Ok(Json(recommendation))
}

/// POST /api/v1/recommendations/compare
pub async fn handle_compare_candidates(
    State(state): State<AppState>,
    Json(req): Json<CompareRequest>,
) -> Result<Json<CandidateComparison>, AppError> {
    if req.candidates.is_empty() {
        return Err(AppError::Validation(
            "candidates cannot be empty".to_string(),
        ));
    }

    let comparison = HireRecommender::new(state.llm.clone())
        .compare_candidates(&req.job_description, &req.candidates)
        .await?;

    Ok(Json(comparison))
}

/// POST /api/v1/sentiment
pub async fn handle_sentiment(
    State(state): State<AppState>,
    Json(req): Json<SentimentRequest>,
) -> Result<Json<SentimentReport>, AppError> {
    require("transcript", &req.transcript)?;
    let report = SentimentAnalyzer::new(state.llm.clone())
        .analyze(&req.transcript)
        .await?;
    Ok(Json(report))
}

/// POST /api/v1/sentiment/topics
pub async fn handle_sentiment_topics(
    State(state): State<AppState>,
    Json(req): Json<TopicSentimentRequest>,
) -> Result<Json<TopicSentimentReport>, AppError> {
    require("transcript", &req.transcript)?;
    if req.topics.is_empty() {
        return Err(AppError::Validation("topics cannot be empty".to_string()));
    }
    let report = SentimentAnalyzer::new(state.llm.clone())
        .analyze_by_topic(&req.transcript, &req.topics)
        .await?;
    Ok(Json(report))
}

/// POST /api/v1/sentiment/progression
pub async fn handle_sentiment_progression(
    State(state): State<AppState>,
    Json(req): Json<SentimentRequest>,
) -> Result<Json<ProgressionReport>, AppError> {
    require("transcript", &req.transcript)?;
    let report = SentimentAnalyzer::new(state.llm.clone())
        .analyze_progression(&req.transcript)
        .await?;
    Ok(Json(report))
}

fn scheduler(state: &AppState) -> InterviewScheduler {
    InterviewScheduler::new(state.llm.clone(), state.calendar.clone())
}

/// Rejects blank required fields.
pub(crate) fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}
