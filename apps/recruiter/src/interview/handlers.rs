//! Axum route handlers for interview sessions.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::agents::handlers::require;
use crate::errors::AppError;
use crate::interview::phase::Phase;
use crate::interview::session::{
    InterviewContext, InterviewSession, InterviewType, Turn, TurnEvaluation,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartInterviewRequest {
    pub job_title: String,
    pub candidate_name: String,
    #[serde(default)]
    pub job_description: String,
    pub interview_type: Option<String>,
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct StartInterviewResponse {
    pub session_id: Uuid,
    pub message: String,
    pub phase: Phase,
}

#[derive(Debug, Deserialize)]
pub struct AdvanceRequest {
    pub response: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdvanceResponse {
    pub message: String,
    pub is_complete: bool,
    pub phase: Phase,
    pub candidate_turns: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionInfoResponse {
    pub session_id: Uuid,
    pub job_title: String,
    pub candidate_name: String,
    pub job_description: String,
    pub interview_type: InterviewType,
    pub duration_minutes: u32,
    pub started_at: DateTime<Utc>,
    pub phase: Phase,
    pub candidate_turns: usize,
    pub is_complete: bool,
    pub turns: Vec<Turn>,
    pub evaluations: Vec<TurnEvaluation>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub question: String,
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct SavedTranscriptResponse {
    pub path: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews
///
/// Creates a session and returns its opening message. The session is only
/// registered once the opening has been generated.
pub async fn handle_start_interview(
    State(state): State<AppState>,
    Json(req): Json<StartInterviewRequest>,
) -> Result<(StatusCode, Json<StartInterviewResponse>), AppError> {
    require("job_title", &req.job_title)?;
    require("candidate_name", &req.candidate_name)?;

    let interview_type = match req.interview_type.as_deref() {
        Some(value) => value.parse::<InterviewType>()?,
        None => InterviewType::default(),
    };
    let context = InterviewContext::new(
        &req.job_title,
        &req.candidate_name,
        &req.job_description,
        interview_type,
        req.duration_minutes
            .unwrap_or(state.config.default_interview_duration),
    );

    let mut session = InterviewSession::new(state.llm.clone(), context.clone());
    let message = session.initialize(context).await?;
    let phase = session.phase();
    let session_id = state.sessions.insert(session).await;
    info!("Interview session {session_id} started");

    Ok((
        StatusCode::CREATED,
        Json(StartInterviewResponse {
            session_id,
            message,
            phase,
        }),
    ))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionInfoResponse>, AppError> {
    let shared = state.sessions.get(id).await?;
    let session = shared.lock().await;
    let context = session.context();

    Ok(Json(SessionInfoResponse {
        session_id: id,
        job_title: context.job_title().to_string(),
        candidate_name: context.candidate_name().to_string(),
        job_description: context.job_description().to_string(),
        interview_type: context.interview_type(),
        duration_minutes: context.duration_minutes(),
        started_at: session.started_at(),
        phase: session.phase(),
        candidate_turns: session.candidate_turns(),
        is_complete: session.is_complete(),
        turns: session.turns().to_vec(),
        evaluations: session.evaluations().to_vec(),
    }))
}

/// POST /api/v1/interviews/:id/advance
pub async fn handle_advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AdvanceRequest>,
) -> Result<Json<AdvanceResponse>, AppError> {
    let shared = state.sessions.get(id).await?;
    let mut session = shared.lock().await;

    let step = session.advance(req.response.as_deref()).await?;

    Ok(Json(AdvanceResponse {
        message: step.message,
        is_complete: step.is_complete,
        phase: step.phase,
        candidate_turns: session.candidate_turns(),
    }))
}

/// POST /api/v1/interviews/:id/evaluate
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<TurnEvaluation>, AppError> {
    require("question", &req.question)?;
    let shared = state.sessions.get(id).await?;
    let evaluation = shared
        .lock()
        .await
        .evaluate(&req.question, &req.response)
        .await?;
    Ok(Json(evaluation))
}

/// GET /api/v1/interviews/:id/transcript
///
/// Plain-text transcript.
pub async fn handle_get_transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let shared = state.sessions.get(id).await?;
    let transcript = shared.lock().await.render_transcript();
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        transcript,
    ))
}

/// POST /api/v1/interviews/:id/transcript
///
/// Writes the transcript to the interviews directory.
pub async fn handle_save_transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SavedTranscriptResponse>, AppError> {
    let shared = state.sessions.get(id).await?;
    let (candidate, title, transcript) = {
        let session = shared.lock().await;
        (
            session.context().candidate_name().to_string(),
            session.context().job_title().to_string(),
            session.render_transcript(),
        )
    };

    let path = state
        .storage
        .save_transcript(&candidate, &title, &transcript)
        .await?;

    Ok(Json(SavedTranscriptResponse {
        path: path.display().to_string(),
    }))
}

/// DELETE /api/v1/interviews/:id
pub async fn handle_delete_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    info!("Interview session {id} closed");
    Ok(StatusCode::NO_CONTENT)
}
