//! Interview Session: the multi-turn interview state machine.
//!
//! Flow: initialize → advance × N → (conclusion) → render_transcript.
//! `evaluate` is a side channel: it may run any number of times, in any order
//! relative to `advance`, and never touches the turn list.
//!
//! One session is owned by exactly one caller; hosts that share sessions must
//! serialize access (see `interview::registry`).

use std::fmt::{self, Write as _};
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::interview::phase::Phase;
use crate::interview::prompts::{
    CLOSING_PROMPT_TEMPLATE, EVALUATION_PROMPT_TEMPLATE, NEXT_QUESTION_PROMPT_TEMPLATE,
    OPENING_PROMPT_TEMPLATE,
};
use crate::llm_client::prompts::{truncate_chars, Prompt};
use crate::llm_client::{GenerationRequest, TextGenerator};

/// Max characters of job description carried into the interview context.
pub const MAX_JOB_DESCRIPTION_CHARS: usize = 1500;
/// Number of most recent turns fed back into each prompt.
pub const HISTORY_WINDOW: usize = 10;

const DIALOGUE_MAX_TOKENS: u32 = 512;
const DIALOGUE_TEMPERATURE: f32 = 0.7;
const EVALUATION_TEMPERATURE: f32 = 0.3;
/// Keeps the model from scripting the candidate's reply.
const CANDIDATE_STOP: &str = "\nCandidate:";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    #[default]
    Technical,
    Behavioral,
    Cultural,
    Screening,
}

impl InterviewType {
    pub const ALL: [InterviewType; 4] = [
        InterviewType::Technical,
        InterviewType::Behavioral,
        InterviewType::Cultural,
        InterviewType::Screening,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Technical => "technical",
            InterviewType::Behavioral => "behavioral",
            InterviewType::Cultural => "cultural",
            InterviewType::Screening => "screening",
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|t| t.as_str()).collect();
                AppError::invalid_choice("interview type", s, &valid)
            })
    }
}

/// Fixed facts about the interview. Read-only once constructed.
#[derive(Debug, Clone, Serialize)]
pub struct InterviewContext {
    job_title: String,
    candidate_name: String,
    job_description: String,
    interview_type: InterviewType,
    duration_minutes: u32,
}

impl InterviewContext {
    /// The job description is cut to `MAX_JOB_DESCRIPTION_CHARS` characters.
    pub fn new(
        job_title: &str,
        candidate_name: &str,
        job_description: &str,
        interview_type: InterviewType,
        duration_minutes: u32,
    ) -> Self {
        Self {
            job_title: job_title.trim().to_string(),
            candidate_name: candidate_name.trim().to_string(),
            job_description: truncate_chars(job_description, MAX_JOB_DESCRIPTION_CHARS)
                .to_string(),
            interview_type,
            duration_minutes,
        }
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn candidate_name(&self) -> &str {
        &self.candidate_name
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn interview_type(&self) -> InterviewType {
        self.interview_type
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// The context block embedded in every interview prompt.
    fn render(&self) -> String {
        format!(
            "Job Title: {}\nCandidate: {}\nInterview Type: {}\nInterview Duration: {} minutes\n\nJob Description:\n{}",
            self.job_title,
            self.candidate_name,
            self.interview_type,
            self.duration_minutes,
            self.job_description
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Interviewer,
    Candidate,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Interviewer => "Interviewer",
            Role::Candidate => "Candidate",
        }
    }
}

/// One message in the exchange. Position in the turn list is its sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub message: String,
}

impl Turn {
    fn interviewer(message: &str) -> Self {
        Self {
            role: Role::Interviewer,
            message: message.to_string(),
        }
    }

    fn candidate(message: &str) -> Self {
        Self {
            role: Role::Candidate,
            message: message.to_string(),
        }
    }
}

/// Raw analysis of one answer. Stored apart from the turn list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnEvaluation {
    pub question: String,
    pub response: String,
    pub raw_analysis: String,
}

/// Result of one `advance` step.
#[derive(Debug, Clone, Serialize)]
pub struct Advance {
    pub message: String,
    pub is_complete: bool,
    pub phase: Phase,
}

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

pub struct InterviewSession {
    llm: Arc<dyn TextGenerator>,
    context: InterviewContext,
    turns: Vec<Turn>,
    evaluations: Vec<TurnEvaluation>,
    started_at: DateTime<Utc>,
}

impl InterviewSession {
    /// Creates a session with an empty history. Call `initialize` for the opening
    /// message, or `advance(None)` to go straight to a first question.
    pub fn new(llm: Arc<dyn TextGenerator>, context: InterviewContext) -> Self {
        Self {
            llm,
            context,
            turns: Vec::new(),
            evaluations: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn context(&self) -> &InterviewContext {
        &self.context
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn evaluations(&self) -> &[TurnEvaluation] {
        &self.evaluations
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn candidate_turns(&self) -> usize {
        self.turns
            .iter()
            .filter(|t| t.role == Role::Candidate)
            .count()
    }

    /// Current phase, derived from the turn list on every call.
    pub fn phase(&self) -> Phase {
        Phase::from_candidate_turns(self.candidate_turns())
    }

    /// The closing message, once it has been produced.
    ///
    /// The closing is always the interviewer turn that follows the candidate
    /// turn which moved the session into conclusion.
    pub fn closing_message(&self) -> Option<&str> {
        if !self.phase().is_terminal() {
            return None;
        }
        self.turns
            .last()
            .filter(|t| t.role == Role::Interviewer)
            .map(|t| t.message.as_str())
    }

    pub fn is_complete(&self) -> bool {
        self.closing_message().is_some()
    }

    /// Starts (or restarts) the interview with `context` and returns the opening message.
    ///
    /// State is replaced only after the backend call succeeds.
    pub async fn initialize(&mut self, context: InterviewContext) -> Result<String, AppError> {
        let prompt = Prompt::from_template(OPENING_PROMPT_TEMPLATE)
            .set("interview_type", context.interview_type.as_str())
            .set("job_title", &context.job_title)
            .set("context", context.render())
            .render();

        let opening = self
            .call(prompt, DIALOGUE_TEMPERATURE, false, "Opening message")
            .await?;

        info!(
            "Interview initialized: {} for {} ({})",
            context.candidate_name, context.job_title, context.interview_type
        );

        self.context = context;
        self.turns = vec![Turn::interviewer(&opening)];
        self.evaluations.clear();
        self.started_at = Utc::now();

        Ok(opening)
    }

    /// Records the candidate's answer (if any) and produces the next interviewer message.
    /// Any non-empty answer is recorded verbatim, including whitespace-only text.
    ///
    /// In conclusion the first call generates and records the closing message; every
    /// later call returns that same closing without contacting the backend or
    /// recording anything. On backend failure the candidate turn is rolled back.
    pub async fn advance(&mut self, candidate_response: Option<&str>) -> Result<Advance, AppError> {
        if let Some(closing) = self.closing_message() {
            if candidate_response.is_some() {
                warn!("Interview already concluded; ignoring candidate response");
            }
            return Ok(Advance {
                message: closing.to_string(),
                is_complete: true,
                phase: Phase::Conclusion,
            });
        }

        let recorded_response = match candidate_response {
            Some(response) if !response.is_empty() => {
                self.turns.push(Turn::candidate(response));
                true
            }
            _ => false,
        };

        let phase = self.phase();
        debug!(
            "Advancing interview: phase={phase}, candidate_turns={}",
            self.candidate_turns()
        );

        let generated = if phase.is_terminal() {
            self.generate_closing().await
        } else {
            self.generate_question(phase).await
        };

        match generated {
            Ok(message) => {
                self.turns.push(Turn::interviewer(&message));
                Ok(Advance {
                    message,
                    is_complete: phase.is_terminal(),
                    phase,
                })
            }
            Err(e) => {
                if recorded_response {
                    self.turns.pop();
                }
                Err(e)
            }
        }
    }

    /// Scores one question/answer pair and appends it to the evaluation list.
    pub async fn evaluate(
        &mut self,
        question: &str,
        response: &str,
    ) -> Result<TurnEvaluation, AppError> {
        let prompt = Prompt::from_template(EVALUATION_PROMPT_TEMPLATE)
            .set("question", question)
            .set("response", response)
            .render();

        let raw_analysis = self
            .call(prompt, EVALUATION_TEMPERATURE, false, "Response evaluation")
            .await?;

        let evaluation = TurnEvaluation {
            question: question.to_string(),
            response: response.to_string(),
            raw_analysis,
        };
        self.evaluations.push(evaluation.clone());

        Ok(evaluation)
    }

    /// Serializes the full turn list. Pure: no backend call, same output every time.
    pub fn render_transcript(&self) -> String {
        let mut transcript = format!(
            "Interview Transcript\n{}\nJob Position: {}\nDate: {}\n\n",
            "=".repeat(20),
            self.context.job_title,
            self.started_at.format("%Y-%m-%d")
        );
        for turn in &self.turns {
            let _ = write!(transcript, "{}: {}\n\n", turn.role.label(), turn.message);
        }
        transcript
    }

    /// The last `HISTORY_WINDOW` turns, labelled, for prompt inclusion.
    pub(crate) fn format_history(&self) -> String {
        let start = self.turns.len().saturating_sub(HISTORY_WINDOW);
        self.turns[start..]
            .iter()
            .map(|t| format!("{}: {}\n\n", t.role.label(), t.message))
            .collect()
    }

    async fn generate_question(&self, phase: Phase) -> Result<String, AppError> {
        let prompt = Prompt::from_template(NEXT_QUESTION_PROMPT_TEMPLATE)
            .set("phase", phase.as_str())
            .set("context", self.context.render())
            .set("history", self.format_history())
            .render();

        self.call(prompt, DIALOGUE_TEMPERATURE, true, "Next question")
            .await
    }

    async fn generate_closing(&self) -> Result<String, AppError> {
        let prompt = Prompt::from_template(CLOSING_PROMPT_TEMPLATE)
            .set("context", self.context.render())
            .set("history", self.format_history())
            .render();

        self.call(prompt, DIALOGUE_TEMPERATURE, true, "Closing message")
            .await
    }

    async fn call(
        &self,
        prompt: String,
        temperature: f32,
        follows_history: bool,
        operation: &str,
    ) -> Result<String, AppError> {
        let mut request = GenerationRequest::new(prompt)
            .max_tokens(DIALOGUE_MAX_TOKENS)
            .temperature(temperature);
        if follows_history {
            request = request.stop(vec![CANDIDATE_STOP.to_string()]);
        }

        self.llm
            .generate(&request)
            .await
            .map_err(|e| AppError::llm(operation, e))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::mock::MockGenerator;

    fn context() -> InterviewContext {
        InterviewContext::new(
            "Backend Engineer",
            "Jane Doe",
            "Build and operate Rust services.",
            InterviewType::Technical,
            45,
        )
    }

    fn session_with(mock: &Arc<MockGenerator>) -> InterviewSession {
        InterviewSession::new(mock.clone(), context())
    }

    #[test]
    fn test_job_description_truncated_by_characters() {
        let long = "é".repeat(MAX_JOB_DESCRIPTION_CHARS + 200);
        let ctx = InterviewContext::new("T", "C", &long, InterviewType::Technical, 30);
        assert_eq!(ctx.job_description().chars().count(), MAX_JOB_DESCRIPTION_CHARS);
    }

    #[test]
    fn test_interview_type_parsing() {
        assert_eq!(
            "Behavioral".parse::<InterviewType>().unwrap(),
            InterviewType::Behavioral
        );
        let err = "panel".parse::<InterviewType>().unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
        assert!(err.to_string().contains("technical, behavioral, cultural, screening"));
    }

    #[tokio::test]
    async fn test_initialize_records_opening_and_resets_state() {
        let mock = Arc::new(MockGenerator::always("Welcome! Tell me about yourself."));
        let mut session = session_with(&mock);

        let opening = session.initialize(context()).await.unwrap();

        assert_eq!(opening, "Welcome! Tell me about yourself.");
        assert_eq!(session.turns().len(), 1);
        assert_eq!(session.turns()[0].role, Role::Interviewer);
        assert_eq!(session.phase(), Phase::Introduction);

        let request = &mock.requests()[0];
        assert_eq!(request.max_tokens, 512);
        assert!(request.prompt.contains("technical interview for a Backend Engineer"));
        assert!(request.prompt.contains("ice-breaker"));

        session.advance(Some("Hi")).await.unwrap();
        session.evaluate("Q", "A").await.unwrap();
        session.initialize(context()).await.unwrap();
        assert_eq!(session.turns().len(), 1);
        assert!(session.evaluations().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_response_is_recorded_and_empty_is_not() {
        let mock = Arc::new(MockGenerator::always("Could you elaborate?"));
        let mut session = session_with(&mock);
        session.initialize(context()).await.unwrap();

        session.advance(Some("   ")).await.unwrap();
        assert_eq!(session.candidate_turns(), 1);
        assert_eq!(session.turns()[1].message, "   ");

        session.advance(Some("")).await.unwrap();
        assert_eq!(session.candidate_turns(), 1);
        assert_eq!(session.turns().len(), 4);
    }

    #[tokio::test]
    async fn test_user_text_is_not_expanded_as_placeholders() {
        let mock = Arc::new(MockGenerator::always("Next?"));
        let ctx = InterviewContext::new(
            "Backend Engineer",
            "Jane Doe",
            "Own the {history} service",
            InterviewType::Technical,
            45,
        );
        let mut session = InterviewSession::new(mock.clone(), ctx.clone());
        session.initialize(ctx).await.unwrap();
        session.advance(Some("I like {phase} work")).await.unwrap();

        let prompt = mock.last_prompt().unwrap();
        assert!(prompt.contains("Own the {history} service"));
        assert!(prompt.contains("Candidate: I like {phase} work"));
        assert_eq!(prompt.matches("Candidate: I like").count(), 1);

        session
            .evaluate("What does {response} mean?", "It means {question}")
            .await
            .unwrap();
        let prompt = mock.last_prompt().unwrap();
        assert!(prompt.contains("Question: What does {response} mean?"));
        assert!(prompt.contains("It means {question}"));
    }

    #[tokio::test]
    async fn test_advance_without_response_on_empty_session_is_first_question() {
        let mock = Arc::new(MockGenerator::always("What drew you to this role?"));
        let mut session = session_with(&mock);

        let step = session.advance(None).await.unwrap();

        assert!(!step.is_complete);
        assert_eq!(step.phase, Phase::Introduction);
        assert_eq!(session.turns().len(), 1);
        let prompt = mock.last_prompt().unwrap();
        assert!(prompt.contains("Current Stage: introduction"));
    }

    #[tokio::test]
    async fn test_response_counts_before_phase_recompute() {
        let mock = Arc::new(MockGenerator::always("Next?"));
        let mut session = session_with(&mock);
        session.initialize(context()).await.unwrap();

        let step = session.advance(Some("I have five years of Rust.")).await.unwrap();

        assert_eq!(step.phase, Phase::Background);
        assert!(mock.last_prompt().unwrap().contains("Current Stage: background"));
        assert_eq!(mock.requests()[0].stop, Vec::<String>::new());
        assert_eq!(mock.requests()[1].stop, vec!["\nCandidate:".to_string()]);
        assert!(mock
            .last_prompt()
            .unwrap()
            .contains("Candidate: I have five years of Rust."));
    }

    #[tokio::test]
    async fn test_phases_progress_through_full_interview() {
        let mock = Arc::new(MockGenerator::always("Question"));
        let mut session = session_with(&mock);
        session.initialize(context()).await.unwrap();

        let mut phases = Vec::new();
        for i in 1..=11 {
            let step = session.advance(Some(&format!("answer {i}"))).await.unwrap();
            phases.push(step.phase);
            assert_eq!(step.is_complete, i == 11, "answer {i}");
        }

        assert_eq!(phases[0], Phase::Background);
        assert_eq!(phases[2], Phase::TechnicalSkills);
        assert_eq!(phases[5], Phase::Behavioral);
        assert_eq!(phases[8], Phase::CandidateQuestions);
        assert_eq!(phases[10], Phase::Conclusion);
        assert!(phases.windows(2).all(|w| w[0] <= w[1]));
        assert!(mock.last_prompt().unwrap().contains("concluding a job interview"));
    }

    #[tokio::test]
    async fn test_conclusion_is_a_fixed_point() {
        let mock = Arc::new(MockGenerator::always("Question"));
        let mut session = session_with(&mock);
        session.initialize(context()).await.unwrap();
        for i in 1..=10 {
            session.advance(Some(&format!("answer {i}"))).await.unwrap();
        }
        mock.push_response("Thank you for your time, Jane.");
        let closing = session.advance(Some("final answer")).await.unwrap();
        assert!(closing.is_complete);
        assert_eq!(closing.message, "Thank you for your time, Jane.");

        let turns_after_closing = session.turns().len();
        let calls_after_closing = mock.call_count();

        for _ in 0..3 {
            let again = session.advance(Some("one more thing")).await.unwrap();
            assert!(again.is_complete);
            assert_eq!(again.phase, Phase::Conclusion);
            assert_eq!(again.message, "Thank you for your time, Jane.");
        }
        let again = session.advance(None).await.unwrap();
        assert!(again.is_complete);

        assert_eq!(session.turns().len(), turns_after_closing);
        assert_eq!(mock.call_count(), calls_after_closing);
        assert_eq!(session.candidate_turns(), 11);
        assert_eq!(session.closing_message(), Some("Thank you for your time, Jane."));
    }

    #[tokio::test]
    async fn test_history_window_is_last_ten_turns() {
        let mock = Arc::new(MockGenerator::default());
        for i in 1..=8 {
            mock.push_response(&format!("interviewer-{i:02}"));
        }
        mock.push_response("interviewer-09");
        let mut session = session_with(&mock);

        session.initialize(context()).await.unwrap();
        for i in 1..=7 {
            session
                .advance(Some(&format!("candidate-{i:02}")))
                .await
                .unwrap();
        }
        assert_eq!(session.turns().len(), 15);

        let history = session.format_history();
        let labelled = history
            .split("\n\n")
            .filter(|block| !block.is_empty())
            .count();
        assert_eq!(labelled, HISTORY_WINDOW);

        session.advance(None).await.unwrap();
        let prompt = mock.last_prompt().unwrap();
        assert!(prompt.contains(&history));
        // turns[0..5] fall outside the window
        for old in ["interviewer-01", "candidate-01", "interviewer-02", "candidate-02", "interviewer-03"] {
            assert!(!prompt.contains(old), "{old} leaked into the prompt");
        }
        for recent in ["candidate-03", "interviewer-04", "candidate-07", "interviewer-08"] {
            assert!(prompt.contains(recent), "{recent} missing from the prompt");
        }
    }

    #[tokio::test]
    async fn test_backend_failure_rolls_back_candidate_turn() {
        let mock = Arc::new(MockGenerator::scripted(["Opening"]));
        let mut session = session_with(&mock);
        session.initialize(context()).await.unwrap();

        mock.push_failure();
        let err = session.advance(Some("my answer")).await.unwrap_err();

        assert!(matches!(err, AppError::Llm(_)));
        assert_eq!(session.turns().len(), 1);
        assert_eq!(session.candidate_turns(), 0);
    }

    #[tokio::test]
    async fn test_initialize_failure_leaves_state_untouched() {
        let mock = Arc::new(MockGenerator::scripted(["Opening", "Question"]));
        let mut session = session_with(&mock);
        session.initialize(context()).await.unwrap();
        session.advance(Some("answer")).await.unwrap();

        mock.push_failure();
        assert!(session.initialize(context()).await.is_err());
        assert_eq!(session.turns().len(), 3);
    }

    #[tokio::test]
    async fn test_evaluate_does_not_touch_turns_or_phase() {
        let mock = Arc::new(MockGenerator::always("Relevance: 8"));
        let mut session = session_with(&mock);
        session.initialize(context()).await.unwrap();
        session.advance(Some("answer")).await.unwrap();
        let turns_before = session.turns().to_vec();
        let phase_before = session.phase();

        let evaluation = session
            .evaluate("Why Rust?", "Memory safety without GC.")
            .await
            .unwrap();
        session.evaluate("Why Rust?", "Again.").await.unwrap();

        assert_eq!(evaluation.raw_analysis, "Relevance: 8");
        assert_eq!(session.evaluations().len(), 2);
        assert_eq!(session.turns(), turns_before.as_slice());
        assert_eq!(session.phase(), phase_before);

        let request = mock.requests().pop().unwrap();
        assert!((request.temperature - 0.3).abs() < f32::EPSILON);
        assert!(request.prompt.contains("Red Flags"));
    }

    #[tokio::test]
    async fn test_transcript_matches_template() {
        let mock = Arc::new(MockGenerator::scripted(["Hello Jane.", "Tell me more.", "Why?"]));
        let mut session = session_with(&mock);
        session.initialize(context()).await.unwrap();
        session.advance(Some("I build services.")).await.unwrap();
        session.advance(Some("Mostly Rust.")).await.unwrap();

        let expected = format!(
            "Interview Transcript\n====================\nJob Position: Backend Engineer\nDate: {}\n\n\
             Interviewer: Hello Jane.\n\n\
             Candidate: I build services.\n\n\
             Interviewer: Tell me more.\n\n\
             Candidate: Mostly Rust.\n\n\
             Interviewer: Why?\n\n",
            session.started_at().format("%Y-%m-%d")
        );
        let transcript = session.render_transcript();
        assert_eq!(transcript, expected);
        assert_eq!(transcript.matches("Interviewer: ").count(), 3);
        assert_eq!(session.render_transcript(), transcript);
    }
}
