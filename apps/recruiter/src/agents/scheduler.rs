use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use uuid::Uuid;

use crate::agents::complete;
use crate::agents::prompts::PREPARATION_PROMPT_TEMPLATE;
use crate::errors::AppError;
use crate::interview::session::InterviewType;
use crate::llm_client::prompts::{format_additional_info, truncate_chars, Prompt};
use crate::llm_client::TextGenerator;
use crate::services::calendar::{Attendee, CalendarEvent, SimulatedCalendar, TimeSlot};

/// Days ahead offered by `find_available_slots`.
pub const SLOT_SEARCH_DAYS: u32 = 5;
pub const MAX_RESUME_CHARS: usize = 1500;

const MAX_TOKENS: u32 = 1024;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone)]
pub struct InterviewPlan {
    pub candidate_name: String,
    pub job_title: String,
    pub interviewer_names: Vec<String>,
    pub start: NaiveDateTime,
    pub duration_minutes: u32,
    pub location: String,
    pub additional_info: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreparationGuide {
    pub job_title: String,
    pub interview_type: InterviewType,
    pub preparation_guide: String,
}

/// Finds interview slots, books events and writes interviewer prep guides.
pub struct InterviewScheduler {
    llm: Arc<dyn TextGenerator>,
    calendar: Arc<SimulatedCalendar>,
}

impl InterviewScheduler {
    pub fn new(llm: Arc<dyn TextGenerator>, calendar: Arc<SimulatedCalendar>) -> Self {
        Self { llm, calendar }
    }

    /// Common free slots for the given interviewers. The calendar is simulated,
    /// so every interviewer shares the same fixed availability.
    pub fn find_available_slots(
        &self,
        interviewer_ids: &[String],
        duration_minutes: u32,
        today: NaiveDate,
    ) -> Vec<TimeSlot> {
        tracing::debug!(
            "Looking up {duration_minutes}-minute slots for {} interviewers",
            interviewer_ids.len()
        );
        self.calendar
            .available_slots(today, SLOT_SEARCH_DAYS, duration_minutes)
    }

    /// Books the interview on the calendar. No backend call.
    pub fn schedule_interview(&self, plan: &InterviewPlan) -> CalendarEvent {
        let description = format!(
            "Interview for {job} position\n\nCandidate: {candidate}\nInterviewers: {interviewers}\nLocation: {location}\n\n{extra}",
            job = plan.job_title,
            candidate = plan.candidate_name,
            interviewers = plan.interviewer_names.join(", "),
            location = plan.location,
            extra = format_additional_info(&plan.additional_info, ""),
        );

        let attendees = plan
            .interviewer_names
            .iter()
            .chain(std::iter::once(&plan.candidate_name))
            .map(|name| Attendee { name: name.clone() })
            .collect();

        let event = CalendarEvent {
            id: Uuid::new_v4(),
            title: format!(
                "Interview: {} for {} position",
                plan.candidate_name, plan.job_title
            ),
            description: description.trim().to_string(),
            start: plan.start,
            end: plan.start + Duration::minutes(i64::from(plan.duration_minutes)),
            location: plan.location.clone(),
            attendees,
        };

        self.calendar.create_event(event.clone());
        event
    }

    pub async fn generate_preparation(
        &self,
        job_title: &str,
        resume: &str,
        interview_type: InterviewType,
    ) -> Result<PreparationGuide, AppError> {
        let prompt = Prompt::from_template(PREPARATION_PROMPT_TEMPLATE)
            .set("interview_type", interview_type.as_str())
            .set("job_title", job_title)
            .set("resume", truncate_chars(resume, MAX_RESUME_CHARS))
            .render();

        let guide = complete(
            self.llm.as_ref(),
            prompt,
            MAX_TOKENS,
            TEMPERATURE,
            "Interview preparation",
        )
        .await?;

        Ok(PreparationGuide {
            job_title: job_title.to_string(),
            interview_type,
            preparation_guide: guide,
        })
    }
}
