//! Interactive command-line front end: `list` and `run <agent|all>`.
//!
//! Every agent run reports a plain success flag. Failures are logged and never
//! change the process exit code.

pub mod console;

use std::collections::BTreeMap;
use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDateTime};
use tracing::{error, info, warn};

use crate::agents::email::{EmailComposer, EmailRequest, EmailType};
use crate::agents::jd_generator::JdGenerator;
use crate::agents::recommendation::HireRecommender;
use crate::agents::resume_ranker::{ResumeInput, ResumeRanker};
use crate::agents::scheduler::{InterviewPlan, InterviewScheduler};
use crate::agents::sentiment::SentimentAnalyzer;
use crate::config::Config;
use crate::errors::AppError;
use crate::interview::session::{InterviewContext, InterviewSession, InterviewType};
use crate::llm_client::TextGenerator;
use crate::services::calendar::SimulatedCalendar;
use crate::services::documents::extract_text_from_path;
use crate::services::mailer::Mailer;
use crate::storage::Storage;

use self::console::Console;

const QUIT_WORDS: [&str; 2] = ["quit", "exit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agent {
    Jd,
    Ranker,
    Email,
    Scheduler,
    Interview,
    Recommendation,
    Sentiment,
}

impl Agent {
    pub const ALL: [Agent; 7] = [
        Agent::Jd,
        Agent::Ranker,
        Agent::Email,
        Agent::Scheduler,
        Agent::Interview,
        Agent::Recommendation,
        Agent::Sentiment,
    ];

    /// Order of `run all`.
    pub const WORKFLOW: [Agent; 7] = [
        Agent::Jd,
        Agent::Ranker,
        Agent::Email,
        Agent::Scheduler,
        Agent::Interview,
        Agent::Sentiment,
        Agent::Recommendation,
    ];

    pub fn short_name(&self) -> &'static str {
        match self {
            Agent::Jd => "jd",
            Agent::Ranker => "ranker",
            Agent::Email => "email",
            Agent::Scheduler => "scheduler",
            Agent::Interview => "interview",
            Agent::Recommendation => "recommendation",
            Agent::Sentiment => "sentiment",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Agent::Jd => "JD Generator",
            Agent::Ranker => "Resume Ranker",
            Agent::Email => "Email Automation",
            Agent::Scheduler => "Interview Scheduler",
            Agent::Interview => "Interview Agent",
            Agent::Recommendation => "Hire Recommendation",
            Agent::Sentiment => "Sentiment Analyzer",
        }
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.short_name())
    }
}

impl FromStr for Agent {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.short_name() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|a| a.short_name()).collect();
                AppError::invalid_choice("agent", s, &valid)
            })
    }
}

/// Writes the agent menu.
pub fn list_agents(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "\n=== Available Agents ===")?;
    for agent in Agent::ALL {
        writeln!(out, "- {agent}")?;
    }
    writeln!(
        out,
        "\nUse 'recruiter run <agent_shortname>' to run a specific agent"
    )?;
    writeln!(out, "For example: 'recruiter run jd'")?;
    writeln!(out, "\nOr use 'recruiter run all' to run the complete workflow")
}

/// Runs agents interactively against one console.
pub struct Runner<R, W> {
    llm: Arc<dyn TextGenerator>,
    config: Config,
    storage: Storage,
    mailer: Mailer,
    calendar: Arc<SimulatedCalendar>,
    console: Console<R, W>,
}

impl<R: BufRead, W: Write> Runner<R, W> {
    pub fn new(llm: Arc<dyn TextGenerator>, config: Config, console: Console<R, W>) -> Self {
        Self {
            storage: Storage::new(config.data_dir.clone()),
            mailer: Mailer::new(&config.sender_email, &config.sender_name),
            calendar: Arc::new(SimulatedCalendar::new()),
            llm,
            config,
            console,
        }
    }

    /// `run <target>`: a single agent or `all`. Unknown names print a hint.
    pub async fn run_target(&mut self, target: &str) -> bool {
        if target.trim().eq_ignore_ascii_case("all") {
            return self.run_workflow().await;
        }
        match target.parse::<Agent>() {
            Ok(agent) => self.run(agent).await,
            Err(e) => {
                self.announce(format!("{e}\nUse 'recruiter list' to see available agents"));
                false
            }
        }
    }

    /// Runs the whole hiring workflow in order, stopping at the first failure.
    pub async fn run_workflow(&mut self) -> bool {
        if !self.announce("\n=== Running Complete Recruitment Workflow ===") {
            return false;
        }
        for (step, agent) in Agent::WORKFLOW.into_iter().enumerate() {
            let header = format!("\n--- Step {}: {} ---", step + 1, agent.display_name());
            if !self.announce(header) {
                return false;
            }
            if !self.run(agent).await {
                self.announce(format!("{} failed. Workflow stopped.", agent.display_name()));
                return false;
            }
        }
        self.announce("\n=== Complete Recruitment Workflow Finished Successfully ===")
    }

    pub async fn run(&mut self, agent: Agent) -> bool {
        if !self.announce(format!("\n=== Running {} ===", agent.display_name())) {
            return false;
        }

        let result = match agent {
            Agent::Jd => self.run_jd_generator().await,
            Agent::Ranker => self.run_resume_ranker().await,
            Agent::Email => self.run_email().await,
            Agent::Scheduler => self.run_scheduler().await,
            Agent::Interview => self.run_interview().await,
            Agent::Recommendation => self.run_recommendation().await,
            Agent::Sentiment => self.run_sentiment().await,
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                error!("Error in {}: {e:#}", agent.display_name());
                false
            }
        }
    }

    /// Prints a status line. A failed write is logged and reported as `false`.
    fn announce(&mut self, text: impl fmt::Display) -> bool {
        match self.console.say(text) {
            Ok(()) => true,
            Err(e) => {
                error!("Could not write to the console: {e}");
                false
            }
        }
    }

    async fn run_jd_generator(&mut self) -> Result<()> {
        let title = self.console.ask_required("Enter job title: ")?;
        let skills: Vec<String> = self
            .console
            .ask("Enter required skills (comma separated): ")?
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();
        let experience = self.console.ask("Enter experience level: ")?;

        let jd = JdGenerator::new(self.llm.clone())
            .generate(&title, &skills, &experience, &BTreeMap::new())
            .await?;
        self.console.say(format!("\nGenerated Job Description:\n{jd}"))?;

        if self.console.confirm("\nSave this job description? (y/n): ")? {
            let name = self.console.ask_or("Enter filename (without extension): ", &title)?;
            let path = self.storage.save_job_description(&name, &jd).await?;
            self.console
                .say(format!("Job description saved to {}", path.display()))?;
        }
        Ok(())
    }

    async fn run_resume_ranker(&mut self) -> Result<()> {
        let Some(job_description) = self.pick_job_description(true).await? else {
            bail!("No job descriptions found. Create one with the JD Generator first.");
        };

        let paths = self.storage.list_resumes().await?;
        if paths.is_empty() {
            bail!(
                "No resumes found in {}. Add resume files first.",
                self.storage.resumes_dir().display()
            );
        }

        let mut resumes = Vec::new();
        for path in &paths {
            match extract_text_from_path(path).await {
                Ok(text) => resumes.push(ResumeInput {
                    name: file_name(path),
                    text,
                }),
                Err(e) => warn!("Could not read {}: {e}", path.display()),
            }
        }
        if resumes.is_empty() {
            bail!("No readable resumes found");
        }

        let detailed = self.console.confirm("Include detailed analysis? (y/n): ")?;
        let ranked = ResumeRanker::new(self.llm.clone())
            .rank(&job_description, &resumes, detailed)
            .await?;

        self.console.say("\n=== Ranked Resumes ===")?;
        for (i, resume) in ranked.iter().enumerate() {
            self.console
                .say(format!("{}. {} - Score: {}", i + 1, resume.name, resume.score))?;
            if detailed {
                self.console.say(format!("{}\n", resume.analysis))?;
            }
        }
        Ok(())
    }

    async fn run_email(&mut self) -> Result<()> {
        let recipient_email = self.console.ask_required("Enter recipient email: ")?;
        let valid: Vec<&str> = EmailType::ALL.iter().map(|t| t.as_str()).collect();
        let email_type = self
            .console
            .ask(&format!("Enter email type ({}): ", valid.join("/")))?;
        let recipient_name = self.console.ask_required("Enter candidate name: ")?;
        let job_title = self.console.ask_required("Enter job title: ")?;
        let company = self.console.ask_or(
            &format!("Enter company name [{}]: ", self.config.company_name),
            &self.config.company_name,
        )?;

        let request = EmailRequest {
            email_type,
            recipient_name,
            job_title,
            company_name: Some(company),
            additional_info: BTreeMap::new(),
        };
        let composer = EmailComposer::new(self.llm.clone());
        let draft = composer.generate(&request).await?;

        self.console.say(format!(
            "\nGenerated Email:\nTo: {recipient_email}\nSubject: {}\nBody:\n{}",
            draft.subject, draft.body
        ))?;

        if self.console.confirm("\nSimulate sending this email? (y/n): ")? {
            let id = self.mailer.send(
                &recipient_email,
                Some(&request.recipient_name),
                &draft.subject,
                &draft.body,
            );
            self.console
                .say(format!("Email sent successfully (simulated), id {id}"))?;
        }
        Ok(())
    }

    async fn run_scheduler(&mut self) -> Result<()> {
        let candidate_name = self.console.ask_required("Enter candidate name: ")?;
        let job_title = self.console.ask_required("Enter job title: ")?;
        let interviewer_names: Vec<String> = self
            .console
            .ask("Enter interviewer names (comma separated): ")?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let default_duration = self.config.default_meeting_duration.to_string();
        let duration_minutes: u32 = self
            .console
            .ask_or(
                &format!("Enter duration in minutes (default: {default_duration}): "),
                &default_duration,
            )?
            .parse()
            .context("duration must be a whole number of minutes")?;

        let scheduler = InterviewScheduler::new(self.llm.clone(), self.calendar.clone());
        let slots =
            scheduler.find_available_slots(&interviewer_names, duration_minutes, Local::now().date_naive());
        let labels: Vec<String> = slots
            .iter()
            .map(|s| s.start.format("%Y-%m-%d %H:%M").to_string())
            .collect();
        self.console.say("\nAvailable slots:")?;
        let start = match self
            .console
            .choose("Select a slot (number, Enter for a custom time): ", &labels)?
        {
            Some(i) => slots[i].start,
            None => {
                let text = self.console.ask_required("Enter date and time (YYYY-MM-DD HH:MM): ")?;
                NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M")
                    .with_context(|| format!("'{text}' is not in YYYY-MM-DD HH:MM format"))?
            }
        };
        let location = self.console.ask_or("Enter location [Virtual]: ", "Virtual")?;

        let event = scheduler.schedule_interview(&InterviewPlan {
            candidate_name,
            job_title: job_title.clone(),
            interviewer_names,
            start,
            duration_minutes,
            location,
            additional_info: BTreeMap::new(),
        });
        self.console.say(format!(
            "\nInterview scheduled (simulated): {}\n{} - {}\nEvent ID: {}",
            event.title, event.start, event.end, event.id
        ))?;

        if self
            .console
            .confirm("\nGenerate an interviewer preparation guide? (y/n): ")?
        {
            let Some(resume) = self.pick_resume().await? else {
                bail!("No resume selected for the preparation guide");
            };
            let guide = scheduler
                .generate_preparation(&job_title, &resume, InterviewType::default())
                .await?;
            self.console.say(format!("\n{}", guide.preparation_guide))?;
        }
        Ok(())
    }

    async fn run_interview(&mut self) -> Result<()> {
        self.console.say("This agent will simulate a job interview.")?;
        let job_title = self.console.ask_required("Enter job title for the interview: ")?;
        let candidate_name = self.console.ask_required("Enter candidate name: ")?;
        let interview_type: InterviewType = self
            .console
            .ask_or(
                "Interview type (technical/behavioral/cultural/screening) [technical]: ",
                InterviewType::default().as_str(),
            )?
            .parse()?;
        let job_description = self.pick_job_description(false).await?.unwrap_or_default();

        let context = InterviewContext::new(
            &job_title,
            &candidate_name,
            &job_description,
            interview_type,
            self.config.default_interview_duration,
        );
        let mut session = InterviewSession::new(self.llm.clone(), context.clone());
        let opening = session.initialize(context).await?;

        self.console.say("\nStarting interview simulation...")?;
        self.console.say("(Type 'quit' or 'exit' to end the interview)")?;
        self.console.say(format!("\nInterviewer: {opening}"))?;

        loop {
            let Some(answer) = self.console.read_line("You (candidate): ")? else {
                break;
            };
            if QUIT_WORDS.contains(&answer.trim().to_lowercase().as_str()) {
                break;
            }
            let step = session.advance(Some(&answer)).await?;
            self.console.say(format!("\nInterviewer: {}", step.message))?;
            if step.is_complete {
                break;
            }
        }

        info!(
            "Interview ended after {} candidate turns ({})",
            session.candidate_turns(),
            session.phase()
        );
        self.console.say("\nInterview completed.")?;

        if self.console.confirm("Save this interview transcript? (y/n): ")? {
            let path = self
                .storage
                .save_transcript(&candidate_name, &job_title, &session.render_transcript())
                .await?;
            self.console
                .say(format!("Transcript saved to {}", path.display()))?;
        }
        Ok(())
    }

    async fn run_sentiment(&mut self) -> Result<()> {
        let transcript = match self.pick_transcript().await? {
            Some(text) => text,
            None => {
                self.console
                    .say("Enter text to analyze (finish with an empty line):")?;
                self.console.read_block()?
            }
        };
        if transcript.trim().is_empty() {
            bail!("No text provided for analysis");
        }

        let report = SentimentAnalyzer::new(self.llm.clone())
            .analyze(&transcript)
            .await?;

        self.console.say(format!(
            "\n=== Sentiment Analysis Results ===\nOverall Sentiment: {}\nConfidence Score: {}/10\n\n{}",
            report.sentiment, report.confidence_score, report.detailed_analysis
        ))?;
        Ok(())
    }

    async fn run_recommendation(&mut self) -> Result<()> {
        let transcript = match self.pick_transcript().await? {
            Some(text) => text,
            None => {
                self.console.say("Please provide interview details manually:")?;
                let job_title = self.console.ask("Enter job title: ")?;
                let mut transcript = format!("Position: {job_title}\n\n");
                self.console
                    .say("Enter Q&A pairs (enter empty question to finish):")?;
                loop {
                    let question = self.console.ask("Question: ")?;
                    if question.is_empty() {
                        break;
                    }
                    let answer = self.console.ask("Answer: ")?;
                    transcript.push_str(&format!("Q: {question}\nA: {answer}\n\n"));
                }
                transcript
            }
        };
        let job_description = self.pick_job_description(false).await?.unwrap_or_default();

        let recommendation = HireRecommender::new(self.llm.clone())
            .analyze_interview(&job_description, &transcript, None)
            .await?;

        self.console.say(format!(
            "\n=== Candidate Evaluation ===\nDecision: {}\n\n{}",
            recommendation.recommendation, recommendation.detailed_analysis
        ))?;
        Ok(())
    }

    /// Lets the user pick a saved job description. With `required`, an empty
    /// store or a blank answer yields `None` without further prompting.
    async fn pick_job_description(&mut self, required: bool) -> Result<Option<String>> {
        let names = self.storage.list_job_descriptions().await?;
        if names.is_empty() {
            return Ok(None);
        }
        self.console.say("Available job descriptions:")?;
        let label = if required {
            "Select job description (number): "
        } else {
            "Select a job description (number, Enter to skip): "
        };
        match self.console.choose(label, &names)? {
            Some(i) => Ok(Some(self.storage.load_job_description(&names[i]).await?)),
            None if required => Err(anyhow!("A job description must be selected")),
            None => Ok(None),
        }
    }

    async fn pick_transcript(&mut self) -> Result<Option<String>> {
        let names = self.storage.list_transcripts().await?;
        if names.is_empty() {
            return Ok(None);
        }
        self.console.say("Available interview transcripts:")?;
        match self
            .console
            .choose("Select a transcript (number, Enter to type one in): ", &names)?
        {
            Some(i) => Ok(Some(self.storage.load_transcript(&names[i]).await?)),
            None => Ok(None),
        }
    }

    async fn pick_resume(&mut self) -> Result<Option<String>> {
        let paths = self.storage.list_resumes().await?;
        if paths.is_empty() {
            return Ok(None);
        }
        let names: Vec<String> = paths.iter().map(|p| file_name(p)).collect();
        self.console.say("Available resumes:")?;
        match self.console.choose("Select a resume (number): ", &names)? {
            Some(i) => Ok(Some(extract_text_from_path(&paths[i]).await?)),
            None => Ok(None),
        }
    }

    #[cfg(test)]
    fn into_console(self) -> Console<R, W> {
        self.console
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
