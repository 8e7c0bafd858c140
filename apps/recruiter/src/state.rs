use std::sync::Arc;

use crate::config::Config;
use crate::interview::registry::SessionRegistry;
use crate::llm_client::TextGenerator;
use crate::services::calendar::SimulatedCalendar;
use crate::services::mailer::Mailer;
use crate::storage::Storage;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Backend client built once in `main`; agents are constructed around it per request.
    pub llm: Arc<dyn TextGenerator>,
    pub config: Config,
    pub sessions: SessionRegistry,
    pub storage: Storage,
    pub mailer: Arc<Mailer>,
    pub calendar: Arc<SimulatedCalendar>,
}

impl AppState {
    pub fn new(llm: Arc<dyn TextGenerator>, config: Config) -> Self {
        Self {
            mailer: Arc::new(Mailer::new(&config.sender_email, &config.sender_name)),
            storage: Storage::new(config.data_dir.clone()),
            sessions: SessionRegistry::new(),
            calendar: Arc::new(SimulatedCalendar::new()),
            llm,
            config,
        }
    }
}
