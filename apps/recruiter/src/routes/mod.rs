pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::agents::handlers as agents;
use crate::interview::handlers as interviews;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job descriptions
        .route("/api/v1/jd/generate", post(agents::handle_generate_jd))
        .route("/api/v1/jd/refine", post(agents::handle_refine_jd))
        // Resumes
        .route("/api/v1/resumes/rank", post(agents::handle_rank_resumes))
        // Email
        .route("/api/v1/emails", get(agents::handle_email_history))
        .route("/api/v1/emails/generate", post(agents::handle_generate_email))
        .route("/api/v1/emails/:id", get(agents::handle_email_status))
        // Scheduling
        .route("/api/v1/schedule/slots", post(agents::handle_find_slots))
        .route(
            "/api/v1/schedule/interviews",
            get(agents::handle_list_events).post(agents::handle_schedule_interview),
        )
        .route(
            "/api/v1/schedule/preparation",
            post(agents::handle_preparation),
        )
        // Interview sessions
        .route(
            "/api/v1/interviews",
            post(interviews::handle_start_interview),
        )
        .route(
            "/api/v1/interviews/:id",
            get(interviews::handle_get_interview).delete(interviews::handle_delete_interview),
        )
        .route(
            "/api/v1/interviews/:id/advance",
            post(interviews::handle_advance),
        )
        .route(
            "/api/v1/interviews/:id/evaluate",
            post(interviews::handle_evaluate),
        )
        .route(
            "/api/v1/interviews/:id/transcript",
            get(interviews::handle_get_transcript).post(interviews::handle_save_transcript),
        )
        // Hire recommendation
        .route(
            "/api/v1/recommendations",
            post(agents::handle_recommendation),
        )
        .route(
            "/api/v1/recommendations/compare",
            post(agents::handle_compare_candidates),
        )
        // Sentiment
        .route("/api/v1/sentiment", post(agents::handle_sentiment))
        .route(
            "/api/v1/sentiment/topics",
            post(agents::handle_sentiment_topics),
        )
        .route(
            "/api/v1/sentiment/progression",
            post(agents::handle_sentiment_progression),
        )
        .with_state(state)
}
