//! Stand-ins for the outside world: a simulated mailer, a simulated calendar,
//! and resume text extraction.

pub mod calendar;
pub mod documents;
pub mod mailer;
