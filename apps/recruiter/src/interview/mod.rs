//! The interview-session state machine and its HTTP surface.

pub mod handlers;
pub mod phase;
pub mod prompts;
pub mod registry;
pub mod session;
