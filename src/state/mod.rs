//! Command/event plumbing between the UI loop and the backend tasks

pub mod dispatcher;
pub mod events;

pub use dispatcher::CommandDispatcher;
pub use events::{AppEvent, Command};
