//! Commands leaving the UI and events coming back to it

use crate::contact::Contact;
use crate::error::{DirectoryError, NetworkError};

/// Work the interaction layer asks the dispatcher to perform
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Query the backend; `seq` tags the request for the stale-response check
    Search { seq: u64, term: String },

    /// Deliver a confirmed message
    Send { recipients: Vec<Contact>, text: String },
}

/// Completions posted back to the UI loop
#[derive(Debug)]
pub enum AppEvent {
    SearchCompleted {
        seq: u64,
        term: String,
        result: Result<Vec<Contact>, NetworkError>,
    },

    SendCompleted {
        result: Result<String, DirectoryError>,
    },
}
