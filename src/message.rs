//! Bulk message send action
//!
//! Validation happens here, before anything reaches the backend. The
//! confirmation prompt and in-flight guard live in the interaction layer.

use crate::api_client::DirectoryBackend;
use crate::contact::Contact;
use crate::error::{Result, ValidationError};
use tracing::{info, warn};

/// A send that passed local validation and is waiting for confirmation
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    pub recipients: Vec<Contact>,
    pub text: String,
}

impl OutgoingMessage {
    pub fn recipient_count(&self) -> usize {
        self.recipients.len()
    }

    /// Text for the yes/no confirmation dialog
    pub fn confirmation_prompt(&self) -> String {
        format!(
            "¿Enviar el mensaje a {} contacto(s)?",
            self.recipient_count()
        )
    }
}

/// Check the send preconditions. The message text is kept as typed; only the
/// emptiness check trims.
pub fn validate_send(
    selection: &[Contact],
    text: &str,
) -> std::result::Result<OutgoingMessage, ValidationError> {
    if selection.is_empty() {
        return Err(ValidationError::EmptySelection);
    }
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyMessage);
    }
    Ok(OutgoingMessage {
        recipients: selection.to_vec(),
        text: text.to_string(),
    })
}

/// Validate and deliver a message, returning the backend's confirmation text.
pub async fn send_message(
    backend: &dyn DirectoryBackend,
    selection: &[Contact],
    text: &str,
) -> Result<String> {
    let outgoing = validate_send(selection, text).inspect_err(|e| {
        warn!(target: "send", "Send blocked: {}", e);
    })?;

    info!(target: "send", "Sending message to {} recipients", outgoing.recipient_count());
    let reply = backend
        .send_message(&outgoing.recipients, &outgoing.text)
        .await?;
    Ok(reply)
}
