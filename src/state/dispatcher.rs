//! Command dispatcher
//!
//! Runs backend commands as tokio tasks and posts their completions to an
//! unbounded channel that the UI loop drains between frames. Requests are
//! never cancelled once spawned; the UI discards stale search results itself.

use crate::api_client::DirectoryBackend;
use crate::message;
use crate::state::events::{AppEvent, Command};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

pub struct CommandDispatcher {
    backend: Arc<dyn DirectoryBackend>,
    runtime: Handle,
    events: UnboundedSender<AppEvent>,
}

impl CommandDispatcher {
    pub fn new(
        backend: Arc<dyn DirectoryBackend>,
        runtime: Handle,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            backend,
            runtime,
            events,
        }
    }

    /// Channel pair connecting the dispatcher to the UI loop
    pub fn channel() -> (UnboundedSender<AppEvent>, UnboundedReceiver<AppEvent>) {
        mpsc::unbounded_channel()
    }

    pub fn dispatch(&self, command: Command) {
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();

        match command {
            Command::Search { seq, term } => {
                debug!(target: "search", "Dispatching search #{} for '{}'", seq, term);
                self.runtime.spawn(async move {
                    let result = backend.search(&term).await;
                    if events
                        .send(AppEvent::SearchCompleted { seq, term, result })
                        .is_err()
                    {
                        warn!(target: "search", "UI gone before search #{} completed", seq);
                    }
                });
            }
            Command::Send { recipients, text } => {
                debug!(target: "send", "Dispatching send to {} recipients", recipients.len());
                self.runtime.spawn(async move {
                    let result = message::send_message(backend.as_ref(), &recipients, &text).await;
                    if events.send(AppEvent::SendCompleted { result }).is_err() {
                        warn!(target: "send", "UI gone before send completed");
                    }
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::Contact;
    use crate::error::NetworkError;
    use async_trait::async_trait;

    struct EchoBackend;

    #[async_trait]
    impl DirectoryBackend for EchoBackend {
        async fn search(&self, term: &str) -> Result<Vec<Contact>, NetworkError> {
            Ok(vec![Contact::new(1, term)])
        }

        async fn send_message(
            &self,
            recipients: &[Contact],
            message: &str,
        ) -> Result<String, NetworkError> {
            Ok(format!("{} -> {}", message, recipients.len()))
        }
    }

    #[tokio::test]
    async fn test_search_posts_completion() {
        let (tx, mut rx) = CommandDispatcher::channel();
        let dispatcher = CommandDispatcher::new(Arc::new(EchoBackend), Handle::current(), tx);

        dispatcher.dispatch(Command::Search {
            seq: 4,
            term: "ana".to_string(),
        });

        match rx.recv().await {
            Some(AppEvent::SearchCompleted { seq, term, result }) => {
                assert_eq!(seq, 4);
                assert_eq!(term, "ana");
                assert_eq!(result.unwrap()[0].name, "ana");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_posts_completion() {
        let (tx, mut rx) = CommandDispatcher::channel();
        let dispatcher = CommandDispatcher::new(Arc::new(EchoBackend), Handle::current(), tx);

        dispatcher.dispatch(Command::Send {
            recipients: vec![Contact::new(1, "Ana"), Contact::new(2, "Luis")],
            text: "hola".to_string(),
        });

        match rx.recv().await {
            Some(AppEvent::SendCompleted { result }) => assert_eq!(result.unwrap(), "hola -> 2"),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
