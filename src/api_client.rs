use crate::contact::Contact;
use crate::error::NetworkError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Longest backend error body we keep in a `NetworkError::Status`
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    #[serde(rename = "termino")]
    pub term: &'a str,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchResponse {
    #[serde(rename = "usuarios", default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub total: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
    #[serde(rename = "usuarios")]
    pub recipients: &'a [Contact],
    #[serde(rename = "mensaje")]
    pub message: &'a str,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SendResponse {
    #[serde(rename = "mensaje")]
    pub message: String,
}

/// The two backend operations the UI depends on.
#[async_trait]
pub trait DirectoryBackend: Send + Sync {
    /// Contacts matching `term`; the empty term means all contacts.
    async fn search(&self, term: &str) -> Result<Vec<Contact>, NetworkError>;

    /// Deliver `message` to `recipients`, returning the backend's summary.
    async fn send_message(
        &self,
        recipients: &[Contact],
        message: &str,
    ) -> Result<String, NetworkError>;
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, NetworkError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, NetworkError>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(target: "api", "POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(target: "api", "POST {} failed with {}", url, status);
            return Err(NetworkError::Status {
                status: status.as_u16(),
                body: summarize_error_body(&text, status.canonical_reason()),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| NetworkError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DirectoryBackend for ApiClient {
    async fn search(&self, term: &str) -> Result<Vec<Contact>, NetworkError> {
        let response: SearchResponse = self
            .post_json("/api/buscar", &SearchRequest { term })
            .await?;

        info!(
            target: "search",
            "Search '{}' returned {} contacts (total reported: {:?})",
            term,
            response.contacts.len(),
            response.total
        );
        Ok(response.contacts)
    }

    async fn send_message(
        &self,
        recipients: &[Contact],
        message: &str,
    ) -> Result<String, NetworkError> {
        let response: SendResponse = self
            .post_json(
                "/api/whatsapp/enviar",
                &SendRequest {
                    recipients,
                    message,
                },
            )
            .await?;

        info!(target: "send", "Message sent to {} recipients", recipients.len());
        Ok(response.message)
    }
}

/// Reduce an error response to a short single line.
///
/// Prefers the `error` field of a JSON body, then the raw text, then the
/// status reason phrase.
fn summarize_error_body(raw: &str, reason: Option<&str>) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string));

    let text = from_json.unwrap_or_else(|| raw.to_string());
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        return reason.unwrap_or("sin detalle").to_string();
    }

    if collapsed.chars().count() > MAX_ERROR_BODY_CHARS {
        let truncated: String = collapsed.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{truncated}...")
    } else {
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_shape() {
        let body = serde_json::to_value(SearchRequest { term: "garcia" }).unwrap();
        assert_eq!(body, serde_json::json!({ "termino": "garcia" }));
    }

    #[test]
    fn test_send_request_shape() {
        let recipients = vec![Contact::new(1, "Ana").with_phone("555")];
        let body = serde_json::to_value(SendRequest {
            recipients: &recipients,
            message: "Hola",
        })
        .unwrap();
        assert_eq!(body["mensaje"], "Hola");
        assert_eq!(body["usuarios"][0]["id"], 1);
        assert_eq!(body["usuarios"][0]["telefono"], "555");
    }

    #[test]
    fn test_search_response_without_usuarios() {
        let response: SearchResponse = serde_json::from_str(r#"{"total":0}"#).unwrap();
        assert!(response.contacts.is_empty());
        assert_eq!(response.total, Some(0));
    }

    #[test]
    fn test_summarize_error_body() {
        assert_eq!(
            summarize_error_body(r#"{"error": "Ocurrió un error en el servidor."}"#, None),
            "Ocurrió un error en el servidor."
        );
        assert_eq!(
            summarize_error_body("  Bad\n\n gateway  ", None),
            "Bad gateway"
        );
        assert_eq!(
            summarize_error_body("", Some("Internal Server Error")),
            "Internal Server Error"
        );

        let long = "x".repeat(500);
        let summary = summarize_error_body(&long, None);
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), MAX_ERROR_BODY_CHARS + 3);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new(
            "http://localhost:5000/",
            Duration::from_secs(1),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }
}
