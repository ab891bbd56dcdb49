//! Optional AI drafting of post bodies.
//!
//! Backed by the Gemini `generateContent` REST call. Without an API key the
//! feature is disabled and every request is rejected.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::AppError;
use crate::models::PostCategory;

/// Text returned when the model answers with no content.
pub const EMPTY_DRAFT: &str = "Could not generate draft.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Draft generation client.
#[derive(Clone)]
pub struct DraftService {
    http_client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl DraftService {
    pub fn new(api_key: Option<String>, model: String, base_url: String) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
        )
    }

    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    /// Draft a post body for `topic` in the given category.
    pub async fn draft_post(&self, topic: &str, category: PostCategory) -> Result<String, AppError> {
        let Some(api_key) = &self.api_key else {
            return Err(AppError::DraftUnavailable);
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(build_prompt(topic, category)),
                }],
            }],
        };

        tracing::debug!(model = %self.model, "Requesting post draft");

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Draft generation failed: {}", error_text);
            return Err(AppError::DraftFailed("Failed to generate draft.".to_string()));
        }

        let generated: GenerateResponse = response.json().await?;
        let text = generated.text();
        if text.trim().is_empty() {
            return Ok(EMPTY_DRAFT.to_string());
        }
        Ok(text.trim().to_string())
    }
}

fn build_prompt(topic: &str, category: PostCategory) -> String {
    format!(
        "You are an assistant for a school administrator.\n\
         Draft a school announcement post.\n\
         Topic: {}\n\
         Category: {}\n\
         Tone: Professional, encouraging, and warm.\n\
         Format: Pure text, suitable for a website content body. Keep it under 150 words.\n\
         Do not include a title in the body, just the content.",
        topic,
        category.as_str()
    )
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Request body for drafting a post.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftRequest {
    pub topic: String,
    #[serde(default)]
    pub category: PostCategory,
}

/// Drafted post body.
#[derive(Debug, Clone, Serialize)]
pub struct DraftResponse {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn mock_server(reply: Value, status: u16) -> String {
        let app = Router::new().route(
            "/models/{model}",
            post(move || {
                let reply = reply.clone();
                async move {
                    (
                        axum::http::StatusCode::from_u16(status).unwrap(),
                        Json(reply),
                    )
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn service(base_url: String) -> DraftService {
        DraftService::new(
            Some("test-key".to_string()),
            "gemini-2.5-flash".to_string(),
            base_url,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_disabled_without_key() {
        let service = DraftService::new(None, "m".to_string(), "http://127.0.0.1:9".to_string())
            .unwrap();
        assert!(!service.is_available());
        let result = service.draft_post("Sports day", PostCategory::Event).await;
        assert!(matches!(result, Err(AppError::DraftUnavailable)));
    }

    #[tokio::test]
    async fn test_draft_returns_model_text() {
        let base = mock_server(
            json!({ "candidates": [{ "content": { "parts": [
                { "text": "Join us " }, { "text": "for sports day." }
            ]}}]}),
            200,
        )
        .await;

        let draft = service(base)
            .draft_post("Sports day", PostCategory::Event)
            .await
            .unwrap();
        assert_eq!(draft, "Join us for sports day.");
    }

    #[tokio::test]
    async fn test_empty_candidates_fall_back() {
        let base = mock_server(json!({ "candidates": [] }), 200).await;
        let draft = service(base)
            .draft_post("Anything", PostCategory::News)
            .await
            .unwrap();
        assert_eq!(draft, EMPTY_DRAFT);
    }

    #[tokio::test]
    async fn test_api_error_is_draft_failed() {
        let base = mock_server(json!({ "error": { "message": "bad key" } }), 403).await;
        let result = service(base)
            .draft_post("Anything", PostCategory::News)
            .await;
        assert!(matches!(result, Err(AppError::DraftFailed(_))));
    }

    #[test]
    fn test_prompt_mentions_topic_and_category() {
        let prompt = build_prompt("Science fair", PostCategory::Announcement);
        assert!(prompt.contains("Topic: Science fair"));
        assert!(prompt.contains("Category: Announcement"));
        assert!(prompt.contains("under 150 words"));
    }
}
