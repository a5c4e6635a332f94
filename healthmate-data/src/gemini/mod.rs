//! Gemini model client
//!
//! HTTP client for the `generateContent` endpoint plus the narrow traits the
//! domain services consume, so the model is an explicitly constructed
//! dependency that tests can substitute with fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::chat::ChatTurn;

/// Model used for report analysis and trend insights
pub const ANALYSIS_MODEL: &str = "gemini-2.5-flash";

/// Model used for the chat assistant
pub const CHAT_MODEL: &str = "gemini-2.0-flash-exp";

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini client errors
#[derive(Error, Debug)]
pub enum GeminiError {
    /// No API key configured
    #[error("Gemini API key is not configured")]
    MissingApiKey,

    /// Transport-level failure
    #[error("Gemini request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the API
    #[error("Gemini API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response carried no usable candidate text
    #[error("Gemini returned an empty response")]
    EmptyResponse,
}

/// Model collaborator for report analysis
#[async_trait]
pub trait AnalysisModelTrait: Send + Sync {
    /// Analyze an uploaded file; returns the model's raw text response
    async fn analyze_file(
        &self,
        file_base64: &str,
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, GeminiError>;

    /// Plain text generation (used for trend insights)
    async fn generate_text(&self, prompt: &str) -> Result<String, GeminiError>;
}

/// Model collaborator for the chat assistant
#[async_trait]
pub trait ChatModelTrait: Send + Sync {
    /// Generate the assistant reply for a message with conversation history
    async fn generate_reply(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String, GeminiError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) role: Option<String>,
    #[serde(default)]
    pub(crate) parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    pub(crate) mime_type: String,
    pub(crate) data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Assemble the chat request contents
///
/// Stored history expands to alternating role-tagged turns; when there is no
/// history yet, the system prompt is prepended to the first user message.
pub(crate) fn chat_contents(
    system_prompt: &str,
    history: &[ChatTurn],
    message: &str,
) -> Vec<Content> {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|turn| Content {
            role: Some(turn.role.as_str().to_string()),
            parts: vec![Part::text(&turn.text)],
        })
        .collect();

    let full_message = if history.is_empty() {
        format!("{}\n\nUser Question: {}", system_prompt, message)
    } else {
        message.to_string()
    };

    contents.push(Content {
        role: Some("user".to_string()),
        parts: vec![Part::text(full_message)],
    });

    contents
}

/// HTTP client for the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    api_base: String,
}

impl GeminiClient {
    /// Create a client with an explicit API key
    ///
    /// A `None` key produces a client whose calls fail with `MissingApiKey`,
    /// which callers treat as "analysis unavailable" rather than a startup
    /// error.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Create a client configured from `GEMINI_API_KEY` / `GEMINI_API_BASE`
    pub fn from_env() -> Self {
        let mut client = Self::new(std::env::var("GEMINI_API_KEY").ok());
        if let Ok(base) = std::env::var("GEMINI_API_BASE") {
            client.api_base = base;
        }
        client
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<String, GeminiError> {
        let api_key = self.api_key.as_deref().ok_or(GeminiError::MissingApiKey)?;
        let url = format!("{}/models/{}:generateContent", self.api_base, model);

        debug!("Calling Gemini model: {}", model);

        let response = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response.json().await?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GeminiError::EmptyResponse);
        }

        Ok(text)
    }
}

#[async_trait]
impl AnalysisModelTrait for GeminiClient {
    async fn analyze_file(
        &self,
        file_base64: &str,
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::text(prompt), Part::inline(mime_type, file_base64)],
            }],
            generation_config: None,
        };

        self.generate(ANALYSIS_MODEL, &request).await
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::text(prompt)],
            }],
            generation_config: None,
        };

        self.generate(ANALYSIS_MODEL, &request).await
    }
}

#[async_trait]
impl ChatModelTrait for GeminiClient {
    async fn generate_reply(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String, GeminiError> {
        let request = GenerateContentRequest {
            contents: chat_contents(system_prompt, history, message),
            generation_config: Some(GenerationConfig {
                max_output_tokens: 1000,
                temperature: 0.7,
            }),
        };

        self.generate(CHAT_MODEL, &request).await
    }
}

/// Canned model clients for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;

    /// Analysis model returning a fixed response (or failing on demand)
    #[derive(Debug, Clone, Default)]
    pub struct MockAnalysisModel {
        response: Option<String>,
        should_fail: bool,
    }

    impl MockAnalysisModel {
        /// Create a mock that fails every call
        pub fn new() -> Self {
            Self::default()
        }

        /// Return this text from every call
        pub fn with_response(mut self, response: impl Into<String>) -> Self {
            self.response = Some(response.into());
            self.should_fail = false;
            self
        }

        /// Fail every call with an API error
        pub fn with_failure(mut self) -> Self {
            self.should_fail = true;
            self
        }
    }

    #[async_trait]
    impl AnalysisModelTrait for MockAnalysisModel {
        async fn analyze_file(
            &self,
            _file_base64: &str,
            _mime_type: &str,
            _prompt: &str,
        ) -> Result<String, GeminiError> {
            if self.should_fail {
                return Err(GeminiError::Api {
                    status: 500,
                    message: "mock failure".to_string(),
                });
            }
            self.response.clone().ok_or(GeminiError::MissingApiKey)
        }

        async fn generate_text(&self, _prompt: &str) -> Result<String, GeminiError> {
            if self.should_fail {
                return Err(GeminiError::Api {
                    status: 500,
                    message: "mock failure".to_string(),
                });
            }
            self.response.clone().ok_or(GeminiError::MissingApiKey)
        }
    }

    /// Chat model returning a fixed reply and recording the last request
    #[derive(Debug, Clone, Default)]
    pub struct MockChatModel {
        reply: Option<String>,
        should_fail: bool,
    }

    impl MockChatModel {
        /// Create a mock that fails every call
        pub fn new() -> Self {
            Self::default()
        }

        /// Return this reply from every call
        pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
            self.reply = Some(reply.into());
            self.should_fail = false;
            self
        }

        /// Fail every call with an API error
        pub fn with_failure(mut self) -> Self {
            self.should_fail = true;
            self
        }
    }

    #[async_trait]
    impl ChatModelTrait for MockChatModel {
        async fn generate_reply(
            &self,
            _system_prompt: &str,
            _history: &[ChatTurn],
            _message: &str,
        ) -> Result<String, GeminiError> {
            if self.should_fail {
                return Err(GeminiError::Api {
                    status: 500,
                    message: "mock failure".to_string(),
                });
            }
            self.reply.clone().ok_or(GeminiError::MissingApiKey)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::ChatRole;

    #[test]
    fn empty_history_prepends_system_prompt_to_message() {
        let contents = chat_contents("SYSTEM", &[], "What is my BMI?");

        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].role.as_deref(), Some("user"));
        let text = contents[0].parts[0].text.as_deref().unwrap();
        assert!(text.starts_with("SYSTEM"));
        assert!(text.ends_with("User Question: What is my BMI?"));
    }

    #[test]
    fn history_expands_to_alternating_role_turns() {
        let history = vec![
            ChatTurn {
                role: ChatRole::User,
                text: "first question".to_string(),
            },
            ChatTurn {
                role: ChatRole::Model,
                text: "first answer".to_string(),
            },
        ];

        let contents = chat_contents("SYSTEM", &history, "second question");

        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0].role.as_deref(), Some("user"));
        assert_eq!(contents[1].role.as_deref(), Some("model"));
        assert_eq!(contents[2].role.as_deref(), Some("user"));
        // With history present the system prompt is not repeated
        assert_eq!(
            contents[2].parts[0].text.as_deref(),
            Some("second question")
        );
    }

    #[test]
    fn inline_data_serializes_camel_case() {
        let part = Part::inline("image/jpeg", "QUJD");
        let json = serde_json::to_value(&part).unwrap();

        assert_eq!(json["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(json["inlineData"]["data"], "QUJD");
    }
}
