//! HTTP client for the Gemini `generateContent` API.
//!
//! Implements [`GenerativeService`] with one stateless POST per call. Chat
//! sessions keep only their system instruction and seed turns; the visible
//! history is resent by the caller each time.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    error::{PlannerError, Result},
    models::{ChatTurn, Day, HealthProfile, Plan, Role},
    prompts,
    service::{ChatSession, DayMeals, GenerativeService, TransportError},
};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Connection and sampling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub plan_temperature: f32,
    pub narrative_temperature: f32,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
            plan_temperature: 0.6,
            narrative_temperature: 0.3,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
struct Part {
    text: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&'static str>, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }

    fn turn(turn: &ChatTurn) -> Self {
        let role = match turn.role {
            Role::User => "user",
            Role::Agent => "model",
        };
        Self::text(Some(role), turn.text.clone())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_json_schema: Option<serde_json::Value>,
}

impl GenerationConfig {
    /// JSON mode constrained to the schema of `T`.
    fn json<T: schemars::JsonSchema>(temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
            response_mime_type: Some("application/json"),
            response_json_schema: Some(schemars::schema_for!(T).to_value()),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize, Debug, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn into_text(self) -> std::result::Result<String, TransportError> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().map(|part| part.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(TransportError::Malformed(
                "response carried no text".to_string(),
            ));
        }
        Ok(text)
    }
}

#[derive(Deserialize, schemars::JsonSchema)]
struct NarrativeReply {
    rationale: String,
}

/// JSON schema of the plan shape, appended to the chat persona.
fn plan_schema() -> String {
    let schema = schemars::schema_for!(Plan);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

/// Gemini-backed [`GenerativeService`].
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    config: Arc<GeminiConfig>,
}

impl GeminiClient {
    /// Builds the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::Configuration` for a blank API key or if the
    /// HTTP client cannot be constructed.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(PlannerError::Configuration {
                message: "Gemini API key is empty".to_string(),
            });
        }
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PlannerError::Configuration {
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> std::result::Result<String, TransportError> {
        debug!(
            "POST {} ({} contents)",
            self.config.endpoint(),
            request.contents.len()
        );
        let response = self
            .http
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Malformed(e.to_string()))?;
        body.into_text()
    }
}

#[async_trait]
impl GenerativeService for GeminiClient {
    fn create_conversation(
        &self,
        system_instruction: &str,
        seed_history: Vec<ChatTurn>,
    ) -> Arc<dyn ChatSession> {
        let system_instruction = format!(
            "{system_instruction}\n\nสคีมา JSON ของ newPlan:\n{}",
            plan_schema()
        );
        Arc::new(GeminiChat {
            client: self.clone(),
            system_instruction,
            seed: seed_history.iter().map(Content::turn).collect(),
        })
    }

    async fn generate_plan(
        &self,
        profile: &HealthProfile,
    ) -> std::result::Result<Plan, TransportError> {
        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![Content::text(
                Some("user"),
                prompts::plan_generation(profile),
            )],
            generation_config: GenerationConfig::json::<Plan>(self.config.plan_temperature),
        };
        let text = self.generate(&request).await?;
        let text = text.trim();
        if !text.starts_with('{') {
            return Err(TransportError::Malformed(
                "plan response is not a JSON object".to_string(),
            ));
        }
        serde_json::from_str(text).map_err(|e| TransportError::Malformed(e.to_string()))
    }

    async fn generate_day_narrative(
        &self,
        day: Day,
        meals: &DayMeals,
        profile: &HealthProfile,
    ) -> std::result::Result<String, TransportError> {
        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![Content::text(
                Some("user"),
                prompts::day_narrative(day, meals, profile),
            )],
            generation_config: GenerationConfig::json::<NarrativeReply>(
                self.config.narrative_temperature,
            ),
        };
        let text = self.generate(&request).await?;
        let reply: NarrativeReply = serde_json::from_str(text.trim())
            .map_err(|e| TransportError::Malformed(e.to_string()))?;
        Ok(reply.rationale)
    }
}

/// A chat session against the Gemini API.
struct GeminiChat {
    client: GeminiClient,
    system_instruction: String,
    seed: Vec<Content>,
}

impl GeminiChat {
    fn request(&self, history: &[ChatTurn], text: &str) -> GenerateRequest {
        let contents = self
            .seed
            .iter()
            .cloned()
            .chain(history.iter().map(Content::turn))
            .chain(std::iter::once(Content::text(Some("user"), text)))
            .collect();
        GenerateRequest {
            system_instruction: Some(Content::text(None, self.system_instruction.clone())),
            contents,
            generation_config: GenerationConfig {
                temperature: None,
                response_mime_type: None,
                response_json_schema: None,
            },
        }
    }
}

#[async_trait]
impl ChatSession for GeminiChat {
    async fn send(
        &self,
        history: &[ChatTurn],
        text: &str,
    ) -> std::result::Result<String, TransportError> {
        let request = self.request(history, text);
        self.client.generate(&request).await
    }
}
