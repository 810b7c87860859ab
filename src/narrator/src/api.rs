use crate::prompt::build_prompt;
use game_core::{ActionBlueprint, ActionRequest, BlueprintGenerator, GenerationError, normalize_role};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o-2024-08-06";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Narration generator backed by an OpenAI-compatible chat completions
/// endpoint. Refusals, transport failures and unparsable output all map
/// to retryable generation errors; the pipeline owns the retry policy.
pub struct AiGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AiGenerator {
    pub fn new(api_key: impl Into<String>) -> AiGenerator {
        AiGenerator {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Reads `OPENAI_API_KEY` (and optionally `OPENAI_MODEL` and
    /// `OPENAI_BASE_URL`) from the environment.
    pub fn from_env() -> Option<AiGenerator> {
        let api_key = std::env::var("OPENAI_API_KEY").ok()?;
        let mut generator = AiGenerator::new(api_key);

        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            generator.model = model;
        }
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            generator.base_url = base_url;
        }

        Some(generator)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> AiGenerator {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> AiGenerator {
        self.base_url = base_url.into();
        self
    }
}

impl BlueprintGenerator for AiGenerator {
    async fn generate(
        &mut self,
        request: ActionRequest,
    ) -> Result<ActionBlueprint, GenerationError> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_prompt(request),
            }],
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        debug!("requesting {:?} narration from {}", request.outcome, self.model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Transport(format!(
                "chat completions returned {status}"
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|err| GenerationError::Malformed(err.to_string()))?;

        let message = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::Malformed("response has no choices".to_string()))?
            .message;

        if let Some(refusal) = message.refusal {
            return Err(GenerationError::Refused(refusal));
        }

        let content = message
            .content
            .ok_or_else(|| GenerationError::Malformed("response has no content".to_string()))?;

        let payload: NarrationPayload = serde_json::from_str(&content)
            .map_err(|err| GenerationError::Malformed(format!("bad narration JSON: {err}")))?;

        Ok(payload.into_blueprint(request))
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

/// The JSON object the model is instructed to produce.
#[derive(Debug, Deserialize)]
pub(crate) struct NarrationPayload {
    phrases: Vec<String>,
    #[serde(default)]
    player_evaluation: Vec<PlayerEvaluation>,
    #[serde(default)]
    scorer_player: Option<String>,
    #[serde(default)]
    assist_player: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlayerEvaluation {
    player_placeholder: String,
    evaluation: i8,
}

impl NarrationPayload {
    /// The model tends to wrap roles in braces; the core stores them
    /// bare, so normalize at this boundary.
    pub(crate) fn into_blueprint(self, request: ActionRequest) -> ActionBlueprint {
        let player_evaluation: HashMap<String, i8> = self
            .player_evaluation
            .into_iter()
            .map(|entry| {
                (
                    normalize_role(&entry.player_placeholder).to_string(),
                    entry.evaluation,
                )
            })
            .collect();

        ActionBlueprint {
            outcome: request.outcome,
            use_var: request.use_var,
            phrases: self.phrases,
            player_evaluation,
            scorer: normalize_optional_role(self.scorer_player),
            assist: normalize_optional_role(self.assist_player),
        }
    }
}

fn normalize_optional_role(role: Option<String>) -> Option<String> {
    role.map(|role| normalize_role(&role).to_string())
        .filter(|role| !role.is_empty())
}
