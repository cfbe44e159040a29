use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use crate::config::OracleSettings;
use crate::core::features::NormalizedFeatures;
use crate::models::CandidateRecord;
use crate::services::oracle::{
    build_messages, verdict_schema, OracleError, OracleMessage, OracleVerdict, ReasoningOracle,
    VERDICT_SCHEMA_NAME,
};

// ============================================================================
// Responses API types
// ============================================================================

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a [OracleMessage],
    text: TextConfig,
}

#[derive(Serialize)]
struct TextConfig {
    format: TextFormat,
}

#[derive(Serialize)]
struct TextFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
    name: &'static str,
    schema: Value,
    strict: bool,
}

#[derive(Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum OutputContent {
    #[serde(rename = "output_text")]
    Text { text: String },
    #[serde(rename = "refusal")]
    Refusal { refusal: String },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl ResponsesResponse {
    /// Structured output text, or why there is none
    fn into_text(self) -> Result<String, OracleError> {
        if let Some(text) = self.output_text.filter(|t| !t.trim().is_empty()) {
            return Ok(text);
        }

        for content in self.output.into_iter().flat_map(|item| item.content) {
            match content {
                OutputContent::Text { text } => return Ok(text),
                OutputContent::Refusal { refusal } => {
                    return Err(OracleError::NonConforming(format!("Model refused: {}", refusal)));
                }
                OutputContent::Other => {}
            }
        }

        Err(OracleError::NonConforming("No output text in response".into()))
    }
}

/// Reasoning oracle backed by the OpenAI Responses API with a JSON schema
/// constrained output.
pub struct OpenAiOracle {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: Client,
}

impl OpenAiOracle {
    /// Create a new client. A missing API key is accepted here and reported
    /// on the first call.
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model: String,
        timeout: Duration,
    ) -> Result<Self, OracleError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model,
            client,
        })
    }

    pub fn from_settings(settings: &OracleSettings) -> Result<Self, OracleError> {
        Self::new(
            settings.base_url.clone(),
            settings.api_key.clone(),
            settings.model_or_default(),
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    async fn call(&self, messages: &[OracleMessage]) -> Result<OracleVerdict, OracleError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| OracleError::NotConfigured("API key is not set".into()))?;

        let url = format!("{}/responses", self.base_url.trim_end_matches('/'));

        let request = ResponsesRequest {
            model: &self.model,
            input: messages,
            text: TextConfig {
                format: TextFormat {
                    format_type: "json_schema",
                    name: VERDICT_SCHEMA_NAME,
                    schema: verdict_schema(),
                    strict: false,
                },
            },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &body));
        }

        let body: ResponsesResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                OracleError::Timeout
            } else {
                OracleError::NonConforming(format!("Invalid response body: {}", e))
            }
        })?;

        OracleVerdict::from_text(&body.into_text()?)
    }
}

fn map_transport_error(e: reqwest::Error) -> OracleError {
    if e.is_timeout() {
        OracleError::Timeout
    } else {
        OracleError::RequestError(e)
    }
}

fn map_status_error(status: StatusCode, body: &str) -> OracleError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => OracleError::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => OracleError::RateLimited(message),
        _ => OracleError::ApiError {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl ReasoningOracle for OpenAiOracle {
    fn model(&self) -> &str {
        &self.model
    }

    async fn evaluate(
        &self,
        features: &NormalizedFeatures,
        raw_a: &CandidateRecord,
        raw_b: &CandidateRecord,
    ) -> Result<OracleVerdict, OracleError> {
        let messages = build_messages(features, raw_a, raw_b);
        let started = Instant::now();

        let result = self.call(&messages).await;

        tracing::debug!(
            "Oracle call to {} finished in {}ms (ok: {})",
            self.model,
            started.elapsed().as_millis(),
            result.is_ok()
        );

        result
    }
}
