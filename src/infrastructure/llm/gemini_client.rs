use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{GenerationOutput, VisionClientError, VisionModelClient};
use crate::domain::{EncodedImage, ModelDescriptor, TokenUsage};
use crate::infrastructure::observability::log_preview;

pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";
const LIST_PAGE_SIZE: u32 = 1000;

/// Client for the Gemini `generateContent` and `models` REST endpoints.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
        }
    }

    fn ensure_api_key(&self) -> Result<(), VisionClientError> {
        if self.api_key.is_empty() {
            return Err(VisionClientError::MissingApiKey);
        }
        Ok(())
    }

    async fn fetch_model_page(
        &self,
        page_token: Option<&str>,
    ) -> Result<ListModelsResponse, VisionClientError> {
        let url = format!("{}/models", self.base_url);
        let mut request = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("pageSize", LIST_PAGE_SIZE.to_string())]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| VisionClientError::Request(format!("list models: {e}")))?;

        let response = ensure_success(response).await?;

        response
            .json()
            .await
            .map_err(|e| VisionClientError::InvalidResponse(format!("list models: {e}")))
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, VisionClientError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(VisionClientError::Status { status, body })
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
    #[serde(default)]
    total_token_count: u64,
}

impl From<UsageMetadata> for TokenUsage {
    fn from(usage: UsageMetadata) -> Self {
        TokenUsage::new(
            usage.total_token_count,
            usage.prompt_token_count,
            usage.candidates_token_count,
        )
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelDescriptor>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[async_trait]
impl VisionModelClient for GeminiClient {
    #[tracing::instrument(skip(self))]
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, VisionClientError> {
        self.ensure_api_key()?;

        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.fetch_model_page(page_token.as_deref()).await?;
            models.extend(page.models);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(model_count = models.len(), "Listed provider models");
        Ok(models)
    }

    #[tracing::instrument(skip(self, prompt, image), fields(image_len = image.data.len()))]
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        image: &EncodedImage,
    ) -> Result<GenerationOutput, VisionClientError> {
        self.ensure_api_key()?;

        let model_id = model.strip_prefix("models/").unwrap_or(model);
        let url = format!("{}/models/{}:generateContent", self.base_url, model_id);

        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Text { text: prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: &image.mime_type,
                            data: &image.data,
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                response_mime_type: "application/json",
            },
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VisionClientError::Request(format!("generate {model_id}: {e}")))?;

        let response = ensure_success(response).await?;

        let raw_bytes = response
            .bytes()
            .await
            .map_err(|e| VisionClientError::Request(format!("read body {model_id}: {e}")))?;

        let parsed: GenerateResponse = serde_json::from_slice(&raw_bytes).map_err(|e| {
            tracing::error!(
                raw_response = %log_preview(&String::from_utf8_lossy(&raw_bytes)),
                "Failed to parse Gemini JSON"
            );
            VisionClientError::InvalidResponse(format!("generate {model_id}: {e}"))
        })?;

        let usage: TokenUsage = parsed.usage_metadata.unwrap_or_default().into();

        let Some(candidate) = parsed.candidates.into_iter().next() else {
            tracing::warn!(model = %model_id, "Gemini returned no candidates");
            return Ok(GenerationOutput {
                text: String::new(),
                usage,
            });
        };

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            // Blocked candidates still bill tokens; the caller sees empty text.
            tracing::warn!(
                model = %model_id,
                finish_reason = candidate.finish_reason.as_deref().unwrap_or("unknown"),
                total_tokens = usage.total_tokens,
                "Gemini candidate carried no text"
            );
        } else {
            tracing::debug!(preview = %log_preview(&text), "Gemini response text");
        }

        Ok(GenerationOutput { text, usage })
    }
}
