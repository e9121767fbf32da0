use async_trait::async_trait;

use crate::domain::{EncodedImage, ModelDescriptor, TokenUsage};

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutput {
    pub text: String,
    pub usage: TokenUsage,
}

#[async_trait]
pub trait VisionModelClient: Send + Sync {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, VisionClientError>;

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        image: &EncodedImage,
    ) -> Result<GenerationOutput, VisionClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum VisionClientError {
    #[error("model provider api key is not configured")]
    MissingApiKey,
    #[error("api request failed: {0}")]
    Request(String),
    #[error("api returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl VisionClientError {
    /// Rate-limited or unknown model: worth trying the next candidate.
    pub fn advances_to_next_candidate(&self) -> bool {
        matches!(self, Self::Status { status: 429 | 404, .. })
    }
}
