use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::application::ports::{
    DocumentFetcher, DocumentRenderer, FetchError, FetchedDocument, GenerationOutput, RenderError,
    VisionClientError, VisionModelClient,
};
use crate::domain::{BillData, EncodedImage, TokenUsage, redacted_url};

use super::model_selector::ModelSelector;
use super::response_parser::parse_model_json;

pub const EXTRACTION_PROMPT: &str = "You are a medical bill data extraction system. \
Analyze the attached bill image and extract every billed line item.\n\
\n\
Follow these strict rules:\n\
1. Output ONLY valid JSON. No markdown, no commentary.\n\
2. Classify each page as one of: \"Bill Detail\", \"Final Bill\", \"Pharmacy\".\n\
3. item_amount, item_rate and item_quantity are numbers. Use 0 when a value is not printed.\n\
4. Do not invent items. Skip subtotals, taxes and grand totals.\n\
5. total_item_count is the number of bill_items across all pages.\n\
\n\
Schema:\n\
{\n\
  \"pagewise_line_items\": [\n\
    {\n\
      \"page_no\": \"1\",\n\
      \"page_type\": \"Bill Detail\",\n\
      \"bill_items\": [\n\
        {\n\
          \"item_name\": \"Item Name\",\n\
          \"item_amount\": 100.0,\n\
          \"item_rate\": 100.0,\n\
          \"item_quantity\": 1.0\n\
        }\n\
      ]\n\
    }\n\
  ],\n\
  \"total_item_count\": 1\n\
}";

#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    pub scratch_dir: PathBuf,
    pub max_attempts: usize,
    pub render_timeout: Duration,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir(),
            max_attempts: 4,
            render_timeout: Duration::from_secs(60),
        }
    }
}

/// Result of one completed model call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOutcome {
    pub model: String,
    pub usage: TokenUsage,
    pub data: Value,
    pub parse_error: Option<String>,
}

impl ExtractionOutcome {
    pub fn is_success(&self) -> bool {
        self.parse_error.is_none()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("download failed: {0}")]
    Download(#[from] FetchError),
    #[error("document conversion failed: {0}")]
    Render(#[from] RenderError),
    #[error("document conversion timed out after {0:?}")]
    RenderTimeout(Duration),
    #[error("document conversion task failed: {0}")]
    RenderTask(String),
    #[error("no model candidates available")]
    NoModelCandidates,
    #[error("model {model} failed: {source}")]
    ModelCallFailed {
        model: String,
        source: VisionClientError,
    },
    #[error("all candidate models failed ({attempted}): {last_error}")]
    AllModelsFailed { attempted: String, last_error: String },
}

pub struct ExtractionService {
    fetcher: Arc<dyn DocumentFetcher>,
    renderer: Arc<dyn DocumentRenderer>,
    vision_client: Arc<dyn VisionModelClient>,
    model_selector: ModelSelector,
    options: ExtractionOptions,
}

impl ExtractionService {
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        renderer: Arc<dyn DocumentRenderer>,
        vision_client: Arc<dyn VisionModelClient>,
        model_selector: ModelSelector,
        options: ExtractionOptions,
    ) -> Self {
        Self {
            fetcher,
            renderer,
            vision_client,
            model_selector,
            options,
        }
    }

    #[tracing::instrument(skip(self, url), fields(url = %redacted_url(url)))]
    pub async fn extract(&self, url: &str) -> Result<ExtractionOutcome, ExtractionError> {
        let document = self.fetcher.fetch(url, &self.options.scratch_dir).await?;

        tracing::info!(
            format = %document.format,
            size_bytes = document.size_bytes,
            "Document downloaded"
        );

        let image = self.render(&document).await;
        // Scratch file is gone before the model call, whatever the render outcome.
        drop(document);
        let image = image?;

        tracing::debug!(
            width = image.width,
            height = image.height,
            encoded_len = image.data.len(),
            "Document converted to image"
        );

        let (model, output) = self.generate_with_candidates(&image).await?;

        tracing::info!(
            model = %model,
            total_tokens = output.usage.total_tokens,
            input_tokens = output.usage.input_tokens,
            output_tokens = output.usage.output_tokens,
            "Model call complete"
        );

        Ok(build_outcome(model, output))
    }

    async fn render(&self, document: &FetchedDocument) -> Result<EncodedImage, ExtractionError> {
        let renderer = Arc::clone(&self.renderer);
        let path = document.path().to_path_buf();
        let format = document.format;
        let timeout = self.options.render_timeout;

        tokio::time::timeout(
            timeout,
            tokio::task::spawn_blocking(move || renderer.render_first_page(&path, format)),
        )
        .await
        .map_err(|_| ExtractionError::RenderTimeout(timeout))?
        .map_err(|e| {
            if e.is_panic() {
                ExtractionError::RenderTask("panic during document conversion".to_string())
            } else {
                ExtractionError::RenderTask(e.to_string())
            }
        })?
        .map_err(ExtractionError::from)
    }

    async fn generate_with_candidates(
        &self,
        image: &EncodedImage,
    ) -> Result<(String, GenerationOutput), ExtractionError> {
        let candidates = self
            .model_selector
            .candidates(self.vision_client.as_ref())
            .await;

        if candidates.is_empty() {
            return Err(ExtractionError::NoModelCandidates);
        }

        let mut attempted: Vec<&str> = Vec::new();
        let mut last_error: Option<VisionClientError> = None;

        for (attempt, model) in candidates
            .iter()
            .take(self.options.max_attempts.max(1))
            .enumerate()
        {
            attempted.push(model);

            match self
                .vision_client
                .generate(model, EXTRACTION_PROMPT, image)
                .await
            {
                Ok(output) => return Ok((model.clone(), output)),
                Err(e) if e.advances_to_next_candidate() => {
                    tracing::warn!(
                        model = %model,
                        attempt = attempt + 1,
                        error = %e,
                        "Model candidate unavailable, trying next"
                    );
                    last_error = Some(e);
                }
                Err(e) => {
                    tracing::error!(model = %model, error = %e, "Model call failed");
                    return Err(ExtractionError::ModelCallFailed {
                        model: model.clone(),
                        source: e,
                    });
                }
            }
        }

        Err(ExtractionError::AllModelsFailed {
            attempted: attempted.join(", "),
            last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }
}

fn build_outcome(model: String, output: GenerationOutput) -> ExtractionOutcome {
    match parse_model_json(&output.text) {
        Ok(data) => {
            match BillData::from_value(&data) {
                Some(bill) => tracing::info!(
                    pages = bill.page_count(),
                    line_items = bill.line_item_count(),
                    reported_items = bill.total_item_count,
                    unlabelled_pages = bill.unlabelled_page_count(),
                    "Bill data parsed"
                ),
                None => tracing::warn!("Model JSON does not match the bill schema, returning as-is"),
            }

            ExtractionOutcome {
                model,
                usage: output.usage,
                data,
                parse_error: None,
            }
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                output_chars = output.text.chars().count(),
                "Model output could not be parsed"
            );

            ExtractionOutcome {
                model,
                usage: output.usage,
                data: BillData::empty_value(),
                parse_error: Some(e.to_string()),
            }
        }
    }
}
