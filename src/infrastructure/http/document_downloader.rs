use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use tokio::io::AsyncWriteExt;

use crate::application::ports::{DocumentFetcher, FetchError, FetchedDocument};
use crate::domain::{DocumentFormat, redacted_url};

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const SCRATCH_PREFIX: &str = "bill-";

/// Streams a remote document into a scratch file.
pub struct HttpDocumentFetcher {
    client: Client,
    user_agent: String,
    max_bytes: u64,
}

impl HttpDocumentFetcher {
    pub fn new(user_agent: &str, timeout: Duration, max_bytes: u64) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            user_agent: user_agent.to_string(),
            max_bytes,
        }
    }
}

#[async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    #[tracing::instrument(skip(self, url, scratch_dir), fields(url = %redacted_url(url)))]
    async fn fetch(&self, url: &str, scratch_dir: &Path) -> Result<FetchedDocument, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }

        let response = self
            .client
            .get(parsed)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.without_url().to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                url: redacted_url(url),
            });
        }

        if let Some(length) = response.content_length() {
            if length > self.max_bytes {
                return Err(FetchError::TooLarge {
                    limit_bytes: self.max_bytes,
                });
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let format = DocumentFormat::detect(content_type.as_deref(), url);

        tracing::debug!(
            content_type = content_type.as_deref().unwrap_or("none"),
            format = %format,
            "Downloading document"
        );

        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .suffix(format.extension())
            .tempfile_in(scratch_dir)?;
        let mut file = tokio::fs::File::from_std(scratch.reopen()?);

        let mut stream = response.bytes_stream();
        let mut total_bytes: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| FetchError::Request(e.without_url().to_string()))?;
            total_bytes += bytes.len() as u64;
            if total_bytes > self.max_bytes {
                return Err(FetchError::TooLarge {
                    limit_bytes: self.max_bytes,
                });
            }
            file.write_all(&bytes).await?;
        }
        file.flush().await?;

        Ok(FetchedDocument {
            file: scratch,
            format,
            size_bytes: total_bytes,
        })
    }
}
