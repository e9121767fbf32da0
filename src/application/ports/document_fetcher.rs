use std::path::Path;

use async_trait::async_trait;
use tempfile::NamedTempFile;

use crate::domain::DocumentFormat;

/// Downloaded document held in a scratch file. The file is removed when this is dropped.
#[derive(Debug)]
pub struct FetchedDocument {
    pub file: NamedTempFile,
    pub format: DocumentFormat,
    pub size_bytes: u64,
}

impl FetchedDocument {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str, scratch_dir: &Path) -> Result<FetchedDocument, FetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid document url: {0}")]
    InvalidUrl(String),
    #[error("download request failed: {0}")]
    Request(String),
    #[error("download returned {status} for {url}")]
    Status { status: u16, url: String },
    #[error("document exceeds {limit_bytes} bytes")]
    TooLarge { limit_bytes: u64 },
    #[error("scratch file error: {0}")]
    Io(#[from] std::io::Error),
}
