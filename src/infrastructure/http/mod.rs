mod document_downloader;

pub use document_downloader::{BROWSER_USER_AGENT, HttpDocumentFetcher};
