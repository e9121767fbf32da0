mod document_fetcher;
mod document_renderer;
mod vision_model_client;

pub use document_fetcher::{DocumentFetcher, FetchError, FetchedDocument};
pub use document_renderer::{DocumentRenderer, RenderError};
pub use vision_model_client::{GenerationOutput, VisionClientError, VisionModelClient};
