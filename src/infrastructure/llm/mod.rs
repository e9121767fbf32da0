mod gemini_client;

pub use gemini_client::{GEMINI_DEFAULT_BASE_URL, GeminiClient};
