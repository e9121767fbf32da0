pub mod http;
pub mod imaging;
pub mod llm;
pub mod observability;
