mod extraction_service;
mod model_selector;
mod response_parser;

pub use extraction_service::{
    EXTRACTION_PROMPT, ExtractionError, ExtractionOptions, ExtractionOutcome, ExtractionService,
};
pub use model_selector::{
    ModelSelection, ModelSelector, default_fallback_models, default_preferences,
    rank_discovered_models,
};
pub use response_parser::{ParseError, parse_model_json, strip_code_fences};
