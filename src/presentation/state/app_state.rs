use std::sync::Arc;

use crate::application::services::ExtractionService;

#[derive(Clone)]
pub struct AppState {
    pub extraction_service: Arc<ExtractionService>,
}

impl AppState {
    pub fn new(extraction_service: Arc<ExtractionService>) -> Self {
        Self { extraction_service }
    }
}
