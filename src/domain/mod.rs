mod bill_data;
mod document_format;
mod document_url;
mod encoded_image;
mod model_descriptor;
mod token_usage;

pub use bill_data::{BillData, BillItem, PageLineItems};
pub use document_format::DocumentFormat;
pub use document_url::redacted_url;
pub use encoded_image::EncodedImage;
pub use model_descriptor::ModelDescriptor;
pub use token_usage::TokenUsage;
