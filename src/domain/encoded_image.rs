/// Image ready to be inlined into a model request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: String,
    pub data: String,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    pub fn new(mime_type: impl Into<String>, data: String, width: u32, height: u32) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
            width,
            height,
        }
    }
}
