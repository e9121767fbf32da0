use serde::Deserialize;

const MODEL_NAME_PREFIX: &str = "models/";
const GENERATE_METHOD: &str = "generateContent";
const EMBED_METHOD: &str = "embedContent";

/// Entry of the provider's model catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelDescriptor {
    pub fn new(name: impl Into<String>, methods: &[&str]) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            supported_generation_methods: methods.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn id(&self) -> &str {
        self.name
            .strip_prefix(MODEL_NAME_PREFIX)
            .unwrap_or(&self.name)
    }

    pub fn supports_generation(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == GENERATE_METHOD)
    }

    pub fn is_embedding(&self) -> bool {
        let named_embedding = self.id().to_lowercase().contains("embedding")
            || self
                .display_name
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains("embedding"));

        let embed_only = self.supported_generation_methods.iter().any(|m| m == EMBED_METHOD)
            && !self.supports_generation();

        named_embedding || embed_only
    }

    pub fn is_experimental(&self) -> bool {
        let id = self.id().to_lowercase();
        id.contains("exp") || id.contains("preview")
    }
}
