use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::application::ports::VisionModelClient;
use crate::domain::ModelDescriptor;

/// How the service decides which remote models to call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum ModelSelection {
    Fixed {
        model: String,
    },
    Fallback {
        models: Vec<String>,
    },
    Discovery {
        #[serde(default = "default_preferences")]
        preferences: Vec<String>,
        #[serde(default = "default_fallback_models")]
        fallback_models: Vec<String>,
    },
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self::Discovery {
            preferences: default_preferences(),
            fallback_models: default_fallback_models(),
        }
    }
}

pub fn default_preferences() -> Vec<String> {
    vec!["flash".to_string(), "pro".to_string()]
}

pub fn default_fallback_models() -> Vec<String> {
    vec!["gemini-1.5-flash".to_string(), "gemini-1.5-pro".to_string()]
}

/// Resolves a `ModelSelection` into candidate ids. A successful discovery is
/// cached for the life of the selector; failed or empty listings are retried.
pub struct ModelSelector {
    selection: ModelSelection,
    discovered: OnceCell<Vec<String>>,
}

impl ModelSelector {
    pub fn new(selection: ModelSelection) -> Self {
        Self {
            selection,
            discovered: OnceCell::new(),
        }
    }

    pub fn selection(&self) -> &ModelSelection {
        &self.selection
    }

    /// Ordered model ids to try for one request.
    #[tracing::instrument(skip(self, client))]
    pub async fn candidates(&self, client: &dyn VisionModelClient) -> Vec<String> {
        match &self.selection {
            ModelSelection::Fixed { model } => vec![model.clone()],
            ModelSelection::Fallback { models } => dedup_preserving_order(models),
            ModelSelection::Discovery {
                preferences,
                fallback_models,
            } => {
                let discovered = self
                    .discovered
                    .get_or_try_init(|| discover(client, preferences))
                    .await;

                match discovered {
                    Ok(ranked) => ranked.clone(),
                    Err(reason) => {
                        tracing::warn!(%reason, "Model discovery unavailable, using fallback list");
                        dedup_preserving_order(fallback_models)
                    }
                }
            }
        }
    }
}

async fn discover(
    client: &dyn VisionModelClient,
    preferences: &[String],
) -> Result<Vec<String>, String> {
    let catalog = client
        .list_models()
        .await
        .map_err(|e| format!("listing failed: {e}"))?;

    let ranked = rank_discovered_models(&catalog, preferences);
    if ranked.is_empty() {
        return Err(format!(
            "no usable generative models among {} listed",
            catalog.len()
        ));
    }

    tracing::info!(
        selected = %ranked[0],
        candidates = ?ranked,
        "Model discovery complete"
    );
    Ok(ranked)
}

/// Filters the catalog down to generative, non-embedding models, puts stable
/// models before experimental/preview ones, then moves the first model matching
/// the earliest preference keyword to the front.
pub fn rank_discovered_models(models: &[ModelDescriptor], preferences: &[String]) -> Vec<String> {
    let mut usable: Vec<&ModelDescriptor> = models
        .iter()
        .filter(|m| m.supports_generation() && !m.is_embedding())
        .collect();

    usable.sort_by_key(|m| m.is_experimental());

    let mut ids = dedup_preserving_order(
        &usable
            .iter()
            .map(|m| m.id().to_string())
            .collect::<Vec<_>>(),
    );

    let chosen = preferences.iter().find_map(|keyword| {
        let keyword = keyword.to_lowercase();
        ids.iter()
            .position(|id| id.to_lowercase().contains(&keyword))
    });

    if let Some(index) = chosen {
        let id = ids.remove(index);
        ids.insert(0, id);
    }

    ids
}

fn dedup_preserving_order(models: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    models
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .filter(|m| seen.insert(m.to_string()))
        .map(str::to_string)
        .collect()
}
