use bill_extractor::application::ports::VisionClientError;
use bill_extractor::application::services::{
    ModelSelection, ModelSelector, default_fallback_models, default_preferences,
    rank_discovered_models,
};
use bill_extractor::domain::ModelDescriptor;

use crate::helpers::ScriptedVisionClient;

const GENERATE: &[&str] = &["generateContent", "countTokens"];

fn catalog() -> Vec<ModelDescriptor> {
    vec![
        ModelDescriptor::new("models/embedding-001", &["embedContent"]),
        ModelDescriptor::new("models/gemini-2.0-flash-exp", GENERATE),
        ModelDescriptor::new("models/gemini-1.5-pro", GENERATE),
        ModelDescriptor::new("models/gemini-1.5-flash", GENERATE),
        ModelDescriptor::new("models/aqa", &["generateAnswer"]),
    ]
}

#[test]
fn given_mixed_catalog_when_ranking_then_prefers_stable_flash_model() {
    let ranked = rank_discovered_models(&catalog(), &default_preferences());

    assert_eq!(
        ranked,
        vec!["gemini-1.5-flash", "gemini-1.5-pro", "gemini-2.0-flash-exp"]
    );
}

#[test]
fn given_no_flash_model_when_ranking_then_falls_to_second_preference() {
    let models = vec![
        ModelDescriptor::new("models/gemma-3-27b-it", GENERATE),
        ModelDescriptor::new("models/gemini-1.5-pro", GENERATE),
    ];

    let ranked = rank_discovered_models(&models, &default_preferences());

    assert_eq!(ranked[0], "gemini-1.5-pro");
    assert_eq!(ranked.len(), 2);
}

#[test]
fn given_no_preference_match_when_ranking_then_keeps_first_remaining() {
    let models = vec![
        ModelDescriptor::new("models/gemma-3-27b-it", GENERATE),
        ModelDescriptor::new("models/learnlm-1.5", GENERATE),
    ];

    let ranked = rank_discovered_models(&models, &default_preferences());

    assert_eq!(ranked, vec!["gemma-3-27b-it", "learnlm-1.5"]);
}

#[test]
fn given_only_preview_models_when_ranking_then_still_returns_them() {
    let models = vec![
        ModelDescriptor::new("models/gemini-2.5-pro-preview", GENERATE),
        ModelDescriptor::new("models/gemini-2.5-flash-preview", GENERATE),
    ];

    let ranked = rank_discovered_models(&models, &default_preferences());

    assert_eq!(
        ranked,
        vec!["gemini-2.5-flash-preview", "gemini-2.5-pro-preview"]
    );
}

#[test]
fn given_embedding_named_generator_when_ranking_then_excludes_it() {
    let models = vec![
        ModelDescriptor::new("models/text-embedding-flash", GENERATE),
        ModelDescriptor::new("models/gemini-1.5-flash", GENERATE),
    ];

    let ranked = rank_discovered_models(&models, &default_preferences());

    assert_eq!(ranked, vec!["gemini-1.5-flash"]);
}

#[tokio::test]
async fn given_discovery_when_catalog_available_then_returns_ranked_candidates() {
    let client = ScriptedVisionClient::new(vec![]).with_catalog(Ok(catalog()));
    let selector = ModelSelector::new(ModelSelection::default());

    let candidates = selector.candidates(&client).await;

    assert_eq!(candidates[0], "gemini-1.5-flash");
}

#[tokio::test]
async fn given_discovery_when_listing_fails_then_uses_fallback_models() {
    let client = ScriptedVisionClient::new(vec![]).with_catalog(Err(VisionClientError::Status {
        status: 403,
        body: "forbidden".to_string(),
    }));
    let selector = ModelSelector::new(ModelSelection::default());

    let candidates = selector.candidates(&client).await;

    assert_eq!(candidates, default_fallback_models());
}

#[tokio::test]
async fn given_discovery_when_catalog_has_no_generators_then_uses_fallback_models() {
    let client = ScriptedVisionClient::new(vec![]).with_catalog(Ok(vec![ModelDescriptor::new(
        "models/embedding-001",
        &["embedContent"],
    )]));
    let selector = ModelSelector::new(ModelSelection::Discovery {
        preferences: default_preferences(),
        fallback_models: vec!["backup-model".to_string()],
    });

    let candidates = selector.candidates(&client).await;

    assert_eq!(candidates, vec!["backup-model"]);
}

#[tokio::test]
async fn given_successful_discovery_when_selecting_again_then_catalog_is_not_listed_twice() {
    let client = ScriptedVisionClient::new(vec![]).with_catalog(Ok(catalog()));
    let selector = ModelSelector::new(ModelSelection::default());

    let first = selector.candidates(&client).await;
    let second = selector.candidates(&client).await;

    assert_eq!(first, second);
    assert_eq!(client.list_calls(), 1);
}

#[tokio::test]
async fn given_failed_discovery_when_selecting_again_then_listing_is_retried() {
    let client = ScriptedVisionClient::new(vec![]).with_catalog(Err(VisionClientError::Request(
        "connection reset".to_string(),
    )));
    let selector = ModelSelector::new(ModelSelection::default());

    let first = selector.candidates(&client).await;
    *client.catalog.lock().unwrap() = Some(Ok(catalog()));
    let second = selector.candidates(&client).await;

    assert_eq!(first, default_fallback_models());
    assert_eq!(second[0], "gemini-1.5-flash");
    assert_eq!(client.list_calls(), 2);
}

#[tokio::test]
async fn given_fallback_list_with_duplicates_when_selecting_then_order_kept_and_deduplicated() {
    let client = ScriptedVisionClient::new(vec![]);
    let selector = ModelSelector::new(ModelSelection::Fallback {
        models: vec![
            "gemini-1.5-flash".to_string(),
            " ".to_string(),
            "gemini-1.5-pro".to_string(),
            "gemini-1.5-flash".to_string(),
        ],
    });

    let candidates = selector.candidates(&client).await;

    assert_eq!(candidates, vec!["gemini-1.5-flash", "gemini-1.5-pro"]);
}

#[tokio::test]
async fn given_fixed_model_when_selecting_then_returns_single_candidate() {
    let client = ScriptedVisionClient::new(vec![]);
    let selector = ModelSelector::new(ModelSelection::Fixed {
        model: "gemini-1.5-flash".to_string(),
    });

    let candidates = selector.candidates(&client).await;

    assert_eq!(candidates, vec!["gemini-1.5-flash"]);
}

#[test]
fn given_strategy_json_when_deserializing_then_builds_selection() {
    let fixed: ModelSelection =
        serde_json::from_str(r#"{"strategy": "fixed", "model": "gemini-1.5-flash"}"#).unwrap();
    let discovery: ModelSelection = serde_json::from_str(r#"{"strategy": "discovery"}"#).unwrap();

    assert_eq!(
        fixed,
        ModelSelection::Fixed {
            model: "gemini-1.5-flash".to_string()
        }
    );
    assert_eq!(discovery, ModelSelection::default());
}
