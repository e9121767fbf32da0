use bill_extractor::infrastructure::observability::{
    DEFAULT_FILTER, TracingConfig, filter_directives,
};

#[test]
fn given_explicit_values_when_creating_config_then_keeps_them() {
    let config = TracingConfig::new("Prod", true);

    assert_eq!(config.environment, "Prod");
    assert!(config.json_format);
}

#[test]
fn given_default_config_when_created_then_environment_is_set() {
    let config = TracingConfig::default();
    assert!(!config.environment.is_empty());
}

#[test]
fn given_blank_filter_when_configuring_then_it_is_ignored() {
    let config = TracingConfig::new("local", false).with_filter(Some("  ".to_string()));

    assert!(config.filter.is_none());
}

#[test]
fn given_nothing_configured_when_resolving_filter_then_uses_default() {
    let config = TracingConfig::new("local", false);

    assert_eq!(filter_directives(&config, None), DEFAULT_FILTER);
}

#[test]
fn given_configured_filter_when_resolving_then_it_replaces_default() {
    let config = TracingConfig::new("local", false).with_filter(Some("warn".to_string()));

    assert_eq!(filter_directives(&config, None), "warn");
    assert_eq!(filter_directives(&config, Some("")), "warn");
}

#[test]
fn given_rust_log_when_resolving_filter_then_it_wins_over_settings() {
    let config = TracingConfig::new("local", false).with_filter(Some("warn".to_string()));

    assert_eq!(
        filter_directives(&config, Some("bill_extractor=trace")),
        "bill_extractor=trace"
    );
}
