//! Tests for beam configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        beam_width = 8
        relation_count = 12
        return_sequence = true

        [expansion_threads]
        count = 16
    "#;

    let config = BeamConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.beam_width, 8);
    assert_eq!(config.relation_count, 12);
    assert_eq!(config.expansion_threads, ExpansionThreads::Count(16));
    assert!(config.return_sequence);
    assert!(!config.return_model_value);
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        beam_width: 2
        relation_count: 3
        expansion_threads: auto
        return_model_value: true
    "#;

    let config = BeamConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.beam_width, 2);
    assert_eq!(config.estimated_transitions(), 8);
    assert_eq!(config.expansion_threads, ExpansionThreads::Auto);
    assert!(config.return_model_value);
}

#[test]
fn test_defaults_from_empty_document() {
    let config = BeamConfig::from_toml_str("").unwrap();
    assert_eq!(config, BeamConfig::default());
    assert_eq!(config.beam_width, 4);
    assert_eq!(config.estimated_transitions(), 2);
}

#[test]
fn test_agenda_sizing() {
    let config = BeamConfig::new().with_beam_width(3).with_relation_count(2);
    assert_eq!(config.estimated_transitions(), 6);
    assert_eq!(config.agenda_capacity(), 18);
}

#[test]
fn test_estimate_override() {
    let mut config = BeamConfig::new().with_relation_count(40);
    config.estimated_transitions = Some(5);
    assert_eq!(config.estimated_transitions(), 5);
}

#[test]
fn test_thread_count_never_below_width() {
    assert_eq!(ExpansionThreads::Auto.resolve(6), 6);
    assert_eq!(ExpansionThreads::Count(2).resolve(6), 6);
    assert_eq!(ExpansionThreads::Count(10).resolve(6), 10);
    assert_eq!(ExpansionThreads::Auto.resolve(0), 1);
}

#[test]
fn test_validate_rejects_zero_width() {
    let config = BeamConfig::new().with_beam_width(0);
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_validate_rejects_zero_thread_count() {
    let config = BeamConfig::new().with_expansion_threads(ExpansionThreads::Count(0));
    assert!(config.validate().is_err());
    assert!(BeamConfig::default().validate().is_ok());
}

#[test]
fn test_invalid_toml() {
    let result = BeamConfig::from_toml_str("beam_width = \"wide\"");
    assert!(matches!(result, Err(ConfigError::Toml(_))));
}

#[test]
fn test_error_converts_to_transbeam_error() {
    let err: TransbeamError = ConfigError::Invalid("beam_width must be at least 1".into()).into();
    assert!(matches!(err, TransbeamError::Config(_)));
    assert!(err.to_string().contains("beam_width"));
}

#[test]
fn test_missing_file() {
    let result = BeamConfig::load("/nonexistent/transbeam.toml");
    assert!(matches!(result, Err(ConfigError::Io(_))));
}
