//! Configuration files: defaults, partial overrides and validation.

use lc_app::{AppError, SimConfig, load_yaml, save_yaml};
use lc_core::Mode;

fn temp_path(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("lc_app_config_test");
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn partial_override_keeps_other_defaults() {
    let yaml = r#"
mode: numerical
circuit:
  inductance_h: 1.0e-3
animation:
  speed: 0.8
"#;
    let config = SimConfig::from_yaml_str(yaml).unwrap();
    let defaults = SimConfig::default();

    assert_eq!(config.mode, Mode::Numerical);
    assert_eq!(config.circuit.inductance_h, 1.0e-3);
    assert_eq!(config.circuit.capacitance_f, defaults.circuit.capacitance_f);
    assert_eq!(config.circuit.q0_c, 1.0);
    assert_eq!(config.animation.speed, 0.8);
    assert_eq!(config.animation.window, defaults.animation.window);
    assert_eq!(config.domain, defaults.domain);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = SimConfig::from_yaml_str("animation:\n  sped: 0.5\n").unwrap_err();
    assert!(matches!(err, AppError::Yaml(_)));
}

#[test]
fn invalid_values_are_rejected() {
    let err = SimConfig::from_yaml_str("circuit:\n  capacitance_f: 0.0\n").unwrap_err();
    assert!(matches!(err, AppError::InvalidParameter(_)));

    let err = SimConfig::from_yaml_str("domain:\n  tau_end: -1.0\n").unwrap_err();
    assert!(matches!(err, AppError::Config(_)));

    let err = SimConfig::from_yaml_str("cache:\n  capacity: 0\n").unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn save_and_load_round_trip() {
    let path = temp_path("round_trip.yaml");
    let mut config = SimConfig::default();
    config.mode = Mode::Numerical;
    config.domain.samples = 5_000;

    save_yaml(&path, &config).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn missing_file_names_the_path() {
    let path = temp_path("does_not_exist.yaml");
    let _ = std::fs::remove_file(&path);
    match load_yaml(&path) {
        Err(AppError::ConfigFileRead { path: p, .. }) => assert_eq!(p, path),
        other => panic!("unexpected result: {other:?}"),
    }
}
