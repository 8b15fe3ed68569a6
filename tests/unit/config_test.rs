//! Tests for configuration validation

use orchard_pool::config::{OrchardConfig, PoolConfig, SpawnConfig, CONFIG_ENV_VAR};
use orchard_pool::core::ConfigError;
use parking_lot::Mutex;

// tests touching the process environment run one at a time
static ENV_LOCK: Mutex<()> = parking_lot::const_mutex(());

#[test]
fn test_default_config_is_valid() {
    let cfg = OrchardConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.spawn.red_chance, 25.0);
    assert_eq!(cfg.spawn.golden_chance, 5.0);
    assert_eq!(cfg.spawn.spawn_every_secs, 8.0);
}

#[test]
fn test_no_spawn_points_invalid() {
    let cfg = OrchardConfig {
        spawn: SpawnConfig {
            spawn_points: Vec::new(),
            ..SpawnConfig::default()
        },
        ..OrchardConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_chance_out_of_range_invalid() {
    let mut cfg = OrchardConfig::default();
    cfg.spawn.golden_chance = 0.5;
    assert!(cfg.validate().is_err());

    cfg.spawn.golden_chance = 5.0;
    cfg.spawn.red_chance = 101.0;
    assert!(cfg.validate().is_err());
}

#[test]
fn test_non_positive_interval_invalid() {
    let mut cfg = OrchardConfig::default();
    cfg.spawn.spawn_every_secs = 0.0;
    assert!(cfg.validate().is_err());
}

#[test]
fn test_pool_overrides() {
    let mut cfg = OrchardConfig::default();
    assert_eq!(cfg.red_pool().capacity, cfg.spawn.spawn_points.len() * 2);
    cfg.golden_pool = Some(PoolConfig::new(9));
    assert_eq!(cfg.golden_pool().capacity, 9);
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "spawn": {
            "spawn_points": [
                { "position": [0.0, 3.0, 0.0] },
                { "position": [1.0, 3.0, 1.0], "rotation": [0.0, 90.0, 0.0] }
            ],
            "red_chance": 50.0,
            "spawn_every_secs": 4.0
        },
        "golden_pool": { "capacity": 1, "prewarm": false }
    }"#;

    let cfg = OrchardConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.spawn.spawn_points.len(), 2);
    assert_eq!(cfg.spawn.red_chance, 50.0);
    // unspecified fields keep their defaults
    assert_eq!(cfg.spawn.golden_chance, 5.0);
    assert_eq!(cfg.red_pool().capacity, 4);
    assert!(!cfg.golden_pool().prewarm);
}

#[test]
fn test_config_from_json_rejects_garbage() {
    assert!(matches!(
        OrchardConfig::from_json_str("{ not json"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_config_from_file() {
    let path = std::env::temp_dir().join(format!("orchard-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "spawn": { "red_chance": 10.0 } }"#).unwrap();
    let cfg = OrchardConfig::from_file(&path).unwrap();
    assert_eq!(cfg.spawn.red_chance, 10.0);
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(
        OrchardConfig::from_file(&path),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn test_env_var_name() {
    assert_eq!(CONFIG_ENV_VAR, "ORCHARD_CONFIG");
}

#[test]
fn test_from_env_loads_named_file() {
    let _guard = ENV_LOCK.lock();
    let path = std::env::temp_dir().join(format!("orchard-env-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{ "spawn": { "golden_chance": 12.0, "spawn_every_secs": 3.0 } }"#,
    )
    .unwrap();

    std::env::set_var(CONFIG_ENV_VAR, &path);
    let loaded = OrchardConfig::from_env();
    std::env::remove_var(CONFIG_ENV_VAR);
    std::fs::remove_file(&path).unwrap();

    let cfg = loaded.unwrap();
    assert_eq!(cfg.spawn.golden_chance, 12.0);
    assert_eq!(cfg.spawn.spawn_every_secs, 3.0);
    assert_eq!(cfg.spawn.red_chance, 25.0);
}

#[test]
fn test_from_env_defaults_when_unset() {
    let _guard = ENV_LOCK.lock();
    std::env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(OrchardConfig::from_env().unwrap(), OrchardConfig::default());
}

#[test]
fn test_from_env_missing_file_is_io_error() {
    let _guard = ENV_LOCK.lock();
    let path = std::env::temp_dir().join(format!("orchard-missing-{}.json", std::process::id()));
    std::env::set_var(CONFIG_ENV_VAR, &path);
    let loaded = OrchardConfig::from_env();
    std::env::remove_var(CONFIG_ENV_VAR);

    assert!(matches!(loaded, Err(ConfigError::Io(_))));
}
