//! Tests for error types

use orchard_pool::core::{ConfigError, DispatchError, PoolError};
use uuid::Uuid;

#[test]
fn test_factory_error() {
    let err = PoolError::Factory(anyhow::anyhow!("prefab missing"));
    assert_eq!(format!("{}", err), "factory failed: prefab missing");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_invalid_release_error() {
    let pool = Uuid::nil();
    let err = PoolError::InvalidRelease { pool, instance: 7 };
    assert_eq!(
        format!("{}", err),
        format!("invalid release: instance 7 is not checked out from pool {pool}")
    );
}

#[test]
fn test_listener_failures_error() {
    let err = DispatchError::ListenerFailures {
        event: "GameEnd",
        failed: 1,
        delivered: 2,
        first: "listener #0 failed: boom".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "1 listener(s) failed for GameEnd (2 delivered): listener #0 failed: boom"
    );
}

#[test]
fn test_config_invalid_error() {
    let err = ConfigError::Invalid("no spawn points".to_string());
    assert_eq!(format!("{}", err), "invalid config: no spawn points");
}
