//! Configuration models for pools and the orchard spawner.

pub mod orchard;

pub use orchard::{OrchardConfig, PoolConfig, SpawnConfig, SpawnPoint, CONFIG_ENV_VAR};
