//! Builders to construct object pools from configuration.

use crate::config::{OrchardConfig, PoolConfig};
use crate::core::{ObjectPool, PoolError, Poolable, ResourceFactory};
use crate::game::{AppleFactory, AppleKind, ApplePool};

/// Builds an [`ObjectPool`] from a [`PoolConfig`].
#[derive(Debug, Clone)]
pub struct PoolBuilder {
    name: String,
    config: PoolConfig,
}

impl PoolBuilder {
    /// Create a builder for a named pool.
    pub fn new(name: impl Into<String>, config: PoolConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Pool name used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration the pool will be built with.
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Build the pool, pre-warming it when configured to.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Factory`] if pre-warming fails.
    pub fn build<T, F>(&self, factory: F) -> Result<ObjectPool<T, F>, PoolError>
    where
        T: Poolable,
        F: ResourceFactory<T>,
    {
        let pool = if self.config.prewarm {
            ObjectPool::new(self.config.capacity, factory)?
        } else {
            ObjectPool::lazy(self.config.capacity, factory)
        };
        tracing::info!(
            "built pool `{}` ({}) capacity={} prewarm={}",
            self.name,
            pool.id(),
            self.config.capacity,
            self.config.prewarm
        );
        Ok(pool)
    }
}

/// Build the red and golden apple pools for an orchard.
///
/// # Errors
///
/// Returns [`PoolError::Factory`] if pre-warming fails.
pub fn build_orchard_pools(cfg: &OrchardConfig) -> Result<(ApplePool, ApplePool), PoolError> {
    let red = PoolBuilder::new("red_apples", cfg.red_pool())
        .build(AppleFactory::new(AppleKind::Red, cfg.spawn.red_points))?;
    let golden = PoolBuilder::new("golden_apples", cfg.golden_pool())
        .build(AppleFactory::new(AppleKind::Golden, cfg.spawn.golden_points))?;
    Ok((red, golden))
}
