//! Tests for builder modules

use orchard_pool::builders::{build_orchard_pools, PoolBuilder};
use orchard_pool::config::{OrchardConfig, PoolConfig};
use orchard_pool::core::Poolable;
use orchard_pool::game::{Apple, AppleFactory, AppleKind, ApplePool};

#[test]
fn test_pool_builder_accessors() {
    let builder = PoolBuilder::new("pool1", PoolConfig::new(4));
    assert_eq!(builder.name(), "pool1");
    assert_eq!(builder.config().capacity, 4);
    assert!(builder.config().prewarm);
}

#[test]
fn test_pool_builder_prewarm_flag() {
    let warm: ApplePool = PoolBuilder::new("warm", PoolConfig::new(3))
        .build(AppleFactory::new(AppleKind::Red, 1))
        .unwrap();
    assert_eq!(warm.available(), 3);

    let cold: ApplePool = PoolBuilder::new(
        "cold",
        PoolConfig {
            capacity: 3,
            prewarm: false,
        },
    )
    .build(AppleFactory::new(AppleKind::Red, 1))
    .unwrap();
    assert_eq!(cold.available(), 0);
    assert_eq!(cold.capacity(), 3);
}

#[test]
fn test_build_orchard_pools_default_capacities() {
    let cfg = OrchardConfig::default();
    let points = cfg.spawn.spawn_points.len();
    let (mut red, golden) = build_orchard_pools(&cfg).unwrap();
    assert_eq!(red.capacity(), points * 2);
    assert_eq!(golden.capacity(), points);

    let apple = red.acquire_active().unwrap();
    let inner: &Apple = &apple;
    assert_eq!(inner.kind(), AppleKind::Red);
    assert_eq!(inner.points(), cfg.spawn.red_points);
    assert!(inner.is_active());
}
