//! Apple spawner driven by game events and ticks.
//!
//! While a game is running the orchard spawns a wave every
//! `spawn_every_secs`: each spawn point rolls once for a red apple, then
//! each point rolls once for a golden apple. Apples stay live until they are
//! grabbed or hit the ground, at which point they go back to their pool.

use std::collections::HashMap;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;

use crate::builders::build_orchard_pools;
use crate::config::{OrchardConfig, SpawnConfig};
use crate::core::{AppResult, ConfigError, Listener, ObjectPool, PoolError, PoolStats, Pooled};
use crate::game::{Apple, AppleFactory, AppleId, AppleKind, GameEnd, GameStart, Grabbable};

/// Pool of apples of a single kind.
pub type ApplePool = ObjectPool<Apple, AppleFactory>;

/// Randomized apple spawner.
pub struct Orchard {
    spawn: SpawnConfig,
    interval: Duration,
    red: ApplePool,
    golden: ApplePool,
    live: HashMap<AppleId, Pooled<Apple>>,
    spawning: bool,
    until_next_wave: Duration,
    waves: u64,
    rng: StdRng,
}

impl Orchard {
    /// Build an orchard and its pools from configuration.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or a pool cannot be pre-warmed.
    pub fn new(config: &OrchardConfig, rng: StdRng) -> AppResult<Self> {
        config.validate()?;
        let (red, golden) = build_orchard_pools(config)?;
        let interval = Duration::try_from_secs_f64(config.spawn.spawn_every_secs)
            .map_err(|e| ConfigError::Invalid(format!("spawn_every_secs: {e}")))?;
        if interval.is_zero() {
            return Err(ConfigError::Invalid("spawn_every_secs rounds to zero".into()).into());
        }
        Ok(Self {
            spawn: config.spawn.clone(),
            interval,
            red,
            golden,
            live: HashMap::new(),
            spawning: false,
            until_next_wave: Duration::ZERO,
            waves: 0,
            rng,
        })
    }

    /// Advance the spawn timer by `elapsed` and spawn a wave if one is due.
    /// Returns the ids of apples spawned during this tick.
    ///
    /// At most one wave spawns per tick; time beyond the due point is
    /// discarded so a stalled host does not release a burst of waves.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Factory`] if a pool had to create an apple and
    /// the factory failed.
    pub fn tick(&mut self, elapsed: Duration) -> Result<Vec<AppleId>, PoolError> {
        if !self.spawning {
            return Ok(Vec::new());
        }
        if elapsed < self.until_next_wave {
            self.until_next_wave -= elapsed;
            return Ok(Vec::new());
        }
        self.until_next_wave = self.interval;
        self.spawn_wave()
    }

    fn spawn_wave(&mut self) -> Result<Vec<AppleId>, PoolError> {
        let mut spawned = Vec::new();
        for (kind, chance) in [
            (AppleKind::Red, self.spawn.red_chance),
            (AppleKind::Golden, self.spawn.golden_chance),
        ] {
            for index in 0..self.spawn.spawn_points.len() {
                let roll = f32::from(self.rng.random_range(1_u8..100));
                if roll > chance {
                    continue;
                }
                let point = self.spawn.spawn_points[index];
                let mut apple = self.pool_mut(kind).acquire_active()?;
                apple.place(point);
                let id = AppleId {
                    kind,
                    instance: apple.id(),
                };
                self.live.insert(id, apple);
                spawned.push(id);
            }
        }
        self.waves += 1;
        tracing::debug!("wave {} spawned {} apple(s)", self.waves, spawned.len());
        Ok(spawned)
    }

    /// Grab a live apple: award its points and return it to its pool.
    /// Unknown ids award nothing.
    ///
    /// # Errors
    ///
    /// Propagates [`PoolError::InvalidRelease`] from the pool.
    pub fn grab(&mut self, id: AppleId) -> Result<u32, PoolError> {
        let Some(mut apple) = self.live.remove(&id) else {
            tracing::debug!("grab of unknown apple {:?}", id);
            return Ok(0);
        };
        let points = apple.on_grab();
        self.pool_mut(id.kind).release(apple)?;
        Ok(points)
    }

    /// An apple hit the ground: return it to its pool without scoring.
    /// Returns `false` for unknown ids.
    ///
    /// # Errors
    ///
    /// Propagates [`PoolError::InvalidRelease`] from the pool.
    pub fn land(&mut self, id: AppleId) -> Result<bool, PoolError> {
        match self.live.remove(&id) {
            Some(apple) => {
                self.pool_mut(id.kind).release(apple)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Return every live apple and destroy all pooled instances.
    ///
    /// # Errors
    ///
    /// Propagates [`PoolError::InvalidRelease`] from the pools.
    pub fn shutdown(&mut self) -> Result<(), PoolError> {
        self.spawning = false;
        let live: Vec<_> = self.live.drain().collect();
        for (id, apple) in live {
            self.pool_mut(id.kind).release(apple)?;
        }
        let destroyed = self.red.drain() + self.golden.drain();
        tracing::info!("orchard shut down, destroyed {} pooled apple(s)", destroyed);
        Ok(())
    }

    /// Live apple by id.
    pub fn apple(&self, id: AppleId) -> Option<&Apple> {
        self.live.get(&id).map(|pooled| &**pooled)
    }

    /// Ids of every live apple.
    pub fn live_apples(&self) -> impl Iterator<Item = AppleId> + '_ {
        self.live.keys().copied()
    }

    /// Number of live apples.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Whether a game is running.
    pub const fn is_spawning(&self) -> bool {
        self.spawning
    }

    /// Waves spawned so far.
    pub const fn waves(&self) -> u64 {
        self.waves
    }

    /// Counters for the pool of `kind`.
    pub fn pool_stats(&self, kind: AppleKind) -> PoolStats {
        match kind {
            AppleKind::Red => self.red.stats(),
            AppleKind::Golden => self.golden.stats(),
        }
    }

    fn pool_mut(&mut self, kind: AppleKind) -> &mut ApplePool {
        match kind {
            AppleKind::Red => &mut self.red,
            AppleKind::Golden => &mut self.golden,
        }
    }
}

impl Listener<GameStart> for Orchard {
    fn on_event(&mut self, _event: &GameStart) -> AppResult<()> {
        self.spawning = true;
        self.until_next_wave = Duration::ZERO;
        tracing::info!("orchard spawning started");
        Ok(())
    }
}

impl Listener<GameEnd> for Orchard {
    fn on_event(&mut self, _event: &GameEnd) -> AppResult<()> {
        self.spawning = false;
        tracing::info!(
            "orchard spawning stopped after {} wave(s), {} apple(s) still live",
            self.waves,
            self.live.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpawnPoint;
    use rand::SeedableRng;

    fn always_red() -> OrchardConfig {
        OrchardConfig {
            spawn: SpawnConfig {
                spawn_points: vec![SpawnPoint::at(0.0, 3.0, 0.0), SpawnPoint::at(1.0, 3.0, 0.0)],
                red_chance: 100.0,
                golden_chance: 1.0,
                spawn_every_secs: 8.0,
                red_points: 1,
                golden_points: 5,
            },
            ..OrchardConfig::default()
        }
    }

    fn orchard(cfg: &OrchardConfig) -> Orchard {
        Orchard::new(cfg, StdRng::seed_from_u64(7)).unwrap()
    }

    fn reds(ids: &[AppleId]) -> usize {
        ids.iter().filter(|id| id.kind == AppleKind::Red).count()
    }

    #[test]
    fn test_idle_until_game_start() {
        let mut o = orchard(&always_red());
        assert!(o.tick(Duration::from_secs(60)).unwrap().is_empty());
        assert_eq!(o.waves(), 0);
    }

    #[test]
    fn test_first_wave_on_start_then_every_interval() {
        let mut o = orchard(&always_red());
        Listener::<GameStart>::on_event(&mut o, &GameStart).unwrap();

        let first = o.tick(Duration::ZERO).unwrap();
        assert_eq!(reds(&first), 2);
        assert!(o.tick(Duration::from_secs(7)).unwrap().is_empty());
        assert_eq!(reds(&o.tick(Duration::from_secs(1)).unwrap()), 2);
        assert_eq!(o.waves(), 2);
    }

    #[test]
    fn test_long_tick_spawns_single_wave() {
        let mut o = orchard(&always_red());
        Listener::<GameStart>::on_event(&mut o, &GameStart).unwrap();
        let spawned = o.tick(Duration::from_secs(20)).unwrap();
        assert_eq!(o.waves(), 1);
        assert_eq!(reds(&spawned), 2);

        // the overshoot is dropped; the next wave is a full interval away
        assert!(o.tick(Duration::from_secs(7)).unwrap().is_empty());
        assert_eq!(reds(&o.tick(Duration::from_secs(1)).unwrap()), 2);
    }

    #[test]
    fn test_stalled_host_does_not_burst() {
        let mut cfg = always_red();
        cfg.spawn.spawn_every_secs = 0.01;
        let mut o = orchard(&cfg);
        Listener::<GameStart>::on_event(&mut o, &GameStart).unwrap();
        o.tick(Duration::ZERO).unwrap();

        let spawned = o.tick(Duration::from_secs(60)).unwrap();
        assert_eq!(o.waves(), 2);
        assert_eq!(reds(&spawned), 2);
        let live: Vec<_> = o.live_apples().collect();
        assert_eq!(reds(&live), 4);
        assert_eq!(o.pool_stats(AppleKind::Red).created, 4);
    }

    #[test]
    fn test_grab_and_land_return_to_pool() {
        let mut o = orchard(&always_red());
        Listener::<GameStart>::on_event(&mut o, &GameStart).unwrap();
        let ids: Vec<_> = o
            .tick(Duration::ZERO)
            .unwrap()
            .into_iter()
            .filter(|id| id.kind == AppleKind::Red)
            .collect();
        let apple = o.apple(ids[0]).unwrap();
        assert_eq!(apple.spawn_point(), Some(SpawnPoint::at(0.0, 3.0, 0.0)));

        assert_eq!(o.grab(ids[0]).unwrap(), 1);
        assert_eq!(o.grab(ids[0]).unwrap(), 0);
        assert!(o.land(ids[1]).unwrap());
        assert!(!o.land(ids[1]).unwrap());

        let stats = o.pool_stats(AppleKind::Red);
        assert_eq!(stats.outstanding, 0);
        assert_eq!(stats.available, stats.capacity);
    }

    #[test]
    fn test_game_end_stops_spawning() {
        let mut o = orchard(&always_red());
        Listener::<GameStart>::on_event(&mut o, &GameStart).unwrap();
        o.tick(Duration::ZERO).unwrap();
        Listener::<GameEnd>::on_event(&mut o, &GameEnd).unwrap();

        assert!(!o.is_spawning());
        assert!(o.tick(Duration::from_secs(30)).unwrap().is_empty());
        assert!(o.live_count() >= 2);
    }
}
