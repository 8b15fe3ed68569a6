//! Root context owning the dispatcher, orchard and score.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::OrchardConfig;
use crate::core::{AppResult, Event, EventDispatcher, PoolError, PublishReport};
use crate::game::{
    AppleId, GameEnd, GameStart, Orchard, PlayerTeleport, PreGameEnd, PreGameStart, ScoreKeeper,
};

/// One running instance of the minigame.
///
/// Created with [`Session::init`] and torn down with [`Session::teardown`];
/// nothing is registered globally.
pub struct Session {
    dispatcher: Arc<EventDispatcher>,
    orchard: Arc<Mutex<Orchard>>,
    score: Arc<Mutex<ScoreKeeper>>,
}

impl Session {
    /// Build the orchard and score keeper and wire them to a fresh dispatcher.
    ///
    /// On `GameEnd` the score keeper is notified before the orchard.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or a pool cannot be pre-warmed.
    pub fn init(config: &OrchardConfig, seed: u64) -> AppResult<Self> {
        let dispatcher = Arc::new(EventDispatcher::new());
        let orchard = Arc::new(Mutex::new(Orchard::new(
            config,
            StdRng::seed_from_u64(seed),
        )?));
        let score = Arc::new(Mutex::new(ScoreKeeper::new()));

        dispatcher.add_listener::<GameStart>(score.clone());
        dispatcher.add_listener::<GameStart>(orchard.clone());
        dispatcher.add_listener::<GameEnd>(score.clone());
        dispatcher.add_listener::<GameEnd>(orchard.clone());

        tracing::info!(
            "session initialized with {} spawn point(s)",
            config.spawn.spawn_points.len()
        );
        Ok(Self {
            dispatcher,
            orchard,
            score,
        })
    }

    /// Shared dispatcher, for additional subsystems to subscribe to.
    pub const fn dispatcher(&self) -> &Arc<EventDispatcher> {
        &self.dispatcher
    }

    /// Shared orchard handle.
    pub const fn orchard(&self) -> &Arc<Mutex<Orchard>> {
        &self.orchard
    }

    /// Shared score handle.
    pub const fn score(&self) -> &Arc<Mutex<ScoreKeeper>> {
        &self.score
    }

    /// Publish an arbitrary event on the session dispatcher.
    pub fn publish<E: Event>(&self, event: &E) -> PublishReport {
        self.dispatcher.publish(event)
    }

    /// Announce that the start countdown has begun.
    pub fn pre_start(&self) -> PublishReport {
        self.publish(&PreGameStart)
    }

    /// Announce that the game has started.
    pub fn start_game(&self) -> PublishReport {
        tracing::info!("game started");
        self.publish(&GameStart)
    }

    /// Announce that the end countdown has begun.
    pub fn pre_end(&self) -> PublishReport {
        self.publish(&PreGameEnd)
    }

    /// Announce that the game has ended.
    pub fn end_game(&self) -> PublishReport {
        tracing::info!("game ended");
        self.publish(&GameEnd)
    }

    /// Announce a completed teleport.
    pub fn teleport(&self, position: [f32; 3], rotation: f32) -> PublishReport {
        self.publish(&PlayerTeleport { position, rotation })
    }

    /// Advance the orchard spawn timer.
    ///
    /// # Errors
    ///
    /// As [`Orchard::tick`].
    pub fn tick(&self, elapsed: Duration) -> Result<Vec<AppleId>, PoolError> {
        self.orchard.lock().tick(elapsed)
    }

    /// Grab an apple and credit its points to the score.
    ///
    /// # Errors
    ///
    /// As [`Orchard::grab`].
    pub fn grab(&self, id: AppleId) -> Result<u32, PoolError> {
        let points = self.orchard.lock().grab(id)?;
        self.score.lock().add_points(points);
        Ok(points)
    }

    /// Unregister everything and destroy all pooled apples.
    ///
    /// # Errors
    ///
    /// Propagates pool errors raised while returning live apples.
    pub fn teardown(self) -> Result<(), PoolError> {
        self.dispatcher.clear();
        self.orchard.lock().shutdown()?;
        tracing::info!("session torn down");
        Ok(())
    }
}
