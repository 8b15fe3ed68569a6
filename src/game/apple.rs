//! Pooled apples and the grab interaction.

use serde::{Deserialize, Serialize};

use crate::config::SpawnPoint;
use crate::core::{AppResult, Poolable, ResourceFactory};

/// Something a motion controller can pick up.
pub trait Grabbable {
    /// React to being grabbed and return the points awarded.
    fn on_grab(&mut self) -> u32;
}

/// Apple variety. Each kind has its own pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppleKind {
    /// Common apple.
    Red,
    /// Rare, high-value apple.
    Golden,
}

/// Handle of a live apple: its kind plus its instance id within that pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppleId {
    /// Pool the apple belongs to.
    pub kind: AppleKind,
    /// Instance id within the pool.
    pub instance: u64,
}

/// A pooled apple.
#[derive(Debug, Clone, PartialEq)]
pub struct Apple {
    kind: AppleKind,
    points: u32,
    active: bool,
    spawn_point: Option<SpawnPoint>,
    grabs: u32,
}

impl Apple {
    /// New inactive apple.
    pub const fn new(kind: AppleKind, points: u32) -> Self {
        Self {
            kind,
            points,
            active: false,
            spawn_point: None,
            grabs: 0,
        }
    }

    /// Apple variety.
    pub const fn kind(&self) -> AppleKind {
        self.kind
    }

    /// Points awarded on grab.
    pub const fn points(&self) -> u32 {
        self.points
    }

    /// Where the apple was last placed.
    pub const fn spawn_point(&self) -> Option<SpawnPoint> {
        self.spawn_point
    }

    /// Place the apple at a spawn point.
    pub fn place(&mut self, point: SpawnPoint) {
        self.spawn_point = Some(point);
    }

    /// Number of times this instance has been grabbed across reuse.
    pub const fn grabs(&self) -> u32 {
        self.grabs
    }
}

impl Poolable for Apple {
    fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.spawn_point = None;
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Grabbable for Apple {
    fn on_grab(&mut self) -> u32 {
        self.grabs += 1;
        self.points
    }
}

/// Produces apples of one kind.
#[derive(Debug, Clone, Copy)]
pub struct AppleFactory {
    kind: AppleKind,
    points: u32,
}

impl AppleFactory {
    /// Factory for apples of `kind` worth `points`.
    pub const fn new(kind: AppleKind, points: u32) -> Self {
        Self { kind, points }
    }
}

impl ResourceFactory<Apple> for AppleFactory {
    fn create(&mut self) -> AppResult<Apple> {
        Ok(Apple::new(self.kind, self.points))
    }
}
