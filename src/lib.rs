//! # Orchard Pool
//!
//! Object pooling and typed event dispatch for a tick-driven apple-picking
//! minigame.
//!
//! The crate is split into an engine-independent core and a small game layer
//! that uses it:
//!
//! - **`ObjectPool`**: recycles identical instances. Pre-warms to capacity,
//!   serves acquisitions FIFO from the queue, creates on demand when empty,
//!   and destroys releases that would overflow capacity.
//! - **`EventDispatcher`**: publish/subscribe keyed by event type. Listeners
//!   run synchronously in registration order; failures are isolated per
//!   listener.
//! - **`Orchard`**: spawns red and golden apples from two pools while a game
//!   runs, driven by `GameStart`/`GameEnd` events and elapsed-time ticks.
//! - **`Session`**: root context that owns the dispatcher, orchard and score.
//!
//! ```rust
//! use std::time::Duration;
//! use orchard_pool::config::OrchardConfig;
//! use orchard_pool::game::Session;
//!
//! let session = Session::init(&OrchardConfig::default(), 42).unwrap();
//! session.start_game();
//! for id in session.tick(Duration::ZERO).unwrap() {
//!     session.grab(id).unwrap();
//! }
//! session.end_game();
//! session.teardown().unwrap();
//! ```
//!
//! With the default `tokio-runtime` feature, `runtime::TokioTicker` drives
//! any `Tick` implementor (such as the orchard) at a fixed period.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Object pool, event dispatcher and error types.
pub mod core;
/// Configuration models for pools and spawning.
pub mod config;
/// Builders to construct pools from configuration.
pub mod builders;
/// Apples, spawner, score and session.
pub mod game;
/// Runtime adapters for driving ticks.
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
/// Shared utilities.
pub mod util;
