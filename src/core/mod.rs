//! Core pooling and event-dispatch abstractions.

pub mod error;
pub mod events;
pub mod pool;

pub use error::{AppResult, ConfigError, DispatchError, PoolError};
pub use events::{
    Event, EventDispatcher, FnListener, Listener, ListenerFailure, PublishReport, SharedListener,
};
pub use pool::{ObjectPool, PoolStats, Poolable, Pooled, ReleaseOutcome, ResourceFactory};
