//! Runtime adapters driving tick-based collaborators.

pub mod ticker;

pub use ticker::{Tick, TokioTicker};
