//! Apple-picking game layer built on the pool and dispatcher.
//!
//! Countdown timing and the menu/game state machine live with the host; this
//! layer only reacts to the game events it is sent.

pub mod apple;
pub mod events;
pub mod orchard;
pub mod score;
pub mod session;

pub use apple::{Apple, AppleFactory, AppleId, AppleKind, Grabbable};
pub use events::{GameEnd, GameStart, PlayerTeleport, PreGameEnd, PreGameStart};
pub use orchard::{ApplePool, Orchard};
pub use score::ScoreKeeper;
pub use session::Session;
