//! Events published over the session dispatcher.

/// Player pressed a button in the menu; the start countdown begins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreGameStart;

/// Countdown finished; apples start falling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameStart;

/// Game time is up; the end countdown begins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreGameEnd;

/// Game over; spawning stops and the score is final.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameEnd;

/// The player teleported to a new location.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerTeleport {
    /// Destination in world space.
    pub position: [f32; 3],
    /// Yaw applied on arrival, in degrees.
    pub rotation: f32,
}
