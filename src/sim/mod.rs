//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies
//!
//! The host calls [`tick`] once per frame with a pre-clamped time delta and
//! renders from the returned state; discrete outcomes (pickups collected,
//! the terminal collision) come back as [`RunEvent`]s.

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{circle_circle_overlap, circle_rect_overlap};
pub use spawn::{spawn_obstacle, spawn_pickup};
pub use state::{
    Config, ControlMode, Obstacle, Pickup, PickupReward, Player, RunEvent, RunPhase, RunState,
};
pub use tick::{TickInput, tick};
