//! Thumb Dodge - a one-thumb falling-block dodge game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, collisions, run state)
//! - `settings`: Player preferences
//! - `profile`: Persisted counters, gem balance and skin shop
//! - `audio`: Web Audio sound effects (wasm32 only)
//!
//! The simulation is a plain library with no event-loop or platform
//! dependencies; the host feeds it input and a time delta once per frame
//! and renders from the resulting state.

pub mod profile;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;

pub use profile::Profile;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Maximum time delta fed to a single tick (large gaps from tab
    /// backgrounding destabilize spawn timers and allow tunneling)
    pub const MAX_TICK_DT: f32 = 1.0 / 30.0;

    /// Playfield defaults (field units; the host maps these to pixels)
    pub const FIELD_WIDTH: f32 = 360.0;
    pub const FIELD_HEIGHT: f32 = 640.0;
    /// Side margin obstacles must stay inside
    pub const FIELD_SIDE_MARGIN: f32 = 8.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 18.0;
    /// Player rest height above the bottom edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 150.0;

    /// Survival scoring rate (points per second)
    pub const SCORE_PER_SECOND: f32 = 100.0;

    /// Difficulty gained per second
    pub const DIFFICULTY_RAMP: f32 = 0.02;
    /// Fall speed curve: `BASE_FALL_SPEED + difficulty * FALL_SPEED_RAMP`
    pub const BASE_FALL_SPEED: f32 = 140.0;
    pub const FALL_SPEED_RAMP: f32 = 180.0;

    /// Obstacle spawn interval: `max(MIN, MAX - difficulty * RAMP)` seconds
    pub const OBSTACLE_SPAWN_MAX: f32 = 0.8;
    pub const OBSTACLE_SPAWN_MIN: f32 = 0.22;
    pub const OBSTACLE_SPAWN_RAMP: f32 = 0.35;
    /// Pickup spawn interval, uniform in [MIN, MAX), difficulty-independent
    pub const PICKUP_SPAWN_MIN: f32 = 3.0;
    pub const PICKUP_SPAWN_MAX: f32 = 5.0;

    /// Obstacle size ranges (uniform, max exclusive)
    pub const OBSTACLE_MIN_WIDTH: f32 = 24.0;
    pub const OBSTACLE_MAX_WIDTH: f32 = 94.0;
    pub const OBSTACLE_MIN_HEIGHT: f32 = 16.0;
    pub const OBSTACLE_MAX_HEIGHT: f32 = 56.0;
    /// Obstacles enter just above the visible field
    pub const OBSTACLE_SPAWN_Y: f32 = -40.0;
    /// Per-obstacle fall speed factor range
    pub const OBSTACLE_SPEED_MIN: f32 = 0.9;
    pub const OBSTACLE_SPEED_MAX: f32 = 1.2;
    /// Removed once the top edge is this far below the field
    pub const OBSTACLE_CULL_MARGIN: f32 = 60.0;

    /// Pickup defaults
    pub const PICKUP_RADIUS: f32 = 10.0;
    pub const PICKUP_SPAWN_Y: f32 = -20.0;
    /// Gem-reward pickups drift slower than obstacles
    pub const GEM_SPEED_MIN: f32 = 0.6;
    pub const GEM_SPEED_MAX: f32 = 0.9;
    /// Score-reward pickups fall nearly at obstacle speed
    pub const SCORE_PICKUP_SPEED_MIN: f32 = 0.85;
    pub const SCORE_PICKUP_SPEED_MAX: f32 = 1.1;
    pub const PICKUP_CULL_MARGIN: f32 = 40.0;

    /// Tilt control: EMA weight for the newest sensor reading
    pub const TILT_SMOOTHING: f32 = 0.1;
    /// Default horizontal units per smoothed degree per tick
    pub const TILT_SENSITIVITY: f32 = 0.6;
}

/// Clamp a horizontal position so a circle of `radius` stays in the field
#[inline]
pub fn clamp_to_field(x: f32, radius: f32, field_width: f32) -> f32 {
    x.clamp(radius, field_width - radius)
}
