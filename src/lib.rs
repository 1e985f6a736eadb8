//! Sky Duel - two biplanes, one sky, a lot of balloons
//!
//! Core modules:
//! - `sim`: Deterministic simulation (flight model, balloons, collisions, match flow)
//! - `config`: Every gameplay tunable, loadable from JSON
//! - `math`: Smoothing, wrapping and angle helpers

pub mod config;
pub mod math;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use math::{deg_to_rad, lerp, lerp_exp, normalize_angle, wrap};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest delta a single tick may consume
    pub const MAX_TICK_DT: f32 = 1.0 / 30.0;

    /// World dimensions (y grows downward, 0 is the ceiling)
    pub const DESIGN_WIDTH: f32 = 1920.0;
    pub const DESIGN_HEIGHT: f32 = 1080.0;
    pub const GROUND_Y: f32 = 960.0;
    pub const GROUND_HEIGHT: f32 = 120.0;

    /// Balloons needed to win
    pub const SCORE_TO_WIN: u32 = 20;
}
