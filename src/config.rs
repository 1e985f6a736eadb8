//! Game tunables
//!
//! Every constant the simulation consumes lives in [`GameConfig`]. It is
//! built once (defaults or a JSON file), validated, and then handed to
//! [`crate::sim::MatchState::new`]. Partial JSON files are fine: every
//! section and field falls back to its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be a positive number, got {value}")))
    }
}

fn require_ratio(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must be within [0, 1], got {value}")))
    }
}

fn require_range(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(invalid(field, format!("range is inverted or non-finite: [{min}, {max}]")))
    }
}

/// World geometry and tick bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    /// Ground line (y grows downward)
    pub ground_y: f32,
    /// Depth of the ground strip below the ground line
    pub ground_height: f32,
    /// Upper bound on a single tick's delta (seconds)
    pub max_tick_dt: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: consts::DESIGN_WIDTH,
            height: consts::DESIGN_HEIGHT,
            ground_y: consts::GROUND_Y,
            ground_height: consts::GROUND_HEIGHT,
            max_tick_dt: consts::MAX_TICK_DT,
        }
    }
}

/// Flight model tunables (angles in degrees, speeds in units/s)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneConfig {
    pub display_width: f32,
    pub display_height: f32,
    /// Distance from the ground line up to the plane center when wheels touch
    pub ground_clearance: f32,
    pub max_speed: f32,
    pub ground_accel: f32,
    pub turn_rate: f32,
    pub turn_smoothing: f32,
    pub takeoff_angle: f32,
    /// Seconds after takeoff during which ground contact is ignored
    pub takeoff_grace: f32,
    pub boost_angle_min: f32,
    pub boost_angle_max: f32,
    pub boost_max_ratio: f32,
    pub boost_speed_smoothing: f32,
    pub climb_angle_min: f32,
    pub climb_angle_max: f32,
    pub climb_min_ratio: f32,
    pub climb_speed_smoothing: f32,
    pub loop_angle_min: f32,
    pub loop_angle_max: f32,
    pub loop_decel: f32,
    /// Fraction of max speed at or below which a flying plane stalls
    pub stall_speed_ratio: f32,
    /// Stall fall acceleration as a fraction of ground acceleration
    pub stall_accel_ratio: f32,
    pub stall_x_damping: f32,
    pub low_speed_ratio: f32,
    /// Minimum downward velocity below the low-speed threshold
    pub low_speed_fall: f32,
    pub nose_offset_ratio: f32,
    pub hitbox_scale_x: f32,
    pub hitbox_scale_y: f32,
    pub hitbox_offset_x: f32,
    pub hitbox_offset_y: f32,
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            display_width: 132.0,
            display_height: 60.0,
            ground_clearance: 14.0,
            max_speed: 400.0,
            ground_accel: 250.0,
            turn_rate: 120.0,
            turn_smoothing: 8.0,
            takeoff_angle: 12.0,
            takeoff_grace: 0.6,
            boost_angle_min: -80.0,
            boost_angle_max: -20.0,
            boost_max_ratio: 1.0,
            boost_speed_smoothing: 1.2,
            climb_angle_min: 20.0,
            climb_angle_max: 80.0,
            climb_min_ratio: 0.45,
            climb_speed_smoothing: 0.6,
            loop_angle_min: 70.0,
            loop_angle_max: 110.0,
            loop_decel: 60.0,
            stall_speed_ratio: 0.3,
            stall_accel_ratio: 1.2,
            stall_x_damping: 2.0,
            low_speed_ratio: 0.5,
            low_speed_fall: 60.0,
            nose_offset_ratio: 0.5,
            hitbox_scale_x: 0.8,
            hitbox_scale_y: 0.6,
            hitbox_offset_x: 0.0,
            hitbox_offset_y: 0.0,
        }
    }
}

impl PlaneConfig {
    /// Speed at or below which a flying plane stalls
    pub fn stall_speed(&self) -> f32 {
        self.max_speed * self.stall_speed_ratio
    }

    pub fn boost_ceiling(&self) -> f32 {
        self.max_speed * self.boost_max_ratio
    }

    pub fn climb_floor(&self) -> f32 {
        self.max_speed * self.climb_min_ratio
    }

    pub fn in_boost_band(&self, angle: f32) -> bool {
        angle >= self.boost_angle_min && angle <= self.boost_angle_max
    }

    pub fn in_climb_band(&self, angle: f32) -> bool {
        angle >= self.climb_angle_min && angle <= self.climb_angle_max
    }

    pub fn in_loop_band(&self, angle: f32) -> bool {
        let a = angle.abs();
        a >= self.loop_angle_min && a <= self.loop_angle_max
    }
}

/// Normal balloon geometry and motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalloonConfig {
    pub display_width: f32,
    pub display_height: f32,
    /// Bulb center, as a fraction of display height from the sprite top
    pub bulb_center_y: f32,
    /// Bulb radius, as a fraction of the smaller display dimension
    pub bulb_radius_ratio: f32,
    pub hitbox_scale: f32,
    pub hitbox_offset_x: f32,
    pub hitbox_offset_y: f32,
    pub cull_margin_x: f32,
    pub cull_margin_y: f32,
    pub speed_x_min: f32,
    pub speed_x_max: f32,
    pub speed_y_min: f32,
    pub speed_y_max: f32,
}

impl Default for BalloonConfig {
    fn default() -> Self {
        Self {
            display_width: 48.0,
            display_height: 72.0,
            bulb_center_y: 0.3,
            bulb_radius_ratio: 0.35,
            hitbox_scale: 0.7,
            hitbox_offset_x: 0.0,
            hitbox_offset_y: -0.15,
            cull_margin_x: 60.0,
            cull_margin_y: 80.0,
            speed_x_min: 10.0,
            speed_x_max: 50.0,
            speed_y_min: 40.0,
            speed_y_max: 90.0,
        }
    }
}

/// Big balloon proportions relative to a normal balloon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BigBalloonConfig {
    pub size_multiplier: f32,
    pub speed_multiplier: f32,
    pub hitbox_scale: f32,
    pub hitbox_offset_x: f32,
    pub hitbox_offset_y: f32,
}

impl Default for BigBalloonConfig {
    fn default() -> Self {
        Self {
            size_multiplier: 2.5,
            speed_multiplier: 0.6,
            hitbox_scale: 0.75,
            hitbox_offset_x: 0.0,
            hitbox_offset_y: -0.12,
        }
    }
}

/// Spawn points, spawn timers and the house
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub plane_p1_x_ratio: f32,
    pub plane_p2_x_ratio: f32,
    pub spawn_min_ms: u32,
    pub spawn_max_ms: u32,
    /// Balloons start this fraction of the ground strip below the ground line
    pub balloon_ground_ratio: f32,
    pub house_x_ratio: f32,
    pub house_width: f32,
    pub house_height: f32,
    /// How far below the ground line the house's bottom edge sits
    pub house_bottom_offset: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            plane_p1_x_ratio: 0.1,
            plane_p2_x_ratio: 0.9,
            spawn_min_ms: 800,
            spawn_max_ms: 2000,
            balloon_ground_ratio: 0.3,
            house_x_ratio: 0.5,
            house_width: 120.0,
            house_height: 110.0,
            house_bottom_offset: 40.0,
        }
    }
}

/// Crash debris sub-simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebrisConfig {
    pub pieces: u32,
    pub gravity_min: f32,
    pub gravity_max: f32,
    /// Spin rate range in degrees per second
    pub spin_min: f32,
    pub spin_max: f32,
}

impl Default for DebrisConfig {
    fn default() -> Self {
        Self {
            pieces: 5,
            gravity_min: 180.0,
            gravity_max: 480.0,
            spin_min: -540.0,
            spin_max: 540.0,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub plane: PlaneConfig,
    pub balloon: BalloonConfig,
    pub big_balloon: BigBalloonConfig,
    pub spawn: SpawnConfig,
    pub debris: DebrisConfig,
    pub score_to_win: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            plane: PlaneConfig::default(),
            balloon: BalloonConfig::default(),
            big_balloon: BigBalloonConfig::default(),
            spawn: SpawnConfig::default(),
            debris: DebrisConfig::default(),
            score_to_win: consts::SCORE_TO_WIN,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded game config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        require_positive("world.width", w.width)?;
        require_positive("world.height", w.height)?;
        require_positive("world.ground_y", w.ground_y)?;
        require_positive("world.ground_height", w.ground_height)?;
        require_positive("world.max_tick_dt", w.max_tick_dt)?;
        if w.ground_y > w.height {
            return Err(invalid("world.ground_y", "must not lie below the world height"));
        }

        let p = &self.plane;
        require_positive("plane.display_width", p.display_width)?;
        require_positive("plane.display_height", p.display_height)?;
        require_positive("plane.max_speed", p.max_speed)?;
        require_positive("plane.ground_accel", p.ground_accel)?;
        require_positive("plane.turn_rate", p.turn_rate)?;
        require_positive("plane.turn_smoothing", p.turn_smoothing)?;
        require_positive("plane.boost_speed_smoothing", p.boost_speed_smoothing)?;
        require_positive("plane.climb_speed_smoothing", p.climb_speed_smoothing)?;
        require_positive("plane.stall_accel_ratio", p.stall_accel_ratio)?;
        require_positive("plane.stall_x_damping", p.stall_x_damping)?;
        // Zero grace crashes every plane on its takeoff tick
        require_positive("plane.takeoff_grace", p.takeoff_grace)?;
        if !(p.ground_clearance.is_finite() && p.ground_clearance >= 0.0) {
            return Err(invalid("plane.ground_clearance", "must not be negative"));
        }
        if !(p.loop_decel.is_finite() && p.loop_decel >= 0.0) {
            return Err(invalid("plane.loop_decel", "must not be negative"));
        }
        if !(p.low_speed_fall.is_finite() && p.low_speed_fall >= 0.0) {
            return Err(invalid("plane.low_speed_fall", "must not be negative"));
        }
        require_range("plane.boost_angle", p.boost_angle_min, p.boost_angle_max)?;
        require_range("plane.climb_angle", p.climb_angle_min, p.climb_angle_max)?;
        require_range("plane.loop_angle", p.loop_angle_min, p.loop_angle_max)?;
        require_ratio("plane.boost_max_ratio", p.boost_max_ratio)?;
        require_ratio("plane.climb_min_ratio", p.climb_min_ratio)?;
        require_ratio("plane.stall_speed_ratio", p.stall_speed_ratio)?;
        require_ratio("plane.low_speed_ratio", p.low_speed_ratio)?;
        require_ratio("plane.nose_offset_ratio", p.nose_offset_ratio)?;
        require_ratio("plane.hitbox_scale_x", p.hitbox_scale_x)?;
        require_ratio("plane.hitbox_scale_y", p.hitbox_scale_y)?;
        if p.boost_max_ratio <= p.stall_speed_ratio {
            return Err(invalid(
                "plane.boost_max_ratio",
                "must exceed stall_speed_ratio or a stalled plane can never recover",
            ));
        }

        let b = &self.balloon;
        require_positive("balloon.display_width", b.display_width)?;
        require_positive("balloon.display_height", b.display_height)?;
        require_ratio("balloon.bulb_center_y", b.bulb_center_y)?;
        require_ratio("balloon.bulb_radius_ratio", b.bulb_radius_ratio)?;
        require_ratio("balloon.hitbox_scale", b.hitbox_scale)?;
        require_positive("balloon.cull_margin_x", b.cull_margin_x)?;
        require_positive("balloon.cull_margin_y", b.cull_margin_y)?;
        require_range("balloon.speed_x", b.speed_x_min, b.speed_x_max)?;
        require_range("balloon.speed_y", b.speed_y_min, b.speed_y_max)?;

        let big = &self.big_balloon;
        require_positive("big_balloon.size_multiplier", big.size_multiplier)?;
        require_positive("big_balloon.speed_multiplier", big.speed_multiplier)?;
        require_ratio("big_balloon.hitbox_scale", big.hitbox_scale)?;

        let s = &self.spawn;
        require_ratio("spawn.plane_p1_x_ratio", s.plane_p1_x_ratio)?;
        require_ratio("spawn.plane_p2_x_ratio", s.plane_p2_x_ratio)?;
        require_ratio("spawn.house_x_ratio", s.house_x_ratio)?;
        require_positive("spawn.house_width", s.house_width)?;
        require_positive("spawn.house_height", s.house_height)?;
        if s.spawn_min_ms == 0 || s.spawn_min_ms > s.spawn_max_ms {
            return Err(invalid(
                "spawn.spawn_min_ms",
                format!(
                    "spawn delay range must be non-empty and start above zero: [{}, {}]",
                    s.spawn_min_ms, s.spawn_max_ms
                ),
            ));
        }

        let d = &self.debris;
        if d.pieces == 0 {
            return Err(invalid("debris.pieces", "need at least one piece"));
        }
        require_positive("debris.gravity_min", d.gravity_min)?;
        require_range("debris.gravity", d.gravity_min, d.gravity_max)?;
        require_range("debris.spin", d.spin_min, d.spin_max)?;

        if self.score_to_win == 0 {
            return Err(invalid("score_to_win", "must be at least 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config =
            GameConfig::from_json_str(r#"{ "score_to_win": 5, "plane": { "max_speed": 300 } }"#)
                .unwrap();
        assert_eq!(config.score_to_win, 5);
        assert_eq!(config.plane.max_speed, 300.0);
        assert_eq!(config.plane.ground_accel, PlaneConfig::default().ground_accel);
        assert_eq!(config.balloon, BalloonConfig::default());
    }

    #[test]
    fn test_round_trips_through_json() {
        let json = GameConfig::default().to_json_pretty().unwrap();
        assert_eq!(GameConfig::from_json_str(&json).unwrap(), GameConfig::default());
    }

    #[test]
    fn test_rejects_inverted_spawn_range() {
        let err = GameConfig::from_json_str(
            r#"{ "spawn": { "spawn_min_ms": 3000, "spawn_max_ms": 1000 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "spawn.spawn_min_ms", .. }));
    }

    #[test]
    fn test_rejects_zero_win_threshold() {
        let err = GameConfig::from_json_str(r#"{ "score_to_win": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "score_to_win", .. }));
    }

    #[test]
    fn test_rejects_unrecoverable_stall() {
        let mut config = GameConfig::default();
        config.plane.boost_max_ratio = 0.2;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("plane.boost_max_ratio"));
    }

    #[test]
    fn test_rejects_zero_takeoff_grace() {
        let err = GameConfig::from_json_str(r#"{ "plane": { "takeoff_grace": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "plane.takeoff_grace", .. }));

        let err =
            GameConfig::from_json_str(r#"{ "plane": { "takeoff_grace": -0.5 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "plane.takeoff_grace", .. }));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let err = GameConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_band_helpers() {
        let p = PlaneConfig::default();
        assert!(p.in_boost_band(-45.0));
        assert!(!p.in_boost_band(45.0));
        assert!(p.in_climb_band(45.0));
        assert!(p.in_loop_band(-90.0));
        assert!(p.in_loop_band(90.0));
        assert!(!p.in_loop_band(45.0));
        assert!((p.stall_speed() - 120.0).abs() < 1e-3);
    }
}
