//! Flight model: one biplane's kinematic state machine
//!
//! Modes move Grounded -> Flying -> Stalled -> Crashed. The only ways back are
//! Stalled -> Flying (dive recovery) and Crashed -> Grounded (reset after the
//! debris has landed).
//!
//! Headings are in degrees. The plane stores a heading relative to its own
//! facing; [`Plane::world_angle`] turns that into a world-space angle so one
//! set of formulas serves both a right-facing and a left-facing plane.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Rect, rotated_bounds};
use crate::config::PlaneConfig;
use crate::math::{deg_to_rad, lerp_exp, normalize_angle, wrap};

/// Flight mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaneMode {
    /// On the runway, building speed (initial mode)
    Grounded,
    Flying,
    /// No lift: falling while the pilot tries to dive out
    Stalled,
    /// Hidden until the debris lands and the plane is reset
    Crashed,
}

impl PlaneMode {
    /// Flying or stalled (can pop balloons, can hit the ground)
    pub fn is_airborne(self) -> bool {
        matches!(self, PlaneMode::Flying | PlaneMode::Stalled)
    }
}

/// Directional input snapshot for one plane. Left/right are accepted but unused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaneInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl PlaneInput {
    pub fn throttle() -> Self {
        Self {
            up: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StallCause {
    /// Speed bled off below the stall threshold
    LowSpeed,
    /// Climbed into the top of the world
    Ceiling,
}

/// Mode transitions recorded during a tick, drained by the match controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlaneEvent {
    TookOff,
    Stalled(StallCause),
    Recovered,
    Crashed { at: Vec2 },
    Reset,
}

/// Where and which way a plane starts every life
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneSpawn {
    pub x: f32,
    /// +1 faces right, -1 faces left
    pub facing: f32,
    /// Angle (degrees) the sprite's nose points at when unrotated
    pub sprite_forward_angle: f32,
}

/// What the renderer needs each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneView {
    pub position: Vec2,
    /// Sprite rotation in radians
    pub rotation: f32,
    pub visible: bool,
    pub display_size: Vec2,
    pub mode: PlaneMode,
    pub nose_tip: Vec2,
}

/// One plane's full kinematic state
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    config: PlaneConfig,
    spawn: PlaneSpawn,
    pub(crate) mode: PlaneMode,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    /// Velocity as of the last tick the plane was moving under its own power
    pub(crate) last_velocity: Vec2,
    pub(crate) heading: f32,
    pub(crate) target_heading: f32,
    pub(crate) speed: f32,
    pub(crate) facing: f32,
    pub(crate) stall_drift_x: f32,
    pub(crate) stall_fall_y: f32,
    pub(crate) takeoff_grace: f32,
    pub(crate) boost_locked: bool,
    pub(crate) rotation: f32,
    pub(crate) visible: bool,
    events: Vec<PlaneEvent>,
}

impl Plane {
    pub fn new(spawn: PlaneSpawn, config: PlaneConfig, ground_y: f32) -> Self {
        let mut plane = Self {
            config,
            spawn,
            mode: PlaneMode::Grounded,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            last_velocity: Vec2::ZERO,
            heading: 0.0,
            target_heading: 0.0,
            speed: 0.0,
            facing: spawn.facing,
            stall_drift_x: 0.0,
            stall_fall_y: 0.0,
            takeoff_grace: 0.0,
            boost_locked: false,
            rotation: 0.0,
            visible: true,
            events: Vec::new(),
        };
        plane.reset_to_start(ground_y);
        plane.events.clear();
        plane
    }

    pub fn mode(&self) -> PlaneMode {
        self.mode
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn last_velocity(&self) -> Vec2 {
        self.last_velocity
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn target_heading(&self) -> f32 {
        self.target_heading
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn takeoff_grace(&self) -> f32 {
        self.takeoff_grace
    }

    pub fn is_boost_locked(&self) -> bool {
        self.boost_locked
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn spawn(&self) -> PlaneSpawn {
        self.spawn
    }

    pub fn config(&self) -> &PlaneConfig {
        &self.config
    }

    pub fn display_size(&self) -> Vec2 {
        Vec2::new(self.config.display_width, self.config.display_height)
    }

    /// The y a plane sits at on the runway, and strikes the ground at when airborne
    pub fn ground_contact_y(&self, ground_y: f32) -> f32 {
        ground_y - self.config.ground_clearance
    }

    /// World-space angle of the nose in degrees (0 = right, 90 = up)
    pub fn world_angle(&self) -> f32 {
        if self.facing >= 0.0 {
            self.heading
        } else {
            180.0 - self.heading
        }
    }

    /// Sprite rotation in radians that points the sprite's nose along [`Self::world_angle`]
    fn sprite_rotation(&self) -> f32 {
        deg_to_rad(-(normalize_angle(self.world_angle()) - self.spawn.sprite_forward_angle))
    }

    /// World-space position of the nose tip
    pub fn nose_tip_position(&self) -> Vec2 {
        let angle = deg_to_rad(self.world_angle());
        let offset = self.config.display_width * self.config.nose_offset_ratio;
        Vec2::new(
            self.position.x + angle.cos() * offset,
            self.position.y - angle.sin() * offset,
        )
    }

    /// Sprite bounds as a rendering engine would report them (rotated, then axis-aligned)
    pub fn bounds(&self) -> Rect {
        rotated_bounds(self.position, self.display_size(), self.rotation)
    }

    /// Unrotated body rectangle used against static obstacles
    pub fn hitbox(&self) -> Rect {
        let display = self.display_size();
        let size = Vec2::new(
            display.x * self.config.hitbox_scale_x,
            display.y * self.config.hitbox_scale_y,
        );
        let shift = Vec2::new(
            display.x * self.config.hitbox_offset_x,
            display.y * self.config.hitbox_offset_y,
        );
        Rect::from_center_size(self.position + shift, size)
    }

    pub fn view(&self) -> PlaneView {
        PlaneView {
            position: self.position,
            rotation: self.rotation,
            visible: self.visible,
            display_size: self.display_size(),
            mode: self.mode,
            nose_tip: self.nose_tip_position(),
        }
    }

    /// Hand over the transitions recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<PlaneEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the plane by one tick
    pub fn advance(&mut self, dt: f32, input: &PlaneInput, world_width: f32, ground_y: f32) {
        if self.mode == PlaneMode::Crashed {
            return;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let contact_y = self.ground_contact_y(ground_y);
        let started_grounded = self.mode == PlaneMode::Grounded;

        match self.mode {
            PlaneMode::Grounded => self.advance_grounded(dt, input, contact_y),
            PlaneMode::Flying => self.advance_flying(dt, input),
            PlaneMode::Stalled => self.advance_stalled(dt, input),
            PlaneMode::Crashed => {}
        }

        self.position += self.velocity * dt;
        if self.mode == PlaneMode::Grounded {
            self.position.y = contact_y;
        }

        // Grace counts down from the tick after takeoff
        if !started_grounded && self.takeoff_grace > 0.0 {
            self.takeoff_grace = (self.takeoff_grace - dt).max(0.0);
        }

        self.rotation = self.sprite_rotation();
        self.position.x = wrap(self.position.x, 0.0, world_width);

        if self.mode.is_airborne() && self.takeoff_grace <= 0.0 && self.position.y >= contact_y {
            log::debug!("Ground strike at ({:.1}, {:.1})", self.position.x, self.position.y);
            self.request_crash();
        }
    }

    fn advance_grounded(&mut self, dt: f32, input: &PlaneInput, contact_y: f32) {
        let max_speed = self.config.max_speed;
        self.position.y = contact_y;

        if input.up {
            self.speed = (self.speed + self.config.ground_accel * dt).min(max_speed);
        } else {
            self.speed = (self.speed - self.config.ground_accel * dt).max(0.0);
        }

        if self.speed >= max_speed {
            self.mode = PlaneMode::Flying;
            self.takeoff_grace = self.config.takeoff_grace;
            self.heading = self.config.takeoff_angle;
            self.target_heading = self.config.takeoff_angle;
            self.boost_locked = false;
            self.events.push(PlaneEvent::TookOff);
        } else {
            self.target_heading = 0.0;
            self.heading = lerp_exp(self.heading, 0.0, self.config.turn_smoothing, dt);
        }

        self.velocity = Vec2::new(self.facing * self.speed, 0.0);
        self.last_velocity = self.velocity;
    }

    /// Up/down input moves the target heading; the heading eases after it
    fn steer(&mut self, dt: f32, input: &PlaneInput) {
        if input.up {
            self.target_heading += self.config.turn_rate * dt;
        }
        if input.down {
            self.target_heading -= self.config.turn_rate * dt;
        }
        self.heading = lerp_exp(
            self.heading,
            self.target_heading,
            self.config.turn_smoothing,
            dt,
        );
    }

    fn advance_flying(&mut self, dt: f32, input: &PlaneInput) {
        self.steer(dt, input);

        let heading = normalize_angle(self.heading);
        if !self.boost_locked && self.config.in_boost_band(heading) {
            // Diving is the only way to gain speed
            self.speed = lerp_exp(
                self.speed,
                self.config.boost_ceiling(),
                self.config.boost_speed_smoothing,
                dt,
            );
        } else if self.config.in_climb_band(heading) {
            self.speed = lerp_exp(
                self.speed,
                self.config.climb_floor(),
                self.config.climb_speed_smoothing,
                dt,
            );
        }

        if self.speed <= self.config.stall_speed() {
            self.enter_stall(StallCause::LowSpeed);
            return;
        }

        if self.config.in_loop_band(heading) {
            self.speed = (self.speed - self.config.loop_decel * dt).max(0.0);
        }

        if self.position.y <= 0.0 {
            self.enter_stall(StallCause::Ceiling);
            return;
        }

        let angle = deg_to_rad(self.world_angle());
        let mut velocity = Vec2::new(angle.cos() * self.speed, -angle.sin() * self.speed);
        if self.speed < self.config.max_speed * self.config.low_speed_ratio {
            velocity.y = velocity.y.max(self.config.low_speed_fall);
        }
        self.velocity = velocity;
        self.last_velocity = velocity;
    }

    fn enter_stall(&mut self, cause: StallCause) {
        if self.mode == PlaneMode::Crashed {
            return;
        }
        log::debug!("Stall ({cause:?}) at heading {:.1}", self.heading);
        self.mode = PlaneMode::Stalled;
        self.speed = 0.0;
        self.stall_drift_x = self.velocity.x;
        self.stall_fall_y = 0.0;
        self.target_heading = self.heading;
        self.velocity = Vec2::ZERO;
        self.boost_locked = true;
        self.events.push(PlaneEvent::Stalled(cause));
    }

    fn advance_stalled(&mut self, dt: f32, input: &PlaneInput) {
        self.steer(dt, input);

        let stall_accel = self.config.ground_accel * self.config.stall_accel_ratio;
        self.stall_fall_y = (self.stall_fall_y + stall_accel * dt).min(self.config.max_speed);

        let world_angle = normalize_angle(self.world_angle());
        if self.config.in_boost_band(world_angle) {
            // Nose down: trade the fall for forward speed
            self.speed = lerp_exp(
                self.speed,
                self.config.boost_ceiling(),
                self.config.boost_speed_smoothing,
                dt,
            );
            if self.speed >= self.config.stall_speed() {
                self.mode = PlaneMode::Flying;
                self.boost_locked = false;
                self.last_velocity = self.velocity;
                self.events.push(PlaneEvent::Recovered);
                return;
            }
        }

        self.stall_drift_x = lerp_exp(self.stall_drift_x, 0.0, self.config.stall_x_damping, dt);
        self.velocity = Vec2::new(self.stall_drift_x, self.stall_fall_y);
        self.last_velocity = self.velocity;
    }

    /// Force a crash. Returns false if the plane was already down.
    pub fn request_crash(&mut self) -> bool {
        if self.mode == PlaneMode::Crashed {
            return false;
        }
        self.mode = PlaneMode::Crashed;
        self.speed = 0.0;
        self.velocity = Vec2::ZERO;
        self.visible = false;
        self.events.push(PlaneEvent::Crashed { at: self.position });
        true
    }

    /// Zero the velocity in place (match over)
    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    /// Back on the runway at the spawn point, all motion cleared
    pub fn reset_to_start(&mut self, ground_y: f32) {
        self.mode = PlaneMode::Grounded;
        self.speed = 0.0;
        self.heading = 0.0;
        self.target_heading = 0.0;
        self.facing = self.spawn.facing;
        self.position = Vec2::new(self.spawn.x, self.ground_contact_y(ground_y));
        self.velocity = Vec2::ZERO;
        self.last_velocity = Vec2::ZERO;
        self.stall_drift_x = 0.0;
        self.stall_fall_y = 0.0;
        self.takeoff_grace = 0.0;
        self.boost_locked = false;
        self.rotation = self.sprite_rotation();
        self.visible = true;
        self.events.push(PlaneEvent::Reset);
    }
}
