//! Crash debris
//!
//! A crashed plane breaks into vertical slices that fall ballistically until
//! they reach the ground. The match controller polls [`Debris::all_landed`]
//! and resets the plane once it flips.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::DebrisConfig;

/// One falling slice of a wrecked plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebrisPiece {
    pub position: Vec2,
    pub size: Vec2,
    /// Sprite angle in degrees
    pub angle: f32,
    start: Vec2,
    drift_x: f32,
    initial_vy: f32,
    gravity: f32,
    spin: f32,
    elapsed: f32,
    pub landed: bool,
}

impl DebrisPiece {
    fn landing_y(&self, ground_y: f32) -> f32 {
        ground_y - self.size.y * 0.5
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debris {
    pieces: Vec<DebrisPiece>,
    ground_y: f32,
}

impl Debris {
    /// Slice a plane of `display_size` centered at `center` and throw the pieces
    /// with the plane's last velocity
    pub fn spawn<R: Rng>(
        center: Vec2,
        display_size: Vec2,
        last_velocity: Vec2,
        ground_y: f32,
        config: &DebrisConfig,
        rng: &mut R,
    ) -> Self {
        let count = config.pieces.max(1);
        let slice = Vec2::new(display_size.x / count as f32, display_size.y);
        let top_left = center - display_size * 0.5;

        let pieces = (0..count)
            .map(|i| {
                let start = Vec2::new(
                    top_left.x + (i as f32 + 0.5) * slice.x,
                    top_left.y + slice.y * 0.5,
                );
                DebrisPiece {
                    position: start,
                    size: slice,
                    angle: 0.0,
                    start,
                    drift_x: last_velocity.x,
                    initial_vy: last_velocity.y,
                    gravity: rng.random_range(config.gravity_min..=config.gravity_max),
                    spin: rng.random_range(config.spin_min..=config.spin_max),
                    elapsed: 0.0,
                    landed: false,
                }
            })
            .collect();

        Self { pieces, ground_y }
    }

    pub fn pieces(&self) -> &[DebrisPiece] {
        &self.pieces
    }

    /// Advance every airborne piece; x wraps around the world
    pub fn advance(&mut self, dt: f32, world_width: f32) {
        let ground_y = self.ground_y;
        for piece in self.pieces.iter_mut().filter(|p| !p.landed) {
            piece.elapsed += dt;
            let t = piece.elapsed;
            let x = piece.start.x + piece.drift_x * t;
            let y = piece.start.y + piece.initial_vy * t + 0.5 * piece.gravity * t * t;

            piece.position.x = x.rem_euclid(world_width);
            piece.position.y = y;
            piece.angle = piece.spin * t;

            let landing_y = piece.landing_y(ground_y);
            if piece.position.y >= landing_y {
                piece.position.y = landing_y;
                piece.landed = true;
            }
        }
    }

    pub fn all_landed(&self) -> bool {
        self.pieces.iter().all(|p| p.landed)
    }
}
