//! Balloons: drifting targets and the big hazard balloon

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Circle, Rect};
use crate::config::{BalloonConfig, BigBalloonConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalloonKind {
    /// Pop it with the nose to score
    Normal,
    /// Crashes any plane that touches it; never pops
    Big,
}

/// Square hitbox parameters, as ratios of the display size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitboxOverride {
    /// Side length as a fraction of the smaller display dimension
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl HitboxOverride {
    /// Configured hitbox for a balloon kind
    pub fn for_kind(kind: BalloonKind, balloon: &BalloonConfig, big: &BigBalloonConfig) -> Self {
        match kind {
            BalloonKind::Normal => Self {
                scale: balloon.hitbox_scale,
                offset_x: balloon.hitbox_offset_x,
                offset_y: balloon.hitbox_offset_y,
            },
            BalloonKind::Big => Self {
                scale: big.hitbox_scale,
                offset_x: big.hitbox_offset_x,
                offset_y: big.hitbox_offset_y,
            },
        }
    }
}

/// A balloon entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balloon {
    pub id: u32,
    pub kind: BalloonKind,
    /// Sprite center
    pub position: Vec2,
    pub velocity: Vec2,
    pub display_size: Vec2,
    /// Scales every drift handed to [`Balloon::set_velocity`]
    pub speed_multiplier: f32,
    /// Per-spawn hitbox; `None` uses the kind's configured hitbox
    pub hitbox: Option<HitboxOverride>,
    pub active: bool,
}

/// Render-facing view of a balloon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalloonView {
    pub id: u32,
    pub kind: BalloonKind,
    pub position: Vec2,
    pub display_size: Vec2,
}

impl Balloon {
    /// `drift` is the unscaled velocity; the speed multiplier is applied here
    pub fn new(
        id: u32,
        kind: BalloonKind,
        position: Vec2,
        drift: Vec2,
        display_size: Vec2,
        speed_multiplier: f32,
    ) -> Self {
        let mut balloon = Self {
            id,
            kind,
            position,
            velocity: Vec2::ZERO,
            display_size,
            speed_multiplier,
            hitbox: None,
            active: true,
        };
        balloon.set_velocity(drift);
        balloon
    }

    pub fn set_velocity(&mut self, drift: Vec2) {
        self.velocity = drift * self.speed_multiplier;
    }

    fn top_left(&self) -> Vec2 {
        self.position - self.display_size * 0.5
    }

    /// Integrate, wrap horizontally past the cull margin, deactivate above the ceiling margin
    pub fn advance(&mut self, dt: f32, world_width: f32, cull_margin_x: f32, cull_margin_y: f32) {
        if !self.active {
            return;
        }

        self.position += self.velocity * dt;

        if self.position.x < -cull_margin_x {
            self.position.x = world_width + cull_margin_x;
        } else if self.position.x > world_width + cull_margin_x {
            self.position.x = -cull_margin_x;
        }

        if self.position.y < -cull_margin_y {
            self.active = false;
        }
    }

    /// The poppable part of the balloon
    pub fn bulb(&self, config: &BalloonConfig) -> Circle {
        let size = self.display_size;
        let center = Vec2::new(self.position.x, self.top_left().y + size.y * config.bulb_center_y);
        Circle::new(center, size.x.min(size.y) * config.bulb_radius_ratio)
    }

    /// Square hitbox inside the sprite, using the per-spawn override when present
    pub fn hitbox_rect(&self, fallback: HitboxOverride) -> Rect {
        let params = self.hitbox.unwrap_or(fallback);
        let size = self.display_size;
        let side = size.x.min(size.y) * params.scale;
        let corner = self.top_left()
            + Vec2::new(
                (size.x - side) * 0.5 + size.x * params.offset_x,
                (size.y - side) * 0.5 + size.y * params.offset_y,
            );
        Rect::from_corner_size(corner, Vec2::splat(side))
    }

    pub fn view(&self) -> BalloonView {
        BalloonView {
            id: self.id,
            kind: self.kind,
            position: self.position,
            display_size: self.display_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balloon_at(x: f32, y: f32, velocity: Vec2) -> Balloon {
        Balloon::new(1, BalloonKind::Normal, Vec2::new(x, y), velocity, Vec2::new(48.0, 72.0), 1.0)
    }

    #[test]
    fn test_rises_with_velocity() {
        let mut b = balloon_at(500.0, 900.0, Vec2::new(20.0, -60.0));
        b.advance(0.5, 1920.0, 60.0, 80.0);
        assert_eq!(b.position, Vec2::new(510.0, 870.0));
        assert!(b.active);
    }

    #[test]
    fn test_speed_multiplier_scales_drift() {
        let mut b = Balloon::new(
            2,
            BalloonKind::Big,
            Vec2::new(500.0, 900.0),
            Vec2::new(20.0, -60.0),
            Vec2::new(120.0, 180.0),
            0.5,
        );
        assert_eq!(b.velocity, Vec2::new(10.0, -30.0));

        b.set_velocity(Vec2::new(-40.0, -80.0));
        assert_eq!(b.velocity, Vec2::new(-20.0, -40.0));
    }

    #[test]
    fn test_wraps_past_margin() {
        let mut b = balloon_at(-55.0, 500.0, Vec2::new(-20.0, 0.0));
        b.advance(0.5, 1920.0, 60.0, 80.0);
        assert_eq!(b.position.x, 1980.0);

        let mut b = balloon_at(1975.0, 500.0, Vec2::new(20.0, 0.0));
        b.advance(0.5, 1920.0, 60.0, 80.0);
        assert_eq!(b.position.x, -60.0);
    }

    #[test]
    fn test_culled_above_ceiling_margin() {
        let mut b = balloon_at(500.0, -70.0, Vec2::new(0.0, -40.0));
        b.advance(0.5, 1920.0, 60.0, 80.0);
        assert!(!b.active);

        // Inactive balloons no longer move
        let before = b.position;
        b.advance(1.0, 1920.0, 60.0, 80.0);
        assert_eq!(b.position, before);
    }

    #[test]
    fn test_bulb_geometry() {
        let b = balloon_at(100.0, 200.0, Vec2::ZERO);
        let bulb = b.bulb(&BalloonConfig::default());
        // top = 164, 72 * 0.3 = 21.6
        assert!((bulb.center.y - 185.6).abs() < 1e-3);
        assert_eq!(bulb.center.x, 100.0);
        assert!((bulb.radius - 48.0 * 0.35).abs() < 1e-4);
    }

    #[test]
    fn test_hitbox_rect_uses_override() {
        let fallback = HitboxOverride::for_kind(
            BalloonKind::Normal,
            &BalloonConfig::default(),
            &BigBalloonConfig::default(),
        );
        let b = balloon_at(24.0, 36.0, Vec2::ZERO);
        let rect = b.hitbox_rect(fallback);
        assert!((rect.width() - 33.6).abs() < 1e-3);
        assert!((rect.min.x - 7.2).abs() < 1e-3);
        assert!((rect.min.y - 8.4).abs() < 1e-3);

        let mut b = b;
        b.hitbox = Some(HitboxOverride {
            scale: 0.5,
            offset_x: 0.0,
            offset_y: 0.0,
        });
        let rect = b.hitbox_rect(fallback);
        assert!((rect.width() - 24.0).abs() < 1e-3);
        assert!((rect.center() - Vec2::new(24.0, 36.0)).length() < 1e-3);
    }
}
