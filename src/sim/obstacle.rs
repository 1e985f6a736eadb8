//! The house: a static obstacle standing on the ground

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::config::{SpawnConfig, WorldConfig};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
}

impl Obstacle {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            rect: Rect::from_center_size(center, size),
        }
    }

    /// House centered at `width * house_x_ratio`, bottom edge `house_bottom_offset`
    /// below the ground line
    pub fn house(world: &WorldConfig, spawn: &SpawnConfig) -> Self {
        let size = Vec2::new(spawn.house_width, spawn.house_height);
        let bottom = world.ground_y + spawn.house_bottom_offset;
        let center = Vec2::new(world.width * spawn.house_x_ratio, bottom - size.y * 0.5);
        Self::new(center, size)
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.rect.intersects(other)
    }
}
