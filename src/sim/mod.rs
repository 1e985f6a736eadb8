//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering,
//! audio and platform code:
//! - Time enters only through the tick delta
//! - Seeded RNG only
//! - Stable iteration order (player order, then spawn order)

pub mod balloon;
pub mod collision;
pub mod debris;
pub mod events;
pub mod geometry;
pub mod obstacle;
pub mod plane;
pub mod state;
pub mod tick;
pub mod timers;

pub use balloon::{Balloon, BalloonKind, BalloonView, HitboxOverride};
pub use collision::resolve_collisions;
pub use debris::{Debris, DebrisPiece};
pub use events::{Effects, GameEvent, Player, dispatch_effects};
pub use geometry::{Circle, Rect, rotated_bounds};
pub use obstacle::Obstacle;
pub use plane::{Plane, PlaneEvent, PlaneInput, PlaneMode, PlaneSpawn, PlaneView, StallCause};
pub use state::{MatchPhase, MatchSnapshot, MatchState};
pub use tick::{TickInput, tick};
pub use timers::{Schedule, TaskKind, Timers};
