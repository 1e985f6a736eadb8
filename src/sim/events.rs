//! Match events and the effects seam
//!
//! The simulation records what happened as [`GameEvent`]s. Presentation code
//! (particles, sounds, HUD) drains them after each tick; pops and crashes can
//! be forwarded to an [`Effects`] implementation with [`dispatch_effects`].

use serde::{Deserialize, Serialize};

use super::balloon::BalloonKind;
use super::plane::StallCause;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    P1,
    P2,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::P1, Player::P2];

    pub fn index(self) -> usize {
        match self {
            Player::P1 => 0,
            Player::P2 => 1,
        }
    }

    pub fn opponent(self) -> Player {
        match self {
            Player::P1 => Player::P2,
            Player::P2 => Player::P1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Player::P1 => "Player 1",
            Player::P2 => "Player 2",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A balloon was popped at the nose tip of `popped_by`
    BalloonPopped { x: f32, y: f32, popped_by: Player },
    PlaneCrashed { player: Player, x: f32, y: f32 },
    PlaneTookOff { player: Player },
    PlaneStalled { player: Player, cause: StallCause },
    PlaneRecovered { player: Player },
    /// Back on the runway after the debris landed
    PlaneReset { player: Player },
    BalloonSpawned { id: u32, kind: BalloonKind },
    ScoreChanged { scores: [u32; 2] },
    GameOver { winner: Player },
    MatchRestarted,
}

/// Fire-and-forget presentation hooks
pub trait Effects {
    fn on_balloon_pop(&mut self, x: f32, y: f32);
    fn on_plane_crash(&mut self, x: f32, y: f32);
}

/// Forward pops and crashes to `effects`, in event order
pub fn dispatch_effects<E: Effects + ?Sized>(events: &[GameEvent], effects: &mut E) {
    for event in events {
        match *event {
            GameEvent::BalloonPopped { x, y, .. } => effects.on_balloon_pop(x, y),
            GameEvent::PlaneCrashed { x, y, .. } => effects.on_plane_crash(x, y),
            _ => {}
        }
    }
}
