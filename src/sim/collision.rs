//! Per-tick collision and scoring pass
//!
//! Runs once per tick after all motion, in a fixed order:
//! 1. plane vs plane
//! 2. plane vs house
//! 3. nose tip vs balloon bulbs (scoring)
//! 4. plane vs big balloon

use super::balloon::HitboxOverride;
use super::events::{GameEvent, Player};
use super::plane::PlaneMode;
use super::state::MatchState;

/// Apply every collision rule for this tick
pub fn resolve_collisions(state: &mut MatchState) {
    planes_vs_each_other(state);
    planes_vs_obstacle(state);
    noses_vs_balloons(state);
    planes_vs_big_balloon(state);
}

fn planes_vs_each_other(state: &mut MatchState) {
    let [p1, p2] = &state.planes;
    if p1.mode() == PlaneMode::Crashed || p2.mode() == PlaneMode::Crashed {
        return;
    }
    if p1.bounds().intersects(&p2.bounds()) {
        log::debug!("Mid-air collision");
        for player in Player::BOTH {
            state.crash_plane(player);
        }
    }
}

fn planes_vs_obstacle(state: &mut MatchState) {
    for player in Player::BOTH {
        let plane = state.plane(player);
        if plane.mode() != PlaneMode::Crashed && state.obstacle.overlaps(&plane.hitbox()) {
            log::debug!("{} hit the house", player.label());
            state.crash_plane(player);
        }
    }
}

/// Popping a balloon credits the other player. A balloon pops for at most one plane.
fn noses_vs_balloons(state: &mut MatchState) {
    for i in 0..state.balloons.len() {
        if state.is_game_over() {
            break;
        }
        if !state.balloons[i].active {
            continue;
        }

        let bulb = state.balloons[i].bulb(&state.config().balloon);
        let popper = Player::BOTH.into_iter().find(|&player| {
            let plane = state.plane(player);
            plane.mode().is_airborne() && bulb.contains_point(plane.nose_tip_position())
        });

        if let Some(player) = popper {
            let nose = state.plane(player).nose_tip_position();
            state.balloons[i].active = false;
            log::debug!(
                "{} popped balloon {} at ({:.1}, {:.1})",
                player.label(),
                state.balloons[i].id,
                nose.x,
                nose.y
            );
            state.push_event(GameEvent::BalloonPopped {
                x: nose.x,
                y: nose.y,
                popped_by: player,
            });
            state.award_point(player.opponent());
        }
    }

    state.balloons.retain(|b| b.active);
}

/// The big balloon survives every hit
fn planes_vs_big_balloon(state: &mut MatchState) {
    if state.is_game_over() {
        return;
    }
    let Some(big) = state.big_balloon.as_ref() else {
        return;
    };
    let config = state.config();
    let fallback = HitboxOverride::for_kind(big.kind, &config.balloon, &config.big_balloon);
    let hitbox = big.hitbox_rect(fallback);

    for player in Player::BOTH {
        let plane = state.plane(player);
        if plane.mode().is_airborne() && plane.bounds().intersects(&hitbox) {
            log::debug!("{} flew into the big balloon", player.label());
            state.crash_plane(player);
        }
    }
}
