//! Simulation tick
//!
//! Advances the match by one frame. The driver owns the [`MatchState`] and
//! calls [`tick`] once per frame with that frame's input and delta.

use serde::{Deserialize, Serialize};

use super::collision::resolve_collisions;
use super::events::Player;
use super::plane::PlaneInput;
use super::state::MatchState;
use crate::math::sanitize_dt;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Indexed by [`Player::index`]
    pub players: [PlaneInput; 2],
    /// Start a new match (only honored after game over)
    pub restart: bool,
}

impl TickInput {
    pub fn for_player(&self, player: Player) -> &PlaneInput {
        &self.players[player.index()]
    }
}

/// Advance the match by `dt` seconds
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32) {
    let dt = sanitize_dt(dt, state.config().world.max_tick_dt);
    state.tick_count += 1;

    // The match is frozen until someone asks for a rematch
    if state.is_game_over() {
        if input.restart {
            state.restart();
        }
        return;
    }

    for task in state.timers.advance(dt) {
        state.run_task(task);
    }

    let world_width = state.config().world.width;
    let ground_y = state.config().world.ground_y;

    for player in Player::BOTH {
        state.planes[player.index()].advance(dt, input.for_player(player), world_width, ground_y);
        state.collect_plane_events(player);
    }

    advance_debris(state, dt);
    advance_balloons(state, dt);
    resolve_collisions(state);
}

/// Move the wreckage and put a plane back on the runway once all of its pieces landed
fn advance_debris(state: &mut MatchState, dt: f32) {
    let world_width = state.config().world.width;
    let ground_y = state.config().world.ground_y;

    for player in Player::BOTH {
        let idx = player.index();
        let Some(debris) = state.debris[idx].as_mut() else {
            continue;
        };
        debris.advance(dt, world_width);
        if debris.all_landed() {
            state.debris[idx] = None;
            state.planes[idx].reset_to_start(ground_y);
            state.collect_plane_events(player);
            log::debug!("{} back on the runway", player.label());
        }
    }
}

fn advance_balloons(state: &mut MatchState, dt: f32) {
    let world_width = state.config().world.width;
    let margin_x = state.config().balloon.cull_margin_x;
    let margin_y = state.config().balloon.cull_margin_y;

    for balloon in &mut state.balloons {
        balloon.advance(dt, world_width, margin_x, margin_y);
    }
    state.balloons.retain(|b| b.active);

    let culled = match state.big_balloon.as_mut() {
        Some(big) => {
            big.advance(dt, world_width, margin_x, margin_y);
            !big.active
        }
        None => false,
    };
    if culled {
        log::debug!("Big balloon left the sky");
        state.big_balloon = None;
        state.schedule_big_balloon_spawn();
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::config::GameConfig;
    use crate::consts::SIM_DT;
    use crate::sim::balloon::BalloonKind;
    use crate::sim::events::GameEvent;
    use crate::sim::plane::PlaneMode;
    use crate::sim::state::MatchPhase;
    use crate::sim::timers::TaskKind;

    fn new_state() -> MatchState {
        MatchState::new(GameConfig::default(), 11)
    }

    fn throttle_both() -> TickInput {
        TickInput {
            players: [PlaneInput::throttle(); 2],
            restart: false,
        }
    }

    #[test]
    fn test_spawns_arrive_within_delay_range() {
        let mut state = new_state();
        let input = TickInput::default();
        // 0.8s minimum delay
        for _ in 0..47 {
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.balloons.is_empty());
        assert!(state.big_balloon.is_none());

        // 2.0s maximum delay, plus a tick of slack
        for _ in 0..80 {
            tick(&mut state, &input, SIM_DT);
        }
        assert!(!state.balloons.is_empty());
        assert!(state.big_balloon.is_some());
        assert!(state.timers.is_pending(TaskKind::BalloonSpawn));
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut a = new_state();
        let mut b = new_state();
        let input = throttle_both();
        tick(&mut a, &input, 10.0);
        tick(&mut b, &input, 1.0 / 30.0);
        assert_eq!(a.plane(Player::P1).speed(), b.plane(Player::P1).speed());

        let mut c = new_state();
        tick(&mut c, &input, f32::NAN);
        tick(&mut c, &input, -1.0);
        assert_eq!(c.plane(Player::P1).speed(), 0.0);
    }

    #[test]
    fn test_planes_take_off_under_throttle() {
        let mut state = new_state();
        // No balloons drifting across the runways
        state.timers.cancel_all();
        let input = throttle_both();
        let mut ticks = 0;
        while state.plane(Player::P1).mode() == PlaneMode::Grounded && ticks < 200 {
            tick(&mut state, &input, SIM_DT);
            ticks += 1;
        }
        // 400 / 250 = 1.6s of runway
        assert!((95..=98).contains(&ticks), "took off after {ticks} ticks");
        assert_eq!(state.plane(Player::P2).mode(), PlaneMode::Flying);

        let took_off: Vec<Player> = state
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::PlaneTookOff { player } => Some(player),
                _ => None,
            })
            .collect();
        assert_eq!(took_off, vec![Player::P1, Player::P2]);
    }

    #[test]
    fn test_crashed_plane_resets_after_debris_lands() {
        let mut state = new_state();
        state.crash_plane(Player::P1);
        state.drain_events();

        let input = TickInput::default();
        let mut ticks = 0;
        while state.plane(Player::P1).mode() == PlaneMode::Crashed && ticks < 600 {
            tick(&mut state, &input, SIM_DT);
            ticks += 1;
        }
        assert_eq!(state.plane(Player::P1).mode(), PlaneMode::Grounded);
        assert!(state.plane(Player::P1).is_visible());
        assert!(state.debris[0].is_none());
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::PlaneReset { player: Player::P1 })
        );
    }

    #[test]
    fn test_culled_big_balloon_reschedules() {
        let mut state = new_state();
        state.timers.cancel_all();
        // Drift of -120 scales to -72 for a big balloon
        state.spawn_balloon_at(BalloonKind::Big, Vec2::new(900.0, -79.0), Vec2::new(0.0, -120.0));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.big_balloon.is_none());
        assert!(state.timers.is_pending(TaskKind::BigBalloonSpawn));
    }

    #[test]
    fn test_game_over_freezes_until_restart() {
        let mut state = new_state();
        let input = throttle_both();
        for _ in 0..120 {
            tick(&mut state, &input, SIM_DT);
        }
        state.scores = [19, 0];
        state.award_point(Player::P1);
        assert_eq!(state.phase, MatchPhase::GameOver { winner: Player::P1 });
        assert!(state.planes.iter().all(|p| p.velocity() == Vec2::ZERO));

        let frozen_balloons = state.balloons.len();
        let frozen_positions: Vec<Vec2> = state.planes.iter().map(|p| p.position()).collect();
        for _ in 0..300 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.balloons.len(), frozen_balloons);
        let positions: Vec<Vec2> = state.planes.iter().map(|p| p.position()).collect();
        assert_eq!(positions, frozen_positions);
        assert_eq!(state.scores, [20, 0]);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, SIM_DT);
        assert_eq!(state.phase, MatchPhase::Playing);
        assert_eq!(state.scores, [0, 0]);
        assert!(state.balloons.is_empty());
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let mut state = new_state();
        state.scores = [3, 4];
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, SIM_DT);
        assert_eq!(state.scores, [3, 4]);
    }

    #[test]
    fn test_same_seed_same_match() {
        let run = || {
            let mut state = new_state();
            let input = throttle_both();
            for _ in 0..600 {
                tick(&mut state, &input, SIM_DT);
            }
            state.snapshot()
        };
        assert_eq!(run(), run());
    }
}
