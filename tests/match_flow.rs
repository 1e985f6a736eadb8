//! Whole-match behavior through the public API

use glam::Vec2;
use sky_duel::GameConfig;
use sky_duel::consts::SIM_DT;
use sky_duel::sim::{
    BalloonKind, Effects, GameEvent, MatchPhase, MatchState, PlaneInput, PlaneMode, Player,
    TickInput, dispatch_effects, tick,
};

fn quiet_match(seed: u64) -> MatchState {
    let mut state = MatchState::new(GameConfig::default(), seed);
    state.timers.cancel_all();
    state
}

fn p1_throttle() -> TickInput {
    TickInput {
        players: [PlaneInput::throttle(), PlaneInput::default()],
        restart: false,
    }
}

fn fly_p1(state: &mut MatchState) {
    let input = p1_throttle();
    for _ in 0..300 {
        if state.plane(Player::P1).mode() == PlaneMode::Flying {
            return;
        }
        tick(state, &input, SIM_DT);
    }
    panic!("P1 never took off");
}

/// Drop a still balloon so its bulb sits where P1's nose will be next tick
fn balloon_in_p1_path(state: &mut MatchState) -> u32 {
    let plane = state.plane(Player::P1);
    let next_nose = plane.nose_tip_position() + plane.velocity() * SIM_DT;
    let cfg = &state.config().balloon;
    let offset = cfg.display_height * (0.5 - cfg.bulb_center_y);
    state.spawn_balloon_at(BalloonKind::Normal, next_nose + Vec2::new(0.0, offset), Vec2::ZERO)
}

#[derive(Default)]
struct Recorder {
    pops: Vec<(f32, f32)>,
    crashes: Vec<(f32, f32)>,
}

impl Effects for Recorder {
    fn on_balloon_pop(&mut self, x: f32, y: f32) {
        self.pops.push((x, y));
    }

    fn on_plane_crash(&mut self, x: f32, y: f32) {
        self.crashes.push((x, y));
    }
}

#[test]
fn popping_a_balloon_scores_for_the_opponent() {
    let mut state = quiet_match(1);
    fly_p1(&mut state);
    balloon_in_p1_path(&mut state);
    state.drain_events();

    tick(&mut state, &TickInput::default(), SIM_DT);

    assert_eq!(state.scores, [0, 1]);
    assert!(state.balloons.is_empty());

    let events = state.drain_events();
    let mut recorder = Recorder::default();
    dispatch_effects(&events, &mut recorder);
    assert_eq!(recorder.pops.len(), 1);
    assert!(recorder.crashes.is_empty());
    assert!(events.contains(&GameEvent::ScoreChanged { scores: [0, 1] }));
}

#[test]
fn final_pop_ends_the_match_and_restart_resets_it() {
    let mut state = quiet_match(2);
    fly_p1(&mut state);
    state.scores = [0, 19];
    balloon_in_p1_path(&mut state);

    tick(&mut state, &TickInput::default(), SIM_DT);
    assert_eq!(state.phase, MatchPhase::GameOver { winner: Player::P2 });
    assert!(state.planes.iter().all(|p| p.velocity() == Vec2::ZERO));

    // Frozen: no motion and no spawns, however long we wait
    let frozen = state.snapshot();
    for _ in 0..600 {
        tick(&mut state, &p1_throttle(), SIM_DT);
    }
    let later = state.snapshot();
    assert_eq!(later.planes, frozen.planes);
    assert_eq!(later.balloons, frozen.balloons);
    assert_eq!(later.scores, [0, 20]);

    let restart = TickInput {
        restart: true,
        ..Default::default()
    };
    tick(&mut state, &restart, SIM_DT);
    assert_eq!(state.phase, MatchPhase::Playing);
    assert_eq!(state.scores, [0, 0]);
    assert_eq!(state.plane(Player::P1).mode(), PlaneMode::Grounded);
    assert!(state.drain_events().contains(&GameEvent::MatchRestarted));

    // Spawning resumes after the restart
    for _ in 0..130 {
        tick(&mut state, &TickInput::default(), SIM_DT);
    }
    assert!(!state.balloons.is_empty());
}

#[test]
fn plane_rolling_into_the_house_crashes_and_comes_back() {
    // Shorten P2's runway so it reaches the house before takeoff speed
    let mut config = GameConfig::default();
    config.spawn.plane_p2_x_ratio = 0.6;
    let mut state = MatchState::new(config, 3);
    state.timers.cancel_all();

    let input = TickInput {
        players: [PlaneInput::default(), PlaneInput::throttle()],
        restart: false,
    };
    let mut crashed = false;
    for _ in 0..300 {
        tick(&mut state, &input, SIM_DT);
        if state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::PlaneCrashed { player: Player::P2, .. }))
        {
            crashed = true;
            break;
        }
    }
    assert!(crashed, "P2 should hit the house");
    assert!(state.debris[1].is_some());

    let mut reset = false;
    for _ in 0..600 {
        tick(&mut state, &TickInput::default(), SIM_DT);
        if state
            .drain_events()
            .contains(&GameEvent::PlaneReset { player: Player::P2 })
        {
            reset = true;
            break;
        }
    }
    assert!(reset);
    assert_eq!(state.plane(Player::P2).mode(), PlaneMode::Grounded);
    assert_eq!(state.plane(Player::P2).position().x, 1920.0 * 0.6);
    assert_eq!(state.plane(Player::P1).mode(), PlaneMode::Grounded);
}

#[test]
fn same_seed_replays_identically() {
    let script = |seed: u64| {
        let mut state = MatchState::new(GameConfig::default(), seed);
        let mut log = Vec::new();
        for i in 0..900u32 {
            let up = (i / 40) % 3 != 0;
            let input = TickInput {
                players: [
                    PlaneInput {
                        up,
                        ..Default::default()
                    },
                    PlaneInput {
                        up: true,
                        down: i % 7 == 0,
                        ..Default::default()
                    },
                ],
                restart: false,
            };
            tick(&mut state, &input, SIM_DT);
            log.extend(state.drain_events());
        }
        (state.snapshot(), log)
    };

    assert_eq!(script(77), script(77));
    assert_ne!(script(77).0.balloons, script(78).0.balloons);
}

#[test]
fn partial_json_config_drives_a_match() {
    let config = GameConfig::from_json_str(
        r#"{ "score_to_win": 1, "spawn": { "spawn_min_ms": 100, "spawn_max_ms": 100 } }"#,
    )
    .unwrap();
    let mut state = MatchState::new(config, 9);

    for _ in 0..7 {
        tick(&mut state, &TickInput::default(), SIM_DT);
    }
    // Both spawn tasks fire at 0.1s
    assert_eq!(state.balloons.len(), 1);
    assert!(state.big_balloon.is_some());
    state.big_balloon = None;

    fly_p1(&mut state);
    state.balloons.clear();
    balloon_in_p1_path(&mut state);
    tick(&mut state, &TickInput::default(), SIM_DT);
    assert_eq!(state.winner(), Some(Player::P2));
}
