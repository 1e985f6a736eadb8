//! Match state and the match controller
//!
//! Everything a running match owns lives in [`MatchState`]: both planes, the
//! balloon pool, the big-balloon slot, debris, timers, scores and the seeded
//! RNG. Same seed, same config and same inputs give the same match.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::balloon::{Balloon, BalloonKind, BalloonView};
use super::debris::{Debris, DebrisPiece};
use super::events::{GameEvent, Player};
use super::geometry::Rect;
use super::obstacle::Obstacle;
use super::plane::{Plane, PlaneEvent, PlaneSpawn, PlaneView};
use super::timers::{TaskKind, Timers};
use crate::config::GameConfig;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Playing,
    /// Frozen until a restart is requested
    GameOver { winner: Player },
}

/// Read-only picture of the match for a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub tick: u64,
    pub scores: [u32; 2],
    pub phase: MatchPhase,
    pub planes: [PlaneView; 2],
    pub balloons: Vec<BalloonView>,
    pub big_balloon: Option<BalloonView>,
    pub obstacle: Rect,
    pub debris: Vec<DebrisPiece>,
}

/// Complete match state (deterministic for a given seed)
#[derive(Debug, Clone)]
pub struct MatchState {
    config: GameConfig,
    seed: u64,
    rng: Pcg32,
    /// Indexed by [`Player::index`]
    pub planes: [Plane; 2],
    /// Normal balloons, in spawn order
    pub balloons: Vec<Balloon>,
    pub big_balloon: Option<Balloon>,
    pub obstacle: Obstacle,
    /// Falling wreckage per player; the plane resets once it has all landed
    pub debris: [Option<Debris>; 2],
    pub timers: Timers,
    pub scores: [u32; 2],
    pub phase: MatchPhase,
    pub tick_count: u64,
    next_id: u32,
    events: Vec<GameEvent>,
}

impl MatchState {
    /// Start a match. `config` is expected to have passed [`GameConfig::validate`].
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let world = &config.world;
        let p1 = PlaneSpawn {
            x: world.width * config.spawn.plane_p1_x_ratio,
            facing: 1.0,
            sprite_forward_angle: 0.0,
        };
        let p2 = PlaneSpawn {
            x: world.width * config.spawn.plane_p2_x_ratio,
            facing: -1.0,
            sprite_forward_angle: 180.0,
        };
        let planes = [
            Plane::new(p1, config.plane.clone(), world.ground_y),
            Plane::new(p2, config.plane.clone(), world.ground_y),
        ];
        let obstacle = Obstacle::house(world, &config.spawn);

        let mut state = Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            planes,
            balloons: Vec::new(),
            big_balloon: None,
            obstacle,
            debris: [None, None],
            timers: Timers::new(),
            scores: [0; 2],
            phase: MatchPhase::Playing,
            tick_count: 0,
            next_id: 1,
            events: Vec::new(),
        };

        state.schedule_balloon_spawn();
        state.schedule_big_balloon_spawn();
        log::info!(
            "Match started (seed {seed}, first to {})",
            state.config.score_to_win
        );
        state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn plane(&self, player: Player) -> &Plane {
        &self.planes[player.index()]
    }

    pub fn score(&self, player: Player) -> u32 {
        self.scores[player.index()]
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, MatchPhase::GameOver { .. })
    }

    pub fn winner(&self) -> Option<Player> {
        match self.phase {
            MatchPhase::GameOver { winner } => Some(winner),
            MatchPhase::Playing => None,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Hand over everything recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn spawn_delay(&mut self) -> f32 {
        let spawn = &self.config.spawn;
        let ms = self.rng.random_range(spawn.spawn_min_ms..=spawn.spawn_max_ms);
        ms as f32 / 1000.0
    }

    pub(crate) fn schedule_balloon_spawn(&mut self) {
        let delay = self.spawn_delay();
        self.timers.schedule_once(TaskKind::BalloonSpawn, delay);
    }

    pub(crate) fn schedule_big_balloon_spawn(&mut self) {
        let delay = self.spawn_delay();
        self.timers.schedule_once(TaskKind::BigBalloonSpawn, delay);
    }

    /// React to a fired timer
    pub(crate) fn run_task(&mut self, task: TaskKind) {
        match task {
            TaskKind::BalloonSpawn => {
                self.spawn_balloon(BalloonKind::Normal);
                self.schedule_balloon_spawn();
            }
            TaskKind::BigBalloonSpawn => {
                if self.big_balloon.is_none() {
                    self.spawn_balloon(BalloonKind::Big);
                } else {
                    self.schedule_big_balloon_spawn();
                }
            }
        }
    }

    /// Spawn a balloon of `kind` below the ground line with a random drift.
    /// A big balloon replaces whatever occupies the slot.
    pub fn spawn_balloon(&mut self, kind: BalloonKind) -> u32 {
        let world = &self.config.world;
        let balloon = &self.config.balloon;
        let width = world.width.max(0.0) as u32;
        let y = world.ground_y + world.ground_height * self.config.spawn.balloon_ground_ratio;
        let (x_min, x_max) = (balloon.speed_x_min, balloon.speed_x_max);
        let (y_min, y_max) = (balloon.speed_y_min, balloon.speed_y_max);

        let x = self.rng.random_range(0..=width) as f32;
        let vy = -self.rng.random_range(y_min..=y_max);
        let vx = self.rng.random_range(x_min..=x_max);
        let vx = if self.rng.random_bool(0.5) { vx } else { -vx };

        self.spawn_balloon_at(kind, Vec2::new(x, y), Vec2::new(vx, vy))
    }

    /// Place a balloon of `kind` at `position`. `drift` is scaled by the kind's speed multiplier.
    pub fn spawn_balloon_at(&mut self, kind: BalloonKind, position: Vec2, drift: Vec2) -> u32 {
        let id = self.next_entity_id();
        let cfg = &self.config.balloon;
        let base = Vec2::new(cfg.display_width, cfg.display_height);
        let (size_multiplier, speed_multiplier) = match kind {
            BalloonKind::Normal => (1.0, 1.0),
            BalloonKind::Big => (
                self.config.big_balloon.size_multiplier,
                self.config.big_balloon.speed_multiplier,
            ),
        };
        let size = base * size_multiplier;
        let balloon = Balloon::new(id, kind, position, drift, size, speed_multiplier);

        log::debug!("Spawned {kind:?} balloon {id} at ({:.0}, {:.0})", position.x, position.y);
        match kind {
            BalloonKind::Normal => self.balloons.push(balloon),
            BalloonKind::Big => self.big_balloon = Some(balloon),
        }
        self.push_event(GameEvent::BalloonSpawned { id, kind });
        id
    }

    /// Crash `player`'s plane. Returns false if it was already down.
    pub fn crash_plane(&mut self, player: Player) -> bool {
        let crashed = self.planes[player.index()].request_crash();
        self.collect_plane_events(player);
        crashed
    }

    /// Turn a plane's recorded transitions into match events; a crash also throws debris
    pub(crate) fn collect_plane_events(&mut self, player: Player) {
        let idx = player.index();
        for event in self.planes[idx].drain_events() {
            let event = match event {
                PlaneEvent::TookOff => GameEvent::PlaneTookOff { player },
                PlaneEvent::Stalled(cause) => GameEvent::PlaneStalled { player, cause },
                PlaneEvent::Recovered => GameEvent::PlaneRecovered { player },
                PlaneEvent::Reset => GameEvent::PlaneReset { player },
                PlaneEvent::Crashed { at } => {
                    let plane = &self.planes[idx];
                    self.debris[idx] = Some(Debris::spawn(
                        at,
                        plane.display_size(),
                        plane.last_velocity(),
                        self.config.world.ground_y,
                        &self.config.debris,
                        &mut self.rng,
                    ));
                    log::debug!("{} crashed at ({:.1}, {:.1})", player.label(), at.x, at.y);
                    GameEvent::PlaneCrashed {
                        player,
                        x: at.x,
                        y: at.y,
                    }
                }
            };
            self.events.push(event);
        }
    }

    /// Credit `scorer` with one point and check for a winner
    pub(crate) fn award_point(&mut self, scorer: Player) {
        self.scores[scorer.index()] += 1;
        self.push_event(GameEvent::ScoreChanged { scores: self.scores });
        self.check_win();
    }

    /// P1 is checked first
    pub(crate) fn check_win(&mut self) {
        if self.is_game_over() {
            return;
        }
        let threshold = self.config.score_to_win;
        let winner = Player::BOTH
            .into_iter()
            .find(|p| self.scores[p.index()] >= threshold);
        if let Some(winner) = winner {
            self.enter_game_over(winner);
        }
    }

    fn enter_game_over(&mut self, winner: Player) {
        self.phase = MatchPhase::GameOver { winner };
        for plane in &mut self.planes {
            plane.halt();
        }
        log::info!(
            "{} wins {}-{} after {} ticks",
            winner.label(),
            self.scores[0],
            self.scores[1],
            self.tick_count
        );
        self.push_event(GameEvent::GameOver { winner });
    }

    /// Reset scores, entities and timers for a fresh match. Only valid after game over.
    pub fn restart(&mut self) -> bool {
        if !self.is_game_over() {
            return false;
        }

        self.timers.cancel_all();
        self.scores = [0; 2];
        self.phase = MatchPhase::Playing;
        self.balloons.clear();
        self.big_balloon = None;
        self.debris = [None, None];

        let ground_y = self.config.world.ground_y;
        for player in Player::BOTH {
            self.planes[player.index()].reset_to_start(ground_y);
            self.collect_plane_events(player);
        }

        self.schedule_balloon_spawn();
        self.schedule_big_balloon_spawn();
        self.push_event(GameEvent::MatchRestarted);
        log::info!("Match restarted");
        true
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            tick: self.tick_count,
            scores: self.scores,
            phase: self.phase,
            planes: [self.planes[0].view(), self.planes[1].view()],
            balloons: self.balloons.iter().map(Balloon::view).collect(),
            big_balloon: self.big_balloon.as_ref().map(Balloon::view),
            obstacle: self.obstacle.rect,
            debris: self
                .debris
                .iter()
                .flatten()
                .flat_map(|d| d.pieces().iter().cloned())
                .collect(),
        }
    }
}
