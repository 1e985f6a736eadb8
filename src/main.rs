//! Sky Duel headless runner
//!
//! Plays scripted matches on the deterministic simulation and prints a
//! summary. Handy for tuning a config file without a renderer attached.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;

use sky_duel::GameConfig;
use sky_duel::consts::SIM_DT;
use sky_duel::normalize_angle;
use sky_duel::sim::{
    BalloonKind, Effects, GameEvent, MatchState, Plane, PlaneInput, PlaneMode, Player, TickInput,
    dispatch_effects, tick,
};

#[derive(Parser, Debug)]
#[command(name = "sky-duel")]
#[command(about = "Run scripted Sky Duel matches headless and report the results")]
struct Cli {
    /// JSON config file; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 0x5EED)]
    seed: u64,
    /// Upper bound on simulated ticks (60 per second)
    #[arg(long, default_value_t = 60 * 60 * 10)]
    max_ticks: u64,
    /// Stop after this many finished matches
    #[arg(long, default_value_t = 1)]
    matches: u32,
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
    /// Print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

#[derive(Debug, Serialize)]
struct MatchResult {
    winner: Player,
    scores: [u32; 2],
    ticks: u64,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    seed: u64,
    ticks: u64,
    matches: Vec<MatchResult>,
    final_scores: [u32; 2],
    balloons_spawned: u32,
    big_balloons_spawned: u32,
    pops: u32,
    crashes: u32,
    stalls: u32,
}

/// Counts what a renderer would have drawn
#[derive(Default)]
struct EffectCounter {
    pops: u32,
    crashes: u32,
}

impl Effects for EffectCounter {
    fn on_balloon_pop(&mut self, x: f32, y: f32) {
        log::trace!("pop effect at ({x:.0}, {y:.0})");
        self.pops += 1;
    }

    fn on_plane_crash(&mut self, x: f32, y: f32) {
        log::trace!("crash effect at ({x:.0}, {y:.0})");
        self.crashes += 1;
    }
}

/// Scripted pilot: take off, then chase the height of the nearest balloon
fn pilot(state: &MatchState, player: Player) -> PlaneInput {
    let plane = state.plane(player);
    match plane.mode() {
        PlaneMode::Grounded => PlaneInput::throttle(),
        // Nose down to dive out of the stall
        PlaneMode::Stalled => {
            let error = normalize_angle(-45.0 - normalize_angle(plane.world_angle()));
            // Down turns a right-facing nose clockwise and a left-facing one counter-clockwise
            let steer = error * plane.facing();
            PlaneInput {
                up: steer > 5.0,
                down: steer < -5.0,
                ..Default::default()
            }
        }
        PlaneMode::Flying => {
            let target = desired_heading(state, plane);
            let heading = normalize_angle(plane.target_heading());
            PlaneInput {
                up: heading < target - 4.0,
                down: heading > target + 4.0,
                ..Default::default()
            }
        }
        PlaneMode::Crashed => PlaneInput::default(),
    }
}

/// Relative heading that points toward the nearest balloon, kept clear of the ground
fn desired_heading(state: &MatchState, plane: &Plane) -> f32 {
    let ground = state.config().world.ground_y;
    let position = plane.position();
    if position.y > ground - 150.0 {
        return 25.0;
    }
    if position.y < 120.0 {
        return -30.0;
    }

    let nearest = state
        .balloons
        .iter()
        .map(|b| b.position)
        .min_by(|a, b| a.distance_squared(position).total_cmp(&b.distance_squared(position)));
    match nearest {
        Some(target) if target.y < position.y - 40.0 => 15.0,
        Some(target) if target.y > position.y + 40.0 => -25.0,
        _ => 0.0,
    }
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

fn run(cli: &Cli, config: GameConfig) -> Result<Summary> {
    if cli.matches == 0 {
        bail!("--matches must be at least 1");
    }

    let mut state = MatchState::new(config, cli.seed);
    let mut effects = EffectCounter::default();
    let mut summary = Summary {
        seed: cli.seed,
        ..Default::default()
    };
    let mut match_start = 0;

    while summary.ticks < cli.max_ticks {
        let restart = state.is_game_over();
        let input = TickInput {
            players: [pilot(&state, Player::P1), pilot(&state, Player::P2)],
            restart,
        };
        tick(&mut state, &input, SIM_DT);
        summary.ticks += 1;

        let events = state.drain_events();
        dispatch_effects(&events, &mut effects);
        for event in &events {
            match event {
                GameEvent::BalloonSpawned {
                    kind: BalloonKind::Normal,
                    ..
                } => summary.balloons_spawned += 1,
                GameEvent::BalloonSpawned {
                    kind: BalloonKind::Big,
                    ..
                } => summary.big_balloons_spawned += 1,
                GameEvent::PlaneStalled { .. } => summary.stalls += 1,
                GameEvent::GameOver { winner } => {
                    summary.matches.push(MatchResult {
                        winner: *winner,
                        scores: state.scores,
                        ticks: state.tick_count - match_start,
                    });
                }
                GameEvent::MatchRestarted => match_start = state.tick_count,
                _ => {}
            }
        }

        if summary.matches.len() as u32 >= cli.matches {
            break;
        }
    }

    summary.final_scores = state.scores;
    summary.pops = effects.pops;
    summary.crashes = effects.crashes;
    Ok(summary)
}

fn print_summary(summary: &Summary) {
    println!(
        "Seed {:#x}, {} ticks ({:.1}s)",
        summary.seed,
        summary.ticks,
        summary.ticks as f32 * SIM_DT
    );
    for (i, result) in summary.matches.iter().enumerate() {
        println!(
            "  Match {}: {} wins {}-{} in {} ticks",
            i + 1,
            result.winner.label(),
            result.scores[0],
            result.scores[1],
            result.ticks
        );
    }
    if summary.matches.is_empty() {
        println!(
            "  No match finished; scores {}-{}",
            summary.final_scores[0], summary.final_scores[1]
        );
    }
    println!(
        "  Balloons: {} spawned, {} big, {} popped",
        summary.balloons_spawned, summary.big_balloons_spawned, summary.pops
    );
    println!("  Crashes: {}, stalls: {}", summary.crashes, summary.stalls);
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    if cli.dump_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    log::info!("Sky Duel (headless) starting...");
    let summary = run(&cli, config)?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("serializing summary")?
        );
    } else {
        print_summary(&summary);
    }
    Ok(())
}
