//! Tube Runner headless driver
//!
//! Runs the simulation at a fixed frame rate without any presentation layer.
//! Useful for checking seeds, tuning files and the autopilot.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tube_runner::Tuning;
use tube_runner::sim::{GameState, SteeringChanged, TickInput, tick};
use tube_runner::tuning::PatternSource;

#[derive(Parser, Debug)]
#[command(name = "tube-runner")]
#[command(about = "Fly the tunnel headless and report the final score")]
struct Args {
    /// Seed for the shape pool and reshaping
    #[arg(short, long, default_value_t = 12345)]
    seed: u64,

    /// Simulated seconds to fly before stopping
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,

    /// Frames per simulated second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Tuning file (JSON); defaults are used when omitted
    #[arg(short, long)]
    tuning: Option<PathBuf>,

    /// Override the tuning's hole pattern source (catalog, random, mixed)
    #[arg(long)]
    patterns: Option<String>,

    /// Steer toward the next hole automatically
    #[arg(long)]
    autopilot: bool,

    /// Fixed horizontal steering in [-1, 1] when not on autopilot
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    steer_x: f32,

    /// Fixed vertical steering in [-1, 1] when not on autopilot
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    steer_y: f32,

    /// Print the generated shape pool as JSON and exit
    #[arg(long)]
    dump_shapes: bool,

    /// Fly without a craft (scoring only, no collisions)
    #[arg(long)]
    no_craft: bool,
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    let args = Args::parse();

    let mut tuning = match &args.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Error loading tuning: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };

    if let Some(name) = &args.patterns {
        let Some(source) = PatternSource::from_str(name) else {
            eprintln!("Unknown pattern source: {name}");
            return ExitCode::FAILURE;
        };
        tuning.pattern_source = source;
    }

    if args.fps == 0 {
        eprintln!("--fps must be at least 1");
        return ExitCode::FAILURE;
    }

    let mut state = GameState::with_tuning(tuning, args.seed);

    if args.dump_shapes {
        return match serde_json::to_string_pretty(&state.pool) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error serializing shapes: {e}");
                ExitCode::FAILURE
            }
        };
    }

    if args.no_craft {
        state.detach_craft();
    }

    let mut input = TickInput {
        autopilot: args.autopilot,
        ..Default::default()
    };
    input.apply(SteeringChanged {
        x: args.steer_x,
        y: args.steer_y,
    });

    let dt = 1.0 / args.fps as f32;
    let frames = (args.seconds.max(0.0) * args.fps as f32).round() as u64;
    log::info!(
        "Flying {frames} frames at {} fps (autopilot: {})",
        args.fps,
        args.autopilot
    );

    let mut collided = false;
    for _ in 0..frames {
        let result = tick(&mut state, &input, dt);
        if !result.still_running {
            collided = result.collided;
            break;
        }
    }

    println!("Seed: {}", state.seed);
    println!("Distance: {:.1}", -state.viewpoint);
    println!("Time: {:.2}s", state.elapsed);
    println!("Score: {}", state.score);
    if collided {
        println!("Game over");
    }

    ExitCode::SUCCESS
}
