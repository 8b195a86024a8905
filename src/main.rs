//! Grapple Bullet headless demo
//!
//! Drives one projectile through a built-in arena with a seeded random key
//! script, the way a game loop would: fixed-timestep accumulator, one-shot
//! key edges consumed by the first substep of a frame.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use grapple_bullet::FixedStep;
use grapple_bullet::Tuning;
use grapple_bullet::consts::SIM_DT;
use grapple_bullet::sim::{
    KeyBindings, KeyState, LogSink, PhysicalKey, Projectile, RawInput, SegmentWorld, SurfaceTag,
    TickInput, tick,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run the grapple bullet simulation headless", long_about = None)]
struct Args {
    /// Tuning JSON (missing fields use defaults)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of rendered frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,
    /// Frame time in seconds fed to the accumulator
    #[arg(long, default_value_t = SIM_DT)]
    frame_dt: f32,
    /// Seed for the random key script
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Chance per frame that a bound key toggles
    #[arg(long, default_value_t = 0.04)]
    toggle_chance: f64,
    /// Print every tick as a JSON line instead of logging
    #[arg(long)]
    json: bool,
}

/// Arena: lethal box, grippable ceiling and floor, ricochet side panels, a target
fn demo_arena() -> SegmentWorld {
    SegmentWorld::new()
        .with_box(Vec2::splat(-15.0), Vec2::splat(15.0), SurfaceTag::Wall)
        .with_wall(Vec2::new(-15.0, 6.0), Vec2::new(15.0, 6.0), SurfaceTag::GrippableWall)
        .with_wall(Vec2::new(-15.0, -6.0), Vec2::new(15.0, -6.0), SurfaceTag::GrippableWall)
        .with_wall(Vec2::new(12.0, -4.0), Vec2::new(12.0, 4.0), SurfaceTag::RicochetWall)
        .with_wall(Vec2::new(-12.0, -4.0), Vec2::new(-12.0, 4.0), SurfaceTag::RicochetWall)
        .with_wall(Vec2::new(9.0, 4.5), Vec2::new(9.0, 5.5), SurfaceTag::Target)
}

/// Randomly presses and releases the bound keys
struct KeyScript {
    rng: Pcg32,
    keys: Vec<PhysicalKey>,
    held: Vec<PhysicalKey>,
    toggle_chance: f64,
}

impl KeyScript {
    fn new(seed: u64, bindings: &KeyBindings, toggle_chance: f64) -> Self {
        let keys = bindings.left.iter().chain(&bindings.right).copied().collect();
        Self {
            rng: Pcg32::seed_from_u64(seed),
            keys,
            held: Vec::new(),
            toggle_chance: toggle_chance.clamp(0.0, 1.0),
        }
    }

    fn next_frame(&mut self) -> RawInput {
        let mut raw = RawInput::default();
        if !self.keys.is_empty() && self.rng.random_bool(self.toggle_chance) {
            let key = self.keys[self.rng.random_range(0..self.keys.len())];
            if let Some(i) = self.held.iter().position(|k| *k == key) {
                self.held.swap_remove(i);
                raw.released.push(key);
            } else {
                self.held.push(key);
                raw.pressed.push(key);
            }
        }
        raw.held = self.held.clone();
        raw
    }
}

/// Fold a frame's edges into input not yet consumed by a substep
fn carry_edges(input: &mut TickInput, fresh: TickInput) {
    for (carried, fresh) in [(&mut input.left, fresh.left), (&mut input.right, fresh.right)] {
        carried.down |= fresh.down;
        carried.up |= fresh.up;
        carried.held = fresh.held;
    }
}

fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = fs::read_to_string(path).with_context(|| format!("read tuning {:?}", path))?;
    let tuning = Tuning::from_json(&json).with_context(|| format!("load tuning {:?}", path))?;
    log::info!("Loaded tuning from {:?}", path);
    Ok(tuning)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if !(args.frame_dt.is_finite() && args.frame_dt > 0.0) {
        anyhow::bail!("--frame-dt must be positive, got {}", args.frame_dt);
    }
    let tuning = load_tuning(args.config.as_ref())?;

    let world = demo_arena();
    let mut projectile = Projectile::new(Vec2::ZERO, &tuning);
    if !args.json {
        projectile.subscribe(Box::new(LogSink));
    }

    let mut script = KeyScript::new(args.seed, &tuning.bindings, args.toggle_chance);
    let mut clock = FixedStep::new(SIM_DT);

    log::info!(
        "Running {} frames (seed {}, fire mode {:?})",
        args.frames,
        args.seed,
        tuning.fire_mode
    );

    let mut input = TickInput::default();
    'frames: for _ in 0..args.frames {
        let raw = script.next_frame();
        carry_edges(&mut input, tuning.bindings.resolve(&raw));

        for _ in 0..clock.advance(args.frame_dt) {
            tick(&mut projectile, &world, &input, SIM_DT);

            if args.json {
                let line = serde_json::json!({
                    "snapshot": projectile.snapshot(),
                    "events": projectile.events(),
                });
                println!("{}", line);
            }
            if !projectile.is_alive() {
                break 'frames;
            }

            // Edges belong to the first substep only
            input.left = KeyState {
                held: input.left.held,
                ..KeyState::default()
            };
            input.right = KeyState {
                held: input.right.held,
                ..KeyState::default()
            };
        }
    }

    let snap = projectile.snapshot();
    log::info!(
        "Finished after {} ticks: alive={} position={} tethered={}",
        snap.tick,
        snap.alive,
        snap.position,
        snap.tethered
    );
    Ok(())
}
