//! Grapple Bullet - motion and tethering core for a 2D grappling projectile
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (input rollover, grapple, motion, events)
//! - `tuning`: Injected gameplay parameters

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the demo driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Squared radius below which an anchor counts as coincident with the projectile
    pub const DEGENERATE_EPSILON: f32 = 1.0e-4;

    /// Projectile defaults
    pub const SPEED: f32 = 8.0;
    /// Tethered motion feels slower at the same speed, so it gets a small boost
    pub const TETHERED_SPEED: f32 = 9.0;
    pub const SWEEP_RADIUS: f32 = 0.1;
    pub const SKIN: f32 = 0.01;

    /// Grapple defaults
    pub const GRAPPLE_RANGE: f32 = 12.0;
    pub const GRAPPLE_OFFSET: f32 = 0.5;
}

/// Rotate a vector +90° (counter-clockwise)
#[inline]
pub fn perp_left(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Rotate a vector -90° (clockwise)
#[inline]
pub fn perp_right(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

/// Reflect a direction off a surface with the given unit normal
#[inline]
pub fn reflect(dir: Vec2, normal: Vec2) -> Vec2 {
    dir - 2.0 * dir.dot(normal) * normal
}

/// Facing rotation (radians) for a heading
#[inline]
pub fn facing_angle(heading: Vec2) -> f32 {
    heading.y.atan2(heading.x)
}

/// Fixed timestep accumulator for a caller-owned frame loop
#[derive(Debug, Clone)]
pub struct FixedStep {
    pub dt: f32,
    pub max_substeps: u32,
    accumulator: f32,
}

impl FixedStep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            max_substeps: consts::MAX_SUBSTEPS,
            accumulator: 0.0,
        }
    }

    /// Feed elapsed frame time, returns how many fixed steps to run
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.min(0.1);

        let mut steps = 0;
        while self.accumulator >= self.dt && steps < self.max_substeps {
            self.accumulator -= self.dt;
            steps += 1;
        }
        // Drop the backlog once the substep cap is hit
        if steps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.dt);
        }
        steps
    }
}
