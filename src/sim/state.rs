//! Projectile state and read-only snapshots

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grapple::Tether;
use super::input::Direction;

/// Position plus presentation facing
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectilePose {
    pub position: Vec2,
    /// Facing in radians, derived from the heading (presentation only)
    pub rotation: f32,
}

impl ProjectilePose {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
        }
    }
}

/// Everything a collaborator may read after a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub position: Vec2,
    pub heading: Vec2,
    pub rotation: f32,
    pub armed: Direction,
    pub tethered: bool,
    pub anchor: Option<Vec2>,
    pub rope_length: Option<f32>,
    pub alive: bool,
}

impl Snapshot {
    pub(crate) fn capture(
        tick: u64,
        pose: &ProjectilePose,
        heading: Vec2,
        armed: Direction,
        tether: &Tether,
        alive: bool,
    ) -> Self {
        let anchor = tether.anchor();
        Self {
            tick,
            position: pose.position,
            heading,
            rotation: pose.rotation,
            armed,
            tethered: anchor.is_some(),
            anchor: anchor.map(|a| a.point),
            rope_length: anchor.map(|a| a.rope_length),
            alive,
        }
    }

    /// Rope segment (projectile, anchor) for rendering
    pub fn rope(&self) -> Option<(Vec2, Vec2)> {
        self.anchor.map(|anchor| (self.position, anchor))
    }
}
