//! Grapple firing and the tether state machine
//!
//! A grapple is fired perpendicular to the heading whenever the armed
//! direction changes: LEFT aims +90°, RIGHT aims -90°. Any existing tether is
//! released first, so the controller never fires while latched.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::GrappleEvent;
use super::input::Direction;
use super::world::{CastHit, WorldQuery};
use crate::tuning::Tuning;
use crate::{perp_left, perp_right};

/// How the grapple probe searches for an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FireMode {
    /// One ray from the projectile
    SingleRay,
    /// Center ray plus forward- and backward-biased parallel rays
    #[default]
    TripleRay,
}

/// Latched anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub point: Vec2,
    /// Distance to the anchor at the moment of latching
    pub rope_length: f32,
}

/// Tether state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Tether {
    #[default]
    Untethered,
    Tethered(Anchor),
}

impl Tether {
    pub fn is_tethered(&self) -> bool {
        matches!(self, Tether::Tethered(_))
    }

    pub fn anchor(&self) -> Option<&Anchor> {
        match self {
            Tether::Tethered(anchor) => Some(anchor),
            Tether::Untethered => None,
        }
    }
}

/// Grapple aim for an armed side, `None` when nothing is armed
#[inline]
pub fn aim_direction(heading: Vec2, dir: Direction) -> Option<Vec2> {
    match dir {
        Direction::Left => Some(perp_left(heading)),
        Direction::Right => Some(perp_right(heading)),
        Direction::None => None,
    }
}

fn grippable(hit: Option<CastHit>) -> Option<CastHit> {
    hit.filter(|h| h.tag.is_grippable())
}

/// Pick the anchor from a triple-ray probe
///
/// Center wins outright. Otherwise the nearer of forward/backward (measured
/// from `position`), otherwise whichever side ray found grip.
pub fn select_anchor(
    position: Vec2,
    center: Option<CastHit>,
    forward: Option<CastHit>,
    backward: Option<CastHit>,
) -> Option<CastHit> {
    if let Some(hit) = grippable(center) {
        return Some(hit);
    }

    match (grippable(forward), grippable(backward)) {
        (Some(f), Some(b)) => {
            if f.point.distance_squared(position) <= b.point.distance_squared(position) {
                Some(f)
            } else {
                Some(b)
            }
        }
        (Some(f), None) => Some(f),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// Owns the tether and reacts to armed-direction changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrappleController {
    pub mode: FireMode,
    pub range: f32,
    /// Side-ray offset along the heading (triple-ray mode)
    pub offset: f32,
    tether: Tether,
}

impl GrappleController {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            mode: tuning.fire_mode,
            range: tuning.grapple_range,
            offset: tuning.grapple_offset,
            tether: Tether::Untethered,
        }
    }

    pub fn tether(&self) -> &Tether {
        &self.tether
    }

    /// Drop the tether. Returns false (and stays silent) if already free.
    pub fn release(&mut self, events: &mut Vec<GrappleEvent>) -> bool {
        if !self.tether.is_tethered() {
            return false;
        }
        self.tether = Tether::Untethered;
        events.push(GrappleEvent::Released);
        log::debug!("Grapple released");
        true
    }

    /// Release, then fire toward the newly armed side
    pub fn on_armed_change<W: WorldQuery + ?Sized>(
        &mut self,
        armed: Direction,
        position: Vec2,
        heading: Vec2,
        world: &W,
        events: &mut Vec<GrappleEvent>,
    ) {
        self.release(events);

        let Some(aim) = aim_direction(heading, armed) else {
            return;
        };
        self.fire(position, heading, aim, world, events);
    }

    fn fire<W: WorldQuery + ?Sized>(
        &mut self,
        position: Vec2,
        heading: Vec2,
        aim: Vec2,
        world: &W,
        events: &mut Vec<GrappleEvent>,
    ) {
        events.push(GrappleEvent::Fired {
            origin: position,
            direction: aim,
        });

        let hit = match self.mode {
            FireMode::SingleRay => grippable(world.cast_ray(position, aim, self.range)),
            FireMode::TripleRay => {
                let side = heading * self.offset;
                select_anchor(
                    position,
                    world.cast_ray(position, aim, self.range),
                    world.cast_ray(position + side, aim, self.range),
                    world.cast_ray(position - side, aim, self.range),
                )
            }
        };

        match hit {
            Some(hit) => {
                let anchor = Anchor {
                    point: hit.point,
                    rope_length: position.distance(hit.point),
                };
                self.tether = Tether::Tethered(anchor);
                events.push(GrappleEvent::Latched {
                    anchor: anchor.point,
                    rope_length: anchor.rope_length,
                });
                log::debug!(
                    "Grapple latched at {} (rope {:.3})",
                    anchor.point,
                    anchor.rope_length
                );
            }
            None => {
                let point = position + aim * self.range;
                events.push(GrappleEvent::Missed { point });
                log::debug!("Grapple missed toward {}", aim);
            }
        }
    }
}
