//! Per-tick projectile integration
//!
//! Each tick: lock the heading to the tether tangent, sweep the projectile
//! circle along the heading, resolve whatever it touched by surface tag, then
//! snap back onto the rope circle.
//!
//! The sweep is a straight line even while swinging, and the re-clamp pulls
//! the result back onto the arc. At high angular speed the chord can cut
//! through geometry thinner than the arc sagitta; no circular sweep exists in
//! the world-query interface to do better.

use glam::Vec2;

use super::events::GrappleEvent;
use super::grapple::{Anchor, Tether};
use super::state::ProjectilePose;
use super::world::{SurfaceTag, WorldQuery};
use crate::tuning::Tuning;
use crate::{facing_angle, perp_left, perp_right, reflect};

/// What the sweep ran into this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Moved freely
    Clear,
    Target,
    Ricochet,
    /// Lethal surface
    Death,
}

/// Tangent of the rope circle closest to `heading`
///
/// Returns `None` when the projectile sits on the anchor. Ties go to the +90°
/// tangent so repeated calls never alternate.
pub fn tangent_lock(heading: Vec2, position: Vec2, anchor: Vec2, epsilon: f32) -> Option<Vec2> {
    let arc_radius = position - anchor;
    if arc_radius.length_squared() <= epsilon {
        return None;
    }

    let t_left = perp_left(arc_radius).normalize();
    let t_right = perp_right(arc_radius).normalize();
    Some(if heading.dot(t_left) >= heading.dot(t_right) {
        t_left
    } else {
        t_right
    })
}

/// Point on the rope circle nearest `position`, `None` if degenerate
pub fn reclamp(position: Vec2, anchor: &Anchor, epsilon: f32) -> Option<Vec2> {
    let arc_radius = position - anchor.point;
    if arc_radius.length_squared() <= epsilon {
        return None;
    }
    Some(anchor.point + arc_radius.normalize() * anchor.rope_length)
}

/// Sweeps the projectile through the world
#[derive(Debug, Clone, PartialEq)]
pub struct MotionSolver {
    pub speed: f32,
    pub tethered_speed: f32,
    pub radius: f32,
    pub skin: f32,
    pub degenerate_epsilon: f32,
}

impl MotionSolver {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            speed: tuning.speed,
            tethered_speed: tuning.tethered_speed,
            radius: tuning.radius,
            skin: tuning.skin,
            degenerate_epsilon: tuning.degenerate_epsilon,
        }
    }

    /// Advance pose and heading by `dt` under the given tether
    pub fn step<W: WorldQuery + ?Sized>(
        &self,
        pose: &mut ProjectilePose,
        heading: &mut Vec2,
        tether: &Tether,
        world: &W,
        dt: f32,
        events: &mut Vec<GrappleEvent>,
    ) -> Contact {
        let anchor = tether.anchor();

        if let Some(anchor) = anchor {
            match tangent_lock(*heading, pose.position, anchor.point, self.degenerate_epsilon) {
                Some(tangent) => *heading = tangent,
                None => log::warn!("Anchor coincides with projectile, skipping tangent lock"),
            }
        }

        let speed = if anchor.is_some() {
            self.tethered_speed
        } else {
            self.speed
        };
        let travel = speed * dt;

        let contact = match world.sweep_circle(pose.position, self.radius, *heading, travel) {
            None => {
                pose.position += *heading * travel;
                Contact::Clear
            }
            Some(hit) => {
                pose.position = hit.point + hit.normal * self.skin;
                match hit.tag {
                    SurfaceTag::Target => {
                        events.push(GrappleEvent::TargetHit {
                            point: hit.point,
                            normal: hit.normal,
                        });
                        Contact::Target
                    }
                    SurfaceTag::RicochetWall => {
                        *heading = reflect(*heading, hit.normal).normalize_or(*heading);
                        events.push(GrappleEvent::Ricochet {
                            point: hit.point,
                            normal: hit.normal,
                        });
                        log::debug!("Ricochet at {}, new heading {}", hit.point, heading);
                        Contact::Ricochet
                    }
                    SurfaceTag::GrippableWall | SurfaceTag::Wall => {
                        events.push(GrappleEvent::Death {
                            point: hit.point,
                            normal: hit.normal,
                        });
                        log::info!("Projectile hit a {} at {}", hit.tag.as_str(), hit.point);
                        Contact::Death
                    }
                }
            }
        };

        // A dead projectile stays where it hit
        if contact != Contact::Death {
            if let Some(anchor) = anchor {
                if let Some(snapped) = reclamp(pose.position, anchor, self.degenerate_epsilon) {
                    pose.position = snapped;
                }
            }
        }

        *heading = heading.normalize_or(Vec2::X);
        pose.rotation = facing_angle(*heading);
        contact
    }
}
