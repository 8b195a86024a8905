//! World-query collaborator interface
//!
//! The physics engine is external. The simulation only asks it two things:
//! where a swept circle first touches something, and where a ray first hits.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Surface category, decided by the collider's tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceTag {
    /// Something to hit; stops the projectile and notifies
    Target,
    /// Reflects the projectile
    RicochetWall,
    /// The only surface a grapple may latch onto
    GrippableWall,
    /// Anything else is lethal
    Wall,
}

impl SurfaceTag {
    /// Map an engine tag string to a category. Unknown tags are lethal walls.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("Target") => SurfaceTag::Target,
            Some("RicochetWall") => SurfaceTag::RicochetWall,
            Some("GrippableWall") => SurfaceTag::GrippableWall,
            _ => SurfaceTag::Wall,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceTag::Target => "Target",
            SurfaceTag::RicochetWall => "RicochetWall",
            SurfaceTag::GrippableWall => "GrippableWall",
            SurfaceTag::Wall => "Wall",
        }
    }

    #[inline]
    pub fn is_grippable(&self) -> bool {
        *self == SurfaceTag::GrippableWall
    }
}

/// First contact reported by a sweep or ray query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CastHit {
    /// Contact point on the surface
    pub point: Vec2,
    /// Unit surface normal, facing the query origin
    pub normal: Vec2,
    /// Travel distance along the query direction
    pub distance: f32,
    pub tag: SurfaceTag,
}

/// Synchronous broad-phase queries against the 2D world
pub trait WorldQuery {
    /// Sweep a circle of `radius` from `origin` along unit `direction` for `distance`
    fn sweep_circle(
        &self,
        origin: Vec2,
        radius: f32,
        direction: Vec2,
        distance: f32,
    ) -> Option<CastHit>;

    /// Cast a ray from `origin` along unit `direction` up to `max_distance`
    fn cast_ray(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<CastHit>;
}

impl<W: WorldQuery + ?Sized> WorldQuery for &W {
    fn sweep_circle(
        &self,
        origin: Vec2,
        radius: f32,
        direction: Vec2,
        distance: f32,
    ) -> Option<CastHit> {
        (**self).sweep_circle(origin, radius, direction, distance)
    }

    fn cast_ray(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<CastHit> {
        (**self).cast_ray(origin, direction, max_distance)
    }
}
