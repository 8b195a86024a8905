//! Reference world: static tagged line segments
//!
//! A small continuous-collision backend implementing [`WorldQuery`] so the
//! simulation can run headless (tests, demo driver) without an engine.
//!
//! Circle sweeps use the Minkowski view: a circle of radius r hitting a
//! segment is the circle's center hitting the segment inflated by r, i.e. two
//! offset faces plus a round cap at each endpoint.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::world::{CastHit, SurfaceTag, WorldQuery};
use crate::perp_left;

const PARALLEL_EPS: f32 = 1.0e-8;

/// A tagged line segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub start: Vec2,
    pub end: Vec2,
    pub tag: SurfaceTag,
}

impl Wall {
    pub fn new(start: Vec2, end: Vec2, tag: SurfaceTag) -> Self {
        Self { start, end, tag }
    }

    /// Closest point on the segment to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let seg = self.end - self.start;
        let len_sq = seg.length_squared();
        if len_sq < PARALLEL_EPS {
            return self.start; // Degenerate segment
        }
        let t = ((p - self.start).dot(seg) / len_sq).clamp(0.0, 1.0);
        self.start + seg * t
    }

    /// Unit normal of the segment's line on the side of `p`
    fn normal_toward(&self, p: Vec2) -> Option<Vec2> {
        let n = perp_left(self.end - self.start).try_normalize()?;
        Some(if n.dot(p - self.start) >= 0.0 { n } else { -n })
    }

    /// Ray vs segment, nearest hit within `max_distance`
    pub fn ray_hit(&self, origin: Vec2, dir: Vec2, max_distance: f32) -> Option<CastHit> {
        let seg = self.end - self.start;
        let denom = dir.perp_dot(seg);
        if denom.abs() < PARALLEL_EPS {
            return None; // Parallel or degenerate
        }

        let to_start = self.start - origin;
        let t = to_start.perp_dot(seg) / denom;
        let s = to_start.perp_dot(dir) / denom;
        if t < 0.0 || t > max_distance || !(0.0..=1.0).contains(&s) {
            return None;
        }

        let normal = perp_left(seg).normalize();
        let normal = if normal.dot(dir) > 0.0 { -normal } else { normal };
        Some(CastHit {
            point: origin + dir * t,
            normal,
            distance: t,
            tag: self.tag,
        })
    }

    /// Circle sweep vs segment
    ///
    /// A circle that starts overlapping the segment only reports a hit while
    /// it is moving deeper; one moving away is let go so a bounced projectile
    /// can leave the surface it was nudged onto.
    pub fn sweep_hit(
        &self,
        center: Vec2,
        radius: f32,
        dir: Vec2,
        distance: f32,
    ) -> Option<CastHit> {
        if let Some(hit) = self.initial_overlap(center, radius, dir) {
            return Some(hit);
        }

        let face = self.face_hit(center, radius, dir, distance);
        let caps = [self.start, self.end]
            .into_iter()
            .filter_map(|p| cap_hit(p, center, radius, dir, distance));

        face.into_iter()
            .chain(caps)
            .map(|h| CastHit { tag: self.tag, ..h })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn initial_overlap(&self, center: Vec2, radius: f32, dir: Vec2) -> Option<CastHit> {
        let closest = self.closest_point(center);
        let offset = center - closest;
        let dist = offset.length();
        if dist >= radius {
            return None;
        }

        let normal = if dist > PARALLEL_EPS {
            offset / dist
        } else {
            // Center sits on the segment: push back against the motion
            let n = perp_left(self.end - self.start).try_normalize()?;
            if n.dot(dir) > 0.0 { -n } else { n }
        };
        if dir.dot(normal) >= 0.0 {
            return None;
        }

        Some(CastHit {
            point: closest,
            normal,
            distance: 0.0,
            tag: self.tag,
        })
    }

    fn face_hit(&self, center: Vec2, radius: f32, dir: Vec2, distance: f32) -> Option<CastHit> {
        let normal = self.normal_toward(center)?;
        let approach = dir.dot(normal);
        if approach >= 0.0 {
            return None;
        }

        let gap = normal.dot(center - self.start) - radius;
        let t = gap / -approach;
        if !(0.0..=distance).contains(&t) {
            return None;
        }

        let contact = center + dir * t - normal * radius;
        let seg = self.end - self.start;
        let s = (contact - self.start).dot(seg) / seg.length_squared();
        if !(0.0..=1.0).contains(&s) {
            return None; // Past an endpoint, the caps handle it
        }

        Some(CastHit {
            point: contact,
            normal,
            distance: t,
            tag: self.tag,
        })
    }
}

/// Moving circle vs a segment endpoint
fn cap_hit(point: Vec2, center: Vec2, radius: f32, dir: Vec2, distance: f32) -> Option<CastHit> {
    let m = center - point;
    let b = m.dot(dir);
    let c = m.length_squared() - radius * radius;
    if c > 0.0 && b > 0.0 {
        return None; // Outside and moving away
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    let t = -b - disc.sqrt();
    if t < 0.0 || t > distance {
        return None;
    }

    let normal = (center + dir * t - point).try_normalize()?;
    Some(CastHit {
        point,
        normal,
        distance: t,
        tag: SurfaceTag::Wall,
    })
}

/// Static collection of tagged walls
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentWorld {
    pub walls: Vec<Wall>,
}

impl SegmentWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wall(mut self, start: Vec2, end: Vec2, tag: SurfaceTag) -> Self {
        self.walls.push(Wall::new(start, end, tag));
        self
    }

    /// Axis-aligned box of four walls sharing one tag
    pub fn with_box(self, min: Vec2, max: Vec2, tag: SurfaceTag) -> Self {
        let top_left = Vec2::new(min.x, max.y);
        let bottom_right = Vec2::new(max.x, min.y);
        self.with_wall(min, bottom_right, tag)
            .with_wall(bottom_right, max, tag)
            .with_wall(max, top_left, tag)
            .with_wall(top_left, min, tag)
    }
}

impl WorldQuery for SegmentWorld {
    fn sweep_circle(
        &self,
        origin: Vec2,
        radius: f32,
        direction: Vec2,
        distance: f32,
    ) -> Option<CastHit> {
        self.walls
            .iter()
            .filter_map(|w| w.sweep_hit(origin, radius, direction, distance))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn cast_ray(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<CastHit> {
        self.walls
            .iter()
            .filter_map(|w| w.ray_hit(origin, direction, max_distance))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_wall(x: f32, tag: SurfaceTag) -> Wall {
        Wall::new(Vec2::new(x, -5.0), Vec2::new(x, 5.0), tag)
    }

    #[test]
    fn test_ray_hits_segment() {
        let wall = vertical_wall(3.0, SurfaceTag::GrippableWall);
        let hit = wall.ray_hit(Vec2::ZERO, Vec2::X, 10.0).unwrap();
        assert!((hit.distance - 3.0).abs() < 1e-5);
        assert!((hit.point - Vec2::new(3.0, 0.0)).length() < 1e-5);
        assert_eq!(hit.normal, -Vec2::X);
        assert_eq!(hit.tag, SurfaceTag::GrippableWall);
    }

    #[test]
    fn test_ray_out_of_range_or_behind() {
        let wall = vertical_wall(3.0, SurfaceTag::Wall);
        assert!(wall.ray_hit(Vec2::ZERO, Vec2::X, 2.0).is_none());
        assert!(wall.ray_hit(Vec2::ZERO, -Vec2::X, 10.0).is_none());
        // Parallel
        assert!(wall.ray_hit(Vec2::ZERO, Vec2::Y, 10.0).is_none());
        // Misses past the segment end
        assert!(wall.ray_hit(Vec2::new(0.0, 6.0), Vec2::X, 10.0).is_none());
    }

    #[test]
    fn test_sweep_face_contact() {
        let wall = vertical_wall(3.0, SurfaceTag::RicochetWall);
        let hit = wall.sweep_hit(Vec2::ZERO, 0.5, Vec2::X, 10.0).unwrap();
        // Center stops one radius short of the wall
        assert!((hit.distance - 2.5).abs() < 1e-5);
        assert!((hit.point - Vec2::new(3.0, 0.0)).length() < 1e-5);
        assert!((hit.normal - -Vec2::X).length() < 1e-5);
        assert_eq!(hit.tag, SurfaceTag::RicochetWall);
    }

    #[test]
    fn test_sweep_short_of_wall() {
        let wall = vertical_wall(3.0, SurfaceTag::Wall);
        assert!(wall.sweep_hit(Vec2::ZERO, 0.5, Vec2::X, 2.0).is_none());
    }

    #[test]
    fn test_sweep_clips_endpoint_cap() {
        // Passes just above the top endpoint at (3, 5)
        let wall = vertical_wall(3.0, SurfaceTag::Target);
        let hit = wall
            .sweep_hit(Vec2::new(0.0, 5.3), 0.5, Vec2::X, 10.0)
            .unwrap();
        assert_eq!(hit.point, Vec2::new(3.0, 5.0));
        assert_eq!(hit.tag, SurfaceTag::Target);
        assert!(hit.normal.x < 0.0 && hit.normal.y > 0.0);
        assert!((hit.normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_sweep_overlapping_start() {
        let wall = vertical_wall(3.0, SurfaceTag::RicochetWall);
        let nudged = Vec2::new(2.99, 0.0);

        // Moving into the wall: immediate contact
        let hit = wall.sweep_hit(nudged, 0.1, Vec2::X, 1.0).unwrap();
        assert_eq!(hit.distance, 0.0);
        assert!((hit.normal - -Vec2::X).length() < 1e-5);

        // Moving away after a bounce: free to leave
        assert!(wall.sweep_hit(nudged, 0.1, -Vec2::X, 1.0).is_none());
    }

    #[test]
    fn test_world_picks_nearest() {
        let world = SegmentWorld::new()
            .with_wall(Vec2::new(5.0, -1.0), Vec2::new(5.0, 1.0), SurfaceTag::Wall)
            .with_wall(
                Vec2::new(2.0, -1.0),
                Vec2::new(2.0, 1.0),
                SurfaceTag::GrippableWall,
            );
        let hit = world.cast_ray(Vec2::ZERO, Vec2::X, 10.0).unwrap();
        assert_eq!(hit.tag, SurfaceTag::GrippableWall);

        let hit = world.sweep_circle(Vec2::ZERO, 0.1, Vec2::X, 10.0).unwrap();
        assert_eq!(hit.tag, SurfaceTag::GrippableWall);
        assert!((hit.distance - 1.9).abs() < 1e-5);
    }

    #[test]
    fn test_box_encloses() {
        let world =
            SegmentWorld::new().with_box(Vec2::splat(-2.0), Vec2::splat(2.0), SurfaceTag::Wall);
        assert_eq!(world.walls.len(), 4);
        for dir in [Vec2::X, Vec2::Y, -Vec2::X, -Vec2::Y] {
            let hit = world.cast_ray(Vec2::ZERO, dir, 10.0).unwrap();
            assert!((hit.distance - 2.0).abs() < 1e-5);
            assert!((hit.normal + dir).length() < 1e-5);
        }
    }
}
