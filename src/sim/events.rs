//! Notifications produced by the simulation
//!
//! Audio, rope rendering and game flow subscribe through [`EventSink`]; the
//! core never calls into them directly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Something observable happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GrappleEvent {
    /// A grapple probe was fired (always emitted, hit or miss)
    Fired { origin: Vec2, direction: Vec2 },
    /// The probe found a grippable anchor
    Latched { anchor: Vec2, rope_length: f32 },
    /// Nothing grippable in range; `point` is the ray's far end
    Missed { point: Vec2 },
    /// An existing tether was let go
    Released,
    /// Projectile stopped against a target
    TargetHit { point: Vec2, normal: Vec2 },
    /// Projectile bounced off a ricochet surface
    Ricochet { point: Vec2, normal: Vec2 },
    /// Projectile hit a lethal surface
    Death { point: Vec2, normal: Vec2 },
}

/// Listener for simulation notifications
///
/// Every hook defaults to a no-op so a listener only implements what it needs.
pub trait EventSink {
    fn on_grapple_fired(&mut self, _origin: Vec2, _direction: Vec2) {}
    fn on_grapple_latched(&mut self, _anchor: Vec2, _rope_length: f32) {}
    fn on_grapple_missed(&mut self, _point: Vec2) {}
    fn on_grapple_released(&mut self) {}
    fn on_target_hit(&mut self, _point: Vec2, _normal: Vec2) {}
    fn on_ricochet(&mut self, _point: Vec2, _normal: Vec2) {}
    fn on_death(&mut self) {}

    /// Route an event to its hook
    fn dispatch(&mut self, event: &GrappleEvent) {
        match *event {
            GrappleEvent::Fired { origin, direction } => self.on_grapple_fired(origin, direction),
            GrappleEvent::Latched {
                anchor,
                rope_length,
            } => self.on_grapple_latched(anchor, rope_length),
            GrappleEvent::Missed { point } => self.on_grapple_missed(point),
            GrappleEvent::Released => self.on_grapple_released(),
            GrappleEvent::TargetHit { point, normal } => self.on_target_hit(point, normal),
            GrappleEvent::Ricochet { point, normal } => self.on_ricochet(point, normal),
            GrappleEvent::Death { .. } => self.on_death(),
        }
    }
}

/// Queue sink: records every event in order
impl EventSink for Vec<GrappleEvent> {
    fn dispatch(&mut self, event: &GrappleEvent) {
        self.push(*event);
    }
}

/// Channel sink: forwards events to a receiver owned elsewhere
impl EventSink for std::sync::mpsc::Sender<GrappleEvent> {
    fn dispatch(&mut self, event: &GrappleEvent) {
        // A dropped receiver just means nobody is listening any more
        let _ = self.send(*event);
    }
}

/// Writes every notification to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn on_grapple_fired(&mut self, origin: Vec2, direction: Vec2) {
        log::debug!("Grapple fired from {} toward {}", origin, direction);
    }

    fn on_grapple_latched(&mut self, anchor: Vec2, rope_length: f32) {
        log::debug!("Grapple latched at {} (rope {:.3})", anchor, rope_length);
    }

    fn on_grapple_missed(&mut self, point: Vec2) {
        log::debug!("Grapple missed, ray ended at {}", point);
    }

    fn on_grapple_released(&mut self) {
        log::debug!("Grapple released");
    }

    fn on_target_hit(&mut self, point: Vec2, _normal: Vec2) {
        log::info!("Target hit at {}", point);
    }

    fn on_ricochet(&mut self, point: Vec2, normal: Vec2) {
        log::debug!("Ricochet at {} (normal {})", point, normal);
    }

    fn on_death(&mut self) {
        log::info!("Projectile died");
    }
}
