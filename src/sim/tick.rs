//! Per-frame simulation tick
//!
//! Ordering within a tick is fixed: input arbitration, grapple release/fire
//! on an armed-direction edge, motion integration against the resulting
//! tether, then dispatch of everything that happened to the subscribed sinks.

use glam::Vec2;

use super::events::{EventSink, GrappleEvent};
use super::grapple::{Anchor, GrappleController, Tether};
use super::input::{Direction, InputArbiter, TickInput};
use super::motion::{Contact, MotionSolver};
use super::state::{ProjectilePose, Snapshot};
use super::world::WorldQuery;
use crate::tuning::Tuning;

/// A single grappling projectile and everything it owns
pub struct Projectile {
    pose: ProjectilePose,
    heading: Vec2,
    arbiter: InputArbiter,
    grapple: GrappleController,
    motion: MotionSolver,
    alive: bool,
    ticks: u64,
    /// Events produced by the last tick
    events: Vec<GrappleEvent>,
    sinks: Vec<Box<dyn EventSink>>,
}

impl Projectile {
    /// Spawn at `position` heading +X
    pub fn new(position: Vec2, tuning: &Tuning) -> Self {
        Self {
            pose: ProjectilePose::at(position),
            heading: Vec2::X,
            arbiter: InputArbiter::new(),
            grapple: GrappleController::new(tuning),
            motion: MotionSolver::new(tuning),
            alive: true,
            ticks: 0,
            events: Vec::new(),
            sinks: Vec::new(),
        }
    }

    /// Override the spawn heading (normalized, ignored if zero)
    pub fn with_heading(mut self, heading: Vec2) -> Self {
        self.heading = heading.normalize_or(self.heading);
        self.pose.rotation = crate::facing_angle(self.heading);
        self
    }

    /// Register a listener; sinks are notified in registration order
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Advance one frame
    ///
    /// A dead projectile ignores ticks until [`Projectile::respawn`], but its
    /// arbiter keeps tracking the keys so a respawn starts from what is held.
    pub fn advance<W: WorldQuery + ?Sized>(&mut self, world: &W, input: &TickInput, dt: f32) {
        self.events.clear();
        let edge = self.arbiter.update(input);
        if !self.alive {
            return;
        }
        self.ticks += 1;

        if let Some(edge) = edge {
            log::trace!("Armed {:?} -> {:?}", edge.from, edge.to);
            self.grapple.on_armed_change(
                edge.to,
                self.pose.position,
                self.heading,
                world,
                &mut self.events,
            );
        }

        let contact = self.motion.step(
            &mut self.pose,
            &mut self.heading,
            self.grapple.tether(),
            world,
            dt,
            &mut self.events,
        );

        if contact == Contact::Death {
            // Rope is cut before the death notification
            let death = self.events.pop();
            self.grapple.release(&mut self.events);
            self.events.extend(death);
            self.alive = false;
        }

        self.flush();
    }

    fn flush(&mut self) {
        for sink in &mut self.sinks {
            for event in &self.events {
                sink.dispatch(event);
            }
        }
    }

    /// Bring a dead (or live) projectile back at `position`, untethered
    ///
    /// Input arbitration state is kept: keys still held stay owned.
    pub fn respawn(&mut self, position: Vec2) {
        self.events.clear();
        self.pose = ProjectilePose::at(position);
        self.heading = Vec2::X;
        self.grapple.release(&mut self.events);
        self.alive = true;
        self.flush();
        log::info!("Projectile respawned at {}", position);
    }

    /// Events produced by the last tick
    pub fn events(&self) -> &[GrappleEvent] {
        &self.events
    }

    /// Take the last tick's events
    pub fn drain_events(&mut self) -> Vec<GrappleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(
            self.ticks,
            &self.pose,
            self.heading,
            self.arbiter.armed(),
            self.grapple.tether(),
            self.alive,
        )
    }

    pub fn position(&self) -> Vec2 {
        self.pose.position
    }

    pub fn heading(&self) -> Vec2 {
        self.heading
    }

    pub fn rotation(&self) -> f32 {
        self.pose.rotation
    }

    pub fn tether(&self) -> &Tether {
        self.grapple.tether()
    }

    pub fn is_tethered(&self) -> bool {
        self.grapple.tether().is_tethered()
    }

    pub fn anchor(&self) -> Option<&Anchor> {
        self.grapple.tether().anchor()
    }

    pub fn rope_length(&self) -> Option<f32> {
        self.anchor().map(|a| a.rope_length)
    }

    pub fn armed(&self) -> Direction {
        self.arbiter.armed()
    }

    pub fn arbiter(&self) -> &InputArbiter {
        &self.arbiter
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }
}

/// Advance the projectile by one timestep
pub fn tick<W: WorldQuery + ?Sized>(
    projectile: &mut Projectile,
    world: &W,
    input: &TickInput,
    dt: f32,
) {
    projectile.advance(world, input, dt);
}
