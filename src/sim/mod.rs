//! Tick-driven projectile simulation
//!
//! All gameplay logic lives here. This module is engine-free:
//! - One explicit `advance(dt)` per frame, driven by the caller's loop
//! - World queries go through the injected [`WorldQuery`]
//! - Notifications go out through [`EventSink`], never direct calls
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod events;
pub mod grapple;
pub mod input;
pub mod motion;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{SegmentWorld, Wall};
pub use events::{EventSink, GrappleEvent, LogSink};
pub use grapple::{Anchor, FireMode, GrappleController, Tether, aim_direction, select_anchor};
pub use input::{
    ArmedEdge, Direction, InputArbiter, KeyBindings, KeyState, PhysicalKey, RawInput, TickInput,
};
pub use motion::{Contact, MotionSolver, reclamp, tangent_lock};
pub use state::{ProjectilePose, Snapshot};
pub use tick::{Projectile, tick};
pub use world::{CastHit, SurfaceTag, WorldQuery};
