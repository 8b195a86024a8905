//! Two-key rollover input arbitration
//!
//! Folds raw LEFT/RIGHT press and release events into a single armed
//! direction. The key that goes down first owns input; a second key pressed
//! while the first is held is queued as pending and takes over on release of
//! the owner, but only if it is still physically held at that moment.

use serde::{Deserialize, Serialize};

/// Logical input side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }

    pub fn is_none(self) -> bool {
        self == Direction::None
    }
}

/// Physical keys that can be bound to a logical side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysicalKey {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    KeyA,
    KeyD,
    KeyQ,
    KeyE,
    KeyJ,
    KeyL,
    Space,
}

/// Physical key activity for one frame
#[derive(Debug, Clone, Default)]
pub struct RawInput {
    /// Keys that went down this frame
    pub pressed: Vec<PhysicalKey>,
    /// Keys that went up this frame
    pub released: Vec<PhysicalKey>,
    /// Keys currently held (includes keys pressed this frame)
    pub held: Vec<PhysicalKey>,
}

/// Edge and level state of one logical key for a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyState {
    pub down: bool,
    pub up: bool,
    pub held: bool,
}

impl KeyState {
    /// Key went down this tick
    pub fn pressed() -> Self {
        Self {
            down: true,
            up: false,
            held: true,
        }
    }

    /// Key went up this tick
    pub fn released() -> Self {
        Self {
            down: false,
            up: true,
            held: false,
        }
    }

    /// Key held with no edge
    pub fn holding() -> Self {
        Self {
            down: false,
            up: false,
            held: true,
        }
    }
}

/// Logical input for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TickInput {
    pub left: KeyState,
    pub right: KeyState,
}

impl TickInput {
    pub fn key(&self, dir: Direction) -> KeyState {
        match dir {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::None => KeyState::default(),
        }
    }
}

/// Physical key aliases for each logical side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<PhysicalKey>,
    pub right: Vec<PhysicalKey>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec![PhysicalKey::ArrowLeft, PhysicalKey::KeyA],
            right: vec![PhysicalKey::ArrowRight, PhysicalKey::KeyD],
        }
    }
}

impl KeyBindings {
    /// Fold physical key activity into logical key state (aliases are OR'd)
    pub fn resolve(&self, raw: &RawInput) -> TickInput {
        TickInput {
            left: Self::fold(&self.left, raw),
            right: Self::fold(&self.right, raw),
        }
    }

    fn fold(aliases: &[PhysicalKey], raw: &RawInput) -> KeyState {
        let any = |keys: &[PhysicalKey]| keys.iter().any(|k| aliases.contains(k));
        KeyState {
            down: any(&raw.pressed),
            up: any(&raw.released),
            held: any(&raw.held),
        }
    }
}

/// Armed direction transition produced by [`InputArbiter::arm`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmedEdge {
    pub from: Direction,
    pub to: Direction,
}

/// Rollover state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputArbiter {
    /// Who owns input now
    current_held: Direction,
    /// Who takes over if still held when the owner is released
    pending: Direction,
    /// Direction driving the grapple this tick
    armed: Direction,
    last_armed: Direction,
}

impl Default for InputArbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl InputArbiter {
    /// Nothing held, next grapple side defaults to RIGHT
    pub fn new() -> Self {
        Self {
            current_held: Direction::None,
            pending: Direction::None,
            armed: Direction::Right,
            last_armed: Direction::Right,
        }
    }

    pub fn current_held(&self) -> Direction {
        self.current_held
    }

    pub fn pending(&self) -> Direction {
        self.pending
    }

    pub fn armed(&self) -> Direction {
        self.armed
    }

    pub fn last_armed(&self) -> Direction {
        self.last_armed
    }

    /// Logical key went down
    pub fn key_down(&mut self, dir: Direction) {
        if dir.is_none() || self.current_held == dir {
            return;
        }
        if self.current_held.is_none() {
            self.current_held = dir;
            if self.pending == dir {
                self.pending = Direction::None;
            }
        } else {
            self.pending = dir;
        }
    }

    /// Logical key went up; `other_held` is the live state of the opposite key
    pub fn key_up(&mut self, dir: Direction, other_held: bool) {
        if dir.is_none() {
            return;
        }
        if self.current_held == dir {
            if self.pending == dir.opposite() && other_held {
                self.current_held = dir.opposite();
            } else {
                self.current_held = Direction::None;
            }
            self.pending = Direction::None;
        } else if self.pending == dir {
            self.pending = Direction::None;
        }
    }

    /// Latch the owner as the armed direction, reporting a change
    pub fn arm(&mut self) -> Option<ArmedEdge> {
        self.armed = self.current_held;
        let edge = (self.armed != self.last_armed).then_some(ArmedEdge {
            from: self.last_armed,
            to: self.armed,
        });
        self.last_armed = self.armed;
        edge
    }

    /// Process one tick of logical input
    ///
    /// Event order within a tick is LEFT-down, RIGHT-down, LEFT-up, RIGHT-up.
    pub fn update(&mut self, input: &TickInput) -> Option<ArmedEdge> {
        if input.left.down {
            self.key_down(Direction::Left);
        }
        if input.right.down {
            self.key_down(Direction::Right);
        }
        if input.left.up {
            self.key_up(Direction::Left, input.right.held);
        }
        if input.right.up {
            self.key_up(Direction::Right, input.left.held);
        }
        self.arm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn input(left: KeyState, right: KeyState) -> TickInput {
        TickInput { left, right }
    }

    #[test]
    fn test_initial_state() {
        let arb = InputArbiter::new();
        assert_eq!(arb.current_held(), Direction::None);
        assert_eq!(arb.pending(), Direction::None);
        assert_eq!(arb.armed(), Direction::Right);
        assert_eq!(arb.last_armed(), Direction::Right);
    }

    #[test]
    fn test_first_idle_tick_disarms() {
        let mut arb = InputArbiter::new();
        let edge = arb.update(&TickInput::default());
        assert_eq!(
            edge,
            Some(ArmedEdge {
                from: Direction::Right,
                to: Direction::None
            })
        );
        assert_eq!(arb.update(&TickInput::default()), None);
    }

    #[test]
    fn test_rollover_transfers_to_held_pending() {
        let mut arb = InputArbiter::new();
        arb.update(&TickInput::default());

        // Press LEFT
        let edge = arb.update(&input(KeyState::pressed(), KeyState::default()));
        assert_eq!(edge.map(|e| e.to), Some(Direction::Left));

        // Press RIGHT while LEFT held: LEFT stays armed
        let edge = arb.update(&input(KeyState::holding(), KeyState::pressed()));
        assert_eq!(edge, None);
        assert_eq!(arb.armed(), Direction::Left);
        assert_eq!(arb.pending(), Direction::Right);

        // Release LEFT: RIGHT takes over, exactly one edge
        let edge = arb.update(&input(KeyState::released(), KeyState::holding()));
        assert_eq!(
            edge,
            Some(ArmedEdge {
                from: Direction::Left,
                to: Direction::Right
            })
        );
        assert_eq!(arb.pending(), Direction::None);

        assert_eq!(arb.update(&input(KeyState::default(), KeyState::holding())), None);
    }

    #[test]
    fn test_releasing_pending_keeps_owner() {
        let mut arb = InputArbiter::new();
        arb.update(&input(KeyState::pressed(), KeyState::default()));
        arb.update(&input(KeyState::holding(), KeyState::pressed()));

        let edge = arb.update(&input(KeyState::holding(), KeyState::released()));
        assert_eq!(edge, None);
        assert_eq!(arb.armed(), Direction::Left);
        assert_eq!(arb.pending(), Direction::None);

        // Owner release now has nothing to hand over to
        let edge = arb.update(&input(KeyState::released(), KeyState::default()));
        assert_eq!(edge.map(|e| e.to), Some(Direction::None));
    }

    #[test]
    fn test_transfer_requires_live_hold() {
        let mut arb = InputArbiter::new();
        arb.key_down(Direction::Left);
        arb.key_down(Direction::Right);
        assert_eq!(arb.pending(), Direction::Right);

        // RIGHT is pending but no longer physically held
        arb.key_up(Direction::Left, false);
        assert_eq!(arb.current_held(), Direction::None);
        assert_eq!(arb.pending(), Direction::None);
    }

    #[test]
    fn test_same_tick_press_release_without_ownership() {
        let mut arb = InputArbiter::new();
        arb.update(&input(KeyState::pressed(), KeyState::default()));

        // RIGHT tapped within a single tick while LEFT owns
        let tap = KeyState {
            down: true,
            up: true,
            held: false,
        };
        assert_eq!(arb.update(&input(KeyState::holding(), tap)), None);
        assert_eq!(arb.armed(), Direction::Left);
        assert_eq!(arb.pending(), Direction::None);
    }

    #[test]
    fn test_alias_press_does_not_queue_owner() {
        let mut arb = InputArbiter::new();
        arb.key_down(Direction::Left);
        // Second alias of LEFT goes down while the first is held
        arb.key_down(Direction::Left);
        assert_eq!(arb.current_held(), Direction::Left);
        assert_eq!(arb.pending(), Direction::None);
    }

    #[test]
    fn test_bindings_or_aliases() {
        let bindings = KeyBindings::default();
        let raw = RawInput {
            pressed: vec![PhysicalKey::KeyA],
            released: vec![PhysicalKey::ArrowRight],
            held: vec![PhysicalKey::KeyA, PhysicalKey::KeyD],
        };
        let tick = bindings.resolve(&raw);
        assert_eq!(
            tick.left,
            KeyState {
                down: true,
                up: false,
                held: true
            }
        );
        assert_eq!(
            tick.right,
            KeyState {
                down: false,
                up: true,
                held: true
            }
        );
    }

    #[test]
    fn test_unbound_keys_ignored() {
        let bindings = KeyBindings::default();
        let raw = RawInput {
            pressed: vec![PhysicalKey::Space],
            released: vec![],
            held: vec![PhysicalKey::Space],
        };
        assert_eq!(bindings.resolve(&raw), TickInput::default());
    }

    fn key_state() -> impl Strategy<Value = KeyState> {
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(down, up, held)| KeyState {
            down,
            up,
            held,
        })
    }

    proptest! {
        #[test]
        fn prop_owner_and_pending_never_collide(
            ticks in prop::collection::vec((key_state(), key_state()), 0..64)
        ) {
            let mut arb = InputArbiter::new();
            for (left, right) in ticks {
                arb.update(&TickInput { left, right });
                prop_assert!(
                    arb.current_held().is_none() || arb.current_held() != arb.pending()
                );
                prop_assert_eq!(arb.armed(), arb.current_held());
                prop_assert_eq!(arb.armed(), arb.last_armed());
            }
        }
    }
}
