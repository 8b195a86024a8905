//! Gameplay tuning parameters
//!
//! Injected into the projectile at construction time. Loadable from JSON;
//! missing fields fall back to the defaults in [`crate::consts`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::grapple::FireMode;
use crate::sim::input::KeyBindings;

/// Projectile and grapple parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Motion ===
    /// Travel speed while untethered (units/sec)
    pub speed: f32,
    /// Travel speed while swinging on a tether (units/sec)
    pub tethered_speed: f32,
    /// Radius of the swept circle
    pub radius: f32,
    /// Offset along the hit normal after a collision
    pub skin: f32,

    // === Grapple ===
    /// Maximum grapple ray length
    pub grapple_range: f32,
    /// Forward/backward offset of the side rays in triple-ray mode
    pub grapple_offset: f32,
    pub fire_mode: FireMode,
    /// Squared anchor distance treated as degenerate
    pub degenerate_epsilon: f32,

    // === Input ===
    pub bindings: KeyBindings,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            speed: SPEED,
            tethered_speed: TETHERED_SPEED,
            radius: SWEEP_RADIUS,
            skin: SKIN,

            grapple_range: GRAPPLE_RANGE,
            grapple_offset: GRAPPLE_OFFSET,
            fire_mode: FireMode::TripleRay,
            degenerate_epsilon: DEGENERATE_EPSILON,

            bindings: KeyBindings::default(),
        }
    }
}

/// Rejected tuning value
#[derive(Debug)]
pub enum TuningError {
    /// JSON could not be parsed
    Parse(serde_json::Error),
    /// Field must be finite and > 0
    NotPositive { field: &'static str, value: f32 },
    /// Field must be finite and >= 0
    Negative { field: &'static str, value: f32 },
    /// A logical key has no physical key bound
    UnboundKey(&'static str),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "invalid tuning json: {}", e),
            TuningError::NotPositive { field, value } => {
                write!(f, "{} must be a positive number, got {}", field, value)
            }
            TuningError::Negative { field, value } => {
                write!(f, "{} must not be negative, got {}", field, value)
            }
            TuningError::UnboundKey(side) => write!(f, "no keys bound to {}", side),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

impl Tuning {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> String {
        // Plain data with string keys, serialization can't fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Check every field is usable by the solver
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("speed", self.speed),
            ("tethered_speed", self.tethered_speed),
            ("radius", self.radius),
            ("grapple_range", self.grapple_range),
            ("degenerate_epsilon", self.degenerate_epsilon),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        let non_negative = [("skin", self.skin), ("grapple_offset", self.grapple_offset)];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(TuningError::Negative { field, value });
            }
        }

        if self.bindings.left.is_empty() {
            return Err(TuningError::UnboundKey("left"));
        }
        if self.bindings.right.is_empty() {
            return Err(TuningError::UnboundKey("right"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::PhysicalKey;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.grapple_range, 12.0);
        assert_eq!(tuning.fire_mode, FireMode::TripleRay);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning = Tuning::from_json(r#"{ "speed": 4.0, "fire_mode": "SingleRay" }"#).unwrap();
        assert_eq!(tuning.speed, 4.0);
        assert_eq!(tuning.fire_mode, FireMode::SingleRay);
        assert_eq!(tuning.tethered_speed, TETHERED_SPEED);
        assert_eq!(tuning.bindings, KeyBindings::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut tuning = Tuning::default();
        tuning.grapple_offset = 0.25;
        tuning.bindings.left = vec![PhysicalKey::KeyQ];
        let parsed = Tuning::from_json(&tuning.to_json()).unwrap();
        assert_eq!(parsed, tuning);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "radius": 0.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::NotPositive { field: "radius", .. }));

        let err = Tuning::from_json(r#"{ "skin": -0.5 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Negative { field: "skin", .. }));

        let err = Tuning::from_json(r#"{ "bindings": { "left": [], "right": ["KeyD"] } }"#)
            .unwrap_err();
        assert!(matches!(err, TuningError::UnboundKey("left")));
        assert_eq!(err.to_string(), "no keys bound to left");
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ speed: ").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }
}
