// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note velocity: fixed level or a random draw within a dynamic marking.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Standard dynamic markings, softest to loudest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DynamicMarking {
    Pp,
    P,
    Mp,
    Mf,
    F,
    Ff,
}

impl DynamicMarking {
    pub const ALL: [DynamicMarking; 6] = [
        DynamicMarking::Pp,
        DynamicMarking::P,
        DynamicMarking::Mp,
        DynamicMarking::Mf,
        DynamicMarking::F,
        DynamicMarking::Ff,
    ];

    /// Velocity range (0.0 - 1.0) for this marking
    pub fn range(self) -> (f64, f64) {
        match self {
            DynamicMarking::Pp => (0.1, 0.25),
            DynamicMarking::P => (0.25, 0.4),
            DynamicMarking::Mp => (0.4, 0.55),
            DynamicMarking::Mf => (0.55, 0.7),
            DynamicMarking::F => (0.7, 0.85),
            DynamicMarking::Ff => (0.85, 1.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DynamicMarking::Pp => "pp",
            DynamicMarking::P => "p",
            DynamicMarking::Mp => "mp",
            DynamicMarking::Mf => "mf",
            DynamicMarking::F => "f",
            DynamicMarking::Ff => "ff",
        }
    }
}

impl fmt::Display for DynamicMarking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How note velocities are chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum VelocityMode {
    /// Every note at the same level
    Fixed(f64),
    /// Uniform draw within the marking's range
    Dynamic(DynamicMarking),
}

impl Default for VelocityMode {
    fn default() -> Self {
        VelocityMode::Fixed(0.8)
    }
}

impl VelocityMode {
    /// Velocity for the next note, always within 0.0 - 1.0
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let velocity = match *self {
            VelocityMode::Fixed(v) if v.is_finite() => v,
            VelocityMode::Fixed(_) => 0.8,
            VelocityMode::Dynamic(marking) => {
                let (low, high) = marking.range();
                rng.gen_range(low..=high)
            }
        };
        velocity.clamp(0.0, 1.0)
    }
}

/// Scale a 0.0 - 1.0 velocity to MIDI 1-127
pub fn to_midi_velocity(velocity: f64) -> u8 {
    if !velocity.is_finite() {
        return 1;
    }
    (velocity * 127.0).round().clamp(1.0, 127.0) as u8
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_fixed_velocity() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(VelocityMode::Fixed(0.6).sample(&mut rng), 0.6);
        assert_eq!(VelocityMode::Fixed(1.7).sample(&mut rng), 1.0);
        assert_eq!(VelocityMode::Fixed(f64::NAN).sample(&mut rng), 0.8);
    }

    #[test]
    fn test_dynamic_velocity_within_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for marking in DynamicMarking::ALL {
            let (low, high) = marking.range();
            for _ in 0..100 {
                let v = VelocityMode::Dynamic(marking).sample(&mut rng);
                assert!(v >= low && v <= high, "{} out of range for {}", v, marking);
            }
        }
    }

    #[test]
    fn test_midi_velocity_scaling() {
        assert_eq!(to_midi_velocity(1.0), 127);
        assert_eq!(to_midi_velocity(0.5), 64);
        assert_eq!(to_midi_velocity(0.0), 1);
        assert_eq!(to_midi_velocity(3.0), 127);
    }

    #[test]
    fn test_velocity_mode_yaml() {
        let mode: VelocityMode = serde_yaml::from_str("mode: dynamic\nvalue: mf\n").unwrap();
        assert_eq!(mode, VelocityMode::Dynamic(DynamicMarking::Mf));
        let mode: VelocityMode = serde_yaml::from_str("mode: fixed\nvalue: 0.5\n").unwrap();
        assert_eq!(mode, VelocityMode::Fixed(0.5));
    }
}
