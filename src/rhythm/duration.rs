// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Duration codec between step counts and notated durations.
//!
//! Notated durations follow the "4n" / "8n." / "8t" convention. Step counts
//! with no notated equivalent are encoded as raw ticks ("T<ticks>") so the
//! codec never fails.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Ticks per quarter note
pub const PPQ: u32 = 192;

/// Ticks in one 4/4 bar
pub const TICKS_PER_BAR: u32 = PPQ * 4;

/// Prefix of the tick-based encoding
const TICK_PREFIX: char = 'T';

/// Notated durations and their length in ticks
const NOTATION_TICKS: [(&str, u32); 17] = [
    ("1n.", PPQ * 6),
    ("1n", PPQ * 4),
    ("2n.", PPQ * 3),
    ("2n", PPQ * 2),
    ("2t", PPQ * 4 / 3),
    ("4n.", PPQ * 3 / 2),
    ("4n", PPQ),
    ("4t", PPQ * 2 / 3),
    ("8n.", PPQ * 3 / 4),
    ("8n", PPQ / 2),
    ("8t", PPQ / 3),
    ("16n.", PPQ * 3 / 8),
    ("16n", PPQ / 4),
    ("16t", PPQ / 6),
    ("32n", PPQ / 8),
    ("32t", PPQ / 12),
    ("64n", PPQ / 16),
];

/// Rhythmic grid unit defining one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Subdivision {
    Whole,
    Half,
    Quarter,
    Eighth,
    #[default]
    Sixteenth,
    ThirtySecond,
}

impl Subdivision {
    /// Parse a subdivision string ("4n", "8n", "16n", ...)
    pub fn try_parse(s: &str) -> Option<Self> {
        match s.trim() {
            "1n" | "1m" => Some(Subdivision::Whole),
            "2n" => Some(Subdivision::Half),
            "4n" => Some(Subdivision::Quarter),
            "8n" => Some(Subdivision::Eighth),
            "16n" => Some(Subdivision::Sixteenth),
            "32n" => Some(Subdivision::ThirtySecond),
            _ => None,
        }
    }

    /// Parse a subdivision string, falling back to sixteenths
    pub fn parse(s: &str) -> Self {
        Self::try_parse(s).unwrap_or_else(|| {
            warn!(subdivision = s, "Unknown subdivision, falling back to 16n");
            Subdivision::Sixteenth
        })
    }

    /// Notation of a single step
    pub fn as_str(self) -> &'static str {
        match self {
            Subdivision::Whole => "1n",
            Subdivision::Half => "2n",
            Subdivision::Quarter => "4n",
            Subdivision::Eighth => "8n",
            Subdivision::Sixteenth => "16n",
            Subdivision::ThirtySecond => "32n",
        }
    }

    /// Length of one step in ticks
    pub fn ticks_per_step(self) -> u32 {
        match self {
            Subdivision::Whole => PPQ * 4,
            Subdivision::Half => PPQ * 2,
            Subdivision::Quarter => PPQ,
            Subdivision::Eighth => PPQ / 2,
            Subdivision::Sixteenth => PPQ / 4,
            Subdivision::ThirtySecond => PPQ / 8,
        }
    }

    /// Steps in one 4/4 bar
    pub fn steps_per_bar(self) -> usize {
        (TICKS_PER_BAR / self.ticks_per_step()) as usize
    }
}

impl From<String> for Subdivision {
    fn from(s: String) -> Self {
        Subdivision::parse(&s)
    }
}

impl From<Subdivision> for String {
    fn from(s: Subdivision) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for Subdivision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Encode a tick count in the fallback notation
pub fn ticks_to_string(ticks: u32) -> String {
    format!("{}{}", TICK_PREFIX, ticks)
}

/// Length in ticks of a notated or tick-encoded duration
pub fn duration_ticks(duration: &str) -> Option<u32> {
    let duration = duration.trim();
    if let Some(raw) = duration.strip_prefix(TICK_PREFIX) {
        return raw.parse::<u32>().ok().filter(|&t| t > 0);
    }
    NOTATION_TICKS
        .iter()
        .find(|(name, _)| *name == duration)
        .map(|&(_, ticks)| ticks)
}

/// Convert a step count to a duration string.
///
/// Zero steps are treated as one step.
pub fn steps_to_duration(steps: usize, subdivision: Subdivision) -> String {
    let steps = steps.max(1) as u32;
    let ticks = steps * subdivision.ticks_per_step();
    NOTATION_TICKS
        .iter()
        .find(|&&(_, t)| t == ticks)
        .map(|&(name, _)| name.to_string())
        .unwrap_or_else(|| ticks_to_string(ticks))
}

/// Convert a duration string to a step count (at least 1).
///
/// Unrecognized notation falls back to a single step.
pub fn duration_to_steps(duration: &str, subdivision: Subdivision) -> usize {
    match duration_ticks(duration) {
        Some(ticks) => {
            let tps = subdivision.ticks_per_step();
            let steps = (ticks + tps / 2) / tps;
            (steps as usize).max(1)
        }
        None => {
            warn!(duration, "Unrecognized duration notation, using one step");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_SUBDIVISIONS: [Subdivision; 6] = [
        Subdivision::Whole,
        Subdivision::Half,
        Subdivision::Quarter,
        Subdivision::Eighth,
        Subdivision::Sixteenth,
        Subdivision::ThirtySecond,
    ];

    #[test]
    fn test_sixteenth_table() {
        let sub = Subdivision::Sixteenth;
        assert_eq!(steps_to_duration(1, sub), "16n");
        assert_eq!(steps_to_duration(2, sub), "8n");
        assert_eq!(steps_to_duration(3, sub), "8n.");
        assert_eq!(steps_to_duration(4, sub), "4n");
        assert_eq!(steps_to_duration(6, sub), "4n.");
        assert_eq!(steps_to_duration(8, sub), "2n");
        assert_eq!(steps_to_duration(16, sub), "1n");
    }

    #[test]
    fn test_irregular_steps_use_ticks() {
        assert_eq!(steps_to_duration(5, Subdivision::Sixteenth), "T240");
        assert_eq!(steps_to_duration(7, Subdivision::Eighth), "T672");
        assert_eq!(duration_ticks("T240"), Some(240));
        assert_eq!(duration_to_steps("T240", Subdivision::Sixteenth), 5);
    }

    #[test]
    fn test_zero_steps_clamped() {
        assert_eq!(steps_to_duration(0, Subdivision::Quarter), "4n");
    }

    #[test]
    fn test_round_trip_every_subdivision() {
        for sub in ALL_SUBDIVISIONS {
            for steps in 1..=sub.steps_per_bar() * 2 {
                let encoded = steps_to_duration(steps, sub);
                assert!(duration_ticks(&encoded).is_some(), "{} unparseable", encoded);
                assert_eq!(duration_to_steps(&encoded, sub), steps, "{} under {}", encoded, sub);
            }
        }
    }

    #[test]
    fn test_unknown_duration_falls_back() {
        assert_eq!(duration_ticks("7q"), None);
        assert_eq!(duration_ticks("T0"), None);
        assert_eq!(duration_to_steps("7q", Subdivision::Sixteenth), 1);
    }

    #[test]
    fn test_subdivision_parse() {
        assert_eq!(Subdivision::parse("8n"), Subdivision::Eighth);
        assert_eq!(Subdivision::parse("4n"), Subdivision::Quarter);
        assert_eq!(Subdivision::parse("12n"), Subdivision::Sixteenth);
        assert_eq!(Subdivision::try_parse("12n"), None);
    }

    #[test]
    fn test_steps_per_bar() {
        assert_eq!(Subdivision::Quarter.steps_per_bar(), 4);
        assert_eq!(Subdivision::Eighth.steps_per_bar(), 8);
        assert_eq!(Subdivision::Sixteenth.steps_per_bar(), 16);
        assert_eq!(Subdivision::Whole.steps_per_bar(), 1);
    }
}
