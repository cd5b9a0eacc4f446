// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Conversion of raw rhythm inputs into a [`UnifiedRhythm`].
//!
//! Three input shapes are supported:
//!
//! - **Preset**: an ordered list of notated durations ("4n", "8n."), with an
//!   optional `r` prefix marking a rest ("r8n").
//! - **Euclidean**: a binary pulse array, one slot per step.
//! - **Sequencer**: decimal slot values; a positive value `v` starts a note
//!   spanning `v * steps_per_bar` steps, `-1` continues the previous note and
//!   `0` is silence.

use tracing::{debug, warn};

use super::duration::{duration_to_steps, Subdivision};
use super::euclidean::euclidean_pattern;
use super::{RhythmBuilder, UnifiedRhythm};

/// Slot value marking continuation of the preceding note
pub const CONTINUATION: f64 = -1.0;

/// Raw rhythm input as supplied by a rhythm provider
#[derive(Debug, Clone, PartialEq)]
pub enum RhythmSource {
    /// Notated duration list filling one bar
    Preset {
        durations: Vec<String>,
        subdivision: Subdivision,
    },
    /// Pulse array, `true` starts a note
    Euclidean {
        pulses: Vec<bool>,
        subdivision: Subdivision,
    },
    /// Step-sequencer slots
    Sequencer {
        slots: Vec<f64>,
        subdivision: Subdivision,
    },
}

impl RhythmSource {
    /// Build a Euclidean source from hit and step counts
    pub fn euclidean(hits: usize, steps: usize, rotation: usize, subdivision: Subdivision) -> Self {
        RhythmSource::Euclidean {
            pulses: euclidean_pattern(hits, steps, rotation),
            subdivision,
        }
    }

    /// Normalize into a unified rhythm.
    ///
    /// Returns `None` when the input pattern is empty.
    pub fn normalize(&self) -> Option<UnifiedRhythm> {
        match self {
            RhythmSource::Preset { durations, subdivision } => normalize_preset(durations, *subdivision),
            RhythmSource::Euclidean { pulses, subdivision } => normalize_pulses(pulses, *subdivision),
            RhythmSource::Sequencer { slots, subdivision } => normalize_sequencer(slots, *subdivision),
        }
    }
}

fn normalize_preset(durations: &[String], subdivision: Subdivision) -> Option<UnifiedRhythm> {
    if durations.is_empty() {
        warn!("Empty preset rhythm");
        return None;
    }

    let mut builder = RhythmBuilder::new(subdivision.steps_per_bar(), subdivision);
    for duration in durations {
        match duration.trim().strip_prefix('r') {
            Some(rest) => builder.push_rest(duration_to_steps(rest, subdivision)),
            None => builder.push_note(duration_to_steps(duration, subdivision)),
        }
    }
    Some(builder.finish())
}

fn normalize_pulses(pulses: &[bool], subdivision: Subdivision) -> Option<UnifiedRhythm> {
    if pulses.is_empty() {
        warn!("Empty pulse rhythm");
        return None;
    }

    let mut builder = RhythmBuilder::new(pulses.len(), subdivision);
    for &pulse in pulses {
        if pulse {
            builder.push_note(1);
        } else {
            builder.push_rest(1);
        }
    }
    Some(builder.finish())
}

fn normalize_sequencer(slots: &[f64], subdivision: Subdivision) -> Option<UnifiedRhythm> {
    if slots.is_empty() {
        warn!("Empty sequencer rhythm");
        return None;
    }

    let steps_per_bar = subdivision.steps_per_bar() as f64;
    let is_onset = |v: f64| v.is_finite() && v > 0.0;
    let mut builder = RhythmBuilder::new(slots.len(), subdivision);
    let mut i = 0;

    while i < slots.len() {
        let value = slots[i];
        if !is_onset(value) {
            if value != 0.0 && value != CONTINUATION {
                debug!(slot = i, value, "Unexpected sequencer value treated as silence");
            }
            builder.push_rest(1);
            i += 1;
            continue;
        }

        let mut len = ((value * steps_per_bar).round() as usize).max(1);
        let next_onset = slots[i + 1..]
            .iter()
            .position(|&v| is_onset(v))
            .map(|p| i + 1 + p)
            .unwrap_or(slots.len());
        if i + len > next_onset {
            debug!(slot = i, len, next_onset, "Sequencer note cut short by next onset");
            len = next_onset - i;
        }
        let len = len.min(builder.remaining());
        builder.push_note(len);
        i += len;
    }

    Some(builder.finish())
}
