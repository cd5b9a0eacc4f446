// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Rhythm representation and normalization.
//!
//! Every rhythm input shape is converted into a [`UnifiedRhythm`]: a
//! contiguous, non-overlapping stream of note and rest events on a step grid.

pub mod duration;
pub mod euclidean;
pub mod normalize;

pub use duration::{duration_to_steps, steps_to_duration, Subdivision};
pub use normalize::RhythmSource;

use tracing::warn;

/// A single timed event on the step grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RhythmEvent {
    /// Start step
    pub step: usize,
    /// Length in steps (always > 0)
    pub duration_in_steps: usize,
    /// Whether this event is silent
    pub is_rest: bool,
}

impl RhythmEvent {
    /// First step after this event
    pub fn end(&self) -> usize {
        self.step + self.duration_in_steps
    }
}

/// Normalized rhythm: contiguous events covering `total_steps`
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedRhythm {
    events: Vec<RhythmEvent>,
    total_steps: usize,
    subdivision: Subdivision,
}

impl UnifiedRhythm {
    /// Get the events in order
    pub fn events(&self) -> &[RhythmEvent] {
        &self.events
    }

    /// Get the total span in steps
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Get the grid unit
    pub fn subdivision(&self) -> Subdivision {
        self.subdivision
    }

    /// Start steps of all non-rest events
    pub fn note_positions(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter(|e| !e.is_rest)
            .map(|e| e.step)
            .collect()
    }

    /// Check that events start at 0, touch end to start, and end at `total_steps`
    pub fn is_contiguous(&self) -> bool {
        let mut cursor = 0;
        for event in &self.events {
            if event.step != cursor || event.duration_in_steps == 0 {
                return false;
            }
            cursor = event.end();
        }
        cursor == self.total_steps
    }

    /// Repeat this rhythm `bars` times back to back
    pub fn repeat(&self, bars: usize) -> UnifiedRhythm {
        let bars = bars.max(1);
        let mut builder = RhythmBuilder::new(self.total_steps * bars, self.subdivision);
        for _ in 0..bars {
            for event in &self.events {
                if event.is_rest {
                    builder.push_rest(event.duration_in_steps);
                } else {
                    builder.push_note(event.duration_in_steps);
                }
            }
        }
        builder.finish()
    }
}

/// Incremental constructor that upholds the contiguity invariant.
///
/// Spans that would run past `total_steps` are truncated and adjacent rests
/// merge into a single event.
#[derive(Debug)]
pub(crate) struct RhythmBuilder {
    events: Vec<RhythmEvent>,
    total_steps: usize,
    subdivision: Subdivision,
    cursor: usize,
}

impl RhythmBuilder {
    pub(crate) fn new(total_steps: usize, subdivision: Subdivision) -> Self {
        Self {
            events: Vec::new(),
            total_steps: total_steps.max(1),
            subdivision,
            cursor: 0,
        }
    }

    /// Steps not yet covered by an event
    pub(crate) fn remaining(&self) -> usize {
        self.total_steps - self.cursor
    }

    pub(crate) fn push_note(&mut self, steps: usize) {
        if let Some(len) = self.clamp(steps) {
            self.events.push(RhythmEvent {
                step: self.cursor,
                duration_in_steps: len,
                is_rest: false,
            });
            self.cursor += len;
        }
    }

    pub(crate) fn push_rest(&mut self, steps: usize) {
        let Some(len) = self.clamp(steps) else {
            return;
        };
        match self.events.last_mut() {
            Some(last) if last.is_rest => last.duration_in_steps += len,
            _ => self.events.push(RhythmEvent {
                step: self.cursor,
                duration_in_steps: len,
                is_rest: true,
            }),
        }
        self.cursor += len;
    }

    /// Clamp a span to at least one step and to the remaining room
    fn clamp(&self, steps: usize) -> Option<usize> {
        let remaining = self.remaining();
        if remaining == 0 {
            warn!(steps, total = self.total_steps, "Rhythm event past end of pattern dropped");
            return None;
        }
        let steps = steps.max(1);
        if steps > remaining {
            warn!(steps, remaining, "Rhythm event truncated to fit pattern");
        }
        Some(steps.min(remaining))
    }

    /// Pad with a trailing rest and produce the rhythm
    pub(crate) fn finish(mut self) -> UnifiedRhythm {
        let remaining = self.remaining();
        if remaining > 0 {
            self.push_rest(remaining);
        }
        UnifiedRhythm {
            events: self.events,
            total_steps: self.total_steps,
            subdivision: self.subdivision,
        }
    }
}
