// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Final sanity filter for generated melodies.

use tracing::warn;

use super::{AppNote, Melody};
use crate::rhythm::duration::duration_ticks;

/// Check a sounding note's invariants: parseable pitch, known duration
/// and velocity within 0.0 - 1.0. Rests always pass.
pub fn is_valid_note(note: &AppNote) -> bool {
    if note.is_rest() {
        return true;
    }
    note.parsed_pitch().is_some()
        && duration_ticks(&note.duration).is_some()
        && (0.0..=1.0).contains(&note.velocity)
}

/// Copy of `melody` without invalid sounding notes
pub fn validate(melody: &Melody) -> Melody {
    let notes: Vec<AppNote> = melody.notes.iter().filter(|n| is_valid_note(n)).cloned().collect();
    let dropped = melody.len() - notes.len();
    if dropped > 0 {
        warn!(dropped, "Invalid notes removed from melody");
    }
    Melody::new(notes)
}

/// Check every note without filtering
pub fn is_valid(melody: &Melody) -> bool {
    melody.notes.iter().all(is_valid_note)
}
