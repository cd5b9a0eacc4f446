// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Motif transformations used for call-and-response variation.
//!
//! Every function here is total: rests pass through, and a pitch that can't
//! be transformed (malformed, or moved outside MIDI 0-127 by a chromatic
//! transpose or an inversion) is returned unchanged with a warning.

use rand::Rng;
use tracing::warn;

use super::AppNote;
use crate::music::{interval_semitones, Pitch, Scale};

/// Intervals a chromatic response may move by
const RESPONSE_INTERVALS: [&str; 6] = ["M2", "-M2", "m3", "-m3", "P4", "-P4"];

/// Scale steps a diatonic response may move by
const RESPONSE_STEPS: [i32; 4] = [-2, -1, 1, 2];

/// A variation applied to a repeated motif
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotifTransform {
    /// Shift by scale steps
    DiatonicTranspose(i32),
    /// Shift by a named interval
    ChromaticTranspose(&'static str),
    /// Mirror around the first pitch
    Invert,
}

impl MotifTransform {
    pub fn apply(&self, notes: &[AppNote], scale: &Scale) -> Vec<AppNote> {
        match *self {
            MotifTransform::DiatonicTranspose(steps) => diatonic_transpose(notes, scale, steps),
            MotifTransform::ChromaticTranspose(interval) => chromatic_transpose(notes, interval),
            MotifTransform::Invert => invert(notes),
        }
    }
}

/// Pick a response transformation
pub fn choose_transform<R: Rng + ?Sized>(rng: &mut R) -> MotifTransform {
    let roll = rng.gen::<f64>();
    if roll < 0.45 {
        MotifTransform::DiatonicTranspose(RESPONSE_STEPS[rng.gen_range(0..RESPONSE_STEPS.len())])
    } else if roll < 0.75 {
        MotifTransform::ChromaticTranspose(RESPONSE_INTERVALS[rng.gen_range(0..RESPONSE_INTERVALS.len())])
    } else {
        MotifTransform::Invert
    }
}

/// Apply `f` to every well-formed pitch, keeping everything else as is
fn map_pitches<F>(notes: &[AppNote], mut f: F) -> Vec<AppNote>
where
    F: FnMut(Pitch) -> Option<Pitch>,
{
    notes
        .iter()
        .map(|note| {
            if note.is_rest() {
                return note.clone();
            }
            match note.parsed_pitch().and_then(&mut f) {
                Some(pitch) => note.with_pitch(pitch),
                None => {
                    warn!(pitch = ?note.pitch, "Pitch left untransformed");
                    note.clone()
                }
            }
        })
        .collect()
}

/// Transpose by a named interval such as "m3" or "-P5"
pub fn chromatic_transpose(notes: &[AppNote], interval: &str) -> Vec<AppNote> {
    let Some(semitones) = interval_semitones(interval) else {
        warn!(interval, "Unknown interval, motif unchanged");
        return notes.to_vec();
    };
    map_pitches(notes, |pitch| Pitch::from_midi(pitch.midi() + semitones))
}

/// Move every pitch `steps` scale degrees, carrying octaves across wraps.
///
/// Results past the MIDI range are folded back by octaves.
pub fn diatonic_transpose(notes: &[AppNote], scale: &Scale, steps: i32) -> Vec<AppNote> {
    let tonic = scale.tonic().pitch_class() as i16;
    let len = scale.len() as i32;
    let offset_of = |degree: usize| (scale.note_at_degree(degree).pitch_class() as i16 - tonic).rem_euclid(12);

    map_pitches(notes, |pitch| {
        let degree = scale.degree_of(pitch.note)?;
        let tonic_below = pitch.midi() - offset_of(degree);
        let shifted = degree as i32 + steps;
        let octaves = shifted.div_euclid(len) as i16;
        let target = shifted.rem_euclid(len) as usize;
        Some(Pitch::fold_into_range(tonic_below + octaves * 12 + offset_of(target)))
    })
}

/// Mirror each pitch around the first note's pitch.
///
/// A melody that opens with a rest is returned unchanged.
pub fn invert(notes: &[AppNote]) -> Vec<AppNote> {
    let Some(axis) = notes.first().and_then(AppNote::parsed_pitch) else {
        return notes.to_vec();
    };
    map_pitches(notes, |pitch| Pitch::from_midi(2 * axis.midi() - pitch.midi()))
}

/// Snap out-of-scale pitches to the nearest scale tone, preferring below
pub fn remap_to_scale(notes: &[AppNote], scale: &Scale) -> Vec<AppNote> {
    map_pitches(notes, |pitch| {
        if scale.contains(pitch.note) {
            return Some(pitch);
        }
        let midi = pitch.midi();
        (1..=6)
            .flat_map(|d| [midi - d, midi + d])
            .map(Pitch::fold_into_range)
            .find(|p| scale.contains(p.note))
    })
}
