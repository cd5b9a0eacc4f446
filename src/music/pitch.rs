// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Absolute pitches and named intervals.
//!
//! Pitches use scientific notation with MIDI octave numbering
//! (middle C = "C4" = 60).

use std::fmt;

use super::scale::Note;

/// MIDI note number type (0-127)
pub type MidiNote = u8;

/// Highest representable MIDI note
pub const MIDI_MAX: i16 = 127;

/// A pitch class with an octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub note: Note,
    pub octave: i8,
}

impl Pitch {
    /// Create a new pitch
    pub fn new(note: Note, octave: i8) -> Self {
        Self { note, octave }
    }

    /// Parse a pitch string like "C4", "F#3", "Bb5" or "C-1"
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let split = s.find(|c: char| c.is_ascii_digit() || c == '-')?;
        if split == 0 {
            return None;
        }
        let note = Note::parse(&s[..split])?;
        let octave: i8 = s[split..].parse().ok()?;
        Some(Self { note, octave })
    }

    /// MIDI number, which may fall outside 0-127
    pub fn midi(self) -> i16 {
        (self.octave as i16 + 1) * 12 + self.note.pitch_class() as i16
    }

    /// Build a pitch from a MIDI number in 0-127
    pub fn from_midi(midi: i16) -> Option<Self> {
        if !(0..=MIDI_MAX).contains(&midi) {
            return None;
        }
        Some(Self {
            note: Note::from_pitch_class((midi % 12) as u8),
            octave: (midi / 12 - 1) as i8,
        })
    }

    /// Shift by whole octaves into the MIDI range, keeping the pitch class
    pub fn fold_into_range(midi: i16) -> Self {
        let mut folded = midi;
        while folded > MIDI_MAX {
            folded -= 12;
        }
        while folded < 0 {
            folded += 12;
        }
        Self {
            note: Note::from_pitch_class((folded % 12) as u8),
            octave: (folded / 12 - 1) as i8,
        }
    }

    /// Transpose by semitones, folding back into the MIDI range
    pub fn transpose(self, semitones: i16) -> Self {
        Self::fold_into_range(self.midi() + semitones)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.note, self.octave)
    }
}

/// Semitone size of a named interval.
///
/// Accepts quality/number names ("m3", "P5", "M7", "TT", "P8") with an
/// optional leading '-' for a descending interval.
pub fn interval_semitones(name: &str) -> Option<i16> {
    let name = name.trim();
    let (sign, body) = match name.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, name.strip_prefix('+').unwrap_or(name)),
    };
    let size = match body {
        "P1" | "U" => 0,
        "m2" => 1,
        "M2" => 2,
        "m3" => 3,
        "M3" => 4,
        "P4" => 5,
        "A4" | "d5" | "TT" => 6,
        "P5" => 7,
        "m6" => 8,
        "M6" => 9,
        "m7" => 10,
        "M7" => 11,
        "P8" => 12,
        _ => return None,
    };
    Some(sign * size)
}
