// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale system for melodic generation.
//!
//! Provides pitch classes, scale definitions and the degree mapping the
//! weighting and transformation stages rely on. Degrees are 0-based here:
//! index 0 is the tonic.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pitch classes, sharps only; the discriminant is the pitch class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Note {
    C = 0,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

impl Note {
    /// Chromatic order from C
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    /// Pitch class, 0-11 from C
    pub fn pitch_class(self) -> u8 {
        self as u8
    }

    pub fn from_pitch_class(pc: u8) -> Self {
        Note::ALL[(pc % 12) as usize]
    }

    /// Parse a letter followed by any number of accidentals.
    ///
    /// Case-insensitive; '#' or 's' raises, 'b' lowers ("Db", "F#", "cs", "Cb").
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        let letter = match chars.next()?.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };
        let mut pc: i16 = letter;
        for accidental in chars {
            match accidental {
                '#' | 's' | 'S' => pc += 1,
                'b' | 'B' => pc -= 1,
                _ => return None,
            }
        }
        Some(Note::from_pitch_class(pc.rem_euclid(12) as u8))
    }

    /// Move by semitones, wrapping around the octave
    pub fn transpose(self, semitones: i16) -> Self {
        Note::from_pitch_class((self.pitch_class() as i16 + semitones).rem_euclid(12) as u8)
    }

    /// Shortest distance in semitones to another pitch class (0-6)
    pub fn distance_to(self, other: Note) -> u8 {
        let up = (other.pitch_class() as i16 - self.pitch_class() as i16).rem_euclid(12) as u8;
        up.min(12 - up)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NOTE_NAMES[self.pitch_class() as usize])
    }
}

/// Built-in scale types offered by the scale provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleType {
    Major,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    NaturalMinor,
    Locrian,
    HarmonicMinor,
    MelodicMinor,
    MajorPentatonic,
    MinorPentatonic,
    Blues,
    WholeTone,
}

impl ScaleType {
    pub const ALL: [ScaleType; 13] = [
        ScaleType::Major,
        ScaleType::Dorian,
        ScaleType::Phrygian,
        ScaleType::Lydian,
        ScaleType::Mixolydian,
        ScaleType::NaturalMinor,
        ScaleType::Locrian,
        ScaleType::HarmonicMinor,
        ScaleType::MelodicMinor,
        ScaleType::MajorPentatonic,
        ScaleType::MinorPentatonic,
        ScaleType::Blues,
        ScaleType::WholeTone,
    ];

    /// (display name, accepted spellings, semitones above the tonic).
    /// Spellings are lowercase with separators removed.
    fn table(self) -> (&'static str, &'static [&'static str], &'static [u8]) {
        match self {
            ScaleType::Major => ("Major", &["major", "ionian"], &[0, 2, 4, 5, 7, 9, 11]),
            ScaleType::Dorian => ("Dorian", &["dorian"], &[0, 2, 3, 5, 7, 9, 10]),
            ScaleType::Phrygian => ("Phrygian", &["phrygian"], &[0, 1, 3, 5, 7, 8, 10]),
            ScaleType::Lydian => ("Lydian", &["lydian"], &[0, 2, 4, 6, 7, 9, 11]),
            ScaleType::Mixolydian => ("Mixolydian", &["mixolydian"], &[0, 2, 4, 5, 7, 9, 10]),
            ScaleType::NaturalMinor => {
                ("Natural Minor", &["minor", "naturalminor", "aeolian"], &[0, 2, 3, 5, 7, 8, 10])
            }
            ScaleType::Locrian => ("Locrian", &["locrian"], &[0, 1, 3, 5, 6, 8, 10]),
            ScaleType::HarmonicMinor => ("Harmonic Minor", &["harmonicminor"], &[0, 2, 3, 5, 7, 8, 11]),
            ScaleType::MelodicMinor => ("Melodic Minor", &["melodicminor"], &[0, 2, 3, 5, 7, 9, 11]),
            ScaleType::MajorPentatonic => ("Major Pentatonic", &["majorpentatonic"], &[0, 2, 4, 7, 9]),
            ScaleType::MinorPentatonic => ("Minor Pentatonic", &["minorpentatonic", "pentatonic"], &[0, 3, 5, 7, 10]),
            ScaleType::Blues => ("Blues", &["blues"], &[0, 3, 5, 6, 7, 10]),
            ScaleType::WholeTone => ("Whole Tone", &["wholetone"], &[0, 2, 4, 6, 8, 10]),
        }
    }

    /// Semitones above the tonic, one per degree
    pub fn intervals(self) -> &'static [u8] {
        self.table().2
    }

    /// Parse a scale name; case, spaces, '-' and '_' are ignored
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase().replace([' ', '-', '_'], "");
        ScaleType::ALL.into_iter().find(|t| t.table().1.contains(&key.as_str()))
    }

    pub fn name(self) -> &'static str {
        self.table().0
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered set of pitch classes; index 0 is the tonic
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    name: String,
    notes: Vec<Note>,
}

impl Scale {
    /// Build a scale by stacking `scale_type`'s intervals on `root`
    pub fn new(root: Note, scale_type: ScaleType) -> Self {
        let notes = scale_type
            .intervals()
            .iter()
            .map(|&i| root.transpose(i as i16))
            .collect();

        Self {
            name: format!("{} {}", root, scale_type),
            notes,
        }
    }

    /// Create a scale from an explicit note list.
    ///
    /// Duplicates are dropped keeping first occurrence. Returns `None`
    /// when nothing is left.
    pub fn from_notes(name: impl Into<String>, notes: &[Note]) -> Option<Self> {
        let mut unique: Vec<Note> = Vec::with_capacity(notes.len());
        for &note in notes {
            if !unique.contains(&note) {
                unique.push(note);
            }
        }
        if unique.is_empty() {
            return None;
        }
        Some(Self {
            name: name.into(),
            notes: unique,
        })
    }

    /// Scale provider: parse a scale from strings (e.g., "C", "major").
    /// Returns `None` for an unknown key or scale type.
    pub fn parse(root_str: &str, scale_str: &str) -> Option<Self> {
        let root = Note::parse(root_str)?;
        let scale_type = ScaleType::parse(scale_str)?;
        Some(Scale::new(root, scale_type))
    }

    /// Display name (e.g. "C Major")
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the tonic
    pub fn tonic(&self) -> Note {
        self.notes[0]
    }

    /// Pitch classes by degree
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Degree count
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Always false: a scale holds at least its tonic
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn contains(&self, note: Note) -> bool {
        self.notes.contains(&note)
    }

    /// Get the 0-based scale degree for a note, if it's in the scale
    pub fn degree_of(&self, note: Note) -> Option<usize> {
        self.notes.iter().position(|&n| n == note)
    }

    /// Get the note at a 0-based degree, wrapping past the last degree
    pub fn note_at_degree(&self, degree: usize) -> Note {
        self.notes[degree % self.notes.len()]
    }

    /// Degree closest to `note` by pitch-class distance; ties go to the lower degree
    pub fn nearest_degree(&self, note: Note) -> usize {
        self.notes
            .iter()
            .enumerate()
            .min_by_key(|&(_, n)| note.distance_to(*n))
            .map_or(0, |(degree, _)| degree)
    }

    /// Quantize a pitch class to the nearest note in the scale
    pub fn quantize(&self, note: Note) -> Note {
        if self.contains(note) {
            return note;
        }
        self.notes[self.nearest_degree(note)]
    }

    /// Diatonic triad stacked in thirds on a 0-based degree
    pub fn triad(&self, degree: usize) -> Vec<Note> {
        vec![
            self.note_at_degree(degree),
            self.note_at_degree(degree + 2),
            self.note_at_degree(degree + 4),
        ]
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
