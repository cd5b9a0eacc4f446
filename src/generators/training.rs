// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Training fragments for the Markov table.
//!
//! A Markov chain built from nothing has no tonal bias. These fragments are
//! short idioms derived from the scale itself (runs, arpeggios, turns,
//! cadences) plus a few well-known tunes, so the table leans toward motion
//! that resolves to the tonic.

use tracing::debug;

use crate::music::{Note, Pitch, Scale};

/// Well-known public domain openings, written in C major
const FIXED_MOTIFS: [(&str, &[&str]); 6] = [
    (
        "Ode to Joy",
        &["E4", "E4", "F4", "G4", "G4", "F4", "E4", "D4", "C4", "C4", "D4", "E4", "E4", "D4", "D4"],
    ),
    (
        "Twinkle Twinkle",
        &["C4", "C4", "G4", "G4", "A4", "A4", "G4", "F4", "F4", "E4", "E4", "D4", "D4", "C4"],
    ),
    (
        "Frere Jacques",
        &["C4", "D4", "E4", "C4", "C4", "D4", "E4", "C4", "E4", "F4", "G4"],
    ),
    ("Happy Birthday", &["G4", "G4", "A4", "G4", "C5", "B4"]),
    ("Mary Had a Little Lamb", &["E4", "D4", "C4", "D4", "E4", "E4", "E4"]),
    ("Fur Elise", &["E5", "D#5", "E5", "D#5", "E5", "B4", "D5", "C5", "A4"]),
];

/// Derive training fragments from a scale.
///
/// Degree-specific idioms (arpeggios, turns, cadences) need at least five
/// degrees; smaller scales get runs and stepwise windows only.
pub fn synthesize(scale: &Scale, include_fixed_motifs: bool) -> Vec<Vec<Note>> {
    let d = |i: usize| scale.note_at_degree(i);
    let n = scale.len();
    let tonic = d(0);
    let leading = d(n - 1);
    let mut fragments: Vec<Vec<Note>> = Vec::new();

    // Scale runs, both ending on the tonic
    let mut ascending: Vec<Note> = scale.notes().to_vec();
    ascending.push(tonic);
    let descending: Vec<Note> = ascending.iter().rev().copied().collect();
    fragments.push(ascending);
    fragments.push(descending);

    if n >= 5 {
        let dominant = d(4);

        // Tonic triad up and back down
        fragments.push(vec![tonic, d(2), dominant]);
        fragments.push(vec![dominant, d(2), tonic]);

        // Upper turn around the second degree
        fragments.push(vec![d(1), d(2), d(1), tonic, d(1)]);

        // Cadences
        fragments.push(vec![d(1), dominant, tonic]);
        fragments.push(vec![leading, tonic]);
    } else {
        debug!(scale = %scale, degrees = n, "Short scale, skipping degree idioms");
        if n >= 2 {
            fragments.push(vec![leading, tonic]);
        }
    }

    // Stepwise three-note windows
    if n >= 3 {
        for i in 0..=n - 3 {
            let window = vec![d(i), d(i + 1), d(i + 2)];
            let reversed = window.iter().rev().copied().collect();
            fragments.push(window);
            fragments.push(reversed);
        }
    }

    // Skip-one arpeggio settling through the second degree
    if n >= 5 {
        let mut skip: Vec<Note> = (0..n).step_by(2).map(d).collect();
        skip.push(d(1));
        skip.push(tonic);
        fragments.push(skip);
    }

    if include_fixed_motifs {
        fragments.extend(fixed_motifs(scale));
    }

    fragments
}

/// Fixed motifs transposed to the scale's tonic and snapped into the scale
fn fixed_motifs(scale: &Scale) -> Vec<Vec<Note>> {
    let shift = scale.tonic().pitch_class() as i16;
    FIXED_MOTIFS
        .iter()
        .map(|(_, pitches)| {
            pitches
                .iter()
                .filter_map(|p| Pitch::parse(p))
                .map(|p| scale.quantize(p.note.transpose(shift)))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::ScaleType;

    fn c_major() -> Scale {
        Scale::new(Note::C, ScaleType::Major)
    }

    #[test]
    fn test_runs_end_on_tonic() {
        let fragments = synthesize(&c_major(), false);
        assert_eq!(
            fragments[0],
            vec![Note::C, Note::D, Note::E, Note::F, Note::G, Note::A, Note::B, Note::C]
        );
        assert_eq!(fragments[1].first(), Some(&Note::C));
        assert_eq!(fragments[1].last(), Some(&Note::C));
        assert_eq!(fragments[1][1], Note::B);
    }

    #[test]
    fn test_idioms_present() {
        let fragments = synthesize(&c_major(), false);
        assert!(fragments.contains(&vec![Note::C, Note::E, Note::G]));
        assert!(fragments.contains(&vec![Note::G, Note::E, Note::C]));
        assert!(fragments.contains(&vec![Note::D, Note::E, Note::D, Note::C, Note::D]));
        assert!(fragments.contains(&vec![Note::D, Note::G, Note::C]));
        assert!(fragments.contains(&vec![Note::B, Note::C]));
        assert!(fragments.contains(&vec![Note::A, Note::B, Note::C]));
        assert!(fragments.contains(&vec![Note::C, Note::B, Note::A]));
        assert!(fragments.contains(&vec![Note::C, Note::E, Note::G, Note::B, Note::D, Note::C]));
    }

    #[test]
    fn test_window_count() {
        // 2 runs + 5 idioms + 2 * 5 windows + 1 skip arpeggio
        assert_eq!(synthesize(&c_major(), false).len(), 18);
    }

    #[test]
    fn test_fixed_motifs_stay_in_scale() {
        let scale = Scale::new(Note::D, ScaleType::NaturalMinor);
        let with = synthesize(&scale, true);
        let without = synthesize(&scale, false);
        assert_eq!(with.len(), without.len() + FIXED_MOTIFS.len());

        for fragment in &with {
            for note in fragment {
                assert!(scale.contains(*note), "{} not in {}", note, scale);
            }
        }
    }

    #[test]
    fn test_short_scale() {
        let scale = Scale::from_notes("trichord", &[Note::C, Note::D, Note::E]).unwrap();
        let fragments = synthesize(&scale, false);
        // 2 runs, the cadence, 2 windows
        assert_eq!(fragments.len(), 5);

        let single = Scale::from_notes("drone", &[Note::A]).unwrap();
        let fragments = synthesize(&single, false);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0], vec![Note::A, Note::A]);
    }
}
