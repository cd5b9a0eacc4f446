// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI-ready view of a melody.
//!
//! Notes are placed at absolute tick positions (192 PPQ) with tick-encoded
//! durations and velocities scaled to 1-127. Rests only advance the clock.

use serde::Serialize;
use tracing::warn;

use crate::generators::velocity::to_midi_velocity;
use crate::generators::Melody;
use crate::music::MidiNote;
use crate::rhythm::duration::{duration_ticks, ticks_to_string, PPQ};

/// A note ready for a MIDI encoder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportNote {
    /// Start tick
    pub tick: u64,
    /// Note number (0-127)
    pub note: MidiNote,
    /// Velocity (1-127)
    pub velocity: u8,
    /// Length in ticks
    pub duration_ticks: u64,
    /// Length as "T<ticks>"
    pub duration: String,
}

impl ExportNote {
    /// End tick
    pub fn end_tick(&self) -> u64 {
        self.tick + self.duration_ticks
    }
}

/// Exported melody with its timing resolution
#[derive(Debug, Clone, Serialize)]
pub struct ExportTrack {
    pub name: String,
    /// Ticks per quarter note
    pub ppq: u32,
    pub notes: Vec<ExportNote>,
}

impl ExportTrack {
    /// Export a melody under a track name
    pub fn from_melody(name: impl Into<String>, melody: &Melody) -> Self {
        Self {
            name: name.into(),
            ppq: PPQ,
            notes: to_midi_notes(melody),
        }
    }

    /// Tick at which the last note ends
    pub fn end_tick(&self) -> u64 {
        self.notes.iter().map(ExportNote::end_tick).max().unwrap_or(0)
    }
}

/// Convert a melody to timed MIDI notes.
///
/// Notes with an unreadable duration are dropped without moving the clock;
/// notes with an unreadable pitch still take up their time.
pub fn to_midi_notes(melody: &Melody) -> Vec<ExportNote> {
    let mut notes = Vec::with_capacity(melody.len());
    let mut tick: u64 = 0;

    for note in &melody.notes {
        let Some(ticks) = duration_ticks(&note.duration) else {
            warn!(duration = %note.duration, "Unreadable duration skipped in export");
            continue;
        };

        if !note.is_rest() {
            match note.parsed_pitch().and_then(|p| MidiNote::try_from(p.midi()).ok()) {
                Some(midi) if midi <= 127 => notes.push(ExportNote {
                    tick,
                    note: midi,
                    velocity: to_midi_velocity(note.velocity),
                    duration_ticks: ticks as u64,
                    duration: ticks_to_string(ticks),
                }),
                _ => warn!(pitch = ?note.pitch, "Pitch outside MIDI range skipped in export"),
            }
        }
        tick += ticks as u64;
    }

    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::AppNote;
    use crate::music::{Note, Pitch};

    #[test]
    fn test_rests_advance_clock() {
        let melody = Melody::new(vec![
            AppNote::note(Pitch::new(Note::C, 4), "4n", 1.0),
            AppNote::rest("8n"),
            AppNote::note(Pitch::new(Note::E, 4), "T100", 0.5),
            AppNote::note(Pitch::new(Note::G, 4), "16n", 0.0),
        ]);
        let notes = to_midi_notes(&melody);

        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0], ExportNote {
            tick: 0,
            note: 60,
            velocity: 127,
            duration_ticks: 192,
            duration: "T192".into(),
        });
        assert_eq!(notes[1].tick, 288);
        assert_eq!(notes[1].note, 64);
        assert_eq!(notes[1].velocity, 64);
        assert_eq!(notes[1].duration, "T100");
        assert_eq!(notes[2].tick, 388);
        assert_eq!(notes[2].velocity, 1);
    }

    #[test]
    fn test_bad_notes_skipped() {
        let melody = Melody::new(vec![
            AppNote { pitch: Some("C4".into()), duration: "??".into(), velocity: 0.5 },
            AppNote { pitch: Some("nope".into()), duration: "4n".into(), velocity: 0.5 },
            AppNote::note(Pitch::new(Note::A, 4), "4n", 0.5),
        ]);
        let notes = to_midi_notes(&melody);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].tick, 192);
        assert_eq!(notes[0].note, 69);
    }

    #[test]
    fn test_track_end_tick() {
        let melody = Melody::new(vec![
            AppNote::note(Pitch::new(Note::D, 5), "2n", 0.7),
            AppNote::rest("2n"),
        ]);
        let track = ExportTrack::from_melody("lead", &melody);
        assert_eq!(track.ppq, 192);
        assert_eq!(track.end_tick(), 384);
        assert_eq!(ExportTrack::from_melody("empty", &Melody::empty()).end_tick(), 0);
    }
}
