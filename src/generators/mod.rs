// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Melody generation pipeline.
//!
//! Training fragments are synthesized from the scale, folded into a Markov
//! table, and walked over a unified rhythm by a structural composer. The
//! result is validated before it leaves this module.

pub mod compose;
pub mod markov;
pub mod note;
pub mod training;
pub mod transform;
pub mod validate;
pub mod velocity;
pub mod weighting;

use std::collections::BTreeMap;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::MelodySettings;
use crate::error::Result;
use crate::music::{Note, Pitch, Scale};
use crate::rhythm::{RhythmSource, Subdivision, UnifiedRhythm};

pub use compose::{Composer, MotifComposer, MotifPattern, StandardComposer};
pub use markov::MarkovTable;
pub use velocity::{DynamicMarking, VelocityMode};
pub use weighting::{ContourMode, WeightingConfig};

/// Highest supported n-gram order
pub const MAX_NGRAM_ORDER: usize = 4;

/// A single note or rest of a generated melody
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppNote {
    /// Pitch with octave ("C4"); `None` is a rest
    pub pitch: Option<String>,
    /// Encoded duration ("4n", "T240")
    pub duration: String,
    /// Velocity in 0.0 - 1.0 (0 for rests)
    pub velocity: f64,
}

impl AppNote {
    /// Create a sounding note
    pub fn note(pitch: Pitch, duration: impl Into<String>, velocity: f64) -> Self {
        Self {
            pitch: Some(pitch.to_string()),
            duration: duration.into(),
            velocity,
        }
    }

    /// Create a rest
    pub fn rest(duration: impl Into<String>) -> Self {
        Self {
            pitch: None,
            duration: duration.into(),
            velocity: 0.0,
        }
    }

    /// Check if this is a rest
    pub fn is_rest(&self) -> bool {
        self.pitch.is_none()
    }

    /// Parse the pitch string, if this note sounds and is well formed
    pub fn parsed_pitch(&self) -> Option<Pitch> {
        self.pitch.as_deref().and_then(Pitch::parse)
    }

    /// Copy of this note with a different pitch
    pub fn with_pitch(&self, pitch: Pitch) -> Self {
        Self {
            pitch: Some(pitch.to_string()),
            ..self.clone()
        }
    }
}

/// A time-ordered sequence of notes and rests
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Melody {
    pub notes: Vec<AppNote>,
}

impl Melody {
    /// Create a melody from notes
    pub fn new(notes: Vec<AppNote>) -> Self {
        Self { notes }
    }

    /// The empty melody
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of notes and rests
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Check if there is nothing to play
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Last sounding pitch
    pub fn last_pitch(&self) -> Option<Pitch> {
        self.notes.iter().rev().find_map(AppNote::parsed_pitch)
    }

    /// New melody shifted by whole octaves
    pub fn shift_octaves(&self, octaves: i8) -> Melody {
        let notes = self
            .notes
            .iter()
            .map(|n| match n.parsed_pitch() {
                Some(p) => n.with_pitch(p.transpose(octaves as i16 * 12)),
                None => n.clone(),
            })
            .collect();
        Melody { notes }
    }
}

/// Inclusive octave bounds for generated pitches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OctaveRange {
    pub min: i8,
    pub max: i8,
}

impl OctaveRange {
    /// Create a range, ordering and clamping the bounds to -1..=9
    pub fn new(a: i8, b: i8) -> Self {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        Self {
            min: min.clamp(-1, 9),
            max: max.clamp(-1, 9),
        }
    }
}

impl Default for OctaveRange {
    fn default() -> Self {
        Self { min: 4, max: 5 }
    }
}

/// Immutable inputs for one generation request
#[derive(Debug, Clone)]
pub struct GenerationContext {
    /// Scale the melody is drawn from
    pub scale: Scale,
    /// Transition counts synthesized from the scale
    pub markov_table: MarkovTable,
    /// One bar of rhythm
    pub rhythm: UnifiedRhythm,
    /// Number of bars to generate
    pub bars: usize,
    /// Steps in one bar
    pub steps_per_bar: usize,
    /// Steps in the whole melody
    pub total_steps: usize,
    /// Grid unit
    pub subdivision: Subdivision,
    /// Octave bounds
    pub octave_range: OctaveRange,
    /// Markov n-gram order
    pub ngram_order: usize,
    /// Use the motif composer
    pub use_motif_repetition: bool,
    /// Fixed motif pattern; `None` picks one at random
    pub motif_pattern: Option<MotifPattern>,
    /// Vary repeated motifs
    pub call_and_response: bool,
    /// Candidate scoring knobs
    pub weighting: WeightingConfig,
    /// Chance of a rest at each position (0.0 - 1.0)
    pub rest_probability: f64,
    /// How velocities are chosen
    pub velocity: VelocityMode,
    /// First note of the melody is the tonic
    pub start_with_root: bool,
    /// Last sounding note of the melody is the tonic
    pub end_with_root: bool,
    /// Active chord tones per bar, cycled; empty when accompaniment is off
    pub chords: Vec<Vec<Note>>,
}

impl GenerationContext {
    /// Assemble a context from settings, a scale and a rhythm.
    ///
    /// Returns `None` when the scale or rhythm is missing or the rhythm
    /// pattern is empty.
    pub fn prepare(
        settings: &MelodySettings,
        scale: Option<Scale>,
        rhythm: Option<&RhythmSource>,
        chord_degrees: &[usize],
    ) -> Option<Self> {
        let Some(scale) = scale else {
            warn!(key = %settings.key, scale = %settings.scale, "No scale available");
            return None;
        };
        let Some(source) = rhythm else {
            warn!("No rhythm available");
            return None;
        };
        let rhythm = source.normalize()?;

        let ngram_order = settings.ngram_order.clamp(1, MAX_NGRAM_ORDER);
        let training = training::synthesize(&scale, settings.include_fixed_motifs);
        let markov_table = MarkovTable::build(&training, ngram_order);
        debug!(
            fragments = training.len(),
            contexts = markov_table.len(),
            order = markov_table.order(),
            "Markov table built"
        );

        let motif_pattern = settings.motif_pattern.as_deref().and_then(|p| {
            let parsed = MotifPattern::parse(p);
            if parsed.is_none() {
                warn!(pattern = p, "Invalid motif pattern, one will be chosen at random");
            }
            parsed
        });

        let degree_weights: BTreeMap<usize, f64> = settings
            .degree_weights
            .clone()
            .unwrap_or_else(|| weighting::default_degree_weights(scale.len()));

        let chords = chord_degrees
            .iter()
            .map(|&degree| scale.triad(degree % scale.len()))
            .collect();

        let bars = settings.bars.max(1);
        let steps_per_bar = rhythm.total_steps();

        Some(Self {
            markov_table,
            bars,
            steps_per_bar,
            total_steps: bars * steps_per_bar,
            subdivision: rhythm.subdivision(),
            octave_range: OctaveRange::new(settings.octave_range.min, settings.octave_range.max),
            ngram_order,
            use_motif_repetition: settings.use_motif_repetition,
            motif_pattern,
            call_and_response: settings.call_and_response,
            weighting: WeightingConfig {
                degree_weights,
                chord_adherence: settings.chord_adherence.clamp(0.0, 1.0),
                contour: settings.contour,
            },
            rest_probability: settings.rest_probability.clamp(0.0, 1.0),
            velocity: settings.velocity,
            start_with_root: settings.start_with_root_note,
            end_with_root: settings.end_with_root_note,
            chords,
            rhythm,
            scale,
        })
    }

    /// Chord tones active during a bar, if accompaniment is on
    pub fn chord_tones_at(&self, bar: usize) -> Option<&[Note]> {
        if self.chords.is_empty() {
            return None;
        }
        Some(self.chords[bar % self.chords.len()].as_slice())
    }
}

/// Compose, resolve and validate a melody for a prepared context
pub fn generate(context: &GenerationContext, rng: &mut dyn RngCore) -> Result<Melody> {
    let composer: Box<dyn Composer> = if context.use_motif_repetition {
        Box::new(MotifComposer)
    } else {
        Box::new(StandardComposer)
    };
    debug!(composer = composer.name(), bars = context.bars, "Composing melody");

    let mut melody = composer.compose(context, rng)?;
    if context.end_with_root {
        melody = compose::resolve_to_tonic(&melody, &context.scale);
    }
    Ok(validate::validate(&melody))
}

/// Build a context and generate; missing inputs yield an empty melody
pub fn generate_melody(
    settings: &MelodySettings,
    scale: Option<Scale>,
    rhythm: Option<&RhythmSource>,
    chord_degrees: &[usize],
    rng: &mut dyn RngCore,
) -> Result<Melody> {
    match GenerationContext::prepare(settings, scale, rhythm, chord_degrees) {
        Some(context) => generate(&context, rng),
        None => Ok(Melody::empty()),
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::music::ScaleType;

    fn quarter_source() -> RhythmSource {
        RhythmSource::Preset {
            durations: vec!["4n".into(), "4n".into(), "4n".into(), "4n".into()],
            subdivision: Subdivision::Sixteenth,
        }
    }

    #[test]
    fn test_app_note_constructors() {
        let note = AppNote::note(Pitch::new(Note::C, 4), "4n", 0.8);
        assert_eq!(note.pitch.as_deref(), Some("C4"));
        assert!(!note.is_rest());
        assert_eq!(note.parsed_pitch(), Some(Pitch::new(Note::C, 4)));

        let rest = AppNote::rest("8n");
        assert!(rest.is_rest());
        assert_eq!(rest.velocity, 0.0);
    }

    #[test]
    fn test_shift_octaves_returns_new_melody() {
        let melody = Melody::new(vec![
            AppNote::note(Pitch::new(Note::E, 4), "4n", 0.5),
            AppNote::rest("4n"),
        ]);
        let shifted = melody.shift_octaves(1);
        assert_eq!(shifted.notes[0].pitch.as_deref(), Some("E5"));
        assert!(shifted.notes[1].is_rest());
        assert_eq!(melody.notes[0].pitch.as_deref(), Some("E4"));
    }

    #[test]
    fn test_octave_range_orders_bounds() {
        let range = OctaveRange::new(6, 3);
        assert_eq!(range.min, 3);
        assert_eq!(range.max, 6);
        assert_eq!(OctaveRange::new(-4, 12), OctaveRange { min: -1, max: 9 });
    }

    #[test]
    fn test_prepare_requires_inputs() {
        let settings = MelodySettings::default();
        let scale = Scale::new(Note::C, ScaleType::Major);
        let source = quarter_source();

        assert!(GenerationContext::prepare(&settings, None, Some(&source), &[]).is_none());
        assert!(GenerationContext::prepare(&settings, Some(scale.clone()), None, &[]).is_none());

        let empty = RhythmSource::Preset { durations: vec![], subdivision: Subdivision::Sixteenth };
        assert!(GenerationContext::prepare(&settings, Some(scale.clone()), Some(&empty), &[]).is_none());

        let context = GenerationContext::prepare(&settings, Some(scale), Some(&source), &[0, 4]).unwrap();
        assert_eq!(context.steps_per_bar, 16);
        assert_eq!(context.total_steps, settings.bars * 16);
        assert_eq!(context.chord_tones_at(1), Some(&[Note::G, Note::B, Note::D][..]));
        assert_eq!(context.chord_tones_at(2), Some(&[Note::C, Note::E, Note::G][..]));
    }

    #[test]
    fn test_generate_melody_empty_when_absent() {
        let settings = MelodySettings::default();
        let mut rng = StdRng::seed_from_u64(1);
        let melody = generate_melody(&settings, None, Some(&quarter_source()), &[], &mut rng).unwrap();
        assert!(melody.is_empty());
    }
}
