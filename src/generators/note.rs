// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Walks a rhythm and picks a pitch (or a rest) for every note position.

use rand::{Rng, RngCore};
use tracing::debug;

use super::markov::Transitions;
use super::weighting::{weight_candidates, weighted_choice};
use super::{AppNote, GenerationContext};
use crate::error::Result;
use crate::music::{Note, Pitch, Scale};
use crate::rhythm::{steps_to_duration, UnifiedRhythm};

/// Longest run of rests before a note is forced
pub const MAX_CONSECUTIVE_RESTS: usize = 2;

/// Where a phrase begins and what it continues from
#[derive(Debug, Clone, Copy, Default)]
pub struct PhraseStart {
    /// Bar index of the phrase's first step within the whole melody
    pub first_bar: usize,
    /// Last sounding pitch of the preceding phrase
    pub seed: Option<Pitch>,
    /// Put the tonic on the first note (ignored when seeded)
    pub start_on_root: bool,
    /// Rests already emitted directly before this phrase
    pub rests_before: usize,
}

/// Output of one pass over a rhythm
#[derive(Debug, Clone, PartialEq)]
pub struct Phrase {
    pub notes: Vec<AppNote>,
    /// Last sounding pitch, for chaining the next phrase
    pub last_pitch: Option<Pitch>,
}

/// Note generator bound to a prepared context
pub struct NoteGenerator<'a> {
    ctx: &'a GenerationContext,
}

impl<'a> NoteGenerator<'a> {
    pub fn new(ctx: &'a GenerationContext) -> Self {
        Self { ctx }
    }

    /// Generate one phrase over `rhythm`.
    ///
    /// Each note lasts until the next note position (or the end of the
    /// rhythm), so rests inside the rhythm lengthen the preceding note.
    pub fn generate(&self, rhythm: &UnifiedRhythm, start: PhraseStart, rng: &mut dyn RngCore) -> Result<Phrase> {
        let positions = rhythm.note_positions();
        if positions.is_empty() {
            debug!(bar = start.first_bar, "Rhythm has no note positions");
            return Ok(Phrase {
                notes: Vec::new(),
                last_pitch: start.seed,
            });
        }

        let subdivision = rhythm.subdivision();
        let window = self.ctx.markov_table.context_len();
        let mut notes = Vec::with_capacity(positions.len() + 1);
        let mut consecutive_rests = start.rests_before;
        let mut last_pitch = start.seed;
        let mut history: Vec<Note> = start.seed.map(|p| p.note).into_iter().collect();
        let mut root_pending = start.start_on_root && start.seed.is_none();

        if positions[0] > 0 {
            notes.push(AppNote::rest(steps_to_duration(positions[0], subdivision)));
            consecutive_rests += 1;
        }

        for (i, &step) in positions.iter().enumerate() {
            let end = positions.get(i + 1).copied().unwrap_or_else(|| rhythm.total_steps());
            let duration = steps_to_duration(end - step, subdivision);

            let forced = consecutive_rests >= MAX_CONSECUTIVE_RESTS;
            if !forced && rng.gen::<f64>() < self.ctx.rest_probability {
                notes.push(AppNote::rest(duration));
                consecutive_rests += 1;
                continue;
            }

            let note = if root_pending {
                root_pending = false;
                self.ctx.scale.tonic()
            } else {
                self.choose_pitch_class(&history, start.first_bar, step, rng)?
            };

            let pitch = self.attach_octave(note, last_pitch);
            let velocity = self.ctx.velocity.sample(rng);
            notes.push(AppNote::note(pitch, duration, velocity));

            consecutive_rests = 0;
            last_pitch = Some(pitch);
            history.push(note);
            if history.len() > window {
                history.drain(..history.len() - window);
            }
        }

        Ok(Phrase { notes, last_pitch })
    }

    fn choose_pitch_class(&self, history: &[Note], first_bar: usize, step: usize, rng: &mut dyn RngCore) -> Result<Note> {
        let ctx = self.ctx;
        let fallback;
        let transitions = match ctx.markov_table.lookup(history) {
            Some(transitions) => transitions,
            None => {
                debug!(context = ?history, "No transitions for context, using uniform scale");
                fallback = uniform_transitions(&ctx.scale);
                &fallback
            }
        };

        let steps_per_bar = ctx.steps_per_bar.max(1);
        let absolute = first_bar * steps_per_bar + step;
        let chord_tones = ctx.chord_tones_at(absolute / steps_per_bar);
        let progress = absolute as f64 / ctx.total_steps.max(1) as f64;

        let (candidates, weights) = weight_candidates(
            transitions,
            history.last().copied(),
            &ctx.scale,
            &ctx.weighting,
            chord_tones,
            Some(progress),
        );
        weighted_choice(&candidates, &weights, rng)
    }

    /// Place a pitch class in an octave: the lowest octave for a phrase
    /// opening, otherwise the octave in range nearest the previous pitch
    fn attach_octave(&self, note: Note, previous: Option<Pitch>) -> Pitch {
        let range = self.ctx.octave_range;
        let fit = |octave: i8| Pitch::fold_into_range(Pitch::new(note, octave).midi());
        match previous {
            None => fit(range.min),
            Some(previous) => (range.min..=range.max)
                .map(fit)
                .min_by_key(|p| (p.midi() - previous.midi()).abs())
                .unwrap_or_else(|| fit(range.min)),
        }
    }
}

fn uniform_transitions(scale: &Scale) -> Transitions {
    scale.notes().iter().map(|&note| (note, 1)).collect()
}
