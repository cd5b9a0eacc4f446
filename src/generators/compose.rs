// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Structural composers: how bars are laid out across the melody.

use std::collections::BTreeMap;
use std::fmt;

use rand::{Rng, RngCore};
use tracing::{debug, warn};

use super::note::{NoteGenerator, PhraseStart, MAX_CONSECUTIVE_RESTS};
use super::transform::{choose_transform, remap_to_scale};
use super::{AppNote, GenerationContext, Melody};
use crate::error::Result;
use crate::music::{Pitch, Scale};

/// Curated bar repetition patterns
pub const MOTIF_PATTERNS: [&str; 7] = ["ABAB", "AABC", "AABA", "ABAC", "AABB", "ABBA", "ABCA"];

/// Bars needed before motif repetition makes sense
pub const MIN_MOTIF_BARS: usize = 4;

/// A strategy that turns a context into a melody
pub trait Composer {
    fn compose(&self, ctx: &GenerationContext, rng: &mut dyn RngCore) -> Result<Melody>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Repeats the bar rhythm and walks it in one pass
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardComposer;

impl Composer for StandardComposer {
    fn compose(&self, ctx: &GenerationContext, rng: &mut dyn RngCore) -> Result<Melody> {
        let bars = ctx.total_steps.div_ceil(ctx.steps_per_bar.max(1));
        let rhythm = ctx.rhythm.repeat(bars);
        let start = PhraseStart {
            start_on_root: ctx.start_with_root,
            ..Default::default()
        };
        let phrase = NoteGenerator::new(ctx).generate(&rhythm, start, rng)?;
        Ok(Melody::new(phrase.notes))
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}

/// Four-letter bar pattern such as "AABC"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotifPattern([char; 4]);

impl MotifPattern {
    /// Parse four letters, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        let letters: Vec<char> = s.trim().chars().map(|c| c.to_ascii_uppercase()).collect();
        if letters.len() != 4 || !letters.iter().all(|c| c.is_ascii_uppercase()) {
            return None;
        }
        Some(Self([letters[0], letters[1], letters[2], letters[3]]))
    }

    /// One of the curated patterns
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let name = MOTIF_PATTERNS[rng.gen_range(0..MOTIF_PATTERNS.len())];
        Self::parse(name).unwrap_or(Self(['A', 'B', 'A', 'B']))
    }

    /// Letter for a bar; the pattern repeats every four bars
    pub fn letter(&self, bar: usize) -> char {
        self.0[bar % 4]
    }
}

impl fmt::Display for MotifPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0 {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Generates one bar per new pattern letter and reuses it on repeats
#[derive(Debug, Clone, Copy, Default)]
pub struct MotifComposer;

impl Composer for MotifComposer {
    fn compose(&self, ctx: &GenerationContext, rng: &mut dyn RngCore) -> Result<Melody> {
        if ctx.bars < MIN_MOTIF_BARS {
            warn!(bars = ctx.bars, "Motif repetition needs at least 4 bars, composing without it");
            return StandardComposer.compose(ctx, rng);
        }

        let pattern = match ctx.motif_pattern {
            Some(pattern) => pattern,
            None => MotifPattern::random(rng),
        };
        debug!(%pattern, "Motif pattern");

        let generator = NoteGenerator::new(ctx);
        let mut cache: BTreeMap<char, Vec<AppNote>> = BTreeMap::new();
        let mut notes: Vec<AppNote> = Vec::new();
        let mut last_pitch: Option<Pitch> = None;

        for bar in 0..ctx.bars {
            let letter = pattern.letter(bar);
            let (mut bar_notes, closing) = match cache.get(&letter) {
                Some(cached) if ctx.call_and_response => {
                    let transform = choose_transform(rng);
                    debug!(bar, %letter, ?transform, "Response to cached motif");
                    let response = remap_to_scale(&transform.apply(cached, &ctx.scale), &ctx.scale);
                    let closing = closing_pitch(&response);
                    (response, closing)
                }
                Some(cached) => (cached.clone(), closing_pitch(cached)),
                None => {
                    let start = PhraseStart {
                        first_bar: bar,
                        seed: last_pitch,
                        start_on_root: ctx.start_with_root && bar == 0,
                        rests_before: trailing_rests(&notes),
                    };
                    let phrase = generator.generate(&ctx.rhythm, start, rng)?;
                    cache.insert(letter, phrase.notes.clone());
                    (phrase.notes, phrase.last_pitch)
                }
            };

            let held = break_rest_run(&mut bar_notes, trailing_rests(&notes), last_pitch, ctx, rng);
            last_pitch = closing.or(held).or(last_pitch);
            notes.extend(bar_notes);
        }

        Ok(Melody::new(notes))
    }

    fn name(&self) -> &'static str {
        "motif"
    }
}

fn trailing_rests(notes: &[AppNote]) -> usize {
    notes.iter().rev().take_while(|n| n.is_rest()).count()
}

fn closing_pitch(notes: &[AppNote]) -> Option<Pitch> {
    notes.iter().rev().find_map(AppNote::parsed_pitch)
}

/// Sound the leading rest of a bar that would stretch a rest run past the
/// limit, holding the previous pitch (or the tonic when there is none).
///
/// Returns the last pitch sounded this way.
fn break_rest_run(
    bar_notes: &mut [AppNote],
    rests_before: usize,
    last_pitch: Option<Pitch>,
    ctx: &GenerationContext,
    rng: &mut dyn RngCore,
) -> Option<Pitch> {
    let mut run = rests_before;
    let mut held = None;
    for note in bar_notes.iter_mut() {
        if !note.is_rest() {
            break;
        }
        run += 1;
        if run > MAX_CONSECUTIVE_RESTS {
            let pitch = last_pitch.unwrap_or_else(|| {
                Pitch::fold_into_range(Pitch::new(ctx.scale.tonic(), ctx.octave_range.min).midi())
            });
            *note = AppNote::note(pitch, note.duration.clone(), ctx.velocity.sample(rng));
            held = Some(pitch);
            run = 0;
        }
    }
    held
}

/// Re-pitch the last sounding note to the tonic in its own octave
pub fn resolve_to_tonic(melody: &Melody, scale: &Scale) -> Melody {
    let mut resolved = melody.clone();
    let last = resolved
        .notes
        .iter_mut()
        .rev()
        .find_map(|n| n.parsed_pitch().map(|p| (n, p)));
    if let Some((note, pitch)) = last {
        let tonic = Pitch::fold_into_range(Pitch::new(scale.tonic(), pitch.octave).midi());
        *note = note.with_pitch(tonic);
    }
    resolved
}
