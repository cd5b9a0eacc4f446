// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Musical re-scoring of Markov candidates.
//!
//! Raw transition counts are multiplied by four independent factors:
//!
//! 1. **Interval**: leaps wider than a third and repeated notes are damped.
//! 2. **Stability**: each scale degree carries a weight; unlisted degrees
//!    are treated as passing tones.
//! 3. **Chord adherence**: chord tones are boosted and other tones damped in
//!    proportion to the configured adherence.
//! 4. **Contour**: motion in the desired direction for the current point of
//!    the melody is boosted, motion against it damped.
//!
//! Every final weight is at least [`MIN_WEIGHT`].

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::markov::Transitions;
use crate::error::{MelodyError, Result};
use crate::music::{Note, Scale};

/// Floor applied to every final weight
pub const MIN_WEIGHT: f64 = 0.1;

/// Multiplier for leaps larger than a third
pub const LEAP_PENALTY: f64 = 0.6;

/// Multiplier for repeating the current pitch
pub const REPEAT_PENALTY: f64 = 0.6;

/// Multiplier for degrees missing from the degree-weight map
pub const PASSING_TONE_WEIGHT: f64 = 0.8;

/// Degree distance reported for pitches outside the scale
pub const OUT_OF_SCALE_DISTANCE: usize = 99;

/// Largest contour boost (and cut) at full intensity
const CONTOUR_SWING: f64 = 0.5;

/// Melodic contour shaping mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContourMode {
    /// No contour shaping
    #[default]
    None,
    /// Favor upward motion throughout
    Ascending,
    /// Favor downward motion throughout
    Descending,
    /// Rise to the midpoint, then fall increasingly
    Arc,
}

/// Knobs for candidate scoring
#[derive(Debug, Clone, PartialEq)]
pub struct WeightingConfig {
    /// 0-based scale degree -> stability multiplier
    pub degree_weights: BTreeMap<usize, f64>,
    /// Pull toward chord tones (0.0 - 1.0)
    pub chord_adherence: f64,
    /// Contour mode
    pub contour: ContourMode,
}

impl Default for WeightingConfig {
    fn default() -> Self {
        Self {
            degree_weights: default_degree_weights(7),
            chord_adherence: 0.5,
            contour: ContourMode::None,
        }
    }
}

/// Stability weights favoring tonic, dominant, mediant and leading tone
pub fn default_degree_weights(scale_len: usize) -> BTreeMap<usize, f64> {
    let mut weights = BTreeMap::new();
    weights.insert(0, 1.5);
    if scale_len > 2 {
        weights.insert(2, 1.2);
    }
    if scale_len > 4 {
        weights.insert(4, 1.3);
    }
    if scale_len > 1 {
        weights.entry(scale_len - 1).or_insert(1.1);
    }
    weights
}

/// Circular distance in scale degrees between two pitch classes.
///
/// Octaves are attached later by proximity, so B -> C in C major is one
/// step, not six.
pub fn degree_distance(scale: &Scale, from: Note, to: Note) -> usize {
    match (scale.degree_of(from), scale.degree_of(to)) {
        (Some(a), Some(b)) => {
            let d = a.abs_diff(b);
            d.min(scale.len() - d)
        }
        _ => OUT_OF_SCALE_DISTANCE,
    }
}

/// Direction of the nearest move between pitch classes: -1, 0 or 1
pub fn motion_direction(from: Note, to: Note) -> i8 {
    let up = (to.pitch_class() as i16 - from.pitch_class() as i16).rem_euclid(12);
    match up {
        0 => 0,
        1..=6 => 1,
        _ => -1,
    }
}

fn interval_factor(scale: &Scale, current: Note, candidate: Note) -> f64 {
    match degree_distance(scale, current, candidate) {
        0 => REPEAT_PENALTY,
        1 | 2 => 1.0,
        _ => LEAP_PENALTY,
    }
}

fn stability_factor(scale: &Scale, config: &WeightingConfig, candidate: Note) -> f64 {
    scale
        .degree_of(candidate)
        .and_then(|degree| config.degree_weights.get(&degree).copied())
        .unwrap_or(PASSING_TONE_WEIGHT)
}

fn chord_factor(adherence: f64, chord_tones: &[Note], candidate: Note) -> f64 {
    if chord_tones.contains(&candidate) {
        1.0 + adherence * 2.0
    } else {
        1.0 - adherence * 0.75
    }
}

/// Contour multiplier in [0.5, 1.5] for a move in `direction` at `progress`
pub fn contour_factor(mode: ContourMode, progress: f64, direction: i8) -> f64 {
    let progress = progress.clamp(0.0, 1.0);
    let (want_up, intensity) = match mode {
        ContourMode::None => return 1.0,
        ContourMode::Ascending => (true, 1.0),
        ContourMode::Descending => (false, 1.0),
        ContourMode::Arc if progress < 0.5 => (true, 1.0),
        ContourMode::Arc => (false, (progress - 0.5) * 2.0),
    };
    if direction == 0 {
        return 1.0;
    }
    if (direction > 0) == want_up {
        1.0 + CONTOUR_SWING * intensity
    } else {
        1.0 - CONTOUR_SWING * intensity
    }
}

/// Re-score Markov transitions for the next pitch.
///
/// `current` is the last sounding pitch class (interval and contour rules
/// are skipped without one). Chord and contour rules apply only when their
/// inputs are supplied.
pub fn weight_candidates(
    transitions: &Transitions,
    current: Option<Note>,
    scale: &Scale,
    config: &WeightingConfig,
    chord_tones: Option<&[Note]>,
    progress: Option<f64>,
) -> (Vec<Note>, Vec<f64>) {
    let adherence = config.chord_adherence.clamp(0.0, 1.0);
    let mut candidates = Vec::with_capacity(transitions.len());
    let mut weights = Vec::with_capacity(transitions.len());

    for (&candidate, &count) in transitions {
        let mut weight = count as f64;

        if let Some(current) = current {
            weight *= interval_factor(scale, current, candidate);
        }
        weight *= stability_factor(scale, config, candidate);
        if let Some(tones) = chord_tones {
            weight *= chord_factor(adherence, tones, candidate);
        }
        if let (Some(current), Some(progress)) = (current, progress) {
            weight *= contour_factor(config.contour, progress, motion_direction(current, candidate));
        }

        candidates.push(candidate);
        weights.push(if weight.is_finite() { weight.max(MIN_WEIGHT) } else { MIN_WEIGHT });
    }

    (candidates, weights)
}

/// Pick one candidate with probability proportional to its weight
pub fn weighted_choice<T: Copy, R: Rng + ?Sized>(candidates: &[T], weights: &[f64], rng: &mut R) -> Result<T> {
    if candidates.is_empty() {
        return Err(MelodyError::EmptyCandidates);
    }
    if candidates.len() != weights.len() {
        return Err(MelodyError::WeightMismatch {
            candidates: candidates.len(),
            weights: weights.len(),
        });
    }
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 || weights.iter().any(|&w| w < 0.0) {
        return Err(MelodyError::DegenerateWeights(total));
    }

    let mut roll = rng.gen::<f64>() * total;
    for (candidate, &weight) in candidates.iter().zip(weights) {
        roll -= weight;
        if roll < 0.0 {
            return Ok(*candidate);
        }
    }
    // Rounding left a sliver past the last weight
    Ok(candidates[candidates.len() - 1])
}
