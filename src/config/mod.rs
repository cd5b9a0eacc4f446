// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Settings files for melody generation.
//!
//! A settings file bundles the melody settings, the rhythm input and an
//! optional chord progression. YAML is the default format; files ending in
//! `.toml` are read as TOML.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error;
use crate::generators::{self, ContourMode, Melody, OctaveRange, VelocityMode};
use crate::music::Scale;
use crate::rhythm::{RhythmSource, Subdivision};

/// Root of a settings file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SettingsFile {
    /// Generation settings
    #[serde(default)]
    pub melody: MelodySettings,
    /// One bar of rhythm
    #[serde(default)]
    pub rhythm: RhythmConfig,
    /// Chord root per bar as 0-based scale degrees, cycled
    #[serde(default)]
    pub chords: Vec<usize>,
}

impl SettingsFile {
    /// Load settings from a YAML or TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read settings file: {:?}", path))?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let parsed = if is_toml {
            Self::from_toml(&contents)
        } else {
            Self::from_yaml(&contents)
        };
        parsed.with_context(|| format!("Invalid settings file: {:?}", path))
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML settings")
    }

    /// Parse settings from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML settings")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize settings to YAML")
    }

    /// Save settings as YAML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write settings file: {:?}", path.as_ref()))
    }

    /// Resolve the configured key and scale type
    pub fn scale(&self) -> Option<Scale> {
        Scale::parse(&self.melody.key, &self.melody.scale)
    }

    /// Raw rhythm input for the normalizer
    pub fn rhythm_source(&self) -> RhythmSource {
        self.rhythm.to_source()
    }

    /// Random source: seeded when a seed is configured
    pub fn rng(&self) -> StdRng {
        match self.melody.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Generate a melody with the configured random source
    pub fn generate(&self) -> error::Result<Melody> {
        let mut rng = self.rng();
        self.generate_with(&mut rng)
    }

    /// Generate a melody drawing from `rng`
    pub fn generate_with(&self, rng: &mut dyn RngCore) -> error::Result<Melody> {
        let source = self.rhythm_source();
        generators::generate_melody(&self.melody, self.scale(), Some(&source), &self.chords, rng)
    }
}

/// Every knob of the melody generator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MelodySettings {
    /// Tonic (e.g., "C", "F#", "Bb")
    #[serde(default = "default_key")]
    pub key: String,
    /// Scale type (e.g., "major", "dorian", "minor_pentatonic")
    #[serde(default = "default_scale")]
    pub scale: String,
    /// Number of bars
    #[serde(default = "default_bars")]
    pub bars: usize,
    #[serde(default)]
    pub octave_range: OctaveRange,
    /// Markov n-gram order (1 - 4)
    #[serde(default = "default_ngram_order")]
    pub ngram_order: usize,
    /// Train on the fixed tune library as well as scale idioms
    #[serde(default = "default_true")]
    pub include_fixed_motifs: bool,
    /// Build the melody from repeated bar motifs
    #[serde(default)]
    pub use_motif_repetition: bool,
    /// Motif pattern such as "AABC"; random when unset
    #[serde(default)]
    pub motif_pattern: Option<String>,
    /// Vary repeated motifs
    #[serde(default)]
    pub call_and_response: bool,
    /// Chance of a rest at each note position (0.0 - 1.0)
    #[serde(default = "default_rest_probability")]
    pub rest_probability: f64,
    #[serde(default)]
    pub velocity: VelocityMode,
    /// Pull toward chord tones (0.0 - 1.0)
    #[serde(default = "default_chord_adherence")]
    pub chord_adherence: f64,
    #[serde(default)]
    pub contour: ContourMode,
    #[serde(default = "default_true")]
    pub start_with_root_note: bool,
    #[serde(default = "default_true")]
    pub end_with_root_note: bool,
    /// Override stability weights per 0-based degree
    #[serde(default)]
    pub degree_weights: Option<BTreeMap<usize, f64>>,
    /// Fixed random seed for reproducible output
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_key() -> String {
    "C".to_string()
}
fn default_scale() -> String {
    "major".to_string()
}
fn default_bars() -> usize {
    4
}
fn default_ngram_order() -> usize {
    2
}
fn default_true() -> bool {
    true
}
fn default_rest_probability() -> f64 {
    0.1
}
fn default_chord_adherence() -> f64 {
    0.5
}

impl Default for MelodySettings {
    fn default() -> Self {
        Self {
            key: default_key(),
            scale: default_scale(),
            bars: default_bars(),
            octave_range: OctaveRange::default(),
            ngram_order: default_ngram_order(),
            include_fixed_motifs: true,
            use_motif_repetition: false,
            motif_pattern: None,
            call_and_response: false,
            rest_probability: default_rest_probability(),
            velocity: VelocityMode::default(),
            chord_adherence: default_chord_adherence(),
            contour: ContourMode::None,
            start_with_root_note: true,
            end_with_root_note: true,
            degree_weights: None,
            seed: None,
        }
    }
}

/// Rhythm input as written in a settings file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RhythmConfig {
    /// Notated durations ("4n", "8n."); prefix "r" for a rest
    Preset {
        durations: Vec<String>,
        #[serde(default)]
        subdivision: Subdivision,
    },
    /// One slot per step, non-zero starts a note
    Pulses {
        pattern: Vec<u8>,
        #[serde(default)]
        subdivision: Subdivision,
    },
    /// Evenly spread hits
    Euclidean {
        hits: usize,
        steps: usize,
        #[serde(default)]
        rotation: usize,
        #[serde(default)]
        subdivision: Subdivision,
    },
    /// Sequencer slots: bar fraction to start a note, -1 to hold, 0 for silence
    Sequencer {
        slots: Vec<f64>,
        #[serde(default)]
        subdivision: Subdivision,
    },
}

impl Default for RhythmConfig {
    fn default() -> Self {
        RhythmConfig::Preset {
            durations: vec!["4n".to_string(); 4],
            subdivision: Subdivision::Sixteenth,
        }
    }
}

impl RhythmConfig {
    /// Convert to the normalizer's input shape
    pub fn to_source(&self) -> RhythmSource {
        match self {
            RhythmConfig::Preset { durations, subdivision } => RhythmSource::Preset {
                durations: durations.clone(),
                subdivision: *subdivision,
            },
            RhythmConfig::Pulses { pattern, subdivision } => RhythmSource::Euclidean {
                pulses: pattern.iter().map(|&p| p != 0).collect(),
                subdivision: *subdivision,
            },
            RhythmConfig::Euclidean { hits, steps, rotation, subdivision } => {
                RhythmSource::euclidean(*hits, *steps, *rotation, *subdivision)
            }
            RhythmConfig::Sequencer { slots, subdivision } => RhythmSource::Sequencer {
                slots: slots.clone(),
                subdivision: *subdivision,
            },
        }
    }
}
