// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Procedural melody generation.
//!
//! A scale and a one-bar rhythm go in; a [`Melody`](generators::Melody) of
//! pitched notes and rests comes out. Pitches are drawn from a Markov table
//! trained on idioms of the scale, re-weighted for voice leading, and laid
//! out across bars either straight through or as repeated motifs.

pub mod config;
pub mod error;
pub mod export;
pub mod generators;
pub mod music;
pub mod rhythm;

pub use config::{MelodySettings, RhythmConfig, SettingsFile};
pub use error::{MelodyError, Result};
pub use generators::{generate_melody, AppNote, GenerationContext, Melody};
