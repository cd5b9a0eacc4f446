// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory utilities for melody generation.
//!
//! This module provides scale definitions, pitch parsing, and interval
//! arithmetic shared by the rhythm-independent generation stages.

pub mod pitch;
pub mod scale;

pub use pitch::{interval_semitones, MidiNote, Pitch};
pub use scale::{Note, Scale, ScaleType};
