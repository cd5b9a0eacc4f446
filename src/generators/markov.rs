// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! N-gram transition table over pitch classes.
//!
//! An order-`n` table keys each transition on the `n - 1` preceding pitches
//! (at least one). Fragments shorter than the full window still contribute
//! their shorter prefixes, which gives lookups something to back off to.

use std::collections::BTreeMap;

use crate::music::Note;

/// Next pitch -> observed count (always >= 1)
pub type Transitions = BTreeMap<Note, u32>;

/// Number of preceding pitches used as context for an n-gram order
pub fn context_len(order: usize) -> usize {
    order.saturating_sub(1).max(1)
}

/// Transition counts keyed by pitch context
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkovTable {
    order: usize,
    table: BTreeMap<Vec<Note>, Transitions>,
}

impl MarkovTable {
    /// Count transitions in the training fragments
    pub fn build(sequences: &[Vec<Note>], order: usize) -> Self {
        let window = context_len(order);
        let mut table: BTreeMap<Vec<Note>, Transitions> = BTreeMap::new();

        for sequence in sequences.iter().filter(|s| s.len() >= 2) {
            for i in 1..sequence.len() {
                let context = sequence[i.saturating_sub(window)..i].to_vec();
                *table
                    .entry(context)
                    .or_default()
                    .entry(sequence[i])
                    .or_insert(0) += 1;
            }
        }

        Self {
            order: order.max(1),
            table,
        }
    }

    /// The n-gram order
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of preceding pitches in a full context
    pub fn context_len(&self) -> usize {
        context_len(self.order)
    }

    /// Number of distinct contexts
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if no transitions were recorded
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Transitions for an exact context
    pub fn transitions(&self, context: &[Note]) -> Option<&Transitions> {
        self.table.get(context)
    }

    /// Transitions for the longest known suffix of `history`
    pub fn lookup(&self, history: &[Note]) -> Option<&Transitions> {
        let longest = history.len().min(self.context_len());
        (1..=longest)
            .rev()
            .find_map(|k| self.table.get(&history[history.len() - k..]))
    }

    /// Iterate over all contexts and their transitions
    pub fn iter(&self) -> impl Iterator<Item = (&Vec<Note>, &Transitions)> {
        self.table.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::training::synthesize;
    use crate::music::{Scale, ScaleType};

    #[test]
    fn test_first_order_counts() {
        let sequences = vec![
            vec![Note::C, Note::D, Note::C],
            vec![Note::C, Note::D],
            vec![Note::E],
        ];
        let table = MarkovTable::build(&sequences, 1);
        assert_eq!(table.len(), 2);

        let from_c = table.transitions(&[Note::C]).unwrap();
        assert_eq!(from_c.get(&Note::D), Some(&2));
        let from_d = table.transitions(&[Note::D]).unwrap();
        assert_eq!(from_d.get(&Note::C), Some(&1));
        assert!(table.transitions(&[Note::E]).is_none());
    }

    #[test]
    fn test_context_len() {
        assert_eq!(context_len(1), 1);
        assert_eq!(context_len(2), 1);
        assert_eq!(context_len(3), 2);
        assert_eq!(context_len(0), 1);

        let table = MarkovTable::build(&[vec![Note::C, Note::D]], 0);
        assert_eq!(table.order(), 1);
        assert_eq!(table.context_len(), 1);
        let table = MarkovTable::build(&[vec![Note::C, Note::D]], 4);
        assert_eq!(table.order(), 4);
        assert_eq!(table.context_len(), 3);
    }

    #[test]
    fn test_higher_order_keys_and_backoff() {
        let sequences = vec![vec![Note::C, Note::D, Note::E, Note::F]];
        let table = MarkovTable::build(&sequences, 3);

        assert!(table.transitions(&[Note::C]).is_some());
        assert_eq!(table.transitions(&[Note::C, Note::D]).unwrap().get(&Note::E), Some(&1));
        assert_eq!(table.transitions(&[Note::D, Note::E]).unwrap().get(&Note::F), Some(&1));

        // Unknown pair falls back to the single-pitch context
        let backed_off = table.lookup(&[Note::G, Note::C]).unwrap();
        assert_eq!(backed_off.get(&Note::D), Some(&1));
        assert!(table.lookup(&[Note::B]).is_none());
        assert!(table.lookup(&[]).is_none());
    }

    #[test]
    fn test_every_context_populated() {
        let scale = Scale::new(Note::A, ScaleType::HarmonicMinor);
        for order in 1..=4 {
            let table = MarkovTable::build(&synthesize(&scale, true), order);
            assert!(!table.is_empty());
            for (context, transitions) in table.iter() {
                assert!(!context.is_empty());
                assert!(context.len() <= table.context_len());
                assert!(!transitions.is_empty());
                assert!(transitions.values().all(|&count| count >= 1));
            }
        }
    }
}
