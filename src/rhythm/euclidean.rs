// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Euclidean pulse patterns.

/// Distribute `hits` pulses as evenly as possible over `steps` slots,
/// then rotate the result left by `rotation` slots.
pub fn euclidean_pattern(hits: usize, steps: usize, rotation: usize) -> Vec<bool> {
    if steps == 0 {
        return vec![];
    }
    if hits >= steps {
        return vec![true; steps];
    }
    if hits == 0 {
        return vec![false; steps];
    }

    // Bjorklund's algorithm
    let mut pattern = vec![vec![true]; hits];
    let mut remainder = vec![vec![false]; steps - hits];

    while remainder.len() > 1 {
        let min_len = pattern.len().min(remainder.len());
        for i in 0..min_len {
            let tail = remainder[i].clone();
            pattern[i].extend(tail);
        }
        let new_remainder: Vec<Vec<bool>> = if pattern.len() > min_len {
            pattern.drain(min_len..).collect()
        } else {
            remainder.drain(min_len..).collect()
        };
        remainder = new_remainder;
    }

    let mut result: Vec<bool> = pattern.into_iter().flatten().collect();
    for r in remainder {
        result.extend(r);
    }
    result.rotate_left(rotation % steps);
    result
}
