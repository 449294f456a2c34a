//! Sample grid generation.
//!
//! Sources are sampled at checkpoints whose spacing grows geometrically, so
//! small trades see fine-grained liquidity while large ones still reach the
//! requested amount in a handful of calls.

use rust_decimal::Decimal;

use crate::domain::Amount;

/// Ascending input checkpoints from zero up to `max`.
///
/// Step `i` has weight `base^i`; weights are normalised to sum to one and
/// checkpoint `i` is `ceil(max * cumulative weight)`. The last checkpoint is
/// exactly `max`. A `base` of one yields an evenly spaced grid.
#[must_use]
pub fn sample_amounts(max: Amount, num_samples: usize, base: Decimal) -> Vec<Amount> {
    if num_samples == 0 {
        return Vec::new();
    }

    let mut weights = Vec::with_capacity(num_samples);
    let mut weight = Decimal::ONE;
    for _ in 0..num_samples {
        weights.push(weight);
        weight *= base;
    }
    let total: Decimal = weights.iter().sum();

    let mut cumulative = Decimal::ZERO;
    weights
        .iter()
        .enumerate()
        .map(|(i, step)| {
            cumulative += step;
            if i + 1 == num_samples {
                max
            } else {
                (max * (cumulative / total)).ceil()
            }
        })
        .collect()
}
