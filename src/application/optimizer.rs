//! Budgeted path optimizer.
//!
//! Searching every interleaving of every source's fills is infeasible, so
//! the optimizer folds single-source paths together best-first:
//!
//! ```text
//! best = paths[0]
//! for i in 1..n:
//!     best = mix_paths(best, paths[i], max(run_limit >> i, MIN_MIX_STEPS))
//! ```
//!
//! Each merge is a priority-ordered depth-first walk over the union of both
//! paths' fills, bounded by its step budget. The first merge gets
//! `run_limit / 2` and each later one half of the previous, so total work
//! stays near `run_limit` regardless of how many sources exist.

use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::domain::rate::rate;
use crate::domain::{
    Amount, ChainId, DomainError, FillArena, FillChain, FillId, MarketSide, Path, Rate,
};

/// Default node-visit budget shared by all merges of one search.
pub const DEFAULT_RUN_LIMIT: usize = 1 << 15;

/// Floor on the per-merge budget so late sources are still considered.
pub const MIN_MIX_STEPS: usize = 32;

/// Configuration for the path optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerConfig {
    /// Total node-visit budget. Merge `i` (from 1) gets `run_limit >> i`.
    pub run_limit: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            run_limit: DEFAULT_RUN_LIMIT,
        }
    }
}

/// Finds the best conflict-free combination of fills for a target input.
#[derive(Debug, Clone, Default)]
pub struct PathOptimizer {
    config: OptimizerConfig,
}

impl PathOptimizer {
    #[must_use]
    pub const fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Choose the best path through `chains` toward `target`.
    ///
    /// Yields to the scheduler once per merge. The result depends only on
    /// the inputs and the run limit.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NoOptimalPath`] if no chain offers any liquidity.
    /// - [`DomainError::InsufficientLiquidity`] if the best path found falls
    ///   short of `target`.
    pub async fn find_optimal_path(
        &self,
        side: MarketSide,
        target: Amount,
        arena: &FillArena,
        chains: &[FillChain],
    ) -> Result<Path, DomainError> {
        if target <= Decimal::ZERO {
            return Ok(Path::new(side, Decimal::ZERO));
        }

        let mut paths: Vec<Path> = chains
            .iter()
            .filter(|chain| !chain.is_empty())
            .map(|chain| single_source_path(side, target, arena, chain))
            .filter(|path| !path.is_empty())
            .collect();
        if paths.is_empty() {
            return Err(DomainError::NoOptimalPath);
        }
        // Stable: ties keep chain order.
        paths.sort_by(|a, b| b.complete_rate().cmp(&a.complete_rate()));

        let mut paths = paths.into_iter();
        let Some(mut best) = paths.next() else {
            return Err(DomainError::NoOptimalPath);
        };
        for (step, next) in paths.enumerate() {
            let budget = step_budget(self.config.run_limit, step + 1);
            best = mix_paths(arena, &best, &next, budget);
            debug!(
                step = step + 1,
                budget,
                fills = best.len(),
                complete_rate = %best.complete_rate(),
                "Merged source path"
            );
            tokio::task::yield_now().await;
        }
        debug_assert!(best.is_valid(arena));

        if best.is_empty() {
            return Err(DomainError::NoOptimalPath);
        }
        if !best.is_complete() {
            return Err(DomainError::InsufficientLiquidity {
                available: best.input(),
                target,
            });
        }
        Ok(best)
    }
}

fn single_source_path(side: MarketSide, target: Amount, arena: &FillArena, chain: &FillChain) -> Path {
    let mut path = Path::new(side, target);
    for id in &chain.fills {
        if path.is_complete() || !path.is_valid_next_fill(arena, *id) {
            break;
        }
        path.push(arena, *id);
    }
    path
}

/// Step budget of the merge at position `step` of the fold.
#[must_use]
pub fn step_budget(run_limit: usize, step: usize) -> usize {
    u32::try_from(step)
        .ok()
        .and_then(|shift| run_limit.checked_shr(shift))
        .unwrap_or(0)
        .max(MIN_MIX_STEPS)
}

/// Best path reachable by interleaving the fills of `path_a` and `path_b`
/// within `max_steps` visited nodes.
///
/// The result is never worse than `path_a`. Candidates are tried best
/// chain first, and in chain order within a chain.
#[must_use]
pub fn mix_paths(arena: &FillArena, path_a: &Path, path_b: &Path, max_steps: usize) -> Path {
    let side = path_a.side();
    let candidates = ordered_candidates(side, arena, path_a, path_b);

    let mut walk = Walk {
        arena,
        candidates: &candidates,
        used: vec![false; candidates.len()],
        steps: 0,
        max_steps,
        best: path_a.clone(),
    };
    walk.visit(&Path::new(side, path_a.target()));
    walk.best
}

fn ordered_candidates(side: MarketSide, arena: &FillArena, path_a: &Path, path_b: &Path) -> Vec<FillId> {
    let mut seen = HashSet::new();
    let mut candidates: Vec<FillId> = path_a
        .fills()
        .iter()
        .chain(path_b.fills())
        .copied()
        .filter(|id| seen.insert(*id))
        .collect();

    let mut totals: BTreeMap<ChainId, (Amount, Amount)> = BTreeMap::new();
    for id in &candidates {
        let fill = &arena[*id];
        let entry = totals.entry(fill.chain).or_default();
        entry.0 += fill.input;
        entry.1 += fill.adjusted_output;
    }
    let chain_rates: BTreeMap<ChainId, Rate> = totals
        .into_iter()
        .map(|(chain, (input, output))| (chain, rate(side, input, output)))
        .collect();

    candidates.sort_by_key(|id| {
        let fill = &arena[*id];
        let chain_rate = chain_rates.get(&fill.chain).copied().unwrap_or_default();
        (Reverse(chain_rate), fill.chain, fill.index)
    });
    candidates
}

struct Walk<'a> {
    arena: &'a FillArena,
    candidates: &'a [FillId],
    used: Vec<bool>,
    steps: usize,
    max_steps: usize,
    best: Path,
}

impl Walk<'_> {
    fn visit(&mut self, path: &Path) {
        self.steps += 1;
        if path.is_better_than(&self.best) {
            self.best = path.clone();
        }
        if path.remaining_input().is_zero() {
            return;
        }
        for slot in 0..self.candidates.len() {
            if self.steps >= self.max_steps {
                return;
            }
            if self.used[slot] {
                continue;
            }
            let id = self.candidates[slot];
            if !path.is_valid_next_fill(self.arena, id) {
                continue;
            }
            self.used[slot] = true;
            let next = path.with_fill(self.arena, id);
            self.visit(&next);
            self.used[slot] = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Fill, FillData, LiquiditySource};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn chain(
        arena: &mut FillArena,
        id: u32,
        source: LiquiditySource,
        slices: &[(Amount, Amount)],
    ) -> FillChain {
        let mut fills: Vec<FillId> = Vec::new();
        for (index, (input, output)) in slices.iter().enumerate() {
            let parent = fills.last().copied();
            fills.push(arena.push(Fill {
                chain: ChainId::new(id),
                index,
                parent,
                source,
                flags: source.flags(),
                input: *input,
                output: *output,
                adjusted_output: *output,
                fill_data: Arc::new(FillData::Plain),
            }));
        }
        FillChain {
            id: ChainId::new(id),
            source,
            fills,
        }
    }

    #[test]
    fn budget_halves_with_floor() {
        assert_eq!(step_budget(1024, 1), 512);
        assert_eq!(step_budget(1024, 3), 128);
        assert_eq!(step_budget(1024, 10), MIN_MIX_STEPS);
        assert_eq!(step_budget(1024, 200), MIN_MIX_STEPS);
    }

    #[tokio::test]
    async fn zero_target_returns_empty_complete_path() {
        let arena = FillArena::new();
        let path = PathOptimizer::default()
            .find_optimal_path(MarketSide::Sell, Decimal::ZERO, &arena, &[])
            .await
            .unwrap();
        assert!(path.is_empty());
        assert!(path.is_complete());
        assert_eq!(path.output(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn no_chains_means_no_optimal_path() {
        let arena = FillArena::new();
        let result = PathOptimizer::default()
            .find_optimal_path(MarketSide::Sell, dec!(10), &arena, &[])
            .await;
        assert_eq!(result, Err(DomainError::NoOptimalPath));
    }

    #[tokio::test]
    async fn splits_across_sources_when_better() {
        let mut arena = FillArena::new();
        let a = chain(
            &mut arena,
            0,
            LiquiditySource::Uniswap,
            &[(dec!(50), dec!(50)), (dec!(50), dec!(10))],
        );
        let b = chain(
            &mut arena,
            1,
            LiquiditySource::Balancer,
            &[(dec!(50), dec!(48)), (dec!(50), dec!(5))],
        );

        let path = PathOptimizer::default()
            .find_optimal_path(MarketSide::Sell, dec!(100), &arena, &[a, b])
            .await
            .unwrap();
        assert_eq!(path.output(), dec!(98));
        assert!(path.is_valid(&arena));
    }

    #[tokio::test]
    async fn partial_liquidity_is_reported() {
        let mut arena = FillArena::new();
        let a = chain(&mut arena, 0, LiquiditySource::Uniswap, &[(dec!(30), dec!(30))]);

        let result = PathOptimizer::default()
            .find_optimal_path(MarketSide::Sell, dec!(100), &arena, &[a])
            .await;
        assert_eq!(
            result,
            Err(DomainError::InsufficientLiquidity {
                available: dec!(30),
                target: dec!(100),
            })
        );
    }

    #[test]
    fn mix_never_returns_worse_than_first_path() {
        let mut arena = FillArena::new();
        let a = chain(&mut arena, 0, LiquiditySource::Uniswap, &[(dec!(100), dec!(99))]);
        let b = chain(&mut arena, 1, LiquiditySource::Eth2Dai, &[(dec!(100), dec!(90))]);
        let path_a = Path::from_fills(MarketSide::Sell, dec!(100), &arena, &a.fills);
        let path_b = Path::from_fills(MarketSide::Sell, dec!(100), &arena, &b.fills);

        let mixed = mix_paths(&arena, &path_a, &path_b, 1);
        assert_eq!(mixed, path_a);
    }

    #[test]
    fn candidates_follow_chain_rate_then_index() {
        let mut arena = FillArena::new();
        let slow = chain(
            &mut arena,
            0,
            LiquiditySource::Uniswap,
            &[(dec!(10), dec!(5)), (dec!(10), dec!(4))],
        );
        let fast = chain(
            &mut arena,
            1,
            LiquiditySource::Balancer,
            &[(dec!(10), dec!(9)), (dec!(10), dec!(8))],
        );
        let path_a = Path::from_fills(MarketSide::Sell, dec!(100), &arena, &slow.fills);
        let path_b = Path::from_fills(MarketSide::Sell, dec!(100), &arena, &fast.fills);

        let ordered = ordered_candidates(MarketSide::Sell, &arena, &path_a, &path_b);
        assert_eq!(
            ordered,
            vec![fast.fills[0], fast.fills[1], slow.fills[0], slow.fills[1]]
        );
    }
}
