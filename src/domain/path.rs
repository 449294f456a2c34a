//! Candidate execution plans built from fills.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use super::fill::{ChainId, FillArena, FillData, FillId};
use super::money::{Amount, Rate};
use super::rate::{complete_rate, rate};
use super::side::MarketSide;
use super::source::{LiquiditySource, SourceFlags};

/// An ordered, duplicate-free sequence of fills.
///
/// Running totals are clipped to the target: the last fill contributes only
/// the remaining input, with its output scaled proportionally and its
/// penalty kept whole.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    side: MarketSide,
    target: Amount,
    fills: Vec<FillId>,
    input: Amount,
    output: Amount,
    adjusted_output: Amount,
    flags: SourceFlags,
}

impl Path {
    /// An empty path toward `target`.
    #[must_use]
    pub fn new(side: MarketSide, target: Amount) -> Self {
        Self {
            side,
            target,
            fills: Vec::new(),
            input: Amount::ZERO,
            output: Amount::ZERO,
            adjusted_output: Amount::ZERO,
            flags: SourceFlags::NONE,
        }
    }

    /// A path of `fills` appended in order.
    #[must_use]
    pub fn from_fills(side: MarketSide, target: Amount, arena: &FillArena, fills: &[FillId]) -> Self {
        let mut path = Self::new(side, target);
        for id in fills {
            path.push(arena, *id);
        }
        path
    }

    /// Append a fill, clipped to the remaining input.
    ///
    /// A complete path is left unchanged.
    pub fn push(&mut self, arena: &FillArena, id: FillId) {
        let remaining = self.remaining_input();
        if remaining.is_zero() {
            return;
        }
        let fill = &arena[id];
        let clipped = fill.clipped(remaining);
        self.fills.push(id);
        self.input += clipped.input;
        self.output += clipped.output;
        self.adjusted_output = self.adjusted_output.saturating_add(clipped.adjusted_output);
        self.flags |= fill.flags;
    }

    /// A copy of this path with `id` appended.
    #[must_use]
    pub fn with_fill(&self, arena: &FillArena, id: FillId) -> Self {
        let mut next = self.clone();
        next.push(arena, id);
        next
    }

    /// Whether `id` may be appended: its parent, if any, must be the current
    /// last fill, and the merged flags must stay conflict-free.
    #[must_use]
    pub fn is_valid_next_fill(&self, arena: &FillArena, id: FillId) -> bool {
        let fill = &arena[id];
        if let Some(parent) = fill.parent {
            if self.fills.last() != Some(&parent) {
                return false;
            }
        }
        !(self.flags | fill.flags).has_multi_hop_conflict()
    }

    /// Check every path invariant: clipping, contiguity, no duplicates and
    /// conflict-freedom.
    #[must_use]
    pub fn is_valid(&self, arena: &FillArena) -> bool {
        if self.input > self.target {
            return false;
        }
        let mut seen = HashSet::with_capacity(self.fills.len());
        let mut flags = SourceFlags::NONE;
        for (position, id) in self.fills.iter().enumerate() {
            let fill = &arena[*id];
            if let Some(parent) = fill.parent {
                if position == 0 || self.fills[position - 1] != parent {
                    return false;
                }
            }
            if !seen.insert(*id) {
                return false;
            }
            flags |= fill.flags;
        }
        !flags.has_multi_hop_conflict()
    }

    /// Strict ordering used by every path comparison.
    ///
    /// While either path falls short of the target the one covering more
    /// input wins; otherwise the higher complete rate wins.
    #[must_use]
    pub fn is_better_than(&self, other: &Self) -> bool {
        if !self.is_complete() || !other.is_complete() {
            return self.input > other.input;
        }
        self.complete_rate() > other.complete_rate()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.input >= self.target
    }

    #[must_use]
    pub fn remaining_input(&self) -> Amount {
        (self.target - self.input).max(Amount::ZERO)
    }

    /// Fee-adjusted rate penalized by any shortfall against the target.
    #[must_use]
    pub fn complete_rate(&self) -> Rate {
        complete_rate(self.side, self.input, self.adjusted_output, self.target)
    }

    /// Fee-adjusted unit rate over the covered input.
    #[must_use]
    pub fn adjusted_rate(&self) -> Rate {
        rate(self.side, self.input, self.adjusted_output)
    }

    #[must_use]
    pub fn side(&self) -> MarketSide {
        self.side
    }

    #[must_use]
    pub fn target(&self) -> Amount {
        self.target
    }

    #[must_use]
    pub fn fills(&self) -> &[FillId] {
        &self.fills
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fills.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }

    #[must_use]
    pub fn input(&self) -> Amount {
        self.input
    }

    #[must_use]
    pub fn output(&self) -> Amount {
        self.output
    }

    #[must_use]
    pub fn adjusted_output(&self) -> Amount {
        self.adjusted_output
    }

    #[must_use]
    pub fn flags(&self) -> SourceFlags {
        self.flags
    }

    /// Whether any fill comes from `source`.
    #[must_use]
    pub fn uses(&self, arena: &FillArena, source: LiquiditySource) -> bool {
        self.fills.iter().any(|id| arena[*id].source == source)
    }

    /// Merge runs of contiguous fills from the same non-native chain.
    #[must_use]
    pub fn collapse(&self, arena: &FillArena) -> Vec<CollapsedFill> {
        let mut collapsed: Vec<CollapsedFill> = Vec::new();
        let mut used = Amount::ZERO;
        for id in &self.fills {
            let fill = &arena[*id];
            let clipped = fill.clipped(self.target - used);
            used += clipped.input;
            let sub_fill = SubFill {
                input: clipped.input,
                output: clipped.output,
                adjusted_output: clipped.adjusted_output,
            };

            if !fill.source.is_native() {
                if let Some(last) = collapsed.last_mut() {
                    if last.chain == fill.chain {
                        last.input += sub_fill.input;
                        last.output += sub_fill.output;
                        last.sub_fills.push(sub_fill);
                        continue;
                    }
                }
            }

            collapsed.push(CollapsedFill {
                chain: fill.chain,
                source: fill.source,
                fill_data: Arc::clone(&fill.fill_data),
                input: sub_fill.input,
                output: sub_fill.output,
                sub_fills: vec![sub_fill],
            });
        }
        collapsed
    }
}

/// Amounts contributed by one fill to a collapsed fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubFill {
    pub input: Amount,
    pub output: Amount,
    pub adjusted_output: Amount,
}

/// Contiguous same-source fills merged into one materialization unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollapsedFill {
    pub chain: ChainId,
    pub source: LiquiditySource,
    #[serde(skip_serializing)]
    pub fill_data: Arc<FillData>,
    pub input: Amount,
    pub output: Amount,
    pub sub_fills: Vec<SubFill>,
}
