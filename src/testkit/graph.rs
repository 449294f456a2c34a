//! Hand-built fill graphs.

use rust_decimal::Decimal;
use std::sync::Arc;

use crate::domain::{
    Amount, ChainId, Fill, FillArena, FillChain, FillData, FillGraph, FillId, LiquiditySource,
};

/// Builds a [`FillGraph`] slice by slice, bypassing curve sampling.
///
/// Slices are `(input, output)` pairs with no fee penalty unless built with
/// [`GraphBuilder::chain_with_penalty`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    arena: FillArena,
    chains: Vec<FillChain>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_chain(&self) -> ChainId {
        ChainId::new(self.chains.len() as u32)
    }

    /// A parented chain of slices from `source`.
    pub fn chain(&mut self, source: LiquiditySource, slices: &[(Amount, Amount)]) -> ChainId {
        self.chain_with_penalty(source, Decimal::ZERO, slices)
    }

    /// A parented chain whose first slice's adjusted output is reduced by
    /// `penalty`.
    pub fn chain_with_penalty(
        &mut self,
        source: LiquiditySource,
        penalty: Amount,
        slices: &[(Amount, Amount)],
    ) -> ChainId {
        let id = self.next_chain();
        let mut fills: Vec<FillId> = Vec::with_capacity(slices.len());
        for (index, (input, output)) in slices.iter().enumerate() {
            let penalty = if index == 0 { penalty } else { Decimal::ZERO };
            let fill = self.arena.push(Fill {
                chain: id,
                index,
                parent: fills.last().copied(),
                source,
                flags: source.flags(),
                input: *input,
                output: *output,
                adjusted_output: *output - penalty,
                fill_data: Arc::new(FillData::Plain),
            });
            fills.push(fill);
        }
        self.chains.push(FillChain { id, source, fills });
        id
    }

    /// Independent native fills, one per slice, ranked in slice order.
    pub fn natives(&mut self, slices: &[(Amount, Amount)]) -> ChainId {
        let id = self.next_chain();
        let fills = slices
            .iter()
            .enumerate()
            .map(|(index, (input, output))| {
                self.arena.push(Fill {
                    chain: id,
                    index,
                    parent: None,
                    source: LiquiditySource::Native,
                    flags: LiquiditySource::Native.flags(),
                    input: *input,
                    output: *output,
                    adjusted_output: *output,
                    fill_data: Arc::new(FillData::Plain),
                })
            })
            .collect();
        self.chains.push(FillChain {
            id,
            source: LiquiditySource::Native,
            fills,
        });
        id
    }

    /// Fill handles of `chain`.
    pub fn fills(&self, chain: ChainId) -> Vec<FillId> {
        self.chains
            .iter()
            .find(|c| c.id == chain)
            .map(|c| c.fills.clone())
            .unwrap_or_default()
    }

    pub fn build(self) -> FillGraph {
        FillGraph::new(self.arena, self.chains)
    }
}
