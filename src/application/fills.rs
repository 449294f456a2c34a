//! Fill-path construction.
//!
//! Turns sampled curves and fillable native orders into the fill graph the
//! optimizer searches:
//!
//! - every sampled curve becomes a parented chain of delta-fills, clipped
//!   to the target, with the source's flat fee charged on its first fill
//! - every native order becomes an independent root fill clipped to the
//!   target, ranked by fee-adjusted rate
//!
//! Chains whose adjusted rate is not positive are dropped.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

use crate::domain::money::scale;
use crate::domain::rate::rate;
use crate::domain::{
    Amount, ChainId, Fill, FillArena, FillChain, FillData, FillGraph, LiquiditySource, MarketSide,
    NativeOrder, Rate, SampledCurve, SourceFilters,
};
use crate::port::outbound::fees::FeeEstimator;

/// Converts fees denominated in wei into the output token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeConversion {
    /// Output-token base units per wei.
    pub eth_to_output_rate: Rate,
    /// Input-token base units per wei.
    pub eth_to_input_rate: Rate,
}

impl FeeConversion {
    /// Penalty of `fee` wei in output units for a fill of `input` to `output`.
    ///
    /// Without an output rate the fee is priced in the input token and
    /// carried over at the fill's own rate.
    #[must_use]
    pub fn penalty(&self, fee: Amount, input: Amount, output: Amount) -> Amount {
        if fee.is_zero() {
            return Decimal::ZERO;
        }
        if !self.eth_to_output_rate.is_zero() {
            return fee.saturating_mul(self.eth_to_output_rate);
        }
        scale(fee.saturating_mul(self.eth_to_input_rate), output, input)
    }
}

/// Inputs to [`create_fill_paths`].
pub struct FillPathOptions<'a> {
    pub side: MarketSide,
    pub target: Amount,
    pub native_orders: &'a [NativeOrder],
    pub curves: &'a [SampledCurve],
    pub conversion: FeeConversion,
    pub fees: &'a dyn FeeEstimator,
    pub filters: &'a SourceFilters,
}

/// Fill amounts before they are placed in the arena.
struct Draft {
    input: Amount,
    output: Amount,
    adjusted_output: Amount,
}

/// Build the fill graph for one quote.
///
/// Curve chains come first, in curve order, followed by the native
/// pseudo-chain. A zero target yields an empty graph.
#[must_use]
pub fn create_fill_paths(options: &FillPathOptions<'_>) -> FillGraph {
    let mut arena = FillArena::new();
    let mut chains = Vec::new();
    if options.target <= Decimal::ZERO {
        return FillGraph::new(arena, chains);
    }

    let mut next_chain = 0u32;
    for curve in options.curves {
        if curve.source.is_native() || !options.filters.is_allowed(curve.source) {
            continue;
        }
        let id = ChainId::new(next_chain);
        next_chain += 1;
        if let Some(chain) = curve_chain(&mut arena, id, curve, options) {
            chains.push(chain);
        }
    }

    if options.filters.is_allowed(LiquiditySource::Native) {
        if let Some(chain) = native_chain(&mut arena, ChainId::new(next_chain), options) {
            chains.push(chain);
        }
    }

    debug!(
        side = %options.side,
        target = %options.target,
        chains = chains.len(),
        fills = arena.len(),
        "Constructed fill graph"
    );
    FillGraph::new(arena, chains)
}

fn adjust(side: MarketSide, output: Amount, penalty: Amount) -> Amount {
    match side {
        MarketSide::Sell => output.saturating_sub(penalty),
        MarketSide::Buy => output.saturating_add(penalty),
    }
}

fn curve_chain(
    arena: &mut FillArena,
    id: ChainId,
    curve: &SampledCurve,
    options: &FillPathOptions<'_>,
) -> Option<FillChain> {
    let side = options.side;
    let mut drafts: Vec<Draft> = Vec::new();
    let mut previous_input = Decimal::ZERO;
    let mut previous_output = Decimal::ZERO;
    let mut used = Decimal::ZERO;

    for point in curve.points.iter().filter(|point| !point.output.is_zero()) {
        let input = point.input - previous_input;
        let output = point.output - previous_output;
        // The curve stopped improving; later checkpoints are unusable.
        if input <= Decimal::ZERO || output <= Decimal::ZERO {
            break;
        }
        previous_input = point.input;
        previous_output = point.output;

        let penalty = if drafts.is_empty() {
            let fee = options.fees.fee(curve.source, &curve.fill_data);
            options.conversion.penalty(fee, input, output)
        } else {
            Decimal::ZERO
        };

        let remaining = options.target - used;
        let (input, output) = if input > remaining {
            (remaining, scale(output, remaining, input))
        } else {
            (input, output)
        };
        used += input;
        drafts.push(Draft {
            input,
            output,
            adjusted_output: adjust(side, output, penalty),
        });
        if used >= options.target {
            break;
        }
    }

    let total_input: Amount = drafts.iter().map(|draft| draft.input).sum();
    let total_adjusted = drafts
        .iter()
        .fold(Decimal::ZERO, |total, draft| total.saturating_add(draft.adjusted_output));
    if rate(side, total_input, total_adjusted) <= Decimal::ZERO {
        debug!(source = %curve.source, "Dropping chain without positive adjusted rate");
        return None;
    }

    let flags = curve.source.flags();
    let mut fills = Vec::with_capacity(drafts.len());
    for (index, draft) in drafts.into_iter().enumerate() {
        let fill_id = arena.push(Fill {
            chain: id,
            index,
            parent: fills.last().copied(),
            source: curve.source,
            flags,
            input: draft.input,
            output: draft.output,
            adjusted_output: draft.adjusted_output,
            fill_data: Arc::clone(&curve.fill_data),
        });
        fills.push(fill_id);
    }
    Some(FillChain {
        id,
        source: curve.source,
        fills,
    })
}

fn native_chain(
    arena: &mut FillArena,
    id: ChainId,
    options: &FillPathOptions<'_>,
) -> Option<FillChain> {
    let side = options.side;
    let mut ranked: Vec<(Rate, Draft, Arc<FillData>)> = Vec::new();

    for order in options.native_orders {
        let (input, output) = match side {
            MarketSide::Sell => (order.taker_amount_after_fees(), order.maker_amount_after_fees()),
            MarketSide::Buy => (order.maker_amount_after_fees(), order.taker_amount_after_fees()),
        };
        if input.is_zero() || output.is_zero() {
            continue;
        }
        let fill_data = Arc::new(FillData::Native {
            order: order.clone(),
        });
        let fee = options.fees.fee(LiquiditySource::Native, &fill_data);
        let penalty = options.conversion.penalty(fee, input, output);

        let clipped_input = input.min(options.target);
        let clipped_output = scale(output, clipped_input, input);
        let adjusted_output = adjust(side, clipped_output, penalty);
        let adjusted_rate = rate(side, clipped_input, adjusted_output);
        if adjusted_rate <= Decimal::ZERO {
            continue;
        }
        ranked.push((
            adjusted_rate,
            Draft {
                input: clipped_input,
                output: clipped_output,
                adjusted_output,
            },
            fill_data,
        ));
    }

    if ranked.is_empty() {
        return None;
    }
    // Stable: equally priced orders keep their caller order.
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    let flags = LiquiditySource::Native.flags();
    let fills = ranked
        .into_iter()
        .enumerate()
        .map(|(index, (_, draft, fill_data))| {
            arena.push(Fill {
                chain: id,
                index,
                parent: None,
                source: LiquiditySource::Native,
                flags,
                input: draft.input,
                output: draft.output,
                adjusted_output: draft.adjusted_output,
                fill_data,
            })
        })
        .collect();
    Some(FillChain {
        id,
        source: LiquiditySource::Native,
        fills,
    })
}
