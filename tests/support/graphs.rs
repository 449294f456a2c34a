use fillroute::domain::{Amount, FillGraph, LiquiditySource};
use fillroute::testkit::graph::GraphBuilder;
use rand::rngs::StdRng;
use rand::Rng;
use rust_decimal::Decimal;

const SOURCES: [LiquiditySource; 6] = [
    LiquiditySource::Uniswap,
    LiquiditySource::UniswapV2,
    LiquiditySource::Balancer,
    LiquiditySource::Kyber,
    LiquiditySource::MultiHop,
    LiquiditySource::Curve,
];

/// A random graph of one to four curve chains and up to three native
/// orders, with a target between 10 and 300.
pub fn random_graph(rng: &mut StdRng) -> (FillGraph, Amount) {
    random_graph_in_units(rng, Decimal::ONE)
}

/// [`random_graph`] with every amount multiplied by `unit`, e.g. `10^18`
/// for graphs in wei.
pub fn random_graph_in_units(rng: &mut StdRng, unit: Decimal) -> (FillGraph, Amount) {
    let mut builder = GraphBuilder::new();

    let chains = rng.gen_range(1..=4);
    for _ in 0..chains {
        let source = SOURCES[rng.gen_range(0..SOURCES.len())];
        let slices = rng.gen_range(1..=5);
        // Rates decrease along the chain, as along a real price curve.
        let mut rate_bps: i64 = rng.gen_range(5_000..=20_000);
        let knots: Vec<(Amount, Amount)> = (0..slices)
            .map(|_| {
                let input = Decimal::from(rng.gen_range(5..=60)) * unit;
                let output = input * Decimal::new(rate_bps, 4);
                rate_bps = (rate_bps - rng.gen_range(0..=1_500)).max(1_000);
                (input, output)
            })
            .collect();
        let penalty = Decimal::from(rng.gen_range(0..=3)) * unit;
        builder.chain_with_penalty(source, penalty, &knots);
    }

    let natives = rng.gen_range(0..=3);
    if natives > 0 {
        let mut orders: Vec<(Amount, Amount)> = (0..natives)
            .map(|_| {
                let input = Decimal::from(rng.gen_range(5..=80)) * unit;
                let output = input * Decimal::new(rng.gen_range(5_000..=20_000), 4);
                (input, output)
            })
            .collect();
        orders.sort_by(|a, b| (b.1 / b.0).cmp(&(a.1 / a.0)));
        builder.natives(&orders);
    }

    let target = Decimal::from(rng.gen_range(10..=300)) * unit;
    (builder.build(), target)
}
