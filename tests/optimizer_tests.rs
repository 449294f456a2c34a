//! Path optimizer integration tests.

mod support;

use fillroute::application::optimizer::{step_budget, DEFAULT_RUN_LIMIT};
use fillroute::application::{mix_paths, OptimizerConfig, PathOptimizer};
use fillroute::domain::{
    DomainError, FillArena, FillGraph, FillId, LiquiditySource, MarketSide, Path,
};
use fillroute::testkit::graph::GraphBuilder;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use support::assertions::{assert_decimal_near, assert_path_invariants};
use support::graphs::{random_graph, random_graph_in_units};

fn optimizer() -> PathOptimizer {
    PathOptimizer::new(OptimizerConfig::default())
}

fn optimize(graph: &FillGraph, target: Decimal) -> Result<Path, DomainError> {
    tokio_test::block_on(optimizer().find_optimal_path(
        MarketSide::Sell,
        target,
        graph.arena(),
        graph.chains(),
    ))
}

fn all_fills(graph: &FillGraph) -> Vec<FillId> {
    graph
        .chains()
        .iter()
        .flat_map(|chain| chain.fills.iter().copied())
        .collect()
}

/// A random walk over valid next fills until complete or stuck.
fn random_path(rng: &mut StdRng, arena: &FillArena, fills: &[FillId], target: Decimal) -> Path {
    let mut path = Path::new(MarketSide::Sell, target);
    loop {
        if path.is_complete() {
            return path;
        }
        let options: Vec<FillId> = fills
            .iter()
            .copied()
            .filter(|id| !path.fills().contains(id) && path.is_valid_next_fill(arena, *id))
            .collect();
        if options.is_empty() || rng.gen_bool(0.15) {
            return path;
        }
        path.push(arena, options[rng.gen_range(0..options.len())]);
    }
}

#[tokio::test]
async fn mixes_pool_slice_with_native_order() {
    let mut builder = GraphBuilder::new();
    let pool = builder.chain(
        LiquiditySource::Uniswap,
        &[
            (dec!(33), dec!(31.68)),
            (dec!(33), dec!(6.6)),
            (dec!(33), dec!(3.3)),
        ],
    );
    builder.natives(&[(dec!(100), dec!(95))]);
    let first_slice = builder.fills(pool)[0];
    let graph = builder.build();

    let path = optimizer()
        .find_optimal_path(MarketSide::Sell, dec!(99), graph.arena(), graph.chains())
        .await
        .expect("optimal path");

    assert!(path.uses(graph.arena(), LiquiditySource::Native));
    assert_eq!(path.fills()[0], first_slice);
    assert_eq!(path.input(), dec!(99));
    // 31.68 from the first slice plus 66 * 0.95 from the order.
    assert_eq!(path.output(), dec!(94.38));
    assert_path_invariants(&path, graph.arena());
}

#[tokio::test]
async fn reports_insufficient_liquidity_when_target_unreachable() {
    let mut builder = GraphBuilder::new();
    builder.chain(LiquiditySource::Uniswap, &[(dec!(100), dec!(200))]);
    builder.natives(&[(dec!(50), dec!(100))]);
    let graph = builder.build();

    let result = optimizer()
        .find_optimal_path(MarketSide::Sell, dec!(1000), graph.arena(), graph.chains())
        .await;

    assert_eq!(
        result,
        Err(DomainError::InsufficientLiquidity {
            available: dec!(150),
            target: dec!(1000),
        })
    );
}

#[tokio::test]
async fn zero_target_yields_empty_path() {
    let mut builder = GraphBuilder::new();
    builder.chain(LiquiditySource::Uniswap, &[(dec!(100), dec!(200))]);
    let graph = builder.build();

    let path = optimizer()
        .find_optimal_path(MarketSide::Sell, Decimal::ZERO, graph.arena(), graph.chains())
        .await
        .expect("empty path");

    assert!(path.is_empty());
    assert_eq!(path.output(), Decimal::ZERO);
}

#[tokio::test]
async fn no_chains_means_no_optimal_path() {
    let graph = GraphBuilder::new().build();

    let result = optimizer()
        .find_optimal_path(MarketSide::Sell, dec!(10), graph.arena(), graph.chains())
        .await;

    assert_eq!(result, Err(DomainError::NoOptimalPath));
}

#[tokio::test]
async fn never_combines_multi_hop_with_conflicting_source() {
    let mut builder = GraphBuilder::new();
    builder.chain(
        LiquiditySource::MultiHop,
        &[(dec!(30), dec!(33)), (dec!(30), dec!(33))],
    );
    builder.chain(
        LiquiditySource::Kyber,
        &[(dec!(30), dec!(32.5)), (dec!(30), dec!(32.5))],
    );
    builder.chain(
        LiquiditySource::Balancer,
        &[(dec!(50), dec!(45)), (dec!(50), dec!(45))],
    );
    let graph = builder.build();

    let path = optimizer()
        .find_optimal_path(MarketSide::Sell, dec!(100), graph.arena(), graph.chains())
        .await
        .expect("optimal path");

    assert!(!path.flags().has_multi_hop_conflict());
    assert!(!(path.uses(graph.arena(), LiquiditySource::MultiHop)
        && path.uses(graph.arena(), LiquiditySource::Kyber)));
    // Both multi-hop slices plus 40 of the first Balancer slice.
    assert_eq!(path.output(), dec!(102));
    assert_path_invariants(&path, graph.arena());
}

#[test]
fn lower_ranked_native_order_may_be_used_alone() {
    let mut builder = GraphBuilder::new();
    let pool = builder.chain(LiquiditySource::Uniswap, &[(dec!(60), dec!(66))]);
    let natives = builder.natives(&[(dec!(100), dec!(100)), (dec!(40), dec!(38))]);
    let pool = builder.fills(pool);
    let natives = builder.fills(natives);
    let graph = builder.build();
    let arena = graph.arena();

    let empty = Path::new(MarketSide::Sell, dec!(100));
    assert!(empty.is_valid_next_fill(arena, natives[1]));

    let path = Path::from_fills(MarketSide::Sell, dec!(100), arena, &[pool[0], natives[1]]);
    assert!(path.is_valid(arena));
    assert!(!path.fills().contains(&natives[0]));
    assert_eq!(path.output(), dec!(104));
}

#[test]
fn optimal_paths_satisfy_invariants() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..64 {
        let (graph, target) = random_graph(&mut rng);
        match optimize(&graph, target) {
            Ok(path) => {
                assert!(path.is_complete());
                assert_eq!(path.input(), target);
                assert_path_invariants(&path, graph.arena());
            }
            Err(DomainError::InsufficientLiquidity { available, target: wanted }) => {
                assert_eq!(wanted, target);
                assert!(available < target);
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn wei_scale_graphs_optimize_without_overflow() {
    let wei = dec!(1000000000000000000);
    let mut rng = StdRng::seed_from_u64(0x18);
    for _ in 0..64 {
        let (graph, target) = random_graph_in_units(&mut rng, wei);
        match optimize(&graph, target) {
            Ok(path) => {
                assert_eq!(path.input(), target);
                assert_path_invariants(&path, graph.arena());
                let orders = path.collapse(graph.arena());
                let input: Decimal = orders.iter().map(|fill| fill.input).sum();
                assert_eq!(input, target);
            }
            Err(DomainError::InsufficientLiquidity { available, .. }) => {
                assert!(available < target);
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}

#[tokio::test]
async fn mixes_pool_slices_with_native_order_at_exact_thirds() {
    let third = dec!(100) / dec!(3);
    let mut builder = GraphBuilder::new();
    let pool = builder.chain(
        LiquiditySource::Uniswap,
        &[
            (third, dec!(0.96) * third),
            (third, dec!(0.2) * third),
            (third, dec!(0.1) * third),
        ],
    );
    builder.natives(&[(dec!(100), dec!(95))]);
    let first_slice = builder.fills(pool)[0];
    let graph = builder.build();

    let path = optimizer()
        .find_optimal_path(MarketSide::Sell, dec!(100), graph.arena(), graph.chains())
        .await
        .expect("optimal path");

    assert!(path.uses(graph.arena(), LiquiditySource::Native));
    assert_eq!(path.len(), 2);
    assert_eq!(path.fills()[0], first_slice);
    assert_decimal_near(path.output(), dec!(95.333333333333333333), dec!(0.000000001));
    assert_path_invariants(&path, graph.arena());
}

#[test]
fn optimization_is_deterministic() {
    for seed in 0..16 {
        let (first, target) = random_graph(&mut StdRng::seed_from_u64(seed));
        let (second, _) = random_graph(&mut StdRng::seed_from_u64(seed));

        let a = optimize(&first, target);
        let b = optimize(&second, target);
        let a_again = optimize(&first, target);

        assert_eq!(a, b, "seed {seed}");
        assert_eq!(a, a_again, "seed {seed}");
    }
}

#[test]
fn mixing_never_worsens_the_first_path() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..48 {
        let (graph, target) = random_graph(&mut rng);
        let arena = graph.arena();
        let fills = all_fills(&graph);
        let a = random_path(&mut rng, arena, &fills, target);
        let b = random_path(&mut rng, arena, &fills, target);

        for budget in [1, 32, 512] {
            let mixed = mix_paths(arena, &a, &b, budget);
            assert!(!a.is_better_than(&mixed));
            assert_path_invariants(&mixed, arena);
        }
    }
}

#[test]
fn path_ordering_is_a_strict_weak_order() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..12 {
        let (graph, target) = random_graph(&mut rng);
        let fills = all_fills(&graph);
        let paths: Vec<Path> = (0..10)
            .map(|_| random_path(&mut rng, graph.arena(), &fills, target))
            .collect();
        let incomparable = |x: &Path, y: &Path| !x.is_better_than(y) && !y.is_better_than(x);

        for a in &paths {
            assert!(!a.is_better_than(a), "irreflexive");
            for b in &paths {
                if a.is_better_than(b) {
                    assert!(!b.is_better_than(a), "asymmetric");
                }
                for c in &paths {
                    if a.is_better_than(b) && b.is_better_than(c) {
                        assert!(a.is_better_than(c), "transitive");
                    }
                    if incomparable(a, b) && incomparable(b, c) {
                        assert!(incomparable(a, c), "incomparability is transitive");
                    }
                }
            }
        }
    }
}

#[test]
fn complete_paths_beat_partial_ones() {
    let mut builder = GraphBuilder::new();
    let cheap = builder.chain(LiquiditySource::Uniswap, &[(dec!(100), dec!(50))]);
    let rich = builder.chain(LiquiditySource::Balancer, &[(dec!(40), dec!(120))]);
    let cheap = builder.fills(cheap);
    let rich = builder.fills(rich);
    let graph = builder.build();

    let complete = Path::from_fills(MarketSide::Sell, dec!(100), graph.arena(), &cheap);
    let partial = Path::from_fills(MarketSide::Sell, dec!(100), graph.arena(), &rich);

    assert!(complete.is_better_than(&partial));
    assert!(!partial.is_better_than(&complete));
}

#[test]
fn step_budget_halves_down_to_floor() {
    assert_eq!(step_budget(DEFAULT_RUN_LIMIT, 1), DEFAULT_RUN_LIMIT / 2);
    assert_eq!(step_budget(DEFAULT_RUN_LIMIT, 3), DEFAULT_RUN_LIMIT / 8);
    assert_eq!(step_budget(DEFAULT_RUN_LIMIT, 40), 32);
}
