//! Property-based tests for the steering arbiter

use histogram::HistogramAccumulator;
use proptest::prelude::*;
use segmentation::{Label, LabelGrid};
use steering::{
    ArbiterConfig, Command, DecisionResult, FrameEvidence, HistogramJudge, Method, SteeringArbiter,
};

/// Odd and even widths; on odd widths the middle column sits on the mirror axis
fn grid_strategy() -> impl Strategy<Value = LabelGrid> {
    (1usize..80, 1usize..16).prop_flat_map(|(w, h)| {
        prop::collection::vec(0u8..3, w * h).prop_map(move |codes| {
            let rows: Vec<&[u8]> = codes.chunks(w).collect();
            LabelGrid::from_codes(&rows).unwrap()
        })
    })
}

fn decide_fresh(grid: &LabelGrid) -> DecisionResult {
    let histogram = HistogramAccumulator::default().accumulate(grid);
    let judgement = HistogramJudge::default().judge(&histogram);
    let mut arbiter = SteeringArbiter::new(ArbiterConfig::default()).unwrap();
    arbiter.decide(&FrameEvidence {
        grid,
        histogram,
        confidence: judgement.confidence,
        horizontal_lines: None,
        lookahead: None,
    })
}

proptest! {
    // Property: mirroring the grid swaps the centroid method's left and right
    #[test]
    fn test_mirrored_grid_inverts_lane_position(grid in grid_strategy()) {
        prop_assume!(grid.fraction(Label::LaneMark) < 0.78);
        let original = decide_fresh(&grid);
        prop_assume!(original.method == Method::LanePosition);

        let mirrored = decide_fresh(&grid.mirrored());
        prop_assert_eq!(mirrored.method, Method::LanePosition);
        prop_assert_eq!(mirrored.command, original.command.mirrored());
    }

    // Property: confidence always lies in [0, 1]
    #[test]
    fn test_confidence_in_unit_range(grid in grid_strategy()) {
        let result = decide_fresh(&grid);
        prop_assert!((0.0..=1.0).contains(&result.confidence));
    }

    // Property: a fresh arbiter never holds a previous command
    #[test]
    fn test_fresh_arbiter_never_holds(grid in grid_strategy()) {
        prop_assert_ne!(decide_fresh(&grid).method, Method::HoldPrevious);
    }

    // Property: an all-road grid always stops on a fresh arbiter
    #[test]
    fn test_all_road_stops(w in 1usize..60, h in 1usize..20) {
        let grid = LabelGrid::from_fn(w, h, |_, _| Label::Road);
        let result = decide_fresh(&grid);
        prop_assert_eq!(result.command, Command::Stop);
        prop_assert_eq!(result.confidence, 0.0);
    }
}
