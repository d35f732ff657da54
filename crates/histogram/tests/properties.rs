//! Property-based tests for histogram accumulation

use histogram::HistogramAccumulator;
use proptest::prelude::*;
use segmentation::{Label, LabelGrid};

fn grid_strategy() -> impl Strategy<Value = LabelGrid> {
    (1usize..10, 1usize..20).prop_flat_map(|(thirds, h)| {
        let w = thirds * 3;
        prop::collection::vec(0u8..3, w * h).prop_map(move |codes| {
            let rows: Vec<&[u8]> = codes.chunks(w).collect();
            LabelGrid::from_codes(&rows).unwrap()
        })
    })
}

proptest! {
    // Property: mirroring the grid swaps left and right masses
    #[test]
    fn test_mirror_swaps_columns(grid in grid_strategy()) {
        let accumulator = HistogramAccumulator::default();
        let hist = accumulator.accumulate(&grid);
        let mirrored = accumulator.accumulate(&grid.mirrored());
        prop_assert_eq!(mirrored, hist.mirrored());
    }

    // Property: turning a road pixel into a lane mark never lowers the total
    #[test]
    fn test_total_monotone_in_lane_marks(grid in grid_strategy(), pick in any::<prop::sample::Index>()) {
        let accumulator = HistogramAccumulator::default();
        let before = accumulator.accumulate(&grid).total();

        let roads: Vec<(usize, usize)> = (0..grid.height())
            .flat_map(|y| (0..grid.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| grid.get(x, y) == Some(Label::Road))
            .collect();
        prop_assume!(!roads.is_empty());

        let (x, y) = roads[pick.index(roads.len())];
        let mut more_lane = grid.clone();
        more_lane.set(x, y, Label::LaneMark);

        let after = accumulator.accumulate(&more_lane).total();
        prop_assert!(after >= before, "{} < {}", after, before);
    }
}
