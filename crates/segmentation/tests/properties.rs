//! Property-based tests for the segmenter and label grid

use proptest::prelude::*;
use segmentation::{FrameSegmenter, Label, LabelGrid, SegmenterConfig};
use vision_primitives::Frame;

fn frame_strategy() -> impl Strategy<Value = Frame> {
    (1u32..24, 1u32..16).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<u8>(), (w * h * 3) as usize)
            .prop_map(move |data| Frame::new(data, w, h, 0).unwrap())
    })
}

fn grid_strategy() -> impl Strategy<Value = LabelGrid> {
    (0usize..30, 0usize..20).prop_flat_map(|(w, h)| {
        prop::collection::vec(0u8..3, w * h).prop_map(move |codes| {
            let rows: Vec<&[u8]> = if w == 0 { vec![&[][..]; h] } else { codes.chunks(w).collect() };
            LabelGrid::from_codes(&rows).unwrap()
        })
    })
}

proptest! {
    // Property: every cell has exactly one label
    #[test]
    fn test_label_counts_sum_to_area(grid in grid_strategy()) {
        prop_assert_eq!(grid.counts().total(), grid.width() * grid.height());
    }

    // Property: segmentation output covers the ROI exactly
    #[test]
    fn test_segmented_grid_matches_roi(frame in frame_strategy()) {
        let segmenter = FrameSegmenter::new(SegmenterConfig::default()).unwrap();
        let grid = segmenter.segment(&frame);
        prop_assert_eq!(grid.width(), frame.width as usize);
        prop_assert_eq!(grid.height(), frame.height as usize);
        prop_assert_eq!(grid.counts().total(), (frame.width * frame.height) as usize);
    }

    // Property: identical ROI and parameters give identical grids
    #[test]
    fn test_segmenter_is_pure(frame in frame_strategy(), value_min in 0u8..=255, sat_max in 0u8..=255) {
        let config = SegmenterConfig {
            lane_value_min: value_min,
            lane_saturation_max: sat_max,
            ..Default::default()
        };
        let a = FrameSegmenter::new(config.clone()).unwrap().segment(&frame);
        let b = FrameSegmenter::new(config).unwrap().segment(&frame);
        prop_assert_eq!(a, b);
    }

    // Property: mirroring preserves label counts
    #[test]
    fn test_mirror_preserves_counts(grid in grid_strategy()) {
        let mirrored = grid.mirrored();
        prop_assert_eq!(mirrored.counts(), grid.counts());
        prop_assert_eq!(mirrored.count(Label::LaneMark), grid.count(Label::LaneMark));
    }
}
