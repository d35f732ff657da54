//! Ordered arbitration rules
//!
//! Each rule is a predicate plus a handler. The arbiter walks [`RULES`] in
//! order and takes the first handler that returns a command; a handler may
//! abstain (return `None`) even when its predicate held.

use histogram::Histogram;
use segmentation::{Label, LabelGrid};

use crate::{ArbiterConfig, Command, CornerStep, Method, TemporalFilters};

/// Everything a rule may look at for one cycle
pub(crate) struct RuleContext<'a> {
    pub grid: &'a LabelGrid,
    pub histogram: Histogram,
    /// Judge confidence for `histogram`
    pub confidence: f32,
    pub corner: &'a CornerStep,
    pub config: &'a ArbiterConfig,
}

pub(crate) struct Rule {
    pub method: Method,
    pub applies: fn(&RuleContext<'_>, &TemporalFilters) -> bool,
    pub resolve: fn(&RuleContext<'_>, &mut TemporalFilters) -> Option<(Command, f32)>,
}

pub(crate) const RULES: &[Rule] = &[
    Rule {
        method: Method::DegenerateInput,
        applies: |ctx, _| ctx.grid.is_empty(),
        resolve: |_, _| Some((Command::Stop, 0.0)),
    },
    Rule {
        method: Method::HorizontalLane,
        applies: |ctx, _| ctx.corner.flagged(),
        resolve: |ctx, _| ctx.corner.command().map(|c| (c, ctx.config.corner_confidence)),
    },
    Rule {
        method: Method::LanePosition,
        applies: |ctx, _| ctx.grid.fraction(Label::LaneMark) > ctx.config.centroid_lane_fraction,
        resolve: |ctx, _| lane_position(ctx.grid, ctx.config.center_offset_px),
    },
    Rule {
        method: Method::ObstacleAvoidance,
        applies: |ctx, _| ctx.grid.fraction(Label::Obstacle) > ctx.config.obstacle_fraction,
        resolve: |ctx, _| Some((emptiest_column(&ctx.histogram), ctx.confidence)),
    },
    Rule {
        method: Method::WeightedHistogram,
        applies: |ctx, _| ctx.grid.fraction(Label::LaneMark) > ctx.config.histogram_lane_fraction,
        resolve: weighted_histogram,
    },
    Rule {
        method: Method::HoldPrevious,
        applies: |ctx, filters| filters.memory().hold_count() < ctx.config.hold_limit,
        resolve: |ctx, filters| {
            filters
                .memory()
                .last_command()
                .map(|c| (c, ctx.config.hold_confidence))
        },
    },
    Rule {
        method: Method::UncertainStop,
        applies: |_, _| true,
        resolve: |_, _| Some((Command::Stop, 0.0)),
    },
];

/// Steer toward the midpoint of the two lane-mark centroids
///
/// Abstains unless both halves carry lane marks. On odd widths the middle
/// column belongs to neither half.
pub(crate) fn lane_position(grid: &LabelGrid, center_offset_px: f64) -> Option<(Command, f32)> {
    let width = grid.width();
    let left = grid.centroid_x(Label::LaneMark, 0..width / 2)?;
    let right = grid.centroid_x(Label::LaneMark, (width + 1) / 2..width)?;

    let image_center = width as f64 / 2.0;
    let offset = (left + right) / 2.0 - image_center;
    let offset_ratio = offset.abs() / image_center;

    if offset.abs() < center_offset_px {
        return Some((Command::Center, (1.0 - offset_ratio) as f32));
    }
    let command = if offset > 0.0 { Command::Right } else { Command::Left };
    Some((command, offset_ratio.min(1.0) as f32))
}

/// Column with the least mass; ties prefer center, then right
pub(crate) fn emptiest_column(histogram: &Histogram) -> Command {
    let min = histogram.left.min(histogram.center).min(histogram.right);
    if histogram.center == min {
        Command::Center
    } else if histogram.right == min {
        Command::Right
    } else {
        Command::Left
    }
}

fn weighted_histogram(ctx: &RuleContext<'_>, filters: &mut TemporalFilters) -> Option<(Command, f32)> {
    let mean = filters.smooth(ctx.histogram);
    let difference = mean.left - mean.right;

    let command = if difference.abs() < ctx.config.center_deadzone_weighted_units {
        Command::Center
    } else if difference > 0.0 {
        Command::Left
    } else {
        Command::Right
    };
    Some((command, ctx.confidence))
}
