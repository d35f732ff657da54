//! Label grid produced by the segmenter

use std::ops::Range;

use ndarray::{s, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::SegmentationError;

/// Pixel class
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    #[default]
    Road = 0,
    Obstacle = 1,
    LaneMark = 2,
}

impl TryFrom<u8> for Label {
    type Error = SegmentationError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Label::Road),
            1 => Ok(Label::Obstacle),
            2 => Ok(Label::LaneMark),
            other => Err(SegmentationError::InvalidLabel(other)),
        }
    }
}

/// Per-label pixel counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCounts {
    pub road: usize,
    pub obstacle: usize,
    pub lane_mark: usize,
}

impl LabelCounts {
    pub fn total(&self) -> usize {
        self.road + self.obstacle + self.lane_mark
    }

    pub fn get(&self, label: Label) -> usize {
        match label {
            Label::Road => self.road,
            Label::Obstacle => self.obstacle,
            Label::LaneMark => self.lane_mark,
        }
    }
}

/// Grid of labels, indexed `[row, column]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGrid {
    cells: Array2<Label>,
}

impl LabelGrid {
    /// All-Road grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: Array2::from_elem((height, width), Label::Road),
        }
    }

    /// Build a grid from a closure of `(x, y)`
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Label) -> Self {
        Self {
            cells: Array2::from_shape_fn((height, width), |(y, x)| f(x, y)),
        }
    }

    /// Build a grid from rows of label codes (0, 1, 2)
    pub fn from_codes<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, SegmentationError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        if rows.iter().any(|r| r.as_ref().len() != width) {
            return Err(SegmentationError::RaggedRows);
        }

        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, &code) in row.as_ref().iter().enumerate() {
                grid.cells[[y, x]] = Label::try_from(code)?;
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// True for a zero-area grid, which carries no information
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Label> {
        self.cells.get([y, x]).copied()
    }

    pub fn set(&mut self, x: usize, y: usize, label: Label) {
        if let Some(cell) = self.cells.get_mut([y, x]) {
            *cell = label;
        }
    }

    /// Fill the half-open rectangle `xs` x `ys` (clipped to the grid)
    pub fn fill(&mut self, xs: Range<usize>, ys: Range<usize>, label: Label) {
        let xs = xs.start.min(self.width())..xs.end.min(self.width());
        let ys = ys.start.min(self.height())..ys.end.min(self.height());
        self.cells.slice_mut(s![ys, xs]).fill(label);
    }

    pub fn view(&self) -> ArrayView2<'_, Label> {
        self.cells.view()
    }

    pub fn counts(&self) -> LabelCounts {
        let mut counts = LabelCounts::default();
        for label in self.cells.iter() {
            match label {
                Label::Road => counts.road += 1,
                Label::Obstacle => counts.obstacle += 1,
                Label::LaneMark => counts.lane_mark += 1,
            }
        }
        counts
    }

    pub fn count(&self, label: Label) -> usize {
        self.cells.iter().filter(|&&l| l == label).count()
    }

    /// Share of the whole grid carrying `label` (0 for an empty grid)
    pub fn fraction(&self, label: Label) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.count(label) as f64 / self.area() as f64
    }

    /// Count of `label` within a column range
    pub fn count_in_columns(&self, label: Label, columns: Range<usize>) -> usize {
        let columns = columns.start.min(self.width())..columns.end.min(self.width());
        self.cells
            .slice(s![.., columns])
            .iter()
            .filter(|&&l| l == label)
            .count()
    }

    /// Mean x of `label` pixels within a column range, using pixel centers
    /// (`x + 0.5`). `None` when the range holds no such pixel.
    pub fn centroid_x(&self, label: Label, columns: Range<usize>) -> Option<f64> {
        let start = columns.start.min(self.width());
        let end = columns.end.min(self.width());
        let mut mass = 0usize;
        let mut moment = 0.0f64;
        for (offset, column) in self.cells.slice(s![.., start..end]).axis_iter(Axis(1)).enumerate() {
            let n = column.iter().filter(|&&l| l == label).count();
            mass += n;
            moment += n as f64 * ((start + offset) as f64 + 0.5);
        }
        (mass > 0).then(|| moment / mass as f64)
    }

    /// Left-right mirror image
    pub fn mirrored(&self) -> Self {
        Self {
            cells: self.cells.slice(s![.., ..;-1]).to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_codes() {
        let grid = LabelGrid::from_codes(&[[0u8, 1, 2], [2, 2, 0]]).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(1, 0), Some(Label::Obstacle));
        assert_eq!(grid.get(0, 1), Some(Label::LaneMark));
        assert_eq!(grid.get(3, 0), None);
    }

    #[test]
    fn test_from_codes_rejects_bad_input() {
        assert_eq!(
            LabelGrid::from_codes(&[[0u8, 3]]),
            Err(SegmentationError::InvalidLabel(3))
        );
        let ragged: Vec<Vec<u8>> = vec![vec![0, 0], vec![0]];
        assert_eq!(LabelGrid::from_codes(&ragged), Err(SegmentationError::RaggedRows));
    }

    #[test]
    fn test_counts_and_fraction() {
        let mut grid = LabelGrid::new(10, 10);
        grid.fill(0..5, 0..2, Label::LaneMark);
        grid.fill(5..10, 9..10, Label::Obstacle);

        let counts = grid.counts();
        assert_eq!(counts.lane_mark, 10);
        assert_eq!(counts.obstacle, 5);
        assert_eq!(counts.road, 85);
        assert_eq!(counts.total(), grid.area());
        assert!((grid.fraction(Label::LaneMark) - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_empty_grid() {
        let grid = LabelGrid::new(0, 5);
        assert!(grid.is_empty());
        assert_eq!(grid.fraction(Label::LaneMark), 0.0);
        assert_eq!(grid.counts().total(), 0);
    }

    #[test]
    fn test_centroid() {
        let mut grid = LabelGrid::new(10, 2);
        grid.fill(2..4, 0..2, Label::LaneMark);
        // pixel centers 2.5 and 3.5
        assert_eq!(grid.centroid_x(Label::LaneMark, 0..5), Some(3.0));
        assert_eq!(grid.centroid_x(Label::LaneMark, 5..10), None);
    }

    #[test]
    fn test_mirror() {
        let grid = LabelGrid::from_codes(&[[0u8, 1, 2]]).unwrap();
        let mirrored = grid.mirrored();
        assert_eq!(mirrored, LabelGrid::from_codes(&[[2u8, 1, 0]]).unwrap());
        assert_eq!(mirrored.mirrored(), grid);
    }

    #[test]
    fn test_count_in_columns_clips() {
        let mut grid = LabelGrid::new(4, 1);
        grid.fill(0..4, 0..1, Label::LaneMark);
        assert_eq!(grid.count_in_columns(Label::LaneMark, 2..10), 2);
    }
}
