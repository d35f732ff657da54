//! Weighted Column Histogram
//!
//! Reduces a label grid to three weighted column masses (left, center,
//! right). Near rows and lane markings weigh more than far rows and
//! diffuse obstacle pixels.

mod accumulator;
mod statistics;

pub use accumulator::{Histogram, HistogramAccumulator, HistogramConfig};
use statistics::population_std_dev;
