//! Fixed-Capacity Ring Buffer
//!
//! Bounded FIFO that overwrites its oldest entry once full. Storage is
//! allocated once at construction.

mod buffer;

pub use buffer::RingBuffer;

use thiserror::Error;

/// Ring buffer error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RingBufferError {
    #[error("Ring buffer capacity must be at least 1")]
    ZeroCapacity,
}
