//! Property-based tests for the ring buffer

use proptest::prelude::*;
use ring_buffer::RingBuffer;

proptest! {
    // Property: the buffer always holds the newest min(n, capacity) items in order
    #[test]
    fn test_keeps_newest_items(capacity in 1usize..8, items in prop::collection::vec(any::<u16>(), 0..40)) {
        let mut buffer = RingBuffer::new(capacity).unwrap();
        for &item in &items {
            buffer.push(item);
        }

        let keep = items.len().min(capacity);
        let expected: Vec<u16> = items[items.len() - keep..].to_vec();
        let held: Vec<u16> = buffer.iter().copied().collect();
        prop_assert_eq!(held, expected);
        prop_assert!(buffer.len() <= buffer.capacity());
    }
}
