//! Point storage for the engine
//!
//! The animated tail is a fixed-length window over the most recent samples.
//! Rather than shifting every point on each tick, the window lives in a ring:
//! growth appends slots until the capacity is reached, and once full a push
//! overwrites the oldest slot and advances the head. Reading in logical order
//! from the head is equivalent to rotating the buffer left by one per tick.
//!
//! Slots are reserved up front only up to [`PREALLOC_LIMIT`], so an absurd
//! capacity costs nothing until points actually arrive.

use crate::curve::CurvePoint;

/// Most slots reserved before the first push
pub const PREALLOC_LIMIT: usize = 1 << 16;

/// Fixed-capacity ring of curve points
#[derive(Debug, Clone)]
pub struct PointRing {
    slots: Vec<CurvePoint>,
    capacity: usize,
    /// Slot holding logical index 0
    head: usize,
    len: usize,
}

impl PointRing {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.min(PREALLOC_LIMIT)),
            capacity,
            head: 0,
            len: 0,
        }
    }

    /// Build a full ring from an already generated trace
    pub fn from_points(points: Vec<CurvePoint>) -> Self {
        let len = points.len();
        Self {
            slots: points,
            capacity: len,
            head: 0,
            len,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Append a point at the logical end
    ///
    /// When the ring is full the oldest point is dropped. Returns the dropped
    /// point, if any. A zero-capacity ring stores nothing.
    pub fn push(&mut self, point: CurvePoint) -> Option<CurvePoint> {
        let capacity = self.capacity;
        if capacity == 0 {
            return None;
        }

        if self.len < capacity {
            // Until the first wrap the next slot is at most one past the end
            let slot = (self.head + self.len) % capacity;
            if slot < self.slots.len() {
                self.slots[slot] = point;
            } else {
                self.slots.push(point);
            }
            self.len += 1;
            None
        } else {
            let dropped = std::mem::replace(&mut self.slots[self.head], point);
            self.head = (self.head + 1) % capacity;
            Some(dropped)
        }
    }

    /// Point at logical index `index` (0 is the oldest)
    pub fn get(&self, index: usize) -> Option<CurvePoint> {
        if index >= self.len {
            return None;
        }
        Some(self.slots[(self.head + index) % self.capacity()])
    }

    /// Most recently written point
    pub fn last(&self) -> Option<CurvePoint> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Keep the first `len` points in logical order, dropping the rest
    pub fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Points in logical order, oldest first
    pub fn iter(&self) -> impl Iterator<Item = CurvePoint> + '_ {
        (0..self.len).map(move |i| self.slots[(self.head + i) % self.capacity()])
    }

    pub fn to_vec(&self) -> Vec<CurvePoint> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(v: f64) -> CurvePoint {
        CurvePoint::new(v, -v)
    }

    #[test]
    fn test_push_until_full() {
        let mut ring = PointRing::with_capacity(3);
        assert!(ring.is_empty());

        assert_eq!(ring.push(pt(1.0)), None);
        assert_eq!(ring.push(pt(2.0)), None);
        assert!(!ring.is_full());
        assert_eq!(ring.push(pt(3.0)), None);
        assert!(ring.is_full());
        assert_eq!(ring.to_vec(), vec![pt(1.0), pt(2.0), pt(3.0)]);
    }

    #[test]
    fn test_push_when_full_rotates_left() {
        let mut ring = PointRing::with_capacity(3);
        for v in [1.0, 2.0, 3.0] {
            ring.push(pt(v));
        }

        assert_eq!(ring.push(pt(4.0)), Some(pt(1.0)));
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.to_vec(), vec![pt(2.0), pt(3.0), pt(4.0)]);

        // Wrap all the way around
        for v in [5.0, 6.0, 7.0] {
            ring.push(pt(v));
        }
        assert_eq!(ring.to_vec(), vec![pt(5.0), pt(6.0), pt(7.0)]);
        assert_eq!(ring.last(), Some(pt(7.0)));
        assert_eq!(ring.get(0), Some(pt(5.0)));
        assert_eq!(ring.get(3), None);
    }

    #[test]
    fn test_truncate_keeps_oldest() {
        let mut ring = PointRing::with_capacity(5);
        for v in [1.0, 2.0, 3.0, 4.0, 5.0, 6.0] {
            ring.push(pt(v));
        }
        ring.truncate(3);
        assert_eq!(ring.to_vec(), vec![pt(2.0), pt(3.0), pt(4.0)]);

        ring.truncate(10);
        assert_eq!(ring.len(), 3);
    }

    #[test]
    fn test_clear_resets_head() {
        let mut ring = PointRing::with_capacity(2);
        for v in [1.0, 2.0, 3.0] {
            ring.push(pt(v));
        }
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.last(), None);

        ring.push(pt(9.0));
        assert_eq!(ring.to_vec(), vec![pt(9.0)]);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut ring = PointRing::with_capacity(0);
        assert_eq!(ring.push(pt(1.0)), None);
        assert!(ring.is_empty());
        assert_eq!(ring.iter().count(), 0);
    }

    #[test]
    fn test_huge_capacity_allocates_on_demand() {
        let mut ring = PointRing::with_capacity(usize::MAX / 8);
        assert_eq!(ring.capacity(), usize::MAX / 8);
        assert!(ring.slots.is_empty());

        for v in [1.0, 2.0, 3.0] {
            ring.push(pt(v));
        }
        assert_eq!(ring.slots.len(), 3);
        assert_eq!(ring.to_vec(), vec![pt(1.0), pt(2.0), pt(3.0)]);
        assert!(!ring.is_full());
    }

    #[test]
    fn test_truncate_then_regrow_reuses_slots() {
        let mut ring = PointRing::with_capacity(4);
        for v in [1.0, 2.0, 3.0] {
            ring.push(pt(v));
        }
        ring.truncate(1);
        ring.push(pt(7.0));
        ring.push(pt(8.0));
        ring.push(pt(9.0));
        assert_eq!(ring.to_vec(), vec![pt(1.0), pt(7.0), pt(8.0), pt(9.0)]);
        assert_eq!(ring.slots.len(), 4);
    }

    #[test]
    fn test_from_points_is_full() {
        let ring = PointRing::from_points(vec![pt(1.0), pt(2.0)]);
        assert!(ring.is_full());
        assert_eq!(ring.to_vec(), vec![pt(1.0), pt(2.0)]);
    }
}
