//! A fixed-capacity set of points.
//!
//! Insertion, removal, membership and clearing are all O(1); copying is
//! O(len). Elements are packed densely in `data`, and `locations[p]` holds
//! the index of `p` in `data`. Stale entries in `locations` are harmless
//! because membership is confirmed against `data`, which is why neither
//! `clear` nor `copy_from` has to touch the whole array.
//!
//! Removal moves the last element into the hole, so iteration order is not
//! insertion order.

use std::fmt;

use crate::geometry::Point;

#[derive(Clone, Default)]
pub struct PointSet {
    data: Vec<u16>,
    locations: Vec<u16>,
    len: usize,
}

impl PointSet {
    /// Creates an empty set accepting points in `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity <= u16::MAX as usize);
        Self {
            data: vec![0; capacity],
            locations: vec![0; capacity],
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        let loc = self.locations[p] as usize;
        loc < self.len && self.data[loc] as usize == p
    }

    /// Returns the `i`th element in storage order.
    #[inline]
    pub fn get(&self, i: usize) -> Point {
        debug_assert!(i < self.len);
        self.data[i] as Point
    }

    /// Adds `p` if it is not already present.
    #[inline]
    pub fn insert(&mut self, p: Point) {
        if !self.contains(p) {
            self.insert_absent(p);
        }
    }

    /// Adds `p`, which must not be present.
    #[inline]
    pub fn insert_absent(&mut self, p: Point) {
        debug_assert!(!self.contains(p), "{p} already present");
        self.data[self.len] = p as u16;
        self.locations[p] = self.len as u16;
        self.len += 1;
    }

    /// Removes `p` if present.
    #[inline]
    pub fn remove(&mut self, p: Point) {
        if self.contains(p) {
            self.remove_present(p);
        }
    }

    /// Removes `p`, which must be present.
    #[inline]
    pub fn remove_present(&mut self, p: Point) {
        debug_assert!(self.contains(p), "{p} not present");
        self.len -= 1;
        let loc = self.locations[p] as usize;
        let last = self.data[self.len];
        self.data[loc] = last;
        self.locations[last as usize] = loc as u16;
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Adds every element of `other`.
    pub fn union(&mut self, other: &PointSet) {
        for p in other.iter() {
            self.insert(p);
        }
    }

    /// Makes this set equal to `other` without allocating. Both sets must
    /// have the same capacity.
    pub fn copy_from(&mut self, other: &PointSet) {
        debug_assert_eq!(self.data.len(), other.data.len());
        self.len = other.len;
        self.data[..other.len].copy_from_slice(&other.data[..other.len]);
        for (i, &p) in self.data[..self.len].iter().enumerate() {
            self.locations[p as usize] = i as u16;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.data[..self.len].iter().map(|&p| p as Point)
    }

    /// Elements in ascending order. Allocates; meant for tests and display.
    pub fn to_sorted_vec(&self) -> Vec<Point> {
        let mut v: Vec<Point> = self.iter().collect();
        v.sort_unstable();
        v
    }
}

/// Set equality, independent of storage order and capacity.
impl PartialEq for PointSet {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|p| other.contains(p))
    }
}

impl Eq for PointSet {}

impl fmt::Debug for PointSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
