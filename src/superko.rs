//! Hashes of earlier positions, for positional superko.
//!
//! An open-addressed table with linear probing that supports only insertion,
//! lookup and copying. Zero marks an empty slot, so a stored zero key is
//! tracked by a separate flag. The table doubles before it is half full,
//! so every probe sequence ends at an empty slot.

const EMPTY: u64 = 0;

#[derive(Clone, Debug)]
pub struct SuperKoTable {
    slots: Vec<u64>,
    len: usize,
    contains_zero: bool,
}

impl SuperKoTable {
    /// Creates a table sized for `expected_entries` hashes. Setup stones
    /// can push it past that, in which case it grows.
    pub fn new(expected_entries: usize) -> Self {
        Self {
            slots: vec![EMPTY; expected_entries.max(1) * 2],
            len: 0,
            contains_zero: false,
        }
    }

    /// Number of distinct hashes stored.
    pub fn len(&self) -> usize {
        self.len + usize::from(self.contains_zero)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn home(&self, key: u64) -> usize {
        (key % self.slots.len() as u64) as usize
    }

    pub fn insert(&mut self, key: u64) {
        if key == EMPTY {
            self.contains_zero = true;
            return;
        }
        if 2 * (self.len + 1) > self.slots.len() {
            self.grow();
        }
        if self.place(key) {
            self.len += 1;
        }
    }

    /// Stores a nonzero key; false if it was already present.
    fn place(&mut self, key: u64) -> bool {
        let mut slot = self.home(key);
        while self.slots[slot] != EMPTY {
            if self.slots[slot] == key {
                return false;
            }
            slot = (slot + 1) % self.slots.len();
        }
        self.slots[slot] = key;
        true
    }

    fn grow(&mut self) {
        let new_len = self.slots.len() * 2;
        let old = std::mem::replace(&mut self.slots, vec![EMPTY; new_len]);
        for key in old.into_iter().filter(|&key| key != EMPTY) {
            self.place(key);
        }
        tracing::debug!(slots = self.slots.len(), "superko table grown");
    }

    pub fn contains(&self, key: u64) -> bool {
        if key == EMPTY {
            return self.contains_zero;
        }
        let mut slot = self.home(key);
        while self.slots[slot] != EMPTY {
            if self.slots[slot] == key {
                return true;
            }
            slot = (slot + 1) % self.slots.len();
        }
        false
    }

    pub fn clear(&mut self) {
        self.slots.fill(EMPTY);
        self.len = 0;
        self.contains_zero = false;
    }

    /// Makes this a copy of `other`, allocating only when `other` has grown
    /// past this table's capacity.
    pub fn copy_from(&mut self, other: &SuperKoTable) {
        self.slots.clone_from(&other.slots);
        self.len = other.len;
        self.contains_zero = other.contains_zero;
    }
}
