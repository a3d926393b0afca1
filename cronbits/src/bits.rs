//! Fixed-width bit sets backing every schedule field.
//!
//! Each field stores one bit per calendar value. The widest field is the year
//! (130 values), and the two day fields also carry a reserved flag bit at
//! position [`BitSet::STAR`], so three machine words cover every field.

use crate::bounds::Bounds;

macro_rules! debug_assert_position {
    ($bit:expr) => {
        debug_assert!(
            $bit < BitSet::CAPACITY,
            "bit position {} outside of bit set capacity",
            $bit
        )
    };
}

/// A set of field positions, stored inline.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub struct BitSet([u64; 3]);

impl BitSet {
    /// Number of addressable positions.
    pub const CAPACITY: u32 = 192;

    /// Reserved position marking a day field written as `*` or `?`.
    ///
    /// It lies above every numeric position so it is never read as a
    /// calendar value.
    pub const STAR: u32 = 160;

    pub const fn empty() -> Self {
        Self([0; 3])
    }

    /// Every `step`-th position from `min` through `max` inclusive.
    pub fn range(min: u32, max: u32, step: u32) -> Self {
        let mut set = Self::empty();
        let step = step.max(1) as usize;
        for bit in (min..=max).step_by(step) {
            set.insert(bit);
        }
        set
    }

    /// Collect the given positions.
    pub fn from_values<I: IntoIterator<Item = u32>>(values: I) -> Self {
        let mut set = Self::empty();
        for bit in values {
            set.insert(bit);
        }
        set
    }

    #[inline]
    pub fn insert(&mut self, bit: u32) {
        debug_assert_position!(bit);
        if bit < Self::CAPACITY {
            self.0[(bit / 64) as usize] |= 1u64 << (bit % 64);
        }
    }

    #[inline]
    pub fn contains(&self, bit: u32) -> bool {
        if bit >= Self::CAPACITY {
            return false;
        }
        self.0[(bit / 64) as usize] & (1u64 << (bit % 64)) != 0
    }

    pub fn union(self, other: Self) -> Self {
        Self([
            self.0[0] | other.0[0],
            self.0[1] | other.0[1],
            self.0[2] | other.0[2],
        ])
    }

    pub fn is_empty(&self) -> bool {
        self.0 == [0; 3]
    }

    /// Number of set positions, including the star bit.
    pub fn len(&self) -> u32 {
        self.0.iter().map(|word| word.count_ones()).sum()
    }

    #[inline]
    pub fn is_star(&self) -> bool {
        self.contains(Self::STAR)
    }

    pub fn with_star(mut self) -> Self {
        self.insert(Self::STAR);
        self
    }

    /// The same set with the star bit cleared.
    pub fn without_star(mut self) -> Self {
        self.0[(Self::STAR / 64) as usize] &= !(1u64 << (Self::STAR % 64));
        self
    }

    /// Whether every value inside `bounds` is present (a wildcard field).
    pub fn covers(&self, bounds: &Bounds) -> bool {
        (bounds.min..=bounds.max).all(|bit| self.contains(bit))
    }

    /// The set values inside `bounds`, ascending. The star bit is never
    /// yielded since it lies outside every field's range.
    pub fn values<'a>(&'a self, bounds: &Bounds) -> impl Iterator<Item = u32> + 'a {
        (bounds.min..=bounds.max).filter(move |&bit| self.contains(bit))
    }
}
