//! Strongly-typed index newtypes.
//!
//! These types prevent mixing up AMR level indices with block indices
//! when both are passed through the source term dispatch.

use std::fmt;

/// Macro to generate index newtypes with common functionality.
macro_rules! define_index {
    (
        $(#[$meta:meta])*
        $name:ident, $display_prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Create a new index.
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Get the raw index value.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// First index (0).
            pub const ZERO: Self = Self(0);

            /// Create an iterator over [0, n) indices.
            pub fn iter(n: usize) -> impl Iterator<Item = $name> + ExactSizeIterator {
                (0..n).map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(idx: $name) -> usize {
                idx.0
            }
        }

        impl<T> std::ops::Index<$name> for [T] {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for [T] {
            #[inline]
            fn index_mut(&mut self, idx: $name) -> &mut T {
                &mut self[idx.0]
            }
        }

        impl<T> std::ops::Index<$name> for Vec<T> {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for Vec<T> {
            #[inline]
            fn index_mut(&mut self, idx: $name) -> &mut T {
                &mut self[idx.0]
            }
        }
    };
}

define_index!(
    /// AMR level index (0 = coarsest).
    ///
    /// # Example
    ///
    /// ```
    /// use abl_forcing::types::LevelIndex;
    ///
    /// let lev = LevelIndex::new(1);
    /// assert_eq!(lev.get(), 1);
    /// ```
    LevelIndex,
    "L"
);

define_index!(
    /// Block index within one AMR level.
    ///
    /// Identifies one box of the level's box array, and therefore one
    /// `CellArray` per field state.
    ///
    /// # Example
    ///
    /// ```
    /// use abl_forcing::types::BlockIndex;
    ///
    /// let block = BlockIndex::new(7);
    /// assert_eq!(block.get(), 7);
    /// ```
    BlockIndex,
    "B"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_index() {
        let idx = LevelIndex::new(2);
        assert_eq!(idx.get(), 2);
        assert_eq!(usize::from(idx), 2);
    }

    #[test]
    fn test_array_indexing() {
        let data = vec![10, 20, 30];
        assert_eq!(data[BlockIndex::new(1)], 20);
    }

    #[test]
    fn test_array_indexing_mut() {
        let mut data = vec![10, 20, 30];
        data[LevelIndex::new(2)] = 100;
        assert_eq!(data[2], 100);
    }

    #[test]
    fn test_iter() {
        let blocks: Vec<_> = BlockIndex::iter(4).collect();
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[3].get(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", LevelIndex::new(5)), "L5");
        assert_eq!(format!("{}", BlockIndex::new(12)), "B12");
    }
}
