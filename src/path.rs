// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Hierarchical addressing for tree collections.
//!
//! An [`IndexPath`] locates a node in a tree by listing, level by level, the
//! position of each node among its siblings. `[0, 2]` is the third child of
//! the first root node. The empty path denotes the root-level reference: it
//! identifies no node itself, but is the parent under which root positions
//! are looked up.
//!
//! Paths are the addressing currency of this crate precisely because
//! mutation invalidates structural references: a path is only meaningful
//! against a specific collection state, and any applied operation
//! invalidates the paths of elements that shifted.

use smallvec::SmallVec;
use std::fmt;

#[cfg(feature = "arbitrary")]
use quickcheck::{Arbitrary, Gen};

// Inline capacity 8: deeper trees spill to the heap, which is rare for the
// outline-style structures this crate addresses.
type Components = SmallVec<[usize; 8]>;

/// A sequence of sibling positions locating a node from the root of a tree.
///
/// ```rust
/// use resync::{IndexPath, index_path};
///
/// let p = index_path![0, 2, 1];
/// assert_eq!(p.parent(), Some(index_path![0, 2]));
/// assert_eq!(p.position(), Some(1));
/// assert!(p.starts_with(&index_path![0]));
/// assert!(IndexPath::root().is_empty());
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct IndexPath {
    components: Components,
}

impl IndexPath {
    /// The empty path: the root-level reference.
    pub fn root() -> Self {
        Self::default()
    }

    /// Number of levels in this path.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// `true` for the root-level reference.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The sibling positions, outermost level first.
    pub fn components(&self) -> &[usize] {
        &self.components
    }

    /// The path with the last component removed, or `None` for the root
    /// reference.
    pub fn parent(&self) -> Option<IndexPath> {
        let (_, init) = self.components.split_last()?;
        Some(IndexPath {
            components: init.into(),
        })
    }

    /// The position among siblings, or `None` for the root reference.
    pub fn position(&self) -> Option<usize> {
        self.components.last().copied()
    }

    /// Decomposes into `(parent, position)`, or `None` for the root
    /// reference.
    pub fn split(&self) -> Option<(IndexPath, usize)> {
        let (last, init) = self.components.split_last()?;
        Some((
            IndexPath {
                components: init.into(),
            },
            *last,
        ))
    }

    /// The path of the child at `position` under this path.
    pub fn child(&self, position: usize) -> IndexPath {
        let mut components = self.components.clone();
        components.push(position);
        IndexPath { components }
    }

    /// `true` if `prefix` addresses this node or one of its ancestors.
    ///
    /// Every path starts with the root reference.
    pub fn starts_with(&self, prefix: &IndexPath) -> bool {
        self.components.starts_with(&prefix.components)
    }

    /// Iterates over the sibling positions, outermost level first.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.components.iter().copied()
    }
}

impl From<&[usize]> for IndexPath {
    fn from(components: &[usize]) -> Self {
        IndexPath {
            components: components.into(),
        }
    }
}

impl From<Vec<usize>> for IndexPath {
    fn from(components: Vec<usize>) -> Self {
        IndexPath {
            components: components.into(),
        }
    }
}

impl<const N: usize> From<[usize; N]> for IndexPath {
    fn from(components: [usize; N]) -> Self {
        IndexPath {
            components: components.as_slice().into(),
        }
    }
}

impl FromIterator<usize> for IndexPath {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        IndexPath {
            components: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, c) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, "]")
    }
}

#[cfg(feature = "arbitrary")]
impl Arbitrary for IndexPath {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = usize::arbitrary(g) % 4;
        (0..depth).map(|_| usize::arbitrary(g) % 8).collect()
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let components: Vec<usize> = self.components.to_vec();
        Box::new(components.shrink().map(IndexPath::from))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::index_path;

    #[test]
    fn root_has_no_parent_or_position() {
        let root = IndexPath::root();
        assert!(root.is_empty());
        assert_eq!(root.parent(), None);
        assert_eq!(root.position(), None);
        assert_eq!(root.split(), None);
    }

    #[test]
    fn split_decomposes_into_parent_and_position() {
        let p = index_path![1, 4, 2];
        assert_eq!(p.split(), Some((index_path![1, 4], 2)));
        assert_eq!(p.parent(), Some(index_path![1, 4]));
        assert_eq!(p.position(), Some(2));
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn child_appends_a_component() {
        assert_eq!(IndexPath::root().child(3), index_path![3]);
        assert_eq!(index_path![0, 1].child(2), index_path![0, 1, 2]);
    }

    #[test]
    fn ancestry_is_prefix_inclusive() {
        let p = index_path![0, 1, 2];
        assert!(p.starts_with(&IndexPath::root()));
        assert!(p.starts_with(&index_path![0]));
        assert!(p.starts_with(&index_path![0, 1]));
        assert!(p.starts_with(&p.clone()));
        assert!(!p.starts_with(&index_path![1]));
        assert!(!index_path![0, 1].starts_with(&p));
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(index_path![0] < index_path![0, 0]);
        assert!(index_path![0, 9] < index_path![1]);
    }

    #[test]
    fn display_is_dotted() {
        assert_eq!(format!("{}", index_path![0, 2, 1]), "[0.2.1]");
        assert_eq!(format!("{}", IndexPath::root()), "[]");
    }
}
