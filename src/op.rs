// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Elementary mutation operations.
//!
//! An [`Operation`] describes a single structural change to an ordered
//! collection: an insertion, a deletion, an in-place replacement, or a move.
//! The index type is generic so that the same four variants describe both
//! flat collections (`usize` positions) and trees
//! ([`IndexPath`](crate::IndexPath) positions).
//!
//! [`AnyOperation`] is the payload-free projection of an [`Operation`]. It
//! carries only the positions involved, which is all a consumer needs when it
//! re-derives element content on demand (for example, a visual control that
//! queries its data source for cell content). The projection is total and
//! lossy; there is deliberately no way back.

#[cfg(feature = "arbitrary")]
use quickcheck::{Arbitrary, Gen};

/// A single elementary mutation of an ordered collection.
///
/// `T` is the element payload, `I` the addressing scheme: `usize` for flat
/// collections, [`IndexPath`](crate::IndexPath) for trees. In the tree case
/// the payload is a whole subtree, so inserts and updates carry
/// [`TreeNode`](crate::TreeNode)s.
///
/// Operations are pure data. Their semantics live in the application engine
/// (see [`Target`](crate::Target)).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
pub enum Operation<T, I> {
    /// A new element appears at `index`. Elements at `index` and beyond
    /// shift one position later; deeper nesting levels are unaffected.
    Insert {
        /// Position the element appears at.
        index: I,
        /// The element (for trees: the whole subtree) that appears.
        element: T,
    },
    /// The element at `index` is removed. Later elements shift one position
    /// earlier.
    Delete {
        /// Position of the removed element.
        index: I,
    },
    /// The element at `index` is replaced in place. No shift. For trees the
    /// carried node replaces the entire subtree, value and children.
    Update {
        /// Position of the replaced element.
        index: I,
        /// The replacement element.
        element: T,
    },
    /// The element at `from` is removed and re-inserted at `to`, where `to`
    /// addresses the collection *after* the removal.
    ///
    /// Equivalent to a delete followed by an insert, but reported as one
    /// operation so that consumers can preserve element identity (for
    /// example, animate the transition instead of fading out and in).
    Move {
        /// Position the element is taken from, pre-removal.
        from: I,
        /// Position the element lands at, post-removal.
        to: I,
    },
}

impl<T, I: Clone> Operation<T, I> {
    /// Projects this operation onto its payload-free form.
    ///
    /// Total and lossy: `Insert` and `Update` drop their element, `Delete`
    /// and `Move` are carried over as-is.
    pub fn as_any(&self) -> AnyOperation<I> {
        match self {
            Operation::Insert { index, .. } => AnyOperation::Insert {
                index: index.clone(),
            },
            Operation::Delete { index } => AnyOperation::Delete {
                index: index.clone(),
            },
            Operation::Update { index, .. } => AnyOperation::Update {
                index: index.clone(),
            },
            Operation::Move { from, to } => AnyOperation::Move {
                from: from.clone(),
                to: to.clone(),
            },
        }
    }
}

/// An [`Operation`] stripped of its payload; positions only.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
pub enum AnyOperation<I> {
    /// See [`Operation::Insert`].
    Insert {
        /// Position the element appears at.
        index: I,
    },
    /// See [`Operation::Delete`].
    Delete {
        /// Position of the removed element.
        index: I,
    },
    /// See [`Operation::Update`].
    Update {
        /// Position of the replaced element.
        index: I,
    },
    /// See [`Operation::Move`].
    Move {
        /// Position the element is taken from, pre-removal.
        from: I,
        /// Position the element lands at, post-removal.
        to: I,
    },
}

#[cfg(feature = "arbitrary")]
impl<T: Arbitrary, I: Arbitrary> Arbitrary for Operation<T, I> {
    fn arbitrary(g: &mut Gen) -> Self {
        match u8::arbitrary(g) % 4 {
            0 => Operation::Insert {
                index: I::arbitrary(g),
                element: T::arbitrary(g),
            },
            1 => Operation::Delete {
                index: I::arbitrary(g),
            },
            2 => Operation::Update {
                index: I::arbitrary(g),
                element: T::arbitrary(g),
            },
            _ => Operation::Move {
                from: I::arbitrary(g),
                to: I::arbitrary(g),
            },
        }
    }
}

#[cfg(feature = "arbitrary")]
impl<I: Arbitrary> Arbitrary for AnyOperation<I> {
    fn arbitrary(g: &mut Gen) -> Self {
        match u8::arbitrary(g) % 4 {
            0 => AnyOperation::Insert {
                index: I::arbitrary(g),
            },
            1 => AnyOperation::Delete {
                index: I::arbitrary(g),
            },
            2 => AnyOperation::Update {
                index: I::arbitrary(g),
            },
            _ => AnyOperation::Move {
                from: I::arbitrary(g),
                to: I::arbitrary(g),
            },
        }
    }
}
