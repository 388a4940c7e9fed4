// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! The mutation application engine.
//!
//! [`Target`] is the seam between changesets and concrete collections: a
//! collection that knows how to apply one [`Operation`] to itself. The crate
//! ships two implementations, `Vec<T>` (flat, `usize`-addressed) and
//! [`Tree<T>`](crate::Tree) ([`IndexPath`]-addressed, with whole subtrees as
//! elements).
//!
//! Every implementation validates an operation's indices against the current
//! collection state *before* mutating, so an `Err` always leaves the
//! collection exactly as it was. A sequence of operations is applied as a
//! left fold, each operation against the result of the previous one.

use crate::{IndexPath, Operation, Tree, TreeNode};
use std::fmt;

/// Error returned when an [`Operation`] cannot be applied to the current
/// collection state.
///
/// All of these are contract violations on the producer's side; none is
/// transient, and the target collection is guaranteed untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    /// A position is outside the valid range for the addressed sibling
    /// level. `len` is the sibling count the position was checked against.
    OutOfBounds {
        /// The offending position.
        index: usize,
        /// The sibling count at the addressed level.
        len: usize,
    },
    /// A tree operation addressed the empty path, which denotes the
    /// root-level reference and no node.
    EmptyPath,
    /// The parent of the addressed position does not exist in the tree.
    UnresolvablePath {
        /// The path whose parent failed to resolve.
        path: IndexPath,
    },
    /// A move would relocate a node to its own position or into its own
    /// subtree, which is undefined.
    MoveIntoOwnSubtree {
        /// The source of the rejected move.
        from: IndexPath,
        /// The destination of the rejected move.
        to: IndexPath,
    },
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyError::OutOfBounds { index, len } => {
                write!(f, "position {index} out of bounds for length {len}")
            }
            ApplyError::EmptyPath => {
                write!(f, "the empty path references the root level, not a node")
            }
            ApplyError::UnresolvablePath { path } => {
                write!(f, "no node at the parent of {path}")
            }
            ApplyError::MoveIntoOwnSubtree { from, to } => {
                write!(f, "cannot move {from} to {to} inside its own subtree")
            }
        }
    }
}

impl std::error::Error for ApplyError {}

/// A collection that elementary [`Operation`]s can be applied to.
///
/// Implementations must validate before mutating: when `apply` returns an
/// error, the collection is unchanged.
pub trait Target {
    /// The element payload carried by insert and update operations.
    type Element: Clone;
    /// The addressing scheme: `usize` for flat collections,
    /// [`IndexPath`] for trees.
    type Index: Clone + fmt::Debug;

    /// Applies a single operation, transforming this collection into the
    /// next state.
    fn apply(&mut self, op: &Operation<Self::Element, Self::Index>) -> Result<(), ApplyError>;

    /// Applies a sequence of operations as a left fold: each operation is
    /// applied against the result of the previous one.
    fn apply_all<'a, I>(&mut self, ops: I) -> Result<(), ApplyError>
    where
        Self::Element: 'a,
        Self::Index: 'a,
        I: IntoIterator<Item = &'a Operation<Self::Element, Self::Index>>,
    {
        for op in ops {
            self.apply(op)?;
        }
        Ok(())
    }
}

impl<T: Clone> Target for Vec<T> {
    type Element = T;
    type Index = usize;

    fn apply(&mut self, op: &Operation<T, usize>) -> Result<(), ApplyError> {
        match op {
            Operation::Insert { index, element } => {
                if *index > self.len() {
                    return Err(ApplyError::OutOfBounds {
                        index: *index,
                        len: self.len(),
                    });
                }
                self.insert(*index, element.clone());
            }
            Operation::Delete { index } => {
                if *index >= self.len() {
                    return Err(ApplyError::OutOfBounds {
                        index: *index,
                        len: self.len(),
                    });
                }
                self.remove(*index);
            }
            Operation::Update { index, element } => {
                if *index >= self.len() {
                    return Err(ApplyError::OutOfBounds {
                        index: *index,
                        len: self.len(),
                    });
                }
                self[*index] = element.clone();
            }
            Operation::Move { from, to } => {
                if *from >= self.len() {
                    return Err(ApplyError::OutOfBounds {
                        index: *from,
                        len: self.len(),
                    });
                }
                // `to` addresses the post-removal collection.
                if *to > self.len() - 1 {
                    return Err(ApplyError::OutOfBounds {
                        index: *to,
                        len: self.len() - 1,
                    });
                }
                let element = self.remove(*from);
                self.insert(*to, element);
            }
        }
        Ok(())
    }
}

impl<T: Clone> Target for Tree<T> {
    type Element = TreeNode<T>;
    type Index = IndexPath;

    fn apply(&mut self, op: &Operation<TreeNode<T>, IndexPath>) -> Result<(), ApplyError> {
        match op {
            Operation::Insert { index, element } => {
                let (parent, position) = index.split().ok_or(ApplyError::EmptyPath)?;
                let children =
                    self.children_mut(&parent)
                        .ok_or_else(|| ApplyError::UnresolvablePath {
                            path: index.clone(),
                        })?;
                if position > children.len() {
                    return Err(ApplyError::OutOfBounds {
                        index: position,
                        len: children.len(),
                    });
                }
                children.insert(position, element.clone());
            }
            Operation::Delete { index } => {
                let (parent, position) = index.split().ok_or(ApplyError::EmptyPath)?;
                let children =
                    self.children_mut(&parent)
                        .ok_or_else(|| ApplyError::UnresolvablePath {
                            path: index.clone(),
                        })?;
                if position >= children.len() {
                    return Err(ApplyError::OutOfBounds {
                        index: position,
                        len: children.len(),
                    });
                }
                children.remove(position);
            }
            Operation::Update { index, element } => {
                let (parent, position) = index.split().ok_or(ApplyError::EmptyPath)?;
                let children =
                    self.children_mut(&parent)
                        .ok_or_else(|| ApplyError::UnresolvablePath {
                            path: index.clone(),
                        })?;
                if position >= children.len() {
                    return Err(ApplyError::OutOfBounds {
                        index: position,
                        len: children.len(),
                    });
                }
                // Replaces the entire subtree, value and children.
                children[position] = element.clone();
            }
            Operation::Move { from, to } => {
                let (from_parent, from_position) =
                    from.split().ok_or(ApplyError::EmptyPath)?;
                let (to_parent, to_position) = to.split().ok_or(ApplyError::EmptyPath)?;
                // Moving a node to itself or underneath itself is undefined.
                if to.starts_with(from) {
                    return Err(ApplyError::MoveIntoOwnSubtree {
                        from: from.clone(),
                        to: to.clone(),
                    });
                }
                // `from` resolves against the pre-operation tree.
                let source = self
                    .children_mut(&from_parent)
                    .ok_or_else(|| ApplyError::UnresolvablePath { path: from.clone() })?;
                if from_position >= source.len() {
                    return Err(ApplyError::OutOfBounds {
                        index: from_position,
                        len: source.len(),
                    });
                }
                let subtree = source.remove(from_position);
                // `to` resolves against the tree after removal. If it does
                // not, put the subtree back so the tree stays untouched.
                let destination_len = match self.children(&to_parent) {
                    Some(children) => children.len(),
                    None => {
                        self.restore(&from_parent, from_position, subtree);
                        return Err(ApplyError::UnresolvablePath { path: to.clone() });
                    }
                };
                if to_position > destination_len {
                    self.restore(&from_parent, from_position, subtree);
                    return Err(ApplyError::OutOfBounds {
                        index: to_position,
                        len: destination_len,
                    });
                }
                if let Some(children) = self.children_mut(&to_parent) {
                    children.insert(to_position, subtree);
                }
            }
        }
        Ok(())
    }
}

impl<T: Clone> Tree<T> {
    /// Undoes a subtree removal after a failed move. The parent is known to
    /// resolve since the removal just succeeded under it.
    fn restore(&mut self, parent: &IndexPath, position: usize, subtree: TreeNode<T>) {
        if let Some(children) = self.children_mut(parent) {
            children.insert(position, subtree);
        }
    }
}
