// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Changesets: recorded operation sequences plus the snapshot they produce.
//!
//! A [`Changeset`] packages the ordered list of elementary operations a
//! mutation performed together with the post-mutation snapshot of the
//! collection. Its defining invariant is the **round-trip law**: replaying
//! the operations, in order, against the pre-mutation snapshot yields
//! exactly the recorded collection.
//!
//! Operations are listed in the order they logically occurred, not sorted by
//! index. Consumers that replay them must apply each operation against the
//! result of the previous one, since every application shifts the positions
//! of later elements (see [`Target::apply_all`]).
//!
//! A changeset is built once per mutation, is immutable from then on, and is
//! shared with every subscriber of the producing container.

use crate::{AnyOperation, ApplyError, Operation, Target, Tree};

/// An ordered sequence of operations plus the collection snapshot they
/// result in.
#[derive(Clone)]
#[cfg_attr(
    feature = "serde",
    derive(::serde::Deserialize, ::serde::Serialize),
    serde(bound(
        serialize = "C: ::serde::Serialize, C::Element: ::serde::Serialize, \
                     C::Index: ::serde::Serialize",
        deserialize = "C: ::serde::Deserialize<'de>, C::Element: ::serde::Deserialize<'de>, \
                       C::Index: ::serde::Deserialize<'de>"
    ))
)]
pub struct Changeset<C: Target> {
    collection: C,
    operations: Vec<Operation<C::Element, C::Index>>,
}

/// A changeset over a flat ordered collection.
pub type VecChangeset<T> = Changeset<Vec<T>>;

/// A changeset over a tree collection.
pub type TreeChangeset<T> = Changeset<Tree<T>>;

impl<C: Target> Changeset<C> {
    /// Packages a post-mutation snapshot with the operations that produced
    /// it.
    ///
    /// The caller asserts the round-trip law: replaying `operations` against
    /// the pre-mutation state yields `collection`. This is not checked here
    /// (producers are assumed correct at runtime); [`Changeset::reproduces`]
    /// exists so tests can check it.
    pub fn new(collection: C, operations: Vec<Operation<C::Element, C::Index>>) -> Self {
        Changeset {
            collection,
            operations,
        }
    }

    /// The post-mutation snapshot.
    pub fn collection(&self) -> &C {
        &self.collection
    }

    /// Consumes the changeset, returning the snapshot.
    pub fn into_collection(self) -> C {
        self.collection
    }

    /// The recorded operations, in the order they logically occurred.
    pub fn operations(&self) -> &[Operation<C::Element, C::Index>] {
        &self.operations
    }

    /// Number of recorded operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// `true` if no operations were recorded.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// The payload-free projection of the operation sequence.
    pub fn shape(&self) -> Vec<AnyOperation<C::Index>> {
        self.operations.iter().map(Operation::as_any).collect()
    }

    /// Replays the recorded operations against `base`, left to right.
    ///
    /// On success `base` has gone through every intermediate state and, by
    /// the round-trip law, now equals the recorded snapshot. On error `base`
    /// is left at the last consistent intermediate state; since all
    /// application errors are producer contract violations, there is nothing
    /// to recover at that point.
    pub fn apply_to(&self, base: &mut C) -> Result<(), ApplyError> {
        base.apply_all(&self.operations)
    }

    /// Checks the round-trip law against a pre-mutation snapshot: replaying
    /// the operations over `pre` must reproduce the recorded collection.
    ///
    /// A `false` result (or an application error) indicates a producer bug.
    /// Intended for tests and debug assertions.
    pub fn reproduces(&self, pre: &C) -> Result<bool, ApplyError>
    where
        C: Clone + PartialEq,
    {
        let mut replayed = pre.clone();
        self.apply_to(&mut replayed)?;
        Ok(replayed == self.collection)
    }
}

impl<C> std::fmt::Debug for Changeset<C>
where
    C: Target + std::fmt::Debug,
    C::Element: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Changeset")
            .field("collection", &self.collection)
            .field("operations", &self.operations)
            .finish()
    }
}

impl<C> PartialEq for Changeset<C>
where
    C: Target + PartialEq,
    C::Element: PartialEq,
    C::Index: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.collection == other.collection && self.operations == other.operations
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{TreeNode, index_path};

    #[test]
    fn replay_reproduces_the_snapshot() {
        // [A, B, C] -- delete(0) --> [B, C] -- insert(X, 2) --> [B, C, X]
        let ops = vec![
            Operation::Delete { index: 0 },
            Operation::Insert {
                index: 2,
                element: "x",
            },
        ];
        let changeset = Changeset::new(vec!["b", "c", "x"], ops);

        let mut base = vec!["a", "b", "c"];
        changeset.apply_to(&mut base).unwrap();
        assert_eq!(base, vec!["b", "c", "x"]);
        assert!(changeset.reproduces(&vec!["a", "b", "c"]).unwrap());
    }

    #[test]
    fn reproduces_detects_a_wrong_snapshot() {
        let changeset = Changeset::new(vec![1, 2], vec![Operation::Delete { index: 0 }]);
        assert!(!changeset.reproduces(&vec![9, 1, 2]).unwrap());
        assert!(changeset.reproduces(&vec![0, 1, 2]).unwrap());
    }

    #[test]
    fn reproduces_surfaces_inapplicable_operations() {
        let changeset = Changeset::new(vec![1], vec![Operation::Delete { index: 5 }]);
        let err = changeset.reproduces(&vec![1]).unwrap_err();
        assert_eq!(err, ApplyError::OutOfBounds { index: 5, len: 1 });
    }

    #[test]
    fn shape_projects_every_operation() {
        let changeset: TreeChangeset<&str> = Changeset::new(
            Tree::from(vec![TreeNode::leaf("a")]),
            vec![
                Operation::Insert {
                    index: index_path![0],
                    element: TreeNode::leaf("a"),
                },
                Operation::Move {
                    from: index_path![1],
                    to: index_path![0],
                },
            ],
        );
        assert_eq!(
            changeset.shape(),
            vec![
                AnyOperation::Insert {
                    index: index_path![0],
                },
                AnyOperation::Move {
                    from: index_path![1],
                    to: index_path![0],
                },
            ]
        );
    }

    #[test]
    fn empty_changeset_is_the_identity() {
        let changeset: VecChangeset<u8> = Changeset::new(vec![1, 2, 3], vec![]);
        assert!(changeset.is_empty());
        let mut base = vec![1, 2, 3];
        changeset.apply_to(&mut base).unwrap();
        assert_eq!(base, vec![1, 2, 3]);
    }

    #[test]
    fn tree_changeset_round_trips() {
        // [n1[n1a], n2] -- move([0.0] -> [1.0]) --> [n1, n2[n1a]]
        let post = Tree::from(vec![
            TreeNode::leaf("n1"),
            TreeNode::new("n2", vec![TreeNode::leaf("n1a")]),
        ]);
        let changeset = Changeset::new(
            post,
            vec![Operation::Move {
                from: index_path![0, 0],
                to: index_path![1, 0],
            }],
        );
        let pre = Tree::from(vec![
            TreeNode::new("n1", vec![TreeNode::leaf("n1a")]),
            TreeNode::leaf("n2"),
        ]);
        assert!(changeset.reproduces(&pre).unwrap());
    }

    // Random mutation sequences satisfy the round-trip law by construction;
    // the seeds are clamped into valid index ranges against the evolving
    // collection.
    #[quickcheck]
    fn random_flat_changesets_reproduce(initial: Vec<u8>, seeds: Vec<(u8, usize, u8)>) -> bool {
        let mut current = initial.clone();
        let mut ops = Vec::new();
        for (kind, pos, val) in seeds {
            let op = match kind % 4 {
                0 => Operation::Insert {
                    index: pos % (current.len() + 1),
                    element: val,
                },
                1 if !current.is_empty() => Operation::Delete {
                    index: pos % current.len(),
                },
                2 if !current.is_empty() => Operation::Update {
                    index: pos % current.len(),
                    element: val,
                },
                3 if !current.is_empty() => Operation::Move {
                    from: pos % current.len(),
                    to: pos.wrapping_mul(31) % current.len(),
                },
                _ => continue,
            };
            current.apply(&op).unwrap();
            ops.push(op);
        }
        let changeset = Changeset::new(current, ops);
        changeset.reproduces(&initial).unwrap()
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let changeset: VecChangeset<String> = Changeset::new(
            vec!["b".to_owned()],
            vec![
                Operation::Delete { index: 0 },
                Operation::Insert {
                    index: 0,
                    element: "b".to_owned(),
                },
            ],
        );
        let json = serde_json::to_string(&changeset).unwrap();
        let back: VecChangeset<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, changeset);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_paths_are_transparent() {
        let path: crate::IndexPath = index_path![0, 2];
        assert_eq!(serde_json::to_string(&path).unwrap(), "[0,2]");
    }
}
