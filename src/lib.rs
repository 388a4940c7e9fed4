// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! # resync: Changeset-Based Collection Synchronization
//!
//! This crate keeps an external observer — typically a visual list or tree
//! control, but generically any **sink** that must mirror a collection's
//! state — in step with a mutable, hierarchically-structured collection by
//! computing and applying minimal sequences of elementary operations instead
//! of full reloads.
//!
//! The heart of the crate is the **changeset model**: a mutation is
//! represented as an ordered sequence of insert/delete/update/move
//! [`Operation`]s addressed by position, uniformly for flat ordered
//! collections (`usize` positions) and for arbitrarily deep trees
//! ([`IndexPath`] positions). Replaying the recorded operations against a
//! copy of the pre-mutation collection reproduces exactly the mutation that
//! produced them — no more, no less. That **round-trip law** is the
//! contract every producer must uphold and every consumer may rely on.
//!
//! ## Core Concepts
//!
//! - [`Operation`]: the elementary-mutation variant type, with
//!   [`AnyOperation`] as its payload-free projection for consumers that only
//!   care about structural shape.
//! - [`IndexPath`]: hierarchical addressing for trees. A path lists the
//!   sibling position at every level; its parent is the path with the last
//!   component removed; the empty path is the root-level reference. Paths,
//!   not references, are the addressing currency, because mutation
//!   invalidates structural references.
//! - [`Changeset`]: an ordered operation sequence plus the post-mutation
//!   snapshot it produces. Built once per mutation, immutable afterwards.
//! - [`Target`]: the application engine seam. `Vec<T>` and [`Tree<T>`]
//!   implement it; applying a changeset is a left fold, each operation
//!   resolved against the result of the previous one.
//! - [`Observable`]: a change-propagating container. Mutations are
//!   **descriptive** — the caller mutates a copy and declares the operations
//!   it performed — and atomic: a failed mutation commits nothing and
//!   publishes nothing.
//! - [`SinkAdapter`]: translates each published changeset into either one
//!   full-reload instruction or one batched sequence of incremental sink
//!   calls, and answers the sink's pull queries (child counts,
//!   expandability, measurement, cells) from the latest snapshot.
//!
//! ## Getting Started: Mirroring a List
//!
//! ```rust
//! use resync::{sink::recording::RecordingSink, Observable, SinkAdapter, SinkConfig};
//! use std::{cell::RefCell, rc::Rc};
//!
//! // A container owning the collection, and an adapter driving a sink.
//! let mut fruit = Observable::new(vec!["apple", "banana"]);
//! let config = SinkConfig::<RecordingSink, &str>::new()
//!     .with_insert_animation("slide-down")
//!     .with_delete_animation("fade-out");
//! let adapter = Rc::new(RefCell::new(SinkAdapter::bound(
//!     config,
//!     fruit.collection().clone(),
//! )));
//! let sink = Rc::new(RefCell::new(RecordingSink::new()));
//!
//! // Subscribe the adapter to the container's changesets.
//! let (a, s) = (Rc::clone(&adapter), Rc::clone(&sink));
//! fruit.subscribe(move |changeset| {
//!     a.borrow_mut().replay(changeset, &mut s.borrow_mut());
//! });
//!
//! // A descriptive mutation publishes one changeset, which the adapter
//! // replays as a single batched insert.
//! fruit.insert(1, "blueberry").unwrap();
//! assert_eq!(
//!     sink.borrow().calls,
//!     ["begin_batch", "insert 1 under [] (slide-down)", "end_batch"],
//! );
//! assert_eq!(fruit.collection(), &vec!["apple", "blueberry", "banana"]);
//! ```
//!
//! ## Trees
//!
//! Tree collections are ordered sequences of [`TreeNode`]s with unbounded
//! nesting. The same four operations apply; the payload of an insert or
//! update is a whole subtree, and a move relocates a subtree (moving a node
//! into its own subtree is rejected). The destination of a move addresses
//! the collection *after* the removal, mirroring the flat case's shift
//! semantics at the relevant nesting level.
//!
//! ```rust
//! use resync::{index_path, Observable, Tree, TreeNode};
//!
//! let mut outline = Observable::new(Tree::from(vec![
//!     TreeNode::new("inbox", vec![TreeNode::leaf("draft")]),
//!     TreeNode::leaf("archive"),
//! ]));
//! outline.move_node(index_path![0, 0], index_path![1, 0]).unwrap();
//! assert_eq!(
//!     outline.collection().value(&index_path![1, 0]),
//!     Some(&"draft"),
//! );
//! ```
//!
//! ## Scope of this Crate
//!
//! This is a purely in-process data-synchronization contract. It does not
//! compute diffs between two arbitrary snapshots (operations are declared
//! by the mutator, not discovered), it does not render or animate anything
//! (the sink does, behind the [`Sink`] trait), and it has no networking or
//! persistence surface.
//!
//! The concurrency model is single-threaded and synchronous: a descriptive
//! mutation runs to completion before control returns to the caller, and
//! subscribers are notified on the mutating thread, in subscription order.
//! A subscriber cannot mutate the container from within its own change
//! handler; the borrow rules make nested publication unrepresentable.
//!
//! All failures in this crate are programming-contract violations (indices
//! out of bounds for the addressed state, moves into a node's own subtree).
//! They are surfaced immediately via [`ApplyError`] and never swallowed;
//! there is no transient-failure category, since the core has no I/O and no
//! external non-determinism.
//!
//! ## Features
//!
//! - `serde`: Enables serialization and deserialization of operations,
//!   paths, trees and changesets.
//! - `arbitrary`: Implements `quickcheck::Arbitrary` for operations, paths
//!   and trees, useful for property-based testing.
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

pub mod apply;
pub use apply::{ApplyError, Target};
pub mod changeset;
pub use changeset::{Changeset, TreeChangeset, VecChangeset};
/// Macros usable for tests and initialization
pub mod macros;
pub mod observable;
pub use observable::{Observable, ObservableTree, ObservableVec, SubscriptionId};
pub mod op;
pub use op::{AnyOperation, Operation};
pub mod path;
pub use path::IndexPath;
pub mod sink;
pub use sink::{
    NullSink, ReplayOutcome, Sink, SinkAdapter, SinkConfig, SinkIndex, SinkSource, Size,
};
pub mod tree;
pub use tree::{Tree, TreeNode};
