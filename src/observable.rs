// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Change-propagating containers.
//!
//! An [`Observable`] owns a collection and republishes every mutation as a
//! [`Changeset`]. Mutations are **descriptive**: the caller supplies a
//! closure that mutates a copy of the collection and returns the list of
//! elementary operations that mutation corresponds to, rather than having
//! the container diff two snapshots.
//!
//! Updates are atomic. The closure runs against a clone of the current
//! collection; if it returns an error, the clone is discarded and nothing is
//! committed or published. Only when the closure returns normally does the
//! container commit the new state, build a changeset, and notify every
//! subscriber synchronously, in subscription order, before `update` returns.
//!
//! Reentrancy is resolved statically: `update` holds `&mut self` for its
//! full duration while subscribers only receive `&Changeset`, so a
//! subscriber cannot reach back into the container and trigger a nested
//! publication.

use crate::{ApplyError, Changeset, IndexPath, Operation, Target, Tree, TreeNode};
use std::fmt;

/// Identifies one subscription on an [`Observable`], for use with
/// [`Observable::unsubscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber<C: Target> {
    id: SubscriptionId,
    callback: Box<dyn FnMut(&Changeset<C>)>,
}

/// A mutable collection that records each mutation as a [`Changeset`] and
/// notifies observers.
///
/// ```rust
/// use resync::Observable;
///
/// let mut numbers = Observable::new(vec![1, 2, 3]);
/// numbers.subscribe(|changeset| {
///     assert_eq!(changeset.collection(), &vec![1, 3]);
///     assert_eq!(changeset.len(), 1);
/// });
/// numbers.remove(1).unwrap();
/// assert_eq!(numbers.collection(), &vec![1, 3]);
/// ```
pub struct Observable<C: Target + Clone> {
    collection: C,
    subscribers: Vec<Subscriber<C>>,
    next_id: u64,
}

/// An observable flat ordered collection.
pub type ObservableVec<T> = Observable<Vec<T>>;

/// An observable tree collection.
pub type ObservableTree<T> = Observable<Tree<T>>;

impl<C: Target + Clone> Observable<C> {
    /// A container starting out with `initial` and no subscribers.
    pub fn new(initial: C) -> Self {
        Observable {
            collection: initial,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// The current collection state.
    pub fn collection(&self) -> &C {
        &self.collection
    }

    /// Registers an observer. Observers are notified synchronously for every
    /// subsequent update, in subscription order.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Changeset<C>) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            callback: Box::new(callback),
        });
        id
    }

    /// Removes an observer. Returns `false` if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Runs a descriptive update.
    ///
    /// `mutate` receives a copy of the current collection and must return
    /// the operations its mutation corresponds to, in the order they
    /// logically occurred. On `Ok` the copy becomes the current state and a
    /// changeset of (new snapshot, operations) is published to every
    /// subscriber before this method returns. On `Err` the update aborts
    /// with no state change and no publication.
    ///
    /// The container trusts the returned operation list; the round-trip law
    /// connecting it to the mutation is the producer's contract (check it in
    /// tests via [`Changeset::reproduces`]).
    pub fn update<E, F>(&mut self, mutate: F) -> Result<(), E>
    where
        F: FnOnce(&mut C) -> Result<Vec<Operation<C::Element, C::Index>>, E>,
    {
        let mut next = self.collection.clone();
        let operations = mutate(&mut next)?;
        self.collection = next;
        let changeset = Changeset::new(self.collection.clone(), operations);
        for subscriber in &mut self.subscribers {
            (subscriber.callback)(&changeset);
        }
        Ok(())
    }

    /// Applies a single operation through the application engine and
    /// publishes it as a one-operation changeset.
    fn apply_one(&mut self, op: Operation<C::Element, C::Index>) -> Result<(), ApplyError> {
        self.update(move |collection| {
            collection.apply(&op)?;
            Ok(vec![op])
        })
    }
}

impl<T: Clone> Observable<Vec<T>> {
    /// Appends an element, publishing an insert at the end.
    pub fn push(&mut self, element: T) -> Result<(), ApplyError> {
        let index = self.collection.len();
        self.insert(index, element)
    }

    /// Inserts `element` before position `index`.
    pub fn insert(&mut self, index: usize, element: T) -> Result<(), ApplyError> {
        self.apply_one(Operation::Insert { index, element })
    }

    /// Removes the element at `index`.
    pub fn remove(&mut self, index: usize) -> Result<(), ApplyError> {
        self.apply_one(Operation::Delete { index })
    }

    /// Replaces the element at `index` in place.
    pub fn set(&mut self, index: usize, element: T) -> Result<(), ApplyError> {
        self.apply_one(Operation::Update { index, element })
    }

    /// Moves the element at `from` to position `to` (addressing the
    /// post-removal collection).
    pub fn move_element(&mut self, from: usize, to: usize) -> Result<(), ApplyError> {
        self.apply_one(Operation::Move { from, to })
    }
}

impl<T: Clone> Observable<Tree<T>> {
    /// Inserts a subtree so that it ends up at `path`.
    pub fn insert_node(&mut self, path: IndexPath, node: TreeNode<T>) -> Result<(), ApplyError> {
        self.apply_one(Operation::Insert {
            index: path,
            element: node,
        })
    }

    /// Removes the subtree at `path`.
    pub fn remove_node(&mut self, path: IndexPath) -> Result<(), ApplyError> {
        self.apply_one(Operation::Delete { index: path })
    }

    /// Replaces the subtree at `path`, value and children.
    pub fn set_node(&mut self, path: IndexPath, node: TreeNode<T>) -> Result<(), ApplyError> {
        self.apply_one(Operation::Update {
            index: path,
            element: node,
        })
    }

    /// Moves the subtree at `from` to `to` (addressing the post-removal
    /// tree).
    pub fn move_node(&mut self, from: IndexPath, to: IndexPath) -> Result<(), ApplyError> {
        self.apply_one(Operation::Move { from, to })
    }
}

impl<C> fmt::Debug for Observable<C>
where
    C: Target + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("collection", &self.collection)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
