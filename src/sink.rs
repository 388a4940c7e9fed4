// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! The sink capability and the adapter that drives it.
//!
//! A [`Sink`] is the external consumer that must mirror a collection's
//! structure, typically a visual list or tree control. The core never
//! renders anything itself; it only requires the small capability surface
//! defined by the trait: a full reload, a batched-update scope, and four
//! incremental child operations addressed by `(position, parent)` pairs.
//!
//! The [`SinkAdapter`] sits between a changeset producer and a sink. For
//! each changeset it either issues a single full reload or replays the
//! operations one by one inside a batch, choosing the strategy from its
//! [`SinkConfig`] and the changeset itself. It also retains the latest
//! snapshot so it can answer the sink's pull queries (child counts,
//! expandability, measurement, cell construction) at any time outside a
//! batch.
//!
//! The adapter's own logic never inspects element content; everything
//! content-related is resolved through the three pluggable callbacks on
//! [`SinkConfig`].

pub mod recording;

use crate::{AnyOperation, Changeset, IndexPath, Operation, Target, Tree};

/// A preferred display size for a node, as reported by the measurement
/// callback.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
pub struct Size {
    /// Width in sink-defined units.
    pub width: f64,
    /// Height in sink-defined units.
    pub height: f64,
}

/// What the excluded visual-control layer must provide.
///
/// Parents are identified by their [`IndexPath`]; the empty path is the
/// root. `begin_batch`/`end_batch` are guaranteed to be paired around a
/// sequence of incremental calls and are not reentrant.
pub trait Sink {
    /// The sink's animation style for insertions and removals. The core
    /// never interprets styles, it only forwards them.
    type Animation;
    /// The sink's cell handle, produced by the cell-construction callback.
    type Cell;

    /// Unconditional full resynchronization.
    fn reload_all(&mut self);
    /// Opens a batched-update scope.
    fn begin_batch(&mut self);
    /// Closes the batched-update scope.
    fn end_batch(&mut self);
    /// A child appears at `position` under `parent`.
    fn insert_child(&mut self, position: usize, parent: &IndexPath, style: Option<&Self::Animation>);
    /// The child at `position` under `parent` disappears.
    fn remove_child(&mut self, position: usize, parent: &IndexPath, style: Option<&Self::Animation>);
    /// The child at `position` under `parent` must be re-fetched and
    /// redrawn. Always a hard refresh of that node only.
    fn reload_child(&mut self, position: usize, parent: &IndexPath);
    /// The child at `from_position` under `from_parent` moves to
    /// `to_position` under `to_parent`, preserving identity.
    fn move_child(
        &mut self,
        from_position: usize,
        from_parent: &IndexPath,
        to_position: usize,
        to_parent: &IndexPath,
    );
}

/// A sink that ignores everything. Useful when a subscriber only wants the
/// snapshot side of a changeset, and in tests.
pub struct NullSink;

impl Sink for NullSink {
    type Animation = ();
    type Cell = ();

    fn reload_all(&mut self) {}
    fn begin_batch(&mut self) {}
    fn end_batch(&mut self) {}
    fn insert_child(&mut self, _: usize, _: &IndexPath, _: Option<&()>) {}
    fn remove_child(&mut self, _: usize, _: &IndexPath, _: Option<&()>) {}
    fn reload_child(&mut self, _: usize, _: &IndexPath) {}
    fn move_child(&mut self, _: usize, _: &IndexPath, _: usize, _: &IndexPath) {}
}

/// Connects an addressing scheme to the sink's `(position, parent)` space.
///
/// Flat positions live directly under the root; tree paths decompose into
/// their last component and the parent path. The root reference itself has
/// no parent and therefore no sink address.
pub trait SinkIndex {
    /// `(parent, position)` in the sink's addressing space, or `None` if
    /// this index does not address a child slot.
    fn locate(&self) -> Option<(IndexPath, usize)>;
}

impl SinkIndex for usize {
    fn locate(&self) -> Option<(IndexPath, usize)> {
        Some((IndexPath::root(), *self))
    }
}

impl SinkIndex for IndexPath {
    fn locate(&self) -> Option<(IndexPath, usize)> {
        self.split()
    }
}

/// Read access a bound collection offers the sink's pull queries.
pub trait SinkSource {
    /// The per-node value handed to the configuration callbacks.
    type Item;

    /// Number of children under `parent` (the empty path being the root
    /// level), or 0 if `parent` does not resolve.
    fn child_count(&self, parent: &IndexPath) -> usize;

    /// The value at `path`, if it resolves.
    fn item(&self, path: &IndexPath) -> Option<&Self::Item>;
}

impl<T> SinkSource for Vec<T> {
    type Item = T;

    fn child_count(&self, parent: &IndexPath) -> usize {
        if parent.is_empty() { self.len() } else { 0 }
    }

    fn item(&self, path: &IndexPath) -> Option<&T> {
        match path.components() {
            &[position] => self.get(position),
            _ => None,
        }
    }
}

impl<T> SinkSource for Tree<T> {
    type Item = T;

    fn child_count(&self, parent: &IndexPath) -> usize {
        self.children(parent).map_or(0, |children| children.len())
    }

    fn item(&self, path: &IndexPath) -> Option<&T> {
        self.value(path)
    }
}

/// Configuration surface of a [`SinkAdapter`].
///
/// The two animation styles are independently optional; when both are
/// absent the adapter always falls back to full reloads. The three
/// callbacks plug content knowledge into an otherwise content-blind
/// adapter, with the documented fallbacks when absent: not expandable, the
/// sink's default size, the sink's default cell.
pub struct SinkConfig<S: Sink, T> {
    /// Animation used for insertions, or `None` for no animation.
    pub insert_animation: Option<S::Animation>,
    /// Animation used for removals, or `None` for no animation.
    pub delete_animation: Option<S::Animation>,
    /// "Is this node expandable?" Absent: no node is.
    pub is_expandable: Option<Box<dyn Fn(&T) -> bool>>,
    /// Preferred size for a node. Absent (or `None` from the callback): the
    /// sink's default size.
    pub measure_cell: Option<Box<dyn Fn(&T) -> Option<Size>>>,
    /// Display cell for a node. Absent (or `None` from the callback): the
    /// sink's default cell.
    pub create_cell: Option<Box<dyn Fn(&T) -> Option<S::Cell>>>,
}

impl<S: Sink, T> Default for SinkConfig<S, T> {
    fn default() -> Self {
        SinkConfig {
            insert_animation: None,
            delete_animation: None,
            is_expandable: None,
            measure_cell: None,
            create_cell: None,
        }
    }
}

impl<S: Sink, T> SinkConfig<S, T> {
    /// A configuration with no animations and no callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the insertion animation.
    pub fn with_insert_animation(mut self, style: S::Animation) -> Self {
        self.insert_animation = Some(style);
        self
    }

    /// Sets the removal animation.
    pub fn with_delete_animation(mut self, style: S::Animation) -> Self {
        self.delete_animation = Some(style);
        self
    }

    /// Sets the expandability predicate.
    pub fn with_is_expandable<F: Fn(&T) -> bool + 'static>(mut self, predicate: F) -> Self {
        self.is_expandable = Some(Box::new(predicate));
        self
    }

    /// Sets the measurement callback.
    pub fn with_measure_cell<F: Fn(&T) -> Option<Size> + 'static>(mut self, measure: F) -> Self {
        self.measure_cell = Some(Box::new(measure));
        self
    }

    /// Sets the cell-construction callback.
    pub fn with_create_cell<F: Fn(&T) -> Option<S::Cell> + 'static>(mut self, create: F) -> Self {
        self.create_cell = Some(Box::new(create));
        self
    }
}

/// How a [`SinkAdapter::replay`] call was carried out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// The sink received one `reload_all` and nothing else.
    Reloaded,
    /// The sink received one batch with this many incremental operations.
    Batched {
        /// Number of incremental sink calls inside the batch.
        operations: usize,
    },
}

// One precomputed incremental sink call. Replay validates and locates every
// operation before the first sink call, so a batch never stops halfway.
enum Call {
    Insert {
        position: usize,
        parent: IndexPath,
    },
    Remove {
        position: usize,
        parent: IndexPath,
    },
    Reload {
        position: usize,
        parent: IndexPath,
    },
    Move {
        from_position: usize,
        from_parent: IndexPath,
        to_position: usize,
        to_parent: IndexPath,
    },
}

/// Translates changesets into sink instructions and answers the sink's pull
/// queries from the latest snapshot.
///
/// ```rust
/// use resync::{
///     sink::recording::RecordingSink, Changeset, Operation, ReplayOutcome, SinkAdapter,
///     SinkConfig,
/// };
///
/// let config = SinkConfig::<RecordingSink, i32>::new()
///     .with_insert_animation("fade")
///     .with_delete_animation("slide");
/// let mut adapter = SinkAdapter::bound(config, vec![1, 2, 3]);
/// let mut sink = RecordingSink::new();
///
/// let changeset = Changeset::new(vec![2, 3], vec![Operation::Delete { index: 0 }]);
/// let outcome = adapter.replay(&changeset, &mut sink);
/// assert_eq!(outcome, ReplayOutcome::Batched { operations: 1 });
/// assert_eq!(
///     sink.calls,
///     ["begin_batch", "remove 0 under [] (slide)", "end_batch"],
/// );
/// ```
pub struct SinkAdapter<S: Sink, C: SinkSource> {
    config: SinkConfig<S, C::Item>,
    state: Option<C>,
}

impl<S, C> SinkAdapter<S, C>
where
    S: Sink,
    C: SinkSource + Target + Clone,
    C::Index: SinkIndex,
{
    /// An adapter with no bound snapshot yet. The first replay issues a
    /// full reload regardless of configuration, since there is no known
    /// previous state to replay against.
    pub fn new(config: SinkConfig<S, C::Item>) -> Self {
        SinkAdapter {
            config,
            state: None,
        }
    }

    /// An adapter already bound to an initial snapshot.
    pub fn bound(config: SinkConfig<S, C::Item>, initial: C) -> Self {
        SinkAdapter {
            config,
            state: Some(initial),
        }
    }

    /// The latest snapshot this adapter has seen, if any.
    pub fn state(&self) -> Option<&C> {
        self.state.as_ref()
    }

    /// Forces a full resynchronization of the sink. The remedy for a sink
    /// whose structural state has drifted (for example, after a skipped
    /// notification).
    pub fn resync(&self, sink: &mut S) {
        sink.reload_all();
    }

    /// Mirrors one changeset into the sink.
    ///
    /// A single `reload_all` is issued when incremental replay is not
    /// possible or not wanted: both animations unset, an empty operation
    /// list (producers may notify without mutating), no previously bound
    /// snapshot, or a recorded operation that fails validation against the
    /// previous snapshot. Otherwise every operation is replayed, in
    /// recorded order, inside one `begin_batch`/`end_batch` scope.
    ///
    /// Validation happens before the first sink call, so the sink never
    /// observes a partially applied batch.
    pub fn replay(&mut self, changeset: &Changeset<C>, sink: &mut S) -> ReplayOutcome {
        let previous = self.state.replace(changeset.collection().clone());

        if self.config.insert_animation.is_none() && self.config.delete_animation.is_none() {
            sink.reload_all();
            return ReplayOutcome::Reloaded;
        }
        if changeset.is_empty() {
            sink.reload_all();
            return ReplayOutcome::Reloaded;
        }
        let Some(mut scratch) = previous else {
            sink.reload_all();
            return ReplayOutcome::Reloaded;
        };

        let mut calls = Vec::with_capacity(changeset.len());
        for op in changeset.operations() {
            let call = match Self::locate(op) {
                Some(call) => call,
                None => {
                    sink.reload_all();
                    return ReplayOutcome::Reloaded;
                }
            };
            if scratch.apply(op).is_err() {
                sink.reload_all();
                return ReplayOutcome::Reloaded;
            }
            calls.push(call);
        }

        sink.begin_batch();
        for call in &calls {
            match call {
                Call::Insert { position, parent } => {
                    sink.insert_child(*position, parent, self.config.insert_animation.as_ref());
                }
                Call::Remove { position, parent } => {
                    sink.remove_child(*position, parent, self.config.delete_animation.as_ref());
                }
                Call::Reload { position, parent } => {
                    sink.reload_child(*position, parent);
                }
                Call::Move {
                    from_position,
                    from_parent,
                    to_position,
                    to_parent,
                } => {
                    sink.move_child(*from_position, from_parent, *to_position, to_parent);
                }
            }
        }
        sink.end_batch();
        ReplayOutcome::Batched {
            operations: calls.len(),
        }
    }

    fn locate(op: &Operation<C::Element, C::Index>) -> Option<Call> {
        match op.as_any() {
            AnyOperation::Insert { index } => {
                let (parent, position) = index.locate()?;
                Some(Call::Insert { position, parent })
            }
            AnyOperation::Delete { index } => {
                let (parent, position) = index.locate()?;
                Some(Call::Remove { position, parent })
            }
            AnyOperation::Update { index } => {
                let (parent, position) = index.locate()?;
                Some(Call::Reload { position, parent })
            }
            AnyOperation::Move { from, to } => {
                let (from_parent, from_position) = from.locate()?;
                let (to_parent, to_position) = to.locate()?;
                Some(Call::Move {
                    from_position,
                    from_parent,
                    to_position,
                    to_parent,
                })
            }
        }
    }

    /// Pull query: number of children under `parent` in the bound
    /// snapshot. 0 when nothing is bound.
    pub fn number_of_children(&self, parent: &IndexPath) -> usize {
        self.state.as_ref().map_or(0, |s| s.child_count(parent))
    }

    /// Pull query: the path of the child at `position` under `parent`, if
    /// that slot is occupied in the bound snapshot.
    pub fn child(&self, position: usize, parent: &IndexPath) -> Option<IndexPath> {
        (position < self.number_of_children(parent)).then(|| parent.child(position))
    }

    /// Pull query: whether the node at `path` is expandable. Without a
    /// predicate (or a resolvable node), it is not.
    pub fn is_expandable(&self, path: &IndexPath) -> bool {
        match (&self.config.is_expandable, self.lookup(path)) {
            (Some(predicate), Some(item)) => predicate(item),
            _ => false,
        }
    }

    /// Pull query: preferred size for the node at `path`. `None` means the
    /// sink's default size.
    pub fn preferred_size(&self, path: &IndexPath) -> Option<Size> {
        let measure = self.config.measure_cell.as_ref()?;
        measure(self.lookup(path)?)
    }

    /// Pull query: display cell for the node at `path`. `None` means the
    /// sink's default cell.
    pub fn display_cell(&self, path: &IndexPath) -> Option<S::Cell> {
        let create = self.config.create_cell.as_ref()?;
        create(self.lookup(path)?)
    }

    fn lookup(&self, path: &IndexPath) -> Option<&C::Item> {
        self.state.as_ref()?.item(path)
    }
}
