//! Property tests for the round-trip law.
//!
//! Every changeset must reproduce its recorded snapshot when replayed over
//! the pre-mutation state. The generators below derive *valid* operation
//! sequences from unconstrained quickcheck seeds by clamping positions into
//! range against the evolving collection, so the law must hold by
//! construction — any failure is an application-engine bug.

use quickcheck_macros::quickcheck;
use resync::{Changeset, IndexPath, Operation, Target, Tree, TreeNode};

/// Raw material for one derived operation.
type Seed = (u8, usize, usize, u8);

fn derive_flat_op(current: &[u8], (kind, a, b, val): Seed) -> Option<Operation<u8, usize>> {
    match kind % 4 {
        0 => Some(Operation::Insert {
            index: a % (current.len() + 1),
            element: val,
        }),
        1 if !current.is_empty() => Some(Operation::Delete {
            index: a % current.len(),
        }),
        2 if !current.is_empty() => Some(Operation::Update {
            index: a % current.len(),
            element: val,
        }),
        3 if !current.is_empty() => Some(Operation::Move {
            from: a % current.len(),
            to: b % current.len(),
        }),
        _ => None,
    }
}

#[quickcheck]
fn flat_changesets_reproduce_their_snapshot(initial: Vec<u8>, seeds: Vec<Seed>) -> bool {
    let mut current = initial.clone();
    let mut ops = Vec::new();
    for seed in seeds {
        if let Some(op) = derive_flat_op(&current, seed) {
            current.apply(&op).unwrap();
            ops.push(op);
        }
    }
    Changeset::new(current, ops).reproduces(&initial).unwrap()
}

#[quickcheck]
fn flat_operations_change_count_as_specified(initial: Vec<u8>, seed: Seed) -> bool {
    let mut current = initial.clone();
    let Some(op) = derive_flat_op(&current, seed) else {
        return true;
    };
    current.apply(&op).unwrap();
    let expected = match op {
        Operation::Insert { .. } => initial.len() + 1,
        Operation::Delete { .. } => initial.len() - 1,
        Operation::Update { .. } | Operation::Move { .. } => initial.len(),
    };
    current.len() == expected
}

#[quickcheck]
fn flat_move_to_same_position_is_identity(initial: Vec<u8>, position: usize) -> bool {
    if initial.is_empty() {
        return true;
    }
    let index = position % initial.len();
    let mut current = initial.clone();
    current
        .apply(&Operation::Move {
            from: index,
            to: index,
        })
        .unwrap();
    current == initial
}

/// Every path at which a node exists.
fn node_paths(tree: &Tree<u8>) -> Vec<IndexPath> {
    tree.iter().map(|(path, _)| path).collect()
}

/// Every `(parent, position)` slot at which a node could be inserted.
fn insertion_slots(tree: &Tree<u8>) -> Vec<IndexPath> {
    let mut slots: Vec<IndexPath> = (0..=tree.len())
        .map(|position| IndexPath::root().child(position))
        .collect();
    for (path, node) in tree.iter() {
        for position in 0..=node.children.len() {
            slots.push(path.child(position));
        }
    }
    slots
}

fn derive_tree_op(
    current: &Tree<u8>,
    (kind, a, b, val): Seed,
) -> Option<Operation<TreeNode<u8>, IndexPath>> {
    match kind % 4 {
        0 => {
            let slots = insertion_slots(current);
            Some(Operation::Insert {
                index: slots[a % slots.len()].clone(),
                element: TreeNode::leaf(val),
            })
        }
        1 => {
            let paths = node_paths(current);
            if paths.is_empty() {
                return None;
            }
            Some(Operation::Delete {
                index: paths[a % paths.len()].clone(),
            })
        }
        2 => {
            let paths = node_paths(current);
            if paths.is_empty() {
                return None;
            }
            Some(Operation::Update {
                index: paths[a % paths.len()].clone(),
                element: TreeNode::new(val, vec![TreeNode::leaf(val.wrapping_add(1))]),
            })
        }
        _ => {
            let paths = node_paths(current);
            if paths.is_empty() {
                return None;
            }
            let from = paths[a % paths.len()].clone();
            // Destinations address the post-removal tree; slots inside the
            // moved subtree's own prefix are rejected by the engine, so
            // filter them out of the candidate set.
            let mut post = current.clone();
            post.apply(&Operation::Delete {
                index: from.clone(),
            })
            .unwrap();
            let slots: Vec<IndexPath> = insertion_slots(&post)
                .into_iter()
                .filter(|slot| !slot.starts_with(&from))
                .collect();
            if slots.is_empty() {
                return None;
            }
            Some(Operation::Move {
                from,
                to: slots[b % slots.len()].clone(),
            })
        }
    }
}

fn build_tree(values: &[u8]) -> Tree<u8> {
    // A small arbitrary-but-deterministic shape: chunks of three become a
    // parent with two children.
    values
        .chunks(3)
        .map(|chunk| {
            let children = chunk[1..].iter().map(|&v| TreeNode::leaf(v)).collect();
            TreeNode::new(chunk[0], children)
        })
        .collect()
}

#[quickcheck]
fn tree_changesets_reproduce_their_snapshot(values: Vec<u8>, seeds: Vec<Seed>) -> bool {
    let initial = build_tree(&values);
    let mut current = initial.clone();
    let mut ops = Vec::new();
    for seed in seeds {
        if let Some(op) = derive_tree_op(&current, seed) {
            current.apply(&op).unwrap();
            ops.push(op);
        }
    }
    Changeset::new(current, ops).reproduces(&initial).unwrap()
}

#[quickcheck]
fn tree_operations_preserve_untouched_subtrees(values: Vec<u8>, seed: Seed) -> bool {
    let initial = build_tree(&values);
    let mut current = initial.clone();
    let Some(op) = derive_tree_op(&current, seed) else {
        return true;
    };
    current.apply(&op).unwrap();
    let expected = match op {
        Operation::Insert { .. } => initial.total_len() + 1,
        Operation::Delete { index } => {
            initial.total_len() - initial.node(&index).unwrap().count()
        }
        Operation::Update { index, .. } => {
            initial.total_len() - initial.node(&index).unwrap().count() + 2
        }
        Operation::Move { .. } => initial.total_len(),
    };
    current.total_len() == expected
}

#[quickcheck]
fn moves_into_own_subtree_are_always_rejected(values: Vec<u8>, a: usize, b: usize) -> bool {
    let initial = build_tree(&values);
    let paths = node_paths(&initial);
    if paths.is_empty() {
        return true;
    }
    let from = paths[a % paths.len()].clone();
    // Any destination extending `from` is inside the moved subtree.
    let to = from.child(b % 4);
    let mut current = initial.clone();
    let rejected = current
        .apply(&Operation::Move {
            from,
            to,
        })
        .is_err();
    rejected && current == initial
}
