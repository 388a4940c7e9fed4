// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Tree-shaped collections addressed by [`IndexPath`].
//!
//! A [`Tree`] is an ordered sequence of root [`TreeNode`]s with unbounded
//! nesting depth. Each node exclusively owns its children; every node is
//! uniquely identified by its index path from the root, and path resolution
//! walks the child vectors level by level. No references are retained across
//! mutations — paths are only stable *between* mutations.

use crate::IndexPath;

#[cfg(feature = "arbitrary")]
use quickcheck::{Arbitrary, Gen};

/// A single node of a [`Tree`]: a value plus an ordered sequence of child
/// nodes.
///
/// Pure data; both fields are public. Structural manipulation by path goes
/// through [`Tree`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
pub struct TreeNode<T> {
    /// The element stored at this node.
    pub value: T,
    /// This node's children, in sibling order.
    pub children: Vec<TreeNode<T>>,
}

impl<T> TreeNode<T> {
    /// A node with the given value and children.
    pub fn new(value: T, children: Vec<TreeNode<T>>) -> Self {
        TreeNode { value, children }
    }

    /// A node with no children.
    pub fn leaf(value: T) -> Self {
        TreeNode {
            value,
            children: Vec::new(),
        }
    }

    /// The node at `path` relative to this node. The empty path is this
    /// node itself.
    pub fn descendant(&self, path: &IndexPath) -> Option<&TreeNode<T>> {
        let mut node = self;
        for position in path.iter() {
            node = node.children.get(position)?;
        }
        Some(node)
    }

    /// Number of nodes in this subtree, including this node.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::count).sum::<usize>()
    }
}

/// An ordered sequence of root nodes with unbounded nesting depth.
///
/// ```rust
/// use resync::{index_path, Tree, TreeNode};
///
/// let tree = Tree::from(vec![
///     TreeNode::new("n1", vec![TreeNode::leaf("n1a")]),
///     TreeNode::leaf("n2"),
/// ]);
/// assert_eq!(tree.value(&index_path![0, 0]), Some(&"n1a"));
/// assert_eq!(tree.len(), 2);
/// assert_eq!(tree.total_len(), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
pub struct Tree<T> {
    /// The root nodes, in sibling order.
    pub roots: Vec<TreeNode<T>>,
}

impl<T> Tree<T> {
    /// An empty tree.
    pub fn new() -> Self {
        Tree { roots: Vec::new() }
    }

    /// Number of root nodes.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// `true` if the tree has no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of nodes in the whole tree.
    pub fn total_len(&self) -> usize {
        self.roots.iter().map(TreeNode::count).sum()
    }

    /// The node at `path`, or `None` if the path does not resolve.
    ///
    /// The empty path is the root-level *reference*; it identifies no node
    /// and resolves to `None`.
    pub fn node(&self, path: &IndexPath) -> Option<&TreeNode<T>> {
        let mut positions = path.iter();
        let mut node = self.roots.get(positions.next()?)?;
        for position in positions {
            node = node.children.get(position)?;
        }
        Some(node)
    }

    /// Mutable variant of [`Tree::node`].
    pub fn node_mut(&mut self, path: &IndexPath) -> Option<&mut TreeNode<T>> {
        let mut positions = path.iter();
        let mut node = self.roots.get_mut(positions.next()?)?;
        for position in positions {
            node = node.children.get_mut(position)?;
        }
        Some(node)
    }

    /// The value at `path`, or `None` if the path does not resolve.
    pub fn value(&self, path: &IndexPath) -> Option<&T> {
        self.node(path).map(|n| &n.value)
    }

    /// The children under `parent`, where the empty path denotes the root
    /// level. `None` if `parent` does not resolve to a node.
    pub fn children(&self, parent: &IndexPath) -> Option<&[TreeNode<T>]> {
        if parent.is_empty() {
            Some(&self.roots)
        } else {
            self.node(parent).map(|n| n.children.as_slice())
        }
    }

    /// Mutable variant of [`Tree::children`].
    pub fn children_mut(&mut self, parent: &IndexPath) -> Option<&mut Vec<TreeNode<T>>> {
        if parent.is_empty() {
            Some(&mut self.roots)
        } else {
            self.node_mut(parent).map(|n| &mut n.children)
        }
    }

    /// Iterates over all nodes depth-first, pre-order, yielding each node
    /// together with its path.
    pub fn iter(&self) -> DepthFirst<'_, T> {
        let mut stack = Vec::with_capacity(self.roots.len());
        for (position, root) in self.roots.iter().enumerate().rev() {
            stack.push((IndexPath::root().child(position), root));
        }
        DepthFirst { stack }
    }
}

impl<T> From<Vec<TreeNode<T>>> for Tree<T> {
    fn from(roots: Vec<TreeNode<T>>) -> Self {
        Tree { roots }
    }
}

impl<T> FromIterator<TreeNode<T>> for Tree<T> {
    fn from_iter<I: IntoIterator<Item = TreeNode<T>>>(iter: I) -> Self {
        Tree {
            roots: iter.into_iter().collect(),
        }
    }
}

/// Pre-order depth-first traversal over a [`Tree`], created by
/// [`Tree::iter`].
pub struct DepthFirst<'a, T> {
    stack: Vec<(IndexPath, &'a TreeNode<T>)>,
}

impl<'a, T> Iterator for DepthFirst<'a, T> {
    type Item = (IndexPath, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        for (position, child) in node.children.iter().enumerate().rev() {
            self.stack.push((path.child(position), child));
        }
        Some((path, node))
    }
}

#[cfg(feature = "arbitrary")]
fn arbitrary_node<T: Arbitrary>(g: &mut Gen, depth: usize) -> TreeNode<T> {
    let children = if depth == 0 {
        Vec::new()
    } else {
        let n = usize::arbitrary(g) % 3;
        (0..n).map(|_| arbitrary_node(g, depth - 1)).collect()
    };
    TreeNode {
        value: T::arbitrary(g),
        children,
    }
}

#[cfg(feature = "arbitrary")]
impl<T: Arbitrary> Arbitrary for TreeNode<T> {
    fn arbitrary(g: &mut Gen) -> Self {
        arbitrary_node(g, 3)
    }
}

#[cfg(feature = "arbitrary")]
impl<T: Arbitrary> Arbitrary for Tree<T> {
    fn arbitrary(g: &mut Gen) -> Self {
        let n = usize::arbitrary(g) % 4;
        (0..n).map(|_| arbitrary_node(g, 2)).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::index_path;

    fn sample() -> Tree<&'static str> {
        Tree::from(vec![
            TreeNode::new(
                "a",
                vec![
                    TreeNode::leaf("a0"),
                    TreeNode::new("a1", vec![TreeNode::leaf("a1x")]),
                ],
            ),
            TreeNode::leaf("b"),
        ])
    }

    #[test]
    fn resolves_paths_level_by_level() {
        let tree = sample();
        assert_eq!(tree.value(&index_path![0]), Some(&"a"));
        assert_eq!(tree.value(&index_path![0, 1, 0]), Some(&"a1x"));
        assert_eq!(tree.value(&index_path![1]), Some(&"b"));
        assert_eq!(tree.value(&index_path![1, 0]), None);
        assert_eq!(tree.value(&index_path![2]), None);
    }

    #[test]
    fn empty_path_is_a_reference_not_a_node() {
        let tree = sample();
        assert!(tree.node(&IndexPath::root()).is_none());
        // ...but it is a valid parent under which the roots live.
        assert_eq!(tree.children(&IndexPath::root()).unwrap().len(), 2);
    }

    #[test]
    fn children_of_interior_node() {
        let tree = sample();
        let children = tree.children(&index_path![0]).unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].value, "a0");
        assert!(tree.children(&index_path![3]).is_none());
    }

    #[test]
    fn counts_cover_the_whole_tree() {
        let tree = sample();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.total_len(), 5);
        assert!(!tree.is_empty());
        assert!(Tree::<u8>::new().is_empty());
    }

    #[test]
    fn depth_first_iteration_is_preorder() {
        let tree = sample();
        let visited: Vec<(IndexPath, &str)> =
            tree.iter().map(|(p, n)| (p, n.value)).collect();
        assert_eq!(
            visited,
            vec![
                (index_path![0], "a"),
                (index_path![0, 0], "a0"),
                (index_path![0, 1], "a1"),
                (index_path![0, 1, 0], "a1x"),
                (index_path![1], "b"),
            ]
        );
    }

    #[test]
    fn descendant_is_relative() {
        let tree = sample();
        let a = tree.node(&index_path![0]).unwrap();
        assert_eq!(a.descendant(&index_path![1, 0]).unwrap().value, "a1x");
        assert_eq!(a.descendant(&IndexPath::root()).unwrap().value, "a");
        assert!(a.descendant(&index_path![5]).is_none());
    }
}
