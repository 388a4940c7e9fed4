// (c) Copyright 2025 Helsing GmbH. All rights reserved.
/// Convenience macro for creating an [`IndexPath`](crate::IndexPath).
///
/// NOTE! This is mostly useful for tests and literals; programmatic callers
/// usually build paths with [`IndexPath::child`](crate::IndexPath::child).
///
/// ```rust
/// # use resync::{index_path, IndexPath};
/// let root = index_path![];
/// assert_eq!(root, IndexPath::root());
///
/// let p = index_path![0, 2, 1];
/// assert_eq!(p.components(), &[0, 2, 1]);
/// ```
#[macro_export]
macro_rules! index_path {
    () => {
        $crate::IndexPath::root()
    };
    ($($component:expr),+ $(,)?) => {
        $crate::IndexPath::from([$($component),+])
    };
}
