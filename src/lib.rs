//! An ordered set backed by an arena-allocated AVL tree.
//!
//! Besides the usual set operations, `AvlSet<T>` answers structural queries: the depth of a key
//! (`height_of_key`, `level_of_key`), the height of the whole tree and the balance factor of every
//! node. The `dataset` and `shell` modules drive the set from shuffled integer files and
//! line-oriented commands.

pub mod arena;
pub mod avl_tree;
pub mod dataset;
mod error;
pub mod shell;

pub use crate::error::{Error, Result};
