use crate::arena::Handle;

/// A struct representing an internal node of an avl tree.
///
/// Children are owned through the tree's arena. `parent` is a back-reference only and always
/// names the node holding this one as `left` or `right`, or is `None` for the root.
#[derive(Clone, Debug)]
pub struct Node<T> {
    pub key: T,
    pub balance: i8,
    pub height: usize,
    pub left: Option<Handle>,
    pub right: Option<Handle>,
    pub parent: Option<Handle>,
}

impl<T> Node<T> {
    pub fn new(key: T, parent: Option<Handle>) -> Self {
        Node {
            key,
            balance: 0,
            height: 1,
            left: None,
            right: None,
            parent,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    // the single child of a node with at most one child
    pub fn only_child(&self) -> Option<Handle> {
        self.left.or(self.right)
    }
}
