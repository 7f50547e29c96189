use crate::arena::{Arena, Handle};
use crate::avl_tree::node::Node;
use log::trace;
use std::cmp::{self, Ordering};
use std::mem;

fn expect_child(child: Option<Handle>) -> Handle {
    match child {
        Some(child) => child,
        None => unreachable!(),
    }
}

/// Arena-backed avl tree. Nodes never move once allocated, so handles held across rotations stay
/// valid and parent links can be plain handles.
#[derive(Clone)]
pub struct Tree<T> {
    arena: Arena<Node<T>>,
    root: Option<Handle>,
    len: usize,
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Tree {
            arena: Arena::new(),
            root: None,
            len: 0,
        }
    }

    pub fn root(&self) -> Option<Handle> {
        self.root
    }

    pub fn node(&self, handle: Handle) -> &Node<T> {
        &self.arena[handle]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }

    pub fn height(&self, tree: Option<Handle>) -> usize {
        match tree {
            None => 0,
            Some(handle) => self.arena[handle].height,
        }
    }

    fn update(&mut self, handle: Handle) {
        let (left_height, right_height) = {
            let node = &self.arena[handle];
            (self.height(node.left), self.height(node.right))
        };
        let node = &mut self.arena[handle];
        node.height = cmp::max(left_height, right_height) + 1;
        node.balance = (right_height as isize - left_height as isize) as i8;
    }

    // points `parent`'s link to `old` (or the root when `parent` is `None`) at `new`
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let node = &mut self.arena[parent];
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            },
        }
    }

    fn rotate_left(&mut self, node: Handle) -> Handle {
        trace!("rotating left at {:?}", node);
        let child = expect_child(self.arena[node].right);
        let parent = self.arena[node].parent;
        let inner = self.arena[child].left;

        self.arena[child].parent = parent;
        self.arena[node].right = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(node);
        }
        self.arena[child].left = Some(node);
        self.arena[node].parent = Some(child);
        self.replace_child(parent, node, Some(child));

        self.update(node);
        self.update(child);
        child
    }

    fn rotate_right(&mut self, node: Handle) -> Handle {
        trace!("rotating right at {:?}", node);
        let child = expect_child(self.arena[node].left);
        let parent = self.arena[node].parent;
        let inner = self.arena[child].right;

        self.arena[child].parent = parent;
        self.arena[node].left = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(node);
        }
        self.arena[child].right = Some(node);
        self.arena[node].parent = Some(child);
        self.replace_child(parent, node, Some(child));

        self.update(node);
        self.update(child);
        child
    }

    // walks from `curr` to the root, restoring the balance of every node on the way
    fn rebalance(&mut self, mut curr: Handle) {
        loop {
            self.update(curr);
            let subtree = match self.arena[curr].balance {
                -2 => {
                    let left = expect_child(self.arena[curr].left);
                    let (outer, inner) = (self.arena[left].left, self.arena[left].right);
                    if self.height(outer) < self.height(inner) {
                        self.rotate_left(left);
                    }
                    self.rotate_right(curr)
                },
                2 => {
                    let right = expect_child(self.arena[curr].right);
                    let (inner, outer) = (self.arena[right].left, self.arena[right].right);
                    if self.height(outer) < self.height(inner) {
                        self.rotate_right(right);
                    }
                    self.rotate_left(curr)
                },
                _ => curr,
            };

            match self.arena[subtree].parent {
                Some(parent) => curr = parent,
                None => {
                    self.root = Some(subtree);
                    return;
                },
            }
        }
    }

    pub fn min_from(&self, mut curr: Handle) -> Handle {
        while let Some(left) = self.arena[curr].left {
            curr = left;
        }
        curr
    }

    pub fn max_from(&self, mut curr: Handle) -> Handle {
        while let Some(right) = self.arena[curr].right {
            curr = right;
        }
        curr
    }

    pub fn min(&self) -> Option<Handle> {
        self.root.map(|root| self.min_from(root))
    }

    pub fn max(&self) -> Option<Handle> {
        self.root.map(|root| self.max_from(root))
    }

    pub fn successor(&self, handle: Handle) -> Option<Handle> {
        if let Some(right) = self.arena[handle].right {
            return Some(self.min_from(right));
        }
        let mut curr = handle;
        while let Some(parent) = self.arena[curr].parent {
            if self.arena[parent].left == Some(curr) {
                return Some(parent);
            }
            curr = parent;
        }
        None
    }

    pub fn predecessor(&self, handle: Handle) -> Option<Handle> {
        if let Some(left) = self.arena[handle].left {
            return Some(self.max_from(left));
        }
        let mut curr = handle;
        while let Some(parent) = self.arena[curr].parent {
            if self.arena[parent].right == Some(curr) {
                return Some(parent);
            }
            curr = parent;
        }
        None
    }

    // unlinks a node with at most one child and rebalances from its former parent
    fn splice(&mut self, handle: Handle) -> Node<T> {
        let (parent, child) = {
            let node = &self.arena[handle];
            debug_assert!(node.left.is_none() || node.right.is_none());
            (node.parent, node.only_child())
        };
        if let Some(child) = child {
            self.arena[child].parent = parent;
        }
        self.replace_child(parent, handle, child);

        let node = self.arena.free(handle);
        if let Some(parent) = parent {
            self.rebalance(parent);
        }
        node
    }

    /// Returns the 1-based height of `handle` counted from the root.
    pub fn depth(&self, handle: Handle) -> usize {
        let mut depth = 1;
        let mut curr = handle;
        while let Some(parent) = self.arena[curr].parent {
            depth += 1;
            curr = parent;
        }
        depth
    }

    /// Consumes the tree, yielding its keys in ascending order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut handles = Vec::with_capacity(self.len);
        let mut curr = self.min();
        while let Some(handle) = curr {
            handles.push(handle);
            curr = self.successor(handle);
        }
        let arena = &mut self.arena;
        handles.into_iter().map(|handle| arena.free(handle).key).collect()
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T>
where
    T: Ord,
{
    pub fn insert(&mut self, key: T) -> bool {
        let mut curr = match self.root {
            Some(root) => root,
            None => {
                self.root = Some(self.arena.allocate(Node::new(key, None)));
                self.len += 1;
                return true;
            },
        };

        loop {
            let ordering = key.cmp(&self.arena[curr].key);
            let next = match ordering {
                Ordering::Less => self.arena[curr].left,
                Ordering::Greater => self.arena[curr].right,
                Ordering::Equal => return false,
            };

            match next {
                Some(next) => curr = next,
                None => {
                    let leaf = self.arena.allocate(Node::new(key, Some(curr)));
                    if ordering == Ordering::Less {
                        self.arena[curr].left = Some(leaf);
                    } else {
                        self.arena[curr].right = Some(leaf);
                    }
                    self.len += 1;
                    self.rebalance(curr);
                    return true;
                },
            }
        }
    }

    pub fn remove(&mut self, key: &T) -> Option<T> {
        let target = self.find(key)?;
        let removed = match (self.arena[target].left, self.arena[target].right) {
            (Some(_), Some(right)) => {
                let successor = self.min_from(right);
                trace!("replacing {:?} with successor {:?}", target, successor);
                let Node { key: successor_key, .. } = self.splice(successor);
                mem::replace(&mut self.arena[target].key, successor_key)
            },
            _ => self.splice(target).key,
        };
        self.len -= 1;
        Some(removed)
    }

    pub fn find(&self, key: &T) -> Option<Handle> {
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            curr = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    /// Returns the 0-based level of the node holding `key`, counted while descending from the
    /// root.
    pub fn level_of(&self, key: &T) -> Option<usize> {
        let mut level = 0;
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            curr = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(level),
            };
            level += 1;
        }
        None
    }

    pub fn floor(&self, key: &T) -> Option<Handle> {
        let mut best = None;
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            curr = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => {
                    best = Some(handle);
                    node.right
                },
                Ordering::Equal => return Some(handle),
            };
        }
        best
    }

    pub fn ceil(&self, key: &T) -> Option<Handle> {
        let mut best = None;
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            curr = match key.cmp(&node.key) {
                Ordering::Greater => node.right,
                Ordering::Less => {
                    best = Some(handle);
                    node.left
                },
                Ordering::Equal => return Some(handle),
            };
        }
        best
    }

    /// Checks order, balance, cached heights and parent links of every node.
    ///
    /// # Panics
    ///
    /// Panics on the first violated invariant.
    pub fn assert_invariants(&self) {
        if let Some(root) = self.root {
            assert_eq!(self.arena[root].parent, None, "root has a parent");
        }
        let count = self.check_subtree(self.root, None, None);
        assert_eq!(count, self.len, "length does not match node count");
        assert_eq!(self.arena.len(), self.len, "arena holds unreachable nodes");
    }

    // returns the number of nodes in the subtree
    fn check_subtree(&self, tree: Option<Handle>, lower: Option<&T>, upper: Option<&T>) -> usize {
        let handle = match tree {
            Some(handle) => handle,
            None => return 0,
        };
        let node = &self.arena[handle];

        if let Some(lower) = lower {
            assert!(*lower < node.key, "left subtree key is not less than its ancestor");
        }
        if let Some(upper) = upper {
            assert!(node.key < *upper, "right subtree key is not greater than its ancestor");
        }
        for child in node.left.iter().chain(node.right.iter()) {
            assert_eq!(self.arena[*child].parent, Some(handle), "broken parent link");
        }

        let left_height = self.height(node.left);
        let right_height = self.height(node.right);
        let balance = right_height as isize - left_height as isize;
        assert!(balance.abs() <= 1, "node is out of balance: {}", balance);
        assert_eq!(node.balance as isize, balance, "stale balance factor");
        assert_eq!(node.height, cmp::max(left_height, right_height) + 1, "stale height");
        if node.is_leaf() {
            assert_eq!(node.height, 1, "leaf height");
        }

        1 + self.check_subtree(node.left, lower, Some(&node.key))
            + self.check_subtree(node.right, Some(&node.key), upper)
    }
}

#[cfg(test)]
mod tests {
    use super::Tree;

    fn root_key(tree: &Tree<u32>) -> u32 {
        tree.node(tree.root().unwrap()).key
    }

    fn child_keys(tree: &Tree<u32>, key: u32) -> (Option<u32>, Option<u32>) {
        let node = tree.node(tree.find(&key).unwrap());
        (
            node.left.map(|handle| tree.node(handle).key),
            node.right.map(|handle| tree.node(handle).key),
        )
    }

    #[test]
    fn test_single_left_rotation() {
        let mut tree = Tree::new();
        for key in &[10, 20, 30] {
            assert!(tree.insert(*key));
        }
        tree.assert_invariants();
        assert_eq!(root_key(&tree), 20);
        assert_eq!(child_keys(&tree, 20), (Some(10), Some(30)));
        assert_eq!(tree.node(tree.root().unwrap()).balance, 0);
    }

    #[test]
    fn test_single_right_rotation() {
        let mut tree = Tree::new();
        for key in &[30, 20, 10] {
            assert!(tree.insert(*key));
        }
        tree.assert_invariants();
        assert_eq!(root_key(&tree), 20);
        assert_eq!(child_keys(&tree, 20), (Some(10), Some(30)));
    }

    #[test]
    fn test_left_right_rotation() {
        let mut tree = Tree::new();
        for key in &[30, 10, 20] {
            assert!(tree.insert(*key));
        }
        tree.assert_invariants();
        assert_eq!(root_key(&tree), 20);
        assert_eq!(child_keys(&tree, 20), (Some(10), Some(30)));
    }

    #[test]
    fn test_right_left_rotation() {
        let mut tree = Tree::new();
        for key in &[10, 30, 20] {
            assert!(tree.insert(*key));
        }
        tree.assert_invariants();
        assert_eq!(root_key(&tree), 20);
        assert_eq!(child_keys(&tree, 20), (Some(10), Some(30)));
    }

    #[test]
    fn test_parent_links_after_rotation() {
        let mut tree = Tree::new();
        for key in 0..7 {
            tree.insert(key);
        }
        tree.assert_invariants();
        assert_eq!(root_key(&tree), 3);
        let leaf = tree.find(&6).unwrap();
        let parent = tree.node(leaf).parent.unwrap();
        assert_eq!(tree.node(parent).key, 5);
        assert_eq!(tree.depth(leaf), 3);
    }

    #[test]
    fn test_insert_duplicate() {
        let mut tree = Tree::new();
        assert!(tree.insert(1));
        assert!(!tree.insert(1));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_remove_two_children_uses_successor() {
        let mut tree = Tree::new();
        for key in &[5, 3, 8, 1, 4, 7, 9] {
            tree.insert(*key);
        }
        assert_eq!(tree.remove(&3), Some(3));
        tree.assert_invariants();
        assert_eq!(child_keys(&tree, 4), (Some(1), None));
        assert_eq!(tree.into_sorted_vec(), vec![1, 4, 5, 7, 8, 9]);
    }

    #[test]
    fn test_remove_root_rebalances() {
        let mut tree = Tree::new();
        for key in &[2, 1, 3, 4] {
            tree.insert(*key);
        }
        assert_eq!(tree.remove(&1), Some(1));
        tree.assert_invariants();
        assert_eq!(root_key(&tree), 3);
        assert_eq!(tree.remove(&3), Some(3));
        assert_eq!(tree.remove(&2), Some(2));
        assert_eq!(tree.remove(&4), Some(4));
        assert_eq!(tree.root(), None);
        tree.assert_invariants();
    }

    #[test]
    fn test_remove_missing() {
        let mut tree = Tree::new();
        tree.insert(1);
        assert_eq!(tree.remove(&2), None);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_successor_predecessor() {
        let mut tree = Tree::new();
        for key in 0..20 {
            tree.insert(key * 2);
        }
        let mut curr = tree.min();
        let mut expected = 0;
        while let Some(handle) = curr {
            assert_eq!(tree.node(handle).key, expected);
            expected += 2;
            curr = tree.successor(handle);
        }
        assert_eq!(expected, 40);

        let mut curr = tree.max();
        while let Some(handle) = curr {
            expected -= 2;
            assert_eq!(tree.node(handle).key, expected);
            curr = tree.predecessor(handle);
        }
        assert_eq!(expected, 0);
    }

    #[test]
    fn test_heights_stay_logarithmic() {
        let mut tree = Tree::new();
        for key in 0..1023 {
            tree.insert(key);
        }
        tree.assert_invariants();
        assert_eq!(tree.height(tree.root()), 10);
    }
}
