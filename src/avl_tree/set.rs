use crate::arena::Handle;
use crate::avl_tree::tree::Tree;
use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;
use std::iter::{FromIterator, Rev};
use std::marker::PhantomData;
use std::vec;

/// An ordered set implemented using an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of the two child subtrees of any node differ by at most one. Nodes live in an arena
/// and keep a link to their parent, so rebalancing walks upward from the modified node without
/// recursion and every node caches its subtree height.
///
/// # Examples
/// ```
/// use avl_collections::avl_tree::AvlSet;
///
/// let mut set = AvlSet::new();
/// set.insert(10);
/// set.insert(20);
/// set.insert(30);
///
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.height_of_key(&20), 1);
/// assert_eq!(set.level_of_key(&30), Some(1));
///
/// assert_eq!(set.remove(&10), Some(10));
/// assert_eq!(set.remove(&10), None);
/// assert_eq!(set.iter_desc().collect::<Vec<&u32>>(), vec![&30, &20]);
/// ```
#[derive(Clone)]
pub struct AvlSet<T> {
    tree: Tree<T>,
}

impl<T> AvlSet<T> {
    /// Constructs a new, empty `AvlSet<T>`.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::new();
    /// ```
    pub fn new() -> Self {
        AvlSet { tree: Tree::new() }
    }

    /// Returns the number of keys in the set.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }

    /// Clears the set, removing all keys.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.clear();
    /// assert!(set.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the height of the tree: `0` when empty, otherwise the number of nodes on the
    /// longest path from the root to a leaf.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert_eq!(set.tree_height(), 0);
    /// set.extend(vec![1, 2, 3, 4]);
    /// assert_eq!(set.tree_height(), 3);
    /// ```
    pub fn tree_height(&self) -> usize {
        self.tree.height(self.tree.root())
    }

    /// Returns a handle to the root node, or `None` if the set is empty.
    pub fn root(&self) -> Option<NodeRef<'_, T>> {
        self.node_ref(self.tree.root())
    }

    /// Returns the minimum key of the set. Returns `None` if the set is empty.
    pub fn min(&self) -> Option<&T> {
        self.tree.min().map(|handle| &self.tree.node(handle).key)
    }

    /// Returns the maximum key of the set. Returns `None` if the set is empty.
    pub fn max(&self) -> Option<&T> {
        self.tree.max().map(|handle| &self.tree.node(handle).key)
    }

    /// Returns an iterator over the set. The iterator yields keys in ascending order using
    /// in-order traversal. Each call starts a fresh traversal.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(3);
    /// set.insert(1);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            tree: &self.tree,
            front: self.tree.min(),
            back: self.tree.max(),
            remaining: self.tree.len(),
        }
    }

    /// Returns an iterator that yields keys in descending order.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = vec![2, 3, 1].into_iter().collect();
    /// assert_eq!(set.iter_desc().cloned().collect::<Vec<u32>>(), vec![3, 2, 1]);
    /// ```
    pub fn iter_desc(&self) -> Rev<Iter<'_, T>> {
        self.iter().rev()
    }

    /// Returns an iterator over the balance factors of the nodes, in the in-order position of
    /// their keys. Every factor is `-1`, `0` or `1`.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = vec![2, 1, 3, 4].into_iter().collect();
    /// assert_eq!(set.balances().collect::<Vec<i8>>(), vec![0, 1, 1, 0]);
    /// ```
    pub fn balances(&self) -> impl Iterator<Item = i8> + '_ {
        self.handles().map(move |handle| self.tree.node(handle).balance)
    }

    fn handles(&self) -> Handles<'_, T> {
        Handles {
            tree: &self.tree,
            next: self.tree.min(),
        }
    }

    fn node_ref(&self, handle: Option<Handle>) -> Option<NodeRef<'_, T>> {
        handle.map(|handle| NodeRef {
            tree: &self.tree,
            handle,
        })
    }
}

impl<T> AvlSet<T>
where
    T: Ord,
{
    /// Inserts a key into the set. Returns `false` and leaves the set untouched if the key
    /// already exists.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert!(set.insert(1));
    /// assert!(!set.insert(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, key: T) -> bool {
        self.tree.insert(key)
    }

    /// Removes a key from the set. If the key exists in the set, it will return the removed key.
    /// Otherwise it will return `None` and the set is left untouched.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.remove(&1), Some(1));
    /// assert_eq!(set.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &T) -> Option<T> {
        self.tree.remove(key)
    }

    /// Searches for a key and returns a handle to the node holding it.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = vec![10, 20, 30].into_iter().collect();
    /// let node = set.search(&10).unwrap();
    /// assert_eq!(node.key(), &10);
    /// assert_eq!(node.parent().map(|parent| *parent.key()), Some(20));
    /// assert!(set.search(&15).is_none());
    /// ```
    pub fn search(&self, key: &T) -> Option<NodeRef<'_, T>> {
        self.node_ref(self.tree.find(key))
    }

    /// Checks if a key exists in the set.
    pub fn contains(&self, key: &T) -> bool {
        self.tree.find(key).is_some()
    }

    /// Returns the 1-based depth of the node holding `key`: `1` for the root, `2` for its children
    /// and so on. Returns `0` if the key does not exist.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = vec![10, 20, 30].into_iter().collect();
    /// assert_eq!(set.height_of_key(&20), 1);
    /// assert_eq!(set.height_of_key(&10), 2);
    /// assert_eq!(set.height_of_key(&15), 0);
    /// ```
    pub fn height_of_key(&self, key: &T) -> usize {
        self.tree.level_of(key).map_or(0, |level| level + 1)
    }

    /// Returns the 0-based level of the node holding `key`, where the root is at level `0`.
    /// Returns `None` if the key does not exist.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = vec![10, 20, 30].into_iter().collect();
    /// assert_eq!(set.level_of_key(&20), Some(0));
    /// assert_eq!(set.level_of_key(&30), Some(1));
    /// assert_eq!(set.level_of_key(&15), None);
    /// ```
    pub fn level_of_key(&self, key: &T) -> Option<usize> {
        self.tree.level_of(key)
    }

    /// Returns a key in the set that is less than or equal to a particular key. Returns `None` if
    /// such a key does not exist.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.floor(&0), None);
    /// assert_eq!(set.floor(&2), Some(&1));
    /// ```
    pub fn floor(&self, key: &T) -> Option<&T> {
        self.tree.floor(key).map(|handle| &self.tree.node(handle).key)
    }

    /// Returns a key in the set that is greater than or equal to a particular key. Returns `None`
    /// if such a key does not exist.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.ceil(&0), Some(&1));
    /// assert_eq!(set.ceil(&2), None);
    /// ```
    pub fn ceil(&self, key: &T) -> Option<&T> {
        self.tree.ceil(key).map(|handle| &self.tree.node(handle).key)
    }

    /// Checks the order and balance invariants, the cached heights and balance factors, and the
    /// parent links of every node.
    ///
    /// # Panics
    ///
    /// Panics if any invariant is violated.
    pub fn assert_invariants(&self) {
        self.tree.assert_invariants();
    }
}

/// A handle to a node of an `AvlSet<T>`, as returned by `AvlSet::search`.
pub struct NodeRef<'a, T> {
    tree: &'a Tree<T>,
    handle: Handle,
}

impl<'a, T> NodeRef<'a, T> {
    fn relative(&self, handle: Option<Handle>) -> Option<NodeRef<'a, T>> {
        let tree = self.tree;
        handle.map(|handle| NodeRef { tree, handle })
    }

    pub fn key(&self) -> &'a T {
        &self.tree.node(self.handle).key
    }

    /// Height of the right subtree minus height of the left subtree.
    pub fn balance(&self) -> i8 {
        self.tree.node(self.handle).balance
    }

    /// Number of nodes on the longest path from this node down to a leaf.
    pub fn height(&self) -> usize {
        self.tree.node(self.handle).height
    }

    /// Distance from the root, which is at level `0`.
    pub fn level(&self) -> usize {
        self.tree.depth(self.handle) - 1
    }

    pub fn left(&self) -> Option<NodeRef<'a, T>> {
        self.relative(self.tree.node(self.handle).left)
    }

    pub fn right(&self) -> Option<NodeRef<'a, T>> {
        self.relative(self.tree.node(self.handle).right)
    }

    pub fn parent(&self) -> Option<NodeRef<'a, T>> {
        self.relative(self.tree.node(self.handle).parent)
    }
}

impl<'a, T> Clone for NodeRef<'a, T> {
    fn clone(&self) -> Self {
        NodeRef {
            tree: self.tree,
            handle: self.handle,
        }
    }
}

impl<'a, T> Copy for NodeRef<'a, T> {}

impl<'a, T> fmt::Debug for NodeRef<'a, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("balance", &self.balance())
            .field("height", &self.height())
            .finish()
    }
}

struct Handles<'a, T> {
    tree: &'a Tree<T>,
    next: Option<Handle>,
}

impl<'a, T> Iterator for Handles<'a, T> {
    type Item = Handle;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.next?;
        self.next = self.tree.successor(handle);
        Some(handle)
    }
}

/// An iterator for `AvlSet<T>`.
///
/// This iterator traverses the keys of the set in-order and yields immutable references. Both
/// ends advance by following parent links, so no auxiliary stack is kept.
pub struct Iter<'a, T> {
    tree: &'a Tree<T>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.remaining -= 1;
        self.front = self.tree.successor(handle);
        Some(&self.tree.node(handle).key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.remaining -= 1;
        self.back = self.tree.predecessor(handle);
        Some(&self.tree.node(handle).key)
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

/// An owning iterator for `AvlSet<T>`.
///
/// This iterator traverses the keys of the set in-order and yields owned keys.
pub struct IntoIter<T> {
    keys: vec::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.keys.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.keys.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for AvlSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            keys: self.tree.into_sorted_vec().into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a AvlSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Default for AvlSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for AvlSet<T>
where
    T: Ord,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T> FromIterator<T> for AvlSet<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = AvlSet::new();
        set.extend(iter);
        set
    }
}

impl<T> fmt::Debug for AvlSet<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> PartialEq for AvlSet<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &AvlSet<T>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T> Eq for AvlSet<T> where T: Eq {}

impl<T> Serialize for AvlSet<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for key in self {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

struct AvlSetVisitor<T> {
    marker: PhantomData<T>,
}

impl<'de, T> Visitor<'de> for AvlSetVisitor<T>
where
    T: Deserialize<'de> + Ord,
{
    type Value = AvlSet<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence of unique keys")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut set = AvlSet::new();
        while let Some(key) = seq.next_element()? {
            set.insert(key);
        }
        Ok(set)
    }
}

impl<'de, T> Deserialize<'de> for AvlSet<T>
where
    T: Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(AvlSetVisitor {
            marker: PhantomData,
        })
    }
}
