//! Index-based allocator for tree nodes.

use std::mem;
use std::ops::{Index, IndexMut};

/// A stable reference to an object stored in an `Arena<T>`.
///
/// A handle stays valid until the object it refers to is freed, regardless of how many other
/// objects are allocated or freed in the meantime.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    index: usize,
}

#[derive(Clone)]
enum Slot<T> {
    Occupied(T),
    Vacant(Option<Handle>),
}

/// An allocator that stores a single type of object in a `Vec` and hands out `Handle`s.
///
/// Freed slots are chained into a free list and reused by later allocations, so handles are
/// never invalidated by unrelated allocations. All objects are dropped when the arena is dropped,
/// iteratively, so deep structures built on top of the arena never recurse on teardown.
///
/// # Examples
///
/// ```
/// use avl_collections::arena::Arena;
///
/// let mut arena = Arena::new();
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(x), 2);
/// assert!(arena.is_empty());
/// ```
#[derive(Clone)]
pub struct Arena<T> {
    head: Option<Handle>,
    slots: Vec<Slot<T>>,
    len: usize,
}

impl<T> Arena<T> {
    /// Constructs a new, empty `Arena<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::arena::Arena;
    ///
    /// let arena: Arena<u32> = Arena::new();
    /// assert_eq!(arena.len(), 0);
    /// ```
    pub fn new() -> Self {
        Arena {
            head: None,
            slots: Vec::new(),
            len: 0,
        }
    }

    /// Constructs a new, empty `Arena<T>` with room for `capacity` objects before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Arena {
            head: None,
            slots: Vec::with_capacity(capacity),
            len: 0,
        }
    }

    /// Allocates an object in the arena and returns its `Handle`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn allocate(&mut self, value: T) -> Handle {
        self.len += 1;
        match self.head.take() {
            None => {
                self.slots.push(Slot::Occupied(value));
                Handle {
                    index: self.slots.len() - 1,
                }
            },
            Some(handle) => {
                let vacant_slot = mem::replace(&mut self.slots[handle.index], Slot::Occupied(value));
                match vacant_slot {
                    Slot::Vacant(next) => self.head = next,
                    Slot::Occupied(_) => unreachable!(),
                }
                handle
            },
        }
    }

    /// Deallocates an object in the arena and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to an occupied slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(x), 0);
    /// assert_eq!(arena.get(x), None);
    /// ```
    pub fn free(&mut self, handle: Handle) -> T {
        if self.get(handle).is_none() {
            panic!("Error: attempting to free an invalid or vacant slot.");
        }
        match mem::replace(&mut self.slots[handle.index], Slot::Vacant(self.head.take())) {
            Slot::Occupied(value) => {
                self.len -= 1;
                self.head = Some(handle);
                value
            },
            Slot::Vacant(_) => unreachable!(),
        }
    }

    /// Returns an immutable reference to an object in the arena, or `None` if the handle does not
    /// refer to a live object.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        match self.slots.get(handle.index) {
            Some(Slot::Occupied(ref value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to an object in the arena, or `None` if the handle does not
    /// refer to a live object.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self.slots.get_mut(handle.index) {
            Some(Slot::Occupied(ref mut value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every object in the arena and invalidates all handles.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = None;
        self.len = 0;
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Handle> for Arena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(handle).expect("Error: handle does not refer to a live object.")
    }
}

impl<T> IndexMut<Handle> for Arena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(handle).expect("Error: handle does not refer to a live object.")
    }
}
