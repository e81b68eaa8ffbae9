use alloc::boxed::Box;
use alloc::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ptr::{self, NonNull};

extern crate alloc;

/// A node in the recency list.
///
/// Holds a value plus links to its neighbours. The head and tail sentinels
/// are nodes too, but their value is never initialized.
pub struct Entry<T> {
    /// The stored value. Uninitialized for sentinel nodes.
    val: mem::MaybeUninit<T>,
    /// Pointer to the neighbour closer to the front.
    prev: *mut Entry<T>,
    /// Pointer to the neighbour closer to the back.
    next: *mut Entry<T>,
}

impl<T> Entry<T> {
    fn new(val: T) -> Self {
        Entry {
            val: mem::MaybeUninit::new(val),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    fn new_sigil() -> Self {
        Entry {
            val: mem::MaybeUninit::uninit(),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Returns a reference to the stored value.
    ///
    /// # Safety
    ///
    /// The entry must not be a sentinel.
    pub unsafe fn get_value(&self) -> &T {
        self.val.assume_init_ref()
    }

    /// Returns a mutable reference to the stored value.
    ///
    /// # Safety
    ///
    /// The entry must not be a sentinel.
    pub unsafe fn get_value_mut(&mut self) -> &mut T {
        self.val.assume_init_mut()
    }

    /// Frees a detached entry and hands back its value.
    ///
    /// # Safety
    ///
    /// `node` must come from `Box::into_raw`, be unlinked, and not be a sentinel.
    unsafe fn take_value(node: *mut Entry<T>) -> T {
        let entry = Box::from_raw(node);
        entry.val.assume_init_read()
    }
}

/// An unbounded doubly linked list ordered from front (newest) to back (oldest).
///
/// The list hands out raw node pointers so that an external index can unlink
/// or promote any node in O(1). It never enforces a capacity; the owning cache
/// decides when to evict.
pub struct List<T> {
    len: usize,
    head: *mut Entry<T>,
    tail: *mut Entry<T>,
    _owns: PhantomData<Box<Entry<T>>>,
}

// SAFETY: the list exclusively owns every node reachable from `head`, so moving it
// to another thread moves the `T`s with it.
unsafe impl<T: Send> Send for List<T> {}

impl<T> List<T> {
    /// Creates an empty list with its two sentinels linked together.
    pub fn new() -> List<T> {
        let head = Box::into_raw(Box::new(Entry::new_sigil()));
        let tail = Box::into_raw(Box::new(Entry::new_sigil()));

        // SAFETY: head and tail were just allocated and are valid
        unsafe {
            (*head).next = tail;
            (*tail).prev = head;
        }

        List {
            len: 0,
            head,
            tail,
            _owns: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocates a node for `v` and links it at the front.
    pub fn push_front(&mut self, v: T) -> *mut Entry<T> {
        let node = NonNull::from(Box::leak(Box::new(Entry::new(v)))).as_ptr();
        // SAFETY: node is freshly allocated and not linked anywhere
        unsafe { self.attach(node) };
        self.len += 1;
        node
    }

    /// Unlinks the back node and returns its value.
    pub fn remove_last(&mut self) -> Option<T> {
        // SAFETY: tail is a valid sentinel for the lifetime of the list
        let last = unsafe { (*self.tail).prev };
        if last == self.head {
            return None;
        }
        // SAFETY: last sits between the sentinels, so it is a live value node
        unsafe { Some(self.remove(last)) }
    }

    /// Returns the value at the back without unlinking it.
    pub fn back(&self) -> Option<&T> {
        // SAFETY: tail is a valid sentinel for the lifetime of the list
        let last = unsafe { (*self.tail).prev };
        if last == self.head {
            return None;
        }
        // SAFETY: last is a live value node owned by this list
        unsafe { Some((*last).get_value()) }
    }

    /// Unlinks `node`, frees it and returns its value.
    ///
    /// # Safety
    ///
    /// `node` must have been returned by [`push_front`](Self::push_front) on this
    /// list and must not have been removed since.
    pub unsafe fn remove(&mut self, node: *mut Entry<T>) -> T {
        self.detach(node);
        self.len -= 1;
        Entry::take_value(node)
    }

    /// Moves `node` to the front.
    ///
    /// # Safety
    ///
    /// Same contract as [`remove`](Self::remove).
    pub unsafe fn move_to_front(&mut self, node: *mut Entry<T>) {
        if (*self.head).next == node {
            return;
        }
        self.detach(node);
        self.attach(node);
    }

    /// Drops every value node, leaving only the sentinels.
    pub fn clear(&mut self) {
        while self.remove_last().is_some() {}
    }

    /// Walks the values from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            // SAFETY: head is a valid sentinel for the lifetime of the list
            cursor: unsafe { (*self.head).next },
            tail: self.tail,
            _list: PhantomData,
        }
    }

    unsafe fn detach(&mut self, node: *mut Entry<T>) {
        (*(*node).prev).next = (*node).next;
        (*(*node).next).prev = (*node).prev;
    }

    unsafe fn attach(&mut self, node: *mut Entry<T>) {
        (*node).next = (*self.head).next;
        (*node).prev = self.head;
        (*self.head).next = node;
        (*(*node).next).prev = node;
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        List::new()
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: the sentinels were allocated in `new` and are freed exactly once here.
        // Their values were never initialized, so dropping the boxes drops no `T`.
        unsafe {
            drop(Box::from_raw(self.head));
            drop(Box::from_raw(self.tail));
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Front-to-back iterator over a [`List`].
pub struct Iter<'a, T> {
    cursor: *mut Entry<T>,
    tail: *mut Entry<T>,
    _list: PhantomData<&'a List<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.cursor == self.tail {
            return None;
        }
        // SAFETY: every node between the sentinels is a live value node, and the
        // shared borrow of the list keeps it from being mutated while we walk
        unsafe {
            let value = (*self.cursor).get_value();
            self.cursor = (*self.cursor).next;
            Some(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;

    fn values<T: Clone>(list: &List<T>) -> Vec<T> {
        list.iter().cloned().collect()
    }

    #[test]
    fn test_push_front_orders_newest_first() {
        let mut list = List::new();
        list.push_front(1);
        list.push_front(2);
        list.push_front(3);
        assert_eq!(list.len(), 3);
        assert_eq!(values(&list), [3, 2, 1]);
        assert_eq!(list.back(), Some(&1));
    }

    #[test]
    fn test_remove_last_pops_oldest() {
        let mut list = List::new();
        list.push_front("a");
        list.push_front("b");
        assert_eq!(list.remove_last(), Some("a"));
        assert_eq!(list.remove_last(), Some("b"));
        assert_eq!(list.remove_last(), None);
        assert!(list.is_empty());
        assert_eq!(list.back(), None);
    }

    #[test]
    fn test_remove_middle_node() {
        let mut list = List::new();
        list.push_front(1);
        let middle = list.push_front(2);
        list.push_front(3);
        // SAFETY: middle came from push_front and is still linked
        let removed = unsafe { list.remove(middle) };
        assert_eq!(removed, 2);
        assert_eq!(values(&list), [3, 1]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_move_to_front() {
        let mut list = List::new();
        let oldest = list.push_front(1);
        list.push_front(2);
        let newest = list.push_front(3);

        // SAFETY: both nodes are linked into this list
        unsafe {
            list.move_to_front(oldest);
            assert_eq!(values(&list), [1, 3, 2]);
            list.move_to_front(oldest);
            assert_eq!(values(&list), [1, 3, 2]);
            list.move_to_front(newest);
        }
        assert_eq!(values(&list), [3, 1, 2]);
        assert_eq!(list.back(), Some(&2));
    }

    #[test]
    fn test_value_mut_through_node() {
        let mut list = List::new();
        let node = list.push_front((1, 10));
        // SAFETY: node is linked and not a sentinel
        unsafe { (*node).get_value_mut().1 = 11 };
        assert_eq!(values(&list), [(1, 11)]);
    }

    #[test]
    fn test_drop_releases_every_value() {
        let tracker = Rc::new(());
        {
            let mut list = List::new();
            for _ in 0..5 {
                list.push_front(Rc::clone(&tracker));
            }
            let popped = list.remove_last();
            assert_eq!(Rc::strong_count(&tracker), 6);
            drop(popped);
            assert_eq!(Rc::strong_count(&tracker), 5);
        }
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn test_remove_hands_value_back_once() {
        let tracker = Rc::new(());
        let mut list = List::new();
        let node = list.push_front(Rc::clone(&tracker));
        list.push_front(Rc::clone(&tracker));
        // SAFETY: node came from push_front and is still linked
        let taken = unsafe { list.remove(node) };
        assert_eq!(Rc::strong_count(&tracker), 3);
        drop(taken);
        assert_eq!(Rc::strong_count(&tracker), 2);
        drop(list);
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn test_clear_then_reuse() {
        let mut list = List::new();
        list.push_front(1);
        list.push_front(2);
        list.clear();
        assert!(list.is_empty());
        list.push_front(3);
        assert_eq!(values(&list), [3]);
    }

    #[test]
    fn test_debug_lists_front_to_back() {
        extern crate std;
        use std::format;

        let mut list = List::new();
        list.push_front('x');
        list.push_front('y');
        assert_eq!(format!("{:?}", list), "['y', 'x']");
    }
}
