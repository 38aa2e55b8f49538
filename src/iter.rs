use std::iter::FusedIterator;

use crate::error::Error;
use crate::node::Link;
use crate::skiplist::SkipList;

/// Ascending iterator over the elements of a `SkipList`, following level-0
/// links from the head to the tail.
pub struct Iter<'a, T> {
    list: &'a SkipList<T>,
    current: Link,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(list: &'a SkipList<T>) -> Iter<'a, T> {
        Iter {
            list,
            current: list.first_link(),
            remaining: list.len(),
        }
    }

    /// Elements can't be removed while the list is borrowed for iteration.
    /// This always fails; use `SkipList::remove` instead.
    pub fn remove(&mut self) -> Result<(), Error> {
        Err(Error::UnsupportedOperation("remove through an iterator"))
    }
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter {
            list: self.list,
            current: self.current,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        match self.current {
            Link::Node(id) => {
                let node = self.list.node(id);
                self.current = node.tower.next(0);
                self.remaining -= 1;
                Some(node.element())
            }
            Link::Tail => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

/// Owning ascending iterator, returned by `SkipList::into_iter`.
pub struct IntoIter<T> {
    inner: std::vec::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> SkipList<T> {
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a SkipList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for SkipList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.into_elements().into_iter(),
        }
    }
}
