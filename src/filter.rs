use crate::scan::Stream;
use std::fmt;
use std::rc::Rc;

/// A shared predicate over generated values.
///
/// Two predicates are the same filter only if they share one allocation, so
/// clone a `Predicate` to reapply it rather than wrapping the closure again.
#[derive(Clone)]
pub struct Predicate(Rc<dyn Fn(&[u8]) -> bool>);

impl Predicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[u8]) -> bool + 'static,
    {
        Predicate(Rc::new(f))
    }

    pub fn test(&self, value: &[u8]) -> bool {
        (self.0)(value)
    }

    pub fn ptr_eq(&self, other: &Predicate) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({:p})", Rc::as_ptr(&self.0))
    }
}

/// A predicate together with its inversion flag.
#[derive(Debug, Clone)]
pub struct FilterEntry {
    pub predicate: Predicate,
    pub inverse: bool,
}

impl FilterEntry {
    fn keeps(&self, value: &[u8]) -> bool {
        self.predicate.test(value) != self.inverse
    }

    fn same_as(&self, predicate: &Predicate, inverse: bool) -> bool {
        self.inverse == inverse && self.predicate.ptr_eq(predicate)
    }
}

struct FilterNode {
    entry: FilterEntry,
    parent: Option<Rc<FilterNode>>,
}

/// Ordered, append-only chain of filters.
///
/// A persistent list: appending shares every earlier node with the chain it
/// was derived from.
#[derive(Clone, Default)]
pub(crate) struct FilterChain {
    tail: Option<Rc<FilterNode>>,
    len: usize,
}

impl FilterChain {
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the last entry is exactly `(predicate, inverse)`.
    pub(crate) fn ends_with(&self, predicate: &Predicate, inverse: bool) -> bool {
        self.tail
            .as_ref()
            .is_some_and(|node| node.entry.same_as(predicate, inverse))
    }

    pub(crate) fn push(&self, predicate: Predicate, inverse: bool) -> FilterChain {
        FilterChain {
            tail: Some(Rc::new(FilterNode {
                entry: FilterEntry { predicate, inverse },
                parent: self.tail.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Entries in application order.
    pub(crate) fn entries(&self) -> Vec<FilterEntry> {
        let mut entries = Vec::with_capacity(self.len);
        let mut current = self.tail.as_deref();
        while let Some(node) = current {
            entries.push(node.entry.clone());
            current = node.parent.as_deref();
        }
        entries.reverse();
        entries
    }

    /// Wraps `stream` with every filter, oldest innermost.
    pub(crate) fn apply(&self, stream: Stream) -> Stream {
        self.entries().into_iter().fold(stream, |stream, entry| {
            let filtered: Stream = Box::new(stream.filter(move |value| entry.keeps(value)));
            filtered
        })
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries()).finish()
    }
}
