//! Heap objects and the per-VM string intern table.
//!
//! Every heap-allocated runtime entity is an [`Obj`]. Strings are the only
//! concrete kind today; the enum keeps the type tag explicit without an
//! inheritance hierarchy, so further kinds slot in as new variants.
//!
//! The [`Heap`] owns the canonical storage for every interned string and
//! keeps a weak ledger of all objects it has allocated. The ledger never
//! keeps anything alive; it is the bookkeeping surface a future sweep
//! collector would walk.

use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

/// A heap-allocated runtime object.
#[derive(Debug)]
pub enum Obj {
    /// An immutable string. The `Rc<str>` is shared with the intern table,
    /// which holds the same allocation as its key.
    Str(Rc<str>),
}

impl Obj {
    /// The string contents.
    pub fn as_str(&self) -> &str {
        match self {
            Obj::Str(chars) => chars,
        }
    }

    /// The shared character storage backing this string.
    pub fn chars(&self) -> &Rc<str> {
        match self {
            Obj::Str(chars) => chars,
        }
    }
}

/// Per-VM object heap and string intern table.
///
/// Interning guarantees that at most one string object exists per distinct
/// character sequence, which lets [`crate::Value`] compare strings by
/// identity. Two `Heap` instances share nothing; handles from one must not
/// be mixed with another.
#[derive(Default)]
pub struct Heap {
    /// Canonical string objects keyed by their contents. The map is the
    /// sole owner of interned storage; every other holder (stack slots,
    /// globals, constant pools) keeps an `Rc` handle cloned from here.
    strings: FxHashMap<Rc<str>, Rc<Obj>>,
    /// Weak ledger of every object allocated by this heap, in allocation
    /// order. Stands in for an intrusive next-in-heap link.
    objects: Vec<Weak<Obj>>,
}

impl Heap {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the canonical string object for `text`, allocating it on
    /// first sight.
    pub fn intern(&mut self, text: &str) -> Rc<Obj> {
        if let Some(obj) = self.strings.get(text) {
            return Rc::clone(obj);
        }

        let chars: Rc<str> = Rc::from(text);
        let obj = Rc::new(Obj::Str(Rc::clone(&chars)));
        self.objects.push(Rc::downgrade(&obj));
        self.strings.insert(chars, Rc::clone(&obj));
        obj
    }

    /// Concatenate two strings and return the interned result.
    pub fn concat(&mut self, lhs: &Obj, rhs: &Obj) -> Rc<Obj> {
        let mut joined = String::with_capacity(lhs.as_str().len() + rhs.as_str().len());
        joined.push_str(lhs.as_str());
        joined.push_str(rhs.as_str());
        self.intern(&joined)
    }

    /// Number of distinct interned strings.
    pub fn interned_count(&self) -> usize {
        self.strings.len()
    }

    /// Number of ledger entries whose object is still alive.
    pub fn live_objects(&self) -> usize {
        self.objects
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_returns_same_handle() {
        let mut heap = Heap::new();
        let a = heap.intern("hello");
        let b = heap.intern("hello");
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(heap.interned_count(), 1);
    }

    #[test]
    fn test_intern_distinct_strings() {
        let mut heap = Heap::new();
        let a = heap.intern("hello");
        let b = heap.intern("world");
        assert!(!Rc::ptr_eq(&a, &b));
        assert_eq!(heap.interned_count(), 2);
    }

    #[test]
    fn test_intern_empty_string() {
        let mut heap = Heap::new();
        let a = heap.intern("");
        assert_eq!(a.as_str(), "");
        assert!(Rc::ptr_eq(&a, &heap.intern("")));
    }

    #[test]
    fn test_concat_interns_result() {
        let mut heap = Heap::new();
        let st = heap.intern("st");
        let r = heap.intern("r");
        let joined = heap.concat(&st, &r);
        assert_eq!(joined.as_str(), "str");
        assert!(Rc::ptr_eq(&joined, &heap.intern("str")));
    }

    #[test]
    fn test_concat_matches_literal() {
        let mut heap = Heap::new();
        let a = heap.intern("foo");
        let b = heap.intern("bar");
        let literal = heap.intern("foobar");
        let joined = heap.concat(&a, &b);
        assert!(Rc::ptr_eq(&joined, &literal));
    }

    #[test]
    fn test_heaps_are_independent() {
        let mut first = Heap::new();
        let mut second = Heap::new();
        let a = first.intern("shared");
        let b = second.intern("shared");
        assert!(!Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_ledger_tracks_live_objects() {
        let mut heap = Heap::new();
        let _a = heap.intern("one");
        let _b = heap.intern("two");
        assert_eq!(heap.live_objects(), 2);
    }

    #[test]
    fn test_drop_releases_objects() {
        let weak = {
            let mut heap = Heap::new();
            let obj = heap.intern("transient");
            Rc::downgrade(&obj)
        };
        assert_eq!(weak.strong_count(), 0);
    }
}
