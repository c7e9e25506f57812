//! Multi-object iteration.

use crate::cursor::Cursor;

/// Advances a cursor to the next object's event buffer.
///
/// Implementations rebind the cursor with [`Cursor::set_ptr`] and return
/// `true`, or return `false` once no object is left.
pub trait ObjectSource<'a> {
    fn next_object(&mut self, cursor: &mut Cursor<'a>) -> bool;
}

impl<'a, F> ObjectSource<'a> for F
where
    F: FnMut(&mut Cursor<'a>) -> bool,
{
    fn next_object(&mut self, cursor: &mut Cursor<'a>) -> bool {
        self(cursor)
    }
}

/// Iterates over a fixed list of borrowed object buffers.
#[derive(Debug, Clone, Default)]
pub struct ObjectList<'a> {
    objects: Vec<&'a [u8]>,
    next: usize,
}

impl<'a> ObjectList<'a> {
    #[must_use]
    pub fn new(objects: Vec<&'a [u8]>) -> Self {
        Self { objects, next: 0 }
    }

    /// Number of objects not yet bound.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.objects.len().saturating_sub(self.next)
    }

    /// Index of the object most recently bound, if any.
    #[must_use]
    pub const fn current(&self) -> Option<usize> {
        self.next.checked_sub(1)
    }
}

impl<'a> ObjectSource<'a> for ObjectList<'a> {
    fn next_object(&mut self, cursor: &mut Cursor<'a>) -> bool {
        match self.objects.get(self.next) {
            Some(&buf) => {
                self.next += 1;
                cursor.set_ptr(buf);
                true
            }
            None => false,
        }
    }
}

impl<'a> FromIterator<&'a [u8]> for ObjectList<'a> {
    fn from_iter<I: IntoIterator<Item = &'a [u8]>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_binds_each_object_once() {
        let a: &[u8] = b"\xa0";
        let b: &[u8] = b"";
        let mut list = ObjectList::new(vec![a, b]);
        let mut cursor = Cursor::new(0, 0).unwrap();
        assert_eq!(list.current(), None);
        assert!(list.next_object(&mut cursor));
        assert_eq!(list.current(), Some(0));
        assert!(list.next_object(&mut cursor));
        assert!(cursor.is_eof(), "empty object binds at eof");
        assert!(!list.next_object(&mut cursor));
        assert_eq!(list.remaining(), 0);
    }

    #[test]
    fn closures_are_sources() {
        let mut calls = 0;
        let mut source = |_: &mut Cursor<'_>| {
            calls += 1;
            calls < 3
        };
        let mut cursor = Cursor::new(0, 0).unwrap();
        assert!(source.next_object(&mut cursor));
        assert!(source.next_object(&mut cursor));
        assert!(!source.next_object(&mut cursor));
    }
}
