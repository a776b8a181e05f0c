//! Chainable queries over registered objects.

use std::ops::{Bound, RangeBounds};

use super::lookup::{compare_values, resolve, Fields, Lookup};
use crate::error::{RegistryError, Result};

/// An ordered snapshot of objects that can be narrowed and reordered.
///
/// Every chained call (`filter`, `exclude`, `order_by`) returns a new
/// `QuerySet` holding its own copy of the matching objects, so
/// `filter(p).filter(q)` and `filter(p + q)` select the same objects and the
/// registry the snapshot came from is never touched.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySet<T> {
    items: Vec<T>,
}

impl<T> QuerySet<T> {
    /// Wrap an ordered sequence of objects.
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Number of objects in the current sequence.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Whether the current sequence holds any object.
    pub fn exists(&self) -> bool {
        !self.items.is_empty()
    }

    /// Borrow the current sequence.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterate over the current sequence.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Take the current sequence.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Clone> QuerySet<T> {
    /// A copy of the current sequence.
    pub fn all(&self) -> Self {
        self.clone()
    }

    /// First object of the current sequence, or `None` when empty.
    pub fn first(&self) -> Option<T> {
        self.items.first().cloned()
    }

    /// Last object of the current sequence, or `None` when empty.
    pub fn last(&self) -> Option<T> {
        self.items.last().cloned()
    }

    /// Copy a range of the current sequence.
    ///
    /// Bounds past the end are clamped, so `slice(..2)` on a single object
    /// yields that object and `slice(5..)` on it yields nothing.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Vec<T> {
        let len = self.items.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .min(len);

        if start >= end {
            return Vec::new();
        }
        self.items[start..end].to_vec()
    }
}

impl<T: Fields + Clone> QuerySet<T> {
    /// Keep objects matching every predicate of `lookup`.
    pub fn filter(&self, lookup: impl Into<Lookup>) -> Self {
        let lookup = lookup.into();
        Self::new(
            self.items
                .iter()
                .filter(|item| lookup.matches(*item))
                .cloned()
                .collect(),
        )
    }

    /// Drop objects matching every predicate of `lookup`.
    ///
    /// Objects matching only some of the predicates are kept.
    pub fn exclude(&self, lookup: impl Into<Lookup>) -> Self {
        let lookup = lookup.into();
        Self::new(
            self.items
                .iter()
                .filter(|item| !lookup.matches(*item))
                .cloned()
                .collect(),
        )
    }

    /// Return the single object matching `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `DoesNotExist` when nothing matches and
    /// `MultipleObjectsReturned` when more than one object matches.
    pub fn get(&self, lookup: impl Into<Lookup>) -> Result<T> {
        let lookup = lookup.into();
        let mut matches = self.filter(lookup.clone()).into_vec();

        match matches.len() {
            0 => Err(RegistryError::DoesNotExist {
                lookup: lookup.to_string(),
            }),
            1 => Ok(matches.remove(0)),
            count => Err(RegistryError::MultipleObjectsReturned {
                lookup: lookup.to_string(),
                count,
            }),
        }
    }

    /// Sort by a lookup path, ascending, or descending with a leading `-`.
    ///
    /// The sort is stable in both directions: objects with equal keys keep
    /// their relative order.
    pub fn order_by(&self, field: &str) -> Self {
        let (path, descending) = match field.strip_prefix('-') {
            Some(path) => (path, true),
            None => (field, false),
        };

        let mut keyed: Vec<_> = self
            .items
            .iter()
            .map(|item| (resolve(item, path), item.clone()))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| {
            let ordering = compare_values(a.as_ref(), b.as_ref());
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });

        Self::new(keyed.into_iter().map(|(_, item)| item).collect())
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for QuerySet<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        &self.items == other
    }
}

impl<T: PartialEq> PartialEq<[T]> for QuerySet<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.items.as_slice() == other
    }
}

impl<T> IntoIterator for QuerySet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a QuerySet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> FromIterator<T> for QuerySet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
