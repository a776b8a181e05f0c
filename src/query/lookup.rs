//! Field access and predicate lookups.
//!
//! A lookup path such as `parent__name` is split on `__` and resolved one
//! segment at a time: the first segment is read from the queried object
//! through [`Fields`], each following segment from the value produced by
//! the previous one. A missing segment anywhere makes the path unresolved,
//! which never matches.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Separator between segments of a lookup path.
pub const LOOKUP_SEPARATOR: &str = "__";

/// Read access to named fields, used to evaluate lookups.
pub trait Fields {
    /// Value of the named field, or `None` when the object has no such field.
    fn field(&self, name: &str) -> Option<Value>;
}

impl Fields for Value {
    fn field(&self, name: &str) -> Option<Value> {
        match self {
            Value::Object(map) => map.get(name).cloned(),
            _ => None,
        }
    }
}

impl<T: Fields + ?Sized> Fields for &T {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}

impl<T: Fields + ?Sized> Fields for Arc<T> {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}

impl<T: Fields + ?Sized> Fields for Box<T> {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}

/// Resolve a `__`-separated path against an object.
pub fn resolve<F: Fields + ?Sized>(item: &F, path: &str) -> Option<Value> {
    let mut segments = path.split(LOOKUP_SEPARATOR);
    let mut current = item.field(segments.next()?)?;
    for segment in segments {
        current = current.field(segment)?;
    }
    Some(current)
}

/// Equality used by lookups; numbers compare by value regardless of
/// integer or float representation, at any depth.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_f64() || y.is_f64() => {
            x.as_f64() == y.as_f64()
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| values_equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len() && x.iter().all(|(key, l)| entry_equal(y.get(key), l))
        }
        _ => a == b,
    }
}

fn entry_equal(other: Option<&Value>, value: &Value) -> bool {
    other.is_some_and(|other| values_equal(value, other))
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// Total order used by `order_by`.
///
/// Missing values and nulls sort first, then booleans, numbers, strings,
/// arrays and objects. Values of the same kind compare naturally; objects
/// compare equal to each other.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Array(x)), Some(Value::Array(y))) => {
            for (left, right) in x.iter().zip(y) {
                match compare_values(Some(left), Some(right)) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            x.len().cmp(&y.len())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// A single `path == value` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    path: String,
    expected: Value,
}

impl Predicate {
    /// Create a predicate on a lookup path.
    pub fn new(path: impl Into<String>, expected: impl Into<Value>) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
        }
    }

    /// The lookup path, e.g. `parent__name`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The value the resolved path must equal.
    pub fn expected(&self) -> &Value {
        &self.expected
    }

    /// Check whether `item` satisfies this predicate.
    pub fn matches<F: Fields + ?Sized>(&self, item: &F) -> bool {
        resolve(item, &self.path).is_some_and(|actual| values_equal(&actual, &self.expected))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.path, self.expected)
    }
}

/// A conjunction of predicates.
///
/// Built from pairs, e.g. `("a", 1)`, `[("a", 1), ("order", 2)]` or with the
/// [`and`](Lookup::and) builder when values have different types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lookup {
    predicates: Vec<Predicate>,
}

impl Lookup {
    /// Create an empty lookup, which every object satisfies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate.
    pub fn and(mut self, path: impl Into<String>, expected: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::new(path, expected));
        self
    }

    /// The predicates in this lookup.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Number of predicates.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Check if there are no predicates.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Check whether `item` satisfies every predicate.
    pub fn matches<F: Fields + ?Sized>(&self, item: &F) -> bool {
        self.predicates.iter().all(|p| p.matches(item))
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, predicate) in self.predicates.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", predicate)?;
        }
        Ok(())
    }
}

impl From<Predicate> for Lookup {
    fn from(predicate: Predicate) -> Self {
        Self {
            predicates: vec![predicate],
        }
    }
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for Lookup {
    fn from((path, expected): (K, V)) -> Self {
        Predicate::new(path, expected).into()
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Lookup {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for Lookup {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Lookup {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            predicates: iter
                .into_iter()
                .map(|(path, expected)| Predicate::new(path, expected))
                .collect(),
        }
    }
}
