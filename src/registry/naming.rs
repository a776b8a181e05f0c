//! Name inference for registered objects.
//!
//! Objects that carry their own declared identifier (a function or a type
//! captured at its declaration site) implement [`Registrable`] with a
//! `declared_name`. Plain values keep the default and must be registered
//! under an explicit name.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::query::Fields;

/// Capability of naming oneself at registration time.
pub trait Registrable {
    /// The identifier this object was declared with, if it has one.
    fn declared_name(&self) -> Option<String> {
        None
    }
}

macro_rules! anonymous_registrable {
    ($($ty:ty),* $(,)?) => {
        $(impl Registrable for $ty {})*
    };
}

anonymous_registrable!(
    String,
    &'static str,
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    usize,
    isize,
    f32,
    f64,
    serde_json::Value,
);

impl<T: Registrable + ?Sized> Registrable for Arc<T> {
    fn declared_name(&self) -> Option<String> {
        (**self).declared_name()
    }
}

impl<T: Registrable + ?Sized> Registrable for Box<T> {
    fn declared_name(&self) -> Option<String> {
        (**self).declared_name()
    }
}

/// A value paired with the identifier it was declared under.
///
/// Use [`declared!`](crate::declared) to capture a function or constant
/// together with its identifier, or [`Declared::of_type`] to name a value
/// after a type.
#[derive(Clone)]
pub struct Declared<V> {
    name: String,
    value: V,
}

impl<V> Declared<V> {
    /// Pair a value with its declared identifier.
    pub fn new(name: impl Into<String>, value: V) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Name a value after the type `Ty`.
    pub fn of_type<Ty: ?Sized>(value: V) -> Self {
        Self::new(short_type_name::<Ty>(), value)
    }

    /// The declared identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wrapped value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Unwrap into the inner value.
    pub fn into_inner(self) -> V {
        self.value
    }
}

impl<V> Deref for Declared<V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.value
    }
}

impl<V> Registrable for Declared<V> {
    fn declared_name(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

impl<V: Fields> Fields for Declared<V> {
    fn field(&self, name: &str) -> Option<serde_json::Value> {
        self.value.field(name)
    }
}

impl<V> fmt::Debug for Declared<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Declared")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<V: PartialEq> PartialEq for Declared<V> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

/// The last path segment of a type's name, without generic arguments.
///
/// `short_type_name::<std::collections::HashMap<K, V>>()` is `"HashMap"`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Capture a value together with the identifier it was declared under.
///
/// ```
/// use persisting_theory::{declared, Registrable};
///
/// fn something() -> u32 {
///     42
/// }
///
/// let entry = declared!(something as fn() -> u32);
/// assert_eq!(entry.declared_name().as_deref(), Some("something"));
/// assert_eq!((entry.value())(), 42);
/// ```
#[macro_export]
macro_rules! declared {
    ($item:ident as $ty:ty) => {
        $crate::registry::Declared::new(stringify!($item), $item as $ty)
    };
    ($item:ident) => {
        $crate::registry::Declared::new(stringify!($item), $item)
    };
}
