//! Declarative queries over registry contents.
//!
//! [`QuerySet`] is the chainable view returned by
//! [`Registry::objects`](crate::registry::Registry::objects). Predicates are
//! expressed as [`Lookup`]s: `(path, value)` pairs whose path may reach into
//! related objects with `__` (`parent__name`). Objects take part in lookups
//! by implementing [`Fields`].
//!
//! # Example
//!
//! ```
//! use persisting_theory::query::{Lookup, QuerySet};
//! use serde_json::json;
//!
//! let people = QuerySet::new(vec![
//!     json!({"name": "alain", "order": 2, "parent": {"name": "p1"}}),
//!     json!({"name": "eliot", "order": 1, "parent": {"name": "p2"}}),
//! ]);
//!
//! let eliot = people.get(("parent__name", "p2")).unwrap();
//! assert_eq!(eliot["name"], "eliot");
//!
//! let ordered = people.order_by("-order");
//! assert_eq!(ordered.first().unwrap()["name"], "alain");
//!
//! assert!(!people.filter(Lookup::new().and("name", "alain").and("order", 1)).exists());
//! ```

pub mod lookup;
pub mod queryset;

pub use lookup::{resolve, Fields, Lookup, Predicate, LOOKUP_SEPARATOR};
pub use queryset::QuerySet;
