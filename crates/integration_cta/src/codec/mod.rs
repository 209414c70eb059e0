//! Parameter codec
//!
//! Turns an operation's typed arguments into the query string its endpoint
//! expects. Each request type validates itself in three steps (value shape,
//! then group and cardinality rules, then per-item encoding) through
//! [`OperationRequest::encode`], using the shared rules in [`rules`].
//!
//! List values are encoded item by item and joined with a single comma, so
//! an item containing a comma or space is escaped rather than split.

pub mod encoding;
pub mod rules;

use std::fmt;

use crate::endpoints::Operation;
use crate::error::ValidationError;

pub use encoding::{decode, encode, split_list};
pub use rules::MAX_LIST_ITEMS;

/// Separator between items of a list-valued parameter
pub const LIST_SEPARATOR: char = ',';

/// Arguments for one remote operation
pub trait OperationRequest: fmt::Debug + Send + Sync {
    /// The operation these arguments are sent as
    fn operation(&self) -> Operation;

    /// Validate the arguments and serialize them into a query fragment
    ///
    /// # Errors
    ///
    /// Returns the first rule the arguments violate.
    fn encode(&self) -> Result<QueryFragment, ValidationError>;
}

/// Ordered, already percent-encoded `key=value` pairs
///
/// Blank scalars and empty lists are skipped, so an absent parameter never
/// shows up as `key=`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFragment {
    pairs: Vec<(&'static str, String)>,
}

impl QueryFragment {
    /// Create an empty fragment
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single value, skipping it if blank
    pub fn push_scalar(&mut self, key: &'static str, value: &str) -> &mut Self {
        if !value.trim().is_empty() {
            self.pairs.push((key, encode(value)));
        }
        self
    }

    /// Append an optional value
    pub fn push_optional(&mut self, key: &'static str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.push_scalar(key, value);
        }
        self
    }

    /// Append a numeric value
    pub fn push_number(&mut self, key: &'static str, value: Option<u32>) -> &mut Self {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    /// Append a boolean as the literal `true`/`false` the services expect
    pub fn push_bool(&mut self, key: &'static str, value: bool) -> &mut Self {
        self.pairs.push((key, bool_str(value).to_string()));
        self
    }

    /// Append a list, encoding each item and joining with [`LIST_SEPARATOR`]
    pub fn push_list<S: AsRef<str>>(&mut self, key: &'static str, items: &[S]) -> &mut Self {
        if items.is_empty() {
            return self;
        }

        let mut joined = String::new();
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                joined.push(LIST_SEPARATOR);
            }
            joined.push_str(&encode(item.as_ref()));
        }
        self.pairs.push((key, joined));
        self
    }

    /// Append every pair of `other`, preserving order
    pub fn extend(&mut self, other: &Self) -> &mut Self {
        self.pairs.extend(other.pairs.iter().cloned());
        self
    }

    /// Encoded value of the first pair with `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Decoded items of the first pair with `key`
    #[must_use]
    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).map(split_list)
    }

    /// Pairs in insertion order
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.pairs.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Returns true if no parameter was added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl fmt::Display for QueryFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (key, value)) in self.pairs.iter().enumerate() {
            if index > 0 {
                f.write_str("&")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Convert bool to "true"/"false" str for query params
const fn bool_str(val: bool) -> &'static str {
    if val { "true" } else { "false" }
}
