//! The recursive value tree
//!
//! Submitted form data and the whitelisted output tree share one shape: a
//! mapping from string keys to scalars or nested mappings. [`Value`] models
//! that shape as a tagged variant tree so the leaf-vs-branch distinction is
//! checkable, and [`ValueMap`] preserves insertion order, which is both
//! rendering order and processing order for the control tree.

use indexmap::IndexMap;

/// An ordered mapping from control names to values.
pub type ValueMap = IndexMap<String, Value>;

/// A single node of the value tree.
///
/// `Null` represents "nothing submitted" as well as a whitelist filter
/// rejecting a submitted value. Scalars carry leaf-control values; `Map`
/// carries the sub-tree of a compound branch.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// No value: nothing was submitted, or the submitted value was rejected.
    #[default]
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// An integer scalar.
    Int(i64),
    /// A string scalar.
    String(String),
    /// A nested branch of the tree.
    Map(ValueMap),
}

impl Value {
    /// Returns `true` if the value is `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean scalar, if this is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Null | Self::Int(_) | Self::String(_) | Self::Map(_) => None,
        }
    }

    /// Returns the integer scalar, if this is one.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Null | Self::Bool(_) | Self::String(_) | Self::Map(_) => None,
        }
    }

    /// Returns the string scalar, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            Self::Null | Self::Bool(_) | Self::Int(_) | Self::Map(_) => None,
        }
    }

    /// Returns the nested map, if this is a branch.
    #[must_use]
    pub const fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Self::Map(map) => Some(map),
            Self::Null | Self::Bool(_) | Self::Int(_) | Self::String(_) => None,
        }
    }

    /// Normalizes this value to a branch map.
    ///
    /// A scalar (or `Null`) where a nested map was expected is a data-shape
    /// anomaly: it is treated as "nothing submitted for this branch" and
    /// normalized to an empty map rather than rejected.
    #[must_use]
    pub fn into_branch(self) -> ValueMap {
        match self {
            Self::Map(map) => map,
            Self::Null | Self::Bool(_) | Self::Int(_) | Self::String(_) => ValueMap::new(),
        }
    }

    /// Normalizes this value to a leaf scalar.
    ///
    /// A nested map where a scalar was expected is the inverse data-shape
    /// anomaly and normalizes to `Null`.
    #[must_use]
    pub fn into_scalar(self) -> Self {
        match self {
            Self::Map(_) => Self::Null,
            Self::Null | Self::Bool(_) | Self::Int(_) | Self::String(_) => self,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Self::Map(map)
    }
}
