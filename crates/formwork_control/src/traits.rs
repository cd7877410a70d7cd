//! Capability traits at the control tree's extension seams
//!
//! Concrete validators, cleaners, and formatters live outside the core; the
//! traits here define the contract each must satisfy. Every trait has a
//! blanket implementation for the matching closure shape, so inline logic
//! needs no adapter type.

use formwork_value::path::PathError;
use formwork_value::{Value, ValueMap};
use formwork_walker::LoadWalker;

/// A validation rule for a single leaf value.
///
/// A failing rule returns the message to append to the control's error
/// list. Rules run in declared order and all of them run; one failure is
/// enough to mark the control invalid.
pub trait Validate {
    /// Checks the leaf's loaded value.
    ///
    /// # Errors
    ///
    /// Returns the user-facing message when the value fails the rule.
    fn validate(&self, value: &Value) -> Result<(), String>;
}

impl<F> Validate for F
where
    F: Fn(&Value) -> Result<(), String>,
{
    fn validate(&self, value: &Value) -> Result<(), String> {
        self(value)
    }
}

/// A validation rule over a compound branch's whitelisted sub-map.
///
/// Compound rules only run once every descendant of the branch has passed
/// its own validation.
pub trait ValidateGroup {
    /// Checks the branch's loaded values.
    ///
    /// # Errors
    ///
    /// Returns the user-facing message when the branch fails the rule.
    fn validate(&self, values: &ValueMap) -> Result<(), String>;
}

impl<F> ValidateGroup for F
where
    F: Fn(&ValueMap) -> Result<(), String>,
{
    fn validate(&self, values: &ValueMap) -> Result<(), String> {
        self(values)
    }
}

/// A transform over a branch's raw submitted map, applied before any child
/// reads it.
///
/// Used where raw keys must be combined or split into the keys the child
/// controls expect.
pub trait Clean {
    /// Reshapes the branch's raw map.
    fn clean(&self, raw: ValueMap) -> ValueMap;
}

impl<F> Clean for F
where
    F: Fn(ValueMap) -> ValueMap,
{
    fn clean(&self, raw: ValueMap) -> ValueMap {
        self(raw)
    }
}

/// The whitelisting/normalization hook of a leaf control.
///
/// Receives the raw submitted value and the load walker, so an acceptable
/// value set may be derived from an already-loaded branch via path
/// resolution. Returning [`Value::Null`] rejects the submitted value.
pub trait Format {
    /// Produces the trusted value for the raw submitted one.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] when the hook references a branch that does
    /// not exist; this is a configuration error and aborts the load pass.
    fn format(&self, raw: &Value, walker: &LoadWalker) -> Result<Value, PathError>;
}

impl<F> Format for F
where
    F: Fn(&Value, &LoadWalker) -> Result<Value, PathError>,
{
    fn format(&self, raw: &Value, walker: &LoadWalker) -> Result<Value, PathError> {
        self(raw, walker)
    }
}
