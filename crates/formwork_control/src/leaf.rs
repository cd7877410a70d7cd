//! Leaf controls

use std::fmt;

use formwork_value::path::PathError;
use formwork_value::{Mark, Value};
use formwork_walker::{LoadWalker, PrepareWalker};

use crate::traits::{Format, Validate};

/// A control holding a single value.
///
/// A leaf's value is either programmatically preset or, after the load
/// pass, the whitelisted submitted value. Immutable leaves never accept a
/// submitted value: the submitted data is read but discarded, and the
/// preset value is what enters the whitelist.
pub struct LeafControl {
    name: String,
    submit_key: Option<String>,
    value: Value,
    mutable: bool,
    error_messages: Vec<String>,
    validators: Vec<Box<dyn Validate>>,
    formatter: Option<Box<dyn Format>>,
}

impl LeafControl {
    /// Creates a mutable leaf with a `Null` value.
    ///
    /// Leaf names must be non-empty and unique among siblings; the empty
    /// name is reserved for transparent compound controls.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "leaf controls should be named");

        Self {
            name,
            submit_key: None,
            value: Value::Null,
            mutable: true,
            error_messages: Vec::new(),
            validators: Vec::new(),
            formatter: None,
        }
    }

    /// Presets the control's value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    /// Makes the control immutable: its value is fixed at the value set
    /// before loading.
    #[must_use]
    pub fn immutable(mut self) -> Self {
        self.mutable = false;
        self
    }

    /// Appends a validation rule. Rules run in the order they were added.
    #[must_use]
    pub fn validator(mut self, validator: impl Validate + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Sets the whitelisting/normalization hook for submitted values.
    #[must_use]
    pub fn formatter(mut self, formatter: impl Format + 'static) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    /// Returns the control's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the control's submit-key.
    ///
    /// # Panics
    ///
    /// Panics if the prepare pass has not run; the submit-key is defined if
    /// and only if it has.
    #[must_use]
    pub fn submit_key(&self) -> &str {
        self.submit_key
            .as_deref()
            .expect("control should be prepared before its submit key is read")
    }

    /// Returns the control's current value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Sets the control's value programmatically.
    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
    }

    /// Returns whether the control accepts submitted values.
    #[must_use]
    pub const fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Returns the messages collected by the last validation pass.
    #[must_use]
    pub fn error_messages(&self) -> &[String] {
        &self.error_messages
    }

    /// Assigns the submit-key from the walker scoped to this control.
    pub fn prepare(&mut self, walker: &PrepareWalker) {
        self.submit_key = Some(walker.parent_submit_name().to_string());
    }

    /// Reconciles the submitted value for this control.
    ///
    /// The raw value is normalized through the formatter (or, without one,
    /// reduced to a scalar), compared against the current value for change
    /// detection, and the resulting trusted value enters the whitelist. An
    /// immutable leaf reads the submitted data but discards it.
    ///
    /// # Errors
    ///
    /// Propagates a [`PathError`] from the formatter; a hook referencing a
    /// missing branch is a configuration error.
    ///
    /// # Panics
    ///
    /// Panics if the prepare pass has not run.
    pub fn load(&mut self, walker: &mut LoadWalker) -> Result<(), PathError> {
        let raw = walker
            .submitted_value(self.submit_key())
            .cloned()
            .unwrap_or(Value::Null);

        if self.mutable {
            let incoming = match &self.formatter {
                Some(formatter) => formatter.format(&raw, walker)?,
                None => raw.into_scalar(),
            };

            if incoming != self.value {
                self.value = incoming;
                walker.set_changed(&self.name);
            }
        }

        walker.set_whitelist_value(&self.name, self.value.clone());
        Ok(())
    }

    /// Runs the control's validators over its loaded value.
    ///
    /// All validators run; each failure appends its message. Returns the
    /// control's validity and, when invalid, the leaf mark for the invalid
    /// tree.
    pub fn validate(&mut self) -> (bool, Option<Mark>) {
        self.error_messages.clear();

        for validator in &self.validators {
            if let Err(message) = validator.validate(&self.value) {
                self.error_messages.push(message);
            }
        }

        if self.error_messages.is_empty() {
            (true, None)
        } else {
            (false, Some(Mark::Leaf))
        }
    }
}

impl fmt::Debug for LeafControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafControl")
            .field("name", &self.name)
            .field("submit_key", &self.submit_key)
            .field("value", &self.value)
            .field("mutable", &self.mutable)
            .field("validators", &self.validators.len())
            .finish_non_exhaustive()
    }
}
