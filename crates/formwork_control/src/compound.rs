//! Compound controls

use std::fmt;

use formwork_value::path::PathError;
use formwork_value::{Mark, MarkMap, ValueMap};
use formwork_walker::{LoadWalker, PrepareWalker};

use crate::control::Control;
use crate::traits::{Clean, ValidateGroup};

/// A control composed of child controls.
///
/// Children are processed in insertion order; a later sibling may read an
/// earlier sibling's already-loaded value through the walker. An
/// empty-named compound is transparent: it groups its children without
/// contributing an addressing scope.
pub struct CompoundControl {
    name: String,
    submit_key: Option<String>,
    children: Vec<Control>,
    cleaner: Option<Box<dyn Clean>>,
    compound_validators: Vec<Box<dyn ValidateGroup>>,
    error_messages: Vec<String>,
    values: ValueMap,
}

impl CompoundControl {
    /// Creates an empty compound control.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            submit_key: None,
            children: Vec::new(),
            cleaner: None,
            compound_validators: Vec::new(),
            error_messages: Vec::new(),
            values: ValueMap::new(),
        }
    }

    /// Appends a child control.
    #[must_use]
    pub fn child(mut self, control: impl Into<Control>) -> Self {
        self.push(control);
        self
    }

    /// Sets the branch cleaner, applied to this branch's raw map before any
    /// child reads it.
    #[must_use]
    pub fn cleaner(mut self, cleaner: impl Clean + 'static) -> Self {
        self.set_cleaner(cleaner);
        self
    }

    /// Appends a compound validation rule.
    #[must_use]
    pub fn compound_validator(mut self, validator: impl ValidateGroup + 'static) -> Self {
        self.add_compound_validator(validator);
        self
    }

    /// Appends a child control in place.
    pub fn push(&mut self, control: impl Into<Control>) {
        self.children.push(control.into());
    }

    /// Sets the branch cleaner in place.
    pub fn set_cleaner(&mut self, cleaner: impl Clean + 'static) {
        self.cleaner = Some(Box::new(cleaner));
    }

    /// Appends a compound validation rule in place.
    pub fn add_compound_validator(&mut self, validator: impl ValidateGroup + 'static) {
        self.compound_validators.push(Box::new(validator));
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

    /// Returns the children in processing order.
    #[must_use]
    pub fn children(&self) -> &[Control] {
        &self.children
    }

    /// Looks up a direct child by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Control> {
        self.children.iter().find(|child| child.name() == name)
    }

    /// Looks up a direct child by name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.children.iter_mut().find(|child| child.name() == name)
    }

    /// Returns this branch's whitelisted sub-map, captured when the branch
    /// ascended during the last load pass.
    #[must_use]
    pub const fn values(&self) -> &ValueMap {
        &self.values
    }

    /// Returns the messages collected by the last validation pass.
    #[must_use]
    pub fn error_messages(&self) -> &[String] {
        &self.error_messages
    }

    /// Assigns submit-keys to this control and its subtree.
    pub fn prepare(&mut self, walker: &PrepareWalker) {
        self.submit_key = Some(walker.parent_submit_name().to_string());

        for child in &mut self.children {
            let child_walker = walker.descend(child.name());
            child.prepare(&child_walker);
        }
    }

    /// Reconciles this branch of the submission.
    ///
    /// Descends into the branch's raw slice, applies the cleaner before the
    /// first child reads, loads the children in declaration order, and
    /// ascends, merging the branch's whitelist and changed-set into the
    /// parent scope.
    ///
    /// # Errors
    ///
    /// Propagates the first configuration error raised below this branch;
    /// the load pass does not continue past one.
    ///
    /// # Panics
    ///
    /// Panics if the prepare pass has not run.
    pub fn load(&mut self, walker: &mut LoadWalker) -> Result<(), PathError> {
        walker.descend(&self.name, self.submit_key());

        if let Some(cleaner) = &self.cleaner {
            walker.clean(|raw| cleaner.clean(raw));
        }

        for child in &mut self.children {
            child.load(walker)?;
        }

        self.values = walker.ascend(&self.name);
        Ok(())
    }

    /// Validates this branch bottom-up.
    ///
    /// All children are validated first, depth-first. The compound's own
    /// validators run only if every descendant passed; otherwise they are
    /// skipped (not run, not counted as failed) and the branch is invalid
    /// by virtue of its descendants. Returns the branch's validity
    /// and, when invalid, its mark for the invalid tree.
    pub fn validate(&mut self) -> (bool, Option<Mark>) {
        self.error_messages.clear();

        let mut children_valid = true;
        let mut invalid = MarkMap::new();

        for child in &mut self.children {
            let (valid, mark) = child.validate();
            children_valid &= valid;

            if let Some(mark) = mark {
                // a transparent compound's children surface in the parent's
                // scope, matching how the load pass flattens them
                if child.name().is_empty() {
                    match mark {
                        Mark::Branch(map) => invalid.extend(map),
                        Mark::Leaf => {}
                    }
                } else {
                    invalid.insert(child.name().to_string(), mark);
                }
            }
        }

        let mut own_valid = true;
        if children_valid {
            for validator in &self.compound_validators {
                if let Err(message) = validator.validate(&self.values) {
                    self.error_messages.push(message);
                    own_valid = false;
                }
            }
        }

        if children_valid && own_valid {
            (true, None)
        } else {
            (false, Some(Mark::Branch(invalid)))
        }
    }
}

impl fmt::Debug for CompoundControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompoundControl")
            .field("name", &self.name)
            .field("submit_key", &self.submit_key)
            .field("children", &self.children)
            .field("compound_validators", &self.compound_validators.len())
            .finish_non_exhaustive()
    }
}
