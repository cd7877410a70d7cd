//! The form submission controller
//!
//! One [`Form`] owns a control tree and runs the request state machine over
//! it: prepare once, search the raw submission for the submit-intent
//! marker, load, verify the request token, validate, and hand the outcome
//! to the caller. Any validation failure anywhere in the tree forces the
//! default echo handler: redisplay is all-or-nothing at the root.

use log::{debug, warn};

use formwork_control::{Clean, CompoundControl, Control, LeafControl, ValidateGroup};
use formwork_value::{ChangedMap, InvalidMap, Mark, MarkMap, Value, ValueMap};
use formwork_walker::{LoadWalker, PrepareWalker};

use crate::error::FormError;
use crate::method::Method;

/// The conventional raw field carrying the submit-intent marker: its value
/// names the handler the submission is for.
pub const HANDLER_FIELD: &str = "_handler";

/// The conventional control carrying the double-submit request token.
pub const TOKEN_FIELD: &str = "_token";

/// The default handler: redisplay the form as-is.
pub const ECHO_HANDLER: &str = "echo";

/// A form definition and the orchestration of its request passes.
pub struct Form {
    method: Method,
    root: CompoundControl,
    handlers: Vec<String>,
    token_secret: Option<String>,
    prepared: bool,
}

impl Form {
    /// Creates an empty form submitting with the given method.
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            root: CompoundControl::new(""),
            handlers: Vec::new(),
            token_secret: None,
            prepared: false,
        }
    }

    /// Returns the configured transport method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Appends a top-level control.
    ///
    /// # Panics
    ///
    /// Panics if the form has already been prepared: submit-keys are
    /// assigned exactly once, so the tree must be complete first.
    pub fn add(&mut self, control: impl Into<Control>) {
        assert!(
            !self.prepared,
            "controls should be added before the form is prepared"
        );
        self.root.push(control);
    }

    /// Registers a handler name the form accepts submissions for.
    pub fn register_handler(&mut self, name: impl Into<String>) {
        self.handlers.push(name.into());
    }

    /// Sets the form-level cleaner over the top-level raw map.
    pub fn set_cleaner(&mut self, cleaner: impl Clean + 'static) {
        self.root.set_cleaner(cleaner);
    }

    /// Appends a form-level validation rule over the whole whitelist.
    pub fn add_compound_validator(&mut self, validator: impl ValidateGroup + 'static) {
        self.root.add_compound_validator(validator);
    }

    /// Enables double-submit token verification against the given session
    /// secret, declaring the conventional token control if needed.
    ///
    /// Issuing the token and storing it in the session stay with the
    /// caller.
    pub fn require_token(&mut self, secret: impl Into<String>) {
        if self.root.get(TOKEN_FIELD).is_none() {
            self.add(LeafControl::new(TOKEN_FIELD));
        }
        self.token_secret = Some(secret.into());
    }

    /// Looks up a top-level control by name.
    #[must_use]
    pub fn control(&self, name: &str) -> Option<&Control> {
        self.root.get(name)
    }

    /// Looks up a top-level control by name, mutably.
    pub fn control_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.root.get_mut(name)
    }

    /// Runs the naming pass if it has not run yet.
    pub fn prepare(&mut self) {
        if self.prepared {
            return;
        }
        self.root.prepare(&PrepareWalker::new());
        self.prepared = true;
    }

    /// Returns whether the naming pass has run.
    #[must_use]
    pub const fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Processes one request's decoded submission.
    ///
    /// Runs the state machine: prepare (idempotent), handler search, load,
    /// token verification, validation. Without a submit-intent marker the
    /// outcome is the echo handler and the load and validation passes are
    /// skipped, since the form was not submitted. A validation failure
    /// forces the echo handler.
    ///
    /// # Errors
    ///
    /// - [`FormError::UnknownHandler`] when the marker names a handler the
    ///   form does not register (configuration error)
    /// - [`FormError::Path`] when a control references a branch that does
    ///   not exist (configuration error)
    /// - [`FormError::TokenMismatch`] when token verification is enabled
    ///   and the whitelisted token does not equal the session secret; the
    ///   request is rejected before validation
    pub fn process(&mut self, raw: ValueMap) -> Result<Outcome, FormError> {
        self.prepare();

        let Some(handler) = search_handler(&raw) else {
            debug!("no submit intent marker; echoing the form");
            return Ok(Outcome::not_submitted());
        };

        if !self.handlers.iter().any(|known| *known == handler) {
            return Err(FormError::UnknownHandler(handler));
        }
        debug!("loading submission for handler `{handler}`");

        let mut walker = LoadWalker::new(raw);
        self.root.load(&mut walker)?;
        let (values, changed) = walker.into_parts();

        if let Some(secret) = &self.token_secret {
            let submitted = values.get(TOKEN_FIELD).and_then(Value::as_str);
            if submitted != Some(secret.as_str()) {
                warn!("request token mismatch; rejecting the submission");
                return Err(FormError::TokenMismatch);
            }
        }

        let (valid, mark) = self.root.validate();
        let invalid = match mark {
            Some(Mark::Branch(map)) => map,
            Some(Mark::Leaf) | None => MarkMap::new(),
        };

        let handler = if valid {
            handler
        } else {
            debug!("validation failed; echoing the form");
            ECHO_HANDLER.to_string()
        };

        Ok(Outcome {
            handler,
            values,
            changed,
            invalid,
            valid,
            submitted: true,
        })
    }
}

/// Searches the raw submission for the submit-intent marker.
fn search_handler(raw: &ValueMap) -> Option<String> {
    raw.get(HANDLER_FIELD)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// What one processed request produced for the external caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    handler: String,
    values: ValueMap,
    changed: ChangedMap,
    invalid: InvalidMap,
    valid: bool,
    submitted: bool,
}

impl Outcome {
    fn not_submitted() -> Self {
        Self {
            handler: ECHO_HANDLER.to_string(),
            values: ValueMap::new(),
            changed: ChangedMap::new(),
            invalid: InvalidMap::new(),
            valid: true,
            submitted: false,
        }
    }

    /// The handler the caller should dispatch to.
    #[must_use]
    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// The whitelisted value tree.
    #[must_use]
    pub const fn values(&self) -> &ValueMap {
        &self.values
    }

    /// The sparse changed-set.
    #[must_use]
    pub const fn changed(&self) -> &ChangedMap {
        &self.changed
    }

    /// The sparse invalid-set.
    #[must_use]
    pub const fn invalid(&self) -> &InvalidMap {
        &self.invalid
    }

    /// Whether the whole tree passed validation.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether the request carried a submit-intent marker at all.
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        self.submitted
    }
}
