//! Form submission controller for the Formwork form processor
//!
//! This crate orchestrates the request passes over a control tree: the
//! naming pass runs once, then each submission is searched for its intent
//! marker, loaded into the whitelisted value tree, checked against the
//! session's request token, and validated bottom-up. The caller receives an
//! [`Outcome`] carrying the handler to dispatch to, the whitelisted values,
//! the changed-set, and the invalid-set.

mod error;
mod form;
mod method;

pub use error::FormError;
pub use form::{ECHO_HANDLER, Form, HANDLER_FIELD, Outcome, TOKEN_FIELD};
pub use method::Method;
