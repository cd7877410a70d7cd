//! Formwork: hierarchical web-form processing
//!
//! A form is a tree of named controls declared once. On each request the
//! tree is walked three times: a prepare pass assigns every control its
//! stable hierarchical submit-key, a load pass reconciles the raw submitted
//! data into a whitelisted value tree while tracking which leaf values
//! actually changed, and a validation pass aggregates per-control failures
//! bottom-up, gating each compound's own checks on the success of its
//! descendants. Only whitelisted values ever reach application code.
//!
//! This crate is a facade over the workspace's member crates:
//!
//! - [`value`]: the recursive value tree, the sparse marker trees, and path
//!   expressions
//! - [`walker`]: the prepare, load, and render walkers
//! - [`control`]: the control tree and its capability traits
//! - [`form`]: the submission controller and its request state machine
//!
//! # Example
//!
//! ```
//! use formwork::{Form, LeafControl, Method, Value};
//!
//! let mut form = Form::new(Method::Post);
//! form.register_handler("save");
//! form.add(LeafControl::new("title").validator(|value: &Value| {
//!     if value.is_null() {
//!         Err("a title is required".to_string())
//!     } else {
//!         Ok(())
//!     }
//! }));
//!
//! let mut raw = formwork::ValueMap::new();
//! raw.insert("_handler".to_string(), Value::from("save"));
//! raw.insert("title".to_string(), Value::from("hello"));
//!
//! let outcome = form.process(raw).expect("the submission should process");
//! assert_eq!(outcome.handler(), "save");
//! assert_eq!(outcome.values().get("title"), Some(&Value::from("hello")));
//! ```

pub use formwork_control as control;
pub use formwork_form as form;
pub use formwork_value as value;
pub use formwork_walker as walker;

pub use formwork_control::{Clean, CompoundControl, Control, Format, LeafControl, Validate, ValidateGroup};
pub use formwork_form::{ECHO_HANDLER, Form, FormError, HANDLER_FIELD, Method, Outcome, TOKEN_FIELD};
pub use formwork_value::{ChangedMap, InvalidMap, Mark, MarkMap, Value, ValueMap};
pub use formwork_walker::{LoadWalker, PrepareWalker, RenderWalker, SUBMIT_SEPARATOR};
