//! The control tree of the Formwork form processor
//!
//! A form is a tree of named controls declared once and traversed on every
//! request. [`LeafControl`] holds a single value; [`CompoundControl`] holds
//! an ordered sequence of children, and that order is significant: it is
//! both rendering order and processing order, so a later sibling may depend
//! on an earlier sibling's already-loaded value.
//!
//! The tree owns no pass logic beyond driving the walkers and aggregating
//! children's results. Extension points are capability traits with
//! closure-backed adapters: [`Validate`] and [`ValidateGroup`] for the
//! validation pass, [`Clean`] for reshaping a branch's raw input, and
//! [`Format`] for whitelisting/normalizing a leaf's submitted value.

mod compound;
mod control;
mod leaf;
mod traits;

pub use compound::CompoundControl;
pub use control::Control;
pub use leaf::LeafControl;
pub use traits::{Clean, Format, Validate, ValidateGroup};

#[cfg(test)]
mod tests;
