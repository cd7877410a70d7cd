//! The sparse marker tree
//!
//! The changed-set and the invalid-set have the same shape: a sparse tree
//! isomorphic to the value tree in which presence carries the information.
//! A leaf mark means "this control changed" (or "failed validation"); a
//! branch mark means "at least one descendant did"; absence at any level
//! means nothing under that branch is marked.

use indexmap::IndexMap;

/// An ordered mapping from control names to marks.
pub type MarkMap = IndexMap<String, Mark>;

/// The changed-set: which controls' values differ from their preset values.
pub type ChangedMap = MarkMap;

/// The invalid-set: which controls failed at least one validator.
pub type InvalidMap = MarkMap;

/// A single node of a marker tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mark {
    /// A marked leaf control.
    Leaf,
    /// A branch with at least one marked descendant, or a compound control
    /// marked in its own right.
    Branch(MarkMap),
}

impl Mark {
    /// Returns the nested marker map, if this is a branch mark.
    #[must_use]
    pub const fn as_branch(&self) -> Option<&MarkMap> {
        match self {
            Self::Branch(map) => Some(map),
            Self::Leaf => None,
        }
    }
}
