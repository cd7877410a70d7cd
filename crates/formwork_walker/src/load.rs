//! The submission-reconciliation pass
//!
//! The load walker descends the control tree alongside the raw submitted
//! data, handing each branch its slice of the input and accumulating two
//! outputs: the whitelisted value tree (only values for declared controls
//! ever enter it) and the sparse changed-set.
//!
//! The walker is an explicit frame stack. Each descent into a named branch
//! pushes a frame holding that branch's raw slice and fresh accumulators;
//! each ascent pops the frame and merges its accumulators into the parent
//! under the branch name. An empty changed sub-map is dropped on ascent
//! rather than merged, which is what keeps the changed tree sparse.
//!
//! Because traversal is sequential depth-first, exactly one frame is
//! writable at any time, and the open frames are precisely the ancestors of
//! the node currently loading. Path resolution exploits that: an absolute
//! (or parent-relative) lookup walks the finished part of the whitelist
//! tree, and where a branch is still open it continues through the live
//! frame chain instead. A control therefore observes the final value of any
//! sibling processed earlier in declaration order and of any completed
//! branch anywhere in the tree; reading a sibling that has not loaded yet is
//! a configuration constraint on tree layout, not detected at runtime.

use formwork_value::path::{self, PathError, PathExpr, Segment};
use formwork_value::{ChangedMap, Mark, MarkMap, Value, ValueMap};

use crate::prepare::SUBMIT_SEPARATOR;

/// One open branch of the traversal.
#[derive(Debug, Clone, PartialEq)]
struct Frame {
    name: String,
    raw: ValueMap,
    whitelist: ValueMap,
    changed: MarkMap,
}

impl Frame {
    fn new(name: String, raw: ValueMap) -> Self {
        Self {
            name,
            raw,
            whitelist: ValueMap::new(),
            changed: MarkMap::new(),
        }
    }
}

/// Reconciliation context for one load pass.
///
/// Created per request from the decoded submission, driven by the control
/// tree, and consumed with [`LoadWalker::into_parts`] once the tree has
/// fully ascended.
#[derive(Debug)]
pub struct LoadWalker {
    frames: Vec<Frame>,
}

impl LoadWalker {
    /// Creates a walker for one request from the decoded raw submission.
    #[must_use]
    pub fn new(raw: ValueMap) -> Self {
        Self {
            frames: vec![Frame::new(String::new(), raw)],
        }
    }

    fn top(&self) -> &Frame {
        self.frames
            .last()
            .expect("walker should always hold the root frame")
    }

    fn top_mut(&mut self) -> &mut Frame {
        self.frames
            .last_mut()
            .expect("walker should always hold the root frame")
    }

    /// Opens the branch for the control named `name`.
    ///
    /// An empty `name` is a transparent grouping node: it contributes no
    /// addressing scope and the call is a no-op. Otherwise the branch's raw
    /// slice is taken from the current frame under the submit-key's trailing
    /// segment; absent or malformed input normalizes to an empty map, since
    /// missing data means "nothing submitted for this branch", never an
    /// error.
    pub fn descend(&mut self, name: &str, submit_key: &str) {
        if name.is_empty() {
            return;
        }

        let raw = match self.top().raw.get(raw_key(submit_key)) {
            Some(value) => value.clone().into_branch(),
            None => ValueMap::new(),
        };

        self.frames.push(Frame::new(name.to_string(), raw));
    }

    /// Closes the branch named `name` after all its children have loaded.
    ///
    /// Merges the branch's whitelist into the parent under `name` and does
    /// the same for its changed-set unless that is empty, in which case the
    /// entry is dropped entirely: "nothing changed here" is represented by
    /// absence, never by an empty marker. Returns the branch's final
    /// whitelisted sub-map, or the whole whitelist when `name` is empty.
    ///
    /// # Panics
    ///
    /// Panics if `name` does not match the innermost open branch.
    pub fn ascend(&mut self, name: &str) -> ValueMap {
        if name.is_empty() {
            return self.top().whitelist.clone();
        }

        let frame = self
            .frames
            .pop()
            .expect("walker should always hold the root frame");
        assert_eq!(
            frame.name, name,
            "ascend should close the innermost open branch"
        );

        let parent = self.top_mut();
        if !frame.changed.is_empty() {
            parent
                .changed
                .insert(frame.name.clone(), Mark::Branch(frame.changed));
        }
        parent
            .whitelist
            .insert(frame.name, Value::Map(frame.whitelist.clone()));

        frame.whitelist
    }

    /// Applies a transform to the entire current-branch raw map.
    ///
    /// Used where raw submitted keys must be recombined or split into the
    /// keys the child controls expect. Must run before the first
    /// submitted-value read at this level; a compound control applies its
    /// cleaner immediately after descending.
    pub fn clean(&mut self, transform: impl FnOnce(ValueMap) -> ValueMap) {
        let top = self.top_mut();
        let raw = std::mem::take(&mut top.raw);
        top.raw = transform(raw);
    }

    /// Returns the raw submitted value for a leaf control, if any.
    pub fn submitted_value(&self, submit_key: &str) -> Option<&Value> {
        self.top().raw.get(raw_key(submit_key))
    }

    /// Returns the entire raw map of the current branch.
    ///
    /// For controls whose value is not a single scalar at a single key.
    #[must_use]
    pub fn submitted_values(&self) -> &ValueMap {
        &self.top().raw
    }

    /// Writes a control's reconciled, trusted value into the whitelist.
    pub fn set_whitelist_value(&mut self, name: &str, value: Value) {
        self.top_mut().whitelist.insert(name.to_string(), value);
    }

    /// Rereads a whitelisted value at the current level.
    pub fn whitelist_value(&self, name: &str) -> Option<&Value> {
        self.top().whitelist.get(name)
    }

    /// Marks the leaf control named `name` as changed.
    ///
    /// Compound aggregation is automatic: branch marks are built from leaf
    /// marks when their frames ascend.
    pub fn set_changed(&mut self, name: &str) {
        self.top_mut().changed.insert(name.to_string(), Mark::Leaf);
    }

    /// Returns the absolute path of the current node, rooted at `/`.
    #[must_use]
    pub fn path(&self) -> String {
        self.frame_path(self.frames.len() - 1)
    }

    /// Returns the root whitelist map.
    #[must_use]
    pub fn root_whitelist_values(&self) -> &ValueMap {
        &self.frames[0].whitelist
    }

    /// Resolves a path expression against the already-loaded whitelist tree.
    ///
    /// Anchoring and parent segments move along the open frame chain; named
    /// segments prefer the finished whitelist entries of a frame and fall
    /// through to the next open frame when the name matches the branch
    /// currently loading. Once resolution leaves the frame chain it descends
    /// plain value maps.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] naming the missing branch and the path
    /// traversed so far when any segment fails to resolve, including a
    /// parent segment above the root. This is a configuration error: the
    /// referenced branch does not exist in the form.
    pub fn whitelist_value_by_path(&self, expression: &str) -> Result<Value, PathError> {
        let expr = PathExpr::parse(expression);
        let mut frame_idx = if expr.is_absolute() {
            0
        } else {
            self.frames.len() - 1
        };

        let segments = expr.segments();
        let mut i = 0;
        while i < segments.len() {
            match &segments[i] {
                Segment::Current => {}
                Segment::Parent => {
                    if frame_idx == 0 {
                        return Err(PathError::new(
                            "..".to_string(),
                            self.frame_path(frame_idx),
                        ));
                    }
                    frame_idx -= 1;
                }
                Segment::Name(name) => {
                    if let Some(value) = self.frames[frame_idx].whitelist.get(name) {
                        let traversed = path::join(&self.frame_path(frame_idx), name);
                        return path::resolve(value, &segments[i + 1..], &traversed)
                            .map(Value::clone);
                    }

                    if frame_idx + 1 < self.frames.len()
                        && self.frames[frame_idx + 1].name == *name
                    {
                        frame_idx += 1;
                    } else {
                        return Err(PathError::new(
                            name.clone(),
                            self.frame_path(frame_idx),
                        ));
                    }
                }
            }
            i += 1;
        }

        Ok(Value::Map(self.frames[frame_idx].whitelist.clone()))
    }

    /// Consumes the walker after the pass, yielding the assembled outputs.
    ///
    /// # Panics
    ///
    /// Panics if branches are still open, i.e. the tree did not ascend back
    /// to the root.
    #[must_use]
    pub fn into_parts(self) -> (ValueMap, ChangedMap) {
        assert_eq!(
            self.frames.len(),
            1,
            "load should have ascended back to the root frame"
        );

        let root = self
            .frames
            .into_iter()
            .next()
            .expect("walker should always hold the root frame");
        (root.whitelist, root.changed)
    }

    fn frame_path(&self, idx: usize) -> String {
        let mut out = String::from("/");
        for frame in &self.frames[1..=idx] {
            if !out.ends_with('/') {
                out.push('/');
            }
            out.push_str(&frame.name);
        }
        out
    }
}

/// The key a submit-key addresses within its branch's raw slice.
///
/// Raw submissions are nested maps keyed by name segments (the shape a
/// transport layer produces when decoding hierarchical field names), so only
/// the trailing segment of a submit-key is looked up at each level.
fn raw_key(submit_key: &str) -> &str {
    match submit_key.rfind(SUBMIT_SEPARATOR) {
        Some(idx) => &submit_key[idx + 1..],
        None => submit_key,
    }
}
