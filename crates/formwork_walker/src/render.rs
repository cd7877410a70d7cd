//! The render-context contract
//!
//! Markup emission is not this crate's concern; a renderer brings its own.
//! What the core defines is the naming scope a renderer receives per branch:
//! a module class, an optional sub-module class, and a deterministic
//! composition rule for element-specific classes. No shared mutable state
//! crosses sibling branches; nested scopes are fresh walkers.

/// CSS naming scope for one branch of the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderWalker {
    module: String,
    sub_module: Option<String>,
}

impl RenderWalker {
    /// Creates a scope for the given module class.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            sub_module: None,
        }
    }

    /// Returns a scope with a sub-module class added.
    #[must_use]
    pub fn with_sub_module(mut self, sub_module: impl Into<String>) -> Self {
        self.sub_module = Some(sub_module.into());
        self
    }

    /// Returns a fresh scope for a nested branch.
    #[must_use]
    pub fn nested(&self, module: impl Into<String>) -> Self {
        Self::new(module)
    }

    /// Composes the class list for an element of this scope.
    ///
    /// In fixed order: the module class, the sub-module class if present,
    /// and `module-subClass` when an element suffix is given.
    #[must_use]
    pub fn classes(&self, sub_class: Option<&str>) -> Vec<String> {
        let mut classes = vec![self.module.clone()];
        if let Some(sub_module) = &self.sub_module {
            classes.push(sub_module.clone());
        }
        if let Some(sub_class) = sub_class {
            classes.push(format!("{}-{sub_class}", self.module));
        }
        classes
    }
}
