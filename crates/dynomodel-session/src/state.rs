//! Two-state memoization cell for association targets.

/// Cached target of an association: unloaded, or loaded with a value.
///
/// A resolution pass either completes and stores its result with `insert`,
/// or leaves the cell unloaded. There is no partially-populated state.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadState<T> {
    value: Option<T>,
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::unloaded()
    }
}

impl<T> LoadState<T> {
    /// A cell that has not been resolved.
    pub const fn unloaded() -> Self {
        Self { value: None }
    }

    /// A cell holding a resolved value.
    pub const fn loaded(value: T) -> Self {
        Self { value: Some(value) }
    }

    /// True once a resolution pass has completed.
    pub const fn is_loaded(&self) -> bool {
        self.value.is_some()
    }

    /// The cached value, if loaded.
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Store a resolved value and borrow it back.
    pub fn insert(&mut self, value: T) -> &mut T {
        self.value.insert(value)
    }

    /// Drop the cached value.
    pub fn reset(&mut self) {
        self.value = None;
    }

    /// Take the cached value out, leaving the cell unloaded.
    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }
}
