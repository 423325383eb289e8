//! Request-scoped context values seeded at container build time.

use crate::provider::AnyValue;

use core::fmt;
use std::sync::Arc;

use ahash::HashMap;

/// A string-keyed map of arbitrary values attached to one container.
///
/// A context is seeded when a container (usually a child, per unit of work)
/// is built and is read-only afterwards. Framework adapters put things like
/// the incoming request object here; [`ContextProvider`] and
/// [`ContextAdapter`] read them back out during resolution.
///
/// [`ContextProvider`]: crate::provider::ContextProvider
/// [`ContextAdapter`]: crate::provider::ContextAdapter
#[derive(Clone, Default)]
pub struct Context {
  entries: HashMap<String, AnyValue>,
}

impl Context {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder-style insert, for seeding a context inline at child build.
  pub fn with<T: Send + Sync + 'static>(mut self, key: impl Into<String>, value: T) -> Self {
    self.insert(key, value);
    self
  }

  pub fn insert<T: Send + Sync + 'static>(&mut self, key: impl Into<String>, value: T) {
    self.entries.insert(key.into(), Arc::new(value));
  }

  /// Inserts a value that is already reference-counted without re-wrapping it.
  pub fn insert_arc<T: Send + Sync + 'static>(&mut self, key: impl Into<String>, value: Arc<T>) {
    self.entries.insert(key.into(), value);
  }

  /// Typed lookup; `None` if the key is absent or holds a different type.
  pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Option<Arc<T>> {
    self
      .entries
      .get(key)
      .and_then(|value| value.clone().downcast::<T>().ok())
  }

  pub(crate) fn get_any(&self, key: &str) -> Option<AnyValue> {
    self.entries.get(key).cloned()
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.entries.contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl fmt::Debug for Context {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.entries.keys()).finish()
  }
}
