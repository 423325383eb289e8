//! Providers that read the container's context instead of constructing.

use crate::context::Context;
use crate::provider::{AdaptFn, AnyValue, BoxError, Provider, ProviderCore, ProviderKind};
use crate::scope::Scope;

use std::sync::Arc;

/// Reads one key out of the context map of the container found for its scope.
///
/// A missing key is a hard error ([`DiError::MissingContext`]); there is no
/// sentinel "absent" value.
///
/// [`DiError::MissingContext`]: crate::error::DiError::MissingContext
pub struct ContextProvider;

impl ContextProvider {
  pub fn new<T: Send + Sync + 'static>(scope: Scope, key: &str) -> Provider<T> {
    let core = ProviderCore::new::<T>(
      scope,
      false,
      false,
      ProviderKind::Context { key: key.to_owned() },
    );
    Provider::from_core(core)
  }
}

/// Applies a pure transformation to the context of the container the
/// resolution started from.
pub struct ContextAdapter;

impl ContextAdapter {
  pub fn new<T, F>(scope: Scope, adapt: F) -> Provider<T>
  where
    T: Send + Sync + 'static,
    F: Fn(&Context) -> Result<T, BoxError> + Send + Sync + 'static,
  {
    let adapt: AdaptFn =
      Box::new(move |context| adapt(context).map(|value| Arc::new(value) as AnyValue));
    let core = ProviderCore::new::<T>(scope, false, false, ProviderKind::ContextAdapter { adapt });
    Provider::from_core(core)
  }
}
