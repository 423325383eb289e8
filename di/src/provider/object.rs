//! Object providers wrap a pre-built value.

use crate::provider::{AnyValue, Provider, ProviderCore, ProviderKind};
use crate::scope::Scope;

use std::sync::Arc;

/// The cheapest provider: resolution returns the wrapped value unchanged,
/// the same `Arc` every time. Still overridable like any other provider.
pub struct Object;

impl Object {
  pub fn new<T: Send + Sync + 'static>(scope: Scope, value: T) -> Provider<T> {
    let core = ProviderCore::new::<T>(
      scope,
      false,
      false,
      ProviderKind::Object {
        value: Arc::new(value) as AnyValue,
      },
    );
    Provider::from_core(core)
  }
}
