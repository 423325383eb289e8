//! A sentinel provider that resolves to the container itself.

use crate::container::Container;
use crate::provider::{Provider, ProviderCore, ProviderKind};
use crate::scope::Scope;

/// Resolves to the `Arc<Container>` found for its scope, giving a dependency
/// direct access to the DI runtime. Resolution bypasses both the overrides
/// registry and the provider-state cache.
pub struct ContainerProvider;

impl ContainerProvider {
  pub fn new(scope: Scope) -> Provider<Container> {
    let core = ProviderCore::new::<Container>(scope, false, false, ProviderKind::Container);
    Provider::from_core(core)
  }
}
