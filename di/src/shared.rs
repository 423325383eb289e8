//! State shared by reference across one container family.

use crate::registry::{OverridesRegistry, ProvidersRegistry};
use crate::scope::Scope;

/// Owned by the root container, handed down to every descendant.
///
/// Registries are read-mostly after build; the overrides map is the only
/// part mutated at runtime. Per-container provider states never live here.
pub(crate) struct ContainerShared {
  pub(crate) scopes: &'static [Scope],
  pub(crate) providers: ProvidersRegistry,
  pub(crate) overrides: OverridesRegistry,
  pub(crate) use_locks: bool,
}
