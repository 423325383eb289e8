//! Provider registration and the family-shared overrides registry.

use crate::error::DiError;
use crate::provider::{AnyValue, Provider, ProviderCore, ProviderId};

use core::fmt;
use std::any::TypeId;
use std::sync::Arc;

use ahash::{HashMap, HashMapExt};
use dashmap::DashMap;

/// An explicit, build-time collection of named providers.
///
/// Groups are assembled by plain registration calls at startup and handed to
/// [`ContainerBuilder::group`](crate::container::ContainerBuilder::group).
/// Every registration is indexed by name and by the provider's bound type
/// (optionally refined by a qualifier); a duplicate on either axis is a hard
/// error, never a silent overwrite.
#[derive(Default)]
pub struct ProviderGroup {
  pub(crate) by_name: HashMap<String, Arc<ProviderCore>>,
  pub(crate) by_type: HashMap<(TypeId, Option<String>), Arc<ProviderCore>>,
  pub(crate) all: Vec<Arc<ProviderCore>>,
}

impl ProviderGroup {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers a provider under `name` and under its bound type.
  pub fn register<T>(&mut self, name: &str, provider: &Provider<T>) -> Result<(), DiError> {
    self.insert(name, None, &provider.core)
  }

  /// Registers a provider under `name` and under (bound type, qualifier),
  /// letting several providers of the same type coexist.
  pub fn register_qualified<T>(
    &mut self,
    name: &str,
    qualifier: &str,
    provider: &Provider<T>,
  ) -> Result<(), DiError> {
    self.insert(name, Some(qualifier.to_owned()), &provider.core)
  }

  fn insert(
    &mut self,
    name: &str,
    qualifier: Option<String>,
    core: &Arc<ProviderCore>,
  ) -> Result<(), DiError> {
    if self.by_name.contains_key(name) {
      return Err(DiError::DuplicateProviderName(name.to_owned()));
    }
    let type_key = (core.bound, qualifier);
    if self.by_type.contains_key(&type_key) {
      return Err(DiError::DuplicateProviderType(core.type_name));
    }

    self.by_name.insert(name.to_owned(), core.clone());
    self.by_type.insert(type_key, core.clone());
    self.all.push(core.clone());
    Ok(())
  }

  pub fn len(&self) -> usize {
    self.all.len()
  }

  pub fn is_empty(&self) -> bool {
    self.all.is_empty()
  }
}

impl fmt::Debug for ProviderGroup {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.by_name.keys()).finish()
  }
}

/// Immutable-after-build lookup tables shared by a container family.
pub(crate) struct ProvidersRegistry {
  by_name: HashMap<String, Arc<ProviderCore>>,
  by_type: HashMap<(TypeId, Option<String>), Arc<ProviderCore>>,
  all: Vec<Arc<ProviderCore>>,
}

impl ProvidersRegistry {
  pub(crate) fn from_groups(groups: Vec<ProviderGroup>) -> Result<Self, DiError> {
    let mut by_name = HashMap::new();
    let mut by_type = HashMap::new();
    let mut all = Vec::new();

    for group in groups {
      for (name, core) in group.by_name {
        if by_name.contains_key(&name) {
          return Err(DiError::DuplicateProviderName(name));
        }
        by_name.insert(name, core);
      }
      for (key, core) in group.by_type {
        if by_type.contains_key(&key) {
          return Err(DiError::DuplicateProviderType(core.type_name));
        }
        by_type.insert(key, core);
      }
      all.extend(group.all);
    }

    Ok(Self {
      by_name,
      by_type,
      all,
    })
  }

  pub(crate) fn find_by_name(&self, name: &str) -> Option<&Arc<ProviderCore>> {
    self.by_name.get(name)
  }

  pub(crate) fn find_by_type(
    &self,
    bound: TypeId,
    qualifier: Option<&str>,
  ) -> Option<&Arc<ProviderCore>> {
    self
      .by_type
      .get(&(bound, qualifier.map(str::to_owned)))
  }

  pub(crate) fn iter(&self) -> impl Iterator<Item = &Arc<ProviderCore>> {
    self.all.iter()
  }
}

/// Test-double substitutions keyed by provider identity.
///
/// One registry is owned by the root container and shared by reference with
/// every descendant, so an override set anywhere in the family is visible
/// everywhere immediately. The registry is cleared when the root closes.
#[derive(Default)]
pub(crate) struct OverridesRegistry {
  entries: DashMap<ProviderId, AnyValue>,
}

impl OverridesRegistry {
  pub(crate) fn set(&self, id: ProviderId, value: AnyValue) {
    self.entries.insert(id, value);
  }

  pub(crate) fn remove(&self, id: ProviderId) {
    self.entries.remove(&id);
  }

  pub(crate) fn clear(&self) {
    self.entries.clear();
  }

  pub(crate) fn fetch(&self, id: ProviderId) -> Option<AnyValue> {
    self.entries.get(&id).map(|entry| entry.value().clone())
  }
}
