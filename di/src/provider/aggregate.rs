//! Aggregate providers: ordered sequences and name-keyed mappings of
//! sub-provider results.

use crate::error::DiError;
use crate::provider::{AnyValue, AssembleFn, Provider, ProviderCore, ProviderKind};
use crate::scope::Scope;

use std::collections::HashMap;
use std::sync::Arc;

fn downcast_member<T: Send + Sync + 'static>(value: AnyValue) -> Result<Arc<T>, DiError> {
  value
    .downcast::<T>()
    .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
}

/// Resolves every listed sub-provider and assembles a `Vec<Arc<T>>` in
/// declaration order. Members must not live deeper than the list itself.
pub struct List;

impl List {
  pub fn new<T: Send + Sync + 'static>(
    scope: Scope,
    items: Vec<Provider<T>>,
  ) -> Result<Provider<Vec<Arc<T>>>, DiError> {
    let mut erased = Vec::with_capacity(items.len());
    for item in &items {
      ProviderCore::check_member_scope(scope, &item.core)?;
      erased.push(item.core.clone());
    }

    let assemble: AssembleFn = Box::new(|values| {
      let mut out = Vec::with_capacity(values.len());
      for value in values {
        out.push(downcast_member::<T>(value)?);
      }
      Ok(Arc::new(out) as AnyValue)
    });

    let core = ProviderCore::new::<Vec<Arc<T>>>(
      scope,
      false,
      false,
      ProviderKind::List {
        items: erased,
        assemble,
      },
    );
    Ok(Provider::from_core(core))
  }
}

/// Resolves every keyed sub-provider and assembles a
/// `HashMap<String, Arc<T>>`. Members must not live deeper than the dict.
pub struct Dict;

impl Dict {
  pub fn new<T: Send + Sync + 'static>(
    scope: Scope,
    entries: Vec<(&str, Provider<T>)>,
  ) -> Result<Provider<HashMap<String, Arc<T>>>, DiError> {
    let mut erased = Vec::with_capacity(entries.len());
    let mut keys = Vec::with_capacity(entries.len());
    for (key, entry) in &entries {
      ProviderCore::check_member_scope(scope, &entry.core)?;
      erased.push(((*key).to_owned(), entry.core.clone()));
      keys.push((*key).to_owned());
    }

    // The engine resolves members in declaration order; keys are re-paired
    // positionally here.
    let assemble: AssembleFn = Box::new(move |values| {
      let mut out = HashMap::with_capacity(values.len());
      for (key, value) in keys.iter().zip(values) {
        out.insert(key.clone(), downcast_member::<T>(value)?);
      }
      Ok(Arc::new(out) as AnyValue)
    });

    let core = ProviderCore::new::<HashMap<String, Arc<T>>>(
      scope,
      false,
      false,
      ProviderKind::Dict {
        entries: erased,
        assemble,
      },
    );
    Ok(Provider::from_core(core))
  }
}
