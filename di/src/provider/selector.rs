//! Selector providers pick one of several named branches at resolution time.

use crate::context::Context;
use crate::error::DiError;
use crate::provider::{Provider, ProviderCore, ProviderKind, SelectFn};
use crate::scope::Scope;

/// Chooses among named sub-providers by evaluating a discriminator function
/// against the resolving container's context. Exactly one branch is resolved;
/// a discriminator value with no matching branch is a hard error naming the
/// unmatched key.
pub struct Selector;

impl Selector {
  pub fn new<T, F>(
    scope: Scope,
    select: F,
    branches: Vec<(&str, Provider<T>)>,
  ) -> Result<Provider<T>, DiError>
  where
    T: Send + Sync + 'static,
    F: Fn(&Context) -> String + Send + Sync + 'static,
  {
    let mut erased = Vec::with_capacity(branches.len());
    for (name, branch) in branches {
      ProviderCore::check_member_scope(scope, &branch.core)?;
      erased.push((name.to_owned(), branch.core.clone()));
    }

    let core = ProviderCore::new::<T>(
      scope,
      false,
      false,
      ProviderKind::Selector {
        select: Box::new(select) as SelectFn,
        branches: erased,
      },
    );
    Ok(Provider::from_core(core))
  }
}
