//! The container: one scope's resolution environment.

use crate::context::Context;
use crate::error::DiError;
use crate::provider::{
  AnyValue, Arg, Provider, ProviderCore, ProviderId, ProviderKind, ResolvedArgs,
};
use crate::registry::{OverridesRegistry, ProviderGroup, ProvidersRegistry};
use crate::scope::{Scope, DEFAULT_SCOPES};
use crate::shared::ContainerShared;
use crate::state::{ProviderState, Teardown};

use core::fmt;
use std::any::TypeId;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use futures_core::future::BoxFuture;
use parking_lot::Mutex;

const MODE_UNENTERED: u8 = 0;
const MODE_SYNC: u8 = 1;
const MODE_ASYNC: u8 = 2;
const MODE_CLOSED: u8 = 3;

/// Configuration for a root container.
///
/// Obtained from [`Container::builder`]. The defaults give a root at the
/// first scope of [`DEFAULT_SCOPES`] with an empty context, no registered
/// providers and threading locks enabled.
pub struct ContainerBuilder {
  scopes: &'static [Scope],
  scope: Option<Scope>,
  context: Context,
  groups: Vec<ProviderGroup>,
  use_locks: bool,
}

impl ContainerBuilder {
  fn new() -> Self {
    Self {
      scopes: DEFAULT_SCOPES,
      scope: None,
      context: Context::new(),
      groups: Vec::new(),
      use_locks: true,
    }
  }

  /// Replaces the scope set the container family will use.
  pub fn scopes(mut self, scopes: &'static [Scope]) -> Self {
    self.scopes = scopes;
    self
  }

  /// Sets the root's own scope; defaults to the first scope of the set.
  pub fn scope(mut self, scope: Scope) -> Self {
    self.scope = Some(scope);
    self
  }

  pub fn context(mut self, context: Context) -> Self {
    self.context = context;
    self
  }

  /// Adds a group of registered providers for type- and name-based lookup.
  /// May be called repeatedly; duplicates across groups fail `build`.
  pub fn group(mut self, group: ProviderGroup) -> Self {
    self.groups.push(group);
    self
  }

  /// Skips creating per-provider threading locks. Only safe when every
  /// container of the family is driven from a single thread.
  pub fn without_locks(mut self) -> Self {
    self.use_locks = false;
    self
  }

  pub fn build(self) -> Result<Arc<Container>, DiError> {
    if self.scopes.is_empty() {
      return Err(DiError::InvalidScopeSet);
    }
    for pair in self.scopes.windows(2) {
      if pair[0] >= pair[1] {
        return Err(DiError::InvalidScopeSet);
      }
    }

    let scope = self.scope.unwrap_or(self.scopes[0]);
    if !self.scopes.contains(&scope) {
      return Err(DiError::UnknownScope(scope));
    }

    let providers = ProvidersRegistry::from_groups(self.groups)?;
    let shared = Arc::new(ContainerShared {
      scopes: self.scopes,
      providers,
      overrides: OverridesRegistry::default(),
      use_locks: self.use_locks,
    });

    Ok(Arc::new_cyclic(|weak| Container {
      scope,
      parent: None,
      context: self.context,
      shared,
      mode: AtomicU8::new(MODE_UNENTERED),
      states: DashMap::new(),
      state_order: Mutex::new(Vec::new()),
      self_ref: weak.clone(),
    }))
  }
}

/// A runtime instance of one scope's resolution environment.
///
/// A container is a small state machine, `Unentered -> Entered -> Closed`,
/// with the entered state fixed to either blocking (sync) or cooperative
/// (async) operation. It owns a private provider-state cache, an immutable
/// context map and a reference to the registries shared with the rest of its
/// family; children are built per unit of work and closed innermost-first.
///
/// Containers are handled through `Arc` and expose no clone operation of
/// their own: identity is what keys the caches, so there is never a second
/// container "equal" to this one.
pub struct Container {
  scope: Scope,
  parent: Option<Arc<Container>>,
  context: Context,
  shared: Arc<ContainerShared>,
  mode: AtomicU8,
  states: DashMap<ProviderId, Arc<ProviderState>>,
  state_order: Mutex<Vec<ProviderId>>,
  self_ref: Weak<Container>,
}

fn store_instance(state: &ProviderState, value: AnyValue) -> AnyValue {
  match state.instance.set(value.clone()) {
    Ok(()) => value,
    // lost a cross-path race; the stored winner is the instance of record
    Err(_) => state.instance.get().cloned().unwrap_or(value),
  }
}

fn downcast_resolved<T: Send + Sync + 'static>(value: AnyValue) -> Result<Arc<T>, DiError> {
  value
    .downcast::<T>()
    .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
}

impl Container {
  pub fn builder() -> ContainerBuilder {
    ContainerBuilder::new()
  }

  pub fn scope(&self) -> Scope {
    self.scope
  }

  pub fn context(&self) -> &Context {
    &self.context
  }

  pub fn parent(&self) -> Option<&Arc<Container>> {
    self.parent.as_ref()
  }

  pub fn is_entered(&self) -> bool {
    matches!(self.current_mode(), MODE_SYNC | MODE_ASYNC)
  }

  pub fn is_closed(&self) -> bool {
    self.current_mode() == MODE_CLOSED
  }

  /// Whether the container was entered for cooperative operation.
  pub fn is_async_mode(&self) -> bool {
    self.current_mode() == MODE_ASYNC
  }

  // --- lifecycle ---

  /// Activates the container for blocking operation.
  pub fn sync_enter(&self) -> Result<(), DiError> {
    self.enter(MODE_SYNC)
  }

  /// Activates the container for cooperative operation.
  pub async fn async_enter(&self) -> Result<(), DiError> {
    self.enter(MODE_ASYNC)
  }

  fn enter(&self, mode: u8) -> Result<(), DiError> {
    match self.mode.compare_exchange(
      MODE_UNENTERED,
      mode,
      Ordering::AcqRel,
      Ordering::Acquire,
    ) {
      Ok(_) => {
        tracing::debug!(
          scope = %self.scope,
          is_async = (mode == MODE_ASYNC),
          "container entered"
        );
        Ok(())
      }
      Err(MODE_CLOSED) => Err(DiError::AlreadyClosed(self.scope)),
      Err(_) => Err(DiError::AlreadyEntered(self.scope)),
    }
  }

  fn current_mode(&self) -> u8 {
    self.mode.load(Ordering::Acquire)
  }

  fn check_entered(&self) -> Result<u8, DiError> {
    match self.current_mode() {
      MODE_UNENTERED => Err(DiError::NotEntered(self.scope)),
      MODE_CLOSED => Err(DiError::AlreadyClosed(self.scope)),
      mode => Ok(mode),
    }
  }

  fn self_arc(&self) -> Arc<Container> {
    self
      .self_ref
      .upgrade()
      .expect("container is always owned by an Arc")
  }

  /// Builds a child at the next consecutive scope of the set.
  pub fn build_child_container(&self, context: Context) -> Result<Arc<Container>, DiError> {
    self.check_entered()?;
    let scope = self.next_scope()?;
    Ok(self.build_child(scope, context))
  }

  /// Builds a child at an explicit deeper scope, possibly skipping levels.
  /// Providers bound to a skipped level cannot be resolved from the child.
  pub fn build_child_container_with_scope(
    &self,
    scope: Scope,
    context: Context,
  ) -> Result<Arc<Container>, DiError> {
    self.check_entered()?;
    if !self.shared.scopes.contains(&scope) {
      return Err(DiError::UnknownScope(scope));
    }
    if scope <= self.scope {
      return Err(DiError::ChildScopeNotDeeper {
        parent: self.scope,
        child: scope,
      });
    }
    Ok(self.build_child(scope, context))
  }

  fn next_scope(&self) -> Result<Scope, DiError> {
    let index = self
      .shared
      .scopes
      .iter()
      .position(|scope| *scope == self.scope)
      .ok_or(DiError::UnknownScope(self.scope))?;
    self
      .shared
      .scopes
      .get(index + 1)
      .copied()
      .ok_or(DiError::MaxScopeReached(self.scope))
  }

  fn build_child(&self, scope: Scope, context: Context) -> Arc<Container> {
    tracing::debug!(parent = %self.scope, child = %scope, "building child container");
    let parent = self.self_arc();
    let shared = self.shared.clone();
    Arc::new_cyclic(|weak| Container {
      scope,
      parent: Some(parent),
      context,
      shared,
      mode: AtomicU8::new(MODE_UNENTERED),
      states: DashMap::new(),
      state_order: Mutex::new(Vec::new()),
      self_ref: weak.clone(),
    })
  }

  /// Closes through the blocking path: runs the release half of every own
  /// provider state in reverse creation order, then goes inert. A resource
  /// acquired asynchronously makes this fail with
  /// [`DiError::SyncTeardownOfAsyncResource`].
  pub fn sync_close(&self) -> Result<(), DiError> {
    self.begin_close()?;
    let order = std::mem::take(&mut *self.state_order.lock());
    for id in order.iter().rev() {
      if let Some((_, state)) = self.states.remove(id) {
        state.sync_tear_down()?;
      }
    }
    self.finish_close();
    Ok(())
  }

  /// Closes through the cooperative path; handles both release flavors.
  pub async fn async_close(&self) -> Result<(), DiError> {
    self.begin_close()?;
    let order = std::mem::take(&mut *self.state_order.lock());
    for id in order.iter().rev() {
      if let Some((_, state)) = self.states.remove(id) {
        state.async_tear_down().await;
      }
    }
    self.finish_close();
    Ok(())
  }

  fn begin_close(&self) -> Result<(), DiError> {
    loop {
      match self.current_mode() {
        MODE_UNENTERED => return Err(DiError::NotEntered(self.scope)),
        MODE_CLOSED => return Err(DiError::AlreadyClosed(self.scope)),
        mode => {
          if self
            .mode
            .compare_exchange(mode, MODE_CLOSED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
          {
            return Ok(());
          }
        }
      }
    }
  }

  fn finish_close(&self) {
    self.states.clear();
    if self.parent.is_none() {
      self.shared.overrides.clear();
    }
    tracing::debug!(scope = %self.scope, "container closed");
  }

  // --- overrides ---

  /// Substitutes every future resolution of `provider`, across the whole
  /// family, with `value`. Effective immediately; independent of entry state.
  pub fn override_provider<T: Send + Sync + 'static>(&self, provider: &Provider<T>, value: T) {
    self
      .shared
      .overrides
      .set(provider.core.id, Arc::new(value) as AnyValue);
  }

  /// Removes the substitute for one provider; normal resolution resumes.
  pub fn reset_override<T>(&self, provider: &Provider<T>) {
    self.shared.overrides.remove(provider.core.id);
  }

  pub fn reset_all_overrides(&self) {
    self.shared.overrides.clear();
  }

  // --- resolution ---

  /// Resolves a provider through the blocking path.
  pub fn sync_resolve_provider<T: Send + Sync + 'static>(
    &self,
    provider: &Provider<T>,
  ) -> Result<Arc<T>, DiError> {
    downcast_resolved(self.resolve_any_sync(&provider.core)?)
  }

  /// Resolves a provider through the cooperative path.
  pub async fn async_resolve_provider<T: Send + Sync + 'static>(
    &self,
    provider: &Provider<T>,
  ) -> Result<Arc<T>, DiError> {
    downcast_resolved(self.resolve_any_async(&provider.core).await?)
  }

  /// Resolves the provider registered for `T`.
  pub fn sync_resolve<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, DiError> {
    let core = self.lookup_type::<T>(None)?;
    downcast_resolved(self.resolve_any_sync(&core)?)
  }

  pub async fn async_resolve<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, DiError> {
    let core = self.lookup_type::<T>(None)?;
    downcast_resolved(self.resolve_any_async(&core).await?)
  }

  /// Resolves the provider registered for `(T, qualifier)`.
  pub fn sync_resolve_qualified<T: Send + Sync + 'static>(
    &self,
    qualifier: &str,
  ) -> Result<Arc<T>, DiError> {
    let core = self.lookup_type::<T>(Some(qualifier))?;
    downcast_resolved(self.resolve_any_sync(&core)?)
  }

  pub async fn async_resolve_qualified<T: Send + Sync + 'static>(
    &self,
    qualifier: &str,
  ) -> Result<Arc<T>, DiError> {
    let core = self.lookup_type::<T>(Some(qualifier))?;
    downcast_resolved(self.resolve_any_async(&core).await?)
  }

  /// Resolves the provider registered under `name`.
  pub fn sync_resolve_named<T: Send + Sync + 'static>(
    &self,
    name: &str,
  ) -> Result<Arc<T>, DiError> {
    let core = self.lookup_name(name)?;
    downcast_resolved(self.resolve_any_sync(&core)?)
  }

  pub async fn async_resolve_named<T: Send + Sync + 'static>(
    &self,
    name: &str,
  ) -> Result<Arc<T>, DiError> {
    let core = self.lookup_name(name)?;
    downcast_resolved(self.resolve_any_async(&core).await?)
  }

  /// Eagerly resolves every registered stateful provider bound to exactly
  /// this container's scope, so first requests do not pay construction cost.
  pub fn sync_prewarm(&self) -> Result<(), DiError> {
    self.check_entered()?;
    let cores: Vec<_> = self
      .shared
      .providers
      .iter()
      .filter(|core| core.has_state && core.scope == self.scope && !core.is_async)
      .cloned()
      .collect();
    for core in &cores {
      self.resolve_any_sync(core)?;
    }
    Ok(())
  }

  /// The cooperative flavor of [`sync_prewarm`](Container::sync_prewarm);
  /// also covers async-backed providers.
  pub async fn async_prewarm(&self) -> Result<(), DiError> {
    self.check_entered()?;
    let cores: Vec<_> = self
      .shared
      .providers
      .iter()
      .filter(|core| core.has_state && core.scope == self.scope)
      .cloned()
      .collect();
    for core in &cores {
      self.resolve_any_async(core).await?;
    }
    Ok(())
  }

  fn lookup_type<T: 'static>(&self, qualifier: Option<&str>) -> Result<Arc<ProviderCore>, DiError> {
    self
      .shared
      .providers
      .find_by_type(TypeId::of::<T>(), qualifier)
      .cloned()
      .ok_or_else(|| DiError::MissingProvider(std::any::type_name::<T>().to_owned()))
  }

  fn lookup_name(&self, name: &str) -> Result<Arc<ProviderCore>, DiError> {
    self
      .shared
      .providers
      .find_by_name(name)
      .cloned()
      .ok_or_else(|| DiError::MissingProvider(name.to_owned()))
  }

  /// Walks up the parent chain to the container owning `scope`.
  fn find_container(&self, scope: Scope) -> Result<Arc<Container>, DiError> {
    if self.scope < scope {
      return Err(DiError::ScopeNotInitialized {
        provider_scope: scope,
        container_scope: self.scope,
      });
    }
    if self.scope == scope {
      return Ok(self.self_arc());
    }

    let mut current = match &self.parent {
      Some(parent) => parent,
      None => return Err(DiError::ScopeSkipped(scope)),
    };
    while current.scope > scope {
      match &current.parent {
        Some(parent) => current = parent,
        None => break,
      }
    }
    if current.scope != scope {
      return Err(DiError::ScopeSkipped(scope));
    }
    Ok(current.clone())
  }

  /// Fetch-or-create of the cache entry for a stateful provider; atomic per
  /// provider, with creation order recorded for LIFO teardown.
  fn fetch_provider_state(&self, core: &ProviderCore) -> Arc<ProviderState> {
    if let Some(state) = self.states.get(&core.id) {
      return Arc::clone(&state);
    }

    let mut created = false;
    let entry = self.states.entry(core.id).or_insert_with(|| {
      created = true;
      Arc::new(ProviderState::new(
        self.current_mode() == MODE_ASYNC,
        self.shared.use_locks,
      ))
    });
    let state = entry.value().clone();
    drop(entry);

    if created {
      self.state_order.lock().push(core.id);
    }
    state
  }

  fn resolve_any_sync(&self, core: &Arc<ProviderCore>) -> Result<AnyValue, DiError> {
    self.check_entered()?;
    if core.is_async {
      return Err(DiError::SyncResolutionOfAsyncProvider);
    }

    let found = self.find_container(core.scope)?;
    if matches!(core.kind, ProviderKind::Container) {
      let value: AnyValue = found;
      return Ok(value);
    }

    if let Some(value) = self.shared.overrides.fetch(core.id) {
      return Ok(value);
    }

    if !core.has_state {
      return self.construct_sync(&found, core, None);
    }

    let state = found.fetch_provider_state(core);
    if let Some(value) = state.instance.get() {
      return Ok(value.clone());
    }

    // Slow path: lock, re-check (another resolver may have finished while we
    // waited), construct. The guard is released on every exit, producer
    // errors included.
    let _guard = state.sync_lock.as_ref().map(|lock| lock.lock());
    if let Some(value) = state.instance.get() {
      return Ok(value.clone());
    }

    tracing::trace!(
      provider = core.id,
      kind = core.kind.name(),
      scope = %core.scope,
      "constructing provider instance"
    );
    self.construct_sync(&found, core, Some(&state))
  }

  fn construct_sync(
    &self,
    found: &Arc<Container>,
    core: &Arc<ProviderCore>,
    state: Option<&Arc<ProviderState>>,
  ) -> Result<AnyValue, DiError> {
    match &core.kind {
      ProviderKind::Factory { args, producer, .. } => {
        let resolved = self.resolve_args_sync(args)?;
        let value = producer(resolved).map_err(DiError::Producer)?;
        Ok(match state {
          Some(state) => store_instance(state, value),
          None => value,
        })
      }
      ProviderKind::Resource { args, acquire } => {
        let resolved = self.resolve_args_sync(args)?;
        let (value, release) = acquire(resolved).map_err(DiError::Producer)?;
        match state {
          Some(state) => match state.instance.set(value.clone()) {
            Ok(()) => {
              state.set_teardown(Teardown::Sync(release));
              Ok(value)
            }
            Err(_) => {
              // lost a cross-path race; drop our extra acquisition now
              release();
              Ok(state.instance.get().cloned().unwrap_or(value))
            }
          },
          None => Ok(value),
        }
      }
      ProviderKind::Object { value } => Ok(value.clone()),
      ProviderKind::Context { key } => found
        .context
        .get_any(key)
        .ok_or_else(|| DiError::MissingContext(key.clone())),
      ProviderKind::ContextAdapter { adapt } => {
        adapt(&self.context).map_err(DiError::Producer)
      }
      ProviderKind::Selector { select, branches } => {
        let key = select(&self.context);
        match branches.iter().find(|(name, _)| *name == key) {
          Some((_, branch)) => self.resolve_any_sync(branch),
          None => Err(DiError::NoSelectorMatch(key)),
        }
      }
      ProviderKind::List { items, assemble } => {
        let mut values = Vec::with_capacity(items.len());
        for item in items {
          values.push(self.resolve_any_sync(item)?);
        }
        assemble(values)
      }
      ProviderKind::Dict { entries, assemble } => {
        let mut values = Vec::with_capacity(entries.len());
        for (_, entry) in entries {
          values.push(self.resolve_any_sync(entry)?);
        }
        assemble(values)
      }
      ProviderKind::AttrGetter { base, step } => {
        let value = self.resolve_any_sync(base)?;
        (step.get)(&value)
      }
      ProviderKind::Container => {
        let value: AnyValue = found.clone();
        Ok(value)
      }
      ProviderKind::AsyncFactory { .. } | ProviderKind::AsyncResource { .. } => {
        Err(DiError::SyncResolutionOfAsyncProvider)
      }
    }
  }

  fn resolve_args_sync(&self, args: &[Arg]) -> Result<ResolvedArgs, DiError> {
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
      values.push(match arg {
        Arg::Provider(core) => self.resolve_any_sync(core)?,
        Arg::Value(value) => value.clone(),
      });
    }
    Ok(ResolvedArgs { values })
  }

  fn resolve_any_async<'a>(
    &'a self,
    core: &'a Arc<ProviderCore>,
  ) -> BoxFuture<'a, Result<AnyValue, DiError>> {
    Box::pin(async move {
      let mode = self.check_entered()?;
      if core.is_async && mode != MODE_ASYNC {
        return Err(DiError::AsyncResolutionForbidden);
      }
      if mode != MODE_ASYNC {
        // A sync-entered container has no async providers to reach and no
        // async locks to wait on; the blocking engine covers it fully.
        return self.resolve_any_sync(core);
      }

      let found = self.find_container(core.scope)?;
      if matches!(core.kind, ProviderKind::Container) {
        let value: AnyValue = found;
        return Ok(value);
      }

      if let Some(value) = self.shared.overrides.fetch(core.id) {
        return Ok(value);
      }

      if !core.has_state {
        return self.construct_async(&found, core, None).await;
      }

      let state = found.fetch_provider_state(core);
      if let Some(value) = state.instance.get() {
        return Ok(value.clone());
      }

      // The only suspension points of the engine: waiting on this lock, and
      // awaiting an async producer below. Cancellation drops the guard.
      let _guard = match &state.async_lock {
        Some(lock) => Some(lock.lock().await),
        None => None,
      };
      if let Some(value) = state.instance.get() {
        return Ok(value.clone());
      }

      tracing::trace!(
        provider = core.id,
        kind = core.kind.name(),
        scope = %core.scope,
        "constructing provider instance"
      );
      self.construct_async(&found, core, Some(&state)).await
    })
  }

  async fn construct_async(
    &self,
    found: &Arc<Container>,
    core: &Arc<ProviderCore>,
    state: Option<&Arc<ProviderState>>,
  ) -> Result<AnyValue, DiError> {
    match &core.kind {
      ProviderKind::Factory { args, producer, .. } => {
        let resolved = self.resolve_args_async(args).await?;
        let value = producer(resolved).map_err(DiError::Producer)?;
        Ok(match state {
          Some(state) => store_instance(state, value),
          None => value,
        })
      }
      ProviderKind::AsyncFactory { args, producer, .. } => {
        let resolved = self.resolve_args_async(args).await?;
        let value = producer(resolved).await.map_err(DiError::Producer)?;
        Ok(match state {
          Some(state) => store_instance(state, value),
          None => value,
        })
      }
      ProviderKind::Resource { args, acquire } => {
        let resolved = self.resolve_args_async(args).await?;
        let (value, release) = acquire(resolved).map_err(DiError::Producer)?;
        match state {
          Some(state) => match state.instance.set(value.clone()) {
            Ok(()) => {
              state.set_teardown(Teardown::Sync(release));
              Ok(value)
            }
            Err(_) => {
              release();
              Ok(state.instance.get().cloned().unwrap_or(value))
            }
          },
          None => Ok(value),
        }
      }
      ProviderKind::AsyncResource { args, acquire } => {
        let resolved = self.resolve_args_async(args).await?;
        let (value, release) = acquire(resolved).await.map_err(DiError::Producer)?;
        match state {
          Some(state) => match state.instance.set(value.clone()) {
            Ok(()) => {
              state.set_teardown(Teardown::Async(release));
              Ok(value)
            }
            Err(_) => {
              release.await;
              Ok(state.instance.get().cloned().unwrap_or(value))
            }
          },
          None => Ok(value),
        }
      }
      ProviderKind::Object { value } => Ok(value.clone()),
      ProviderKind::Context { key } => found
        .context
        .get_any(key)
        .ok_or_else(|| DiError::MissingContext(key.clone())),
      ProviderKind::ContextAdapter { adapt } => {
        adapt(&self.context).map_err(DiError::Producer)
      }
      ProviderKind::Selector { select, branches } => {
        let key = select(&self.context);
        match branches.iter().find(|(name, _)| *name == key) {
          Some((_, branch)) => self.resolve_any_async(branch).await,
          None => Err(DiError::NoSelectorMatch(key)),
        }
      }
      ProviderKind::List { items, assemble } => {
        let mut values = Vec::with_capacity(items.len());
        for item in items {
          values.push(self.resolve_any_async(item).await?);
        }
        assemble(values)
      }
      ProviderKind::Dict { entries, assemble } => {
        let mut values = Vec::with_capacity(entries.len());
        for (_, entry) in entries {
          values.push(self.resolve_any_async(entry).await?);
        }
        assemble(values)
      }
      ProviderKind::AttrGetter { base, step } => {
        let value = self.resolve_any_async(base).await?;
        (step.get)(&value)
      }
      ProviderKind::Container => {
        let value: AnyValue = found.clone();
        Ok(value)
      }
    }
  }

  async fn resolve_args_async(&self, args: &[Arg]) -> Result<ResolvedArgs, DiError> {
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
      values.push(match arg {
        Arg::Provider(core) => self.resolve_any_async(core).await?,
        Arg::Value(value) => value.clone(),
      });
    }
    Ok(ResolvedArgs { values })
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mode = match self.current_mode() {
      MODE_UNENTERED => "unentered",
      MODE_SYNC => "sync",
      MODE_ASYNC => "async",
      _ => "closed",
    };
    f.debug_struct("Container")
      .field("scope", &self.scope)
      .field("mode", &mode)
      .field("cached_states", &self.states.len())
      .finish()
  }
}

impl Drop for Container {
  fn drop(&mut self) {
    if self.is_entered() && !self.states.is_empty() {
      tracing::warn!(
        scope = %self.scope,
        "container dropped while entered; resource teardown was skipped"
      );
    }
  }
}
