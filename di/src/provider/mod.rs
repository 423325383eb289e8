//! Provider handles and the type-erased graph they build.
//!
//! A [`Provider<T>`] is a cheap, cloneable handle over an immutable,
//! reference-counted core. Cores reference the cores of their argument
//! providers, so a provider graph is structurally acyclic: a provider can
//! only point at providers that already existed when it was built. The one
//! graph rule that needs an explicit check, "no dependency may live at a
//! deeper scope than its dependent", is enforced in every constructor.

mod aggregate;
mod attr_getter;
mod container_provider;
mod context_provider;
mod factory;
mod object;
mod resource;
mod selector;

pub use aggregate::{Dict, List};
pub use container_provider::ContainerProvider;
pub use context_provider::{ContextAdapter, ContextProvider};
pub use factory::{Factory, Singleton};
pub use object::Object;
pub use resource::Resource;
pub use selector::Selector;

use crate::context::Context;
use crate::error::DiError;
use crate::scope::Scope;

use core::fmt;
use core::marker::PhantomData;
use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_core::future::BoxFuture;

/// Error type producers may fail with; anything `Error + Send + Sync` converts
/// into it with `?`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Resolved values travel through the graph type-erased and reference-counted.
pub(crate) type AnyValue = Arc<dyn Any + Send + Sync>;

pub(crate) type ProviderId = u64;

static NEXT_PROVIDER_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_provider_id() -> ProviderId {
  NEXT_PROVIDER_ID.fetch_add(1, Ordering::Relaxed)
}

pub(crate) type SyncProducer =
  Box<dyn Fn(ResolvedArgs) -> Result<AnyValue, BoxError> + Send + Sync>;
pub(crate) type AsyncProducer =
  Box<dyn Fn(ResolvedArgs) -> BoxFuture<'static, Result<AnyValue, BoxError>> + Send + Sync>;

pub(crate) type ReleaseFn = Box<dyn FnOnce() + Send>;
pub(crate) type ReleaseFuture = BoxFuture<'static, ()>;

pub(crate) type SyncAcquire =
  Box<dyn Fn(ResolvedArgs) -> Result<(AnyValue, ReleaseFn), BoxError> + Send + Sync>;
pub(crate) type AsyncAcquire = Box<
  dyn Fn(ResolvedArgs) -> BoxFuture<'static, Result<(AnyValue, ReleaseFuture), BoxError>>
    + Send
    + Sync,
>;

pub(crate) type AdaptFn = Box<dyn Fn(&Context) -> Result<AnyValue, BoxError> + Send + Sync>;
pub(crate) type SelectFn = Box<dyn Fn(&Context) -> String + Send + Sync>;
pub(crate) type AssembleFn = Box<dyn Fn(Vec<AnyValue>) -> Result<AnyValue, DiError> + Send + Sync>;

/// One step of an attribute-access chain: a display name plus the accessor
/// that extracts the field from the type-erased upstream value.
pub(crate) struct AccessStep {
  pub(crate) name: &'static str,
  pub(crate) get: Box<dyn Fn(&AnyValue) -> Result<AnyValue, DiError> + Send + Sync>,
}

/// A positional producer argument: either another provider, resolved through
/// the container, or an already-resolved plain value passed through unchanged.
pub(crate) enum Arg {
  Provider(Arc<ProviderCore>),
  Value(AnyValue),
}

/// Builder for a provider's positional argument list.
#[derive(Default)]
pub struct Args {
  pub(crate) items: Vec<Arg>,
}

impl Args {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends a provider-typed argument, resolved at each resolution of the
  /// dependent provider.
  pub fn provider<T>(mut self, provider: &Provider<T>) -> Self {
    self.items.push(Arg::Provider(provider.core.clone()));
    self
  }

  /// Appends an already-resolved plain value.
  pub fn value<V: Send + Sync + 'static>(mut self, value: V) -> Self {
    self.items.push(Arg::Value(Arc::new(value)));
    self
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}

/// The resolved positional arguments handed to a producer.
pub struct ResolvedArgs {
  pub(crate) values: Vec<AnyValue>,
}

impl ResolvedArgs {
  /// Typed access to the argument at `index`.
  pub fn get<T: Send + Sync + 'static>(&self, index: usize) -> Result<Arc<T>, DiError> {
    let value = self
      .values
      .get(index)
      .ok_or(DiError::ArgumentIndex(index))?;
    value
      .clone()
      .downcast::<T>()
      .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

/// The variant payload of a provider core.
pub(crate) enum ProviderKind {
  Factory {
    args: Vec<Arg>,
    producer: SyncProducer,
    cached: bool,
  },
  AsyncFactory {
    args: Vec<Arg>,
    producer: AsyncProducer,
    cached: bool,
  },
  Resource {
    args: Vec<Arg>,
    acquire: SyncAcquire,
  },
  AsyncResource {
    args: Vec<Arg>,
    acquire: AsyncAcquire,
  },
  Object {
    value: AnyValue,
  },
  Context {
    key: String,
  },
  ContextAdapter {
    adapt: AdaptFn,
  },
  Selector {
    select: SelectFn,
    branches: Vec<(String, Arc<ProviderCore>)>,
  },
  List {
    items: Vec<Arc<ProviderCore>>,
    assemble: AssembleFn,
  },
  Dict {
    entries: Vec<(String, Arc<ProviderCore>)>,
    assemble: AssembleFn,
  },
  AttrGetter {
    base: Arc<ProviderCore>,
    step: AccessStep,
  },
  Container,
}

impl ProviderKind {
  pub(crate) fn name(&self) -> &'static str {
    match self {
      ProviderKind::Factory { cached: false, .. } => "Factory",
      ProviderKind::Factory { cached: true, .. } => "Singleton",
      ProviderKind::AsyncFactory { cached: false, .. } => "AsyncFactory",
      ProviderKind::AsyncFactory { cached: true, .. } => "AsyncSingleton",
      ProviderKind::Resource { .. } => "Resource",
      ProviderKind::AsyncResource { .. } => "AsyncResource",
      ProviderKind::Object { .. } => "Object",
      ProviderKind::Context { .. } => "ContextProvider",
      ProviderKind::ContextAdapter { .. } => "ContextAdapter",
      ProviderKind::Selector { .. } => "Selector",
      ProviderKind::List { .. } => "List",
      ProviderKind::Dict { .. } => "Dict",
      ProviderKind::AttrGetter { .. } => "AttrGetter",
      ProviderKind::Container => "ContainerProvider",
    }
  }
}

/// The immutable, type-erased half of a provider.
pub(crate) struct ProviderCore {
  pub(crate) id: ProviderId,
  pub(crate) scope: Scope,
  pub(crate) bound: TypeId,
  pub(crate) type_name: &'static str,
  pub(crate) is_async: bool,
  pub(crate) has_state: bool,
  pub(crate) kind: ProviderKind,
}

impl ProviderCore {
  pub(crate) fn new<T: 'static>(
    scope: Scope,
    is_async: bool,
    has_state: bool,
    kind: ProviderKind,
  ) -> Arc<Self> {
    Arc::new(Self {
      id: next_provider_id(),
      scope,
      bound: TypeId::of::<T>(),
      type_name: std::any::type_name::<T>(),
      is_async,
      has_state,
      kind,
    })
  }

  /// The eager graph rule: arguments must not live deeper than the dependent.
  pub(crate) fn check_argument_scopes(scope: Scope, args: &Args) -> Result<(), DiError> {
    for arg in &args.items {
      if let Arg::Provider(core) = arg {
        if core.scope > scope {
          return Err(DiError::DependencyScopeDeeper {
            dependency: core.scope,
            provider: scope,
          });
        }
      }
    }
    Ok(())
  }

  pub(crate) fn check_member_scope(scope: Scope, member: &ProviderCore) -> Result<(), DiError> {
    if member.scope > scope {
      return Err(DiError::DependencyScopeDeeper {
        dependency: member.scope,
        provider: scope,
      });
    }
    Ok(())
  }
}

/// A typed handle to a node of the provider graph.
///
/// Cloning a handle does not create a new provider: clones share the same
/// identity, scope and cache entries. `T` is the resolved value type;
/// resolution surfaces it as `Arc<T>`.
pub struct Provider<T> {
  pub(crate) core: Arc<ProviderCore>,
  pub(crate) _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Provider<T> {
  fn clone(&self) -> Self {
    Self {
      core: self.core.clone(),
      _marker: PhantomData,
    }
  }
}

impl<T> fmt::Debug for Provider<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct(self.core.kind.name())
      .field("id", &self.core.id)
      .field("scope", &self.core.scope)
      .field("type", &self.core.type_name)
      .finish()
  }
}

impl<T> Provider<T> {
  pub(crate) fn from_core(core: Arc<ProviderCore>) -> Self {
    Self {
      core,
      _marker: PhantomData,
    }
  }

  pub fn scope(&self) -> Scope {
    self.core.scope
  }

  /// The process-unique identity used as the cache and override key.
  pub fn provider_id(&self) -> u64 {
    self.core.id
  }

  pub fn is_async(&self) -> bool {
    self.core.is_async
  }
}

impl<T: Send + Sync + 'static> Provider<T> {
  /// Derives a provider that resolves this one and extracts one field.
  ///
  /// `getter` is the explicit accessor for the named field; it receives the
  /// resolved value and returns the extracted field by value. Chaining `attr`
  /// calls extends the access path one step per call. Names starting with the
  /// reserved `_` prefix are rejected.
  pub fn attr<U, F>(&self, name: &'static str, getter: F) -> Result<Provider<U>, DiError>
  where
    U: Send + Sync + 'static,
    F: Fn(&T) -> U + Send + Sync + 'static,
  {
    if name.starts_with('_') {
      return Err(DiError::ReservedAttribute(name));
    }

    let step = AccessStep {
      name,
      get: Box::new(move |value: &AnyValue| {
        let base = value
          .clone()
          .downcast::<T>()
          .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))?;
        Ok(Arc::new(getter(&base)) as AnyValue)
      }),
    };

    let core = ProviderCore::new::<U>(
      self.core.scope,
      self.core.is_async,
      false,
      ProviderKind::AttrGetter {
        base: self.core.clone(),
        step,
      },
    );
    Ok(Provider::from_core(core))
  }

  /// The dotted access path of an attribute chain, for diagnostics.
  pub fn attr_path(&self) -> Option<String> {
    fn walk(core: &ProviderCore, out: &mut Vec<&'static str>) {
      if let ProviderKind::AttrGetter { base, step } = &core.kind {
        walk(base, out);
        out.push(step.name);
      }
    }

    let mut parts = Vec::new();
    walk(&self.core, &mut parts);
    if parts.is_empty() {
      None
    } else {
      Some(parts.join("."))
    }
  }
}
