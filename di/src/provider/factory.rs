//! Factory and singleton providers: producer-backed, uncached or
//! cached-per-container.

use crate::error::DiError;
use crate::provider::{
  AnyValue, Args, AsyncProducer, BoxError, Provider, ProviderCore, ProviderKind, ResolvedArgs,
  SyncProducer,
};
use crate::scope::Scope;

use std::future::Future;
use std::sync::Arc;

use futures_core::future::BoxFuture;

fn erase_sync<T, F>(producer: F) -> SyncProducer
where
  T: Send + Sync + 'static,
  F: Fn(ResolvedArgs) -> Result<T, BoxError> + Send + Sync + 'static,
{
  Box::new(move |args| producer(args).map(|value| Arc::new(value) as AnyValue))
}

fn erase_async<T, F, Fut>(producer: F) -> AsyncProducer
where
  T: Send + Sync + 'static,
  F: Fn(ResolvedArgs) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<T, BoxError>> + Send + 'static,
{
  Box::new(move |args| -> BoxFuture<'static, Result<AnyValue, BoxError>> {
    let fut = producer(args);
    Box::pin(async move { fut.await.map(|value| Arc::new(value) as AnyValue) })
  })
}

/// An uncached provider: the producer runs once per resolution call.
pub struct Factory;

impl Factory {
  pub fn new<T, F>(scope: Scope, args: Args, producer: F) -> Result<Provider<T>, DiError>
  where
    T: Send + Sync + 'static,
    F: Fn(ResolvedArgs) -> Result<T, BoxError> + Send + Sync + 'static,
  {
    ProviderCore::check_argument_scopes(scope, &args)?;
    let core = ProviderCore::new::<T>(
      scope,
      false,
      false,
      ProviderKind::Factory {
        args: args.items,
        producer: erase_sync(producer),
        cached: false,
      },
    );
    Ok(Provider::from_core(core))
  }

  /// The asynchronous flavor; only resolvable from async-entered containers.
  pub fn new_async<T, F, Fut>(scope: Scope, args: Args, producer: F) -> Result<Provider<T>, DiError>
  where
    T: Send + Sync + 'static,
    F: Fn(ResolvedArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, BoxError>> + Send + 'static,
  {
    ProviderCore::check_argument_scopes(scope, &args)?;
    let core = ProviderCore::new::<T>(
      scope,
      true,
      false,
      ProviderKind::AsyncFactory {
        args: args.items,
        producer: erase_async(producer),
        cached: false,
      },
    );
    Ok(Provider::from_core(core))
  }
}

/// A cached factory: at most one construction per container owning its scope,
/// guarded by the container's per-provider lock with a double-checked read.
pub struct Singleton;

impl Singleton {
  pub fn new<T, F>(scope: Scope, args: Args, producer: F) -> Result<Provider<T>, DiError>
  where
    T: Send + Sync + 'static,
    F: Fn(ResolvedArgs) -> Result<T, BoxError> + Send + Sync + 'static,
  {
    ProviderCore::check_argument_scopes(scope, &args)?;
    let core = ProviderCore::new::<T>(
      scope,
      false,
      true,
      ProviderKind::Factory {
        args: args.items,
        producer: erase_sync(producer),
        cached: true,
      },
    );
    Ok(Provider::from_core(core))
  }

  pub fn new_async<T, F, Fut>(scope: Scope, args: Args, producer: F) -> Result<Provider<T>, DiError>
  where
    T: Send + Sync + 'static,
    F: Fn(ResolvedArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, BoxError>> + Send + 'static,
  {
    ProviderCore::check_argument_scopes(scope, &args)?;
    let core = ProviderCore::new::<T>(
      scope,
      true,
      true,
      ProviderKind::AsyncFactory {
        args: args.items,
        producer: erase_async(producer),
        cached: true,
      },
    );
    Ok(Provider::from_core(core))
  }
}
