//! Resource providers: two-phase acquisition with deferred, ordered release.

use crate::error::DiError;
use crate::provider::{
  AnyValue, Args, AsyncAcquire, BoxError, Provider, ProviderCore, ProviderKind, ReleaseFn,
  ReleaseFuture, ResolvedArgs, SyncAcquire,
};
use crate::scope::Scope;

use std::future::Future;
use std::sync::Arc;

use futures_core::future::BoxFuture;

/// A cached provider whose acquisition pairs the value with a release step.
///
/// The acquire half runs at first resolution and returns the value together
/// with an opaque release token (a closure on the blocking path, a future on
/// the cooperative path). The release half runs when the owning container
/// closes, in reverse creation order. An async-acquired resource can only be
/// resolved and torn down through the async paths.
pub struct Resource;

impl Resource {
  pub fn new<T, F, R>(scope: Scope, args: Args, acquire: F) -> Result<Provider<T>, DiError>
  where
    T: Send + Sync + 'static,
    F: Fn(ResolvedArgs) -> Result<(T, R), BoxError> + Send + Sync + 'static,
    R: FnOnce() + Send + 'static,
  {
    ProviderCore::check_argument_scopes(scope, &args)?;
    let acquire: SyncAcquire = Box::new(move |resolved| {
      acquire(resolved)
        .map(|(value, release)| (Arc::new(value) as AnyValue, Box::new(release) as ReleaseFn))
    });
    let core = ProviderCore::new::<T>(
      scope,
      false,
      true,
      ProviderKind::Resource {
        args: args.items,
        acquire,
      },
    );
    Ok(Provider::from_core(core))
  }

  pub fn new_async<T, F, Fut, RFut>(
    scope: Scope,
    args: Args,
    acquire: F,
  ) -> Result<Provider<T>, DiError>
  where
    T: Send + Sync + 'static,
    F: Fn(ResolvedArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(T, RFut), BoxError>> + Send + 'static,
    RFut: Future<Output = ()> + Send + 'static,
  {
    ProviderCore::check_argument_scopes(scope, &args)?;
    let acquire: AsyncAcquire = Box::new(
      move |resolved| -> BoxFuture<'static, Result<(AnyValue, ReleaseFuture), BoxError>> {
        let fut = acquire(resolved);
        Box::pin(async move {
          let (value, release) = fut.await?;
          Ok((
            Arc::new(value) as AnyValue,
            Box::pin(release) as ReleaseFuture,
          ))
        })
      },
    );
    let core = ProviderCore::new::<T>(
      scope,
      true,
      true,
      ProviderKind::AsyncResource {
        args: args.items,
        acquire,
      },
    );
    Ok(Provider::from_core(core))
  }
}
