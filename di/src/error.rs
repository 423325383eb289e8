//! Error type shared by every fallible operation of the container.

use crate::provider::BoxError;
use crate::scope::Scope;

/// Errors reported by container construction, resolution and teardown.
///
/// Nothing is retried internally; every variant surfaces synchronously to the
/// caller that triggered it.
#[derive(Debug, thiserror::Error)]
pub enum DiError {
  /// An operation other than `enter` was attempted on an unentered container.
  #[error("enter the container of {0} scope first")]
  NotEntered(Scope),

  /// `enter` was called on a container that is already entered.
  #[error("container of {0} scope is already entered")]
  AlreadyEntered(Scope),

  /// The container was closed; closed containers cannot be reused.
  #[error("container of {0} scope is closed")]
  AlreadyClosed(Scope),

  /// A child container was requested at a scope not deeper than its parent's.
  #[error("scope of child container must be deeper than {parent}, got {child}")]
  ChildScopeNotDeeper { parent: Scope, child: Scope },

  /// `build_child_container` was called on a container at the last scope.
  #[error("max scope is reached, {0}")]
  MaxScopeReached(Scope),

  /// The scope does not belong to the scope set the root was built with.
  #[error("scope {0} is not part of the container's scope set")]
  UnknownScope(Scope),

  /// The scope set handed to the builder was empty or not strictly increasing.
  #[error("the scope set must be a non-empty sequence of strictly increasing levels")]
  InvalidScopeSet,

  /// A provider is bound to a scope deeper than the resolving container's.
  #[error("scope {provider_scope} is not initialized, resolution started at {container_scope}")]
  ScopeNotInitialized {
    provider_scope: Scope,
    container_scope: Scope,
  },

  /// No container with exactly the provider's scope exists in the parent chain.
  #[error("scope {0} is skipped in the chain of containers")]
  ScopeSkipped(Scope),

  /// A provider was declared with a dependency of a deeper scope than its own.
  #[error("scope of dependency is {dependency} and provider scope is {provider}")]
  DependencyScopeDeeper { dependency: Scope, provider: Scope },

  /// An async-backed provider was resolved through the synchronous path.
  #[error("provider requires async resolution and cannot be resolved synchronously")]
  SyncResolutionOfAsyncProvider,

  /// An async-backed provider was resolved in a container entered in sync mode.
  #[error("async resolving is forbidden in a sync-entered container")]
  AsyncResolutionForbidden,

  /// `sync_close` found a resource whose release half is asynchronous.
  #[error("cannot tear down an async resource in sync close")]
  SyncTeardownOfAsyncResource,

  /// No provider is registered under the requested type, qualifier or name.
  #[error("no provider is registered for {0}")]
  MissingProvider(String),

  /// A selector's discriminator produced a key with no matching branch.
  #[error("no provider matches {0}")]
  NoSelectorMatch(String),

  /// A context provider's key was never set at its scope.
  #[error("context key {0} is not set")]
  MissingContext(String),

  #[error("provider is duplicated by name {0}")]
  DuplicateProviderName(String),

  #[error("provider is duplicated by type {0}")]
  DuplicateProviderType(&'static str),

  /// Attribute names with the `_` prefix are reserved and cannot be chained.
  #[error("attribute {0} is reserved")]
  ReservedAttribute(&'static str),

  /// A producer asked for a positional argument that was never declared.
  #[error("argument index {0} is out of range")]
  ArgumentIndex(usize),

  /// A resolved value could not be downcast to the requested type.
  #[error("resolved value is not of type {0}")]
  TypeMismatch(&'static str),

  /// A producer or resource acquisition failed.
  #[error("producer failed: {0}")]
  Producer(BoxError),
}
