//! A scoped, thread-safe, sync/async dependency injection container.
//!
//! # Features
//! - **Scoped lifetimes**: containers nest along an ordered scope sequence
//!   (`APP` down to `STEP` by default); every cached instance lives exactly
//!   as long as the container owning its scope.
//! - **Sync & Async**: a container is entered for either blocking or
//!   cooperative operation and offers matching resolution and close paths.
//! - **Resolve-once caching**: singletons and resources are constructed at
//!   most once per container, double-checked behind a per-provider lock.
//! - **Ordered teardown**: resources pair acquisition with a deferred
//!   release step, run in reverse creation order at container close.
//! - **Overrides**: any provider can be substituted family-wide with a test
//!   double and restored later.
//! - **Typed lookup**: providers register by name and by bound type with an
//!   optional qualifier, so resolution works from a plain type parameter.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use trellis_di::{Args, Container, Context, Factory, Scope, Singleton};
//!
//! struct Config {
//!   dsn: String,
//! }
//!
//! struct Repo {
//!   config: Arc<Config>,
//! }
//!
//! fn main() -> Result<(), trellis_di::DiError> {
//!   let config = Singleton::new(Scope::APP, Args::new(), |_| {
//!     Ok(Config { dsn: "postgres://localhost".into() })
//!   })?;
//!   let repo = Factory::new(Scope::REQUEST, Args::new().provider(&config), |args| {
//!     Ok(Repo { config: args.get(0)? })
//!   })?;
//!
//!   let app = Container::builder().build()?;
//!   app.sync_enter()?;
//!
//!   let request = app.build_child_container_with_scope(Scope::REQUEST, Context::new())?;
//!   request.sync_enter()?;
//!
//!   let handler_repo = request.sync_resolve_provider(&repo)?;
//!   assert_eq!(handler_repo.config.dsn, "postgres://localhost");
//!
//!   request.sync_close()?;
//!   app.sync_close()?;
//!   Ok(())
//! }
//! ```

// Public modules that form the API
pub mod container;
pub mod context;
pub mod error;
pub mod provider;
pub mod registry;
pub mod scope;

// Internal, crate-only modules
mod shared;
mod state;

// Re-export the primary user-facing types for convenience
pub use container::{Container, ContainerBuilder};
pub use context::Context;
pub use error::DiError;
pub use provider::{
  Args, BoxError, ContainerProvider, ContextAdapter, ContextProvider, Dict, Factory, List,
  Object, Provider, Resource, ResolvedArgs, Selector, Singleton,
};
pub use registry::ProviderGroup;
pub use scope::{Scope, DEFAULT_SCOPES};
