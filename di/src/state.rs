//! Per-(container, provider) cache entries.

use crate::error::DiError;
use crate::provider::{AnyValue, ReleaseFn, ReleaseFuture};

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

/// The deferred release half of a resource, captured at acquisition time.
pub(crate) enum Teardown {
  Sync(ReleaseFn),
  Async(ReleaseFuture),
}

/// Cache entry owned by one container for one stateful provider.
///
/// The instance cell is written at most once per container lifetime; the
/// lock flavors mirror how the owning container can be driven. The sync lock
/// exists unless the container opted out of threading locks, and serializes
/// blocking resolvers; the async lock exists only on async-entered containers
/// and serializes cooperative resolvers. Readers never lock: the fast path is
/// a lock-free cell read.
pub(crate) struct ProviderState {
  pub(crate) instance: OnceCell<AnyValue>,
  pub(crate) sync_lock: Option<Mutex<()>>,
  pub(crate) async_lock: Option<tokio::sync::Mutex<()>>,
  teardown: Mutex<Option<Teardown>>,
}

impl ProviderState {
  pub(crate) fn new(async_mode: bool, use_sync_lock: bool) -> Self {
    Self {
      instance: OnceCell::new(),
      sync_lock: use_sync_lock.then(|| Mutex::new(())),
      async_lock: async_mode.then(|| tokio::sync::Mutex::new(())),
      teardown: Mutex::new(None),
    }
  }

  pub(crate) fn set_teardown(&self, teardown: Teardown) {
    *self.teardown.lock() = Some(teardown);
  }

  /// Runs the release half on the blocking path. An async-backed release
  /// cannot run here and is left in place so the error is observable again.
  pub(crate) fn sync_tear_down(&self) -> Result<(), DiError> {
    let mut slot = self.teardown.lock();
    match slot.as_ref() {
      Some(Teardown::Async(_)) => Err(DiError::SyncTeardownOfAsyncResource),
      Some(Teardown::Sync(_)) => {
        if let Some(Teardown::Sync(release)) = slot.take() {
          release();
        }
        Ok(())
      }
      None => Ok(()),
    }
  }

  /// Runs the release half on the cooperative path; handles both flavors.
  pub(crate) async fn async_tear_down(&self) {
    let taken = self.teardown.lock().take();
    match taken {
      Some(Teardown::Sync(release)) => release(),
      Some(Teardown::Async(release)) => release.await,
      None => {}
    }
  }
}
