use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use trellis_di::{Args, BoxError, Container, Context, DiError, Resource, Scope};

// --- Test Fixtures ---

type TeardownLog = Arc<Mutex<Vec<&'static str>>>;

fn logging_resource(
  scope: Scope,
  name: &'static str,
  log: TeardownLog,
) -> trellis_di::Provider<String> {
  Resource::new(scope, Args::new(), move |_| {
    let log = log.clone();
    Ok((name.to_owned(), move || log.lock().unwrap().push(name)))
  })
  .unwrap()
}

#[test]
fn resource_is_cached_and_released_per_container() {
  let acquisitions = Arc::new(AtomicUsize::new(0));
  let releases = Arc::new(AtomicUsize::new(0));
  let acquire_counter = acquisitions.clone();
  let release_counter = releases.clone();

  let conn = Resource::new(Scope::APP, Args::new(), move |_| {
    acquire_counter.fetch_add(1, Ordering::SeqCst);
    let releases = release_counter.clone();
    Ok((String::from("conn"), move || {
      releases.fetch_add(1, Ordering::SeqCst);
    }))
  })
  .unwrap();

  let app = Container::builder().build().unwrap();
  app.sync_enter().unwrap();

  let first = app.sync_resolve_provider(&conn).unwrap();
  let second = app.sync_resolve_provider(&conn).unwrap();
  assert!(Arc::ptr_eq(&first, &second));
  assert_eq!(acquisitions.load(Ordering::SeqCst), 1);
  assert_eq!(releases.load(Ordering::SeqCst), 0);

  app.sync_close().unwrap();
  assert_eq!(releases.load(Ordering::SeqCst), 1);

  // A fresh root acquires anew.
  let next_root = Container::builder().build().unwrap();
  next_root.sync_enter().unwrap();
  next_root.sync_resolve_provider(&conn).unwrap();
  next_root.sync_close().unwrap();
  assert_eq!(acquisitions.load(Ordering::SeqCst), 2);
  assert_eq!(releases.load(Ordering::SeqCst), 2);
}

#[test]
fn teardown_runs_in_reverse_acquisition_order() {
  let log: TeardownLog = Arc::new(Mutex::new(Vec::new()));
  let first = logging_resource(Scope::APP, "first", log.clone());
  let second = logging_resource(Scope::APP, "second", log.clone());

  let app = Container::builder().build().unwrap();
  app.sync_enter().unwrap();

  app.sync_resolve_provider(&first).unwrap();
  app.sync_resolve_provider(&second).unwrap();
  app.sync_close().unwrap();

  assert_eq!(*log.lock().unwrap(), vec!["second", "first"]);
}

#[test]
fn teardown_is_scoped_to_the_owning_container() {
  let log: TeardownLog = Arc::new(Mutex::new(Vec::new()));
  let app_conn = logging_resource(Scope::APP, "app", log.clone());
  let request_conn = logging_resource(Scope::REQUEST, "request", log.clone());

  let app = Container::builder().build().unwrap();
  app.sync_enter().unwrap();
  let request = app
    .build_child_container_with_scope(Scope::REQUEST, Context::new())
    .unwrap();
  request.sync_enter().unwrap();

  // Both resolved from the request container; each caches at its own scope.
  request.sync_resolve_provider(&app_conn).unwrap();
  request.sync_resolve_provider(&request_conn).unwrap();

  request.sync_close().unwrap();
  assert_eq!(*log.lock().unwrap(), vec!["request"]);

  app.sync_close().unwrap();
  assert_eq!(*log.lock().unwrap(), vec!["request", "app"]);
}

#[tokio::test]
async fn async_resource_resolves_and_releases_cooperatively() {
  let releases = Arc::new(AtomicUsize::new(0));
  let release_counter = releases.clone();

  let conn = Resource::new_async(Scope::APP, Args::new(), move |_| {
    let releases = release_counter.clone();
    async move {
      let releases = releases.clone();
      Ok::<_, BoxError>((String::from("conn"), async move {
        releases.fetch_add(1, Ordering::SeqCst);
      }))
    }
  })
  .unwrap();

  let app = Container::builder().build().unwrap();
  app.async_enter().await.unwrap();

  let first = app.async_resolve_provider(&conn).await.unwrap();
  let second = app.async_resolve_provider(&conn).await.unwrap();
  assert!(Arc::ptr_eq(&first, &second));

  app.async_close().await.unwrap();
  assert_eq!(releases.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn async_resource_cannot_be_resolved_synchronously() {
  let conn = Resource::new_async(Scope::APP, Args::new(), |_| async {
    Ok::<_, BoxError>((String::from("conn"), async {}))
  })
  .unwrap();

  let app = Container::builder().build().unwrap();
  app.async_enter().await.unwrap();

  assert!(matches!(
    app.sync_resolve_provider(&conn),
    Err(DiError::SyncResolutionOfAsyncProvider)
  ));

  app.async_close().await.unwrap();
}

#[tokio::test]
async fn async_resource_cannot_be_torn_down_synchronously() {
  let conn = Resource::new_async(Scope::APP, Args::new(), |_| async {
    Ok::<_, BoxError>((String::from("conn"), async {}))
  })
  .unwrap();

  let app = Container::builder().build().unwrap();
  app.async_enter().await.unwrap();
  app.async_resolve_provider(&conn).await.unwrap();

  assert!(matches!(
    app.sync_close(),
    Err(DiError::SyncTeardownOfAsyncResource)
  ));
}

#[test]
fn failed_acquisition_is_retried_on_the_next_resolution() {
  let attempts = Arc::new(AtomicUsize::new(0));
  let attempt_counter = attempts.clone();

  let conn = Resource::new(Scope::APP, Args::new(), move |_| {
    if attempt_counter.fetch_add(1, Ordering::SeqCst) == 0 {
      return Err("connection refused".into());
    }
    Ok((String::from("conn"), || {}))
  })
  .unwrap();

  let app = Container::builder().build().unwrap();
  app.sync_enter().unwrap();

  assert!(matches!(
    app.sync_resolve_provider(&conn),
    Err(DiError::Producer(_))
  ));
  assert!(app.sync_resolve_provider(&conn).is_ok());
  assert_eq!(attempts.load(Ordering::SeqCst), 2);

  app.sync_close().unwrap();
}
