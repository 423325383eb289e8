use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use trellis_di::{
  Args, Container, Context, DiError, Factory, ProviderGroup, Scope, Singleton,
};

// --- Test Fixtures ---

#[derive(Debug)]
struct Widget {
  id: usize,
}

#[test]
fn duplicate_names_are_rejected_within_a_group() {
  let first = Factory::new(Scope::APP, Args::new(), |_| Ok(Widget { id: 1 })).unwrap();
  let second = Factory::new(Scope::APP, Args::new(), |_| Ok(String::from("x"))).unwrap();

  let mut group = ProviderGroup::new();
  group.register("service", &first).unwrap();

  assert!(matches!(
    group.register("service", &second),
    Err(DiError::DuplicateProviderName(name)) if name == "service"
  ));
}

#[test]
fn duplicate_types_are_rejected_within_a_group() {
  let first = Factory::new(Scope::APP, Args::new(), |_| Ok(Widget { id: 1 })).unwrap();
  let second = Factory::new(Scope::APP, Args::new(), |_| Ok(Widget { id: 2 })).unwrap();

  let mut group = ProviderGroup::new();
  group.register("first", &first).unwrap();

  assert!(matches!(
    group.register("second", &second),
    Err(DiError::DuplicateProviderType(_))
  ));
}

#[test]
fn duplicates_across_groups_fail_the_build() {
  let first = Factory::new(Scope::APP, Args::new(), |_| Ok(Widget { id: 1 })).unwrap();
  let second = Factory::new(Scope::APP, Args::new(), |_| Ok(Widget { id: 2 })).unwrap();

  let mut group_a = ProviderGroup::new();
  group_a.register("first", &first).unwrap();
  let mut group_b = ProviderGroup::new();
  group_b.register("second", &second).unwrap();

  assert!(matches!(
    Container::builder().group(group_a).group(group_b).build(),
    Err(DiError::DuplicateProviderType(_))
  ));
}

#[test]
fn qualifiers_let_one_type_register_twice() {
  let primary = Singleton::new(Scope::APP, Args::new(), |_| {
    Ok(String::from("postgres://primary"))
  })
  .unwrap();
  let replica = Singleton::new(Scope::APP, Args::new(), |_| {
    Ok(String::from("postgres://replica"))
  })
  .unwrap();

  let mut group = ProviderGroup::new();
  group
    .register_qualified("primary_dsn", "primary", &primary)
    .unwrap();
  group
    .register_qualified("replica_dsn", "replica", &replica)
    .unwrap();

  let app = Container::builder().group(group).build().unwrap();
  app.sync_enter().unwrap();

  assert_eq!(
    *app.sync_resolve_qualified::<String>("primary").unwrap(),
    "postgres://primary"
  );
  assert_eq!(
    *app.sync_resolve_qualified::<String>("replica").unwrap(),
    "postgres://replica"
  );
  // No unqualified registration for String exists.
  assert!(matches!(
    app.sync_resolve::<String>(),
    Err(DiError::MissingProvider(_))
  ));

  app.sync_close().unwrap();
}

#[test]
fn named_lookup_with_the_wrong_type_is_a_type_mismatch() {
  let widget = Factory::new(Scope::APP, Args::new(), |_| Ok(Widget { id: 1 })).unwrap();
  let mut group = ProviderGroup::new();
  group.register("widget", &widget).unwrap();

  let app = Container::builder().group(group).build().unwrap();
  app.sync_enter().unwrap();

  assert!(matches!(
    app.sync_resolve_named::<String>("widget"),
    Err(DiError::TypeMismatch(_))
  ));

  app.sync_close().unwrap();
}

#[test]
fn sync_prewarm_builds_stateful_providers_of_the_own_scope() {
  let app_constructions = Arc::new(AtomicUsize::new(0));
  let request_constructions = Arc::new(AtomicUsize::new(0));
  let factory_constructions = Arc::new(AtomicUsize::new(0));

  let app_counter = app_constructions.clone();
  let app_singleton = Singleton::new(Scope::APP, Args::new(), move |_| {
    app_counter.fetch_add(1, Ordering::SeqCst);
    Ok(Widget { id: 1 })
  })
  .unwrap();

  let request_counter = request_constructions.clone();
  let request_singleton = Singleton::new(Scope::REQUEST, Args::new(), move |_| {
    request_counter.fetch_add(1, Ordering::SeqCst);
    Ok(String::from("per request"))
  })
  .unwrap();

  let factory_counter = factory_constructions.clone();
  let plain_factory = Factory::new(Scope::APP, Args::new(), move |_| {
    factory_counter.fetch_add(1, Ordering::SeqCst);
    Ok(7_u64)
  })
  .unwrap();

  let mut group = ProviderGroup::new();
  group.register("app_singleton", &app_singleton).unwrap();
  group
    .register("request_singleton", &request_singleton)
    .unwrap();
  group.register("plain_factory", &plain_factory).unwrap();

  let app = Container::builder().group(group).build().unwrap();
  app.sync_enter().unwrap();
  app.sync_prewarm().unwrap();

  // Only the stateful provider bound to APP was constructed.
  assert_eq!(app_constructions.load(Ordering::SeqCst), 1);
  assert_eq!(request_constructions.load(Ordering::SeqCst), 0);
  assert_eq!(factory_constructions.load(Ordering::SeqCst), 0);

  // The prewarmed instance is the one later resolutions observe.
  let first = app.sync_resolve_provider(&app_singleton).unwrap();
  let second = app.sync_resolve_provider(&app_singleton).unwrap();
  assert!(Arc::ptr_eq(&first, &second));
  assert_eq!(app_constructions.load(Ordering::SeqCst), 1);

  // Prewarming the request child builds the request-scoped singleton.
  let request = app
    .build_child_container_with_scope(Scope::REQUEST, Context::new())
    .unwrap();
  request.sync_enter().unwrap();
  request.sync_prewarm().unwrap();
  assert_eq!(request_constructions.load(Ordering::SeqCst), 1);

  request.sync_close().unwrap();
  app.sync_close().unwrap();
}

#[tokio::test]
async fn async_prewarm_covers_async_backed_providers() {
  let constructions = Arc::new(AtomicUsize::new(0));
  let counter = constructions.clone();
  let widget = Singleton::new_async(Scope::APP, Args::new(), move |_| {
    let counter = counter.clone();
    async move {
      counter.fetch_add(1, Ordering::SeqCst);
      Ok::<_, trellis_di::BoxError>(Widget { id: 1 })
    }
  })
  .unwrap();

  let mut group = ProviderGroup::new();
  group.register("widget", &widget).unwrap();

  let app = Container::builder().group(group).build().unwrap();
  app.async_enter().await.unwrap();
  app.async_prewarm().await.unwrap();

  assert_eq!(constructions.load(Ordering::SeqCst), 1);
  app.async_resolve_provider(&widget).await.unwrap();
  assert_eq!(constructions.load(Ordering::SeqCst), 1);

  app.async_close().await.unwrap();
}
