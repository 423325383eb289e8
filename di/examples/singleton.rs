//! Demonstrates singleton caching and resource teardown at the APP scope.

use std::sync::Arc;

use trellis_di::{Args, Container, DiError, Resource, Scope, Singleton};

struct Config {
  dsn: String,
}

struct Pool {
  dsn: String,
}

impl Pool {
  fn connect(dsn: &str) -> Self {
    println!("opening pool for {dsn}");
    Self { dsn: dsn.to_owned() }
  }

  fn close(&self) {
    println!("closing pool for {}", self.dsn);
  }
}

fn main() -> Result<(), DiError> {
  let config = Singleton::new(Scope::APP, Args::new(), |_| {
    Ok(Config {
      dsn: "postgres://localhost/app".into(),
    })
  })?;

  // A resource pairs acquisition with a release step that runs at close.
  let pool = Resource::new(Scope::APP, Args::new().provider(&config), |args| {
    let config: Arc<Config> = args.get(0)?;
    let pool = Arc::new(Pool::connect(&config.dsn));
    let handle = pool.clone();
    Ok((pool, move || handle.close()))
  })?;

  let app = Container::builder().build()?;
  app.sync_enter()?;

  let first = app.sync_resolve_provider(&pool)?;
  let second = app.sync_resolve_provider(&pool)?;
  // Cached per container: both resolutions see the same pool.
  assert!(Arc::ptr_eq(&first, &second));
  println!("pool dsn: {}", first.dsn);

  app.sync_close()?;
  Ok(())
}
