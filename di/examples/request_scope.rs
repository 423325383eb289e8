//! Demonstrates per-request child containers over an async root.

use std::sync::Arc;

use trellis_di::{
  Args, Container, Context, ContextProvider, Factory, DiError, Scope, Singleton,
};

struct Config {
  greeting: String,
}

struct Handler {
  config: Arc<Config>,
  request_id: Arc<u64>,
}

#[tokio::main]
async fn main() -> Result<(), DiError> {
  let config = Singleton::new(Scope::APP, Args::new(), |_| {
    Ok(Config {
      greeting: "hello".into(),
    })
  })?;

  // The request id is seeded into each child container's context.
  let request_id = ContextProvider::new::<u64>(Scope::REQUEST, "request_id");

  let handler = Factory::new(
    Scope::REQUEST,
    Args::new().provider(&config).provider(&request_id),
    |args| {
      Ok(Handler {
        config: args.get(0)?,
        request_id: args.get(1)?,
      })
    },
  )?;

  let app = Container::builder().build()?;
  app.async_enter().await?;

  for id in 0..3u64 {
    let request = app.build_child_container_with_scope(
      Scope::REQUEST,
      Context::new().with("request_id", id),
    )?;
    request.async_enter().await?;

    let h = request.async_resolve_provider(&handler).await?;
    println!("{} from request {}", h.config.greeting, h.request_id);

    request.async_close().await?;
  }

  app.async_close().await?;
  Ok(())
}
