//! Attribute extraction is implemented on [`Provider::attr`]; this module
//! only hosts its tests, next to the variant it belongs to.

#[cfg(test)]
mod tests {
  use crate::error::DiError;
  use crate::provider::{Args, Object, Singleton};
  use crate::scope::Scope;

  struct Inner {
    answer: u32,
  }

  struct Settings {
    inner: Inner,
    label: String,
  }

  #[test]
  fn reserved_prefix_is_rejected() {
    let settings = Object::new(
      Scope::APP,
      Settings {
        inner: Inner { answer: 42 },
        label: "x".into(),
      },
    );
    let err = settings.attr("_private", |s: &Settings| s.label.clone());
    assert!(matches!(err, Err(DiError::ReservedAttribute("_private"))));
  }

  #[test]
  fn chained_path_is_dotted() {
    let settings = Singleton::new(Scope::APP, Args::new(), |_| {
      Ok(Settings {
        inner: Inner { answer: 42 },
        label: "x".into(),
      })
    })
    .unwrap();
    let inner = settings
      .attr("inner", |s: &Settings| Inner {
        answer: s.inner.answer,
      })
      .unwrap();
    let answer = inner.attr("answer", |i: &Inner| i.answer).unwrap();

    assert_eq!(inner.attr_path().as_deref(), Some("inner"));
    assert_eq!(answer.attr_path().as_deref(), Some("inner.answer"));
    assert_eq!(answer.scope(), Scope::APP);
  }
}
