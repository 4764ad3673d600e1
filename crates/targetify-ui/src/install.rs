use gloo::events::{
  EventListener,
  EventListenerOptions
};
use js_sys::{
  Function,
  Promise,
  Reflect
};
use targetify_core::{
  DeferredPrompt,
  InstallError,
  InstallOutcome
};
use wasm_bindgen::{
  JsCast,
  JsValue
};
use wasm_bindgen_futures::JsFuture;

const BEFORE_INSTALL_PROMPT: &str =
  "beforeinstallprompt";
const APP_INSTALLED: &str =
  "appinstalled";

/// The `beforeinstallprompt` event, kept around so its `prompt()` can be
/// called later from a click handler.
#[derive(Debug)]
pub struct BrowserInstallPrompt {
  event: web_sys::Event
}

impl BrowserInstallPrompt {
  pub fn new(
    event: web_sys::Event
  ) -> Self {
    Self {
      event
    }
  }

  fn property(
    &self,
    name: &str
  ) -> Result<JsValue, InstallError> {
    Reflect::get(
      &self.event,
      &JsValue::from_str(name)
    )
    .map_err(js_error)
  }
}

impl DeferredPrompt
  for BrowserInstallPrompt
{
  fn prevent_default(&self) {
    self.event.prevent_default();
  }

  async fn prompt(
    &self
  ) -> Result<InstallOutcome, InstallError>
  {
    let prompt = self
      .property("prompt")?
      .dyn_into::<Function>()
      .map_err(js_error)?;
    let shown = prompt
      .call0(&self.event)
      .map_err(js_error)?;
    JsFuture::from(Promise::resolve(
      &shown
    ))
    .await
    .map_err(js_error)?;

    let choice = JsFuture::from(
      Promise::resolve(
        &self.property("userChoice")?
      )
    )
    .await
    .map_err(js_error)?;
    let outcome = Reflect::get(
      &choice,
      &JsValue::from_str("outcome")
    )
    .map_err(js_error)?
    .as_string()
    .ok_or_else(|| {
      InstallError::Platform(
        "userChoice has no outcome"
          .to_string()
      )
    })?;

    InstallOutcome::parse(&outcome)
      .ok_or_else(|| {
        InstallError::Platform(format!(
          "unknown install outcome \
           {outcome:?}"
        ))
      })
  }
}

/// Window listeners for the install signals; dropping this unsubscribes.
pub struct InstallSignals {
  _before_install: EventListener,
  _installed:      EventListener
}

pub fn listen(
  window: &web_sys::Window,
  on_prompt: impl Fn(BrowserInstallPrompt)
  + 'static,
  on_installed: impl Fn() + 'static
) -> InstallSignals {
  // Passive listeners cannot call preventDefault().
  let before_install =
    EventListener::new_with_options(
      window,
      BEFORE_INSTALL_PROMPT,
      EventListenerOptions::enable_prevent_default(),
      move |event| {
        on_prompt(
          BrowserInstallPrompt::new(
            event.clone()
          )
        )
      }
    );
  let installed = EventListener::new(
    window,
    APP_INSTALLED,
    move |_| on_installed()
  );

  tracing::debug!(
    "subscribed to install signals"
  );
  InstallSignals {
    _before_install: before_install,
    _installed:      installed
  }
}

fn js_error(
  value: JsValue
) -> InstallError {
  InstallError::Platform(
    value.as_string().unwrap_or_else(
      || format!("{value:?}")
    )
  )
}
