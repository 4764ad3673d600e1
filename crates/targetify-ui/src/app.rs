use targetify_core::{
  DeferredPrompt,
  InstallPromptController,
  InstallState,
  Snapshot,
  TargetStore,
  TargetifyConfig
};
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_effect_with,
  use_memo,
  use_mut_ref,
  use_reducer,
  use_state
};

use crate::components::{
  InstallBanner,
  ProgressSummary,
  TargetForm,
  TargetList,
  ToastStack
};
use crate::install::{
  self,
  BrowserInstallPrompt
};
use crate::storage::LocalStorage;
use crate::toast::{
  ToastAction,
  ToastNotifier,
  ToastQueue
};

const CONFIG_TOML: &str =
  include_str!("../assets/targetify.toml");

type Store =
  TargetStore<LocalStorage, ToastNotifier>;
type Installer = InstallPromptController<
  BrowserInstallPrompt
>;

#[function_component(App)]
pub fn app() -> Html {
  let config = use_memo((), |_| {
    TargetifyConfig::load_or_default(
      Some(CONFIG_TOML)
    )
  });
  let toasts =
    use_reducer(ToastQueue::default);
  let store = {
    let config = config.clone();
    let notifier = ToastNotifier::new(
      toasts.dispatcher(),
      config.toast_timeout_ms
    );
    use_mut_ref(move || -> Store {
      TargetStore::open(
        LocalStorage,
        notifier,
        &config
      )
    })
  };
  let snapshot = {
    let store = store.clone();
    use_state(move || {
      store.borrow().snapshot()
    })
  };
  let installer =
    use_mut_ref(Installer::new);
  let install_state =
    use_state(|| InstallState::Idle);

  {
    let store = store.clone();
    let setter = snapshot.setter();
    use_effect_with((), move |_| {
      let subscription =
        store.borrow_mut().subscribe(
          move |next: &Snapshot| {
            setter.set(next.clone())
          }
        );
      tracing::debug!(
        "subscribed to target store"
      );
      move || {
        store
          .borrow_mut()
          .unsubscribe(subscription);
      }
    });
  }

  {
    let installer = installer.clone();
    let setter = install_state.setter();
    let enabled = config.install_banner;
    use_effect_with((), move |_| {
      let signals = web_sys::window()
        .filter(|_| enabled)
        .map(|window| {
          let on_prompt = {
            let installer =
              installer.clone();
            let setter = setter.clone();
            move |prompt: BrowserInstallPrompt| {
              let mut installer =
                installer.borrow_mut();
              installer.capture(prompt);
              setter.set(installer.state());
            }
          };
          let on_installed = move || {
            let mut installer =
              installer.borrow_mut();
            installer.mark_installed();
            setter.set(installer.state());
          };
          install::listen(
            &window,
            on_prompt,
            on_installed
          )
        });
      move || drop(signals)
    });
  }

  let on_input = {
    let store = store.clone();
    Callback::from(
      move |value: String| {
        store
          .borrow_mut()
          .set_draft(value);
      }
    )
  };

  let on_submit = {
    let store = store.clone();
    Callback::from(move |()| {
      if let Err(error) =
        store.borrow_mut().submit_draft()
      {
        tracing::debug!(
          %error,
          "add target failed"
        );
      }
    })
  };

  let on_toggle = {
    let store = store.clone();
    Callback::from(move |id: String| {
      if let Err(error) =
        store.borrow_mut().toggle(&id)
      {
        tracing::debug!(
          %error,
          id = %id,
          "toggle target failed"
        );
      }
    })
  };

  let on_delete = {
    let store = store.clone();
    Callback::from(move |id: String| {
      if let Err(error) =
        store.borrow_mut().delete(&id)
      {
        tracing::debug!(
          %error,
          id = %id,
          "delete target failed"
        );
      }
    })
  };

  let on_clear = {
    let store = store.clone();
    Callback::from(move |()| {
      if let Err(error) = store
        .borrow_mut()
        .clear_completed()
      {
        tracing::debug!(
          %error,
          "clear completed failed"
        );
      }
    })
  };

  let on_install = {
    let installer = installer.clone();
    let install_state =
      install_state.clone();
    Callback::from(move |()| {
      let handle = match installer
        .borrow_mut()
        .begin_install()
      {
        | Ok(handle) => handle,
        | Err(error) => {
          tracing::warn!(
            %error,
            "install requested without \
             a captured prompt"
          );
          return;
        }
      };
      install_state.set(
        installer.borrow().state()
      );

      let installer = installer.clone();
      let setter =
        install_state.setter();
      wasm_bindgen_futures::spawn_local(
        async move {
          let result =
            handle.prompt().await;
          let mut installer =
            installer.borrow_mut();
          if let Ok(outcome) = installer
            .finish_install(result)
          {
            tracing::info!(
              %outcome,
              "install choice recorded"
            );
          }
          setter.set(installer.state());
        }
      );
    })
  };

  let on_dismiss_banner = {
    let installer = installer.clone();
    let install_state =
      install_state.clone();
    Callback::from(move |()| {
      let mut installer =
        installer.borrow_mut();
      installer.dismiss();
      install_state
        .set(installer.state());
    })
  };

  let on_dismiss_toast = {
    let dispatcher =
      toasts.dispatcher();
    Callback::from(move |id: u64| {
      dispatcher.dispatch(
        ToastAction::Dismiss(id)
      )
    })
  };

  let banner = match *install_state {
    | InstallState::PromptCaptured => {
      Some(false)
    }
    | InstallState::Prompting => {
      Some(true)
    }
    | _ => None
  };

  html! {
    <main class="targetify">
      {
        match banner {
          | Some(busy) => html! {
            <InstallBanner
              busy={busy}
              on_install={on_install}
              on_dismiss={on_dismiss_banner}
            />
          },
          | None => html! {}
        }
      }
      <header>
        <h1>{ "Daily Targets" }</h1>
      </header>
      <TargetForm
        draft={snapshot.draft.clone()}
        on_input={on_input}
        on_submit={on_submit}
      />
      <ProgressSummary
        summary={snapshot.summary}
        on_clear={on_clear}
      />
      <TargetList
        targets={snapshot.targets.clone()}
        on_toggle={on_toggle}
        on_delete={on_delete}
      />
      <ToastStack
        toasts={toasts.toasts.clone()}
        on_dismiss={on_dismiss_toast}
      />
    </main>
  }
}
