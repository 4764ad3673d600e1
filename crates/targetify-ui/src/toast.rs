use std::cell::Cell;
use std::rc::Rc;

use gloo::timers::future::TimeoutFuture;
use targetify_core::{
  Notification,
  Notifier
};
use yew::{
  Reducible,
  UseReducerDispatcher
};

const MAX_VISIBLE_TOASTS: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
  pub id:           u64,
  pub notification: Notification
}

#[derive(Clone, Debug, PartialEq)]
pub enum ToastAction {
  Push(Toast),
  Dismiss(u64)
}

/// Visible toasts, oldest first.
#[derive(
  Clone, Debug, Default, PartialEq,
)]
pub struct ToastQueue {
  pub toasts: Vec<Toast>
}

impl Reducible for ToastQueue {
  type Action = ToastAction;

  fn reduce(
    self: Rc<Self>,
    action: Self::Action
  ) -> Rc<Self> {
    let mut toasts =
      self.toasts.clone();
    match action {
      | ToastAction::Push(toast) => {
        toasts.push(toast);
        let overflow = toasts
          .len()
          .saturating_sub(
            MAX_VISIBLE_TOASTS
          );
        toasts = toasts.split_off(overflow);
      }
      | ToastAction::Dismiss(id) => {
        let before = toasts.len();
        toasts
          .retain(|toast| toast.id != id);
        if toasts.len() == before {
          return self;
        }
      }
    }
    Rc::new(Self {
      toasts
    })
  }
}

/// Routes store notices into the toast queue and schedules their removal.
#[derive(Clone)]
pub struct ToastNotifier {
  dispatch:   UseReducerDispatcher<ToastQueue>,
  next_id:    Rc<Cell<u64>>,
  timeout_ms: u32
}

impl ToastNotifier {
  pub fn new(
    dispatch: UseReducerDispatcher<
      ToastQueue
    >,
    timeout_ms: u32
  ) -> Self {
    Self {
      dispatch,
      next_id: Rc::new(Cell::new(0)),
      timeout_ms
    }
  }
}

impl Notifier for ToastNotifier {
  fn notify(
    &self,
    notification: Notification
  ) {
    let id = self.next_id.get();
    self.next_id.set(id + 1);

    if notification.is_destructive() {
      tracing::warn!(
        title = %notification.title,
        description = %notification.description,
        "toast"
      );
    } else {
      tracing::debug!(
        title = %notification.title,
        "toast"
      );
    }

    self.dispatch.dispatch(
      ToastAction::Push(Toast {
        id,
        notification
      })
    );

    let dispatch =
      self.dispatch.clone();
    let timeout_ms = self.timeout_ms;
    wasm_bindgen_futures::spawn_local(
      async move {
        TimeoutFuture::new(timeout_ms)
          .await;
        dispatch.dispatch(
          ToastAction::Dismiss(id)
        );
      }
    );
  }
}

#[cfg(test)]
mod toast_tests {
  use super::*;

  fn toast(id: u64) -> Toast {
    Toast {
      id,
      notification: Notification::info(
        format!("toast {id}"),
        ""
      )
    }
  }

  #[test]
  fn queue_keeps_the_newest_toasts() {
    let mut queue =
      Rc::new(ToastQueue::default());
    for id in 0..5 {
      queue = queue.reduce(
        ToastAction::Push(toast(id))
      );
    }
    let ids: Vec<u64> = queue
      .toasts
      .iter()
      .map(|toast| toast.id)
      .collect();
    assert_eq!(ids, vec![2, 3, 4]);
  }

  #[test]
  fn dismissing_unknown_toast_is_a_no_op()
  {
    let queue = Rc::new(ToastQueue {
      toasts: vec![toast(7)]
    })
    .reduce(ToastAction::Push(toast(8)));

    let same = Rc::clone(&queue)
      .reduce(ToastAction::Dismiss(42));
    assert!(Rc::ptr_eq(&queue, &same));

    let fewer = queue
      .reduce(ToastAction::Dismiss(7));
    assert_eq!(fewer.toasts, vec![toast(8)]);
  }
}
