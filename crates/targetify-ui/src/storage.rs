use targetify_core::{
  KeyValueStore,
  StorageError
};
use wasm_bindgen::{
  JsCast,
  JsValue
};

/// `window.localStorage`, resolved on every call so a storage that becomes
/// unavailable mid-session surfaces as an error instead of a panic.
#[derive(
  Debug, Clone, Copy, Default,
)]
pub struct LocalStorage;

impl LocalStorage {
  fn raw(
    self
  ) -> Result<web_sys::Storage, StorageError>
  {
    web_sys::window()
      .ok_or(StorageError::Unavailable)?
      .local_storage()
      .map_err(storage_error)?
      .ok_or(StorageError::Unavailable)
  }
}

impl KeyValueStore for LocalStorage {
  fn get_item(
    &self,
    key: &str
  ) -> Result<Option<String>, StorageError>
  {
    self
      .raw()?
      .get_item(key)
      .map_err(storage_error)
  }

  fn set_item(
    &self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError> {
    self
      .raw()?
      .set_item(key, value)
      .map_err(storage_error)
  }

  fn remove_item(
    &self,
    key: &str
  ) -> Result<(), StorageError> {
    self
      .raw()?
      .remove_item(key)
      .map_err(storage_error)
  }
}

fn storage_error(
  value: JsValue
) -> StorageError {
  match value
    .dyn_ref::<web_sys::DomException>()
  {
    | Some(exception) => {
      classify_exception(
        &exception.name(),
        &exception.message()
      )
    }
    | None => {
      StorageError::Backend(format!(
        "{value:?}"
      ))
    }
  }
}

fn classify_exception(
  name: &str,
  message: &str
) -> StorageError {
  match name {
    | "QuotaExceededError"
    | "NS_ERROR_DOM_QUOTA_REACHED" => {
      StorageError::QuotaExceeded
    }
    | "SecurityError" => {
      StorageError::Unavailable
    }
    | _ => {
      StorageError::Backend(format!(
        "{name}: {message}"
      ))
    }
  }
}

#[cfg(test)]
mod storage_tests {
  use super::*;

  #[test]
  fn quota_errors_are_recognized() {
    assert_eq!(
      classify_exception(
        "QuotaExceededError",
        "full"
      ),
      StorageError::QuotaExceeded
    );
    assert_eq!(
      classify_exception(
        "NS_ERROR_DOM_QUOTA_REACHED",
        ""
      ),
      StorageError::QuotaExceeded
    );
  }

  #[test]
  fn disabled_storage_is_unavailable() {
    assert_eq!(
      classify_exception(
        "SecurityError",
        "access denied"
      ),
      StorageError::Unavailable
    );
    assert_eq!(
      classify_exception(
        "InvalidStateError",
        "gone"
      ),
      StorageError::Backend(
        "InvalidStateError: gone"
          .to_string()
      )
    );
  }
}
