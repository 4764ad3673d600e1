pub mod config;
pub mod error;
pub mod install;
pub mod notify;
pub mod storage;
pub mod store;
pub mod summary;
pub mod target;

pub use config::TargetifyConfig;
pub use error::{
  InstallError,
  PersistenceError,
  StorageError,
  TargetError,
  ValidationError
};
pub use install::{
  DeferredPrompt,
  InstallOutcome,
  InstallPromptController,
  InstallState
};
pub use notify::{
  Notification,
  Notifier,
  Variant
};
pub use storage::{
  FileStorage,
  KeyValueStore,
  MemoryStorage
};
pub use store::{
  Snapshot,
  SubscriptionId,
  TargetStore
};
pub use summary::Summary;
pub use target::Target;
