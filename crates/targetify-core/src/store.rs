use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::config::TargetifyConfig;
use crate::error::{PersistenceError, TargetError, ValidationError};
use crate::notify::{Notification, Notifier};
use crate::storage::KeyValueStore;
use crate::summary::Summary;
use crate::target::{Target, normalize_text};

/// What observers see after every state change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub targets: Vec<Target>,
    pub draft: String,
    pub summary: Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn Fn(&Snapshot)>;

/// Owns the ordered target collection and mirrors it to a key-value store
/// after every mutation.
pub struct TargetStore<S, N> {
    storage: S,
    notifier: N,
    storage_key: String,
    targets: Vec<Target>,
    draft: String,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl<S, N> TargetStore<S, N>
where
    S: KeyValueStore,
    N: Notifier,
{
    pub fn new(storage: S, notifier: N, config: &TargetifyConfig) -> Self {
        Self {
            storage,
            notifier,
            storage_key: config.storage_key.clone(),
            targets: Vec::new(),
            draft: String::new(),
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Builds the store and rehydrates it. A failed load has already been
    /// surfaced through the notifier, so the store simply starts empty.
    #[tracing::instrument(skip_all, fields(key = %config.storage_key))]
    pub fn open(storage: S, notifier: N, config: &TargetifyConfig) -> Self {
        let mut store = Self::new(storage, notifier, config);
        match store.load() {
            Ok(count) => info!(count, "opened target store"),
            Err(err) => warn!(error = %err, "opened target store with an empty collection"),
        }
        store
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn summary(&self) -> Summary {
        Summary::of(&self.targets)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            targets: self.targets.clone(),
            draft: self.draft.clone(),
            summary: self.summary(),
        }
    }

    pub fn subscribe(&mut self, observer: impl Fn(&Snapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        debug!(subscription = id.0, "observer subscribed");
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        before != self.observers.len()
    }

    /// Replaces the in-memory collection with what storage holds.
    ///
    /// Missing data yields an empty collection. Unreadable or malformed data
    /// also leaves the collection empty, but is reported to the notifier and
    /// returned as an error.
    #[tracing::instrument(skip(self), fields(key = %self.storage_key))]
    pub fn load(&mut self) -> Result<usize, TargetError> {
        let result = self.read_stored();
        let outcome = match result {
            Ok(targets) => {
                self.targets = targets;
                debug!(count = self.targets.len(), "loaded targets");
                Ok(self.targets.len())
            }
            Err(err) => {
                error!(error = %err, "failed loading targets");
                self.targets.clear();
                self.notifier.notify(Notification::error(
                    "Couldn't load your targets",
                    "Saved targets could not be read, so the list starts empty.",
                ));
                Err(err.into())
            }
        };
        self.emit();
        outcome
    }

    /// Writes the whole collection. On failure the in-memory state stays
    /// authoritative for the rest of the session.
    #[tracing::instrument(skip(self), fields(key = %self.storage_key, count = self.targets.len()))]
    pub fn persist(&self) -> Result<(), TargetError> {
        let result = serde_json::to_string(&self.targets)
            .map_err(PersistenceError::Encode)
            .and_then(|json| {
                self.storage
                    .set_item(&self.storage_key, &json)
                    .map_err(PersistenceError::Write)
            });

        if let Err(err) = result {
            error!(error = %err, "failed saving targets");
            self.notifier.notify(Notification::error(
                "Couldn't save your targets",
                "Your changes are kept for this session but were not saved.",
            ));
            return Err(err.into());
        }

        debug!("saved targets");
        Ok(())
    }

    /// Validates and prepends a new target, returning its id.
    ///
    /// If the target was added but could not be saved, the persistence error
    /// is returned and the target stays in the collection.
    #[tracing::instrument(skip(self, text))]
    pub fn add(&mut self, text: &str) -> Result<String, TargetError> {
        let Some(text) = normalize_text(text) else {
            debug!("rejected empty target");
            self.notifier.notify(Notification::error(
                "Nothing to add",
                "Please enter a target before adding it.",
            ));
            return Err(ValidationError::EmptyText.into());
        };

        let target = Target::new(text, Utc::now());
        let id = target.id.clone();
        self.notifier.notify(Notification::info(
            "Target added",
            format!("\"{}\" was added to your daily targets.", target.text),
        ));
        info!(id = %id, "added target");
        self.targets.insert(0, target);
        self.draft.clear();

        let persisted = self.persist();
        self.emit();
        persisted.map(|()| id)
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        self.emit();
    }

    /// Adds the pending input. On validation failure the draft is kept so it
    /// can be corrected.
    pub fn submit_draft(&mut self) -> Result<String, TargetError> {
        let draft = self.draft.clone();
        self.add(&draft)
    }

    /// Flips completion of `id`. Returns `Ok(false)` when no such target
    /// exists, without touching storage.
    #[tracing::instrument(skip(self))]
    pub fn toggle(&mut self, id: &str) -> Result<bool, TargetError> {
        let Some(target) = self.targets.iter_mut().find(|t| t.id == id) else {
            debug!("toggle ignored for unknown id");
            return Ok(false);
        };
        target.toggle();
        debug!(completed = target.completed, "toggled target");

        let persisted = self.persist();
        self.emit();
        persisted.map(|()| true)
    }

    /// Removes `id`, returning the removed target when it existed.
    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, id: &str) -> Result<Option<Target>, TargetError> {
        let Some(idx) = self.targets.iter().position(|t| t.id == id) else {
            debug!("delete ignored for unknown id");
            return Ok(None);
        };
        let removed = self.targets.remove(idx);
        self.notifier.notify(Notification::info(
            "Target removed",
            format!("\"{}\" was removed.", removed.text),
        ));
        info!("deleted target");

        let persisted = self.persist();
        self.emit();
        persisted.map(|()| Some(removed))
    }

    /// Drops every completed target and returns how many went.
    #[tracing::instrument(skip(self))]
    pub fn clear_completed(&mut self) -> Result<usize, TargetError> {
        let before = self.targets.len();
        self.targets.retain(|t| !t.completed);
        let removed = before - self.targets.len();

        if removed == 0 {
            self.notifier.notify(Notification::info(
                "Nothing to clear",
                "There are no completed targets to remove.",
            ));
            return Ok(0);
        }

        let noun = if removed == 1 { "target" } else { "targets" };
        self.notifier.notify(Notification::info(
            "Completed targets cleared",
            format!("Removed {removed} completed {noun}."),
        ));
        info!(before, removed, "cleared completed targets");

        let persisted = self.persist();
        self.emit();
        persisted.map(|()| removed)
    }

    fn read_stored(&self) -> Result<Vec<Target>, PersistenceError> {
        let Some(raw) = self
            .storage
            .get_item(&self.storage_key)
            .map_err(PersistenceError::Read)?
        else {
            debug!("no saved targets");
            return Ok(Vec::new());
        };

        let targets: Vec<Target> = serde_json::from_str(&raw).map_err(PersistenceError::Decode)?;
        validate_shape(&targets)?;
        Ok(targets)
    }

    fn emit(&self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, observer) in &self.observers {
            observer(&snapshot);
        }
    }
}

fn validate_shape(targets: &[Target]) -> Result<(), PersistenceError> {
    let mut seen = HashSet::with_capacity(targets.len());
    for (idx, target) in targets.iter().enumerate() {
        if target.text.trim().is_empty() {
            return Err(PersistenceError::Shape(format!(
                "target {idx} has empty text"
            )));
        }
        if !seen.insert(target.id.as_str()) {
            return Err(PersistenceError::Shape(format!(
                "duplicate target id {}",
                target.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStorage;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Notification>>>);

    impl Notifier for Recorder {
        fn notify(&self, notification: Notification) {
            self.0.borrow_mut().push(notification);
        }
    }

    impl Recorder {
        fn titles(&self) -> Vec<String> {
            self.0.borrow().iter().map(|n| n.title.clone()).collect()
        }
    }

    fn store() -> (TargetStore<Rc<MemoryStorage>, Recorder>, Rc<MemoryStorage>, Recorder) {
        let storage = Rc::new(MemoryStorage::new());
        let recorder = Recorder::default();
        let store = TargetStore::open(storage.clone(), recorder.clone(), &TargetifyConfig::default());
        (store, storage, recorder)
    }

    #[test]
    fn add_prepends_and_clears_draft() {
        let (mut store, _, recorder) = store();
        store.set_draft("  Write report  ");
        let first = store.submit_draft().expect("add");
        let second = store.add("Exercise").expect("add");

        let texts: Vec<_> = store.targets().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["Exercise", "Write report"]);
        assert_eq!(store.targets()[0].id, second);
        assert_eq!(store.targets()[1].id, first);
        assert!(store.targets().iter().all(|t| !t.completed));
        assert_eq!(store.draft(), "");
        assert_eq!(recorder.titles(), ["Target added", "Target added"]);
        assert!(recorder.0.borrow()[0].description.contains("\"Write report\""));
    }

    #[test]
    fn blank_submit_keeps_draft() {
        let (mut store, storage, recorder) = store();
        store.set_draft("   ");
        let err = store.submit_draft().expect_err("blank");
        assert!(err.is_validation());
        assert_eq!(store.draft(), "   ");
        assert!(store.targets().is_empty());
        assert!(storage.is_empty());
        assert!(recorder.0.borrow()[0].is_destructive());
    }

    #[test]
    fn unsubscribed_observers_stop_receiving() {
        let (mut store, _, _) = store();
        let seen = Rc::new(RefCell::new(Vec::<usize>::new()));
        let sink = seen.clone();
        let id = store.subscribe(move |snap| sink.borrow_mut().push(snap.targets.len()));

        store.add("one").expect("add");
        store.add("two").expect("add");
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.add("three").expect("add");

        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn shape_validation_rejects_duplicates_and_blank_text() {
        let now = Utc::now();
        let a = Target::new("a".to_string(), now);
        let mut b = Target::new("b".to_string(), now);
        b.id = a.id.clone();
        assert!(matches!(
            validate_shape(&[a.clone(), b]),
            Err(PersistenceError::Shape(_))
        ));

        let mut blank = Target::new("x".to_string(), now);
        blank.text = "  ".to_string();
        assert!(matches!(validate_shape(&[blank]), Err(PersistenceError::Shape(_))));
        assert!(validate_shape(&[a]).is_ok());
    }

    #[test]
    fn unreadable_storage_starts_empty() {
        struct Broken;
        impl KeyValueStore for Broken {
            fn get_item(&self, _: &str) -> Result<Option<String>, StorageError> {
                Err(StorageError::Unavailable)
            }
            fn set_item(&self, _: &str, _: &str) -> Result<(), StorageError> {
                Err(StorageError::Unavailable)
            }
            fn remove_item(&self, _: &str) -> Result<(), StorageError> {
                Err(StorageError::Unavailable)
            }
        }

        let recorder = Recorder::default();
        let mut store = TargetStore::new(Broken, recorder.clone(), &TargetifyConfig::default());
        let err = store.load().expect_err("unavailable");
        assert!(matches!(
            err,
            TargetError::Persistence(PersistenceError::Read(StorageError::Unavailable))
        ));
        assert!(store.targets().is_empty());
        assert_eq!(recorder.0.borrow().len(), 1);
    }
}
