use chrono::{
  DateTime,
  NaiveDate,
  Utc
};
use tracing::{
  debug,
  info,
  warn
};

use crate::error::{
  StoreError,
  ValidationError
};
use crate::storage::{
  KeyValueStore,
  TASKS_STORAGE_KEY
};
use crate::task::{
  Task,
  TaskId
};

/// The ordered task collection and the
/// storage it is mirrored into. Every
/// mutating call rewrites the whole
/// collection under
/// [`TASKS_STORAGE_KEY`].
#[derive(Debug)]
pub struct TaskStore<S> {
  tasks:   Vec<Task>,
  storage: S
}

impl<S: KeyValueStore> TaskStore<S> {
  /// Reads the persisted collection.
  /// Missing or unreadable data yields an
  /// empty store.
  #[tracing::instrument(skip(storage))]
  pub fn load(storage: S) -> Self {
    let tasks = match storage
      .get_item(TASKS_STORAGE_KEY)
    {
      | Ok(Some(raw)) => {
        match decode_tasks(&raw) {
          | Ok(tasks) => tasks,
          | Err(error) => {
            warn!(
              %error,
              "persisted tasks are \
               unparsable; starting empty"
            );
            Vec::new()
          }
        }
      }
      | Ok(None) => {
        debug!(
          "no persisted tasks; starting \
           empty"
        );
        Vec::new()
      }
      | Err(error) => {
        warn!(
          %error,
          "failed reading persisted \
           tasks; starting empty"
        );
        Vec::new()
      }
    };

    info!(
      count = tasks.len(),
      "loaded task collection"
    );
    Self { tasks, storage }
  }

  /// Appends a new pending task. The
  /// text is trimmed; an empty result is
  /// rejected without touching the
  /// collection.
  #[tracing::instrument(skip(self, text, now), fields(date = %date))]
  pub fn create(
    &mut self,
    text: &str,
    date: NaiveDate,
    now: DateTime<Utc>
  ) -> Result<TaskId, StoreError> {
    let text = text.trim();
    if text.is_empty() {
      debug!("rejected empty task text");
      return Err(
        ValidationError::EmptyDescription
          .into()
      );
    }

    let id = self.next_id(now);
    self.tasks.push(Task::new_pending(
      id,
      text.to_string(),
      date
    ));
    info!(id = %id, "created task");

    self.persist()?;
    Ok(id)
  }

  /// Flips `completed` and returns the
  /// new value, or `None` when no task
  /// has `id`.
  #[tracing::instrument(skip(self), fields(id = %id))]
  pub fn toggle_completion(
    &mut self,
    id: TaskId
  ) -> Result<Option<bool>, StoreError>
  {
    let toggled = self
      .tasks
      .iter_mut()
      .find(|task| task.id == id)
      .map(|task| {
        task.completed = !task.completed;
        task.completed
      });

    match toggled {
      | Some(completed) => {
        info!(completed, "toggled task")
      }
      | None => {
        debug!("toggle on unknown task id")
      }
    }

    self.persist()?;
    Ok(toggled)
  }

  #[tracing::instrument(skip(self), fields(id = %id))]
  pub fn remove(
    &mut self,
    id: TaskId
  ) -> Result<Option<Task>, StoreError>
  {
    let removed = self
      .tasks
      .iter()
      .position(|task| task.id == id)
      .map(|idx| self.tasks.remove(idx));

    if removed.is_some() {
      info!("removed task");
    } else {
      debug!("remove on unknown task id");
    }

    self.persist()?;
    Ok(removed)
  }

  /// Tasks on `date` in insertion order.
  /// The iterator is a plain read and
  /// can be cloned to walk it again.
  pub fn filter_by_date(
    &self,
    date: NaiveDate
  ) -> impl Iterator<Item = &Task> + Clone + '_
  {
    self
      .tasks
      .iter()
      .filter(move |task| task.is_on(date))
  }

  pub fn has_task_on(
    &self,
    date: NaiveDate
  ) -> bool {
    self
      .tasks
      .iter()
      .any(|task| task.is_on(date))
  }

  pub fn get(
    &self,
    id: TaskId
  ) -> Option<&Task> {
    self
      .tasks
      .iter()
      .find(|task| task.id == id)
  }

  pub fn tasks(&self) -> &[Task] {
    &self.tasks
  }

  pub fn len(&self) -> usize {
    self.tasks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tasks.is_empty()
  }

  pub fn storage(&self) -> &S {
    &self.storage
  }

  pub fn storage_mut(
    &mut self
  ) -> &mut S {
    &mut self.storage
  }

  fn next_id(
    &self,
    now: DateTime<Utc>
  ) -> TaskId {
    let candidate =
      TaskId::from_timestamp(now);
    match self
      .tasks
      .iter()
      .map(|task| task.id)
      .max()
    {
      | Some(max) if max >= candidate => {
        max.next()
      }
      | _ => candidate
    }
  }

  fn persist(
    &mut self
  ) -> Result<(), StoreError> {
    let json = encode_tasks(&self.tasks)?;
    self
      .storage
      .set_item(TASKS_STORAGE_KEY, &json)
      .map_err(|source| {
        StoreError::Persist {
          key: TASKS_STORAGE_KEY,
          source
        }
      })?;
    debug!(
      count = self.tasks.len(),
      bytes = json.len(),
      "persisted task collection"
    );
    Ok(())
  }
}

pub fn encode_tasks(
  tasks: &[Task]
) -> Result<String, serde_json::Error> {
  serde_json::to_string(tasks)
}

pub fn decode_tasks(
  raw: &str
) -> Result<Vec<Task>, serde_json::Error>
{
  serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
  use chrono::{
    DateTime,
    NaiveDate,
    TimeZone,
    Utc
  };

  use super::{
    TaskStore,
    decode_tasks,
    encode_tasks
  };
  use crate::error::{
    StoreError,
    ValidationError
  };
  use crate::storage::{
    MemoryStorage,
    TASKS_STORAGE_KEY
  };
  use crate::task::TaskId;

  fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d)
      .expect("valid date")
  }

  fn now() -> DateTime<Utc> {
    Utc
      .with_ymd_and_hms(
        2024, 5, 1, 9, 30, 0
      )
      .single()
      .expect("valid now")
  }

  fn empty_store()
  -> TaskStore<MemoryStorage> {
    TaskStore::load(MemoryStorage::new())
  }

  #[test]
  fn create_adds_one_pending_task_on_the_date()
  {
    let mut store = empty_store();
    store
      .create("Water plants", day(10), now())
      .expect("create");
    let before =
      store.filter_by_date(day(10)).count();

    let id = store
      .create("  Buy milk ", day(10), now())
      .expect("create");

    let matching: Vec<_> = store
      .filter_by_date(day(10))
      .collect();
    assert_eq!(matching.len(), before + 1);
    let created =
      store.get(id).expect("created task");
    assert_eq!(created.text, "Buy milk");
    assert!(!created.completed);
    assert_eq!(
      store.filter_by_date(day(11)).count(),
      0
    );
  }

  #[test]
  fn whitespace_text_is_rejected_without_mutation()
  {
    let mut store = empty_store();
    store
      .create("Keep me", day(3), now())
      .expect("create");

    for text in ["", "   ", "\t\n"] {
      let err = store
        .create(text, day(3), now())
        .expect_err("empty text rejected");
      assert!(matches!(
        err,
        StoreError::Validation(
          ValidationError::EmptyDescription
        )
      ));
    }
    assert_eq!(store.len(), 1);
  }

  #[test]
  fn ids_stay_unique_within_one_millisecond()
  {
    let mut store = empty_store();
    let first = store
      .create("a", day(1), now())
      .expect("create");
    let second = store
      .create("b", day(1), now())
      .expect("create");
    assert_eq!(
      first,
      TaskId::from_timestamp(now())
    );
    assert_eq!(second, first.next());
  }

  #[test]
  fn toggle_twice_restores_completion() {
    let mut store = empty_store();
    let id = store
      .create("Read", day(7), now())
      .expect("create");
    let original =
      store.get(id).cloned().expect("task");

    assert_eq!(
      store
        .toggle_completion(id)
        .expect("toggle"),
      Some(true)
    );
    assert_eq!(
      store
        .toggle_completion(id)
        .expect("toggle"),
      Some(false)
    );
    assert_eq!(
      store.get(id),
      Some(&original)
    );
  }

  #[test]
  fn toggle_unknown_id_is_a_noop() {
    let mut store = empty_store();
    store
      .create("Read", day(7), now())
      .expect("create");
    let snapshot = store.tasks().to_vec();

    assert_eq!(
      store
        .toggle_completion(TaskId(1))
        .expect("toggle"),
      None
    );
    assert_eq!(store.tasks(), &snapshot[..]);
  }

  #[test]
  fn remove_drops_exactly_one_task() {
    let mut store = empty_store();
    let keep = store
      .create("Keep", day(2), now())
      .expect("create");
    let gone = store
      .create("Drop", day(2), now())
      .expect("create");

    let removed = store
      .remove(gone)
      .expect("remove")
      .expect("task existed");
    assert_eq!(removed.text, "Drop");
    assert_eq!(store.len(), 1);
    assert!(store.get(gone).is_none());
    assert!(store.get(keep).is_some());

    assert!(
      store
        .remove(gone)
        .expect("remove")
        .is_none()
    );
    assert_eq!(store.len(), 1);
  }

  #[test]
  fn every_mutation_rewrites_storage() {
    let mut store = empty_store();
    let id = store
      .create("Persist me", day(4), now())
      .expect("create");
    let raw = store
      .storage()
      .raw(TASKS_STORAGE_KEY)
      .expect("tasks written");
    let persisted =
      decode_tasks(raw).expect("decode");
    assert_eq!(persisted, store.tasks());

    store
      .toggle_completion(id)
      .expect("toggle");
    let raw = store
      .storage()
      .raw(TASKS_STORAGE_KEY)
      .expect("tasks written");
    assert!(raw.contains(r#""completed":true"#));

    store.remove(id).expect("remove");
    assert_eq!(
      store
        .storage()
        .raw(TASKS_STORAGE_KEY),
      Some("[]")
    );
  }

  #[test]
  fn reload_reads_back_the_same_collection()
  {
    let mut store = empty_store();
    store
      .create("one", day(1), now())
      .expect("create");
    let id = store
      .create("two", day(9), now())
      .expect("create");
    store
      .toggle_completion(id)
      .expect("toggle");

    let json = encode_tasks(store.tasks())
      .expect("encode");
    assert_eq!(
      decode_tasks(&json).expect("decode"),
      store.tasks()
    );

    let reloaded = TaskStore::load(
      MemoryStorage::new()
        .with_item(TASKS_STORAGE_KEY, &json)
    );
    assert_eq!(
      reloaded.tasks(),
      store.tasks()
    );
  }

  #[test]
  fn garbage_in_storage_loads_empty() {
    let store = TaskStore::load(
      MemoryStorage::new().with_item(
        TASKS_STORAGE_KEY,
        "{not json"
      )
    );
    assert!(store.is_empty());
  }

  #[test]
  fn filter_is_restartable_and_ordered() {
    let mut store = empty_store();
    store
      .create("first", day(5), now())
      .expect("create");
    store
      .create("other day", day(6), now())
      .expect("create");
    store
      .create("second", day(5), now())
      .expect("create");

    let filtered =
      store.filter_by_date(day(5));
    let texts: Vec<&str> = filtered
      .clone()
      .map(|task| task.text.as_str())
      .collect();
    assert_eq!(texts, ["first", "second"]);
    assert_eq!(filtered.count(), 2);
    assert!(store.has_task_on(day(6)));
    assert!(!store.has_task_on(day(7)));
  }
}
