use std::collections::BTreeMap;

use crate::error::StorageError;

/// Key holding the JSON array of tasks.
pub const TASKS_STORAGE_KEY: &str =
  "tasks";
/// Key holding the dark mode flag as
/// `"true"` / `"false"`.
pub const THEME_STORAGE_KEY: &str =
  "darkMode";

/// Synchronous string key-value slots,
/// shaped after the browser's
/// `localStorage`.
pub trait KeyValueStore {
  fn get_item(
    &self,
    key: &str
  ) -> Result<Option<String>, StorageError>;

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
  items: BTreeMap<String, String>
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_item(
    mut self,
    key: &str,
    value: &str
  ) -> Self {
    self
      .items
      .insert(key.to_string(), value.to_string());
    self
  }

  pub fn raw(
    &self,
    key: &str
  ) -> Option<&str> {
    self.items.get(key).map(String::as_str)
  }
}

impl KeyValueStore for MemoryStorage {
  fn get_item(
    &self,
    key: &str
  ) -> Result<Option<String>, StorageError>
  {
    Ok(self.items.get(key).cloned())
  }

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError> {
    self
      .items
      .insert(key.to_string(), value.to_string());
    Ok(())
  }
}
