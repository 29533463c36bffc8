use daybook_model::{
  KeyValueStore,
  MemoryStorage,
  StorageError
};

/// `window.localStorage`, or an in-memory
/// map when the browser refuses access
/// (private windows, disabled storage).
#[derive(Debug)]
pub enum BrowserStorage {
  Local(web_sys::Storage),
  Memory(MemoryStorage)
}

impl BrowserStorage {
  pub fn open() -> Self {
    let local = web_sys::window()
      .and_then(|window| {
        window
          .local_storage()
          .ok()
          .flatten()
      });

    match local {
      | Some(storage) => {
        Self::Local(storage)
      }
      | None => {
        tracing::warn!(
          "localStorage unavailable; \
           changes will not survive a \
           reload"
        );
        Self::Memory(MemoryStorage::new())
      }
    }
  }
}

impl KeyValueStore for BrowserStorage {
  fn get_item(
    &self,
    key: &str
  ) -> Result<Option<String>, StorageError>
  {
    match self {
      | Self::Local(storage) => {
        storage.get_item(key).map_err(
          |err| {
            StorageError::Unavailable(
              format!("{err:?}")
            )
          }
        )
      }
      | Self::Memory(memory) => {
        memory.get_item(key)
      }
    }
  }

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), StorageError> {
    match self {
      | Self::Local(storage) => {
        storage.set_item(key, value).map_err(
          |err| StorageError::Write {
            key:     key.to_string(),
            message: format!("{err:?}")
          }
        )
      }
      | Self::Memory(memory) => {
        memory.set_item(key, value)
      }
    }
  }
}
