use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use daybook_model::{KeyValueStore, StorageError};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Key-value slots kept as one file per key (`<key>.data`) inside the
/// data directory. Writes go through a temp file and a rename.
#[derive(Debug)]
pub struct FileStorage {
    pub data_dir: PathBuf,
}

impl FileStorage {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(data_dir)?;
        info!(data_dir = %data_dir.display(), "opened file storage");
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
        })
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.data_dir.join(format!("{safe}.data"))
    }
}

impl KeyValueStore for FileStorage {
    #[tracing::instrument(skip(self))]
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => {
                debug!(file = %path.display(), bytes = raw.len(), "read slot");
                Ok(Some(raw))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    #[tracing::instrument(skip(self, value))]
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        debug!(file = %path.display(), bytes = value.len(), "writing slot atomically");

        let mut temp = NamedTempFile::new_in(&self.data_dir)?;
        temp.write_all(value.as_bytes())?;
        temp.flush()?;
        temp.persist(&path).map_err(|err| StorageError::Write {
            key: key.to_string(),
            message: format!("failed to persist {}: {}", path.display(), err),
        })?;

        Ok(())
    }
}
