use tracing::{
  debug,
  warn
};

use crate::error::StoreError;
use crate::storage::{
  KeyValueStore,
  THEME_STORAGE_KEY
};

/// Spin duration of the theme icon after
/// a toggle, in milliseconds.
pub const ICON_SPIN_MS: u32 = 600;

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum ThemeMode {
  #[default]
  Light,
  Dark
}

impl ThemeMode {
  pub fn from_dark(dark: bool) -> Self {
    if dark { Self::Dark } else { Self::Light }
  }

  pub fn is_dark(self) -> bool {
    self == Self::Dark
  }

  pub fn next(self) -> Self {
    match self {
      | Self::Light => Self::Dark,
      | Self::Dark => Self::Light
    }
  }

  /// Body class; light mode has none.
  pub fn as_class(
    self
  ) -> Option<&'static str> {
    match self {
      | Self::Light => None,
      | Self::Dark => Some("dark-mode")
    }
  }

  pub fn storage_value(
    self
  ) -> &'static str {
    match self {
      | Self::Light => "false",
      | Self::Dark => "true"
    }
  }

  pub fn from_storage_value(
    raw: Option<&str>
  ) -> Self {
    Self::from_dark(raw == Some("true"))
  }

  pub fn icon(self) -> &'static str {
    match self {
      | Self::Light => "🌙",
      | Self::Dark => "☀️"
    }
  }

  /// Label of the button that switches
  /// away from this mode.
  pub fn toggle_label(
    self
  ) -> &'static str {
    match self {
      | Self::Light => "Dark Mode",
      | Self::Dark => "Light Mode"
    }
  }

  pub fn marker_color(
    self
  ) -> &'static str {
    match self {
      | Self::Light => "#fb8c00",
      | Self::Dark => "#ab47bc"
    }
  }

  #[tracing::instrument(skip(storage))]
  pub fn load<S: KeyValueStore>(
    storage: &S
  ) -> Self {
    match storage
      .get_item(THEME_STORAGE_KEY)
    {
      | Ok(raw) => {
        Self::from_storage_value(
          raw.as_deref()
        )
      }
      | Err(error) => {
        warn!(
          %error,
          "failed reading theme flag; \
           using light mode"
        );
        Self::Light
      }
    }
  }

  #[tracing::instrument(skip(storage))]
  pub fn save<S: KeyValueStore>(
    self,
    storage: &mut S
  ) -> Result<(), StoreError> {
    storage
      .set_item(
        THEME_STORAGE_KEY,
        self.storage_value()
      )
      .map_err(|source| {
        StoreError::Persist {
          key: THEME_STORAGE_KEY,
          source
        }
      })?;
    debug!(
      dark = self.is_dark(),
      "persisted theme flag"
    );
    Ok(())
  }
}
