use std::collections::BTreeMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use tracing::{
  debug,
  info,
  trace,
  warn
};

pub const RC_ENV_VAR: &str = "DAYBOOKRC";
const RC_FILE_NAME: &str = ".daybookrc";
const DEFAULT_DATA_LOCATION: &str =
  "~/.daybook";

/// Settings from the rc file plus
/// command-line overrides.
#[derive(Debug, Clone)]
pub struct Config {
  values:           BTreeMap<String, String>,
  pub loaded_files: Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    let mut values = BTreeMap::new();
    values.insert(
      "data.location".to_string(),
      DEFAULT_DATA_LOCATION.to_string()
    );
    values.insert(
      "color".to_string(),
      "on".to_string()
    );
    Self {
      values,
      loaded_files: Vec::new()
    }
  }
}

impl Config {
  #[tracing::instrument]
  pub fn load(
    rc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Self::default();

    match resolve_rc_path(rc_override)? {
      | Some(path) => {
        info!(rc = %path.display(), "loading daybookrc");
        cfg.read_file(&path)?;
      }
      | None => {
        debug!(
          "no daybookrc found; using \
           defaults"
        );
      }
    }

    Ok(cfg)
  }

  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (key, value) in overrides {
      debug!(key = %key, value = %value, "applying override");
      self.values.insert(key, value);
    }
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<&str> {
    self
      .values
      .get(key)
      .map(String::as_str)
      .filter(|value| !value.is_empty())
  }

  pub fn get_bool(
    &self,
    key: &str
  ) -> anyhow::Result<Option<bool>> {
    self
      .get(key)
      .map(|raw| parse_bool(key, raw))
      .transpose()
  }

  fn read_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    if self.loaded_files.contains(&path) {
      warn!(file = %path.display(), "rc file already loaded; skipping include cycle");
      return Ok(());
    }

    let text = fs::read_to_string(&path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    self.loaded_files.push(path.clone());

    let base_dir = path
      .parent()
      .map(Path::to_path_buf)
      .unwrap_or_else(|| {
        PathBuf::from(".")
      });

    for (idx, raw_line) in
      text.lines().enumerate()
    {
      let line = raw_line
        .split_once('#')
        .map_or(raw_line, |(before, _)| {
          before
        })
        .trim();
      if line.is_empty() {
        continue;
      }

      if let Some(include) =
        line.strip_prefix("include ")
      {
        let include_path = resolve_include(
          &base_dir,
          include.trim()
        )?;
        if include_path.exists() {
          self.read_file(&include_path)?;
        } else {
          warn!(include = %include_path.display(), "include file does not exist; skipping");
        }
        continue;
      }

      let (key, value) = line
        .split_once('=')
        .ok_or_else(|| {
          anyhow!(
            "invalid config line {}:{}: \
             {}",
            path.display(),
            idx + 1,
            raw_line
          )
        })?;
      let key = key.trim().to_string();
      let value = value.trim().to_string();
      trace!(key = %key, value = %value, "loaded config key");
      self.values.insert(key, value);
    }

    Ok(())
  }
}

/// `--data` wins over `data.location`.
/// The directory is created when
/// missing.
#[tracing::instrument(skip(cfg))]
pub fn resolve_data_dir(
  cfg: &Config,
  override_dir: Option<&Path>
) -> anyhow::Result<PathBuf> {
  let dir = match override_dir {
    | Some(path) => path.to_path_buf(),
    | None => expand_tilde(Path::new(
      cfg
        .get("data.location")
        .unwrap_or(DEFAULT_DATA_LOCATION)
    ))
  };

  if !dir.exists() {
    info!(dir = %dir.display(), "creating data directory");
    fs::create_dir_all(&dir)
      .with_context(|| {
        format!(
          "failed to create {}",
          dir.display()
        )
      })?;
  }

  Ok(dir)
}

fn resolve_rc_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(raw) = std::env::var(RC_ENV_VAR)
  {
    if raw == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(raw)));
  }

  Ok(dirs::home_dir()
    .map(|home| home.join(RC_FILE_NAME))
    .filter(|candidate| candidate.exists()))
}

fn resolve_include(
  base_dir: &Path,
  include: &str
) -> anyhow::Result<PathBuf> {
  if include.is_empty() {
    return Err(anyhow!(
      "include path cannot be empty"
    ));
  }

  let expanded =
    expand_tilde(Path::new(include));
  if expanded.is_absolute() {
    Ok(expanded)
  } else {
    Ok(base_dir.join(expanded))
  }
}

fn expand_tilde(path: &Path) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

fn parse_bool(
  key: &str,
  raw: &str
) -> anyhow::Result<bool> {
  match raw
    .trim()
    .to_ascii_lowercase()
    .as_str()
  {
    | "1" | "y" | "yes" | "on"
    | "true" => Ok(true),
    | "0" | "n" | "no" | "off"
    | "false" => Ok(false),
    | other => {
      Err(anyhow!(
        "invalid boolean for {key}: \
         {other}"
      ))
    }
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::{
    Config,
    resolve_data_dir
  };

  #[test]
  fn reads_keys_comments_and_includes() {
    let dir = tempdir().expect("tempdir");
    let extra = dir.path().join("extra.rc");
    fs::write(&extra, "timezone = Europe/Paris\n")
      .expect("write include");
    let rc = dir.path().join("daybookrc");
    fs::write(
      &rc,
      "# daybook settings\ncolor = off # \
       no ansi\ninclude extra.rc\n\n"
    )
    .expect("write rc");

    let cfg =
      Config::load(Some(&rc)).expect("load");
    assert_eq!(
      cfg.get_bool("color").expect("bool"),
      Some(false)
    );
    assert_eq!(
      cfg.get("timezone"),
      Some("Europe/Paris")
    );
    assert_eq!(cfg.loaded_files.len(), 2);
  }

  #[test]
  fn rejects_lines_without_equals() {
    let dir = tempdir().expect("tempdir");
    let rc = dir.path().join("daybookrc");
    fs::write(&rc, "color off\n")
      .expect("write rc");
    assert!(Config::load(Some(&rc)).is_err());
  }

  #[test]
  fn overrides_win_and_data_dir_is_created() {
    let dir = tempdir().expect("tempdir");
    let target = dir.path().join("nested/data");
    let mut cfg = Config::default();
    cfg.apply_overrides([(
      "data.location".to_string(),
      target.display().to_string()
    )]);

    let resolved = resolve_data_dir(&cfg, None)
      .expect("resolve data dir");
    assert_eq!(resolved, target);
    assert!(target.is_dir());
    assert!(
      cfg.get_bool("color").expect("bool")
        == Some(true)
    );
  }
}
