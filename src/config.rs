use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Fallback gate secret for fresh checkouts; override it in the config file
const DEFAULT_PASSWORD: &str = "team-review";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
  /// Custom title for the header (defaults to "Portfolio")
  pub title: Option<String>,
  /// Path to an issue fixture; the embedded sample is used when unset
  pub data: Option<PathBuf>,
  #[serde(default)]
  pub access: AccessConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
  /// Shared secret for the access gate. This is prototype gating, not a
  /// security boundary.
  pub password: String,
  /// Skip the gate on later launches once it has been passed
  pub remember: bool,
}

impl Default for AccessConfig {
  fn default() -> Self {
    AccessConfig {
      password: DEFAULT_PASSWORD.to_string(),
      remember: true,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./trackboard.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/trackboard/config.yaml
  ///
  /// The config file is optional: with no file anywhere the defaults apply
  /// and the embedded sample data loads.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Config::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("trackboard.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("trackboard").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  pub fn title(&self) -> &str {
    self.title.as_deref().unwrap_or("Portfolio")
  }
}

/// Where the "gate already passed" marker lives
fn auth_flag_path() -> Option<PathBuf> {
  dirs::data_dir().map(|d| d.join("trackboard").join("authenticated"))
}

/// Whether a previous session already passed the gate
pub fn is_authenticated() -> bool {
  auth_flag_path().map(|p| p.exists()).unwrap_or(false)
}

/// Persist the gate flag so later launches skip straight to the dashboard
pub fn remember_authentication() -> Result<()> {
  let Some(path) = auth_flag_path() else {
    return Ok(()); // nowhere to persist on this platform; gate each launch
  };
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)
      .map_err(|e| eyre!("Failed to create {}: {}", parent.display(), e))?;
  }
  std::fs::write(&path, b"ok").map_err(|e| eyre!("Failed to write {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults_apply_without_file() {
    let config = Config::default();
    assert_eq!(config.title(), "Portfolio");
    assert_eq!(config.access.password, DEFAULT_PASSWORD);
    assert!(config.access.remember);
  }

  #[test]
  fn test_parse_partial_yaml() {
    let config: Config =
      serde_yaml::from_str("title: Q3 Transformations\naccess:\n  password: open-sesame\n")
        .unwrap();
    assert_eq!(config.title(), "Q3 Transformations");
    assert_eq!(config.access.password, "open-sesame");
    assert!(config.access.remember); // untouched default
    assert!(config.data.is_none());
  }

  #[test]
  fn test_missing_explicit_path_is_an_error() {
    let err = Config::load(Some(Path::new("/definitely/not/here.yaml"))).unwrap_err();
    assert!(err.to_string().contains("not found"));
  }
}
