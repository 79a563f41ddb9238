//! User settings (`config.toml`).
//!
//! ```toml
//! version = "ps6"
//! uppercase_names = true
//! ```

use directories::ProjectDirs;
use serde::Deserialize;
use sheetflow_core::SheetOptions;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 65_536;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Version tag written to and required of spreadsheet files
    pub version: Option<String>,
    /// Treat cell names case-insensitively by upper-casing them
    #[serde(default)]
    pub uppercase_names: bool,
}

impl Settings {
    pub fn sheet_options(&self, version_override: Option<&str>) -> SheetOptions {
        let mut options = match version_override.or(self.version.as_deref()) {
            Some(version) => SheetOptions::new(version),
            None => SheetOptions::default(),
        };
        if self.uppercase_names {
            options = options.uppercase_names();
        }
        options
    }
}

/// Load settings from `config_file`, or from the user config dir when none is
/// given. Problems are returned as warnings and the defaults are used.
pub fn load_settings(config_file: Option<&Path>) -> (Settings, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.map(Path::to_path_buf).or_else(user_config_path) else {
        return (Settings::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Settings::default(), warnings);
    }

    let settings = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<Settings>(&content) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            None
        }
    };

    (settings.unwrap_or_default(), warnings)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "sheetflow")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_settings_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "version = \"ps6\"\nuppercase_names = true\n").unwrap();

        let (settings, warnings) = load_settings(Some(path.as_path()));
        assert!(warnings.is_empty());
        assert_eq!(settings.version.as_deref(), Some("ps6"));
        assert!(settings.uppercase_names);
    }

    #[test]
    fn load_settings_warns_on_missing_explicit_file() {
        let dir = tempdir().unwrap();
        let (settings, warnings) = load_settings(Some(dir.path().join("nope.toml").as_path()));
        assert!(settings.version.is_none());
        assert!(warnings.iter().any(|w| w.contains("not found")));
    }

    #[test]
    fn load_settings_falls_back_on_bad_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "version = [\n").unwrap();

        let (settings, warnings) = load_settings(Some(path.as_path()));
        assert!(settings.version.is_none());
        assert!(!settings.uppercase_names);
        assert!(warnings.iter().any(|w| w.contains("Failed to parse")));
    }

    #[test]
    fn load_settings_rejects_unknown_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "colour = \"blue\"\n").unwrap();

        let (_, warnings) = load_settings(Some(path.as_path()));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn load_settings_rejects_oversized_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "#".repeat(MAX_CONFIG_FILE_BYTES as usize + 1)).unwrap();

        let (_, warnings) = load_settings(Some(path.as_path()));
        assert!(warnings.iter().any(|w| w.contains("file too large")));
    }

    #[test]
    fn sheet_options_prefers_override() {
        let settings = Settings {
            version: Some("from-file".to_string()),
            uppercase_names: false,
        };
        assert_eq!(settings.sheet_options(None).version, "from-file");
        assert_eq!(settings.sheet_options(Some("cli")).version, "cli");
        assert_eq!(Settings::default().sheet_options(None).version, "default");
    }
}
