#![doc = include_str!("../README.md")]

mod preference;
mod store;

pub use preference::TomlPreference;
pub use store::TomlStorageStore;

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use unic_langid::{LanguageIdentifier, LanguageIdentifierError};

/// Name of the configuration file looked up in a manifest directory.
pub const CONFIG_FILE: &str = "localize.toml";

#[derive(Debug, Error)]
pub enum LocalizeConfigError {
    /// Configuration file not found.
    #[error("localize.toml configuration file not found")]
    NotFound,
    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Failed to serialize the configuration.
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),
    /// Encountered an invalid fallback language identifier.
    #[error("Invalid fallback language identifier '{name}'")]
    InvalidFallbackLanguage {
        /// The invalid identifier.
        name: String,
        /// The parsing error produced by `unic-langid`.
        #[source]
        source: LanguageIdentifierError,
    },
    /// Encountered an invalid identifier in the `languages` list.
    #[error("Invalid language identifier '{name}' in the languages list")]
    InvalidLanguage {
        name: String,
        #[source]
        source: LanguageIdentifierError,
    },
}

/// The configuration for `res-localize`, read from `localize.toml`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct LocalizeConfig {
    /// The language a fresh storage starts with (e.g., "en").
    pub fallback_language: String,
    /// Path of the storage file, relative to the manifest directory.
    pub storage_path: PathBuf,
    /// Optional path of the preferred-language file.
    /// Without it the preference only lives as long as the process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences_path: Option<PathBuf>,
    /// Extra languages added when a storage is created from scratch.
    ///
    /// ```toml
    /// languages = ["fr", "de"]
    /// ```
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
}

impl LocalizeConfig {
    pub fn new(fallback_language: impl Into<String>, storage_path: impl Into<PathBuf>) -> Self {
        Self {
            fallback_language: fallback_language.into(),
            storage_path: storage_path.into(),
            preferences_path: None,
            languages: None,
        }
    }

    /// Reads the configuration from a path.
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, LocalizeConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(LocalizeConfigError::NotFound);
        }

        let content = fs_err::read_to_string(path)?;
        let config: LocalizeConfig = toml::from_str(&content)?;

        Ok(config)
    }

    /// Reads the configuration from the manifest directory.
    pub fn read_from_manifest_dir() -> Result<Self, LocalizeConfigError> {
        let manifest_dir =
            env::var("CARGO_MANIFEST_DIR").map_err(|_| LocalizeConfigError::NotFound)?;
        Self::from_manifest_dir(Path::new(&manifest_dir))
    }

    /// Reads `localize.toml` from the given directory.
    pub fn from_manifest_dir(manifest_dir: &Path) -> Result<Self, LocalizeConfigError> {
        Self::read_from_path(manifest_dir.join(CONFIG_FILE))
    }

    /// Writes the configuration, creating parent directories as needed.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), LocalizeConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)?;
        }
        fs_err::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Returns the configured fallback language as a `LanguageIdentifier`.
    pub fn fallback_language_identifier(&self) -> Result<LanguageIdentifier, LocalizeConfigError> {
        self.fallback_language
            .parse::<LanguageIdentifier>()
            .map_err(|source| LocalizeConfigError::InvalidFallbackLanguage {
                name: self.fallback_language.clone(),
                source,
            })
    }

    /// The fallback language followed by every configured language, without
    /// duplicates and in declaration order.
    pub fn bootstrap_languages(&self) -> Result<Vec<LanguageIdentifier>, LocalizeConfigError> {
        let mut languages = vec![self.fallback_language_identifier()?];

        for name in self.languages.iter().flatten() {
            let lang = name.parse::<LanguageIdentifier>().map_err(|source| {
                LocalizeConfigError::InvalidLanguage {
                    name: name.clone(),
                    source,
                }
            })?;
            if !languages.contains(&lang) {
                languages.push(lang);
            }
        }

        Ok(languages)
    }

    /// Returns the storage path from a base directory.
    /// If `base_dir` is `None`, uses `CARGO_MANIFEST_DIR` environment variable.
    pub fn storage_path_from_base(
        &self,
        base_dir: Option<&Path>,
    ) -> Result<PathBuf, LocalizeConfigError> {
        Ok(resolve_base(base_dir)?.join(&self.storage_path))
    }

    /// Returns the preferences path from a base directory, if one is configured.
    pub fn preferences_path_from_base(
        &self,
        base_dir: Option<&Path>,
    ) -> Result<Option<PathBuf>, LocalizeConfigError> {
        match &self.preferences_path {
            Some(path) => Ok(Some(resolve_base(base_dir)?.join(path))),
            None => Ok(None),
        }
    }
}

fn resolve_base(base_dir: Option<&Path>) -> Result<PathBuf, LocalizeConfigError> {
    match base_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => env::var("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .map_err(|_| LocalizeConfigError::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_from_path_success() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE);

        let config_content = r#"
fallback_language = "en"
storage_path = "localization/storage.toml"
"#;

        fs::write(&config_path, config_content).unwrap();

        let config = LocalizeConfig::read_from_path(&config_path).unwrap();
        assert_eq!(config.fallback_language, "en");
        assert_eq!(config.storage_path, PathBuf::from("localization/storage.toml"));
        assert!(config.preferences_path.is_none());
        assert!(config.languages.is_none());
    }

    #[test]
    fn test_read_from_path_file_not_found() {
        let result = LocalizeConfig::read_from_path("/non/existent/path/localize.toml");
        assert!(matches!(result, Err(LocalizeConfigError::NotFound)));
    }

    #[test]
    fn test_read_from_path_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE);

        let invalid_config = r#"
fallback_language = "en"
[invalid_section]
storage_path = "storage.toml"
"#;

        fs::write(&config_path, invalid_config).unwrap();

        let result = LocalizeConfig::read_from_path(&config_path);
        assert!(matches!(result, Err(LocalizeConfigError::ParseError(_))));
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join(CONFIG_FILE);

        let mut config = LocalizeConfig::new("en", "storage.toml");
        config.preferences_path = Some(PathBuf::from("prefs.toml"));
        config.languages = Some(vec!["fr".to_string()]);
        config.write_to_path(&config_path).unwrap();

        assert_eq!(LocalizeConfig::read_from_path(&config_path).unwrap(), config);
    }

    #[test]
    fn test_fallback_language_identifier_invalid() {
        let config = LocalizeConfig::new("invalid-lang!", "storage.toml");

        let result = config.fallback_language_identifier();

        assert!(matches!(
            result,
            Err(LocalizeConfigError::InvalidFallbackLanguage { name, .. })
                if name == "invalid-lang!"
        ));
    }

    #[test]
    fn test_bootstrap_languages_dedups_and_keeps_order() {
        let mut config = LocalizeConfig::new("en-US", "storage.toml");
        config.languages = Some(vec!["fr".into(), "en-US".into(), "de".into(), "fr".into()]);

        let codes: Vec<String> = config
            .bootstrap_languages()
            .unwrap()
            .into_iter()
            .map(|lang| lang.to_string())
            .collect();

        assert_eq!(codes, vec!["en-US", "fr", "de"]);
    }

    #[test]
    fn test_bootstrap_languages_rejects_invalid_entries() {
        let mut config = LocalizeConfig::new("en", "storage.toml");
        config.languages = Some(vec!["fr".into(), "not valid".into()]);

        let result = config.bootstrap_languages();
        assert!(matches!(
            result,
            Err(LocalizeConfigError::InvalidLanguage { name, .. }) if name == "not valid"
        ));
    }

    #[test]
    fn test_paths_from_explicit_base() {
        let mut config = LocalizeConfig::new("en", "localization/storage.toml");
        let base = Path::new("/project");

        assert_eq!(
            config.storage_path_from_base(Some(base)).unwrap(),
            PathBuf::from("/project/localization/storage.toml")
        );
        assert_eq!(config.preferences_path_from_base(Some(base)).unwrap(), None);

        config.preferences_path = Some(PathBuf::from("prefs.toml"));
        assert_eq!(
            config.preferences_path_from_base(Some(base)).unwrap(),
            Some(PathBuf::from("/project/prefs.toml"))
        );
    }

    #[test]
    #[serial]
    fn test_paths_from_manifest_dir_env() {
        let config = LocalizeConfig::new("en", "storage.toml");

        temp_env::with_var("CARGO_MANIFEST_DIR", Some("/crate/root"), || {
            assert_eq!(
                config.storage_path_from_base(None).unwrap(),
                PathBuf::from("/crate/root/storage.toml")
            );
        });

        temp_env::with_var_unset("CARGO_MANIFEST_DIR", || {
            assert!(matches!(
                config.storage_path_from_base(None),
                Err(LocalizeConfigError::NotFound)
            ));
        });
    }

    #[test]
    #[serial]
    fn test_read_from_manifest_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE),
            "fallback_language = \"fr\"\nstorage_path = \"s.toml\"\n",
        )
        .unwrap();

        temp_env::with_var("CARGO_MANIFEST_DIR", Some(temp_dir.path()), || {
            let config = LocalizeConfig::read_from_manifest_dir().unwrap();
            assert_eq!(config.fallback_language, "fr");
        });
    }
}
