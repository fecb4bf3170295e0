use anyhow::Context as _;
use res_localize_core::LanguagePreference;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use unic_langid::LanguageIdentifier;

#[derive(Debug, Default, Deserialize, Serialize)]
struct PreferenceFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

/// Stores the preferred language in a small TOML file:
///
/// ```toml
/// language = "fr"
/// ```
///
/// A missing file, a missing key and an unparsable code all read as "no
/// preference", so a broken file never blocks startup.
#[derive(Clone, Debug)]
pub struct TomlPreference {
    path: PathBuf,
}

impl TomlPreference {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LanguagePreference for TomlPreference {
    fn load(&self) -> anyhow::Result<Option<LanguageIdentifier>> {
        if !self.path.is_file() {
            return Ok(None);
        }

        let content = fs_err::read_to_string(&self.path)?;
        let file: PreferenceFile = match toml::from_str(&content) {
            Ok(file) => file,
            Err(error) => {
                tracing::warn!(
                    "Ignoring unreadable preference file '{}': {}",
                    self.path.display(),
                    error
                );
                return Ok(None);
            },
        };

        Ok(file.language.and_then(|code| match code.parse() {
            Ok(lang) => Some(lang),
            Err(_) => {
                tracing::warn!("Ignoring invalid preferred language '{}'", code);
                None
            },
        }))
    }

    fn store(&self, language: &LanguageIdentifier) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs_err::create_dir_all(parent)?;
        }
        let file = PreferenceFile {
            language: Some(language.to_string()),
        };
        let content = toml::to_string(&file).context("Failed to serialize preference")?;
        fs_err::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;
    use unic_langid::langid;

    #[test]
    fn missing_file_means_no_preference() {
        let temp_dir = TempDir::new().unwrap();
        let preference = TomlPreference::new(temp_dir.path().join("prefs.toml"));
        assert_eq!(preference.load().unwrap(), None);
    }

    #[test]
    fn store_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let preference = TomlPreference::new(temp_dir.path().join("nested").join("prefs.toml"));

        preference.store(&langid!("fr-CA")).unwrap();
        assert_eq!(preference.load().unwrap(), Some(langid!("fr-CA")));

        let written = fs_err::read_to_string(preference.path()).unwrap();
        assert_eq!(written.trim(), r#"language = "fr-CA""#);
    }

    #[rstest]
    #[case::empty_file("")]
    #[case::other_keys("theme = \"dark\"\n")]
    #[case::invalid_code("language = \"not a code\"\n")]
    #[case::not_toml("language = = fr")]
    fn unusable_content_reads_as_none(#[case] content: &str) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.toml");
        fs_err::write(&path, content).unwrap();

        assert_eq!(TomlPreference::new(path).load().unwrap(), None);
    }
}
