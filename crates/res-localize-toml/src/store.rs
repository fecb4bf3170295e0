use anyhow::Context as _;
use res_localize_core::{LocalizationStorage, StorageStore};
use std::path::{Path, PathBuf};

/// Keeps a whole [`LocalizationStorage`] in one TOML file.
///
/// Loading re-validates the storage invariants, so a hand-edited file with a
/// missing slot or a duplicate language is rejected instead of loaded.
#[derive(Clone, Debug)]
pub struct TomlStorageStore {
    path: PathBuf,
}

impl TomlStorageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

impl StorageStore for TomlStorageStore {
    fn load(&self) -> anyhow::Result<LocalizationStorage> {
        let content = fs_err::read_to_string(&self.path)?;
        let storage = toml::from_str(&content)
            .with_context(|| format!("Invalid storage file '{}'", self.path.display()))?;
        Ok(storage)
    }

    fn save(&self, storage: &LocalizationStorage) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs_err::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(storage).context("Failed to serialize storage")?;
        fs_err::write(&self.path, content)?;
        tracing::debug!(
            "Saved storage version {} to '{}'",
            storage.version(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use res_localize_core::{Language, LocalizationEntry, ResourceData, ValueType};
    use tempfile::TempDir;
    use unic_langid::langid;

    fn sample_storage() -> LocalizationStorage {
        let english = Language::with_display_name(langid!("en"), "English");
        let mut storage = LocalizationStorage::new(english);
        storage.add_language(Language::new(langid!("fr"))).unwrap();
        storage
            .register_value_type(ValueType::text(), ResourceData::text("Missing text"))
            .unwrap();
        storage
            .add_entry(
                LocalizationEntry::from_data(
                    "greeting",
                    ValueType::text(),
                    [ResourceData::text("Hello"), ResourceData::text("Bonjour")],
                )
                .unwrap(),
            )
            .unwrap();

        let sprite = ValueType::new("Sprite");
        let flag = storage.register_asset("ui/flag_en.png", sprite.clone());
        let id = storage.create_entry("Flag", sprite, ResourceData::Empty).unwrap();
        storage
            .set_resource_data(&id, &langid!("en"), flag.into())
            .unwrap();
        storage
    }

    #[test]
    fn save_then_load_preserves_everything() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("localization").join("storage.toml");
        let store = TomlStorageStore::new(path);
        assert!(!store.exists());

        let storage = sample_storage();
        store.save(&storage).unwrap();
        assert!(store.exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded.version(), storage.version());
        assert_eq!(loaded.languages(), storage.languages());
        assert_eq!(loaded.languages()[0].display_name(), "English");
        assert_eq!(loaded.assets(), storage.assets());
        assert_eq!(
            loaded.entries().collect::<Vec<_>>(),
            storage.entries().collect::<Vec<_>>()
        );
    }

    #[test]
    fn load_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlStorageStore::new(temp_dir.path().join("absent.toml"));
        assert!(store.load().is_err());
    }

    #[test]
    fn load_rejects_misaligned_entries() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.toml");
        fs_err::write(
            &path,
            r#"
version = 3

[[languages]]
code = "en"

[[languages]]
code = "fr"

[[entries]]
id = "greeting"
name = "Greeting"
value_type = "Text"

[[entries.resources]]
value_type = "Text"
data = { kind = "text", value = "Hello" }
"#,
        )
        .unwrap();

        let error = TomlStorageStore::new(&path).load().unwrap_err();
        assert!(format!("{error:#}").contains("2 languages"));
    }
}
