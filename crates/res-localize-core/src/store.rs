//! Persistence seams. The core never encodes bytes itself; collaborators
//! implement these traits over whatever record store the host uses.

use crate::storage::LocalizationStorage;
use parking_lot::Mutex;
use unic_langid::LanguageIdentifier;

/// Loads and saves a whole storage.
pub trait StorageStore: Send + Sync {
    fn load(&self) -> anyhow::Result<LocalizationStorage>;
    fn save(&self, storage: &LocalizationStorage) -> anyhow::Result<()>;
}

/// Persists the user's preferred language between sessions.
pub trait LanguagePreference: Send + Sync {
    /// `Ok(None)` when no preference has been stored yet.
    fn load(&self) -> anyhow::Result<Option<LanguageIdentifier>>;
    fn store(&self, language: &LanguageIdentifier) -> anyhow::Result<()>;
}

/// Process-local preference, forgotten when dropped.
#[derive(Debug, Default)]
pub struct MemoryPreference {
    language: Mutex<Option<LanguageIdentifier>>,
}

impl MemoryPreference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(language: LanguageIdentifier) -> Self {
        Self {
            language: Mutex::new(Some(language)),
        }
    }

    pub fn get(&self) -> Option<LanguageIdentifier> {
        self.language.lock().clone()
    }
}

impl LanguagePreference for MemoryPreference {
    fn load(&self) -> anyhow::Result<Option<LanguageIdentifier>> {
        Ok(self.get())
    }

    fn store(&self, language: &LanguageIdentifier) -> anyhow::Result<()> {
        *self.language.lock() = Some(language.clone());
        Ok(())
    }
}

impl<T: LanguagePreference + ?Sized> LanguagePreference for std::sync::Arc<T> {
    fn load(&self) -> anyhow::Result<Option<LanguageIdentifier>> {
        (**self).load()
    }

    fn store(&self, language: &LanguageIdentifier) -> anyhow::Result<()> {
        (**self).store(language)
    }
}

/// Keeps the last saved snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<LocalizationStorage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageStore for MemoryStore {
    fn load(&self) -> anyhow::Result<LocalizationStorage> {
        self.snapshot
            .lock()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No storage has been saved to this memory store"))
    }

    fn save(&self, storage: &LocalizationStorage) -> anyhow::Result<()> {
        *self.snapshot.lock() = Some(storage.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use unic_langid::langid;

    #[test]
    fn memory_preference_starts_empty() {
        let preference = MemoryPreference::new();
        assert_eq!(preference.load().unwrap(), None);

        preference.store(&langid!("fr")).unwrap();
        assert_eq!(preference.load().unwrap(), Some(langid!("fr")));
    }

    #[test]
    fn memory_store_fails_before_first_save() {
        let store = MemoryStore::new();
        assert!(store.load().is_err());

        let storage = LocalizationStorage::new(Language::new(langid!("en")));
        store.save(&storage).unwrap();
        assert_eq!(store.load().unwrap().languages().len(), 1);
    }
}
