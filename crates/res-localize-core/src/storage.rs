//! The source of truth: ordered languages, entries with one slot per language,
//! and the version counter that invalidates every derived view.

use crate::entry::{EntryId, LocalizationEntry};
use crate::error::LocalizationError;
use crate::language::Language;
use crate::resource::{AssetRecord, AssetRef, AssetRegistry, Resource, ResourceData, ValueType};
use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use unic_langid::LanguageIdentifier;

/// Storage shared between controllers and editing collaborators.
pub type SharedStorage = Arc<RwLock<LocalizationStorage>>;

/// Languages and entries of one deployment.
///
/// Invariants:
/// - at least one language, no duplicate codes;
/// - every entry holds exactly `languages().len()` resources, slot `i` being
///   the value for `languages()[i]`;
/// - entry ids are unique;
/// - `version()` strictly increases on every structural mutation and never
///   changes otherwise.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "StorageRecord", into = "StorageRecord")]
pub struct LocalizationStorage {
    languages: Vec<Language>,
    entries: IndexMap<EntryId, LocalizationEntry>,
    version: u64,
    assets: AssetRegistry,
}

impl LocalizationStorage {
    pub fn new(initial: Language) -> Self {
        Self {
            languages: vec![initial],
            entries: IndexMap::new(),
            version: 0,
            assets: AssetRegistry::new(),
        }
    }

    pub fn into_shared(self) -> SharedStorage {
        Arc::new(RwLock::new(self))
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn entries(&self) -> impl ExactSizeIterator<Item = &LocalizationEntry> {
        self.entries.values()
    }

    pub fn entry_ids(&self) -> impl ExactSizeIterator<Item = &EntryId> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    /// Registering an asset does not touch any entry, so it does not bump the version.
    pub fn register_asset(
        &mut self,
        path: impl Into<String>,
        value_type: ValueType,
    ) -> AssetRef {
        self.assets.register(path, value_type)
    }

    /// Drops an asset record and empties every slot that referenced it.
    /// The version is bumped only when a slot was emptied.
    pub fn unregister_asset(&mut self, id: AssetRef) -> Result<AssetRecord, LocalizationError> {
        let record = self
            .assets
            .unregister(id)
            .ok_or(LocalizationError::AssetNotFound(id))?;

        let mut cleared = 0;
        for resource in self
            .entries
            .values_mut()
            .flat_map(|entry| entry.resources_mut())
        {
            if resource.data().as_asset() == Some(id) {
                resource.clear();
                cleared += 1;
            }
        }
        if cleared > 0 {
            tracing::debug!("Unregistered {} and emptied {} slots", id, cleared);
            self.bump_version();
        }
        Ok(record)
    }

    pub fn language_index(&self, code: &LanguageIdentifier) -> Option<usize> {
        self.languages.iter().position(|language| language == code)
    }

    pub fn contains_language(&self, code: &LanguageIdentifier) -> bool {
        self.language_index(code).is_some()
    }

    pub fn language(&self, code: &LanguageIdentifier) -> Option<&Language> {
        self.languages.iter().find(|language| *language == code)
    }

    fn require_language(&self, code: &LanguageIdentifier) -> Result<usize, LocalizationError> {
        self.language_index(code)
            .ok_or_else(|| LocalizationError::LanguageNotFound(code.clone()))
    }

    /// Signals an in-place edit made through [`entry_mut`](Self::entry_mut)
    /// or [`LocalizationEntry::resource_mut`].
    pub fn bump_version(&mut self) {
        self.version += 1;
    }

    pub fn add_language(&mut self, language: Language) -> Result<(), LocalizationError> {
        if self.contains_language(language.code()) {
            return Err(LocalizationError::DuplicateLanguage(language.code().clone()));
        }

        for entry in self.entries.values_mut() {
            entry.push_slot();
        }
        self.languages.push(language);
        self.bump_version();
        Ok(())
    }

    pub fn remove_language(
        &mut self,
        code: &LanguageIdentifier,
    ) -> Result<Language, LocalizationError> {
        let index = self.require_language(code)?;
        if self.languages.len() == 1 {
            return Err(LocalizationError::LastLanguageRemoval(code.clone()));
        }

        for entry in self.entries.values_mut() {
            entry.remove_slot(index);
        }
        let removed = self.languages.remove(index);
        self.bump_version();
        Ok(removed)
    }

    /// Moves a language to `new_index` (clamped to the last position), moving
    /// the matching slot of every entry along with it.
    pub fn move_language(
        &mut self,
        code: &LanguageIdentifier,
        new_index: usize,
    ) -> Result<(), LocalizationError> {
        let from = self.require_language(code)?;
        let to = new_index.min(self.languages.len() - 1);
        if from == to {
            return Ok(());
        }

        let language = self.languages.remove(from);
        self.languages.insert(to, language);
        for entry in self.entries.values_mut() {
            entry.move_slot(from, to);
        }
        self.bump_version();
        Ok(())
    }

    pub fn add_entry(&mut self, entry: LocalizationEntry) -> Result<(), LocalizationError> {
        self.check_entry(&entry)?;
        self.entries.insert(entry.id().clone(), entry);
        self.bump_version();
        Ok(())
    }

    fn check_entry(&self, entry: &LocalizationEntry) -> Result<(), LocalizationError> {
        if self.entries.contains_key(entry.id()) {
            return Err(LocalizationError::DuplicateId(entry.id().clone()));
        }
        if entry.resources().len() != self.languages.len() {
            return Err(LocalizationError::ResourceCountMismatch {
                expected: self.languages.len(),
                actual: entry.resources().len(),
            });
        }
        for resource in entry.resources() {
            self.check_asset(resource.data(), entry.value_type())?;
        }
        Ok(())
    }

    /// Asset data must point at a registered record of the slot's value type.
    fn check_asset(
        &self,
        data: &ResourceData,
        value_type: &ValueType,
    ) -> Result<(), LocalizationError> {
        let Some(asset) = data.as_asset() else {
            return Ok(());
        };
        let record = self
            .assets
            .get(asset)
            .ok_or(LocalizationError::AssetNotFound(asset))?;
        if &record.value_type != value_type {
            return Err(LocalizationError::TypeMismatch {
                expected: value_type.clone(),
                actual: format!("'{}' asset", record.value_type),
            });
        }
        Ok(())
    }

    pub fn remove_entry(&mut self, id: &EntryId) -> Result<LocalizationEntry, LocalizationError> {
        let entry = self
            .entries
            .shift_remove(id)
            .ok_or_else(|| LocalizationError::EntryNotFound(id.clone()))?;
        self.bump_version();
        Ok(entry)
    }

    pub fn contains_entry(&self, id: &EntryId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn entry(&self, id: &EntryId) -> Option<&LocalizationEntry> {
        self.entries.get(id)
    }

    /// Mutable access for in-place edits. Call [`bump_version`](Self::bump_version)
    /// afterwards so cached dictionaries are rebuilt.
    pub fn entry_mut(&mut self, id: &EntryId) -> Option<&mut LocalizationEntry> {
        self.entries.get_mut(id)
    }

    /// Projects every entry onto one language.
    pub fn get_dictionary(
        &self,
        code: &LanguageIdentifier,
    ) -> Result<FxHashMap<EntryId, Resource>, LocalizationError> {
        let index = self.require_language(code)?;
        Ok(self
            .entries
            .iter()
            .map(|(id, entry)| (id.clone(), entry.resources()[index].clone()))
            .collect())
    }

    /// The fallback entry for `value_type`. When several defaults match, the
    /// first one wins.
    pub fn get_default_entry(
        &self,
        value_type: &ValueType,
    ) -> Result<&LocalizationEntry, LocalizationError> {
        let mut defaults = self.defaults_of(value_type);
        let first = defaults
            .next()
            .ok_or_else(|| LocalizationError::DefaultNotFound(value_type.clone()))?;

        if defaults.next().is_some() {
            tracing::warn!(
                "Storage holds several default entries for '{}'; using '{}'",
                value_type,
                first.id()
            );
        }
        Ok(first)
    }

    fn defaults_of<'a, 'b>(
        &'a self,
        value_type: &'b ValueType,
    ) -> impl Iterator<Item = &'a LocalizationEntry> + 'b
    where
        'a: 'b,
    {
        self.entries_of_type(value_type)
            .filter(|entry| entry.is_default())
    }

    /// Value types that have more than one default entry.
    pub fn duplicate_default_types(&self) -> Vec<ValueType> {
        self.value_types()
            .into_iter()
            .filter(|value_type| self.defaults_of(value_type).count() > 1)
            .collect()
    }

    /// Distinct value types, in order of first appearance.
    pub fn value_types(&self) -> Vec<ValueType> {
        let mut types: Vec<ValueType> = Vec::new();
        for entry in self.entries.values() {
            if !types.contains(entry.value_type()) {
                types.push(entry.value_type().clone());
            }
        }
        types
    }

    pub fn entries_of_type<'a, 'b>(
        &'a self,
        value_type: &'b ValueType,
    ) -> impl Iterator<Item = &'a LocalizationEntry> + 'b
    where
        'a: 'b,
    {
        self.entries
            .values()
            .filter(move |entry| entry.value_type() == value_type)
    }

    /// Entries whose name contains `query`, ignoring case. An empty query
    /// matches everything.
    pub fn search(&self, query: &str) -> Vec<&LocalizationEntry> {
        let needle = query.trim().to_lowercase();
        self.entries
            .values()
            .filter(|entry| needle.is_empty() || entry.name().to_lowercase().contains(&needle))
            .collect()
    }

    pub fn set_resource_data(
        &mut self,
        id: &EntryId,
        code: &LanguageIdentifier,
        data: ResourceData,
    ) -> Result<(), LocalizationError> {
        let index = self.require_language(code)?;
        let value_type = self
            .entries
            .get(id)
            .map(|entry| entry.value_type().clone())
            .ok_or_else(|| LocalizationError::EntryNotFound(id.clone()))?;
        self.check_asset(&data, &value_type)?;

        if let Some(entry) = self.entries.get_mut(id) {
            entry.resources_mut()[index].set_data(data)?;
        }
        self.bump_version();
        Ok(())
    }

    pub fn rename_entry(
        &mut self,
        id: &EntryId,
        name: impl Into<String>,
    ) -> Result<(), LocalizationError> {
        self.entries
            .get_mut(id)
            .ok_or_else(|| LocalizationError::EntryNotFound(id.clone()))?
            .set_name(name);
        self.bump_version();
        Ok(())
    }

    /// Creates a tag whose every language starts with `data`.
    pub fn create_entry(
        &mut self,
        name: impl Into<String>,
        value_type: ValueType,
        data: ResourceData,
    ) -> Result<EntryId, LocalizationError> {
        let template = Resource::new(value_type, data)?;
        let entry = LocalizationEntry::replicated(name, &template, self.languages.len());
        let id = entry.id().clone();
        self.add_entry(entry)?;
        Ok(id)
    }

    /// Adds the default entry for a value type not yet known to the storage.
    pub fn register_value_type(
        &mut self,
        value_type: ValueType,
        default_data: ResourceData,
    ) -> Result<EntryId, LocalizationError> {
        if self.defaults_of(&value_type).next().is_some() {
            return Err(LocalizationError::DuplicateDefault(value_type));
        }

        let entry = LocalizationEntry::default_for(value_type, default_data, self.languages.len())?;
        let id = entry.id().clone();
        self.add_entry(entry)?;
        Ok(id)
    }

    /// Drops every entry of `value_type`, its default included. Returns how
    /// many entries were removed.
    pub fn remove_value_type(&mut self, value_type: &ValueType) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.value_type() != value_type);
        let removed = before - self.entries.len();
        if removed > 0 {
            self.bump_version();
        }
        removed
    }
}

#[derive(Serialize, Deserialize)]
struct StorageRecord {
    #[serde(default)]
    version: u64,
    languages: Vec<Language>,
    #[serde(default)]
    entries: Vec<LocalizationEntry>,
    #[serde(default)]
    assets: AssetRegistry,
}

impl TryFrom<StorageRecord> for LocalizationStorage {
    type Error = LocalizationError;

    fn try_from(record: StorageRecord) -> Result<Self, Self::Error> {
        let mut languages = record.languages.into_iter();
        let first = languages.next().ok_or(LocalizationError::NoLanguages)?;

        let mut storage = LocalizationStorage::new(first);
        storage.assets = record.assets;
        for language in languages {
            if storage.contains_language(language.code()) {
                return Err(LocalizationError::DuplicateLanguage(language.code().clone()));
            }
            storage.languages.push(language);
        }
        for entry in record.entries {
            storage.check_entry(&entry)?;
            storage.entries.insert(entry.id().clone(), entry);
        }
        storage.version = record.version;
        Ok(storage)
    }
}

impl From<LocalizationStorage> for StorageRecord {
    fn from(storage: LocalizationStorage) -> Self {
        Self {
            version: storage.version,
            languages: storage.languages,
            entries: storage.entries.into_values().collect(),
            assets: storage.assets,
        }
    }
}
