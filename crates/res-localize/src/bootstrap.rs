//! Turning a `localize.toml` into a ready storage and controller.

use res_localize_core::{
    Language, LanguagePreference, LocalizationController, LocalizationError, LocalizationStorage,
    MemoryPreference, ResourceData, StorageStore as _, ValueType,
};
use res_localize_toml::{LocalizeConfig, LocalizeConfigError, TomlPreference, TomlStorageStore};
use std::path::Path;
use thiserror::Error;
use unic_langid::LanguageIdentifier;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] LocalizeConfigError),
    #[error(transparent)]
    Localization(#[from] LocalizationError),
    /// Reading or writing the storage file failed.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Loads the configured storage file, or creates it when it does not exist yet.
///
/// A new storage holds the fallback language, then every configured language,
/// and a default entry for the `Text` value type. It is saved before being
/// returned. `base_dir` is the directory `storage_path` is relative to; `None`
/// means `CARGO_MANIFEST_DIR`.
pub fn load_or_create_storage(
    config: &LocalizeConfig,
    base_dir: Option<&Path>,
) -> Result<LocalizationStorage, BootstrapError> {
    let store = TomlStorageStore::new(config.storage_path_from_base(base_dir)?);

    if store.exists() {
        let storage = store.load()?;
        tracing::debug!(
            "Loaded storage '{}' ({} languages, {} entries, version {})",
            store.path().display(),
            storage.languages().len(),
            storage.len(),
            storage.version()
        );
        return Ok(storage);
    }

    let storage = new_storage(config)?;
    store.save(&storage)?;
    tracing::info!(
        "Created localization storage '{}' with languages [{}]",
        store.path().display(),
        storage
            .languages()
            .iter()
            .map(|language| language.code().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(storage)
}

fn new_storage(config: &LocalizeConfig) -> Result<LocalizationStorage, BootstrapError> {
    let mut languages = config.bootstrap_languages()?.into_iter();
    let first = languages.next().ok_or(LocalizationError::NoLanguages)?;

    let mut storage = LocalizationStorage::new(Language::new(first));
    for code in languages {
        storage.add_language(Language::new(code))?;
    }
    storage.register_value_type(ValueType::text(), ResourceData::Empty)?;
    Ok(storage)
}

/// [`load_or_create_storage`] plus a controller over it.
///
/// The preferred language is kept in `preferences_path` when one is
/// configured, and only in memory otherwise. `host_language` falls back to
/// the process locale when `None`.
pub fn open_controller(
    config: &LocalizeConfig,
    base_dir: Option<&Path>,
    host_language: Option<LanguageIdentifier>,
) -> Result<LocalizationController, BootstrapError> {
    let storage = load_or_create_storage(config, base_dir)?.into_shared();

    let preference: Box<dyn LanguagePreference> =
        match config.preferences_path_from_base(base_dir)? {
            Some(path) => Box::new(TomlPreference::new(path)),
            None => Box::new(MemoryPreference::new()),
        };

    let controller = LocalizationController::builder()
        .storage(storage)
        .preference(preference)
        .maybe_host_language(host_language)
        .build()?;
    Ok(controller)
}
