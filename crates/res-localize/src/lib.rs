#![doc = include_str!("../README.md")]

pub use res_localize_core::{
    AssetRecord, AssetRef, AssetRegistry, BoundResource, ControllerState, Direction, EntryId,
    Language, LanguagePreference, LocalizationController, LocalizationEntry, LocalizationError,
    LocalizationMetrics, LocalizationStorage, LocalizedComponent, MemoryPreference, MemoryStore,
    MetricsReport, Resource, ResourceData, SharedStorage, StorageStore, ValueType,
};

pub use res_localize_core::fallback;

#[doc(hidden)]
pub use unic_langid;

#[cfg(feature = "toml")]
mod bootstrap;

#[cfg(feature = "toml")]
pub use bootstrap::{BootstrapError, load_or_create_storage, open_controller};

#[cfg(feature = "toml")]
pub use res_localize_toml::{LocalizeConfig, LocalizeConfigError, TomlPreference, TomlStorageStore};
