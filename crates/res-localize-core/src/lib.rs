#![doc = include_str!("../README.md")]

pub mod binding;
pub mod controller;
pub mod entry;
pub mod error;
pub mod fallback;
pub mod language;
pub mod metrics;
pub mod resource;
pub mod storage;
pub mod store;

pub use binding::{BoundResource, LocalizedComponent};
pub use controller::{ControllerState, Direction, LocalizationController};
pub use entry::{EntryId, LocalizationEntry};
pub use error::LocalizationError;
pub use language::Language;
pub use metrics::{LocalizationMetrics, MetricsReport};
pub use resource::{AssetRecord, AssetRef, AssetRegistry, Resource, ResourceData, ValueType};
pub use storage::{LocalizationStorage, SharedStorage};
pub use store::{LanguagePreference, MemoryPreference, MemoryStore, StorageStore};
