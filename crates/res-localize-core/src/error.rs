use crate::entry::EntryId;
use crate::resource::{AssetRef, ValueType};
use thiserror::Error;
use unic_langid::{LanguageIdentifier, LanguageIdentifierError};

/// Structural failures raised by storage and controller operations.
///
/// Every variant is a local validation failure: the call that violated an
/// invariant is rejected and the storage is left untouched.
#[derive(Debug, Error)]
pub enum LocalizationError {
    #[error("Language '{0}' is already present in the storage")]
    DuplicateLanguage(LanguageIdentifier),
    #[error("A storage must contain at least one language")]
    NoLanguages,
    #[error("Language '{0}' is not present in the storage")]
    LanguageNotFound(LanguageIdentifier),
    #[error("Language '{0}' is the last language of the storage and cannot be removed")]
    LastLanguageRemoval(LanguageIdentifier),
    #[error("An entry with id '{0}' already exists")]
    DuplicateId(EntryId),
    #[error("No entry with id '{0}'")]
    EntryNotFound(EntryId),
    #[error("Entry carries {actual} resources but the storage has {expected} languages")]
    ResourceCountMismatch { expected: usize, actual: usize },
    #[error("No default entry for value type '{0}'")]
    DefaultNotFound(ValueType),
    #[error("A default entry for value type '{0}' already exists")]
    DuplicateDefault(ValueType),
    #[error("Resource of type '{expected}' cannot hold {actual} data")]
    TypeMismatch { expected: ValueType, actual: String },
    #[error("No registered asset with handle '{0}'")]
    AssetNotFound(AssetRef),
    #[error("Asset handle '{0}' is registered more than once")]
    DuplicateAsset(AssetRef),
    #[error("Invalid language code '{code}'")]
    InvalidLanguageCode {
        code: String,
        #[source]
        source: LanguageIdentifierError,
    },
}
