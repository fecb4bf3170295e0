//! Typed resource slots and the registry of externally owned assets they point at.

use crate::error::LocalizationError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

const TEXT_TYPE: &str = "Text";

/// Names the kind of value a resource holds (`Text`, `Sprite`, `AudioClip`, ...).
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct ValueType(Cow<'static, str>);

impl ValueType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// The built-in string type. Text resources hold their value inline.
    pub const fn text() -> Self {
        Self(Cow::Borrowed(TEXT_TYPE))
    }

    pub fn is_text(&self) -> bool {
        self.0 == TEXT_TYPE
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Handle into an [`AssetRegistry`].
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
#[display("asset#{_0}")]
pub struct AssetRef(u32);

impl AssetRef {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// The opaque payload of one resource slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResourceData {
    #[default]
    Empty,
    Text(String),
    Asset(AssetRef),
}

impl ResourceData {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_asset(&self) -> Option<AssetRef> {
        match self {
            Self::Asset(asset) => Some(*asset),
            _ => None,
        }
    }

    /// Whether this payload may be stored in a slot of `value_type`.
    ///
    /// Empty data fits every type, text fits only the text type and asset
    /// references fit every other type.
    pub fn is_assignable_to(&self, value_type: &ValueType) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(_) => value_type.is_text(),
            Self::Asset(_) => !value_type.is_text(),
        }
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Text(_) => "text",
            Self::Asset(_) => "asset",
        }
    }
}

impl From<AssetRef> for ResourceData {
    fn from(asset: AssetRef) -> Self {
        Self::Asset(asset)
    }
}

/// One language's value for an entry.
///
/// The value type is fixed when the resource is created; only the data can
/// change afterwards, and only to data assignable to that type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ResourceRecord")]
pub struct Resource {
    value_type: ValueType,
    #[serde(default)]
    data: ResourceData,
}

#[derive(Deserialize)]
struct ResourceRecord {
    value_type: ValueType,
    #[serde(default)]
    data: ResourceData,
}

impl TryFrom<ResourceRecord> for Resource {
    type Error = LocalizationError;

    fn try_from(record: ResourceRecord) -> Result<Self, Self::Error> {
        Resource::new(record.value_type, record.data)
    }
}

impl Resource {
    pub fn new(value_type: ValueType, data: ResourceData) -> Result<Self, LocalizationError> {
        ensure_assignable(&value_type, &data)?;
        Ok(Self { value_type, data })
    }

    pub fn empty(value_type: ValueType) -> Self {
        Self {
            value_type,
            data: ResourceData::Empty,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value_type: ValueType::text(),
            data: ResourceData::text(value),
        }
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn data(&self) -> &ResourceData {
        &self.data
    }

    pub fn set_data(&mut self, data: ResourceData) -> Result<(), LocalizationError> {
        ensure_assignable(&self.value_type, &data)?;
        self.data = data;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.data = ResourceData::Empty;
    }

    /// Returns an empty resource of the same value type.
    pub fn emptied(&self) -> Self {
        Self::empty(self.value_type.clone())
    }
}

pub(crate) fn ensure_assignable(
    value_type: &ValueType,
    data: &ResourceData,
) -> Result<(), LocalizationError> {
    if data.is_assignable_to(value_type) {
        Ok(())
    } else {
        Err(LocalizationError::TypeMismatch {
            expected: value_type.clone(),
            actual: data.kind_name().to_string(),
        })
    }
}

/// One externally owned asset known to the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: AssetRef,
    /// Host-side locator of the asset (path, GUID, URL, ...).
    pub path: String,
    pub value_type: ValueType,
}

/// Arena of externally owned assets referenced by [`ResourceData::Asset`].
///
/// Records are kept sorted by id; ids are never reused. A deserialized
/// registry is normalized the same way: records sorted, duplicate ids
/// rejected, and `next_id` moved past the highest id in use.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AssetRegistryRecord")]
pub struct AssetRegistry {
    next_id: u32,
    records: Vec<AssetRecord>,
}

#[derive(Deserialize)]
struct AssetRegistryRecord {
    #[serde(default)]
    next_id: u32,
    #[serde(default)]
    records: Vec<AssetRecord>,
}

impl TryFrom<AssetRegistryRecord> for AssetRegistry {
    type Error = LocalizationError;

    fn try_from(record: AssetRegistryRecord) -> Result<Self, Self::Error> {
        let mut records = record.records;
        records.sort_by_key(|record| record.id);
        if let Some(pair) = records.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(LocalizationError::DuplicateAsset(pair[0].id));
        }

        let next_id = match records.last() {
            Some(last) => record.next_id.max(last.id.0.saturating_add(1)),
            None => record.next_id,
        };
        Ok(Self { next_id, records })
    }
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an asset, returning the existing handle when the same path is
    /// already registered with the same value type.
    pub fn register(&mut self, path: impl Into<String>, value_type: ValueType) -> AssetRef {
        let path = path.into();
        if let Some(existing) = self
            .records
            .iter()
            .find(|record| record.path == path && record.value_type == value_type)
        {
            return existing.id;
        }

        let id = AssetRef(self.next_id);
        self.next_id += 1;
        self.records.push(AssetRecord {
            id,
            path,
            value_type,
        });
        id
    }

    pub fn get(&self, id: AssetRef) -> Option<&AssetRecord> {
        self.position(id).map(|index| &self.records[index])
    }

    /// Removes the record only. Entries still pointing at it are left alone;
    /// [`LocalizationStorage::unregister_asset`](crate::LocalizationStorage::unregister_asset)
    /// clears them as well.
    pub(crate) fn unregister(&mut self, id: AssetRef) -> Option<AssetRecord> {
        self.position(id).map(|index| self.records.remove(index))
    }

    pub fn contains(&self, id: AssetRef) -> bool {
        self.position(id).is_some()
    }

    pub fn find_by_path(&self, path: &str) -> Option<&AssetRecord> {
        self.records.iter().find(|record| record.path == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: AssetRef) -> Option<usize> {
        self.records
            .binary_search_by_key(&id, |record| record.id)
            .ok()
    }
}
