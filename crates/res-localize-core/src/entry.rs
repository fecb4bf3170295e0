use crate::error::LocalizationError;
use crate::resource::{Resource, ResourceData, ValueType};
use serde::{Deserialize, Serialize};

/// Stable identity of an entry. Assigned once, never reassigned.
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
pub struct EntryId(String);

impl EntryId {
    /// A fresh random id: 128 random bits as 32 lowercase hex digits.
    pub fn generate() -> Self {
        Self(format!("{:032x}", rand::random::<u128>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One localizable item (tag): a resource per language of the owning storage.
///
/// `resources[i]` belongs to `storage.languages()[i]`. The slot count is only
/// changed by the storage; callers holding `&mut` can edit slot data but not
/// add or drop slots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EntryRecord")]
pub struct LocalizationEntry {
    id: EntryId,
    name: String,
    #[serde(default)]
    is_default: bool,
    value_type: ValueType,
    resources: Vec<Resource>,
}

#[bon::bon]
impl LocalizationEntry {
    #[builder]
    pub fn new(
        #[builder(default = EntryId::generate(), into)] id: EntryId,
        #[builder(into)] name: String,
        #[builder(default)] is_default: bool,
        value_type: ValueType,
        #[builder(default)] resources: Vec<Resource>,
    ) -> Result<Self, LocalizationError> {
        if let Some(stray) = resources
            .iter()
            .find(|resource| resource.value_type() != &value_type)
        {
            return Err(LocalizationError::TypeMismatch {
                expected: value_type,
                actual: format!("'{}'", stray.value_type()),
            });
        }

        Ok(Self {
            id,
            name,
            is_default,
            value_type,
            resources,
        })
    }
}

impl LocalizationEntry {
    /// Builds an entry from one data value per language, in storage order.
    pub fn from_data(
        name: impl Into<String>,
        value_type: ValueType,
        data: impl IntoIterator<Item = ResourceData>,
    ) -> Result<Self, LocalizationError> {
        let resources = data
            .into_iter()
            .map(|data| Resource::new(value_type.clone(), data))
            .collect::<Result<Vec<_>, _>>()?;

        Self::builder()
            .name(name)
            .value_type(value_type)
            .resources(resources)
            .build()
    }

    /// Builds an entry whose every language slot starts as a copy of `template`.
    pub fn replicated(name: impl Into<String>, template: &Resource, language_count: usize) -> Self {
        Self {
            id: EntryId::generate(),
            name: name.into(),
            is_default: false,
            value_type: template.value_type().clone(),
            resources: vec![template.clone(); language_count],
        }
    }

    /// Builds the fallback entry for `value_type`, named after the type.
    pub fn default_for(
        value_type: ValueType,
        data: ResourceData,
        language_count: usize,
    ) -> Result<Self, LocalizationError> {
        let template = Resource::new(value_type.clone(), data)?;
        Ok(Self {
            is_default: true,
            ..Self::replicated(
                format!("Default {} Localization", value_type),
                &template,
                language_count,
            )
        })
    }

    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn resource(&self, index: usize) -> Option<&Resource> {
        self.resources.get(index)
    }

    pub fn resource_mut(&mut self, index: usize) -> Option<&mut Resource> {
        self.resources.get_mut(index)
    }

    pub fn resources_mut(&mut self) -> &mut [Resource] {
        &mut self.resources
    }

    pub(crate) fn push_slot(&mut self) {
        self.resources.push(Resource::empty(self.value_type.clone()));
    }

    pub(crate) fn remove_slot(&mut self, index: usize) {
        self.resources.remove(index);
    }

    pub(crate) fn move_slot(&mut self, from: usize, to: usize) {
        let slot = self.resources.remove(from);
        self.resources.insert(to, slot);
    }
}

#[derive(Deserialize)]
struct EntryRecord {
    id: EntryId,
    name: String,
    #[serde(default)]
    is_default: bool,
    value_type: ValueType,
    #[serde(default)]
    resources: Vec<Resource>,
}

impl TryFrom<EntryRecord> for LocalizationEntry {
    type Error = LocalizationError;

    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        Self::builder()
            .id(record.id)
            .name(record.name)
            .is_default(record.is_default)
            .value_type(record.value_type)
            .resources(record.resources)
            .build()
    }
}
