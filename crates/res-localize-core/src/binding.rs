use crate::entry::EntryId;
use crate::resource::{ResourceData, ValueType};
use parking_lot::Mutex;

/// Anything that shows a localized value.
///
/// The controller only reads `id` and `value_type`, and pushes new data
/// through `set_data` whenever the active language changes. Implementations
/// use interior mutability because the controller holds them behind `Arc`.
pub trait LocalizedComponent: Send + Sync {
    fn id(&self) -> &EntryId;
    fn value_type(&self) -> &ValueType;
    fn set_data(&self, data: &ResourceData);
}

/// A component that simply remembers the last value it was given.
#[derive(Debug)]
pub struct BoundResource {
    id: EntryId,
    value_type: ValueType,
    data: Mutex<ResourceData>,
    deliveries: Mutex<usize>,
}

impl BoundResource {
    pub fn new(id: impl Into<EntryId>, value_type: ValueType) -> Self {
        Self {
            id: id.into(),
            value_type,
            data: Mutex::new(ResourceData::Empty),
            deliveries: Mutex::new(0),
        }
    }

    pub fn data(&self) -> ResourceData {
        self.data.lock().clone()
    }

    /// How many times the controller pushed a value.
    pub fn deliveries(&self) -> usize {
        *self.deliveries.lock()
    }
}

impl LocalizedComponent for BoundResource {
    fn id(&self) -> &EntryId {
        &self.id
    }

    fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    fn set_data(&self, data: &ResourceData) {
        *self.data.lock() = data.clone();
        *self.deliveries.lock() += 1;
    }
}
