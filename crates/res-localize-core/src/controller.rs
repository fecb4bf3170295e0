//! Runtime facade over a [`LocalizationStorage`](crate::LocalizationStorage):
//! tracks the active language, caches its dictionary and feeds bound components.

use crate::binding::LocalizedComponent;
use crate::entry::EntryId;
use crate::error::LocalizationError;
use crate::fallback::{host_language, resolve_fallback_language};
use crate::language::Language;
use crate::metrics::LocalizationMetrics;
use crate::resource::{Resource, ResourceData, ValueType};
use crate::storage::SharedStorage;
use crate::store::{LanguagePreference, MemoryPreference};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use unic_langid::LanguageIdentifier;

/// Which way [`LocalizationController::cycle_language`] walks the language list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    pub fn offset(self) -> isize {
        match self {
            Direction::Next => 1,
            Direction::Previous => -1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum ControllerState {
    Uninitialized,
    Ready,
}

/// Resolves what each bound component should show for the active language.
///
/// The dictionary of the active language is cached together with the storage
/// version it was built from; any version change makes the next lookup
/// rebuild it.
pub struct LocalizationController {
    storage: SharedStorage,
    active: Option<Language>,
    dictionary: FxHashMap<EntryId, Resource>,
    cached_version: Option<u64>,
    bound: Vec<Arc<dyn LocalizedComponent>>,
    preference: Box<dyn LanguagePreference>,
    metrics: Arc<LocalizationMetrics>,
}

#[bon::bon]
impl LocalizationController {
    /// Builds a controller and selects its initial language: the stored
    /// preference if the storage has it, else the host language if the
    /// storage has it, else the first storage language.
    ///
    /// `host_language` defaults to the process locale (`LC_ALL`,
    /// `LC_MESSAGES`, `LANG`).
    #[builder]
    pub fn new(
        storage: SharedStorage,
        #[builder(default = Box::new(MemoryPreference::new()) as Box<dyn LanguagePreference>)]
        preference: Box<dyn LanguagePreference>,
        host_language: Option<LanguageIdentifier>,
        #[builder(default)] metrics: Arc<LocalizationMetrics>,
    ) -> Result<Self, LocalizationError> {
        let mut controller = Self {
            storage,
            active: None,
            dictionary: FxHashMap::default(),
            cached_version: None,
            bound: Vec::new(),
            preference,
            metrics,
        };

        let initial = controller.initial_language(host_language);
        controller.set_language(&initial)?;
        Ok(controller)
    }
}

impl LocalizationController {
    fn initial_language(&self, host: Option<LanguageIdentifier>) -> LanguageIdentifier {
        let preferred = self.preference.load().unwrap_or_else(|error| {
            tracing::warn!("Failed to load the preferred language: {:#}", error);
            None
        });
        let host = host.or_else(host_language);

        let storage = self.storage.read();
        let languages = storage.languages();
        [preferred, host]
            .into_iter()
            .flatten()
            .find_map(|candidate| {
                resolve_fallback_language(&candidate, languages).map(|found| found.code().clone())
            })
            .unwrap_or_else(|| languages[0].code().clone())
    }

    pub fn state(&self) -> ControllerState {
        if self.active.is_some() {
            ControllerState::Ready
        } else {
            ControllerState::Uninitialized
        }
    }

    pub fn active_language(&self) -> Option<&Language> {
        self.active.as_ref()
    }

    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    pub fn metrics(&self) -> &Arc<LocalizationMetrics> {
        &self.metrics
    }

    /// The storage version the cached dictionary was built from.
    pub fn cached_version(&self) -> Option<u64> {
        self.cached_version
    }

    pub fn bound_count(&self) -> usize {
        self.bound.len()
    }

    /// Makes `code` the active language and pushes the new values to every
    /// bound component, in subscription order.
    pub fn set_language(&mut self, code: &LanguageIdentifier) -> Result<(), LocalizationError> {
        let (language, dictionary, version) = {
            let storage = self.storage.read();
            let language = storage
                .language(code)
                .cloned()
                .ok_or_else(|| LocalizationError::LanguageNotFound(code.clone()))?;
            (language, storage.get_dictionary(code)?, storage.version())
        };

        tracing::debug!(
            "Switching to language '{}' ({} entries, storage version {})",
            code,
            dictionary.len(),
            version
        );
        self.dictionary = dictionary;
        self.cached_version = Some(version);
        self.active = Some(language);
        self.metrics.record_rebuild();
        self.metrics.record_switch();

        if let Err(error) = self.preference.store(code) {
            tracing::warn!("Failed to store preferred language '{}': {:#}", code, error);
        }

        self.deliver_all();
        Ok(())
    }

    /// Steps to the neighbouring language, wrapping around at both ends.
    /// Does nothing when the storage has fewer than two languages.
    pub fn cycle_language(&mut self, direction: Direction) -> Result<(), LocalizationError> {
        let target = {
            let storage = self.storage.read();
            let languages = storage.languages();
            if languages.len() < 2 {
                return Ok(());
            }

            let active = self
                .active
                .as_ref()
                .map(|language| language.code().clone())
                .unwrap_or_default();
            let index = storage
                .language_index(&active)
                .ok_or(LocalizationError::LanguageNotFound(active))?;

            let count = languages.len() as isize;
            let next = (index as isize + direction.offset()).rem_euclid(count) as usize;
            languages[next].code().clone()
        };

        self.set_language(&target)
    }

    /// Rebuilds the cached dictionary if the storage changed since it was
    /// built. Returns whether a rebuild happened.
    pub fn refresh(&mut self) -> Result<bool, LocalizationError> {
        let Some(active) = self.active.as_ref() else {
            return Ok(false);
        };

        let storage = self.storage.read();
        if self.cached_version == Some(storage.version()) {
            return Ok(false);
        }

        match storage.get_dictionary(active.code()) {
            Ok(dictionary) => {
                tracing::debug!(
                    "Rebuilt dictionary for '{}' at storage version {}",
                    active.code(),
                    storage.version()
                );
                self.dictionary = dictionary;
                self.cached_version = Some(storage.version());
                self.metrics.record_rebuild();
                Ok(true)
            },
            Err(error) => {
                self.dictionary.clear();
                self.cached_version = None;
                Err(error)
            },
        }
    }

    /// Refreshes and, if the storage changed, re-delivers every bound
    /// component. Returns whether anything was delivered.
    pub fn sync(&mut self) -> Result<bool, LocalizationError> {
        if self.refresh()? {
            self.deliver_all();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// The data a component with this id and type should show right now.
    ///
    /// Never fails. When the entry is missing (or holds another value type),
    /// the default entry of `value_type` is used instead and the miss is
    /// logged and counted.
    pub fn resolve(&mut self, id: &EntryId, value_type: &ValueType) -> ResourceData {
        if let Err(error) = self.refresh() {
            tracing::warn!("Could not refresh the localization dictionary: {}", error);
        }

        if let Some(resource) = self.dictionary.get(id)
            && resource.value_type() == value_type
        {
            self.metrics.record_hit();
            return resource.data().clone();
        }

        self.metrics.record_missing();
        self.default_data(id, value_type)
    }

    fn default_data(&self, id: &EntryId, value_type: &ValueType) -> ResourceData {
        let storage = self.storage.read();
        let active = self.active.as_ref();
        let index = active.and_then(|language| storage.language_index(language.code()));

        match (storage.get_default_entry(value_type), index) {
            (Ok(default), Some(index)) => {
                tracing::warn!(
                    "Missing '{}' localization for '{}' in '{}'; using '{}'",
                    value_type,
                    id,
                    active.map(Language::code).map(ToString::to_string).unwrap_or_default(),
                    default.name()
                );
                default.resources()[index].data().clone()
            },
            (Err(error), _) => {
                tracing::error!("Missing localization for '{}': {}", id, error);
                ResourceData::Empty
            },
            (Ok(_), None) => {
                tracing::error!(
                    "Missing localization for '{}' and the active language is not in the storage",
                    id
                );
                ResourceData::Empty
            },
        }
    }

    /// Binds a component and immediately delivers its current value. Binding
    /// the same component twice keeps a single registration.
    pub fn subscribe(&mut self, component: Arc<dyn LocalizedComponent>) {
        if !self.is_bound(&component) {
            self.bound.push(Arc::clone(&component));
        }
        let data = self.resolve(component.id(), component.value_type());
        component.set_data(&data);
    }

    /// Unbinds a component. Returns `false` if it was not bound.
    pub fn unsubscribe<C: LocalizedComponent + ?Sized>(&mut self, component: &Arc<C>) -> bool {
        let before = self.bound.len();
        self.bound
            .retain(|bound| !std::ptr::addr_eq(Arc::as_ptr(bound), Arc::as_ptr(component)));
        self.bound.len() != before
    }

    pub fn is_bound<C: LocalizedComponent + ?Sized>(&self, component: &Arc<C>) -> bool {
        self.bound
            .iter()
            .any(|bound| std::ptr::addr_eq(Arc::as_ptr(bound), Arc::as_ptr(component)))
    }

    /// Writes `data` into entry `id` for the active language.
    pub fn update_active_resource(
        &mut self,
        id: &EntryId,
        data: ResourceData,
    ) -> Result<(), LocalizationError> {
        let code = self
            .active
            .as_ref()
            .map(|language| language.code().clone())
            .unwrap_or_default();
        self.storage.write().set_resource_data(id, &code, data)
    }

    fn deliver_all(&mut self) {
        let components = self.bound.clone();
        for component in components {
            let data = self.resolve(component.id(), component.value_type());
            component.set_data(&data);
        }
    }
}
