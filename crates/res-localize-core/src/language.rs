use crate::error::LocalizationError;
use getset::Getters;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use unic_langid::LanguageIdentifier;

/// A locale supported by a storage.
///
/// Two languages are equal when their codes are equal; the display name is
/// presentation only.
#[derive(Clone, Debug, Getters, Serialize, Deserialize)]
#[serde(try_from = "LanguageRecord", into = "LanguageRecord")]
pub struct Language {
    #[getset(get = "pub")]
    code: LanguageIdentifier,
    #[getset(get = "pub")]
    display_name: String,
}

impl Language {
    /// Creates a language whose display name is its code.
    pub fn new(code: LanguageIdentifier) -> Self {
        let display_name = code.to_string();
        Self { code, display_name }
    }

    pub fn with_display_name(code: LanguageIdentifier, display_name: impl Into<String>) -> Self {
        Self {
            code,
            display_name: display_name.into(),
        }
    }

    /// Parses a BCP-47 code such as `en`, `fr-CA` or `zh-Hans`.
    pub fn from_code(code: &str) -> Result<Self, LocalizationError> {
        parse_code(code).map(Self::new)
    }
}

pub(crate) fn parse_code(code: &str) -> Result<LanguageIdentifier, LocalizationError> {
    code.parse::<LanguageIdentifier>()
        .map_err(|source| LocalizationError::InvalidLanguageCode {
            code: code.to_string(),
            source,
        })
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Language {}

impl Hash for Language {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl PartialEq<LanguageIdentifier> for Language {
    fn eq(&self, other: &LanguageIdentifier) -> bool {
        &self.code == other
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

impl From<LanguageIdentifier> for Language {
    fn from(code: LanguageIdentifier) -> Self {
        Self::new(code)
    }
}

impl AsRef<LanguageIdentifier> for Language {
    fn as_ref(&self) -> &LanguageIdentifier {
        &self.code
    }
}

#[derive(Serialize, Deserialize)]
struct LanguageRecord {
    code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
}

impl TryFrom<LanguageRecord> for Language {
    type Error = LocalizationError;

    fn try_from(record: LanguageRecord) -> Result<Self, Self::Error> {
        let code = parse_code(&record.code)?;
        Ok(match record.display_name {
            Some(name) => Self::with_display_name(code, name),
            None => Self::new(code),
        })
    }
}

impl From<Language> for LanguageRecord {
    fn from(language: Language) -> Self {
        let code = language.code.to_string();
        let display_name = (language.display_name != code).then_some(language.display_name);
        Self { code, display_name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unic_langid::langid;

    #[test]
    fn equality_ignores_display_name() {
        let plain = Language::new(langid!("fr"));
        let named = Language::with_display_name(langid!("fr"), "Français");
        assert_eq!(plain, named);
        assert_ne!(plain, Language::new(langid!("fr-CA")));
    }

    #[test]
    fn display_name_defaults_to_code() {
        let language = Language::new(langid!("pt-BR"));
        assert_eq!(language.display_name(), "pt-BR");
        assert_eq!(language.to_string(), "pt-BR");
    }

    #[test]
    fn from_code_rejects_garbage() {
        let garbage = "not a language!";
        let result = Language::from_code(garbage);
        assert!(matches!(
            result,
            Err(LocalizationError::InvalidLanguageCode { ref code, .. }) if code == garbage
        ));
    }

    #[test]
    fn serializes_display_name_only_when_distinct() {
        let plain = serde_json::to_string(&Language::new(langid!("en"))).unwrap();
        assert_eq!(plain, r#"{"code":"en"}"#);

        let named =
            serde_json::to_string(&Language::with_display_name(langid!("de"), "Deutsch")).unwrap();
        assert_eq!(named, r#"{"code":"de","display_name":"Deutsch"}"#);

        let back: Language = serde_json::from_str(&named).unwrap();
        assert_eq!(back.display_name(), "Deutsch");
    }
}
