use crate::language::Language;
use std::env;
use unic_langid::LanguageIdentifier;

const LOCALE_VARIABLES: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Codes tried, in order, when looking for `requested` in a storage: the code
/// itself, then its bare language subtag (`sr-Latn-RS` gives `sr`).
pub fn fallback_chain(requested: &LanguageIdentifier) -> Vec<LanguageIdentifier> {
    let primary = LanguageIdentifier::from_parts(requested.language, None, None, &[]);
    if &primary == requested {
        vec![primary]
    } else {
        vec![requested.clone(), primary]
    }
}

/// The storage language matching the earliest code of the fallback chain.
pub fn resolve_fallback_language<'a>(
    requested: &LanguageIdentifier,
    available: &'a [Language],
) -> Option<&'a Language> {
    let chain = fallback_chain(requested);
    chain
        .iter()
        .find_map(|code| available.iter().find(|language| language.code() == code))
}

/// The host's preferred language, read from `LC_ALL`, `LC_MESSAGES` and `LANG`
/// in that order.
pub fn host_language() -> Option<LanguageIdentifier> {
    LOCALE_VARIABLES
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find_map(|value| parse_posix_locale(&value))
}

/// Parses POSIX locale strings like `fr_CA.UTF-8` or `sr_RS@latin`.
pub fn parse_posix_locale(value: &str) -> Option<LanguageIdentifier> {
    let locale = value
        .split(['.', '@'])
        .next()
        .map(str::trim)
        .filter(|locale| !locale.is_empty())?;

    if locale.eq_ignore_ascii_case("C") || locale.eq_ignore_ascii_case("POSIX") {
        return None;
    }

    locale.replace('_', "-").parse().ok()
}
