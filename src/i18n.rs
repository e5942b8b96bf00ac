use crate::error::PrefsError;
use fluent_templates::fluent_bundle::FluentValue;
use fluent_templates::{static_loader, Loader};
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

static_loader! {
    static LOCALES = {
        locales: "locales",
        fallback_language: "en-US",
        customise: |bundle| bundle.set_use_isolating(false),
    };
}

/// Look up `key`, falling back to the key itself when no translation exists
pub fn translate(langid: &LanguageIdentifier, key: &str) -> String {
    LOCALES
        .try_lookup(langid, key)
        .unwrap_or_else(|| key.to_string())
}

/// Look up `key` with a single named argument
pub fn translate_with(langid: &LanguageIdentifier, key: &str, name: &str, value: &str) -> String {
    let mut args = HashMap::new();
    args.insert(name, FluentValue::from(value));
    LOCALES
        .try_lookup_with_args(langid, key, &args)
        .unwrap_or_else(|| key.to_string())
}

pub fn localize_error(langid: &LanguageIdentifier, err: &PrefsError) -> String {
    match err {
        PrefsError::Storage(detail) => {
            message_with_detail(langid, "error-storage", &detail.to_string())
        }
        PrefsError::Io(detail) => message_with_detail(langid, "error-io", &detail.to_string()),
        PrefsError::Json(detail) => message_with_detail(langid, "error-json", &detail.to_string()),
        PrefsError::Config(detail) => message_with_detail(langid, "error-config", detail),
        PrefsError::InvalidSetting { key, detail } => {
            let mut args = HashMap::new();
            args.insert("key", FluentValue::from(key.as_str()));
            args.insert("detail", FluentValue::from(detail.as_str()));
            LOCALES.lookup_with_args(langid, "error-invalid-setting", &args)
        }
        PrefsError::PermissionDenied(detail) => {
            message_with_detail(langid, "error-permission-denied", detail)
        }
        PrefsError::FileNotFound(detail) => {
            message_with_detail(langid, "error-file-not-found", detail)
        }
        PrefsError::NotFound(detail) => message_with_detail(langid, "error-not-found", detail),
        PrefsError::Host(detail) => message_with_detail(langid, "error-host", detail),
    }
}

fn message_with_detail(langid: &LanguageIdentifier, key: &str, detail: &str) -> String {
    let mut args = HashMap::new();
    args.insert("detail", FluentValue::from(detail));
    LOCALES.lookup_with_args(langid, key, &args)
}

/// Pick the interface language: the stored preference first, then the
/// usual locale environment variables, then `en-US`.
pub fn resolve_language(preferred: Option<&str>) -> LanguageIdentifier {
    let preferred = preferred.map(str::to_string);
    let from_env = ["LC_ALL", "LC_MESSAGES", "LANG"]
        .into_iter()
        .filter_map(|key| std::env::var(key).ok());
    for value in preferred.into_iter().chain(from_env) {
        if let Some(lang) = normalize_lang(value) {
            if let Ok(langid) = lang.parse::<LanguageIdentifier>() {
                return langid;
            }
        }
    }
    fallback_language()
}

fn fallback_language() -> LanguageIdentifier {
    unic_langid::langid!("en-US")
}

fn normalize_lang(value: String) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == "C" || value == "POSIX" {
        return None;
    }
    let value = value.split('.').next().unwrap_or(value);
    let value = value.replace('_', "-");
    Some(value)
}
