//! Language table: language key -> model language code + voice

use crate::error::{BatchError, BatchResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageProfile {
    pub language_key: String,
    /// Language code understood by the synthesis engine
    pub model_language_code: String,
    pub voice_id: String,
}

#[derive(Deserialize)]
struct RawProfile {
    #[serde(alias = "model_language_code")]
    lang_code: String,
    #[serde(alias = "voice_id")]
    voice: String,
}

/// Outcome of a language lookup.
///
/// Unknown keys never fail; they resolve to the fallback profile, but the
/// caller can tell that it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageLookup<'a> {
    Found(&'a LanguageProfile),
    Defaulted {
        requested: &'a str,
        profile: &'a LanguageProfile,
    },
}

impl<'a> LanguageLookup<'a> {
    pub fn profile(&self) -> &'a LanguageProfile {
        match *self {
            LanguageLookup::Found(profile) => profile,
            LanguageLookup::Defaulted { profile, .. } => profile,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, LanguageLookup::Defaulted { .. })
    }
}

/// Immutable language table loaded once per run
#[derive(Debug, Clone)]
pub struct LanguageTable {
    profiles: BTreeMap<String, LanguageProfile>,
    fallback_key: String,
}

impl LanguageTable {
    /// Load the JSON table; a missing file, malformed JSON or a table
    /// without `fallback_key` is an error.
    pub fn load(path: impl AsRef<Path>, fallback_key: &str) -> BatchResult<Self> {
        let path = path.as_ref();
        log::info!("Loading language configurations from {}", path.display());
        let source = std::fs::read_to_string(path).map_err(|source| BatchError::ReadConfig {
            what: "language configuration",
            path: path.to_path_buf(),
            source,
        })?;
        let raw: BTreeMap<String, RawProfile> =
            serde_json::from_str(&source).map_err(|source| BatchError::LanguageConfig {
                path: path.to_path_buf(),
                source,
            })?;
        let table = Self::from_raw(raw, fallback_key)?;
        log::info!(
            "Loaded {} language profiles: {}",
            table.profiles.len(),
            table.keys().collect::<Vec<_>>().join(", ")
        );
        Ok(table)
    }

    /// Parse a table from JSON text
    pub fn from_json_str(source: &str, fallback_key: &str) -> BatchResult<Self> {
        let raw: BTreeMap<String, RawProfile> =
            serde_json::from_str(source).map_err(|source| BatchError::LanguageConfig {
                path: "<inline>".into(),
                source,
            })?;
        Self::from_raw(raw, fallback_key)
    }

    fn from_raw(raw: BTreeMap<String, RawProfile>, fallback_key: &str) -> BatchResult<Self> {
        let profiles: BTreeMap<String, LanguageProfile> = raw
            .into_iter()
            .map(|(key, raw)| {
                let profile = LanguageProfile {
                    language_key: key.clone(),
                    model_language_code: raw.lang_code,
                    voice_id: raw.voice,
                };
                (key, profile)
            })
            .collect();

        if !profiles.contains_key(fallback_key) {
            return Err(BatchError::MissingFallbackLanguage(fallback_key.to_string()));
        }

        Ok(Self {
            profiles,
            fallback_key: fallback_key.to_string(),
        })
    }

    pub fn resolve<'a>(&'a self, key: &'a str) -> LanguageLookup<'a> {
        match self.profiles.get(key) {
            Some(profile) => LanguageLookup::Found(profile),
            None => LanguageLookup::Defaulted {
                requested: key,
                profile: &self.profiles[&self.fallback_key],
            },
        }
    }

    pub fn fallback_key(&self) -> &str {
        &self.fallback_key
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TABLE: &str = r#"{
        "en": {"lang_code": "a", "voice": "af_heart"},
        "es": {"lang_code": "e", "voice": "ef_dora"},
        "pt": {"lang_code": "p", "voice": "pf_dora"}
    }"#;

    #[test]
    fn test_resolve_known_key() {
        let table = LanguageTable::from_json_str(TABLE, "en").unwrap();
        let lookup = table.resolve("es");
        assert!(!lookup.is_defaulted());
        assert_eq!(lookup.profile().model_language_code, "e");
        assert_eq!(lookup.profile().voice_id, "ef_dora");
        assert_eq!(lookup.profile().language_key, "es");
    }

    #[test]
    fn test_resolve_unknown_key_is_distinguishable() {
        let table = LanguageTable::from_json_str(TABLE, "pt").unwrap();
        let lookup = table.resolve("fr");
        assert!(lookup.is_defaulted());
        assert_eq!(lookup.profile().language_key, "pt");
        match lookup {
            LanguageLookup::Defaulted { requested, .. } => assert_eq!(requested, "fr"),
            other => panic!("Unexpected lookup: {other:?}"),
        }
    }

    #[test]
    fn test_missing_fallback_is_fatal() {
        let result = LanguageTable::from_json_str(TABLE, "de");
        assert!(matches!(result, Err(BatchError::MissingFallbackLanguage(key)) if key == "de"));
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let result = LanguageTable::from_json_str(r#"{"en": {"lang_code": "a"}}"#, "en");
        assert!(matches!(result, Err(BatchError::LanguageConfig { .. })));
    }

    #[test]
    fn test_long_field_names_accepted() {
        let table = LanguageTable::from_json_str(
            r#"{"en": {"model_language_code": "a", "voice_id": "af_bella"}}"#,
            "en",
        )
        .unwrap();
        assert_eq!(table.resolve("en").profile().voice_id, "af_bella");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TABLE.as_bytes()).unwrap();

        let table = LanguageTable::load(file.path(), "en").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["en", "es", "pt"]);
        assert_eq!(table.fallback_key(), "en");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = LanguageTable::load(dir.path().join("nope.json"), "en");
        assert!(matches!(result, Err(BatchError::ReadConfig { .. })));
    }
}
