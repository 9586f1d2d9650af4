#![forbid(unsafe_code)]
//! TOML settings for identifiers, encoding, key layout and vocabulary.
//!
//! Every section is optional; missing keys take the built-in defaults.
//! `id_size` and `hash_algorithm` must not change once a store holds data.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::codec::{IdEncoding, IdNamespace, ValueIo, Vocabulary};
use crate::id::{IdentifierConfig, IdentifierFactory};
use crate::index::{KeySizes, StatementIndices};
use crate::types::Result;

/// Default location: `<config dir>/quadkey/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("quadkey").join("config.toml"))
}

/// Validated settings.
#[derive(Clone, Debug)]
pub struct Settings {
    pub identifier: IdentifierConfig,
    pub compression_threshold: usize,
    pub key_sizes: KeySizes,
    /// `None` disables the identifier cache.
    pub cache: Option<CacheSettings>,
    pub vocabulary: Arc<Vocabulary>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheSettings {
    pub shards: usize,
    pub capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            identifier: IdentifierConfig::default(),
            compression_threshold: ValueIo::DEFAULT_COMPRESSION_THRESHOLD,
            key_sizes: KeySizes::default(),
            cache: Some(CacheSettings {
                shards: DEFAULT_CACHE_SHARDS,
                capacity: DEFAULT_CACHE_CAPACITY,
            }),
            vocabulary: Arc::new(Vocabulary::standard()),
        }
    }
}

const DEFAULT_CACHE_SHARDS: usize = 16;
const DEFAULT_CACHE_CAPACITY: usize = 65_536;

impl Settings {
    /// Reads `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), "config.loaded");
        Ok(settings)
    }

    /// Reads `explicit`, else the default path if it exists, else defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(text)?;
        raw.resolve()
    }

    pub fn value_io(&self) -> ValueIo {
        ValueIo::new(Arc::clone(&self.vocabulary))
            .with_compression_threshold(self.compression_threshold)
    }

    pub fn factory(&self) -> Result<IdentifierFactory> {
        let factory = IdentifierFactory::new(self.identifier, self.value_io())?;
        Ok(match self.cache {
            Some(c) => factory.with_cache(c.shards, c.capacity),
            None => factory,
        })
    }

    /// Factory plus key layout.
    pub fn build(&self) -> Result<StatementIndices> {
        StatementIndices::new(self.factory()?, self.key_sizes)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    identifier: IdentifierSection,
    #[serde(default)]
    encoding: EncodingSection,
    #[serde(default)]
    keys: KeysSection,
    #[serde(default)]
    cache: CacheSection,
    #[serde(default)]
    vocabulary: VocabularySection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct IdentifierSection {
    hash_algorithm: Option<String>,
    id_size: Option<usize>,
    nibble: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EncodingSection {
    compression_threshold: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeysSection {
    subject: Option<usize>,
    predicate: Option<usize>,
    object: Option<usize>,
    context: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CacheSection {
    shards: Option<usize>,
    /// 0 disables the cache.
    capacity: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct VocabularySection {
    #[serde(default)]
    namespaces: Vec<String>,
    #[serde(default)]
    iris: Vec<String>,
    #[serde(default)]
    languages: Vec<String>,
    #[serde(default)]
    id_namespaces: Vec<RawIdNamespace>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIdNamespace {
    prefix: String,
    #[serde(default = "default_id_encoding")]
    encoding: String,
    size: Option<usize>,
}

fn default_id_encoding() -> String {
    "base64url".to_string()
}

impl RawConfig {
    fn resolve(self) -> Result<Settings> {
        let defaults = IdentifierConfig::default();
        let id = &self.identifier;
        let identifier = IdentifierConfig::new(
            match &id.hash_algorithm {
                Some(name) => name.parse()?,
                None => defaults.hash_algorithm(),
            },
            id.id_size.unwrap_or(defaults.id_size()),
            id.nibble.unwrap_or(defaults.nibble()),
        )?;

        let key_defaults = KeySizes::default();
        let key_sizes = KeySizes::new(
            self.keys.subject.unwrap_or(key_defaults.subject),
            self.keys.predicate.unwrap_or(key_defaults.predicate),
            self.keys.object.unwrap_or(key_defaults.object),
            self.keys.context.unwrap_or(key_defaults.context),
        );
        key_sizes.validate(identifier.id_size())?;

        let cache = match self.cache.capacity.unwrap_or(DEFAULT_CACHE_CAPACITY) {
            0 => None,
            capacity => Some(CacheSettings {
                shards: self.cache.shards.unwrap_or(DEFAULT_CACHE_SHARDS),
                capacity,
            }),
        };

        let vocabulary = self.vocabulary.build()?;

        Ok(Settings {
            identifier,
            compression_threshold: self
                .encoding
                .compression_threshold
                .unwrap_or(ValueIo::DEFAULT_COMPRESSION_THRESHOLD),
            key_sizes,
            cache,
            vocabulary: Arc::new(vocabulary),
        })
    }
}

impl VocabularySection {
    fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
            && self.iris.is_empty()
            && self.languages.is_empty()
            && self.id_namespaces.is_empty()
    }

    /// Standard entries plus the configured ones. Hash collisions among the
    /// additions are configuration errors.
    fn build(self) -> Result<Vocabulary> {
        if self.is_empty() {
            return Ok(Vocabulary::standard());
        }
        let mut builder = Vocabulary::standard_builder()
            .namespaces(self.namespaces)
            .iris(self.iris)
            .languages(self.languages);
        for ns in self.id_namespaces {
            let encoding: IdEncoding = ns.encoding.parse()?;
            builder = builder.id_namespace(IdNamespace::new(ns.prefix, encoding, ns.size));
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::hash::HashAlgorithm;
    use crate::types::Error;

    #[test]
    fn empty_text_yields_defaults() {
        let s = Settings::from_toml_str("").unwrap();
        assert_eq!(s.identifier, IdentifierConfig::default());
        assert_eq!(s.key_sizes, KeySizes::default());
        assert_eq!(s.compression_threshold, 200);
        assert_eq!(
            s.cache,
            Some(CacheSettings {
                shards: 16,
                capacity: 65_536
            })
        );
    }

    #[test]
    fn sections_override_defaults() {
        let s = Settings::from_toml_str(
            r#"
            [identifier]
            hash_algorithm = "SHA-256"
            id_size = 16
            nibble = false

            [encoding]
            compression_threshold = 64

            [keys]
            subject = 8

            [cache]
            capacity = 0

            [vocabulary]
            namespaces = ["http://example.org/ns#"]
            [[vocabulary.id_namespaces]]
            prefix = "http://example.org/id/"
            encoding = "hex"
            size = 16
            "#,
        )
        .unwrap();
        assert_eq!(s.identifier.hash_algorithm(), HashAlgorithm::Sha256);
        assert_eq!(s.identifier.id_size(), 16);
        assert!(!s.identifier.nibble());
        assert_eq!(s.compression_threshold, 64);
        assert_eq!(s.key_sizes.subject, 8);
        assert_eq!(s.key_sizes.predicate, 3);
        assert!(s.cache.is_none());
        assert!(s.vocabulary.namespace_hash("http://example.org/ns#").is_some());
        assert!(s
            .vocabulary
            .match_id_namespace(&format!("http://example.org/id/{}", "ab".repeat(16)))
            .is_some());
        let indices = s.build().unwrap();
        assert_eq!(indices.factory().id_size(), 16);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for text in [
            "[identifier]\nhash_algorithm = \"MD5\"",
            "[identifier]\nid_size = 0",
            "[identifier]\nhash_algorithm = \"XXH64\"\nid_size = 9",
            "[keys]\nobject = 11",
            "[[vocabulary.id_namespaces]]\nprefix = \"urn:x:\"\nencoding = \"octal\"",
        ] {
            assert!(
                matches!(Settings::from_toml_str(text), Err(Error::Config(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            Settings::from_toml_str("[identifier\n"),
            Err(Error::ConfigParse(_))
        ));
        assert!(matches!(
            Settings::from_toml_str("[identifier]\nsize = 3"),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            Settings::load(Path::new("/nonexistent/quadkey.toml")),
            Err(Error::Io(_))
        ));
    }
}
