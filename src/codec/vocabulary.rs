//! Registry of IRIs, namespaces and language tags that encode as 16-bit hashes.
//!
//! A [`Vocabulary`] is built once and shared read-only. The hashes it hands
//! out are stored on disk, so every reader of a store must use a vocabulary
//! with the same entries.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::model::vocab::{
    dcterms, foaf, geo, internal, owl, prov, rdf, rdfs, schema, skos, wikidata, xsd,
};
use crate::primitives::hash::{decode_base64, encode_base64, hash16};
use crate::types::{Error, Result};

/// IRI prefixes stored as a one-byte code. The position in this table is the
/// code, so entries may only ever be appended.
pub const IRI_PREFIXES: [&str; 12] = [
    "http://",
    "https://",
    "http://www.",
    "https://www.",
    "http://dx.doi.org/",
    "https://doi.org/",
    "urn:",
    "urn:uuid:",
    "mailto:",
    "file://",
    "tag:",
    "https://en.wikipedia.org/wiki/",
];

/// Finds the longest registered prefix of `iri`.
pub fn compressible_prefix(iri: &str) -> Option<(u8, &'static str)> {
    IRI_PREFIXES
        .iter()
        .enumerate()
        .filter(|(_, p)| iri.starts_with(*p))
        .max_by_key(|(_, p)| p.len())
        .map(|(code, p)| (code as u8, *p))
}

/// Looks up a prefix by code.
pub fn prefix_for_code(code: u8) -> Option<&'static str> {
    IRI_PREFIXES.get(code as usize).copied()
}

/// Splits an IRI after its last `#`, else its last `/`, else its last `:`.
pub fn split_namespace(iri: &str) -> Option<(&str, &str)> {
    let idx = iri
        .rfind('#')
        .or_else(|| iri.rfind('/'))
        .or_else(|| iri.rfind(':'))?;
    Some(iri.split_at(idx + 1))
}

/// Text encoding of identifier bytes inside an IRI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdEncoding {
    /// Unpadded base64url.
    Base64Url,
    /// Lowercase hex.
    Hex,
}

impl IdEncoding {
    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            IdEncoding::Base64Url => encode_base64(bytes),
            IdEncoding::Hex => hex::encode(bytes),
        }
    }

    /// Decodes `text`, accepting only the form [`Self::encode`] would produce.
    pub fn decode_canonical(self, text: &str) -> Option<Vec<u8>> {
        let bytes = match self {
            IdEncoding::Base64Url => decode_base64(text).ok()?,
            IdEncoding::Hex => hex::decode(text).ok()?,
        };
        (self.encode(&bytes) == text).then_some(bytes)
    }
}

impl FromStr for IdEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(IdEncoding::Hex),
            "base64" | "base64url" => Ok(IdEncoding::Base64Url),
            other => Err(Error::config(format!("unknown identifier encoding: {other}"))),
        }
    }
}

impl fmt::Display for IdEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IdEncoding::Base64Url => "base64url",
            IdEncoding::Hex => "hex",
        })
    }
}

/// A namespace whose local names are encoded binary identifiers, e.g.
/// `http://www.wikidata.org/value/<40 hex digits>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdNamespace {
    prefix: String,
    encoding: IdEncoding,
    size: Option<usize>,
}

impl IdNamespace {
    /// `size` pins the decoded byte length; `None` accepts any non-empty length.
    pub fn new(prefix: impl Into<String>, encoding: IdEncoding, size: Option<usize>) -> Self {
        Self {
            prefix: prefix.into(),
            encoding,
            size,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn encoding(&self) -> IdEncoding {
        self.encoding
    }

    pub fn size(&self) -> Option<usize> {
        self.size
    }

    /// Returns the identifier bytes when `local` is a canonical local name.
    pub fn decode_local(&self, local: &str) -> Option<Vec<u8>> {
        if local.is_empty() {
            return None;
        }
        let bytes = self.encoding.decode_canonical(local)?;
        match self.size {
            Some(size) if bytes.len() != size => None,
            _ => Some(bytes),
        }
    }

    /// Builds the IRI for `bytes`, optionally with a trailing slash.
    pub fn iri_for(&self, bytes: &[u8], end_slash: bool) -> String {
        let mut iri = format!("{}{}", self.prefix, self.encoding.encode(bytes));
        if end_slash {
            iri.push('/');
        }
        iri
    }
}

/// A bidirectional hash16 table.
#[derive(Clone, Debug, Default)]
struct HashTable {
    by_hash: FxHashMap<u16, String>,
    by_text: FxHashMap<String, u16>,
}

impl HashTable {
    /// Inserts `text`. A different string with the same hash is rejected.
    fn insert(&mut self, table: &'static str, text: &str) -> Result<()> {
        let hash = hash16(text.as_bytes());
        match self.by_hash.get(&hash) {
            Some(existing) if existing == text => Ok(()),
            Some(existing) => Err(Error::config(format!(
                "{table} hash collision 0x{hash:04x}: {existing:?} and {text:?}"
            ))),
            None => {
                self.by_hash.insert(hash, text.to_string());
                self.by_text.insert(text.to_string(), hash);
                Ok(())
            }
        }
    }

    fn hash_of(&self, text: &str) -> Option<u16> {
        self.by_text.get(text).copied()
    }

    fn text_of(&self, hash: u16) -> Option<&str> {
        self.by_hash.get(&hash).map(String::as_str)
    }

    fn len(&self) -> usize {
        self.by_hash.len()
    }
}

/// Immutable vocabulary consulted by the value codec.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    iris: HashTable,
    namespaces: HashTable,
    languages: HashTable,
    id_namespaces: Vec<IdNamespace>,
    id_namespace_hashes: FxHashMap<u16, usize>,
}

impl Vocabulary {
    /// Starts an empty builder.
    pub fn builder() -> VocabularyBuilder {
        VocabularyBuilder::default()
    }

    /// A builder preloaded with the standard entries.
    pub fn standard_builder() -> VocabularyBuilder {
        VocabularyBuilder::default()
            .namespaces(STANDARD_NAMESPACES.iter().copied())
            .iris(STANDARD_IRIS.iter().copied())
            .languages(STANDARD_LANGUAGES.iter().copied())
            .id_namespace(IdNamespace::new(
                internal::VALUE_ID_NS,
                IdEncoding::Base64Url,
                None,
            ))
            .id_namespace(IdNamespace::new(wikidata::WDV, IdEncoding::Hex, Some(20)))
            .id_namespace(IdNamespace::new(wikidata::WDREF, IdEncoding::Hex, Some(20)))
    }

    /// The standard vocabulary: common RDF namespaces and terms, frequent
    /// language tags and the internal value-id namespace.
    pub fn standard() -> Self {
        Self::standard_builder().build_lenient()
    }

    pub fn well_known_hash(&self, iri: &str) -> Option<u16> {
        self.iris.hash_of(iri)
    }

    pub fn well_known_iri(&self, hash: u16) -> Option<&str> {
        self.iris.text_of(hash)
    }

    pub fn namespace_hash(&self, namespace: &str) -> Option<u16> {
        self.namespaces.hash_of(namespace)
    }

    pub fn namespace(&self, hash: u16) -> Option<&str> {
        self.namespaces.text_of(hash)
    }

    pub fn language_hash(&self, language: &str) -> Option<u16> {
        self.languages.hash_of(language)
    }

    pub fn language(&self, hash: u16) -> Option<&str> {
        self.languages.text_of(hash)
    }

    pub fn id_namespace(&self, hash: u16) -> Option<&IdNamespace> {
        self.id_namespace_hashes
            .get(&hash)
            .map(|&idx| &self.id_namespaces[idx])
    }

    pub fn id_namespaces(&self) -> impl Iterator<Item = &IdNamespace> {
        self.id_namespaces.iter()
    }

    /// Matches `iri` against the identifier namespaces. Returns the namespace
    /// hash, the decoded bytes and whether the IRI carries a trailing slash.
    pub fn match_id_namespace(&self, iri: &str) -> Option<(u16, Vec<u8>, bool)> {
        for ns in &self.id_namespaces {
            let Some(local) = iri.strip_prefix(ns.prefix()) else {
                continue;
            };
            let (local, end_slash) = match local.strip_suffix('/') {
                Some(trimmed) => (trimmed, true),
                None => (local, false),
            };
            if let Some(bytes) = ns.decode_local(local) {
                return Some((hash16(ns.prefix().as_bytes()), bytes, end_slash));
            }
        }
        None
    }

    /// Splits `iri` and returns the namespace hash and local name when the
    /// namespace is registered.
    pub fn match_namespace<'a>(&self, iri: &'a str) -> Option<(u16, &'a str)> {
        let (ns, local) = split_namespace(iri)?;
        self.namespace_hash(ns).map(|h| (h, local))
    }

    /// Entry counts: (iris, namespaces, id namespaces, languages).
    pub fn sizes(&self) -> (usize, usize, usize, usize) {
        (
            self.iris.len(),
            self.namespaces.len(),
            self.id_namespaces.len(),
            self.languages.len(),
        )
    }
}

/// Collects entries for a [`Vocabulary`].
#[derive(Clone, Debug, Default)]
pub struct VocabularyBuilder {
    iris: Vec<String>,
    namespaces: Vec<String>,
    id_namespaces: Vec<IdNamespace>,
    languages: Vec<String>,
}

impl VocabularyBuilder {
    pub fn iri(mut self, iri: impl Into<String>) -> Self {
        self.iris.push(iri.into());
        self
    }

    pub fn iris<I, S>(mut self, iris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.iris.extend(iris.into_iter().map(Into::into));
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespaces.push(namespace.into());
        self
    }

    pub fn namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.namespaces
            .extend(namespaces.into_iter().map(Into::into));
        self
    }

    pub fn id_namespace(mut self, ns: IdNamespace) -> Self {
        self.id_namespaces.push(ns);
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.languages.push(language.into());
        self
    }

    pub fn languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages
            .extend(languages.into_iter().map(Into::into));
        self
    }

    /// Builds the vocabulary. Two distinct entries of one table sharing a
    /// hash are a configuration error.
    pub fn build(self) -> Result<Vocabulary> {
        self.assemble(|e| Err(e))
    }

    /// Builds the vocabulary, keeping the first of any colliding entries.
    fn build_lenient(self) -> Vocabulary {
        let vocab = self.assemble(|e| {
            warn!(error = %e, "vocabulary.entry.skipped");
            Ok(())
        });
        vocab.unwrap_or_default()
    }

    fn assemble(self, mut on_collision: impl FnMut(Error) -> Result<()>) -> Result<Vocabulary> {
        let mut vocab = Vocabulary::default();
        for iri in &self.iris {
            if let Err(e) = vocab.iris.insert("IRI", iri) {
                on_collision(e)?;
            }
        }
        for ns in &self.namespaces {
            if let Err(e) = vocab.namespaces.insert("namespace", ns) {
                on_collision(e)?;
            }
        }
        for lang in &self.languages {
            if let Err(e) = vocab.languages.insert("language", lang) {
                on_collision(e)?;
            }
        }
        for ns in self.id_namespaces {
            let hash = hash16(ns.prefix().as_bytes());
            match vocab.id_namespace_hashes.get(&hash) {
                Some(&idx) if vocab.id_namespaces[idx] == ns => continue,
                Some(&idx) => {
                    on_collision(Error::config(format!(
                        "identifier namespace hash collision 0x{hash:04x}: {:?} and {:?}",
                        vocab.id_namespaces[idx].prefix(),
                        ns.prefix()
                    )))?;
                }
                None => {
                    vocab.id_namespace_hashes.insert(hash, vocab.id_namespaces.len());
                    vocab.id_namespaces.push(ns);
                }
            }
        }
        Ok(vocab)
    }
}

const STANDARD_NAMESPACES: &[&str] = &[
    rdf::NAMESPACE,
    rdfs::NAMESPACE,
    xsd::NAMESPACE,
    owl::NAMESPACE,
    geo::NAMESPACE,
    skos::NAMESPACE,
    schema::NAMESPACE,
    dcterms::NAMESPACE,
    foaf::NAMESPACE,
    prov::NAMESPACE,
    wikidata::WD,
    wikidata::WDT,
    wikidata::WDS,
    wikidata::WDV,
    wikidata::WDREF,
    "http://www.wikidata.org/prop/",
    "http://www.wikidata.org/prop/statement/",
    "http://www.wikidata.org/prop/qualifier/",
    "http://www.wikidata.org/prop/reference/",
    "http://wikiba.se/ontology#",
    "http://purl.org/dc/elements/1.1/",
    "http://www.w3.org/ns/shacl#",
    "http://www.w3.org/ns/dcat#",
    "http://www.w3.org/2006/time#",
    "http://rdfs.org/ns/void#",
    "http://www.w3.org/ns/sparql-service-description#",
    "http://www.opengis.net/def/function/geosparql/",
];

const STANDARD_IRIS: &[&str] = &[
    rdf::TYPE,
    rdf::LANG_STRING,
    rdf::XML_LITERAL,
    rdf::PROPERTY,
    rdf::STATEMENT,
    rdf::SUBJECT,
    rdf::PREDICATE,
    rdf::OBJECT,
    rdf::VALUE,
    rdf::FIRST,
    rdf::REST,
    rdf::NIL,
    rdfs::LABEL,
    rdfs::COMMENT,
    rdfs::CLASS,
    rdfs::RESOURCE,
    rdfs::SUB_CLASS_OF,
    rdfs::SUB_PROPERTY_OF,
    rdfs::DOMAIN,
    rdfs::RANGE,
    rdfs::SEE_ALSO,
    xsd::STRING,
    xsd::BOOLEAN,
    xsd::BYTE,
    xsd::SHORT,
    xsd::INT,
    xsd::LONG,
    xsd::INTEGER,
    xsd::DECIMAL,
    xsd::FLOAT,
    xsd::DOUBLE,
    xsd::DATE_TIME,
    xsd::DATE,
    xsd::TIME,
    xsd::NON_NEGATIVE_INTEGER,
    xsd::POSITIVE_INTEGER,
    xsd::UNSIGNED_INT,
    xsd::UNSIGNED_LONG,
    xsd::G_YEAR,
    xsd::DURATION,
    xsd::ANY_URI,
    owl::SAME_AS,
    owl::CLASS,
    owl::THING,
    owl::OBJECT_PROPERTY,
    owl::DATATYPE_PROPERTY,
    geo::WKT_LITERAL,
    skos::PREF_LABEL,
    skos::ALT_LABEL,
    schema::NAME,
    dcterms::TITLE,
    foaf::NAME,
    internal::DEFAULT_CONTEXT,
];

const STANDARD_LANGUAGES: &[&str] = &[
    "en", "de", "fr", "es", "it", "ja", "nl", "pl", "pt", "ru", "sv", "zh", "ar", "cs", "ko",
    "fa", "uk", "ca", "hu", "fi", "da", "no", "tr", "he", "el", "en-GB", "en-US", "pt-BR",
    "zh-Hans", "zh-Hant",
];
