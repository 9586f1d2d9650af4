#![forbid(unsafe_code)]
//! Fixed-width, content-derived identifiers.
//!
//! An identifier is the configured digest of a value's encoded form, truncated
//! to `id_size` bytes, with a role descriptor written over its first byte (or
//! its first nibble in nibble mode) so callers can tell IRIs, literals, blank
//! nodes and quoted triples apart without decoding anything.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{debug, trace};

pub mod cache;
pub mod metrics;
pub mod value;

pub use cache::IdCache;
pub use metrics::{default_metrics, CounterMetrics, IdMetrics, NoopMetrics};
pub use value::IdentifiableValue;

use crate::codec::{EncodedForm, IdEncoding, TypeTag, ValueIo};
use crate::model::vocab::internal;
use crate::model::{GraphValue, ValueKind};
use crate::primitives::hash::{HashAlgorithm, HashFunction};
use crate::types::{Error, Result};

/// Identifier parameters. Two configs that differ in any field produce
/// unrelated identifier spaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IdentifierConfig {
    hash_algorithm: HashAlgorithm,
    id_size: usize,
    nibble: bool,
}

impl Default for IdentifierConfig {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::Xxh3_128,
            id_size: Self::DEFAULT_ID_SIZE,
            nibble: true,
        }
    }
}

impl IdentifierConfig {
    pub const DEFAULT_ID_SIZE: usize = 10;

    /// Validates the parameters. `id_size` must be positive and no larger
    /// than the digest.
    pub fn new(hash_algorithm: HashAlgorithm, id_size: usize, nibble: bool) -> Result<Self> {
        if id_size == 0 {
            return Err(Error::config("identifier size must be positive"));
        }
        if id_size > hash_algorithm.digest_len() {
            return Err(Error::config(format!(
                "{hash_algorithm} produces {} bytes, identifiers need {id_size}",
                hash_algorithm.digest_len()
            )));
        }
        Ok(Self {
            hash_algorithm,
            id_size,
            nibble,
        })
    }

    /// Parses the algorithm by name, see [`HashAlgorithm`].
    pub fn from_name(hash_algorithm: &str, id_size: usize, nibble: bool) -> Result<Self> {
        Self::new(hash_algorithm.parse()?, id_size, nibble)
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }

    pub fn id_size(&self) -> usize {
        self.id_size
    }

    pub fn nibble(&self) -> bool {
        self.nibble
    }

    /// Writes the descriptor for `roles` into the first byte of `id`.
    pub fn pack_roles(&self, id: &mut [u8], roles: RoleFlags) {
        let Some(first) = id.first_mut() else {
            return;
        };
        let descriptor = roles.descriptor();
        *first = if self.nibble {
            (descriptor << 4) | (*first & 0x0F)
        } else {
            descriptor
        };
    }

    /// Reads the descriptor back. Exact inverse of [`Self::pack_roles`].
    pub fn unpack_roles(&self, id: &Identifier) -> RoleFlags {
        let first = id.as_bytes().first().copied().unwrap_or_default();
        let descriptor = if self.nibble { first >> 4 } else { first & 0x0F };
        RoleFlags::from_descriptor(descriptor)
    }
}

/// Role predicates recoverable from an identifier.
///
/// Descriptor layout (4 bits): `kind:2 | string:1 | numeric:1`, kind being
/// `00` IRI, `01` literal, `10` blank node, `11` quoted triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RoleFlags {
    kind: ValueKind,
    string: bool,
    numeric: bool,
}

impl RoleFlags {
    /// Flags implied by an encoded value's type tag.
    pub fn from_tag(tag: TypeTag) -> Self {
        Self {
            kind: tag.kind(),
            string: tag.is_string(),
            numeric: tag.is_numeric(),
        }
    }

    pub fn descriptor(self) -> u8 {
        let kind = match self.kind {
            ValueKind::Iri => 0b00,
            ValueKind::Literal => 0b01,
            ValueKind::BlankNode => 0b10,
            ValueKind::Triple => 0b11,
        };
        (kind << 2) | (u8::from(self.string) << 1) | u8::from(self.numeric)
    }

    pub fn from_descriptor(descriptor: u8) -> Self {
        let kind = match (descriptor >> 2) & 0b11 {
            0b00 => ValueKind::Iri,
            0b01 => ValueKind::Literal,
            0b10 => ValueKind::BlankNode,
            _ => ValueKind::Triple,
        };
        Self {
            kind,
            string: descriptor & 0b10 != 0,
            numeric: descriptor & 0b01 != 0,
        }
    }

    pub fn kind(self) -> ValueKind {
        self.kind
    }

    pub fn is_iri(self) -> bool {
        self.kind == ValueKind::Iri
    }

    pub fn is_literal(self) -> bool {
        self.kind == ValueKind::Literal
    }

    pub fn is_bnode(self) -> bool {
        self.kind == ValueKind::BlankNode
    }

    pub fn is_triple(self) -> bool {
        self.kind == ValueKind::Triple
    }

    /// Plain or language-tagged string literal.
    pub fn is_string(self) -> bool {
        self.string
    }

    pub fn is_numeric(self) -> bool {
        self.numeric
    }
}

/// A fixed-width identifier. Equality is byte equality.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(SmallVec<[u8; 20]>);

impl Identifier {
    pub(crate) fn from_slice(bytes: &[u8]) -> Self {
        Self(SmallVec::from_slice(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl AsRef<[u8]> for Identifier {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.to_hex())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Derives identifiers under one [`IdentifierConfig`].
///
/// Each factory gets a process-unique generation number; per-value caches use
/// it to tell whether a cached identifier was computed by this factory.
#[derive(Clone)]
pub struct IdentifierFactory {
    config: IdentifierConfig,
    hash: HashFunction,
    io: ValueIo,
    generation: u64,
    cache: Option<Arc<IdCache>>,
    metrics: Arc<dyn IdMetrics>,
}

impl fmt::Debug for IdentifierFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentifierFactory")
            .field("config", &self.config)
            .field("generation", &self.generation)
            .field("cache", &self.cache.is_some())
            .finish()
    }
}

impl IdentifierFactory {
    pub fn new(config: IdentifierConfig, io: ValueIo) -> Result<Self> {
        let config = IdentifierConfig::new(config.hash_algorithm, config.id_size, config.nibble)?;
        let hash = HashFunction::new(config.hash_algorithm, config.id_size)?;
        let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        debug!(
            algorithm = %config.hash_algorithm,
            id_size = config.id_size,
            nibble = config.nibble,
            generation,
            "id.factory.created"
        );
        Ok(Self {
            config,
            hash,
            io,
            generation,
            cache: None,
            metrics: default_metrics(),
        })
    }

    /// Enables the sharded identifier cache.
    pub fn with_cache(mut self, shards: usize, capacity: usize) -> Self {
        self.cache = Some(Arc::new(IdCache::new(shards, capacity)));
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn IdMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &IdentifierConfig {
        &self.config
    }

    pub fn io(&self) -> &ValueIo {
        &self.io
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn id_size(&self) -> usize {
        self.config.id_size
    }

    pub(crate) fn metrics(&self) -> &dyn IdMetrics {
        self.metrics.as_ref()
    }

    /// Hashes the encoded form and packs its role descriptor.
    pub fn derive(&self, encoded: &EncodedForm) -> Identifier {
        if let Some(cache) = &self.cache {
            if let Some(id) = cache.get(encoded) {
                self.metrics.cache_lookup(true);
                return id;
            }
            self.metrics.cache_lookup(false);
        }
        let id = self.derive_uncached(encoded);
        if let Some(cache) = &self.cache {
            cache.insert(encoded.clone(), id.clone());
        }
        id
    }

    fn derive_uncached(&self, encoded: &EncodedForm) -> Identifier {
        let mut bytes: SmallVec<[u8; 20]> = SmallVec::from_vec(self.hash.apply(encoded.as_bytes()));
        self.config
            .pack_roles(&mut bytes, RoleFlags::from_tag(encoded.tag()));
        self.metrics.derived();
        trace!(tag = ?encoded.tag(), len = encoded.len(), "id.derive");
        Identifier(bytes)
    }

    pub fn encode(&self, value: &GraphValue) -> EncodedForm {
        self.io.encode(value)
    }

    pub fn id(&self, value: &GraphValue) -> Identifier {
        self.derive(&self.encode(value))
    }

    pub fn unpack_roles(&self, id: &Identifier) -> RoleFlags {
        self.config.unpack_roles(id)
    }

    /// Wraps raw bytes read back from a store, checking the width.
    pub fn identifier_from_bytes(&self, bytes: &[u8]) -> Result<Identifier> {
        if bytes.len() != self.config.id_size {
            return Err(Error::decode(format!(
                "identifier of {} bytes, expected {}",
                bytes.len(),
                self.config.id_size
            )));
        }
        Ok(Identifier::from_slice(bytes))
    }

    /// Places `id` in the internal value-id namespace.
    pub fn mint_iri(&self, id: &Identifier) -> GraphValue {
        GraphValue::Iri(format!(
            "{}{}",
            internal::VALUE_ID_NS,
            IdEncoding::Base64Url.encode(id.as_bytes())
        ))
    }

    /// Recovers the identifier carried by a minted IRI, without rehashing.
    pub fn identifier_from_iri(&self, value: &GraphValue) -> Option<Identifier> {
        let local = value.as_iri()?.strip_prefix(internal::VALUE_ID_NS)?;
        let bytes = IdEncoding::Base64Url.decode_canonical(local)?;
        self.identifier_from_bytes(&bytes).ok()
    }
}
