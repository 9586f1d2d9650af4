#![forbid(unsafe_code)]
//! Type-tagged byte encoding of graph values.
//!
//! Every encoded value is `[tag][payload]` where the payload runs to the end
//! of the region. Nested values (quoted triple members, literal datatypes)
//! carry a varint length prefix so the outer decoder knows where they end.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

mod iri;
mod literal;
pub mod tags;
pub mod vocabulary;

pub use tags::TypeTag;
pub use vocabulary::{IdEncoding, IdNamespace, Vocabulary, VocabularyBuilder};

use crate::model::{GraphValue, Triple, ValueKind};
use crate::primitives::bytes::buf::Cursor;
use crate::primitives::bytes::put_len_prefixed;
use crate::types::{Error, Result};

pub(crate) fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| Error::decode(format!("invalid UTF-8: {e}")))
}

/// Immutable, cheaply clonable encoded bytes of one value.
///
/// Always non-empty and starting with an assigned [`TypeTag`].
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EncodedForm(Arc<[u8]>);

impl EncodedForm {
    /// Wraps bytes read from a store, checking the leading tag.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let Some(&first) = bytes.first() else {
            return Err(Error::decode("empty encoded value"));
        };
        TypeTag::from_byte(first)?;
        Ok(Self(Arc::from(bytes)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn tag(&self) -> TypeTag {
        TypeTag(self.0[0])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: an encoded form holds at least its tag.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for EncodedForm {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for EncodedForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedForm({:?} {})", self.tag(), hex::encode(&self.0[1..]))
    }
}

/// Encodes and decodes graph values against one [`Vocabulary`].
#[derive(Clone, Debug)]
pub struct ValueIo {
    vocabulary: Arc<Vocabulary>,
    compression_threshold: usize,
}

impl Default for ValueIo {
    fn default() -> Self {
        Self::new(Arc::new(Vocabulary::standard()))
    }
}

impl ValueIo {
    /// `xsd:string` labels longer than this many bytes are compressed.
    pub const DEFAULT_COMPRESSION_THRESHOLD: usize = 200;

    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            vocabulary,
            compression_threshold: Self::DEFAULT_COMPRESSION_THRESHOLD,
        }
    }

    /// Sets the string compression threshold in bytes.
    pub fn with_compression_threshold(mut self, bytes: usize) -> Self {
        self.compression_threshold = bytes;
        self
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn compression_threshold(&self) -> usize {
        self.compression_threshold
    }

    /// Appends the encoding of `value` to `out` and returns the written range.
    pub fn encode_into(&self, value: &GraphValue, out: &mut Vec<u8>) -> Range<usize> {
        let start = out.len();
        match value {
            GraphValue::Iri(iri) => iri::write_iri(&self.vocabulary, iri, out),
            GraphValue::BlankNode(label) => {
                out.push(TypeTag::BNODE.0);
                out.extend_from_slice(label.as_bytes());
            }
            GraphValue::Literal(lit) => literal::write_literal(self, lit, out),
            GraphValue::Triple(t) => self.write_triple(t, out),
        }
        start..out.len()
    }

    /// Encodes `value` into a fresh [`EncodedForm`].
    pub fn encode(&self, value: &GraphValue) -> EncodedForm {
        let mut out = Vec::with_capacity(32);
        self.encode_into(value, &mut out);
        EncodedForm(Arc::from(out))
    }

    fn write_triple(&self, t: &Triple, out: &mut Vec<u8>) {
        out.push(TypeTag::TRIPLE.0);
        let mut scratch = Vec::with_capacity(64);
        for member in [t.subject(), t.predicate()] {
            scratch.clear();
            self.encode_into(member, &mut scratch);
            put_len_prefixed(out, &scratch);
        }
        self.encode_into(t.object(), out);
    }

    /// Decodes the value starting at `position`. `buf` must end where the
    /// encoded value ends; returns the value and the number of bytes consumed.
    pub fn decode(&self, buf: &[u8], position: usize) -> Result<(GraphValue, usize)> {
        let mut cur = Cursor::at(buf, position)?;
        let value = self.read(&mut cur)?;
        if cur.remaining() != 0 {
            return Err(Error::decode(format!(
                "{} trailing bytes after encoded value",
                cur.remaining()
            )));
        }
        Ok((value, cur.offset() - position))
    }

    /// Decodes a whole region.
    pub fn read_value(&self, bytes: &[u8]) -> Result<GraphValue> {
        self.read_exact(bytes)
    }

    pub(crate) fn read_exact(&self, bytes: &[u8]) -> Result<GraphValue> {
        self.decode(bytes, 0).map(|(value, _)| value)
    }

    fn read(&self, cur: &mut Cursor<'_>) -> Result<GraphValue> {
        let tag = TypeTag::from_byte(cur.read_u8()?)?;
        match tag.kind() {
            ValueKind::Iri => iri::read_iri(&self.vocabulary, tag, cur).map(GraphValue::Iri),
            ValueKind::BlankNode => Ok(GraphValue::BlankNode(utf8(cur.rest())?.to_string())),
            ValueKind::Triple => {
                let subject = self.read_exact(cur.read_len_prefixed()?)?;
                let predicate = self.read_exact(cur.read_len_prefixed()?)?;
                let object = self.read_exact(cur.rest())?;
                if predicate.as_iri().is_none() {
                    return Err(Error::decode(format!(
                        "quoted triple predicate is not an IRI: {predicate}"
                    )));
                }
                Ok(Triple::new(subject, predicate, object)?.into())
            }
            ValueKind::Literal => literal::read_literal(self, tag, cur).map(GraphValue::Literal),
        }
    }
}
