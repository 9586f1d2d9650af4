use tracing::{debug, trace};

use super::{KeySizes, QuadIds, QuadPattern, Role, ScanRange, StatementIndex, STOP_BYTE};
use crate::codec::EncodedForm;
use crate::id::{Identifier, IdentifierFactory};
use crate::model::vocab::internal;
use crate::model::{GraphValue, Quad};
use crate::primitives::bytes::buf::Cursor;
use crate::primitives::bytes::put_len_prefixed;
use crate::primitives::hash::hash32;
use crate::types::{Error, Result};

/// Encoded forms of the four statement positions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedQuad {
    pub subject: EncodedForm,
    pub predicate: EncodedForm,
    pub object: EncodedForm,
    pub context: Option<EncodedForm>,
}

impl EncodedQuad {
    /// Cell value: length-prefixed s, p, o, then the context verbatim.
    pub fn value_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            self.subject.len()
                + self.predicate.len()
                + self.object.len()
                + self.context.as_ref().map_or(0, EncodedForm::len)
                + 8,
        );
        put_len_prefixed(&mut out, self.subject.as_bytes());
        put_len_prefixed(&mut out, self.predicate.as_bytes());
        put_len_prefixed(&mut out, self.object.as_bytes());
        if let Some(c) = &self.context {
            out.extend_from_slice(c.as_bytes());
        }
        out
    }
}

/// One stored cell of one index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatementCell {
    pub index: StatementIndex,
    pub row: Vec<u8>,
    pub qualifier: Vec<u8>,
    pub value: Vec<u8>,
}

/// A cell read back: full identifiers and decoded values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedCell {
    pub ids: QuadIds,
    pub quad: Quad,
}

/// Builds and parses the row keys of the six statement indices.
#[derive(Clone, Debug)]
pub struct StatementIndices {
    factory: IdentifierFactory,
    key_sizes: KeySizes,
    default_context: Identifier,
}

impl StatementIndices {
    pub fn new(factory: IdentifierFactory, key_sizes: KeySizes) -> Result<Self> {
        key_sizes.validate(factory.id_size())?;
        let default_context = factory.id(&GraphValue::iri(internal::DEFAULT_CONTEXT));
        debug!(
            id_size = factory.id_size(),
            subject = key_sizes.subject,
            predicate = key_sizes.predicate,
            object = key_sizes.object,
            context = key_sizes.context,
            "index.indices.created"
        );
        Ok(Self {
            factory,
            key_sizes,
            default_context,
        })
    }

    pub fn factory(&self) -> &IdentifierFactory {
        &self.factory
    }

    pub fn key_sizes(&self) -> &KeySizes {
        &self.key_sizes
    }

    /// Identifier under which default-graph statements are filed in the
    /// context indices.
    pub fn default_context(&self) -> &Identifier {
        &self.default_context
    }

    /// Left rotation applied to `role`'s identifier in `index`.
    pub fn byte_shift(&self, index: StatementIndex, role: Role) -> Option<usize> {
        index
            .position(role)
            .map(|pos| pos % self.factory.id_size().max(1))
    }

    /// Row-key portion of `id` for `role` in `index`.
    pub fn key_hash(&self, index: StatementIndex, role: Role, id: &Identifier) -> Vec<u8> {
        self.split(index, role, id).0
    }

    /// Rotates `id` and splits it into (key hash, qualifier remainder).
    pub(crate) fn split(&self, index: StatementIndex, role: Role, id: &Identifier) -> (Vec<u8>, Vec<u8>) {
        let bytes = id.as_bytes();
        let mut rotated = bytes.to_vec();
        if !rotated.is_empty() {
            let shift = self.byte_shift(index, role).unwrap_or(0) % rotated.len();
            rotated.rotate_left(shift);
        }
        let k = self.key_sizes.get(role).min(rotated.len());
        let rem = rotated.split_off(k);
        (rotated, rem)
    }

    /// Inverse of [`Self::split`].
    pub fn recover(
        &self,
        index: StatementIndex,
        role: Role,
        key_hash: &[u8],
        remainder: &[u8],
    ) -> Result<Identifier> {
        let mut bytes = Vec::with_capacity(key_hash.len() + remainder.len());
        bytes.extend_from_slice(key_hash);
        bytes.extend_from_slice(remainder);
        if bytes.len() != self.factory.id_size() {
            return Err(Error::decode(format!(
                "{index} {role}: {} identifier bytes, expected {}",
                bytes.len(),
                self.factory.id_size()
            )));
        }
        let shift = self.byte_shift(index, role).unwrap_or(0) % bytes.len();
        bytes.rotate_right(shift);
        self.factory.identifier_from_bytes(&bytes)
    }

    /// Scan range over `index` for the bound roles of `pattern`.
    ///
    /// `None` when the bound roles are not a prefix of the index order, or when
    /// a triple index is asked to bind the context.
    pub fn build_key(&self, index: StatementIndex, pattern: &QuadPattern) -> Option<ScanRange> {
        if !index.is_quad() && pattern.context.is_some() {
            return None;
        }
        let mut seen_unbound = false;
        for role in index.roles() {
            match (pattern.get(*role).is_some(), seen_unbound) {
                (true, true) => return None,
                (false, _) => seen_unbound = true,
                _ => {}
            }
        }
        Some(self.range_for(index, pattern))
    }

    /// Picks the index that answers `pattern` and builds its range.
    pub fn scan(&self, pattern: &QuadPattern) -> ScanRange {
        self.range_for(Self::select(pattern), pattern)
    }

    /// Index whose order starts with the bound roles of `pattern`.
    pub fn select(pattern: &QuadPattern) -> StatementIndex {
        let s = pattern.subject.is_some();
        let p = pattern.predicate.is_some();
        let o = pattern.object.is_some();
        let triple = match (s, p, o) {
            (true, true, _) | (true, false, false) | (false, false, false) => StatementIndex::Spo,
            (false, true, _) => StatementIndex::Pos,
            (true, false, true) | (false, false, true) => StatementIndex::Osp,
        };
        match (pattern.context.is_some(), triple) {
            (false, idx) => idx,
            (true, StatementIndex::Pos) => StatementIndex::Cpos,
            (true, StatementIndex::Osp) => StatementIndex::Cosp,
            (true, _) => StatementIndex::Cspo,
        }
    }

    /// Start is the prefix and the leading bound key hashes; stop appends a
    /// `STOP_BYTE` run for every remaining role plus a terminator.
    pub(crate) fn range_for(&self, index: StatementIndex, pattern: &QuadPattern) -> ScanRange {
        let mut start = vec![index.prefix()];
        let mut roles = index.roles().iter();
        let mut tail = 0usize;
        for role in roles.by_ref() {
            match pattern.get(*role) {
                Some(id) => start.extend_from_slice(&self.key_hash(index, *role, id)),
                None => {
                    tail += self.key_sizes.get(*role);
                    break;
                }
            }
        }
        tail += roles.map(|r| self.key_sizes.get(*r)).sum::<usize>();
        let mut stop = start.clone();
        stop.resize(stop.len() + tail + 1, STOP_BYTE);
        trace!(%index, start = %hex::encode(&start), "index.range");
        ScanRange { index, start, stop }
    }

    /// Encodes a quad and derives its identifiers. A context naming the
    /// default graph itself is dropped, so the quad belongs to the default graph.
    pub fn encode_quad(&self, quad: &Quad) -> (QuadIds, EncodedQuad) {
        let context = quad
            .context
            .as_ref()
            .filter(|c| c.as_iri() != Some(internal::DEFAULT_CONTEXT));
        let encoded = EncodedQuad {
            subject: self.factory.encode(&quad.subject),
            predicate: self.factory.encode(&quad.predicate),
            object: self.factory.encode(&quad.object),
            context: context.map(|c| self.factory.encode(c)),
        };
        let ids = QuadIds {
            subject: self.factory.derive(&encoded.subject),
            predicate: self.factory.derive(&encoded.predicate),
            object: self.factory.derive(&encoded.object),
            context: encoded.context.as_ref().map(|c| self.factory.derive(c)),
        };
        (ids, encoded)
    }

    /// One cell per index for `quad`.
    pub fn cells(&self, quad: &Quad) -> Vec<StatementCell> {
        let (ids, encoded) = self.encode_quad(quad);
        self.cells_for(&ids, &encoded)
    }

    pub fn cells_for(&self, ids: &QuadIds, encoded: &EncodedQuad) -> Vec<StatementCell> {
        let value = encoded.value_bytes();
        let context = ids.context.as_ref().unwrap_or(&self.default_context);
        StatementIndex::ALL
            .iter()
            .map(|&index| {
                let mut row = Vec::with_capacity(1 + 4 * self.factory.id_size());
                row.push(index.prefix());
                let mut qualifier = Vec::with_capacity(4 * self.factory.id_size());
                for role in index.roles() {
                    let id = match role {
                        Role::Context => context,
                        other => ids.get(*other).unwrap_or(context),
                    };
                    let (kh, rem) = self.split(index, *role, id);
                    row.extend_from_slice(&kh);
                    qualifier.extend_from_slice(&rem);
                }
                if !index.is_quad() {
                    if let Some(c) = &ids.context {
                        qualifier.extend_from_slice(c.as_bytes());
                    }
                }
                StatementCell {
                    index,
                    row,
                    qualifier,
                    value: value.clone(),
                }
            })
            .collect()
    }

    /// Recovers identifiers from row and qualifier and decodes the value.
    pub fn parse_cell(
        &self,
        index: StatementIndex,
        row: &[u8],
        qualifier: &[u8],
        value: &[u8],
    ) -> Result<ParsedCell> {
        let id_size = self.factory.id_size();
        let roles = index.roles();
        let row_len = 1 + roles.iter().map(|r| self.key_sizes.get(*r)).sum::<usize>();
        let rem_len = roles.len() * id_size + 1 - row_len;
        if row.len() != row_len || row.first() != Some(&index.prefix()) {
            return Err(Error::decode(format!(
                "{index} row of {} bytes, expected {row_len} starting with {}",
                row.len(),
                index.prefix()
            )));
        }
        let has_full_context = if qualifier.len() == rem_len {
            false
        } else if !index.is_quad() && qualifier.len() == rem_len + id_size {
            true
        } else {
            return Err(Error::decode(format!(
                "{index} qualifier of {} bytes",
                qualifier.len()
            )));
        };

        let mut keys = Cursor::new(&row[1..]);
        let mut rems = Cursor::new(qualifier);
        let mut recovered: [Option<Identifier>; 4] = Default::default();
        for role in roles {
            let k = self.key_sizes.get(*role);
            let id = self.recover(index, *role, keys.take(k)?, rems.take(id_size - k)?)?;
            recovered[*role as usize] = Some(id);
        }
        let context = if has_full_context {
            Some(self.factory.identifier_from_bytes(rems.rest())?)
        } else {
            recovered[Role::Context as usize]
                .take()
                .filter(|c| c != &self.default_context)
        };
        let [Some(subject), Some(predicate), Some(object), _] = recovered else {
            return Err(Error::decode(format!("{index} cell misses a role")));
        };

        let mut cur = Cursor::new(value);
        let io = self.factory.io();
        let s = io.read_value(cur.read_len_prefixed()?)?;
        let p = io.read_value(cur.read_len_prefixed()?)?;
        let o = io.read_value(cur.read_len_prefixed()?)?;
        let c = match cur.rest() {
            [] => None,
            bytes => Some(io.read_value(bytes)?),
        };
        if c.is_some() != context.is_some() {
            return Err(Error::decode(format!(
                "{index} cell disagrees with its value about the context"
            )));
        }
        Ok(ParsedCell {
            ids: QuadIds {
                subject,
                predicate,
                object,
                context,
            },
            quad: Quad::new(s, p, o, c),
        })
    }

    /// Region boundaries: each index split `2^bits` ways on the first byte
    /// after its prefix, closed by a key past the last index.
    pub fn pre_split_keys(&self, bits: u32) -> Result<Vec<Vec<u8>>> {
        if bits > 8 {
            return Err(Error::usage(format!(
                "cannot pre-split on {bits} bits of one byte"
            )));
        }
        let mut keys = Vec::with_capacity(StatementIndex::ALL.len() << bits | 1);
        for index in StatementIndex::ALL {
            keys.push(vec![index.prefix()]);
            for i in 1u32..(1 << bits) {
                keys.push(vec![index.prefix(), (i << (8 - bits)) as u8]);
            }
        }
        keys.push(vec![StatementIndex::ALL.len() as u8]);
        debug!(bits, keys = keys.len(), "index.pre_split");
        Ok(keys)
    }

    /// Bulk-load bucket for `row`.
    pub fn load_partition(&self, row: &[u8], count: usize) -> Result<usize> {
        if count == 0 {
            return Err(Error::usage("load partition count must be positive"));
        }
        Ok(hash32(row) as usize % count)
    }
}
