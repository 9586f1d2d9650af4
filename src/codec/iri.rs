//! IRI payloads.

use super::tags::TypeTag;
use super::vocabulary::{compressible_prefix, prefix_for_code, Vocabulary};
use super::utf8;
use crate::primitives::bytes::buf::Cursor;
use crate::types::{Error, Result};

/// Writes the tag and payload for `iri`, picking the most compact form.
pub(super) fn write_iri(vocab: &Vocabulary, iri: &str, out: &mut Vec<u8>) {
    if let Some(hash) = vocab.well_known_hash(iri) {
        out.push(TypeTag::WELL_KNOWN_IRI.0);
        out.extend_from_slice(&hash.to_be_bytes());
        return;
    }
    if let Some((hash, bytes, end_slash)) = vocab.match_id_namespace(iri) {
        let tag = if end_slash {
            TypeTag::END_SLASH_ENCODED_IRI
        } else {
            TypeTag::ENCODED_IRI
        };
        out.push(tag.0);
        out.extend_from_slice(&hash.to_be_bytes());
        out.extend_from_slice(&bytes);
        return;
    }
    if let Some((hash, local)) = vocab.match_namespace(iri) {
        out.push(TypeTag::NAMESPACE_HASH_IRI.0);
        out.extend_from_slice(&hash.to_be_bytes());
        out.extend_from_slice(local.as_bytes());
        return;
    }
    if let Some((code, prefix)) = compressible_prefix(iri) {
        out.push(TypeTag::COMPRESSED_IRI.0);
        out.push(code);
        out.extend_from_slice(iri[prefix.len()..].as_bytes());
        return;
    }
    out.push(TypeTag::IRI.0);
    out.extend_from_slice(iri.as_bytes());
}

/// Reads an IRI payload introduced by `tag`; the cursor region ends with it.
pub(super) fn read_iri(vocab: &Vocabulary, tag: TypeTag, cur: &mut Cursor<'_>) -> Result<String> {
    match tag {
        TypeTag::IRI => Ok(utf8(cur.rest())?.to_string()),
        TypeTag::COMPRESSED_IRI => {
            let code = cur.read_u8()?;
            let prefix = prefix_for_code(code)
                .ok_or_else(|| Error::decode(format!("unknown IRI prefix code {code}")))?;
            Ok(format!("{prefix}{}", utf8(cur.rest())?))
        }
        TypeTag::NAMESPACE_HASH_IRI => {
            let hash = u16::from_be_bytes(cur.read_array()?);
            let ns = vocab
                .namespace(hash)
                .ok_or_else(|| Error::decode(format!("unknown namespace hash 0x{hash:04x}")))?;
            Ok(format!("{ns}{}", utf8(cur.rest())?))
        }
        TypeTag::ENCODED_IRI | TypeTag::END_SLASH_ENCODED_IRI => {
            let hash = u16::from_be_bytes(cur.read_array()?);
            let ns = vocab.id_namespace(hash).ok_or_else(|| {
                Error::decode(format!("unknown identifier namespace hash 0x{hash:04x}"))
            })?;
            let bytes = cur.rest();
            if bytes.is_empty() || ns.size().is_some_and(|size| size != bytes.len()) {
                return Err(Error::decode(format!(
                    "identifier of {} bytes does not fit namespace {}",
                    bytes.len(),
                    ns.prefix()
                )));
            }
            Ok(ns.iri_for(bytes, tag == TypeTag::END_SLASH_ENCODED_IRI))
        }
        TypeTag::WELL_KNOWN_IRI => {
            let hash = u16::from_be_bytes(cur.read_array()?);
            vocab
                .well_known_iri(hash)
                .map(str::to_string)
                .ok_or_else(|| Error::decode(format!("unknown well-known IRI hash 0x{hash:04x}")))
        }
        other => Err(Error::decode(format!("{other} is not an IRI tag"))),
    }
}
