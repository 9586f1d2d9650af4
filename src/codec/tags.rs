//! The type-tag table. Tag numbers are part of the stored format: new tags
//! may be added, existing numbers are never reassigned.

use std::fmt;

use crate::model::ValueKind;
use crate::types::{Error, Result};

/// First byte of every encoded value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeTag(pub u8);

impl TypeTag {
    pub const IRI: TypeTag = TypeTag(0x01);
    pub const COMPRESSED_IRI: TypeTag = TypeTag(0x02);
    pub const NAMESPACE_HASH_IRI: TypeTag = TypeTag(0x03);
    pub const ENCODED_IRI: TypeTag = TypeTag(0x04);
    pub const END_SLASH_ENCODED_IRI: TypeTag = TypeTag(0x05);
    pub const WELL_KNOWN_IRI: TypeTag = TypeTag(0x06);

    pub const BNODE: TypeTag = TypeTag(0x10);

    pub const TRIPLE: TypeTag = TypeTag(0x18);

    pub const STRING: TypeTag = TypeTag(0x20);
    pub const COMPRESSED_STRING: TypeTag = TypeTag(0x21);
    pub const LANGUAGE_LITERAL: TypeTag = TypeTag(0x22);
    pub const LANGUAGE_HASH_LITERAL: TypeTag = TypeTag(0x23);
    pub const DATATYPE_LITERAL: TypeTag = TypeTag(0x24);
    pub const XML_LITERAL: TypeTag = TypeTag(0x25);
    pub const WKT_LITERAL: TypeTag = TypeTag(0x26);

    pub const FALSE: TypeTag = TypeTag(0x30);
    pub const TRUE: TypeTag = TypeTag(0x31);
    pub const BYTE: TypeTag = TypeTag(0x32);
    pub const SHORT: TypeTag = TypeTag(0x33);
    pub const INT: TypeTag = TypeTag(0x34);
    pub const LONG: TypeTag = TypeTag(0x35);
    pub const FLOAT: TypeTag = TypeTag(0x36);
    pub const DOUBLE: TypeTag = TypeTag(0x37);
    pub const SHORT_COMPRESSED_BIG_INT: TypeTag = TypeTag(0x38);
    pub const INT_COMPRESSED_BIG_INT: TypeTag = TypeTag(0x39);
    pub const LONG_COMPRESSED_BIG_INT: TypeTag = TypeTag(0x3A);
    pub const BIG_INT: TypeTag = TypeTag(0x3B);
    pub const DECIMAL: TypeTag = TypeTag(0x3C);
    pub const BIG_DECIMAL: TypeTag = TypeTag(0x3D);

    pub const DATETIME: TypeTag = TypeTag(0x40);
    pub const DATE: TypeTag = TypeTag(0x41);
    pub const TIME: TypeTag = TypeTag(0x42);

    /// Every assigned tag, in numeric order.
    pub const ALL: [TypeTag; 32] = [
        Self::IRI,
        Self::COMPRESSED_IRI,
        Self::NAMESPACE_HASH_IRI,
        Self::ENCODED_IRI,
        Self::END_SLASH_ENCODED_IRI,
        Self::WELL_KNOWN_IRI,
        Self::BNODE,
        Self::TRIPLE,
        Self::STRING,
        Self::COMPRESSED_STRING,
        Self::LANGUAGE_LITERAL,
        Self::LANGUAGE_HASH_LITERAL,
        Self::DATATYPE_LITERAL,
        Self::XML_LITERAL,
        Self::WKT_LITERAL,
        Self::FALSE,
        Self::TRUE,
        Self::BYTE,
        Self::SHORT,
        Self::INT,
        Self::LONG,
        Self::FLOAT,
        Self::DOUBLE,
        Self::SHORT_COMPRESSED_BIG_INT,
        Self::INT_COMPRESSED_BIG_INT,
        Self::LONG_COMPRESSED_BIG_INT,
        Self::BIG_INT,
        Self::DECIMAL,
        Self::BIG_DECIMAL,
        Self::DATETIME,
        Self::DATE,
        Self::TIME,
    ];

    /// Returns the tag for `byte`, or a decode error for unassigned bytes.
    pub fn from_byte(byte: u8) -> Result<TypeTag> {
        let tag = TypeTag(byte);
        if tag.name().is_some() {
            Ok(tag)
        } else {
            Err(Error::decode(format!("unknown type tag 0x{byte:02x}")))
        }
    }

    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::IRI => "IRI",
            Self::COMPRESSED_IRI => "COMPRESSED_IRI",
            Self::NAMESPACE_HASH_IRI => "NAMESPACE_HASH_IRI",
            Self::ENCODED_IRI => "ENCODED_IRI",
            Self::END_SLASH_ENCODED_IRI => "END_SLASH_ENCODED_IRI",
            Self::WELL_KNOWN_IRI => "WELL_KNOWN_IRI",
            Self::BNODE => "BNODE",
            Self::TRIPLE => "TRIPLE",
            Self::STRING => "STRING",
            Self::COMPRESSED_STRING => "COMPRESSED_STRING",
            Self::LANGUAGE_LITERAL => "LANGUAGE_LITERAL",
            Self::LANGUAGE_HASH_LITERAL => "LANGUAGE_HASH_LITERAL",
            Self::DATATYPE_LITERAL => "DATATYPE_LITERAL",
            Self::XML_LITERAL => "XML_LITERAL",
            Self::WKT_LITERAL => "WKT_LITERAL",
            Self::FALSE => "FALSE",
            Self::TRUE => "TRUE",
            Self::BYTE => "BYTE",
            Self::SHORT => "SHORT",
            Self::INT => "INT",
            Self::LONG => "LONG",
            Self::FLOAT => "FLOAT",
            Self::DOUBLE => "DOUBLE",
            Self::SHORT_COMPRESSED_BIG_INT => "SHORT_COMPRESSED_BIG_INT",
            Self::INT_COMPRESSED_BIG_INT => "INT_COMPRESSED_BIG_INT",
            Self::LONG_COMPRESSED_BIG_INT => "LONG_COMPRESSED_BIG_INT",
            Self::BIG_INT => "BIG_INT",
            Self::DECIMAL => "DECIMAL",
            Self::BIG_DECIMAL => "BIG_DECIMAL",
            Self::DATETIME => "DATETIME",
            Self::DATE => "DATE",
            Self::TIME => "TIME",
            _ => return None,
        })
    }

    /// Kind of value the tag introduces.
    pub fn kind(self) -> ValueKind {
        match self.0 {
            0x01..=0x0F => ValueKind::Iri,
            0x10..=0x17 => ValueKind::BlankNode,
            0x18..=0x1F => ValueKind::Triple,
            _ => ValueKind::Literal,
        }
    }

    /// Plain and language-tagged strings.
    pub fn is_string(self) -> bool {
        matches!(
            self,
            Self::STRING | Self::COMPRESSED_STRING | Self::LANGUAGE_LITERAL | Self::LANGUAGE_HASH_LITERAL
        )
    }

    /// Natively encoded numbers. Numeric literals stored under
    /// [`Self::DATATYPE_LITERAL`] do not count.
    pub fn is_numeric(self) -> bool {
        (Self::BYTE.0..=Self::BIG_DECIMAL.0).contains(&self.0)
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "TypeTag(0x{:02x})", self.0),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
