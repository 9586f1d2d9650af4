//! Graph values: IRIs, blank nodes, literals and quoted triples.

use std::fmt;

use time::OffsetDateTime;

use crate::types::{Error, Result};

pub mod lexical;
pub mod parse;
pub mod vocab;

use vocab::{rdf, xsd};

/// Coarse kind of a [`GraphValue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Iri,
    Literal,
    BlankNode,
    Triple,
}

/// Any value that can occupy a statement role.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GraphValue {
    Iri(String),
    BlankNode(String),
    Literal(Literal),
    Triple(Box<Triple>),
}

impl GraphValue {
    pub fn iri(iri: impl Into<String>) -> Self {
        GraphValue::Iri(iri.into())
    }

    pub fn bnode(label: impl Into<String>) -> Self {
        GraphValue::BlankNode(label.into())
    }

    pub fn triple(subject: GraphValue, predicate: GraphValue, object: GraphValue) -> Result<Self> {
        Triple::new(subject, predicate, object).map(Self::from)
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            GraphValue::Iri(_) => ValueKind::Iri,
            GraphValue::BlankNode(_) => ValueKind::BlankNode,
            GraphValue::Literal(_) => ValueKind::Literal,
            GraphValue::Triple(_) => ValueKind::Triple,
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            GraphValue::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            GraphValue::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Anything but a literal.
    pub fn is_resource(&self) -> bool {
        !matches!(self, GraphValue::Literal(_))
    }
}

impl From<Literal> for GraphValue {
    fn from(lit: Literal) -> Self {
        GraphValue::Literal(lit)
    }
}

impl From<Triple> for GraphValue {
    fn from(t: Triple) -> Self {
        GraphValue::Triple(Box::new(t))
    }
}

/// A typed or language-tagged literal.
///
/// Fields are private so a language literal always carries `rdf:langString`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    label: String,
    datatype: String,
    language: Option<String>,
}

impl Literal {
    /// An `xsd:string` literal.
    pub fn string(label: impl Into<String>) -> Self {
        Self::typed(label, xsd::STRING)
    }

    pub fn typed(label: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    /// A language-tagged string; the datatype becomes `rdf:langString`.
    /// An empty tag carries no language, so the result is a plain `xsd:string`.
    pub fn lang(label: impl Into<String>, language: impl Into<String>) -> Self {
        let language = language.into();
        if language.is_empty() {
            return Self::string(label);
        }
        Self {
            label: label.into(),
            datatype: rdf::LANG_STRING.to_string(),
            language: Some(language),
        }
    }

    pub fn boolean(v: bool) -> Self {
        Self::typed(lexical::format_boolean(v), xsd::BOOLEAN)
    }

    pub fn byte(v: i8) -> Self {
        Self::typed(v.to_string(), xsd::BYTE)
    }

    pub fn short(v: i16) -> Self {
        Self::typed(v.to_string(), xsd::SHORT)
    }

    pub fn int(v: i32) -> Self {
        Self::typed(v.to_string(), xsd::INT)
    }

    pub fn long(v: i64) -> Self {
        Self::typed(v.to_string(), xsd::LONG)
    }

    /// An `xsd:integer`.
    pub fn integer(v: i64) -> Self {
        Self::typed(v.to_string(), xsd::INTEGER)
    }

    pub fn float(v: f32) -> Self {
        Self::typed(lexical::format_float(v), xsd::FLOAT)
    }

    pub fn double(v: f64) -> Self {
        Self::typed(lexical::format_double(v), xsd::DOUBLE)
    }

    /// An `xsd:decimal` of `unscaled * 10^-scale`.
    pub fn decimal(unscaled: i64, scale: u32) -> Self {
        Self::typed(
            lexical::Decimal { unscaled, scale }.format(),
            xsd::DECIMAL,
        )
    }

    /// An `xsd:dateTime` keeping the value's offset.
    pub fn date_time(v: OffsetDateTime) -> Self {
        let label = lexical::format_date_time(&lexical::XsdDateTime {
            date: v.date(),
            time: v.time(),
            offset_minutes: Some(v.offset().whole_minutes()),
        });
        Self::typed(label, xsd::DATE_TIME)
    }

    pub fn date(v: time::Date) -> Self {
        let label = lexical::format_date(&lexical::XsdDate {
            date: v,
            offset_minutes: None,
        });
        Self::typed(label, xsd::DATE)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Plain or language-tagged string.
    pub fn is_string(&self) -> bool {
        self.language.is_some() || self.datatype == xsd::STRING
    }

    pub fn is_numeric(&self) -> bool {
        xsd::NUMERIC.contains(&self.datatype.as_str())
    }
}

/// A subject, predicate, object statement; also the payload of quoted triples.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Triple {
    subject: GraphValue,
    predicate: GraphValue,
    object: GraphValue,
}

impl Triple {
    /// Fails with [`Error::Usage`] unless the predicate is an IRI.
    pub fn new(subject: GraphValue, predicate: GraphValue, object: GraphValue) -> Result<Self> {
        if predicate.as_iri().is_none() {
            return Err(Error::usage(format!(
                "triple predicate is not an IRI: {predicate}"
            )));
        }
        Ok(Self {
            subject,
            predicate,
            object,
        })
    }

    pub fn subject(&self) -> &GraphValue {
        &self.subject
    }

    pub fn predicate(&self) -> &GraphValue {
        &self.predicate
    }

    pub fn object(&self) -> &GraphValue {
        &self.object
    }
}

/// A triple plus an optional named graph. `None` is the default graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Quad {
    pub subject: GraphValue,
    pub predicate: GraphValue,
    pub object: GraphValue,
    pub context: Option<GraphValue>,
}

impl Quad {
    pub fn new(
        subject: GraphValue,
        predicate: GraphValue,
        object: GraphValue,
        context: Option<GraphValue>,
    ) -> Self {
        Self {
            subject,
            predicate,
            object,
            context,
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{c}")?,
        }
    }
    Ok(())
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        write_escaped(f, &self.label)?;
        f.write_str("\"")?;
        match &self.language {
            Some(lang) => write!(f, "@{lang}"),
            None if self.datatype == xsd::STRING => Ok(()),
            None => write!(f, "^^<{}>", self.datatype),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<< {} {} {} >>", self.subject, self.predicate, self.object)
    }
}

impl fmt::Display for GraphValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphValue::Iri(iri) => write!(f, "<{iri}>"),
            GraphValue::BlankNode(label) => write!(f, "_:{label}"),
            GraphValue::Literal(lit) => lit.fmt(f),
            GraphValue::Triple(t) => t.fmt(f),
        }
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if let Some(ctx) = &self.context {
            write!(f, " {ctx}")?;
        }
        f.write_str(" .")
    }
}
