//! N-Triples style term syntax, extended with quoted triples and Turtle's
//! bare numeric and boolean shorthands.
//!
//! ```text
//! <http://example.org/x>        IRI
//! _:b0                          blank node
//! "chat"@fr                     language literal
//! "5"^^<http://...#int>         typed literal
//! 42  4.2  4.2e1  true          xsd:integer, xsd:decimal, xsd:double, xsd:boolean
//! << _:s <p> "o" >>             quoted triple
//! ```

use std::str::FromStr;

use super::vocab::xsd;
use super::{GraphValue, Literal, Quad, Triple};
use crate::types::{Error, Result};

struct TermParser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> TermParser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn error(&self, msg: &str) -> Error {
        Error::usage(format!("{msg} at offset {} in {:?}", self.pos, self.src))
    }

    fn term(&mut self) -> Result<GraphValue> {
        self.skip_ws();
        if self.eat("<<") {
            let subject = self.term()?;
            let predicate = self.term()?;
            let object = self.term()?;
            self.skip_ws();
            if !self.eat(">>") {
                return Err(self.error("expected '>>'"));
            }
            return Triple::new(subject, predicate, object)
                .map(GraphValue::from)
                .map_err(|_| self.error("quoted triple predicate must be an IRI"));
        }
        if self.eat("<") {
            return Ok(GraphValue::Iri(self.iri_body()?));
        }
        if self.eat("_:") {
            let label = self.token();
            if label.is_empty() {
                return Err(self.error("empty blank node label"));
            }
            return Ok(GraphValue::bnode(label));
        }
        if self.eat("\"") {
            return self.literal().map(GraphValue::Literal);
        }
        let token = self.token();
        shorthand(token)
            .map(GraphValue::Literal)
            .ok_or_else(|| self.error("unrecognised term"))
    }

    fn iri_body(&mut self) -> Result<String> {
        let rest = self.rest();
        let end = rest.find('>').ok_or_else(|| self.error("unterminated IRI"))?;
        let iri = rest[..end].to_string();
        self.pos += end + 1;
        Ok(iri)
    }

    /// Reads up to the next whitespace or closing `>>`.
    fn token(&mut self) -> &'a str {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .find(|&(i, c)| c.is_whitespace() || rest[i..].starts_with(">>"))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn literal(&mut self) -> Result<Literal> {
        let mut label = String::new();
        let mut chars = self.rest().char_indices();
        let consumed = loop {
            let Some((i, c)) = chars.next() else {
                return Err(self.error("unterminated string"));
            };
            match c {
                '"' => break i + 1,
                '\\' => {
                    let Some((_, esc)) = chars.next() else {
                        return Err(self.error("dangling escape"));
                    };
                    match esc {
                        'n' => label.push('\n'),
                        'r' => label.push('\r'),
                        't' => label.push('\t'),
                        '"' => label.push('"'),
                        '\'' => label.push('\''),
                        '\\' => label.push('\\'),
                        'u' | 'U' => {
                            let width = if esc == 'u' { 4 } else { 8 };
                            let hex: String = chars.by_ref().take(width).map(|(_, c)| c).collect();
                            let code = u32::from_str_radix(&hex, 16)
                                .ok()
                                .filter(|_| hex.len() == width)
                                .and_then(char::from_u32)
                                .ok_or_else(|| self.error("invalid unicode escape"))?;
                            label.push(code);
                        }
                        _ => return Err(self.error("unknown escape")),
                    }
                }
                c => label.push(c),
            }
        };
        self.pos += consumed;
        if self.eat("@") {
            let lang = self.token();
            if lang.is_empty() {
                return Err(self.error("empty language tag"));
            }
            return Ok(Literal::lang(label, lang));
        }
        if self.eat("^^") {
            if !self.eat("<") {
                return Err(self.error("expected datatype IRI"));
            }
            let datatype = self.iri_body()?;
            return Ok(Literal::typed(label, datatype));
        }
        Ok(Literal::string(label))
    }
}

fn shorthand(token: &str) -> Option<Literal> {
    match token {
        "true" | "false" => return Some(Literal::typed(token, xsd::BOOLEAN)),
        "" => return None,
        _ => {}
    }
    let body = token.strip_prefix(['+', '-']).unwrap_or(token);
    if body.is_empty() || !body.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    if body.bytes().all(|b| b.is_ascii_digit()) {
        return Some(Literal::typed(token, xsd::INTEGER));
    }
    if body.contains(['e', 'E']) {
        return token
            .parse::<f64>()
            .ok()
            .map(|_| Literal::typed(token, xsd::DOUBLE));
    }
    let (int_part, frac_part) = body.split_once('.')?;
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    (digits(int_part) && !frac_part.is_empty() && digits(frac_part))
        .then(|| Literal::typed(token, xsd::DECIMAL))
}

/// Parses one term and rejects trailing input.
pub fn parse_term(src: &str) -> Result<GraphValue> {
    let mut parser = TermParser::new(src);
    let value = parser.term()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error("trailing input"));
    }
    Ok(value)
}

/// Parses `subject predicate object [context] .` with the final dot optional.
pub fn parse_quad(src: &str) -> Result<Quad> {
    let mut parser = TermParser::new(src);
    let subject = parser.term()?;
    let predicate = parser.term()?;
    let object = parser.term()?;
    parser.skip_ws();
    let context = if parser.at_end() || parser.rest() == "." {
        None
    } else {
        Some(parser.term()?)
    };
    parser.skip_ws();
    parser.eat(".");
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error("trailing input"));
    }
    if predicate.as_iri().is_none() {
        return Err(Error::usage(format!("predicate must be an IRI: {predicate}")));
    }
    if !subject.is_resource() {
        return Err(Error::usage(format!("subject cannot be a literal: {subject}")));
    }
    if matches!(context, Some(GraphValue::Literal(_) | GraphValue::Triple(_))) {
        return Err(Error::usage("context must be an IRI or a blank node"));
    }
    Ok(Quad::new(subject, predicate, object, context))
}

impl FromStr for GraphValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_term(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::vocab::rdf;

    #[test]
    fn parses_every_term_form() {
        assert_eq!(
            parse_term("<http://example.org/x>").unwrap(),
            GraphValue::iri("http://example.org/x")
        );
        assert_eq!(parse_term("_:b1").unwrap(), GraphValue::bnode("b1"));
        assert_eq!(
            parse_term("\"chat\"@fr").unwrap(),
            Literal::lang("chat", "fr").into()
        );
        assert_eq!(
            parse_term("\"5\"^^<http://www.w3.org/2001/XMLSchema#int>").unwrap(),
            Literal::int(5).into()
        );
        assert_eq!(parse_term("42").unwrap(), Literal::integer(42).into());
        assert_eq!(
            parse_term("42.0e0").unwrap(),
            Literal::typed("42.0e0", xsd::DOUBLE).into()
        );
        assert_eq!(
            parse_term("-1.5").unwrap(),
            Literal::typed("-1.5", xsd::DECIMAL).into()
        );
        assert_eq!(parse_term("true").unwrap(), Literal::boolean(true).into());
    }

    #[test]
    fn parses_escapes_and_quoted_triples() {
        assert_eq!(
            parse_term(r#""a\"bé\n""#).unwrap(),
            Literal::string("a\"b\u{e9}\n").into()
        );
        let t = parse_term("<< _:s <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> << _:a <p> 1 >> >>")
            .unwrap();
        let GraphValue::Triple(t) = t else {
            panic!("expected triple");
        };
        assert_eq!(t.predicate(), &GraphValue::iri(rdf::TYPE));
        assert!(matches!(t.object(), GraphValue::Triple(_)));
        assert!(parse_term("<< <s> \"p\" <o> >>").is_err());
    }

    #[test]
    fn quads_accept_optional_context_and_dot() {
        let q = parse_quad("<s> <p> \"o\" <g> .").unwrap();
        assert_eq!(q.context, Some(GraphValue::iri("g")));
        let q = parse_quad("<s> <p> \"o\"").unwrap();
        assert_eq!(q.context, None);
        assert!(parse_quad("\"s\" <p> <o>").is_err());
        assert!(parse_quad("<s> _:p <o>").is_err());
    }

    #[test]
    fn display_then_parse_is_identity() {
        let v: GraphValue = Triple::new(
            GraphValue::bnode("x"),
            GraphValue::iri(rdf::VALUE),
            Literal::lang("tab\there", "en-GB").into(),
        )
        .unwrap()
        .into();
        assert_eq!(v.to_string().parse::<GraphValue>().unwrap(), v);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_term("<unterminated").is_err());
        assert!(parse_term("\"open").is_err());
        assert!(parse_term("abc").is_err());
        assert!(parse_term("<a> <b>").is_err());
    }
}
