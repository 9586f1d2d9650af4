use quadkey::codec::{TypeTag, ValueIo};
use quadkey::model::vocab::{geo, internal, rdf, wikidata, xsd};
use quadkey::model::{GraphValue, Literal};
use quadkey::Error;

fn corpus() -> Vec<(GraphValue, TypeTag)> {
    let long_text = "There are many variations of passages of Lorem Ipsum available, but the majority have suffered alteration in some form, by injected humour, or randomised words which don't look even slightly believable. If you are going to use a passage of Lorem Ipsum, you need to be sure there isn't anything embarrassing hidden in the middle of text.";
    let long_spanish = "Hay muchas variaciones de los pasajes de Lorem Ipsum disponibles, pero la mayoría sufrió alteraciones en alguna forma, por humor inyectado, o palabras aleatorias que no parecen ni un poco creíbles. Si vas a utilizar un pasaje de Lorem Ipsum, necesitás estar seguro de que no hay nada avergonzado escondido en el medio del texto.";
    let hex40 = "31e9c3cb6ab9f5b6a7f8b9a0e3cb1c2d3e4f5061";
    vec![
        (GraphValue::iri(rdf::TYPE), TypeTag::WELL_KNOWN_IRI),
        (Literal::string("foo").into(), TypeTag::STRING),
        (GraphValue::bnode("__foobar__"), TypeTag::BNODE),
        (GraphValue::iri("test:/foo"), TypeTag::IRI),
        (GraphValue::iri("http://www.testmyiri.com"), TypeTag::COMPRESSED_IRI),
        (GraphValue::iri("https://www.testmyiri.com"), TypeTag::COMPRESSED_IRI),
        (GraphValue::iri("http://dx.doi.org/blah"), TypeTag::COMPRESSED_IRI),
        (GraphValue::iri("https://dx.doi.org/blah"), TypeTag::COMPRESSED_IRI),
        (Literal::string("5423").into(), TypeTag::STRING),
        (Literal::string("\u{98df}").into(), TypeTag::STRING),
        (Literal::boolean(true).into(), TypeTag::TRUE),
        (Literal::boolean(false).into(), TypeTag::FALSE),
        (Literal::byte(6).into(), TypeTag::BYTE),
        (Literal::short(7843).into(), TypeTag::SHORT),
        (Literal::int(34).into(), TypeTag::INT),
        (Literal::double(87.232).into(), TypeTag::DOUBLE),
        (Literal::long(74234).into(), TypeTag::LONG),
        (Literal::float(4.809).into(), TypeTag::FLOAT),
        (Literal::integer(96).into(), TypeTag::SHORT_COMPRESSED_BIG_INT),
        (
            Literal::integer(i64::from(i32::MIN)).into(),
            TypeTag::INT_COMPRESSED_BIG_INT,
        ),
        (
            Literal::integer(i64::MAX - 7).into(),
            TypeTag::LONG_COMPRESSED_BIG_INT,
        ),
        (
            Literal::typed(format!("{}{}", i64::MAX, i64::MAX), xsd::INTEGER).into(),
            TypeTag::BIG_INT,
        ),
        (Literal::decimal(85603, 2).into(), TypeTag::DECIMAL),
        (
            Literal::typed("123456789012345678901234567890.5", xsd::DECIMAL).into(),
            TypeTag::BIG_DECIMAL,
        ),
        (Literal::typed("z", xsd::INT).into(), TypeTag::DATATYPE_LITERAL),
        (GraphValue::iri(rdf::NAMESPACE), TypeTag::NAMESPACE_HASH_IRI),
        (Literal::typed("xyz", rdf::NAMESPACE).into(), TypeTag::DATATYPE_LITERAL),
        (
            Literal::typed("2000-01-01T00:00:00Z", xsd::DATE_TIME).into(),
            TypeTag::DATETIME,
        ),
        (
            Literal::typed("1990-06-20T00:00:00.020005", xsd::DATE_TIME).into(),
            TypeTag::DATETIME,
        ),
        (Literal::typed("13:03:22", xsd::TIME).into(), TypeTag::TIME),
        (Literal::typed("13:03:22.04003", xsd::TIME).into(), TypeTag::TIME),
        (Literal::typed("1980-02-14", xsd::DATE).into(), TypeTag::DATE),
        (Literal::typed("2022-09-09+03:00", xsd::DATE).into(), TypeTag::DATE),
        (Literal::typed("foo", "urn:bar:1").into(), TypeTag::DATATYPE_LITERAL),
        (Literal::lang("foo", "en-GB").into(), TypeTag::LANGUAGE_HASH_LITERAL),
        (Literal::lang("bar", "zx-XY").into(), TypeTag::LANGUAGE_LITERAL),
        (
            Literal::lang("\u{6f2b}\u{753b}", "ja").into(),
            TypeTag::LANGUAGE_HASH_LITERAL,
        ),
        (
            Literal::typed("Point(-0.0 0.0)", geo::WKT_LITERAL).into(),
            TypeTag::WKT_LITERAL,
        ),
        (
            Literal::typed("invalid\n", geo::WKT_LITERAL).into(),
            TypeTag::WKT_LITERAL,
        ),
        (
            Literal::typed("<xml>data</xml>", rdf::XML_LITERAL).into(),
            TypeTag::XML_LITERAL,
        ),
        (
            Literal::typed("invalid<", rdf::XML_LITERAL).into(),
            TypeTag::XML_LITERAL,
        ),
        (
            Literal::typed("0000-06-20T00:00:00Z", xsd::DATE_TIME).into(),
            TypeTag::DATATYPE_LITERAL,
        ),
        (Literal::string(long_text).into(), TypeTag::COMPRESSED_STRING),
        (
            Literal::lang(long_spanish, "es").into(),
            TypeTag::LANGUAGE_HASH_LITERAL,
        ),
        (
            GraphValue::iri(format!(
                "{}eRg5UlsxjZuh-4meqlYQe3-J8X8",
                internal::VALUE_ID_NS
            )),
            TypeTag::ENCODED_IRI,
        ),
        (
            GraphValue::iri(format!("{}{hex40}", wikidata::WDV)),
            TypeTag::ENCODED_IRI,
        ),
        (
            GraphValue::iri(format!("{}invalid", wikidata::WDV)),
            TypeTag::NAMESPACE_HASH_IRI,
        ),
        (
            GraphValue::iri(format!("{}{hex40}/", wikidata::WDV)),
            TypeTag::END_SLASH_ENCODED_IRI,
        ),
        (
            GraphValue::triple(
                GraphValue::iri("http://example.org/s"),
                GraphValue::iri(rdf::TYPE),
                Literal::int(3).into(),
            )
            .unwrap(),
            TypeTag::TRIPLE,
        ),
    ]
}

#[test]
fn corpus_values_use_expected_tags_and_roundtrip() {
    let io = ValueIo::default();
    for (value, tag) in corpus() {
        let encoded = io.encode(&value);
        assert_eq!(encoded.tag(), tag, "{value}");
        assert_eq!(io.read_value(encoded.as_bytes()).unwrap(), value, "{value}");
    }
}

#[test]
fn decodes_from_a_sub_range() {
    let io = ValueIo::default();
    for (value, _) in corpus() {
        let mut buf = vec![0xAA, 0xBB, 0xCC];
        let range = io.encode_into(&value, &mut buf);
        assert_eq!(range.start, 3);
        let (decoded, consumed) = io.decode(&buf, 3).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(consumed, buf.len() - 3);
    }
}

#[test]
fn integer_and_double_keep_their_datatypes() {
    let io = ValueIo::default();
    let integer: GraphValue = Literal::integer(42).into();
    let double: GraphValue = Literal::typed("42.0", xsd::DOUBLE).into();
    let a = io.encode(&integer);
    let b = io.encode(&double);
    assert_ne!(a.tag(), b.tag());
    let back_a = io.read_value(a.as_bytes()).unwrap();
    let back_b = io.read_value(b.as_bytes()).unwrap();
    assert_eq!(back_a.as_literal().unwrap().datatype(), xsd::INTEGER);
    assert_eq!(back_b.as_literal().unwrap().datatype(), xsd::DOUBLE);
}

#[test]
fn non_canonical_labels_survive_verbatim() {
    let io = ValueIo::default();
    for (label, datatype) in [
        ("01", xsd::INTEGER),
        ("+5", xsd::INT),
        ("1.50", xsd::DECIMAL),
        ("TRUE", xsd::BOOLEAN),
        ("2000-01-01T00:00:00+00:00", xsd::DATE_TIME),
        ("1e3", xsd::DOUBLE),
    ] {
        let value: GraphValue = Literal::typed(label, datatype).into();
        let encoded = io.encode(&value);
        assert_eq!(encoded.tag(), TypeTag::DATATYPE_LITERAL, "{label}");
        assert_eq!(io.read_value(encoded.as_bytes()).unwrap(), value);
    }
}

#[test]
fn corrupt_input_is_a_decode_error() {
    let io = ValueIo::default();
    let good = io.encode(&Literal::long(5).into());
    let truncated = &good.as_bytes()[..good.len() - 1];
    for bad in [&[][..], &[0xEE][..], truncated, &[TypeTag::WELL_KNOWN_IRI.0, 0][..]] {
        assert!(matches!(io.read_value(bad), Err(Error::Decode(_))), "{bad:?}");
    }
    let mut trailing = good.as_bytes().to_vec();
    trailing.push(0);
    assert!(matches!(io.read_value(&trailing), Err(Error::Decode(_))));
}

#[test]
fn out_of_range_zone_offsets_are_decode_errors() {
    let io = ValueIo::default();
    // julian day 2451545 is 2000-01-01
    let day = [0x00, 0x25, 0x68, 0x59];
    for offset in [[0x80, 0x00], [0x03, 0x49], [0xFC, 0xB7]] {
        let mut date = vec![TypeTag::DATE.0];
        date.extend_from_slice(&day);
        date.extend_from_slice(&offset);
        assert!(matches!(io.read_value(&date), Err(Error::Decode(_))), "{offset:?}");

        let mut time = vec![TypeTag::TIME.0];
        time.extend_from_slice(&[0; 8]);
        time.extend_from_slice(&offset);
        assert!(matches!(io.read_value(&time), Err(Error::Decode(_))), "{offset:?}");

        let mut date_time = vec![TypeTag::DATETIME.0];
        date_time.extend_from_slice(&[0; 12]);
        date_time.extend_from_slice(&offset);
        assert!(matches!(io.read_value(&date_time), Err(Error::Decode(_))), "{offset:?}");
    }
    let mut edge = vec![TypeTag::DATE.0];
    edge.extend_from_slice(&day);
    edge.extend_from_slice(&(14i16 * 60).to_be_bytes());
    assert!(io.read_value(&edge).is_ok());
}

#[test]
fn decimal_scale_is_bounded() {
    let io = ValueIo::default();
    // zigzag varints: scale u32::MAX, unscaled 1
    let huge = [TypeTag::DECIMAL.0, 0xFE, 0xFF, 0xFF, 0xFF, 0x1F, 0x02];
    assert!(matches!(io.read_value(&huge), Err(Error::Decode(_))));
    let just_over = [TypeTag::DECIMAL.0, 0x82, 0x01, 0x02];
    assert!(matches!(io.read_value(&just_over), Err(Error::Decode(_))));
    let widest = [TypeTag::DECIMAL.0, 0x80, 0x01, 0x02];
    let expected: GraphValue = Literal::decimal(1, 64).into();
    assert_eq!(io.read_value(&widest).unwrap(), expected);

    for scale in [64, 65, 200] {
        let value: GraphValue = Literal::decimal(1, scale).into();
        let encoded = io.encode(&value);
        let tag = if scale <= 64 { TypeTag::DECIMAL } else { TypeTag::BIG_DECIMAL };
        assert_eq!(encoded.tag(), tag, "{scale}");
        assert_eq!(io.read_value(encoded.as_bytes()).unwrap(), value);
    }
}

#[test]
fn empty_language_tags_and_bad_triples_never_reach_the_codec() {
    let io = ValueIo::default();
    let value: GraphValue = Literal::lang("x", "").into();
    let encoded = io.encode(&value);
    assert_eq!(encoded.tag(), TypeTag::STRING);
    assert_eq!(io.read_value(encoded.as_bytes()).unwrap(), value);

    let bad = GraphValue::triple(
        GraphValue::iri("http://example.org/s"),
        GraphValue::bnode("p"),
        GraphValue::iri("http://example.org/o"),
    );
    assert!(matches!(bad, Err(Error::Usage(_))));
}
