use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use quadkey::codec::ValueIo;
use quadkey::id::{IdentifiableValue, IdentifierConfig, IdentifierFactory};
use quadkey::model::vocab::xsd;
use quadkey::model::{GraphValue, Literal, ValueKind};
use quadkey::primitives::hash::HashAlgorithm;

fn factory(alg: HashAlgorithm, size: usize, nibble: bool) -> IdentifierFactory {
    IdentifierFactory::new(
        IdentifierConfig::new(alg, size, nibble).unwrap(),
        ValueIo::default(),
    )
    .unwrap()
}

#[test]
fn iri_with_eight_byte_ids() {
    let f = factory(HashAlgorithm::Xxh3_128, 8, true);
    let iri = GraphValue::iri("http://example.org/x");
    let id = f.id(&iri);
    assert_eq!(id.len(), 8);
    assert_eq!(f.io().read_value(f.encode(&iri).as_bytes()).unwrap(), iri);
    assert_ne!(id, f.id(&Literal::string("http://example.org/x").into()));
    assert!(f.unpack_roles(&id).is_iri());
}

#[test]
fn identifiers_depend_on_every_config_field() {
    let value: GraphValue = Literal::lang("bonjour", "fr").into();
    let mut seen = HashSet::new();
    for alg in HashAlgorithm::ALL {
        for size in [4usize, 8] {
            for nibble in [true, false] {
                let f = factory(alg, size, nibble);
                assert!(seen.insert((size, f.id(&value).to_hex())), "{alg} {size} {nibble}");
            }
        }
    }
}

#[test]
fn derivation_is_deterministic_across_factories_and_threads() {
    let a = factory(HashAlgorithm::Sha256, 12, true);
    let b = factory(HashAlgorithm::Sha256, 12, true).with_cache(4, 128);
    let values: Vec<GraphValue> = (0..50)
        .map(|i| Literal::typed(format!("{i}"), xsd::INTEGER).into())
        .collect();
    let expected: Vec<_> = values.iter().map(|v| a.id(v)).collect();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for (v, want) in values.iter().zip(&expected) {
                    assert_eq!(&b.id(v), want);
                }
            });
        }
    });
}

#[test]
fn shared_values_serve_several_configurations() {
    let factories: Vec<_> = [4usize, 10, 16]
        .into_iter()
        .map(|s| factory(HashAlgorithm::Blake3, s, true))
        .collect();
    let value = Arc::new(IdentifiableValue::new(GraphValue::iri("http://example.org/shared")));
    std::thread::scope(|scope| {
        for f in &factories {
            let value = Arc::clone(&value);
            scope.spawn(move || {
                for _ in 0..100 {
                    assert_eq!(value.id(f), f.id(value.value()));
                }
            });
        }
    });
}

#[test]
fn roles_follow_the_value() {
    let f = factory(HashAlgorithm::SipHash128, 10, false);
    let cases: [(GraphValue, ValueKind, bool); 5] = [
        (GraphValue::iri("urn:x"), ValueKind::Iri, false),
        (GraphValue::bnode("b1"), ValueKind::BlankNode, false),
        (Literal::string("s").into(), ValueKind::Literal, true),
        (Literal::double(1.5).into(), ValueKind::Literal, false),
        (
            GraphValue::triple(GraphValue::bnode("a"), GraphValue::iri("urn:p"), GraphValue::bnode("b"))
                .unwrap(),
            ValueKind::Triple,
            false,
        ),
    ];
    for (value, kind, string) in cases {
        let roles = f.unpack_roles(&f.id(&value));
        assert_eq!(roles.kind(), kind);
        assert_eq!(roles.is_string(), string);
    }
}

proptest! {
    #[test]
    fn string_literals_are_literal_strings(label in ".{0,64}", size in 1usize..=16) {
        let f = factory(HashAlgorithm::Xxh3_128, size, true);
        let id = f.id(&Literal::string(label.clone()).into());
        prop_assert_eq!(id.len(), size);
        let roles = f.unpack_roles(&id);
        prop_assert!(roles.is_literal());
        prop_assert!(roles.is_string());
        prop_assert!(!roles.is_numeric());
    }

    #[test]
    fn minted_iris_recover_their_identifier(label in "[a-z]{1,20}") {
        let f = factory(HashAlgorithm::Sha512, 20, true);
        let id = f.id(&GraphValue::iri(format!("http://example.org/{label}")));
        let minted = f.mint_iri(&id);
        prop_assert_eq!(f.identifier_from_iri(&minted), Some(id));
    }
}
