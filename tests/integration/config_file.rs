use std::fs;

use quadkey::codec::TypeTag;
use quadkey::config::Settings;
use quadkey::model::{GraphValue, Literal};
use quadkey::primitives::hash::HashAlgorithm;
use quadkey::Error;
use tempfile::tempdir;

#[test]
fn settings_file_drives_the_factory_and_vocabulary() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("quadkey.toml");
    fs::write(
        &path,
        r#"
[identifier]
hash_algorithm = "BLAKE3"
id_size = 12

[encoding]
compression_threshold = 8

[keys]
subject = 4
object = 4

[vocabulary]
namespaces = ["http://example.org/ns#"]
iris = ["http://example.org/ns#special"]
languages = ["tlh"]
"#,
    )
    .unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.identifier.hash_algorithm(), HashAlgorithm::Blake3);
    let indices = settings.build().unwrap();
    let factory = indices.factory();
    assert_eq!(factory.id_size(), 12);
    assert_eq!(indices.key_sizes().subject, 4);

    let tags = [
        (GraphValue::iri("http://example.org/ns#special"), TypeTag::WELL_KNOWN_IRI),
        (GraphValue::iri("http://example.org/ns#other"), TypeTag::NAMESPACE_HASH_IRI),
        (Literal::lang("nuqneH", "tlh").into(), TypeTag::LANGUAGE_HASH_LITERAL),
        (Literal::string("longer than eight").into(), TypeTag::COMPRESSED_STRING),
    ];
    for (value, tag) in tags {
        let encoded = factory.encode(&value);
        assert_eq!(encoded.tag(), tag, "{value}");
        assert_eq!(factory.io().read_value(encoded.as_bytes()).unwrap(), value);
    }
}

#[test]
fn different_settings_give_different_identifiers() {
    let a = Settings::from_toml_str("[identifier]\nid_size = 8").unwrap().factory().unwrap();
    let b = Settings::from_toml_str("[identifier]\nid_size = 8\nnibble = false")
        .unwrap()
        .factory()
        .unwrap();
    let v = GraphValue::iri("http://example.org/x");
    assert_ne!(a.id(&v), b.id(&v));
}

#[test]
fn bad_files_report_their_cause() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[identifier]\nhash_algorithm = \"CRC32\"\n").unwrap();
    assert!(matches!(Settings::load(&path), Err(Error::Config(_))));
    fs::write(&path, "identifier = 3").unwrap();
    assert!(matches!(Settings::load(&path), Err(Error::ConfigParse(_))));
    assert!(matches!(
        Settings::load(&dir.path().join("missing.toml")),
        Err(Error::Io(_))
    ));
}
