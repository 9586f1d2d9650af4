use quadkey::config::Settings;
use quadkey::id::Identifier;
use quadkey::index::{QuadPattern, Role, StatementIndex};
use quadkey::model::parse::parse_quad;
use quadkey::model::{GraphValue, Literal, Quad};
use quadkey::store::{GraphSelector, MemStore, QuadStore, SortedStore};
use quadkey::Error;

const DATA: &str = r#"
<http://example.org/alice> <http://xmlns.com/foaf/0.1/name> "Alice" .
<http://example.org/alice> <http://xmlns.com/foaf/0.1/knows> <http://example.org/bob> .
<http://example.org/bob> <http://xmlns.com/foaf/0.1/name> "Bob"@en <http://example.org/people> .
<http://example.org/bob> <http://example.org/age> 42 <http://example.org/people> .
_:b0 <http://example.org/age> 42.0 .
<< <http://example.org/alice> <http://xmlns.com/foaf/0.1/knows> <http://example.org/bob> >> <http://example.org/since> "2001"^^<http://www.w3.org/2001/XMLSchema#gYear> .
"#;

fn quads() -> Vec<Quad> {
    DATA.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| parse_quad(l).unwrap())
        .collect()
}

fn loaded() -> QuadStore {
    let qs = QuadStore::new(Settings::default().build().unwrap(), MemStore::new());
    for q in quads() {
        qs.insert(&q).unwrap();
    }
    qs
}

fn iri(s: &str) -> GraphValue {
    GraphValue::iri(s)
}

#[test]
fn every_statement_is_found_by_every_bound_combination() {
    let qs = loaded();
    for q in quads() {
        let graph = match &q.context {
            Some(g) => GraphSelector::Named(g.clone()),
            None => GraphSelector::Default,
        };
        let s = Some(&q.subject);
        let p = Some(&q.predicate);
        let o = Some(&q.object);
        for (subject, predicate, object) in [
            (s, None, None),
            (None, p, None),
            (None, None, o),
            (s, p, None),
            (None, p, o),
            (s, None, o),
            (s, p, o),
        ] {
            for g in [&GraphSelector::Any, &graph] {
                let found = qs.find_quads(subject, predicate, object, g).unwrap();
                assert!(found.contains(&q), "{q} via {subject:?} {predicate:?} {object:?} {g:?}");
            }
        }
    }
}

#[test]
fn graph_selection() {
    let qs = loaded();
    let all = qs.find_quads(None, None, None, &GraphSelector::Any).unwrap();
    assert_eq!(all.len(), quads().len());
    let people = qs
        .find_quads(None, None, None, &GraphSelector::Named(iri("http://example.org/people")))
        .unwrap();
    assert_eq!(people.len(), 2);
    let default = qs.find_quads(None, None, None, &GraphSelector::Default).unwrap();
    assert_eq!(default.len(), 4);
    assert!(default.iter().all(|q| q.context.is_none()));
}

#[test]
fn integer_and_decimal_objects_are_distinct() {
    let qs = loaded();
    let age = iri("http://example.org/age");
    let integer = qs
        .find_quads(None, Some(&age), Some(&Literal::integer(42).into()), &GraphSelector::Any)
        .unwrap();
    assert_eq!(integer.len(), 1);
    assert_eq!(integer[0].subject, iri("http://example.org/bob"));
}

#[test]
fn removing_clears_every_index() {
    let qs = loaded();
    for q in quads() {
        assert!(qs.remove(&q).unwrap());
    }
    assert!(qs.store().is_empty());
}

#[test]
fn partitioned_subject_scan_skips_non_iri_forks() {
    let qs = loaded();
    let factory = qs.indices().factory().clone();
    let iri_only = move |id: &Identifier| factory.unpack_roles(id).is_iri();
    let mut found = Vec::new();
    let mut pruned = 0;
    for fork in 0..4 {
        let part = qs
            .find_partitioned(&QuadPattern::new(), 4, fork, Some(&iri_only))
            .unwrap();
        if part.is_empty() {
            pruned += 1;
        }
        found.extend(part);
    }
    assert_eq!(pruned, 3);
    assert_eq!(found.len(), 4);
    assert!(found
        .iter()
        .all(|c| matches!(c.quad.subject, GraphValue::Iri(_))));
}

#[test]
fn osp_forks_hold_only_their_kind() {
    let qs = loaded();
    let ix = qs.indices();
    let literal_fork = ix.partition(StatementIndex::Osp, Role::Object, 4, 1).unwrap();
    let rows = qs.store().scan(&literal_fork.start, &literal_fork.stop).unwrap();
    assert!(!rows.is_empty());
    for r in rows {
        let cell = ix.parse_cell(StatementIndex::Osp, &r.row, &r.qualifier, &r.value).unwrap();
        assert!(matches!(cell.quad.object, GraphValue::Literal(_)), "{}", cell.quad);
    }
}

#[test]
fn fork_out_of_range_is_a_usage_error() {
    let qs = loaded();
    assert!(matches!(
        qs.indices().partition(StatementIndex::Spo, Role::Subject, 8, 8),
        Err(Error::Usage(_))
    ));
    assert!(matches!(
        qs.find_partitioned(&QuadPattern::new(), 6, 0, None),
        Err(Error::Usage(_))
    ));
}
