#![forbid(unsafe_code)]
//! Statement storage over a sorted key/value backend.

use std::collections::BTreeMap;
use std::ops::Bound;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::id::Identifier;
use crate::index::{ParsedCell, QuadPattern, Role, ScanRange, StatementIndex, StatementIndices};
use crate::model::{GraphValue, Quad};
use crate::types::Result;

/// One cell returned by a scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredRow {
    pub row: Vec<u8>,
    pub qualifier: Vec<u8>,
    pub value: Vec<u8>,
}

/// Sorted map of `(row, qualifier) -> value`.
pub trait SortedStore: Send + Sync {
    /// Returns every cell with `start <= row < stop`, in key order.
    fn scan(&self, start: &[u8], stop: &[u8]) -> Result<Vec<StoredRow>>;
    /// Inserts or replaces one cell.
    fn put(&self, row: &[u8], qualifier: &[u8], value: &[u8]) -> Result<()>;
    /// Removes one cell. Returns true if it existed.
    fn delete(&self, row: &[u8], qualifier: &[u8]) -> Result<bool>;
}

type Rows = BTreeMap<Vec<u8>, BTreeMap<Vec<u8>, Vec<u8>>>;

/// In-memory [`SortedStore`].
#[derive(Default)]
pub struct MemStore {
    rows: RwLock<Rows>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.rows.read().values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

impl SortedStore for MemStore {
    fn scan(&self, start: &[u8], stop: &[u8]) -> Result<Vec<StoredRow>> {
        if start >= stop {
            return Ok(Vec::new());
        }
        let rows = self.rows.read();
        let bounds: (Bound<&[u8]>, Bound<&[u8]>) = (Bound::Included(start), Bound::Excluded(stop));
        Ok(rows
            .range::<[u8], _>(bounds)
            .flat_map(|(row, cells)| {
                cells.iter().map(move |(qualifier, value)| StoredRow {
                    row: row.clone(),
                    qualifier: qualifier.clone(),
                    value: value.clone(),
                })
            })
            .collect())
    }

    fn put(&self, row: &[u8], qualifier: &[u8], value: &[u8]) -> Result<()> {
        self.rows
            .write()
            .entry(row.to_vec())
            .or_default()
            .insert(qualifier.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, row: &[u8], qualifier: &[u8]) -> Result<bool> {
        let mut rows = self.rows.write();
        let Some(cells) = rows.get_mut(row) else {
            return Ok(false);
        };
        let existed = cells.remove(qualifier).is_some();
        if cells.is_empty() {
            rows.remove(row);
        }
        Ok(existed)
    }
}

/// Which graphs a lookup covers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphSelector {
    Any,
    Default,
    Named(GraphValue),
}

/// Quads written to all six indices of a [`SortedStore`].
pub struct QuadStore<S = MemStore> {
    indices: StatementIndices,
    store: S,
}

impl<S: SortedStore> QuadStore<S> {
    pub fn new(indices: StatementIndices, store: S) -> Self {
        Self { indices, store }
    }

    pub fn indices(&self) -> &StatementIndices {
        &self.indices
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn insert(&self, quad: &Quad) -> Result<()> {
        for cell in self.indices.cells(quad) {
            self.store.put(&cell.row, &cell.qualifier, &cell.value)?;
        }
        trace!(%quad, "store.insert");
        Ok(())
    }

    /// Returns true if the quad was stored.
    pub fn remove(&self, quad: &Quad) -> Result<bool> {
        let mut existed = false;
        for cell in self.indices.cells(quad) {
            let removed = self.store.delete(&cell.row, &cell.qualifier)?;
            if cell.index == StatementIndex::Spo {
                existed = removed;
            }
        }
        trace!(%quad, existed, "store.remove");
        Ok(existed)
    }

    /// Binds identifiers for the given terms.
    pub fn pattern(
        &self,
        subject: Option<&GraphValue>,
        predicate: Option<&GraphValue>,
        object: Option<&GraphValue>,
        graph: &GraphSelector,
    ) -> QuadPattern {
        let factory = self.indices.factory();
        QuadPattern {
            subject: subject.map(|v| factory.id(v)),
            predicate: predicate.map(|v| factory.id(v)),
            object: object.map(|v| factory.id(v)),
            context: match graph {
                GraphSelector::Any => None,
                GraphSelector::Default => Some(self.indices.default_context().clone()),
                GraphSelector::Named(g) => Some(factory.id(g)),
            },
        }
    }

    pub fn find(&self, pattern: &QuadPattern) -> Result<Vec<ParsedCell>> {
        self.collect(pattern, self.indices.scan(pattern))
    }

    /// Quads matching the given terms.
    pub fn find_quads(
        &self,
        subject: Option<&GraphValue>,
        predicate: Option<&GraphValue>,
        object: Option<&GraphValue>,
        graph: &GraphSelector,
    ) -> Result<Vec<Quad>> {
        let pattern = self.pattern(subject, predicate, object, graph);
        Ok(self.find(&pattern)?.into_iter().map(|c| c.quad).collect())
    }

    pub fn contains(&self, quad: &Quad) -> Result<bool> {
        let graph = match &quad.context {
            Some(g) => GraphSelector::Named(g.clone()),
            None => GraphSelector::Default,
        };
        let pattern = self.pattern(
            Some(&quad.subject),
            Some(&quad.predicate),
            Some(&quad.object),
            &graph,
        );
        Ok(!self.find(&pattern)?.is_empty())
    }

    /// One fork of the scan answering `pattern`, split on its first unbound
    /// role. Empty when the fork is pruned by `constraint`.
    pub fn find_partitioned(
        &self,
        pattern: &QuadPattern,
        count: usize,
        fork: usize,
        constraint: Option<&dyn Fn(&Identifier) -> bool>,
    ) -> Result<Vec<ParsedCell>> {
        let index = StatementIndices::select(pattern);
        let role = index
            .roles()
            .iter()
            .copied()
            .find(|r| pattern.get(*r).is_none())
            .unwrap_or(Role::Object);
        match self
            .indices
            .partition_scan(index, pattern, role, count, fork, constraint)?
        {
            Some(range) => self.collect(pattern, range),
            None => Ok(Vec::new()),
        }
    }

    fn collect(&self, pattern: &QuadPattern, range: ScanRange) -> Result<Vec<ParsedCell>> {
        let rows = self.store.scan(&range.start, &range.stop)?;
        let scanned = rows.len();
        let mut out = Vec::with_capacity(scanned);
        for r in rows {
            let cell = self
                .indices
                .parse_cell(range.index, &r.row, &r.qualifier, &r.value)?;
            if self.accepts(pattern, &cell) {
                out.push(cell);
            }
        }
        debug!(
            index = %range.index,
            scanned,
            matched = out.len(),
            "store.find"
        );
        Ok(out)
    }

    /// Drops key-hash collisions. A bound default context matches
    /// default-graph statements only.
    fn accepts(&self, pattern: &QuadPattern, cell: &ParsedCell) -> bool {
        let ids = &cell.ids;
        let role_ok = |want: Option<&Identifier>, have: &Identifier| want.map_or(true, |w| w == have);
        role_ok(pattern.subject.as_ref(), &ids.subject)
            && role_ok(pattern.predicate.as_ref(), &ids.predicate)
            && role_ok(pattern.object.as_ref(), &ids.object)
            && match &pattern.context {
                None => true,
                Some(c) => ids.context.as_ref().unwrap_or(self.indices.default_context()) == c,
            }
    }
}
