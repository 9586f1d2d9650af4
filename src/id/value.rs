//! Graph values that remember their identifier.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{Identifier, IdentifierFactory};
use crate::codec::EncodedForm;
use crate::model::GraphValue;

/// Identifier and encoding computed by the factory with generation `generation`.
struct Snapshot {
    generation: u64,
    id: Identifier,
    encoded: EncodedForm,
}

/// A [`GraphValue`] plus a lazily filled identifier slot.
///
/// The slot holds an immutable snapshot. The lock is held only to clone or
/// replace the `Arc`; hashing and encoding happen outside it. Threads using
/// different factories on the same value overwrite each other's snapshot,
/// which costs a recomputation but never yields a wrong identifier.
pub struct IdentifiableValue {
    value: GraphValue,
    slot: RwLock<Option<Arc<Snapshot>>>,
}

impl IdentifiableValue {
    pub fn new(value: GraphValue) -> Self {
        Self {
            value,
            slot: RwLock::new(None),
        }
    }

    pub fn value(&self) -> &GraphValue {
        &self.value
    }

    pub fn into_value(self) -> GraphValue {
        self.value
    }

    pub fn id(&self, factory: &IdentifierFactory) -> Identifier {
        self.snapshot(factory).id.clone()
    }

    pub fn encoded_form(&self, factory: &IdentifierFactory) -> EncodedForm {
        self.snapshot(factory).encoded.clone()
    }

    /// Stores an identifier obtained elsewhere, e.g. read back from a store.
    pub fn set_id(&self, factory: &IdentifierFactory, id: Identifier) {
        let encoded = factory.encode(&self.value);
        self.store(Arc::new(Snapshot {
            generation: factory.generation(),
            id,
            encoded,
        }));
    }

    /// True when the slot holds a snapshot from `factory`.
    pub fn is_cached_for(&self, factory: &IdentifierFactory) -> bool {
        self.load()
            .is_some_and(|s| s.generation == factory.generation())
    }

    fn load(&self) -> Option<Arc<Snapshot>> {
        self.slot.read().clone()
    }

    fn store(&self, snapshot: Arc<Snapshot>) {
        *self.slot.write() = Some(snapshot);
    }

    fn snapshot(&self, factory: &IdentifierFactory) -> Arc<Snapshot> {
        if let Some(s) = self.load() {
            if s.generation == factory.generation() {
                factory.metrics().snapshot_lookup(true);
                return s;
            }
        }
        factory.metrics().snapshot_lookup(false);
        let encoded = factory.encode(&self.value);
        let id = factory.derive(&encoded);
        let snapshot = Arc::new(Snapshot {
            generation: factory.generation(),
            id,
            encoded,
        });
        self.store(snapshot.clone());
        snapshot
    }
}

impl Clone for IdentifiableValue {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            slot: RwLock::new(self.load()),
        }
    }
}

impl PartialEq for IdentifiableValue {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for IdentifiableValue {}

impl fmt::Debug for IdentifiableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentifiableValue")
            .field("value", &self.value)
            .field("cached", &self.load().map(|s| s.id.clone()))
            .finish()
    }
}

impl From<GraphValue> for IdentifiableValue {
    fn from(value: GraphValue) -> Self {
        Self::new(value)
    }
}
