//! Fan-out of one scan range into `2^bits` contiguous forks.
//!
//! The forks split the key hash of the first unbound role on its top `bits`
//! bits. When that role's identifier is not rotated and the factory packs the
//! role descriptor into the top nibble, the fork bits also fix part of the
//! descriptor, which lets a caller skip forks that cannot hold a wanted kind
//! of value.

use tracing::trace;

use super::{QuadPattern, Role, ScanRange, StatementIndex, StatementIndices};
use crate::id::{Identifier, RoleFlags};
use crate::types::{Error, Result};

impl StatementIndices {
    /// Fork `fork` of `count` over the whole of `index`, split on `role`.
    pub fn partition(
        &self,
        index: StatementIndex,
        role: Role,
        count: usize,
        fork: usize,
    ) -> Result<ScanRange> {
        self.partition_scan(index, &QuadPattern::new(), role, count, fork, None)?
            .ok_or_else(|| Error::usage("unconstrained partition was pruned"))
    }

    /// Fork `fork` of `count` over the scan of `pattern` on `index`.
    ///
    /// Returns `Ok(None)` when `constraint` rejects every identifier whose
    /// descriptor agrees with the fork bits.
    pub fn partition_scan(
        &self,
        index: StatementIndex,
        pattern: &QuadPattern,
        role: Role,
        count: usize,
        fork: usize,
        constraint: Option<&dyn Fn(&Identifier) -> bool>,
    ) -> Result<Option<ScanRange>> {
        if !count.is_power_of_two() {
            return Err(Error::usage(format!(
                "partition count {count} is not a power of two"
            )));
        }
        if fork >= count {
            return Err(Error::usage(format!(
                "fork {fork} out of range for {count} partitions"
            )));
        }
        let base = self.build_key(index, pattern).ok_or_else(|| {
            Error::usage(format!("{index} cannot answer the requested pattern"))
        })?;
        let bound = index
            .roles()
            .iter()
            .take_while(|r| pattern.get(**r).is_some())
            .count();
        if index.position(role) != Some(bound) {
            return Err(Error::usage(format!(
                "{role} is not the first unbound role of {index}"
            )));
        }
        let width = self.key_sizes().get(role);
        let bits = count.trailing_zeros() as usize;
        if bits > 8 * width {
            return Err(Error::usage(format!(
                "{bits} partition bits exceed the {width}-byte {role} key hash"
            )));
        }

        if let Some(accept) = constraint {
            if !self.fork_may_match(index, role, bits, fork, accept) {
                trace!(%index, %role, fork, count, "index.partition.pruned");
                return Ok(None);
            }
        }

        let start = if fork == 0 {
            base.start.clone()
        } else {
            fork_key(&base.start, width, bits, fork)
        };
        let stop = if fork + 1 == count {
            base.stop
        } else {
            fork_key(&base.start, width, bits, fork + 1)
        };
        trace!(%index, %role, fork, count, "index.partition");
        Ok(Some(ScanRange { index, start, stop }))
    }

    /// False only when the descriptor is visible in the fork bits and no
    /// identifier carrying a compatible descriptor passes `accept`.
    fn fork_may_match(
        &self,
        index: StatementIndex,
        role: Role,
        bits: usize,
        fork: usize,
        accept: &dyn Fn(&Identifier) -> bool,
    ) -> bool {
        let config = self.factory().config();
        if bits == 0 || !config.nibble() || self.byte_shift(index, role) != Some(0) {
            return true;
        }
        let id_size = config.id_size();
        let fork_bytes = fork_bits(id_size, bits.min(8 * id_size), fork);
        let fixed = bits.min(4);
        let top = (fork >> (bits - fixed)) as u8;
        (0u8..16)
            .filter(|d| d >> (4 - fixed) == top)
            .any(|d| {
                let mut probe = fork_bytes.clone();
                config.pack_roles(&mut probe, RoleFlags::from_descriptor(d));
                match self.factory().identifier_from_bytes(&probe) {
                    Ok(id) => accept(&id),
                    Err(_) => true,
                }
            })
    }
}

/// `base` followed by a `width`-byte value holding `fork` in its top `bits` bits.
fn fork_key(base: &[u8], width: usize, bits: usize, fork: usize) -> Vec<u8> {
    let mut key = base.to_vec();
    key.extend_from_slice(&fork_bits(width, bits, fork));
    key
}

fn fork_bits(width: usize, bits: usize, fork: usize) -> Vec<u8> {
    let mut out = vec![0u8; width];
    for i in 0..bits {
        if (fork >> (bits - 1 - i)) & 1 == 1 {
            out[i / 8] |= 0x80 >> (i % 8);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ValueIo;
    use crate::id::{IdentifierConfig, IdentifierFactory};
    use crate::index::KeySizes;
    use crate::model::{GraphValue, Literal};

    fn indices(nibble: bool) -> StatementIndices {
        let factory = IdentifierFactory::new(
            IdentifierConfig::from_name("XXH3-128", 10, nibble).unwrap(),
            ValueIo::default(),
        )
        .unwrap();
        StatementIndices::new(factory, KeySizes::default()).unwrap()
    }

    #[test]
    fn fork_bits_place_the_fork_at_the_top() {
        assert_eq!(fork_bits(2, 3, 0b101), vec![0b1010_0000, 0]);
        assert_eq!(fork_bits(2, 12, 0xABC), vec![0xAB, 0xC0]);
        assert_eq!(fork_bits(1, 0, 0), vec![0]);
    }

    #[test]
    fn forks_are_contiguous_and_cover_the_range() {
        let ix = indices(true);
        for count in [1usize, 2, 4, 16, 256, 4096] {
            for index in StatementIndex::ALL {
                let role = index.roles()[0];
                let whole = ix.build_key(index, &QuadPattern::new()).unwrap();
                let forks: Vec<_> = (0..count)
                    .map(|f| ix.partition(index, role, count, f).unwrap())
                    .collect();
                assert_eq!(forks[0].start, whole.start);
                assert_eq!(forks[count - 1].stop, whole.stop);
                for pair in forks.windows(2) {
                    assert_eq!(pair[0].stop, pair[1].start);
                    assert!(pair[0].start < pair[0].stop);
                }
            }
        }
    }

    #[test]
    fn every_row_falls_in_exactly_one_fork() {
        let ix = indices(true);
        let rows: Vec<_> = (0..64)
            .flat_map(|i| {
                ix.cells(&crate::model::Quad::new(
                    GraphValue::iri(format!("http://example.org/s{i}")),
                    GraphValue::iri("http://example.org/p"),
                    Literal::integer(i).into(),
                    None,
                ))
            })
            .collect();
        for count in [2usize, 8, 32] {
            for cell in &rows {
                let role = cell.index.roles()[0];
                let hits = (0..count)
                    .filter(|f| {
                        ix.partition(cell.index, role, count, *f)
                            .unwrap()
                            .contains(&cell.row)
                    })
                    .count();
                assert_eq!(hits, 1);
            }
        }
    }

    #[test]
    fn partitions_a_bound_prefix_on_the_next_role() {
        let ix = indices(true);
        let p = ix.factory().id(&GraphValue::iri("http://example.org/p"));
        let pattern = QuadPattern::new().predicate(p);
        let whole = ix.build_key(StatementIndex::Pos, &pattern).unwrap();
        let first = ix
            .partition_scan(StatementIndex::Pos, &pattern, Role::Object, 4, 0, None)
            .unwrap()
            .unwrap();
        let last = ix
            .partition_scan(StatementIndex::Pos, &pattern, Role::Object, 4, 3, None)
            .unwrap()
            .unwrap();
        assert_eq!(first.start, whole.start);
        assert_eq!(last.stop, whole.stop);
        assert!(first.start.starts_with(&whole.start));
    }

    #[test]
    fn invalid_requests_are_usage_errors() {
        let ix = indices(true);
        let usage = |r: Result<ScanRange>| matches!(r, Err(Error::Usage(_)));
        assert!(usage(ix.partition(StatementIndex::Spo, Role::Subject, 3, 0)));
        assert!(usage(ix.partition(StatementIndex::Spo, Role::Subject, 0, 0)));
        assert!(usage(ix.partition(StatementIndex::Spo, Role::Subject, 4, 4)));
        assert!(usage(ix.partition(StatementIndex::Spo, Role::Object, 4, 0)));
        assert!(usage(ix.partition(StatementIndex::Spo, Role::Context, 2, 0)));
        assert!(usage(ix.partition(StatementIndex::Cpos, Role::Predicate, 2, 0)));
        // 3-byte predicate key hash holds at most 24 bits.
        assert!(usage(ix.partition(StatementIndex::Pos, Role::Predicate, 1 << 25, 0)));
        assert!(ix.partition(StatementIndex::Pos, Role::Predicate, 1 << 24, 0).is_ok());
    }

    #[test]
    fn constraint_prunes_forks_by_descriptor() {
        let ix = indices(true);
        let factory = ix.factory().clone();
        let literals_only = move |id: &Identifier| factory.unpack_roles(id).is_literal();
        let kept: Vec<usize> = (0..4)
            .filter(|f| {
                ix.partition_scan(
                    StatementIndex::Osp,
                    &QuadPattern::new(),
                    Role::Object,
                    4,
                    *f,
                    Some(&literals_only),
                )
                .unwrap()
                .is_some()
            })
            .collect();
        // Top two bits 01 are the literal kind.
        assert_eq!(kept, vec![1]);
    }

    #[test]
    fn no_pruning_without_a_visible_descriptor() {
        let never = |_: &Identifier| false;
        let plain = indices(false);
        assert!(plain
            .partition_scan(StatementIndex::Spo, &QuadPattern::new(), Role::Subject, 4, 0, Some(&never))
            .unwrap()
            .is_some());
        let ix = indices(true);
        let c = ix.default_context().clone();
        let pattern = QuadPattern::new().context(c);
        assert!(ix
            .partition_scan(StatementIndex::Cspo, &pattern, Role::Subject, 4, 0, Some(&never))
            .unwrap()
            .is_some());
        assert!(ix
            .partition_scan(StatementIndex::Spo, &QuadPattern::new(), Role::Subject, 1, 0, Some(&never))
            .unwrap()
            .is_some());
    }
}
