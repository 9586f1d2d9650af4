//! Low-level primitives for building the encoding core.
//!
//! Includes byte utilities and the hash functions used for vocabulary
//! hashes, cache sharding, load partitioning and identifier derivation.

/// Byte-level utilities and encoding/decoding.
///
/// Varints, length prefixes and a bounded forward-only read cursor.
pub mod bytes;

/// Hash functions.
///
/// Pearson, xxHash32 and the configurable identifier digests.
pub mod hash;
