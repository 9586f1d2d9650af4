#![forbid(unsafe_code)]
//! Byte hashes used across the encoding core.
//!
//! Three families live here:
//!
//! - [`hash16`]: a two-lane Pearson table hash. Cheap and stable, used for
//!   vocabulary hashes stored on disk and for picking cache shards.
//! - [`hash32`]: xxHash32, used to spread statements across load partitions.
//! - [`HashFunction`]: the configurable N-byte digest behind identifiers.

use std::fmt;
use std::hash::Hasher;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::Digest;
use siphasher::sip128::{Hasher128, SipHasher24};

use crate::types::{Error, Result};

const PEARSON_TABLE: [u8; 256] = build_pearson_table();

/// Shuffles 0..=255 with a fixed xorshift sequence. The table is part of the
/// on-disk format: changing the seed changes every stored vocabulary hash.
const fn build_pearson_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = i as u8;
        i += 1;
    }
    let mut state: u32 = 0x9E37_79B9;
    let mut i = 255;
    while i > 0 {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let j = (state % (i as u32 + 1)) as usize;
        let tmp = table[i];
        table[i] = table[j];
        table[j] = tmp;
        i -= 1;
    }
    table
}

/// Computes a 16-bit Pearson hash: one lane walks forwards, the other backwards.
pub fn hash16(key: &[u8]) -> u16 {
    let Some((&first, _)) = key.split_first() else {
        return 0;
    };
    let last = key[key.len() - 1];
    let mut h1 = PEARSON_TABLE[first as usize];
    let mut h2 = PEARSON_TABLE[last as usize];
    for j in 1..key.len() {
        h1 = PEARSON_TABLE[(h1 ^ key[j]) as usize];
        h2 = PEARSON_TABLE[(h2 ^ key[key.len() - 1 - j]) as usize];
    }
    ((h1 as u16) << 8) | h2 as u16
}

/// Computes a deterministic 32-bit hash of `key`.
pub fn hash32(key: &[u8]) -> u32 {
    xxhash_rust::xxh32::xxh32(key, 0)
}

/// Digest algorithms available for identifier derivation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
    Blake3,
    Xxh3_128,
    Xxh64,
    SipHash128,
}

impl HashAlgorithm {
    /// Canonical configuration name.
    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha512 => "SHA-512",
            HashAlgorithm::Blake3 => "BLAKE3",
            HashAlgorithm::Xxh3_128 => "XXH3-128",
            HashAlgorithm::Xxh64 => "XXH64",
            HashAlgorithm::SipHash128 => "SipHash-128",
        }
    }

    /// Native digest length in bytes.
    pub const fn digest_len(self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha512 => 64,
            HashAlgorithm::Blake3 => 32,
            HashAlgorithm::Xxh3_128 => 16,
            HashAlgorithm::Xxh64 => 8,
            HashAlgorithm::SipHash128 => 16,
        }
    }

    /// All supported algorithms.
    pub const ALL: [HashAlgorithm; 6] = [
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha512,
        HashAlgorithm::Blake3,
        HashAlgorithm::Xxh3_128,
        HashAlgorithm::Xxh64,
        HashAlgorithm::SipHash128,
    ];

    fn digest(self, bytes: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha256 => sha2::Sha256::digest(bytes).to_vec(),
            HashAlgorithm::Sha512 => sha2::Sha512::digest(bytes).to_vec(),
            HashAlgorithm::Blake3 => blake3::hash(bytes).as_bytes().to_vec(),
            HashAlgorithm::Xxh3_128 => xxhash_rust::xxh3::xxh3_128(bytes).to_be_bytes().to_vec(),
            HashAlgorithm::Xxh64 => xxhash_rust::xxh64::xxh64(bytes, 0).to_be_bytes().to_vec(),
            HashAlgorithm::SipHash128 => {
                let mut hasher = SipHasher24::new();
                hasher.write(bytes);
                u128::from(hasher.finish128()).to_be_bytes().to_vec()
            }
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            "blake3" => Ok(HashAlgorithm::Blake3),
            "xxh3128" | "xxh3" => Ok(HashAlgorithm::Xxh3_128),
            "xxh64" => Ok(HashAlgorithm::Xxh64),
            "siphash128" => Ok(HashAlgorithm::SipHash128),
            _ => Err(Error::config(format!("unsupported hash algorithm: {s}"))),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A digest truncated to a fixed output size.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HashFunction {
    algorithm: HashAlgorithm,
    size: usize,
}

impl HashFunction {
    /// Creates a hash function producing `size` bytes; `0` keeps the native length.
    pub fn new(algorithm: HashAlgorithm, size: usize) -> Result<Self> {
        let native = algorithm.digest_len();
        let size = if size == 0 { native } else { size };
        if size > native {
            return Err(Error::config(format!(
                "{algorithm} produces {native} bytes, cannot derive {size}-byte hashes"
            )));
        }
        Ok(Self { algorithm, size })
    }

    /// Parses the algorithm name and creates the function.
    pub fn by_name(name: &str, size: usize) -> Result<Self> {
        Self::new(name.parse()?, size)
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Output size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Hashes `bytes`, returning exactly [`Self::size`] bytes.
    pub fn apply(&self, bytes: &[u8]) -> Vec<u8> {
        let mut digest = self.algorithm.digest(bytes);
        digest.truncate(self.size);
        digest
    }
}

/// Encodes bytes as unpadded base64url.
pub fn encode_base64(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decodes unpadded base64url.
pub fn decode_base64(s: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(s)
        .map_err(|e| Error::decode(format!("invalid base64url: {e}")))
}
