#![forbid(unsafe_code)]
//! Statement index keys.
//!
//! Every statement is written to six sorted indices, one per role order. A
//! row key holds a short, rotated prefix ("key hash") of each role's
//! identifier; the rest of each identifier goes to the cell qualifier so the
//! full identifier can be rebuilt from a stored cell.
//!
//! ```text
//! SPO/POS/OSP   row:       [prefix][kh r1][kh r2][kh r3]
//!               qualifier: [rem r1][rem r2][rem r3][full context id]?
//! CSPO/CPOS/COSP row:      [prefix][kh c][kh r2][kh r3][kh r4]
//!               qualifier: [rem c][rem r2][rem r3][rem r4]
//! value:                   [len s][s][len p][p][len o][o][c]?
//! ```

use std::fmt;
use std::str::FromStr;

mod keys;
mod partition;

pub use keys::{EncodedQuad, ParsedCell, StatementCell, StatementIndices};

use crate::id::Identifier;
use crate::types::{Error, Result};

/// Sentinel byte filling unbound roles of a stop key.
pub const STOP_BYTE: u8 = 0xFF;

/// A statement position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Subject,
    Predicate,
    Object,
    Context,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Subject, Role::Predicate, Role::Object, Role::Context];

    pub fn name(self) -> &'static str {
        match self {
            Role::Subject => "subject",
            Role::Predicate => "predicate",
            Role::Object => "object",
            Role::Context => "context",
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "s" | "subject" => Ok(Role::Subject),
            "p" | "predicate" => Ok(Role::Predicate),
            "o" | "object" => Ok(Role::Object),
            "c" | "context" | "g" | "graph" => Ok(Role::Context),
            other => Err(Error::usage(format!("unknown role: {other}"))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The six role permutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatementIndex {
    Spo,
    Pos,
    Osp,
    Cspo,
    Cpos,
    Cosp,
}

impl StatementIndex {
    pub const ALL: [StatementIndex; 6] = [
        StatementIndex::Spo,
        StatementIndex::Pos,
        StatementIndex::Osp,
        StatementIndex::Cspo,
        StatementIndex::Cpos,
        StatementIndex::Cosp,
    ];

    /// First byte of every row of this index.
    pub fn prefix(self) -> u8 {
        self as u8
    }

    pub fn from_prefix(prefix: u8) -> Result<Self> {
        Self::ALL
            .get(prefix as usize)
            .copied()
            .ok_or_else(|| Error::decode(format!("unknown index prefix {prefix}")))
    }

    /// Roles in row order.
    pub fn roles(self) -> &'static [Role] {
        use Role::*;
        match self {
            StatementIndex::Spo => &[Subject, Predicate, Object],
            StatementIndex::Pos => &[Predicate, Object, Subject],
            StatementIndex::Osp => &[Object, Subject, Predicate],
            StatementIndex::Cspo => &[Context, Subject, Predicate, Object],
            StatementIndex::Cpos => &[Context, Predicate, Object, Subject],
            StatementIndex::Cosp => &[Context, Object, Subject, Predicate],
        }
    }

    /// True for the context-leading indices.
    pub fn is_quad(self) -> bool {
        matches!(
            self,
            StatementIndex::Cspo | StatementIndex::Cpos | StatementIndex::Cosp
        )
    }

    /// Position of `role` in the row, if the row holds it.
    pub fn position(self, role: Role) -> Option<usize> {
        self.roles().iter().position(|r| *r == role)
    }

    pub fn name(self) -> &'static str {
        match self {
            StatementIndex::Spo => "SPO",
            StatementIndex::Pos => "POS",
            StatementIndex::Osp => "OSP",
            StatementIndex::Cspo => "CSPO",
            StatementIndex::Cpos => "CPOS",
            StatementIndex::Cosp => "COSP",
        }
    }
}

impl FromStr for StatementIndex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|idx| idx.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::usage(format!("unknown index: {s}")))
    }
}

impl fmt::Display for StatementIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Key-hash width in bytes for each role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeySizes {
    pub subject: usize,
    pub predicate: usize,
    pub object: usize,
    pub context: usize,
}

impl Default for KeySizes {
    fn default() -> Self {
        Self {
            subject: 5,
            predicate: 3,
            object: 5,
            context: 3,
        }
    }
}

impl KeySizes {
    pub fn new(subject: usize, predicate: usize, object: usize, context: usize) -> Self {
        Self {
            subject,
            predicate,
            object,
            context,
        }
    }

    pub fn get(&self, role: Role) -> usize {
        match role {
            Role::Subject => self.subject,
            Role::Predicate => self.predicate,
            Role::Object => self.object,
            Role::Context => self.context,
        }
    }

    /// Each width must lie in `1..=id_size`.
    pub fn validate(&self, id_size: usize) -> Result<()> {
        for role in Role::ALL {
            let k = self.get(role);
            if k == 0 || k > id_size {
                return Err(Error::config(format!(
                    "{role} key hash of {k} bytes must be between 1 and the identifier size {id_size}"
                )));
            }
        }
        Ok(())
    }
}

/// Identifiers bound by a lookup; `None` roles are wildcards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuadPattern {
    pub subject: Option<Identifier>,
    pub predicate: Option<Identifier>,
    pub object: Option<Identifier>,
    pub context: Option<Identifier>,
}

impl QuadPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject(mut self, id: Identifier) -> Self {
        self.subject = Some(id);
        self
    }

    pub fn predicate(mut self, id: Identifier) -> Self {
        self.predicate = Some(id);
        self
    }

    pub fn object(mut self, id: Identifier) -> Self {
        self.object = Some(id);
        self
    }

    pub fn context(mut self, id: Identifier) -> Self {
        self.context = Some(id);
        self
    }

    pub fn get(&self, role: Role) -> Option<&Identifier> {
        match role {
            Role::Subject => self.subject.as_ref(),
            Role::Predicate => self.predicate.as_ref(),
            Role::Object => self.object.as_ref(),
            Role::Context => self.context.as_ref(),
        }
    }

    /// True when `ids` agrees with every bound role. A bound context never
    /// matches a statement without one.
    pub fn matches(&self, ids: &QuadIds) -> bool {
        let same = |want: Option<&Identifier>, have: Option<&Identifier>| match want {
            None => true,
            Some(w) => have == Some(w),
        };
        same(self.subject.as_ref(), Some(&ids.subject))
            && same(self.predicate.as_ref(), Some(&ids.predicate))
            && same(self.object.as_ref(), Some(&ids.object))
            && same(self.context.as_ref(), ids.context.as_ref())
    }
}

/// Full identifiers of one statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QuadIds {
    pub subject: Identifier,
    pub predicate: Identifier,
    pub object: Identifier,
    pub context: Option<Identifier>,
}

impl QuadIds {
    pub fn get(&self, role: Role) -> Option<&Identifier> {
        match role {
            Role::Subject => Some(&self.subject),
            Role::Predicate => Some(&self.predicate),
            Role::Object => Some(&self.object),
            Role::Context => self.context.as_ref(),
        }
    }
}

/// A half-open row range `[start, stop)` on one index.
#[derive(Clone, PartialEq, Eq)]
pub struct ScanRange {
    pub index: StatementIndex,
    pub start: Vec<u8>,
    pub stop: Vec<u8>,
}

impl ScanRange {
    pub fn contains(&self, row: &[u8]) -> bool {
        row >= self.start.as_slice() && row < self.stop.as_slice()
    }
}

impl fmt::Debug for ScanRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScanRange({} {}..{})",
            self.index,
            hex::encode(&self.start),
            hex::encode(&self.stop)
        )
    }
}
