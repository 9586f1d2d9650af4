//! Content-derived identifiers and statement index keys for RDF quads.
//!
//! Graph values are written in a compact type-tagged byte form
//! ([`codec`]), hashed into fixed-width identifiers that carry their role in
//! the first nibble ([`id`]), and laid out as row keys of six sorted statement
//! indices ([`index`]). [`store`] ties the pieces to a sorted key/value backend.
//!
//! ```
//! use quadkey::config::Settings;
//! use quadkey::model::{GraphValue, Literal, Quad};
//!
//! let indices = Settings::default().build().unwrap();
//! let quad = Quad::new(
//!     GraphValue::iri("http://example.org/s"),
//!     GraphValue::iri("http://example.org/p"),
//!     Literal::integer(42).into(),
//!     None,
//! );
//! assert_eq!(indices.cells(&quad).len(), 6);
//! ```

pub mod codec;
pub mod config;
pub mod id;
pub mod index;
pub mod logging;
pub mod model;
pub mod primitives;
pub mod store;
pub mod types;

pub use codec::{EncodedForm, TypeTag, ValueIo, Vocabulary};
pub use config::Settings;
pub use id::{IdentifiableValue, Identifier, IdentifierConfig, IdentifierFactory, RoleFlags};
pub use index::{KeySizes, QuadPattern, Role, ScanRange, StatementIndex, StatementIndices};
pub use model::{GraphValue, Literal, Quad, Triple};
pub use store::{GraphSelector, MemStore, QuadStore, SortedStore};
pub use types::{Error, Result};
