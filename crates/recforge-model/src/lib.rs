//! recforge Record Model
//!
//! Data types shared by every stage of result-record construction.
//!
//! # Core Concepts
//!
//! - [`Datum`]: A caller-supplied input value (scalar, sequence, ragged
//!   sequence-of-sequences, or undefined)
//! - [`Group`]: The partition of a record a field is written into
//! - [`RecordDraft`]: A record under construction, before validation
//! - [`ResultRecord`]: A validated, normalized record
//! - [`EntityVocabulary`]: The closed set of recognized tag keys
//! - [`RecordValidator`]: The schema seam; [`ResultSchema`] is the default
//!
//! # Example
//!
//! ```rust,ignore
//! use recforge_model::{RecordDraft, RecordValidator, ResultSchema};
//!
//! let schema = ResultSchema::new()?;
//! let mut draft = RecordDraft::new();
//! draft.tags.insert("sub".into(), "01".into());
//! let record = schema.load(draft)?;
//! assert_eq!(record.tag("sub"), Some("01"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod datum;
mod entities;
mod error;
mod group;
mod record;
mod schema;

pub use datum::Datum;
pub use entities::{EntityVocabulary, DEFAULT_ENTITIES};
pub use error::{ModelError, SchemaError};
pub use group::Group;
pub use record::{Partition, RecordDraft, ResultRecord};
pub use schema::{RecordValidator, ResultSchema};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
