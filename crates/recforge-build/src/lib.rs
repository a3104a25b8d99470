//! recforge Record Builder
//!
//! Turns variable-shaped, per-unit inputs into an ordered sequence of
//! validated result records.
//!
//! # Pipeline
//!
//! ```text
//! FieldSet ──► collect_entries ──► prune_undefined ──► BroadcastProfile
//!                                                          │
//!   RecordSet ◄── validate ◄── delete_keys ◄── expand ◄── assemble
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use recforge_build::{BuildSpec, FieldSet, RecordBuilder};
//! use serde_json::json;
//!
//! let builder = RecordBuilder::new(
//!     BuildSpec::new()
//!         .with_tags(["model", "contrast"])
//!         .with_images(["effect", "zstat"])
//!         .with_delete(["contrast"]),
//! )?;
//!
//! let fields = FieldSet::new()
//!     .with("model", "groupmean")
//!     .with("contrast", json!(["faces", "houses"]))
//!     .with("effect", json!(["/e1.nii", "/e2.nii"]));
//!
//! let records = builder.build(&fields)?;
//! assert_eq!(records.len(), 2);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod assemble;
mod broadcast;
mod builder;
mod composite;
mod delete;
mod error;
mod fields;
mod ravel;
mod spec;

pub use assemble::{assemble, AlignedField};
pub use broadcast::BroadcastProfile;
pub use builder::{RecordBuilder, RecordSet};
pub use composite::{CompositeRule, DEFAULT_COMPOSITE_TAG};
pub use delete::delete_keys;
pub use error::{BuildError, BuildResult, SpecError};
pub use fields::{collect_entries, prune_undefined, FieldEntry, FieldSet};
pub use ravel::{ravel, ravel_all, ravel_len};
pub use spec::BuildSpec;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building result records
    pub use crate::{BuildError, BuildSpec, FieldSet, RecordBuilder, RecordSet};
    pub use recforge_model::{Datum, Group, ResultRecord};
}
