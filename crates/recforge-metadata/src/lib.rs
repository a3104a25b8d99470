//! recforge Metadata Resolution
//!
//! Fills metadata keys on input files from an ordered chain of providers:
//! in-memory sidecar documents, closures over external tables, and fixed
//! defaults. The first provider that fills a key wins.
//!
//! # Example
//!
//! ```rust,ignore
//! use recforge_metadata::{DefaultsProvider, MetadataResolver, SidecarProvider, Subject};
//!
//! let resolver = MetadataResolver::new()
//!     .with_provider(SidecarProvider::new().with_document(path, sidecar))
//!     .with_provider(DefaultsProvider::new().with_default("slice_encoding_direction", "k"));
//!
//! let mut subject = Subject::new(path);
//! resolver.fill(&mut subject, "repetition_time")?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod provider;
mod resolver;
mod subject;

pub use error::{MetadataError, MetadataResult};
pub use provider::{DefaultsProvider, FnProvider, MetadataProvider, SidecarProvider};
pub use resolver::MetadataResolver;
pub use subject::Subject;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
