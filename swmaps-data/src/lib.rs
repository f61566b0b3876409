//! Read SW Maps project archives into the `swmaps-core` model.
//!
//! Reading runs in three stages:
//! - [`ProjectArchive::extract`] unpacks the zip container into a working
//!   directory and detects which [`SchemaVariant`] it holds.
//! - A [`SchemaReader`] turns the embedded SQLite database into a raw
//!   [`Project`](swmaps_core::Project).
//! - [`ProjectArchive::read`] normalises the project and attaches raw log
//!   files and, on request, media payloads.
//!
//! [`read_project_archive`] runs all three.

#![forbid(unsafe_code)]

pub mod archive;
mod read;
pub mod schema;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use archive::{
    ArchiveError, ExtractOptions, ExtractionError, ProjectArchive, VariantDetectionError,
    WorkDirNaming, default_work_root,
};
pub use read::{ReadOptions, ReadProjectError, read_project_archive};
pub use schema::{
    CurrentSchemaReader, LegacySchemaReader, SchemaReadError, SchemaReader, SchemaVariant,
};
