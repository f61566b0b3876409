//! Facade crate for the SW Maps project reader.
//!
//! This crate re-exports the project model and the archive reader so callers
//! can depend on a single crate.

#![forbid(unsafe_code)]

pub use swmaps_core::{
    AttributeField, AttributeType, AttributeValue, Feature, FeatureLayer, GeometryType,
    PhotoPoint, Point, PointShape, Project, ProjectAttribute, ProjectAttributeType, Track,
};

pub use swmaps_data::{
    ArchiveError, ExtractOptions, ProjectArchive, ReadOptions, ReadProjectError, SchemaReadError,
    SchemaVariant, WorkDirNaming, read_project_archive,
};
