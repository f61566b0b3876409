//! Version-independent model of an SW Maps survey project.
//!
//! Responsibilities:
//! - Define the passive data containers every schema reader produces.
//! - Repair ordering and cross-reference invariants after a raw read
//!   ([`Project::normalise`]).
//! - Resolve stored media file names against the filesystem.
//!
//! Boundaries:
//! - No database or archive access (lives in `swmaps-data`).
//! - References between layers, features and fields are identifier strings
//!   resolved by lookup; nothing holds a back-pointer.

#![forbid(unsafe_code)]

mod choices;
mod feature;
mod geometry;
mod layer;
mod media;
mod normalise;
mod point;
mod project;
mod types;

pub use choices::{CHOICE_SEPARATOR, decode_choices};
pub use feature::{AttributeValue, Feature, PhotoPoint, ProjectAttribute, Track};
pub use layer::{AttributeField, FeatureLayer};
pub use point::Point;
pub use project::{Project, TEMPLATE_AUTHOR_KEY, TEMPLATE_NAME_KEY};
pub use types::{AttributeType, GeometryType, PointShape, ProjectAttributeType};
