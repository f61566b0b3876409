//! Surveyed entities: features, tracks, photo points and their attributes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{AttributeType, GeometryType, Point, ProjectAttributeType};

/// The value one feature stores for one attribute field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttributeValue {
    /// Identifier of the owning feature.
    pub feature_id: String,
    /// Identifier of the answered [`AttributeField`](crate::AttributeField).
    pub field_id: String,
    /// Raw stored value.
    pub value: String,
    /// Data type recorded alongside the value.
    pub data_type: AttributeType,
    /// Display name of the answered field, empty when it cannot be resolved.
    pub field_name: String,
}

/// One surveyed point, line or polygon.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Feature {
    /// Unique identifier.
    pub id: String,
    /// Identifier of the owning layer.
    pub layer_id: String,
    /// Display name.
    pub name: String,
    /// Project-local feature number.
    pub feature_number: i64,
    /// Free-text remarks.
    pub remarks: String,
    /// Geometry kind copied from the owning layer.
    pub geometry_type: GeometryType,
    /// Vertices in sequence order.
    pub points: Vec<Point>,
    /// Attribute values in stored order.
    pub attribute_values: Vec<AttributeValue>,
}

/// A recorded polyline.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Track {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Line colour as a packed ARGB integer.
    pub color: i64,
    /// Free-text remarks.
    pub remarks: String,
    /// Vertices in sequence order.
    pub vertices: Vec<Point>,
}

/// A geotagged photo.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhotoPoint {
    /// Unique identifier.
    pub id: String,
    /// Free-text remarks.
    pub remarks: String,
    /// Stored file name of the photo.
    pub file_name: String,
    /// Capture location; `None` when the database holds no location row.
    pub location: Option<Point>,
}

/// A project-level custom field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectAttribute {
    /// Field name.
    pub name: String,
    /// Stored value.
    pub value: String,
    /// Whether a value must be entered.
    pub is_required: bool,
    /// Value type.
    pub data_type: ProjectAttributeType,
    /// Allowed values for enumerated attributes, in stored order.
    pub choices: Vec<String>,
}
