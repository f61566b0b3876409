//! Feature layers and their attribute schemas.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{AttributeType, GeometryType, PointShape};

/// Definition of one custom attribute on a layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttributeField {
    /// Identifier, unique across the project.
    pub id: String,
    /// Identifier of the owning layer.
    pub layer_id: String,
    /// Display name.
    pub field_name: String,
    /// Type of the values answering this field.
    pub data_type: AttributeType,
    /// Allowed values for enumerated fields, in stored order.
    pub choices: Vec<String>,
}

/// A named category of features sharing symbology and attribute schema.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeatureLayer {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Group the layer is listed under.
    pub group_name: String,
    /// Geometry kind of every feature in the layer.
    pub geometry_type: GeometryType,
    /// Marker used for point features.
    pub point_shape: PointShape,
    /// Stroke colour as a packed ARGB integer.
    pub color: i64,
    /// Fill colour as a packed ARGB integer.
    pub fill_color: i64,
    /// Stroke width.
    pub line_width: f64,
    /// Identifier of the attribute field used as the map label.
    pub label_field_id: String,
    /// Whether new features may be captured into the layer.
    pub active: bool,
    /// Whether the layer is drawn on the map.
    pub drawn: bool,
    /// Optional PNG icon.
    pub png_symbol: Option<Vec<u8>>,
    /// Draw order.
    pub z_index: i64,
    /// Attribute schema, in stored order.
    pub attribute_fields: Vec<AttributeField>,
}

impl FeatureLayer {
    /// Find one of this layer's attribute fields by identifier.
    #[must_use]
    pub fn attribute_field(&self, id: &str) -> Option<&AttributeField> {
        self.attribute_fields.iter().find(|field| field.id == id)
    }
}
