//! Enumerations decoded from the text codes stored in project databases.
//!
//! Both schema variants store these as upper-case strings. Decoding is
//! lenient: codes are matched case-insensitively after trimming, and
//! anything unrecognised falls back to the documented default rather than
//! failing the read.
//!
//! # Examples
//! ```
//! use swmaps_core::{AttributeType, GeometryType};
//!
//! assert_eq!(GeometryType::from_code("polygon"), GeometryType::Polygon);
//! assert_eq!(GeometryType::from_code("???"), GeometryType::Point);
//! assert!(AttributeType::from_code("PHOTO").is_media());
//! ```

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

fn normalise_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Geometry kind shared by a layer and all of its features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GeometryType {
    /// A single position.
    #[default]
    Point,
    /// An open polyline.
    Line,
    /// A closed ring.
    Polygon,
}

impl GeometryType {
    /// Decode a stored geometry code, defaulting to [`GeometryType::Point`].
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match normalise_code(code).as_str() {
            "LINE" => Self::Line,
            "POLYGON" => Self::Polygon,
            _ => Self::Point,
        }
    }

    /// Return the stored code for this geometry kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Point => "POINT",
            Self::Line => "LINE",
            Self::Polygon => "POLYGON",
        }
    }
}

/// Marker used to draw point features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PointShape {
    /// Round marker.
    #[default]
    Circle,
    /// Square marker.
    Square,
    /// Triangular marker.
    Triangle,
    /// Diamond marker.
    Diamond,
    /// Star marker.
    Star,
    /// Custom bitmap taken from the layer icon.
    Png,
}

impl PointShape {
    /// Decode a stored marker code, defaulting to [`PointShape::Circle`].
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match normalise_code(code).as_str() {
            "SQUARE" => Self::Square,
            "TRIANGLE" => Self::Triangle,
            "DIAMOND" => Self::Diamond,
            "STAR" => Self::Star,
            "PNG" => Self::Png,
            _ => Self::Circle,
        }
    }

    /// Return the stored code for this marker.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "CIRCLE",
            Self::Square => "SQUARE",
            Self::Triangle => "TRIANGLE",
            Self::Diamond => "DIAMOND",
            Self::Star => "STAR",
            Self::Png => "PNG",
        }
    }
}

/// Data type of a per-feature attribute field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AttributeType {
    /// Free text.
    #[default]
    Text,
    /// Numeric value stored as text.
    Numeric,
    /// One entry from the field's choice list.
    Options,
    /// Photo file name.
    Photo,
    /// Audio file name.
    Audio,
    /// Video file name.
    Video,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Scanned barcode contents.
    Barcode,
}

impl AttributeType {
    /// Decode a stored data-type code, defaulting to [`AttributeType::Text`].
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match normalise_code(code).as_str() {
            "NUMERIC" => Self::Numeric,
            "OPTIONS" => Self::Options,
            "PHOTO" => Self::Photo,
            "AUDIO" => Self::Audio,
            "VIDEO" => Self::Video,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "BARCODE" => Self::Barcode,
            _ => Self::Text,
        }
    }

    /// Return the stored code for this data type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Numeric => "NUMERIC",
            Self::Options => "OPTIONS",
            Self::Photo => "PHOTO",
            Self::Audio => "AUDIO",
            Self::Video => "VIDEO",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Barcode => "BARCODE",
        }
    }

    /// Whether values of this type name a media file.
    #[must_use]
    pub const fn is_media(self) -> bool {
        matches!(self, Self::Photo | Self::Audio | Self::Video)
    }
}

/// Data type of a project-level attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProjectAttributeType {
    /// Free text.
    #[default]
    Text,
    /// Numeric value stored as text.
    Numeric,
    /// One entry from the attribute's choice list.
    Options,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
}

impl ProjectAttributeType {
    /// Decode a stored data-type code, defaulting to [`ProjectAttributeType::Text`].
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match normalise_code(code).as_str() {
            "NUMERIC" => Self::Numeric,
            "OPTIONS" => Self::Options,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            _ => Self::Text,
        }
    }

    /// Return the stored code for this data type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Numeric => "NUMERIC",
            Self::Options => "OPTIONS",
            Self::Date => "DATE",
            Self::Time => "TIME",
        }
    }
}

macro_rules! display_as_code {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

display_as_code!(GeometryType, PointShape, AttributeType, ProjectAttributeType);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("POINT", GeometryType::Point)]
    #[case("line", GeometryType::Line)]
    #[case(" Polygon ", GeometryType::Polygon)]
    #[case("", GeometryType::Point)]
    #[case("MULTIPOINT", GeometryType::Point)]
    fn geometry_codes_decode_leniently(#[case] code: &str, #[case] expected: GeometryType) {
        assert_eq!(GeometryType::from_code(code), expected);
    }

    #[rstest]
    #[case("PHOTO", true)]
    #[case("audio", true)]
    #[case("VIDEO", true)]
    #[case("TEXT", false)]
    #[case("OPTIONS", false)]
    fn media_types_are_flagged(#[case] code: &str, #[case] media: bool) {
        assert_eq!(AttributeType::from_code(code).is_media(), media);
    }

    #[rstest]
    fn unknown_codes_use_defaults() {
        assert_eq!(PointShape::from_code("HEXAGON"), PointShape::Circle);
        assert_eq!(AttributeType::from_code("SIGNATURE"), AttributeType::Text);
        assert_eq!(
            ProjectAttributeType::from_code("PHOTO"),
            ProjectAttributeType::Text
        );
    }

    #[rstest]
    fn display_matches_stored_code() {
        assert_eq!(GeometryType::Line.to_string(), "LINE");
        assert_eq!(PointShape::Png.to_string(), PointShape::Png.as_str());
    }
}
