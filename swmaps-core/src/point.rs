//! Surveyed vertices shared by features, tracks and photo points.

use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One captured position.
///
/// `feature_id` names the owning feature, track or photo point. It is a weak
/// reference that normalisation overwrites with the identifier of the
/// collection actually holding the point.
///
/// # Examples
/// ```
/// use swmaps_core::Point;
///
/// let point = Point {
///     latitude: 52.5,
///     longitude: 13.4,
///     ..Point::default()
/// };
/// assert_eq!(point.coord().x, 13.4);
/// assert_eq!(point.coord().y, 52.5);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// Unique identifier.
    pub id: String,
    /// Identifier of the owner holding this point.
    pub feature_id: String,
    /// Zero-based position within the owner after normalisation.
    pub seq: i64,
    /// WGS84 latitude in degrees.
    pub latitude: f64,
    /// WGS84 longitude in degrees.
    pub longitude: f64,
    /// Ellipsoidal elevation in metres.
    pub elevation: f64,
    /// Orthometric height in metres.
    pub ortho_height: f64,
    /// Capture time in milliseconds since the Unix epoch.
    pub time: i64,
    /// Start of the averaging session in milliseconds since the Unix epoch.
    pub start_time: i64,
    /// Height of the antenna above the surveyed mark in metres.
    pub instrument_height: f64,
    /// Receiver fix-quality code.
    pub fix_quality: i64,
    /// Ground speed in metres per second.
    pub speed: f64,
    /// Identifier of the point this one was snapped to.
    pub snap_id: Option<String>,
    /// Free-form payload attached by the capturing app.
    pub additional_data: String,
    /// Bearing in degrees.
    pub bearing: f64,
    /// Horizontal accuracy estimate in metres.
    pub accuracy_h: f64,
    /// Vertical accuracy estimate in metres.
    pub accuracy_v: f64,
    /// Free-form positioning metadata.
    pub position_data: String,
}

impl Point {
    /// Planar coordinate with `x = longitude` and `y = latitude`.
    #[must_use]
    pub const fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}
