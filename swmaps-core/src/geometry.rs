//! Conversions from surveyed points into `geo` geometries.
//!
//! Coordinates are WGS84 with `x = longitude` and `y = latitude`. Shapes
//! are built as stored; nothing here checks that a polygon is simple or
//! that a line has at least two vertices.

use geo::{BoundingRect, Coord, Geometry, LineString, MultiPoint, Polygon, Rect};

use crate::{Feature, GeometryType, Project};

impl Feature {
    /// Build the feature's shape from its points.
    ///
    /// Point features use their first point. Returns `None` when the feature
    /// has no points.
    ///
    /// # Examples
    /// ```
    /// use geo::Geometry;
    /// use swmaps_core::{Feature, GeometryType, Point};
    ///
    /// let feature = Feature {
    ///     geometry_type: GeometryType::Line,
    ///     points: vec![
    ///         Point { longitude: 0.0, latitude: 0.0, ..Point::default() },
    ///         Point { longitude: 1.0, latitude: 1.0, ..Point::default() },
    ///     ],
    ///     ..Feature::default()
    /// };
    /// assert!(matches!(feature.geometry(), Some(Geometry::LineString(_))));
    /// ```
    #[must_use]
    pub fn geometry(&self) -> Option<Geometry<f64>> {
        let first = self.points.first()?;
        let coords = || self.points.iter().map(crate::Point::coord).collect::<Vec<_>>();
        let shape = match self.geometry_type {
            GeometryType::Point => Geometry::Point(first.coord().into()),
            GeometryType::Line => Geometry::LineString(LineString::from(coords())),
            GeometryType::Polygon => {
                Geometry::Polygon(Polygon::new(LineString::from(coords()), Vec::new()))
            }
        };
        Some(shape)
    }
}

impl Project {
    /// Bounding rectangle of every feature point, track vertex and photo
    /// location, or `None` for a project without positions.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect<f64>> {
        let feature_coords = self
            .features
            .iter()
            .flat_map(|feature| &feature.points)
            .map(crate::Point::coord);
        let track_coords = self
            .tracks
            .iter()
            .flat_map(|track| &track.vertices)
            .map(crate::Point::coord);
        let photo_coords = self
            .photo_points
            .iter()
            .filter_map(|photo| photo.location.as_ref())
            .map(crate::Point::coord);

        let coords: Vec<Coord<f64>> = feature_coords
            .chain(track_coords)
            .chain(photo_coords)
            .filter(|coord| coord.x.is_finite() && coord.y.is_finite())
            .collect();
        MultiPoint::from(coords).bounding_rect()
    }
}
