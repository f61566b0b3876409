//! Post-read normalisation: point resequencing and field-name backfill.
//!
//! Stored sequence columns and owner references are not trustworthy, so
//! every freshly read project passes through [`Project::normalise`] before it
//! is handed to callers. All steps are idempotent.

use crate::{Point, Project};

impl Project {
    /// Resequence all points and resolve attribute field names.
    pub fn normalise(&mut self) {
        self.resequence_all();
        self.resolve_field_names();
    }

    /// Reassign point sequence numbers and owner identifiers.
    ///
    /// Feature points and track vertices are ordered by their stored
    /// sequence (ties keep their read order), renumbered `0..n` and stamped
    /// with the identifier of the holding feature or track. Photo locations
    /// always end up at sequence `0`.
    pub fn resequence_all(&mut self) {
        for feature in &mut self.features {
            resequence_points(&feature.id, &mut feature.points);
        }
        for track in &mut self.tracks {
            resequence_points(&track.id, &mut track.vertices);
        }
        for photo in &mut self.photo_points {
            if let Some(location) = photo.location.as_mut() {
                location.seq = 0;
            }
        }
    }

    /// Fill in [`AttributeValue::field_name`](crate::AttributeValue::field_name)
    /// from the owning layer's attribute schema.
    ///
    /// Values whose layer or field cannot be found get an empty name.
    pub fn resolve_field_names(&mut self) {
        let layers = &self.feature_layers;
        for feature in &mut self.features {
            let layer = layers.iter().find(|layer| layer.id == feature.layer_id);
            for value in &mut feature.attribute_values {
                value.field_name = layer
                    .and_then(|layer| layer.attribute_field(&value.field_id))
                    .map(|field| field.field_name.clone())
                    .unwrap_or_default();
            }
        }
    }
}

fn resequence_points(owner_id: &str, points: &mut [Point]) {
    points.sort_by_key(|point| point.seq);
    for (seq, point) in (0_i64..).zip(points.iter_mut()) {
        point.seq = seq;
        owner_id.clone_into(&mut point.feature_id);
    }
}
