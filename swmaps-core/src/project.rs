//! The root aggregate of a survey project.

use std::collections::{BTreeMap, HashMap};

use camino::{Utf8Path, Utf8PathBuf};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Feature, FeatureLayer, GeometryType, PhotoPoint, ProjectAttribute, Track};

/// Metadata key holding the template name.
pub const TEMPLATE_NAME_KEY: &str = "template_name";
/// Metadata key holding the template author.
pub const TEMPLATE_AUTHOR_KEY: &str = "template_author";

/// A survey project normalised from either schema variant.
///
/// Layers, features and attribute fields reference each other by
/// identifier only; use [`Project::layer`] and [`Project::feature`] to
/// follow those references.
///
/// # Examples
/// ```
/// use swmaps_core::{Feature, FeatureLayer, GeometryType, Project};
///
/// let mut project = Project::new("work/Projects/site.swm2", "work/Photos");
/// project.feature_layers.push(FeatureLayer {
///     id: "L1".into(),
///     geometry_type: GeometryType::Line,
///     ..FeatureLayer::default()
/// });
/// project.features.push(Feature {
///     id: "F1".into(),
///     layer_id: "L1".into(),
///     ..Feature::default()
/// });
///
/// let layer = project.layer("L1").expect("layer is present");
/// assert_eq!(project.features_in_layer(layer).count(), 1);
/// assert_eq!(project.geometry_type_for_layer("missing"), GeometryType::Point);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Project {
    /// Free-form project metadata.
    pub project_info: HashMap<String, String>,
    /// Feature layers in stored order.
    pub feature_layers: Vec<FeatureLayer>,
    /// Features in stored order.
    pub features: Vec<Feature>,
    /// Recorded tracks.
    pub tracks: Vec<Track>,
    /// Geotagged photos.
    pub photo_points: Vec<PhotoPoint>,
    /// Project-level attributes.
    pub project_attributes: Vec<ProjectAttribute>,
    /// Media payloads keyed by file name, loaded on request.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub media_files: BTreeMap<String, Vec<u8>>,
    /// Raw receiver log files shipped with the project.
    pub raw_data_files: Vec<Utf8PathBuf>,
    database_path: Utf8PathBuf,
    media_folder_path: Utf8PathBuf,
}

impl Project {
    /// Create an empty project read from `database_path` whose media lives in
    /// `media_folder_path`.
    #[must_use]
    pub fn new(
        database_path: impl Into<Utf8PathBuf>,
        media_folder_path: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            database_path: database_path.into(),
            media_folder_path: media_folder_path.into(),
            ..Self::default()
        }
    }

    /// Database the project was read from.
    #[must_use]
    pub fn database_path(&self) -> &Utf8Path {
        &self.database_path
    }

    /// Folder holding the project's media files.
    #[must_use]
    pub fn media_folder_path(&self) -> &Utf8Path {
        &self.media_folder_path
    }

    /// Look up a layer by identifier.
    #[must_use]
    pub fn layer(&self, id: &str) -> Option<&FeatureLayer> {
        self.feature_layers.iter().find(|layer| layer.id == id)
    }

    /// Look up a feature by identifier.
    #[must_use]
    pub fn feature(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|feature| feature.id == id)
    }

    /// Iterate over the features belonging to `layer`.
    pub fn features_in_layer<'a>(
        &'a self,
        layer: &'a FeatureLayer,
    ) -> impl Iterator<Item = &'a Feature> + 'a {
        self.features
            .iter()
            .filter(move |feature| feature.layer_id == layer.id)
    }

    /// Geometry kind of the layer with `layer_id`, or
    /// [`GeometryType::Point`] when no such layer exists.
    #[must_use]
    pub fn geometry_type_for_layer(&self, layer_id: &str) -> GeometryType {
        self.layer(layer_id)
            .map_or(GeometryType::Point, |layer| layer.geometry_type)
    }

    /// Template the project was created from, empty when unknown.
    #[must_use]
    pub fn template_name(&self) -> &str {
        self.info_value(TEMPLATE_NAME_KEY)
    }

    /// Record the template the project was created from.
    pub fn set_template_name(&mut self, name: impl Into<String>) {
        self.project_info
            .insert(TEMPLATE_NAME_KEY.to_owned(), name.into());
    }

    /// Author of the template, empty when unknown.
    #[must_use]
    pub fn template_author(&self) -> &str {
        self.info_value(TEMPLATE_AUTHOR_KEY)
    }

    /// Record the author of the template.
    pub fn set_template_author(&mut self, author: impl Into<String>) {
        self.project_info
            .insert(TEMPLATE_AUTHOR_KEY.to_owned(), author.into());
    }

    fn info_value(&self, key: &str) -> &str {
        self.project_info.get(key).map_or("", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn template_accessors_default_to_empty() {
        let project = Project::default();
        assert_eq!(project.template_name(), "");
        assert_eq!(project.template_author(), "");
    }

    #[rstest]
    fn template_accessors_write_metadata() {
        let mut project = Project::default();
        project.set_template_name("Water network");
        project.set_template_author("Field team");

        assert_eq!(project.template_name(), "Water network");
        assert_eq!(
            project.project_info.get(TEMPLATE_AUTHOR_KEY).map(String::as_str),
            Some("Field team")
        );
    }

    #[rstest]
    fn identity_paths_are_kept() {
        let project = Project::new("/tmp/x/Projects/a.swm2", "/tmp/x/Photos");
        assert_eq!(project.database_path(), "/tmp/x/Projects/a.swm2");
        assert_eq!(project.media_folder_path(), "/tmp/x/Photos");
    }

    #[rstest]
    fn lookups_follow_identifiers() {
        let mut project = Project::default();
        project.feature_layers.push(FeatureLayer {
            id: "L1".into(),
            geometry_type: GeometryType::Polygon,
            ..FeatureLayer::default()
        });
        project.features.push(Feature {
            id: "F1".into(),
            layer_id: "L1".into(),
            ..Feature::default()
        });
        project.features.push(Feature {
            id: "F2".into(),
            layer_id: "other".into(),
            ..Feature::default()
        });

        assert!(project.feature("F2").is_some());
        assert!(project.feature("F3").is_none());
        assert_eq!(
            project.geometry_type_for_layer("L1"),
            GeometryType::Polygon
        );
        let layer = project.layer("L1").expect("layer L1");
        let ids: Vec<_> = project
            .features_in_layer(layer)
            .map(|feature| feature.id.as_str())
            .collect();
        assert_eq!(ids, vec!["F1"]);
    }
}
