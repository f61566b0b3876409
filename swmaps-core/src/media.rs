//! Resolve stored media file names to files on disk.
//!
//! Lookups never fail: an empty name, a missing file or any I/O error while
//! probing is reported as "not found" (`None`) and left to the caller.

use camino::{Utf8Path, Utf8PathBuf};
use swmaps_fs::file_is_file;

use crate::Project;

impl Project {
    /// Resolve a stored media file name.
    ///
    /// The name is first tried as a path in its own right, then relative to
    /// [`Project::media_folder_path`].
    ///
    /// # Examples
    /// ```
    /// use swmaps_core::Project;
    ///
    /// let project = Project::new("db.swm2", "/nonexistent/Photos");
    /// assert!(project.media_file_path("").is_none());
    /// assert!(project.media_file_path("IMG_0001.jpg").is_none());
    /// ```
    #[must_use]
    pub fn media_file_path(&self, stored_name: &str) -> Option<Utf8PathBuf> {
        if stored_name.is_empty() {
            return None;
        }
        let direct = Utf8Path::new(stored_name);
        if is_existing_file(direct) {
            return Some(direct.to_path_buf());
        }
        let in_media_folder = self.media_folder_path().join(stored_name);
        is_existing_file(&in_media_folder).then_some(in_media_folder)
    }

    /// Resolve every media file referenced by the project.
    ///
    /// Covers photo, audio and video attribute values of all features, then
    /// the file of every photo point. Unresolvable references are skipped and
    /// each path is listed once, in first-seen order.
    #[must_use]
    pub fn media_files_on_disk(&self) -> Vec<Utf8PathBuf> {
        let attribute_names = self
            .features
            .iter()
            .flat_map(|feature| &feature.attribute_values)
            .filter(|value| value.data_type.is_media())
            .map(|value| value.value.as_str());
        let photo_names = self
            .photo_points
            .iter()
            .map(|photo| photo.file_name.as_str());

        let mut resolved: Vec<Utf8PathBuf> = Vec::new();
        for path in attribute_names
            .chain(photo_names)
            .filter_map(|name| self.media_file_path(name))
        {
            if !resolved.contains(&path) {
                resolved.push(path);
            }
        }
        resolved
    }
}

fn is_existing_file(path: &Utf8Path) -> bool {
    file_is_file(path).unwrap_or(false)
}
