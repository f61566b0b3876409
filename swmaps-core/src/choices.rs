//! Codec for the `||`-joined choice lists stored by both schema variants.

/// Separator between entries of a stored choice list.
pub const CHOICE_SEPARATOR: &str = "||";

/// Split a stored choice list into its entries.
///
/// Empty segments are discarded, so an empty input yields no choices and a
/// trailing separator does not add a blank entry. Input without a separator
/// is a single choice.
///
/// # Examples
/// ```
/// use swmaps_core::decode_choices;
///
/// assert_eq!(decode_choices("A||B||C"), vec!["A", "B", "C"]);
/// assert_eq!(decode_choices("A||"), vec!["A"]);
/// assert_eq!(decode_choices("A"), vec!["A"]);
/// assert!(decode_choices("").is_empty());
/// ```
#[must_use]
pub fn decode_choices(stored: &str) -> Vec<String> {
    stored
        .split(CHOICE_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}
