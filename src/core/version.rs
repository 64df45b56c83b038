//! Maven to Python version conversion.

pub const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";
pub const PREVIEW_MARKER: &str = ".preview";

/// Rewrite a Maven snapshot version into its Python preview form.
///
/// Only versions ending in `-SNAPSHOT` are touched, and then only the first
/// occurrence of the marker is replaced: `1.2.0-SNAPSHOT` becomes
/// `1.2.0.preview`.
pub fn to_python_version(version: &str) -> String {
    if version.ends_with(SNAPSHOT_SUFFIX) {
        version.replacen(SNAPSHOT_SUFFIX, PREVIEW_MARKER, 1)
    } else {
        version.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_versions_pass_through() {
        assert_eq!(to_python_version("1.0.0"), "1.0.0");
        assert_eq!(to_python_version(""), "");
    }

    #[test]
    fn trailing_snapshot_becomes_preview() {
        assert_eq!(to_python_version("1.2.0-SNAPSHOT"), "1.2.0.preview");
        assert_eq!(to_python_version("2.3.1-SNAPSHOT"), "2.3.1.preview");
    }

    #[test]
    fn snapshot_not_at_end_is_left_alone() {
        assert_eq!(
            to_python_version("2.3.1-SNAPSHOT-extra"),
            "2.3.1-SNAPSHOT-extra"
        );
    }

    #[test]
    fn only_first_occurrence_is_replaced() {
        assert_eq!(
            to_python_version("2.3.1-SNAPSHOT-extra-SNAPSHOT"),
            "2.3.1.preview-extra-SNAPSHOT"
        );
    }

    #[test]
    fn marker_is_case_sensitive() {
        assert_eq!(to_python_version("1.0-snapshot"), "1.0-snapshot");
    }
}
