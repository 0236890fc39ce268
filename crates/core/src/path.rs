//! Key and prefix string handling
//!
//! Object keys are flat strings; `/` is the delimiter that simulates a
//! directory hierarchy. Normalized keys never carry a leading slash, and
//! normalized directory-style prefixes always carry a trailing slash.

use crate::error::{Error, Result};

/// Validate a bucket name for use in a remote call
pub fn validate_bucket(bucket: &str) -> Result<()> {
    if bucket.is_empty() {
        return Err(Error::InvalidPath("Bucket name cannot be empty".into()));
    }
    Ok(())
}

/// Normalize an object key: strip leading slashes
pub fn normalize_key(key: &str) -> String {
    key.trim_start_matches('/').to_string()
}

/// Normalize a directory-style prefix
///
/// Strips leading slashes and appends the trailing delimiter unless the
/// prefix is empty (bucket root).
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_start_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

/// Extract the next path segment of `key` under `prefix`
///
/// Returns `None` when the key does not live under the prefix, when it is
/// the prefix itself (self-reference), or when the remainder has no leading
/// segment before the delimiter.
pub fn child_segment(key: &str, prefix: &str) -> Option<String> {
    let rest = key.strip_prefix(prefix)?;
    if rest.is_empty() {
        return None;
    }
    match rest.split('/').next() {
        Some(segment) if !segment.is_empty() => Some(segment.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_bucket() {
        assert!(validate_bucket("my-bucket").is_ok());
        assert!(matches!(
            validate_bucket(""),
            Err(Error::InvalidPath(_))
        ));
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("a/b.txt"), "a/b.txt");
        assert_eq!(normalize_key("/a/b.txt"), "a/b.txt");
        assert_eq!(normalize_key("//a"), "a");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("photos"), "photos/");
        assert_eq!(normalize_prefix("photos/"), "photos/");
        assert_eq!(normalize_prefix("/photos/2020"), "photos/2020/");
    }

    #[test]
    fn test_normalize_prefix_root() {
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("/"), "");
    }

    #[test]
    fn test_child_segment_file() {
        assert_eq!(
            child_segment("photos/readme.txt", "photos/"),
            Some("readme.txt".into())
        );
    }

    #[test]
    fn test_child_segment_nested() {
        assert_eq!(
            child_segment("photos/2020/a.jpg", "photos/"),
            Some("2020".into())
        );
        assert_eq!(child_segment("photos/2020/", "photos/"), Some("2020".into()));
    }

    #[test]
    fn test_child_segment_self_reference() {
        assert_eq!(child_segment("photos/", "photos/"), None);
    }

    #[test]
    fn test_child_segment_outside_prefix() {
        assert_eq!(child_segment("other/x.txt", "photos/"), None);
        // "photos-old" is a sibling prefix, not a child
        assert_eq!(child_segment("photos-old/x.txt", "photos/"), None);
    }

    #[test]
    fn test_child_segment_empty_component() {
        assert_eq!(child_segment("photos//x.txt", "photos/"), None);
    }

    #[test]
    fn test_child_segment_empty_prefix() {
        assert_eq!(child_segment("a/b.txt", ""), Some("a".into()));
        assert_eq!(child_segment("top.txt", ""), Some("top.txt".into()));
    }
}
