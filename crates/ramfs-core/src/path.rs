//! Path normalization and parent resolution.
//!
//! Every path is treated as rooted: `a/b` and `/a/b` address the same node.
//! Backslashes are accepted as separators.

pub const ROOT: &str = "/";

/// Canonicalize a path: `/`-separated, absolute, no `.`/`..`, no trailing slash.
///
/// `..` never climbs above root. An empty path normalizes to `/`.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut components: Vec<&str> = Vec::new();

    for component in path.split('/') {
        match component {
            "" | "." => continue,
            ".." => {
                components.pop();
            }
            comp => components.push(comp),
        }
    }

    format!("/{}", components.join("/"))
}

/// Split a normalized path into its segments, the root dropped.
pub fn segments(normalized: &str) -> Vec<&str> {
    normalized.split('/').filter(|s| !s.is_empty()).collect()
}

/// Canonical path of the directory containing the last segment.
pub fn parent_path(segments: &[&str]) -> String {
    match segments.len() {
        0 | 1 => ROOT.to_string(),
        n => format!("/{}", segments[..n - 1].join("/")),
    }
}

/// Final segment, `None` for root.
pub fn leaf_name<'a>(segments: &[&'a str]) -> Option<&'a str> {
    segments.last().copied()
}

/// Whether the raw, unnormalized path asks for a directory.
pub fn has_directory_suffix(raw: &str) -> bool {
    raw.ends_with('/') || raw.ends_with('\\')
}

/// Child path of `dir` (normalized) named `name`.
pub fn join_path(dir: &str, name: &str) -> String {
    if dir == ROOT {
        format!("/{}", name)
    } else {
        format!("{}/{}", dir, name)
    }
}

/// A path split the way every operation consumes it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetPath {
    /// Normalized form of the whole path
    pub path: String,
    /// Normalized path of the containing directory
    pub parent: String,
    /// Leaf name, `None` when the path is root
    pub name: Option<String>,
}

impl TargetPath {
    pub fn parse(raw: &str) -> Self {
        let path = normalize_path(raw);
        let segs = segments(&path);
        let parent = parent_path(&segs);
        let name = leaf_name(&segs).map(str::to_string);
        Self { path, parent, name }
    }

    pub fn is_root(&self) -> bool {
        self.name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_dots() {
        assert_eq!(normalize_path("/a/./b/../c"), "/a/c");
        assert_eq!(normalize_path("/a/b/.."), "/a");
        assert_eq!(normalize_path("/a/.."), "/");
    }

    #[test]
    fn test_normalize_never_escapes_root() {
        assert_eq!(normalize_path("/../../x"), "/x");
        assert_eq!(normalize_path(".."), "/");
    }

    #[test]
    fn test_normalize_separators_and_slashes() {
        assert_eq!(normalize_path("a\\b\\c"), "/a/b/c");
        assert_eq!(normalize_path("//a///b//"), "/a/b");
        assert_eq!(normalize_path("relative/path"), "/relative/path");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_parent_path() {
        assert_eq!(parent_path(&[]), "/");
        assert_eq!(parent_path(&["a"]), "/");
        assert_eq!(parent_path(&["a", "b"]), "/a");
        assert_eq!(parent_path(&["a", "b", "c"]), "/a/b");
    }

    #[test]
    fn test_segments_and_leaf() {
        let segs = segments("/a/b/c");
        assert_eq!(segs, vec!["a", "b", "c"]);
        assert_eq!(leaf_name(&segs), Some("c"));
        assert!(segments("/").is_empty());
        assert_eq!(leaf_name(&segments("/")), None);
    }

    #[test]
    fn test_directory_suffix() {
        assert!(has_directory_suffix("/a/b/"));
        assert!(has_directory_suffix("a\\"));
        assert!(!has_directory_suffix("/a/b"));
        assert!(!has_directory_suffix(""));
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/", "a"), "/a");
        assert_eq!(join_path("/a", "b"), "/a/b");
    }

    #[test]
    fn test_target_path() {
        let target = TargetPath::parse("a/b/./c/");
        assert_eq!(target.path, "/a/b/c");
        assert_eq!(target.parent, "/a/b");
        assert_eq!(target.name.as_deref(), Some("c"));

        let root = TargetPath::parse("/x/..");
        assert!(root.is_root());
        assert_eq!(root.parent, "/");
    }
}
