//! Translation of untrusted URL paths into safe filesystem paths.
//!
//! Every request path is percent-decoded, normalized with POSIX semantics and
//! re-joined onto a base directory one segment at a time. Segments that could
//! escape the base (`..`, embedded separators) are dropped rather than
//! rejected, so resolution never fails; the worst case is the base itself.

use percent_encoding::percent_decode_str;
use regex::Regex;
use std::path::PathBuf;

/// UI asset paths (css/js/ico under the internal prefixes) that resolve
/// against the install directory instead of the webroot.
const SUPPORT_ASSET_PATTERN: &str = r"(?i)^(/lib)?/(css|js|ico)/.*\.(css|js|png|ico|xml|json)$";

/// Outcome of resolving a URL path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Absolute filesystem path, always a descendant of (or equal to) the
    /// chosen base directory.
    pub path: PathBuf,
    /// Whether the request path ended with a `/`.
    pub trailing_slash: bool,
    /// Whether the path resolved against the support-asset root.
    pub support_asset: bool,
}

/// Maps URL paths to filesystem paths inside one of two bases.
pub struct PathResolver {
    media_root: PathBuf,
    support_root: PathBuf,
    support_pattern: Regex,
}

impl PathResolver {
    pub fn new(media_root: PathBuf, support_root: PathBuf) -> Self {
        Self {
            media_root,
            support_root,
            support_pattern: Regex::new(SUPPORT_ASSET_PATTERN)
                .expect("support-asset pattern compiles"),
        }
    }

    /// Resolve a raw request path (query string and fragment still attached)
    /// to an absolute filesystem path.
    pub fn resolve(&self, url_path: &str) -> ResolvedPath {
        // Abandon query parameters and fragment before interpreting the path.
        let raw = url_path.split('?').next().unwrap_or("");
        let raw = raw.split('#').next().unwrap_or("");

        let trailing_slash = raw.trim_end().ends_with('/');

        // The allow-list is matched against the raw, undecoded path so that
        // encoded traversal cannot smuggle a request into the support root.
        let support_asset = self.support_pattern.is_match(raw);
        let base = if support_asset {
            &self.support_root
        } else {
            &self.media_root
        };

        let decoded = percent_decode_str(raw).decode_utf8_lossy();
        let normalized = normalize_posix(&decoded);

        let mut path = base.clone();
        for segment in normalized.split('/') {
            // Segments that mean something to the local filesystem are
            // skipped entirely; this is the traversal defense.
            if segment.is_empty() || segment == "." || segment == ".." {
                continue;
            }
            if segment.contains('\\') || segment.contains(std::path::MAIN_SEPARATOR) {
                continue;
            }
            path.push(segment);
        }

        ResolvedPath {
            path,
            trailing_slash,
            support_asset,
        }
    }
}

/// Collapse `.`/`..`/duplicate separators with POSIX semantics, clamped at
/// the root: `/a/../../b` normalizes to `/b`.
fn normalize_posix(path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }
    format!("/{}", stack.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PathResolver {
        PathResolver::new(PathBuf::from("/srv/media"), PathBuf::from("/opt/mediabro"))
    }

    #[test]
    fn plain_path_joins_onto_webroot() {
        let r = resolver().resolve("/music/song.mp3");
        assert_eq!(r.path, PathBuf::from("/srv/media/music/song.mp3"));
        assert!(!r.support_asset);
        assert!(!r.trailing_slash);
    }

    #[test]
    fn traversal_segments_cannot_escape_the_base() {
        let cases = [
            "/../../../etc/passwd",
            "/music/../../etc/passwd",
            "/..%2f..%2fetc/passwd",
            "/%2e%2e/%2e%2e/etc/passwd",
            "/....//etc/passwd",
        ];
        for case in cases {
            let r = resolver().resolve(case);
            assert!(
                r.path.starts_with("/srv/media"),
                "{case} escaped: {}",
                r.path.display()
            );
        }
    }

    #[test]
    fn dotdot_is_applied_inside_the_path() {
        let r = resolver().resolve("/a/b/../c");
        assert_eq!(r.path, PathBuf::from("/srv/media/a/c"));
    }

    #[test]
    fn percent_decoding_applies_to_segments() {
        let r = resolver().resolve("/My%20Music/song%20one.mp3");
        assert_eq!(r.path, PathBuf::from("/srv/media/My Music/song one.mp3"));
    }

    #[test]
    fn query_and_fragment_are_stripped() {
        let r = resolver().resolve("/photos/cat.jpg?mediabro-thumb.jpg#frag");
        assert_eq!(r.path, PathBuf::from("/srv/media/photos/cat.jpg"));
    }

    #[test]
    fn trailing_slash_is_preserved_as_flag() {
        assert!(resolver().resolve("/music/").trailing_slash);
        assert!(!resolver().resolve("/music").trailing_slash);
    }

    #[test]
    fn support_assets_resolve_against_install_dir() {
        for case in [
            "/lib/css/mediabro.css",
            "/css/mediabro.css",
            "/js/app.js",
            "/lib/ico/favicon.ico",
        ] {
            let r = resolver().resolve(case);
            assert!(r.support_asset, "{case}");
            assert!(r.path.starts_with("/opt/mediabro"), "{case}");
        }
    }

    #[test]
    fn support_match_uses_the_raw_path() {
        // Encoded form does not match the allow-list, so it stays in the
        // media root.
        let r = resolver().resolve("/%63ss/mediabro.css");
        assert!(!r.support_asset);
        assert!(r.path.starts_with("/srv/media"));
    }

    #[test]
    fn non_asset_extensions_stay_in_webroot() {
        let r = resolver().resolve("/css/evil.mp4");
        assert!(!r.support_asset);
        assert!(r.path.starts_with("/srv/media"));
    }

    #[test]
    fn worst_case_resolves_to_the_base_itself() {
        let r = resolver().resolve("/../..");
        assert_eq!(r.path, PathBuf::from("/srv/media"));
    }

    #[test]
    fn normalize_clamps_at_root() {
        assert_eq!(normalize_posix("/a/../../b"), "/b");
        assert_eq!(normalize_posix("//a///b/./c"), "/a/b/c");
        assert_eq!(normalize_posix("/.."), "/");
    }
}
