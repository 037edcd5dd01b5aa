//! Candidate selection: format filter and ordering policy.
//!
//! Both halves are pure. The filter classifies candidates by extension (or
//! MIME type, for callers that have one) against the supported-format
//! allow-list; unsupported items are dropped silently and only counted.
//! The ordering policy produces the canonical page sequence: a stable,
//! case-insensitive lexicographic sort on display name, so the same input
//! set yields the same page order no matter how the host enumerated it.

use crate::source::ImageSource;
use std::path::Path;

/// File extensions accepted by the format filter, lower-case.
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "bmp", "webp", "svg"];

/// True iff the file name's extension is in the supported set.
pub fn is_supported_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// True iff the MIME type corresponds to a supported image format.
pub fn is_supported_mime(mime: &str) -> bool {
    matches!(
        mime,
        "image/jpeg"
            | "image/jpg"
            | "image/png"
            | "image/gif"
            | "image/bmp"
            | "image/webp"
            | "image/svg+xml"
    )
}

/// Drop unsupported candidates, returning the kept sources and the count of
/// filtered-out items for the caller's stats.
///
/// A declared MIME type wins over the extension when present, matching the
/// browser flow where every selected file carries one.
pub fn filter_sources(sources: Vec<ImageSource>) -> (Vec<ImageSource>, usize) {
    let before = sources.len();
    let kept: Vec<ImageSource> = sources
        .into_iter()
        .filter(|s| match s.mime.as_deref() {
            Some(mime) => is_supported_mime(mime),
            None => is_supported_name(&s.name),
        })
        .collect();
    let filtered_out = before - kept.len();
    (kept, filtered_out)
}

/// Sort sources into canonical page order: ascending by display name,
/// case-folded, raw name as tiebreak. Stable.
pub fn sort_sources(sources: &mut Vec<ImageSource>) {
    sources.sort_by_cached_key(|s| (s.name.to_lowercase(), s.name.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src(name: &str) -> ImageSource {
        ImageSource::from_bytes(name, Vec::new())
    }

    #[test]
    fn extension_filter_is_case_insensitive() {
        assert!(is_supported_name("photo.jpg"));
        assert!(is_supported_name("PHOTO.JPG"));
        assert!(is_supported_name("logo.WebP"));
        assert!(is_supported_name("diagram.svg"));
        assert!(!is_supported_name("notes.txt"));
        assert!(!is_supported_name("archive.tar.gz"));
        assert!(!is_supported_name("no_extension"));
    }

    #[test]
    fn mime_filter() {
        assert!(is_supported_mime("image/png"));
        assert!(is_supported_mime("image/svg+xml"));
        assert!(!is_supported_mime("text/plain"));
        assert!(!is_supported_mime("application/pdf"));
    }

    #[test]
    fn filter_counts_dropped_items() {
        let sources = vec![src("b.png"), src("a.jpg"), src("c.txt")];
        let (kept, filtered_out) = filter_sources(sources);
        assert_eq!(kept.len(), 2);
        assert_eq!(filtered_out, 1);
    }

    #[test]
    fn declared_mime_wins_over_extension() {
        let sources = vec![
            // no extension, but the host says it's an image
            src("download").with_mime("image/png"),
            // image extension, but the host says it isn't
            src("fake.png").with_mime("text/html"),
        ];
        let (kept, filtered_out) = filter_sources(sources);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "download");
        assert_eq!(filtered_out, 1);
    }

    #[test]
    fn order_is_independent_of_input_order() {
        let mut forward = vec![src("a.jpg"), src("b.png"), src("c.gif")];
        let mut backward = vec![src("c.gif"), src("b.png"), src("a.jpg")];
        sort_sources(&mut forward);
        sort_sources(&mut backward);
        let f: Vec<_> = forward.iter().map(|s| s.name.as_str()).collect();
        let b: Vec<_> = backward.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(f, b);
        assert_eq!(f, vec!["a.jpg", "b.png", "c.gif"]);
    }

    #[test]
    fn order_is_case_insensitive_with_deterministic_tiebreak() {
        let mut sources = vec![src("Beta.png"), src("alpha.png"), src("ALPHA.png")];
        sort_sources(&mut sources);
        let names: Vec<_> = sources.iter().map(|s| s.name.as_str()).collect();
        // both spellings of alpha before Beta; upper-case tiebreak first
        assert_eq!(names, vec!["ALPHA.png", "alpha.png", "Beta.png"]);
    }
}
