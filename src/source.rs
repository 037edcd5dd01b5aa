//! Image sources: where the bytes of each batch item come from.
//!
//! An [`ImageSource`] pairs a display name (the identity used for ordering
//! and captions) with a lazy bytes provider — a filesystem path read at
//! prepare time, or bytes already in memory (uploads, fetched URLs). The
//! driver consumes each source exactly once; nothing is cached across
//! items.

use crate::error::{ImageError, Images2PdfError};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One candidate image in a batch.
#[derive(Debug, Clone)]
pub struct ImageSource {
    /// Display name — sort key and page caption.
    pub name: String,
    /// MIME type declared by the host (browser file input, HTTP
    /// Content-Type). The format filter prefers this over the extension
    /// when present.
    pub mime: Option<String>,
    /// Where the bytes live.
    pub data: SourceData,
}

/// Lazy handle to an image's bytes.
#[derive(Debug, Clone)]
pub enum SourceData {
    /// Read from the filesystem at prepare time.
    Path(PathBuf),
    /// Already in memory.
    Bytes(Vec<u8>),
}

impl ImageSource {
    /// Source backed by a file on disk; the display name is the file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            name,
            mime: None,
            data: SourceData::Path(path),
        }
    }

    /// Source backed by in-memory bytes.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: None,
            data: SourceData::Bytes(bytes),
        }
    }

    /// Attach a declared MIME type.
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Byte size without reading the content (metadata lookup for paths).
    pub(crate) fn byte_len(&self) -> Result<u64, ImageError> {
        match &self.data {
            SourceData::Path(p) => std::fs::metadata(p)
                .map(|m| m.len())
                .map_err(|e| ImageError::Read {
                    name: self.name.clone(),
                    detail: e.to_string(),
                }),
            SourceData::Bytes(b) => Ok(b.len() as u64),
        }
    }

    /// Read the full content. Callers drop the returned buffer as soon as
    /// the decode is done; it must not outlive the item's iteration.
    pub(crate) fn read_bytes(&self) -> Result<Vec<u8>, ImageError> {
        match &self.data {
            SourceData::Path(p) => std::fs::read(p).map_err(|e| ImageError::Read {
                name: self.name.clone(),
                detail: e.to_string(),
            }),
            SourceData::Bytes(b) => Ok(b.clone()),
        }
    }
}

/// Enumerate the regular files of `dir` as image sources.
///
/// Flat listing only — subdirectories are not descended into. No filtering
/// or ordering happens here; the driver applies the format filter and the
/// ordering policy so that the filtered-out count is reported uniformly for
/// every kind of selection.
pub fn list_dir(dir: impl AsRef<Path>) -> Result<Vec<ImageSource>, Images2PdfError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Images2PdfError::FolderNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| Images2PdfError::Internal(format!(
        "failed to read directory '{}': {e}",
        dir.display()
    )))?;

    let mut sources = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("skipping unreadable directory entry: {e}");
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() {
            sources.push(ImageSource::from_path(path));
        }
    }

    debug!("listed {} files in {}", sources.len(), dir.display());
    Ok(sources)
}

/// Fetch each URL (or server-relative path) as bytes, producing in-memory
/// sources named after the last path segment.
///
/// Individual fetch failures are logged and skipped, matching the per-item
/// isolation of the rest of the pipeline; only a fully empty result is an
/// error.
pub async fn fetch_remote(paths: &[String]) -> Result<Vec<ImageSource>, Images2PdfError> {
    let client = reqwest::Client::new();
    let mut sources = Vec::with_capacity(paths.len());

    for path in paths {
        match fetch_one(&client, path).await {
            Ok(src) => sources.push(src),
            Err(detail) => warn!("failed to load image '{path}': {detail}"),
        }
    }

    if sources.is_empty() {
        return Err(Images2PdfError::NoImagesLoaded);
    }
    Ok(sources)
}

async fn fetch_one(client: &reqwest::Client, path: &str) -> Result<ImageSource, String> {
    let response = client.get(path).send().await.map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }

    let mime = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());

    let bytes = response.bytes().await.map_err(|e| e.to_string())?;

    let name = path
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("image")
        .to_string();

    let mut source = ImageSource::from_bytes(name, bytes.to_vec());
    if let Some(mime) = mime {
        source = source.with_mime(mime);
    }
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_path_uses_file_name() {
        let s = ImageSource::from_path("/some/dir/photo.JPG");
        assert_eq!(s.name, "photo.JPG");
    }

    #[test]
    fn byte_len_of_memory_source() {
        let s = ImageSource::from_bytes("x.png", vec![0u8; 42]);
        assert_eq!(s.byte_len().unwrap(), 42);
    }

    #[test]
    fn missing_path_reports_read_error() {
        let s = ImageSource::from_path("/definitely/not/here.png");
        assert!(matches!(s.read_bytes(), Err(ImageError::Read { .. })));
    }

    #[test]
    fn list_dir_is_flat_and_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"y").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("b.png"), b"z").unwrap();

        let sources = list_dir(dir.path()).unwrap();
        let mut names: Vec<_> = sources.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        // nested/b.png must not appear; notes.txt does (filtering is the
        // driver's job, so the filtered-out count is reported uniformly)
        assert_eq!(names, vec!["a.png", "notes.txt"]);
    }

    #[test]
    fn list_dir_missing_folder() {
        let err = list_dir("/no/such/folder");
        assert!(matches!(err, Err(Images2PdfError::FolderNotFound { .. })));
    }
}
