//! Document sink: serialise the finished document and deliver the bytes.
//!
//! Serialisation happens exactly once per batch, after the last item.
//! Delivery is a trait so the same driver serves every host: the CLI and
//! library default to an atomic file write, embedders (web handlers, GUI
//! download buttons) capture the bytes in memory instead.

use crate::error::Images2PdfError;
use printpdf::{PdfDocument, PdfSaveOptions, PdfWarnMsg};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Serialise the assembled document to PDF bytes.
pub fn finalize(mut doc: PdfDocument) -> Result<Vec<u8>, Images2PdfError> {
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        debug!("pdf serialisation produced {} warnings", warnings.len());
    }
    if bytes.is_empty() {
        return Err(Images2PdfError::DocumentError(
            "serialiser produced no bytes".into(),
        ));
    }
    Ok(bytes)
}

/// Delivery mechanism for a finished PDF.
pub trait DocumentSink: Send + Sync {
    /// Hand over the serialised document under the given file name.
    fn deliver(&self, pdf: &[u8], filename: &str) -> Result<(), Images2PdfError>;
}

/// Writes the PDF to the filesystem.
///
/// Uses atomic write (temp file + rename) so a crash mid-write never
/// leaves a truncated PDF under the target name.
pub struct FileSink;

impl DocumentSink for FileSink {
    fn deliver(&self, pdf: &[u8], filename: &str) -> Result<(), Images2PdfError> {
        let path = Path::new(filename);
        let wrap = |source: std::io::Error| Images2PdfError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(wrap)?;
            }
        }

        let tmp = path.with_extension("pdf.tmp");
        std::fs::write(&tmp, pdf).map_err(wrap)?;
        std::fs::rename(&tmp, path).map_err(wrap)?;

        info!("wrote {} bytes to {}", pdf.len(), path.display());
        Ok(())
    }
}

/// Captures delivered documents in memory; used by tests and by hosts that
/// forward the bytes themselves (HTTP responses, browser downloads).
#[derive(Default)]
pub struct MemorySink {
    delivered: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(filename, bytes)` pairs delivered so far, draining the sink.
    pub fn take(&self) -> Vec<(String, Vec<u8>)> {
        std::mem::take(&mut self.delivered.lock().unwrap())
    }
}

impl DocumentSink for MemorySink {
    fn deliver(&self, pdf: &[u8], filename: &str) -> Result<(), Images2PdfError> {
        self.delivered
            .lock()
            .unwrap()
            .push((filename.to_string(), pdf.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sink_writes_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.pdf");
        let target_str = target.to_string_lossy().to_string();

        FileSink.deliver(b"%PDF-stub", &target_str).unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"%PDF-stub");
        // no temp file left behind
        assert!(!target.with_extension("pdf.tmp").exists());
    }

    #[test]
    fn file_sink_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("deep/nested/out.pdf");
        FileSink
            .deliver(b"%PDF-stub", &target.to_string_lossy())
            .unwrap();
        assert!(target.exists());
    }

    #[test]
    fn memory_sink_captures_delivery() {
        let sink = MemorySink::new();
        sink.deliver(b"abc", "one.pdf").unwrap();
        sink.deliver(b"def", "two.pdf").unwrap();
        let got = sink.take();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].0, "one.pdf");
        assert_eq!(got[1].1, b"def");
        assert!(sink.take().is_empty());
    }

    #[test]
    fn finalize_of_empty_document_yields_bytes() {
        let doc = PdfDocument::new("empty");
        let bytes = finalize(doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
