//! Input validation: path resolution and PDF header detection.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF header information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
    /// Byte offset of the `%PDF-` marker (non-zero when junk precedes it)
    pub header_offset: usize,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Readers accept the header anywhere in the first kilobyte.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Make sure `path` names an existing PDF before any parsing happens.
///
/// Returns [`Error::NotFound`] when the path does not resolve to a file, and
/// [`Error::UnknownFormat`] when the file has no PDF header.
///
/// # Example
/// ```no_run
/// use pdfannots::detect::ensure_readable;
///
/// let format = ensure_readable("paper.pdf").unwrap();
/// println!("{}", format);
/// ```
pub fn ensure_readable<P: AsRef<Path>>(path: P) -> Result<PdfFormat> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    detect_format_from_path(path)
}

/// Detect the PDF format from a file path.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<PdfFormat> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_SEARCH_WINDOW);
    file.take(HEADER_SEARCH_WINDOW as u64)
        .read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the PDF format from the leading bytes of a document.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    let offset = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let start = offset + PDF_MAGIC.len();
    let version_bytes = data
        .get(start..start + VERSION_LEN)
        .ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfFormat {
        version,
        header_offset: offset,
    })
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check whether bytes start like a PDF document.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_valid_pdf() {
        let format = detect_format_from_bytes(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap();
        assert_eq!(format.version, "1.7");
        assert_eq!(format.header_offset, 0);
    }

    #[test]
    fn test_detect_header_after_junk() {
        let format = detect_format_from_bytes(b"\r\n  %PDF-2.0\n").unwrap();
        assert_eq!(format.version, "2.0");
        assert_eq!(format.header_offset, 4);
    }

    #[test]
    fn test_detect_invalid_format() {
        let result = detect_format_from_bytes(b"<!DOCTYPE html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));

        let result = detect_format_from_bytes(b"%PDF");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_bad_version() {
        let result = detect_format_from_bytes(b"%PDF-x.y\n");
        assert!(matches!(result, Err(Error::UnsupportedVersion(_))));
    }

    #[test]
    fn test_ensure_readable_missing_path() {
        let result = ensure_readable("/definitely/not/here.pdf");
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_ensure_readable_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = ensure_readable(dir.path());
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\n"));
        assert!(!is_pdf_bytes(b"Not a PDF"));
    }
}
