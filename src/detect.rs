//! PDF header sniffing.
//!
//! Runs before the document is handed to `lopdf`, so that a text file or an
//! HTML page saved with a `.pdf` extension fails with a clear
//! [`Error::UnknownFormat`] instead of an xref parse error.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"
const HEADER_LEN: usize = 16;

/// Read the PDF version (e.g. `"1.7"`) from the start of a file.
pub fn pdf_version_from_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_LEN);
    file.take(HEADER_LEN as u64).read_to_end(&mut header)?;
    pdf_version_from_bytes(&header)
}

/// Read the PDF version from the leading bytes of a document.
pub fn pdf_version_from_bytes(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let start = PDF_MAGIC.len();
    let version = String::from_utf8_lossy(&data[start..start + VERSION_LEN]).to_string();
    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }
    Ok(version)
}

/// Check whether bytes start with a PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    pdf_version_from_bytes(data).is_ok()
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}
