//! Loading program text from disk.
//!
//! Files are memory mapped and validated as UTF‑8 before a copy is handed to
//! the scanner.  Failures surface as [`LangError::Io`] or [`LangError::Utf8`].

use std::fs::File;
use std::path::Path;

use log::info;
use memmap2::Mmap;

use crate::error::{LangError, Result};

/// Reads the whole of `path` as UTF‑8 source text.
pub fn read_source(path: &Path) -> Result<String> {
    info!("Reading file: {:?}", path);

    let file: File = File::open(path)?;
    let len: u64 = file.metadata()?.len();

    // Zero-length files cannot be mapped.
    if len == 0 {
        return Ok(String::new());
    }

    // SAFETY: the mapping is only read while this function runs and is
    // copied out before returning.
    let mmap: Mmap = unsafe { Mmap::map(&file) }?;

    let source: String = decode(&mmap)?.to_owned();

    info!("Read {} bytes from {:?}", source.len(), path);

    Ok(source)
}

/// Validates raw bytes as UTF‑8 program text.
pub fn decode(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(LangError::from)
}
