//! # Zip Package Loading
//!
//! Decodes a `.elp` zip package into a [`MemoryArchive`]. Decompression
//! happens here, once, so that validation itself performs no IO.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use zip::ZipArchive;

use crate::error::ArchiveError;
use crate::memory::MemoryArchive;

/// Open a zip package on disk.
pub fn open_zip(path: &Path) -> Result<MemoryArchive, ArchiveError> {
    let file = File::open(path)?;
    tracing::debug!(path = %path.display(), "opening package");
    read_zip(BufReader::new(file))
}

/// Decode a zip stream into memory.
///
/// Every entry is read in full. Directory entries are kept with empty
/// content so that folder-existence checks see them.
pub fn read_zip<R: Read + Seek>(reader: R) -> Result<MemoryArchive, ArchiveError> {
    let mut zip = ZipArchive::new(reader)?;
    let mut archive = MemoryArchive::new();

    for i in 0..zip.len() {
        let mut file = zip.by_index(i)?;
        let name = file.name().to_string();
        let mut content = Vec::new();
        if !file.is_dir() {
            file.read_to_end(&mut content)?;
        }
        archive.insert(name, content);
    }

    tracing::debug!(entries = archive.len(), "package decoded");
    Ok(archive)
}
