//! Binary persistence of store entries.
//!
//! The file is a flat sequence of fixed-width little-endian fields:
//!
//! ```text
//! u64 entry_count
//! entry_count times:
//!     u64 id_len
//!     id_len bytes of UTF-8 id
//!     u64 value_count
//!     value_count little-endian f32
//! ```
//!
//! This is exactly bincode's fixint encoding of `Vec<VectorEntry>`. There is
//! no header, version or checksum. Bytes after the last entry are ignored.

use crate::db::VectorEntry;
use crate::error::{Error, Result};
use bincode::Options;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

fn wire_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
}

/// Writes `entries` to `writer` in the store file layout.
pub fn encode<W: Write>(entries: &[VectorEntry], writer: W) -> bincode::Result<()> {
    wire_options().serialize_into(writer, entries)
}

/// Reads entries in the store file layout from `reader`.
///
/// `limit` caps the total number of bytes the declared lengths may claim,
/// so a corrupt length fails before anything is allocated for it.
pub fn decode<R: Read>(reader: R, limit: u64) -> bincode::Result<Vec<VectorEntry>> {
    wire_options().with_limit(limit).deserialize_from(reader)
}

/// Saves `entries` to `path`, creating or truncating the file.
///
/// # Errors
///
/// * `Io` - the file cannot be created or written
pub fn save(entries: &[VectorEntry], path: &Path) -> Result<()> {
    let io_error = |source: io::Error| Error::Io { path: path.to_path_buf(), source };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);

    encode(entries, &mut writer).map_err(|e| match *e {
        bincode::ErrorKind::Io(source) => io_error(source),
        other => io_error(io::Error::new(io::ErrorKind::InvalidData, other)),
    })?;
    writer.flush().map_err(io_error)?;

    debug!(path = %path.display(), entries = entries.len(), "saved vector store");
    Ok(())
}

/// Loads every entry stored in `path`.
///
/// # Errors
///
/// * `Io` - the file cannot be opened
/// * `CorruptFile` - a field is truncated, a declared length runs past the
///   end of the file, or an id is not valid UTF-8
pub fn load(path: &Path) -> Result<Vec<VectorEntry>> {
    let io_error = |source: io::Error| Error::Io { path: path.to_path_buf(), source };

    let file = File::open(path).map_err(io_error)?;
    let len = file.metadata().map_err(io_error)?.len();
    let reader = BufReader::new(file);

    let entries = decode(reader, len).map_err(|e| Error::CorruptFile {
        path: path.to_path_buf(),
        reason: corruption_reason(&e),
    })?;

    debug!(path = %path.display(), entries = entries.len(), "loaded vector store");
    Ok(entries)
}

fn corruption_reason(error: &bincode::ErrorKind) -> String {
    match error {
        bincode::ErrorKind::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            "unexpected end of file".to_string()
        }
        bincode::ErrorKind::SizeLimit => "declared length exceeds file size".to_string(),
        other => other.to_string(),
    }
}
