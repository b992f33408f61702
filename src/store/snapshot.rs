//! Snapshot file format
//!
//! A full image of a `MemoryStore`, written whole on flush and read whole
//! on open.
//!
//! ```text
//! ┌──────────┬─────────────┬──────────┬──────────┬──────────────────┐
//! │ Magic(4) │ Version (4) │ CRC (4)  │ Len (8)  │ Payload (bincode)│
//! └──────────┴─────────────┴──────────┴──────────┴──────────────────┘
//! ```
//!
//! All integers are little-endian. The CRC covers the payload only.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PatronError, Result};
use crate::key::RecordKey;

/// Magic bytes at the start of every snapshot file
pub const MAGIC: &[u8; 4] = b"PKVS";

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Header size: magic (4) + version (4) + crc (4) + len (8)
const HEADER_SIZE: usize = 20;

/// Contents of a snapshot
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct SnapshotBody {
    /// Next id `allocate_id` will hand out
    pub next_id: u64,

    /// Every record, in key order
    pub records: Vec<(RecordKey, Vec<u8>)>,
}

/// Write `body` to `path`, replacing any existing snapshot
///
/// Writes a sibling temp file first and renames it into place, so a crash
/// mid-write leaves the previous snapshot intact.
pub(crate) fn write(path: &Path, body: &SnapshotBody) -> Result<()> {
    let payload = bincode::serialize(body)?;
    let crc = crc32fast::hash(&payload);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("tmp");
    {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(MAGIC)?;
        writer.write_all(&SNAPSHOT_VERSION.to_le_bytes())?;
        writer.write_all(&crc.to_le_bytes())?;
        writer.write_all(&(payload.len() as u64).to_le_bytes())?;
        writer.write_all(&payload)?;

        let file = writer
            .into_inner()
            .map_err(|e| PatronError::Io(e.into_error()))?;
        file.sync_all()?;
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Read the snapshot at `path`; `Ok(None)` if the file does not exist
pub(crate) fn read(path: &Path) -> Result<Option<SnapshotBody>> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    decode(&bytes).map(Some)
}

/// Validate the header and decode the payload
fn decode(bytes: &[u8]) -> Result<SnapshotBody> {
    if bytes.len() < HEADER_SIZE {
        return Err(PatronError::SnapshotCorruption(format!(
            "file too short for header: {} bytes",
            bytes.len()
        )));
    }
    let (header, payload) = bytes.split_at(HEADER_SIZE);

    let (magic, rest) = header.split_at(4);
    if magic != MAGIC {
        return Err(PatronError::SnapshotCorruption("bad magic".to_string()));
    }

    let version = u32::from_le_bytes(le_array(&rest[0..4]));
    if version != SNAPSHOT_VERSION {
        return Err(PatronError::SnapshotCorruption(format!(
            "unsupported version {version}; only version {SNAPSHOT_VERSION} is supported"
        )));
    }

    let stored_crc = u32::from_le_bytes(le_array(&rest[4..8]));
    let len = u64::from_le_bytes(le_array(&rest[8..16]));

    if payload.len() as u64 != len {
        return Err(PatronError::SnapshotCorruption(format!(
            "payload length mismatch: header says {len}, found {}",
            payload.len()
        )));
    }

    let computed_crc = crc32fast::hash(payload);
    if computed_crc != stored_crc {
        return Err(PatronError::SnapshotCorruption(format!(
            "CRC mismatch: stored {stored_crc:#010x}, computed {computed_crc:#010x}"
        )));
    }

    Ok(bincode::deserialize(payload)?)
}

fn le_array<const N: usize>(slice: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    out
}
