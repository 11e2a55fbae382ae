//! # Snapshot Format
//!
//! Binary encoding of a [`MetamodelSnapshot`].
//!
//! Format: Header (5 bytes) + postcard-serialized snapshot.
//! - 4 bytes: Magic ("FWMM")
//! - 1 byte: Version
//!
//! Size and header are checked before the payload is decoded, so corrupted
//! or oversized input fails without allocating for it.

use crate::export::MetamodelSnapshot;
use crate::{MetamodelError, primitives};

/// Minimum valid input size (header only).
const MIN_FILE_SIZE: usize = 5;

// =============================================================================
// HEADER
// =============================================================================

/// Precedes every encoded snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl SnapshotHeader {
    /// Header for the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    pub fn validate(&self) -> Result<(), MetamodelError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(MetamodelError::DeserializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(MetamodelError::DeserializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; 5] {
        let mut bytes = [0u8; 5];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MetamodelError> {
        let [m0, m1, m2, m3, version, ..] = *bytes else {
            return Err(MetamodelError::DeserializationError(
                "Header too short".to_string(),
            ));
        };
        Ok(Self {
            magic: [m0, m1, m2, m3],
            version,
        })
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ENCODE / DECODE
// =============================================================================

/// Encode a snapshot with its header.
pub fn snapshot_to_bytes(snapshot: &MetamodelSnapshot) -> Result<Vec<u8>, MetamodelError> {
    let payload = postcard::to_stdvec(snapshot)
        .map_err(|e| MetamodelError::SerializationError(e.to_string()))?;
    let mut bytes = Vec::with_capacity(MIN_FILE_SIZE + payload.len());
    bytes.extend_from_slice(&SnapshotHeader::new().to_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode a snapshot, validating size and header first.
pub fn snapshot_from_bytes(bytes: &[u8]) -> Result<MetamodelSnapshot, MetamodelError> {
    if bytes.len() < MIN_FILE_SIZE {
        return Err(MetamodelError::DeserializationError(format!(
            "Data too short: minimum {MIN_FILE_SIZE} bytes required"
        )));
    }
    if bytes.len() > primitives::MAX_SNAPSHOT_PAYLOAD_SIZE {
        return Err(MetamodelError::DeserializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            primitives::MAX_SNAPSHOT_PAYLOAD_SIZE
        )));
    }

    SnapshotHeader::from_bytes(bytes)?.validate()?;

    postcard::from_bytes(&bytes[MIN_FILE_SIZE..])
        .map_err(|e| MetamodelError::DeserializationError(format!("Invalid snapshot data: {e}")))
}

// =============================================================================
// TESTS
// =============================================================================
