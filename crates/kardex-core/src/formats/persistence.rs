//! # Persistence Format
//!
//! Binary serialization for catalog snapshots.
//!
//! Catalog snapshots travel between offices as files and are archived per
//! catalog version; the format is header + postcard payload:
//! - 4 bytes: Magic ("KRDX")
//! - 1 byte: Version
//!
//! Pre-deserialization validation keeps corrupted or hostile files cheap
//! to reject: size bounds and the header are checked before the payload is
//! parsed.

use crate::{AcademicError, Catalog, primitives};

// =============================================================================
// SIZE LIMITS
// =============================================================================

/// Maximum allowed payload size for the snapshot format.
///
/// Validated BEFORE attempting deserialization so oversized data cannot
/// trigger large allocations. 64 MB holds any real curriculum many times
/// over.
pub const MAX_PERSISTENCE_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;

/// Minimum valid file size (header only).
const MIN_FILE_SIZE: usize = 5;

// =============================================================================
// FILE HEADER
// =============================================================================

/// The persistence header precedes all snapshot data.
#[derive(Debug, Clone, Copy)]
pub struct PersistenceHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl PersistenceHeader {
    /// Create a new header with current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), AcademicError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(AcademicError::SerializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(AcademicError::SerializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write header to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 5] {
        let mut bytes = [0u8; 5];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AcademicError> {
        if bytes.len() < 5 {
            return Err(AcademicError::SerializationError(
                "Header too short".to_string(),
            ));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Ok(Self {
            magic,
            version: bytes[4],
        })
    }
}

impl Default for PersistenceHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a validated catalog to bytes (header + payload).
///
/// This is a pure transformation - no file I/O.
pub fn catalog_to_bytes(catalog: &Catalog) -> Result<Vec<u8>, AcademicError> {
    let header = PersistenceHeader::new();

    let payload = postcard::to_stdvec(catalog)
        .map_err(|e| AcademicError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(5 + payload.len());
    result.extend_from_slice(&header.to_bytes());
    result.extend_from_slice(&payload);

    Ok(result)
}

/// Deserialize a catalog from bytes.
///
/// Validates, in order: minimum size, maximum payload size, header magic
/// and version, then the postcard payload, then the catalog invariants
/// (`Catalog::validate`): a snapshot that decodes but violates catalog
/// rules is rejected the same as one built in memory.
pub fn catalog_from_bytes(bytes: &[u8]) -> Result<Catalog, AcademicError> {
    if bytes.len() < MIN_FILE_SIZE {
        return Err(AcademicError::SerializationError(
            "Data too short: minimum 5 bytes required".to_string(),
        ));
    }

    if bytes.len() > MAX_PERSISTENCE_PAYLOAD_SIZE {
        return Err(AcademicError::SerializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_PERSISTENCE_PAYLOAD_SIZE
        )));
    }

    let header = PersistenceHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = &bytes[5..];
    let catalog: Catalog = postcard::from_bytes(payload).map_err(|e| {
        AcademicError::SerializationError(format!("Failed to deserialize catalog data: {}", e))
    })?;

    catalog.validate()?;
    Ok(catalog)
}

// =============================================================================
// TESTS
// =============================================================================
