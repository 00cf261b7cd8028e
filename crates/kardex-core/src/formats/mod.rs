//! # Formats Module
//!
//! Binary serialization formats for Kardex snapshots.
//!
//! File I/O lives in the app layer; everything here is a pure
//! bytes-in/bytes-out transformation.

pub mod persistence;

pub use persistence::{
    MAX_PERSISTENCE_PAYLOAD_SIZE, PersistenceHeader, catalog_from_bytes, catalog_to_bytes,
};
