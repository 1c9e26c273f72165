//! Typed record access over raw slot storage.
//!
//! These wrappers (de)serialize [`NvramHeader`] and [`NvramSpace`] records
//! through the wire codec and enforce record-type discrimination: a blob
//! that fails to decode as the expected kind, including a well-formed
//! frame of the *wrong* kind, surfaces as [`StorageError::Corrupt`], the
//! same as any other unreadable slot.

use tracing::warn;

use nvs_types::{NvramHeader, NvramSpace};
use nvs_wire::{decode_header, decode_space, encode_header, encode_space};

use crate::storage::{Storage, StorageError};

/// Load and decode the header record. `None` means no header exists yet.
pub fn load_header<S: Storage>(storage: &mut S) -> Result<Option<NvramHeader>, StorageError> {
    let Some(blob) = storage.load_header()? else {
        return Ok(None);
    };
    match decode_header(&blob) {
        Ok(header) => Ok(Some(header)),
        Err(err) => {
            warn!("header record failed to decode: {err}");
            Err(StorageError::Corrupt)
        }
    }
}

/// Encode and store the header record.
pub fn store_header<S: Storage>(storage: &mut S, header: &NvramHeader) -> Result<(), StorageError> {
    storage.store_header(&encode_header(header))
}

/// Load and decode the record for a space index.
pub fn load_space<S: Storage>(
    storage: &mut S,
    index: u32,
) -> Result<Option<NvramSpace>, StorageError> {
    let Some(blob) = storage.load_space(index)? else {
        return Ok(None);
    };
    match decode_space(&blob) {
        Ok(space) => Ok(Some(space)),
        Err(err) => {
            warn!("space record 0x{index:x} failed to decode: {err}");
            Err(StorageError::Corrupt)
        }
    }
}

/// Encode and store the record for a space index.
pub fn store_space<S: Storage>(
    storage: &mut S,
    index: u32,
    space: &NvramSpace,
) -> Result<(), StorageError> {
    storage.store_space(index, &encode_space(space))
}

/// Remove the record for a space index. Returns whether a record existed.
pub fn delete_space<S: Storage>(storage: &mut S, index: u32) -> Result<bool, StorageError> {
    storage.delete_space(index)
}
