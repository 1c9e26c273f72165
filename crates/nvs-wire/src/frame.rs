//! Tagged frame header shared by messages and persisted records.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! offset size field
//! 0x00   4    magic        "NVSF"
//! 0x04   1    wire version
//! 0x05   1    kind
//! 0x06   2    reserved (zero on encode, ignored on decode)
//! 0x08   4    payload length
//! 0x0C   ...  payload
//! ```
//!
//! Bytes past the declared payload length are ignored. Storage backends are
//! allowed to hand back blobs with trailing padding (a smaller record
//! rewritten over a larger slot), so decoding must not treat extra bytes as
//! corruption.

use alloc::vec::Vec;

use nvs_types::{MessageKind, WireError, FRAME_HEADER_SIZE, FRAME_MAGIC, WIRE_VERSION};

/// Serialize a complete frame: header plus payload.
pub fn write_frame(kind: MessageKind, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
    buf.extend_from_slice(&FRAME_MAGIC.to_le_bytes());
    buf.push(WIRE_VERSION);
    buf.push(kind as u8);
    buf.extend_from_slice(&0u16.to_le_bytes());
    buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// Parse a frame, returning its kind and payload slice.
///
/// Trailing bytes beyond the declared payload length are ignored.
///
/// # Errors
///
/// - [`WireError::Truncated`] if `data` is shorter than the header or the
///   declared payload.
/// - [`WireError::BadMagic`] / [`WireError::UnsupportedVersion`] /
///   [`WireError::UnknownKind`] for malformed headers.
pub fn read_frame(data: &[u8]) -> Result<(MessageKind, &[u8]), WireError> {
    if data.len() < FRAME_HEADER_SIZE {
        return Err(WireError::Truncated);
    }

    let magic = u32::from_le_bytes(data[0..4].try_into().unwrap());
    if magic != FRAME_MAGIC {
        return Err(WireError::BadMagic {
            expected: FRAME_MAGIC,
            got: magic,
        });
    }

    let version = data[4];
    if version != WIRE_VERSION {
        return Err(WireError::UnsupportedVersion(version));
    }

    let kind = MessageKind::try_from(data[5]).map_err(WireError::UnknownKind)?;

    let payload_len = u32::from_le_bytes(data[8..12].try_into().unwrap()) as usize;
    let payload_end = FRAME_HEADER_SIZE
        .checked_add(payload_len)
        .ok_or(WireError::LengthOutOfBounds)?;
    if data.len() < payload_end {
        return Err(WireError::Truncated);
    }

    Ok((kind, &data[FRAME_HEADER_SIZE..payload_end]))
}

/// Parse a frame and require a specific kind.
///
/// A well-formed frame of the wrong kind is a storage-object-type mismatch
/// and returns [`WireError::KindMismatch`].
pub fn read_frame_expecting(data: &[u8], expected: MessageKind) -> Result<&[u8], WireError> {
    let (kind, payload) = read_frame(data)?;
    if kind != expected {
        return Err(WireError::KindMismatch { expected, got: kind });
    }
    Ok(payload)
}
