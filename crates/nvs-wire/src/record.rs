//! Persistent record codec for the header and per-space objects.
//!
//! Records share the message framing but carry the record kinds, so a
//! header blob never decodes as a space record and vice versa. The header
//! decoder additionally caps the accepted blob size: the header is a small
//! bounded structure, and an oversized blob is corruption, not data.

use alloc::vec::Vec;

use nvs_types::{MessageKind, NvramHeader, NvramSpace, SpaceControls, WireError, MAX_HEADER_BLOB};

use crate::cursor::write::{put_blob, put_optional_u32, put_u32_list};
use crate::cursor::PayloadReader;
use crate::frame::{read_frame_expecting, write_frame};
use crate::varint::write_varint;

/// Encode the header record into a framed blob.
pub fn encode_header(header: &NvramHeader) -> Vec<u8> {
    let mut payload = Vec::new();
    write_varint(&mut payload, u64::from(header.version));
    write_varint(&mut payload, u64::from(header.flags));
    put_u32_list(&mut payload, &header.allocated_indices);
    put_optional_u32(&mut payload, header.provisional_index);
    write_frame(MessageKind::Header, &payload)
}

/// Decode a framed header record blob.
///
/// Trailing bytes after the frame payload are tolerated. The stored
/// `version` field is returned as-is; deciding whether it is acceptable is
/// the manager's call, not the codec's.
pub fn decode_header(data: &[u8]) -> Result<NvramHeader, WireError> {
    if data.len() > MAX_HEADER_BLOB {
        return Err(WireError::LengthOutOfBounds);
    }
    let payload = read_frame_expecting(data, MessageKind::Header)?;
    let mut r = PayloadReader::new(payload);
    Ok(NvramHeader {
        version: r.read_varint_u32()?,
        flags: r.read_varint_u32()?,
        allocated_indices: r.read_u32_list()?,
        provisional_index: r.read_optional_u32()?,
    })
}

/// Encode a space record into a framed blob.
pub fn encode_space(space: &NvramSpace) -> Vec<u8> {
    let mut payload = Vec::new();
    write_varint(&mut payload, u64::from(space.flags));
    write_varint(&mut payload, u64::from(space.controls.bits()));
    put_blob(&mut payload, &space.authorization_value);
    put_blob(&mut payload, &space.contents);
    write_frame(MessageKind::Space, &payload)
}

/// Decode a framed space record blob.
pub fn decode_space(data: &[u8]) -> Result<NvramSpace, WireError> {
    let payload = read_frame_expecting(data, MessageKind::Space)?;
    let mut r = PayloadReader::new(payload);
    Ok(NvramSpace {
        flags: r.read_varint_u32()?,
        controls: SpaceControls::from_raw(r.read_varint_u32()?),
        authorization_value: r.read_blob()?,
        contents: r.read_blob()?,
    })
}
