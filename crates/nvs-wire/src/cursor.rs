//! Forward-only payload reader.

use alloc::vec::Vec;

use nvs_types::WireError;

use crate::varint::read_varint;

/// Reads payload fields in order from a byte slice.
///
/// All fixed-width integers are little-endian. Blobs and lists are
/// varint-length-prefixed; declared lengths are checked against the
/// remaining input before any allocation happens.
pub struct PayloadReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], WireError> {
        if self.remaining() < len {
            return Err(WireError::Truncated);
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u32_le(&mut self) -> Result<u32, WireError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_varint(&mut self) -> Result<u64, WireError> {
        let (value, consumed) = read_varint(&self.data[self.pos..])?;
        self.pos += consumed;
        Ok(value)
    }

    /// Read a varint that must fit a `u32`.
    pub fn read_varint_u32(&mut self) -> Result<u32, WireError> {
        u32::try_from(self.read_varint()?).map_err(|_| WireError::LengthOutOfBounds)
    }

    /// Read a single byte as a boolean; any non-zero value is true.
    pub fn read_bool(&mut self) -> Result<bool, WireError> {
        Ok(self.read_u8()? != 0)
    }

    /// Read a varint-length-prefixed byte blob.
    pub fn read_blob(&mut self) -> Result<Vec<u8>, WireError> {
        let len = usize::try_from(self.read_varint()?).map_err(|_| WireError::LengthOutOfBounds)?;
        if len > self.remaining() {
            return Err(WireError::LengthOutOfBounds);
        }
        Ok(self.take(len)?.to_vec())
    }

    /// Read a varint-count-prefixed list of `u32` values (each LE-fixed).
    pub fn read_u32_list(&mut self) -> Result<Vec<u32>, WireError> {
        let count =
            usize::try_from(self.read_varint()?).map_err(|_| WireError::LengthOutOfBounds)?;
        if count.checked_mul(4).map_or(true, |n| n > self.remaining()) {
            return Err(WireError::LengthOutOfBounds);
        }
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(self.read_u32_le()?);
        }
        Ok(out)
    }

    /// Read an optional `u32`: a presence byte followed by the value.
    pub fn read_optional_u32(&mut self) -> Result<Option<u32>, WireError> {
        if self.read_bool()? {
            Ok(Some(self.read_u32_le()?))
        } else {
            Ok(None)
        }
    }
}

/// Write-side helpers matching [`PayloadReader`].
pub mod write {
    use alloc::vec::Vec;

    use crate::varint::write_varint;

    pub fn put_u32_le(buf: &mut Vec<u8>, value: u32) {
        buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_bool(buf: &mut Vec<u8>, value: bool) {
        buf.push(u8::from(value));
    }

    pub fn put_blob(buf: &mut Vec<u8>, blob: &[u8]) {
        write_varint(buf, blob.len() as u64);
        buf.extend_from_slice(blob);
    }

    pub fn put_u32_list(buf: &mut Vec<u8>, values: &[u32]) {
        write_varint(buf, values.len() as u64);
        for &v in values {
            put_u32_le(buf, v);
        }
    }

    pub fn put_optional_u32(buf: &mut Vec<u8>, value: Option<u32>) {
        match value {
            Some(v) => {
                put_bool(buf, true);
                put_u32_le(buf, v);
            }
            None => put_bool(buf, false),
        }
    }
}
