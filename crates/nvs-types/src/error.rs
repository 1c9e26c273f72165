//! Wire-level decode errors.
//!
//! These never cross the service API boundary: the persistence layer maps
//! them to a storage error, and the device adapter maps inbound decode
//! failures to `INVALID_PARAMETER`.

use crate::kind::MessageKind;

/// Failure while decoding a frame or payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireError {
    /// Input ended before the declared structure was complete.
    Truncated,
    /// Frame magic did not match `NVSF`.
    BadMagic { expected: u32, got: u32 },
    /// Frame carries a wire version this build does not understand.
    UnsupportedVersion(u8),
    /// The kind byte does not name a known frame kind.
    UnknownKind(u8),
    /// The frame kind does not match the record type being decoded.
    KindMismatch { expected: MessageKind, got: MessageKind },
    /// The command byte does not name a known command.
    UnknownCommand(u8),
    /// The result byte does not name a known result code.
    UnknownResult(u8),
    /// A varint exceeded its encodable range.
    VarintOverflow,
    /// A declared length exceeds the input or a defensive cap.
    LengthOutOfBounds,
}

impl core::fmt::Display for WireError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Truncated => write!(f, "input truncated"),
            Self::BadMagic { expected, got } => {
                write!(f, "bad magic: expected 0x{expected:08X}, got 0x{got:08X}")
            }
            Self::UnsupportedVersion(v) => write!(f, "unsupported wire version {v}"),
            Self::UnknownKind(k) => write!(f, "unknown frame kind 0x{k:02X}"),
            Self::KindMismatch { expected, got } => {
                write!(f, "frame kind mismatch: expected {expected:?}, got {got:?}")
            }
            Self::UnknownCommand(c) => write!(f, "unknown command {c}"),
            Self::UnknownResult(r) => write!(f, "unknown result code {r}"),
            Self::VarintOverflow => write!(f, "varint overflows u64"),
            Self::LengthOutOfBounds => write!(f, "declared length out of bounds"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for WireError {}
