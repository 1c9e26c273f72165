//! Frame kind discriminators.

/// Top-level type tag carried in every frame header.
///
/// Message kinds and record kinds are disjoint so that a header blob can
/// never decode as a space record and vice versa; the persistence layer
/// relies on this to detect storage-object-type mismatches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MessageKind {
    /// A request message.
    Request = 0x01,
    /// A response message.
    Response = 0x02,
    /// The persistent header record.
    Header = 0x10,
    /// A persistent per-space record.
    Space = 0x11,
}

impl TryFrom<u8> for MessageKind {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::Request),
            0x02 => Ok(Self::Response),
            0x10 => Ok(Self::Header),
            0x11 => Ok(Self::Space),
            other => Err(other),
        }
    }
}
