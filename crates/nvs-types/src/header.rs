//! The persistent singleton header record.

use alloc::vec::Vec;

use crate::constants::HEADER_VERSION;

/// Global bookkeeping record, stored in the single header slot.
///
/// `allocated_indices` must have a matching space record in storage for
/// every entry, with one exception: the index named by `provisional_index`
/// is allowed to be only partially reflected in storage while a create or
/// delete is crossing the header/space boundary. Initialization normalizes
/// that state after a crash.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NvramHeader {
    /// Format version of this record. A stored value larger than
    /// [`HEADER_VERSION`] is fatal for initialization.
    pub version: u32,
    /// Global flag bits, see the `FLAG_*` constants.
    pub flags: u32,
    /// Indices of all allocated spaces, in allocation order.
    pub allocated_indices: Vec<u32>,
    /// Index currently undergoing a create or delete, if any. Encoded as an
    /// explicit present/absent tag, never a sentinel value.
    pub provisional_index: Option<u32>,
}

impl NvramHeader {
    /// Creation of further spaces has been globally disabled.
    pub const FLAG_DISABLE_CREATE: u32 = 1 << 0;

    /// Check whether a flag bit is set.
    #[inline]
    pub const fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag == flag
    }

    /// Set a flag bit.
    #[inline]
    pub fn set_flag(&mut self, flag: u32) {
        self.flags |= flag;
    }
}

impl Default for NvramHeader {
    fn default() -> Self {
        Self {
            version: HEADER_VERSION,
            flags: 0,
            allocated_indices: Vec::new(),
            provisional_index: None,
        }
    }
}
