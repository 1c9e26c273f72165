//! The persistent per-space record.

use alloc::vec::Vec;

use crate::controls::SpaceControls;

/// Durable state of a single NVRAM space.
///
/// The content length is fixed at creation and never changes; writes
/// replace the bytes in place (or fold them into a digest for write-extend
/// spaces). The authorization value is stored only when one of the
/// authorization controls is set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NvramSpace {
    /// Mutable flag bits, see the `FLAG_*` constants.
    pub flags: u32,
    /// Policy controls fixed at creation.
    pub controls: SpaceControls,
    /// Authorization blob gating reads and/or writes; at most 32 bytes.
    pub authorization_value: Vec<u8>,
    /// Space contents; length fixed at creation, at most 1024 bytes.
    pub contents: Vec<u8>,
}

impl NvramSpace {
    /// The persistent write lock has been engaged. Only meaningful for
    /// spaces carrying the persistent write-lock control; cleared only by
    /// deleting the space.
    pub const FLAG_WRITE_LOCKED: u32 = 1 << 0;

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

    /// Check whether a control bit is set.
    #[inline]
    pub const fn has_control(&self, control: u32) -> bool {
        self.controls.contains(control)
    }
}
