//! Access-control policy bits attached to a space at creation.

use alloc::vec::Vec;

/// Bitfield wrapper around a space's control mask.
///
/// Controls are chosen at creation time and immutable thereafter. On the
/// wire they travel as sequences of control IDs (bit positions); internally
/// and in storage they are a single `u32` mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct SpaceControls(u32);

impl SpaceControls {
    /// Once write-locked, the space stays locked across reboots.
    pub const PERSISTENT_WRITE_LOCK: u32 = 1 << 0;
    /// Write-locked until the next reboot; resets on boot.
    pub const BOOT_WRITE_LOCK: u32 = 1 << 1;
    /// Read-locked until the next reboot.
    pub const BOOT_READ_LOCK: u32 = 1 << 2;
    /// Writes require a matching authorization value.
    pub const WRITE_AUTHORIZATION: u32 = 1 << 3;
    /// Reads require a matching authorization value.
    pub const READ_AUTHORIZATION: u32 = 1 << 4;
    /// Writes extend a running digest instead of overwriting.
    pub const WRITE_EXTEND: u32 = 1 << 5;

    /// Mask of all control bits this build supports.
    pub const SUPPORTED_MASK: u32 = 0x3F;

    /// Create an empty control set.
    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Create controls from a raw mask, keeping all bits as stored.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Fold a sequence of control IDs (bit positions) into a mask.
    ///
    /// Returns `None` if any ID does not fit a `u32` mask; IDs inside the
    /// mask range but outside [`Self::SUPPORTED_MASK`] are kept so the
    /// caller can reject them explicitly.
    pub fn from_ids(ids: &[u32]) -> Option<Self> {
        let mut mask = 0u32;
        for &id in ids {
            mask |= 1u32.checked_shl(id)?;
        }
        Some(Self(mask))
    }

    /// Return the raw `u32` mask.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Check whether a specific control bit is set.
    #[inline]
    pub const fn contains(self, control: u32) -> bool {
        self.0 & control == control
    }

    /// Set a control bit.
    #[inline]
    pub const fn with(self, control: u32) -> Self {
        Self(self.0 | control)
    }

    /// True if any set bit falls outside the supported mask.
    #[inline]
    pub const fn has_unsupported(self) -> bool {
        self.0 & !Self::SUPPORTED_MASK != 0
    }

    /// True if both mutually exclusive write-lock modes are set.
    #[inline]
    pub const fn has_conflicting_write_locks(self) -> bool {
        self.contains(Self::PERSISTENT_WRITE_LOCK) && self.contains(Self::BOOT_WRITE_LOCK)
    }

    /// True if reads or writes are gated on an authorization value.
    #[inline]
    pub const fn requires_authorization(self) -> bool {
        self.0 & (Self::WRITE_AUTHORIZATION | Self::READ_AUTHORIZATION) != 0
    }

    /// Expand the mask back into the list of set control IDs, ascending.
    pub fn ids(self) -> Vec<u32> {
        (0..u32::BITS)
            .filter(|&bit| self.0 & (1 << bit) != 0)
            .collect()
    }
}
