//! Service result codes returned in every response.

/// Outcome of an NVRAM operation (u8 on the wire).
///
/// These seven codes are the exhaustive taxonomy of the service: storage,
/// allocation, and codec failures all surface as [`InternalError`]
/// (`NvramResult::InternalError`); everything else maps to exactly one of
/// the remaining codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum NvramResult {
    /// Operation succeeded.
    Success = 0,
    /// Storage failed, allocation failed, or initialization is unrecoverable.
    InternalError = 1,
    /// Authorization value mismatch.
    AccessDenied = 2,
    /// Argument out of bounds, unknown control, or size mismatch.
    InvalidParameter = 3,
    /// No allocated space with the requested index.
    SpaceDoesNotExist = 4,
    /// A space with the requested index is already allocated.
    SpaceAlreadyExists = 5,
    /// The space is locked, or creation is globally disabled.
    OperationDisabled = 6,
}

impl NvramResult {
    /// Return true if this code indicates success.
    #[inline]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl TryFrom<u8> for NvramResult {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::InternalError),
            2 => Ok(Self::AccessDenied),
            3 => Ok(Self::InvalidParameter),
            4 => Ok(Self::SpaceDoesNotExist),
            5 => Ok(Self::SpaceAlreadyExists),
            6 => Ok(Self::OperationDisabled),
            other => Err(other),
        }
    }
}
