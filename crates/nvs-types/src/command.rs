//! Command identifiers for the request/response union.

/// Operation selector. The request payload tag equals the command ID, and
/// the response always carries the payload variant with the same tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Command {
    GetInfo = 1,
    CreateSpace = 2,
    GetSpaceInfo = 3,
    DeleteSpace = 4,
    DisableCreate = 5,
    WriteSpace = 6,
    ReadSpace = 7,
    LockSpaceWrite = 8,
    LockSpaceRead = 9,
}

impl TryFrom<u8> for Command {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::GetInfo),
            2 => Ok(Self::CreateSpace),
            3 => Ok(Self::GetSpaceInfo),
            4 => Ok(Self::DeleteSpace),
            5 => Ok(Self::DisableCreate),
            6 => Ok(Self::WriteSpace),
            7 => Ok(Self::ReadSpace),
            8 => Ok(Self::LockSpaceWrite),
            9 => Ok(Self::LockSpaceRead),
            other => Err(other),
        }
    }
}
