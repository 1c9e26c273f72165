//! Request/response message union.
//!
//! The request tag selects the operation; the response always carries a
//! result code plus the payload variant with the same tag. Commands without
//! response data use empty variants so the tag pairing stays total.

use alloc::vec::Vec;

use crate::command::Command;
use crate::result::NvramResult;

/// `GET_INFO` response payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetInfoResponse {
    pub total_size: u64,
    pub available_size: u64,
    pub max_spaces: u32,
    /// Allocated indices in internal bookkeeping order.
    pub space_list: Vec<u32>,
}

/// `CREATE_SPACE` request payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateSpaceRequest {
    pub index: u32,
    pub size: u64,
    /// Control IDs (bit positions); validated by the manager, so unknown
    /// values survive transport.
    pub controls: Vec<u32>,
    pub authorization_value: Vec<u8>,
}

/// `GET_SPACE_INFO` request payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetSpaceInfoRequest {
    pub index: u32,
}

/// `GET_SPACE_INFO` response payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetSpaceInfoResponse {
    pub size: u64,
    pub controls: Vec<u32>,
    pub read_locked: bool,
    pub write_locked: bool,
}

/// `DELETE_SPACE` request payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeleteSpaceRequest {
    pub index: u32,
    pub authorization_value: Vec<u8>,
}

/// `WRITE_SPACE` request payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriteSpaceRequest {
    pub index: u32,
    pub buffer: Vec<u8>,
    pub authorization_value: Vec<u8>,
}

/// `READ_SPACE` request payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadSpaceRequest {
    pub index: u32,
    pub authorization_value: Vec<u8>,
}

/// `READ_SPACE` response payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadSpaceResponse {
    pub buffer: Vec<u8>,
}

/// `LOCK_SPACE_WRITE` request payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LockSpaceWriteRequest {
    pub index: u32,
    pub authorization_value: Vec<u8>,
}

/// `LOCK_SPACE_READ` request payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LockSpaceReadRequest {
    pub index: u32,
    pub authorization_value: Vec<u8>,
}

/// A request to the NVRAM manager. The variant is the command tag.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Request {
    GetInfo,
    CreateSpace(CreateSpaceRequest),
    GetSpaceInfo(GetSpaceInfoRequest),
    DeleteSpace(DeleteSpaceRequest),
    DisableCreate,
    WriteSpace(WriteSpaceRequest),
    ReadSpace(ReadSpaceRequest),
    LockSpaceWrite(LockSpaceWriteRequest),
    LockSpaceRead(LockSpaceReadRequest),
}

impl Request {
    /// The command this request selects.
    pub const fn command(&self) -> Command {
        match self {
            Self::GetInfo => Command::GetInfo,
            Self::CreateSpace(_) => Command::CreateSpace,
            Self::GetSpaceInfo(_) => Command::GetSpaceInfo,
            Self::DeleteSpace(_) => Command::DeleteSpace,
            Self::DisableCreate => Command::DisableCreate,
            Self::WriteSpace(_) => Command::WriteSpace,
            Self::ReadSpace(_) => Command::ReadSpace,
            Self::LockSpaceWrite(_) => Command::LockSpaceWrite,
            Self::LockSpaceRead(_) => Command::LockSpaceRead,
        }
    }
}

/// Command-specific response data, tagged identically to [`Request`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResponsePayload {
    GetInfo(GetInfoResponse),
    CreateSpace,
    GetSpaceInfo(GetSpaceInfoResponse),
    DeleteSpace,
    DisableCreate,
    WriteSpace,
    ReadSpace(ReadSpaceResponse),
    LockSpaceWrite,
    LockSpaceRead,
}

impl ResponsePayload {
    /// The command this payload answers.
    pub const fn command(&self) -> Command {
        match self {
            Self::GetInfo(_) => Command::GetInfo,
            Self::CreateSpace => Command::CreateSpace,
            Self::GetSpaceInfo(_) => Command::GetSpaceInfo,
            Self::DeleteSpace => Command::DeleteSpace,
            Self::DisableCreate => Command::DisableCreate,
            Self::WriteSpace => Command::WriteSpace,
            Self::ReadSpace(_) => Command::ReadSpace,
            Self::LockSpaceWrite => Command::LockSpaceWrite,
            Self::LockSpaceRead => Command::LockSpaceRead,
        }
    }

    /// The default (empty) payload variant for a command, used when an
    /// operation fails before producing data.
    pub fn empty_for(command: Command) -> Self {
        match command {
            Command::GetInfo => Self::GetInfo(GetInfoResponse::default()),
            Command::CreateSpace => Self::CreateSpace,
            Command::GetSpaceInfo => Self::GetSpaceInfo(GetSpaceInfoResponse::default()),
            Command::DeleteSpace => Self::DeleteSpace,
            Command::DisableCreate => Self::DisableCreate,
            Command::WriteSpace => Self::WriteSpace,
            Command::ReadSpace => Self::ReadSpace(ReadSpaceResponse::default()),
            Command::LockSpaceWrite => Self::LockSpaceWrite,
            Command::LockSpaceRead => Self::LockSpaceRead,
        }
    }
}

/// A response from the NVRAM manager.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Response {
    pub result: NvramResult,
    pub payload: ResponsePayload,
}

impl Response {
    /// Build a response with the given result and the empty payload variant
    /// for `command`.
    pub fn empty(command: Command, result: NvramResult) -> Self {
        Self {
            result,
            payload: ResponsePayload::empty_for(command),
        }
    }
}
