//! Core types for the NVS access-controlled NVRAM service.
//!
//! This crate provides the foundational types shared across all NVS crates:
//! result codes, control flags, persistent records, message payloads, and
//! format constants.
//!
//! All types are `no_std` compatible by default.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod command;
pub mod constants;
pub mod controls;
pub mod error;
pub mod header;
pub mod kind;
pub mod message;
pub mod result;
pub mod space;

pub use command::Command;
pub use constants::*;
pub use controls::SpaceControls;
pub use error::WireError;
pub use header::NvramHeader;
pub use kind::MessageKind;
pub use message::{
    CreateSpaceRequest, DeleteSpaceRequest, GetInfoResponse, GetSpaceInfoRequest,
    GetSpaceInfoResponse, LockSpaceReadRequest, LockSpaceWriteRequest, ReadSpaceRequest,
    ReadSpaceResponse, Request, Response, ResponsePayload, WriteSpaceRequest,
};
pub use result::NvramResult;
pub use space::NvramSpace;
