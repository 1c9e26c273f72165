//! Shared test support for the NVS end-to-end suites.
//!
//! Typed wrappers around [`NvramManager::dispatch`] so the suites read as
//! operation sequences, plus raw-record builders for staging
//! interrupted-operation states directly in the storage backend.

use nvs_core::{MemoryStorage, NvramManager, Storage};
use nvs_types::{
    CreateSpaceRequest, DeleteSpaceRequest, GetInfoResponse, GetSpaceInfoRequest,
    GetSpaceInfoResponse, LockSpaceReadRequest, LockSpaceWriteRequest, NvramHeader, NvramResult,
    NvramSpace, ReadSpaceRequest, Request, ResponsePayload, WriteSpaceRequest,
};
use nvs_wire::{encode_header, encode_space};

/// Dispatch a create request, returning its result code.
pub fn create(
    nvram: &mut NvramManager<MemoryStorage>,
    index: u32,
    size: u64,
    controls: &[u32],
    auth: &[u8],
) -> NvramResult {
    nvram
        .dispatch(&Request::CreateSpace(CreateSpaceRequest {
            index,
            size,
            controls: controls.to_vec(),
            authorization_value: auth.to_vec(),
        }))
        .result
}

/// Dispatch a get-info request, returning the payload on success.
pub fn get_info(nvram: &mut NvramManager<MemoryStorage>) -> Result<GetInfoResponse, NvramResult> {
    let response = nvram.dispatch(&Request::GetInfo);
    match response.payload {
        ResponsePayload::GetInfo(resp) if response.result.is_success() => Ok(resp),
        _ => Err(response.result),
    }
}

/// Dispatch a get-space-info request, returning the payload on success.
pub fn get_space_info(
    nvram: &mut NvramManager<MemoryStorage>,
    index: u32,
) -> Result<GetSpaceInfoResponse, NvramResult> {
    let response = nvram.dispatch(&Request::GetSpaceInfo(GetSpaceInfoRequest { index }));
    match response.payload {
        ResponsePayload::GetSpaceInfo(resp) if response.result.is_success() => Ok(resp),
        _ => Err(response.result),
    }
}

/// Dispatch a write request, returning its result code.
pub fn write(
    nvram: &mut NvramManager<MemoryStorage>,
    index: u32,
    buffer: &[u8],
    auth: &[u8],
) -> NvramResult {
    nvram
        .dispatch(&Request::WriteSpace(WriteSpaceRequest {
            index,
            buffer: buffer.to_vec(),
            authorization_value: auth.to_vec(),
        }))
        .result
}

/// Dispatch a read request, returning the contents on success.
pub fn read(
    nvram: &mut NvramManager<MemoryStorage>,
    index: u32,
    auth: &[u8],
) -> Result<Vec<u8>, NvramResult> {
    let response = nvram.dispatch(&Request::ReadSpace(ReadSpaceRequest {
        index,
        authorization_value: auth.to_vec(),
    }));
    match response.payload {
        ResponsePayload::ReadSpace(resp) if response.result.is_success() => Ok(resp.buffer),
        _ => Err(response.result),
    }
}

/// Dispatch a write-lock request, returning its result code.
pub fn lock_write(nvram: &mut NvramManager<MemoryStorage>, index: u32, auth: &[u8]) -> NvramResult {
    nvram
        .dispatch(&Request::LockSpaceWrite(LockSpaceWriteRequest {
            index,
            authorization_value: auth.to_vec(),
        }))
        .result
}

/// Dispatch a read-lock request, returning its result code.
pub fn lock_read(nvram: &mut NvramManager<MemoryStorage>, index: u32, auth: &[u8]) -> NvramResult {
    nvram
        .dispatch(&Request::LockSpaceRead(LockSpaceReadRequest {
            index,
            authorization_value: auth.to_vec(),
        }))
        .result
}

/// Dispatch a delete request, returning its result code.
pub fn delete(nvram: &mut NvramManager<MemoryStorage>, index: u32, auth: &[u8]) -> NvramResult {
    nvram
        .dispatch(&Request::DeleteSpace(DeleteSpaceRequest {
            index,
            authorization_value: auth.to_vec(),
        }))
        .result
}

/// Dispatch a disable-create request, returning its result code.
pub fn disable_create(nvram: &mut NvramManager<MemoryStorage>) -> NvramResult {
    nvram.dispatch(&Request::DisableCreate).result
}

/// Simulate a reboot: tear the manager down and rebuild it over the same
/// storage, clearing all per-boot state.
pub fn reboot(nvram: NvramManager<MemoryStorage>) -> NvramManager<MemoryStorage> {
    NvramManager::new(nvram.into_storage())
}

/// Store an encoded space record with zeroed contents of the given size,
/// bypassing the manager.
pub fn store_space_record(storage: &MemoryStorage, index: u32, content_size: usize) {
    let space = NvramSpace {
        contents: vec![0u8; content_size],
        ..Default::default()
    };
    storage
        .clone()
        .store_space(index, &encode_space(&space))
        .unwrap();
}

/// Store an encoded header record, bypassing the manager.
pub fn store_header_record(storage: &MemoryStorage, header: &NvramHeader) {
    storage.clone().store_header(&encode_header(header)).unwrap();
}
