//! Request/response message codec.
//!
//! A message payload starts with its command byte (and for responses, the
//! result byte), followed by the command-specific fields. The decoder
//! checks that the declared command names a known operation; field decoding
//! stops once the variant is complete, leaving any padding untouched.

use alloc::vec::Vec;

use nvs_types::{
    Command, CreateSpaceRequest, DeleteSpaceRequest, GetInfoResponse, GetSpaceInfoRequest,
    GetSpaceInfoResponse, LockSpaceReadRequest, LockSpaceWriteRequest, MessageKind, NvramResult,
    ReadSpaceRequest, ReadSpaceResponse, Request, Response, ResponsePayload, WireError,
    WriteSpaceRequest,
};

use crate::cursor::write::{put_blob, put_bool, put_u32_le, put_u32_list};
use crate::cursor::PayloadReader;
use crate::frame::{read_frame_expecting, write_frame};
use crate::varint::write_varint;

fn put_id_list(buf: &mut Vec<u8>, ids: &[u32]) {
    write_varint(buf, ids.len() as u64);
    for &id in ids {
        write_varint(buf, u64::from(id));
    }
}

fn read_id_list(r: &mut PayloadReader<'_>) -> Result<Vec<u32>, WireError> {
    let count = usize::try_from(r.read_varint()?).map_err(|_| WireError::LengthOutOfBounds)?;
    // Every encoded ID occupies at least one byte.
    if count > r.remaining() {
        return Err(WireError::LengthOutOfBounds);
    }
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        ids.push(r.read_varint_u32()?);
    }
    Ok(ids)
}

/// Encode a request into a framed blob.
pub fn encode_request(request: &Request) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.push(request.command() as u8);
    match request {
        Request::GetInfo | Request::DisableCreate => {}
        Request::CreateSpace(req) => {
            put_u32_le(&mut payload, req.index);
            write_varint(&mut payload, req.size);
            put_id_list(&mut payload, &req.controls);
            put_blob(&mut payload, &req.authorization_value);
        }
        Request::GetSpaceInfo(req) => {
            put_u32_le(&mut payload, req.index);
        }
        Request::DeleteSpace(req) => {
            put_u32_le(&mut payload, req.index);
            put_blob(&mut payload, &req.authorization_value);
        }
        Request::WriteSpace(req) => {
            put_u32_le(&mut payload, req.index);
            put_blob(&mut payload, &req.buffer);
            put_blob(&mut payload, &req.authorization_value);
        }
        Request::ReadSpace(req) => {
            put_u32_le(&mut payload, req.index);
            put_blob(&mut payload, &req.authorization_value);
        }
        Request::LockSpaceWrite(req) => {
            put_u32_le(&mut payload, req.index);
            put_blob(&mut payload, &req.authorization_value);
        }
        Request::LockSpaceRead(req) => {
            put_u32_le(&mut payload, req.index);
            put_blob(&mut payload, &req.authorization_value);
        }
    }
    write_frame(MessageKind::Request, &payload)
}

/// Decode a framed request blob.
pub fn decode_request(data: &[u8]) -> Result<Request, WireError> {
    let payload = read_frame_expecting(data, MessageKind::Request)?;
    let mut r = PayloadReader::new(payload);
    let command = Command::try_from(r.read_u8()?).map_err(WireError::UnknownCommand)?;

    let request = match command {
        Command::GetInfo => Request::GetInfo,
        Command::CreateSpace => Request::CreateSpace(CreateSpaceRequest {
            index: r.read_u32_le()?,
            size: r.read_varint()?,
            controls: read_id_list(&mut r)?,
            authorization_value: r.read_blob()?,
        }),
        Command::GetSpaceInfo => Request::GetSpaceInfo(GetSpaceInfoRequest {
            index: r.read_u32_le()?,
        }),
        Command::DeleteSpace => Request::DeleteSpace(DeleteSpaceRequest {
            index: r.read_u32_le()?,
            authorization_value: r.read_blob()?,
        }),
        Command::DisableCreate => Request::DisableCreate,
        Command::WriteSpace => Request::WriteSpace(WriteSpaceRequest {
            index: r.read_u32_le()?,
            buffer: r.read_blob()?,
            authorization_value: r.read_blob()?,
        }),
        Command::ReadSpace => Request::ReadSpace(ReadSpaceRequest {
            index: r.read_u32_le()?,
            authorization_value: r.read_blob()?,
        }),
        Command::LockSpaceWrite => Request::LockSpaceWrite(LockSpaceWriteRequest {
            index: r.read_u32_le()?,
            authorization_value: r.read_blob()?,
        }),
        Command::LockSpaceRead => Request::LockSpaceRead(LockSpaceReadRequest {
            index: r.read_u32_le()?,
            authorization_value: r.read_blob()?,
        }),
    };
    Ok(request)
}

/// Encode a response into a framed blob.
pub fn encode_response(response: &Response) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.push(response.result as u8);
    payload.push(response.payload.command() as u8);
    match &response.payload {
        ResponsePayload::GetInfo(resp) => {
            write_varint(&mut payload, resp.total_size);
            write_varint(&mut payload, resp.available_size);
            write_varint(&mut payload, u64::from(resp.max_spaces));
            put_u32_list(&mut payload, &resp.space_list);
        }
        ResponsePayload::GetSpaceInfo(resp) => {
            write_varint(&mut payload, resp.size);
            put_id_list(&mut payload, &resp.controls);
            put_bool(&mut payload, resp.read_locked);
            put_bool(&mut payload, resp.write_locked);
        }
        ResponsePayload::ReadSpace(resp) => {
            put_blob(&mut payload, &resp.buffer);
        }
        ResponsePayload::CreateSpace
        | ResponsePayload::DeleteSpace
        | ResponsePayload::DisableCreate
        | ResponsePayload::WriteSpace
        | ResponsePayload::LockSpaceWrite
        | ResponsePayload::LockSpaceRead => {}
    }
    write_frame(MessageKind::Response, &payload)
}

/// Decode a framed response blob.
pub fn decode_response(data: &[u8]) -> Result<Response, WireError> {
    let payload = read_frame_expecting(data, MessageKind::Response)?;
    let mut r = PayloadReader::new(payload);
    let result = NvramResult::try_from(r.read_u8()?).map_err(WireError::UnknownResult)?;
    let command = Command::try_from(r.read_u8()?).map_err(WireError::UnknownCommand)?;

    let payload = match command {
        Command::GetInfo => ResponsePayload::GetInfo(GetInfoResponse {
            total_size: r.read_varint()?,
            available_size: r.read_varint()?,
            max_spaces: r.read_varint_u32()?,
            space_list: r.read_u32_list()?,
        }),
        Command::CreateSpace => ResponsePayload::CreateSpace,
        Command::GetSpaceInfo => ResponsePayload::GetSpaceInfo(GetSpaceInfoResponse {
            size: r.read_varint()?,
            controls: read_id_list(&mut r)?,
            read_locked: r.read_bool()?,
            write_locked: r.read_bool()?,
        }),
        Command::DeleteSpace => ResponsePayload::DeleteSpace,
        Command::DisableCreate => ResponsePayload::DisableCreate,
        Command::WriteSpace => ResponsePayload::WriteSpace,
        Command::ReadSpace => ResponsePayload::ReadSpace(ReadSpaceResponse {
            buffer: r.read_blob()?,
        }),
        Command::LockSpaceWrite => ResponsePayload::LockSpaceWrite,
        Command::LockSpaceRead => ResponsePayload::LockSpaceRead,
    };
    Ok(Response { result, payload })
}
