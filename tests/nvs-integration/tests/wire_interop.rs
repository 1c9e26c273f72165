//! Wire format interop tests.
//!
//! Round-trips every request and response variant through the codec, plus
//! the persisted record types, and checks the framing rules the rest of
//! the system leans on: trailing-byte tolerance and disjoint record kinds.

use nvs_types::{
    Command, CreateSpaceRequest, DeleteSpaceRequest, GetInfoResponse, GetSpaceInfoRequest,
    GetSpaceInfoResponse, LockSpaceReadRequest, LockSpaceWriteRequest, NvramHeader, NvramResult,
    NvramSpace, ReadSpaceRequest, ReadSpaceResponse, Request, Response, ResponsePayload,
    SpaceControls, WireError, WriteSpaceRequest,
};
use nvs_wire::{
    decode_header, decode_request, decode_response, decode_space, encode_header, encode_request,
    encode_response, encode_space,
};

fn all_requests() -> Vec<Request> {
    vec![
        Request::GetInfo,
        Request::CreateSpace(CreateSpaceRequest {
            index: 1,
            size: 16,
            controls: vec![0, 2, 5],
            authorization_value: b"auth".to_vec(),
        }),
        Request::GetSpaceInfo(GetSpaceInfoRequest { index: 2 }),
        Request::DeleteSpace(DeleteSpaceRequest {
            index: 3,
            authorization_value: vec![],
        }),
        Request::DisableCreate,
        Request::WriteSpace(WriteSpaceRequest {
            index: 4,
            buffer: vec![0xA5; 1024],
            authorization_value: vec![0x11; 32],
        }),
        Request::ReadSpace(ReadSpaceRequest {
            index: 5,
            authorization_value: b"r".to_vec(),
        }),
        Request::LockSpaceWrite(LockSpaceWriteRequest {
            index: 6,
            authorization_value: vec![],
        }),
        Request::LockSpaceRead(LockSpaceReadRequest {
            index: u32::MAX,
            authorization_value: vec![],
        }),
    ]
}

fn all_responses() -> Vec<Response> {
    vec![
        Response {
            result: NvramResult::Success,
            payload: ResponsePayload::GetInfo(GetInfoResponse {
                total_size: 32768,
                available_size: 0,
                max_spaces: 32,
                space_list: (0..32).collect(),
            }),
        },
        Response::empty(Command::CreateSpace, NvramResult::SpaceAlreadyExists),
        Response {
            result: NvramResult::Success,
            payload: ResponsePayload::GetSpaceInfo(GetSpaceInfoResponse {
                size: 1024,
                controls: vec![0, 3],
                read_locked: false,
                write_locked: true,
            }),
        },
        Response::empty(Command::DeleteSpace, NvramResult::AccessDenied),
        Response::empty(Command::DisableCreate, NvramResult::Success),
        Response::empty(Command::WriteSpace, NvramResult::OperationDisabled),
        Response {
            result: NvramResult::Success,
            payload: ResponsePayload::ReadSpace(ReadSpaceResponse {
                buffer: b"space contents".to_vec(),
            }),
        },
        Response::empty(Command::LockSpaceWrite, NvramResult::InvalidParameter),
        Response::empty(Command::LockSpaceRead, NvramResult::SpaceDoesNotExist),
    ]
}

#[test]
fn every_request_round_trips() {
    for request in all_requests() {
        let blob = encode_request(&request);
        assert_eq!(decode_request(&blob).unwrap(), request, "{request:?}");
    }
}

#[test]
fn every_response_round_trips() {
    for response in all_responses() {
        let blob = encode_response(&response);
        assert_eq!(decode_response(&blob).unwrap(), response, "{response:?}");
    }
}

#[test]
fn messages_tolerate_trailing_bytes() {
    for request in all_requests() {
        let mut blob = encode_request(&request);
        blob.extend_from_slice(&[0u8; 10]);
        assert_eq!(decode_request(&blob).unwrap(), request);
    }
    for response in all_responses() {
        let mut blob = encode_response(&response);
        blob.extend_from_slice(&[0xFF; 10]);
        assert_eq!(decode_response(&blob).unwrap(), response);
    }
}

#[test]
fn records_round_trip() {
    let header = NvramHeader {
        flags: NvramHeader::FLAG_DISABLE_CREATE,
        allocated_indices: vec![1, 2, 3],
        provisional_index: Some(3),
        ..Default::default()
    };
    assert_eq!(decode_header(&encode_header(&header)).unwrap(), header);

    let space = NvramSpace {
        flags: NvramSpace::FLAG_WRITE_LOCKED,
        controls: SpaceControls::from_ids(&[0, 4]).unwrap(),
        authorization_value: vec![0x42; 32],
        contents: vec![0x24; 100],
    };
    assert_eq!(decode_space(&encode_space(&space)).unwrap(), space);
}

#[test]
fn message_and_record_framing_stay_disjoint() {
    let request_blob = encode_request(&Request::GetInfo);
    let header_blob = encode_header(&NvramHeader::default());
    let space_blob = encode_space(&NvramSpace::default());

    assert!(matches!(
        decode_header(&request_blob),
        Err(WireError::KindMismatch { .. })
    ));
    assert!(matches!(
        decode_space(&header_blob),
        Err(WireError::KindMismatch { .. })
    ));
    assert!(matches!(
        decode_request(&space_blob),
        Err(WireError::KindMismatch { .. })
    ));
    assert!(matches!(
        decode_response(&request_blob),
        Err(WireError::KindMismatch { .. })
    ));
}

#[test]
fn truncation_never_panics() {
    for request in all_requests() {
        let blob = encode_request(&request);
        for len in 0..blob.len() {
            // Every prefix must fail cleanly.
            assert!(decode_request(&blob[..len]).is_err(), "prefix {len}");
        }
    }
}
