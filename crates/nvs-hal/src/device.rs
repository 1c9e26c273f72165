//! Typed device front-end over a request/response implementation.

use tracing::debug;

use nvs_types::{
    CreateSpaceRequest, DeleteSpaceRequest, GetInfoResponse, GetSpaceInfoRequest,
    GetSpaceInfoResponse, LockSpaceReadRequest, LockSpaceWriteRequest, NvramResult,
    ReadSpaceRequest, Request, Response, ResponsePayload, WriteSpaceRequest,
};

/// Backend serving encoded-or-direct NVRAM requests.
///
/// Implementations own the manager (and whatever transport sits between the
/// adapter and it) and serve exactly one request per call.
pub trait NvramImplementation {
    /// Serve one request to completion.
    fn execute(&mut self, request: &Request) -> Response;
}

/// Hardware-device shim: one typed method per device entry point, each
/// building the request union and unpacking the matching response variant.
pub struct NvramDevice<I> {
    implementation: I,
}

impl<I: NvramImplementation> NvramDevice<I> {
    pub fn new(implementation: I) -> Self {
        Self { implementation }
    }

    /// Tear down the device and hand back its implementation.
    pub fn into_inner(self) -> I {
        self.implementation
    }

    /// Pass a raw request through to the implementation.
    pub fn execute(&mut self, request: &Request) -> Response {
        self.implementation.execute(request)
    }

    fn run(&mut self, request: &Request) -> Result<ResponsePayload, NvramResult> {
        let response = self.implementation.execute(request);
        if !response.result.is_success() {
            return Err(response.result);
        }
        if response.payload.command() != request.command() {
            debug!(
                "response payload tag {:?} does not answer {:?}",
                response.payload.command(),
                request.command()
            );
            return Err(NvramResult::InternalError);
        }
        Ok(response.payload)
    }

    pub fn get_info(&mut self) -> Result<GetInfoResponse, NvramResult> {
        match self.run(&Request::GetInfo)? {
            ResponsePayload::GetInfo(resp) => Ok(resp),
            _ => Err(NvramResult::InternalError),
        }
    }

    pub fn create_space(
        &mut self,
        index: u32,
        size: u64,
        controls: &[u32],
        authorization_value: &[u8],
    ) -> Result<(), NvramResult> {
        self.run(&Request::CreateSpace(CreateSpaceRequest {
            index,
            size,
            controls: controls.to_vec(),
            authorization_value: authorization_value.to_vec(),
        }))
        .map(|_| ())
    }

    pub fn get_space_info(&mut self, index: u32) -> Result<GetSpaceInfoResponse, NvramResult> {
        match self.run(&Request::GetSpaceInfo(GetSpaceInfoRequest { index }))? {
            ResponsePayload::GetSpaceInfo(resp) => Ok(resp),
            _ => Err(NvramResult::InternalError),
        }
    }

    pub fn delete_space(
        &mut self,
        index: u32,
        authorization_value: &[u8],
    ) -> Result<(), NvramResult> {
        self.run(&Request::DeleteSpace(DeleteSpaceRequest {
            index,
            authorization_value: authorization_value.to_vec(),
        }))
        .map(|_| ())
    }

    pub fn disable_create(&mut self) -> Result<(), NvramResult> {
        self.run(&Request::DisableCreate).map(|_| ())
    }

    pub fn write_space(
        &mut self,
        index: u32,
        buffer: &[u8],
        authorization_value: &[u8],
    ) -> Result<(), NvramResult> {
        self.run(&Request::WriteSpace(WriteSpaceRequest {
            index,
            buffer: buffer.to_vec(),
            authorization_value: authorization_value.to_vec(),
        }))
        .map(|_| ())
    }

    pub fn read_space(
        &mut self,
        index: u32,
        authorization_value: &[u8],
    ) -> Result<Vec<u8>, NvramResult> {
        match self.run(&Request::ReadSpace(ReadSpaceRequest {
            index,
            authorization_value: authorization_value.to_vec(),
        }))? {
            ResponsePayload::ReadSpace(resp) => Ok(resp.buffer),
            _ => Err(NvramResult::InternalError),
        }
    }

    pub fn lock_space_write(
        &mut self,
        index: u32,
        authorization_value: &[u8],
    ) -> Result<(), NvramResult> {
        self.run(&Request::LockSpaceWrite(LockSpaceWriteRequest {
            index,
            authorization_value: authorization_value.to_vec(),
        }))
        .map(|_| ())
    }

    pub fn lock_space_read(
        &mut self,
        index: u32,
        authorization_value: &[u8],
    ) -> Result<(), NvramResult> {
        self.run(&Request::LockSpaceRead(LockSpaceReadRequest {
            index,
            authorization_value: authorization_value.to_vec(),
        }))
        .map(|_| ())
    }
}
