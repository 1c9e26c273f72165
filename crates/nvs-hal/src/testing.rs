//! In-memory implementation with a codec round trip on every request.
//!
//! This wires the manager to the in-memory storage backend. It *does not*
//! meet the persistence and tamper-evidence requirements of a production
//! device, but is useful for demonstration and for running tests against
//! the manager.

use tracing::debug;

use nvs_core::{MemoryStorage, NvramManager};
use nvs_types::{Command, NvramResult, Request, Response};
use nvs_wire::{decode_request, decode_response, encode_request, encode_response};

use crate::device::NvramImplementation;

/// Manager plus in-memory storage behind an encode/decode boundary.
pub struct TestingNvramImplementation {
    manager: NvramManager<MemoryStorage>,
}

impl TestingNvramImplementation {
    pub fn new() -> Self {
        Self::with_storage(MemoryStorage::new())
    }

    /// Build over pre-populated storage, e.g. to simulate a reboot.
    pub fn with_storage(storage: MemoryStorage) -> Self {
        Self {
            manager: NvramManager::new(storage),
        }
    }

    /// Tear down and hand back the storage backend.
    pub fn into_storage(self) -> MemoryStorage {
        self.manager.into_storage()
    }

    /// Serve an already-encoded request, producing an encoded response.
    fn execute_encoded(&mut self, request_blob: &[u8]) -> Option<Vec<u8>> {
        let request = match decode_request(request_blob) {
            Ok(request) => request,
            Err(err) => {
                debug!("request blob failed to decode: {err}");
                return None;
            }
        };
        let response = self.manager.dispatch(&request);
        Some(encode_response(&response))
    }
}

impl Default for TestingNvramImplementation {
    fn default() -> Self {
        Self::new()
    }
}

impl NvramImplementation for TestingNvramImplementation {
    fn execute(&mut self, request: &Request) -> Response {
        // Run every request through the codec, emulating deployments where
        // requests are re-serialized on their way to another component.
        let request_blob = encode_request(request);
        let Some(response_blob) = self.execute_encoded(&request_blob) else {
            return Response::empty(request.command(), NvramResult::InvalidParameter);
        };
        match decode_response(&response_blob) {
            Ok(response) => response,
            Err(err) => {
                debug!("response blob failed to decode: {err}");
                Response::empty(request.command(), NvramResult::InternalError)
            }
        }
    }
}

/// Decode helper for transports that deliver raw request bytes: a blob that
/// does not parse yields an `INVALID_PARAMETER` response for `fallback`.
pub fn execute_raw(
    implementation: &mut TestingNvramImplementation,
    request_blob: &[u8],
    fallback: Command,
) -> Response {
    match implementation.execute_encoded(request_blob) {
        Some(response_blob) => decode_response(&response_blob)
            .unwrap_or_else(|_| Response::empty(fallback, NvramResult::InternalError)),
        None => Response::empty(fallback, NvramResult::InvalidParameter),
    }
}
