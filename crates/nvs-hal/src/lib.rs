//! Device adapter for the NVS NVRAM manager.
//!
//! Translates external hardware-device calls into [`nvs_types::Request`]
//! values and back. The adapter itself is a thin shim: policy and
//! persistence all live in `nvs-core`.

pub mod device;
pub mod testing;

pub use device::{NvramDevice, NvramImplementation};
pub use testing::TestingNvramImplementation;
