//! NVS core: the access-controlled NVRAM manager.
//!
//! This crate provides [`NvramManager`], the backend of the NVRAM HAL. It
//! tracks allocated spaces and their per-boot state, enforces the
//! access-control policy attached to each space, and keeps persistent
//! storage crash-consistent through a two-phase create/delete protocol.
//!
//! # Architecture
//!
//! - **Serialized dispatch**: one request at a time, by `&mut` access; no
//!   operation suspends mid-way.
//! - **Header-first writes**: the set of indices in the header is always a
//!   superset of the space records in storage, except for the single index
//!   marked provisional while a create or delete is in flight.
//! - **Lazy initialization**: state is reconstructed from the header on the
//!   first request, running crash recovery if a provisional index is found.

pub mod manager;
pub mod memory;
pub mod persistence;
pub mod storage;

pub use manager::NvramManager;
pub use memory::MemoryStorage;
pub use storage::{Storage, StorageError};
