//! Abstract slot storage consumed by the manager.
//!
//! Storage is a set of named byte slots: a single header slot plus one slot
//! per space index. Each load/store/delete is atomic against power loss; a
//! torn write reads back as either the old value or a decode failure. There
//! is no cross-slot atomicity; the manager's two-phase protocol
//! compensates.

/// Failure reported by a storage backend or the persistence layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// The backing device failed the operation.
    Device,
    /// The stored blob did not decode as the expected record type.
    Corrupt,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Device => write!(f, "storage device error"),
            Self::Corrupt => write!(f, "stored object corrupt or of wrong type"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Byte-blob slot store.
///
/// `Ok(None)` / `Ok(false)` mean the slot was absent; stores are idempotent
/// full-blob replacements. Backends are injected into the manager, so test
/// builds run against [`crate::MemoryStorage`] while production wires in a
/// tamper-evident device.
pub trait Storage {
    /// Load the header slot. `None` means no header has ever been written.
    fn load_header(&mut self) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the header slot.
    fn store_header(&mut self, blob: &[u8]) -> Result<(), StorageError>;

    /// Load the slot for a space index.
    fn load_space(&mut self, index: u32) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the slot for a space index, creating it if absent.
    fn store_space(&mut self, index: u32, blob: &[u8]) -> Result<(), StorageError>;

    /// Remove the slot for a space index. Returns whether a slot existed.
    fn delete_space(&mut self, index: u32) -> Result<bool, StorageError>;
}
