//! In-memory storage backend with fault injection.
//!
//! Backs the testing device adapter and the test suites. This *does not*
//! meet the persistence or tamper-evidence requirements of a real HAL; it
//! exists so the manager can be exercised without hardware.
//!
//! The slot table lives behind a shared handle: clones observe the same
//! slots, so a test can hand one handle to the manager and keep another to
//! inject faults or inspect blobs mid-run. Fault injection is per-slot: a
//! slot marked failing rejects all operations until the flag is cleared,
//! which is how the crash-recovery tests cut storage off between the two
//! phases of a create or delete.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::storage::{Storage, StorageError};

#[derive(Clone, Debug, Default)]
struct Slot {
    data: Option<Vec<u8>>,
    failing: bool,
}

impl Slot {
    fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        if self.failing {
            return Err(StorageError::Device);
        }
        Ok(self.data.clone())
    }

    fn store(&mut self, blob: &[u8]) -> Result<(), StorageError> {
        if self.failing {
            return Err(StorageError::Device);
        }
        self.data = Some(blob.to_vec());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct SlotTable {
    header: Slot,
    spaces: BTreeMap<u32, Slot>,
}

/// Shared-handle slot table.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<SlotTable>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SlotTable> {
        // Poisoning only happens when a test thread panicked mid-operation;
        // slot replacement is atomic, so the table is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make header loads and stores fail until cleared.
    pub fn set_header_error(&self, failing: bool) {
        self.lock().header.failing = failing;
    }

    /// Make all operations on one space slot fail until cleared. The flag
    /// survives even if the slot holds no data yet, so a create can be
    /// failed before its first write.
    pub fn set_space_error(&self, index: u32, failing: bool) {
        self.lock().spaces.entry(index).or_default().failing = failing;
    }

    /// Drop all slots and injected faults.
    pub fn clear(&self) {
        let mut table = self.lock();
        table.header = Slot::default();
        table.spaces.clear();
    }
}

impl Storage for MemoryStorage {
    fn load_header(&mut self) -> Result<Option<Vec<u8>>, StorageError> {
        self.lock().header.load()
    }

    fn store_header(&mut self, blob: &[u8]) -> Result<(), StorageError> {
        self.lock().header.store(blob)
    }

    fn load_space(&mut self, index: u32) -> Result<Option<Vec<u8>>, StorageError> {
        match self.lock().spaces.get(&index) {
            Some(slot) => slot.load(),
            None => Ok(None),
        }
    }

    fn store_space(&mut self, index: u32, blob: &[u8]) -> Result<(), StorageError> {
        self.lock().spaces.entry(index).or_default().store(blob)
    }

    fn delete_space(&mut self, index: u32) -> Result<bool, StorageError> {
        match self.lock().spaces.get_mut(&index) {
            Some(slot) if slot.failing => Err(StorageError::Device),
            Some(slot) => Ok(slot.data.take().is_some()),
            None => Ok(false),
        }
    }
}
