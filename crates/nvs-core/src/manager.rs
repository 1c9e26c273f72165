//! The NVRAM manager: request dispatch, recovery, and access control.
//!
//! The manager keeps one transient [`SpaceListEntry`] per allocated space in
//! a fixed-capacity array, reconstructed from the persistent header on the
//! first request. Creates and deletes are two-phase: the header is written
//! first with the affected index marked provisional, then the space record
//! follows; [`NvramManager::initialize`] reconciles whichever half landed
//! if the device lost power in between.

use sha2::{Digest, Sha256};
use tracing::{debug, error, warn};

use nvs_types::{
    CreateSpaceRequest, DeleteSpaceRequest, GetInfoResponse, GetSpaceInfoRequest,
    GetSpaceInfoResponse, LockSpaceReadRequest, LockSpaceWriteRequest, NvramHeader, NvramResult,
    NvramSpace, ReadSpaceRequest, ReadSpaceResponse, Request, Response, ResponsePayload,
    SpaceControls, WriteSpaceRequest, EXTEND_DIGEST_SIZE, HEADER_VERSION, MAX_AUTH_SIZE,
    MAX_SPACES, MAX_SPACE_SIZE,
};

use crate::persistence;
use crate::storage::Storage;

/// Operation outcome; the `Err` side never holds `Success`.
type OpResult<T> = Result<T, NvramResult>;

/// Per-boot state of one allocated space. Lock bits start cleared on every
/// boot and are only ever raised by the lock operations.
#[derive(Clone, Copy, Debug, Default)]
struct SpaceListEntry {
    index: u32,
    write_locked: bool,
    read_locked: bool,
}

/// Everything an operation needs to know about one space: where its
/// transient entry lives and a copy of its persistent record. Built per
/// operation, never stored.
struct SpaceRecord {
    array_index: usize,
    persistent: NvramSpace,
}

/// Compare two authorization blobs without data-dependent branching.
///
/// A length mismatch is folded into the accumulator rather than returned
/// early, so the running time depends only on the longer input's length,
/// never on where the blobs first differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let mut diff = a.len() ^ b.len();
    for i in 0..a.len().max(b.len()) {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= usize::from(x ^ y);
    }
    diff == 0
}

/// The access-controlled NVRAM backend.
///
/// Exactly one request is in flight at a time (`dispatch` takes
/// `&mut self`); the enclosing adapter provides any mutual exclusion. The
/// storage backend is injected, so tests run against
/// [`crate::MemoryStorage`].
pub struct NvramManager<S> {
    storage: S,
    initialized: bool,
    disable_create: bool,
    num_spaces: usize,
    spaces: [SpaceListEntry; MAX_SPACES],
}

impl<S: Storage> NvramManager<S> {
    /// Create a manager over the given storage backend. State is loaded
    /// lazily on the first request.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            initialized: false,
            disable_create: false,
            num_spaces: 0,
            spaces: [SpaceListEntry::default(); MAX_SPACES],
        }
    }

    /// Tear down the manager and hand back its storage, e.g. to simulate a
    /// reboot by constructing a fresh manager over the same backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Serve one request. The response carries the payload variant matching
    /// the request tag; on failure the variant is present but empty.
    pub fn dispatch(&mut self, request: &Request) -> Response {
        let command = request.command();
        let outcome = match request {
            Request::GetInfo => self.get_info().map(ResponsePayload::GetInfo),
            Request::CreateSpace(req) => {
                self.create_space(req).map(|()| ResponsePayload::CreateSpace)
            }
            Request::GetSpaceInfo(req) => {
                self.get_space_info(req).map(ResponsePayload::GetSpaceInfo)
            }
            Request::DeleteSpace(req) => {
                self.delete_space(req).map(|()| ResponsePayload::DeleteSpace)
            }
            Request::DisableCreate => self
                .disable_create()
                .map(|()| ResponsePayload::DisableCreate),
            Request::WriteSpace(req) => {
                self.write_space(req).map(|()| ResponsePayload::WriteSpace)
            }
            Request::ReadSpace(req) => self.read_space(req).map(ResponsePayload::ReadSpace),
            Request::LockSpaceWrite(req) => self
                .lock_space_write(req)
                .map(|()| ResponsePayload::LockSpaceWrite),
            Request::LockSpaceRead(req) => self
                .lock_space_read(req)
                .map(|()| ResponsePayload::LockSpaceRead),
        };
        match outcome {
            Ok(payload) => Response {
                result: NvramResult::Success,
                payload,
            },
            Err(result) => Response::empty(command, result),
        }
    }

    fn get_info(&mut self) -> OpResult<GetInfoResponse> {
        debug!("get_info");
        self.initialize()?;

        Ok(GetInfoResponse {
            total_size: (MAX_SPACE_SIZE * MAX_SPACES) as u64,
            available_size: (MAX_SPACE_SIZE * (MAX_SPACES - self.num_spaces)) as u64,
            max_spaces: MAX_SPACES as u32,
            space_list: self.allocated_indices(),
        })
    }

    fn create_space(&mut self, req: &CreateSpaceRequest) -> OpResult<()> {
        debug!("create_space 0x{:x}", req.index);
        self.initialize()?;

        if self.disable_create {
            debug!("creation of further spaces is disabled");
            return Err(NvramResult::OperationDisabled);
        }
        if self.find_space(req.index).is_some() {
            debug!("space 0x{:x} already exists", req.index);
            return Err(NvramResult::SpaceAlreadyExists);
        }
        if self.num_spaces + 1 > MAX_SPACES {
            debug!("too many spaces");
            return Err(NvramResult::InvalidParameter);
        }
        if req.size > MAX_SPACE_SIZE as u64 {
            debug!("create request exceeds max space size");
            return Err(NvramResult::InvalidParameter);
        }
        if req.authorization_value.len() > MAX_AUTH_SIZE {
            debug!("authorization blob too large");
            return Err(NvramResult::InvalidParameter);
        }
        let Some(controls) = SpaceControls::from_ids(&req.controls) else {
            debug!("bad controls");
            return Err(NvramResult::InvalidParameter);
        };
        if controls.has_unsupported() {
            debug!("bad controls");
            return Err(NvramResult::InvalidParameter);
        }
        if controls.has_conflicting_write_locks() {
            debug!("write lock controls are exclusive");
            return Err(NvramResult::InvalidParameter);
        }

        // Tentatively mark the index allocated.
        self.spaces[self.num_spaces] = SpaceListEntry {
            index: req.index,
            write_locked: false,
            read_locked: false,
        };
        self.num_spaces += 1;

        let mut space = NvramSpace {
            flags: 0,
            controls,
            ..Default::default()
        };
        if controls.requires_authorization() {
            space.authorization_value = req.authorization_value.clone();
        }
        space.contents = vec![0u8; req.size as usize];

        // Write the header before the space data, so the set of indices in
        // the header stays a superset of the space records in storage. A
        // crash after the header write leaves the space data missing;
        // initialization resolves that through the provisional marker.
        let result = self
            .write_header(Some(req.index))
            .and_then(|()| self.write_space_record(req.index, &space));
        if let Err(result) = result {
            self.num_spaces -= 1;
            return Err(result);
        }
        Ok(())
    }

    fn get_space_info(&mut self, req: &GetSpaceInfoRequest) -> OpResult<GetSpaceInfoResponse> {
        debug!("get_space_info 0x{:x}", req.index);
        self.initialize()?;

        let record = self.load_space_record(req.index)?;
        Ok(GetSpaceInfoResponse {
            size: record.persistent.contents.len() as u64,
            controls: record.persistent.controls.ids(),
            read_locked: self.space_read_locked(&record),
            write_locked: self.space_write_locked(&record),
        })
    }

    fn delete_space(&mut self, req: &DeleteSpaceRequest) -> OpResult<()> {
        debug!("delete_space 0x{:x}", req.index);
        self.initialize()?;

        let record = self.load_space_record(req.index)?;
        self.check_write_access(&record, &req.authorization_value)?;

        // Remove the index from the header first, marking it provisional.
        // If the header can't be written there is no visible change.
        let entry = self.remove_entry(record.array_index);
        if let Err(result) = self.write_header(Some(req.index)) {
            self.insert_entry(record.array_index, entry);
            return Err(result);
        }

        // The index is now unallocated as far as the header is concerned;
        // if deleting the data fails here (or we crash), the next
        // initialization spots the leftover record and retries.
        if let Err(err) = persistence::delete_space(&mut self.storage, req.index) {
            error!("failed to delete space 0x{:x} data: {err}", req.index);
            return Err(NvramResult::InternalError);
        }

        // Clearing the provisional marker is an optimization, not a
        // correctness requirement.
        let _ = self.write_header(None);
        Ok(())
    }

    fn disable_create(&mut self) -> OpResult<()> {
        debug!("disable_create");
        self.initialize()?;

        // Persist the flag so it stays effective after a reboot.
        self.disable_create = true;
        self.write_header(None)
    }

    fn write_space(&mut self, req: &WriteSpaceRequest) -> OpResult<()> {
        debug!("write_space 0x{:x}", req.index);
        self.initialize()?;

        let mut record = self.load_space_record(req.index)?;
        self.check_write_access(&record, &req.authorization_value)?;

        if record.persistent.has_control(SpaceControls::WRITE_EXTEND) {
            // Write-extend folds the input into a running digest, so the
            // space must hold exactly one digest.
            if record.persistent.contents.len() != EXTEND_DIGEST_SIZE {
                debug!("write-extend space 0x{:x} has non-digest size", req.index);
                return Err(NvramResult::InvalidParameter);
            }
            if req.buffer.len() > MAX_SPACE_SIZE {
                debug!("write-extend input too large");
                return Err(NvramResult::InvalidParameter);
            }
            let mut hasher = Sha256::new();
            hasher.update(&record.persistent.contents);
            hasher.update(&req.buffer);
            record.persistent.contents = hasher.finalize().to_vec();
        } else {
            let fixed_len = record.persistent.contents.len();
            if req.buffer.len() > fixed_len {
                debug!("write exceeds fixed space size");
                return Err(NvramResult::InvalidParameter);
            }
            // Shorter input is padded right with zeros; the content length
            // never changes after creation.
            let mut contents = vec![0u8; fixed_len];
            contents[..req.buffer.len()].copy_from_slice(&req.buffer);
            record.persistent.contents = contents;
        }

        // Membership is unchanged, so the header is not rewritten. A torn
        // write yields either old or new contents, never a membership
        // change.
        self.write_space_record(req.index, &record.persistent)
    }

    fn read_space(&mut self, req: &ReadSpaceRequest) -> OpResult<ReadSpaceResponse> {
        debug!("read_space 0x{:x}", req.index);
        self.initialize()?;

        let record = self.load_space_record(req.index)?;
        self.check_read_access(&record, &req.authorization_value)?;
        Ok(ReadSpaceResponse {
            buffer: record.persistent.contents,
        })
    }

    fn lock_space_write(&mut self, req: &LockSpaceWriteRequest) -> OpResult<()> {
        debug!("lock_space_write 0x{:x}", req.index);
        self.initialize()?;

        let mut record = self.load_space_record(req.index)?;
        self.check_write_access(&record, &req.authorization_value)?;

        if record
            .persistent
            .has_control(SpaceControls::PERSISTENT_WRITE_LOCK)
        {
            record.persistent.set_flag(NvramSpace::FLAG_WRITE_LOCKED);
            self.write_space_record(req.index, &record.persistent)
        } else if record.persistent.has_control(SpaceControls::BOOT_WRITE_LOCK) {
            self.spaces[record.array_index].write_locked = true;
            Ok(())
        } else {
            debug!("space 0x{:x} does not support write locking", req.index);
            Err(NvramResult::InvalidParameter)
        }
    }

    fn lock_space_read(&mut self, req: &LockSpaceReadRequest) -> OpResult<()> {
        debug!("lock_space_read 0x{:x}", req.index);
        self.initialize()?;

        let record = self.load_space_record(req.index)?;
        self.check_read_access(&record, &req.authorization_value)?;

        if record.persistent.has_control(SpaceControls::BOOT_READ_LOCK) {
            self.spaces[record.array_index].read_locked = true;
            Ok(())
        } else {
            debug!("space 0x{:x} does not support read locking", req.index);
            Err(NvramResult::InvalidParameter)
        }
    }

    /// Reconstruct in-memory state from the header if that hasn't happened
    /// yet. May be called again after a failure, e.g. once the storage
    /// backend recovers.
    fn initialize(&mut self) -> OpResult<()> {
        if self.initialized {
            return Ok(());
        }

        let header = match persistence::load_header(&mut self.storage) {
            Err(err) => {
                error!("init failed to load header: {err}");
                return Err(NvramResult::InternalError);
            }
            Ok(None) => {
                // Fresh device; the first write flushes a new header.
                self.initialized = true;
                return Ok(());
            }
            Ok(Some(header)) => header,
        };

        if header.version > HEADER_VERSION {
            error!(
                "storage format {} is more recent than {}, aborting",
                header.version, HEADER_VERSION
            );
            return Err(NvramResult::InternalError);
        }

        // Check the state of the provisional space if applicable.
        let provisional_index = header.provisional_index;
        let mut provisional_in_storage = false;
        if let Some(index) = provisional_index {
            match persistence::load_space(&mut self.storage, index) {
                Err(err) => {
                    // Leave the space marked allocated so initialization can
                    // complete and the other spaces stay reachable.
                    // Operations on this space will fail. Keeping the index
                    // allocated also stops it from being clobbered after a
                    // transient storage error makes it look absent.
                    warn!("failed to load provisional space 0x{index:x}: {err}");
                    provisional_in_storage = true;
                }
                Ok(None) => {}
                Ok(Some(_)) => provisional_in_storage = true,
            }
        }

        // More spaces than this build supports: refuse initialization.
        // Continuing with a subset could mislead consumers about system
        // state, and worse, a consumer could delete a space to make room
        // and then create an index that looks free but still has record
        // data, clobbering it and bypassing its access controls.
        if header.allocated_indices.len() > MAX_SPACES {
            error!("excess spaces {} in header", header.allocated_indices.len());
            return Err(NvramResult::InternalError);
        }

        // Rebuild the transient bookkeeping.
        let mut delete_provisional = provisional_in_storage;
        for &index in &header.allocated_indices {
            if provisional_index == Some(index) {
                if !provisional_in_storage {
                    // Half-created: the header line was written but the
                    // space data never landed. Pretend it never existed.
                    continue;
                }
                // Created and present in storage; retain it.
                delete_provisional = false;
            }
            self.spaces[self.num_spaces] = SpaceListEntry {
                index,
                write_locked: false,
                read_locked: false,
            };
            self.num_spaces += 1;
        }

        // Space data present in storage without a matching allocation in
        // the header: a half-deleted space. Finish the job.
        if let Some(index) = provisional_index {
            if delete_provisional {
                match persistence::delete_space(&mut self.storage, index) {
                    Err(err) => {
                        error!("failed to delete provisional space 0x{index:x} data: {err}");
                        return Err(NvramResult::InternalError);
                    }
                    Ok(false) => {
                        error!("provisional space 0x{index:x} absent on deletion");
                        return Err(NvramResult::InternalError);
                    }
                    Ok(true) => {}
                }
            }
        }

        self.disable_create = header.has_flag(NvramHeader::FLAG_DISABLE_CREATE);
        self.initialized = true;

        // Rewrite the header to clear the provisional marker. The state is
        // consistent either way; this just avoids re-probing the
        // provisional space on every future boot.
        if provisional_index.is_some() {
            let _ = self.write_header(None);
        }

        Ok(())
    }

    /// Position of `index` in the bookkeeping array, if allocated.
    fn find_space(&self, index: u32) -> Option<usize> {
        self.spaces[..self.num_spaces]
            .iter()
            .position(|entry| entry.index == index)
    }

    /// Resolve a space index to its transient slot and persistent record.
    fn load_space_record(&mut self, index: u32) -> OpResult<SpaceRecord> {
        let Some(array_index) = self.find_space(index) else {
            return Err(NvramResult::SpaceDoesNotExist);
        };

        match persistence::load_space(&mut self.storage, index) {
            Err(err) => {
                error!("failed to load space 0x{index:x} data: {err}");
                Err(NvramResult::InternalError)
            }
            Ok(None) => {
                // The header says allocated, so the data has to be there.
                error!("space 0x{index:x} present in header, but data missing");
                Err(NvramResult::InternalError)
            }
            Ok(Some(persistent)) => Ok(SpaceRecord {
                array_index,
                persistent,
            }),
        }
    }

    /// Effective write-lock state per the space's lock mode.
    fn space_write_locked(&self, record: &SpaceRecord) -> bool {
        if record
            .persistent
            .has_control(SpaceControls::PERSISTENT_WRITE_LOCK)
        {
            record.persistent.has_flag(NvramSpace::FLAG_WRITE_LOCKED)
        } else if record.persistent.has_control(SpaceControls::BOOT_WRITE_LOCK) {
            self.spaces[record.array_index].write_locked
        } else {
            false
        }
    }

    /// Effective read-lock state; only the boot-scoped lock exists.
    fn space_read_locked(&self, record: &SpaceRecord) -> bool {
        record.persistent.has_control(SpaceControls::BOOT_READ_LOCK)
            && self.spaces[record.array_index].read_locked
    }

    fn check_write_access(&self, record: &SpaceRecord, auth: &[u8]) -> OpResult<()> {
        if self.space_write_locked(record) {
            return Err(NvramResult::OperationDisabled);
        }
        if record
            .persistent
            .has_control(SpaceControls::WRITE_AUTHORIZATION)
            && !constant_time_eq(auth, &record.persistent.authorization_value)
        {
            return Err(NvramResult::AccessDenied);
        }
        Ok(())
    }

    fn check_read_access(&self, record: &SpaceRecord, auth: &[u8]) -> OpResult<()> {
        if self.space_read_locked(record) {
            return Err(NvramResult::OperationDisabled);
        }
        if record
            .persistent
            .has_control(SpaceControls::READ_AUTHORIZATION)
            && !constant_time_eq(auth, &record.persistent.authorization_value)
        {
            return Err(NvramResult::AccessDenied);
        }
        Ok(())
    }

    fn allocated_indices(&self) -> Vec<u32> {
        self.spaces[..self.num_spaces]
            .iter()
            .map(|entry| entry.index)
            .collect()
    }

    /// Remove the entry at `array_index`, shifting later entries down to
    /// preserve allocation order. Returns the removed entry.
    fn remove_entry(&mut self, array_index: usize) -> SpaceListEntry {
        let entry = self.spaces[array_index];
        for i in array_index..self.num_spaces - 1 {
            self.spaces[i] = self.spaces[i + 1];
        }
        self.num_spaces -= 1;
        entry
    }

    /// Undo [`Self::remove_entry`], reinserting at the original position.
    fn insert_entry(&mut self, array_index: usize, entry: SpaceListEntry) {
        for i in (array_index..self.num_spaces).rev() {
            self.spaces[i + 1] = self.spaces[i];
        }
        self.spaces[array_index] = entry;
        self.num_spaces += 1;
    }

    /// Persist the current membership, flags, and provisional marker.
    fn write_header(&mut self, provisional_index: Option<u32>) -> OpResult<()> {
        let mut header = NvramHeader {
            version: HEADER_VERSION,
            flags: 0,
            allocated_indices: self.allocated_indices(),
            provisional_index,
        };
        if self.disable_create {
            header.set_flag(NvramHeader::FLAG_DISABLE_CREATE);
        }

        persistence::store_header(&mut self.storage, &header).map_err(|err| {
            error!("failed to store header: {err}");
            NvramResult::InternalError
        })
    }

    /// Persist one space record.
    fn write_space_record(&mut self, index: u32, space: &NvramSpace) -> OpResult<()> {
        persistence::store_space(&mut self.storage, index, space).map_err(|err| {
            error!("failed to store space 0x{index:x}: {err}");
            NvramResult::InternalError
        })
    }
}
