//! Space lifecycle end-to-end tests.
//!
//! Drives the manager through create / introspect / write / read / lock /
//! delete sequences, including simulated reboots (a fresh manager over the
//! same storage) to check which state is per-boot and which is durable.

use nvs_core::{MemoryStorage, NvramManager};
use nvs_integration::{
    create, delete, disable_create, get_info, get_space_info, lock_read, lock_write, read, reboot,
    write,
};
use nvs_types::{NvramResult, MAX_SPACES, MAX_SPACE_SIZE};

const BOOT_WRITE_LOCK: u32 = 1;
const BOOT_READ_LOCK: u32 = 2;
const PERSISTENT_WRITE_LOCK: u32 = 0;
const WRITE_AUTHORIZATION: u32 = 3;
const READ_AUTHORIZATION: u32 = 4;
const WRITE_EXTEND: u32 = 5;

// --------------------------------------------------------------------------
// Fresh device
// --------------------------------------------------------------------------
#[test]
fn fresh_device_has_no_spaces() {
    let mut nvram = NvramManager::new(MemoryStorage::new());
    assert_eq!(get_space_info(&mut nvram, 1), Err(NvramResult::SpaceDoesNotExist));

    let info = get_info(&mut nvram).unwrap();
    assert_eq!(info.max_spaces, MAX_SPACES as u32);
    assert_eq!(info.total_size, (MAX_SPACES * MAX_SPACE_SIZE) as u64);
    assert_eq!(info.available_size, info.total_size);
    assert!(info.space_list.is_empty());
}

// --------------------------------------------------------------------------
// Create and introspect
// --------------------------------------------------------------------------
#[test]
fn create_then_introspect() {
    let mut nvram = NvramManager::new(MemoryStorage::new());
    let controls = [
        BOOT_WRITE_LOCK,
        BOOT_READ_LOCK,
        WRITE_AUTHORIZATION,
        READ_AUTHORIZATION,
        WRITE_EXTEND,
    ];
    assert_eq!(create(&mut nvram, 1, 16, &controls, b""), NvramResult::Success);

    let info = get_space_info(&mut nvram, 1).unwrap();
    assert_eq!(info.size, 16);
    let mut reported = info.controls.clone();
    reported.sort_unstable();
    let mut expected = controls.to_vec();
    expected.sort_unstable();
    assert_eq!(reported, expected);
    assert!(!info.read_locked);
    assert!(!info.write_locked);
}

#[test]
fn exclusive_write_lock_controls_rejected() {
    let mut nvram = NvramManager::new(MemoryStorage::new());
    assert_eq!(
        create(&mut nvram, 1, 16, &[BOOT_WRITE_LOCK, PERSISTENT_WRITE_LOCK], b""),
        NvramResult::InvalidParameter
    );
}

#[test]
fn get_info_accounts_for_allocations() {
    let mut nvram = NvramManager::new(MemoryStorage::new());
    assert_eq!(create(&mut nvram, 9, 100, &[], b""), NvramResult::Success);
    assert_eq!(create(&mut nvram, 4, 200, &[], b""), NvramResult::Success);

    let info = get_info(&mut nvram).unwrap();
    // Allocation order, not index order.
    assert_eq!(info.space_list, vec![9, 4]);
    assert_eq!(
        info.available_size,
        ((MAX_SPACES - 2) * MAX_SPACE_SIZE) as u64
    );
}

// --------------------------------------------------------------------------
// Authorization
// --------------------------------------------------------------------------
#[test]
fn authorization_gates_reads_and_writes() {
    let mut nvram = NvramManager::new(MemoryStorage::new());
    let auth = b"passw0rd";
    assert_eq!(
        create(
            &mut nvram,
            1,
            16,
            &[WRITE_AUTHORIZATION, READ_AUTHORIZATION],
            auth
        ),
        NvramResult::Success
    );

    assert_eq!(write(&mut nvram, 1, b"data", b"wrong"), NvramResult::AccessDenied);
    assert_eq!(write(&mut nvram, 1, b"data", auth), NvramResult::Success);

    assert_eq!(read(&mut nvram, 1, b"wrong"), Err(NvramResult::AccessDenied));
    let contents = read(&mut nvram, 1, auth).unwrap();
    assert_eq!(&contents[..4], b"data");
    assert_eq!(contents.len(), 16);
}

#[test]
fn auth_value_ignored_without_auth_controls() {
    let mut nvram = NvramManager::new(MemoryStorage::new());
    // The blob is only stored when an authorization control is present.
    assert_eq!(create(&mut nvram, 1, 8, &[], b"ignored"), NvramResult::Success);
    assert_eq!(write(&mut nvram, 1, b"x", b"anything"), NvramResult::Success);
    assert!(read(&mut nvram, 1, b"else").is_ok());
}

#[test]
fn deletion_gated_by_write_authorization() {
    let mut nvram = NvramManager::new(MemoryStorage::new());
    let auth = b"secret";
    assert_eq!(
        create(&mut nvram, 1, 8, &[WRITE_AUTHORIZATION], auth),
        NvramResult::Success
    );
    assert_eq!(delete(&mut nvram, 1, b"wrong"), NvramResult::AccessDenied);
    assert_eq!(delete(&mut nvram, 1, auth), NvramResult::Success);
    assert_eq!(get_space_info(&mut nvram, 1), Err(NvramResult::SpaceDoesNotExist));
}

// --------------------------------------------------------------------------
// Locks
// --------------------------------------------------------------------------
#[test]
fn boot_write_lock_resets_on_reboot() {
    let mut nvram = NvramManager::new(MemoryStorage::new());
    assert_eq!(create(&mut nvram, 1, 8, &[BOOT_WRITE_LOCK], b""), NvramResult::Success);

    assert_eq!(lock_write(&mut nvram, 1, b""), NvramResult::Success);
    assert!(get_space_info(&mut nvram, 1).unwrap().write_locked);
    assert_eq!(write(&mut nvram, 1, b"x", b""), NvramResult::OperationDisabled);

    // Locks are monotonic within a boot; re-locking a locked space fails
    // the write-access check.
    assert_eq!(lock_write(&mut nvram, 1, b""), NvramResult::OperationDisabled);

    let mut nvram = reboot(nvram);
    assert!(!get_space_info(&mut nvram, 1).unwrap().write_locked);
    assert_eq!(write(&mut nvram, 1, b"x", b""), NvramResult::Success);
}

#[test]
fn persistent_write_lock_survives_reboot() {
    let mut nvram = NvramManager::new(MemoryStorage::new());
    assert_eq!(
        create(&mut nvram, 1, 8, &[PERSISTENT_WRITE_LOCK], b""),
        NvramResult::Success
    );
    assert_eq!(lock_write(&mut nvram, 1, b""), NvramResult::Success);
    assert_eq!(write(&mut nvram, 1, b"x", b""), NvramResult::OperationDisabled);

    let mut nvram = reboot(nvram);
    assert!(get_space_info(&mut nvram, 1).unwrap().write_locked);
    assert_eq!(write(&mut nvram, 1, b"x", b""), NvramResult::OperationDisabled);
    // Deletion is write-gated too, so a persistently locked space stays.
    assert_eq!(delete(&mut nvram, 1, b""), NvramResult::OperationDisabled);
}

#[test]
fn boot_read_lock_blocks_reads_until_reboot() {
    let mut nvram = NvramManager::new(MemoryStorage::new());
    assert_eq!(create(&mut nvram, 1, 8, &[BOOT_READ_LOCK], b""), NvramResult::Success);

    assert!(read(&mut nvram, 1, b"").is_ok());
    assert_eq!(lock_read(&mut nvram, 1, b""), NvramResult::Success);
    assert_eq!(read(&mut nvram, 1, b""), Err(NvramResult::OperationDisabled));
    assert!(get_space_info(&mut nvram, 1).unwrap().read_locked);

    // The read lock does not affect writes.
    assert_eq!(write(&mut nvram, 1, b"x", b""), NvramResult::Success);

    let mut nvram = reboot(nvram);
    assert!(read(&mut nvram, 1, b"").is_ok());
}

// --------------------------------------------------------------------------
// Write-extend
// --------------------------------------------------------------------------
#[test]
fn write_extend_chains_digests_across_reboot() {
    use sha2::{Digest, Sha256};

    let mut nvram = NvramManager::new(MemoryStorage::new());
    assert_eq!(create(&mut nvram, 1, 32, &[WRITE_EXTEND], b""), NvramResult::Success);
    assert_eq!(write(&mut nvram, 1, b"boot evidence", b""), NvramResult::Success);

    let mut hasher = Sha256::new();
    hasher.update([0u8; 32]);
    hasher.update(b"boot evidence");
    let first = hasher.finalize().to_vec();
    assert_eq!(read(&mut nvram, 1, b"").unwrap(), first);

    // The digest chain continues from the stored value after a reboot.
    let mut nvram = reboot(nvram);
    assert_eq!(write(&mut nvram, 1, b"more evidence", b""), NvramResult::Success);

    let mut hasher = Sha256::new();
    hasher.update(&first);
    hasher.update(b"more evidence");
    assert_eq!(read(&mut nvram, 1, b"").unwrap(), hasher.finalize().to_vec());
}

// --------------------------------------------------------------------------
// Delete and re-create
// --------------------------------------------------------------------------
#[test]
fn delete_then_recreate_zeroes_contents() {
    let mut nvram = NvramManager::new(MemoryStorage::new());
    assert_eq!(create(&mut nvram, 1, 8, &[], b""), NvramResult::Success);
    assert_eq!(write(&mut nvram, 1, b"payload!", b""), NvramResult::Success);
    assert_eq!(delete(&mut nvram, 1, b""), NvramResult::Success);

    assert_eq!(create(&mut nvram, 1, 4, &[], b""), NvramResult::Success);
    assert_eq!(read(&mut nvram, 1, b"").unwrap(), vec![0u8; 4]);
}

#[test]
fn delete_missing_space_fails() {
    let mut nvram = NvramManager::new(MemoryStorage::new());
    assert_eq!(delete(&mut nvram, 1, b""), NvramResult::SpaceDoesNotExist);
}

// --------------------------------------------------------------------------
// Disable create
// --------------------------------------------------------------------------
#[test]
fn disable_create_is_durable() {
    let mut nvram = NvramManager::new(MemoryStorage::new());
    assert_eq!(disable_create(&mut nvram), NvramResult::Success);
    assert_eq!(create(&mut nvram, 1, 8, &[], b""), NvramResult::OperationDisabled);

    let mut nvram = reboot(nvram);
    assert_eq!(create(&mut nvram, 1, 8, &[], b""), NvramResult::OperationDisabled);
}

// --------------------------------------------------------------------------
// Reboot reconstruction
// --------------------------------------------------------------------------
#[test]
fn clean_shutdown_reconstructs_observable_state() {
    let mut nvram = NvramManager::new(MemoryStorage::new());
    let auth = b"k";
    assert_eq!(create(&mut nvram, 1, 16, &[], b""), NvramResult::Success);
    assert_eq!(
        create(&mut nvram, 2, 32, &[PERSISTENT_WRITE_LOCK, READ_AUTHORIZATION], auth),
        NvramResult::Success
    );
    assert_eq!(create(&mut nvram, 3, 8, &[], b""), NvramResult::Success);
    assert_eq!(write(&mut nvram, 1, b"one", b""), NvramResult::Success);
    assert_eq!(lock_write(&mut nvram, 2, auth), NvramResult::Success);
    assert_eq!(delete(&mut nvram, 3, b""), NvramResult::Success);

    let info_before = get_info(&mut nvram).unwrap();
    let space1_before = get_space_info(&mut nvram, 1).unwrap();
    let space2_before = get_space_info(&mut nvram, 2).unwrap();
    let contents_before = read(&mut nvram, 1, b"").unwrap();

    let mut nvram = reboot(nvram);

    assert_eq!(get_info(&mut nvram).unwrap(), info_before);
    assert_eq!(get_space_info(&mut nvram, 1).unwrap(), space1_before);
    assert_eq!(get_space_info(&mut nvram, 2).unwrap(), space2_before);
    assert_eq!(read(&mut nvram, 1, b"").unwrap(), contents_before);
}
