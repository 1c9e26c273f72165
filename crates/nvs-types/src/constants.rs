//! Magic numbers, format versions, and size limits for the NVS service.

/// Frame magic: "NVSF" in ASCII (big-endian u32, written little-endian).
pub const FRAME_MAGIC: u32 = 0x4E56_5346;

/// Current wire format version.
pub const WIRE_VERSION: u8 = 1;

/// Size of the fixed frame header in bytes.
pub const FRAME_HEADER_SIZE: usize = 12;

/// Current persistent header record version. A stored header with a larger
/// version refuses to initialize rather than misinterpret a newer layout.
pub const HEADER_VERSION: u32 = 1;

/// Maximum number of concurrently allocated spaces.
///
/// This bounds the manager's in-memory bookkeeping array; a stored header
/// listing more indices than this fails initialization outright instead of
/// truncating, since truncation would risk clobber-on-reallocation.
pub const MAX_SPACES: usize = 32;

/// Maximum size of a single space's contents in bytes.
pub const MAX_SPACE_SIZE: usize = 1024;

/// Maximum authorization blob size in bytes.
pub const MAX_AUTH_SIZE: usize = 32;

/// Defensive cap on the decoded size of a header record blob.
pub const MAX_HEADER_BLOB: usize = 4096;

/// Digest size for write-extend spaces (SHA-256). A space created with the
/// write-extend control must have exactly this content size.
pub const EXTEND_DIGEST_SIZE: usize = 32;
