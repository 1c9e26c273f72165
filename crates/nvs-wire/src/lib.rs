//! NVS wire format reader/writer.
//!
//! This crate implements the binary encoding and decoding shared by the
//! message transport and the persistence layer: the tagged frame header,
//! varint encoding, and per-kind payload codecs. Messages and persisted
//! records use the same framing with disjoint kind tags, so a blob of one
//! kind can never decode as another.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod cursor;
pub mod frame;
pub mod message;
pub mod record;
pub mod varint;

pub use frame::{read_frame, read_frame_expecting, write_frame};
pub use message::{decode_request, decode_response, encode_request, encode_response};
pub use record::{decode_header, decode_space, encode_header, encode_space};
