//! Encodes, validates, and merges Universal Flash Format (UF2) block streams.
//!
//! # Format
//! Every field in a UF2 block is 32-bit little-endian:
//!
//! | Offset | Field | Notes |
//! |---|---|---|
//! | 0x00 | `magic0` | `0x0A324655` |
//! | 0x04 | `magic1` | `0x9E5D5157` |
//! | 0x08 | `flags` | Only the family-ID-present bit matters here. |
//! | 0x0C | `target_addr` | Where this block's payload is flashed to. |
//! | 0x10 | `payload_size` | ≤ 256. |
//! | 0x14 | `block_no` | This block's index. |
//! | 0x18 | `total_blocks` | Total blocks in the stream. |
//! | 0x1C | `family` | Microcontroller family tag. |
//! | 0x20 | `data` | 476 bytes; only the first `payload_size` are meaningful. |
//! | 0x1FC | `magic_end` | `0x0AB16F30` |

pub mod block;
pub mod error;
pub mod family;
pub mod layout;
pub mod merge;
pub mod prelude;
pub mod stream;

pub use block::{Block, Flags};
pub use error::Error;
pub use family::Family;
pub use merge::merge;
pub use stream::Stream;
