//! Convenient re-exports of commonly used types.
//!
//! ```
//! use picoboot_uf2::prelude::*;
//! ```

#[doc(inline)]
pub use crate::block::{Block, Flags};
#[doc(inline)]
pub use crate::family::Family;
#[doc(inline)]
pub use crate::layout::{FLASH_BASE, FLASH_SIZE, PAYLOAD_BASE, PAYLOAD_REGION_SIZE};
#[doc(inline)]
pub use crate::merge::merge;
#[doc(inline)]
pub use crate::stream::Stream;

pub mod uf2 {
    pub use crate::error::Error;
}
