//! Convenient re-exports of commonly used data types, designed to make crate usage painless.
//!
//! The contents of this module can be used by including the following in any module:
//! ```
//! use picoboot_core::prelude::*;
//! ```

#[doc(inline)]
pub use crate::data::{DataCursor, DataCursorTrait, Endian, EndianRead, EndianWrite, SeekFrom};

/// Contains [`data::Error`], which is used in Results returned by [`DataCursor`]
pub mod data {
    pub use crate::data::Error;
}

pub mod util {
    pub use crate::util::format_size;
}

#[cfg(feature = "time")]
pub mod time {
    pub use crate::time::*;
}
