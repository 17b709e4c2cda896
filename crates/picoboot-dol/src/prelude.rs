//! Convenient re-exports of commonly used types.
//!
//! ```
//! use picoboot_dol::prelude::*;
//! ```

#[doc(inline)]
pub use crate::header::Header;
#[doc(inline)]
pub use crate::sections::{extract_sections, Section, Sections};

pub mod dol {
    pub use crate::error::Error;
}
