//! Shared, dependency-light utilities for the PicoBoot format crates.
//!
//! The PicoBoot toolchain runs on the host building the flash image, never on the target, so this
//! crate does not bother with `no_std` support the way some of its siblings might.

pub mod prelude;

pub mod data;
pub mod util;

#[cfg(feature = "time")]
pub mod time;
