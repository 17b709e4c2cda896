//! Turns a GameCube DOL into a PicoBoot flash image.
//!
//! This crate owns the parts of the pipeline specific to PicoBoot: the boot-ROM LFSR scrambler,
//! the IPLBOOT framing that wraps a DOL for the on-device bootloader, and the orchestration that
//! ties DOL parsing ([`picoboot_dol`]) and UF2 encoding/merging ([`picoboot_uf2`]) together into
//! one flashable image.
//!
//! # Pipeline
//! [`pipeline::build`] runs, in order:
//! 1. Parse and validate the DOL ([`picoboot_dol::Header`]).
//! 2. Scramble and frame the whole DOL file ([`wrap::wrap`]).
//! 3. Encode the framed payload as UF2 blocks at the fixed payload base address, retagging for
//!    the requested family if it isn't the one the encoder natively tags for.
//! 4. Merge the payload stream onto the caller's base firmware image ([`picoboot_uf2::merge`]).

pub mod error;
pub mod pipeline;
pub mod prelude;
pub mod scramble;
pub mod wrap;

pub use error::Error;
pub use pipeline::build;
