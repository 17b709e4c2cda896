use snafu::prelude::*;

/// Error conditions for when encoding, validating, or merging UF2 block streams.
#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum Error {
    /// Thrown if a stream's byte length isn't a multiple of the 512-byte block size.
    #[snafu(display("UF2 stream is {got:#X} bytes, not a multiple of 512"))]
    Uf2BadLength { got: usize },

    /// Thrown if a block's start, end, or data-present magic doesn't match.
    #[snafu(display("UF2 block {block_index} has an invalid magic number"))]
    Uf2BadMagic { block_index: usize },

    /// Thrown if a block claims a payload larger than the 256-byte convention this pipeline
    /// relies on.
    #[snafu(display("UF2 block payload size {got} exceeds the 256-byte limit"))]
    Uf2BadBlockSize { got: u32 },

    /// Thrown if the base and payload memory ranges overlap after merging.
    #[snafu(display(
        "base range {base_start:#010X}..{base_end:#010X} overlaps payload range \
         {payload_start:#010X}..{payload_end:#010X}"
    ))]
    MergeMemoryOverlap { base_start: u32, base_end: u32, payload_start: u32, payload_end: u32 },

    /// Thrown if the base stream doesn't start inside the flash region.
    #[snafu(display("base stream starts at {base_start:#010X}, which is before flash start"))]
    MergeBaseOutsideFlash { base_start: u32 },

    /// Thrown if the payload stream starts before the base stream ends.
    #[snafu(display(
        "payload stream starts at {payload_start:#010X}, before base ends at {base_end:#010X}"
    ))]
    MergePayloadBeforeBaseEnd { payload_start: u32, base_end: u32 },
}

pub type Result<T> = core::result::Result<T, Error>;
