use snafu::prelude::*;

/// Error conditions for when parsing or validating a DOL executable.
#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum Error {
    /// Thrown if the input is smaller than the fixed 256-byte header.
    #[snafu(display("DOL is only {got:#X} bytes, need at least {min:#X} for the header"))]
    DolTooSmall { got: usize, min: usize },

    /// Thrown if the entry point and every section table entry are zero, which means we're
    /// almost certainly looking at a zeroed-out region rather than a real DOL.
    #[snafu(display("DOL header is entirely zero, this isn't a valid executable"))]
    DolZeroHeader,

    /// Thrown if the entry point doesn't match the fixed PicoBoot load address.
    #[snafu(display("DOL entry point is {got:#010X}, expected {expected:#010X}"))]
    DolInvalidEntryPoint { got: u32, expected: u32 },

    /// Thrown if the first text section's load address doesn't match the fixed PicoBoot load
    /// address.
    #[snafu(display("DOL first text section loads at {got:#010X}, expected {expected:#010X}"))]
    DolInvalidLoadAddress { got: u32, expected: u32 },

    /// Thrown if a non-empty section's file range falls outside the DOL file.
    #[snafu(display(
        "DOL section {label} at offset {offset:#X} with size {size:#X} exceeds the file size \
         {file_size:#X}"
    ))]
    DolSectionOutOfBounds { label: &'static str, offset: u32, size: u32, file_size: usize },

    /// Thrown if two non-empty sections overlap in file space.
    #[snafu(display(
        "DOL sections {a_label} ({a_start:#X}..{a_end:#X}) and {b_label} \
         ({b_start:#X}..{b_end:#X}) overlap in the file"
    ))]
    DolSectionOverlap {
        a_label: &'static str,
        a_start: u32,
        a_end: u32,
        b_label: &'static str,
        b_start: u32,
        b_end: u32,
    },

    /// Thrown if the whole DOL file exceeds the size budget the pipeline was built for.
    #[snafu(display("DOL is {got:#X} bytes, which exceeds the {max:#X} byte limit"))]
    DolTooLarge { got: usize, max: usize },
}

pub type Result<T> = core::result::Result<T, Error>;
