use snafu::prelude::*;

/// Error conditions for the PicoBoot firmware-construction pipeline.
///
/// Every variant carries the structured fields needed to render a hex-formatted message; the
/// [`Error::stage`] accessor additionally identifies which pipeline phase failed, so a caller can
/// build its own localized, user-facing text without re-deriving context from the `Display` impl.
#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum Error {
    /// A DOL failed to parse or validate. See [`picoboot_dol::Error`] for the specific reason.
    #[snafu(display("DOL rejected: {source}"))]
    InvalidDol { source: picoboot_dol::Error },

    /// The `"IPLBOOT "` header's magic didn't match.
    #[snafu(display("IPLBOOT header has magic {got:02X?}, expected \"IPLBOOT \""))]
    WrapInvalidMagic { got: [u8; 8] },

    /// The emitted IPLBOOT header wasn't 12 bytes.
    #[snafu(display("IPLBOOT header is {got} bytes, expected 12"))]
    WrapInvalidHeaderSize { got: usize },

    /// The wrapped body didn't end in `"PICO"`.
    #[snafu(display("wrapped payload ends in {got:02X?}, expected \"PICO\""))]
    WrapMissingPicoTrailer { got: [u8; 4] },

    /// The declared size field didn't match the actual buffer length.
    #[snafu(display("wrapped payload declares size {declared:#X}, actual size is {observed:#X}"))]
    WrapSizeMismatch { declared: u32, observed: u32 },

    /// UF2 encoding or merging failed. See [`picoboot_uf2::Error`] for the specific reason.
    #[snafu(display("UF2 layout rejected: {source}"))]
    LayoutError { source: picoboot_uf2::Error },
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Which pipeline phase produced this error: `parse`, `validate`, `wrap`, `encode`, or
    /// `merge`.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            Error::InvalidDol { source } => match source {
                picoboot_dol::Error::DolTooSmall { .. } | picoboot_dol::Error::DolZeroHeader => {
                    "parse"
                }
                _ => "validate",
            },
            Error::WrapInvalidMagic { .. }
            | Error::WrapInvalidHeaderSize { .. }
            | Error::WrapMissingPicoTrailer { .. }
            | Error::WrapSizeMismatch { .. } => "wrap",
            Error::LayoutError { source } => match source {
                picoboot_uf2::Error::MergeMemoryOverlap { .. }
                | picoboot_uf2::Error::MergeBaseOutsideFlash { .. }
                | picoboot_uf2::Error::MergePayloadBeforeBaseEnd { .. } => "merge",
                _ => "encode",
            },
        }
    }
}
