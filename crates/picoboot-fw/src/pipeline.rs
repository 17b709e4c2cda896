//! Orchestrates the DOL-to-UF2 pipeline: C1 (parse/validate) -> C3 (wrap) -> C4 (encode) -> C5
//! (merge with the supplied base).

use picoboot_core::util::format_size;
use picoboot_dol::Header;
use picoboot_uf2::{layout::PAYLOAD_BASE, merge, Family, Stream};
use snafu::prelude::*;

use crate::error::*;
use crate::wrap::wrap;

/// Builds a flashable UF2 image from a base firmware image, a GameCube DOL, and a target family.
///
/// This is a pure, synchronous transform: no I/O, no clock, no shared state. The phases run in
/// strict order -- parse and validate the DOL, wrap it in IPLBOOT framing, encode that as a UF2
/// payload stream at [`PAYLOAD_BASE`], then merge it onto the base -- and the first error
/// encountered short-circuits the rest.
///
/// Note that the entire DOL file, header included, is what gets wrapped in step two, not just the
/// flattened section payload [`picoboot_dol::extract_sections`] would produce. That matches the
/// upstream tool this pipeline is compatible with; `extract_sections` remains available for
/// validation and diagnostics, but its output never reaches the wrapper.
///
/// # Errors
/// - [`Error::InvalidDol`] if the DOL fails to parse or fails any of its structural invariants.
/// - [`Error::LayoutError`] if merging onto the base firmware would violate the memory layout
///   invariants (overlapping regions, payload before flash end, etc).
pub fn build(base_uf2: &[u8], dol: &[u8], family: Family) -> Result<Vec<u8>> {
    log::debug!("parsing DOL header ({} total)", format_size(dol.len()));
    let header = Header::parse(dol).context(InvalidDolSnafu)?;
    header.validate(dol).context(InvalidDolSnafu)?;
    log::info!("DOL validated, entry point {:#010X}", header.entry_point);

    let wrapped = wrap(dol);
    wrapped.validate()?;
    log::debug!("wrapped payload is {}", format_size(wrapped.total));

    // The block builder only natively tags RP2040; any other family is produced by encoding for
    // RP2040 and then retagging every block in place, per the cross-family re-tagging contract.
    let mut payload_stream = Stream::encode(&wrapped.to_bytes(), PAYLOAD_BASE, Family::Rp2040);
    if family != Family::Rp2040 {
        payload_stream.retag(family);
    }
    log::debug!("encoded {} UF2 blocks for the payload", payload_stream.blocks.len());

    let merged = merge(base_uf2, &payload_stream).context(LayoutErrorSnafu)?;
    log::info!("merged image has {} total blocks", merged.blocks.len());

    Ok(merged.to_bytes())
}
