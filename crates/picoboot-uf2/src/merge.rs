//! Unifies a base UF2 stream with a payload UF2 stream into one well-formed image.

use snafu::prelude::*;

use crate::error::*;
use crate::layout::FLASH_BASE;
use crate::stream::Stream;

/// Merges `base_bytes` (a raw UF2 image) with an already-encoded `payload` stream.
///
/// Base blocks come first, payload blocks second; the whole list is then renumbered so
/// `block_no` runs `0..N` and `total_blocks == N` everywhere (I5). All other fields, including
/// flags, target address, family tag, and the 256-byte data region, are preserved verbatim.
///
/// # Errors
/// - [`Uf2BadLength`](Error::Uf2BadLength) / [`Uf2BadMagic`](Error::Uf2BadMagic) if `base_bytes`
///   doesn't parse as a well-formed UF2 stream.
/// - [`MergeMemoryOverlap`](Error::MergeMemoryOverlap) if the base and payload memory ranges
///   overlap.
/// - [`MergeBaseOutsideFlash`](Error::MergeBaseOutsideFlash) if the base stream starts before
///   [`FLASH_BASE`].
/// - [`MergePayloadBeforeBaseEnd`](Error::MergePayloadBeforeBaseEnd) if the payload starts before
///   the base stream ends.
pub fn merge(base_bytes: &[u8], payload: &Stream) -> Result<Stream> {
    let base = Stream::parse(base_bytes)?;
    validate_layout(&base, payload)?;

    let mut blocks = base.blocks;
    blocks.extend(payload.blocks.iter().cloned());

    let total_blocks = blocks.len() as u32;
    for (i, block) in blocks.iter_mut().enumerate() {
        block.block_no = i as u32;
        block.total_blocks = total_blocks;
    }

    Ok(Stream { blocks })
}

/// Validates I6: base and payload memory ranges are disjoint, base starts at or after flash
/// start, and payload starts at or after the base's end. If either stream is empty its range is
/// absent and the checks are skipped entirely.
fn validate_layout(base: &Stream, payload: &Stream) -> Result<()> {
    let (Some(base_start), Some(base_end), Some(payload_start), Some(payload_end)) =
        (base.start_addr(), base.end_addr(), payload.start_addr(), payload.end_addr())
    else {
        return Ok(());
    };

    let disjoint = base_end <= payload_start || payload_end <= base_start;
    ensure!(
        disjoint,
        MergeMemoryOverlapSnafu {
            base_start,
            base_end,
            payload_start,
            payload_end
        }
    );
    ensure!(base_start >= FLASH_BASE, MergeBaseOutsideFlashSnafu { base_start });
    ensure!(
        payload_start >= base_end,
        MergePayloadBeforeBaseEndSnafu { payload_start, base_end }
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::Family;

    fn base_stream_at(addrs: &[u32]) -> Stream {
        Stream {
            blocks: addrs
                .iter()
                .enumerate()
                .map(|(i, &addr)| crate::block::Block {
                    flags: crate::block::Flags::FAMILY_ID_PRESENT,
                    target_addr: addr,
                    payload_size: 256,
                    block_no: i as u32,
                    total_blocks: addrs.len() as u32,
                    family: Family::Rp2040.tag(),
                    data: [0u8; crate::block::DATA_SIZE],
                })
                .collect(),
        }
    }

    #[test]
    fn scenario_s5_merge_renumbers_and_orders_blocks() {
        let base = base_stream_at(&[0x1000_0000, 0x1000_0100, 0x1000_0200]);
        let payload = base_stream_at(&[0x1008_0000, 0x1008_0100]);

        let merged = merge(&base.to_bytes(), &payload).unwrap();

        assert_eq!(merged.blocks.len(), 5);
        let addrs: Vec<u32> = merged.blocks.iter().map(|b| b.target_addr).collect();
        assert_eq!(
            addrs,
            vec![0x1000_0000, 0x1000_0100, 0x1000_0200, 0x1008_0000, 0x1008_0100]
        );
        for (i, block) in merged.blocks.iter().enumerate() {
            assert_eq!(block.block_no, i as u32);
            assert_eq!(block.total_blocks, 5);
        }
    }

    #[test]
    fn scenario_s6_overlap_is_rejected() {
        let base = base_stream_at(&[0x1000_0000, 0x1000_0100, 0x1002_ff00]);
        let payload = base_stream_at(&[0x1002_0000]);

        let err = merge(&base.to_bytes(), &payload).unwrap_err();
        assert!(matches!(err, Error::MergeMemoryOverlap { .. }));
    }

    #[test]
    fn rejects_base_outside_flash() {
        let base = base_stream_at(&[0x0FFF_FF00]);
        let payload = base_stream_at(&[0x1008_0000]);

        let err = merge(&base.to_bytes(), &payload).unwrap_err();
        assert_eq!(err, Error::MergeBaseOutsideFlash { base_start: 0x0FFF_FF00 });
    }

    #[test]
    fn rejects_payload_before_base_end() {
        let base = base_stream_at(&[0x1000_0000]);
        let payload = base_stream_at(&[0x1000_0080]);

        let err = merge(&base.to_bytes(), &payload).unwrap_err();
        assert!(matches!(err, Error::MergePayloadBeforeBaseEnd { .. }));
    }

    #[test]
    fn empty_payload_skips_range_checks() {
        let base = base_stream_at(&[0x1000_0000]);
        let payload = Stream::default();

        let merged = merge(&base.to_bytes(), &payload).unwrap();
        assert_eq!(merged.blocks.len(), 1);
        assert_eq!(merged.blocks[0].total_blocks, 1);
    }

    #[test]
    fn preserves_all_other_fields_verbatim() {
        let mut base = base_stream_at(&[0x1000_0000]);
        base.blocks[0].flags = crate::block::Flags::FAMILY_ID_PRESENT | crate::block::Flags::MD5_CHECKSUM_PRESENT;
        base.blocks[0].data[0] = 0xAB;
        let payload = Stream::default();

        let merged = merge(&base.to_bytes(), &payload).unwrap();
        assert_eq!(merged.blocks[0].flags, base.blocks[0].flags);
        assert_eq!(merged.blocks[0].data, base.blocks[0].data);
        assert_eq!(merged.blocks[0].family, base.blocks[0].family);
        assert_eq!(merged.blocks[0].target_addr, base.blocks[0].target_addr);
    }
}
