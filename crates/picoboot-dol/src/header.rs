//! The GameCube DOL executable header: 7 text sections, 11 data sections, and a BSS region, all
//! addressed with 32-bit big-endian fields.

use picoboot_core::prelude::*;
use snafu::prelude::*;

use crate::error::*;

/// Fixed size of a DOL header, in bytes.
pub const HEADER_SIZE: usize = 256;
/// Number of text sections a DOL header can describe.
pub const NUM_TEXT_SECTIONS: usize = 7;
/// Number of data sections a DOL header can describe.
pub const NUM_DATA_SECTIONS: usize = 11;
/// Entry point (and first text section load address) every PicoBoot-compatible DOL must use.
pub const ENTRY_POINT: u32 = 0x8130_0000;
/// Largest DOL file the pipeline will accept.
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// The parsed, fixed-shape contents of a 256-byte DOL header.
///
/// All offsets and addresses are stored in native `u32`s; they were read out of the file as
/// big-endian and converted on the way in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub text_offsets: [u32; NUM_TEXT_SECTIONS],
    pub data_offsets: [u32; NUM_DATA_SECTIONS],
    pub text_addrs: [u32; NUM_TEXT_SECTIONS],
    pub data_addrs: [u32; NUM_DATA_SECTIONS],
    pub text_sizes: [u32; NUM_TEXT_SECTIONS],
    pub data_sizes: [u32; NUM_DATA_SECTIONS],
    pub bss_addr: u32,
    pub bss_size: u32,
    pub entry_point: u32,
}

fn read_array<const N: usize>(cursor: &mut DataCursor) -> Result<[u32; N]> {
    let mut out = [0u32; N];
    for slot in &mut out {
        *slot = cursor.read_u32().expect("bounds checked by caller");
    }
    Ok(out)
}

impl Header {
    /// Parses a DOL header out of the first 256 bytes of `bytes`.
    ///
    /// # Errors
    /// Returns [`DolTooSmall`](Error::DolTooSmall) if `bytes` is shorter than [`HEADER_SIZE`], or
    /// [`DolZeroHeader`](Error::DolZeroHeader) if the header describes no sections and has a zero
    /// entry point.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        ensure!(
            bytes.len() >= HEADER_SIZE,
            DolTooSmallSnafu { got: bytes.len(), min: HEADER_SIZE }
        );

        let mut cursor = DataCursor::new(bytes[..HEADER_SIZE].to_vec(), Endian::Big);

        let text_offsets = read_array::<NUM_TEXT_SECTIONS>(&mut cursor)?;
        let data_offsets = read_array::<NUM_DATA_SECTIONS>(&mut cursor)?;
        let text_addrs = read_array::<NUM_TEXT_SECTIONS>(&mut cursor)?;
        let data_addrs = read_array::<NUM_DATA_SECTIONS>(&mut cursor)?;
        let text_sizes = read_array::<NUM_TEXT_SECTIONS>(&mut cursor)?;
        let data_sizes = read_array::<NUM_DATA_SECTIONS>(&mut cursor)?;
        let bss_addr = cursor.read_u32().expect("bounds checked above");
        let bss_size = cursor.read_u32().expect("bounds checked above");
        let entry_point = cursor.read_u32().expect("bounds checked above");

        let header = Self {
            text_offsets,
            data_offsets,
            text_addrs,
            data_addrs,
            text_sizes,
            data_sizes,
            bss_addr,
            bss_size,
            entry_point,
        };

        let all_zero = header.entry_point == 0
            && header.text_offsets.iter().all(|&v| v == 0)
            && header.data_offsets.iter().all(|&v| v == 0)
            && header.text_addrs.iter().all(|&v| v == 0)
            && header.data_addrs.iter().all(|&v| v == 0);
        ensure!(!all_zero, DolZeroHeaderSnafu);

        Ok(header)
    }

    /// Validates invariants I1-I3: entry point and load address, section bounds/overlap, and
    /// overall file size.
    ///
    /// # Errors
    /// See the [`Error`] variants for the individual checks performed.
    pub fn validate(&self, bytes: &[u8]) -> Result<()> {
        // I1: entry point and first text section load address.
        ensure!(
            self.entry_point == ENTRY_POINT,
            DolInvalidEntryPointSnafu { got: self.entry_point, expected: ENTRY_POINT }
        );
        ensure!(
            self.text_addrs[0] == ENTRY_POINT,
            DolInvalidLoadAddressSnafu { got: self.text_addrs[0], expected: ENTRY_POINT }
        );

        // I2: section bounds and overlap.
        self.check_bounds_and_overlap(bytes.len())?;

        // I3: overall file size budget.
        ensure!(
            bytes.len() <= MAX_FILE_SIZE,
            DolTooLargeSnafu { got: bytes.len(), max: MAX_FILE_SIZE }
        );

        Ok(())
    }

    /// Collects `(label, offset, size)` for every non-empty section, in header order.
    fn section_ranges(&self) -> Vec<(&'static str, u32, u32)> {
        let mut ranges = Vec::with_capacity(NUM_TEXT_SECTIONS + NUM_DATA_SECTIONS);
        for i in 0..NUM_TEXT_SECTIONS {
            if self.text_sizes[i] != 0 {
                ranges.push((text_label(i), self.text_offsets[i], self.text_sizes[i]));
            }
        }
        for i in 0..NUM_DATA_SECTIONS {
            if self.data_sizes[i] != 0 {
                ranges.push((data_label(i), self.data_offsets[i], self.data_sizes[i]));
            }
        }
        ranges
    }

    fn check_bounds_and_overlap(&self, file_size: usize) -> Result<()> {
        let mut ranges = self.section_ranges();

        for &(label, offset, size) in &ranges {
            let end = u64::from(offset) + u64::from(size);
            ensure!(
                end <= file_size as u64,
                DolSectionOutOfBoundsSnafu { label, offset, size, file_size }
            );
        }

        // Sort by offset and check that adjacent sections don't overlap in file space.
        ranges.sort_by_key(|&(_, offset, _)| offset);
        for pair in ranges.windows(2) {
            let (a_label, a_offset, a_size) = pair[0];
            let (b_label, b_offset, _) = pair[1];
            ensure!(
                a_offset + a_size <= b_offset,
                DolSectionOverlapSnafu {
                    a_label,
                    a_start: a_offset,
                    a_end: a_offset + a_size,
                    b_label,
                    b_start: b_offset,
                    b_end: pair[1].1 + pair[1].2,
                }
            );
        }

        Ok(())
    }
}

pub(crate) fn text_label(index: usize) -> &'static str {
    const LABELS: [&str; NUM_TEXT_SECTIONS] =
        ["text0", "text1", "text2", "text3", "text4", "text5", "text6"];
    LABELS[index]
}

pub(crate) fn data_label(index: usize) -> &'static str {
    const LABELS: [&str; NUM_DATA_SECTIONS] = [
        "data0", "data1", "data2", "data3", "data4", "data5", "data6", "data7", "data8", "data9",
        "data10",
    ];
    LABELS[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_valid_dol() -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_SIZE + 16];
        // One text section of 16 bytes living right after the header.
        bytes[0..4].copy_from_slice(&(HEADER_SIZE as u32).to_be_bytes()); // text_offsets[0]
        bytes[0x48..0x4C].copy_from_slice(&ENTRY_POINT.to_be_bytes()); // text_addrs[0]
        bytes[0x90..0x94].copy_from_slice(&16u32.to_be_bytes()); // text_sizes[0]
        bytes[0xE0..0xE4].copy_from_slice(&ENTRY_POINT.to_be_bytes()); // entry_point
        bytes
    }

    #[test]
    fn rejects_short_input() {
        let err = Header::parse(&[0u8; 100]).unwrap_err();
        assert_eq!(err, Error::DolTooSmall { got: 100, min: HEADER_SIZE });
    }

    #[test]
    fn rejects_all_zero_header() {
        let err = Header::parse(&[0u8; HEADER_SIZE]).unwrap_err();
        assert_eq!(err, Error::DolZeroHeader);
    }

    #[test]
    fn parses_and_validates_minimal_dol() {
        let bytes = minimal_valid_dol();
        let header = Header::parse(&bytes).unwrap();
        header.validate(&bytes).unwrap();
    }

    #[test]
    fn all_zero_sections_but_nonzero_entry_still_fails_load_address() {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes[0xE0..0xE4].copy_from_slice(&ENTRY_POINT.to_be_bytes());
        let header = Header::parse(&bytes).unwrap();
        let err = header.validate(&bytes).unwrap_err();
        assert_eq!(err, Error::DolInvalidLoadAddress { got: 0, expected: ENTRY_POINT });
    }

    #[test]
    fn rejects_wrong_entry_point() {
        let mut bytes = minimal_valid_dol();
        bytes[0xE0..0xE4].copy_from_slice(&0x8000_0000u32.to_be_bytes());
        let header = Header::parse(&bytes).unwrap();
        let err = header.validate(&bytes).unwrap_err();
        assert_eq!(
            err,
            Error::DolInvalidEntryPoint { got: 0x8000_0000, expected: ENTRY_POINT }
        );
    }

    #[test]
    fn rejects_section_out_of_bounds() {
        let mut bytes = minimal_valid_dol();
        bytes[0x90..0x94].copy_from_slice(&1_000_000u32.to_be_bytes()); // text_sizes[0]
        let header = Header::parse(&bytes).unwrap();
        let err = header.validate(&bytes).unwrap_err();
        assert!(matches!(err, Error::DolSectionOutOfBounds { .. }));
    }

    #[test]
    fn rejects_overlapping_sections() {
        let mut bytes = minimal_valid_dol();
        // Put data0 right on top of text0's 16 bytes.
        bytes[0x1C..0x20].copy_from_slice(&(HEADER_SIZE as u32).to_be_bytes()); // data_offsets[0]
        bytes[0xAC..0xB0].copy_from_slice(&8u32.to_be_bytes()); // data_sizes[0]
        let header = Header::parse(&bytes).unwrap();
        let err = header.validate(&bytes).unwrap_err();
        assert!(matches!(err, Error::DolSectionOverlap { .. }));
    }

    #[test]
    fn rejects_oversized_file() {
        let mut bytes = minimal_valid_dol();
        bytes.resize(MAX_FILE_SIZE + 1, 0);
        let header = Header::parse(&bytes).unwrap();
        let err = header.validate(&bytes).unwrap_err();
        assert_eq!(err, Error::DolTooLarge { got: MAX_FILE_SIZE + 1, max: MAX_FILE_SIZE });
    }
}
