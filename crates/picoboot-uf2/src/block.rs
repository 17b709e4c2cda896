//! A single 512-byte UF2 block: the atomic unit flashing tools transfer over mass storage.

use bitflags::bitflags;
use picoboot_core::prelude::*;

/// Size of a single UF2 block, in bytes.
pub const BLOCK_SIZE: usize = 512;
/// Size of the data region inside a block.
pub const DATA_SIZE: usize = 476;
/// Largest payload this pipeline ever packs into one block.
pub const MAX_PAYLOAD: u32 = 256;

pub(crate) const MAGIC0: u32 = 0x0A32_4655;
pub(crate) const MAGIC1: u32 = 0x9E5D_5157;
pub(crate) const MAGIC_END: u32 = 0x0AB1_6F30;

bitflags! {
    /// Per-block flags. Only [`Flags::FAMILY_ID_PRESENT`] matters to this pipeline; the rest are
    /// carried through verbatim from whatever produced the block.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: u32 {
        const NOT_MAIN_FLASH = 0x0000_0001;
        const FILE_CONTAINER = 0x0000_1000;
        /// The value the UF2 spec and existing flashing tools use for "family ID present".
        const FAMILY_ID_PRESENT = 0x0000_2000;
        const MD5_CHECKSUM_PRESENT = 0x0000_4000;
        const EXTENSION_TAGS_PRESENT = 0x0000_8000;
    }
}

/// One 512-byte UF2 block, decoded into its semantically meaningful fields.
///
/// `data` always holds the full 476-byte region; only the first `payload_size` bytes are
/// meaningful, the rest is zero padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub flags: Flags,
    pub target_addr: u32,
    pub payload_size: u32,
    pub block_no: u32,
    pub total_blocks: u32,
    pub family: u32,
    pub data: [u8; DATA_SIZE],
}

impl Block {
    /// Returns the meaningful slice of this block's data region.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.payload_size as usize]
    }

    /// Serializes this block to its on-disk 512-byte little-endian representation.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; BLOCK_SIZE] {
        let mut cursor = DataCursor::zeroed(BLOCK_SIZE, Endian::Little);
        cursor.write_u32(MAGIC0).unwrap();
        cursor.write_u32(MAGIC1).unwrap();
        cursor.write_u32(self.flags.bits()).unwrap();
        cursor.write_u32(self.target_addr).unwrap();
        cursor.write_u32(self.payload_size).unwrap();
        cursor.write_u32(self.block_no).unwrap();
        cursor.write_u32(self.total_blocks).unwrap();
        cursor.write_u32(self.family).unwrap();
        cursor.write_slice(&self.data).unwrap();
        cursor.write_u32(MAGIC_END).unwrap();

        let bytes = cursor.into_inner();
        bytes.as_ref().try_into().expect("cursor was sized to BLOCK_SIZE")
    }

    /// Decodes a single block from exactly [`BLOCK_SIZE`] bytes.
    ///
    /// Returns `None` if `bytes` isn't exactly [`BLOCK_SIZE`] long or any of the three magic
    /// numbers don't match; the caller is responsible for turning that into a contextual error
    /// (block index within a stream, typically).
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != BLOCK_SIZE {
            return None;
        }

        let mut cursor = DataCursor::new(bytes.to_vec(), Endian::Little);
        let magic0 = cursor.read_u32().ok()?;
        let magic1 = cursor.read_u32().ok()?;
        if magic0 != MAGIC0 || magic1 != MAGIC1 {
            return None;
        }

        let flags = Flags::from_bits_retain(cursor.read_u32().ok()?);
        let target_addr = cursor.read_u32().ok()?;
        let payload_size = cursor.read_u32().ok()?;
        let block_no = cursor.read_u32().ok()?;
        let total_blocks = cursor.read_u32().ok()?;
        let family = cursor.read_u32().ok()?;

        let mut data = [0u8; DATA_SIZE];
        data.copy_from_slice(cursor.get_slice(DATA_SIZE).ok()?);

        let magic_end = cursor.read_u32().ok()?;
        if magic_end != MAGIC_END {
            return None;
        }

        Some(Self { flags, target_addr, payload_size, block_no, total_blocks, family, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> Block {
        let mut data = [0u8; DATA_SIZE];
        data[..4].copy_from_slice(&[1, 2, 3, 4]);
        Block {
            flags: Flags::FAMILY_ID_PRESENT,
            target_addr: 0x1008_0000,
            payload_size: 4,
            block_no: 0,
            total_blocks: 1,
            family: 0xE48B_FF56,
            data,
        }
    }

    #[test]
    fn round_trips_through_bytes() {
        let block = sample_block();
        let bytes = block.to_bytes();
        assert_eq!(bytes.len(), BLOCK_SIZE);
        let decoded = Block::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, block);
    }

    #[test]
    fn payload_returns_only_meaningful_bytes() {
        let block = sample_block();
        assert_eq!(block.payload(), &[1, 2, 3, 4]);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = sample_block().to_bytes();
        bytes[0] ^= 0xFF;
        assert!(Block::from_bytes(&bytes).is_none());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(Block::from_bytes(&[0u8; 511]).is_none());
    }
}
