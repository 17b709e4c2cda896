//! A sequence of UF2 blocks: encoding a flat byte buffer into one, and validating or parsing a
//! stream of bytes back into blocks.

use snafu::prelude::*;

use crate::block::{Block, Flags, BLOCK_SIZE, MAX_PAYLOAD};
use crate::error::*;
use crate::family::Family;

/// A parsed, in-memory sequence of UF2 blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stream {
    pub blocks: Vec<Block>,
}

impl Stream {
    /// Encodes `bytes` into a sequence of 512-byte UF2 blocks, targeting `base_addr` and tagged
    /// with `family`.
    ///
    /// `bytes` is split into consecutive chunks of at most 256 bytes; chunk `i` lands at
    /// `base_addr + i * 256`. An empty buffer yields an empty (zero-block) stream.
    #[must_use]
    pub fn encode(bytes: &[u8], base_addr: u32, family: Family) -> Self {
        let chunks: Vec<&[u8]> = bytes.chunks(MAX_PAYLOAD as usize).collect();
        let total_blocks = chunks.len() as u32;

        let blocks = chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| {
                let mut data = [0u8; crate::block::DATA_SIZE];
                data[..chunk.len()].copy_from_slice(chunk);
                Block {
                    flags: Flags::FAMILY_ID_PRESENT,
                    target_addr: base_addr + (i as u32) * MAX_PAYLOAD,
                    payload_size: chunk.len() as u32,
                    block_no: i as u32,
                    total_blocks,
                    family: family.tag(),
                    data,
                }
            })
            .collect();

        Self { blocks }
    }

    /// Parses a byte buffer into a stream of blocks, without otherwise validating it.
    ///
    /// # Errors
    /// Returns [`Uf2BadLength`](Error::Uf2BadLength) if `bytes` isn't a multiple of 512, or
    /// [`Uf2BadMagic`](Error::Uf2BadMagic) if any block's magic numbers don't match.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        ensure!(bytes.len() % BLOCK_SIZE == 0, Uf2BadLengthSnafu { got: bytes.len() });

        let blocks = bytes
            .chunks(BLOCK_SIZE)
            .enumerate()
            .map(|(i, chunk)| Block::from_bytes(chunk).context(Uf2BadMagicSnafu { block_index: i }))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { blocks })
    }

    /// Serializes every block back to its 512-byte representation, concatenated in order.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.blocks.len() * BLOCK_SIZE);
        for block in &self.blocks {
            out.extend_from_slice(&block.to_bytes());
        }
        out
    }

    /// Validates a raw byte buffer as a well-formed UF2 stream: length is a multiple of 512,
    /// every block's magics check out, and no block claims a payload over 256 bytes (I4).
    ///
    /// # Errors
    /// See [`Stream::parse`]; also returns [`Uf2BadBlockSize`](Error::Uf2BadBlockSize) if any
    /// block's `payload_size` exceeds 256.
    pub fn validate_stream(bytes: &[u8]) -> Result<()> {
        let stream = Self::parse(bytes)?;
        for block in &stream.blocks {
            ensure!(
                block.payload_size <= MAX_PAYLOAD,
                Uf2BadBlockSizeSnafu { got: block.payload_size }
            );
        }
        Ok(())
    }

    /// Overwrites the family tag of every block in place, little-endian, at byte offset 28.
    ///
    /// This is the supported mechanism for producing output for a family the underlying block
    /// builder doesn't natively know how to tag (e.g. RP2350): encode for the family the builder
    /// does support, then retag.
    pub fn retag(&mut self, family: Family) {
        for block in &mut self.blocks {
            block.family = family.tag();
        }
    }

    /// The lowest target address among this stream's blocks, if any.
    #[must_use]
    pub fn start_addr(&self) -> Option<u32> {
        self.blocks.iter().map(|b| b.target_addr).min()
    }

    /// One past the highest address this stream's blocks occupy, if any.
    #[must_use]
    pub fn end_addr(&self) -> Option<u32> {
        self.blocks.iter().map(|b| b.target_addr + b.payload_size).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_empty_input_yields_no_blocks() {
        let stream = Stream::encode(&[], 0x1008_0000, Family::Rp2040);
        assert!(stream.blocks.is_empty());
    }

    #[test]
    fn encodes_exactly_256_bytes_as_one_block() {
        let stream = Stream::encode(&[0xAA; 256], 0x1008_0000, Family::Rp2040);
        assert_eq!(stream.blocks.len(), 1);
        assert_eq!(stream.blocks[0].payload_size, 256);
    }

    #[test]
    fn encodes_257_bytes_as_two_blocks() {
        let stream = Stream::encode(&[0xAA; 257], 0x1008_0000, Family::Rp2040);
        assert_eq!(stream.blocks.len(), 2);
        assert_eq!(stream.blocks[0].payload_size, 256);
        assert_eq!(stream.blocks[1].payload_size, 1);
    }

    #[test]
    fn scenario_s3_two_blocks_at_payload_base() {
        let stream = Stream::encode(&[0; 512], 0x1008_0000, Family::Rp2040);
        assert_eq!(stream.blocks.len(), 2);
        assert_eq!(stream.blocks[0].target_addr, 0x1008_0000);
        assert_eq!(stream.blocks[1].target_addr, 0x1008_0100);
        for block in &stream.blocks {
            assert_eq!(block.family, 0xE48B_FF56);
            assert_eq!(block.payload_size, 256);
        }
        assert_eq!(stream.blocks[0].block_no, 0);
        assert_eq!(stream.blocks[1].block_no, 1);
        assert!(stream.blocks.iter().all(|b| b.total_blocks == 2));
    }

    #[test]
    fn scenario_s4_retag_changes_only_family() {
        let mut rp2040 = Stream::encode(&[0; 512], 0x1008_0000, Family::Rp2040);
        let rp2350 = {
            let mut s = rp2040.clone();
            s.retag(Family::Rp2350);
            s
        };

        for (a, b) in rp2040.blocks.iter_mut().zip(rp2350.blocks.iter()) {
            assert_eq!(b.family, 0xE48B_FF59);
            a.family = b.family;
            assert_eq!(a, b);
        }
    }

    #[test]
    fn round_trips_bytes_through_parse() {
        let stream = Stream::encode(&[1, 2, 3, 4, 5], 0x1008_0000, Family::Rp2350);
        let bytes = stream.to_bytes();
        assert_eq!(bytes.len() % BLOCK_SIZE, 0);
        let parsed = Stream::parse(&bytes).unwrap();
        assert_eq!(parsed, stream);
    }

    #[test]
    fn rejects_length_not_a_multiple_of_block_size() {
        let err = Stream::parse(&[0u8; 511]).unwrap_err();
        assert_eq!(err, Error::Uf2BadLength { got: 511 });
    }

    #[test]
    fn scenario_p3_encoded_streams_validate() {
        let stream = Stream::encode(&[0xAB; 1000], 0x1008_0000, Family::Rp2350);
        let bytes = stream.to_bytes();
        assert_eq!(bytes.len() % BLOCK_SIZE, 0);
        Stream::validate_stream(&bytes).unwrap();
    }

    #[test]
    fn rejects_bad_magic_with_block_index() {
        let stream = Stream::encode(&[0; 512], 0x1008_0000, Family::Rp2040);
        let mut bytes = stream.to_bytes();
        bytes[BLOCK_SIZE] ^= 0xFF; // corrupt the second block's magic
        let err = Stream::parse(&bytes).unwrap_err();
        assert_eq!(err, Error::Uf2BadMagic { block_index: 1 });
    }
}
