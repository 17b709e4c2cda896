//! IPLBOOT framing: wraps a scrambled payload with the header and trailer the on-device
//! bootloader uses to locate it inside flash.

use snafu::prelude::*;

use crate::error::*;
use crate::scramble::scramble;

/// ASCII magic, including the trailing space, that opens every wrapped payload.
pub const MAGIC: &[u8; 8] = b"IPLBOOT ";
/// ASCII trailer that closes every wrapped payload's body.
pub const TRAILER: &[u8; 4] = b"PICO";
/// Notional header size an upstream tool bakes into the size field, even though this pipeline
/// only emits a 12-byte header.
const NOTIONAL_HEADER_SIZE: u32 = 32;

/// A scrambled DOL payload framed with its IPLBOOT header and PICO trailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapped {
    /// `"IPLBOOT "` followed by a big-endian `u32` of `body.len() + 32`.
    pub header: Vec<u8>,
    /// The scrambled, 4-byte-aligned payload followed by the `"PICO"` trailer.
    pub body: Vec<u8>,
    /// `header.len() + body.len()`.
    pub total: usize,
}

impl Wrapped {
    /// Concatenates [`header`](Self::header) and [`body`](Self::body) into one buffer, the form
    /// the UF2 encoder expects.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.total);
        out.extend_from_slice(&self.header);
        out.extend_from_slice(&self.body);
        out
    }

    /// Validates the framing invariants: the header magic, the header length, the trailing
    /// `"PICO"` marker, and that `total` agrees with the actual buffer lengths.
    ///
    /// # Errors
    /// See the individual [`Error`] variants for what's checked.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.header.len() == 12,
            WrapInvalidHeaderSizeSnafu { got: self.header.len() }
        );

        let magic: [u8; 8] = self.header[0..8].try_into().expect("checked above");
        ensure!(&magic == MAGIC, WrapInvalidMagicSnafu { got: magic });

        let mut tail = [0u8; 4];
        let tail_start = self.body.len().saturating_sub(4);
        tail[4 - (self.body.len() - tail_start)..].copy_from_slice(&self.body[tail_start..]);
        ensure!(&tail == TRAILER, WrapMissingPicoTrailerSnafu { got: tail });

        let declared = u32::from_be_bytes(self.header[8..12].try_into().expect("checked above"));
        let observed = self.body.len() as u32 + NOTIONAL_HEADER_SIZE;
        ensure!(declared == observed, WrapSizeMismatchSnafu { declared, observed });

        ensure!(
            self.total == self.header.len() + self.body.len(),
            WrapSizeMismatchSnafu { declared: self.total as u32, observed: (self.header.len() + self.body.len()) as u32 }
        );

        Ok(())
    }
}

/// Scrambles `raw`, pads it to a 4-byte boundary, appends the `"PICO"` trailer, and prepends the
/// `"IPLBOOT "` header.
///
/// This wraps whatever bytes it's given verbatim; the pipeline decides whether that's a full DOL
/// file or just its section payload (see the pipeline module).
#[must_use]
pub fn wrap(raw: &[u8]) -> Wrapped {
    let scrambled = scramble(raw);

    let aligned_len = (scrambled.len() + 3) / 4 * 4;
    let mut body = vec![0u8; aligned_len + TRAILER.len()];
    body[..scrambled.len()].copy_from_slice(&scrambled);
    body[aligned_len..].copy_from_slice(TRAILER);

    let mut header = Vec::with_capacity(12);
    header.extend_from_slice(MAGIC);
    header.extend_from_slice(&(body.len() as u32 + NOTIONAL_HEADER_SIZE).to_be_bytes());

    let total = header.len() + body.len();
    Wrapped { header, body, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_s1_wraps_100_zero_bytes() {
        let wrapped = wrap(&[0u8; 100]);
        assert_eq!(&wrapped.header[0..8], MAGIC);
        assert_eq!(u32::from_be_bytes(wrapped.header[8..12].try_into().unwrap()), 0x88);
        assert_eq!(wrapped.body.len(), 104);
        assert_eq!(&wrapped.body[wrapped.body.len() - 4..], b"PICO");
        wrapped.validate().unwrap();
    }

    #[test]
    fn boundary_empty_raw_input() {
        let wrapped = wrap(&[]);
        assert_eq!(wrapped.body, b"PICO");
        let declared = u32::from_be_bytes(wrapped.header[8..12].try_into().unwrap());
        assert_eq!(declared, 4 + 32);
        wrapped.validate().unwrap();
    }

    #[test]
    fn property_p6_header_and_trailer_markers() {
        for len in [0, 1, 3, 4, 257] {
            let wrapped = wrap(&vec![0x55; len]);
            assert_eq!(&wrapped.header[0..8], MAGIC);
            assert_eq!(&wrapped.body[wrapped.body.len() - 4..], b"PICO");
        }
    }

    #[test]
    fn rejects_bad_magic() {
        let mut wrapped = wrap(&[1, 2, 3]);
        wrapped.header[0] = b'X';
        assert!(matches!(wrapped.validate(), Err(Error::WrapInvalidMagic { .. })));
    }

    #[test]
    fn rejects_missing_trailer() {
        let mut wrapped = wrap(&[1, 2, 3, 4]);
        let last = wrapped.body.len() - 1;
        wrapped.body[last] = b'X';
        assert!(matches!(wrapped.validate(), Err(Error::WrapMissingPicoTrailer { .. })));
    }

    #[test]
    fn rejects_size_mismatch() {
        let mut wrapped = wrap(&[1, 2, 3, 4]);
        wrapped.header[8..12].copy_from_slice(&0u32.to_be_bytes());
        assert!(matches!(wrapped.validate(), Err(Error::WrapSizeMismatch { .. })));
    }
}
