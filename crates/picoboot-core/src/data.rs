//! Endian-aware data manipulation for efficient byte slice operations.
//!
//! [`DataCursor`] wraps an owned byte buffer and provides a convenient interface for reading and
//! writing primitive integers from it in either endianness. It works similarly to the
//! [`std::io`] cursor types, except that reads and writes are explicit about which endianness they
//! use, which matters a great deal when a single pipeline has to juggle a big-endian executable
//! format and a little-endian flash format in the same breath.

use core::ops::{Deref, DerefMut};

use snafu::prelude::*;

/// Error conditions for reading/writing data through a [`DataCursor`].
#[derive(Debug, Snafu, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Thrown if a read or write would go out of bounds.
    #[snafu(display("Unexpected End-Of-File!"))]
    EndOfFile,
    /// Thrown if trying to resize a cursor to larger than the current size.
    #[snafu(display("Invalid End Size!"))]
    InvalidSize,
}
type Result<T> = core::result::Result<T, Error>;

/// Allows specifying which endianness the cursor is currently working with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Default for Endian {
    #[cfg(target_endian = "little")]
    #[inline]
    fn default() -> Self {
        Self::Little
    }

    #[cfg(target_endian = "big")]
    #[inline]
    fn default() -> Self {
        Self::Big
    }
}

pub enum SeekFrom {
    Start(usize),
    End(isize),
    Current(isize),
}

/// Shared cursor functionality, e.g. utilities.
pub trait DataCursorTrait {
    /// Returns the current position of this cursor.
    fn position(&self) -> usize;

    /// Sets the position of this cursor.
    fn set_position(&mut self, pos: usize);

    /// Moves the position of this cursor relative to `style`.
    ///
    /// # Errors
    /// Returns [`EndOfFile`](Error::EndOfFile) if the resulting position would overflow.
    fn seek(&mut self, style: SeekFrom) -> Result<usize>;

    /// Returns the current endianness of this cursor.
    fn endian(&self) -> Endian;

    /// Sets the endianness of this cursor.
    fn set_endian(&mut self, endian: Endian);

    /// Returns the remaining data from the current position.
    fn remaining_slice(&self) -> &[u8];

    /// Returns `true` if the cursor is positioned at or past the end of its data.
    fn is_empty(&self) -> bool;

    /// Returns the length of the currently stored data.
    fn len(&self) -> usize;

    /// Returns a slice from the current position spanning `length` bytes, advancing past it.
    ///
    /// # Errors
    /// Returns [`EndOfFile`](Error::EndOfFile) if trying to read out of bounds.
    fn get_slice(&mut self, length: usize) -> Result<&[u8]>;
}

macro_rules! datacursor_read {
    ($self:ident, $t:ty) => {{
        const LENGTH: usize = core::mem::size_of::<$t>();
        // Bounds check to ensure we're within the valid data range
        ensure!($self.len() >= $self.pos + LENGTH, EndOfFileSnafu);

        unsafe {
            // SAFETY: pointer::add is in-bounds, checked above
            let ptr: *const $t = $self.data.as_ptr().add($self.pos).cast();
            $self.pos += LENGTH;

            // SAFETY: the slice isn't guaranteed to be aligned, so use read_unaligned
            match $self.endian {
                Endian::Little => Ok(<$t>::from_le(ptr.read_unaligned())),
                Endian::Big => Ok(<$t>::from_be(ptr.read_unaligned())),
            }
        }
    }};
}

macro_rules! datacursor_write {
    ($self:ident, $value:expr, $t:ty) => {{
        const LENGTH: usize = core::mem::size_of::<$t>();
        // Bounds check to ensure we're within the valid data range
        ensure!($self.len() >= $self.pos + LENGTH, EndOfFileSnafu);

        unsafe {
            // SAFETY: pointer::add is in-bounds, checked above
            let ptr: *mut $t = $self.data.as_mut_ptr().add($self.pos).cast();
            $self.pos += LENGTH;

            // SAFETY: the slice isn't guaranteed to be aligned, so use write_unaligned
            match $self.endian {
                Endian::Little => ptr.write_unaligned($value.to_le()),
                Endian::Big => ptr.write_unaligned($value.to_be()),
            }
        }
        Ok(())
    }};
}

/// Endian-aware reading of the unsigned integer widths the PicoBoot formats actually use.
pub trait EndianRead {
    /// Reads one byte and returns it as a `u8`.
    ///
    /// # Errors
    /// Returns [`EndOfFile`](Error::EndOfFile) if trying to read out of bounds.
    fn read_u8(&mut self) -> Result<u8>;

    /// Reads two bytes and returns them as a `u16`.
    ///
    /// # Errors
    /// Returns [`EndOfFile`](Error::EndOfFile) if trying to read out of bounds.
    fn read_u16(&mut self) -> Result<u16>;

    /// Reads four bytes and returns them as a `u32`.
    ///
    /// # Errors
    /// Returns [`EndOfFile`](Error::EndOfFile) if trying to read out of bounds.
    fn read_u32(&mut self) -> Result<u32>;
}

/// Endian-aware writing of the unsigned integer widths the PicoBoot formats actually use.
pub trait EndianWrite {
    /// Writes one byte from a `u8`.
    ///
    /// # Errors
    /// Returns [`EndOfFile`](Error::EndOfFile) if trying to write out of bounds.
    fn write_u8(&mut self, value: u8) -> Result<()>;

    /// Writes two bytes from a `u16`.
    ///
    /// # Errors
    /// Returns [`EndOfFile`](Error::EndOfFile) if trying to write out of bounds.
    fn write_u16(&mut self, value: u16) -> Result<()>;

    /// Writes four bytes from a `u32`.
    ///
    /// # Errors
    /// Returns [`EndOfFile`](Error::EndOfFile) if trying to write out of bounds.
    fn write_u32(&mut self, value: u32) -> Result<()>;

    /// Writes a raw slice at the current position, advancing past it.
    ///
    /// # Errors
    /// Returns [`EndOfFile`](Error::EndOfFile) if trying to write out of bounds.
    fn write_slice(&mut self, value: &[u8]) -> Result<()>;
}

/// An owned, in-memory buffer that allows endian-aware reads and writes.
///
/// This is architected to assume a fixed length: callers allocate the final size up front (the
/// DOL/UF2 formats are both fixed-shape), which keeps the hot paths allocation-free.
#[derive(Debug, Default, Clone)]
pub struct DataCursor {
    data: Box<[u8]>,
    pos: usize,
    endian: Endian,
}

impl DataCursor {
    /// Creates a new cursor using the provided data and endianness.
    #[inline]
    pub fn new<I: Into<Box<[u8]>>>(data: I, endian: Endian) -> Self {
        Self { data: data.into(), pos: 0, endian }
    }

    /// Creates a new, zero-filled cursor of `length` bytes.
    #[inline]
    #[must_use]
    pub fn zeroed(length: usize, endian: Endian) -> Self {
        Self::new(vec![0u8; length].into_boxed_slice(), endian)
    }

    /// Consumes this cursor, returning the underlying data.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Box<[u8]> {
        self.data
    }
}

impl DataCursorTrait for DataCursor {
    #[inline]
    #[must_use]
    fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    #[inline]
    fn seek(&mut self, style: SeekFrom) -> Result<usize> {
        let (base_pos, offset) = match style {
            SeekFrom::Start(n) => {
                self.pos = n;
                return Ok(n);
            }
            SeekFrom::End(n) => (self.data.len(), n),
            SeekFrom::Current(n) => (self.pos, n),
        };
        match base_pos.checked_add_signed(offset) {
            Some(n) => {
                self.pos = n;
                Ok(self.pos)
            }
            None => EndOfFileSnafu.fail()?,
        }
    }

    #[inline]
    #[must_use]
    fn endian(&self) -> Endian {
        self.endian
    }

    #[inline]
    fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    #[inline]
    #[must_use]
    fn remaining_slice(&self) -> &[u8] {
        &self.data[self.pos..]
    }

    #[inline]
    #[must_use]
    fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    #[inline]
    #[must_use]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn get_slice(&mut self, length: usize) -> Result<&[u8]> {
        ensure!(self.len() >= self.pos + length, EndOfFileSnafu);
        let slice = &self.data[self.pos..self.pos + length];
        self.pos += length;
        Ok(slice)
    }
}

impl EndianRead for DataCursor {
    #[inline]
    fn read_u8(&mut self) -> Result<u8> {
        const LENGTH: usize = core::mem::size_of::<u8>();
        ensure!(self.len() >= self.pos + LENGTH, EndOfFileSnafu);

        // SAFETY: Box ensures that the pointer arithmetic here is safe
        let value = unsafe { *self.data.as_ptr().add(self.pos) };
        self.pos += LENGTH;
        Ok(value)
    }

    #[inline]
    fn read_u16(&mut self) -> Result<u16> {
        datacursor_read!(self, u16)
    }

    #[inline]
    fn read_u32(&mut self) -> Result<u32> {
        datacursor_read!(self, u32)
    }
}

impl EndianWrite for DataCursor {
    #[inline]
    fn write_u8(&mut self, value: u8) -> Result<()> {
        const LENGTH: usize = core::mem::size_of::<u8>();
        ensure!(self.len() >= self.pos + LENGTH, EndOfFileSnafu);

        // SAFETY: Box ensures that the pointer arithmetic here is safe
        unsafe {
            *self.data.as_mut_ptr().add(self.pos) = value;
        }
        self.pos += LENGTH;
        Ok(())
    }

    #[inline]
    fn write_u16(&mut self, value: u16) -> Result<()> {
        datacursor_write!(self, value, u16)
    }

    #[inline]
    fn write_u32(&mut self, value: u32) -> Result<()> {
        datacursor_write!(self, value, u32)
    }

    #[inline]
    fn write_slice(&mut self, value: &[u8]) -> Result<()> {
        ensure!(self.len() >= self.pos + value.len(), EndOfFileSnafu);
        unsafe {
            core::ptr::copy_nonoverlapping(
                value.as_ptr(),
                self.data.as_mut_ptr().add(self.pos),
                value.len(),
            );
        }
        self.pos += value.len();
        Ok(())
    }
}

impl From<Box<[u8]>> for DataCursor {
    #[inline]
    fn from(data: Box<[u8]>) -> Self {
        Self::new(data, Endian::default())
    }
}

impl Deref for DataCursor {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl DerefMut for DataCursor {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}
