//! Stream reading helpers.
//!
//! This module provides [`ReadExt`], an extension of [`std::io::Read`] for
//! pulling fixed-size records and exact byte counts out of a stream while
//! reporting how many bytes were actually available on a short read.

use std::io::{self, Read};

use zerocopy::FromBytes;

use crate::{Error, Result};

/// Extension trait for reading binary data from streams.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use gmotor_common::ReadExt;
///
/// let mut stream = Cursor::new(b"MAGIC\0rest".to_vec());
/// let magic: [u8; 6] = stream.read_byte_array().unwrap();
/// assert_eq!(&magic, b"MAGIC\0");
/// assert_eq!(stream.read_exactly(4).unwrap(), b"rest");
/// assert!(stream.read_exactly(1).is_err());
/// ```
pub trait ReadExt: Read {
    /// Read until `buf` is full or the stream ends, returning the byte count.
    ///
    /// Unlike [`Read::read_exact`], a short read is not an error here; the
    /// caller decides what a partial fill means.
    fn read_fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    /// Read a fixed-size byte array.
    fn read_byte_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        let available = self.read_fill(&mut bytes)?;
        if available < N {
            return Err(Error::UnexpectedEof {
                needed: N,
                available,
            });
        }
        Ok(bytes)
    }

    /// Read exactly `len` bytes into a new buffer.
    ///
    /// The buffer grows with the data actually read, so a bogus length taken
    /// from a file header does not trigger a huge up-front allocation.
    fn read_exactly(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let available = self.take(len as u64).read_to_end(&mut bytes)?;
        if available < len {
            return Err(Error::UnexpectedEof {
                needed: len,
                available,
            });
        }
        Ok(bytes)
    }

    /// Read a structure from the stream.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate.
    fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let mut bytes = vec![0u8; size];
        let available = self.read_fill(&mut bytes)?;
        if available < size {
            return Err(Error::UnexpectedEof {
                needed: size,
                available,
            });
        }
        T::read_from_bytes(&bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available,
        })
    }
}

impl<R: Read + ?Sized> ReadExt for R {}
