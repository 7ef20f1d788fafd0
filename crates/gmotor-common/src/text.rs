//! Fixed-width legacy name fields.
//!
//! gMotor tools store names in fixed-size byte fields: the name is followed
//! by a NUL and whatever padding the packer left behind. Names use the
//! Windows-1252 code page, not UTF-8.

use encoding_rs::WINDOWS_1252;

/// A raw fixed-width name field as found on disk.
///
/// Keeps the on-disk bytes and the decoded text apart: [`FixedName::as_bytes`]
/// gives the meaningful bytes, [`FixedName::decode`] turns them into a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedName<'a> {
    field: &'a [u8],
}

impl<'a> FixedName<'a> {
    /// Wrap a complete fixed-width field, padding included.
    #[inline]
    pub const fn new(field: &'a [u8]) -> Self {
        Self { field }
    }

    /// Width of the field on disk.
    #[inline]
    pub const fn width(&self) -> usize {
        self.field.len()
    }

    /// The name bytes up to (not including) the first NUL.
    ///
    /// A field without any NUL is taken in full.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        match memchr::memchr(0, self.field) {
            Some(end) => &self.field[..end],
            None => self.field,
        }
    }

    /// Decode the name from Windows-1252.
    pub fn decode(&self) -> String {
        let (text, _) = WINDOWS_1252.decode_without_bom_handling(self.as_bytes());
        text.into_owned()
    }
}
