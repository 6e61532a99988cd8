//! Binary buffer reader with cursor tracking.

use std::str;

use crate::{BufferError, MAX_VU32_LEN};

/// A bounds-checked binary reader over a byte slice.
///
/// All multi-byte integers are little-endian. Reads never panic: a read that
/// would run past `end` returns [`BufferError::EndOfBuffer`] and leaves the
/// cursor where it was.
///
/// # Example
///
/// ```
/// use viewstate_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.try_u8(), Ok(0x01));
/// assert_eq!(reader.try_i16(), Ok(0x0302));
/// assert!(reader.try_u8().is_err());
/// ```
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
    /// End position (exclusive).
    pub end: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        let end = uint8.len();
        Self { uint8, x: 0, end }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.end - self.x
    }

    /// Checks that `n` more bytes are available from the current cursor.
    #[inline]
    pub fn check(&self, n: usize) -> Result<(), BufferError> {
        let remaining = self.size();
        if n > remaining {
            Err(BufferError::EndOfBuffer {
                offset: self.x,
                needed: n,
                remaining,
            })
        } else {
            Ok(())
        }
    }

    /// Peeks at the current byte without advancing.
    pub fn try_peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.uint8[self.x])
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn try_u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    /// Reads a signed 16-bit little-endian integer.
    #[inline]
    pub fn try_i16(&mut self) -> Result<i16, BufferError> {
        Ok(i16::from_le_bytes(self.array::<2>()?))
    }

    /// Reads a signed 64-bit little-endian integer.
    #[inline]
    pub fn try_i64(&mut self) -> Result<i64, BufferError> {
        Ok(i64::from_le_bytes(self.array::<8>()?))
    }

    /// Reads a 32-bit little-endian float.
    #[inline]
    pub fn try_f32(&mut self) -> Result<f32, BufferError> {
        Ok(f32::from_le_bytes(self.array::<4>()?))
    }

    /// Reads a 64-bit little-endian float.
    #[inline]
    pub fn try_f64(&mut self) -> Result<f64, BufferError> {
        Ok(f64::from_le_bytes(self.array::<8>()?))
    }

    #[inline]
    fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        self.check(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.uint8[self.x..self.x + N]);
        self.x += N;
        Ok(out)
    }

    /// Reads a 7-bit encoded unsigned integer: low groups first, high bit of
    /// each byte set while more bytes follow.
    ///
    /// Only the shortest encoding is accepted, so a decoded value always
    /// re-encodes to the bytes it was read from.
    pub fn try_vu32(&mut self) -> Result<u32, BufferError> {
        let start = self.x;
        let mut result: u32 = 0;
        for i in 0..MAX_VU32_LEN {
            let byte = match self.try_u8() {
                Ok(byte) => byte,
                Err(err) => {
                    self.x = start;
                    return Err(err);
                }
            };
            result |= ((byte & 0x7f) as u32) << (7 * i);
            if byte & 0x80 == 0 {
                let overlong = i > 0 && byte == 0;
                let overflow = i == MAX_VU32_LEN - 1 && byte > 0x0f;
                if overlong || overflow {
                    self.x = start;
                    return Err(BufferError::InvalidVarInt { offset: start });
                }
                return Ok(result);
            }
        }
        self.x = start;
        Err(BufferError::InvalidVarInt { offset: start })
    }

    /// Reads a UTF-8 string of `size` bytes.
    pub fn try_utf8(&mut self, size: usize) -> Result<&'a str, BufferError> {
        self.check(size)?;
        let start = self.x;
        let s = str::from_utf8(&self.uint8[start..start + size])
            .map_err(|_| BufferError::InvalidUtf8 { offset: start })?;
        self.x += size;
        Ok(s)
    }

    /// Reads one UTF-8 encoded character, sizing the read from its lead byte.
    pub fn try_char(&mut self) -> Result<char, BufferError> {
        let start = self.x;
        let width = match self.try_peek()? {
            0x00..=0x7f => 1,
            0xc2..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf4 => 4,
            _ => return Err(BufferError::InvalidUtf8 { offset: start }),
        };
        let s = self.try_utf8(width)?;
        s.chars()
            .next()
            .ok_or(BufferError::InvalidUtf8 { offset: start })
    }
}
