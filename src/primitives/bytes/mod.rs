#![forbid(unsafe_code)]
//! Varint and buffer utilities shared by the value codec and key builders.

pub mod var {
    //! Unsigned varints and ZigZag signed integers.

    use crate::types::{Error, Result};

    /// Encodes a u64 as an unsigned varint.
    pub fn encode_u64(mut v: u64, out: &mut Vec<u8>) {
        loop {
            let byte = (v & 0x7f) as u8;
            v >>= 7;
            if v == 0 {
                out.push(byte);
                break;
            } else {
                out.push(byte | 0x80);
            }
        }
    }

    /// Decodes a u64 varint from a slice, updating the offset.
    pub fn decode_u64(src: &[u8], off: &mut usize) -> Result<u64> {
        let mut result = 0u64;
        let mut shift = 0u32;
        for i in 0..10 {
            let idx = *off;
            let byte = *src
                .get(idx)
                .ok_or_else(|| Error::decode(format!("varint decode truncated at byte {i}")))?;
            *off += 1;
            let payload = (byte & 0x7f) as u64;
            if i == 9 && payload > 1 {
                return Err(Error::decode("varint overflow (more than 64 bits)"));
            }
            result |= payload << shift;
            if (byte & 0x80) == 0 {
                return Ok(result);
            }
            shift += 7;
        }
        Err(Error::decode("varint too long (exceeded 10 bytes)"))
    }

    /// Encodes an i64 as a ZigZag-encoded varint.
    pub fn encode_i64(v: i64, out: &mut Vec<u8>) {
        let zigzag = ((v << 1) ^ (v >> 63)) as u64;
        encode_u64(zigzag, out);
    }

    /// Decodes a ZigZag-encoded i64 varint from a slice, updating the offset.
    pub fn decode_i64(src: &[u8], off: &mut usize) -> Result<i64> {
        let zigzag = decode_u64(src, off)?;
        Ok(((zigzag >> 1) as i64) ^ (-((zigzag & 1) as i64)))
    }
}

pub mod buf {
    //! A forward-only cursor over the logical region of one encoded value.

    use core::fmt;

    use super::var;
    use crate::types::{Error, Result};

    /// A cursor for reading bytes from a slice with offset tracking.
    ///
    /// The slice ends at the logical end of the value being decoded; reads never
    /// go past it and the cursor only ever moves forward.
    pub struct Cursor<'a> {
        buf: &'a [u8],
        off: usize,
    }

    impl<'a> Cursor<'a> {
        /// Creates a cursor positioned at `off`.
        pub fn at(buf: &'a [u8], off: usize) -> Result<Self> {
            if off > buf.len() {
                return Err(Error::decode(format!(
                    "position {off} beyond buffer of {} bytes",
                    buf.len()
                )));
            }
            Ok(Self { buf, off })
        }

        /// Creates a cursor starting at offset 0.
        pub fn new(buf: &'a [u8]) -> Self {
            Self { buf, off: 0 }
        }

        /// Current read offset.
        pub fn offset(&self) -> usize {
            self.off
        }

        /// Takes the next `n` bytes from the cursor, advancing the offset.
        pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
            let end = self
                .off
                .checked_add(n)
                .ok_or_else(|| Error::decode("cursor offset overflow"))?;
            if end > self.buf.len() {
                return Err(Error::decode(format!(
                    "payload truncated: need {n} bytes, remaining {}",
                    self.remaining()
                )));
            }
            let slice = &self.buf[self.off..end];
            self.off = end;
            Ok(slice)
        }

        /// Takes every byte left in the region.
        pub fn rest(&mut self) -> &'a [u8] {
            let slice = &self.buf[self.off..];
            self.off = self.buf.len();
            slice
        }

        /// Returns the number of bytes remaining in the buffer.
        pub fn remaining(&self) -> usize {
            self.buf.len().saturating_sub(self.off)
        }

        pub fn read_u8(&mut self) -> Result<u8> {
            Ok(self.take(1)?[0])
        }

        pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
            let mut out = [0u8; N];
            out.copy_from_slice(self.take(N)?);
            Ok(out)
        }

        pub fn read_var_u64(&mut self) -> Result<u64> {
            var::decode_u64(self.buf, &mut self.off)
        }

        pub fn read_var_i64(&mut self) -> Result<i64> {
            var::decode_i64(self.buf, &mut self.off)
        }

        /// Reads a varint length followed by that many bytes.
        pub fn read_len_prefixed(&mut self) -> Result<&'a [u8]> {
            let len = self.read_var_u64()?;
            let len = usize::try_from(len)
                .map_err(|_| Error::decode(format!("length prefix {len} overflows usize")))?;
            self.take(len)
        }
    }

    impl<'a> fmt::Debug for Cursor<'a> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("Cursor")
                .field("off", &self.off)
                .field("remaining", &self.remaining())
                .finish()
        }
    }
}

/// Appends a varint length prefix followed by `bytes`.
pub fn put_len_prefixed(out: &mut Vec<u8>, bytes: &[u8]) {
    var::encode_u64(bytes.len() as u64, out);
    out.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::{buf::Cursor, put_len_prefixed, var};
    use proptest::prelude::*;

    #[test]
    fn varint_roundtrip_edges() {
        let mut buf = Vec::new();
        var::encode_u64(0, &mut buf);
        let mut off = 0;
        assert_eq!(var::decode_u64(&buf, &mut off).unwrap(), 0);
        assert_eq!(off, buf.len());

        buf.clear();
        var::encode_u64(u64::MAX, &mut buf);
        off = 0;
        assert_eq!(var::decode_u64(&buf, &mut off).unwrap(), u64::MAX);
        assert_eq!(off, buf.len());

        buf.clear();
        var::encode_i64(i64::MIN, &mut buf);
        off = 0;
        assert_eq!(var::decode_i64(&buf, &mut off).unwrap(), i64::MIN);
    }

    #[test]
    fn cursor_take_rejects_overread() {
        let mut cur = Cursor::new(&[1, 2, 3]);
        let err = cur.take(4).unwrap_err();
        assert!(err.to_string().contains("payload truncated"));
        assert_eq!(cur.offset(), 0);
    }

    #[test]
    fn cursor_rest_stops_at_region_end() {
        let data = [9u8, 1, 2, 3];
        let mut cur = Cursor::at(&data, 1).unwrap();
        assert_eq!(cur.rest(), &[1, 2, 3]);
        assert_eq!(cur.remaining(), 0);
        assert!(Cursor::at(&data, 5).is_err());
    }

    #[test]
    fn len_prefixed_roundtrip() {
        let mut buf = Vec::new();
        put_len_prefixed(&mut buf, b"abc");
        put_len_prefixed(&mut buf, b"");
        let mut cur = Cursor::new(&buf);
        assert_eq!(cur.read_len_prefixed().unwrap(), b"abc");
        assert_eq!(cur.read_len_prefixed().unwrap(), b"");
        assert_eq!(cur.remaining(), 0);
    }

    #[test]
    fn varint_decode_rejects_truncated() {
        let data = vec![0x80]; // continuation bit without payload
        let mut off = 0;
        let err = var::decode_u64(&data, &mut off).unwrap_err();
        assert!(err.to_string().contains("varint decode truncated"));
    }

    #[test]
    fn varint_decode_rejects_too_long() {
        let data = vec![0x81; 11];
        let mut off = 0;
        assert!(var::decode_u64(&data, &mut off).is_err());
    }

    proptest! {
        #[test]
        fn varint_roundtrip_u64_prop(v in any::<u64>()) {
            let mut buf = Vec::new();
            var::encode_u64(v, &mut buf);
            let mut off = 0;
            let decoded = var::decode_u64(&buf, &mut off).unwrap();
            prop_assert_eq!(decoded, v);
            prop_assert_eq!(off, buf.len());
        }

        #[test]
        fn varint_roundtrip_i64_prop(v in any::<i64>()) {
            let mut buf = Vec::new();
            var::encode_i64(v, &mut buf);
            let mut off = 0;
            let decoded = var::decode_i64(&buf, &mut off).unwrap();
            prop_assert_eq!(decoded, v);
            prop_assert_eq!(off, buf.len());
        }
    }
}
