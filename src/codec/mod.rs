//! Canonical binary codec.
//!
//! Deterministic BCS-style serialization: every representable value has
//! exactly one valid encoding. Unsigned integers are fixed-width
//! little-endian, booleans are a single 0/1 byte, strings and vectors carry
//! a ULEB128 length prefix, fixed-size byte arrays are written raw, structs
//! encode their fields in declaration order, and enums are tagged with a
//! ULEB128 variant index.
//!
//! Decoding is schema-directed: the target type drives how many bytes are
//! consumed. There is no runtime type inspection; each wire type implements
//! [`Encode`]/[`Decode`] explicitly.

use crate::core::errors::CodecError;

/// Maximum element count accepted for any length-prefixed sequence.
pub const MAX_SEQUENCE_LENGTH: u64 = u32::MAX as u64;

/// A type that can be written to the canonical wire format.
pub trait Encode {
    fn encode(&self, enc: &mut Encoder);
}

/// A type that can be read back from the canonical wire format.
pub trait Decode: Sized {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError>;
}

/// Encode a value into a fresh byte buffer.
pub fn to_bytes<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
    let mut enc = Encoder::new();
    value.encode(&mut enc);
    enc.into_bytes()
}

/// Decode a value, requiring the input to be fully consumed.
pub fn from_bytes<T: Decode>(bytes: &[u8]) -> Result<T, CodecError> {
    let mut dec = Decoder::new(bytes);
    let value = T::decode(&mut dec)?;
    let rest = dec.remaining();
    if rest != 0 {
        return Err(CodecError::TrailingBytes(rest));
    }
    Ok(value)
}

/// Append-only output buffer.
#[derive(Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u128(&mut self, v: u128) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(v as u8);
    }

    /// Raw bytes, no length prefix. Used for fixed-size arrays.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// ULEB128 variable-length unsigned integer.
    pub fn write_uleb128(&mut self, mut v: u64) {
        loop {
            let mut byte = (v & 0x7f) as u8;
            v >>= 7;
            if v != 0 {
                byte |= 0x80;
            }
            self.buf.push(byte);
            if v == 0 {
                break;
            }
        }
    }

    /// Sequence length prefix.
    pub fn write_len(&mut self, len: usize) {
        self.write_uleb128(len as u64);
    }

    /// Enum variant index prefix.
    pub fn write_variant(&mut self, index: u32) {
        self.write_uleb128(index as u64);
    }
}

/// Cursor over an input slice.
#[derive(Debug)]
pub struct Decoder<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < n {
            return Err(CodecError::UnexpectedEof);
        }
        let out = &self.input[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_exact(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        let bytes = self.read_exact(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        let bytes = self.read_exact(4)?;
        let mut arr = [0u8; 4];
        arr.copy_from_slice(bytes);
        Ok(u32::from_le_bytes(arr))
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        let bytes = self.read_exact(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(arr))
    }

    pub fn read_u128(&mut self) -> Result<u128, CodecError> {
        let bytes = self.read_exact(16)?;
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(u128::from_le_bytes(arr))
    }

    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::InvalidBool(other)),
        }
    }

    pub fn read_uleb128(&mut self) -> Result<u64, CodecError> {
        let mut value: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = self.read_u8()?;
            if shift == 63 && byte > 1 {
                return Err(CodecError::LengthOverflow(u64::MAX));
            }
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
            if shift > 63 {
                return Err(CodecError::LengthOverflow(u64::MAX));
            }
        }
    }

    /// Sequence length prefix, bounds-checked.
    pub fn read_len(&mut self) -> Result<usize, CodecError> {
        let len = self.read_uleb128()?;
        if len > MAX_SEQUENCE_LENGTH {
            return Err(CodecError::LengthOverflow(len));
        }
        Ok(len as usize)
    }

    /// Enum variant index prefix.
    pub fn read_variant(&mut self) -> Result<u64, CodecError> {
        self.read_uleb128()
    }
}

// Primitive impls

impl Encode for u8 {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_u8(*self);
    }
}

impl Decode for u8 {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        dec.read_u8()
    }
}

impl Encode for u16 {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_u16(*self);
    }
}

impl Decode for u16 {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        dec.read_u16()
    }
}

impl Encode for u32 {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_u32(*self);
    }
}

impl Decode for u32 {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        dec.read_u32()
    }
}

impl Encode for u64 {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_u64(*self);
    }
}

impl Decode for u64 {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        dec.read_u64()
    }
}

impl Encode for u128 {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_u128(*self);
    }
}

impl Decode for u128 {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        dec.read_u128()
    }
}

impl Encode for bool {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_bool(*self);
    }
}

impl Decode for bool {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        dec.read_bool()
    }
}

impl Encode for str {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_len(self.len());
        enc.write_bytes(self.as_bytes());
    }
}

impl Encode for String {
    fn encode(&self, enc: &mut Encoder) {
        self.as_str().encode(enc);
    }
}

impl Decode for String {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        let len = dec.read_len()?;
        let bytes = dec.read_exact(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_len(self.len());
        for item in self {
            item.encode(enc);
        }
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        let len = dec.read_len()?;
        let mut out = Vec::with_capacity(len.min(4096));
        for _ in 0..len {
            out.push(T::decode(dec)?);
        }
        Ok(out)
    }
}

impl<const N: usize> Encode for [u8; N] {
    fn encode(&self, enc: &mut Encoder) {
        enc.write_bytes(self);
    }
}

impl<const N: usize> Decode for [u8; N] {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, CodecError> {
        let bytes = dec.read_exact(N)?;
        let mut arr = [0u8; N];
        arr.copy_from_slice(bytes);
        Ok(arr)
    }
}
