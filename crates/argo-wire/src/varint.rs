//! Zig-zag LEB128 signed varints.
//!
//! Zig-zag folds the sign into the low bit so that small magnitudes of either
//! sign (including the negative label sentinels) fit in one byte.

/// Longest encoding of a 64-bit value.
pub const MAX_VARINT_LEN: usize = 10;

/// Why a varint could not be read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarIntError {
    /// Input ended in the middle of a varint.
    Truncated,
    /// More than 64 bits of payload.
    Overflow,
}

#[inline]
pub fn zigzag(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

#[inline]
pub fn unzigzag(u: u64) -> i64 {
    ((u >> 1) as i64) ^ -((u & 1) as i64)
}

/// Append the encoding of `n` to `out`.
pub fn write_varint(out: &mut Vec<u8>, n: i64) {
    let mut u = zigzag(n);
    while u >= 0x80 {
        out.push((u as u8) | 0x80);
        u >>= 7;
    }
    out.push(u as u8);
}

/// Number of bytes `write_varint` produces for `n`.
pub fn varint_len(n: i64) -> usize {
    let bits = 64 - zigzag(n).leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Decode a varint from the start of `bytes`.
///
/// Returns the value and the number of bytes consumed.
pub fn read_varint(bytes: &[u8]) -> Result<(i64, usize), VarIntError> {
    let mut result: u64 = 0;
    for (i, &byte) in bytes.iter().enumerate().take(MAX_VARINT_LEN) {
        let payload = (byte & 0x7F) as u64;
        // the tenth byte may only carry the top bit of the value
        if i == MAX_VARINT_LEN - 1 && payload > 1 {
            return Err(VarIntError::Overflow);
        }
        result |= payload << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((unzigzag(result), i + 1));
        }
    }
    if bytes.len() >= MAX_VARINT_LEN {
        Err(VarIntError::Overflow)
    } else {
        Err(VarIntError::Truncated)
    }
}
