/// Converts a packed BCD byte to its binary value.
///
/// Each tens digit sits in a nibble weighted 16 instead of 10, so the raw
/// value overcounts by 6 per tens digit. Only meaningful when both nibbles
/// are 0-9; other input gives an unspecified (but non-panicking) result.
pub fn decode_bcd(bcd: u8) -> u8 {
    bcd - 6 * (bcd >> 4)
}

/// Converts a binary value in 0..=99 to packed BCD.
///
/// Values above 99 give an unspecified result.
pub fn encode_bcd(val: u8) -> u8 {
    val.wrapping_add(6u8.wrapping_mul(val / 10))
}
