//! Sample word packing for the I2S transmitter
//!
//! The sink consumes 16-bit words, low word first, left channel first.
//! A 24-bit sample travels left-justified in a 32-bit slot.

/// Pack a 16-bit sample into one word.
#[inline]
pub fn pack_16(sample: i32) -> u16 {
    (sample & 0xFFFF) as u16
}

/// Pack a 24-bit sample left-justified into a 32-bit slot.
///
/// Returns `[low, high]`.
#[inline]
pub fn pack_24(sample: i32) -> [u16; 2] {
    // Bits above 24 fall off the top of the slot
    let shifted = sample.wrapping_shl(8);
    [(shifted & 0xFFFF) as u16, ((shifted >> 16) & 0xFFFF) as u16]
}

/// Pack a full-width 32-bit sample.
///
/// Returns `[low, high]`.
#[inline]
pub fn pack_32(sample: i32) -> [u16; 2] {
    [(sample & 0xFFFF) as u16, ((sample >> 16) & 0xFFFF) as u16]
}

/// Recover a 24-bit sample from its slot words (sign-extending).
#[inline]
pub fn unpack_24(words: [u16; 2]) -> i32 {
    unpack_32(words) >> 8
}

/// Recover a 32-bit sample from its slot words.
#[inline]
pub fn unpack_32(words: [u16; 2]) -> i32 {
    (((words[1] as u32) << 16) | words[0] as u32) as i32
}

/// View a word buffer as the bytes handed to the sink.
///
/// Native byte order, matching how the DMA engine reads the words.
#[inline]
pub fn as_bytes(words: &[u16]) -> &[u8] {
    bytemuck::cast_slice(words)
}
