//! Bit-field packing on 64-bit command words.
//!
//! Every MC command parameter lives at a fixed `(word, offset, width)`
//! position. These primitives touch exactly one word per call; fields that span
//! two words are written as two calls by the command that defines them.
//!
//! ```text
//!  63                    offset+width    offset                 0
//! ┌───────────────────────┬─────────────┬───────────────────────┐
//! │       untouched       │    field    │       untouched       │
//! └───────────────────────┴─────────────┴───────────────────────┘
//! ```
//!
//! Values are truncated to `width` bits when packed and zero-extended when
//! unpacked. [`unpack_signed`] sign-extends from the top bit of the field.
//!
//! An `offset`/`width` pair that does not fit in the word is a caller bug and
//! trips a debug assertion.

/// Width of a command word in bits.
pub const WORD_BITS: u32 = u64::BITS;

/// Returns a mask with the low `width` bits set.
#[inline]
pub const fn mask(width: u32) -> u64 {
    if width >= WORD_BITS {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Returns `true` if a field at `offset` with `width` bits fits in one word.
#[inline]
pub const fn fits(offset: u32, width: u32) -> bool {
    width > 0 && width <= WORD_BITS && offset < WORD_BITS && offset + width <= WORD_BITS
}

/// Shifts `value`, truncated to `width` bits, into position `offset`.
///
/// This is the pure form of [`pack`]: the result only has bits set inside the
/// field, so it can be OR-ed into a zeroed word.
#[inline]
pub const fn encode(offset: u32, width: u32, value: u64) -> u64 {
    debug_assert!(fits(offset, width), "field does not fit in a command word");
    (value & mask(width)).wrapping_shl(offset)
}

/// Writes `value` into bits `offset..offset + width` of `word`.
///
/// Bits outside the field are preserved. Bits of `value` above `width` are
/// discarded.
#[inline]
pub fn pack(word: &mut u64, offset: u32, width: u32, value: u64) {
    debug_assert!(fits(offset, width), "field does not fit in a command word");
    let field_mask = mask(width).wrapping_shl(offset);
    *word = (*word & !field_mask) | (value.wrapping_shl(offset) & field_mask);
}

/// Reads bits `offset..offset + width` of `word`, zero-extended.
#[inline]
pub const fn unpack(word: u64, offset: u32, width: u32) -> u64 {
    debug_assert!(fits(offset, width), "field does not fit in a command word");
    word.wrapping_shr(offset) & mask(width)
}

/// Reads bits `offset..offset + width` of `word`, sign-extended from the
/// field's top bit.
#[inline]
pub const fn unpack_signed(word: u64, offset: u32, width: u32) -> i64 {
    let raw = unpack(word, offset, width);
    let shift = WORD_BITS - width;
    ((raw << shift) as i64) >> shift
}

/// Writes `bytes` one byte per 8-bit field, little-endian, across consecutive
/// words starting at `words[0]` bit 0.
///
/// Used for the fixed-length strings (object types, labels) carried in MC
/// commands. Bytes beyond `words.len() * 8` are ignored.
pub fn pack_bytes(words: &mut [u64], bytes: &[u8]) {
    for (i, byte) in bytes.iter().enumerate().take(words.len() * 8) {
        pack(&mut words[i / 8], (i % 8) as u32 * 8, 8, u64::from(*byte));
    }
}

/// Reads `N` bytes laid out by [`pack_bytes`].
pub fn unpack_bytes<const N: usize>(words: &[u64]) -> [u8; N] {
    let mut out = [0u8; N];
    for (i, byte) in out.iter_mut().enumerate().take(words.len() * 8) {
        *byte = unpack(words[i / 8], (i % 8) as u32 * 8, 8) as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_pack_single_bit() {
        let mut word = 0;
        pack(&mut word, 63, 1, 1);
        assert_eq!(word, 1 << 63);
        assert_eq!(unpack(word, 63, 1), 1);
    }

    #[test]
    fn test_pack_full_word() {
        let mut word = 0x1234;
        pack(&mut word, 0, 64, 0xDEAD_BEEF_CAFE_F00D);
        assert_eq!(word, 0xDEAD_BEEF_CAFE_F00D);
        assert_eq!(unpack(word, 0, 64), 0xDEAD_BEEF_CAFE_F00D);
    }

    #[test]
    fn test_pack_truncates_to_width() {
        let mut word = 0;
        pack(&mut word, 8, 4, 0xFF);
        assert_eq!(word, 0xF00);
    }

    #[test]
    fn test_pack_overwrites_previous_value() {
        let mut word = 0;
        pack(&mut word, 32, 16, 0xFFFF);
        pack(&mut word, 32, 16, 0x1234);
        assert_eq!(unpack(word, 32, 16), 0x1234);
        assert_eq!(word, 0x1234 << 32);
    }

    #[test]
    fn test_encode_matches_pack_on_zero_word() {
        let mut word = 0;
        pack(&mut word, 52, 12, 0x805);
        assert_eq!(word, encode(52, 12, 0x805));
    }

    #[test]
    fn test_unpack_signed() {
        let mut word = 0;
        pack(&mut word, 0, 32, (-13i32) as u32 as u64);
        assert_eq!(unpack_signed(word, 0, 32), -13);
        assert_eq!(unpack(word, 0, 32), 0xFFFF_FFF3);

        pack(&mut word, 40, 8, 0x7F);
        assert_eq!(unpack_signed(word, 40, 8), 127);
    }

    #[test]
    fn test_bytes_layout() {
        let mut words = [0u64; 2];
        pack_bytes(&mut words, b"dpni");
        assert_eq!(words[0], 0x696E_7064);
        assert_eq!(words[1], 0);

        let back: [u8; 16] = unpack_bytes(&words);
        assert_eq!(&back[..4], b"dpni");
        assert!(back[4..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_bytes_spanning_two_words() {
        let mut words = [0u64; 2];
        pack_bytes(&mut words, b"0123456789");
        assert_eq!(unpack(words[0], 56, 8), u64::from(b'7'));
        assert_eq!(unpack(words[1], 0, 8), u64::from(b'8'));
        assert_eq!(unpack(words[1], 8, 8), u64::from(b'9'));
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_pack_out_of_range_panics_in_debug() {
        let mut word = 0;
        pack(&mut word, 60, 8, 0);
    }

    fn field() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=64).prop_flat_map(|width| (0..=(64 - width), Just(width)))
    }

    proptest! {
        #[test]
        fn prop_round_trip((offset, width) in field(), value: u64, initial: u64) {
            let value = value & mask(width);
            let mut word = initial;
            pack(&mut word, offset, width, value);
            prop_assert_eq!(unpack(word, offset, width), value);
        }

        #[test]
        fn prop_outside_bits_untouched((offset, width) in field(), value: u64, initial: u64) {
            let mut word = initial;
            pack(&mut word, offset, width, value);
            let outside = !(mask(width) << offset);
            prop_assert_eq!(word & outside, initial & outside);
        }
    }
}
