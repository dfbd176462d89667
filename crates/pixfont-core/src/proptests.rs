// this_file: crates/pixfont-core/src/proptests.rs

use crate::cursor::BitCursor;
use crate::fixed::Fixed16;
use proptest::prelude::*;

// Property: scaled boundaries of consecutive indices never go backwards
proptest! {
    #[test]
    fn prop_scale_monotonic(raw in 1i32..(64 << 16), n in 0i32..2048) {
        let s = Fixed16::from_raw(raw);
        let mut prev = s.scale(0);
        prop_assert_eq!(prev, 0);
        for i in 1..=n.min(256) {
            let next = s.scale(i);
            prop_assert!(next >= prev, "boundary {} went from {} to {}", i, prev, next);
            prev = next;
        }
    }
}

// Property: integral products are exact
proptest! {
    #[test]
    fn prop_scale_exact_for_integers(k in 1i32..32, n in -4096i32..4096) {
        prop_assert_eq!(Fixed16::from_int(k).scale(n), n * k);
    }
}

// Property: adjacent spans tile the scaled extent without gaps
proptest! {
    #[test]
    fn prop_spans_tile(raw in 1i32..(8 << 16), widths in prop::collection::vec(0i32..16, 1..12)) {
        let s = Fixed16::from_raw(raw);
        let mut j = 0;
        let mut covered = 0;
        for w in &widths {
            let x0 = s.scale(j);
            j += w;
            covered += s.scale(j) - x0;
        }
        prop_assert_eq!(covered, s.scale(j));
    }
}

// Property: reading fields of arbitrary widths reassembles the input bits
proptest! {
    #[test]
    fn prop_bit_cursor_reassembles(data in prop::collection::vec(any::<u8>(), 1..16),
                                   widths in prop::collection::vec(1u8..=24, 1..24)) {
        let total_bits = data.len() * 8;
        let mut cursor = BitCursor::new(&data);
        let mut offset = 0usize;
        for w in widths {
            let w = w as usize;
            if offset + w > total_bits {
                break;
            }
            let value = cursor.read_unsigned(w as u8);
            for bit in 0..w {
                let src = offset + bit;
                let expected = (data[src / 8] >> (src % 8)) & 1;
                prop_assert_eq!(((value >> bit) & 1) as u8, expected);
            }
            offset += w;
            prop_assert_eq!(cursor.byte_pos() * 8 + cursor.bit_pos() as usize, offset);
        }
    }
}

// Property: signed reads are the unsigned value minus the bias
proptest! {
    #[test]
    fn prop_signed_is_biased_unsigned(data in prop::collection::vec(any::<u8>(), 4), w in 1u8..=16) {
        let mut a = BitCursor::new(&data);
        let mut b = BitCursor::new(&data);
        prop_assert_eq!(a.read_signed(w), b.read_unsigned(w) as i32 - (1 << (w - 1)));
    }
}
