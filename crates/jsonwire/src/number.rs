//! Integer digit-length and digit-emission primitives.
//!
//! The writer works in two phases: measure the exact decimal length of a
//! value, request a span of exactly that many bytes, and fill it. Length is
//! a cascade of threshold comparisons, one branch per digit of magnitude;
//! emission fills the span back to front, one constant-divisor multiply per
//! digit. Work is proportional to digit count, never to the value's
//! magnitude.
//!
//! Values up to 32 bits run in `u32` arithmetic; only the 64-bit widths pay
//! for `u64` division.

/// Exact decimal digit count of `value`.
pub(crate) fn decimal_len_u32(value: u32) -> usize {
    if value < 10 {
        1
    } else if value < 100 {
        2
    } else if value < 1_000 {
        3
    } else if value < 10_000 {
        4
    } else if value < 100_000 {
        5
    } else if value < 1_000_000 {
        6
    } else if value < 10_000_000 {
        7
    } else if value < 100_000_000 {
        8
    } else if value < 1_000_000_000 {
        9
    } else {
        10
    }
}

/// Exact decimal digit count of `value`.
pub(crate) fn decimal_len_u64(value: u64) -> usize {
    if let Ok(small) = u32::try_from(value) {
        return decimal_len_u32(small);
    }
    if value < 10_000_000_000 {
        10
    } else if value < 100_000_000_000 {
        11
    } else if value < 1_000_000_000_000 {
        12
    } else if value < 10_000_000_000_000 {
        13
    } else if value < 100_000_000_000_000 {
        14
    } else if value < 1_000_000_000_000_000 {
        15
    } else if value < 10_000_000_000_000_000 {
        16
    } else if value < 100_000_000_000_000_000 {
        17
    } else if value < 1_000_000_000_000_000_000 {
        18
    } else if value < 10_000_000_000_000_000_000 {
        19
    } else {
        20
    }
}

/// Fills `dst` with the decimal digits of `value`, back to front.
///
/// `dst` must be exactly `decimal_len_u32(value)` bytes; the divisors are
/// constants, so each step compiles to a multiply-shift rather than a
/// hardware divide.
pub(crate) fn write_decimal_u32(mut value: u32, dst: &mut [u8]) {
    debug_assert_eq!(dst.len(), decimal_len_u32(value));
    let mut at = dst.len();
    loop {
        at -= 1;
        dst[at] = b'0' + (value % 10) as u8;
        value /= 10;
        if at == 0 {
            break;
        }
    }
    debug_assert_eq!(value, 0);
}

/// Fills `dst` with the decimal digits of `value`, back to front.
///
/// `dst` must be exactly `decimal_len_u64(value)` bytes.
pub(crate) fn write_decimal_u64(mut value: u64, dst: &mut [u8]) {
    debug_assert_eq!(dst.len(), decimal_len_u64(value));
    let mut at = dst.len();
    loop {
        at -= 1;
        dst[at] = b'0' + (value % 10) as u8;
        value /= 10;
        if at == 0 {
            break;
        }
    }
    debug_assert_eq!(value, 0);
}

/// Maximum decimal digit count for each integer width, excluding any sign.
pub(crate) mod max_digits {
    pub(crate) const U8: usize = 3;
    pub(crate) const U16: usize = 5;
    pub(crate) const U32: usize = 10;
    pub(crate) const U64: usize = 20;
    pub(crate) const I8: usize = 3;
    pub(crate) const I16: usize = 5;
    pub(crate) const I32: usize = 10;
    pub(crate) const I64: usize = 19;
}

#[cfg(test)]
mod tests {
    use paste::paste;
    use rstest::rstest;

    use super::{decimal_len_u32, decimal_len_u64, write_decimal_u32, write_decimal_u64};

    fn rendered_u32(value: u32) -> Vec<u8> {
        let mut buf = vec![0u8; decimal_len_u32(value)];
        write_decimal_u32(value, &mut buf);
        buf
    }

    fn rendered_u64(value: u64) -> Vec<u8> {
        let mut buf = vec![0u8; decimal_len_u64(value)];
        write_decimal_u64(value, &mut buf);
        buf
    }

    #[rstest]
    #[case(0, 1)]
    #[case(9, 1)]
    #[case(10, 2)]
    #[case(99, 2)]
    #[case(100, 3)]
    #[case(999_999_999, 9)]
    #[case(1_000_000_000, 10)]
    #[case(u32::MAX, 10)]
    fn u32_length_boundaries(#[case] value: u32, #[case] expected: usize) {
        assert_eq!(decimal_len_u32(value), expected);
        assert_eq!(expected, value.to_string().len());
    }

    #[rstest]
    #[case(u64::from(u32::MAX) + 1, 10)]
    #[case(9_999_999_999, 10)]
    #[case(10_000_000_000, 11)]
    #[case(9_999_999_999_999_999_999, 19)]
    #[case(10_000_000_000_000_000_000, 20)]
    #[case(u64::MAX, 20)]
    fn u64_length_boundaries(#[case] value: u64, #[case] expected: usize) {
        assert_eq!(decimal_len_u64(value), expected);
        assert_eq!(expected, value.to_string().len());
    }

    #[test]
    fn every_digit_count_boundary_matches_display() {
        let mut boundary = 1u64;
        for _ in 0..19 {
            for value in [boundary - 1, boundary, boundary + 1] {
                assert_eq!(decimal_len_u64(value), value.to_string().len(), "value {value}");
                assert_eq!(rendered_u64(value), value.to_string().into_bytes());
            }
            boundary *= 10;
        }
        assert_eq!(rendered_u64(u64::MAX), u64::MAX.to_string().into_bytes());
    }

    #[test]
    fn digits_render_exactly() {
        assert_eq!(rendered_u32(0), b"0");
        assert_eq!(rendered_u32(7), b"7");
        assert_eq!(rendered_u32(1_234_567_890), b"1234567890");
        assert_eq!(rendered_u64(18_446_744_073_709_551_615), b"18446744073709551615");
    }

    macro_rules! width_extremes {
        ($($ty:ident),*) => {
            $(
                paste! {
                    #[test]
                    fn [<$ty _extremes_match_display>]() {
                        for value in [$ty::MIN, $ty::MAX, 0, 1] {
                            let unsigned = u64::from(value.unsigned_abs());
                            let mut text = Vec::new();
                            if value < 0 {
                                text.push(b'-');
                            }
                            let mut digits = vec![0u8; decimal_len_u64(unsigned)];
                            write_decimal_u64(unsigned, &mut digits);
                            text.extend_from_slice(&digits);
                            assert_eq!(text, value.to_string().into_bytes());
                        }
                    }
                }
            )*
        };
    }

    width_extremes!(i8, i16, i32, i64);
}
