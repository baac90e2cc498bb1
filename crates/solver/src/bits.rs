/// Position of the `n`-th (zero-based) set bit of `value`, or 64 when
/// `value` has `n` or fewer bits set.
#[inline]
pub fn nth_bit_set(value: u64, n: u32) -> u32 {
    if n >= value.count_ones() {
        return 64;
    }
    #[cfg(target_arch = "x86_64")]
    {
        if std::arch::is_x86_feature_detected!("bmi2") {
            // SAFETY: the running CPU supports BMI2.
            return unsafe { nth_bit_set_bmi2(value, n) };
        }
    }
    nth_bit_set_portable(value, n)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "bmi2")]
unsafe fn nth_bit_set_bmi2(value: u64, n: u32) -> u32 {
    std::arch::x86_64::_pdep_u64(1u64 << n, value).trailing_zeros()
}

/// Binary search over popcounts of shrinking masks.
pub fn nth_bit_set_portable(value: u64, n: u32) -> u32 {
    if n >= value.count_ones() {
        return 64;
    }
    let target = n + 1;
    let mut mask: u64 = 0x0000_0000_FFFF_FFFF;
    let mut size = 32;
    let mut base = 0;
    while size > 0 {
        let count = (value & mask).count_ones();
        if target > count {
            base += size;
            size >>= 1;
            mask |= mask << size;
        } else {
            size >>= 1;
            mask >>= size;
        }
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(value: u64, n: u32) -> u32 {
        let mut rest = value;
        for _ in 0..n {
            if rest == 0 {
                return 64;
            }
            rest &= rest - 1;
        }
        if rest == 0 {
            64
        } else {
            rest.trailing_zeros()
        }
    }

    #[test]
    fn agrees_with_clearing_low_bits() {
        let samples = [
            0u64,
            1,
            0b1010,
            1 << 40,
            1 << 63,
            u64::MAX,
            0xDEAD_BEEF_0123_4567,
            0x8000_0000_0000_0001,
            0x0F0F_F0F0_AAAA_5555,
        ];
        for value in samples {
            for n in 0..=64 {
                assert_eq!(nth_bit_set_portable(value, n), naive(value, n), "{value:#x} {n}");
                assert_eq!(nth_bit_set(value, n), naive(value, n), "{value:#x} {n}");
            }
        }
    }
}
