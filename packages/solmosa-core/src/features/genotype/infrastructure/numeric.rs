//! 256-bit helpers for fixed-width ABI integers

use alloy_primitives::{I256, U256};
use rand::Rng;

/// Low `bits` bits set
pub fn width_mask(bits: u16) -> U256 {
    if bits >= 256 {
        U256::MAX
    } else {
        (U256::from(1u8) << bits as usize) - U256::from(1u8)
    }
}

pub fn uint_max(bits: u16) -> U256 {
    width_mask(bits)
}

pub fn int_max(bits: u16) -> I256 {
    I256::from_raw(width_mask(bits.saturating_sub(1)))
}

pub fn int_min(bits: u16) -> I256 {
    I256::from_raw(!width_mask(bits.saturating_sub(1)))
}

pub fn uint_fits(value: I256, bits: u16) -> bool {
    !value.is_negative() && value.into_raw() <= uint_max(bits)
}

pub fn int_fits(value: I256, bits: u16) -> bool {
    value >= int_min(bits) && value <= int_max(bits)
}

fn random_word<R: Rng + ?Sized>(rng: &mut R) -> U256 {
    U256::from_limbs([rng.gen(), rng.gen(), rng.gen(), rng.gen()])
}

/// Uniform over `[0, 2^bits)`
pub fn random_uint<R: Rng + ?Sized>(rng: &mut R, bits: u16) -> U256 {
    random_word(rng) & width_mask(bits)
}

/// Uniform over `[-2^(bits-1), 2^(bits-1))`
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, bits: u16) -> I256 {
    let mask = width_mask(bits);
    let raw = random_word(rng) & mask;
    let sign_bit = U256::from(1u8) << (bits.saturating_sub(1) as usize);
    if raw & sign_bit != U256::ZERO {
        I256::from_raw(raw | !mask)
    } else {
        I256::from_raw(raw)
    }
}

/// Uniform over `[0, max]`
pub fn random_u256_inclusive<R: Rng + ?Sized>(rng: &mut R, max: U256) -> U256 {
    if max == U256::MAX {
        return random_word(rng);
    }
    let mask = width_mask(max.bit_len() as u16);
    loop {
        let candidate = random_word(rng) & mask;
        if candidate <= max {
            return candidate;
        }
    }
}

/// Lossy conversion, exact up to 2^53
pub fn u256_to_f64(value: U256) -> f64 {
    value
        .as_limbs()
        .iter()
        .rev()
        .fold(0.0, |acc, &limb| acc * 18_446_744_073_709_551_616.0 + limb as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_ranges() {
        assert_eq!(uint_max(8), U256::from(255u64));
        assert_eq!(uint_max(256), U256::MAX);
        assert_eq!(int_max(8), I256::from_dec_str("127").unwrap());
        assert_eq!(int_min(8), I256::from_dec_str("-128").unwrap());
        assert_eq!(int_max(256), I256::MAX);
        assert_eq!(int_min(256), I256::MIN);
    }

    #[test]
    fn test_fits() {
        let v = I256::from_dec_str("300").unwrap();
        assert!(!uint_fits(v, 8));
        assert!(uint_fits(v, 16));
        assert!(!uint_fits(I256::from_dec_str("-1").unwrap(), 256));
        assert!(int_fits(I256::from_dec_str("-128").unwrap(), 8));
        assert!(!int_fits(I256::from_dec_str("128").unwrap(), 8));
    }

    #[test]
    fn test_random_values_respect_width() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert!(random_uint(&mut rng, 16) <= uint_max(16));
            assert!(int_fits(random_int(&mut rng, 8), 8));
            assert!(random_u256_inclusive(&mut rng, U256::from(10u64)) <= U256::from(10u64));
        }
        assert_eq!(random_u256_inclusive(&mut rng, U256::ZERO), U256::ZERO);
    }

    #[test]
    fn test_u256_to_f64() {
        assert_eq!(u256_to_f64(U256::from(12345u64)), 12345.0);
        assert_eq!(u256_to_f64(U256::from(1u8) << 64), 18_446_744_073_709_551_616.0);
    }
}
