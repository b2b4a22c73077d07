//! Conversions between JSON-RPC hex encodings and arbitrary-precision integers.

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;

use crate::error::{ProbeError, Result};

/// 1 ether = 10^18 wei.
pub const WEI_DECIMALS: u32 = 18;

/// Fractional digits rendered for ether amounts.
pub const ETHER_DISPLAY_DECIMALS: u32 = 6;

fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// Parse a hex quantity (`0x`-prefix optional) of any width.
pub fn decode_hex(s: &str) -> Result<BigUint> {
    let digits = strip_0x(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ProbeError::decode(format!("invalid hex quantity '{}'", s)));
    }
    BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| ProbeError::decode(format!("invalid hex quantity '{}'", s)))
}

/// Render a quantity as `0x`-prefixed lowercase hex without padding.
pub fn encode_hex(n: &BigUint) -> String {
    format!("0x{}", n.to_str_radix(16))
}

/// Parse a hex byte string such as an `eth_getCode` result. `"0x"` is zero bytes.
pub fn decode_bytes(s: &str) -> Result<Vec<u8>> {
    hex::decode(strip_0x(s)).map_err(|e| ProbeError::decode(format!("invalid hex bytes: {}", e)))
}

/// Parse a block height. Heights wider than 64 bits are treated as malformed.
pub fn decode_block_height(s: &str) -> Result<u64> {
    decode_hex(s)?
        .to_u64()
        .ok_or_else(|| ProbeError::decode(format!("block height '{}' exceeds 64 bits", s)))
}

/// Convert wei to ether with exactly six fractional digits.
///
/// The quotient is exact; it is rounded half-to-even at the sixth fractional
/// digit, so `0.0000005` renders as `0.000000` and `0.0000015` as `0.000002`.
pub fn wei_to_ether(wei: &BigUint) -> String {
    let ether = BigDecimal::new(BigInt::from(wei.clone()), WEI_DECIMALS as i64);
    let rounded = ether.with_scale_round(ETHER_DISPLAY_DECIMALS as i64, RoundingMode::HalfEven);

    // Scale is fixed at six, so the unscaled digits are the amount in micro-ether
    let (micros, _) = rounded.as_bigint_and_exponent();
    let unit = BigInt::from(10u32).pow(ETHER_DISPLAY_DECIMALS);
    let whole = &micros / &unit;
    let fraction = (&micros % &unit).to_u32().unwrap_or(0);
    format!(
        "{}.{:0width$}",
        whole,
        fraction,
        width = ETHER_DISPLAY_DECIMALS as usize
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wei(s: &str) -> BigUint {
        s.parse().unwrap()
    }

    #[test]
    fn test_decode_hex() {
        assert_eq!(decode_hex("0x0").unwrap(), BigUint::from(0u32));
        assert_eq!(decode_hex("0x3e8").unwrap(), BigUint::from(1000u32));
        assert_eq!(decode_hex("3E8").unwrap(), BigUint::from(1000u32));
    }

    #[test]
    fn test_decode_hex_wider_than_256_bits() {
        let s = format!("0x1{}", "0".repeat(64));
        let n = decode_hex(&s).unwrap();
        assert_eq!(n, BigUint::from(2u32).pow(256));
    }

    #[test]
    fn test_decode_hex_rejects_garbage() {
        assert!(matches!(decode_hex("0xzz"), Err(ProbeError::Decode(_))));
        assert!(matches!(decode_hex("0x"), Err(ProbeError::Decode(_))));
        assert!(matches!(decode_hex("0x1_0"), Err(ProbeError::Decode(_))));
        assert!(matches!(decode_hex("-0x1"), Err(ProbeError::Decode(_))));
    }

    #[test]
    fn test_encode_hex() {
        assert_eq!(encode_hex(&BigUint::from(0u32)), "0x0");
        assert_eq!(encode_hex(&BigUint::from(1000u32)), "0x3e8");
        assert_eq!(encode_hex(&BigUint::from(255u32)), "0xff");
    }

    #[test]
    fn test_decode_bytes() {
        assert!(decode_bytes("0x").unwrap().is_empty());
        assert_eq!(decode_bytes("0x6080").unwrap(), vec![0x60, 0x80]);
        assert!(decode_bytes("0x608").is_err());
        assert!(decode_bytes("0xgg").is_err());
    }

    #[test]
    fn test_decode_block_height() {
        assert_eq!(decode_block_height("0x3e8").unwrap(), 1000);
        assert!(decode_block_height("0x10000000000000000").is_err());
    }

    #[test]
    fn test_wei_to_ether() {
        assert_eq!(wei_to_ether(&wei("1000000000000000000")), "1.000000");
        assert_eq!(wei_to_ether(&wei("1500000000000000000")), "1.500000");
        assert_eq!(wei_to_ether(&wei("0")), "0.000000");
        assert_eq!(wei_to_ether(&wei("123456789")), "0.000000");
        assert_eq!(
            wei_to_ether(&wei("123456789000000000000000000")),
            "123456789.000000"
        );
    }

    #[test]
    fn test_wei_to_ether_rounds_half_to_even() {
        // 0.0000005 -> down to even
        assert_eq!(wei_to_ether(&wei("500000000000")), "0.000000");
        // 0.0000015 -> up to even
        assert_eq!(wei_to_ether(&wei("1500000000000")), "0.000002");
        // 0.0000025 -> down to even
        assert_eq!(wei_to_ether(&wei("2500000000000")), "0.000002");
        // just over half always rounds up
        assert_eq!(wei_to_ether(&wei("500000000001")), "0.000001");
        // carry into the integer part
        assert_eq!(wei_to_ether(&wei("999999999999999999")), "1.000000");
    }
}
