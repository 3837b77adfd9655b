//! IMEI check-digit validation.
//!
//! An IMEI is 15 decimal digits whose last digit is a Luhn check digit:
//! every digit at an odd 0-based position is doubled (folding values above 9
//! by subtracting 9) and the total must be a multiple of 10.

pub const IMEI_LENGTH: usize = 15;

/// Returns `true` when `s` is exactly 15 ASCII digits with a valid check digit.
///
/// Never fails; anything malformed is simply invalid.
pub fn is_valid_imei(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != IMEI_LENGTH || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }

    let sum: u32 = bytes
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}
