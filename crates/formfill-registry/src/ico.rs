//! Company identifier (IČO) sanitising and checksum.

/// Number of digits in a company identifier.
pub const ICO_LEN: usize = 8;

/// Strips everything but digits and truncates to [`ICO_LEN`].
#[must_use]
pub fn sanitize_ico(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(ICO_LEN)
        .collect()
}

/// Weighted mod-11 check of an 8-digit identifier.
///
/// The first seven digits are weighted 8 down to 2; the check digit is
/// `11 - (sum mod 11)` with 10 mapped to 0 and 11 mapped to 1, and must equal
/// the eighth digit.
#[must_use]
pub fn is_valid_ico(ico: &str) -> bool {
    let bytes = ico.as_bytes();
    if bytes.len() != ICO_LEN || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }
    let digits: Vec<u32> = bytes.iter().map(|b| u32::from(b - b'0')).collect();
    let sum: u32 = digits[..7]
        .iter()
        .zip((2..=8).rev())
        .map(|(d, w)| d * w)
        .sum();
    let check = match 11 - sum % 11 {
        10 => 0,
        11 => 1,
        c => c,
    };
    check == digits[7]
}
