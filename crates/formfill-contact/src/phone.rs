//! Phone number checks against the Czech and Slovak numbering plans.
//!
//! Only the national significant number (NSN) is validated: the digits the
//! customer types after the dial code chosen in the country picker. It must
//! be exactly nine digits and fall into a known range of the selected plan.

use std::fmt;

/// Digits in a national significant number for both supported plans.
pub const NSN_LEN: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialPlan {
    /// +420
    Czech,
    /// +421
    Slovak,
}

impl DialPlan {
    /// Resolves a dial code (digits only, no `+`) to a supported plan.
    #[must_use]
    pub fn from_dial_code(code: &str) -> Option<Self> {
        match code {
            "420" => Some(Self::Czech),
            "421" => Some(Self::Slovak),
            _ => None,
        }
    }

    #[must_use]
    pub fn dial_code(self) -> &'static str {
        match self {
            Self::Czech => "420",
            Self::Slovak => "421",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberCategory {
    TollFree,
    Premium,
    /// Shared-cost and other non-geographic services.
    Service,
    Fixed,
    Mobile,
    /// Voice over IP / nomadic numbers.
    Voip,
    Unknown,
}

impl fmt::Display for NumberCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TollFree => "toll-free",
            Self::Premium => "premium",
            Self::Service => "service",
            Self::Fixed => "fixed",
            Self::Mobile => "mobile",
            Self::Voip => "voip",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Outcome of [`check_phone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneCheck {
    Valid(NumberCategory),
    /// The NSN is not exactly [`NSN_LEN`] digits.
    WrongLength,
    /// No dial code selected, or one outside the supported plans.
    UnsupportedDialCode,
    /// Nine digits under a supported plan but no known range matches.
    UnknownRange,
}

impl PhoneCheck {
    #[must_use]
    pub fn is_valid(self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Strips everything but ASCII digits.
#[must_use]
pub fn national_number(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Classifies a nine-digit NSN under `plan`. Anything that is not exactly
/// nine ASCII digits is [`NumberCategory::Unknown`].
#[must_use]
pub fn classify(plan: DialPlan, nsn: &str) -> NumberCategory {
    let Ok(digits) = <&[u8; NSN_LEN]>::try_from(nsn.as_bytes()) else {
        return NumberCategory::Unknown;
    };
    if !digits.iter().all(u8::is_ascii_digit) {
        return NumberCategory::Unknown;
    }
    match plan {
        DialPlan::Czech => classify_czech(digits),
        DialPlan::Slovak => classify_slovak(digits),
    }
}

// Arm order matters: earlier, narrower ranges win.
fn classify_czech(d: &[u8; NSN_LEN]) -> NumberCategory {
    match d {
        [b'8', b'0', b'0', ..] => NumberCategory::TollFree,
        [b'9', b'0', ..] => NumberCategory::Premium,
        [b'2'..=b'5', ..] => NumberCategory::Fixed,
        [b'6', b'0', b'1'..=b'8', ..]
        | [b'7', b'0', b'2'..=b'9', ..]
        | [b'7', b'2' | b'3' | b'7' | b'9', ..] => NumberCategory::Mobile,
        [b'9', b'1' | b'5', ..] => NumberCategory::Voip,
        [b'8', ..] => NumberCategory::Service,
        _ => NumberCategory::Unknown,
    }
}

fn classify_slovak(d: &[u8; NSN_LEN]) -> NumberCategory {
    match d {
        [b'8', b'0', b'0', ..] => NumberCategory::TollFree,
        [b'9', b'0', ..] => NumberCategory::Premium,
        [b'2'..=b'5', ..] => NumberCategory::Fixed,
        [b'9', ..] => NumberCategory::Mobile,
        [b'8', ..] => NumberCategory::Service,
        _ => NumberCategory::Unknown,
    }
}

/// Validates the raw phone field value against the selected dial code.
///
/// `dial_code` is the picker's current selection, digits only; `None` means
/// nothing is selected.
#[must_use]
pub fn check_phone(raw: &str, dial_code: Option<&str>) -> PhoneCheck {
    let nsn = national_number(raw);
    if nsn.len() != NSN_LEN {
        return PhoneCheck::WrongLength;
    }
    let Some(plan) = dial_code.and_then(DialPlan::from_dial_code) else {
        return PhoneCheck::UnsupportedDialCode;
    };
    match classify(plan, &nsn) {
        NumberCategory::Unknown => PhoneCheck::UnknownRange,
        category => PhoneCheck::Valid(category),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn czech_mobile_validates() {
        assert_eq!(
            check_phone("601234567", Some("420")),
            PhoneCheck::Valid(NumberCategory::Mobile)
        );
        assert_eq!(
            check_phone("+420 777 123 456", Some("420")),
            PhoneCheck::WrongLength
        );
        assert_eq!(
            check_phone("777 123 456", Some("420")),
            PhoneCheck::Valid(NumberCategory::Mobile)
        );
    }

    #[test]
    fn czech_number_outside_known_ranges_fails() {
        assert_eq!(check_phone("123456789", Some("420")), PhoneCheck::UnknownRange);
        assert_eq!(check_phone("600123456", Some("420")), PhoneCheck::UnknownRange);
        assert_eq!(check_phone("701123456", Some("420")), PhoneCheck::UnknownRange);
    }

    #[test]
    fn unsupported_dial_code_fails_regardless_of_digits() {
        for nsn in ["601234567", "221234567", "800123456"] {
            assert_eq!(check_phone(nsn, Some("49")), PhoneCheck::UnsupportedDialCode);
            assert_eq!(check_phone(nsn, Some("1")), PhoneCheck::UnsupportedDialCode);
            assert_eq!(check_phone(nsn, None), PhoneCheck::UnsupportedDialCode);
        }
    }

    #[test]
    fn length_is_checked_before_dial_code() {
        assert_eq!(check_phone("60123456", Some("420")), PhoneCheck::WrongLength);
        assert_eq!(check_phone("6012345678", None), PhoneCheck::WrongLength);
        assert_eq!(check_phone("", Some("421")), PhoneCheck::WrongLength);
    }

    #[test]
    fn czech_ranges() {
        let cases = [
            ("800123456", NumberCategory::TollFree),
            ("906123456", NumberCategory::Premium),
            ("221234567", NumberCategory::Fixed),
            ("567123456", NumberCategory::Fixed),
            ("608123456", NumberCategory::Mobile),
            ("702123456", NumberCategory::Mobile),
            ("731123456", NumberCategory::Mobile),
            ("910123456", NumberCategory::Voip),
            ("951123456", NumberCategory::Voip),
            ("841123456", NumberCategory::Service),
            ("971123456", NumberCategory::Unknown),
        ];
        for (nsn, expected) in cases {
            assert_eq!(classify(DialPlan::Czech, nsn), expected, "{nsn}");
        }
    }

    #[test]
    fn slovak_ranges() {
        let cases = [
            ("800123456", NumberCategory::TollFree),
            ("900123456", NumberCategory::Premium),
            ("232123456", NumberCategory::Fixed),
            ("905123456", NumberCategory::Premium),
            ("915123456", NumberCategory::Mobile),
            ("850123456", NumberCategory::Service),
            ("601234567", NumberCategory::Unknown),
        ];
        for (nsn, expected) in cases {
            assert_eq!(classify(DialPlan::Slovak, nsn), expected, "{nsn}");
        }
    }

    #[test]
    fn classify_rejects_non_digit_input() {
        assert_eq!(classify(DialPlan::Czech, "60123456x"), NumberCategory::Unknown);
        assert_eq!(classify(DialPlan::Czech, "60123"), NumberCategory::Unknown);
    }
}
