//! ASCII character classification
//!
//! Total over the whole `u8` domain; bytes outside the tested classes pass
//! through unchanged or are rejected.

/// Fold an ASCII upper-case letter to lower case
pub const fn to_lower(c: u8) -> u8 {
    if c.is_ascii_uppercase() {
        c + 32
    } else {
        c
    }
}

/// Fold an ASCII lower-case letter to upper case
pub const fn to_upper(c: u8) -> u8 {
    if c.is_ascii_lowercase() {
        c - 32
    } else {
        c
    }
}

/// `[0-9]`
pub const fn is_decimal_digit(c: u8) -> bool {
    matches!(c, b'0'..=b'9')
}

/// `[0-1]`
pub const fn is_binary_digit(c: u8) -> bool {
    matches!(c, b'0' | b'1')
}

/// `[0-9a-fA-F]`
pub const fn is_hex_digit(c: u8) -> bool {
    matches!(c, b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F')
}

/// Numeric value of a hexadecimal digit, or `None` for any other byte
pub const fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Numeric base selected by an integer prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Radix {
    Binary,
    Decimal,
    Hexadecimal,
}

impl Radix {
    /// Select a base from the (case-folded) byte after a leading `0`
    pub const fn from_prefix(c: u8) -> Option<Self> {
        match to_lower(c) {
            b'b' => Some(Radix::Binary),
            b'x' => Some(Radix::Hexadecimal),
            _ => None,
        }
    }

    pub const fn base(self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Decimal => 10,
            Radix::Hexadecimal => 16,
        }
    }

    /// Value of `c` as a digit of this base
    pub const fn digit(self, c: u8) -> Option<u8> {
        let valid = match self {
            Radix::Binary => is_binary_digit(c),
            Radix::Decimal => is_decimal_digit(c),
            Radix::Hexadecimal => is_hex_digit(c),
        };
        if valid {
            hex_value(c)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_folding() {
        assert_eq!(to_lower(b'A'), b'a');
        assert_eq!(to_lower(b'Z'), b'z');
        assert_eq!(to_lower(b'a'), b'a');
        assert_eq!(to_upper(b'q'), b'Q');
        assert_eq!(to_upper(b'Q'), b'Q');
    }

    #[test]
    fn test_case_folding_passes_non_letters() {
        for c in 0..=255u8 {
            if !c.is_ascii_alphabetic() {
                assert_eq!(to_lower(c), c);
                assert_eq!(to_upper(c), c);
            }
        }
        // Neighbours of the letter ranges
        assert_eq!(to_lower(b'@'), b'@');
        assert_eq!(to_lower(b'['), b'[');
        assert_eq!(to_upper(b'`'), b'`');
        assert_eq!(to_upper(b'{'), b'{');
    }

    #[test]
    fn test_digit_classes() {
        assert!(is_decimal_digit(b'0'));
        assert!(is_decimal_digit(b'9'));
        assert!(!is_decimal_digit(b'a'));

        assert!(is_binary_digit(b'0'));
        assert!(is_binary_digit(b'1'));
        assert!(!is_binary_digit(b'2'));

        assert!(is_hex_digit(b'7'));
        assert!(is_hex_digit(b'f'));
        assert!(is_hex_digit(b'F'));
        assert!(!is_hex_digit(b'g'));
        assert!(!is_hex_digit(b'G'));
    }

    #[test]
    fn test_hex_value() {
        assert_eq!(hex_value(b'0'), Some(0));
        assert_eq!(hex_value(b'9'), Some(9));
        assert_eq!(hex_value(b'a'), Some(10));
        assert_eq!(hex_value(b'F'), Some(15));
        assert_eq!(hex_value(b'g'), None);
        assert_eq!(hex_value(0xFF), None);
    }

    #[test]
    fn test_hex_value_agrees_with_class() {
        for c in 0..=255u8 {
            assert_eq!(hex_value(c).is_some(), is_hex_digit(c));
        }
    }

    #[test]
    fn test_radix_prefix() {
        assert_eq!(Radix::from_prefix(b'b'), Some(Radix::Binary));
        assert_eq!(Radix::from_prefix(b'B'), Some(Radix::Binary));
        assert_eq!(Radix::from_prefix(b'x'), Some(Radix::Hexadecimal));
        assert_eq!(Radix::from_prefix(b'X'), Some(Radix::Hexadecimal));
        assert_eq!(Radix::from_prefix(b'1'), None);
    }

    #[test]
    fn test_radix_digit() {
        assert_eq!(Radix::Binary.digit(b'1'), Some(1));
        assert_eq!(Radix::Binary.digit(b'2'), None);
        assert_eq!(Radix::Decimal.digit(b'7'), Some(7));
        assert_eq!(Radix::Decimal.digit(b'a'), None);
        assert_eq!(Radix::Hexadecimal.digit(b'c'), Some(12));
    }
}
