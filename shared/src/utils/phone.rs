//! Recipient helpers: phone number validation and masking for logs

use once_cell::sync::Lazy;
use regex::Regex;

// Chinese mobile phone number regex
static CHINA_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^1[3-9]\d{9}$").expect("valid regex")
});

// International phone number regex (E.164 format)
static E164_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{6,14}$").expect("valid regex")
});

/// Strip spaces, dashes and brackets, keeping digits and a leading '+'
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Mainland China mobile number without country code
pub fn is_valid_chinese_mobile(phone: &str) -> bool {
    CHINA_MOBILE_REGEX.is_match(&normalize_phone_number(phone))
}

/// E.164 formatted number, the only shape SMS gateways accept
pub fn is_e164(phone: &str) -> bool {
    E164_REGEX.is_match(&normalize_phone_number(phone))
}

/// Either a Chinese mobile number or an E.164 number
pub fn is_valid_phone(phone: &str) -> bool {
    is_valid_chinese_mobile(phone) || is_e164(phone)
}

/// Mask a recipient for logging (e.g. `158****8210`).
///
/// Targets are not always phone numbers, so anything too short to keep a
/// prefix and suffix collapses to `****`.
pub fn mask_phone_number(target: &str) -> String {
    let chars: Vec<char> = target.chars().collect();
    if chars.len() < 7 {
        return "****".to_string();
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone_number() {
        assert_eq!(normalize_phone_number("158-0108-8210"), "15801088210");
        assert_eq!(normalize_phone_number("+86 158 0108 8210"), "+8615801088210");
    }

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_chinese_mobile("15801088210"));
        assert!(!is_valid_chinese_mobile("12801088210"));
        assert!(is_e164("+14155552671"));
        assert!(!is_e164("15801088210"));
        assert!(!is_e164("+0123456789"));
        assert!(is_valid_phone("15801088210"));
        assert!(is_valid_phone("+8615801088210"));
        assert!(!is_valid_phone("hello"));
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("15801088210"), "158****8210");
        assert_eq!(mask_phone_number("+8615801088210"), "+86****8210");
        assert_eq!(mask_phone_number("12345"), "****");
        assert_eq!(mask_phone_number(""), "****");
    }
}
