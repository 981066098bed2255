use crate::PhoneError;

const MIN_LEN: usize = 7;
const MAX_LEN: usize = 15;

/// Strip whitespace, dashes and parentheses, then check what is left.
///
/// A leading `+` is kept for international numbers; every other character
/// must be a digit.
pub fn normalize_phone(raw: &str) -> Result<String, PhoneError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PhoneError::Empty);
    }

    let compact: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();

    for (i, c) in compact.chars().enumerate() {
        if !(c.is_ascii_digit() || (c == '+' && i == 0)) {
            return Err(PhoneError::InvalidCharacter(c));
        }
    }

    let len = compact.len();
    if !(MIN_LEN..=MAX_LEN).contains(&len) {
        return Err(PhoneError::InvalidLength(len));
    }
    Ok(compact)
}

/// First and last three characters, the rest hidden. For logs.
pub fn mask_phone(phone: &str) -> String {
    if phone.len() < MIN_LEN || !phone.is_ascii() {
        return "****".to_string();
    }
    format!("{}****{}", &phone[..3], &phone[phone.len() - 3..])
}
