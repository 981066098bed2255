use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneError {
    #[error("phone number is required")]
    Empty,
    #[error("phone number must have 7 to 15 characters, got {0}")]
    InvalidLength(usize),
    #[error("unexpected character {0:?} in phone number")]
    InvalidCharacter(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtpError {
    #[error("no passcode was requested for this phone")]
    NotRequested,
    #[error("passcode has expired, request a new one")]
    Expired,
    #[error("passcode does not match")]
    Mismatch,
}
