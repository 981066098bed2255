//! Phone-number authentication in front of the ballot ledger.
//!
//! A phone number is normalized, a one-time passcode is issued for it, and a
//! correct passcode yields the voter identifier the ledger keys uniqueness on.
mod error;
pub mod identity;
pub mod otp;
pub mod phone;
pub mod session;

pub use error::{OtpError, PhoneError};
pub use identity::{derive_voter_id, VOTER_ID_SALT};
pub use otp::{OtpStore, DEFAULT_OTP_TTL, OTP_LEN};
pub use phone::{mask_phone, normalize_phone};
pub use session::VerifiedVoters;
