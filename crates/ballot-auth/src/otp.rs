use crate::{derive_voter_id, mask_phone, OtpError};
use ballot_core::block::now_millis;
use rand::Rng;
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tracing::debug;

pub const OTP_LEN: usize = 6;
pub const DEFAULT_OTP_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Clone, Debug)]
struct OtpEntry {
    code: String,
    expires_at: u64,
}

/// Outstanding passcodes keyed by phone number.
///
/// Expiry is checked when a code is looked up or a new one is issued; nothing
/// sweeps the map in the background.
#[derive(Debug)]
pub struct OtpStore {
    entries: Mutex<HashMap<String, OtpEntry>>,
    ttl: Duration,
}

impl OtpStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, OtpEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issue a fresh 6-digit code for `phone`, replacing any earlier one.
    pub fn issue(&self, phone: &str) -> String {
        self.issue_at(phone, now_millis())
    }

    pub fn issue_at(&self, phone: &str, now: u64) -> String {
        let code = rand::thread_rng().gen_range(100_000..1_000_000u32).to_string();
        let expires_at = now.saturating_add(self.ttl.as_millis() as u64);
        let mut entries = self.entries();
        // Phones that never came back to verify.
        entries.retain(|_, e| now <= e.expires_at);
        entries.insert(
            phone.to_owned(),
            OtpEntry {
                code: code.clone(),
                expires_at,
            },
        );
        debug!(phone = %mask_phone(phone), expires_at, "issued passcode");
        code
    }

    /// Check `code` for `phone`; on success the code is consumed and the
    /// derived voter id returned.
    pub fn verify(&self, phone: &str, code: &str) -> Result<String, OtpError> {
        self.verify_at(phone, code, now_millis())
    }

    pub fn verify_at(&self, phone: &str, code: &str, now: u64) -> Result<String, OtpError> {
        let mut entries = self.entries();
        let entry = entries.get(phone).ok_or(OtpError::NotRequested)?;
        if now > entry.expires_at {
            entries.remove(phone);
            return Err(OtpError::Expired);
        }
        if entry.code != code {
            return Err(OtpError::Mismatch);
        }
        entries.remove(phone);
        debug!(phone = %mask_phone(phone), "passcode verified");
        Ok(derive_voter_id(phone))
    }

    /// The outstanding code for `phone`, if any. Development only; stands in
    /// for the SMS that would carry it.
    pub fn pending_code(&self, phone: &str) -> Option<String> {
        self.entries().get(phone).map(|e| e.code.clone())
    }
}

impl Default for OtpStore {
    fn default() -> Self {
        Self::new(DEFAULT_OTP_TTL)
    }
}
